//! Table normalization: raw cell grids into header-keyed records.
//!
//! Row 0 of a raw table names the fields; every following row becomes one
//! record. Columns whose data cells are all empty are dropped before
//! conversion, matching how empty columns vanish from tabular exports.

use indexmap::IndexMap;

use crate::backend::{Cell, RawTable};
use crate::error::{ExtractError, Result};

/// One normalized data row, keyed by header field name. Field order
/// follows header order, which `IndexMap` preserves through JSON.
pub type Record = IndexMap<String, String>;

/// All records of one table, in input row order.
pub type TableRecords = Vec<Record>;

/// Options controlling normalization behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Inherit empty data cells from the same column of the previous
    /// data row. Intended for tables where merged cells span rows; the
    /// header row is never a fill source.
    pub fill_down: bool,
}

fn is_empty_cell(cell: &Cell) -> bool {
    match cell {
        Some(value) => value.is_empty(),
        None => true,
    }
}

/// Normalize one raw table into records.
///
/// A header-only table yields an empty record list. Duplicate header
/// names are tolerated: the rightmost column's value wins for that field
/// on each record. Rows whose cell count differs from the header fail
/// with [`ExtractError::RaggedTable`] rather than truncating.
pub fn normalize_table(table: &RawTable, options: NormalizeOptions) -> Result<TableRecords> {
    let Some(header) = table.first() else {
        return Ok(Vec::new());
    };
    let width = header.len();

    for (row_idx, row) in table.iter().enumerate().skip(1) {
        if row.len() != width {
            return Err(ExtractError::RaggedTable {
                row: row_idx,
                got: row.len(),
                expected: width,
            });
        }
    }

    let mut data: Vec<Vec<Cell>> = table[1..].to_vec();

    if options.fill_down {
        for row_idx in 1..data.len() {
            for col in 0..width {
                if is_empty_cell(&data[row_idx][col]) {
                    data[row_idx][col] = data[row_idx - 1][col].clone();
                }
            }
        }
    }

    let kept: Vec<usize> = (0..width)
        .filter(|&col| data.iter().any(|row| !is_empty_cell(&row[col])))
        .collect();

    let mut records = Vec::with_capacity(data.len());
    for row in &data {
        let mut record = Record::new();
        for &col in &kept {
            let name = header[col].clone().unwrap_or_default();
            let value = row[col].clone().unwrap_or_default();
            record.insert(name, value);
        }
        records.push(record);
    }

    Ok(records)
}
