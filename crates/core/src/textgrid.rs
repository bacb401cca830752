//! Recovery of tabular grids from a page's text layer.
//!
//! Detection is delimiter based: a line splits into cells on tabs or on
//! runs of two or more spaces, and consecutive lines with the same cell
//! count form one grid. Cells emptied by space runs are unrecoverable
//! (the runs merge); tab-delimited empty cells come back as `None`.
//! Geometric table detection belongs to richer backends behind
//! [`crate::backend::PdfBackend`].

use crate::backend::{RawTable, Row};

/// Minimum cells per line for the line to count as tabular.
const MIN_COLUMNS: usize = 2;

/// Minimum lines (header plus data) for a run to count as a table.
const MIN_ROWS: usize = 2;

fn close_cell(cells: &mut Row, current: &mut String) {
    let cell = current.trim().to_string();
    cells.push(if cell.is_empty() { None } else { Some(cell) });
    current.clear();
}

/// Split one line into cells. Single spaces stay inside a cell, so
/// multi-word values survive.
fn split_columns(line: &str) -> Row {
    let mut cells: Row = Vec::new();
    let mut current = String::new();
    let mut space_run = 0usize;

    for ch in line.trim_end().chars() {
        match ch {
            '\t' => {
                close_cell(&mut cells, &mut current);
                space_run = 0;
            }
            ' ' => {
                space_run += 1;
                current.push(' ');
            }
            _ => {
                if space_run >= 2 && !current.trim().is_empty() {
                    close_cell(&mut cells, &mut current);
                }
                space_run = 0;
                current.push(ch);
            }
        }
    }
    if !current.trim().is_empty() {
        close_cell(&mut cells, &mut current);
    }
    cells
}

fn flush_run(tables: &mut Vec<RawTable>, run: &mut Vec<Row>) {
    if run.len() >= MIN_ROWS {
        tables.push(std::mem::take(run));
    } else {
        run.clear();
    }
}

/// Recover every tabular grid in the page text, in reading order.
pub fn tables_from_text(text: &str) -> Vec<RawTable> {
    let mut tables = Vec::new();
    let mut run: Vec<Row> = Vec::new();

    for line in text.lines() {
        let row = if line.trim().is_empty() {
            Vec::new()
        } else {
            split_columns(line)
        };
        let tabular = row.len() >= MIN_COLUMNS;

        if tabular && (run.is_empty() || row.len() == run[0].len()) {
            run.push(row);
        } else {
            flush_run(&mut tables, &mut run);
            if tabular {
                run.push(row);
            }
        }
    }
    flush_run(&mut tables, &mut run);

    tables
}
