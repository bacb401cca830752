//! Parsing backend abstraction.
//!
//! The engine needs exactly two capabilities from a PDF library: open raw
//! bytes into an ordered sequence of pages, and report each page's text
//! and raw tables. Everything geometric stays behind this seam, so the
//! engine can be driven by [`crate::lopdf_backend::LopdfBackend`] in
//! production and by scripted fakes in tests.

use crate::error::Result;

/// One table cell as reported by the backend. `None` means the backend
/// detected the cell position but found no content in it.
pub type Cell = Option<String>;

/// One table row.
pub type Row = Vec<Cell>;

/// A rectangular grid of cells. Row 0 is conventionally the header row;
/// every row must have the same cell count.
pub type RawTable = Vec<Row>;

/// Factory for parsed document handles.
pub trait PdfBackend: Send + Sync {
    type Document: PdfDocument;

    /// Parse raw bytes into a document handle. The handle owns all
    /// parser state for the extraction call and releases it on drop.
    fn open(&self, bytes: &[u8]) -> Result<Self::Document>;
}

/// A parsed document with positional page access.
///
/// Implementations must support concurrent page reads, or serialize
/// access internally; the engine fans pages out across worker threads
/// and holds the handle only by shared reference.
pub trait PdfDocument: Send + Sync {
    fn page_count(&self) -> usize;

    /// Text layer of the page, empty when the page carries none.
    fn page_text(&self, page_index: usize) -> Result<String>;

    /// Raw tables detected on the page, in reading order.
    fn page_tables(&self, page_index: usize) -> Result<Vec<RawTable>>;
}
