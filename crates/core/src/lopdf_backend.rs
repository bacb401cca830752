//! lopdf-backed parsing adapter.
//!
//! `lopdf` is pure Rust and needs no system libraries. The parsed
//! [`lopdf::Document`] is immutable after open, so concurrent page reads
//! are safe and the handle satisfies the [`PdfDocument`] contract without
//! extra locking. Tables come from the text layer via
//! [`crate::textgrid`].

use lopdf::Document;

use crate::backend::{PdfBackend, PdfDocument, RawTable};
use crate::error::{ExtractError, Result};
use crate::textgrid;

/// Largest document the backend will open.
pub const MAX_PDF_BYTES: usize = 64 * 1024 * 1024;

/// Largest page count the backend will walk.
pub const MAX_PAGE_COUNT: usize = 4_096;

/// Production backend over lopdf.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfBackend;

/// Open document handle: the parsed file plus its page numbers in
/// document order (lopdf numbers pages from 1).
#[derive(Debug)]
pub struct LopdfDocument {
    doc: Document,
    page_numbers: Vec<u32>,
}

impl PdfBackend for LopdfBackend {
    type Document = LopdfDocument;

    fn open(&self, bytes: &[u8]) -> Result<LopdfDocument> {
        if bytes.len() < 8 || !bytes.starts_with(b"%PDF-") {
            return Err(ExtractError::InvalidInput(
                "missing %PDF header".to_string(),
            ));
        }
        if bytes.len() > MAX_PDF_BYTES {
            return Err(ExtractError::InvalidInput(format!(
                "document too large: {} bytes exceeds {} byte cap",
                bytes.len(),
                MAX_PDF_BYTES
            )));
        }

        let mut doc = Document::load_mem(bytes).map_err(|e| ExtractError::Parse(e.to_string()))?;

        if doc.is_encrypted() && doc.decrypt("").is_err() {
            return Err(ExtractError::Parse(
                "cannot decrypt password-protected document".to_string(),
            ));
        }
        doc.decompress();

        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        if page_numbers.len() > MAX_PAGE_COUNT {
            return Err(ExtractError::InvalidInput(format!(
                "too many pages: {} exceeds {} page cap",
                page_numbers.len(),
                MAX_PAGE_COUNT
            )));
        }
        tracing::debug!(pages = page_numbers.len(), "opened document");

        Ok(LopdfDocument { doc, page_numbers })
    }
}

impl LopdfDocument {
    fn page_number(&self, page_index: usize) -> Result<u32> {
        self.page_numbers.get(page_index).copied().ok_or_else(|| {
            ExtractError::Extraction(format!(
                "page index {} out of range for {} pages",
                page_index,
                self.page_numbers.len()
            ))
        })
    }
}

impl PdfDocument for LopdfDocument {
    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    fn page_text(&self, page_index: usize) -> Result<String> {
        let page_no = self.page_number(page_index)?;
        self.doc
            .extract_text(&[page_no])
            .map_err(|e| ExtractError::Extraction(format!("page {}: {}", page_index, e)))
    }

    fn page_tables(&self, page_index: usize) -> Result<Vec<RawTable>> {
        let text = self.page_text(page_index)?;
        Ok(textgrid::tables_from_text(&text))
    }
}
