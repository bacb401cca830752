//! cuadro - PDF table extraction with content-addressed caching.
//!
//! Raw document bytes go in; JSON text of every detected table's
//! records comes out. Repeated extractions of identical content are
//! served from an injected key-value cache keyed by a SHA-256
//! fingerprint of the bytes.

pub mod backend;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod lopdf_backend;
pub mod normalize;
pub mod store;
pub mod textgrid;

pub use backend::{Cell, PdfBackend, PdfDocument, RawTable, Row};
pub use engine::{EngineOptions, ExtractionEngine, error_payload};
pub use error::{ExtractError, Result};
pub use fingerprint::{cache_key, fingerprint};
pub use lopdf_backend::LopdfBackend;
pub use normalize::{NormalizeOptions, Record, TableRecords, normalize_table};
pub use store::{KvStore, MemoryStore};
