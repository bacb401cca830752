//! Error types for the cuadro table extraction library.

use thiserror::Error;

/// Primary error type for table extraction operations.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Input is not a well-formed document of the declared type.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The parsing backend cannot open or read the document.
    #[error("parse error: {0}")]
    Parse(String),

    /// A page-level failure during table detection or normalization.
    #[error("extraction error: {0}")]
    Extraction(String),

    /// A table row with a cell count that does not match its header.
    #[error("ragged table: row {row} has {got} cells, expected {expected}")]
    RaggedTable {
        row: usize,
        got: usize,
        expected: usize,
    },

    /// The cache or result store cannot be reached. Callers treat this as
    /// a degraded store and recompute; it is never fatal for extraction.
    #[error("cache unavailable: {0}")]
    CacheUnavailable(String),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Convenience Result type alias for ExtractError.
pub type Result<T> = std::result::Result<T, ExtractError>;
