//! Error types for the payrec-core library.
//!
//! Extraction and matching never fail: misses are reported inside the
//! produced records. These types cover the fallible edges around them,
//! namely producing text from a document and loading configuration.

use thiserror::Error;

/// Main error type for the payrec library.
#[derive(Error, Debug)]
pub enum PayrecError {
    /// Text could not be produced from a source document.
    #[error("text source error: {0}")]
    Source(#[from] SourceError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while turning a source document into text.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Failed to open/parse the document.
    #[error("failed to parse document: {0}")]
    Parse(String),

    /// Failed to extract text from the document.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The document is encrypted and cannot be processed.
    #[error("document is encrypted")]
    Encrypted,

    /// The document has no pages.
    #[error("document has no pages")]
    NoPages,

    /// The document produced no text at all.
    #[error("document contains no text")]
    Empty,

    /// Reading the document failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the payrec library.
pub type Result<T> = std::result::Result<T, PayrecError>;
