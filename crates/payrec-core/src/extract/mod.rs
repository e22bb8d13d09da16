//! Field extraction from billing document text.

mod engine;
pub mod rules;

pub use engine::{confidence_score, FieldExtractionEngine};

use crate::error::SourceError;

/// Anything that can turn a source document into plain text.
///
/// Conversion (PDF parsing, OCR, ...) lives outside the engine; the engine
/// only needs the resulting text or the reason it could not be produced.
pub trait TextSource {
    /// Produce the document text.
    fn produce_text(&self) -> std::result::Result<String, SourceError>;
}

/// Text that has already been produced, e.g. read from a `.txt` file.
#[derive(Debug, Clone)]
pub struct PlainText(pub String);

impl TextSource for PlainText {
    fn produce_text(&self) -> std::result::Result<String, SourceError> {
        Ok(self.0.clone())
    }
}

impl PlainText {
    /// Read a text file as UTF-8 (lossy).
    pub fn from_path(path: &std::path::Path) -> std::result::Result<Self, SourceError> {
        let bytes = std::fs::read(path)?;
        Ok(Self(String::from_utf8_lossy(&bytes).into_owned()))
    }
}
