//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::debug;

use crate::error::SourceError;
use crate::extract::TextSource;

/// Text source for PDFs with embedded text.
///
/// Scanned PDFs without a text layer produce [`SourceError::Empty`]; OCR is
/// left to whatever sits in front of this crate.
#[derive(Debug, Clone)]
pub struct PdfTextSource {
    data: Vec<u8>,
}

impl PdfTextSource {
    /// Wrap raw PDF bytes.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }

    /// Read a PDF file.
    pub fn from_path(path: &std::path::Path) -> Result<Self, SourceError> {
        Ok(Self::from_bytes(std::fs::read(path)?))
    }

    /// Parse the document, decrypting PDFs protected by an empty password.
    ///
    /// Returns the bytes pdf-extract should read and the page count.
    fn load(&self) -> Result<(Vec<u8>, usize), SourceError> {
        let mut doc = Document::load_mem(&self.data).map_err(|e| SourceError::Parse(e.to_string()))?;

        let data = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(SourceError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| SourceError::Parse(format!("failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            self.data.clone()
        };

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(SourceError::NoPages);
        }

        Ok((data, page_count))
    }
}

impl TextSource for PdfTextSource {
    fn produce_text(&self) -> Result<String, SourceError> {
        let (data, page_count) = self.load()?;

        let text = pdf_extract::extract_text_from_mem(&data)
            .map_err(|e| SourceError::TextExtraction(e.to_string()))?;

        debug!("Extracted {} characters from {} PDF pages", text.len(), page_count);

        if text.trim().is_empty() {
            return Err(SourceError::Empty);
        }
        Ok(text)
    }
}
