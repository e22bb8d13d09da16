//! Rule-based field extractors for Brazilian billing documents.

pub mod amounts;
pub mod barcode;
pub mod dates;
pub mod names;
pub mod patterns;
pub mod references;
pub mod tax_id;

pub use amounts::{is_plausible_amount, parse_brl_amount, AmountExtractor};
pub use barcode::{clean_barcode, BarcodeExtractor};
pub use dates::{extract_dates, parse_date, DateExtractor, DateRole, DocumentDates};
pub use names::{extract_party_names, PartyNames};
pub use patterns::{first_accepted, DateFormat, Rule};
pub use references::{extract_digit_line, extract_document_number, extract_internal_reference};
pub use tax_id::{canonical_tax_id, TaxIdExtractor};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// Extraction context with confidence scores.
///
/// Only `value` reaches the [`ExtractionRecord`](crate::ExtractionRecord).
/// The rest is kept for logging and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Confidence of the rule that found the value (0.0 - 1.0).
    pub confidence: f32,
    /// Byte range of the match in the source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
