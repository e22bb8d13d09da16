//! Extraction engine turning document text into an [`ExtractionRecord`].

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::models::config::ExtractionConfig;
use crate::models::record::{DocumentType, ExtractionRecord};

use super::rules::{
    extract_dates, extract_digit_line, extract_document_number, extract_internal_reference,
    extract_party_names, names::truncate_chars, AmountExtractor, BarcodeExtractor,
    FieldExtractor, TaxIdExtractor,
};
use super::TextSource;

/// Diagnostic recorded when no plausible amount is found.
pub const AMOUNT_NOT_FOUND: &str = "amount not found";

/// Confidence weights in hundredths: amount, due date, any tax id,
/// barcode, issue date.
const WEIGHT_AMOUNT: u32 = 30;
const WEIGHT_DUE_DATE: u32 = 25;
const WEIGHT_TAX_ID: u32 = 20;
const WEIGHT_BARCODE: u32 = 15;
const WEIGHT_ISSUE_DATE: u32 = 10;

/// Rule-based extraction engine.
///
/// Holds only immutable settings, so one instance can serve concurrent
/// callers.
#[derive(Debug, Clone, Default)]
pub struct FieldExtractionEngine {
    config: ExtractionConfig,
}

impl FieldExtractionEngine {
    /// Create an engine with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given extraction settings.
    pub fn with_config(mut self, config: ExtractionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Produce text from `source` and extract it.
    ///
    /// A source failure yields a record of type [`DocumentType::Erro`]
    /// instead of an error.
    pub fn extract_from_source(&self, source: &dyn TextSource) -> ExtractionRecord {
        match source.produce_text() {
            Ok(text) => self.extract(&text),
            Err(e) => {
                warn!("Text source failed: {}", e);
                ExtractionRecord::failed(e)
            }
        }
    }

    /// Extract all fields from `text`. Never fails; misses are left absent
    /// and a missing amount is reported in `extraction_errors`.
    pub fn extract(&self, text: &str) -> ExtractionRecord {
        let start = Instant::now();
        let mut errors = Vec::new();

        info!("Extracting fields from {} characters of text", text.chars().count());

        let document_type = DocumentType::classify(&text.to_lowercase());

        let total_amount = AmountExtractor::new()
            .with_range(self.config.min_amount, self.config.max_amount)
            .extract(text)
            .map(|m| m.value);
        if total_amount.is_none() {
            errors.push(AMOUNT_NOT_FOUND.to_string());
        }

        let dates = extract_dates(text, self.config.date_context_chars);

        let mut tax_ids = TaxIdExtractor::new().extract_all(text).into_iter().map(|m| m.value);
        let payee_tax_id = tax_ids.next();
        let payer_tax_id = tax_ids.next();

        let barcode = BarcodeExtractor::new().extract(text).map(|m| m.value);
        let digit_line = extract_digit_line(text);
        let internal_reference = extract_internal_reference(text);
        let document_number = extract_document_number(text);

        let names = extract_party_names(text, self.config.max_name_chars);

        let record = ExtractionRecord {
            document_type,
            raw_text: truncate_chars(text, self.config.max_raw_text_chars).to_string(),
            total_amount,
            due_date: dates.due_date.map(|m| m.value),
            issue_date: dates.issue_date.map(|m| m.value),
            payee_name: names.payee,
            payee_tax_id,
            payer_name: names.payer,
            payer_tax_id,
            barcode,
            digit_line,
            internal_reference,
            document_number,
            confidence_score: 0.0,
            extraction_errors: errors,
        };
        let record = ExtractionRecord {
            confidence_score: confidence_score(&record),
            ..record
        };

        debug!(
            "Extracted {:?} document with confidence {:.2} in {}us",
            record.document_type,
            record.confidence_score,
            start.elapsed().as_micros()
        );

        record
    }
}

/// Weighted share of the key fields present on `record`, in [0, 1] with
/// two decimals.
pub fn confidence_score(record: &ExtractionRecord) -> f32 {
    let hundredths: u32 = [
        (record.total_amount.is_some(), WEIGHT_AMOUNT),
        (record.due_date.is_some(), WEIGHT_DUE_DATE),
        (record.has_tax_id(), WEIGHT_TAX_ID),
        (record.barcode.is_some(), WEIGHT_BARCODE),
        (record.issue_date.is_some(), WEIGHT_ISSUE_DATE),
    ]
    .into_iter()
    .filter(|(present, _)| *present)
    .map(|(_, weight)| weight)
    .sum();

    hundredths as f32 / 100.0
}
