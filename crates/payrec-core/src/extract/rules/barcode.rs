//! Boleto barcode extraction.

use super::patterns::{first_accepted, BARCODE_RULES};
use super::{ExtractionMatch, FieldExtractor};

/// Barcode field extractor.
///
/// Takes the first match of the first matching rule and keeps it only if
/// it reduces to 47 or 48 digits. A rejected match does not fall through
/// to later rules.
pub struct BarcodeExtractor;

impl BarcodeExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BarcodeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for BarcodeExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let raw = first_accepted(&BARCODE_RULES[..], text, |rule, caps| {
            caps.get(1).map(|m| (rule.confidence, m))
        });

        let (confidence, raw) = raw?;
        let barcode = clean_barcode(raw.as_str())?;
        Some(ExtractionMatch::new(barcode, confidence, raw.as_str()).with_position(raw.start(), raw.end()))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        BARCODE_RULES
            .iter()
            .flat_map(|rule| {
                rule.regex
                    .captures_iter(text)
                    .filter_map(|caps| {
                        let raw = caps.get(1)?;
                        let barcode = clean_barcode(raw.as_str())?;
                        Some(
                            ExtractionMatch::new(barcode, rule.confidence, raw.as_str())
                                .with_position(raw.start(), raw.end()),
                        )
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

/// Strip non-digits and keep the result only if it is 47 or 48 digits long.
pub fn clean_barcode(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    matches!(digits.len(), 47 | 48).then_some(digits)
}
