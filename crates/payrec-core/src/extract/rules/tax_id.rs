//! Tax id (CNPJ) extraction.
//!
//! The first two distinct ids are later assigned to payee and payer by
//! position alone. Nothing in the text confirms which party an id belongs
//! to, so a document with a single id always yields a payee id.
//!
//! The pattern has no word boundaries. On a boleto with a single CNPJ the
//! first 14 digits of a flat barcode become the second id, and so end up
//! as the payer id.

use super::patterns::TAX_ID_RULES;
use super::{ExtractionMatch, FieldExtractor};

/// Length of a canonical CNPJ.
pub const TAX_ID_DIGITS: usize = 14;

/// Tax id field extractor.
pub struct TaxIdExtractor;

impl TaxIdExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TaxIdExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for TaxIdExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    /// Distinct canonical ids in order of first appearance.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results: Vec<Self::Output> = Vec::new();

        for rule in TAX_ID_RULES.iter() {
            for caps in rule.regex.captures_iter(text) {
                let Some(raw) = caps.get(1) else { continue };

                let tax_id = canonical_tax_id(raw.as_str());
                if tax_id.len() != TAX_ID_DIGITS || results.iter().any(|r| r.value == tax_id) {
                    continue;
                }

                results.push(
                    ExtractionMatch::new(tax_id, rule.confidence, raw.as_str())
                        .with_position(raw.start(), raw.end()),
                );
            }
        }

        results
    }
}

/// Strip everything but ASCII digits.
pub fn canonical_tax_id(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Format a canonical CNPJ as `12.345.678/0001-90`.
pub fn format_tax_id(tax_id: &str) -> String {
    let digits = canonical_tax_id(tax_id);

    if digits.len() != TAX_ID_DIGITS {
        return tax_id.to_string();
    }

    format!(
        "{}.{}.{}/{}-{}",
        &digits[0..2],
        &digits[2..5],
        &digits[5..8],
        &digits[8..12],
        &digits[12..14]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_tax_id() {
        assert_eq!(canonical_tax_id("12.345.678/0001-90"), "12345678000190");
        assert_eq!(canonical_tax_id(" 12345678000190 "), "12345678000190");
    }

    #[test]
    fn test_extract_in_order_without_duplicates() {
        let text = "Beneficiário CNPJ: 12.345.678/0001-90\n\
                    Pagador CNPJ: 11.222.333/0001-44\n\
                    Confira: 12345678000190";

        let ids: Vec<String> = TaxIdExtractor::new()
            .extract_all(text)
            .into_iter()
            .map(|m| m.value)
            .collect();

        assert_eq!(ids, vec!["12345678000190", "11222333000144"]);
    }

    #[test]
    fn test_barcode_digits_yield_a_second_id() {
        let text = "CNPJ: 12.345.678/0001-90\n\
                    23793381286000000000300000000401184340000150000";

        let ids: Vec<String> = TaxIdExtractor::new()
            .extract_all(text)
            .into_iter()
            .map(|m| m.value)
            .collect();

        assert_eq!(ids[..2], ["12345678000190", "23793381286000"]);
    }

    #[test]
    fn test_short_numbers_are_not_tax_ids() {
        assert!(TaxIdExtractor::new().extract("CPF 123.456.789-09").is_none());
    }

    #[test]
    fn test_format_tax_id() {
        assert_eq!(format_tax_id("12345678000190"), "12.345.678/0001-90");
        assert_eq!(format_tax_id("123"), "123");
    }
}
