//! Amount extraction for Brazilian billing documents.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{first_accepted, AMOUNT_RULES};
use super::{ExtractionMatch, FieldExtractor};

/// Amount field extractor.
///
/// Values outside `[min, max]` are skipped as if they had not matched.
pub struct AmountExtractor {
    min: Decimal,
    max: Decimal,
}

impl AmountExtractor {
    pub fn new() -> Self {
        Self {
            min: Decimal::new(1, 2),
            max: Decimal::new(10_000_000, 0),
        }
    }

    /// Set the plausible range.
    pub fn with_range(mut self, min: Decimal, max: Decimal) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    fn accept(&self, caps: &regex::Captures<'_>, confidence: f32) -> Option<ExtractionMatch<Decimal>> {
        let raw = caps.get(1)?;
        let amount = parse_brl_amount(raw.as_str())?;
        if !is_plausible_amount(amount, self.min, self.max) {
            return None;
        }
        Some(ExtractionMatch::new(amount, confidence, raw.as_str()).with_position(raw.start(), raw.end()))
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch<Decimal>;

    /// First plausible amount of the first rule that yields one.
    fn extract(&self, text: &str) -> Option<Self::Output> {
        first_accepted(&AMOUNT_RULES[..], text, |rule, caps| self.accept(caps, rule.confidence))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        AMOUNT_RULES
            .iter()
            .flat_map(|rule| {
                rule.regex
                    .captures_iter(text)
                    .filter_map(|caps| self.accept(&caps, rule.confidence))
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

/// Parse a Brazilian-formatted amount (e.g. "1.234,56").
///
/// Dots are thousands separators and the comma is the decimal mark.
pub fn parse_brl_amount(s: &str) -> Option<Decimal> {
    let normalized = s.trim().replace('.', "").replace(',', ".");
    Decimal::from_str(&normalized).ok()
}

/// Whether `amount` lies within `[min, max]`.
pub fn is_plausible_amount(amount: Decimal, min: Decimal, max: Decimal) -> bool {
    amount >= min && amount <= max
}
