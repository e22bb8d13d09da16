//! Weighted scoring of one payable against an extraction record.
//!
//! The weights live in [`SCORING_TABLE`], evaluated top to bottom. Rules
//! share a [`Signal`]; once a rule of some signal applies, the remaining
//! rules of that signal are skipped. This keeps the amount tiers mutually
//! exclusive.

use rust_decimal::Decimal;

use crate::extract::rules::canonical_tax_id;
use crate::models::payable::PayableCandidate;
use crate::models::record::ExtractionRecord;
use crate::models::report::{Divergence, MatchEntry};

/// Highest score a candidate can reach.
pub const MAX_SCORE: u32 = 100;

/// What a scoring rule compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    TaxId,
    Amount,
    DueDate,
    DocumentNumber,
}

/// Result of a rule that applied.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleOutcome {
    pub points: u32,
    pub reason: Option<String>,
    pub divergence: Option<Divergence>,
}

impl RuleOutcome {
    fn award(points: u32, reason: impl Into<String>) -> Self {
        Self {
            points,
            reason: Some(reason.into()),
            divergence: None,
        }
    }

    fn diverge(divergence: Divergence) -> Self {
        Self {
            points: 0,
            reason: None,
            divergence: Some(divergence),
        }
    }
}

type Check = fn(&ExtractionRecord, &PayableCandidate, u32) -> Option<RuleOutcome>;

/// One row of the scoring table.
pub struct ScoringRule {
    pub name: &'static str,
    pub signal: Signal,
    pub points: u32,
    check: Check,
}

impl ScoringRule {
    /// Evaluate the rule; `None` when its condition does not hold or the
    /// data it needs is missing.
    pub fn apply(&self, record: &ExtractionRecord, payable: &PayableCandidate) -> Option<RuleOutcome> {
        (self.check)(record, payable, self.points)
    }
}

impl std::fmt::Debug for ScoringRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringRule")
            .field("name", &self.name)
            .field("signal", &self.signal)
            .field("points", &self.points)
            .finish()
    }
}

pub const SCORING_TABLE: [ScoringRule; 7] = [
    ScoringRule { name: "tax_id_equal", signal: Signal::TaxId, points: 40, check: tax_id_equal },
    ScoringRule { name: "amount_exact", signal: Signal::Amount, points: 30, check: amount_exact },
    ScoringRule { name: "amount_close", signal: Signal::Amount, points: 20, check: amount_close },
    ScoringRule { name: "amount_within_5pct", signal: Signal::Amount, points: 10, check: amount_within_tolerance },
    ScoringRule { name: "due_date_equal", signal: Signal::DueDate, points: 20, check: due_date_equal },
    ScoringRule { name: "due_date_differs", signal: Signal::DueDate, points: 0, check: due_date_differs },
    ScoringRule { name: "document_number_contained", signal: Signal::DocumentNumber, points: 10, check: document_number_contained },
];

/// Score `payable` against `record` using `table`.
pub fn score_candidate(
    table: &[ScoringRule],
    record: &ExtractionRecord,
    payable: &PayableCandidate,
) -> MatchEntry {
    let mut claimed: Vec<Signal> = Vec::new();
    let mut score = 0;
    let mut reasons = Vec::new();
    let mut divergences = Vec::new();

    for rule in table {
        if claimed.contains(&rule.signal) {
            continue;
        }
        let Some(outcome) = rule.apply(record, payable) else { continue };

        claimed.push(rule.signal);
        score += outcome.points;
        reasons.extend(outcome.reason);
        divergences.extend(outcome.divergence);
    }

    MatchEntry {
        payable: payable.clone(),
        score: score.min(MAX_SCORE),
        reasons,
        divergences,
    }
}

fn tax_id_equal(record: &ExtractionRecord, payable: &PayableCandidate, points: u32) -> Option<RuleOutcome> {
    let found = canonical_tax_id(record.payee_tax_id.as_deref()?);
    let expected = payable.canonical_tax_id()?;
    (found == expected).then(|| RuleOutcome::award(points, "supplier tax id matches"))
}

/// (found, expected, absolute difference) when both amounts are usable.
///
/// An overflowing difference counts as unusable and skips every amount tier.
fn amounts(record: &ExtractionRecord, payable: &PayableCandidate) -> Option<(Decimal, Decimal, Decimal)> {
    let found = record.total_amount?;
    let expected = payable.comparable_amount()?;
    let diff = found.checked_sub(expected)?.abs();
    Some((found, expected, diff))
}

fn amount_exact(record: &ExtractionRecord, payable: &PayableCandidate, points: u32) -> Option<RuleOutcome> {
    let (_, _, diff) = amounts(record, payable)?;
    (diff < Decimal::new(1, 2)).then(|| RuleOutcome::award(points, "exact amount"))
}

fn amount_close(record: &ExtractionRecord, payable: &PayableCandidate, points: u32) -> Option<RuleOutcome> {
    let (_, _, diff) = amounts(record, payable)?;
    (diff < Decimal::ONE)
        .then(|| RuleOutcome::award(points, format!("approximate amount (diff: {:.2})", diff)))
}

fn amount_within_tolerance(
    record: &ExtractionRecord,
    payable: &PayableCandidate,
    points: u32,
) -> Option<RuleOutcome> {
    let (found, expected, diff) = amounts(record, payable)?;
    let ratio = diff.checked_div(expected.abs())?;
    if ratio >= Decimal::new(5, 2) {
        return None;
    }

    Some(RuleOutcome {
        points,
        reason: Some(format!("amount within tolerance (diff: {:.2})", diff)),
        divergence: Some(Divergence {
            field: "amount".to_string(),
            expected: expected.to_string(),
            found: found.to_string(),
            difference: Some(diff),
        }),
    })
}

fn due_date_equal(record: &ExtractionRecord, payable: &PayableCandidate, points: u32) -> Option<RuleOutcome> {
    let found = record.due_date?;
    let expected = payable.due_date?;
    (found == expected).then(|| RuleOutcome::award(points, "due date matches"))
}

fn due_date_differs(record: &ExtractionRecord, payable: &PayableCandidate, _points: u32) -> Option<RuleOutcome> {
    let found = record.due_date?;
    let expected = payable.due_date?;
    (found != expected).then(|| {
        RuleOutcome::diverge(Divergence {
            field: "due_date".to_string(),
            expected: expected.to_string(),
            found: found.to_string(),
            difference: None,
        })
    })
}

fn document_number_contained(
    record: &ExtractionRecord,
    payable: &PayableCandidate,
    points: u32,
) -> Option<RuleOutcome> {
    let found = record.document_number.as_deref().filter(|n| !n.is_empty())?;
    let expected = payable.document_number.as_deref()?;
    expected
        .contains(found)
        .then(|| RuleOutcome::award(points, "document number matches"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn record_with_amount(amount: &str) -> ExtractionRecord {
        let mut record = ExtractionRecord::failed("test");
        record.total_amount = Some(dec(amount));
        record
    }

    fn payable_with_amount(amount: &str) -> PayableCandidate {
        let mut payable = PayableCandidate::new("p1");
        payable.amount = Some(dec(amount));
        payable
    }

    #[test]
    fn test_amount_tiers_are_exclusive() {
        let entry = score_candidate(&SCORING_TABLE, &record_with_amount("100.005"), &payable_with_amount("100.00"));
        assert_eq!(entry.score, 30);
        assert_eq!(entry.reasons, vec!["exact amount".to_string()]);
    }

    #[test]
    fn test_amount_close_tier() {
        let entry = score_candidate(&SCORING_TABLE, &record_with_amount("100.50"), &payable_with_amount("100.00"));
        assert_eq!(entry.score, 20);
        assert_eq!(entry.reasons, vec!["approximate amount (diff: 0.50)".to_string()]);
        assert!(entry.divergences.is_empty());
    }

    #[test]
    fn test_amount_tolerance_tier_records_divergence() {
        let entry = score_candidate(&SCORING_TABLE, &record_with_amount("1040.00"), &payable_with_amount("1000.00"));
        assert_eq!(entry.score, 10);
        assert_eq!(entry.divergences.len(), 1);
        assert_eq!(entry.divergences[0].field, "amount");
        assert_eq!(entry.divergences[0].difference, Some(dec("40.00")));
    }

    #[test]
    fn test_tiny_candidate_amount_skips_amount_signal() {
        let mut payable = PayableCandidate::new("p1");
        payable.amount = Some(Decimal::new(1, 28));

        let entry = score_candidate(&SCORING_TABLE, &record_with_amount("10.00"), &payable);
        assert_eq!(entry.score, 0);
        assert!(entry.reasons.is_empty());
        assert!(entry.divergences.is_empty());
    }

    #[test]
    fn test_extreme_candidate_amount_skips_amount_signal() {
        let mut payable = PayableCandidate::new("p1");
        payable.amount = Some(Decimal::MIN);

        let entry = score_candidate(&SCORING_TABLE, &record_with_amount("10000000"), &payable);
        assert_eq!(entry.score, 0);
        assert!(entry.reasons.is_empty());
        assert!(entry.divergences.is_empty());
    }

    #[test]
    fn test_amount_outside_tolerance() {
        let entry = score_candidate(&SCORING_TABLE, &record_with_amount("1100.00"), &payable_with_amount("1000.00"));
        assert_eq!(entry.score, 0);
        assert!(entry.divergences.is_empty());
    }

    #[test]
    fn test_due_date_mismatch_is_divergence_only() {
        let mut record = ExtractionRecord::failed("test");
        record.due_date = NaiveDate::from_ymd_opt(2024, 12, 31);
        let mut payable = PayableCandidate::new("p1");
        payable.due_date = NaiveDate::from_ymd_opt(2025, 1, 15);

        let entry = score_candidate(&SCORING_TABLE, &record, &payable);
        assert_eq!(entry.score, 0);
        assert_eq!(
            entry.divergences,
            vec![Divergence {
                field: "due_date".to_string(),
                expected: "2025-01-15".to_string(),
                found: "2024-12-31".to_string(),
                difference: None,
            }]
        );
    }

    #[test]
    fn test_missing_candidate_data_scores_zero() {
        let mut record = record_with_amount("10.00");
        record.payee_tax_id = Some("12345678000190".to_string());
        record.document_number = Some("123".to_string());

        let entry = score_candidate(&SCORING_TABLE, &record, &PayableCandidate::new("bare"));
        assert_eq!(entry.score, 0);
        assert!(entry.reasons.is_empty());
        assert!(entry.divergences.is_empty());
    }

    #[test]
    fn test_full_match_scores_100() {
        let mut record = record_with_amount("1500.00");
        record.payee_tax_id = Some("12345678000190".to_string());
        record.due_date = NaiveDate::from_ymd_opt(2024, 12, 31);
        record.document_number = Some("12345".to_string());

        let mut payable = payable_with_amount("1500");
        payable.supplier_tax_id = Some("12.345.678/0001-90".to_string());
        payable.due_date = NaiveDate::from_ymd_opt(2024, 12, 31);
        payable.document_number = Some("NF-12345-A".to_string());

        let entry = score_candidate(&SCORING_TABLE, &record, &payable);
        assert_eq!(entry.score, 100);
        assert_eq!(entry.reasons.len(), 4);
    }

    #[test]
    fn test_zero_candidate_amount_is_skipped() {
        let entry = score_candidate(&SCORING_TABLE, &record_with_amount("0.01"), &payable_with_amount("0"));
        assert_eq!(entry.score, 0);
    }
}
