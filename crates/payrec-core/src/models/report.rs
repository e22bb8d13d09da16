//! Reconciliation results.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::payable::PayableCandidate;
use super::record::ExtractionRecord;

/// A field-level mismatch between the document and a payable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Divergence {
    /// Field name (`amount`, `due_date`).
    pub field: String,
    /// Value on the payable.
    pub expected: String,
    /// Value on the document.
    pub found: String,
    /// Numeric gap, when the field is numeric.
    pub difference: Option<Decimal>,
}

/// A payable scored against an extraction record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEntry {
    /// The candidate payable.
    pub payable: PayableCandidate,
    /// Score in 0..=100.
    pub score: u32,
    /// Human-readable reasons for the awarded points.
    pub reasons: Vec<String>,
    /// Recorded mismatches.
    pub divergences: Vec<Divergence>,
}

/// What the caller should do with the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    /// Exactly one exact match.
    ReconcileAutomatically,
    /// Several exact matches; a human picks one.
    SelectMatch,
    /// Only partial matches.
    ReviewManually,
    /// Nothing matched.
    CreateNewEntry,
}

impl SuggestedAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestedAction::ReconcileAutomatically => "reconcile_automatically",
            SuggestedAction::SelectMatch => "select_match",
            SuggestedAction::ReviewManually => "review_manually",
            SuggestedAction::CreateNewEntry => "create_new_entry",
        }
    }
}

/// Outcome of matching one record against a set of payables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    /// Entries scoring at or above the exact threshold, best first.
    pub exact_matches: Vec<MatchEntry>,
    /// Entries between the partial and exact thresholds, best first.
    pub partial_matches: Vec<MatchEntry>,
    /// Recommended action.
    pub suggested_action: SuggestedAction,
    /// The record that was matched.
    pub extracted_record: ExtractionRecord,
    /// Number of candidates evaluated, including dropped ones.
    pub total_payables_checked: usize,
}

impl MatchReport {
    /// Best entry overall, if any.
    pub fn best(&self) -> Option<&MatchEntry> {
        self.exact_matches.first().or_else(|| self.partial_matches.first())
    }
}

/// Totals over a batch of processed documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_files: usize,
    /// Sum of the extracted amounts that were found.
    pub total_amount: Decimal,
    /// Documents with at least one exact match.
    pub matched_count: usize,
    pub unmatched_count: usize,
}

impl BatchSummary {
    /// Summarize records, each with the report it was matched into, if any.
    pub fn from_results<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = (&'a ExtractionRecord, Option<&'a MatchReport>)>,
    {
        let mut summary = Self::default();

        for (record, report) in results {
            summary.total_files += 1;
            if let Some(amount) = record.total_amount {
                summary.total_amount += amount;
            }
            if report.is_some_and(|r| !r.exact_matches.is_empty()) {
                summary.matched_count += 1;
            }
        }

        summary.unmatched_count = summary.total_files - summary.matched_count;
        summary
    }
}
