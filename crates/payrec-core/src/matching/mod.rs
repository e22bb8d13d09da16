//! Reconciliation of extraction records against open payables.

pub mod filter;
pub mod reconcile;
pub mod scoring;

pub use filter::PayableFilter;
pub use reconcile::{plan_reconciliation, AuditEntry, FieldUpdate, ReconcileAction, ReconciliationPlan};
pub use scoring::{score_candidate, ScoringRule, Signal, SCORING_TABLE};

use tracing::{debug, info};

use crate::models::config::MatchingConfig;
use crate::models::payable::PayableCandidate;
use crate::models::record::ExtractionRecord;
use crate::models::report::{MatchEntry, MatchReport, SuggestedAction};

/// Scores candidates and classifies them into exact and partial matches.
#[derive(Debug, Clone, Default)]
pub struct ReconciliationMatcher {
    config: MatchingConfig,
}

impl ReconciliationMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given thresholds.
    pub fn with_config(mut self, config: MatchingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Match `record` against `candidates`.
    ///
    /// Entries below the partial threshold are dropped. Within each class,
    /// entries are ordered by descending score; ties keep input order.
    pub fn match_record(&self, record: &ExtractionRecord, candidates: &[PayableCandidate]) -> MatchReport {
        if candidates.is_empty() {
            debug!("No candidates to match against");
            return MatchReport {
                exact_matches: Vec::new(),
                partial_matches: Vec::new(),
                suggested_action: SuggestedAction::CreateNewEntry,
                extracted_record: record.clone(),
                total_payables_checked: 0,
            };
        }

        let mut exact_matches: Vec<MatchEntry> = Vec::new();
        let mut partial_matches: Vec<MatchEntry> = Vec::new();

        for candidate in candidates {
            let entry = score_candidate(&SCORING_TABLE, record, candidate);
            debug!("Payable {} scored {} ({:?})", candidate.id, entry.score, entry.reasons);

            match self.classify(entry.score) {
                Some(MatchClass::Exact) => exact_matches.push(entry),
                Some(MatchClass::Partial) => partial_matches.push(entry),
                None => {}
            }
        }

        // sort_by is stable, so ties keep candidate order
        exact_matches.sort_by(|a, b| b.score.cmp(&a.score));
        partial_matches.sort_by(|a, b| b.score.cmp(&a.score));

        let suggested_action = suggest_action(exact_matches.len(), partial_matches.len());

        info!(
            "Checked {} payables: {} exact, {} partial, suggesting {}",
            candidates.len(),
            exact_matches.len(),
            partial_matches.len(),
            suggested_action.as_str()
        );

        MatchReport {
            exact_matches,
            partial_matches,
            suggested_action,
            extracted_record: record.clone(),
            total_payables_checked: candidates.len(),
        }
    }

    fn classify(&self, score: u32) -> Option<MatchClass> {
        if score >= self.config.exact_threshold {
            Some(MatchClass::Exact)
        } else if score >= self.config.partial_threshold {
            Some(MatchClass::Partial)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchClass {
    Exact,
    Partial,
}

/// Match with the default thresholds.
pub fn match_payables(record: &ExtractionRecord, candidates: &[PayableCandidate]) -> MatchReport {
    ReconciliationMatcher::new().match_record(record, candidates)
}

fn suggest_action(exact: usize, partial: usize) -> SuggestedAction {
    match (exact, partial) {
        (1, _) => SuggestedAction::ReconcileAutomatically,
        (0, 0) => SuggestedAction::CreateNewEntry,
        (0, _) => SuggestedAction::ReviewManually,
        _ => SuggestedAction::SelectMatch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn record() -> ExtractionRecord {
        let mut record = ExtractionRecord::failed("unused");
        record.total_amount = Some(dec("1500.00"));
        record.due_date = NaiveDate::from_ymd_opt(2024, 12, 31);
        record.payee_tax_id = Some("12345678000190".to_string());
        record.document_number = Some("12345".to_string());
        record
    }

    fn payable(id: &str, tax_id: Option<&str>, amount: &str, due: (i32, u32, u32)) -> PayableCandidate {
        let mut payable = PayableCandidate::new(id);
        payable.supplier_tax_id = tax_id.map(String::from);
        payable.amount = Some(dec(amount));
        payable.due_date = NaiveDate::from_ymd_opt(due.0, due.1, due.2);
        payable
    }

    fn ids(entries: &[MatchEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.payable.id.as_str()).collect()
    }

    #[test]
    fn test_no_candidates() {
        let report = ReconciliationMatcher::new().match_record(&record(), &[]);
        assert_eq!(report.suggested_action, SuggestedAction::CreateNewEntry);
        assert_eq!(report.total_payables_checked, 0);
        assert!(report.exact_matches.is_empty());
        assert!(report.partial_matches.is_empty());
        assert_eq!(report.extracted_record, record());
    }

    #[test]
    fn test_single_exact_match_reconciles_automatically() {
        let candidates = vec![
            payable("p1", Some("12.345.678/0001-90"), "1500.00", (2024, 12, 31)),
            payable("p2", Some("99999999000199"), "20.00", (2024, 1, 1)),
        ];
        let report = match_payables(&record(), &candidates);

        assert_eq!(report.suggested_action, SuggestedAction::ReconcileAutomatically);
        assert_eq!(ids(&report.exact_matches), vec!["p1"]);
        assert_eq!(report.exact_matches[0].score, 90);
        assert!(report.partial_matches.is_empty());
        assert_eq!(report.total_payables_checked, 2);
    }

    #[test]
    fn test_two_exact_matches_need_selection() {
        let candidates = vec![
            payable("p1", Some("12345678000190"), "1500.00", (2025, 1, 15)),
            payable("p2", Some("12345678000190"), "1500.00", (2024, 12, 31)),
        ];
        let report = match_payables(&record(), &candidates);

        assert_eq!(report.suggested_action, SuggestedAction::SelectMatch);
        assert_eq!(ids(&report.exact_matches), vec!["p2", "p1"]);
        assert_eq!(report.exact_matches[1].divergences[0].field, "due_date");
    }

    #[test]
    fn test_ties_keep_input_order() {
        let candidates = vec![
            payable("first", Some("12345678000190"), "1500.00", (2024, 12, 31)),
            payable("second", Some("12345678000190"), "1500.00", (2024, 12, 31)),
            payable("third", Some("12345678000190"), "1500.00", (2024, 12, 31)),
        ];
        let report = match_payables(&record(), &candidates);
        assert_eq!(ids(&report.exact_matches), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_partial_only_needs_review() {
        // tax id (40) plus the 5% amount tier (10)
        let candidates = vec![payable("p1", Some("12345678000190"), "1450.00", (2025, 3, 1))];
        let report = match_payables(&record(), &candidates);

        assert_eq!(report.suggested_action, SuggestedAction::ReviewManually);
        assert_eq!(report.partial_matches[0].score, 50);
        assert_eq!(report.partial_matches[0].divergences.len(), 2);
    }

    #[test]
    fn test_partial_ties_keep_input_order() {
        let candidates = vec![
            payable("a", Some("12345678000190"), "1450.00", (2025, 3, 1)),
            payable("b", Some("12345678000190"), "1450.00", (2025, 3, 1)),
            // tax id (40) plus the close amount tier (20)
            payable("c", Some("12345678000190"), "1500.50", (2025, 3, 1)),
        ];
        let report = match_payables(&record(), &candidates);

        assert!(report.exact_matches.is_empty());
        assert_eq!(ids(&report.partial_matches), vec!["c", "a", "b"]);
        assert_eq!(report.partial_matches[1].score, report.partial_matches[2].score);
        assert_eq!(report.suggested_action, SuggestedAction::ReviewManually);
    }

    #[test]
    fn test_score_between_thresholds_is_partial() {
        let matcher = ReconciliationMatcher::new();
        assert_eq!(matcher.classify(45), Some(MatchClass::Partial));
        assert_eq!(matcher.classify(40), Some(MatchClass::Partial));
        assert_eq!(matcher.classify(39), None);
        assert_eq!(matcher.classify(70), Some(MatchClass::Exact));
    }

    #[test]
    fn test_single_partial_needs_review() {
        assert_eq!(suggest_action(0, 1), SuggestedAction::ReviewManually);
        assert_eq!(suggest_action(1, 3), SuggestedAction::ReconcileAutomatically);
        assert_eq!(suggest_action(2, 0), SuggestedAction::SelectMatch);
        assert_eq!(suggest_action(0, 0), SuggestedAction::CreateNewEntry);
    }

    #[test]
    fn test_low_scores_are_dropped() {
        let candidates = vec![payable("p1", None, "1500.00", (2025, 3, 1))];
        let report = match_payables(&record(), &candidates);

        assert_eq!(report.suggested_action, SuggestedAction::CreateNewEntry);
        assert_eq!(report.total_payables_checked, 1);
        assert!(report.best().is_none());
    }

    #[test]
    fn test_custom_thresholds() {
        let matcher = ReconciliationMatcher::new().with_config(MatchingConfig {
            exact_threshold: 30,
            partial_threshold: 10,
        });
        let candidates = vec![payable("p1", None, "1500.00", (2025, 3, 1))];
        let report = matcher.match_record(&record(), &candidates);
        assert_eq!(report.suggested_action, SuggestedAction::ReconcileAutomatically);
    }
}
