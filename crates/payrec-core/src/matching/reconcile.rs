//! Reconciliation plans for a confirmed match.
//!
//! Building a plan touches no storage; the caller persists the updates and
//! the audit entry.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::payable::PayableCandidate;
use crate::models::record::ExtractionRecord;

/// Source tag written on reconciled payables.
pub const RECONCILIATION_SOURCE: &str = "text_extraction";

/// Action name written to the audit trail.
pub const AUDIT_ACTION: &str = "reconcile_invoice";

/// How the payable should be reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileAction {
    /// Mark as reconciled, keep its values.
    #[default]
    Confirm,
    /// Overwrite values with the extracted ones, then mark as reconciled.
    UpdateAndConfirm,
}

/// A payable field overwritten from the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FieldUpdate {
    Amount(Decimal),
    DueDate(NaiveDate),
    Barcode(String),
    DigitLine(String),
}

/// Audit trail entry for a reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub action: String,
    pub entity_id: String,
    pub reconcile_action: ReconcileAction,
    pub previous_amount: Option<Decimal>,
    pub previous_due_date: Option<NaiveDate>,
    pub extracted_record: ExtractionRecord,
}

/// Everything needed to persist a reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationPlan {
    pub payable_id: String,
    pub reconciled_at: DateTime<Utc>,
    pub reconciliation_source: String,
    pub updates: Vec<FieldUpdate>,
    pub audit: AuditEntry,
}

impl ReconciliationPlan {
    /// Copy of `payable` with the amount and due date updates applied.
    ///
    /// Barcode and digit line have no counterpart on [`PayableCandidate`].
    pub fn applied_to(&self, payable: &PayableCandidate) -> PayableCandidate {
        let mut updated = payable.clone();
        for update in &self.updates {
            match update {
                FieldUpdate::Amount(amount) => updated.amount = Some(*amount),
                FieldUpdate::DueDate(date) => updated.due_date = Some(*date),
                FieldUpdate::Barcode(_) | FieldUpdate::DigitLine(_) => {}
            }
        }
        updated
    }
}

/// Build the plan reconciling `payable` with `record` at time `at`.
pub fn plan_reconciliation(
    payable: &PayableCandidate,
    record: &ExtractionRecord,
    action: ReconcileAction,
    at: DateTime<Utc>,
) -> ReconciliationPlan {
    let mut updates = Vec::new();

    if action == ReconcileAction::UpdateAndConfirm {
        updates.extend(record.total_amount.map(FieldUpdate::Amount));
        updates.extend(record.due_date.map(FieldUpdate::DueDate));
        updates.extend(record.barcode.clone().map(FieldUpdate::Barcode));
        updates.extend(record.digit_line.clone().map(FieldUpdate::DigitLine));
    }

    tracing::debug!("Planned {:?} of payable {} with {} updates", action, payable.id, updates.len());

    ReconciliationPlan {
        payable_id: payable.id.clone(),
        reconciled_at: at,
        reconciliation_source: RECONCILIATION_SOURCE.to_string(),
        updates,
        audit: AuditEntry {
            action: AUDIT_ACTION.to_string(),
            entity_id: payable.id.clone(),
            reconcile_action: action,
            previous_amount: payable.amount,
            previous_due_date: payable.due_date,
            extracted_record: record.clone(),
        },
    }
}
