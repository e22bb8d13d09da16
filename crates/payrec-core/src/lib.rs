//! Core library for Brazilian billing document processing.
//!
//! This crate provides:
//! - Field extraction from document text (boletos, invoices, receipts)
//! - PDF text sources (feature `pdf`)
//! - Weighted matching of extracted documents against open payables
//! - Reconciliation plans for confirmed matches

pub mod error;
pub mod extract;
pub mod matching;
pub mod models;
#[cfg(feature = "pdf")]
pub mod pdf;

pub use error::{PayrecError, Result, SourceError};
pub use extract::{FieldExtractionEngine, PlainText, TextSource};
pub use matching::{
    match_payables, plan_reconciliation, PayableFilter, ReconcileAction, ReconciliationMatcher,
    ReconciliationPlan,
};
pub use models::{
    BatchSummary, Divergence, DocumentType, ExtractionConfig, ExtractionRecord, MatchEntry,
    MatchReport, MatchingConfig, PayableCandidate, PayrecConfig, SuggestedAction,
};
#[cfg(feature = "pdf")]
pub use pdf::PdfTextSource;
