//! Data models for extraction records, payables and match reports.

pub mod config;
pub mod payable;
pub mod record;
pub mod report;

pub use config::{ExtractionConfig, MatchingConfig, PayrecConfig};
pub use payable::PayableCandidate;
pub use record::{DocumentType, ExtractionRecord};
pub use report::{BatchSummary, Divergence, MatchEntry, MatchReport, SuggestedAction};
