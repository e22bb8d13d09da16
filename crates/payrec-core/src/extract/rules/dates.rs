//! Date extraction for Brazilian billing documents.

use chrono::NaiveDate;
use tracing::trace;

use super::patterns::{DateFormat, DATE_RULES, DUE_DATE_KEYWORDS, ISSUE_DATE_KEYWORDS};
use super::{ExtractionMatch, FieldExtractor};

/// Date field extractor.
///
/// Every date rule contributes; candidates that are not real calendar
/// dates (e.g. `31/02/2024`) are dropped.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<NaiveDate>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    /// Dates in rule order, then in order of appearance.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for rule in DATE_RULES.iter() {
            for caps in rule.regex.captures_iter(text) {
                let Some(raw) = caps.get(1) else { continue };

                match parse_date(raw.as_str(), rule.tag) {
                    Some(date) => results.push(
                        ExtractionMatch::new(date, rule.confidence, raw.as_str())
                            .with_position(raw.start(), raw.end()),
                    ),
                    None => trace!("Discarding invalid {} date {:?}", rule.name, raw.as_str()),
                }
            }
        }

        results
    }
}

/// Role of a date on the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRole {
    Due,
    Issue,
}

/// Dates found on a document, at most one per role.
#[derive(Debug, Clone, Default)]
pub struct DocumentDates {
    /// Due date (vencimento).
    pub due_date: Option<ExtractionMatch<NaiveDate>>,
    /// Issue date (emissão).
    pub issue_date: Option<ExtractionMatch<NaiveDate>>,
}

/// Extract due and issue dates from document text.
///
/// A date whose surroundings mention a role keyword takes that role,
/// replacing an earlier date of the same role. An unlabeled date becomes
/// the due date only while no due date has been assigned.
pub fn extract_dates(text: &str, context_chars: usize) -> DocumentDates {
    let mut result = DocumentDates::default();

    for date in DateExtractor::new().extract_all(text) {
        let role = date
            .position
            .and_then(|(start, end)| date_role(text, start, end, context_chars));

        match role {
            Some(DateRole::Due) => result.due_date = Some(date),
            Some(DateRole::Issue) => result.issue_date = Some(date),
            None if result.due_date.is_none() => result.due_date = Some(date),
            None => {}
        }
    }

    result
}

/// Decide the role of the date at `start..end` from nearby keywords.
pub fn date_role(text: &str, start: usize, end: usize, context_chars: usize) -> Option<DateRole> {
    let context = context_window(text, start, end, context_chars).to_lowercase();

    if DUE_DATE_KEYWORDS.iter().any(|k| context.contains(k)) {
        Some(DateRole::Due)
    } else if ISSUE_DATE_KEYWORDS.iter().any(|k| context.contains(k)) {
        Some(DateRole::Issue)
    } else {
        None
    }
}

/// The match plus up to `chars` characters on each side.
fn context_window(text: &str, start: usize, end: usize, chars: usize) -> &str {
    let from = text[..start]
        .char_indices()
        .rev()
        .take(chars)
        .last()
        .map_or(start, |(i, _)| i);
    let to = text[end..]
        .char_indices()
        .nth(chars)
        .map_or(text.len(), |(i, _)| end + i);

    &text[from..to]
}

/// Parse `s` with the layout of a date rule.
pub fn parse_date(s: &str, format: DateFormat) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), format.chrono_format()).ok()
}
