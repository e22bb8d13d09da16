//! Open payable records supplied by the data-access layer.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// An open financial obligation that an extracted document may settle.
///
/// Every attribute except `id` is optional: a missing attribute only
/// disables the scoring signal that reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayableCandidate {
    /// Payable identifier.
    pub id: String,

    /// Supplier identifier.
    #[serde(default)]
    pub supplier_id: Option<String>,

    /// Supplier display name.
    #[serde(default)]
    pub supplier_name: Option<String>,

    /// Supplier tax id, in any punctuation.
    #[serde(default)]
    pub supplier_tax_id: Option<String>,

    /// Amount owed.
    #[serde(default)]
    pub amount: Option<Decimal>,

    /// Due date, truncated to the day.
    #[serde(default, deserialize_with = "deserialize_day")]
    pub due_date: Option<NaiveDate>,

    /// Document number the payable was registered with.
    #[serde(default)]
    pub document_number: Option<String>,

    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,

    /// Already paid.
    #[serde(default)]
    pub is_paid: bool,

    /// Forecast entry rather than a confirmed obligation.
    #[serde(default)]
    pub is_forecast: bool,
}

impl PayableCandidate {
    /// Create a candidate with only an id set.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Supplier tax id reduced to its digits, if any digits remain.
    pub fn canonical_tax_id(&self) -> Option<String> {
        self.supplier_tax_id
            .as_deref()
            .map(crate::extract::rules::canonical_tax_id)
            .filter(|digits| !digits.is_empty())
    }

    /// Amount usable for comparison; zero counts as missing.
    pub fn comparable_amount(&self) -> Option<Decimal> {
        self.amount.filter(|amount| !amount.is_zero())
    }
}

/// Accept `2024-12-31` as well as timestamps such as `2024-12-31T10:00:00Z`,
/// keeping only the date part. Unparseable values become `None`.
fn deserialize_day<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_day))
}

/// Parse the leading `YYYY-MM-DD` of a date or timestamp string.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let day = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_deserialize_timestamp_due_date() {
        let json = r#"{
            "id": "1",
            "supplier_tax_id": "12.345.678/0001-90",
            "amount": "1500.00",
            "due_date": "2024-12-31T10:30:00Z"
        }"#;

        let payable: PayableCandidate = serde_json::from_str(json).unwrap();
        assert_eq!(payable.due_date, NaiveDate::from_ymd_opt(2024, 12, 31));
        assert_eq!(payable.amount, Some(Decimal::from_str("1500.00").unwrap()));
        assert_eq!(payable.canonical_tax_id(), Some("12345678000190".to_string()));
        assert!(!payable.is_paid);
    }

    #[test]
    fn test_invalid_due_date_is_absent() {
        let json = r#"{"id": "1", "due_date": "soon"}"#;
        let payable: PayableCandidate = serde_json::from_str(json).unwrap();
        assert_eq!(payable.due_date, None);
    }

    #[test]
    fn test_zero_amount_is_not_comparable() {
        let mut payable = PayableCandidate::new("1");
        payable.amount = Some(Decimal::ZERO);
        assert_eq!(payable.comparable_amount(), None);
    }
}
