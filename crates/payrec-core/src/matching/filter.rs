//! Narrowing of payables before matching.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::payable::PayableCandidate;

/// Bounds applied to candidates before they are scored.
///
/// All bounds are inclusive. A candidate without the attribute a bound
/// tests does not pass that bound. Paid payables are excluded unless
/// `include_paid` is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayableFilter {
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub include_paid: bool,
}

impl PayableFilter {
    /// Filter that keeps every unpaid payable.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date_range(mut self, min: Option<NaiveDate>, max: Option<NaiveDate>) -> Self {
        self.min_date = min;
        self.max_date = max;
        self
    }

    pub fn with_amount_range(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        self.min_amount = min;
        self.max_amount = max;
        self
    }

    pub fn include_paid(mut self, include: bool) -> Self {
        self.include_paid = include;
        self
    }

    /// Whether `payable` passes every bound.
    pub fn accepts(&self, payable: &PayableCandidate) -> bool {
        if payable.is_paid && !self.include_paid {
            return false;
        }

        within(payable.due_date, self.min_date, self.max_date)
            && within(payable.amount, self.min_amount, self.max_amount)
    }

    /// Keep the accepted payables, in input order.
    pub fn apply(&self, payables: &[PayableCandidate]) -> Vec<PayableCandidate> {
        payables.iter().filter(|p| self.accepts(p)).cloned().collect()
    }
}

fn within<T: PartialOrd>(value: Option<T>, min: Option<T>, max: Option<T>) -> bool {
    if min.is_none() && max.is_none() {
        return true;
    }
    let Some(value) = value else { return false };

    min.is_none_or(|min| value >= min) && max.is_none_or(|max| value <= max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payable(id: &str, amount: Option<i64>, due: Option<(i32, u32, u32)>, paid: bool) -> PayableCandidate {
        let mut payable = PayableCandidate::new(id);
        payable.amount = amount.map(|a| Decimal::new(a, 0));
        payable.due_date = due.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d));
        payable.is_paid = paid;
        payable
    }

    fn ids(payables: &[PayableCandidate]) -> Vec<&str> {
        payables.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_default_excludes_paid_only() {
        let payables = vec![
            payable("open", None, None, false),
            payable("paid", Some(10), None, true),
        ];
        assert_eq!(ids(&PayableFilter::new().apply(&payables)), vec!["open"]);
        assert_eq!(
            ids(&PayableFilter::new().include_paid(true).apply(&payables)),
            vec!["open", "paid"]
        );
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let payables = vec![
            payable("before", None, Some((2024, 11, 30)), false),
            payable("start", None, Some((2024, 12, 1)), false),
            payable("end", None, Some((2024, 12, 31)), false),
            payable("undated", None, None, false),
        ];
        let filter = PayableFilter::new()
            .with_date_range(NaiveDate::from_ymd_opt(2024, 12, 1), NaiveDate::from_ymd_opt(2024, 12, 31));
        assert_eq!(ids(&filter.apply(&payables)), vec!["start", "end"]);
    }

    #[test]
    fn test_amount_bounds() {
        let payables = vec![
            payable("small", Some(5), None, false),
            payable("ok", Some(100), None, false),
            payable("unknown", None, None, false),
        ];
        let filter = PayableFilter::new().with_amount_range(Some(Decimal::new(10, 0)), None);
        assert_eq!(ids(&filter.apply(&payables)), vec!["ok"]);
    }
}
