use indexmap::IndexMap;
use serde::Serialize;
use trend_core::Series;

use super::UserRecord;
use crate::source::Snapshot;

/// Spending statistics for one user.
///
/// `min`, `max`, `mean` and `range` are taken over every card-month entry,
/// so two cards charged in the same month count as two observations.
/// They are `None` when the user has no spending at all.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingSummary {
    /// User the summary belongs to.
    pub user_id: String,
    /// Sum over every card and month.
    pub total: f64,
    /// Month to amount summed across cards, in first-seen order.
    pub monthly: IndexMap<String, f64>,
    /// Smallest single entry.
    pub min: Option<f64>,
    /// Largest single entry.
    pub max: Option<f64>,
    /// Mean entry.
    pub mean: Option<f64>,
    /// `max - min`.
    pub range: Option<f64>,
}

impl SpendingSummary {
    /// Summarize `user`.
    pub fn from_user(user: &UserRecord) -> Self {
        let entries: Vec<f64> = user
            .user_cards
            .iter()
            .flat_map(|card| card.monthly_spending.values().copied())
            .collect();

        let mut monthly: IndexMap<String, f64> = IndexMap::new();
        for (month, amount) in user.user_cards.iter().flat_map(|c| &c.monthly_spending) {
            *monthly.entry(month.clone()).or_insert(0.0) += amount;
        }

        let min = entries.iter().copied().reduce(f64::min);
        let max = entries.iter().copied().reduce(f64::max);
        let mean = (!entries.is_empty()).then(|| trend_core::stats::mean(&entries));

        Self {
            user_id: user.user_id.clone(),
            total: entries.iter().sum(),
            monthly,
            min,
            max,
            mean,
            range: min.zip(max).map(|(lo, hi)| hi - lo),
        }
    }

    /// Monthly totals as a series, in the order of [`monthly`](Self::monthly).
    pub fn monthly_series(&self) -> Series<f64> {
        self.monthly.values().copied().collect()
    }

    /// Monthly totals with month labels, ready for a sink.
    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot::new(self.monthly_series()).with_labels(self.monthly.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Card;
    use approx::assert_relative_eq;
    use serde_json::Map;

    fn user() -> UserRecord {
        let mut user = UserRecord::new("u1", Map::new()).unwrap();
        user.user_cards.push(Card::new(
            "1111",
            "12/27",
            123,
            [("Jan".to_string(), 100.0), ("Feb".to_string(), 200.0)].into_iter().collect(),
        ));
        user.user_cards.push(Card::new(
            "2222",
            "06/26",
            456,
            [("Jan".to_string(), 50.0), ("Mar".to_string(), 25.0)].into_iter().collect(),
        ));
        user
    }

    #[test]
    fn test_summary_over_entries() {
        let summary = SpendingSummary::from_user(&user());

        assert_relative_eq!(summary.total, 375.0);
        assert_eq!(summary.min, Some(25.0));
        assert_eq!(summary.max, Some(200.0));
        assert_relative_eq!(summary.mean.unwrap(), 93.75);
        assert_eq!(summary.range, Some(175.0));
    }

    #[test]
    fn test_monthly_sums_in_first_seen_order() {
        let summary = SpendingSummary::from_user(&user());

        let months: Vec<_> = summary.monthly.keys().map(String::as_str).collect();
        assert_eq!(months, ["Jan", "Feb", "Mar"]);
        assert_eq!(summary.monthly_series().as_slice(), &[150.0, 200.0, 25.0]);

        let snapshot = summary.to_snapshot();
        assert_eq!(snapshot.labels.unwrap()[2], "Mar");
    }

    #[test]
    fn test_user_without_spending() {
        let summary = SpendingSummary::from_user(&UserRecord::new("u2", Map::new()).unwrap());

        assert_eq!(summary.total, 0.0);
        assert!(summary.monthly.is_empty());
        assert_eq!(summary.min, None);
        assert_eq!(summary.mean, None);
        assert_eq!(summary.range, None);
    }
}
