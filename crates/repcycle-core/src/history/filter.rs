use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::HistoryEntry;

/// Search criteria for history listings. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryFilter {
    /// Case-insensitive substring of the workout name.
    pub query: Option<String>,
    /// Inclusive lower bound on the completion date (UTC).
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on the completion date (UTC).
    pub to: Option<NaiveDate>,
}

impl HistoryFilter {
    pub fn matches(&self, entry: &HistoryEntry) -> bool {
        let day = entry.completed_at.date_naive();
        let name_ok = match self.query.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => entry.name.to_lowercase().contains(&q.to_lowercase()),
            _ => true,
        };
        name_ok
            && self.from.map_or(true, |from| day >= from)
            && self.to.map_or(true, |to| day <= to)
    }

    /// Half-open `[lower, upper)` bounds on RFC 3339 `completed_at` text.
    ///
    /// UTC timestamps compare the same as text, so the date range can be
    /// pushed into an index scan. Open ends become bounds nothing falls outside.
    pub(crate) fn completed_at_bounds(&self) -> (String, String) {
        let lower = self.from.map(|d| d.to_string()).unwrap_or_default();
        let upper = self
            .to
            .and_then(|d| d.succ_opt())
            .map_or_else(|| "~".to_string(), |d| d.to_string());
        (lower, upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::UserId;
    use chrono::{TimeZone, Utc};

    fn entry(name: &str, y: i32, m: u32, d: u32) -> HistoryEntry {
        let at = Utc.with_ymd_and_hms(y, m, d, 18, 0, 0).unwrap();
        HistoryEntry {
            id: format!("{name}-{d}"),
            user_id: UserId::new("u").unwrap(),
            name: name.into(),
            started_at: at,
            completed_at: at,
            duration_secs: 0,
            completed_sets: 0,
            blocks: Vec::new(),
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = HistoryFilter::default();
        assert!(filter.matches(&entry("Legs", 2026, 3, 1)));
        assert!(filter.matches(&entry("Push", 2026, 3, 5)));
        assert_eq!(filter.completed_at_bounds(), (String::new(), "~".to_string()));
    }

    #[test]
    fn query_and_date_range_combine() {
        let filter = HistoryFilter {
            query: Some("push".into()),
            from: NaiveDate::from_ymd_opt(2026, 3, 2),
            to: NaiveDate::from_ymd_opt(2026, 3, 10),
        };
        assert!(!filter.matches(&entry("Push A", 2026, 3, 1)));
        assert!(filter.matches(&entry("Push B", 2026, 3, 10)));
        assert!(!filter.matches(&entry("Pull", 2026, 3, 5)));
    }

    #[test]
    fn bounds_cover_the_whole_last_day() {
        let filter = HistoryFilter {
            query: None,
            from: NaiveDate::from_ymd_opt(2026, 3, 2),
            to: NaiveDate::from_ymd_opt(2026, 3, 31),
        };
        let (lower, upper) = filter.completed_at_bounds();
        assert_eq!(lower, "2026-03-02");
        assert_eq!(upper, "2026-04-01");

        let last = entry("Late", 2026, 3, 31).completed_at.to_rfc3339();
        assert!(last.as_str() >= lower.as_str() && last.as_str() < upper.as_str());
    }
}
