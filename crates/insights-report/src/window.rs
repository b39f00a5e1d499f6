//! Reporting window selection.

use chrono::{Duration, NaiveDate};
use insights_core::PostRecord;

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportWindow {
    /// The trailing `days` calendar days ending on (and including) `today`.
    ///
    /// `days` of 0 is treated as 1.
    #[must_use]
    pub fn trailing_days(today: NaiveDate, days: u32) -> Self {
        let span = i64::from(days.max(1)) - 1;
        let start = today
            .checked_sub_signed(Duration::days(span))
            .unwrap_or(NaiveDate::MIN);
        Self { start, end: today }
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Posts whose creation date falls inside the window, in input order.
    #[must_use]
    pub fn filter(&self, posts: &[PostRecord]) -> Vec<PostRecord> {
        posts
            .iter()
            .filter(|p| self.contains(p.created_date()))
            .cloned()
            .collect()
    }

    /// `"2025-03-01 to 2025-03-10"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} to {}", self.start, self.end)
    }
}
