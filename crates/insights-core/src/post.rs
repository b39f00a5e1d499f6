use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A single published post with its performance counters, normalized from
/// one spreadsheet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    /// Creation time as wall-clock time of the source sheet.
    pub created_time: NaiveDateTime,
    pub content: String,
    /// Permanent link, either a direct URL column or extracted from a
    /// `HYPERLINK(...)` formula.
    pub link: Option<String>,
    pub clicks: u64,
    pub reactions: u64,
    pub likes: u64,
    pub loves: u64,
    pub reach: u64,
    pub impressions: u64,
}

impl PostRecord {
    #[must_use]
    pub fn created_date(&self) -> NaiveDate {
        self.created_time.date()
    }

    /// Impressions + reach + like reactions + love reactions + clicks.
    #[must_use]
    pub fn engagement_score(&self) -> u64 {
        self.impressions
            .saturating_add(self.reach)
            .saturating_add(self.likes)
            .saturating_add(self.loves)
            .saturating_add(self.clicks)
    }
}
