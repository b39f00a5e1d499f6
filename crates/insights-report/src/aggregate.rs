//! Totals, per-day summaries and rankings over the posts of one window.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use insights_core::PostRecord;

use crate::window::ReportWindow;

/// Sums of the raw post counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricTotals {
    pub clicks: u64,
    pub reactions: u64,
    pub likes: u64,
    pub loves: u64,
    pub reach: u64,
    pub impressions: u64,
}

impl MetricTotals {
    pub fn add(&mut self, post: &PostRecord) {
        self.clicks = self.clicks.saturating_add(post.clicks);
        self.reactions = self.reactions.saturating_add(post.reactions);
        self.likes = self.likes.saturating_add(post.likes);
        self.loves = self.loves.saturating_add(post.loves);
        self.reach = self.reach.saturating_add(post.reach);
        self.impressions = self.impressions.saturating_add(post.impressions);
    }

    #[must_use]
    pub fn from_posts(posts: &[PostRecord]) -> Self {
        let mut totals = Self::default();
        for post in posts {
            totals.add(post);
        }
        totals
    }
}

/// Aggregated counters for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub totals: MetricTotals,
    pub post_count: usize,
}

impl DailySummary {
    /// Impressions + reach, the measure used to pick the best day.
    #[must_use]
    pub fn reach_score(&self) -> u64 {
        self.totals.impressions.saturating_add(self.totals.reach)
    }
}

/// Everything the renderers need for one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportData {
    pub window: ReportWindow,
    pub totals: MetricTotals,
    /// Chronological.
    pub daily: Vec<DailySummary>,
    pub top_posts: Vec<PostRecord>,
    pub best_day: DailySummary,
    /// Window posts in chronological order.
    pub posts: Vec<PostRecord>,
}

/// Group posts by calendar date, earliest first.
#[must_use]
pub fn daily_summaries(posts: &[PostRecord]) -> Vec<DailySummary> {
    let mut by_date: BTreeMap<NaiveDate, (MetricTotals, usize)> = BTreeMap::new();
    for post in posts {
        let (totals, count) = by_date.entry(post.created_date()).or_default();
        totals.add(post);
        *count += 1;
    }
    by_date
        .into_iter()
        .map(|(date, (totals, post_count))| DailySummary {
            date,
            weekday: date.weekday(),
            totals,
            post_count,
        })
        .collect()
}

/// The `n` posts with the highest engagement score.
///
/// The sort is stable, so posts with equal scores keep their input order.
#[must_use]
pub fn top_posts(posts: &[PostRecord], n: usize) -> Vec<PostRecord> {
    let mut ranked: Vec<&PostRecord> = posts.iter().collect();
    ranked.sort_by(|a, b| b.engagement_score().cmp(&a.engagement_score()));
    ranked.into_iter().take(n).cloned().collect()
}

/// The day with the highest impressions + reach. On a tie the earliest date
/// wins. `daily` must be chronological, as returned by [`daily_summaries`].
#[must_use]
pub fn best_day(daily: &[DailySummary]) -> Option<&DailySummary> {
    daily.iter().fold(None, |best, day| match best {
        Some(current) if current.reach_score() >= day.reach_score() => Some(current),
        _ => Some(day),
    })
}

/// Build the full report for the posts of `window`.
///
/// Returns `None` when `posts` is empty.
#[must_use]
pub fn build_report(
    window: ReportWindow,
    posts: &[PostRecord],
    top_n: usize,
) -> Option<ReportData> {
    let daily = daily_summaries(posts);
    let best = best_day(&daily)?.clone();

    let mut chronological = posts.to_vec();
    chronological.sort_by_key(|p| p.created_time);

    Some(ReportData {
        window,
        totals: MetricTotals::from_posts(posts),
        top_posts: top_posts(posts, top_n),
        best_day: best,
        daily,
        posts: chronological,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(day: u32, hour: u32, clicks: u64, reach: u64, impressions: u64) -> PostRecord {
        PostRecord {
            created_time: NaiveDate::from_ymd_opt(2025, 3, day)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            content: format!("post {day}-{hour}"),
            link: None,
            clicks,
            reactions: clicks * 2,
            likes: clicks,
            loves: clicks / 2,
            reach,
            impressions,
        }
    }

    fn scored(content: &str, score: u64) -> PostRecord {
        PostRecord {
            content: content.to_string(),
            impressions: score,
            ..post(1, 9, 0, 0, 0)
        }
    }

    #[test]
    fn top_posts_is_stable_and_descending() {
        let posts = vec![
            scored("a", 50),
            scored("b", 80),
            scored("c", 80),
            scored("d", 30),
        ];
        let ranked: Vec<String> = top_posts(&posts, 10)
            .into_iter()
            .map(|p| p.content)
            .collect();
        assert_eq!(ranked, vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn top_posts_truncates_to_n() {
        let posts: Vec<PostRecord> = (0..15).map(|i| scored(&i.to_string(), i)).collect();
        let ranked = top_posts(&posts, 10);
        assert_eq!(ranked.len(), 10);
        assert_eq!(ranked[0].content, "14");
        assert_eq!(ranked[9].content, "5");
    }

    #[test]
    fn daily_summaries_group_by_date_chronologically() {
        let posts = vec![
            post(5, 18, 3, 10, 20),
            post(3, 9, 1, 100, 200),
            post(5, 8, 2, 30, 40),
        ];
        let daily = daily_summaries(&posts);
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].date, NaiveDate::from_ymd_opt(2025, 3, 3).unwrap());
        assert_eq!(daily[0].weekday, Weekday::Mon);
        assert_eq!(daily[1].post_count, 2);
        assert_eq!(daily[1].totals.clicks, 5);
        assert_eq!(daily[1].totals.reach, 40);
        assert_eq!(daily[1].totals.impressions, 60);
    }

    #[test]
    fn best_day_prefers_earliest_on_tie() {
        let posts = vec![post(2, 9, 0, 50, 50), post(4, 9, 0, 60, 40), post(6, 9, 0, 1, 1)];
        let daily = daily_summaries(&posts);
        let best = best_day(&daily).unwrap();
        assert_eq!(best.date, NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
    }

    #[test]
    fn best_day_of_nothing_is_none() {
        assert!(best_day(&[]).is_none());
    }

    #[test]
    fn build_report_empty_is_none() {
        let window = ReportWindow::trailing_days(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(), 10);
        assert!(build_report(window, &[], 10).is_none());
    }

    #[test]
    fn build_report_ten_posts_over_three_days() {
        let posts = vec![
            post(2, 9, 4, 100, 150),
            post(2, 12, 1, 80, 90),
            post(2, 15, 7, 60, 70),
            post(3, 8, 2, 300, 310),
            post(3, 11, 9, 20, 25),
            post(3, 19, 3, 500, 900),
            post(3, 21, 0, 10, 12),
            post(5, 10, 6, 200, 210),
            post(5, 13, 5, 150, 160),
            post(5, 20, 8, 40, 45),
        ];
        let window = ReportWindow::trailing_days(NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(), 10);
        let report = build_report(window, &posts, 10).unwrap();

        assert_eq!(report.totals.clicks, posts.iter().map(|p| p.clicks).sum::<u64>());
        assert_eq!(report.totals.reach, 1460);
        assert_eq!(report.totals.impressions, 1972);
        assert_eq!(report.totals.likes, 45);
        assert_eq!(report.totals.loves, 20);
        assert_eq!(report.totals.reactions, 90);

        assert_eq!(report.daily.len(), 3);
        assert_eq!(
            report.daily.iter().map(|d| d.post_count).sum::<usize>(),
            posts.len()
        );
        // 03-03: 830 reach + 1247 impressions beats 03-02 (550) and 03-05 (805)
        assert_eq!(report.best_day.date, NaiveDate::from_ymd_opt(2025, 3, 3).unwrap());
        assert_eq!(report.best_day.reach_score(), 2077);

        let top = &report.top_posts[0];
        let max = posts.iter().map(PostRecord::engagement_score).max().unwrap();
        assert_eq!(top.engagement_score(), max);
        assert_eq!(top.content, "post 3-19");

        assert_eq!(report.posts.len(), 10);
        assert!(report
            .posts
            .windows(2)
            .all(|w| w[0].created_time <= w[1].created_time));
    }
}
