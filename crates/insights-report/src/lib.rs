//! Turns raw post-insights rows into a windowed report.
//!
//! [`ingest`] normalizes spreadsheet rows into [`insights_core::PostRecord`]s,
//! [`window`] selects the trailing reporting window, [`aggregate`] computes
//! totals, daily summaries and rankings, and [`render`] produces the HTML
//! dashboard and a markdown summary.

pub mod aggregate;
pub mod error;
pub mod ingest;
pub mod render;
pub mod window;

pub use aggregate::{
    best_day, build_report, daily_summaries, top_posts, DailySummary, MetricTotals, ReportData,
};
pub use error::IngestError;
pub use ingest::{extract_url, ingest_rows, normalize_header, parse_timestamp, IngestOutcome};
pub use render::{render_html, render_markdown};
pub use window::ReportWindow;
