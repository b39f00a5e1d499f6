//! Report command handlers for the CLI.
//!
//! Reads the insights tab, normalizes it, selects the trailing window and
//! writes the HTML dashboard plus a markdown summary on stdout. An empty
//! window is a normal outcome: a warning is printed and no report is written.

use std::path::Path;

use chrono::{Local, NaiveDate};
use insights_core::{AppConfig, CellValue};
use insights_report::{build_report, ingest_rows, render_html, render_markdown, ReportData, ReportWindow};
use insights_sheets::{spreadsheet_id, SheetsAuth, SheetsClient};

/// Build the Sheets client from the configured service-account key.
///
/// # Errors
///
/// Returns an error if the key cannot be loaded or the HTTP client cannot be
/// constructed.
pub(crate) async fn build_sheets_client(config: &AppConfig) -> anyhow::Result<SheetsClient> {
    let auth = SheetsAuth::service_account(&config.google_credentials)
        .await
        .map_err(|e| anyhow::anyhow!("failed to load Google credentials: {e}"))?;
    SheetsClient::with_base_url(auth, config.request_timeout_secs, &config.sheets_base_url)
        .map_err(|e| anyhow::anyhow!("failed to build Sheets client: {e}"))
}

/// Normalize raw tab rows and aggregate the window ending on `today`.
///
/// Returns `Ok(None)` when no post falls inside the window.
///
/// # Errors
///
/// Returns an error if the header row or the `created_time` column is
/// missing.
pub(crate) fn prepare_report(
    raw: Vec<Vec<CellValue>>,
    config: &AppConfig,
    today: NaiveDate,
) -> anyhow::Result<Option<ReportData>> {
    let outcome = ingest_rows(raw, config.header_row)
        .map_err(|e| anyhow::anyhow!("failed to process sheet '{}': {e}", config.tab))?;

    if outcome.dropped_rows > 0 {
        eprintln!(
            "warning: {} row(s) skipped because Created Time did not parse",
            outcome.dropped_rows
        );
    }

    let window = ReportWindow::trailing_days(today, config.window_days);
    let posts = window.filter(&outcome.posts);
    tracing::info!(
        window = %window.label(),
        posts = posts.len(),
        total = outcome.posts.len(),
        "selected reporting window"
    );

    Ok(build_report(window, &posts, config.top_n))
}

/// Fetch, aggregate and write the report.
///
/// Returns `true` when a report was written and `false` when the window was
/// empty.
///
/// # Errors
///
/// Returns an error if the spreadsheet or tab cannot be read, the sheet is
/// malformed, or the HTML file cannot be written.
pub(crate) async fn run_report(
    sheets: &SheetsClient,
    config: &AppConfig,
    out: Option<&Path>,
) -> anyhow::Result<bool> {
    let id = spreadsheet_id(&config.spreadsheet)?;
    let raw = sheets
        .read_tab(&id, &config.tab)
        .await
        .map_err(|e| anyhow::anyhow!("failed to open sheet tab '{}': {e}", config.tab))?;

    let today = Local::now().date_naive();
    let Some(report) = prepare_report(raw, config, today)? else {
        let window = ReportWindow::trailing_days(today, config.window_days);
        tracing::warn!(window = %window.label(), "no posts in window; nothing to report");
        eprintln!("warning: no data available for {}", window.label());
        return Ok(false);
    };

    let path = out.unwrap_or(&config.report_path);
    tokio::fs::write(path, render_html(&report))
        .await
        .map_err(|e| anyhow::anyhow!("failed to write report to {}: {e}", path.display()))?;

    print!("{}", render_markdown(&report));
    println!();
    println!("**HTML report**: {}", path.display());
    Ok(true)
}
