//! Normalization of raw sheet rows into [`PostRecord`]s.
//!
//! The sheet has a cosmetic banner row above the real header, loosely typed
//! cells, occasionally duplicated columns and links stored as `HYPERLINK`
//! formulas. Everything here is pure so it can be tested without a live sheet.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use insights_core::{CellValue, PostRecord};
use regex::Regex;

use crate::error::IngestError;

pub const CREATED_TIME: &str = "created_time";
const CONTENT: &str = "content";
const CLICKS: &[&str] = &["post_clicks", "clicks"];
const REACTIONS: &[&str] = &["total_reactions", "reactions"];
const LIKES: &[&str] = &["total_like_reactions", "like_reactions", "likes"];
const LOVES: &[&str] = &["total_love_reactions", "love_reactions", "loves"];
const REACH: &[&str] = &["total_reach", "reach"];
const IMPRESSIONS: &[&str] = &["total_impressions", "impressions"];
const LINK_COLUMNS: &[&str] = &["permanent_link", "link", "post_link", "url"];

static HYPERLINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)HYPERLINK\(\s*"([^"]+)""#).expect("valid hyperlink regex")
});

/// Result of normalizing one sheet.
#[derive(Debug, Clone, Default)]
pub struct IngestOutcome {
    pub posts: Vec<PostRecord>,
    /// Data rows with every cell blank.
    pub blank_rows: usize,
    /// Rows dropped because their timestamp did not parse.
    pub dropped_rows: usize,
}

/// A header-keyed table whose duplicate columns have already been merged.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    fn column(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == key)
    }

    fn first_column(&self, keys: &[&str]) -> Option<usize> {
        keys.iter().find_map(|k| self.column(k))
    }
}

/// Normalize a header cell to a stable snake-style key.
///
/// `"Post Clicks"` → `post_clicks`, `" Total Reach (Unique) "` → `total_reach_unique`.
#[must_use]
pub fn normalize_header(raw: &str) -> String {
    let mut key = String::with_capacity(raw.len());
    let mut pending_sep = false;
    for c in raw.trim().chars() {
        if c.is_alphanumeric() {
            if pending_sep && !key.is_empty() {
                key.push('_');
            }
            pending_sep = false;
            key.extend(c.to_lowercase());
        } else {
            pending_sep = true;
        }
    }
    key
}

/// Extract the target URL from a `HYPERLINK("<url>", ...)` formula.
///
/// Returns `None` when the text holds no such formula.
#[must_use]
pub fn extract_url(formula_text: &str) -> Option<String> {
    HYPERLINK_RE
        .captures(formula_text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|url| !url.is_empty())
}

/// Parse a post timestamp cell.
///
/// Text accepts RFC 3339, `%z` offsets (`2025-01-05T10:00:00+0000`),
/// `YYYY-MM-DD[ HH:MM[:SS]]` and `MM/DD/YYYY[ HH:MM[:SS]]`. Offset-bearing
/// values keep their own wall-clock time. Numbers are spreadsheet serial
/// dates. Anything else is `None`.
#[must_use]
pub fn parse_timestamp(cell: &CellValue) -> Option<NaiveDateTime> {
    match cell {
        CellValue::Text(text) => parse_timestamp_text(text.trim()),
        CellValue::Number(serial) => from_serial_date(*serial),
        CellValue::Empty => None,
    }
}

fn parse_timestamp_text(text: &str) -> Option<NaiveDateTime> {
    const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%d %H:%M:%S%z"];
    const NAIVE_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M",
    ];
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|f| DateTime::parse_from_str(text, f).ok())
    {
        return Some(dt.naive_local());
    }
    if let Some(dt) = NAIVE_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(text, f).ok())
    {
        return Some(dt);
    }
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(text, f).ok())
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Spreadsheet serial date: days since 1899-12-30, fraction = time of day.
fn from_serial_date(serial: f64) -> Option<NaiveDateTime> {
    // 2958465 is 9999-12-31.
    if !serial.is_finite() || serial <= 0.0 || serial > 2_958_465.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_time(NaiveTime::MIN);
    #[allow(clippy::cast_possible_truncation)]
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(Duration::milliseconds(millis))
}

/// Merge the cells of columns sharing one normalized key.
///
/// Numeric values are averaged and rounded up (`[4, 5]` → `5`). With no
/// numeric value the first non-empty text wins.
pub(crate) fn merge_cells(cells: &[CellValue]) -> CellValue {
    let numbers: Vec<f64> = cells.iter().filter_map(CellValue::as_number).collect();
    if !numbers.is_empty() {
        #[allow(clippy::cast_precision_loss)]
        let mean = numbers.iter().sum::<f64>() / numbers.len() as f64;
        return CellValue::Number(mean.ceil());
    }
    cells
        .iter()
        .find(|c| !c.is_empty())
        .cloned()
        .unwrap_or(CellValue::Empty)
}

/// Drop the banner rows, key the columns, remove blank rows, coerce numeric
/// text and merge duplicate columns.
///
/// # Errors
///
/// Returns [`IngestError::MissingHeader`] if the sheet has fewer rows than
/// `header_row`.
pub(crate) fn build_table(
    raw: Vec<Vec<CellValue>>,
    header_row: usize,
) -> Result<(Table, usize), IngestError> {
    let header_idx = header_row.max(1) - 1;
    if raw.len() <= header_idx {
        return Err(IngestError::MissingHeader {
            header_row,
            rows: raw.len(),
        });
    }

    let mut rows = raw.into_iter().skip(header_idx);
    let header = rows.next().unwrap_or_default();

    // key -> source column indices, in first-occurrence order
    let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
    for (idx, cell) in header.iter().enumerate() {
        let key = match cell {
            CellValue::Text(t) => normalize_header(t),
            CellValue::Number(n) => normalize_header(&n.to_string()),
            CellValue::Empty => String::new(),
        };
        if key.is_empty() {
            continue;
        }
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, indices)) => indices.push(idx),
            None => groups.push((key, vec![idx])),
        }
    }

    for (key, indices) in groups.iter().filter(|(_, i)| i.len() > 1) {
        tracing::debug!(column = %key, copies = indices.len(), "merging duplicate columns");
    }

    let mut blank_rows = 0usize;
    let mut table_rows = Vec::new();
    for row in rows {
        if row.iter().all(CellValue::is_empty) {
            blank_rows += 1;
            continue;
        }
        let row: Vec<CellValue> = row.into_iter().map(CellValue::coerce_numeric).collect();
        let merged = groups
            .iter()
            .map(|(_, indices)| {
                let cells: Vec<CellValue> = indices
                    .iter()
                    .map(|&i| row.get(i).cloned().unwrap_or(CellValue::Empty))
                    .collect();
                if cells.len() == 1 {
                    cells.into_iter().next().unwrap_or(CellValue::Empty)
                } else {
                    merge_cells(&cells)
                }
            })
            .collect();
        table_rows.push(merged);
    }

    let table = Table {
        columns: groups.into_iter().map(|(k, _)| k).collect(),
        rows: table_rows,
    };
    Ok((table, blank_rows))
}

/// Normalize a whole sheet (as returned by the Sheets API) into posts.
///
/// `header_row` is 1-based; rows above it are ignored. Rows whose
/// timestamp fails to parse are dropped and counted.
///
/// # Errors
///
/// - [`IngestError::MissingHeader`] if the sheet is shorter than `header_row`.
/// - [`IngestError::MissingColumn`] if there is no `created_time` column.
pub fn ingest_rows(
    raw: Vec<Vec<CellValue>>,
    header_row: usize,
) -> Result<IngestOutcome, IngestError> {
    let (table, blank_rows) = build_table(raw, header_row)?;

    let created_idx = table
        .column(CREATED_TIME)
        .ok_or_else(|| IngestError::MissingColumn(CREATED_TIME.to_string()))?;
    let content_idx = table.column(CONTENT);
    let clicks_idx = table.first_column(CLICKS);
    let reactions_idx = table.first_column(REACTIONS);
    let likes_idx = table.first_column(LIKES);
    let loves_idx = table.first_column(LOVES);
    let reach_idx = table.first_column(REACH);
    let impressions_idx = table.first_column(IMPRESSIONS);
    let link_indices: Vec<usize> = LINK_COLUMNS
        .iter()
        .filter_map(|k| table.column(k))
        .collect();

    let mut posts = Vec::with_capacity(table.rows.len());
    let mut dropped_rows = 0usize;

    for (offset, row) in table.rows.iter().enumerate() {
        let Some(created_time) = parse_timestamp(&row[created_idx]) else {
            tracing::warn!(
                data_row = offset + 1,
                value = ?row[created_idx],
                "skipping row, created_time did not parse"
            );
            dropped_rows += 1;
            continue;
        };

        posts.push(PostRecord {
            created_time,
            content: content_idx.map(|i| cell_text(&row[i])).unwrap_or_default(),
            link: derive_link(row, &link_indices),
            clicks: counter(row, clicks_idx),
            reactions: counter(row, reactions_idx),
            likes: counter(row, likes_idx),
            loves: counter(row, loves_idx),
            reach: counter(row, reach_idx),
            impressions: counter(row, impressions_idx),
        });
    }

    tracing::info!(
        posts = posts.len(),
        blank_rows,
        dropped_rows,
        "normalized sheet rows"
    );

    Ok(IngestOutcome {
        posts,
        blank_rows,
        dropped_rows,
    })
}

/// First link found across the link columns, either a direct URL or a
/// `HYPERLINK` formula target.
fn derive_link(row: &[CellValue], link_indices: &[usize]) -> Option<String> {
    link_indices.iter().find_map(|&i| {
        let text = row[i].as_text()?.trim();
        extract_url(text).or_else(|| {
            let lower = text.to_ascii_lowercase();
            (lower.starts_with("https://") || lower.starts_with("http://"))
                .then(|| text.to_string())
        })
    })
}

fn counter(row: &[CellValue], idx: Option<usize>) -> u64 {
    match idx.map(|i| &row[i]) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Some(CellValue::Number(n)) if n.is_finite() && *n > 0.0 => n.round() as u64,
        _ => 0,
    }
}

fn cell_text(cell: &CellValue) -> String {
    match cell {
        CellValue::Text(t) => t.trim().to_string(),
        CellValue::Number(n) => n.to_string(),
        CellValue::Empty => String::new(),
    }
}

#[cfg(test)]
#[path = "ingest_test.rs"]
mod tests;
