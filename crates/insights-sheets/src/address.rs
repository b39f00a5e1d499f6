//! Spreadsheet and A1-range addressing helpers.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::SheetsError;

static URL_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/spreadsheets/d/([A-Za-z0-9_-]+)").expect("valid spreadsheet url regex")
});

static BARE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid spreadsheet id regex"));

/// Resolve a spreadsheet reference to its document ID.
///
/// Accepts either the bare ID or a full
/// `https://docs.google.com/spreadsheets/d/<id>/edit...` URL.
///
/// # Errors
///
/// Returns [`SheetsError::InvalidSpreadsheet`] when neither form matches.
pub fn spreadsheet_id(reference: &str) -> Result<String, SheetsError> {
    let trimmed = reference.trim();
    if let Some(caps) = URL_ID_RE.captures(trimmed) {
        return Ok(caps[1].to_string());
    }
    if BARE_ID_RE.is_match(trimmed) {
        return Ok(trimmed.to_string());
    }
    Err(SheetsError::InvalidSpreadsheet(reference.to_string()))
}

/// Quote a tab name for use in an A1 range.
///
/// Tab names with spaces or punctuation must be wrapped in single quotes;
/// embedded quotes are doubled. Quoting is always applied since it is valid
/// for plain names too.
#[must_use]
pub fn quote_tab(tab: &str) -> String {
    format!("'{}'", tab.replace('\'', "''"))
}

/// Build an A1 range that addresses a single cell of a tab, e.g. `'Sheet1'!A1`.
#[must_use]
pub fn cell_range(tab: &str, cell: &str) -> String {
    format!("{}!{}", quote_tab(tab), cell.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spreadsheet_id_from_edit_url() {
        let id = spreadsheet_id(
            "https://docs.google.com/spreadsheets/d/1apkZJsJHEd1HfDoHBAx9cPM-BmJxjIRiagB_F5KehHo/edit",
        )
        .unwrap();
        assert_eq!(id, "1apkZJsJHEd1HfDoHBAx9cPM-BmJxjIRiagB_F5KehHo");
    }

    #[test]
    fn spreadsheet_id_from_url_without_suffix() {
        let id = spreadsheet_id("https://docs.google.com/spreadsheets/d/1PWMPIPELb_wOKZ0").unwrap();
        assert_eq!(id, "1PWMPIPELb_wOKZ0");
    }

    #[test]
    fn spreadsheet_id_accepts_bare_id() {
        assert_eq!(spreadsheet_id(" abc_DEF-123 ").unwrap(), "abc_DEF-123");
    }

    #[test]
    fn spreadsheet_id_rejects_garbage() {
        assert!(matches!(
            spreadsheet_id("https://example.com/not a sheet"),
            Err(SheetsError::InvalidSpreadsheet(_))
        ));
    }

    #[test]
    fn quote_tab_escapes_single_quotes() {
        assert_eq!(quote_tab("Facebook: Post Insights"), "'Facebook: Post Insights'");
        assert_eq!(quote_tab("Bob's tab"), "'Bob''s tab'");
    }

    #[test]
    fn cell_range_joins_tab_and_cell() {
        assert_eq!(cell_range("Sheet1", " A1 "), "'Sheet1'!A1");
    }
}
