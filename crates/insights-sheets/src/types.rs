//! Sheets v4 `values` payload types.

use serde::{Deserialize, Serialize};

/// Response body of `GET .../values/{range}`.
///
/// Google omits `values` entirely when the range is blank, and trims trailing
/// empty cells from each row.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub major_dimension: Option<String>,
    #[serde(default)]
    pub values: Vec<Vec<serde_json::Value>>,
}

/// Request body of `PUT .../values/{range}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ValueRangeUpdate<'a> {
    pub range: &'a str,
    pub major_dimension: &'static str,
    pub values: Vec<Vec<&'a str>>,
}

/// Response body of `PUT .../values/{range}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateValuesResponse {
    #[serde(default)]
    pub updated_range: Option<String>,
    #[serde(default)]
    pub updated_cells: u64,
}
