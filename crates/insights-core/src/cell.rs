use serde_json::Value;

/// One raw spreadsheet cell.
///
/// The Sheets API hands back a loose mix of JSON strings and numbers; every
/// cell is classified into one of these variants before any coercion happens.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl CellValue {
    /// Classify a JSON cell value as returned by the Sheets `values` endpoint.
    ///
    /// Blank strings and `null` become [`CellValue::Empty`]; booleans are kept
    /// as their text form.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => CellValue::Empty,
            Value::String(s) if s.trim().is_empty() => CellValue::Empty,
            Value::String(s) => CellValue::Text(s.clone()),
            Value::Number(n) => n.as_f64().map_or(CellValue::Empty, CellValue::Number),
            Value::Bool(b) => CellValue::Text(b.to_string()),
            other => CellValue::Text(other.to_string()),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Coerce numeric-looking text into [`CellValue::Number`].
    ///
    /// Thousands separators and surrounding whitespace are ignored, so
    /// `"1,234"` becomes `1234.0`. Non-numeric text is returned unchanged.
    #[must_use]
    pub fn coerce_numeric(self) -> Self {
        match self {
            CellValue::Text(text) => match parse_number(&text) {
                Some(n) => CellValue::Number(n),
                None => CellValue::Text(text),
            },
            other => other,
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

fn parse_number(text: &str) -> Option<f64> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}
