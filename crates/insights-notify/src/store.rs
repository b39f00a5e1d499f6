//! Persistence of the last-sent notification timestamp.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use insights_core::CellValue;
use insights_sheets::SheetsClient;

use crate::error::StoreError;

/// Where the last-sent timestamp lives between runs.
#[async_trait]
pub trait TimestampStore: Send + Sync {
    /// The stored timestamp, or `None` when nothing has been sent yet.
    async fn read(&self) -> Result<Option<DateTime<Utc>>, StoreError>;

    async fn write(&self, at: DateTime<Utc>) -> Result<(), StoreError>;
}

/// Parse a stored value. RFC 3339 is what [`format_timestamp`] writes; naive
/// ISO-8601 values (as older writers produced) are host-local wall-clock time.
///
/// # Errors
///
/// Returns [`StoreError::Parse`] for anything else.
pub fn parse_timestamp(raw: &str) -> Result<Option<DateTime<Utc>>, StoreError> {
    const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    let text = raw.trim();
    if text.is_empty() {
        return Ok(None);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(text, f).ok())
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
        .map(|local| Some(local.with_timezone(&Utc)))
        .ok_or_else(|| StoreError::Parse(text.to_string()))
}

#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Single-host store: one file holding one RFC 3339 line.
#[derive(Debug, Clone)]
pub struct FileTimestampStore {
    path: PathBuf,
}

impl FileTimestampStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Sibling written first and renamed over the target.
    fn staging_path(&self) -> PathBuf {
        let mut name = std::ffi::OsString::from(".");
        name.push(self.path.file_name().unwrap_or_default());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl TimestampStore for FileTimestampStore {
    async fn read(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => parse_timestamp(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    async fn write(&self, at: DateTime<Utc>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }
        // same-directory rename replaces the target atomically
        let staging = self.staging_path();
        tokio::fs::write(&staging, format!("{}\n", format_timestamp(at)))
            .await
            .map_err(|e| self.io_error(e))?;
        if let Err(e) = tokio::fs::rename(&staging, &self.path).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(self.io_error(e));
        }
        Ok(())
    }
}

/// Store backed by one cell of a spreadsheet, `Sheet1!A1` by default.
#[derive(Debug)]
pub struct SheetTimestampStore<'a> {
    client: &'a SheetsClient,
    spreadsheet_id: String,
    tab: String,
    cell: String,
}

impl<'a> SheetTimestampStore<'a> {
    pub fn new(
        client: &'a SheetsClient,
        spreadsheet_id: impl Into<String>,
        tab: impl Into<String>,
        cell: impl Into<String>,
    ) -> Self {
        Self {
            client,
            spreadsheet_id: spreadsheet_id.into(),
            tab: tab.into(),
            cell: cell.into(),
        }
    }
}

#[async_trait]
impl TimestampStore for SheetTimestampStore<'_> {
    async fn read(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        let cell = self
            .client
            .read_cell(&self.spreadsheet_id, &self.tab, &self.cell)
            .await?;
        match cell {
            CellValue::Empty => Ok(None),
            CellValue::Text(text) => parse_timestamp(&text),
            CellValue::Number(n) => Err(StoreError::Parse(n.to_string())),
        }
    }

    async fn write(&self, at: DateTime<Utc>) -> Result<(), StoreError> {
        self.client
            .write_cell(
                &self.spreadsheet_id,
                &self.tab,
                &self.cell,
                &format_timestamp(at),
            )
            .await?;
        Ok(())
    }
}

/// In-memory store for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    pub value: std::sync::Mutex<Option<DateTime<Utc>>>,
    pub writes: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MemoryStore {
    pub fn with(value: Option<DateTime<Utc>>) -> Self {
        Self {
            value: std::sync::Mutex::new(value),
            writes: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn get(&self) -> Option<DateTime<Utc>> {
        *self.value.lock().unwrap()
    }
}

#[cfg(test)]
#[async_trait]
impl TimestampStore for MemoryStore {
    async fn read(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(self.get())
    }

    async fn write(&self, at: DateTime<Utc>) -> Result<(), StoreError> {
        *self.value.lock().unwrap() = Some(at);
        self.writes
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(())
    }
}
