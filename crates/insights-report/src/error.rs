use thiserror::Error;

/// Sheet-level ingestion failures. Row-level problems never surface here;
/// those rows are dropped and counted instead.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("sheet has {rows} rows but the header is expected on row {header_row}")]
    MissingHeader { header_row: usize, rows: usize },

    #[error("required column \"{0}\" not found in sheet header")]
    MissingColumn(String),
}
