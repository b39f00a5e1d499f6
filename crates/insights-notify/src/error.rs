use std::path::PathBuf;

use thiserror::Error;

/// Failures reading or writing the persisted last-sent timestamp.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("timestamp file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("timestamp sheet: {0}")]
    Sheets(#[from] insights_sheets::SheetsError),

    #[error("stored last-sent value \"{0}\" is not a timestamp")]
    Parse(String),
}

/// Failures building or delivering the notification email.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("no sender address configured (set SMTP_USERNAME)")]
    MissingSender,

    #[error("SMTP credentials incomplete (set SMTP_USERNAME and SMTP_PASSWORD)")]
    MissingCredentials,

    #[error("no recipients configured (set INSIGHTS_RECIPIENTS)")]
    NoRecipients,

    #[error("invalid email address \"{address}\": {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("failed to build email: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}
