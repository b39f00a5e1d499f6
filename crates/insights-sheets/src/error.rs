use thiserror::Error;

/// Errors returned by the Sheets client.
#[derive(Debug, Error)]
pub enum SheetsError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service-account key could not be read or parsed.
    #[error("failed to load service account credentials: {0}")]
    Credentials(#[source] std::io::Error),

    /// The OAuth token exchange failed.
    #[error("OAuth token error: {0}")]
    Auth(String),

    /// The spreadsheet or range does not exist, or is not shared with the
    /// service account.
    #[error("spreadsheet or range not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}: {body}")]
    UnexpectedStatus {
        status: u16,
        url: String,
        body: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid spreadsheet reference \"{0}\"")]
    InvalidSpreadsheet(String),

    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
