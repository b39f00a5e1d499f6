use std::path::PathBuf;

/// Where the Google service-account key comes from.
#[derive(Clone, PartialEq, Eq)]
pub enum GoogleCredentials {
    /// The full service-account JSON document, e.g. injected as a secret.
    Inline(String),
    /// A path to the service-account JSON file on disk.
    Path(PathBuf),
}

impl std::fmt::Debug for GoogleCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GoogleCredentials::Inline(_) => f.write_str("Inline([redacted])"),
            GoogleCredentials::Path(path) => f.debug_tuple("Path").field(path).finish(),
        }
    }
}

/// Backend holding the last-sent notification timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThrottleBackend {
    /// A single cell of a second spreadsheet.
    Sheet {
        spreadsheet: String,
        tab: String,
        cell: String,
    },
    /// A local text file, for single-host deployments.
    File(PathBuf),
}

#[derive(Clone)]
pub struct AppConfig {
    /// Spreadsheet ID or full `docs.google.com` URL of the post insights sheet.
    pub spreadsheet: String,
    pub tab: String,
    /// 1-based row holding the real column names; rows above it are cosmetic.
    pub header_row: usize,
    pub window_days: u32,
    pub top_n: usize,
    pub google_credentials: GoogleCredentials,
    pub sheets_base_url: String,
    pub request_timeout_secs: u64,
    pub throttle: Option<ThrottleBackend>,
    pub notify_interval_days: u32,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub recipients: Vec<String>,
    pub dashboard_url: String,
    pub email_subject: String,
    pub log_level: String,
    pub report_path: PathBuf,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("spreadsheet", &self.spreadsheet)
            .field("tab", &self.tab)
            .field("header_row", &self.header_row)
            .field("window_days", &self.window_days)
            .field("top_n", &self.top_n)
            .field("google_credentials", &self.google_credentials)
            .field("sheets_base_url", &self.sheets_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("throttle", &self.throttle)
            .field("notify_interval_days", &self.notify_interval_days)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field(
                "smtp_password",
                &self.smtp_password.as_ref().map(|_| "[redacted]"),
            )
            .field("recipients", &self.recipients)
            .field("dashboard_url", &self.dashboard_url)
            .field("email_subject", &self.email_subject)
            .field("log_level", &self.log_level)
            .field("report_path", &self.report_path)
            .finish()
    }
}
