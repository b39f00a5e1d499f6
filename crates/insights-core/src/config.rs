use std::path::PathBuf;

use crate::app_config::{AppConfig, GoogleCredentials, ThrottleBackend};
use crate::ConfigError;

const DEFAULT_TAB: &str = "Facebook: Post Insights";
const DEFAULT_SUBJECT: &str = "\u{1f4ca} Facebook Dashboard Link";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it from a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u16 = |var: &str, default: &str| -> Result<u16, ConfigError> {
        or_default(var, default)
            .parse::<u16>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let spreadsheet = require("INSIGHTS_SPREADSHEET")?;
    let tab = or_default("INSIGHTS_TAB", DEFAULT_TAB);

    let header_row = parse_usize("INSIGHTS_HEADER_ROW", "2")?;
    if header_row == 0 {
        return Err(invalid("INSIGHTS_HEADER_ROW", "rows are 1-based".to_string()));
    }

    let window_days = parse_u32("INSIGHTS_WINDOW_DAYS", "10")?;
    if window_days == 0 {
        return Err(invalid("INSIGHTS_WINDOW_DAYS", "must be at least 1".to_string()));
    }

    let top_n = parse_usize("INSIGHTS_TOP_N", "10")?;
    if top_n == 0 {
        return Err(invalid("INSIGHTS_TOP_N", "must be at least 1".to_string()));
    }

    let google_credentials = match (
        optional("GOOGLE_CREDENTIALS"),
        optional("GOOGLE_CREDENTIALS_PATH"),
    ) {
        (Some(json), _) => GoogleCredentials::Inline(json),
        (None, Some(path)) => GoogleCredentials::Path(PathBuf::from(path)),
        (None, None) => return Err(ConfigError::MissingEnvVar("GOOGLE_CREDENTIALS".to_string())),
    };

    let sheets_base_url = or_default("INSIGHTS_SHEETS_BASE_URL", "https://sheets.googleapis.com/");
    let request_timeout_secs = parse_u64("INSIGHTS_REQUEST_TIMEOUT_SECS", "30")?;

    let throttle = match (
        optional("INSIGHTS_THROTTLE_SPREADSHEET"),
        optional("INSIGHTS_THROTTLE_FILE"),
    ) {
        (Some(_), Some(_)) => {
            return Err(invalid(
                "INSIGHTS_THROTTLE_FILE",
                "cannot be combined with INSIGHTS_THROTTLE_SPREADSHEET".to_string(),
            ))
        }
        (Some(spreadsheet), None) => Some(ThrottleBackend::Sheet {
            spreadsheet,
            tab: or_default("INSIGHTS_THROTTLE_TAB", "Sheet1"),
            cell: or_default("INSIGHTS_THROTTLE_CELL", "A1"),
        }),
        (None, Some(path)) => Some(ThrottleBackend::File(PathBuf::from(path))),
        (None, None) => None,
    };

    let notify_interval_days = parse_u32("INSIGHTS_NOTIFY_INTERVAL_DAYS", "4")?;

    let smtp_host = or_default("SMTP_HOST", "smtp.gmail.com");
    let smtp_port = parse_u16("SMTP_PORT", "465")?;
    let smtp_username = optional("SMTP_USERNAME");
    let smtp_password = optional("SMTP_PASSWORD");
    let recipients = parse_recipients(&or_default("INSIGHTS_RECIPIENTS", ""));
    let dashboard_url = or_default("INSIGHTS_DASHBOARD_URL", "");
    let email_subject = or_default("INSIGHTS_EMAIL_SUBJECT", DEFAULT_SUBJECT);

    let log_level = or_default("INSIGHTS_LOG_LEVEL", "info");
    let report_path = PathBuf::from(or_default("INSIGHTS_REPORT_PATH", "insights-report.html"));

    Ok(AppConfig {
        spreadsheet,
        tab,
        header_row,
        window_days,
        top_n,
        google_credentials,
        sheets_base_url,
        request_timeout_secs,
        throttle,
        notify_interval_days,
        smtp_host,
        smtp_port,
        smtp_username,
        smtp_password,
        recipients,
        dashboard_url,
        email_subject,
        log_level,
        report_path,
    })
}

/// Split a comma-separated recipient list, dropping blanks.
fn parse_recipients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
