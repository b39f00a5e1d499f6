//! Shared domain types and configuration for the post insights reporter.

pub mod app_config;
pub mod cell;
pub mod config;
pub mod post;

use thiserror::Error;

pub use app_config::{AppConfig, GoogleCredentials, ThrottleBackend};
pub use cell::CellValue;
pub use config::{load_app_config, load_app_config_from_env};
pub use post::PostRecord;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
