//! Thin Google Sheets v4 client used to read post insights and to persist
//! single-cell values such as the notification throttle timestamp.

pub mod address;
pub mod auth;
pub mod client;
pub mod error;
pub mod types;

mod values;

pub use address::{quote_tab, spreadsheet_id};
pub use auth::SheetsAuth;
pub use client::SheetsClient;
pub use error::SheetsError;
pub use types::{UpdateValuesResponse, ValueRange};
