//! Throttled delivery of the dashboard-link email.
//!
//! [`Throttle`] decides from the persisted last-sent timestamp whether a send
//! is due; [`TimestampStore`] abstracts where that timestamp lives (a local
//! file or one spreadsheet cell); [`Notifier`] delivers the email.

pub mod dispatch;
pub mod error;
pub mod mailer;
pub mod store;
pub mod throttle;

pub use dispatch::{notify_if_due, NotifyOutcome};
pub use error::{NotifyError, StoreError};
pub use mailer::{Notification, Notifier, SmtpNotifier};
pub use store::{FileTimestampStore, SheetTimestampStore, TimestampStore};
pub use throttle::{Throttle, ThrottleDecision};
