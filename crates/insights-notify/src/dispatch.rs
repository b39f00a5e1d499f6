use chrono::{DateTime, Utc};

use crate::error::{NotifyError, StoreError};
use crate::mailer::{Notification, Notifier};
use crate::store::TimestampStore;
use crate::throttle::{Throttle, ThrottleDecision};

/// What happened in the notification stage of a run.
#[derive(Debug)]
pub enum NotifyOutcome {
    Cooldown {
        elapsed_days: i64,
        remaining_days: i64,
    },
    Sent,
    /// The send time was already recorded when delivery failed; it is not
    /// rolled back.
    SendFailed(NotifyError),
}

/// Run the throttle and, when due, record `now` and then send.
///
/// Delivery failures are logged and returned as
/// [`NotifyOutcome::SendFailed`] rather than as an error.
///
/// # Errors
///
/// Returns [`StoreError`] if the last-sent timestamp cannot be read or
/// written; nothing is sent in that case.
pub async fn notify_if_due<S, N>(
    store: &S,
    notifier: &N,
    throttle: Throttle,
    notification: &Notification,
    now: DateTime<Utc>,
) -> Result<NotifyOutcome, StoreError>
where
    S: TimestampStore + ?Sized,
    N: Notifier + ?Sized,
{
    if let ThrottleDecision::Cooldown {
        elapsed_days,
        remaining_days,
        ..
    } = throttle.acquire(store, now).await?
    {
        return Ok(NotifyOutcome::Cooldown {
            elapsed_days,
            remaining_days,
        });
    }

    match notifier.send(notification).await {
        Ok(()) => Ok(NotifyOutcome::Sent),
        Err(e) => {
            tracing::error!(error = %e, "failed to send notification email");
            Ok(NotifyOutcome::SendFailed(e))
        }
    }
}
