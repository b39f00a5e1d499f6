//! Cooldown between notification sends.

use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::store::TimestampStore;

const SECONDS_PER_DAY: i64 = 86_400;

/// Outcome of comparing the last-sent timestamp against the interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    /// A send is allowed. `last_sent` is `None` on the first run.
    Eligible { last_sent: Option<DateTime<Utc>> },
    /// Too soon since the last send.
    Cooldown {
        last_sent: DateTime<Utc>,
        elapsed_days: i64,
        remaining_days: i64,
    },
}

impl ThrottleDecision {
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        matches!(self, ThrottleDecision::Eligible { .. })
    }
}

/// Minimum whole days between two sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttle {
    pub interval_days: u32,
}

impl Throttle {
    #[must_use]
    pub fn new(interval_days: u32) -> Self {
        Self { interval_days }
    }

    /// Pure decision for a known last-sent value.
    ///
    /// Elapsed days are floored, so 3 days 23 hours counts as 3.
    #[must_use]
    pub fn decide(&self, last_sent: Option<DateTime<Utc>>, now: DateTime<Utc>) -> ThrottleDecision {
        let Some(last) = last_sent else {
            return ThrottleDecision::Eligible { last_sent: None };
        };
        let elapsed_days = (now - last).num_seconds().div_euclid(SECONDS_PER_DAY);
        let interval = i64::from(self.interval_days);
        if elapsed_days >= interval {
            ThrottleDecision::Eligible {
                last_sent: Some(last),
            }
        } else {
            ThrottleDecision::Cooldown {
                last_sent: last,
                elapsed_days,
                remaining_days: interval - elapsed_days,
            }
        }
    }

    /// Read the store and decide, without writing anything.
    ///
    /// # Errors
    ///
    /// Propagates store read failures.
    pub async fn evaluate<S>(&self, store: &S, now: DateTime<Utc>) -> Result<ThrottleDecision, StoreError>
    where
        S: TimestampStore + ?Sized,
    {
        let last_sent = store.read().await?;
        Ok(self.decide(last_sent, now))
    }

    /// Decide and, when eligible, record `now` as the last-sent time.
    ///
    /// The returned decision is [`ThrottleDecision::Eligible`] only after the
    /// write succeeded.
    ///
    /// # Errors
    ///
    /// Propagates store read and write failures.
    pub async fn acquire<S>(&self, store: &S, now: DateTime<Utc>) -> Result<ThrottleDecision, StoreError>
    where
        S: TimestampStore + ?Sized,
    {
        let decision = self.evaluate(store, now).await?;
        match decision {
            ThrottleDecision::Eligible { last_sent } => {
                store.write(now).await?;
                tracing::info!(
                    last_sent = ?last_sent,
                    now = %now,
                    "notification due; recorded send time"
                );
            }
            ThrottleDecision::Cooldown {
                elapsed_days,
                remaining_days,
                ..
            } => {
                tracing::info!(
                    elapsed_days,
                    remaining_days,
                    "notification in cooldown, skipping send"
                );
            }
        }
        Ok(decision)
    }

    /// `true` when a send is due and `now` has been recorded. The caller
    /// sends after this returns, so a failed send still consumes the
    /// interval.
    ///
    /// # Errors
    ///
    /// Propagates store read and write failures.
    pub async fn should_send<S>(&self, store: &S, now: DateTime<Utc>) -> Result<bool, StoreError>
    where
        S: TimestampStore + ?Sized,
    {
        Ok(self.acquire(store, now).await?.is_eligible())
    }
}
