//! Notification command handlers for the CLI.

use chrono::{DateTime, Utc};
use insights_core::{AppConfig, ThrottleBackend};
use insights_notify::{
    notify_if_due, FileTimestampStore, Notification, NotifyOutcome, SheetTimestampStore,
    SmtpNotifier, Throttle, ThrottleDecision, TimestampStore,
};
use insights_sheets::{spreadsheet_id, SheetsClient};

use crate::report::build_sheets_client;

/// Sheets client for the throttle store, built only for the sheet backend.
///
/// # Errors
///
/// Returns an error if the sheet backend is configured and the client
/// cannot be built.
pub(crate) async fn store_sheets_client(config: &AppConfig) -> anyhow::Result<Option<SheetsClient>> {
    match config.throttle {
        Some(ThrottleBackend::Sheet { .. }) => Ok(Some(build_sheets_client(config).await?)),
        _ => Ok(None),
    }
}

/// Open the configured last-sent timestamp store.
///
/// # Errors
///
/// Returns an error if no store is configured, the throttle spreadsheet
/// reference is invalid, or the sheet backend has no client.
pub(crate) fn build_store<'a>(
    sheets: Option<&'a SheetsClient>,
    config: &AppConfig,
) -> anyhow::Result<Box<dyn TimestampStore + 'a>> {
    match &config.throttle {
        Some(ThrottleBackend::Sheet {
            spreadsheet,
            tab,
            cell,
        }) => {
            let sheets = sheets
                .ok_or_else(|| anyhow::anyhow!("sheet throttle store needs a Sheets client"))?;
            let id = spreadsheet_id(spreadsheet)?;
            Ok(Box::new(SheetTimestampStore::new(sheets, id, tab, cell)))
        }
        Some(ThrottleBackend::File(path)) => Ok(Box::new(FileTimestampStore::new(path))),
        None => Err(anyhow::anyhow!(
            "no throttle store configured; set INSIGHTS_THROTTLE_SPREADSHEET or INSIGHTS_THROTTLE_FILE"
        )),
    }
}

/// Human-readable line for a throttle decision.
pub(crate) fn describe_decision(decision: &ThrottleDecision, interval_days: u32) -> String {
    match decision {
        ThrottleDecision::Eligible { last_sent: None } => {
            "no email has been sent yet; an email is due".to_string()
        }
        ThrottleDecision::Eligible {
            last_sent: Some(at),
        } => format!(
            "last email sent {}; the {interval_days}-day interval has passed, an email is due",
            fmt_timestamp(*at)
        ),
        ThrottleDecision::Cooldown {
            last_sent,
            elapsed_days,
            remaining_days,
        } => format!(
            "last email sent {} ({elapsed_days} day(s) ago); next email in {remaining_days} more day(s)",
            fmt_timestamp(*last_sent)
        ),
    }
}

fn fmt_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Send the dashboard email if the throttle allows it.
///
/// With `dry_run` the decision is printed and nothing is written or sent.
///
/// # Errors
///
/// Returns an error if the store is misconfigured or unreachable, the email
/// settings are incomplete, or delivery fails. A failed delivery keeps the
/// recorded send time.
pub(crate) async fn run_notify(
    sheets: Option<&SheetsClient>,
    config: &AppConfig,
    dry_run: bool,
) -> anyhow::Result<()> {
    let store = build_store(sheets, config)?;
    let throttle = Throttle::new(config.notify_interval_days);
    let now = Utc::now();

    if dry_run {
        let decision = throttle
            .evaluate(store.as_ref(), now)
            .await
            .map_err(|e| anyhow::anyhow!("failed to read throttle store: {e}"))?;
        println!(
            "dry-run: {}",
            describe_decision(&decision, config.notify_interval_days)
        );
        if decision.is_eligible() {
            println!(
                "dry-run: would email {} recipient(s): [{}]",
                config.recipients.len(),
                config.recipients.join(", ")
            );
        }
        return Ok(());
    }

    // Validate email settings before the throttle records a send.
    let notification = Notification::from_config(config)?;
    let notifier = SmtpNotifier::from_config(config)?;

    let outcome = notify_if_due(store.as_ref(), &notifier, throttle, &notification, now)
        .await
        .map_err(|e| anyhow::anyhow!("throttle store unavailable, no email sent: {e}"))?;

    match outcome {
        NotifyOutcome::Cooldown {
            elapsed_days,
            remaining_days,
        } => {
            println!(
                "no email sent: last email was sent {elapsed_days} day(s) ago; \
                 next email in {remaining_days} more day(s)"
            );
            Ok(())
        }
        NotifyOutcome::Sent => {
            println!(
                "email sent to {} recipient(s): [{}]",
                notification.to.len(),
                notification.to.join(", ")
            );
            Ok(())
        }
        NotifyOutcome::SendFailed(e) => Err(anyhow::anyhow!("failed to send email: {e}")),
    }
}

/// Print the current throttle decision without writing anything.
///
/// # Errors
///
/// Returns an error if the store is misconfigured or unreachable.
pub(crate) async fn run_throttle_status(
    sheets: Option<&SheetsClient>,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let store = build_store(sheets, config)?;
    let decision = Throttle::new(config.notify_interval_days)
        .evaluate(store.as_ref(), Utc::now())
        .await
        .map_err(|e| anyhow::anyhow!("failed to read throttle store: {e}"))?;
    println!(
        "{}",
        describe_decision(&decision, config.notify_interval_days)
    );
    Ok(())
}
