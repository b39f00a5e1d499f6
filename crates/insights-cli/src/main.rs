mod notify;
mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "insights-cli")]
#[command(about = "Post insights report generator and dashboard notifier")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build the report, then send the dashboard email if it is due
    Run {
        /// Where to write the HTML report (defaults to `INSIGHTS_REPORT_PATH`)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Show the throttle decision without recording it or sending email
        #[arg(long)]
        dry_run: bool,
    },
    /// Build the report only
    Report {
        /// Where to write the HTML report (defaults to `INSIGHTS_REPORT_PATH`)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Send the dashboard email if it is due, without building a report
    Notify {
        /// Show the throttle decision without recording it or sending email
        #[arg(long)]
        dry_run: bool,
    },
    /// Inspect the notification throttle
    Throttle {
        #[command(subcommand)]
        command: ThrottleCommands,
    },
}

#[derive(Debug, Subcommand)]
enum ThrottleCommands {
    /// Show when the last email went out and whether the next one is due
    Status,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = insights_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    // stdout carries the markdown summary
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let command = cli.command.unwrap_or(Commands::Run {
        out: None,
        dry_run: false,
    });
    match command {
        Commands::Run { out, dry_run } => {
            let sheets = report::build_sheets_client(&config).await?;
            let reported = report::run_report(&sheets, &config, out.as_deref()).await?;
            if reported {
                notify::run_notify(Some(&sheets), &config, dry_run).await?;
            }
        }
        Commands::Report { out } => {
            let sheets = report::build_sheets_client(&config).await?;
            report::run_report(&sheets, &config, out.as_deref()).await?;
        }
        Commands::Notify { dry_run } => {
            let sheets = notify::store_sheets_client(&config).await?;
            notify::run_notify(sheets.as_ref(), &config, dry_run).await?;
        }
        Commands::Throttle {
            command: ThrottleCommands::Status,
        } => {
            let sheets = notify::store_sheets_client(&config).await?;
            notify::run_throttle_status(sheets.as_ref(), &config).await?;
        }
    }

    Ok(())
}
