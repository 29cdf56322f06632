use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod commands;
mod config;
mod render;

#[derive(Parser)]
#[command(
    name = "dcv",
    version,
    about = "Domain control validation via the DigiCert and UltraDNS APIs"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check domains for expiring validations.
    Check {
        /// Days until a validation counts as expiring soon.
        #[arg(long, default_value_t = 90)]
        days: i64,
        /// Check only this domain and report its status.
        #[arg(short, long)]
        domain: Option<String>,
    },
    /// Validate a single domain now, regardless of expiration date.
    Validate {
        /// Domain (FQDN) to validate.
        #[arg(short, long)]
        domain: String,
        /// Seconds to wait for the CA to observe the record.
        #[arg(long, default_value_t = 90)]
        timeout: u64,
    },
    /// Find all expiring domains and validate them.
    Runall {
        /// Days until a validation counts as expiring soon.
        #[arg(long, default_value_t = 90)]
        days: i64,
        /// File with one domain per line; restricts the sweep to those.
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Seconds to wait per domain for the CA to observe the record.
        #[arg(long, default_value_t = 90)]
        timeout: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (development)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Check { days, domain } => commands::check(days, domain).await,
        Command::Validate { domain, timeout } => commands::validate(domain, timeout).await,
        Command::Runall {
            days,
            file,
            timeout,
        } => commands::runall(days, file, timeout).await,
    }
}
