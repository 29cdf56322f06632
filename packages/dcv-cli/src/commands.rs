use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use dialoguer::{theme::ColorfulTheme, Confirm};
use tokio_util::sync::CancellationToken;

use dcv_core::{
    run_pipeline, BatchRunner, CaInventory, DnsProvider, Orchestrator, Report, RunConfig,
    ScanFilter, Scanner,
};
use digicert_client::DigicertClient;
use ultradns_client::UltraDnsClient;

use crate::adapters::{DigicertInventory, UltraDnsProvider};
use crate::config;
use crate::render;

/// `dcv check`: scanner only, report what is expiring.
pub async fn check(days: i64, domain: Option<String>) -> Result<()> {
    let key = config::digicert_key()?;
    let client = DigicertClient::new(key);

    if let Some(name) = domain {
        return check_single(&client, &name).await;
    }

    println!("Checking for validations expiring within {} days..\n", days);
    let run_config = RunConfig::default().with_threshold_days(days);
    let inventory: Arc<dyn CaInventory> = Arc::new(DigicertInventory::new(client, days));
    let scanner = Scanner::new(inventory, &run_config);
    let mut stream = scanner.scan(ScanFilter::All);

    let mut total = 0usize;
    while let Some(batch) = stream
        .next_batch()
        .await
        .context("Inventory scan failed")?
    {
        for domain in &batch.domains {
            let expiration = domain
                .expires_at
                .map(|d| d.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            println!("{:<40} expires {}", domain.name, expiration);
            total += 1;
        }
    }
    if total == 0 {
        println!("None!");
    }
    Ok(())
}

async fn check_single(client: &DigicertClient, name: &str) -> Result<()> {
    let record = client
        .search_domain(name)
        .await
        .context("Domain lookup failed")?
        .with_context(|| format!("Domain {} not found in DigiCert", name))?;
    let details = client
        .domain_status(record.id)
        .await
        .context("Failed to fetch domain status")?;

    let expiration = details
        .dcv_expiration
        .map(|e| e.earliest().to_string())
        .unwrap_or_else(|| "none recorded".to_string());
    println!(
        "Domain {} DCV status: {}, expiration: {}",
        name,
        details.status_summary(),
        expiration
    );
    Ok(())
}

/// `dcv validate`: one explicit domain, no expiration filtering.
pub async fn validate(name: String, timeout_secs: u64) -> Result<()> {
    let key = config::digicert_key()?;
    let dns_creds = config::ultradns_credentials()?;

    let ca_client = DigicertClient::new(key);
    let dns_client = UltraDnsClient::login(dns_creds.username, dns_creds.password)
        .await
        .context("UltraDNS login failed")?;

    let run_config = RunConfig::default().with_timeout(Duration::from_secs(timeout_secs));
    let inventory: Arc<dyn CaInventory> =
        Arc::new(DigicertInventory::new(ca_client, run_config.threshold_days));
    let dns: Arc<dyn DnsProvider> = Arc::new(UltraDnsProvider::new(dns_client));

    let domain = inventory
        .find_domain(&name)
        .await
        .context("Domain lookup failed")?;
    let Some(domain) = domain else {
        bail!("Domain {} not found in DigiCert", name);
    };

    if !dns
        .zone_exists(&domain.name)
        .await
        .context("Zone lookup failed")?
    {
        bail!("DNS zone {} not found in UltraDNS", domain.name);
    }

    let cancel = interrupt_token();
    let orchestrator = Orchestrator::new(Arc::clone(&inventory), dns, &run_config, cancel);

    println!("Validating domain {} (timeout {}s)..", domain.name, timeout_secs);
    let outcome = orchestrator.validate(&domain, run_config.timeout).await;

    let mut report = Report::new();
    report.record(domain.name, outcome);
    render::render(&report);
    Ok(())
}

/// `dcv runall`: scanner, batch runner, and orchestrator end to end.
pub async fn runall(days: i64, file: Option<PathBuf>, timeout_secs: u64) -> Result<()> {
    let key = config::digicert_key()?;
    let dns_creds = config::ultradns_credentials()?;

    let filter = match &file {
        Some(path) => ScanFilter::Allowlist(read_domain_list(path)?),
        None => ScanFilter::All,
    };

    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!(
            "Validate every domain expiring within {} days?",
            days
        ))
        .default(false)
        .interact()
        .context("Failed to read confirmation")?;
    if !confirmed {
        println!("Aborting validation.");
        return Ok(());
    }

    let ca_client = DigicertClient::new(key);
    let dns_client = UltraDnsClient::login(dns_creds.username, dns_creds.password)
        .await
        .context("UltraDNS login failed")?;

    let run_config = RunConfig::default()
        .with_threshold_days(days)
        .with_timeout(Duration::from_secs(timeout_secs));
    let inventory: Arc<dyn CaInventory> = Arc::new(DigicertInventory::new(ca_client, days));
    let dns: Arc<dyn DnsProvider> = Arc::new(UltraDnsProvider::new(dns_client));

    let cancel = interrupt_token();
    let scanner = Scanner::new(Arc::clone(&inventory), &run_config);
    let runner = BatchRunner::new(Arc::clone(&inventory));
    let orchestrator = Orchestrator::new(inventory, dns, &run_config, cancel.clone());

    println!("Validating domains expiring within {} days..\n", days);
    let run = run_pipeline(
        scanner.scan(filter),
        &runner,
        &orchestrator,
        &run_config,
        &cancel,
    )
    .await;

    render::render(&run.report);
    if let Some(err) = run.aborted {
        bail!("{}", err);
    }
    Ok(())
}

/// One FQDN per line; blanks ignored.
fn read_domain_list(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Error loading file: {}", path.display()))?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

/// Ctrl-C cancels in-flight jobs at their next poll boundary; the report
/// still renders with `interrupted` entries instead of losing domains.
fn interrupt_token() -> CancellationToken {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, letting in-flight jobs settle");
            token.cancel();
        }
    });
    cancel
}
