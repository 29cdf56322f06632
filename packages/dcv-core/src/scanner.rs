use std::collections::HashSet;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::config::RunConfig;
use crate::error::ScanError;
use crate::traits::{CaInventory, PageToken};
use crate::types::{Batch, Domain, MAX_BATCH};

/// Which domains a scan covers.
#[derive(Debug, Clone)]
pub enum ScanFilter {
    /// Full inventory, expiration-filtered.
    All,
    /// Exactly one domain, bypassing pagination and the expiration filter.
    One(String),
    /// Inventory restricted to the given names (case-insensitive),
    /// expiration-filtered. Names never seen end up in
    /// [`BatchStream::unmatched`].
    Allowlist(Vec<String>),
}

/// Paginates the CA inventory and chunks expiring domains into batches.
pub struct Scanner {
    inventory: Arc<dyn CaInventory>,
    threshold_days: i64,
}

impl Scanner {
    pub fn new(inventory: Arc<dyn CaInventory>, config: &RunConfig) -> Self {
        Self {
            inventory,
            threshold_days: config.threshold_days,
        }
    }

    /// Start a lazy scan. Batches become consumable before the inventory is
    /// fully paginated; memory stays bounded to one page remainder plus one
    /// batch. The stream is finite and not restartable; a fresh scan
    /// re-fetches everything.
    pub fn scan(&self, filter: ScanFilter) -> BatchStream {
        let (state, allowlist) = match filter {
            ScanFilter::All => (StreamState::Paging(None), None),
            ScanFilter::One(name) => (StreamState::Single(name), None),
            ScanFilter::Allowlist(names) => {
                let remaining = names.iter().map(|n| n.to_lowercase()).collect();
                (
                    StreamState::Paging(None),
                    Some(Allowlist { names, remaining }),
                )
            }
        };
        BatchStream {
            inventory: Arc::clone(&self.inventory),
            threshold_days: self.threshold_days,
            today: Utc::now().date_naive(),
            allowlist,
            state,
            pending: Vec::new(),
            sequence: 0,
        }
    }
}

#[derive(Debug, Clone)]
enum StreamState {
    /// Single-domain lookup, no pagination.
    Single(String),
    /// Mid-pagination; `None` means the first page.
    Paging(Option<PageToken>),
    /// Inventory exhausted; flush whatever is pending.
    Drained,
    Finished,
}

struct Allowlist {
    /// Original names in input order, for the unmatched report.
    names: Vec<String>,
    /// Lowercased names not yet seen in the inventory.
    remaining: HashSet<String>,
}

/// The lazy sequence of batches produced by [`Scanner::scan`].
pub struct BatchStream {
    inventory: Arc<dyn CaInventory>,
    threshold_days: i64,
    today: NaiveDate,
    allowlist: Option<Allowlist>,
    state: StreamState,
    pending: Vec<Domain>,
    sequence: usize,
}

impl BatchStream {
    /// The next batch, or `None` once the inventory is exhausted.
    ///
    /// A page fetch failure aborts the whole scan; batches already yielded
    /// stand on their own.
    pub async fn next_batch(&mut self) -> Result<Option<Batch>, ScanError> {
        loop {
            if self.pending.len() >= MAX_BATCH {
                return Ok(Some(self.cut_batch()));
            }

            match self.state.clone() {
                StreamState::Single(name) => {
                    self.state = StreamState::Drained;
                    match self.inventory.find_domain(&name).await? {
                        // Explicitly requested, so the expiration filter
                        // does not apply.
                        Some(domain) => self.pending.push(domain),
                        None => {
                            tracing::warn!(domain = %name, "domain not found in inventory")
                        }
                    }
                }
                StreamState::Paging(token) => {
                    let page = self.inventory.list_domains(token).await?;
                    tracing::debug!(count = page.domains.len(), "scanned inventory page");
                    self.state = match page.next {
                        Some(next) => StreamState::Paging(Some(next)),
                        None => StreamState::Drained,
                    };
                    for domain in page.domains {
                        self.admit(domain);
                    }
                }
                StreamState::Drained => {
                    self.state = StreamState::Finished;
                    for name in self.unmatched() {
                        tracing::warn!(domain = %name, "domain not found in inventory, check spelling");
                    }
                    if self.pending.is_empty() {
                        return Ok(None);
                    }
                    return Ok(Some(self.cut_batch()));
                }
                StreamState::Finished => return Ok(None),
            }
        }
    }

    /// Allowlist names that never appeared in the inventory. Complete once
    /// the stream has returned `None`.
    pub fn unmatched(&self) -> Vec<String> {
        match &self.allowlist {
            Some(allow) => allow
                .names
                .iter()
                .filter(|n| allow.remaining.contains(&n.to_lowercase()))
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    fn cut_batch(&mut self) -> Batch {
        let take = self.pending.len().min(MAX_BATCH);
        let batch = Batch {
            sequence: self.sequence,
            domains: self.pending.drain(..take).collect(),
        };
        self.sequence += 1;
        tracing::debug!(
            sequence = batch.sequence,
            size = batch.domains.len(),
            "emitting batch"
        );
        batch
    }

    /// Apply allowlist and expiration filters, preserving inventory order.
    fn admit(&mut self, domain: Domain) {
        if let Some(allow) = &mut self.allowlist {
            if !allow.remaining.remove(&domain.name.to_lowercase()) {
                return;
            }
        }

        let Some(expires_at) = domain.expires_at else {
            tracing::info!(
                domain = %domain.name,
                "no DCV expiration recorded, likely never validated; skipping"
            );
            return;
        };

        let days_left = (expires_at - self.today).num_days();
        if days_left <= self.threshold_days {
            self.pending.push(domain);
        }
    }
}
