use std::collections::HashMap;
use std::sync::Arc;

use crate::traits::{CaInventory, OrderStatus};
use crate::types::{Batch, Domain, Outcome};

/// Result of driving one batch through the CA's validation-order endpoint.
#[derive(Debug)]
pub struct BatchRun {
    /// Domains confirmed to still need validation, in batch order.
    pub needs_validation: Vec<Domain>,
    /// Domains settled without a validation job.
    pub settled: Vec<(String, Outcome)>,
}

/// Classifies the domains of one batch with a single CA call.
pub struct BatchRunner {
    inventory: Arc<dyn CaInventory>,
}

impl BatchRunner {
    pub fn new(inventory: Arc<dyn CaInventory>) -> Self {
        Self { inventory }
    }

    /// Fetch validation-order records for the whole batch (one call, which
    /// is what keeps the sweep inside the CA rate limit) and split it into
    /// already-valid domains and domains needing a fresh validation.
    ///
    /// A failure fetching order data settles every domain in this batch as
    /// an error; sibling batches are unaffected.
    pub async fn run(&self, batch: Batch) -> BatchRun {
        let names: Vec<String> = batch.domains.iter().map(|d| d.name.clone()).collect();

        let orders = match self.inventory.batch_order_status(&names).await {
            Ok(orders) => orders,
            Err(e) => {
                tracing::error!(
                    sequence = batch.sequence,
                    error = %e,
                    "batch order lookup failed, settling whole batch as errors"
                );
                return BatchRun {
                    needs_validation: Vec::new(),
                    settled: batch
                        .domains
                        .into_iter()
                        .map(|d| (d.name, Outcome::Error(e.to_string())))
                        .collect(),
                };
            }
        };

        // Domain identity is case-insensitive; normalize the response keys
        // before matching them back up.
        let orders: HashMap<String, OrderStatus> = orders
            .into_iter()
            .map(|(name, status)| (name.to_lowercase(), status))
            .collect();

        let mut run = BatchRun {
            needs_validation: Vec::new(),
            settled: Vec::new(),
        };
        for domain in batch.domains {
            match orders.get(&domain.name.to_lowercase()) {
                Some(OrderStatus::Valid) => {
                    tracing::info!(domain = %domain.name, "already valid, skipping");
                    run.settled.push((domain.name, Outcome::AlreadyValid));
                }
                // No order record is treated the same as a pending one: the
                // validation attempt itself will surface any real problem.
                Some(OrderStatus::PendingRevalidation) | None => {
                    run.needs_validation.push(domain)
                }
            }
        }

        tracing::debug!(
            sequence = batch.sequence,
            needs_validation = run.needs_validation.len(),
            settled = run.settled.len(),
            "classified batch"
        );
        run
    }
}
