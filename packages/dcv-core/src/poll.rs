use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::traits::{CaInventory, DcvProbe};
use crate::types::{Domain, Outcome};

/// Lifecycle of one validation job.
///
/// `Pending -> Polling -> { Validated | Failed | TimedOut }`; terminal states
/// are final. Retrying a domain means creating a new job with a fresh
/// `started_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Polling,
    Validated,
    Failed,
    TimedOut,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Validated | JobStatus::Failed | JobStatus::TimedOut
        )
    }
}

/// One in-flight validation of one domain.
#[derive(Debug)]
pub struct ValidationJob {
    pub domain_name: String,
    pub started_at: Instant,
    pub timeout: Duration,
    pub status: JobStatus,
}

impl ValidationJob {
    pub fn new(domain_name: impl Into<String>, timeout: Duration) -> Self {
        Self {
            domain_name: domain_name.into(),
            started_at: Instant::now(),
            timeout,
            status: JobStatus::Pending,
        }
    }

    /// Apply a transition; terminal states never change.
    pub fn transition(&mut self, next: JobStatus) {
        if !self.status.is_terminal() {
            self.status = next;
        }
    }
}

/// Drive a job to a terminal state by polling the CA.
///
/// Each wait between polls is a true suspension point, capped to the time
/// remaining before the deadline so the machine never polls past
/// `job.timeout`. Cancellation is observed at the same boundary; an
/// interrupted job settles as `Error("interrupted")` rather than vanishing
/// from the report.
pub async fn poll_validation(
    inventory: &dyn CaInventory,
    domain: &Domain,
    job: &mut ValidationJob,
    interval: Duration,
    cancel: &CancellationToken,
) -> Outcome {
    loop {
        let elapsed = job.started_at.elapsed();
        if elapsed >= job.timeout {
            job.transition(JobStatus::TimedOut);
            tracing::warn!(
                domain = %job.domain_name,
                elapsed_secs = elapsed.as_secs(),
                "validation not observed before deadline"
            );
            return Outcome::TimedOut;
        }

        job.transition(JobStatus::Polling);
        match inventory.validation_status(domain).await {
            Ok(DcvProbe::Observed) => {
                job.transition(JobStatus::Validated);
                tracing::info!(domain = %job.domain_name, "domain successfully validated");
                return Outcome::Validated;
            }
            Ok(DcvProbe::Rejected(reason)) => {
                job.transition(JobStatus::Failed);
                tracing::warn!(domain = %job.domain_name, %reason, "validation rejected by CA");
                return Outcome::Failed;
            }
            Ok(DcvProbe::Pending) => {
                tracing::debug!(domain = %job.domain_name, "validation not yet observed");
            }
            Err(e) => {
                tracing::error!(domain = %job.domain_name, error = %e, "status probe failed");
                return Outcome::Error(e.to_string());
            }
        }

        let remaining = job.timeout.saturating_sub(job.started_at.elapsed());
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::warn!(domain = %job.domain_name, "polling interrupted");
                return Outcome::Error("interrupted".to_string());
            }
            _ = tokio::time::sleep(interval.min(remaining)) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::Utc;

    use crate::error::ProviderError;
    use crate::traits::{DomainPage, OrderStatus, PageToken};
    use crate::types::{DcvToken, ValidationStatus};

    /// Probe script: each call pops the next answer; the last repeats.
    struct MockProbes {
        script: Vec<DcvProbe>,
        calls: AtomicUsize,
    }

    impl MockProbes {
        fn new(script: Vec<DcvProbe>) -> Self {
            Self {
                script,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CaInventory for MockProbes {
        async fn list_domains(
            &self,
            _page: Option<PageToken>,
        ) -> Result<DomainPage, ProviderError> {
            unimplemented!()
        }

        async fn find_domain(&self, _name: &str) -> Result<Option<Domain>, ProviderError> {
            unimplemented!()
        }

        async fn batch_order_status(
            &self,
            _names: &[String],
        ) -> Result<HashMap<String, OrderStatus>, ProviderError> {
            unimplemented!()
        }

        async fn validation_token(&self, _domain: &Domain) -> Result<DcvToken, ProviderError> {
            unimplemented!()
        }

        async fn validation_status(&self, _domain: &Domain) -> Result<DcvProbe, ProviderError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .script
                .get(n)
                .or_else(|| self.script.last())
                .cloned()
                .unwrap_or(DcvProbe::Pending))
        }
    }

    fn domain() -> Domain {
        Domain {
            id: 1,
            name: "d.example.com".to_string(),
            expires_at: Some(Utc::now().date_naive()),
            validation_status: ValidationStatus::ExpiringSoon,
        }
    }

    const FAST: Duration = Duration::from_millis(5);

    #[tokio::test]
    async fn observed_probe_validates() {
        let inventory = MockProbes::new(vec![DcvProbe::Pending, DcvProbe::Observed]);
        let mut job = ValidationJob::new("d.example.com", Duration::from_secs(5));
        let cancel = CancellationToken::new();

        let outcome = poll_validation(&inventory, &domain(), &mut job, FAST, &cancel).await;

        assert_eq!(outcome, Outcome::Validated);
        assert_eq!(job.status, JobStatus::Validated);
        assert_eq!(inventory.calls(), 2);
    }

    #[tokio::test]
    async fn rejection_fails_without_retry() {
        let inventory = MockProbes::new(vec![DcvProbe::Rejected("token mismatch".into())]);
        let mut job = ValidationJob::new("d.example.com", Duration::from_secs(5));
        let cancel = CancellationToken::new();

        let outcome = poll_validation(&inventory, &domain(), &mut job, FAST, &cancel).await;

        assert_eq!(outcome, Outcome::Failed);
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(inventory.calls(), 1);
    }

    #[tokio::test]
    async fn deadline_reached_while_pending_times_out() {
        let inventory = MockProbes::new(vec![DcvProbe::Pending]);
        let mut job = ValidationJob::new("d.example.com", Duration::from_millis(30));
        let cancel = CancellationToken::new();

        let outcome = poll_validation(&inventory, &domain(), &mut job, FAST, &cancel).await;

        assert_eq!(outcome, Outcome::TimedOut);
        assert_eq!(job.status, JobStatus::TimedOut);
        // The inter-poll wait is capped to the remaining time, so the probe
        // count stays bounded by timeout / interval (plus the first).
        assert!(inventory.calls() <= 7);
    }

    #[tokio::test]
    async fn zero_timeout_never_probes() {
        let inventory = MockProbes::new(vec![DcvProbe::Observed]);
        let mut job = ValidationJob::new("d.example.com", Duration::ZERO);
        let cancel = CancellationToken::new();

        let outcome = poll_validation(&inventory, &domain(), &mut job, FAST, &cancel).await;

        assert_eq!(outcome, Outcome::TimedOut);
        assert_eq!(inventory.calls(), 0);
    }

    #[tokio::test]
    async fn probe_error_settles_job_as_error() {
        struct FailingProbe;

        #[async_trait]
        impl CaInventory for FailingProbe {
            async fn list_domains(
                &self,
                _page: Option<PageToken>,
            ) -> Result<DomainPage, ProviderError> {
                unimplemented!()
            }
            async fn find_domain(&self, _name: &str) -> Result<Option<Domain>, ProviderError> {
                unimplemented!()
            }
            async fn batch_order_status(
                &self,
                _names: &[String],
            ) -> Result<HashMap<String, OrderStatus>, ProviderError> {
                unimplemented!()
            }
            async fn validation_token(
                &self,
                _domain: &Domain,
            ) -> Result<DcvToken, ProviderError> {
                unimplemented!()
            }
            async fn validation_status(
                &self,
                _domain: &Domain,
            ) -> Result<DcvProbe, ProviderError> {
                Err(ProviderError::new("status endpoint unavailable"))
            }
        }

        let mut job = ValidationJob::new("d.example.com", Duration::from_secs(5));
        let cancel = CancellationToken::new();

        let outcome = poll_validation(&FailingProbe, &domain(), &mut job, FAST, &cancel).await;

        assert_eq!(
            outcome,
            Outcome::Error("status endpoint unavailable".to_string())
        );
    }

    #[tokio::test]
    async fn cancellation_interrupts_at_the_poll_boundary() {
        let inventory = MockProbes::new(vec![DcvProbe::Pending]);
        let mut job = ValidationJob::new("d.example.com", Duration::from_secs(30));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcome = poll_validation(
            &inventory,
            &domain(),
            &mut job,
            Duration::from_secs(10),
            &cancel,
        )
        .await;

        assert_eq!(outcome, Outcome::Error("interrupted".to_string()));
        // The first probe already happened; the interrupt lands on the wait.
        assert_eq!(inventory.calls(), 1);
    }

    #[test]
    fn terminal_states_never_transition() {
        let mut job = ValidationJob::new("d.example.com", Duration::from_secs(1));
        job.transition(JobStatus::Polling);
        job.transition(JobStatus::TimedOut);
        job.transition(JobStatus::Validated);
        assert_eq!(job.status, JobStatus::TimedOut);
    }
}
