use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::config::{RunConfig, ADVISORY_MIN_TIMEOUT};
use crate::poll::{poll_validation, ValidationJob};
use crate::traits::{CaInventory, DnsProvider};
use crate::types::{CnameRecord, Domain, Outcome};

/// Drives one domain through token issuance, CNAME upsert, and polling.
pub struct Orchestrator {
    inventory: Arc<dyn CaInventory>,
    dns: Arc<dyn DnsProvider>,
    poll_interval: Duration,
    cancel: CancellationToken,
}

impl Orchestrator {
    pub fn new(
        inventory: Arc<dyn CaInventory>,
        dns: Arc<dyn DnsProvider>,
        config: &RunConfig,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            inventory,
            dns,
            poll_interval: config.poll_interval,
            cancel,
        }
    }

    /// Validate one domain, returning its terminal outcome.
    ///
    /// Re-running with the same CA token derives the same CNAME record and
    /// upserts it again, so repeated validation is idempotent. A DNS upsert
    /// failure returns immediately; no polling happens for that domain, and
    /// nothing here affects sibling domains running concurrently.
    pub async fn validate(&self, domain: &Domain, timeout: Duration) -> Outcome {
        if timeout < ADVISORY_MIN_TIMEOUT {
            // Advisory only; short timeouts lose the race against DNS
            // propagation plus the CA re-check.
            tracing::warn!(
                domain = %domain.name,
                timeout_secs = timeout.as_secs(),
                "timeout below {}s is unlikely to observe validation",
                ADVISORY_MIN_TIMEOUT.as_secs()
            );
        }

        if self.cancel.is_cancelled() {
            return Outcome::Error("interrupted".to_string());
        }

        let token = match self.inventory.validation_token(domain).await {
            Ok(token) => token,
            Err(e) => {
                tracing::error!(domain = %domain.name, error = %e, "token request failed");
                return Outcome::Error(format!("token request failed: {}", e));
            }
        };

        let record = CnameRecord::for_token(&domain.name, &token);
        if let Err(e) = self.dns.upsert_cname(&record).await {
            tracing::error!(domain = %domain.name, error = %e, "CNAME upsert failed");
            return Outcome::Error(format!("dns upsert failed: {}", e));
        }
        tracing::info!(
            domain = %domain.name,
            record = %record.record_name,
            "CNAME record in place, polling for validation"
        );

        let mut job = ValidationJob::new(domain.name.clone(), timeout);
        poll_validation(
            self.inventory.as_ref(),
            domain,
            &mut job,
            self.poll_interval,
            &self.cancel,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;

    use crate::error::ProviderError;
    use crate::traits::{DcvProbe, DomainPage, OrderStatus, PageToken};
    use crate::types::{DcvToken, ValidationStatus};

    struct MockCa {
        probe: DcvProbe,
    }

    #[async_trait]
    impl CaInventory for MockCa {
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
            Ok(DcvToken {
                token: "tok123".to_string(),
                verification_value: "dcv.digicert.com".to_string(),
            })
        }

        async fn validation_status(&self, _domain: &Domain) -> Result<DcvProbe, ProviderError> {
            Ok(self.probe.clone())
        }
    }

    /// Upsert keyed by record name: a second upsert with the same record
    /// replaces rather than appends.
    #[derive(Default)]
    struct MockDns {
        records: Mutex<HashMap<String, String>>,
        fail: bool,
    }

    #[async_trait]
    impl DnsProvider for MockDns {
        async fn upsert_cname(&self, record: &CnameRecord) -> Result<(), ProviderError> {
            if self.fail {
                return Err(ProviderError::new("zone write rejected"));
            }
            self.records
                .lock()
                .unwrap()
                .insert(record.record_name.clone(), record.record_value.clone());
            Ok(())
        }

        async fn zone_exists(&self, _zone: &str) -> Result<bool, ProviderError> {
            Ok(true)
        }
    }

    fn domain(name: &str) -> Domain {
        Domain {
            id: 3,
            name: name.to_string(),
            expires_at: Some(Utc::now().date_naive()),
            validation_status: ValidationStatus::ExpiringSoon,
        }
    }

    fn orchestrator(ca: MockCa, dns: Arc<MockDns>) -> Orchestrator {
        let config = RunConfig::default().with_poll_interval(Duration::from_millis(5));
        Orchestrator::new(Arc::new(ca), dns, &config, CancellationToken::new())
    }

    #[tokio::test]
    async fn successful_validation_round_trip() {
        let dns = Arc::new(MockDns::default());
        let orch = orchestrator(
            MockCa {
                probe: DcvProbe::Observed,
            },
            Arc::clone(&dns),
        );

        let outcome = orch
            .validate(&domain("a.example.com"), Duration::from_secs(5))
            .await;

        assert_eq!(outcome, Outcome::Validated);
        let records = dns.records.lock().unwrap();
        assert_eq!(
            records.get("tok123.a.example.com"),
            Some(&"dcv.digicert.com".to_string())
        );
    }

    #[tokio::test]
    async fn repeated_validation_is_idempotent() {
        let dns = Arc::new(MockDns::default());
        let orch = orchestrator(
            MockCa {
                probe: DcvProbe::Observed,
            },
            Arc::clone(&dns),
        );
        let d = domain("a.example.com");

        orch.validate(&d, Duration::from_secs(5)).await;
        orch.validate(&d, Duration::from_secs(5)).await;

        // Same token, same record; the upsert replaced, never appended.
        let records = dns.records.lock().unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn dns_upsert_failure_skips_polling() {
        let dns = Arc::new(MockDns {
            records: Mutex::new(HashMap::new()),
            fail: true,
        });
        let orch = orchestrator(
            MockCa {
                probe: DcvProbe::Observed,
            },
            Arc::clone(&dns),
        );

        let outcome = orch
            .validate(&domain("b.example.com"), Duration::from_secs(5))
            .await;

        match outcome {
            Outcome::Error(reason) => assert!(reason.starts_with("dns upsert failed")),
            other => panic!("expected error outcome, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn cancelled_run_settles_as_interrupted() {
        let dns = Arc::new(MockDns::default());
        let cancel = CancellationToken::new();
        cancel.cancel();
        let config = RunConfig::default().with_poll_interval(Duration::from_millis(5));
        let orch = Orchestrator::new(
            Arc::new(MockCa {
                probe: DcvProbe::Observed,
            }),
            dns,
            &config,
            cancel,
        );

        let outcome = orch
            .validate(&domain("c.example.com"), Duration::from_secs(5))
            .await;

        assert_eq!(outcome, Outcome::Error("interrupted".to_string()));
    }
}
