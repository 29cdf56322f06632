//! Implementations of the core collaborator traits over the concrete
//! provider clients.

use std::collections::HashMap;
use std::fmt::Display;

use async_trait::async_trait;
use chrono::Utc;

use dcv_core::{
    CaInventory, CnameRecord, DcvProbe, DcvToken, DnsProvider, Domain, DomainPage, OrderStatus,
    PageToken, ProviderError, ValidationStatus,
};
use digicert_client::{DigicertClient, DomainRecord};
use ultradns_client::UltraDnsClient;

fn provider_err(e: impl Display) -> ProviderError {
    ProviderError::new(e.to_string())
}

/// CA inventory backed by DigiCert CertCentral.
pub struct DigicertInventory {
    client: DigicertClient,
    threshold_days: i64,
}

impl DigicertInventory {
    pub fn new(client: DigicertClient, threshold_days: i64) -> Self {
        Self {
            client,
            threshold_days,
        }
    }

    fn to_domain(&self, record: DomainRecord) -> Domain {
        let expires_at = record.dcv_expiration.map(|e| e.earliest());
        let validation_status = match expires_at {
            None => ValidationStatus::Unknown,
            Some(date) => {
                let days_left = (date - Utc::now().date_naive()).num_days();
                if days_left < 0 {
                    ValidationStatus::Expired
                } else if days_left <= self.threshold_days {
                    ValidationStatus::ExpiringSoon
                } else {
                    ValidationStatus::Valid
                }
            }
        };
        Domain {
            id: record.id,
            name: record.name,
            expires_at,
            validation_status,
        }
    }
}

#[async_trait]
impl CaInventory for DigicertInventory {
    async fn list_domains(&self, page: Option<PageToken>) -> Result<DomainPage, ProviderError> {
        let offset: u32 = match &page {
            Some(token) => token
                .0
                .parse()
                .map_err(|_| ProviderError::new(format!("bad page token: {}", token.0)))?,
            None => 0,
        };
        let resp = self.client.list_domains(offset).await.map_err(provider_err)?;
        let next = resp
            .page
            .and_then(|p| p.next_offset())
            .map(|o| PageToken(o.to_string()));
        Ok(DomainPage {
            domains: resp
                .domains
                .into_iter()
                .map(|r| self.to_domain(r))
                .collect(),
            next,
        })
    }

    async fn find_domain(&self, name: &str) -> Result<Option<Domain>, ProviderError> {
        let record = self.client.search_domain(name).await.map_err(provider_err)?;
        Ok(record.map(|r| self.to_domain(r)))
    }

    async fn batch_order_status(
        &self,
        names: &[String],
    ) -> Result<HashMap<String, OrderStatus>, ProviderError> {
        let entries = self
            .client
            .batch_validation_status(names)
            .await
            .map_err(provider_err)?;
        Ok(entries
            .into_iter()
            .map(|e| {
                let status = if e.is_valid() {
                    OrderStatus::Valid
                } else {
                    OrderStatus::PendingRevalidation
                };
                (e.name, status)
            })
            .collect())
    }

    async fn validation_token(&self, domain: &Domain) -> Result<DcvToken, ProviderError> {
        let token = self
            .client
            .request_validation_token(domain.id)
            .await
            .map_err(provider_err)?;
        Ok(DcvToken {
            token: token.token,
            verification_value: token.verification_value,
        })
    }

    async fn validation_status(&self, domain: &Domain) -> Result<DcvProbe, ProviderError> {
        let details = self
            .client
            .validation_probe(domain.id)
            .await
            .map_err(provider_err)?;
        if details.dcv_complete() {
            Ok(DcvProbe::Observed)
        } else if let Some(reason) = details.rejection() {
            Ok(DcvProbe::Rejected(reason))
        } else {
            Ok(DcvProbe::Pending)
        }
    }
}

/// DNS provider backed by UltraDNS. The validation record lives in the zone
/// named after the domain being validated.
pub struct UltraDnsProvider {
    client: UltraDnsClient,
}

impl UltraDnsProvider {
    pub fn new(client: UltraDnsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DnsProvider for UltraDnsProvider {
    async fn upsert_cname(&self, record: &CnameRecord) -> Result<(), ProviderError> {
        self.client
            .upsert_cname(&record.domain, &record.record_name, &record.record_value)
            .await
            .map_err(provider_err)
    }

    async fn zone_exists(&self, zone: &str) -> Result<bool, ProviderError> {
        self.client.zone_exists(zone).await.map_err(provider_err)
    }
}
