use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::types::{CnameRecord, DcvToken, Domain};

/// Opaque cursor into the CA inventory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageToken(pub String);

/// One page of the CA inventory.
#[derive(Debug, Clone)]
pub struct DomainPage {
    pub domains: Vec<Domain>,
    pub next: Option<PageToken>,
}

/// Validation-order state of one domain in a batch response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    /// Order is fully valid; the domain needs no work.
    Valid,
    /// Order needs a fresh validation.
    PendingRevalidation,
}

/// One status probe of an in-flight validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DcvProbe {
    /// The CA observed the CNAME record; validation is complete.
    Observed,
    /// Not yet observed; keep polling.
    Pending,
    /// Definitive rejection (token mismatch, domain not found).
    Rejected(String),
}

/// CA inventory collaborator (to allow mocking).
///
/// Implementations must be safe for concurrent use by multiple in-flight
/// jobs; the core shares one instance across a whole run.
#[async_trait]
pub trait CaInventory: Send + Sync {
    /// One inventory page with expiration/validation metadata.
    async fn list_domains(&self, page: Option<PageToken>) -> Result<DomainPage, ProviderError>;

    /// Single-domain lookup by FQDN.
    async fn find_domain(&self, name: &str) -> Result<Option<Domain>, ProviderError>;

    /// Validation-order status for every domain in one batch, one CA call.
    /// `names` must not exceed [`crate::types::MAX_BATCH`].
    async fn batch_order_status(
        &self,
        names: &[String],
    ) -> Result<HashMap<String, OrderStatus>, ProviderError>;

    /// Issue (or re-issue) the DNS token for CNAME validation of a domain.
    async fn validation_token(&self, domain: &Domain) -> Result<DcvToken, ProviderError>;

    /// Current validation status of a domain, for polling.
    async fn validation_status(&self, domain: &Domain) -> Result<DcvProbe, ProviderError>;
}

/// DNS provider collaborator (to allow mocking).
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Create-or-replace the validation CNAME. Never appends: repeating the
    /// call with the same record must leave a single record in place.
    async fn upsert_cname(&self, record: &CnameRecord) -> Result<(), ProviderError>;

    /// Whether the provider hosts a zone for this domain.
    async fn zone_exists(&self, zone: &str) -> Result<bool, ProviderError>;
}
