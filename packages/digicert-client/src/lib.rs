//! Pure DigiCert CertCentral REST API client.
//!
//! A minimal client for the Services v2 API. Supports listing the domain
//! inventory with DCV metadata, submitting domains for dns-cname-token
//! validation, and probing validation status.
//!
//! # Example
//!
//! ```rust,ignore
//! use digicert_client::DigicertClient;
//!
//! let client = DigicertClient::new("your-api-key".into());
//!
//! let page = client.list_domains(0).await?;
//! for domain in &page.domains {
//!     println!("{}", domain.name);
//! }
//! ```

pub mod error;
pub mod types;

pub use error::{DigicertError, Result};
pub use types::{
    BatchStatusEntry, DcvExpiration, DcvToken, DomainListResponse, DomainRecord, PageInfo,
    ValidationDetails, ValidationEntry,
};

use serde::de::DeserializeOwned;
use serde_json::json;
use types::{BatchStatusRequest, BatchStatusResponse, DcvTokenResponse};

const BASE_URL: &str = "https://www.digicert.com/services/v2";

/// Page size for inventory listing. CertCentral caps list endpoints at 1000;
/// 100 keeps responses small without pathological page counts.
const PAGE_LIMIT: u32 = 100;

const DCV_METHOD: &str = "dns-cname-token";

pub struct DigicertClient {
    client: reqwest::Client,
    key: String,
}

impl DigicertClient {
    pub fn new(key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            key,
        }
    }

    async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(DigicertError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(resp.json().await?)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let resp = self
            .client
            .get(url)
            .header("X-DC-DEVKEY", &self.key)
            .send()
            .await?;
        Self::read_json(resp).await
    }

    /// One page of the domain inventory, DCV metadata included.
    pub async fn list_domains(&self, offset: u32) -> Result<DomainListResponse> {
        let url = format!(
            "{}/domain?include_dcv=true&limit={}&offset={}",
            BASE_URL, PAGE_LIMIT, offset
        );
        let page: DomainListResponse = self.get_json(&url).await?;
        tracing::debug!(
            offset,
            count = page.domains.len(),
            "fetched domain inventory page"
        );
        Ok(page)
    }

    /// Look up a single domain by FQDN. Returns the exact-name match, if any.
    pub async fn search_domain(&self, name: &str) -> Result<Option<DomainRecord>> {
        let url = format!(
            "{}/domain?include_dcv=true&filters[search]={}",
            BASE_URL, name
        );
        let page: DomainListResponse = self.get_json(&url).await?;
        Ok(page
            .domains
            .into_iter()
            .find(|d| d.name.eq_ignore_ascii_case(name)))
    }

    /// Full DCV status and expiration for one domain.
    pub async fn domain_status(&self, id: u64) -> Result<ValidationDetails> {
        let url = format!("{}/domain/{}?include_dcv=true", BASE_URL, id);
        self.get_json(&url).await
    }

    /// Current validation-order status for up to 40 domains in one call.
    ///
    /// This is the rate-limit amortization point: the API allows 100 calls
    /// per 5 seconds, so callers batch domains instead of probing one-by-one.
    pub async fn batch_validation_status(
        &self,
        names: &[String],
    ) -> Result<Vec<BatchStatusEntry>> {
        let url = format!("{}/domain/validation-status", BASE_URL);
        let resp = self
            .client
            .post(&url)
            .header("X-DC-DEVKEY", &self.key)
            .json(&BatchStatusRequest { domains: names })
            .send()
            .await?;
        let body: BatchStatusResponse = Self::read_json(resp).await?;
        tracing::debug!(
            requested = names.len(),
            returned = body.domains.len(),
            "fetched batch validation status"
        );
        Ok(body.domains)
    }

    /// Switch a domain's DCV method to dns-cname-token.
    pub async fn change_dcv_method(&self, id: u64) -> Result<DcvToken> {
        let url = format!("{}/domain/{}/dcv/method", BASE_URL, id);
        let resp = self
            .client
            .put(&url)
            .header("X-DC-DEVKEY", &self.key)
            .json(&json!({ "dcv_method": DCV_METHOD }))
            .send()
            .await?;
        let body: DcvTokenResponse = Self::read_json(resp).await?;
        body.dcv_token
            .ok_or_else(|| DigicertError::Malformed("dcv/method response missing dcv_token".into()))
    }

    /// Submit a domain for OV+EV validation via dns-cname-token.
    pub async fn submit_for_validation(&self, id: u64) -> Result<DcvToken> {
        let url = format!("{}/domain/{}/validation", BASE_URL, id);
        let resp = self
            .client
            .post(&url)
            .header("X-DC-DEVKEY", &self.key)
            .json(&json!({
                "validations": [{ "type": "ov" }, { "type": "ev" }],
                "dcv_method": DCV_METHOD,
            }))
            .send()
            .await?;
        let body: DcvTokenResponse = Self::read_json(resp).await?;
        body.dcv_token
            .ok_or_else(|| DigicertError::Malformed("validation response missing dcv_token".into()))
    }

    /// Obtain the CNAME token for a domain: pin the DCV method to
    /// dns-cname-token, then submit. The submission's token is the one that
    /// counts; the method change's is discarded.
    pub async fn request_validation_token(&self, id: u64) -> Result<DcvToken> {
        self.change_dcv_method(id).await?;
        self.submit_for_validation(id).await
    }

    /// Current validation state of one domain, for polling.
    pub async fn validation_probe(&self, id: u64) -> Result<ValidationDetails> {
        let url = format!("{}/domain/{}/validation", BASE_URL, id);
        self.get_json(&url).await
    }
}
