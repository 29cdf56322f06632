//! Pure Neustar/UltraDNS REST API client.
//!
//! Covers the slice of the API this project needs: password-grant login,
//! zone lookup, and create-or-replace of a single CNAME rrset.
//!
//! # Example
//!
//! ```rust,ignore
//! use ultradns_client::UltraDnsClient;
//!
//! let dns = UltraDnsClient::login("user".into(), "pass".into()).await?;
//! dns.upsert_cname("example.com", "_token.example.com", "dcv.digicert.com").await?;
//! ```

pub mod error;
mod types;

pub use error::{Result, UltraDnsError};

use reqwest::StatusCode;
use types::{RrsetWrite, TokenResponse};

const BASE_URL: &str = "https://api.ultradns.com";

pub struct UltraDnsClient {
    client: reqwest::Client,
    token: String,
}

impl UltraDnsClient {
    /// Exchange credentials for a bearer token and return a ready client.
    pub async fn login(username: String, password: String) -> Result<Self> {
        let client = reqwest::Client::new();
        let url = format!("{}/authorization/token", BASE_URL);
        let resp = client
            .post(&url)
            .form(&[
                ("grant_type", "password"),
                ("username", &username),
                ("password", &password),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(UltraDnsError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body: TokenResponse = resp.json().await?;
        let token = body
            .access_token
            .ok_or_else(|| UltraDnsError::Auth("token response missing access_token".into()))?;

        tracing::debug!("UltraDNS login succeeded");
        Ok(Self { client, token })
    }

    /// Whether a zone exists for this account.
    pub async fn zone_exists(&self, zone: &str) -> Result<bool> {
        let url = format!("{}/zones/{}", BASE_URL, zone);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(UltraDnsError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(true)
    }

    /// Create-or-replace a single CNAME record in `zone`.
    ///
    /// PUT replaces an existing rrset; a 404 means none exists yet, in which
    /// case the record is created with POST. Either way the zone ends up with
    /// exactly one CNAME rrset under `host`, so re-running with the same data
    /// is a no-op.
    pub async fn upsert_cname(&self, zone: &str, host: &str, rdata: &str) -> Result<()> {
        let url = format!("{}/zones/{}./rrsets/cname/{}", BASE_URL, zone, host);
        let body = RrsetWrite {
            rdata: vec![format!("{}.", rdata)],
        };

        let resp = self
            .client
            .put(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            tracing::debug!(zone, host, "replaced existing CNAME rrset");
            return Ok(());
        }
        if status != StatusCode::NOT_FOUND {
            let message = resp.text().await.unwrap_or_default();
            return Err(UltraDnsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(UltraDnsError::Api {
                status: status.as_u16(),
                message,
            });
        }
        tracing::debug!(zone, host, "created CNAME rrset");
        Ok(())
    }
}
