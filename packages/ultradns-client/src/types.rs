use serde::{Deserialize, Serialize};

/// Response for the password-grant token exchange.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}

/// Body for writing a CNAME rrset.
#[derive(Debug, Serialize)]
pub(crate) struct RrsetWrite {
    pub rdata: Vec<String>,
}
