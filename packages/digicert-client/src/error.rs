use thiserror::Error;

pub type Result<T> = std::result::Result<T, DigicertError>;

#[derive(Debug, Error)]
pub enum DigicertError {
    /// Network-level failure before a response was received.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-2xx response from the CertCentral API.
    #[error("DigiCert API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A 2xx response missing a field the caller needs (e.g. no dcv_token
    /// on a validation submission).
    #[error("malformed DigiCert response: {0}")]
    Malformed(String),
}
