use thiserror::Error;

pub type Result<T> = std::result::Result<T, UltraDnsError>;

#[derive(Debug, Error)]
pub enum UltraDnsError {
    /// Network-level failure before a response was received.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-2xx response from the UltraDNS API.
    #[error("UltraDNS API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Login succeeded at the HTTP layer but returned no usable token.
    #[error("UltraDNS authorization failed: {0}")]
    Auth(String),
}
