use thiserror::Error;

/// Transient failure from a CA or DNS provider call.
///
/// The core never retries these; they surface as an `Error` outcome on the
/// affected domain(s) only. Retries, if any, belong inside the provider
/// client.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct ProviderError(pub String);

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Inventory pagination failed, aborting the whole scan.
///
/// This is the only failure allowed to stop a run; batches already yielded
/// keep their results.
#[derive(Debug, Error)]
#[error("scan aborted: {0}")]
pub struct ScanError(#[from] pub ProviderError);
