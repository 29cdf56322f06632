use std::fmt;

use chrono::NaiveDate;

/// Largest number of domains submitted to the CA in one validation-order
/// call. The CA rate limit is per call, so batching at this size keeps a
/// full inventory sweep inside the limit.
pub const MAX_BATCH: usize = 40;

/// Validation state of a domain as reported by the CA inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStatus {
    Valid,
    ExpiringSoon,
    Expired,
    Unknown,
}

/// One domain from the CA inventory. Identity is `name`, case-insensitive.
#[derive(Debug, Clone)]
pub struct Domain {
    /// CA inventory record id; CA endpoints are addressed by it.
    pub id: u64,
    pub name: String,
    /// `None` for domains that have never completed a validation.
    pub expires_at: Option<NaiveDate>,
    pub validation_status: ValidationStatus,
}

/// A rate-limit-sized group of domains, consumed once by the batch runner.
#[derive(Debug, Clone)]
pub struct Batch {
    pub sequence: usize,
    pub domains: Vec<Domain>,
}

/// CNAME token pair issued by the CA when a domain is submitted for
/// validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DcvToken {
    pub token: String,
    pub verification_value: String,
}

/// The DNS record proving control of a domain.
///
/// Derived deterministically from the CA token: the same token always yields
/// the same record, which is what makes re-running a validation idempotent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CnameRecord {
    pub domain: String,
    pub record_name: String,
    pub record_value: String,
}

impl CnameRecord {
    pub fn for_token(domain: &str, token: &DcvToken) -> Self {
        Self {
            domain: domain.to_string(),
            record_name: format!("{}.{}", token.token, domain),
            record_value: token.verification_value.clone(),
        }
    }
}

/// Terminal result for one domain, aggregated into the final report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The CA already considers the domain valid; no job was started.
    AlreadyValid,
    Validated,
    /// The CA definitively rejected the validation; retrying won't help.
    Failed,
    /// No terminal signal before the deadline; the user may re-run.
    TimedOut,
    /// A provider call failed, or the run was interrupted.
    Error(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::AlreadyValid | Outcome::Validated)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::AlreadyValid => write!(f, "already valid"),
            Outcome::Validated => write!(f, "validated"),
            Outcome::Failed => write!(f, "failed"),
            Outcome::TimedOut => write!(f, "timed out"),
            Outcome::Error(reason) => write!(f, "error: {}", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cname_record_is_deterministic_for_a_token() {
        let token = DcvToken {
            token: "abc123".into(),
            verification_value: "dcv.digicert.com".into(),
        };
        let a = CnameRecord::for_token("example.com", &token);
        let b = CnameRecord::for_token("example.com", &token);
        assert_eq!(a, b);
        assert_eq!(a.record_name, "abc123.example.com");
        assert_eq!(a.record_value, "dcv.digicert.com");
    }
}
