//! Core workflow for automated domain-control re-validation.
//!
//! Finds domains whose DCV is approaching expiration in a CA inventory,
//! chunks them into rate-limit-sized batches, and drives each one through
//! CNAME provisioning and bounded status polling. Providers are reached
//! through the [`traits::CaInventory`] and [`traits::DnsProvider`] seams, so
//! the whole workflow runs against mocks in tests.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod poll;
pub mod report;
pub mod runner;
pub mod scanner;
pub mod traits;
pub mod types;
pub mod validator;

// Re-exports for clean API
pub use config::{RunConfig, ADVISORY_MIN_TIMEOUT};
pub use error::{ProviderError, ScanError};
pub use pipeline::{run_pipeline, PipelineRun};
pub use poll::{JobStatus, ValidationJob};
pub use report::{Report, ReportCounts};
pub use runner::{BatchRun, BatchRunner};
pub use scanner::{BatchStream, ScanFilter, Scanner};
pub use traits::{CaInventory, DcvProbe, DnsProvider, DomainPage, OrderStatus, PageToken};
pub use validator::Orchestrator;
pub use types::{Batch, CnameRecord, DcvToken, Domain, Outcome, ValidationStatus, MAX_BATCH};
