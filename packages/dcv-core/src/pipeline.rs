use futures::future::join_all;
use tokio_util::sync::CancellationToken;

use crate::config::RunConfig;
use crate::error::ScanError;
use crate::report::Report;
use crate::runner::BatchRunner;
use crate::scanner::BatchStream;
use crate::types::Outcome;
use crate::validator::Orchestrator;

/// Result of one full sweep. `aborted` carries the pagination failure when
/// the scan could not run to completion; the report still holds every domain
/// from batches that were fully processed.
#[derive(Debug)]
pub struct PipelineRun {
    pub report: Report,
    pub aborted: Option<ScanError>,
}

/// Drive the whole workflow: batches strictly in scan order, domains within
/// a batch validated concurrently.
///
/// Every domain handed to the orchestrator lands in the report, including
/// `Error("interrupted")` entries when the cancellation token fires mid-run.
/// Cancellation stops the sweep at the next batch boundary; batches never
/// fetched are simply not part of the run.
pub async fn run_pipeline(
    mut stream: BatchStream,
    runner: &BatchRunner,
    orchestrator: &Orchestrator,
    config: &RunConfig,
    cancel: &CancellationToken,
) -> PipelineRun {
    let mut report = Report::new();

    loop {
        if cancel.is_cancelled() {
            tracing::warn!("sweep interrupted, stopping before next batch");
            return PipelineRun {
                report,
                aborted: None,
            };
        }

        let batch = match stream.next_batch().await {
            Ok(Some(batch)) => batch,
            Ok(None) => {
                for name in stream.unmatched() {
                    report.record(name, Outcome::Error("not found in inventory".to_string()));
                }
                return PipelineRun {
                    report,
                    aborted: None,
                };
            }
            Err(e) => {
                tracing::error!(error = %e, "inventory pagination failed");
                return PipelineRun {
                    report,
                    aborted: Some(e),
                };
            }
        };

        let run = runner.run(batch).await;
        for (name, outcome) in run.settled {
            report.record(name, outcome);
        }

        let outcomes = join_all(
            run.needs_validation
                .iter()
                .map(|d| orchestrator.validate(d, config.timeout)),
        )
        .await;
        for (domain, outcome) in run.needs_validation.iter().zip(outcomes) {
            report.record(domain.name.clone(), outcome);
        }
    }
}
