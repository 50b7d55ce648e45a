//! Grid-size-bounded partition dispatch and outcome aggregation.

use super::report::{JobReport, JobStatus, PartitionOutcome, PartitionStatus};
use super::worker::PartitionWorker;
use crate::api::DealApiClient;
use crate::cancellation::CancellationToken;
use crate::config::IngestConfig;
use crate::plan::{PartitionPlan, PartitionPlanner};
use crate::regions::RegionTable;
use crate::sink::RecordSink;
use crate::writer::SkipTracker;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use uuid::Uuid;

/// Runs one ingestion job: plans the partition space, dispatches partitions
/// with true concurrency bounded by the grid size, and aggregates the
/// per-partition outcomes into one job-level report.
///
/// Partitions are independent; they share only the skip tracker and the
/// cancellation token. A fatal error in one partition fails the job but
/// leaves the others running; a tripped skip limit or an external
/// cancellation stops dispatch of not-yet-started partitions.
pub struct JobOrchestrator {
    config: IngestConfig,
    regions: Arc<RegionTable>,
    client: Arc<dyn DealApiClient>,
    sink: Arc<dyn RecordSink>,
    cancel: Arc<CancellationToken>,
}

impl JobOrchestrator {
    /// Creates an orchestrator.
    #[must_use]
    pub fn new(
        config: IngestConfig,
        regions: RegionTable,
        client: Arc<dyn DealApiClient>,
        sink: Arc<dyn RecordSink>,
    ) -> Self {
        Self {
            config,
            regions: Arc::new(regions),
            client,
            sink,
            cancel: Arc::new(CancellationToken::new()),
        }
    }

    /// Returns the job's cancellation token.
    ///
    /// Cancelling it stops dispatch of not-yet-started partitions; in-flight
    /// partitions finish their current chunk first.
    #[must_use]
    pub fn cancel_token(&self) -> Arc<CancellationToken> {
        Arc::clone(&self.cancel)
    }

    /// Plans the full partition space and runs it.
    pub async fn run(&self) -> JobReport {
        let plan = PartitionPlanner::from_config(&self.config).plan(&self.regions);
        self.run_plan(plan).await
    }

    /// Runs a pre-computed (frozen) plan.
    pub async fn run_plan(&self, plan: PartitionPlan) -> JobReport {
        let start = Instant::now();
        let run_id = Uuid::new_v4();
        let partitions_total = plan.len();
        let skips = Arc::new(SkipTracker::new(self.config.skip_limit));
        let semaphore = Arc::new(Semaphore::new(self.config.grid_size.max(1)));

        tracing::info!(
            %run_id,
            partitions = partitions_total,
            grid_size = self.config.grid_size,
            chunk_size = self.config.chunk_size,
            skip_limit = self.config.skip_limit,
            "starting ingestion job"
        );

        let keys = plan.into_keys();
        let spawned_keys = keys.clone();

        let mut handles = Vec::with_capacity(keys.len());
        for key in keys {
            let semaphore = Arc::clone(&semaphore);
            let cancel = Arc::clone(&self.cancel);
            let regions = Arc::clone(&self.regions);
            let worker = PartitionWorker::new(
                Arc::clone(&self.client),
                Arc::clone(&self.sink),
                Arc::clone(&skips),
                Arc::clone(&cancel),
                self.config.chunk_size,
            );
            handles.push(tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return PartitionOutcome::cancelled(key, cancel.reason());
                };
                if cancel.is_cancelled() {
                    return PartitionOutcome::cancelled(key, cancel.reason());
                }
                worker.run(key, &regions).await
            }));
        }

        let joined = futures::future::join_all(handles).await;
        let outcomes: Vec<PartitionOutcome> = joined
            .into_iter()
            .zip(spawned_keys)
            .map(|(joined, key)| match joined {
                Ok(outcome) => outcome,
                Err(join_error) => {
                    // A panicked worker counts as a fatal partition failure.
                    tracing::warn!(partition = %key.label(), error = %join_error, "worker panicked");
                    PartitionOutcome {
                        key,
                        status: PartitionStatus::Failed,
                        records_read: 0,
                        records_written: 0,
                        chunks_committed: 0,
                        error: Some(join_error.to_string()),
                    }
                }
            })
            .collect();

        let report = Self::aggregate(run_id, partitions_total, &outcomes, &skips, start);
        tracing::info!(
            %run_id,
            status = ?report.status,
            completed = report.partitions_completed,
            failed = report.partitions_failed,
            records = report.records_written,
            skipped = report.skip_count,
            "ingestion job finished"
        );
        report
    }

    fn aggregate(
        run_id: Uuid,
        partitions_total: usize,
        outcomes: &[PartitionOutcome],
        skips: &SkipTracker,
        start: Instant,
    ) -> JobReport {
        let mut completed = 0usize;
        let mut failed = 0usize;
        let mut cancelled = 0usize;
        let mut records_written = 0usize;
        let mut first_failure = None;

        for outcome in outcomes {
            records_written += outcome.records_written;
            match outcome.status {
                PartitionStatus::Completed => completed += 1,
                PartitionStatus::Failed => {
                    failed += 1;
                    if first_failure.is_none() {
                        first_failure = outcome.error.clone();
                    }
                }
                PartitionStatus::Cancelled => cancelled += 1,
            }
        }

        let status = if failed > 0 {
            JobStatus::Failed
        } else if cancelled > 0 {
            JobStatus::Cancelled
        } else {
            JobStatus::Succeeded
        };

        JobReport {
            run_id,
            status,
            partitions_total,
            partitions_completed: completed,
            partitions_failed: failed,
            partitions_cancelled: cancelled,
            records_written,
            skip_count: skips.count(),
            first_failure,
            duration_ms: start.elapsed().as_secs_f64() * 1000.0,
        }
    }
}

impl std::fmt::Debug for JobOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobOrchestrator")
            .field("config", &self.config)
            .field("regions", &self.regions.len())
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}
