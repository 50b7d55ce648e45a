//! Job-level and partition-level outcome reporting.

use crate::plan::PartitionKey;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Terminal status of one partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionStatus {
    /// The partition drained its record stream and committed every chunk.
    Completed,
    /// A fatal error aborted the partition.
    Failed,
    /// The partition stopped because the job was cancelled.
    Cancelled,
}

/// Result of driving one partition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionOutcome {
    /// The partition key.
    pub key: PartitionKey,
    /// Terminal status.
    pub status: PartitionStatus,
    /// Raw records pulled from the upstream.
    pub records_read: usize,
    /// Records committed to the sink.
    pub records_written: usize,
    /// Chunks committed to the sink.
    pub chunks_committed: usize,
    /// The fatal cause, when the partition failed.
    pub error: Option<String>,
}

impl PartitionOutcome {
    /// Creates a cancelled outcome for a partition that never produced work.
    #[must_use]
    pub fn cancelled(key: PartitionKey, reason: Option<String>) -> Self {
        Self {
            key,
            status: PartitionStatus::Cancelled,
            records_read: 0,
            records_written: 0,
            chunks_committed: 0,
            error: reason,
        }
    }
}

/// Terminal status of a job run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Every partition completed and the skip limit held.
    Succeeded,
    /// At least one partition failed fatally (including a tripped skip
    /// limit).
    Failed,
    /// The run was cancelled before every partition could complete.
    Cancelled,
}

/// Aggregated result of one job run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobReport {
    /// Unique id of this run.
    pub run_id: Uuid,
    /// Terminal status.
    pub status: JobStatus,
    /// Partitions in the frozen plan.
    pub partitions_total: usize,
    /// Partitions that completed.
    pub partitions_completed: usize,
    /// Partitions that failed fatally.
    pub partitions_failed: usize,
    /// Partitions stopped by cancellation.
    pub partitions_cancelled: usize,
    /// Records committed to the sink across all partitions.
    pub records_written: usize,
    /// Final skip tally.
    pub skip_count: usize,
    /// The first fatal cause, when the job failed.
    pub first_failure: Option<String>,
    /// Wall-clock duration of the run in milliseconds.
    pub duration_ms: f64,
}

impl JobReport {
    /// Returns true if the run succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == JobStatus::Succeeded
    }
}
