//! Per-partition worker loop.

use super::report::{PartitionOutcome, PartitionStatus};
use crate::api::DealApiClient;
use crate::cancellation::CancellationToken;
use crate::errors::IngestError;
use crate::plan::PartitionKey;
use crate::reader::PartitionReader;
use crate::regions::RegionTable;
use crate::sink::RecordSink;
use crate::transform::RecordTransformer;
use crate::writer::{ChunkedWriter, SkipTracker};
use std::sync::Arc;

/// Drives one partition through read → transform → write, applying the
/// skip policy on the way.
///
/// Skippable failures — whether they surface from a page fetch or a chunk
/// commit — are counted against the shared tracker and absorbed here; they
/// never propagate past the worker. A fatal failure ends the partition. A
/// tripped skip limit additionally cancels the whole job.
pub(crate) struct PartitionWorker {
    client: Arc<dyn DealApiClient>,
    sink: Arc<dyn RecordSink>,
    skips: Arc<SkipTracker>,
    cancel: Arc<CancellationToken>,
    chunk_size: usize,
}

impl PartitionWorker {
    pub(crate) fn new(
        client: Arc<dyn DealApiClient>,
        sink: Arc<dyn RecordSink>,
        skips: Arc<SkipTracker>,
        cancel: Arc<CancellationToken>,
        chunk_size: usize,
    ) -> Self {
        Self {
            client,
            sink,
            skips,
            cancel,
            chunk_size,
        }
    }

    /// Runs the partition to its terminal state.
    pub(crate) async fn run(&self, key: PartitionKey, regions: &RegionTable) -> PartitionOutcome {
        let label = key.label();
        let mut reader = PartitionReader::new(Arc::clone(&self.client), &key, regions);
        let transformer = RecordTransformer::new();
        let mut writer = ChunkedWriter::new(Arc::clone(&self.sink), self.chunk_size);
        let mut records_read = 0usize;
        let mut cancelled = false;

        let failure = loop {
            // Chunk boundaries are the cancellation points: an in-flight
            // partition finishes its current chunk before stopping.
            if writer.buffered() == 0 && self.cancel.is_cancelled() {
                cancelled = true;
                break None;
            }

            match reader.next().await {
                Ok(Some(raw)) => {
                    records_read += 1;
                    let record = transformer.transform(&raw);
                    match writer.push(record).await {
                        Ok(()) => {}
                        Err(err) => {
                            if let Some(fatal) = self.absorb(err) {
                                break Some(fatal);
                            }
                        }
                    }
                }
                Ok(None) => match writer.finish().await {
                    Ok(()) => break None,
                    Err(err) => {
                        // The stream is already drained; a skippable tail
                        // failure abandons that chunk but the partition
                        // still completes.
                        match self.absorb(err) {
                            Some(fatal) => break Some(fatal),
                            None => break None,
                        }
                    }
                },
                Err(err) => {
                    if let Some(fatal) = self.absorb(err) {
                        break Some(fatal);
                    }
                }
            }
        };

        let outcome = PartitionOutcome {
            key,
            status: match (&failure, cancelled) {
                (Some(_), _) => PartitionStatus::Failed,
                (None, true) => PartitionStatus::Cancelled,
                (None, false) => PartitionStatus::Completed,
            },
            records_read,
            records_written: writer.committed_records(),
            chunks_committed: writer.committed_chunks(),
            error: match failure {
                Some(err) => Some(err.to_string()),
                None if cancelled => self.cancel.reason(),
                None => None,
            },
        };

        match outcome.status {
            PartitionStatus::Completed => tracing::debug!(
                partition = %label,
                records = outcome.records_written,
                chunks = outcome.chunks_committed,
                "partition completed"
            ),
            PartitionStatus::Failed => tracing::warn!(
                partition = %label,
                error = outcome.error.as_deref().unwrap_or(""),
                "partition failed"
            ),
            PartitionStatus::Cancelled => tracing::debug!(
                partition = %label,
                "partition cancelled"
            ),
        }
        outcome
    }

    /// Applies the skip policy to one failure.
    ///
    /// Returns `None` when the failure was absorbed, or the fatal error that
    /// ends the partition. Tripping the skip limit cancels the entire job.
    fn absorb(&self, err: IngestError) -> Option<IngestError> {
        if !err.is_skippable() {
            return Some(err);
        }
        match self.skips.record(&err) {
            Ok(_) => None,
            Err(fatal) => {
                self.cancel.cancel(fatal.to_string());
                Some(fatal)
            }
        }
    }
}
