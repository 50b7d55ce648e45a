//! Persistence seam for committed chunks.

use crate::errors::IngestError;
use crate::transform::DealRecord;
use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

/// Accepts chunks of domain records and persists them.
///
/// The contract is insert-all-or-fail-the-chunk: no update or upsert
/// semantics, and concurrent chunk commits from different partitions must
/// not interfere with each other. Implementations classify their own
/// failures — a transient execution failure is skippable, anything else is
/// a fatal [`IngestError::Commit`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Persists one chunk atomically.
    async fn write_chunk(&self, chunk: Vec<DealRecord>) -> Result<(), IngestError>;
}

/// In-memory sink for tests and local runs.
///
/// Assigns a store identity to every row on insert, the way a database
/// sink would.
#[derive(Debug, Default)]
pub struct MemorySink {
    rows: RwLock<Vec<(Uuid, DealRecord)>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of persisted rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    /// Returns true if nothing has been persisted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }

    /// Returns the persisted records in commit order.
    #[must_use]
    pub fn records(&self) -> Vec<DealRecord> {
        self.rows.read().iter().map(|(_, r)| r.clone()).collect()
    }
}

#[async_trait]
impl RecordSink for MemorySink {
    async fn write_chunk(&self, chunk: Vec<DealRecord>) -> Result<(), IngestError> {
        let mut rows = self.rows.write();
        for record in chunk {
            rows.push((Uuid::new_v4(), record));
        }
        Ok(())
    }
}
