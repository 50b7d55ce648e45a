//! Job-global skip accounting.

use crate::errors::IngestError;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts skippable failures across every partition of a run and enforces
/// the configured limit.
///
/// One tracker is shared by all partition workers. The limit check happens
/// at the moment of the failure, not at chunk boundaries: the job fails the
/// instant the counter would exceed the limit, no matter which partition
/// produced the failure.
#[derive(Debug)]
pub struct SkipTracker {
    limit: usize,
    count: AtomicUsize,
}

impl SkipTracker {
    /// Creates a tracker with the given limit.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            count: AtomicUsize::new(0),
        }
    }

    /// Records one skippable failure.
    ///
    /// Returns the running count, or [`IngestError::SkipLimitExceeded`]
    /// when this failure pushes the count past the limit.
    pub fn record(&self, cause: &IngestError) -> Result<usize, IngestError> {
        let seen = self.count.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::warn!(cause = %cause, skipped = seen, "skipping failed unit");
        if seen > self.limit {
            return Err(IngestError::SkipLimitExceeded { limit: self.limit });
        }
        Ok(seen)
    }

    /// Returns the number of failures recorded so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Returns the configured limit.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }
}
