//! Chunked commit engine.
//!
//! This module provides:
//! - The chunk buffer that turns a record stream into all-or-nothing commits
//! - The job-global skip tracker behind the fault-tolerance policy

mod skip;

pub use skip::SkipTracker;

use crate::errors::IngestError;
use crate::sink::RecordSink;
use crate::transform::DealRecord;
use std::sync::Arc;

/// Groups transformed records into fixed-size chunks and commits each chunk
/// to the sink.
///
/// For a partition yielding `R` records with chunk size `C`, the writer
/// issues `ceil(R / C)` commits; the last one carries `R mod C` records
/// (or `C` when `R` divides evenly). A failed commit abandons the chunk —
/// whether the failure is worth the whole partition is the caller's call.
pub struct ChunkedWriter {
    sink: Arc<dyn RecordSink>,
    chunk_size: usize,
    buffer: Vec<DealRecord>,
    committed_chunks: usize,
    committed_records: usize,
}

impl ChunkedWriter {
    /// Creates a writer committing `chunk_size` records at a time.
    ///
    /// A chunk size of zero is treated as one.
    #[must_use]
    pub fn new(sink: Arc<dyn RecordSink>, chunk_size: usize) -> Self {
        Self {
            sink,
            chunk_size: chunk_size.max(1),
            buffer: Vec::new(),
            committed_chunks: 0,
            committed_records: 0,
        }
    }

    /// Buffers one record, committing the chunk once it is full.
    pub async fn push(&mut self, record: DealRecord) -> Result<(), IngestError> {
        self.buffer.push(record);
        if self.buffer.len() >= self.chunk_size {
            self.commit().await?;
        }
        Ok(())
    }

    /// Commits the buffered tail chunk, if any.
    pub async fn finish(&mut self) -> Result<(), IngestError> {
        if !self.buffer.is_empty() {
            self.commit().await?;
        }
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), IngestError> {
        let chunk = std::mem::take(&mut self.buffer);
        let rows = chunk.len();
        self.sink.write_chunk(chunk).await?;
        self.committed_chunks += 1;
        self.committed_records += rows;
        tracing::debug!(
            rows = rows,
            chunks = self.committed_chunks,
            "committed chunk"
        );
        Ok(())
    }

    /// Returns the number of records buffered for the current chunk.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Returns the number of chunks committed so far.
    #[must_use]
    pub fn committed_chunks(&self) -> usize {
        self.committed_chunks
    }

    /// Returns the number of records committed so far.
    #[must_use]
    pub fn committed_records(&self) -> usize {
        self.committed_records
    }
}

impl std::fmt::Debug for ChunkedWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkedWriter")
            .field("chunk_size", &self.chunk_size)
            .field("buffered", &self.buffer.len())
            .field("committed_chunks", &self.committed_chunks)
            .field("committed_records", &self.committed_records)
            .finish()
    }
}
