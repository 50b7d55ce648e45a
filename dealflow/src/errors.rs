//! Error types for the dealflow pipeline.
//!
//! The fetch and commit collaborators produce a closed set of error kinds;
//! the worker's skip policy pattern-matches on kind rather than on the
//! source of the failure.

use thiserror::Error;

/// The main error type for ingestion operations.
#[derive(Debug, Clone, Error)]
pub enum IngestError {
    /// The upstream provider returned a server-side (5xx) status.
    #[error("upstream server error: status {status}")]
    UpstreamServer {
        /// The HTTP status code.
        status: u16,
    },

    /// The upstream provider rejected the request with a client-side (4xx)
    /// status. The request shape is wrong, not transient.
    #[error("upstream rejected request: status {status}")]
    UpstreamClient {
        /// The HTTP status code.
        status: u16,
    },

    /// The response envelope carried a non-success result code.
    #[error("upstream result code {code}: {message}")]
    ServiceResult {
        /// The provider's result code.
        code: String,
        /// The provider's result message.
        message: String,
    },

    /// A transport-level failure (connect, timeout, interrupted body).
    #[error("transport error: {0}")]
    Transport(String),

    /// An async fetch task failed to complete.
    #[error("fetch task failed: {0}")]
    Execution(String),

    /// The response body could not be decoded into the expected envelope.
    #[error("malformed upstream response: {0}")]
    Decode(String),

    /// The sink rejected a chunk for a non-transient reason.
    #[error("chunk commit failed: {0}")]
    Commit(String),

    /// The job-global skip limit was exceeded.
    #[error("skip limit exceeded: more than {limit} skippable failures")]
    SkipLimitExceeded {
        /// The configured limit.
        limit: usize,
    },

    /// The reference dataset is missing or unreadable.
    #[error("reference dataset error: {0}")]
    Reference(String),

    /// The job was cancelled.
    #[error("job cancelled: {0}")]
    Cancelled(String),
}

impl IngestError {
    /// Creates a transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates an execution error.
    #[must_use]
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }

    /// Creates a decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Creates a commit error.
    #[must_use]
    pub fn commit(message: impl Into<String>) -> Self {
        Self::Commit(message.into())
    }

    /// Returns true if this failure may be absorbed by the skip policy.
    ///
    /// Skippable kinds are transient by nature: an upstream 5xx, a
    /// non-success result envelope, a transport hiccup, or a failed fetch
    /// task. Everything else aborts the partition.
    #[must_use]
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            Self::UpstreamServer { .. }
                | Self::ServiceResult { .. }
                | Self::Transport(_)
                | Self::Execution(_)
        )
    }
}
