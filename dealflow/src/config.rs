//! Configuration types for ingestion jobs.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the partition space is carved into work units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionMode {
    /// One partition per contract month; the reader walks every region
    /// inside the partition (default).
    #[default]
    ByMonth,
    /// One partition per (region, month) pair.
    Cross,
}

/// First month of the ingestion time range.
///
/// The provider publishes transaction data from January 2005 onward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Epoch {
    /// Four-digit year.
    pub year: i32,
    /// Month of year, 1-12.
    pub month: u32,
}

impl Default for Epoch {
    fn default() -> Self {
        Self {
            year: 2005,
            month: 1,
        }
    }
}

impl Epoch {
    /// Creates a new epoch.
    #[must_use]
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }
}

/// Connection parameters for the upstream data provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the paginated read endpoint.
    pub base_url: String,
    /// Access credential passed as a query parameter.
    pub service_key: String,
    /// Rows requested per page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
}

fn default_page_size() -> usize {
    1000
}

fn default_timeout() -> f64 {
    30.0
}

impl ApiConfig {
    /// Creates a new API configuration with default paging and timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            service_key: service_key.into(),
            page_size: default_page_size(),
            timeout_seconds: default_timeout(),
        }
    }

    /// Sets the page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Gets the timeout as a Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_seconds)
    }
}

/// Tunables for one ingestion job run.
///
/// Operators trade throughput against failure tolerance here: a finer
/// partition mode with a small chunk size spreads work across the grid,
/// while a coarse single-pass run wants a large chunk size and a grid of 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Partitioning strategy.
    #[serde(default)]
    pub mode: PartitionMode,
    /// First month of the time range.
    #[serde(default)]
    pub epoch: Epoch,
    /// Records per sink commit.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Maximum number of partitions processed concurrently.
    #[serde(default = "default_grid_size")]
    pub grid_size: usize,
    /// Maximum skippable failures tolerated across the whole run.
    #[serde(default = "default_skip_limit")]
    pub skip_limit: usize,
}

fn default_chunk_size() -> usize {
    100
}

fn default_grid_size() -> usize {
    300
}

fn default_skip_limit() -> usize {
    10_000
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            mode: PartitionMode::default(),
            epoch: Epoch::default(),
            chunk_size: default_chunk_size(),
            grid_size: default_grid_size(),
            skip_limit: default_skip_limit(),
        }
    }
}

impl IngestConfig {
    /// Creates a new ingest configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the partition mode.
    #[must_use]
    pub fn with_mode(mut self, mode: PartitionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the epoch.
    #[must_use]
    pub fn with_epoch(mut self, epoch: Epoch) -> Self {
        self.epoch = epoch;
        self
    }

    /// Sets the chunk size.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Sets the grid size.
    #[must_use]
    pub fn with_grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = grid_size;
        self
    }

    /// Sets the skip limit.
    #[must_use]
    pub fn with_skip_limit(mut self, skip_limit: usize) -> Self {
        self.skip_limit = skip_limit;
        self
    }
}
