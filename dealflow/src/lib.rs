//! # Dealflow
//!
//! A partitioned, fault-tolerant batch ingestion pipeline for Korean
//! real-estate transaction records.
//!
//! Dealflow pulls historical transaction rows from the national open-data
//! provider across a cross-product of administrative districts and contract
//! months, normalizes each row, and persists it in fixed-size chunks:
//!
//! - **Partition planning**: the full partition space (months, or
//!   region × month pairs) is enumerated once and frozen before dispatch
//! - **Lazy paged reading**: each partition streams its raw records one
//!   upstream page at a time
//! - **Chunked commits**: transformed records are committed to the sink in
//!   all-or-nothing chunks
//! - **Skip-limit fault tolerance**: transient upstream failures are counted
//!   against a job-global limit instead of aborting the run
//! - **Bounded concurrency**: a grid-size semaphore caps how many partitions
//!   run at once
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dealflow::prelude::*;
//!
//! let api = ApiConfig::new("https://provider.example/getRTMSDataSvcAptRent", "key");
//! let config = IngestConfig::new().with_grid_size(300).with_chunk_size(100);
//! let regions = RegionTable::from_path("bjdcode.txt")?;
//!
//! let client = Arc::new(HttpDealApiClient::new(api)?);
//! let sink = Arc::new(MemorySink::new());
//! let report = JobOrchestrator::new(config, regions, client, sink).run().await;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod api;
pub mod cancellation;
pub mod config;
pub mod errors;
pub mod job;
pub mod observability;
pub mod plan;
pub mod reader;
pub mod regions;
pub mod sink;
pub mod transform;
pub mod writer;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::api::{DealApiClient, DealPage, RawDealRecord};
    #[cfg(feature = "http-client")]
    pub use crate::api::HttpDealApiClient;
    pub use crate::cancellation::CancellationToken;
    pub use crate::config::{ApiConfig, Epoch, IngestConfig, PartitionMode};
    pub use crate::errors::IngestError;
    pub use crate::job::{
        JobOrchestrator, JobReport, JobStatus, PartitionOutcome, PartitionStatus,
    };
    pub use crate::plan::{PartitionKey, PartitionPlan, PartitionPlanner};
    pub use crate::reader::{PartitionReader, SubUnit};
    pub use crate::regions::{RegionEntry, RegionTable};
    pub use crate::sink::{MemorySink, RecordSink};
    pub use crate::transform::{DealRecord, RecordTransformer};
    pub use crate::writer::{ChunkedWriter, SkipTracker};
}
