//! Upstream transaction API collaborator.
//!
//! This module provides:
//! - Wire types for the provider's response envelope and raw records
//! - The `DealApiClient` seam plus its reqwest-backed implementation

mod client;
mod models;

#[cfg(feature = "http-client")]
pub use client::HttpDealApiClient;
pub use client::DealApiClient;
#[cfg(test)]
pub use client::MockDealApiClient;
pub use models::{
    ApiBody, ApiEnvelope, ApiHeader, ApiItems, ApiResponse, DealPage, RawDealRecord,
    SUCCESS_RESULT_CODE,
};
