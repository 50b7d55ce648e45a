//! Client seam for the upstream transaction API.
//!
//! The pipeline treats each page fetch as one awaited unit of work. The
//! client classifies failures into the closed error taxonomy: transport 5xx
//! and non-success envelopes are transient, transport 4xx and undecodable
//! bodies are not. Retrying is out of scope here; the worker's skip policy
//! decides what a failure costs.

use super::models::DealPage;
use crate::errors::IngestError;
use async_trait::async_trait;

#[cfg(feature = "http-client")]
use super::models::ApiEnvelope;
#[cfg(feature = "http-client")]
use crate::config::ApiConfig;

/// Query parameter names fixed by the provider contract.
#[cfg(feature = "http-client")]
const PARAM_REGION: &str = "LAWD_CD";
#[cfg(feature = "http-client")]
const PARAM_MONTH: &str = "DEAL_YMD";
#[cfg(feature = "http-client")]
const PARAM_SERVICE_KEY: &str = "serviceKey";
#[cfg(feature = "http-client")]
const PARAM_PAGE_NO: &str = "pageNo";
#[cfg(feature = "http-client")]
const PARAM_NUM_ROWS: &str = "numOfRows";

/// Fetches pages of raw transaction records for a (region, month) pair.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DealApiClient: Send + Sync {
    /// Fetches one page.
    ///
    /// Returns the page's records (possibly zero) plus pagination metadata,
    /// or a typed error from the closed taxonomy.
    async fn fetch_page(
        &self,
        region: &str,
        yymm: &str,
        page_no: u32,
    ) -> Result<DealPage, IngestError>;
}

/// Reqwest-backed client for the provider's paginated read endpoint.
#[cfg(feature = "http-client")]
#[derive(Debug, Clone)]
pub struct HttpDealApiClient {
    http: reqwest::Client,
    config: ApiConfig,
}

#[cfg(feature = "http-client")]
impl HttpDealApiClient {
    /// Creates a client from API configuration.
    pub fn new(config: ApiConfig) -> Result<Self, IngestError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| IngestError::transport(e.to_string()))?;
        Ok(Self { http, config })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}

#[cfg(feature = "http-client")]
#[async_trait]
impl DealApiClient for HttpDealApiClient {
    async fn fetch_page(
        &self,
        region: &str,
        yymm: &str,
        page_no: u32,
    ) -> Result<DealPage, IngestError> {
        let response = self
            .http
            .get(&self.config.base_url)
            .query(&[
                (PARAM_REGION, region.to_string()),
                (PARAM_MONTH, yymm.to_string()),
                (PARAM_SERVICE_KEY, self.config.service_key.clone()),
                (PARAM_PAGE_NO, page_no.to_string()),
                (PARAM_NUM_ROWS, self.config.page_size.to_string()),
            ])
            .send()
            .await
            .map_err(|e| IngestError::transport(e.to_string()))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(IngestError::UpstreamServer {
                status: status.as_u16(),
            });
        }
        if status.is_client_error() {
            return Err(IngestError::UpstreamClient {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| IngestError::transport(e.to_string()))?;
        let envelope: ApiEnvelope =
            serde_json::from_str(&body).map_err(|e| IngestError::decode(e.to_string()))?;

        if !envelope.is_success() {
            let header = &envelope.response.header;
            return Err(IngestError::ServiceResult {
                code: header.result_code.clone(),
                message: header.result_msg.clone(),
            });
        }

        let page = envelope.into_page();
        tracing::debug!(
            region = %region,
            yymm = %yymm,
            page_no = page_no,
            rows = page.records.len(),
            total = page.total_count,
            "fetched page"
        );
        Ok(page)
    }
}
