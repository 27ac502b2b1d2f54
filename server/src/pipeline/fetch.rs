//! Remote image acquisition

use async_trait::async_trait;
use bytes::Bytes;
use metrics::{counter, histogram};
use std::time::Instant;
use tracing::{debug, warn};
use url::Url;

use crate::config::FetchConfig;

use super::types::PipelineError;

/// Trait for acquiring remote image bytes, so tests can substitute a mock
/// and assert that invalid requests never reach the network.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Fetch the body of `url`, bounded by the configured timeout
    async fn fetch(&self, url: &Url) -> Result<Bytes, PipelineError>;
}

/// HTTP fetcher backed by a shared reqwest client
pub struct HttpImageFetcher {
    client: reqwest::Client,
    max_body_bytes: usize,
}

impl HttpImageFetcher {
    /// Build a fetcher with the configured timeout and client identifier
    pub fn new(config: &FetchConfig) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            max_body_bytes: config.max_body_bytes,
        })
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &Url) -> Result<Bytes, PipelineError> {
        let start = Instant::now();
        counter!("tintframe_fetch_requests_total").increment(1);

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            counter!("tintframe_fetch_errors_total").increment(1);
            if e.is_timeout() {
                PipelineError::FetchFailed("upstream request timed out".to_string())
            } else {
                PipelineError::FetchFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            counter!("tintframe_fetch_errors_total").increment(1);
            warn!("Upstream returned HTTP {} for {}", status.as_u16(), url);
            return Err(PipelineError::FetchFailed(format!(
                "upstream returned HTTP {}",
                status.as_u16()
            )));
        }

        // Reject oversized bodies up front when the upstream declares a length
        if let Some(len) = response.content_length()
            && len > self.max_body_bytes as u64
        {
            counter!("tintframe_fetch_errors_total").increment(1);
            return Err(PipelineError::FetchFailed(format!(
                "image is {} bytes, exceeding the {} byte limit",
                len, self.max_body_bytes
            )));
        }

        let bytes = response.bytes().await.map_err(|e| {
            counter!("tintframe_fetch_errors_total").increment(1);
            PipelineError::FetchFailed(e.to_string())
        })?;

        if bytes.len() > self.max_body_bytes {
            counter!("tintframe_fetch_errors_total").increment(1);
            return Err(PipelineError::FetchFailed(format!(
                "image is {} bytes, exceeding the {} byte limit",
                bytes.len(),
                self.max_body_bytes
            )));
        }

        debug!(
            "Fetched {} bytes from {} in {:?}",
            bytes.len(),
            url,
            start.elapsed()
        );
        histogram!("tintframe_fetch_duration_seconds").record(start.elapsed());

        Ok(bytes)
    }
}
