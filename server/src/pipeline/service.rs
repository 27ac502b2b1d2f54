//! Tint processing service
//!
//! Orchestrates the pipeline stages: validate, acquire, decode, plan,
//! composite, encode, emit. Each stage fails with its own error kind and
//! nothing is retried internally; a failed stage fails the request. The
//! service is stateless across requests.

use bytes::Bytes;
use metrics::{counter, histogram};
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::debug;

use crate::config::{Config, OutputConfig};
use crate::overlay::OverlayPlan;

use super::composite;
use super::fetch::ImageFetcher;
use super::types::{ImageSource, OutputMode, OverlayRequest, PipelineError, ProcessedImage};

/// Service turning validated overlay requests into processed images
pub struct TintService {
    fetcher: Arc<dyn ImageFetcher>,
    allowed_domains: Vec<String>,
    output: OutputConfig,
}

impl TintService {
    /// Create a service from a fetcher and the server configuration
    pub fn new(fetcher: Arc<dyn ImageFetcher>, config: &Config) -> Self {
        Self {
            fetcher,
            allowed_domains: config.allowed_domains.clone(),
            output: config.output.clone(),
        }
    }

    /// Validate raw request parameters against the configured allow-list.
    /// Never performs I/O.
    pub fn validate(
        &self,
        raw_source: &str,
        raw_intensity: &str,
        raw_color: Option<&str>,
        output: OutputMode,
    ) -> Result<OverlayRequest, PipelineError> {
        OverlayRequest::validate(
            raw_source,
            raw_intensity,
            raw_color,
            output,
            &self.allowed_domains,
        )
    }

    /// Run the pipeline for a validated request
    pub async fn process(
        &self,
        request: &OverlayRequest,
    ) -> Result<ProcessedImage, PipelineError> {
        let start = Instant::now();
        counter!("tintframe_requests_total").increment(1);

        let result = self.run(request).await;

        histogram!("tintframe_request_duration_seconds").record(start.elapsed());
        if result.is_err() {
            counter!("tintframe_request_errors_total").increment(1);
        }

        result
    }

    async fn run(&self, request: &OverlayRequest) -> Result<ProcessedImage, PipelineError> {
        let plan = OverlayPlan::build(request.color, request.intensity as i64)?;

        let bytes = match &request.source {
            ImageSource::Url(url) => self.fetcher.fetch(url).await?,
            ImageSource::Inline(data) => data.clone(),
        };

        let decode_start = Instant::now();
        let mut image = composite::decode(&bytes)?;
        histogram!("tintframe_phase_duration_seconds", "phase" => "decode")
            .record(decode_start.elapsed());

        let (width, height) = image.dimensions();
        debug!(
            "Compositing {} at intensity {} over {}x{} source",
            request.color.as_str(),
            request.intensity,
            width,
            height
        );

        let composite_start = Instant::now();
        composite::apply_overlay(&mut image, &plan);
        histogram!("tintframe_phase_duration_seconds", "phase" => "composite")
            .record(composite_start.elapsed());

        let encode_start = Instant::now();
        let png = composite::encode_png(&image)?;
        histogram!("tintframe_phase_duration_seconds", "phase" => "encode")
            .record(encode_start.elapsed());

        let filename = match request.output {
            OutputMode::AttachmentDownload => Some(self.attachment_filename(request)),
            OutputMode::InlinePreview => None,
        };

        Ok(ProcessedImage {
            png: Bytes::from(png),
            output: request.output,
            filename,
        })
    }

    /// Deterministic attachment filename: prefix, color, intensity, plus a
    /// millisecond timestamp as uniqueness token
    fn attachment_filename(&self, request: &OverlayRequest) -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        format!(
            "{}-{}-{}-{}.png",
            self.output.filename_prefix,
            request.color.as_str().to_lowercase(),
            request.intensity,
            millis
        )
    }

    /// Cache TTL for inline previews
    pub fn preview_max_age_secs(&self) -> u64 {
        self.output.preview_max_age_secs
    }
}
