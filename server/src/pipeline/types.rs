//! Pipeline types, request validation, and error definitions

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use bytes::Bytes;
use thiserror::Error;
use url::Url;

use crate::overlay::{ColorName, OverlayError};

/// Errors from the image processing pipeline, one kind per stage
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Image domain not allowed: {0}")]
    DomainNotAllowed(String),

    #[error("Failed to fetch image: {0}")]
    FetchFailed(String),

    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),

    #[error("Failed to composite image: {0}")]
    CompositeFailed(String),

    #[error("Failed to encode image: {0}")]
    EncodeFailed(String),
}

impl From<OverlayError> for PipelineError {
    fn from(e: OverlayError) -> Self {
        PipelineError::InvalidRequest(e.to_string())
    }
}

/// Where the source image bytes come from
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Remote image on an allow-listed host
    Url(Url),
    /// Inline image bytes, decoded from a base64 data URL
    Inline(Bytes),
}

/// Response disposition for the processed image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Short-lived public caching, no content disposition
    InlinePreview,
    /// Attachment disposition with a generated filename, caching disabled
    AttachmentDownload,
}

/// A fully validated tint request.
///
/// Construction goes through [`OverlayRequest::validate`], so holding one
/// means the source passed the allow-list and the parameters are in range.
/// No network I/O happens before validation completes.
#[derive(Debug, Clone)]
pub struct OverlayRequest {
    pub source: ImageSource,
    pub color: ColorName,
    pub intensity: u8,
    pub output: OutputMode,
}

/// Output of the pipeline: encoded PNG plus emission policy
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub png: Bytes,
    pub output: OutputMode,
    /// Suggested filename, present in attachment mode
    pub filename: Option<String>,
}

/// Check a hostname against the allow-list: exact match or a suffix match
/// on a dot boundary, so `evilimagedelivery.net` does not pass for
/// `imagedelivery.net`.
pub fn host_allowed(host: &str, allowed_domains: &[String]) -> bool {
    allowed_domains.iter().any(|domain| {
        host == domain
            || (host.len() > domain.len()
                && host.ends_with(domain.as_str())
                && host.as_bytes()[host.len() - domain.len() - 1] == b'.')
    })
}

impl ImageSource {
    /// Parse a raw source reference: either an absolute http(s) URL on an
    /// allow-listed host, or a `data:<mime>;base64,<payload>` data URL.
    pub fn parse(raw: &str, allowed_domains: &[String]) -> Result<Self, PipelineError> {
        if raw.starts_with("data:") {
            return Self::parse_data_url(raw);
        }

        let url = Url::parse(raw)
            .map_err(|e| PipelineError::InvalidRequest(format!("malformed image URL: {}", e)))?;

        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(PipelineError::InvalidRequest(format!(
                    "unsupported URL scheme: {}",
                    other
                )));
            }
        }

        let host = url
            .host_str()
            .ok_or_else(|| PipelineError::InvalidRequest("image URL has no host".to_string()))?;

        if !host_allowed(host, allowed_domains) {
            return Err(PipelineError::DomainNotAllowed(host.to_string()));
        }

        Ok(ImageSource::Url(url))
    }

    fn parse_data_url(raw: &str) -> Result<Self, PipelineError> {
        let body = &raw["data:".len()..];
        let (meta, payload) = body.split_once(',').ok_or_else(|| {
            PipelineError::InvalidRequest("malformed data URL: missing payload".to_string())
        })?;

        if !meta.ends_with(";base64") {
            return Err(PipelineError::InvalidRequest(
                "data URL must be base64-encoded".to_string(),
            ));
        }

        let bytes = BASE64.decode(payload).map_err(|e| {
            PipelineError::InvalidRequest(format!("invalid base64 image data: {}", e))
        })?;

        if bytes.is_empty() {
            return Err(PipelineError::InvalidRequest(
                "inline image data is empty".to_string(),
            ));
        }

        Ok(ImageSource::Inline(Bytes::from(bytes)))
    }
}

impl OverlayRequest {
    /// Validate raw request parameters into an `OverlayRequest`.
    ///
    /// - `raw_source` is required and must pass [`ImageSource::parse`].
    /// - `raw_intensity` is required and must be an integer in [0, 100];
    ///   fractional values are rejected, not truncated.
    /// - A missing `raw_color` defaults to Pink (cosmetic convenience);
    ///   a present but unrecognized name fails validation.
    pub fn validate(
        raw_source: &str,
        raw_intensity: &str,
        raw_color: Option<&str>,
        output: OutputMode,
        allowed_domains: &[String],
    ) -> Result<Self, PipelineError> {
        let source = ImageSource::parse(raw_source, allowed_domains)?;

        let intensity: i64 = raw_intensity.trim().parse().map_err(|_| {
            PipelineError::InvalidRequest(format!(
                "intensity must be an integer, got {:?}",
                raw_intensity
            ))
        })?;
        if !(0..=100).contains(&intensity) {
            return Err(PipelineError::InvalidRequest(format!(
                "intensity out of range (expected 0-100): {}",
                intensity
            )));
        }

        let color = match raw_color {
            Some(name) => ColorName::from_name(name)?,
            None => ColorName::Pink,
        };

        Ok(Self {
            source,
            color,
            intensity: intensity as u8,
            output,
        })
    }
}
