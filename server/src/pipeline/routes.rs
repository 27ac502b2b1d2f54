//! HTTP route handlers for the tint API

use axum::{
    Json, Router,
    body::Body,
    extract::{Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::overlay::{ColorListItem, ColorName};

use super::service::TintService;
use super::types::{OutputMode, PipelineError, ProcessedImage};

/// Application state containing the tint service
#[derive(Clone)]
pub struct TintAppState {
    pub tint_service: Arc<TintService>,
}

/// Error response for the tint API
#[derive(Debug, Serialize)]
pub struct TintErrorResponse {
    pub error: String,
    pub code: String,
}

impl From<PipelineError> for TintErrorResponse {
    fn from(e: PipelineError) -> Self {
        let code = match &e {
            PipelineError::InvalidRequest(_) => "invalid_request",
            PipelineError::DomainNotAllowed(_) => "domain_not_allowed",
            PipelineError::FetchFailed(_) => "fetch_failed",
            PipelineError::DecodeFailed(_) => "decode_failed",
            PipelineError::CompositeFailed(_) => "composite_failed",
            PipelineError::EncodeFailed(_) => "encode_failed",
        };
        Self {
            error: e.to_string(),
            code: code.to_string(),
        }
    }
}

impl IntoResponse for TintErrorResponse {
    fn into_response(self) -> Response {
        let status = match self.code.as_str() {
            "invalid_request" | "fetch_failed" | "decode_failed" => StatusCode::BAD_REQUEST,
            "domain_not_allowed" => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Query parameters for GET /api/tint
#[derive(Debug, Deserialize)]
pub struct TintQueryParams {
    /// Remote image URL (http/https on an allow-listed host) or a
    /// base64 data URL
    #[serde(alias = "imageUrl")]
    pub url: Option<String>,
    /// Integer intensity 0-100, required
    pub intensity: Option<String>,
    /// Palette color name; defaults to Pink when absent
    pub color: Option<String>,
    /// Emit as attachment download instead of inline preview
    pub download: Option<bool>,
}

/// GET /api/tint - Apply a color overlay to an image and return PNG
pub async fn tint_image(
    State(state): State<TintAppState>,
    Query(params): Query<TintQueryParams>,
) -> Response {
    let Some(raw_url) = params.url.as_deref() else {
        return TintErrorResponse::from(PipelineError::InvalidRequest(
            "missing url parameter".to_string(),
        ))
        .into_response();
    };
    let Some(raw_intensity) = params.intensity.as_deref() else {
        return TintErrorResponse::from(PipelineError::InvalidRequest(
            "missing intensity parameter".to_string(),
        ))
        .into_response();
    };

    let output = if params.download.unwrap_or(false) {
        OutputMode::AttachmentDownload
    } else {
        OutputMode::InlinePreview
    };

    let request = match state.tint_service.validate(
        raw_url,
        raw_intensity,
        params.color.as_deref(),
        output,
    ) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!("Rejected tint request: {}", e);
            return TintErrorResponse::from(e).into_response();
        }
    };

    match state.tint_service.process(&request).await {
        Ok(image) => png_response(image, &state),
        Err(e) => {
            // Client-correctable failures are expected traffic; only
            // post-decode processing failures are server errors.
            match &e {
                PipelineError::CompositeFailed(_) | PipelineError::EncodeFailed(_) => {
                    tracing::error!("Tint processing failed: {}", e);
                }
                _ => {
                    tracing::warn!("Tint request failed: {}", e);
                }
            }
            TintErrorResponse::from(e).into_response()
        }
    }
}

/// Build the success response with disposition and cache policy
fn png_response(image: ProcessedImage, state: &TintAppState) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("image/png"));

    match image.output {
        OutputMode::AttachmentDownload => {
            let filename = image.filename.as_deref().unwrap_or("tinted.png");
            match HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename)) {
                Ok(value) => {
                    headers.insert(header::CONTENT_DISPOSITION, value);
                }
                Err(e) => {
                    tracing::error!("Invalid attachment filename {:?}: {}", filename, e);
                    return TintErrorResponse::from(PipelineError::EncodeFailed(
                        "failed to build response headers".to_string(),
                    ))
                    .into_response();
                }
            }
            headers.insert(
                header::CACHE_CONTROL,
                HeaderValue::from_static("no-cache, no-store, must-revalidate"),
            );
        }
        OutputMode::InlinePreview => {
            let cache = format!(
                "public, max-age={}",
                state.tint_service.preview_max_age_secs()
            );
            if let Ok(value) = HeaderValue::from_str(&cache) {
                headers.insert(header::CACHE_CONTROL, value);
            }
        }
    }

    (StatusCode::OK, headers, Body::from(image.png)).into_response()
}

/// GET /api/tint/colors - List the overlay color palette
pub async fn list_colors() -> Json<Vec<ColorListItem>> {
    Json(ColorName::list())
}

/// Build tint API routes
pub fn tint_routes(state: TintAppState) -> Router {
    Router::new()
        .route("/tint", get(tint_image))
        .route("/tint/colors", get(list_colors))
        .with_state(state)
}
