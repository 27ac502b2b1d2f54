//! Common Test Utilities for Integration Tests
//!
//! Shared helpers used across integration test modules.

use async_trait::async_trait;
use axum::{Json, Router, routing::get};
use bytes::Bytes;
use image::{Rgba, RgbaImage};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tintframe_server::Config;
use tintframe_server::pipeline::{
    ImageFetcher, PipelineError, TintAppState, TintService, composite, tint_routes,
};
use tower_http::cors::{Any, CorsLayer};
use url::Url;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Mock fetcher with a call counter, so tests can assert that rejected
/// requests never reach the network
pub struct MockFetcher {
    calls: AtomicUsize,
    body: Bytes,
    fail_status: Option<u16>,
}

impl MockFetcher {
    /// Fetcher that returns `body` successfully
    pub fn ok(body: Bytes) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            body,
            fail_status: None,
        })
    }

    /// Fetcher that fails every request with an upstream HTTP status
    pub fn http_error(status: u16) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            body: Bytes::new(),
            fail_status: Some(status),
        })
    }

    /// Number of fetch calls made so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageFetcher for MockFetcher {
    async fn fetch(&self, _url: &Url) -> Result<Bytes, PipelineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = self.fail_status {
            return Err(PipelineError::FetchFailed(format!(
                "upstream returned HTTP {}",
                status
            )));
        }
        Ok(self.body.clone())
    }
}

/// A small test source image with distinguishable pixels
pub fn test_source_image() -> RgbaImage {
    RgbaImage::from_fn(8, 8, |x, y| Rgba([(x * 30) as u8, (y * 30) as u8, 200, 255]))
}

/// The test source image encoded as PNG bytes
pub fn test_source_png() -> Bytes {
    Bytes::from(composite::encode_png(&test_source_image()).expect("encode test png"))
}

/// Create a test application router around a mock fetcher.
/// Uses the default config, so `pbs.twimg.com` is allow-listed.
pub fn create_test_app(fetcher: Arc<MockFetcher>) -> Router {
    let tint_service = Arc::new(TintService::new(fetcher, &Config::default()));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .nest("/api", tint_routes(TintAppState { tint_service }))
        .layer(cors)
}
