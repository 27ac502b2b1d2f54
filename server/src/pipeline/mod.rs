//! Image processing pipeline
//!
//! This module provides:
//! - `ImageFetcher` trait for abstracting image acquisition
//! - `HttpImageFetcher` for fetching from allow-listed hosts over HTTP
//! - `TintService` orchestrating validate/acquire/decode/composite/encode
//! - HTTP routes for serving tinted PNGs

pub mod composite;
mod fetch;
pub mod routes;
mod service;
mod types;

pub use fetch::{HttpImageFetcher, ImageFetcher};
pub use routes::{TintAppState, tint_routes};
pub use service::TintService;
pub use types::{ImageSource, OutputMode, OverlayRequest, PipelineError, ProcessedImage};
