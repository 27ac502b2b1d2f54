//! Tintframe Server Library
//!
//! This module exports the server components for use in integration tests
//! and external tooling.

pub mod config;
pub mod overlay;
pub mod pipeline;

// Re-export commonly used types
pub use config::Config;
pub use overlay::{ColorName, OverlayPlan};
pub use pipeline::{
    HttpImageFetcher, ImageFetcher, OutputMode, PipelineError, TintAppState, TintService,
    tint_routes,
};
