//! Overlay compute engine
//!
//! Pure functions mapping a palette color and a 0-100 intensity to the
//! compositing parameters for a tint overlay. No network or file access.

pub mod color;
pub mod plan;

use thiserror::Error;

pub use color::{ColorListItem, ColorName};
pub use plan::{BlendMode, OverlayPlan, blend_mode, compute_alpha};

/// Errors from overlay plan computation
#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("Unknown color: {0}")]
    InvalidColor(String),

    #[error("Intensity out of range (expected 0-100): {0}")]
    InvalidIntensity(i64),
}
