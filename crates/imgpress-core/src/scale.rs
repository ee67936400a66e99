//! Scaler stage: output dimensions that fit the configured bounds.
//!
//! The dominant edge decides which bound applies. Landscape and square
//! images are clamped by width, portrait images by height, and the other
//! edge follows the same ratio. Images are never upscaled.

use serde::{Deserialize, Serialize};

/// Default maximum output width in pixels.
pub const MAX_WIDTH: u32 = 1920;

/// Default maximum output height in pixels.
pub const MAX_HEIGHT: u32 = 1080;

/// A width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True for landscape or square dimensions.
    pub fn is_landscape(&self) -> bool {
        self.width >= self.height
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Compute output dimensions using the default 1920x1080 bounds.
pub fn scale(intrinsic_width: u32, intrinsic_height: u32) -> Dimensions {
    scale_within(
        Dimensions::new(intrinsic_width, intrinsic_height),
        MAX_WIDTH,
        MAX_HEIGHT,
    )
}

/// Compute output dimensions for `intrinsic` within the given bounds.
///
/// Only the dominant edge is checked against its bound, so a landscape image
/// that is narrower than `max_width` passes through unchanged even when it is
/// taller than `max_height`. The scaled edge is rounded half away from zero
/// and never drops below one pixel.
pub fn scale_within(intrinsic: Dimensions, max_width: u32, max_height: u32) -> Dimensions {
    let Dimensions { width, height } = intrinsic;
    if width == 0 || height == 0 {
        return intrinsic;
    }

    if intrinsic.is_landscape() {
        if width <= max_width {
            return intrinsic;
        }
        Dimensions::new(max_width, scaled_edge(height, max_width, width))
    } else {
        if height <= max_height {
            return intrinsic;
        }
        Dimensions::new(scaled_edge(width, max_height, height), max_height)
    }
}

/// `edge * numerator / denominator`, rounded, at least 1.
fn scaled_edge(edge: u32, numerator: u32, denominator: u32) -> u32 {
    let scaled = (edge as f64 * numerator as f64 / denominator as f64).round();
    (scaled as u32).max(1)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
