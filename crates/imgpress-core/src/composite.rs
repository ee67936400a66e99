//! Compositor stage: flatten a raster onto an opaque background.
//!
//! The output is an RGB image of exactly the target dimensions, so it cannot
//! carry transparency into the JPEG encoder. Transparent source pixels take
//! the background color instead of collapsing to black.

use image::{Rgb, RgbImage};

use crate::decode::{FilterType, Raster};
use crate::scale::Dimensions;

/// Default background.
pub const WHITE: [u8; 3] = [255, 255, 255];

/// Composite `raster` over a solid `background`, stretched to `target`.
///
/// Blending happens at source resolution and the flattened image is then
/// resampled, which matches drawing a premultiplied source onto a filled
/// canvas of the target size. The pipeline rejects malformed rasters before
/// they get here.
pub fn composite(
    raster: &Raster,
    target: Dimensions,
    background: [u8; 3],
    filter: FilterType,
) -> RgbImage {
    let Some(flat) = flatten(raster, background) else {
        tracing::warn!(
            width = raster.width,
            height = raster.height,
            len = raster.pixels.len(),
            "raster buffer does not match its dimensions; emitting background only"
        );
        return RgbImage::from_pixel(target.width, target.height, Rgb(background));
    };

    if flat.dimensions() == (target.width, target.height) {
        return flat;
    }
    image::imageops::resize(&flat, target.width, target.height, filter.to_image_filter())
}

/// Blend every pixel over `background`, dropping alpha.
fn flatten(raster: &Raster, background: [u8; 3]) -> Option<RgbImage> {
    if !raster.is_well_formed() {
        return None;
    }

    let mut rgb = Vec::with_capacity(raster.pixel_count() * 3);
    for px in raster.pixels.chunks_exact(Raster::CHANNELS) {
        let alpha = px[3] as u32;
        for (channel, bg) in px[..3].iter().zip(background) {
            rgb.push(blend(*channel, bg, alpha));
        }
    }
    RgbImage::from_raw(raster.width, raster.height, rgb)
}

/// Source-over blend of one channel with straight alpha, rounded.
#[inline]
fn blend(src: u8, bg: u8, alpha: u32) -> u8 {
    ((src as u32 * alpha + bg as u32 * (255 - alpha) + 127) / 255) as u8
}


// ============================================================================
// Property-Based Tests
// ============================================================================
