//! JPEG encoding of composited images.
//!
//! JPEG is the single lossy target. It has no alpha channel, so only
//! flattened RGB images are accepted here.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use thiserror::Error;

use crate::quality::QualityFactor;

/// MIME type of every encoded output.
pub const MIME_TYPE: &str = "image/jpeg";

/// File extension of every encoded output.
pub const EXTENSION: &str = "jpg";

/// Errors that can occur during JPEG encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder reported an error
    #[error("JPEG encoding failed: {0}")]
    EncodingFailed(String),

    /// The encoder finished without producing any bytes
    #[error("Encoder produced no output")]
    EmptyOutput,
}

/// Encode RGB pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality (1-100); values outside are clamped
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = width as usize * height as usize * 3;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }

    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100))
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    let bytes = buffer.into_inner();
    if bytes.is_empty() {
        return Err(EncodeError::EmptyOutput);
    }
    Ok(bytes)
}

/// Encode a flattened image at the given quality factor.
pub fn encode_rgb(image: &RgbImage, quality: QualityFactor) -> Result<Vec<u8>, EncodeError> {
    encode_jpeg(
        image.as_raw(),
        image.width(),
        image.height(),
        quality.to_jpeg_quality(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::test_support::gradient;
    use image::{DynamicImage, Rgb};

    fn q(value: f32) -> QualityFactor {
        QualityFactor::new(value).unwrap()
    }

    fn detailed(width: u32, height: u32) -> RgbImage {
        DynamicImage::ImageRgba8(gradient(width, height)).into_rgb8()
    }

    #[test]
    fn test_encode_jpeg_markers() {
        let pixels = vec![128u8; 64 * 48 * 3];
        let jpeg = encode_jpeg(&pixels, 64, 48, 80).unwrap();

        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
        assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_encode_jpeg_clamps_quality() {
        let pixels = vec![128u8; 10 * 10 * 3];
        assert!(encode_jpeg(&pixels, 10, 10, 0).is_ok());
        assert!(encode_jpeg(&pixels, 10, 10, 255).is_ok());
    }

    #[test]
    fn test_encode_jpeg_rejects_wrong_length() {
        let pixels = vec![128u8; 99 * 100 * 3];
        assert!(matches!(
            encode_jpeg(&pixels, 100, 100, 90),
            Err(EncodeError::InvalidPixelData { .. })
        ));
    }

    #[test]
    fn test_encode_jpeg_rejects_zero_dimension() {
        assert!(matches!(
            encode_jpeg(&[], 0, 100, 90),
            Err(EncodeError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            encode_jpeg(&[], 100, 0, 90),
            Err(EncodeError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_encode_rgb() {
        let img = RgbImage::from_pixel(32, 16, Rgb([200, 100, 50]));
        let jpeg = encode_rgb(&img, q(0.7)).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);

        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (32, 16));
    }

    #[test]
    fn test_lower_quality_is_smaller_for_detailed_image() {
        let img = detailed(128, 128);
        let low = encode_rgb(&img, q(0.1)).unwrap();
        let high = encode_rgb(&img, q(1.0)).unwrap();
        assert!(low.len() < high.len(), "low={} high={}", low.len(), high.len());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use image::{DynamicImage, Rgb};
    use proptest::prelude::*;

    proptest! {
        /// Property: any non-empty image encodes to a framed JPEG.
        #[test]
        fn prop_valid_image_encodes(
            (width, height) in (1u32..=40, 1u32..=40),
            quality in 0.01f32..=1.0,
            rgb in any::<[u8; 3]>(),
        ) {
            let img = RgbImage::from_pixel(width, height, Rgb(rgb));
            let jpeg = encode_rgb(&img, QualityFactor::new(quality).unwrap()).unwrap();
            prop_assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
            prop_assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
        }

        /// Property: encoding is deterministic.
        #[test]
        fn prop_deterministic((width, height) in (1u32..=20, 1u32..=20), quality in 1u8..=100) {
            let pixels = vec![90u8; (width * height * 3) as usize];
            let a = encode_jpeg(&pixels, width, height, quality).unwrap();
            let b = encode_jpeg(&pixels, width, height, quality).unwrap();
            prop_assert_eq!(a, b);
        }

        /// Property: quality rarely increases size on detailed content.
        #[test]
        fn prop_quality_monotone_on_average((width, height) in (24u32..=48, 24u32..=48)) {
            let img = DynamicImage::ImageRgba8(crate::test_support::gradient(width, height)).into_rgb8();
            let sizes: Vec<usize> = [0.1f32, 0.4, 0.7, 1.0]
                .iter()
                .map(|&v| encode_rgb(&img, QualityFactor::new(v).unwrap()).unwrap().len())
                .collect();
            // Allow small encoder-dependent wobble between neighbours.
            for pair in sizes.windows(2) {
                prop_assert!(pair[1] as f64 >= pair[0] as f64 * 0.9, "sizes={:?}", sizes);
            }
        }
    }
}
