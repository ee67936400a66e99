//! Core types for image decoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for image decoding operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The source buffer has no bytes at all.
    #[error("Source buffer is empty")]
    Empty,

    /// The file format is not recognized or supported.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// The pixel buffer length does not match the reported dimensions.
    #[error("Decoded pixel buffer has {actual} bytes, expected {expected}")]
    MalformedRaster { expected: usize, actual: usize },

    /// The decoded image has a zero width or height.
    #[error("Decoded image has no pixels ({width}x{height})")]
    ZeroSized { width: u32, height: u32 },
}

/// Filter type for image resizing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    #[default]
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Orientation {
    /// Normal (no transformation needed).
    #[default]
    Normal = 1,
    /// Horizontal flip.
    FlipHorizontal = 2,
    /// Rotate 180 degrees.
    Rotate180 = 3,
    /// Vertical flip.
    FlipVertical = 4,
    /// Transpose (flip horizontal + rotate 270 CW).
    Transpose = 5,
    /// Rotate 90 degrees clockwise.
    Rotate90CW = 6,
    /// Transverse (flip horizontal + rotate 90 CW).
    Transverse = 7,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270CW = 8,
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// A decoded pixel raster with RGBA samples.
///
/// Rasters only live for the duration of one pipeline run. Every raster is
/// stored as 8-bit RGBA so that transparency survives decoding and can be
/// resolved against the background during compositing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    /// Length should be width * height * 4.
    pub pixels: Vec<u8>,
}

impl Raster {
    /// Bytes per pixel in the RGBA layout.
    pub const CHANNELS: usize = 4;

    /// Create a new Raster with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * Self::CHANNELS,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a raster where every pixel has the same RGBA value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let pixels = rgba.iter().copied().cycle().take(count * Self::CHANNELS).collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a Raster from an image::RgbaImage.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// True when the buffer holds exactly `width * height` RGBA pixels.
    pub fn is_well_formed(&self) -> bool {
        self.pixels.len() == self.pixel_count() * Self::CHANNELS
    }

    /// Number of pixels whose alpha is below fully opaque.
    pub fn translucent_pixels(&self) -> usize {
        self.pixels
            .chunks_exact(Self::CHANNELS)
            .filter(|px| px[3] != u8::MAX)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_type_conversion() {
        assert!(matches!(
            FilterType::Nearest.to_image_filter(),
            image::imageops::FilterType::Nearest
        ));
        assert!(matches!(
            FilterType::Bilinear.to_image_filter(),
            image::imageops::FilterType::Triangle
        ));
        assert!(matches!(
            FilterType::Lanczos3.to_image_filter(),
            image::imageops::FilterType::Lanczos3
        ));
    }

    #[test]
    fn test_orientation_from_u32() {
        assert_eq!(Orientation::from(1), Orientation::Normal);
        assert_eq!(Orientation::from(6), Orientation::Rotate90CW);
        assert_eq!(Orientation::from(99), Orientation::Normal);
    }

    #[test]
    fn test_raster_filled() {
        let raster = Raster::filled(3, 2, [10, 20, 30, 255]);
        assert_eq!(raster.pixels.len(), 3 * 2 * 4);
        assert_eq!(&raster.pixels[4..8], &[10, 20, 30, 255]);
        assert_eq!(raster.translucent_pixels(), 0);
    }

    #[test]
    fn test_raster_translucent_count() {
        let raster = Raster::new(2, 1, vec![0, 0, 0, 0, 9, 9, 9, 255]);
        assert_eq!(raster.translucent_pixels(), 1);
    }

    #[test]
    fn test_raster_well_formed() {
        assert!(Raster::filled(3, 3, [0; 4]).is_well_formed());
        let short = Raster {
            width: 4,
            height: 4,
            pixels: vec![0; 7],
        };
        assert!(!short.is_well_formed());
    }

    #[test]
    fn test_decode_error_display() {
        assert_eq!(DecodeError::Empty.to_string(), "Source buffer is empty");
        assert_eq!(
            DecodeError::InvalidFormat.to_string(),
            "Invalid or unsupported image format"
        );
    }
}
