//! Raster decoding with format sniffing and EXIF orientation handling.
//!
//! The declared MIME type of a source is never trusted for decoding: the
//! container format is guessed from magic bytes, so a mislabelled upload
//! still decodes as long as its content is a supported encoding.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageFormat, ImageReader};

use super::{DecodeError, Orientation, Raster};

/// Decode an encoded image buffer into an RGBA raster.
///
/// EXIF orientation is applied for JPEG input so the raster matches what a
/// browser would draw for the same file. Transparency is preserved.
///
/// # Errors
///
/// Returns `DecodeError::Empty` for a zero-byte buffer,
/// `DecodeError::InvalidFormat` when no supported format is recognized, and
/// `DecodeError::CorruptedFile` when the data is truncated or malformed.
pub fn decode_raster(bytes: &[u8]) -> Result<Raster, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let format = reader.format().ok_or(DecodeError::InvalidFormat)?;

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let img = if format == ImageFormat::Jpeg {
        apply_orientation(img, extract_orientation(bytes))
    } else {
        img
    };

    let rgba = img.into_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(DecodeError::ZeroSized { width, height });
    }
    Ok(Raster::from_rgba_image(rgba))
}

/// Extract EXIF orientation from JPEG bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
pub fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

/// Apply EXIF orientation transformation to an image.
fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
