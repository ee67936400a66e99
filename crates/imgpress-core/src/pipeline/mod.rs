//! Recompression pipeline: decode, scale, composite, encode.
//!
//! # Architecture
//!
//! Decoding and encoding are modelled as asynchronous operations behind the
//! [`ImageDecoder`] and [`ImageEncoder`] traits, so a host can plug in its
//! own facilities (a browser's image decoder, a worker, a test double) and
//! the [`Pipeline`] composes them uniformly. Scaling and compositing are
//! synchronous and never suspend.
//!
//! The futures are not `Send`: everything runs on one logical thread, and
//! the [`Controller`] relies on that for its unlocked state.

mod controller;

pub use controller::{Controller, Delivery, Generation, Ticket};

use image::RgbImage;
use thiserror::Error;

use crate::composite::composite;
use crate::config::CompressorConfig;
use crate::decode::{decode_raster, DecodeError, Raster};
use crate::encode::{encode_rgb, EncodeError, Encoded};
use crate::quality::QualityFactor;
use crate::scale::{scale_within, Dimensions};
use crate::source::SourceImage;

/// Failure of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("Decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("Encode failed: {0}")]
    Encode(#[from] EncodeError),
}

/// Asynchronous decoding facility.
#[allow(async_fn_in_trait)]
pub trait ImageDecoder {
    /// Decode a complete source buffer. No partial results on failure.
    async fn decode(&self, bytes: &[u8]) -> Result<Raster, DecodeError>;
}

/// Asynchronous lossy encoding facility.
#[allow(async_fn_in_trait)]
pub trait ImageEncoder {
    /// Encode a flattened image. An empty buffer counts as a failure.
    async fn encode(&self, image: &RgbImage, quality: QualityFactor)
        -> Result<Vec<u8>, EncodeError>;
}

/// Decoder and encoder backed by the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostCodec;

impl ImageDecoder for HostCodec {
    async fn decode(&self, bytes: &[u8]) -> Result<Raster, DecodeError> {
        decode_raster(bytes)
    }
}

impl ImageEncoder for HostCodec {
    async fn encode(
        &self,
        image: &RgbImage,
        quality: QualityFactor,
    ) -> Result<Vec<u8>, EncodeError> {
        encode_rgb(image, quality)
    }
}

/// Output of one successful run. Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RecompressionResult {
    encoded: Encoded,
    dimensions: Dimensions,
    quality: QualityFactor,
}

impl RecompressionResult {
    pub fn encoded_buffer(&self) -> &[u8] {
        &self.encoded.buffer
    }

    /// Self-contained `data:` URL of the encoded buffer.
    pub fn preview_string(&self) -> &str {
        &self.encoded.preview
    }

    pub fn byte_size(&self) -> usize {
        self.encoded.buffer.len()
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn quality(&self) -> QualityFactor {
        self.quality
    }

    /// Take ownership of the encoded bytes, e.g. to hand them to a save dialog.
    pub fn into_buffer(self) -> Vec<u8> {
        self.encoded.buffer
    }
}

/// Decoder -> Scaler -> Compositor -> Encoder for one (source, quality) pair.
#[derive(Debug, Clone)]
pub struct Pipeline<D, E> {
    decoder: D,
    encoder: E,
    config: CompressorConfig,
}

impl Pipeline<HostCodec, HostCodec> {
    /// Pipeline using the `image` crate for both suspension points.
    pub fn host(config: CompressorConfig) -> Self {
        Self::new(HostCodec, HostCodec, config)
    }
}

impl<D, E> Pipeline<D, E> {
    pub fn config(&self) -> &CompressorConfig {
        &self.config
    }
}

impl<D: ImageDecoder, E: ImageEncoder> Pipeline<D, E> {
    pub fn new(decoder: D, encoder: E, config: CompressorConfig) -> Self {
        Self {
            decoder,
            encoder,
            config,
        }
    }

    /// Run every stage for `source` at `quality`.
    ///
    /// The decoded and composited rasters are dropped before this returns;
    /// only the encoded bytes survive.
    pub async fn run(
        &self,
        source: &SourceImage,
        quality: QualityFactor,
    ) -> Result<RecompressionResult, PipelineError> {
        let raster = self.decoder.decode(source.bytes()).await?;
        let intrinsic = Dimensions::new(raster.width, raster.height);
        if raster.width == 0 || raster.height == 0 {
            return Err(DecodeError::ZeroSized {
                width: intrinsic.width,
                height: intrinsic.height,
            }
            .into());
        }
        if !raster.is_well_formed() {
            return Err(DecodeError::MalformedRaster {
                expected: raster.pixel_count() * Raster::CHANNELS,
                actual: raster.pixels.len(),
            }
            .into());
        }

        let target = scale_within(intrinsic, self.config.max_width, self.config.max_height);
        tracing::debug!(
            %intrinsic,
            %target,
            translucent = raster.translucent_pixels(),
            "scaled source"
        );

        let flat = composite(&raster, target, self.config.background, self.config.filter);
        drop(raster);

        let buffer = self.encoder.encode(&flat, quality).await?;
        let encoded = Encoded::from_buffer(buffer)?;
        tracing::debug!(bytes = encoded.buffer.len(), %quality, "encoded output");

        Ok(RecompressionResult {
            encoded,
            dimensions: target,
            quality,
        })
    }
}
