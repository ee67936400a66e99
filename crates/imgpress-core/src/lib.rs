//! imgpress Core - Image recompression library
//!
//! This crate turns a user-selected image into a bounded, opaque JPEG with a
//! tunable quality factor, and keeps the result consistent while the quality
//! changes faster than recompression completes.
//!
//! # Stages
//!
//! - `decode` - Source bytes to an RGBA raster (EXIF orientation applied)
//! - `scale` - Output dimensions within 1920x1080
//! - `composite` - Flatten onto an opaque background at the output size
//! - `encode` - JPEG bytes plus a `data:` URL preview
//! - `pipeline` - The stages composed, and the generation-tagged [`Controller`]

pub mod composite;
pub mod config;
pub mod decode;
pub mod encode;
pub mod export;
pub mod pipeline;
pub mod quality;
pub mod scale;
pub mod source;
pub mod stats;

#[cfg(test)]
mod test_support;

pub use config::{CompressorConfig, ConfigError};
pub use decode::{DecodeError, FilterType, Raster};
pub use encode::EncodeError;
pub use export::suggested_file_name;
pub use pipeline::{
    Controller, Delivery, Generation, HostCodec, ImageDecoder, ImageEncoder, Pipeline,
    PipelineError, RecompressionResult, Ticket,
};
pub use quality::{QualityError, QualityFactor, QualityLabel, QualityRange, DEFAULT_QUALITY};
pub use scale::{scale, Dimensions, MAX_HEIGHT, MAX_WIDTH};
pub use source::{SourceError, SourceImage};
pub use stats::{format_size, savings_percent, SizeStats};

/// Controller backed by the `image` crate for decoding and encoding.
pub type HostController = Controller<HostCodec, HostCodec>;
