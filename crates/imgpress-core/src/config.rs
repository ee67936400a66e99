//! Compressor configuration.
//!
//! Missing fields deserialize to their defaults, so front ends only send
//! overrides.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::composite::WHITE;
use crate::decode::FilterType;
use crate::quality::{QualityError, QualityFactor, QualityRange, DEFAULT_QUALITY};
use crate::scale::{MAX_HEIGHT, MAX_WIDTH};

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Maximum output dimensions must be non-zero, got {width}x{height}")]
    ZeroBounds { width: u32, height: u32 },

    #[error("Invalid quality range: {0}")]
    QualityRange(#[source] QualityError),

    #[error("Default quality {0} lies outside the configured range")]
    DefaultOutsideRange(f32),
}

/// Tunables for the recompression pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompressorConfig {
    /// Width bound for landscape and square images.
    pub max_width: u32,
    /// Height bound for portrait images.
    pub max_height: u32,
    /// RGB color transparent pixels resolve to.
    pub background: [u8; 3],
    /// Accepted slider input.
    pub quality_range: QualityRange,
    /// Quality before the user touches the slider.
    pub default_quality: f32,
    /// Resampling filter used when drawing the source at its output size.
    pub filter: FilterType,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            max_width: MAX_WIDTH,
            max_height: MAX_HEIGHT,
            background: WHITE,
            quality_range: QualityRange::default(),
            default_quality: DEFAULT_QUALITY,
            filter: FilterType::default(),
        }
    }
}

impl CompressorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_width == 0 || self.max_height == 0 {
            return Err(ConfigError::ZeroBounds {
                width: self.max_width,
                height: self.max_height,
            });
        }
        self.quality_range
            .validate()
            .map_err(ConfigError::QualityRange)?;

        let range = &self.quality_range;
        if !(range.min..=range.max).contains(&self.default_quality) {
            return Err(ConfigError::DefaultOutsideRange(self.default_quality));
        }
        Ok(())
    }

    /// The starting quality, clamped into the configured range.
    pub fn initial_quality(&self) -> QualityFactor {
        self.quality_range.clamp(self.default_quality)
    }
}
