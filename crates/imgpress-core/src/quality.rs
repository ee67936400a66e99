//! Lossy quality factor and the slider range it is drawn from.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Quality used when the caller has not chosen one.
pub const DEFAULT_QUALITY: f32 = 0.7;

/// Errors for out-of-range quality values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QualityError {
    #[error("Quality must be in (0, 1], got {0}")]
    OutOfRange(f32),

    #[error("Quality must be a finite number")]
    NotFinite,
}

/// A lossy-encoder quality in (0, 1].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct QualityFactor(f32);

impl QualityFactor {
    /// Validate a raw quality value.
    pub fn new(value: f32) -> Result<Self, QualityError> {
        if !value.is_finite() {
            return Err(QualityError::NotFinite);
        }
        if value <= 0.0 || value > 1.0 {
            return Err(QualityError::OutOfRange(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// Whole-number percentage, as shown next to the slider and in file names.
    pub fn percent(self) -> u32 {
        (self.0 * 100.0).round() as u32
    }

    /// Quality on the JPEG encoder's 1-100 scale.
    pub fn to_jpeg_quality(self) -> u8 {
        (self.0 * 100.0).round().clamp(1.0, 100.0) as u8
    }

    /// Coarse bucket for display.
    pub fn label(self) -> QualityLabel {
        if self.0 < 0.3 {
            QualityLabel::Low
        } else if self.0 < 0.7 {
            QualityLabel::Medium
        } else {
            QualityLabel::High
        }
    }
}

impl Default for QualityFactor {
    fn default() -> Self {
        Self(DEFAULT_QUALITY)
    }
}

impl TryFrom<f32> for QualityFactor {
    type Error = QualityError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<QualityFactor> for f32 {
    fn from(q: QualityFactor) -> f32 {
        q.0
    }
}

impl std::fmt::Display for QualityFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

/// Display bucket for a quality factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityLabel {
    Low,
    Medium,
    High,
}

impl QualityLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            QualityLabel::Low => "Low Quality",
            QualityLabel::Medium => "Medium Quality",
            QualityLabel::High => "High Quality",
        }
    }
}

/// Valid input range for the quality control.
///
/// Different front ends expose different sliders, so the range is data
/// rather than a fixed rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl QualityRange {
    /// 0.01 to 1 in steps of 0.01.
    pub const FINE: QualityRange = QualityRange {
        min: 0.01,
        max: 1.0,
        step: 0.01,
    };

    /// 0.1 to 1 in steps of 0.1.
    pub const COARSE: QualityRange = QualityRange {
        min: 0.1,
        max: 1.0,
        step: 0.1,
    };

    /// Check that the range lies inside (0, 1] and is well-formed.
    pub fn validate(&self) -> Result<(), QualityError> {
        QualityFactor::new(self.min)?;
        QualityFactor::new(self.max)?;
        if self.min > self.max {
            return Err(QualityError::OutOfRange(self.min));
        }
        if !self.step.is_finite() || self.step < 0.0 {
            return Err(QualityError::NotFinite);
        }
        Ok(())
    }

    /// Clamp arbitrary slider input into the range, snapping to `step`.
    ///
    /// Non-finite input falls back to the lower bound.
    pub fn clamp(&self, value: f32) -> QualityFactor {
        let value = if value.is_finite() { value } else { self.min };
        let clamped = value.max(self.min).min(self.max);
        if self.step <= 0.0 || clamped == self.min || clamped == self.max {
            return QualityFactor::new(clamped).unwrap_or_default();
        }
        let (min, max, step) = (self.min as f64, self.max as f64, self.step as f64);
        let steps = ((clamped as f64 - min) / step).round();
        let scale = 10f64.powi(self.step_decimals());
        let snapped = ((min + steps * step) * scale).round() / scale;
        QualityFactor::new(snapped.max(min).min(max) as f32).unwrap_or_default()
    }

    /// Decimal places of `step` as written, so snapped values land on
    /// the same decimal grid instead of accumulating float error.
    fn step_decimals(&self) -> i32 {
        let text = self.step.to_string();
        let decimals = text.split_once('.').map_or(0, |(_, frac)| frac.len());
        decimals.min(6) as i32
    }
}

impl Default for QualityRange {
    fn default() -> Self {
        Self::FINE
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
