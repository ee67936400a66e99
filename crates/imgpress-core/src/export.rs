//! Suggested file names for saving a recompressed result.

use crate::encode::EXTENSION;
use crate::quality::QualityFactor;

/// `{base}-compressed-{percent}pct.jpg`
pub fn suggested_file_name(base_name: &str, quality: QualityFactor) -> String {
    format!("{base_name}-compressed-{}pct.{EXTENSION}", quality.percent())
}
