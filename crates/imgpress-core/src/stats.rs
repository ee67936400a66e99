//! Human-readable size statistics for the original/recompressed pair.

use serde::{Deserialize, Serialize};

const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
const KIB: f64 = 1024.0;

/// Format a byte count with base-1024 units and at most two decimals.
///
/// Trailing zeros are trimmed, so `1536` becomes `"1.5 KB"` and `2048`
/// becomes `"2 KB"`. Sizes past the gigabyte range stay in GB.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= KIB && unit < UNITS.len() - 1 {
        value /= KIB;
        unit += 1;
    }
    format!("{} {}", trim_decimals(value), UNITS[unit])
}

fn trim_decimals(value: f64) -> String {
    let fixed = format!("{value:.2}");
    fixed
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Percentage saved by the recompressed variant, or `None` when either side is unknown.
///
/// Negative values mean the "compressed" output grew.
pub fn savings_percent(original: u64, compressed: u64) -> Option<f64> {
    if original == 0 || compressed == 0 {
        return None;
    }
    Some((original as f64 - compressed as f64) / original as f64 * 100.0)
}

/// Sizes and savings for display next to the comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeStats {
    pub original_bytes: u64,
    pub compressed_bytes: u64,
    pub original: String,
    pub compressed: String,
    /// Savings with one decimal, e.g. `"42.5%"`, or `"-"` when unknown.
    pub savings: String,
}

impl SizeStats {
    pub fn new(original_bytes: u64, compressed_bytes: u64) -> Self {
        let savings = savings_percent(original_bytes, compressed_bytes)
            .map(|pct| format!("{pct:.1}%"))
            .unwrap_or_else(|| "-".to_string());
        Self {
            original_bytes,
            compressed_bytes,
            original: format_size(original_bytes),
            compressed: format_size(compressed_bytes),
            savings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size_units() {
        assert_eq!(format_size(0), "0 Bytes");
        assert_eq!(format_size(1), "1 Bytes");
        assert_eq!(format_size(1023), "1023 Bytes");
        assert_eq!(format_size(1024), "1 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1_048_576), "1 MB");
        assert_eq!(format_size(5 * 1024 * 1024 + 123_456), "5.12 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3 GB");
    }

    #[test]
    fn test_format_size_caps_at_gb() {
        assert_eq!(format_size(2 * 1024u64.pow(4)), "2048 GB");
    }

    #[test]
    fn test_savings_percent() {
        assert_eq!(savings_percent(1000, 250), Some(75.0));
        assert_eq!(savings_percent(1000, 1000), Some(0.0));
        assert_eq!(savings_percent(1000, 1500), Some(-50.0));
        assert_eq!(savings_percent(0, 10), None);
        assert_eq!(savings_percent(10, 0), None);
    }

    #[test]
    fn test_size_stats() {
        let stats = SizeStats::new(2048, 512);
        assert_eq!(stats.original, "2 KB");
        assert_eq!(stats.compressed, "512 Bytes");
        assert_eq!(stats.savings, "75.0%");

        assert_eq!(SizeStats::new(2048, 0).savings, "-");
    }
}
