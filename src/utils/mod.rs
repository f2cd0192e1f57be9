//! Utilities module for logging, metrics, and helper functions
//!
//! This module provides:
//! - Structured logging with tracing
//! - Batch metrics (categorical accuracy) and the named-metric registry
//! - Error handling types
//! - Small formatting helpers for CLI output

use std::time::Duration;

pub mod error;
pub mod logging;
pub mod metrics;

// Re-export main types for convenience
pub use error::{FashionNetError, Result};
pub use logging::init_logging;
pub use metrics::{categorical_accuracy, named_metric, MetricFn, METRIC_NAMES};

/// Short human-readable form of an elapsed time, e.g. `4.2s`, `3m 07s`, `1h 12m`
pub fn format_duration(elapsed: Duration) -> String {
    match elapsed.as_secs() {
        0..=59 => format!("{:.1}s", elapsed.as_secs_f64()),
        secs @ 60..=3599 => format!("{}m {:02}s", secs / 60, secs % 60),
        secs => format!("{}h {}m", secs / 3600, secs % 3600 / 60),
    }
}

/// Image count with comma-separated thousands
pub fn format_number(n: usize) -> String {
    let digits = n.to_string();
    let head = digits.len() % 3;

    let mut groups = Vec::with_capacity(digits.len() / 3 + 1);
    if head > 0 {
        groups.push(&digits[..head]);
    }
    for start in (head..digits.len()).step_by(3) {
        groups.push(&digits[start..start + 3]);
    }
    groups.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(30_500)), "30.5s");
        assert_eq!(format_duration(Duration::from_secs(187)), "3m 07s");
        assert_eq!(format_duration(Duration::from_secs(3_661)), "1h 1m");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_000), "1,000");
        assert_eq!(format_number(12_345_678), "12,345,678");
    }
}
