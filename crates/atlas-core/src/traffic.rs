//! Traffic pattern resolution.
//!
//! Maps a named traffic shape to the four coefficients the utilization model
//! consumes. The pattern table is fixed; lookups are case- and
//! space-insensitive, and resolution fails closed on unknown names or
//! non-positive coefficients.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};

/// Traffic pattern parameters used in utilization modeling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficProfile {
    pub name: String,
    /// Fraction of the day with active traffic.
    pub active_ratio: f64,
    /// GPU batching/scheduling efficiency (0-1).
    pub efficiency: f64,
    /// Peak-to-average traffic multiplier.
    pub burst_factor: f64,
    /// Batching throughput gain under sustained load.
    pub batch_mult: f64,
}

/// (name, active_ratio, efficiency, burst_factor, batch_mult)
const PATTERN_TABLE: [(&str, f64, f64, f64, f64); 3] = [
    ("steady", 1.0, 0.80, 1.0, 1.25),
    // 40 active hours out of a 168-hour week.
    ("business_hours", 0.238, 0.75, 1.0, 1.15),
    ("bursty", 0.40, 0.60, 3.0, 1.10),
];

/// Pattern names accepted by [`resolve_profile`], in sorted order.
pub fn pattern_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = PATTERN_TABLE.iter().map(|row| row.0).collect();
    names.sort_unstable();
    names
}

/// Lowercase a pattern label and replace spaces with underscores.
pub fn normalize_pattern(pattern: &str) -> String {
    pattern.trim().to_lowercase().replace(' ', "_")
}

/// Return the validated traffic profile for a pattern label.
///
/// Fails with [`EngineError::UnknownPattern`] (listing valid names) when the
/// normalized label is absent from the pattern table, and with
/// [`EngineError::InvalidInput`] when a table entry carries a non-positive
/// coefficient.
pub fn resolve_profile(pattern: &str) -> Result<TrafficProfile, EngineError> {
    let normalized = normalize_pattern(pattern);
    let row = PATTERN_TABLE
        .iter()
        .find(|row| row.0 == normalized)
        .ok_or_else(|| EngineError::UnknownPattern {
            name: pattern.to_string(),
            valid: pattern_names().join(", "),
        })?;

    let profile = TrafficProfile {
        name: normalized,
        active_ratio: row.1,
        efficiency: row.2,
        burst_factor: row.3,
        batch_mult: row.4,
    };

    for (field, value) in [
        ("active_ratio", profile.active_ratio),
        ("efficiency", profile.efficiency),
        ("burst_factor", profile.burst_factor),
        ("batch_mult", profile.batch_mult),
    ] {
        if value <= 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "Traffic pattern '{pattern}' has invalid {field}={value}. {field} must be > 0."
            )));
        }
    }

    Ok(profile)
}
