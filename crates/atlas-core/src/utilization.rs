//! Utilization estimation and multi-GPU scaling.
//!
//! Models GPU utilization under a traffic pattern and sizes the GPU count
//! needed to keep post-scaling utilization under the target threshold.
//!
//! The scaling model:
//! 1. Convert daily token volume to average tokens/second.
//! 2. Concentrate the load into the active window and inflate by the burst
//!    multiplier to get the required peak throughput.
//! 3. Derate raw GPU throughput for scheduling overhead, then credit
//!    batching gains, to get effective per-GPU throughput.
//! 4. Scale out when single-GPU utilization exceeds the target.

use crate::error::EngineError;
use crate::traffic::resolve_profile;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SECONDS_PER_DAY: f64 = 86_400.0;
pub const HOURS_PER_MONTH: f64 = 720.0;
pub const DAYS_PER_MONTH: f64 = 30.0;
/// Post-scaling utilization target the GPU count is sized against.
pub const TARGET_UTILIZATION: f64 = 0.75;

/// Computed utilization metrics for a GPU deployment under a given workload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilizationEstimate {
    pub active_hours_per_month: f64,
    pub avg_tokens_per_second_global: f64,
    pub required_peak_tokens_per_second: f64,
    pub effective_gpu_tokens_per_second: f64,
    /// Required capacity over single-GPU capacity; may exceed 1.
    pub utilization_ratio: f64,
    /// Number of GPUs needed to meet the target.
    pub gpu_count: u32,
    /// Utilization after spreading the load across `gpu_count` GPUs.
    pub utilization_after: f64,
}

/// Estimate GPU count and utilization for a workload.
///
/// `gpu_count = max(1, ceil(utilization_ratio / TARGET_UTILIZATION))`, so
/// `utilization_after` lands at or below the target except on the single-GPU
/// floor, where the load cannot be subdivided further.
pub fn estimate(
    tokens_per_day: f64,
    pattern: &str,
    gpu_tokens_per_second: f64,
    model_key: &str,
) -> Result<UtilizationEstimate, EngineError> {
    if tokens_per_day <= 0.0 {
        return Err(EngineError::InvalidInput(format!(
            "tokens_per_day must be > 0, got {tokens_per_day}."
        )));
    }
    if gpu_tokens_per_second <= 0.0 {
        return Err(EngineError::InvalidInput(format!(
            "gpu_tokens_per_second must be > 0, got {gpu_tokens_per_second}."
        )));
    }
    if model_key.is_empty() {
        return Err(EngineError::InvalidInput(
            "model_key must be a non-empty string.".to_string(),
        ));
    }

    let profile = resolve_profile(pattern)?;

    let avg_tps_global = tokens_per_day / SECONDS_PER_DAY;
    let required_peak_tps = avg_tps_global / profile.active_ratio * profile.burst_factor;
    let effective_gpu_tps = gpu_tokens_per_second * profile.efficiency * profile.batch_mult;
    let utilization_ratio = required_peak_tps / effective_gpu_tps;

    let gpu_count = ((utilization_ratio / TARGET_UTILIZATION).ceil() as u32).max(1);
    let utilization_after = utilization_ratio / gpu_count as f64;

    Ok(UtilizationEstimate {
        active_hours_per_month: HOURS_PER_MONTH * profile.active_ratio,
        avg_tokens_per_second_global: avg_tps_global,
        required_peak_tokens_per_second: required_peak_tps,
        effective_gpu_tokens_per_second: effective_gpu_tps,
        utilization_ratio,
        gpu_count,
        utilization_after,
    })
}

/// Latency risk category derived from post-scaling utilization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LatencyRisk {
    /// Utilization ≤ 50%: ample headroom.
    Low,
    /// Utilization ≤ 75%: at the scaling target.
    Medium,
    /// Utilization > 75%: approaching saturation.
    High,
}

impl fmt::Display for LatencyRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LatencyRisk::Low => write!(f, "low"),
            LatencyRisk::Medium => write!(f, "medium"),
            LatencyRisk::High => write!(f, "high"),
        }
    }
}

/// Step function from post-scaling utilization to latency risk.
pub fn latency_risk_band(utilization_after: f64) -> LatencyRisk {
    if utilization_after <= 0.50 {
        LatencyRisk::Low
    } else if utilization_after <= 0.75 {
        LatencyRisk::Medium
    } else {
        LatencyRisk::High
    }
}
