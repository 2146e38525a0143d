//! Ranking penalties for overload, over-scaling, and latency risk.
//!
//! Penalties are synthetic dollar amounts added to true monthly cost purely
//! as a ranking signal; they never appear in a cost breakdown. Each
//! component triggers independently and the total is their sum.

use crate::utilization::LatencyRisk;

/// Post-scaling utilization where the overload ramp starts.
pub const OVERLOAD_THRESHOLD: f64 = 0.90;
/// Width of the overload ramp; the penalty reaches its full amount at
/// threshold + width (100% utilization).
pub const OVERLOAD_RAMP_WIDTH: f64 = 0.10;
/// Overload penalty at 100% post-scaling utilization.
pub const OVERLOAD_PENALTY_FULL: f64 = 20_000.0;
/// Largest single-deployment GPU fan-out before the scaling penalty applies.
pub const MAX_GPUS: u32 = 8;
/// Penalty per GPU beyond [`MAX_GPUS`].
pub const OVERSCALE_PENALTY_PER_GPU: f64 = 50_000.0;
/// Flat penalty when a strict latency requirement meets high latency risk.
pub const STRICT_LATENCY_PENALTY: f64 = 30_000.0;
/// Latency requirements under this bound count as strict.
pub const STRICT_LATENCY_MS: f64 = 300.0;

/// Compute the total ranking penalty for one candidate configuration.
///
/// Components:
/// 1. Overload: linear ramp from $0 at 90% post-scaling utilization to
///    $20k at 100% (and beyond, for ratios above 1).
/// 2. Over-scaling: $50k per GPU beyond the 8-GPU ceiling.
/// 3. Strict latency: flat $30k when the caller requires < 300 ms and the
///    candidate's latency risk is high.
pub fn compute_penalty(
    utilization_after: f64,
    gpu_count: u32,
    latency_risk: LatencyRisk,
    strict_latency_required: bool,
) -> f64 {
    let mut penalty = 0.0;

    if utilization_after > OVERLOAD_THRESHOLD {
        penalty +=
            OVERLOAD_PENALTY_FULL * ((utilization_after - OVERLOAD_THRESHOLD) / OVERLOAD_RAMP_WIDTH);
    }

    if gpu_count > MAX_GPUS {
        penalty += OVERSCALE_PENALTY_PER_GPU * (gpu_count - MAX_GPUS) as f64;
    }

    if latency_risk == LatencyRisk::High && strict_latency_required {
        penalty += STRICT_LATENCY_PENALTY;
    }

    penalty
}
