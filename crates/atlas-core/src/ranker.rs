//! Recommendation ranking.
//!
//! Enumerates every platform/option combination, filters memory-infeasible
//! pairings, scores each survivor as monthly cost plus ranking penalty, and
//! returns the cheapest `top_k` with human-readable reasoning.

use crate::catalog::{Catalog, Platform};
use crate::cost::{self, CostBreakdown};
use crate::error::EngineError;
use crate::penalty::{compute_penalty, STRICT_LATENCY_MS};
use crate::utilization::{self, latency_risk_band};
use serde::{Deserialize, Serialize};

/// One ranked recommendation entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Dense 1-based rank within one ranking run.
    pub rank: u32,
    pub platform: String,
    pub option: String,
    pub monthly_cost_usd: f64,
    pub reasoning: String,
    pub utilization_pct: f64,
    pub cost_per_million_tokens: f64,
    pub idle_waste_pct: f64,
}

struct Candidate {
    score: f64,
    platform: String,
    option: String,
    cost: CostBreakdown,
    reasoning: String,
    utilization_pct: f64,
}

/// Return the top-k recommendations ordered by cost plus penalties.
///
/// Memory-infeasible platform/GPU pairs are silently skipped; every other
/// error aborts the call: memory incompatibility is an expected filtering
/// condition, anything else is a caller or catalog bug. Fails with
/// [`EngineError::NoFeasibleCandidate`] when no candidate survives.
pub fn rank(
    catalog: &Catalog,
    tokens_per_day: f64,
    pattern: &str,
    model_key: &str,
    latency_requirement_ms: Option<f64>,
    top_k: usize,
) -> Result<Vec<Recommendation>, EngineError> {
    let strict_latency_required = latency_requirement_ms.is_some_and(|ms| ms < STRICT_LATENCY_MS);
    let mut candidates: Vec<Candidate> = Vec::new();

    // GPU-backed offerings.
    for (platform_key, platform) in &catalog.platforms {
        let Platform::GpuBacked { gpus, .. } = platform else {
            continue;
        };
        for (gpu_key, gpu) in gpus {
            let gpu_tps = gpu.throughput_for(model_key);
            let estimate = utilization::estimate(tokens_per_day, pattern, gpu_tps, model_key)?;
            let cost = match cost::gpu_monthly_cost(
                catalog,
                platform_key,
                gpu_key,
                tokens_per_day,
                pattern,
                model_key,
                Some(&estimate),
            ) {
                Ok(cost) => cost,
                Err(EngineError::MemoryInfeasible { .. }) => continue,
                Err(err) => return Err(err),
            };

            let utilization_pct = estimate.utilization_after * 100.0;
            let latency_risk = latency_risk_band(estimate.utilization_after);
            let penalty = compute_penalty(
                estimate.utilization_after,
                estimate.gpu_count,
                latency_risk,
                strict_latency_required,
            );

            let reasoning = format!(
                "{} billing; {} GPU(s); utilization {:.0}%; latency risk {}; idle waste {:.0}%",
                cost.billing_type,
                estimate.gpu_count,
                utilization_pct,
                latency_risk,
                cost.idle_waste_pct
            );

            candidates.push(Candidate {
                score: cost.monthly_cost_usd + penalty,
                platform: platform_key.clone(),
                option: gpu.name.clone(),
                cost,
                reasoning,
                utilization_pct,
            });
        }
    }

    // Flat per-token offerings hosting the requested model. No penalty terms
    // apply: there is no utilization or GPU-count dimension to penalize.
    for (platform_key, platform) in &catalog.platforms {
        let Platform::PerToken { models } = platform else {
            continue;
        };
        if !models.contains_key(model_key) {
            continue;
        }
        let cost = cost::per_token_monthly_cost(catalog, platform_key, model_key, tokens_per_day)?;
        candidates.push(Candidate {
            score: cost.monthly_cost_usd,
            platform: platform_key.clone(),
            option: model_key.to_string(),
            reasoning: "Per-token billing; no dedicated idle waste".to_string(),
            utilization_pct: 0.0,
            cost,
        });
    }

    if candidates.is_empty() {
        return Err(EngineError::NoFeasibleCandidate);
    }

    // Stable sort: ties keep catalog enumeration order.
    candidates.sort_by(|a, b| {
        a.score
            .partial_cmp(&b.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(candidates
        .into_iter()
        .take(top_k)
        .enumerate()
        .map(|(idx, candidate)| Recommendation {
            rank: idx as u32 + 1,
            platform: candidate.platform,
            option: candidate.option,
            monthly_cost_usd: candidate.cost.monthly_cost_usd,
            reasoning: candidate.reasoning,
            utilization_pct: candidate.utilization_pct,
            cost_per_million_tokens: candidate.cost.cost_per_million_tokens,
            idle_waste_pct: candidate.cost.idle_waste_pct,
        })
        .collect())
}

/// Format recommendations as a pretty-printed table string.
pub fn format_table(recommendations: &[Recommendation]) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n{:=<118}\n", "  Ranked Deployment Options  "));
    out.push_str(&format!(
        "{:<5} {:<12} {:<22} {:>13} {:>7} {:>9}  {}\n",
        "rank", "platform", "option", "monthly_usd", "util%", "$/M tok", "why"
    ));
    out.push_str(&format!("{:-<118}\n", ""));
    for rec in recommendations {
        out.push_str(&format!(
            "{:<5} {:<12} {:<22} {:>13.2} {:>7.1} {:>9.2}  {}\n",
            rec.rank,
            rec.platform,
            rec.option,
            rec.monthly_cost_usd,
            rec.utilization_pct,
            rec.cost_per_million_tokens,
            rec.reasoning,
        ));
    }
    out.push_str(&format!("{:=<118}\n", ""));
    out
}
