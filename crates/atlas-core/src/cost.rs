//! Monthly cost calculation for the supported billing models.
//!
//! Computes total monthly cost for GPU-backed and per-token platforms,
//! accounting for multi-GPU scaling, billing mode, idle waste, and cost per
//! million tokens.
//!
//! Billing models:
//! - autoscaling: pay only for active hours (active_hours × rate × gpu_count)
//! - dedicated/per_second/hourly/hourly_variable: pay for the full month
//!   (720 hours × rate × gpu_count)
//! - per_token: pay per consumed token (tokens/month × price per million)

use crate::catalog::{joined_keys, BillingMode, Catalog, Platform};
use crate::error::EngineError;
use crate::utilization::{self, UtilizationEstimate, DAYS_PER_MONTH, HOURS_PER_MONTH};
use serde::{Deserialize, Serialize};

/// Cost details for one platform option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub platform: String,
    pub option_key: String,
    pub option_name: String,
    pub billing_type: BillingMode,
    pub monthly_cost_usd: f64,
    pub active_hours_per_month: f64,
    pub idle_waste_usd: f64,
    pub cost_per_million_tokens: f64,
    pub idle_waste_pct: f64,
}

/// Calculate the monthly cost of a GPU-backed offering.
///
/// Resolves model-specific throughput when benchmarked, validates that the
/// model fits the GPU's memory (returning [`EngineError::MemoryInfeasible`],
/// the ranker's filtering signal, when it does not), and computes
/// utilization via [`utilization::estimate`] unless a pre-computed estimate
/// is supplied.
pub fn gpu_monthly_cost(
    catalog: &Catalog,
    platform_key: &str,
    gpu_key: &str,
    tokens_per_day: f64,
    pattern: &str,
    model_key: &str,
    utilization: Option<&UtilizationEstimate>,
) -> Result<CostBreakdown, EngineError> {
    if tokens_per_day <= 0.0 {
        return Err(EngineError::InvalidInput(format!(
            "tokens_per_day must be > 0, got {tokens_per_day}."
        )));
    }
    if model_key.is_empty() {
        return Err(EngineError::InvalidInput(
            "model_key must be a non-empty string.".to_string(),
        ));
    }

    let platform = catalog.platform(platform_key)?;
    let (billing, gpus) = match platform {
        Platform::GpuBacked { billing, gpus } => (*billing, gpus),
        Platform::PerToken { .. } => {
            return Err(EngineError::InvalidInput(format!(
                "Platform '{platform_key}' does not define GPU options."
            )))
        }
    };
    let gpu = gpus.get(gpu_key).ok_or_else(|| EngineError::UnknownGpu {
        platform: platform_key.to_string(),
        gpu: gpu_key.to_string(),
        valid: joined_keys(gpus),
    })?;

    let gpu_tps = gpu.throughput_for(model_key);

    // Memory fit is the one condition the ranker filters on.
    if let Some(model) = catalog.models.get(model_key) {
        if model.recommended_memory_gb > gpu.memory_gb {
            return Err(EngineError::MemoryInfeasible {
                model: model_key.to_string(),
                gpu: gpu.name.clone(),
                required_gb: model.recommended_memory_gb,
                available_gb: gpu.memory_gb,
            });
        }
    }

    if gpu.hourly_rate <= 0.0 {
        return Err(EngineError::InvalidInput(format!(
            "hourly_rate must be > 0 for {platform_key}/{gpu_key}, got {}.",
            gpu.hourly_rate
        )));
    }

    let computed;
    let utilization = match utilization {
        Some(estimate) => estimate,
        None => {
            computed = utilization::estimate(tokens_per_day, pattern, gpu_tps, model_key)?;
            &computed
        }
    };

    let gpu_count = utilization.gpu_count.max(1) as f64;
    let (monthly_cost, idle_waste, idle_waste_pct) = match billing {
        BillingMode::Autoscaling => {
            // Pay only for active hours; idle waste is zero by definition.
            let monthly_cost = utilization.active_hours_per_month * gpu.hourly_rate * gpu_count;
            (monthly_cost, 0.0, 0.0)
        }
        _ => {
            let monthly_cost = HOURS_PER_MONTH * gpu.hourly_rate * gpu_count;
            let idle_hours = (HOURS_PER_MONTH - utilization.active_hours_per_month).max(0.0);
            let idle_waste = idle_hours * gpu.hourly_rate * gpu_count;
            let idle_waste_pct = if monthly_cost > 0.0 {
                idle_waste / monthly_cost * 100.0
            } else {
                0.0
            };
            (monthly_cost, idle_waste, idle_waste_pct)
        }
    };

    let monthly_tokens = tokens_per_day * DAYS_PER_MONTH;
    let cost_per_million_tokens = if monthly_tokens > 0.0 {
        monthly_cost / monthly_tokens * 1_000_000.0
    } else {
        0.0
    };

    Ok(CostBreakdown {
        platform: platform_key.to_string(),
        option_key: gpu_key.to_string(),
        option_name: gpu.name.clone(),
        billing_type: billing,
        monthly_cost_usd: monthly_cost,
        active_hours_per_month: utilization.active_hours_per_month,
        idle_waste_usd: idle_waste,
        cost_per_million_tokens,
        idle_waste_pct,
    })
}

/// Calculate the monthly cost of a flat per-token offering.
///
/// Per-token platforms charge per million tokens consumed, with no GPU
/// provisioning and no idle waste.
pub fn per_token_monthly_cost(
    catalog: &Catalog,
    platform_key: &str,
    model_key: &str,
    tokens_per_day: f64,
) -> Result<CostBreakdown, EngineError> {
    if tokens_per_day <= 0.0 {
        return Err(EngineError::InvalidInput(format!(
            "tokens_per_day must be > 0, got {tokens_per_day}."
        )));
    }

    let platform = catalog.platform(platform_key)?;
    let models = match platform {
        Platform::PerToken { models } => models,
        Platform::GpuBacked { .. } => {
            return Err(EngineError::InvalidInput(format!(
                "Platform '{platform_key}' does not define model options."
            )))
        }
    };
    let price = models
        .get(model_key)
        .ok_or_else(|| EngineError::UnknownPlatformModel {
            platform: platform_key.to_string(),
            model: model_key.to_string(),
            valid: joined_keys(models),
        })?;

    if price.price_per_m_tokens <= 0.0 {
        return Err(EngineError::InvalidInput(format!(
            "price_per_m_tokens must be > 0 for {platform_key}/{model_key}, got {}.",
            price.price_per_m_tokens
        )));
    }

    let monthly_tokens = tokens_per_day * DAYS_PER_MONTH;
    let monthly_cost = monthly_tokens / 1_000_000.0 * price.price_per_m_tokens;
    let cost_per_million_tokens = if monthly_tokens > 0.0 {
        monthly_cost / monthly_tokens * 1_000_000.0
    } else {
        0.0
    };

    Ok(CostBreakdown {
        platform: platform_key.to_string(),
        option_key: model_key.to_string(),
        option_name: model_key.to_string(),
        billing_type: BillingMode::PerToken,
        monthly_cost_usd: monthly_cost,
        active_hours_per_month: 0.0,
        idle_waste_usd: 0.0,
        cost_per_million_tokens,
        idle_waste_pct: 0.0,
    })
}
