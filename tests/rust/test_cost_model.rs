/// Integration tests for the billing-aware cost model.
use atlas_core::catalog::{BillingMode, Catalog};
use atlas_core::cost::{gpu_monthly_cost, per_token_monthly_cost};
use atlas_core::utilization::{self, UtilizationEstimate};

fn fixed_utilization(gpu_count: u32, active_hours: f64) -> UtilizationEstimate {
    UtilizationEstimate {
        active_hours_per_month: active_hours,
        avg_tokens_per_second_global: 10.0,
        required_peak_tokens_per_second: 10.0,
        effective_gpu_tokens_per_second: 20.0,
        utilization_ratio: 0.5,
        gpu_count,
        utilization_after: 0.5 / gpu_count as f64,
    }
}

#[test]
fn test_dedicated_billing_pays_full_month() {
    // hourly_rate=$1.89, gpu_count=2, active_hours=180.
    let catalog = Catalog::builtin();
    let breakdown = gpu_monthly_cost(
        &catalog,
        "runpod",
        "a100_80gb",
        1_000_000.0,
        "business_hours",
        "llama_70b",
        Some(&fixed_utilization(2, 180.0)),
    )
    .unwrap();

    assert!((breakdown.monthly_cost_usd - 2721.60).abs() < 1e-9);
    assert!((breakdown.idle_waste_usd - 2041.20).abs() < 1e-9);
    assert!((breakdown.idle_waste_pct - 75.0).abs() < 1e-9);
}

#[test]
fn test_autoscaling_billing_pays_active_hours_only() {
    let catalog = Catalog::builtin();
    let breakdown = gpu_monthly_cost(
        &catalog,
        "fireworks",
        "a100_80gb",
        1_000_000.0,
        "business_hours",
        "llama_70b",
        Some(&fixed_utilization(2, 180.0)),
    )
    .unwrap();

    assert_eq!(breakdown.monthly_cost_usd, 180.0 * 2.9 * 2.0);
    assert_eq!(breakdown.idle_waste_usd, 0.0);
    assert_eq!(breakdown.idle_waste_pct, 0.0);
    assert_eq!(breakdown.billing_type, BillingMode::Autoscaling);
}

#[test]
fn test_cost_scales_linearly_with_gpu_count() {
    let catalog = Catalog::builtin();
    let one = gpu_monthly_cost(
        &catalog,
        "runpod",
        "a100_80gb",
        1_000_000.0,
        "steady",
        "llama_70b",
        Some(&fixed_utilization(1, 720.0)),
    )
    .unwrap();
    let four = gpu_monthly_cost(
        &catalog,
        "runpod",
        "a100_80gb",
        1_000_000.0,
        "steady",
        "llama_70b",
        Some(&fixed_utilization(4, 720.0)),
    )
    .unwrap();

    assert!((four.monthly_cost_usd - 4.0 * one.monthly_cost_usd).abs() < 1e-9);
}

#[test]
fn test_computed_utilization_path_matches_explicit() {
    let catalog = Catalog::builtin();
    let estimate =
        utilization::estimate(5_000_000.0, "steady", 8_000.0, "llama_70b").unwrap();
    let explicit = gpu_monthly_cost(
        &catalog,
        "runpod",
        "a100_80gb",
        5_000_000.0,
        "steady",
        "llama_70b",
        Some(&estimate),
    )
    .unwrap();
    let computed = gpu_monthly_cost(
        &catalog,
        "runpod",
        "a100_80gb",
        5_000_000.0,
        "steady",
        "llama_70b",
        None,
    )
    .unwrap();

    assert_eq!(explicit, computed);
}

#[test]
fn test_steady_pattern_has_no_idle_waste_on_dedicated() {
    // Steady traffic keeps the full 720 active hours, so dedicated billing
    // wastes nothing.
    let catalog = Catalog::builtin();
    let breakdown = gpu_monthly_cost(
        &catalog,
        "runpod",
        "a100_80gb",
        5_000_000.0,
        "steady",
        "llama_70b",
        None,
    )
    .unwrap();

    assert_eq!(breakdown.idle_waste_usd, 0.0);
    assert_eq!(breakdown.idle_waste_pct, 0.0);
}

#[test]
fn test_per_token_monthly_cost_formula() {
    let catalog = Catalog::builtin();
    let breakdown =
        per_token_monthly_cost(&catalog, "together", "llama_70b", 10_000_000.0).unwrap();

    // 300M monthly tokens at $0.88/M.
    assert!((breakdown.monthly_cost_usd - 264.0).abs() < 1e-9);
    assert!((breakdown.cost_per_million_tokens - 0.88).abs() < 1e-9);
    assert_eq!(breakdown.billing_type, BillingMode::PerToken);
    assert_eq!(breakdown.active_hours_per_month, 0.0);
}

#[test]
fn test_marketplace_billing_treated_as_dedicated() {
    let catalog = Catalog::builtin();
    let breakdown = gpu_monthly_cost(
        &catalog,
        "vast_ai",
        "a100_80gb",
        1_000_000.0,
        "business_hours",
        "llama_70b",
        Some(&fixed_utilization(1, 180.0)),
    )
    .unwrap();

    assert_eq!(breakdown.billing_type, BillingMode::HourlyVariable);
    assert_eq!(breakdown.monthly_cost_usd, 720.0 * 1.75);
    assert!(breakdown.idle_waste_usd > 0.0);
}
