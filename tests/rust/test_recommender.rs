/// Integration tests for the recommendation ranker.
use atlas_core::catalog::Catalog;
use atlas_core::error::EngineError;
use atlas_core::ranker;

fn synthetic_catalog() -> Catalog {
    Catalog::from_toml(
        r#"
[platforms.budget_cloud]
kind = "gpu_backed"
billing = "hourly"

[platforms.budget_cloud.gpus.a100_80gb]
name = "NVIDIA A100 80GB"
hourly_rate = 1.5
memory_gb = 80
tokens_per_second = 8000.0

[platforms.premium_cloud]
kind = "gpu_backed"
billing = "autoscaling"

[platforms.premium_cloud.gpus.h100_80gb]
name = "NVIDIA H100 80GB"
hourly_rate = 4.5
memory_gb = 80
tokens_per_second = 15000.0

[platforms.tokenco]
kind = "per_token"

[platforms.tokenco.models.llama_70b]
price_per_m_tokens = 0.9

[models.llama_70b]
display_name = "Llama 3.1 70B"
recommended_memory_gb = 80
parameter_count = 70000000000
"#,
    )
    .unwrap()
}

#[test]
fn test_ranking_is_sorted_ascending_by_cost() {
    let catalog = Catalog::builtin();
    let recommendations =
        ranker::rank(&catalog, 5_000_000.0, "steady", "llama_70b", None, 20).unwrap();

    assert!(recommendations.len() >= 2);
    for pair in recommendations.windows(2) {
        assert!(
            pair[0].monthly_cost_usd <= pair[1].monthly_cost_usd,
            "rank {} (${}) should not cost more than rank {} (${})",
            pair[0].rank,
            pair[0].monthly_cost_usd,
            pair[1].rank,
            pair[1].monthly_cost_usd,
        );
    }
}

#[test]
fn test_ranks_are_dense_and_one_based() {
    let catalog = Catalog::builtin();
    let recommendations =
        ranker::rank(&catalog, 20_000_000.0, "bursty", "llama_8b", Some(250.0), 10).unwrap();

    for (idx, rec) in recommendations.iter().enumerate() {
        assert_eq!(rec.rank, idx as u32 + 1);
    }
}

#[test]
fn test_ranking_is_idempotent() {
    let catalog = Catalog::builtin();
    let first =
        ranker::rank(&catalog, 12_345_678.0, "business_hours", "llama_70b", Some(200.0), 5)
            .unwrap();
    let second =
        ranker::rank(&catalog, 12_345_678.0, "business_hours", "llama_70b", Some(200.0), 5)
            .unwrap();

    let first_json = serde_json::to_string(&first).unwrap();
    let second_json = serde_json::to_string(&second).unwrap();
    assert_eq!(first_json, second_json);
}

#[test]
fn test_top_k_bounds_output_length() {
    let catalog = Catalog::builtin();
    for top_k in [1, 3, 100] {
        let recommendations =
            ranker::rank(&catalog, 5_000_000.0, "steady", "llama_70b", None, top_k).unwrap();
        assert!(recommendations.len() <= top_k);
    }
}

#[test]
fn test_per_token_entry_has_fixed_reasoning() {
    let catalog = synthetic_catalog();
    let recommendations =
        ranker::rank(&catalog, 1_000_000.0, "steady", "llama_70b", None, 10).unwrap();

    let per_token = recommendations
        .iter()
        .find(|rec| rec.platform == "tokenco")
        .expect("per-token platform should produce a candidate");
    assert_eq!(
        per_token.reasoning,
        "Per-token billing; no dedicated idle waste"
    );
    assert_eq!(per_token.option, "llama_70b");
    assert_eq!(per_token.utilization_pct, 0.0);

    // 30M monthly tokens at $0.9/M.
    assert!((per_token.monthly_cost_usd - 27.0).abs() < 1e-9);
}

#[test]
fn test_gpu_reasoning_mentions_billing_and_risk() {
    let catalog = synthetic_catalog();
    let recommendations =
        ranker::rank(&catalog, 1_000_000.0, "steady", "llama_70b", None, 10).unwrap();

    let gpu_backed = recommendations
        .iter()
        .find(|rec| rec.platform == "budget_cloud")
        .unwrap();
    assert!(gpu_backed.reasoning.contains("hourly billing"));
    assert!(gpu_backed.reasoning.contains("GPU(s)"));
    assert!(gpu_backed.reasoning.contains("latency risk"));
    assert!(gpu_backed.reasoning.contains("idle waste"));
}

#[test]
fn test_small_workload_provisions_single_gpu_everywhere() {
    let catalog = synthetic_catalog();
    let recommendations =
        ranker::rank(&catalog, 100_000.0, "steady", "llama_70b", None, 10).unwrap();

    for rec in recommendations.iter().filter(|r| r.platform != "tokenco") {
        assert!(rec.reasoning.contains("1 GPU(s)"));
    }
}

#[test]
fn test_unknown_pattern_aborts_ranking() {
    let catalog = Catalog::builtin();
    let err = ranker::rank(&catalog, 5_000_000.0, "weekend", "llama_70b", None, 3).unwrap_err();
    assert!(matches!(err, EngineError::UnknownPattern { .. }));
    assert!(err.to_string().contains("Valid options"));
}

#[test]
fn test_invalid_volume_aborts_ranking() {
    let catalog = Catalog::builtin();
    let err = ranker::rank(&catalog, 0.0, "steady", "llama_70b", None, 3).unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[test]
fn test_model_without_catalog_entry_uses_baseline_throughput() {
    // A model key absent from the requirements map skips the memory check
    // and falls back to baseline throughput on every GPU.
    let catalog = synthetic_catalog();
    let recommendations =
        ranker::rank(&catalog, 1_000_000.0, "steady", "uncataloged_model", None, 10).unwrap();

    assert!(recommendations.iter().any(|r| r.platform == "budget_cloud"));
    assert!(recommendations.iter().any(|r| r.platform == "premium_cloud"));
    // The per-token platform does not host this model.
    assert!(recommendations.iter().all(|r| r.platform != "tokenco"));
}
