/// Integration tests for memory-feasibility filtering in the ranker.
use atlas_core::catalog::Catalog;
use atlas_core::error::EngineError;
use atlas_core::ranker;

#[test]
fn test_oversized_model_yields_no_feasible_candidate() {
    // llama_405b needs 400GB; the largest cataloged GPU has 180GB and the
    // only per-token platform does not host it. Every pattern and volume
    // must produce the same terminal failure.
    let catalog = Catalog::builtin();
    for pattern in ["steady", "business_hours", "bursty"] {
        for tokens_per_day in [100_000.0, 5_000_000.0, 500_000_000.0] {
            let err = ranker::rank(&catalog, tokens_per_day, pattern, "llama_405b", None, 5)
                .unwrap_err();
            assert!(
                matches!(err, EngineError::NoFeasibleCandidate),
                "expected NoFeasibleCandidate for {pattern}/{tokens_per_day}, got {err:?}",
            );
        }
    }
}

#[test]
fn test_no_feasible_candidate_message() {
    let catalog = Catalog::builtin();
    let err = ranker::rank(&catalog, 1_000_000.0, "steady", "llama_405b", None, 5).unwrap_err();
    assert_eq!(
        err.to_string(),
        "No platforms can handle the specified workload"
    );
}

#[test]
fn test_tight_fit_keeps_only_large_gpus() {
    // mixtral_8x7b needs 90GB: only the 141GB and 180GB cards qualify, both
    // on fireworks.
    let catalog = Catalog::builtin();
    let recommendations =
        ranker::rank(&catalog, 5_000_000.0, "steady", "mixtral_8x7b", None, 10).unwrap();

    assert!(!recommendations.is_empty());
    for rec in &recommendations {
        assert_eq!(rec.platform, "fireworks");
        assert!(
            rec.option == "NVIDIA H200 141GB" || rec.option == "NVIDIA B200 180GB",
            "unexpected option {}",
            rec.option,
        );
    }
}

#[test]
fn test_small_model_fits_everywhere() {
    // llama_8b needs 16GB and every cataloged GPU has at least 40GB, so all
    // five GPU-backed platforms must appear.
    let catalog = Catalog::builtin();
    let recommendations =
        ranker::rank(&catalog, 5_000_000.0, "steady", "llama_8b", None, 20).unwrap();

    for platform in ["fireworks", "modal", "replicate", "runpod", "vast_ai"] {
        assert!(
            recommendations.iter().any(|rec| rec.platform == platform),
            "missing platform {platform}",
        );
    }
}

#[test]
fn test_partial_filtering_keeps_remaining_candidates() {
    // A catalog where one of two GPUs is too small: the ranker must skip the
    // misfit and still rank the survivor.
    let catalog = Catalog::from_toml(
        r#"
[platforms.acme]
kind = "gpu_backed"
billing = "hourly"

[platforms.acme.gpus.small_24gb]
name = "Small 24GB"
hourly_rate = 0.5
memory_gb = 24
tokens_per_second = 4000.0

[platforms.acme.gpus.big_80gb]
name = "Big 80GB"
hourly_rate = 2.0
memory_gb = 80
tokens_per_second = 8000.0

[models.llama_70b]
display_name = "Llama 3.1 70B"
recommended_memory_gb = 80
parameter_count = 70000000000
"#,
    )
    .unwrap();

    let recommendations =
        ranker::rank(&catalog, 1_000_000.0, "steady", "llama_70b", None, 10).unwrap();
    assert_eq!(recommendations.len(), 1);
    assert_eq!(recommendations[0].option, "Big 80GB");
}
