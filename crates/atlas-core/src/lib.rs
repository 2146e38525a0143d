//! InferenceAtlas — deterministic cost planner for LLM inference workloads.
//!
//! This crate estimates the monthly cost of running an inference workload on
//! a catalog of hosting platforms and ranks platform/hardware options by a
//! composite cost-plus-risk score. Every operation is a pure function of the
//! workload parameters and a read-only catalog snapshot: no I/O, no clocks,
//! no hidden state, so identical inputs always produce identical rankings.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │   Traffic   │────▶│ Utilization  │────▶│ Cost Model   │
//! │   Profile   │     │  Estimator   │  ┌─▶│ (per billing │
//! └─────────────┘     └──────┬───────┘  │  │    mode)     │
//!                            │          │  └──────┬───────┘
//!                            ▼          │         │
//!                     ┌──────────────┐  │         ▼
//!                     │ Risk/Penalty │  │  ┌──────────────┐
//!                     │    Model     │──┼─▶│    Ranker    │
//!                     └──────────────┘  │  │   (top-k)    │
//!                     ┌──────────────┐  │  └──────────────┘
//!                     │   Catalog    │──┘
//!                     │ (read-only)  │
//!                     └──────────────┘
//! ```

pub mod catalog;
pub mod cost;
pub mod error;
pub mod penalty;
pub mod ranker;
pub mod traffic;
pub mod utilization;

// Re-export key types for convenience.
pub use catalog::{BillingMode, Catalog, CatalogError, GpuSpec, ModelRequirement, Platform};
pub use cost::{gpu_monthly_cost, per_token_monthly_cost, CostBreakdown};
pub use error::EngineError;
pub use penalty::compute_penalty;
pub use ranker::{format_table, rank, Recommendation};
pub use traffic::{pattern_names, resolve_profile, TrafficProfile};
pub use utilization::{estimate, latency_risk_band, LatencyRisk, UtilizationEstimate};

/// Rank a workload against the built-in catalog.
pub fn recommend(
    tokens_per_day: f64,
    pattern: &str,
    model_key: &str,
    latency_requirement_ms: Option<f64>,
    top_k: usize,
) -> Result<Vec<Recommendation>, EngineError> {
    let catalog = Catalog::builtin();
    ranker::rank(
        &catalog,
        tokens_per_day,
        pattern,
        model_key,
        latency_requirement_ms,
        top_k,
    )
}
