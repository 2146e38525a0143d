//! Python bindings for the InferenceAtlas planner via PyO3.
//!
//! Exposes catalog loading and the ranking entry point to Python, so
//! notebooks and scripts can run the deterministic planner without
//! reimplementing any of its math.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use atlas_core::catalog::Catalog as CoreCatalog;
use atlas_core::ranker::{self, Recommendation as CoreRecommendation};

/// Python-accessible pricing catalog.
#[pyclass]
#[derive(Clone)]
struct Catalog {
    inner: CoreCatalog,
}

#[pymethods]
impl Catalog {
    /// The built-in production catalog snapshot.
    #[staticmethod]
    fn builtin() -> Self {
        Self {
            inner: CoreCatalog::builtin(),
        }
    }

    /// Load a catalog from a TOML file.
    #[staticmethod]
    fn from_file(path: &str) -> PyResult<Self> {
        let catalog = CoreCatalog::from_file(std::path::Path::new(path))
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(Self { inner: catalog })
    }

    /// Parse a catalog from a TOML string.
    #[staticmethod]
    fn from_str(toml: &str) -> PyResult<Self> {
        let catalog =
            CoreCatalog::from_toml(toml).map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(Self { inner: catalog })
    }

    /// Platform keys in catalog order.
    fn platforms(&self) -> Vec<String> {
        self.inner.platforms.keys().cloned().collect()
    }

    /// Model keys in catalog order.
    fn models(&self) -> Vec<String> {
        self.inner.models.keys().cloned().collect()
    }
}

/// Python-accessible ranked recommendation.
#[pyclass]
#[derive(Clone)]
struct Recommendation {
    inner: CoreRecommendation,
}

#[pymethods]
impl Recommendation {
    #[getter]
    fn rank(&self) -> u32 {
        self.inner.rank
    }

    #[getter]
    fn platform(&self) -> String {
        self.inner.platform.clone()
    }

    #[getter]
    fn option(&self) -> String {
        self.inner.option.clone()
    }

    #[getter]
    fn monthly_cost_usd(&self) -> f64 {
        self.inner.monthly_cost_usd
    }

    #[getter]
    fn reasoning(&self) -> String {
        self.inner.reasoning.clone()
    }

    #[getter]
    fn utilization_pct(&self) -> f64 {
        self.inner.utilization_pct
    }

    #[getter]
    fn cost_per_million_tokens(&self) -> f64 {
        self.inner.cost_per_million_tokens
    }

    #[getter]
    fn idle_waste_pct(&self) -> f64 {
        self.inner.idle_waste_pct
    }

    /// JSON representation of this recommendation.
    fn to_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.inner).map_err(|e| PyValueError::new_err(e.to_string()))
    }

    fn __repr__(&self) -> String {
        format!(
            "Recommendation(rank={}, platform='{}', option='{}', monthly_cost_usd={:.2})",
            self.inner.rank, self.inner.platform, self.inner.option, self.inner.monthly_cost_usd
        )
    }
}

/// Rank platform options for a workload.
#[pyfunction]
#[pyo3(signature = (tokens_per_day, pattern, model_key, latency_requirement_ms=None, top_k=3, catalog=None))]
fn recommend(
    tokens_per_day: f64,
    pattern: &str,
    model_key: &str,
    latency_requirement_ms: Option<f64>,
    top_k: usize,
    catalog: Option<Catalog>,
) -> PyResult<Vec<Recommendation>> {
    let catalog = catalog
        .map(|c| c.inner)
        .unwrap_or_else(CoreCatalog::builtin);
    let recommendations = ranker::rank(
        &catalog,
        tokens_per_day,
        pattern,
        model_key,
        latency_requirement_ms,
        top_k,
    )
    .map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok(recommendations
        .into_iter()
        .map(|inner| Recommendation { inner })
        .collect())
}

/// List supported traffic pattern names.
#[pyfunction]
fn list_patterns() -> Vec<String> {
    atlas_core::traffic::pattern_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect()
}

/// Python module definition.
#[pymodule]
fn atlas(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(recommend, m)?)?;
    m.add_function(wrap_pyfunction!(list_patterns, m)?)?;
    m.add_class::<Catalog>()?;
    m.add_class::<Recommendation>()?;
    Ok(())
}
