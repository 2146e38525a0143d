//! Platform, GPU, and model catalog.
//!
//! The catalog is read-only input to the cost model and ranker: platforms
//! keyed by identifier, each either GPU-backed (billed by provisioned
//! capacity) or per-token (billed by consumption), plus the memory
//! requirements of the models being deployed. A built-in snapshot ships with
//! the crate; alternative catalogs load from TOML with the same validation.
//!
//! Maps are `BTreeMap` so candidate enumeration, and therefore tie-breaking
//! in the ranker, is deterministic sorted-key order.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid catalog: {0}")]
    Validation(String),
}

/// How a platform charges for capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingMode {
    /// Pay only for active hours.
    Autoscaling,
    PerSecond,
    Hourly,
    HourlyVariable,
    /// Pay per consumed token; no provisioning.
    PerToken,
}

impl BillingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingMode::Autoscaling => "autoscaling",
            BillingMode::PerSecond => "per_second",
            BillingMode::Hourly => "hourly",
            BillingMode::HourlyVariable => "hourly_variable",
            BillingMode::PerToken => "per_token",
        }
    }
}

impl fmt::Display for BillingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A GPU-backed option: hardware spec plus pricing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpuSpec {
    /// Display name, e.g. "NVIDIA A100 80GB".
    pub name: String,
    pub hourly_rate: f64,
    pub memory_gb: u32,
    /// Baseline throughput in tokens/sec.
    pub tokens_per_second: f64,
    /// Benchmarked per-model throughput overrides.
    #[serde(default)]
    pub throughput_by_model: BTreeMap<String, f64>,
}

impl GpuSpec {
    /// Model-specific throughput when benchmarked, baseline otherwise.
    pub fn throughput_for(&self, model_key: &str) -> f64 {
        self.throughput_by_model
            .get(model_key)
            .copied()
            .unwrap_or(self.tokens_per_second)
    }
}

/// Per-token pricing for one hosted model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPrice {
    pub price_per_m_tokens: f64,
}

/// A platform offering, selected by billing shape rather than by the
/// presence or absence of optional keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Platform {
    /// Provisioned GPU capacity under one of the capacity billing modes.
    GpuBacked {
        billing: BillingMode,
        gpus: BTreeMap<String, GpuSpec>,
    },
    /// Hosted models billed per consumed token.
    PerToken {
        models: BTreeMap<String, TokenPrice>,
    },
}

impl Platform {
    pub fn billing(&self) -> BillingMode {
        match self {
            Platform::GpuBacked { billing, .. } => *billing,
            Platform::PerToken { .. } => BillingMode::PerToken,
        }
    }
}

/// Memory requirement and metadata for one deployable model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRequirement {
    pub display_name: String,
    pub recommended_memory_gb: u32,
    pub parameter_count: u64,
}

/// The full pricing catalog threaded explicitly into every engine call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub platforms: BTreeMap<String, Platform>,
    #[serde(default)]
    pub models: BTreeMap<String, ModelRequirement>,
}

impl Catalog {
    /// Load a catalog from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse a catalog from a TOML string.
    pub fn from_toml(s: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = toml::from_str(s)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Validate catalog consistency.
    fn validate(&self) -> Result<(), CatalogError> {
        if self.platforms.is_empty() {
            return Err(CatalogError::Validation(
                "catalog must define at least one platform".to_string(),
            ));
        }
        for (platform_key, platform) in &self.platforms {
            match platform {
                Platform::GpuBacked { gpus, .. } => {
                    if gpus.is_empty() {
                        return Err(CatalogError::Validation(format!(
                            "platform '{platform_key}' must define at least one GPU"
                        )));
                    }
                    for (gpu_key, gpu) in gpus {
                        if gpu.hourly_rate <= 0.0 {
                            return Err(CatalogError::Validation(format!(
                                "hourly_rate must be > 0 for {platform_key}/{gpu_key}"
                            )));
                        }
                        if gpu.memory_gb == 0 {
                            return Err(CatalogError::Validation(format!(
                                "memory_gb must be > 0 for {platform_key}/{gpu_key}"
                            )));
                        }
                        if gpu.tokens_per_second <= 0.0 {
                            return Err(CatalogError::Validation(format!(
                                "tokens_per_second must be > 0 for {platform_key}/{gpu_key}"
                            )));
                        }
                        for (model_key, tps) in &gpu.throughput_by_model {
                            if *tps <= 0.0 {
                                return Err(CatalogError::Validation(format!(
                                    "throughput_by_model.{model_key} must be > 0 for {platform_key}/{gpu_key}"
                                )));
                            }
                        }
                    }
                }
                Platform::PerToken { models } => {
                    if models.is_empty() {
                        return Err(CatalogError::Validation(format!(
                            "platform '{platform_key}' must define at least one model price"
                        )));
                    }
                    for (model_key, price) in models {
                        if price.price_per_m_tokens <= 0.0 {
                            return Err(CatalogError::Validation(format!(
                                "price_per_m_tokens must be > 0 for {platform_key}/{model_key}"
                            )));
                        }
                    }
                }
            }
        }
        for (model_key, model) in &self.models {
            if model.recommended_memory_gb == 0 {
                return Err(CatalogError::Validation(format!(
                    "recommended_memory_gb must be > 0 for model '{model_key}'"
                )));
            }
        }
        Ok(())
    }

    /// Look up a platform, enumerating valid keys on a miss.
    pub fn platform(&self, platform_key: &str) -> Result<&Platform, EngineError> {
        self.platforms
            .get(platform_key)
            .ok_or_else(|| EngineError::UnknownPlatform {
                name: platform_key.to_string(),
                valid: joined_keys(&self.platforms),
            })
    }

    /// Look up a model requirement, enumerating valid keys on a miss.
    pub fn model(&self, model_key: &str) -> Result<&ModelRequirement, EngineError> {
        self.models
            .get(model_key)
            .ok_or_else(|| EngineError::UnknownModel {
                name: model_key.to_string(),
                valid: joined_keys(&self.models),
            })
    }

    /// Human-readable display name for a model key.
    pub fn model_display_name(&self, model_key: &str) -> Result<&str, EngineError> {
        Ok(self.model(model_key)?.display_name.as_str())
    }

    /// The production catalog snapshot.
    pub fn builtin() -> Self {
        let platforms = BTreeMap::from([
            (
                "fireworks".to_string(),
                Platform::GpuBacked {
                    billing: BillingMode::Autoscaling,
                    gpus: BTreeMap::from([
                        (
                            "a100_80gb".to_string(),
                            gpu(
                                "NVIDIA A100 80GB",
                                2.9,
                                80,
                                8_000.0,
                                &[
                                    ("llama_8b", 20_000.0),
                                    ("llama_70b", 8_000.0),
                                    ("llama_405b", 1_500.0),
                                    ("mixtral_8x7b", 7_000.0),
                                    ("mistral_7b", 22_000.0),
                                ],
                            ),
                        ),
                        (
                            "h100_80gb".to_string(),
                            gpu(
                                "NVIDIA H100 80GB",
                                4.0,
                                80,
                                15_000.0,
                                &[
                                    ("llama_8b", 35_000.0),
                                    ("llama_70b", 15_000.0),
                                    ("llama_405b", 2_800.0),
                                    ("mixtral_8x7b", 13_000.0),
                                    ("mistral_7b", 38_000.0),
                                ],
                            ),
                        ),
                        (
                            "h200_141gb".to_string(),
                            gpu(
                                "NVIDIA H200 141GB",
                                6.0,
                                141,
                                18_000.0,
                                &[
                                    ("llama_8b", 42_000.0),
                                    ("llama_70b", 18_000.0),
                                    ("llama_405b", 3_500.0),
                                    ("mixtral_8x7b", 16_000.0),
                                    ("mistral_7b", 45_000.0),
                                ],
                            ),
                        ),
                        (
                            "b200_180gb".to_string(),
                            gpu(
                                "NVIDIA B200 180GB",
                                9.0,
                                180,
                                25_000.0,
                                &[
                                    ("llama_8b", 60_000.0),
                                    ("llama_70b", 25_000.0),
                                    ("llama_405b", 5_000.0),
                                    ("mixtral_8x7b", 22_000.0),
                                    ("mistral_7b", 65_000.0),
                                ],
                            ),
                        ),
                    ]),
                },
            ),
            (
                "replicate".to_string(),
                Platform::GpuBacked {
                    billing: BillingMode::PerSecond,
                    gpus: BTreeMap::from([(
                        "a100_80gb".to_string(),
                        gpu(
                            "NVIDIA A100 80GB",
                            10.08,
                            80,
                            8_000.0,
                            &[
                                ("llama_8b", 20_000.0),
                                ("llama_70b", 8_000.0),
                                ("llama_405b", 1_500.0),
                                ("mixtral_8x7b", 7_000.0),
                                ("mistral_7b", 22_000.0),
                            ],
                        ),
                    )]),
                },
            ),
            (
                "modal".to_string(),
                Platform::GpuBacked {
                    billing: BillingMode::Hourly,
                    gpus: BTreeMap::from([(
                        "a100_40gb".to_string(),
                        gpu(
                            "NVIDIA A100",
                            3.67,
                            40,
                            6_000.0,
                            &[
                                ("llama_8b", 15_000.0),
                                ("llama_70b", 6_000.0),
                                ("mixtral_8x7b", 5_500.0),
                                ("mistral_7b", 18_000.0),
                            ],
                        ),
                    )]),
                },
            ),
            (
                "runpod".to_string(),
                Platform::GpuBacked {
                    billing: BillingMode::Hourly,
                    gpus: BTreeMap::from([(
                        "a100_80gb".to_string(),
                        gpu(
                            "NVIDIA A100 80GB",
                            1.89,
                            80,
                            8_000.0,
                            &[
                                ("llama_8b", 20_000.0),
                                ("llama_70b", 8_000.0),
                                ("llama_405b", 1_500.0),
                                ("mixtral_8x7b", 7_000.0),
                                ("mistral_7b", 22_000.0),
                            ],
                        ),
                    )]),
                },
            ),
            (
                "vast_ai".to_string(),
                Platform::GpuBacked {
                    billing: BillingMode::HourlyVariable,
                    // hourly_rate is the average marketplace price.
                    gpus: BTreeMap::from([(
                        "a100_80gb".to_string(),
                        gpu(
                            "NVIDIA A100 80GB",
                            1.75,
                            80,
                            8_000.0,
                            &[
                                ("llama_8b", 20_000.0),
                                ("llama_70b", 8_000.0),
                                ("llama_405b", 1_500.0),
                                ("mixtral_8x7b", 7_000.0),
                                ("mistral_7b", 22_000.0),
                            ],
                        ),
                    )]),
                },
            ),
            (
                "together".to_string(),
                Platform::PerToken {
                    models: BTreeMap::from([(
                        "llama_70b".to_string(),
                        TokenPrice {
                            price_per_m_tokens: 0.88,
                        },
                    )]),
                },
            ),
        ]);

        let models = BTreeMap::from([
            (
                "llama_8b".to_string(),
                ModelRequirement {
                    display_name: "Llama 3.1 8B".to_string(),
                    recommended_memory_gb: 16,
                    parameter_count: 8_000_000_000,
                },
            ),
            (
                "llama_70b".to_string(),
                ModelRequirement {
                    display_name: "Llama 3.1 70B".to_string(),
                    recommended_memory_gb: 80,
                    parameter_count: 70_000_000_000,
                },
            ),
            (
                "llama_405b".to_string(),
                ModelRequirement {
                    display_name: "Llama 3.1 405B".to_string(),
                    recommended_memory_gb: 400,
                    parameter_count: 405_000_000_000,
                },
            ),
            (
                "mixtral_8x7b".to_string(),
                ModelRequirement {
                    display_name: "Mixtral 8x7B".to_string(),
                    recommended_memory_gb: 90,
                    parameter_count: 47_000_000_000,
                },
            ),
            (
                "mistral_7b".to_string(),
                ModelRequirement {
                    display_name: "Mistral 7B".to_string(),
                    recommended_memory_gb: 16,
                    parameter_count: 7_000_000_000,
                },
            ),
        ]);

        Catalog { platforms, models }
    }
}

fn gpu(
    name: &str,
    hourly_rate: f64,
    memory_gb: u32,
    tokens_per_second: f64,
    throughput_by_model: &[(&str, f64)],
) -> GpuSpec {
    GpuSpec {
        name: name.to_string(),
        hourly_rate,
        memory_gb,
        tokens_per_second,
        throughput_by_model: throughput_by_model
            .iter()
            .map(|(key, tps)| (key.to_string(), *tps))
            .collect(),
    }
}

pub(crate) fn joined_keys<V>(map: &BTreeMap<String, V>) -> String {
    map.keys().cloned().collect::<Vec<_>>().join(", ")
}
