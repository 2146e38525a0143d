//! Workload schema and validation for LLM-generated payloads.
//!
//! Providers return loosely structured JSON; everything that crosses into
//! the deterministic planner must first pass [`validate_workload_payload`],
//! which either yields a fully validated [`WorkloadSpec`] or fails closed.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Traffic pattern names accepted at the parsing boundary, in sorted order.
/// Must stay in sync with the planner's pattern table.
pub const VALID_PATTERNS: [&str; 3] = ["bursty", "business_hours", "steady"];

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("{0}")]
    InvalidValue(String),
}

/// Validated workload extracted from natural-language input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadSpec {
    pub tokens_per_day: f64,
    pub pattern: String,
    pub model_key: String,
    #[serde(default)]
    pub latency_requirement_ms: Option<f64>,
}

fn normalize_pattern(pattern: &str) -> Result<String, SchemaError> {
    let normalized = pattern.trim().to_lowercase().replace(' ', "_");
    if !VALID_PATTERNS.contains(&normalized.as_str()) {
        return Err(SchemaError::InvalidValue(format!(
            "Invalid pattern '{pattern}'. Valid options: {}",
            VALID_PATTERNS.join(", ")
        )));
    }
    Ok(normalized)
}

fn numeric_field(value: &Value, field: &'static str) -> Result<f64, SchemaError> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| {
            SchemaError::InvalidValue(format!("{field} is not a representable number"))
        }),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| {
            SchemaError::InvalidValue(format!("{field} must be numeric, got '{s}'"))
        }),
        other => Err(SchemaError::InvalidValue(format!(
            "{field} must be numeric, got {other}"
        ))),
    }
}

/// Validate and coerce an LLM payload into a deterministic [`WorkloadSpec`].
///
/// Required keys: `tokens_per_day` (> 0), `pattern` (one of
/// [`VALID_PATTERNS`], case/space-insensitive), `model_key` (non-empty).
/// Optional: `latency_requirement_ms` (> 0; null, empty, or 0 reads as
/// absent).
pub fn validate_workload_payload(payload: &Value) -> Result<WorkloadSpec, SchemaError> {
    let object = payload
        .as_object()
        .ok_or_else(|| SchemaError::InvalidValue("payload must be a JSON object".to_string()))?;

    let tokens_raw = object
        .get("tokens_per_day")
        .ok_or(SchemaError::MissingField("tokens_per_day"))?;
    let pattern_raw = object
        .get("pattern")
        .ok_or(SchemaError::MissingField("pattern"))?;
    let model_raw = object
        .get("model_key")
        .ok_or(SchemaError::MissingField("model_key"))?;

    let tokens_per_day = numeric_field(tokens_raw, "tokens_per_day")?;
    if tokens_per_day <= 0.0 {
        return Err(SchemaError::InvalidValue(format!(
            "tokens_per_day must be > 0, got {tokens_per_day}."
        )));
    }

    let pattern = normalize_pattern(pattern_raw.as_str().unwrap_or_default())?;

    let model_key = model_raw.as_str().unwrap_or_default().trim().to_string();
    if model_key.is_empty() {
        return Err(SchemaError::InvalidValue(
            "model_key must be a non-empty string.".to_string(),
        ));
    }

    let latency_requirement_ms = match object.get("latency_requirement_ms") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(raw) => {
            let latency = numeric_field(raw, "latency_requirement_ms")?;
            if latency == 0.0 {
                None
            } else if latency < 0.0 {
                return Err(SchemaError::InvalidValue(
                    "latency_requirement_ms must be > 0 when provided.".to_string(),
                ));
            } else {
                Some(latency)
            }
        }
    };

    Ok(WorkloadSpec {
        tokens_per_day,
        pattern,
        model_key,
        latency_requirement_ms,
    })
}
