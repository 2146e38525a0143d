//! Provider-agnostic adapter interface for LLM-backed parsing.
//!
//! Every provider integrated with the parse router implements
//! [`LlmAdapter`]. Adapters own their transport, credentials, and retry
//! policy; the router only sees structured payloads or [`AdapterError`]s.

use crate::schema::WorkloadSpec;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("{provider} is not configured: {reason}")]
    NotConfigured { provider: String, reason: String },
    #[error("{provider} request failed with status {status}")]
    Http { provider: String, status: u16 },
    #[error("{provider} connection failed: {source}")]
    Connection {
        provider: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{provider} response did not contain text output")]
    EmptyResponse { provider: String },
    #[error("{provider} parse response was not a valid JSON object")]
    MalformedJson { provider: String },
}

/// Contract for any LLM backend integrated with the parse router.
pub trait LlmAdapter: Send + Sync {
    /// Stable provider identifier for logs and routing decisions.
    fn provider_name(&self) -> &str;

    /// Extract a structured workload payload from free-form user text.
    fn parse_workload(&self, user_text: &str) -> Result<Value, AdapterError>;

    /// Plain-language explanation of a deterministic recommendation summary.
    fn explain(
        &self,
        recommendation_summary: &str,
        workload: &WorkloadSpec,
    ) -> Result<String, AdapterError>;
}

/// Extract a JSON object from model output, tolerating surrounding prose.
///
/// Tries the whole trimmed text first, then the span from the first `{` to
/// the last `}`.
pub fn extract_json_object(provider: &str, text: &str) -> Result<Value, AdapterError> {
    let candidate = text.trim();
    if let Ok(value) = serde_json::from_str::<Value>(candidate) {
        if value.is_object() {
            return Ok(value);
        }
    }

    if let (Some(start), Some(end)) = (candidate.find('{'), candidate.rfind('}')) {
        if end > start {
            if let Ok(value) = serde_json::from_str::<Value>(&candidate[start..=end]) {
                if value.is_object() {
                    return Ok(value);
                }
            }
        }
    }

    Err(AdapterError::MalformedJson {
        provider: provider.to_string(),
    })
}
