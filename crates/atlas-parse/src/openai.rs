//! OpenAI adapter integration boundary.
//!
//! Declares the second-provider seam only; API calls are intentionally not
//! implemented yet. The router treats [`AdapterError::NotConfigured`] like
//! any other provider failure and moves on.

use crate::adapter::{AdapterError, LlmAdapter};
use crate::schema::WorkloadSpec;
use serde_json::Value;

const PROVIDER: &str = "openai";

#[derive(Debug, Default)]
pub struct OpenAiAdapter;

impl OpenAiAdapter {
    pub fn new() -> Self {
        Self
    }

    fn not_configured(&self) -> AdapterError {
        AdapterError::NotConfigured {
            provider: PROVIDER.to_string(),
            reason: "adapter not configured yet".to_string(),
        }
    }
}

impl LlmAdapter for OpenAiAdapter {
    fn provider_name(&self) -> &str {
        PROVIDER
    }

    fn parse_workload(&self, _user_text: &str) -> Result<Value, AdapterError> {
        Err(self.not_configured())
    }

    fn explain(
        &self,
        _recommendation_summary: &str,
        _workload: &WorkloadSpec,
    ) -> Result<String, AdapterError> {
        Err(self.not_configured())
    }
}
