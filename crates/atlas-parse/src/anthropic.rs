//! Anthropic Messages API adapter.
//!
//! Applies its own timeout and bounded-retry policy: transient HTTP statuses
//! and transport errors back off exponentially up to `max_retries`; anything
//! else surfaces immediately. The deterministic planner never waits on this
//! path; exhaustion is reported to the router, which moves on.

use crate::adapter::{extract_json_object, AdapterError, LlmAdapter};
use crate::schema::WorkloadSpec;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-sonnet-4-5";
const PROVIDER: &str = "anthropic";
const RETRYABLE_STATUS: [u16; 6] = [408, 429, 500, 502, 503, 504];

const PARSE_SYSTEM_PROMPT: &str = "Extract workload fields from user text. Return only a valid \
    JSON object with keys: tokens_per_day (number), pattern \
    (steady|business_hours|bursty), model_key (string), latency_requirement_ms \
    (number or null).";

const EXPLAIN_SYSTEM_PROMPT: &str =
    "You are an infra assistant. Keep explanations precise and grounded.";

/// Anthropic Messages API adapter over a blocking HTTP client.
pub struct AnthropicAdapter {
    client: Client,
    api_key: String,
    model: String,
    max_retries: u32,
    backoff_base: Duration,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicAdapter {
    /// Build an adapter from `ANTHROPIC_API_KEY` / `ANTHROPIC_MODEL`.
    ///
    /// A missing key is not an error here: the adapter reports
    /// [`AdapterError::NotConfigured`] at call time so the router can fall
    /// through to the next provider.
    pub fn from_env() -> Result<Self, AdapterError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY").unwrap_or_default();
        let model =
            std::env::var("ANTHROPIC_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self::with_config(api_key, model, Duration::from_secs(30), 2, Duration::from_millis(500))
    }

    pub fn with_config(
        api_key: String,
        model: String,
        timeout: Duration,
        max_retries: u32,
        backoff_base: Duration,
    ) -> Result<Self, AdapterError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| AdapterError::Connection {
                provider: PROVIDER.to_string(),
                source,
            })?;
        Ok(Self {
            client,
            api_key,
            model,
            max_retries,
            backoff_base,
        })
    }

    fn generate_text(&self, system: &str, user: &str) -> Result<String, AdapterError> {
        if self.api_key.is_empty() {
            return Err(AdapterError::NotConfigured {
                provider: PROVIDER.to_string(),
                reason: "ANTHROPIC_API_KEY is not set".to_string(),
            });
        }

        let body = MessagesRequest {
            model: &self.model,
            max_tokens: 500,
            system,
            messages: vec![Message {
                role: "user",
                content: user,
            }],
        };

        let mut attempt = 0u32;
        let response: MessagesResponse = loop {
            debug!(attempt, model = %self.model, "sending Anthropic request");
            let result = self
                .client
                .post(API_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", API_VERSION)
                .json(&body)
                .send();

            match result {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if response.status().is_success() {
                        break response.json().map_err(|source| AdapterError::Connection {
                            provider: PROVIDER.to_string(),
                            source,
                        })?;
                    }
                    if RETRYABLE_STATUS.contains(&status) && attempt < self.max_retries {
                        let delay = self.backoff_base * 2u32.pow(attempt);
                        warn!(status, attempt, delay_ms = delay.as_millis() as u64,
                            "retryable Anthropic status, backing off");
                        std::thread::sleep(delay);
                        attempt += 1;
                        continue;
                    }
                    return Err(AdapterError::Http {
                        provider: PROVIDER.to_string(),
                        status,
                    });
                }
                Err(source) => {
                    if attempt < self.max_retries {
                        let delay = self.backoff_base * 2u32.pow(attempt);
                        warn!(attempt, delay_ms = delay.as_millis() as u64,
                            "Anthropic connection error, backing off");
                        std::thread::sleep(delay);
                        attempt += 1;
                        continue;
                    }
                    return Err(AdapterError::Connection {
                        provider: PROVIDER.to_string(),
                        source,
                    });
                }
            }
        };

        response
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .map(|text| text.trim().to_string())
            .find(|text| !text.is_empty())
            .ok_or_else(|| AdapterError::EmptyResponse {
                provider: PROVIDER.to_string(),
            })
    }
}

impl LlmAdapter for AnthropicAdapter {
    fn provider_name(&self) -> &str {
        PROVIDER
    }

    fn parse_workload(&self, user_text: &str) -> Result<Value, AdapterError> {
        let text = self.generate_text(PARSE_SYSTEM_PROMPT, user_text)?;
        extract_json_object(PROVIDER, &text)
    }

    fn explain(
        &self,
        recommendation_summary: &str,
        workload: &WorkloadSpec,
    ) -> Result<String, AdapterError> {
        let prompt = format!(
            "Explain the deterministic recommendation in 4-6 concise bullet points. \
             Do not fabricate metrics. Use these inputs and summary.\n\n\
             Workload: {workload:?}\nSummary:\n{recommendation_summary}"
        );
        self.generate_text(EXPLAIN_SYSTEM_PROMPT, &prompt)
    }
}
