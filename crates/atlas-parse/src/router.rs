//! Provider routing for workload parsing.
//!
//! The router walks an explicit state machine:
//!
//! ```text
//! TryPrimary ──fail──▶ TryFallback ──fail──▶ ManualFallback ──none──▶ Failed
//!     │                    │                      │
//!   parsed               parsed              caller-supplied spec
//! ```
//!
//! A provider "succeeds" only when its payload passes schema validation;
//! an invalid payload advances the machine exactly like a transport failure.

use crate::adapter::LlmAdapter;
use crate::schema::{validate_workload_payload, WorkloadSpec};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

/// States of the provider routing machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterState {
    TryPrimary,
    TryFallback,
    ManualFallback,
    Failed,
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("all providers failed to parse the workload: {0}")]
    Exhausted(String),
}

/// Structured result of one parse attempt through the router.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub workload: WorkloadSpec,
    pub provider_used: String,
    pub raw_payload: Value,
    pub used_fallback: bool,
    pub warning: Option<String>,
}

/// Primary/fallback adapter pair consulted by [`parse_workload_text`].
pub struct ParseRouter {
    primary: Box<dyn LlmAdapter>,
    fallback: Option<Box<dyn LlmAdapter>>,
}

impl ParseRouter {
    pub fn new(primary: Box<dyn LlmAdapter>) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }

    pub fn with_fallback(primary: Box<dyn LlmAdapter>, fallback: Box<dyn LlmAdapter>) -> Self {
        Self {
            primary,
            fallback: Some(fallback),
        }
    }

    /// Parse with providers only; no manual fallback.
    pub fn parse(&self, user_text: &str) -> Result<ParseOutcome, ParseError> {
        parse_workload_text(self, user_text, None)
    }

    fn attempt(adapter: &dyn LlmAdapter, user_text: &str) -> Result<ParseOutcome, String> {
        let provider = adapter.provider_name().to_string();
        debug!(provider = %provider, "attempting workload parse");
        let payload = adapter
            .parse_workload(user_text)
            .map_err(|err| format!("{provider}: {err}"))?;
        let workload = validate_workload_payload(&payload)
            .map_err(|err| format!("{provider}: invalid payload: {err}"))?;
        Ok(ParseOutcome {
            workload,
            provider_used: provider,
            raw_payload: payload,
            used_fallback: false,
            warning: None,
        })
    }
}

/// Parse text through the provider chain, degrading to a caller-supplied
/// workload when every provider fails.
///
/// When all providers fail and `fallback_workload` is supplied, the result
/// is explicitly marked with `used_fallback = true` and carries the provider
/// failures as a warning. With no manual fallback, the accumulated failures
/// surface as [`ParseError::Exhausted`].
pub fn parse_workload_text(
    router: &ParseRouter,
    user_text: &str,
    fallback_workload: Option<WorkloadSpec>,
) -> Result<ParseOutcome, ParseError> {
    let mut state = RouterState::TryPrimary;
    let mut failures: Vec<String> = Vec::new();

    loop {
        match state {
            RouterState::TryPrimary => {
                match ParseRouter::attempt(router.primary.as_ref(), user_text) {
                    Ok(outcome) => return Ok(outcome),
                    Err(reason) => {
                        warn!(%reason, "primary provider failed");
                        failures.push(reason);
                        state = RouterState::TryFallback;
                    }
                }
            }
            RouterState::TryFallback => match router.fallback.as_ref() {
                Some(fallback) => match ParseRouter::attempt(fallback.as_ref(), user_text) {
                    Ok(outcome) => return Ok(outcome),
                    Err(reason) => {
                        warn!(%reason, "fallback provider failed");
                        failures.push(reason);
                        state = RouterState::ManualFallback;
                    }
                },
                None => state = RouterState::ManualFallback,
            },
            RouterState::ManualFallback => match &fallback_workload {
                Some(workload) => {
                    warn!("degrading to manually supplied workload");
                    return Ok(ParseOutcome {
                        workload: workload.clone(),
                        provider_used: "manual_fallback".to_string(),
                        raw_payload: Value::Object(Map::new()),
                        used_fallback: true,
                        warning: Some(failures.join("; ")),
                    });
                }
                None => state = RouterState::Failed,
            },
            RouterState::Failed => {
                return Err(ParseError::Exhausted(failures.join("; ")));
            }
        }
    }
}
