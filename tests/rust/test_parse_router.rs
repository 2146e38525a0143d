/// Integration tests for the parse router state machine, using mock
/// adapters in place of real providers.
use atlas_parse::adapter::{AdapterError, LlmAdapter};
use atlas_parse::router::{parse_workload_text, ParseRouter};
use atlas_parse::schema::WorkloadSpec;
use serde_json::{json, Value};

/// Adapter that always returns a fixed payload.
struct StaticAdapter {
    name: &'static str,
    payload: Value,
}

impl LlmAdapter for StaticAdapter {
    fn provider_name(&self) -> &str {
        self.name
    }

    fn parse_workload(&self, _user_text: &str) -> Result<Value, AdapterError> {
        Ok(self.payload.clone())
    }

    fn explain(
        &self,
        _recommendation_summary: &str,
        _workload: &WorkloadSpec,
    ) -> Result<String, AdapterError> {
        Ok("static explanation".to_string())
    }
}

/// Adapter that always fails like an unreachable provider.
struct FailingAdapter {
    name: &'static str,
}

impl LlmAdapter for FailingAdapter {
    fn provider_name(&self) -> &str {
        self.name
    }

    fn parse_workload(&self, _user_text: &str) -> Result<Value, AdapterError> {
        Err(AdapterError::Http {
            provider: self.name.to_string(),
            status: 503,
        })
    }

    fn explain(
        &self,
        _recommendation_summary: &str,
        _workload: &WorkloadSpec,
    ) -> Result<String, AdapterError> {
        Err(AdapterError::Http {
            provider: self.name.to_string(),
            status: 503,
        })
    }
}

fn good_payload() -> Value {
    json!({
        "tokens_per_day": 5_000_000,
        "pattern": "steady",
        "model_key": "llama_70b",
        "latency_requirement_ms": null,
    })
}

fn manual_spec() -> WorkloadSpec {
    WorkloadSpec {
        tokens_per_day: 1_000_000.0,
        pattern: "bursty".to_string(),
        model_key: "mistral_7b".to_string(),
        latency_requirement_ms: Some(250.0),
    }
}

#[test]
fn test_primary_success_short_circuits() {
    let router = ParseRouter::with_fallback(
        Box::new(StaticAdapter {
            name: "primary",
            payload: good_payload(),
        }),
        Box::new(FailingAdapter { name: "fallback" }),
    );

    let outcome = parse_workload_text(&router, "5M tokens/day on llama 70b", None).unwrap();
    assert_eq!(outcome.provider_used, "primary");
    assert!(!outcome.used_fallback);
    assert!(outcome.warning.is_none());
    assert_eq!(outcome.workload.tokens_per_day, 5_000_000.0);
    assert_eq!(outcome.workload.pattern, "steady");
}

#[test]
fn test_fallback_provider_after_primary_failure() {
    let router = ParseRouter::with_fallback(
        Box::new(FailingAdapter { name: "primary" }),
        Box::new(StaticAdapter {
            name: "fallback",
            payload: good_payload(),
        }),
    );

    let outcome = parse_workload_text(&router, "anything", None).unwrap();
    assert_eq!(outcome.provider_used, "fallback");
    assert!(!outcome.used_fallback);
}

#[test]
fn test_manual_fallback_when_all_providers_fail() {
    let router = ParseRouter::with_fallback(
        Box::new(FailingAdapter { name: "primary" }),
        Box::new(FailingAdapter { name: "fallback" }),
    );

    let outcome = parse_workload_text(&router, "anything", Some(manual_spec())).unwrap();
    assert_eq!(outcome.provider_used, "manual_fallback");
    assert!(outcome.used_fallback);
    let warning = outcome.warning.expect("manual fallback carries a warning");
    assert!(warning.contains("primary"));
    assert!(warning.contains("fallback"));
    assert_eq!(outcome.workload, manual_spec());
}

#[test]
fn test_exhausted_without_manual_fallback() {
    let router = ParseRouter::with_fallback(
        Box::new(FailingAdapter { name: "primary" }),
        Box::new(FailingAdapter { name: "fallback" }),
    );

    let err = parse_workload_text(&router, "anything", None).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("all providers failed"));
    assert!(message.contains("503"));
}

#[test]
fn test_invalid_payload_advances_like_failure() {
    // The primary answers, but with an unusable payload; the router must
    // treat that as a provider failure and use the fallback.
    let router = ParseRouter::with_fallback(
        Box::new(StaticAdapter {
            name: "primary",
            payload: json!({"pattern": "steady"}),
        }),
        Box::new(StaticAdapter {
            name: "fallback",
            payload: good_payload(),
        }),
    );

    let outcome = parse_workload_text(&router, "anything", None).unwrap();
    assert_eq!(outcome.provider_used, "fallback");
}

#[test]
fn test_router_without_fallback_adapter_degrades_to_manual() {
    let router = ParseRouter::new(Box::new(FailingAdapter { name: "primary" }));
    let outcome = parse_workload_text(&router, "anything", Some(manual_spec())).unwrap();
    assert_eq!(outcome.provider_used, "manual_fallback");
    assert!(outcome.used_fallback);
}

#[test]
fn test_router_parse_method_without_manual_fallback() {
    let router = ParseRouter::new(Box::new(StaticAdapter {
        name: "primary",
        payload: good_payload(),
    }));
    let outcome = router.parse("anything").unwrap();
    assert_eq!(outcome.provider_used, "primary");
    assert_eq!(outcome.raw_payload, good_payload());
}
