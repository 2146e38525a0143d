//! Natural-language workload parsing for InferenceAtlas.
//!
//! This crate sits in front of the deterministic planner: it turns free-form
//! text like "about 5 million tokens a day on llama 70b, bursty traffic"
//! into a validated [`WorkloadSpec`], routing between LLM providers with a
//! primary → fallback → manual-fallback state machine. Provider failures are
//! always catchable, so a caller can substitute a manually entered spec
//! without aborting the user flow; the planner itself never blocks on this
//! path.

pub mod adapter;
pub mod anthropic;
pub mod openai;
pub mod router;
pub mod schema;

pub use adapter::{AdapterError, LlmAdapter};
pub use anthropic::AnthropicAdapter;
pub use openai::OpenAiAdapter;
pub use router::{parse_workload_text, ParseError, ParseOutcome, ParseRouter, RouterState};
pub use schema::{validate_workload_payload, SchemaError, WorkloadSpec};
