//! Error taxonomy for the planning engine.
//!
//! Every failure is raised synchronously; the engine performs no retries.
//! [`EngineError::MemoryInfeasible`] is the one variant the ranker treats as
//! a per-candidate filter; all other variants abort the ranking call.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Caller-supplied value out of range, or a malformed catalog field
    /// caught by defensive validation.
    #[error("{0}")]
    InvalidInput(String),

    #[error("Unknown pattern '{name}'. Valid options: {valid}")]
    UnknownPattern { name: String, valid: String },

    #[error("Unknown platform '{name}'. Valid options: {valid}")]
    UnknownPlatform { name: String, valid: String },

    #[error("Unknown GPU '{gpu}' for platform '{platform}'. Valid options: {valid}")]
    UnknownGpu {
        platform: String,
        gpu: String,
        valid: String,
    },

    #[error("Unknown model '{name}'. Valid options: {valid}")]
    UnknownModel { name: String, valid: String },

    #[error("Unknown model key '{model}' for platform '{platform}'. Valid options: {valid}")]
    UnknownPlatformModel {
        platform: String,
        model: String,
        valid: String,
    },

    /// The model does not fit in the GPU's memory. Expected during candidate
    /// enumeration; the ranker skips the candidate instead of aborting.
    #[error("Model '{model}' requires {required_gb}GB but {gpu} only has {available_gb}GB")]
    MemoryInfeasible {
        model: String,
        gpu: String,
        required_gb: u32,
        available_gb: u32,
    },

    /// Every candidate was filtered out, or none existed to begin with.
    #[error("No platforms can handle the specified workload")]
    NoFeasibleCandidate,
}
