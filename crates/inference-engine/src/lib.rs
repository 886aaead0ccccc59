//! CatBoost Inference Engine
//!
//! Evaluates gradient-boosted oblivious-tree ensembles exported by CatBoost
//! in JSON format.

mod engine;
mod model;

pub use engine::{InferenceEngine, InferenceResult};
pub use model::NanTreatment;

use thiserror::Error;

/// Errors during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model load failed: {0}")]
    ModelLoadError(String),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    InvalidInputShape { expected: String, actual: String },
}
