//! Predictor Error Types

use feature_table::{SchemaError, TableError};
use inference_engine::InferenceError;
use thiserror::Error;

/// Errors surfaced by [`crate::LgkPredictor`]
#[derive(Debug, Error)]
pub enum PredictorError {
    /// Model could not be loaded at construction
    #[error("Model load error: {0}")]
    ModelLoad(String),

    /// Feature table disagrees with the model's expected features
    #[error("Feature mismatch: {0}")]
    FeatureMismatch(#[from] SchemaError),

    /// Model evaluation failed for the batch
    #[error("Inference error: {0}")]
    Inference(String),

    /// Input table could not be built
    #[error("Table error: {0}")]
    Table(#[from] TableError),

    /// Configuration could not be read
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl From<InferenceError> for PredictorError {
    fn from(err: InferenceError) -> Self {
        match err {
            InferenceError::ModelLoadError(msg) => PredictorError::ModelLoad(msg),
            other => PredictorError::Inference(other.to_string()),
        }
    }
}
