//! Inference Engine Implementation

use crate::model::Ensemble;
use crate::InferenceError;
use ndarray::ArrayView2;
use std::path::Path;
use tracing::{debug, info};

/// Result of inference operation
#[derive(Debug, Clone)]
pub struct InferenceResult {
    /// One prediction per input row
    pub predictions: Vec<f64>,
    /// Inference latency in milliseconds
    pub latency_ms: u64,
}

/// Immutable CatBoost regression model
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    model_path: String,
    ensemble: Ensemble,
}

impl InferenceEngine {
    /// Load a CatBoost JSON model from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let path = path.as_ref();
        info!("Loading model from {}", path.display());

        let bytes = std::fs::read(path)
            .map_err(|e| InferenceError::ModelLoadError(format!("{}: {}", path.display(), e)))?;
        let ensemble = Ensemble::from_bytes(&bytes)?;

        info!(
            "Model loaded: {} trees, {} features",
            ensemble.tree_count(),
            ensemble.feature_count
        );
        Ok(Self {
            model_path: path.display().to_string(),
            ensemble,
        })
    }

    /// Build from an in-memory JSON document
    pub fn from_json_str(json: &str) -> Result<Self, InferenceError> {
        let ensemble = Ensemble::from_bytes(json.as_bytes())?;
        debug!("Model parsed from string: {} trees", ensemble.tree_count());
        Ok(Self {
            model_path: "<memory>".to_string(),
            ensemble,
        })
    }

    /// Feature names in training order, when every feature is named
    pub fn feature_names(&self) -> Option<&[String]> {
        self.ensemble.feature_names.as_deref()
    }

    /// Number of input columns the model expects
    pub fn feature_count(&self) -> usize {
        self.ensemble.feature_count
    }

    pub fn tree_count(&self) -> usize {
        self.ensemble.tree_count()
    }

    /// Source of the model, `<memory>` when parsed from a string
    pub fn model_path(&self) -> &str {
        &self.model_path
    }

    /// Predict every row of `features`; NaN marks a missing value
    pub fn predict(&self, features: ArrayView2<f64>) -> Result<InferenceResult, InferenceError> {
        let start = std::time::Instant::now();

        if features.ncols() != self.ensemble.feature_count {
            return Err(InferenceError::InvalidInputShape {
                expected: format!("[n, {}]", self.ensemble.feature_count),
                actual: format!("[{}, {}]", features.nrows(), features.ncols()),
            });
        }

        let mut predictions = Vec::with_capacity(features.nrows());
        let mut row = Vec::with_capacity(features.ncols());
        for view in features.rows() {
            row.clear();
            row.extend(view.iter().copied());
            let value = self.ensemble.predict_row(&row);
            if value.is_infinite() {
                return Err(InferenceError::InferenceFailed(format!(
                    "non-finite prediction {}",
                    value
                )));
            }
            predictions.push(value);
        }

        let latency_ms = start.elapsed().as_millis() as u64;
        debug!("Inference on {} rows completed in {}ms", predictions.len(), latency_ms);

        Ok(InferenceResult {
            predictions,
            latency_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::io::Write;

    const MODEL: &str = r#"{
        "model_info": {"params": "{}"},
        "features_info": {"float_features": [
            {"feature_index": 0, "flat_feature_index": 0, "borders": [10.0], "nan_value_treatment": "AsIs", "feature_id": "x"},
            {"feature_index": 1, "flat_feature_index": 1, "borders": [0.0], "nan_value_treatment": "AsFalse", "feature_id": "y"}
        ]},
        "oblivious_trees": [
            {"splits": [{"float_feature_index": 0, "border": 10.0, "split_index": 0, "split_type": "FloatFeature"}],
             "leaf_values": [1.0, 2.0], "leaf_weights": [5, 5]},
            {"splits": [{"float_feature_index": 1, "border": 0.0, "split_index": 1, "split_type": "FloatFeature"}],
             "leaf_values": [-0.5, 0.5], "leaf_weights": [5, 5]}
        ],
        "scale_and_bias": [1, [3.0]]
    }"#;

    #[test]
    fn test_predict_batch() {
        let engine = InferenceEngine::from_json_str(MODEL).unwrap();
        let x = array![[5.0, -1.0], [20.0, 1.0], [f64::NAN, f64::NAN]];
        let result = engine.predict(x.view()).unwrap();
        assert_eq!(result.predictions, vec![3.5, 5.5, 3.5]);
    }

    #[test]
    fn test_predict_is_deterministic() {
        let engine = InferenceEngine::from_json_str(MODEL).unwrap();
        let x = array![[11.0, 0.5], [9.0, -0.5]];
        let a = engine.predict(x.view()).unwrap().predictions;
        let b = engine.predict(x.view()).unwrap().predictions;
        assert_eq!(a, b);
    }

    #[test]
    fn test_wrong_width_is_rejected() {
        let engine = InferenceEngine::from_json_str(MODEL).unwrap();
        let x = array![[1.0, 2.0, 3.0]];
        let err = engine.predict(x.view()).unwrap_err();
        assert!(matches!(err, InferenceError::InvalidInputShape { .. }));
    }

    #[test]
    fn test_empty_batch() {
        let engine = InferenceEngine::from_json_str(MODEL).unwrap();
        let x = ndarray::Array2::<f64>::zeros((0, 2));
        assert!(engine.predict(x.view()).unwrap().predictions.is_empty());
    }

    #[test]
    fn test_metadata() {
        let engine = InferenceEngine::from_json_str(MODEL).unwrap();
        assert_eq!(engine.feature_count(), 2);
        assert_eq!(engine.tree_count(), 2);
        assert_eq!(engine.feature_names(), Some(&["x".to_string(), "y".to_string()][..]));
        assert_eq!(engine.model_path(), "<memory>");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MODEL.as_bytes()).unwrap();
        let engine = InferenceEngine::load(file.path()).unwrap();
        assert_eq!(engine.feature_count(), 2);
        assert_eq!(engine.model_path(), file.path().display().to_string());
    }

    #[test]
    fn test_load_missing_file() {
        let err = InferenceEngine::load("/nonexistent/model.json").unwrap_err();
        assert!(matches!(err, InferenceError::ModelLoadError(_)));
    }
}
