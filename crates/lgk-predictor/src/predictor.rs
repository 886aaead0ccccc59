//! Featurizing Predictor
//!
//! Owns a loaded model and the featurization that matches its training:
//! SMILES rows in, one lgK value per row out.

use crate::config::PredictorConfig;
use crate::error::PredictorError;
use feature_engine::{FeatureExtractor, FeatureVector, FingerprintConfig};
use feature_table::{FeatureTable, InputTable, SchemaPolicy, SchemaValidator};
use inference_engine::InferenceEngine;
use molecule::ParsedMolecule;
use std::path::Path;
use tracing::{debug, info};

/// lgK predictor
#[derive(Debug, Clone)]
pub struct LgkPredictor {
    engine: InferenceEngine,
    extractor: FeatureExtractor,
    validator: SchemaValidator,
}

impl LgkPredictor {
    /// Load the model at `model_path` with default featurization
    pub fn new(model_path: impl AsRef<Path>) -> Result<Self, PredictorError> {
        Self::with_options(model_path, FingerprintConfig::default(), SchemaPolicy::default())
    }

    /// Load the model with explicit fingerprint and schema settings
    pub fn with_options(
        model_path: impl AsRef<Path>,
        fingerprint: FingerprintConfig,
        policy: SchemaPolicy,
    ) -> Result<Self, PredictorError> {
        let engine = InferenceEngine::load(model_path)?;
        Ok(Self::from_engine(engine, fingerprint, policy))
    }

    /// Build from configuration; `model_path` must be set
    pub fn from_config(config: &PredictorConfig) -> Result<Self, PredictorError> {
        let path = config
            .model_path
            .as_deref()
            .ok_or_else(|| PredictorError::ModelLoad("no model_path configured".to_string()))?;
        Self::with_options(path, config.fingerprint, config.schema_policy)
    }

    /// Wrap an already loaded engine
    pub fn from_engine(engine: InferenceEngine, fingerprint: FingerprintConfig, policy: SchemaPolicy) -> Self {
        let validator = SchemaValidator::new(
            engine.feature_names().map(<[String]>::to_vec),
            engine.feature_count(),
            policy,
        );
        info!(
            "Predictor ready for {}: {} model features, fingerprint radius {} / {} bits, {:?} schema",
            engine.model_path(),
            engine.feature_count(),
            fingerprint.radius,
            fingerprint.n_bits,
            policy
        );
        Self {
            engine,
            extractor: FeatureExtractor::new(fingerprint),
            validator,
        }
    }

    /// Descriptors and fingerprint bits for one molecule
    pub fn compute_features(&self, molecule: &ParsedMolecule) -> FeatureVector {
        self.extractor.compute(molecule)
    }

    /// Featurize every row; invalid SMILES yield missing features
    pub fn preprocess(&self, input: &InputTable) -> FeatureTable {
        FeatureTable::assemble(input, &self.extractor)
    }

    /// One prediction per input row, in input order
    pub fn predict(&self, input: &InputTable) -> Result<Vec<f64>, PredictorError> {
        Ok(self.predict_batch(input)?.values)
    }

    /// Predictions together with the rows whose SMILES failed to parse
    pub fn predict_batch(&self, input: &InputTable) -> Result<PredictionBatch, PredictorError> {
        let table = self.preprocess(input);
        let invalid_rows = table.invalid_rows().to_vec();
        let table = self.validator.validate(table)?;

        debug!("Feature matrix: {} x {}", table.n_rows(), table.n_columns());
        let result = self.engine.predict(table.to_matrix().view())?;

        info!(
            "Predicted {} rows ({} invalid SMILES) in {}ms",
            result.predictions.len(),
            invalid_rows.len(),
            result.latency_ms
        );
        Ok(PredictionBatch {
            values: result.predictions,
            invalid_rows,
        })
    }
}

/// Output of [`LgkPredictor::predict_batch`]
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionBatch {
    /// One value per input row
    pub values: Vec<f64>,
    /// Ascending indices of rows with unparseable SMILES
    pub invalid_rows: Vec<usize>,
}

impl PredictionBatch {
    pub fn is_valid(&self, row: usize) -> bool {
        self.invalid_rows.binary_search(&row).is_err()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_engine::feature_names;

    fn constant_model(names: &[String], value: f64) -> InferenceEngine {
        let features: Vec<String> = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                format!(
                    r#"{{"feature_index": {i}, "flat_feature_index": {i}, "borders": [], "nan_value_treatment": "AsIs", "feature_id": "{name}"}}"#
                )
            })
            .collect();
        let json = format!(
            r#"{{"features_info": {{"float_features": [{}]}}, "oblivious_trees": [], "scale_and_bias": [1.0, [{value}]]}}"#,
            features.join(",")
        );
        InferenceEngine::from_json_str(&json).unwrap()
    }

    fn small_config() -> FingerprintConfig {
        FingerprintConfig { radius: 2, n_bits: 32 }
    }

    #[test]
    fn test_compute_features_invalid_is_all_missing() {
        let names = feature_names(&small_config());
        let predictor = LgkPredictor::from_engine(constant_model(&names, 0.0), small_config(), SchemaPolicy::Strict);
        let features = predictor.compute_features(&ParsedMolecule::parse("C1CC"));
        assert!(features.values().iter().all(Option::is_none));
        let features = predictor.compute_features(&ParsedMolecule::parse("CCO"));
        assert!(features.is_complete());
    }

    #[test]
    fn test_predict_one_value_per_row() {
        let names = feature_names(&small_config());
        let predictor = LgkPredictor::from_engine(constant_model(&names, 4.2), small_config(), SchemaPolicy::Strict);
        let input = InputTable::from_smiles(["CCO", "xyz", "c1ccccc1"]);
        assert_eq!(predictor.predict(&input).unwrap(), vec![4.2, 4.2, 4.2]);

        let batch = predictor.predict_batch(&input).unwrap();
        assert_eq!(batch.invalid_rows, vec![1]);
        assert!(batch.is_valid(0));
        assert!(!batch.is_valid(1));
    }

    #[test]
    fn test_strict_schema_rejects_extra_columns() {
        let names = feature_names(&small_config());
        let predictor = LgkPredictor::from_engine(constant_model(&names, 0.0), small_config(), SchemaPolicy::Strict);
        let input = InputTable::from_smiles(["CCO"])
            .with_column("temperature", vec![Some(298.0)])
            .unwrap();
        assert!(matches!(
            predictor.predict(&input),
            Err(PredictorError::FeatureMismatch(_))
        ));
    }

    #[test]
    fn test_by_name_schema_drops_extra_columns() {
        let names = feature_names(&small_config());
        let predictor = LgkPredictor::from_engine(constant_model(&names, 1.5), small_config(), SchemaPolicy::ByName);
        let input = InputTable::from_smiles(["CCO"])
            .with_column("temperature", vec![Some(298.0)])
            .unwrap();
        assert_eq!(predictor.predict(&input).unwrap(), vec![1.5]);
    }

    #[test]
    fn test_from_config_without_model_path() {
        let err = LgkPredictor::from_config(&PredictorConfig::default()).unwrap_err();
        assert!(matches!(err, PredictorError::ModelLoad(_)));
    }
}
