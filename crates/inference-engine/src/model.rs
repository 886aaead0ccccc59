//! CatBoost JSON Model Format

use crate::InferenceError;
use serde::Deserialize;

/// Magic bytes at the start of a binary `.cbm` export
pub(crate) const CBM_MAGIC: &[u8] = b"CBM1";

#[derive(Debug, Deserialize)]
pub(crate) struct RawModel {
    #[serde(default)]
    pub features_info: FeaturesInfo,
    #[serde(default)]
    pub oblivious_trees: Option<Vec<RawTree>>,
    #[serde(default)]
    pub non_symmetric_trees: Option<serde_json::Value>,
    #[serde(default)]
    pub scale_and_bias: Option<ScaleAndBias>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct FeaturesInfo {
    #[serde(default)]
    pub float_features: Vec<FloatFeature>,
    #[serde(default)]
    pub categorical_features: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FloatFeature {
    pub feature_index: usize,
    pub flat_feature_index: usize,
    #[serde(default)]
    pub nan_value_treatment: NanTreatment,
    #[serde(default)]
    pub feature_id: Option<String>,
}

/// What a NaN input means for the splits on a feature
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum NanTreatment {
    #[default]
    AsIs,
    AsFalse,
    AsTrue,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTree {
    #[serde(default)]
    pub splits: Vec<RawSplit>,
    pub leaf_values: Vec<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSplit {
    pub float_feature_index: Option<usize>,
    pub border: Option<f64>,
    #[serde(default)]
    pub split_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ScaleAndBias {
    Vector(f64, Vec<f64>),
    Scalar(f64, f64),
}

impl ScaleAndBias {
    fn resolve(&self) -> Result<(f64, f64), InferenceError> {
        match self {
            ScaleAndBias::Scalar(scale, bias) => Ok((*scale, *bias)),
            ScaleAndBias::Vector(scale, bias) => match bias.as_slice() {
                [] => Ok((*scale, 0.0)),
                [bias] => Ok((*scale, *bias)),
                _ => Err(load_error(format!(
                    "multi-dimensional bias of length {} is not supported",
                    bias.len()
                ))),
            },
        }
    }
}

/// One split: input column, threshold and NaN handling
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Split {
    pub feature: usize,
    pub border: f32,
    pub nan_true: bool,
}

/// Oblivious tree: the same split at every node of a level
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ObliviousTree {
    pub splits: Vec<Split>,
    pub leaf_values: Vec<f64>,
}

impl ObliviousTree {
    pub fn leaf_index(&self, row: &[f64]) -> usize {
        self.splits.iter().enumerate().fold(0, |index, (depth, split)| {
            let value = row[split.feature];
            let goes_right = if value.is_nan() {
                split.nan_true
            } else {
                value as f32 > split.border
            };
            index | ((goes_right as usize) << depth)
        })
    }
}

/// Validated regression ensemble
#[derive(Debug, Clone, PartialEq)]
pub struct Ensemble {
    pub(crate) trees: Vec<ObliviousTree>,
    pub(crate) scale: f64,
    pub(crate) bias: f64,
    pub(crate) feature_count: usize,
    pub(crate) feature_names: Option<Vec<String>>,
}

fn load_error(msg: impl Into<String>) -> InferenceError {
    InferenceError::ModelLoadError(msg.into())
}

impl Ensemble {
    pub(crate) fn from_bytes(bytes: &[u8]) -> Result<Self, InferenceError> {
        if bytes.starts_with(CBM_MAGIC) {
            return Err(load_error(
                "binary CatBoost model; export with save_model(..., format=\"json\")",
            ));
        }
        let raw: RawModel = serde_json::from_slice(bytes).map_err(|e| load_error(format!("invalid model JSON: {}", e)))?;
        Self::from_raw(raw)
    }

    pub(crate) fn from_raw(raw: RawModel) -> Result<Self, InferenceError> {
        if !raw.features_info.categorical_features.is_empty() {
            return Err(load_error("categorical features are not supported"));
        }
        if raw.non_symmetric_trees.is_some() {
            return Err(load_error("non-symmetric trees are not supported"));
        }
        let raw_trees = raw
            .oblivious_trees
            .ok_or_else(|| load_error("model has no oblivious_trees"))?;

        let features = &raw.features_info.float_features;
        let feature_count = features
            .iter()
            .map(|f| f.flat_feature_index + 1)
            .max()
            .unwrap_or(0);

        let mut trees = Vec::with_capacity(raw_trees.len());
        for (tree_idx, tree) in raw_trees.into_iter().enumerate() {
            let mut splits = Vec::with_capacity(tree.splits.len());
            for split in &tree.splits {
                if let Some(kind) = split.split_type.as_deref() {
                    if kind != "FloatFeature" {
                        return Err(load_error(format!("tree {}: unsupported split type {}", tree_idx, kind)));
                    }
                }
                let (index, border) = match (split.float_feature_index, split.border) {
                    (Some(index), Some(border)) => (index, border),
                    _ => return Err(load_error(format!("tree {}: split without feature or border", tree_idx))),
                };
                let feature = features
                    .iter()
                    .find(|f| f.feature_index == index)
                    .ok_or_else(|| load_error(format!("tree {}: split on unknown feature {}", tree_idx, index)))?;
                splits.push(Split {
                    feature: feature.flat_feature_index,
                    border: border as f32,
                    nan_true: feature.nan_value_treatment == NanTreatment::AsTrue,
                });
            }

            if splits.len() >= usize::BITS as usize {
                return Err(load_error(format!("tree {}: depth {} too large", tree_idx, splits.len())));
            }
            let expected = 1usize << splits.len();
            if tree.leaf_values.len() != expected {
                let msg = if tree.leaf_values.len() > expected && tree.leaf_values.len() % expected == 0 {
                    format!("tree {}: multi-dimensional leaves are not supported", tree_idx)
                } else {
                    format!(
                        "tree {}: {} leaf values for depth {}, expected {}",
                        tree_idx,
                        tree.leaf_values.len(),
                        splits.len(),
                        expected
                    )
                };
                return Err(load_error(msg));
            }

            trees.push(ObliviousTree {
                splits,
                leaf_values: tree.leaf_values,
            });
        }

        let (scale, bias) = match &raw.scale_and_bias {
            Some(sb) => sb.resolve()?,
            None => (1.0, 0.0),
        };

        let mut ordered: Vec<&FloatFeature> = features.iter().collect();
        ordered.sort_by_key(|f| f.flat_feature_index);
        let dense = ordered.iter().enumerate().all(|(i, f)| f.flat_feature_index == i);
        let feature_names = if dense {
            ordered.iter().map(|f| f.feature_id.clone()).collect::<Option<Vec<_>>>()
        } else {
            None
        };

        Ok(Self {
            trees,
            scale,
            bias,
            feature_count,
            feature_names,
        })
    }

    /// Raw prediction for one row
    pub(crate) fn predict_row(&self, row: &[f64]) -> f64 {
        let sum: f64 = self
            .trees
            .iter()
            .map(|tree| tree.leaf_values[tree.leaf_index(row)])
            .sum();
        self.scale * sum + self.bias
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(json: &str) -> Result<Ensemble, InferenceError> {
        Ensemble::from_bytes(json.as_bytes())
    }

    const TWO_FEATURES: &str = r#"{
        "features_info": {"float_features": [
            {"feature_index": 0, "flat_feature_index": 0, "borders": [0.5], "nan_value_treatment": "AsIs", "feature_id": "a"},
            {"feature_index": 1, "flat_feature_index": 1, "borders": [1.5], "nan_value_treatment": "AsTrue", "feature_id": "b"}
        ]},
        "oblivious_trees": [
            {"splits": [{"float_feature_index": 0, "border": 0.5, "split_type": "FloatFeature"},
                        {"float_feature_index": 1, "border": 1.5, "split_type": "FloatFeature"}],
             "leaf_values": [0.0, 1.0, 2.0, 3.0]}
        ],
        "scale_and_bias": [2.0, [0.25]]
    }"#;

    #[test]
    fn test_leaf_index_bit_order() {
        let model = load(TWO_FEATURES).unwrap();
        // Bit 0 comes from the first split
        assert_eq!(model.predict_row(&[0.0, 0.0]), 0.25);
        assert_eq!(model.predict_row(&[1.0, 0.0]), 2.25);
        assert_eq!(model.predict_row(&[0.0, 2.0]), 4.25);
        assert_eq!(model.predict_row(&[1.0, 2.0]), 6.25);
    }

    #[test]
    fn test_border_is_strict() {
        let model = load(TWO_FEATURES).unwrap();
        assert_eq!(model.predict_row(&[0.5, 1.5]), 0.25);
    }

    #[test]
    fn test_nan_treatment() {
        let model = load(TWO_FEATURES).unwrap();
        // AsIs -> false, AsTrue -> true
        assert_eq!(model.predict_row(&[f64::NAN, f64::NAN]), 4.25);
    }

    #[test]
    fn test_feature_names_and_count() {
        let model = load(TWO_FEATURES).unwrap();
        assert_eq!(model.feature_count, 2);
        assert_eq!(model.feature_names, Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(model.tree_count(), 1);
    }

    #[test]
    fn test_names_absent_when_any_feature_unnamed() {
        let json = r#"{
            "features_info": {"float_features": [
                {"feature_index": 0, "flat_feature_index": 0, "feature_id": "a"},
                {"feature_index": 1, "flat_feature_index": 1}
            ]},
            "oblivious_trees": []
        }"#;
        let model = load(json).unwrap();
        assert_eq!(model.feature_names, None);
        assert_eq!(model.feature_count, 2);
    }

    #[test]
    fn test_scalar_bias_and_empty_ensemble() {
        let json = r#"{"features_info": {"float_features": []}, "oblivious_trees": [], "scale_and_bias": [1.0, 3.5]}"#;
        let model = load(json).unwrap();
        assert_eq!(model.predict_row(&[]), 3.5);
    }

    #[test]
    fn test_rejects_binary_model() {
        let err = Ensemble::from_bytes(b"CBM1\x00\x01\x02").unwrap_err();
        assert!(matches!(err, InferenceError::ModelLoadError(msg) if msg.contains("binary")));
    }

    #[test]
    fn test_rejects_invalid_json() {
        assert!(matches!(load("{not json"), Err(InferenceError::ModelLoadError(_))));
    }

    #[test]
    fn test_rejects_unsupported_models() {
        let categorical = r#"{"features_info": {"float_features": [], "categorical_features": [{"feature_index": 0}]}, "oblivious_trees": []}"#;
        assert!(load(categorical).is_err());

        let non_symmetric = r#"{"features_info": {"float_features": []}, "non_symmetric_trees": []}"#;
        assert!(load(non_symmetric).is_err());

        let multi_dim = r#"{
            "features_info": {"float_features": [{"feature_index": 0, "flat_feature_index": 0}]},
            "oblivious_trees": [{"splits": [{"float_feature_index": 0, "border": 0.0}], "leaf_values": [0, 1, 2, 3]}]
        }"#;
        let err = load(multi_dim).unwrap_err();
        assert!(matches!(err, InferenceError::ModelLoadError(msg) if msg.contains("multi-dimensional")));

        let unknown = r#"{
            "features_info": {"float_features": [{"feature_index": 0, "flat_feature_index": 0}]},
            "oblivious_trees": [{"splits": [{"float_feature_index": 3, "border": 0.0}], "leaf_values": [0, 1]}]
        }"#;
        let err = load(unknown).unwrap_err();
        assert!(matches!(err, InferenceError::ModelLoadError(msg) if msg.contains("unknown feature")));

        let bad_leaves = r#"{
            "features_info": {"float_features": [{"feature_index": 0, "flat_feature_index": 0}]},
            "oblivious_trees": [{"splits": [{"float_feature_index": 0, "border": 0.0}], "leaf_values": [0, 1, 2]}]
        }"#;
        assert!(load(bad_leaves).is_err());
    }
}
