use feature_engine::feature_names;
use lgk_predictor::{
    FingerprintConfig, InputTable, LgkPredictor, PredictorConfig, PredictorError, SchemaPolicy,
};
use serde_json::{json, Value};
use std::io::Write;
use tempfile::NamedTempFile;

/// Two single-split trees: MolWt > 60 and NumAromaticRings > 0.5 (NaN counts as true)
fn model_json(names: &[String]) -> Value {
    let position = |name: &str| names.iter().position(|n| n == name).unwrap();
    let mol_wt = position("MolWt");
    let aromatic = position("NumAromaticRings");

    let float_features: Vec<Value> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            json!({
                "feature_index": i,
                "flat_feature_index": i,
                "borders": [],
                "has_nans": false,
                "nan_value_treatment": if i == aromatic { "AsTrue" } else { "AsIs" },
                "feature_id": name,
            })
        })
        .collect();

    json!({
        "model_info": {},
        "features_info": { "float_features": float_features },
        "oblivious_trees": [
            {
                "splits": [{ "float_feature_index": mol_wt, "border": 60.0, "split_index": 0, "split_type": "FloatFeature" }],
                "leaf_values": [1.0, 2.0],
                "leaf_weights": [10.0, 10.0]
            },
            {
                "splits": [{ "float_feature_index": aromatic, "border": 0.5, "split_index": 1, "split_type": "FloatFeature" }],
                "leaf_values": [0.0, 10.0],
                "leaf_weights": [10.0, 10.0]
            }
        ],
        "scale_and_bias": [1.0, [0.5]]
    })
}

fn write_model(model: &Value) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(model.to_string().as_bytes()).unwrap();
    file
}

/// Descriptor columns of a model trained on RDKit's descriptor list, then the fingerprint bits
fn rdkit_model_names() -> Vec<String> {
    include_str!("data/rdkit_descriptors.txt")
        .lines()
        .map(str::to_string)
        .chain((0..1024).map(|i| i.to_string()))
        .collect()
}

fn default_model() -> NamedTempFile {
    write_model(&model_json(&feature_names(&FingerprintConfig::default())))
}

#[test]
fn test_three_row_scenario() {
    let model = default_model();
    let predictor = LgkPredictor::new(model.path()).unwrap();
    let input = InputTable::from_smiles(["CCO", "not_a_smiles", "c1ccccc1"]);

    let table = predictor.preprocess(&input);
    assert_eq!(table.n_rows(), 3);
    assert_eq!(table.invalid_rows(), &[1]);
    assert!(table.row(1).iter().all(Option::is_none));
    assert!(!table.column_names().iter().any(|c| c == "smiles"));

    let predictions = predictor.predict(&input).unwrap();
    assert_eq!(predictions.len(), 3);
    assert_eq!(predictions[0], 1.5);
    assert_eq!(predictions[1], 11.5);
    assert_eq!(predictions[2], 12.5);
}

#[test]
fn test_prediction_is_idempotent() {
    let model = default_model();
    let predictor = LgkPredictor::new(model.path()).unwrap();
    let input = InputTable::from_smiles(["CC(=O)Oc1ccccc1C(=O)O", "C1=CC=CC=C1", "OCC(O)CO"]);

    let first = predictor.predict(&input).unwrap();
    let second = predictor.predict(&input).unwrap();
    assert_eq!(first, second);
    // Kekulé benzene is perceived aromatic
    assert_eq!(first[1], 12.5);
}

#[test]
fn test_nonexistent_model_path() {
    let err = LgkPredictor::new("/nonexistent/model.json").unwrap_err();
    assert!(matches!(err, PredictorError::ModelLoad(_)));
}

#[test]
fn test_binary_model_is_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"CBM1\x00\x00\x00\x00").unwrap();
    let err = LgkPredictor::new(file.path()).unwrap_err();
    assert!(matches!(err, PredictorError::ModelLoad(_)));
}

#[test]
fn test_mismatched_fingerprint_width() {
    let model = default_model();
    let small = FingerprintConfig { radius: 2, n_bits: 512 };
    let predictor = LgkPredictor::with_options(model.path(), small, SchemaPolicy::Strict).unwrap();

    let err = predictor.predict(&InputTable::from_smiles(["CCO"])).unwrap_err();
    assert!(matches!(err, PredictorError::FeatureMismatch(_)));
}

#[test]
fn test_passthrough_columns_reach_the_model() {
    let mut names = vec!["temperature".to_string()];
    names.extend(feature_names(&FingerprintConfig::default()));
    let model = write_model(&model_json(&names));
    let predictor = LgkPredictor::new(model.path()).unwrap();

    let input = InputTable::from_smiles(["CCO", "c1ccccc1"])
        .with_column("temperature", vec![Some(298.15), None])
        .unwrap();
    assert_eq!(predictor.predict(&input).unwrap(), vec![1.5, 12.5]);

    let err = predictor.predict(&InputTable::from_smiles(["CCO"])).unwrap_err();
    assert!(matches!(err, PredictorError::FeatureMismatch(_)));
}

#[test]
fn test_from_config_and_csv_input() {
    let model = default_model();
    let config = PredictorConfig {
        model_path: Some(model.path().to_path_buf()),
        drop_columns: vec!["id".to_string()],
        ..Default::default()
    };
    let predictor = LgkPredictor::from_config(&config).unwrap();

    let csv = "id,smiles\nm1,CCO\nm2,???\nm3,c1ccccc1\n";
    let input = InputTable::from_csv_reader(csv.as_bytes(), &config.csv_options()).unwrap();
    let batch = predictor.predict_batch(&input).unwrap();

    assert_eq!(batch.values, vec![1.5, 11.5, 12.5]);
    assert_eq!(batch.invalid_rows, vec![1]);
}

#[test]
fn test_rdkit_descriptor_model_is_accepted() {
    let names = rdkit_model_names();
    assert_eq!(names.len(), 217 + 1024);
    let model = write_model(&model_json(&names));
    let input = InputTable::from_smiles(["CCO", "c1ccccc1"]);

    for policy in [SchemaPolicy::Strict, SchemaPolicy::ByName, SchemaPolicy::Permissive] {
        let predictor = LgkPredictor::with_options(model.path(), FingerprintConfig::default(), policy).unwrap();
        assert_eq!(predictor.predict(&input).unwrap(), vec![1.5, 12.5], "{policy:?}");
    }

    let mut reordered = names;
    reordered.reverse();
    let model = write_model(&model_json(&reordered));
    let predictor =
        LgkPredictor::with_options(model.path(), FingerprintConfig::default(), SchemaPolicy::ByName).unwrap();
    assert_eq!(predictor.predict(&input).unwrap(), vec![1.5, 12.5]);

    let features = predictor.compute_features(&lgk_predictor::ParsedMolecule::parse("CCO"));
    assert!(features.descriptor("qed").is_some_and(|q| q > 0.0 && q < 1.0));
}
