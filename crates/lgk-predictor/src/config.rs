//! Predictor configuration

use feature_engine::FingerprintConfig;
use feature_table::{CsvOptions, SchemaPolicy, SMILES_COLUMN};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix of environment variables that override file settings
pub const ENV_PREFIX: &str = "LGK";

/// Predictor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// CatBoost JSON model
    pub model_path: Option<PathBuf>,

    /// Header of the SMILES column in CSV input
    pub smiles_column: String,

    /// Input columns excluded from the feature table
    pub drop_columns: Vec<String>,

    /// How feature columns are matched to the model
    pub schema_policy: SchemaPolicy,

    /// Morgan fingerprint settings; must match training
    pub fingerprint: FingerprintConfig,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            smiles_column: SMILES_COLUMN.to_string(),
            drop_columns: Vec::new(),
            schema_policy: SchemaPolicy::default(),
            fingerprint: FingerprintConfig::default(),
        }
    }
}

impl PredictorConfig {
    /// Load from an optional file, then `LGK_*` environment variables
    ///
    /// Nested keys use a double underscore, e.g. `LGK_FINGERPRINT__N_BITS`.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }
        builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("drop_columns"),
            )
            .build()?
            .try_deserialize()
    }

    /// CSV options derived from this configuration
    pub fn csv_options(&self) -> CsvOptions {
        CsvOptions {
            smiles_column: self.smiles_column.clone(),
            drop_columns: self.drop_columns.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    /// Serializes tests that read or write `LGK_*` variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults() {
        let config = PredictorConfig::default();
        assert_eq!(config.smiles_column, "smiles");
        assert_eq!(config.schema_policy, SchemaPolicy::Strict);
        assert_eq!(config.fingerprint.radius, 2);
        assert_eq!(config.fingerprint.n_bits, 1024);
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
model_path = "models/lgk.json"
smiles_column = "SMILES"
drop_columns = ["id", "name"]
schema_policy = "by_name"

[fingerprint]
n_bits = 2048
"#
        )
        .unwrap();

        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let config = PredictorConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.model_path, Some(PathBuf::from("models/lgk.json")));
        assert_eq!(config.smiles_column, "SMILES");
        assert_eq!(config.drop_columns, vec!["id", "name"]);
        assert_eq!(config.schema_policy, SchemaPolicy::ByName);
        assert_eq!(config.fingerprint.n_bits, 2048);
        assert_eq!(config.fingerprint.radius, 2);

        let csv = config.csv_options();
        assert_eq!(csv.smiles_column, "SMILES");
        assert_eq!(csv.drop_columns.len(), 2);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let result = PredictorConfig::load(Some(Path::new("/nonexistent/lgk.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_environment_overrides() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let vars = [
            ("LGK_SCHEMA_POLICY", "by_name"),
            ("LGK_FINGERPRINT__N_BITS", "2048"),
            ("LGK_DROP_COLUMNS", "id,name"),
        ];
        for (key, value) in vars {
            std::env::set_var(key, value);
        }

        let result = PredictorConfig::load(None);
        for (key, _) in vars {
            std::env::remove_var(key);
        }

        let config = result.unwrap();
        assert_eq!(config.schema_policy, SchemaPolicy::ByName);
        assert_eq!(config.fingerprint.n_bits, 2048);
        assert_eq!(config.fingerprint.radius, 2);
        assert_eq!(config.drop_columns, vec!["id", "name"]);
        assert_eq!(config.smiles_column, "smiles");
    }
}
