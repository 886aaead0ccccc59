//! lgK Predictor
//!
//! Predicts lgK for molecules given as SMILES strings: each row is parsed,
//! featurized into descriptors plus a Morgan fingerprint, checked against the
//! model's feature schema and scored by a CatBoost ensemble.

mod config;
mod error;
mod predictor;

pub use self::config::{PredictorConfig, ENV_PREFIX};
pub use self::error::PredictorError;
pub use self::predictor::{LgkPredictor, PredictionBatch};

pub use feature_engine::{FeatureVector, FingerprintConfig};
pub use feature_table::{CsvOptions, FeatureTable, InputTable, SchemaError, SchemaPolicy};
pub use molecule::ParsedMolecule;

use tracing_subscriber::EnvFilter;

/// Initialize logging
///
/// Honors `RUST_LOG` and falls back to `info`. With `json` set, events are
/// written as JSON lines. Logs go to stderr so stdout stays free for output.
pub fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    // A subscriber may already be installed (tests, embedding applications)
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
