//! Model Schema Validation
//!
//! Checks a feature table against the layout a trained model expects
//! before any prediction is made.

use crate::error::SchemaError;
use crate::table::FeatureTable;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// How strictly table columns must match the model's features
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaPolicy {
    /// Same count, same names, same order
    #[default]
    Strict,
    /// Columns are looked up by name and reordered to the model's order
    ByName,
    /// Only the column count must match
    Permissive,
}

/// Validates feature tables against one model
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    expected_names: Option<Vec<String>>,
    expected_count: usize,
    policy: SchemaPolicy,
}

impl SchemaValidator {
    pub fn new(expected_names: Option<Vec<String>>, expected_count: usize, policy: SchemaPolicy) -> Self {
        if expected_names.is_none() && policy != SchemaPolicy::Permissive {
            warn!(
                "Model carries no feature names, {:?} policy checks column count only",
                policy
            );
        }
        Self {
            expected_names,
            expected_count,
            policy,
        }
    }

    /// Check `table` and return it in the model's column order
    pub fn validate(&self, table: FeatureTable) -> Result<FeatureTable, SchemaError> {
        let names = match (&self.expected_names, self.policy) {
            (Some(names), SchemaPolicy::Strict | SchemaPolicy::ByName) => names,
            (None, _) | (_, SchemaPolicy::Permissive) => {
                self.check_count(&table)?;
                return Ok(table);
            }
        };

        match self.policy {
            SchemaPolicy::Strict => {
                self.check_count(&table)?;
                for (position, (expected, actual)) in names.iter().zip(table.column_names()).enumerate() {
                    if expected != actual {
                        return Err(SchemaError::NameMismatch {
                            position,
                            expected: expected.clone(),
                            actual: actual.clone(),
                        });
                    }
                }
                debug!("Feature table matches model schema ({} columns)", names.len());
                Ok(table)
            }
            SchemaPolicy::ByName | SchemaPolicy::Permissive => {
                let mut positions: HashMap<&str, Vec<usize>> = HashMap::new();
                for (idx, name) in table.column_names().iter().enumerate() {
                    positions.entry(name.as_str()).or_default().push(idx);
                }

                let mut indices = Vec::with_capacity(names.len());
                for name in names {
                    match positions.get(name.as_str()).map(Vec::as_slice) {
                        None | Some([]) => return Err(SchemaError::MissingFeature(name.clone())),
                        Some([idx]) => indices.push(*idx),
                        Some(_) => return Err(SchemaError::AmbiguousFeature(name.clone())),
                    }
                }

                let dropped = table.n_columns() - indices.len();
                if dropped > 0 {
                    debug!("Dropping {} columns the model does not use", dropped);
                }
                Ok(table.select(&indices))
            }
        }
    }

    fn check_count(&self, table: &FeatureTable) -> Result<(), SchemaError> {
        if table.n_columns() != self.expected_count {
            return Err(SchemaError::ColumnCount {
                expected: self.expected_count,
                actual: table.n_columns(),
            });
        }
        Ok(())
    }
}
