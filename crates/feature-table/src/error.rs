//! Table Error Types

use thiserror::Error;

/// Errors while building or loading tables
#[derive(Debug, Error)]
pub enum TableError {
    /// Column length differs from the number of rows
    #[error("Column '{column}' has {actual} values, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Column name already present
    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    /// Pass-through column uses the SMILES column name
    #[error("Column name '{0}' is reserved for SMILES input")]
    ReservedColumn(String),

    /// Input has no SMILES column
    #[error("Missing SMILES column: {0}")]
    MissingSmilesColumn(String),

    /// Pass-through cell is neither numeric nor a missing marker
    #[error("Row {row}, column '{column}': '{value}' is not a number")]
    NonNumericCell {
        row: usize,
        column: String,
        value: String,
    },

    /// CSV reading failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File could not be opened
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Feature table does not match the model's expected layout
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Feature count mismatch: model expects {expected}, table has {actual}")]
    ColumnCount { expected: usize, actual: usize },

    #[error("Feature at position {position} is '{actual}', model expects '{expected}'")]
    NameMismatch {
        position: usize,
        expected: String,
        actual: String,
    },

    #[error("Model feature '{0}' is not in the feature table")]
    MissingFeature(String),

    #[error("Model feature '{0}' appears more than once in the feature table")]
    AmbiguousFeature(String),
}
