//! Input and Feature Tables

use crate::error::TableError;
use feature_engine::FeatureExtractor;
use molecule::ParsedMolecule;
use ndarray::Array2;
use tracing::{debug, warn};

/// Default name of the SMILES column
pub const SMILES_COLUMN: &str = "smiles";

/// Named numeric column
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Prediction input: one SMILES string per row plus pass-through columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputTable {
    smiles: Vec<String>,
    columns: Vec<Column>,
}

impl InputTable {
    /// Table with only a SMILES column
    pub fn new(smiles: Vec<String>) -> Self {
        Self {
            smiles,
            columns: Vec::new(),
        }
    }

    /// Build from any iterator of strings
    pub fn from_smiles<I, S>(smiles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(smiles.into_iter().map(Into::into).collect())
    }

    /// Append a pass-through numeric column
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<Option<f64>>) -> Result<Self, TableError> {
        self.push_column(name.into(), values)?;
        Ok(self)
    }

    pub(crate) fn push_column(&mut self, name: String, values: Vec<Option<f64>>) -> Result<(), TableError> {
        if name == SMILES_COLUMN {
            return Err(TableError::ReservedColumn(name));
        }
        if self.columns.iter().any(|c| c.name == name) {
            return Err(TableError::DuplicateColumn(name));
        }
        if values.len() != self.smiles.len() {
            return Err(TableError::ColumnLength {
                column: name,
                expected: self.smiles.len(),
                actual: values.len(),
            });
        }
        self.columns.push(Column { name, values });
        Ok(())
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.smiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.smiles.is_empty()
    }

    pub fn smiles(&self) -> &[String] {
        &self.smiles
    }

    /// Pass-through columns, in input order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Row-aligned numeric table handed to the model
///
/// Columns are the input's pass-through columns, then descriptors, then
/// fingerprint bits. Missing cells are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    columns: Vec<String>,
    rows: Vec<Vec<Option<f64>>>,
    invalid_rows: Vec<usize>,
}

impl FeatureTable {
    /// Parse and featurize every row of `input`
    pub fn assemble(input: &InputTable, extractor: &FeatureExtractor) -> Self {
        let mut columns: Vec<String> = input.columns().iter().map(|c| c.name.clone()).collect();
        columns.extend(extractor.feature_names());

        let mut rows = Vec::with_capacity(input.len());
        let mut invalid_rows = Vec::new();

        for (idx, smiles) in input.smiles().iter().enumerate() {
            let parsed = ParsedMolecule::parse(smiles);
            if let Some(reason) = parsed.error() {
                warn!("Row {}: invalid SMILES '{}': {}", idx, smiles, reason);
                invalid_rows.push(idx);
            }

            let mut row: Vec<Option<f64>> = input.columns().iter().map(|c| c.values[idx]).collect();
            row.extend(extractor.compute(&parsed).values());
            rows.push(row);
        }

        debug!(
            "Assembled feature table: {} rows x {} columns, {} invalid",
            rows.len(),
            columns.len(),
            invalid_rows.len()
        );

        Self {
            columns,
            rows,
            invalid_rows,
        }
    }

    /// Build from explicit columns and rows
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Option<f64>>>) -> Result<Self, TableError> {
        if let Some(row) = rows.iter().find(|r| r.len() != columns.len()) {
            return Err(TableError::ColumnLength {
                column: "<row>".to_string(),
                expected: columns.len(),
                actual: row.len(),
            });
        }
        Ok(Self {
            columns,
            rows,
            invalid_rows: Vec::new(),
        })
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn row(&self, idx: usize) -> &[Option<f64>] {
        &self.rows[idx]
    }

    pub fn rows(&self) -> &[Vec<Option<f64>>] {
        &self.rows
    }

    /// Indices of rows whose SMILES could not be parsed
    pub fn invalid_rows(&self) -> &[usize] {
        &self.invalid_rows
    }

    pub fn is_valid_row(&self, idx: usize) -> bool {
        self.invalid_rows.binary_search(&idx).is_err()
    }

    /// New table holding the given columns in the given order
    pub fn select(&self, indices: &[usize]) -> FeatureTable {
        FeatureTable {
            columns: indices.iter().map(|&i| self.columns[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|r| indices.iter().map(|&i| r[i]).collect())
                .collect(),
            invalid_rows: self.invalid_rows.clone(),
        }
    }

    /// Dense matrix with missing cells as NaN
    pub fn to_matrix(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.n_rows(), self.n_columns()), |(r, c)| {
            self.rows[r][c].unwrap_or(f64::NAN)
        })
    }
}
