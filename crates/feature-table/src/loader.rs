//! CSV Input Loading

use crate::error::TableError;
use crate::table::{InputTable, SMILES_COLUMN};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// How a CSV file maps onto an input table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    /// Header of the SMILES column
    pub smiles_column: String,
    /// Identifier or text columns to leave out of the feature table
    pub drop_columns: Vec<String>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            smiles_column: SMILES_COLUMN.to_string(),
            drop_columns: Vec::new(),
        }
    }
}

fn parse_cell(value: &str) -> Option<Option<f64>> {
    if value.is_empty() || value.eq_ignore_ascii_case("na") || value.eq_ignore_ascii_case("nan") {
        return Some(None);
    }
    value.parse::<f64>().ok().map(|v| (!v.is_nan()).then_some(v))
}

impl InputTable {
    /// Read a CSV with a header row
    pub fn from_csv_reader<R: Read>(reader: R, options: &CsvOptions) -> Result<Self, TableError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

        let smiles_idx = headers
            .iter()
            .position(|h| *h == options.smiles_column)
            .ok_or_else(|| TableError::MissingSmilesColumn(options.smiles_column.clone()))?;

        for name in &options.drop_columns {
            if !headers.contains(name) {
                warn!("Drop column '{}' not present in input", name);
            }
        }
        let kept: Vec<usize> = (0..headers.len())
            .filter(|&i| i != smiles_idx && !options.drop_columns.contains(&headers[i]))
            .collect();

        let mut smiles = Vec::new();
        let mut values: Vec<Vec<Option<f64>>> = vec![Vec::new(); kept.len()];
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            smiles.push(record.get(smiles_idx).unwrap_or("").to_string());
            for (slot, &col) in kept.iter().enumerate() {
                let cell = record.get(col).unwrap_or("");
                let value = parse_cell(cell).ok_or_else(|| TableError::NonNumericCell {
                    row,
                    column: headers[col].clone(),
                    value: cell.to_string(),
                })?;
                values[slot].push(value);
            }
        }

        let mut table = InputTable::new(smiles);
        for (&col, column) in kept.iter().zip(values) {
            table.push_column(headers[col].clone(), column)?;
        }

        debug!(
            "Read CSV: {} rows, pass-through columns {:?}",
            table.len(),
            table.column_names()
        );
        Ok(table)
    }

    /// Read a CSV file from disk
    pub fn from_csv_path(path: impl AsRef<Path>, options: &CsvOptions) -> Result<Self, TableError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let table = Self::from_csv_reader(std::io::BufReader::new(file), options)?;
        info!("Loaded {} rows from {}", table.len(), path.display());
        Ok(table)
    }
}
