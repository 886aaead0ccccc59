//! Feature Table Assembly
//!
//! Turns an input table of SMILES strings into the numeric feature table a
//! model consumes, and checks that table against the model's schema.

pub mod error;
pub mod loader;
pub mod schema;
pub mod table;

pub use error::{SchemaError, TableError};
pub use loader::CsvOptions;
pub use schema::{SchemaPolicy, SchemaValidator};
pub use table::{Column, FeatureTable, InputTable, SMILES_COLUMN};
