//! Parse outcome for a single input string

use crate::error::SmilesError;
use crate::graph::Molecule;
use crate::smiles::parse_smiles;
use tracing::debug;

/// Result of reading one SMILES string.
///
/// Unreadable input is carried as a value rather than an error so that a
/// batch keeps one entry per input row.
#[derive(Debug, Clone)]
pub enum ParsedMolecule {
    Valid(Molecule),
    Invalid { smiles: String, reason: SmilesError },
}

impl ParsedMolecule {
    /// Parse a SMILES string, never failing
    pub fn parse(smiles: &str) -> Self {
        match parse_smiles(smiles) {
            Ok(mol) => ParsedMolecule::Valid(mol),
            Err(reason) => {
                debug!("Could not parse SMILES '{}': {}", smiles, reason);
                ParsedMolecule::Invalid {
                    smiles: smiles.to_string(),
                    reason,
                }
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ParsedMolecule::Valid(_))
    }

    /// The molecule, if parsing succeeded
    pub fn molecule(&self) -> Option<&Molecule> {
        match self {
            ParsedMolecule::Valid(mol) => Some(mol),
            ParsedMolecule::Invalid { .. } => None,
        }
    }

    /// The parse failure, if any
    pub fn error(&self) -> Option<&SmilesError> {
        match self {
            ParsedMolecule::Valid(_) => None,
            ParsedMolecule::Invalid { reason, .. } => Some(reason),
        }
    }
}
