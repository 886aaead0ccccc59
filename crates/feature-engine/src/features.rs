//! Feature Vector Assembly

use crate::descriptors::{compute_descriptors, DESCRIPTOR_COUNT, DESCRIPTOR_NAMES};
use crate::fingerprint::{FingerprintConfig, MorganFingerprint};
use molecule::ParsedMolecule;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Feature vector for one molecule
///
/// Every entry is `None` for an unparseable molecule and `Some` otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Descriptor values, aligned with `DESCRIPTOR_NAMES`
    pub descriptors: Vec<Option<f64>>,
    /// Folded fingerprint bits (0 or 1)
    pub fingerprint: Vec<Option<u8>>,
}

impl FeatureVector {
    /// All-missing vector for a molecule that could not be read
    pub fn missing(n_bits: usize) -> Self {
        Self {
            descriptors: vec![None; DESCRIPTOR_COUNT],
            fingerprint: vec![None; n_bits],
        }
    }

    /// Total number of features
    pub fn len(&self) -> usize {
        self.descriptors.len() + self.fingerprint.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a descriptor by name
    pub fn descriptor(&self, name: &str) -> Option<f64> {
        DESCRIPTOR_NAMES
            .iter()
            .position(|&n| n == name)
            .and_then(|idx| self.descriptors[idx])
    }

    /// Whether every feature is present
    pub fn is_complete(&self) -> bool {
        self.descriptors.iter().all(Option::is_some) && self.fingerprint.iter().all(Option::is_some)
    }

    /// Descriptor values followed by fingerprint bits
    pub fn values(&self) -> Vec<Option<f64>> {
        self.descriptors
            .iter()
            .copied()
            .chain(self.fingerprint.iter().map(|b| b.map(f64::from)))
            .collect()
    }
}

/// Column names produced by the extractor: descriptors, then bit indices
pub fn feature_names(config: &FingerprintConfig) -> Vec<String> {
    DESCRIPTOR_NAMES
        .iter()
        .map(|n| n.to_string())
        .chain((0..config.n_bits).map(|i| i.to_string()))
        .collect()
}

/// Computes descriptors and fingerprint bits from parsed molecules
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    fingerprint: MorganFingerprint,
}

impl FeatureExtractor {
    /// Create a new feature extractor
    pub fn new(config: FingerprintConfig) -> Self {
        Self {
            fingerprint: MorganFingerprint::new(config),
        }
    }

    pub fn config(&self) -> &FingerprintConfig {
        self.fingerprint.config()
    }

    /// Column names for this extractor's layout
    pub fn feature_names(&self) -> Vec<String> {
        feature_names(self.config())
    }

    /// Number of feature columns
    pub fn feature_count(&self) -> usize {
        DESCRIPTOR_COUNT + self.config().n_bits
    }

    /// Featurize one parse result
    pub fn compute(&self, parsed: &ParsedMolecule) -> FeatureVector {
        let Some(mol) = parsed.molecule() else {
            trace!("Invalid molecule, emitting missing features");
            return FeatureVector::missing(self.config().n_bits);
        };

        let descriptors = compute_descriptors(mol).into_iter().map(Some).collect();
        let fp = self.fingerprint.compute(mol);
        debug!(
            "Computed {} descriptors and {} fingerprint bits ({} set) for {} atoms",
            DESCRIPTOR_COUNT,
            fp.len(),
            fp.count_ones(),
            mol.atom_count()
        );

        FeatureVector {
            descriptors,
            fingerprint: fp.to_bits().into_iter().map(Some).collect(),
        }
    }

    /// Featurize a batch, preserving order
    pub fn compute_batch(&self, molecules: &[ParsedMolecule]) -> Vec<FeatureVector> {
        molecules.iter().map(|m| self.compute(m)).collect()
    }
}
