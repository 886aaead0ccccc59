//! Feature Engineering Engine
//!
//! Provides molecular descriptor and circular fingerprint extraction for ML inference.

mod burden;
mod charges;
mod contrib;
mod descriptors;
mod features;
mod fingerprint;
mod fragments;
mod patterns;
mod qed;
mod surface;
mod topology;

pub use burden::bcut;
pub use charges::{gasteiger_charges, PartialCharges};
pub use contrib::{crippen, tpsa};
pub use descriptors::{compute_descriptors, DESCRIPTOR_COUNT, DESCRIPTOR_NAMES};
pub use features::{feature_names, FeatureExtractor, FeatureVector};
pub use fingerprint::{Fingerprint, FingerprintConfig, MorganFingerprint};
pub use fragments::fragment_counts;
pub use qed::{qed, QedProperties};
pub use surface::{bin_sums, labute_asa, labute_contributions, SurfaceContributions};
pub use topology::{
    balaban_j, bertz_ct, chi_indices, estate_indices, hall_kier_alpha, ipc, kappa_indices, phi, ChiIndices,
};
