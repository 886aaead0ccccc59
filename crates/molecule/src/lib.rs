//! Molecule Graph Library
//!
//! Reads SMILES strings into molecular graphs with implicit hydrogens,
//! smallest-set-of-smallest-rings perception and aromaticity flags, and
//! matches SMARTS substructure patterns against them.

mod aromaticity;
pub mod element;
mod error;
mod graph;
mod parsed;
mod ring;
mod smarts;
mod smiles;
mod stereo;

pub use error::{SmartsError, SmilesError};
pub use graph::{Atom, Bond, BondOrder, Molecule};
pub use parsed::ParsedMolecule;
pub use smarts::{MatchTarget, SmartsPattern, MAX_MATCHES};
pub use smiles::parse_smiles;
pub use stereo::StereoCenter;
