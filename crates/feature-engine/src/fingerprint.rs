//! Morgan Circular Fingerprint
//!
//! Extended-connectivity fingerprint: every atom starts from a hashed
//! invariant and absorbs its neighbourhood one bond shell per iteration.
//! Environments covering a bond set already seen are dropped. Identifiers
//! are folded onto a fixed-width bit vector.

use molecule::Molecule;
use serde::{Deserialize, Serialize};

/// Fingerprint parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerprintConfig {
    /// Number of neighbourhood iterations
    pub radius: u32,
    /// Folded fingerprint width
    pub n_bits: usize,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            radius: 2,
            n_bits: 1024,
        }
    }
}

/// Fixed-width bit vector
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    words: Vec<u64>,
    n_bits: usize,
}

impl Fingerprint {
    /// All-zero fingerprint of `n_bits` bits
    pub fn new(n_bits: usize) -> Self {
        Self {
            words: vec![0; n_bits.div_ceil(64)],
            n_bits,
        }
    }

    pub fn len(&self) -> usize {
        self.n_bits
    }

    pub fn is_empty(&self) -> bool {
        self.n_bits == 0
    }

    pub fn set(&mut self, bit: usize) {
        if bit < self.n_bits {
            self.words[bit / 64] |= 1 << (bit % 64);
        }
    }

    pub fn get(&self, bit: usize) -> bool {
        bit < self.n_bits && self.words[bit / 64] & (1 << (bit % 64)) != 0
    }

    /// Number of set bits
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Bits as 0/1 values in index order
    pub fn to_bits(&self) -> Vec<u8> {
        (0..self.n_bits).map(|i| self.get(i) as u8).collect()
    }
}

/// boost::hash_combine on 32-bit seeds
fn hash_combine(seed: &mut u32, value: u32) {
    *seed ^= value
        .wrapping_add(0x9e37_79b9)
        .wrapping_add(*seed << 6)
        .wrapping_add(*seed >> 2);
}

/// Connectivity invariant of one atom
fn atom_invariant(mol: &Molecule, atom: usize) -> u32 {
    let a = mol.atom(atom);
    let isotope_delta = a
        .isotope
        .map(|iso| iso as i32 - a.element().average_mass.round() as i32)
        .unwrap_or(0);

    let mut seed = 0u32;
    hash_combine(&mut seed, a.atomic_number as u32);
    hash_combine(&mut seed, mol.total_degree(atom) as u32);
    hash_combine(&mut seed, mol.total_hydrogens(atom) as u32);
    hash_combine(&mut seed, a.formal_charge as i32 as u32);
    hash_combine(&mut seed, isotope_delta as u32);
    hash_combine(&mut seed, mol.is_ring_atom(atom) as u32);
    seed
}

/// Morgan fingerprint generator
#[derive(Debug, Clone, Default)]
pub struct MorganFingerprint {
    config: FingerprintConfig,
}

impl MorganFingerprint {
    pub fn new(config: FingerprintConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FingerprintConfig {
        &self.config
    }

    /// Unfolded environment identifiers up to `radius`, one per retained
    /// environment (duplicates kept)
    pub fn environment_ids(mol: &Molecule, radius: u32) -> Vec<u32> {
        let n = mol.atom_count();
        let words = mol.bond_count().div_ceil(64).max(1);

        let mut invariants: Vec<u32> = (0..n).map(|i| atom_invariant(mol, i)).collect();
        let mut ids = invariants.clone();

        let mut neighborhoods: Vec<Vec<u64>> = vec![vec![0; words]; n];
        let mut seen: Vec<Vec<u64>> = Vec::new();
        let mut dead = vec![false; n];

        for layer in 0..radius {
            let mut candidates: Vec<(Vec<u64>, u32, usize)> = Vec::new();
            let mut next_invariants = invariants.clone();

            for atom in 0..n {
                if dead[atom] {
                    continue;
                }
                let mut neighbors: Vec<(u32, u32)> = mol
                    .neighbors(atom)
                    .iter()
                    .map(|&(other, bond)| (mol.bond(bond).order.type_code(), invariants[other]))
                    .collect();
                neighbors.sort_unstable();

                let mut seed = layer;
                hash_combine(&mut seed, invariants[atom]);
                for (bond_type, invariant) in neighbors {
                    hash_combine(&mut seed, bond_type);
                    hash_combine(&mut seed, invariant);
                }
                next_invariants[atom] = seed;

                let mut covered = neighborhoods[atom].clone();
                for &(other, bond) in mol.neighbors(atom) {
                    covered[bond / 64] |= 1 << (bond % 64);
                    for (c, w) in covered.iter_mut().zip(&neighborhoods[other]) {
                        *c |= w;
                    }
                }
                candidates.push((covered, seed, atom));
            }

            candidates.sort();
            for (covered, id, atom) in candidates {
                if seen.contains(&covered) {
                    dead[atom] = true;
                } else {
                    ids.push(id);
                    seen.push(covered.clone());
                }
                neighborhoods[atom] = covered;
            }
            invariants = next_invariants;
        }
        ids
    }

    /// Fold environment identifiers into a fixed-width fingerprint
    pub fn compute(&self, mol: &Molecule) -> Fingerprint {
        let mut fp = Fingerprint::new(self.config.n_bits);
        if self.config.n_bits == 0 {
            return fp;
        }
        for id in Self::environment_ids(mol, self.config.radius) {
            fp.set(id as usize % self.config.n_bits);
        }
        fp
    }
}
