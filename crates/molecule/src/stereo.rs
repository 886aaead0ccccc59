//! Stereo Perception
//!
//! Tetrahedral centres are found from graph symmetry alone: an sp3 atom whose
//! four substituents fall into four different symmetry classes can carry a
//! configuration whether or not one was written. Double bonds count as stereo
//! bonds only when directional bonds were written on both ends.

use crate::graph::{BondOrder, Molecule};
use std::collections::BTreeMap;

/// Potential tetrahedral stereocentre
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StereoCenter {
    pub atom: usize,
    /// Configuration was written in the input
    pub specified: bool,
}

fn rank<K: Ord + Clone>(keys: &[K]) -> Vec<usize> {
    let mut distinct: BTreeMap<K, usize> = keys.iter().cloned().map(|k| (k, 0)).collect();
    for (rank, value) in distinct.values_mut().enumerate() {
        *value = rank;
    }
    keys.iter().map(|k| distinct[k]).collect()
}

fn class_count(classes: &[usize]) -> usize {
    classes.iter().max().map_or(0, |&m| m + 1)
}

impl Molecule {
    /// Symmetry class per atom, refined from atom invariants until stable
    pub fn symmetry_classes(&self) -> Vec<usize> {
        let n = self.atoms.len();
        let invariants: Vec<[i32; 7]> = (0..n)
            .map(|i| {
                let a = &self.atoms[i];
                [
                    a.atomic_number as i32,
                    self.heavy_degree(i) as i32,
                    self.total_hydrogens(i) as i32,
                    a.formal_charge as i32,
                    a.isotope.map_or(0, i32::from),
                    a.is_aromatic as i32,
                    self.ring_atoms[i] as i32,
                ]
            })
            .collect();
        let mut classes = rank(&invariants);

        for _ in 0..n {
            let keys: Vec<(usize, Vec<(u32, usize)>)> = (0..n)
                .map(|i| {
                    let mut env: Vec<(u32, usize)> = self.adjacency[i]
                        .iter()
                        .map(|&(j, b)| (self.bonds[b].order.type_code(), classes[j]))
                        .collect();
                    env.sort_unstable();
                    (classes[i], env)
                })
                .collect();
            let refined = rank(&keys);
            if class_count(&refined) == class_count(&classes) {
                break;
            }
            classes = refined;
        }
        classes
    }

    /// Atoms that can carry a tetrahedral configuration
    pub fn stereocenters(&self) -> Vec<StereoCenter> {
        let classes = self.symmetry_classes();
        (0..self.atoms.len())
            .filter_map(|i| {
                let a = &self.atoms[i];
                let eligible = match a.atomic_number {
                    6 | 14 | 32 => a.formal_charge == 0,
                    7 | 15 => a.formal_charge == 1,
                    _ => false,
                };
                if !eligible || a.is_aromatic || self.total_degree(i) != 4 || self.total_hydrogens(i) > 1 {
                    return None;
                }
                if self.adjacency[i]
                    .iter()
                    .any(|&(_, b)| self.bonds[b].order != BondOrder::Single)
                {
                    return None;
                }
                // Hydrogens, explicit or not, share one class
                let mut substituents: Vec<Option<usize>> = self.adjacency[i]
                    .iter()
                    .map(|&(j, _)| self.atoms[j].is_heavy().then_some(classes[j]))
                    .chain((0..a.hydrogens).map(|_| None))
                    .collect();
                substituents.sort_unstable();
                substituents.dedup();
                (substituents.len() == 4).then_some(StereoCenter {
                    atom: i,
                    specified: a.chiral,
                })
            })
            .collect()
    }

    /// Acyclic double bonds with a written cis/trans configuration
    pub fn stereo_double_bonds(&self) -> Vec<usize> {
        self.bonds
            .iter()
            .enumerate()
            .filter(|&(idx, bond)| {
                bond.order == BondOrder::Double
                    && !self.ring_bonds[idx]
                    && [bond.atom1, bond.atom2].iter().all(|&end| {
                        self.adjacency[end]
                            .iter()
                            .any(|&(_, other)| other != idx && self.bonds[other].directional)
                    })
            })
            .map(|(idx, _)| idx)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::parse_smiles;

    #[test]
    fn test_symmetric_atoms_share_a_class() {
        let mol = parse_smiles("CC(C)O").unwrap();
        let classes = mol.symmetry_classes();
        assert_eq!(classes[0], classes[2]);
        assert_ne!(classes[0], classes[1]);
        assert_ne!(classes[1], classes[3]);
    }

    #[test]
    fn test_written_and_unwritten_centres() {
        let mol = parse_smiles("C[C@H](O)CC").unwrap();
        let centres = mol.stereocenters();
        assert_eq!(centres.len(), 1);
        assert_eq!(centres[0].atom, 1);
        assert!(centres[0].specified);

        let mol = parse_smiles("CC(O)CC").unwrap();
        let centres = mol.stereocenters();
        assert_eq!(centres.len(), 1);
        assert!(!centres[0].specified);
    }

    #[test]
    fn test_symmetric_substituents_are_not_centres() {
        for smiles in ["CC(C)O", "CC1CCCCC1", "C(F)(F)(F)Cl", "c1ccccc1"] {
            let mol = parse_smiles(smiles).unwrap();
            assert!(mol.stereocenters().is_empty(), "{smiles}");
        }
    }

    #[test]
    fn test_ring_centres_need_distinct_paths() {
        // 3-methylcyclohexanol has two centres
        let mol = parse_smiles("CC1CCCC(O)C1").unwrap();
        assert_eq!(mol.stereocenters().len(), 2);
    }

    #[test]
    fn test_stereo_double_bonds() {
        let mol = parse_smiles("C/C=C/C").unwrap();
        assert_eq!(mol.stereo_double_bonds(), vec![1]);
        let mol = parse_smiles("CC=CC").unwrap();
        assert!(mol.stereo_double_bonds().is_empty());
    }
}
