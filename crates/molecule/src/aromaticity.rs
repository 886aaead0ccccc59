//! Aromaticity Perception
//!
//! A ring is aromatic when it was written in lowercase, or when every ring
//! atom can donate π electrons and the ring holds 4n+2 of them. Rings are
//! classified against the input graph before any atom is relabelled.

use crate::graph::{BondOrder, Molecule};

/// Mark aromatic rings (atoms and ring bonds) in place
pub fn perceive(mol: &mut Molecule) {
    let aromatic: Vec<Vec<usize>> = mol
        .rings
        .iter()
        .filter(|ring| is_aromatic_ring(mol, ring))
        .cloned()
        .collect();

    for ring in aromatic {
        for &atom in &ring {
            mol.atoms[atom].is_aromatic = true;
        }
        for bond in mol.ring_bond_indices(&ring) {
            mol.bonds[bond].order = BondOrder::Aromatic;
        }
    }
}

fn is_aromatic_ring(mol: &Molecule, ring: &[usize]) -> bool {
    let written_aromatic = ring.iter().all(|&a| mol.atoms[a].is_aromatic)
        && mol
            .ring_bond_indices(ring)
            .iter()
            .all(|&b| mol.bonds[b].order == BondOrder::Aromatic);
    if written_aromatic {
        return true;
    }
    let mut electrons = 0u32;
    for &atom in ring {
        match pi_electrons(mol, atom) {
            Some(e) => electrons += e,
            None => return false,
        }
    }
    electrons % 4 == 2
}

/// π electrons an atom donates to a ring, or `None` if it breaks conjugation
fn pi_electrons(mol: &Molecule, atom: usize) -> Option<u32> {
    let a = &mol.atoms[atom];
    let lone_pair_donor = match (a.atomic_number, a.formal_charge) {
        (7, 0) | (15, 0) => mol.total_degree(atom) == 3,
        (8, 0) | (16, 0) | (34, 0) => mol.degree(atom) == 2,
        (6, -1) => true,
        _ => false,
    };

    if a.is_aromatic {
        return Some(if lone_pair_donor { 2 } else { 1 });
    }

    let mut double_in_ring = false;
    let mut exocyclic_hetero = false;
    for &(neighbor, bond) in mol.neighbors(atom) {
        match mol.bonds[bond].order {
            BondOrder::Triple | BondOrder::Quadruple => return None,
            BondOrder::Double if mol.ring_bonds[bond] => double_in_ring = true,
            // C=O or C=N outside the ring empties the p orbital
            BondOrder::Double if mol.atoms[neighbor].atomic_number != 6 => exocyclic_hetero = true,
            BondOrder::Double => return None,
            _ => {}
        }
    }

    if double_in_ring {
        Some(1)
    } else if exocyclic_hetero {
        Some(0)
    } else if lone_pair_donor {
        Some(2)
    } else if matches!((a.atomic_number, a.formal_charge), (6, 1) | (5, 0)) {
        Some(0)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::smiles::parse_smiles;

    fn aromatic_count(smiles: &str) -> usize {
        parse_smiles(smiles)
            .unwrap()
            .atoms()
            .iter()
            .filter(|a| a.is_aromatic)
            .count()
    }

    #[test]
    fn test_kekule_pyrrole() {
        assert_eq!(aromatic_count("C1=CNC=C1"), 5);
    }

    #[test]
    fn test_kekule_naphthalene() {
        assert_eq!(aromatic_count("C1=CC=C2C=CC=CC2=C1"), 10);
    }

    #[test]
    fn test_furan_and_thiophene() {
        assert_eq!(aromatic_count("C1=COC=C1"), 5);
        assert_eq!(aromatic_count("C1=CSC=C1"), 5);
    }

    #[test]
    fn test_pyridone_is_aromatic() {
        assert_eq!(aromatic_count("O=C1C=CC=CN1"), 6);
    }

    #[test]
    fn test_non_aromatic_rings() {
        assert_eq!(aromatic_count("C1=CCC=C1"), 0);
        assert_eq!(aromatic_count("C1=CC=CC=CC=C1"), 0);
        assert_eq!(aromatic_count("O=C1C=CC(=O)C=C1"), 0);
        assert_eq!(aromatic_count("C1CCCCC1"), 0);
    }

    #[test]
    fn test_substituent_stays_aliphatic() {
        // Toluene: methyl carbon is not aromatic
        assert_eq!(aromatic_count("CC1=CC=CC=C1"), 6);
    }
}
