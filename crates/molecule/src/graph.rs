//! Molecular Graph

use crate::element::{self, Element};
use crate::ring;
use serde::{Deserialize, Serialize};

/// Bond order between two atoms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Quadruple,
    Aromatic,
}

impl BondOrder {
    /// Contribution to an atom's explicit valence (aromatic counts as one)
    pub fn valence(&self) -> u8 {
        match self {
            BondOrder::Single | BondOrder::Aromatic => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
            BondOrder::Quadruple => 4,
        }
    }

    /// Conventional numeric order (aromatic = 1.5)
    pub fn as_f64(&self) -> f64 {
        match self {
            BondOrder::Aromatic => 1.5,
            other => other.valence() as f64,
        }
    }

    /// Stable integer code used when hashing atom environments
    pub fn type_code(&self) -> u32 {
        match self {
            BondOrder::Single => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
            BondOrder::Quadruple => 4,
            BondOrder::Aromatic => 12,
        }
    }
}

/// Atom in a molecular graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Atom {
    /// Atomic number (0 for wildcard)
    pub atomic_number: u8,
    /// Isotope mass number, if written
    pub isotope: Option<u16>,
    /// Formal charge
    pub formal_charge: i8,
    /// Total attached hydrogens (implicit and bracket)
    pub hydrogens: u8,
    /// Aromatic flag
    pub is_aromatic: bool,
    /// Written as a bracket atom
    pub bracketed: bool,
    /// Unpaired electrons
    pub radical_electrons: u8,
    /// Written with a tetrahedral mark (`@` or `@@`)
    pub chiral: bool,
}

impl Atom {
    /// Create a neutral, non-aromatic atom with no hydrogens
    pub fn new(atomic_number: u8) -> Self {
        Self {
            atomic_number,
            isotope: None,
            formal_charge: 0,
            hydrogens: 0,
            is_aromatic: false,
            bracketed: false,
            radical_electrons: 0,
            chiral: false,
        }
    }

    /// Element data for this atom
    pub fn element(&self) -> &'static Element {
        element::by_number(self.atomic_number).unwrap_or(&element::WILDCARD)
    }

    /// Whether the atom is a heavy atom (not hydrogen)
    pub fn is_heavy(&self) -> bool {
        self.atomic_number != 1
    }

    /// Standard atomic weight, or the isotope mass for labelled atoms
    pub fn mass(&self) -> f64 {
        match self.isotope {
            Some(mass_number) => element::isotope_mass(self.atomic_number, mass_number),
            None => self.element().average_mass,
        }
    }

    /// Mass of the most abundant isotope, or of the labelled one
    pub fn exact_mass(&self) -> f64 {
        match self.isotope {
            Some(mass_number) => element::isotope_mass(self.atomic_number, mass_number),
            None => self.element().monoisotopic_mass,
        }
    }
}

/// Bond between two atoms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bond {
    pub atom1: usize,
    pub atom2: usize,
    pub order: BondOrder,
    /// Written with `/` or `\`
    pub directional: bool,
}

impl Bond {
    pub fn new(atom1: usize, atom2: usize, order: BondOrder) -> Self {
        Self {
            atom1,
            atom2,
            order,
            directional: false,
        }
    }

    /// The atom at the other end of the bond
    pub fn other(&self, atom: usize) -> usize {
        if self.atom1 == atom {
            self.atom2
        } else {
            self.atom1
        }
    }
}

/// Molecular graph with ring information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Molecule {
    pub(crate) atoms: Vec<Atom>,
    pub(crate) bonds: Vec<Bond>,
    /// Per atom: (neighbour atom, bond index)
    pub(crate) adjacency: Vec<Vec<(usize, usize)>>,
    /// Smallest set of smallest rings, each as atoms in cycle order
    pub(crate) rings: Vec<Vec<usize>>,
    pub(crate) ring_atoms: Vec<bool>,
    pub(crate) ring_bonds: Vec<bool>,
}

impl Molecule {
    /// Build a molecule from atoms and bonds, perceiving rings
    pub fn from_parts(atoms: Vec<Atom>, bonds: Vec<Bond>) -> Self {
        let mut adjacency = vec![Vec::new(); atoms.len()];
        for (idx, bond) in bonds.iter().enumerate() {
            adjacency[bond.atom1].push((bond.atom2, idx));
            adjacency[bond.atom2].push((bond.atom1, idx));
        }

        let mut mol = Self {
            ring_atoms: vec![false; atoms.len()],
            ring_bonds: vec![false; bonds.len()],
            atoms,
            bonds,
            adjacency,
            rings: Vec::new(),
        };
        mol.perceive_rings();
        mol
    }

    fn perceive_rings(&mut self) {
        self.ring_bonds = ring::ring_bonds(self);
        self.rings = ring::find_sssr(self, &self.ring_bonds);
        self.ring_atoms = vec![false; self.atoms.len()];
        for (idx, bond) in self.bonds.iter().enumerate() {
            if self.ring_bonds[idx] {
                self.ring_atoms[bond.atom1] = true;
                self.ring_atoms[bond.atom2] = true;
            }
        }
    }

    /// Number of atoms in the graph (explicit hydrogens included)
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Number of bonds
    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// Number of non-hydrogen atoms
    pub fn heavy_atom_count(&self) -> usize {
        self.atoms.iter().filter(|a| a.is_heavy()).count()
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom(&self, idx: usize) -> &Atom {
        &self.atoms[idx]
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn bond(&self, idx: usize) -> &Bond {
        &self.bonds[idx]
    }

    /// Neighbours of an atom as (atom index, bond index) pairs
    pub fn neighbors(&self, atom: usize) -> &[(usize, usize)] {
        &self.adjacency[atom]
    }

    /// Number of explicit connections
    pub fn degree(&self, atom: usize) -> usize {
        self.adjacency[atom].len()
    }

    /// Explicit connections plus attached hydrogens
    pub fn total_degree(&self, atom: usize) -> usize {
        self.degree(atom) + self.atoms[atom].hydrogens as usize
    }

    /// Number of heavy-atom neighbours
    pub fn heavy_degree(&self, atom: usize) -> usize {
        self.adjacency[atom]
            .iter()
            .filter(|&&(n, _)| self.atoms[n].is_heavy())
            .count()
    }

    /// Hydrogens attached to an atom, counting explicit [H] neighbours
    pub fn total_hydrogens(&self, atom: usize) -> usize {
        let explicit = self.adjacency[atom]
            .iter()
            .filter(|&&(n, _)| self.atoms[n].atomic_number == 1)
            .count();
        self.atoms[atom].hydrogens as usize + explicit
    }

    /// Total valence: bond orders plus attached hydrogens.
    ///
    /// Aromatic atoms take the lowest allowed valence that covers their
    /// connections, which is the valence of the Kekulé form.
    pub fn valence(&self, atom: usize) -> usize {
        let a = &self.atoms[atom];
        let mut total = a.hydrogens as usize;
        let mut aromatic = a.is_aromatic;
        for &(_, b) in &self.adjacency[atom] {
            let order = self.bonds[b].order;
            aromatic |= order == BondOrder::Aromatic;
            total += order.valence() as usize;
        }
        if aromatic {
            let allowed = element::allowed_valences(a.atomic_number, a.formal_charge);
            if let Some(&v) = allowed.iter().find(|&&v| v as usize >= total) {
                return v as usize;
            }
        }
        total
    }

    /// Index of the bond joining two atoms, if any
    pub fn bond_between(&self, a: usize, b: usize) -> Option<usize> {
        self.adjacency[a]
            .iter()
            .find(|&&(n, _)| n == b)
            .map(|&(_, bond)| bond)
    }

    /// Smallest set of smallest rings
    pub fn rings(&self) -> &[Vec<usize>] {
        &self.rings
    }

    pub fn is_ring_atom(&self, atom: usize) -> bool {
        self.ring_atoms[atom]
    }

    pub fn is_ring_bond(&self, bond: usize) -> bool {
        self.ring_bonds[bond]
    }

    /// Bond indices around a ring given in cycle order
    pub fn ring_bond_indices(&self, ring: &[usize]) -> Vec<usize> {
        (0..ring.len())
            .filter_map(|i| self.bond_between(ring[i], ring[(i + 1) % ring.len()]))
            .collect()
    }

    /// Whether any bond of the given order touches the atom
    pub fn has_bond_of_order(&self, atom: usize, order: BondOrder) -> bool {
        self.adjacency[atom]
            .iter()
            .any(|&(_, b)| self.bonds[b].order == order)
    }

    /// Number of connected components
    pub fn component_count(&self) -> usize {
        let n = self.atoms.len();
        let mut visited = vec![false; n];
        let mut count = 0;
        for start in 0..n {
            if visited[start] {
                continue;
            }
            count += 1;
            let mut stack = vec![start];
            visited[start] = true;
            while let Some(curr) = stack.pop() {
                for &(next, _) in &self.adjacency[curr] {
                    if !visited[next] {
                        visited[next] = true;
                        stack.push(next);
                    }
                }
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(n: usize) -> Molecule {
        let atoms = vec![Atom::new(6); n];
        let bonds = (1..n).map(|i| Bond::new(i - 1, i, BondOrder::Single)).collect();
        Molecule::from_parts(atoms, bonds)
    }

    #[test]
    fn test_adjacency_is_symmetric() {
        let mol = chain(4);
        assert_eq!(mol.degree(0), 1);
        assert_eq!(mol.degree(1), 2);
        assert_eq!(mol.bond_between(1, 2), Some(1));
        assert_eq!(mol.bond_between(2, 1), Some(1));
        assert_eq!(mol.bond_between(0, 3), None);
    }

    #[test]
    fn test_chain_has_no_rings() {
        let mol = chain(5);
        assert!(mol.rings().is_empty());
        assert!((0..5).all(|i| !mol.is_ring_atom(i)));
        assert_eq!(mol.component_count(), 1);
    }

    #[test]
    fn test_aromatic_bond_order_values() {
        assert_eq!(BondOrder::Aromatic.valence(), 1);
        assert!((BondOrder::Aromatic.as_f64() - 1.5).abs() < 1e-12);
        assert_eq!(BondOrder::Aromatic.type_code(), 12);
    }
}
