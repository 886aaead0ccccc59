//! Gasteiger-Marsili Partial Charges
//!
//! Partial equalization of orbital electronegativity. Implicit hydrogens are
//! expanded into pseudo-atoms so they exchange charge with their parent;
//! their charges are reported summed per parent. Atoms without parameters
//! keep their formal charge and take no part in the exchange.

use crate::topology::{conjugated_hybridization, Hybridization};
use molecule::Molecule;

const ITERATIONS: usize = 12;
const DAMPING: f64 = 0.5;

const HYDROGEN: [f64; 3] = [7.17, 6.24, -0.56];

/// Partial charges of one molecule
#[derive(Debug, Clone, PartialEq)]
pub struct PartialCharges {
    /// Charge per atom, in molecule atom order
    pub atoms: Vec<f64>,
    /// Summed charge of the implicit hydrogens on each atom
    pub hydrogens: Vec<f64>,
}

impl PartialCharges {
    /// (min, max) over heavy atoms, zero for a molecule without any
    pub fn range(&self, mol: &Molecule) -> (f64, f64) {
        let mut heavy = (0..mol.atom_count())
            .filter(|&i| mol.atom(i).is_heavy())
            .map(|i| self.atoms[i])
            .peekable();
        if heavy.peek().is_none() {
            return (0.0, 0.0);
        }
        heavy.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), q| (lo.min(q), hi.max(q)))
    }
}

/// Electronegativity coefficients (a, b, c) in chi = a + b*q + c*q^2
fn parameters(mol: &Molecule, atom: usize) -> Option<[f64; 3]> {
    use Hybridization::*;

    let hyb = conjugated_hybridization(mol, atom);
    Some(match (mol.atom(atom).atomic_number, hyb) {
        (1, _) => HYDROGEN,
        (6, Sp3) => [7.98, 9.18, 1.88],
        (6, Sp2) => [8.79, 9.32, 1.51],
        (6, Sp) => [10.39, 9.45, 0.73],
        (7, Sp3) => [11.54, 10.82, 1.36],
        (7, Sp2) => [12.87, 11.15, 0.85],
        (7, Sp) => [15.68, 11.70, -0.27],
        (8, Sp3) => [14.18, 12.92, 1.39],
        (8, _) => [17.07, 13.79, 0.47],
        (9, _) => [14.66, 13.85, 2.31],
        (14, _) => [7.30, 6.567, 0.657],
        (15, _) => [8.90, 8.24, 0.96],
        (16, Sp3) => [10.14, 9.13, 1.38],
        (16, _) => [10.88, 9.485, 1.325],
        (17, _) => [11.00, 9.69, 1.35],
        (35, _) => [10.08, 8.47, 1.16],
        (53, _) => [9.90, 7.96, 0.96],
        _ => return None,
    })
}

/// Compute Gasteiger charges over twelve damped iterations
pub fn gasteiger_charges(mol: &Molecule) -> PartialCharges {
    let n = mol.atom_count();
    let mut params: Vec<Option<[f64; 3]>> = (0..n).map(|i| parameters(mol, i)).collect();
    let mut charge: Vec<f64> = (0..n).map(|i| mol.atom(i).formal_charge as f64).collect();
    let mut neighbors: Vec<Vec<usize>> = (0..n)
        .map(|i| mol.neighbors(i).iter().map(|&(j, _)| j).collect())
        .collect();
    let mut parent = Vec::new();

    for atom in 0..n {
        for _ in 0..mol.atom(atom).hydrogens {
            let node = params.len();
            params.push(Some(HYDROGEN));
            charge.push(0.0);
            neighbors.push(vec![atom]);
            neighbors[atom].push(node);
            parent.push(atom);
        }
    }

    let cation: Vec<f64> = params
        .iter()
        .map(|p| p.map_or(0.0, |[a, b, c]| a + b + c))
        .collect();

    let mut damp = DAMPING;
    for _ in 0..ITERATIONS {
        let chi: Vec<Option<f64>> = params
            .iter()
            .zip(&charge)
            .map(|(p, &q)| p.map(|[a, b, c]| a + b * q + c * q * q))
            .collect();
        for node in 0..params.len() {
            let Some(xi) = chi[node] else { continue };
            let mut dq = 0.0;
            for &other in &neighbors[node] {
                let Some(xj) = chi[other] else { continue };
                let dx = xj - xi;
                // Normalized by the cation electronegativity of the donor
                let divisor = if dx < 0.0 { cation[other] } else { cation[node] };
                if divisor != 0.0 {
                    dq += dx / divisor;
                }
            }
            charge[node] += damp * dq;
        }
        damp *= DAMPING;
    }

    let mut hydrogens = vec![0.0; n];
    for (offset, &atom) in parent.iter().enumerate() {
        hydrogens[atom] += charge[n + offset];
    }
    charge.truncate(n);

    PartialCharges {
        atoms: charge,
        hydrogens,
    }
}
