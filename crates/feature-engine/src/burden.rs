//! Burden Eigenvalue Descriptors (BCUT2D)
//!
//! An atomic property goes on the diagonal of the heavy-atom adjacency
//! matrix, bonds are weighted by inverse square root of bond order, and the
//! extreme eigenvalues summarize the molecule.

use crate::topology::heavy_atoms;
use molecule::{BondOrder, Molecule};
use ndarray::Array2;

const MAX_SWEEPS: usize = 100;

fn bond_weight(order: BondOrder) -> f64 {
    match order {
        BondOrder::Single => 1.0,
        BondOrder::Double => std::f64::consts::FRAC_1_SQRT_2,
        BondOrder::Triple | BondOrder::Quadruple => 0.577_350_269_189_625_8,
        BondOrder::Aromatic => 0.816_496_580_927_726,
    }
}

/// Eigenvalues of a symmetric matrix by cyclic Jacobi rotation
pub(crate) fn symmetric_eigenvalues(mut a: Array2<f64>) -> Vec<f64> {
    let n = a.nrows();
    for _ in 0..MAX_SWEEPS {
        let mut off = 0.0;
        for p in 0..n {
            for q in p + 1..n {
                off += a[[p, q]] * a[[p, q]];
            }
        }
        if off < 1e-22 {
            break;
        }

        for p in 0..n {
            for q in p + 1..n {
                let apq = a[[p, q]];
                if apq == 0.0 {
                    continue;
                }
                let theta = (a[[q, q]] - a[[p, p]]) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;
                for k in 0..n {
                    let (akp, akq) = (a[[k, p]], a[[k, q]]);
                    a[[k, p]] = c * akp - s * akq;
                    a[[k, q]] = s * akp + c * akq;
                }
                for k in 0..n {
                    let (apk, aqk) = (a[[p, k]], a[[q, k]]);
                    a[[p, k]] = c * apk - s * aqk;
                    a[[q, k]] = s * apk + c * aqk;
                }
            }
        }
    }
    a.diag().to_vec()
}

/// (highest, lowest) Burden eigenvalue with `weights` indexed by atom
pub fn bcut(mol: &Molecule, weights: &[f64]) -> (f64, f64) {
    let atoms: Vec<usize> = heavy_atoms(mol).collect();
    if atoms.is_empty() {
        return (0.0, 0.0);
    }
    let mut position = vec![usize::MAX; mol.atom_count()];
    for (i, &atom) in atoms.iter().enumerate() {
        position[atom] = i;
    }

    let n = atoms.len();
    let mut burden = Array2::<f64>::zeros((n, n));
    for (i, &atom) in atoms.iter().enumerate() {
        burden[[i, i]] = weights[atom];
    }
    for bond in mol.bonds() {
        let (i, j) = (position[bond.atom1], position[bond.atom2]);
        if i == usize::MAX || j == usize::MAX {
            continue;
        }
        let w = bond_weight(bond.order);
        burden[[i, j]] = w;
        burden[[j, i]] = w;
    }

    let eigenvalues = symmetric_eigenvalues(burden);
    let high = eigenvalues.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let low = eigenvalues.iter().copied().fold(f64::INFINITY, f64::min);
    (high, low)
}

#[cfg(test)]
mod tests {
    use super::*;
    use molecule::parse_smiles;
    use ndarray::array;

    #[test]
    fn test_jacobi_two_by_two() {
        let mut values = symmetric_eigenvalues(array![[0.0, 1.0], [1.0, 0.0]]);
        values.sort_by(f64::total_cmp);
        assert!((values[0] + 1.0).abs() < 1e-12);
        assert!((values[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_jacobi_keeps_trace() {
        let m = array![[2.0, 1.0, 0.5], [1.0, 3.0, 0.25], [0.5, 0.25, -1.0]];
        let values = symmetric_eigenvalues(m);
        assert!((values.iter().sum::<f64>() - 4.0).abs() < 1e-9);
        // Frobenius norm is invariant too
        let squares: f64 = values.iter().map(|v| v * v).sum();
        assert!((squares - (4.0 + 9.0 + 1.0 + 2.0 * (1.0 + 0.25 + 0.0625))).abs() < 1e-9);
    }

    #[test]
    fn test_bcut_ethane_masses() {
        let mol = parse_smiles("CC").unwrap();
        let masses: Vec<f64> = mol.atoms().iter().map(|a| a.mass()).collect();
        let (high, low) = bcut(&mol, &masses);
        assert!((high - (masses[0] + 1.0)).abs() < 1e-9);
        assert!((low - (masses[0] - 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_bcut_ignores_hydrogen_atoms() {
        let mol = parse_smiles("[H]C([H])([H])[H]").unwrap();
        let weights = vec![5.0; mol.atom_count()];
        assert_eq!(bcut(&mol, &weights), (5.0, 5.0));
        assert_eq!(bcut(&parse_smiles("[H][H]").unwrap(), &[1.0, 1.0]), (0.0, 0.0));
    }
}
