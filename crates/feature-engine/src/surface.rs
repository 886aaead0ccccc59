//! Approximate Surface Area Descriptors
//!
//! Labute's approximate surface area per atom, and the VSA descriptors that
//! sum those areas over bins of a second atomic property.

use molecule::{element, BondOrder, Molecule};
use std::f64::consts::PI;

/// Gasteiger charge bins for `PEOE_VSA1..14`
pub const PEOE_BINS: [f64; 13] = [
    -0.3, -0.25, -0.2, -0.15, -0.1, -0.05, 0.0, 0.05, 0.1, 0.15, 0.2, 0.25, 0.3,
];
/// Crippen MR bins for `SMR_VSA1..10`
pub const SMR_BINS: [f64; 9] = [1.29, 1.82, 2.24, 2.45, 2.75, 3.05, 3.63, 3.8, 4.0];
/// Crippen logP bins for `SlogP_VSA1..12`
pub const SLOGP_BINS: [f64; 11] = [-0.4, -0.2, 0.0, 0.1, 0.15, 0.2, 0.25, 0.3, 0.4, 0.5, 0.6];
/// E-state bins for `EState_VSA1..11`
pub const ESTATE_BINS: [f64; 10] = [-0.390, 0.290, 0.717, 1.165, 1.540, 1.807, 2.05, 4.69, 9.17, 15.0];
/// Surface area bins for `VSA_EState1..10`
pub const VSA_BINS: [f64; 9] = [4.78, 5.00, 5.410, 5.740, 6.00, 6.07, 6.45, 7.00, 11.0];

/// Per-atom surface areas plus the shared implicit-hydrogen term
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceContributions {
    pub atoms: Vec<f64>,
    pub hydrogens: f64,
}

impl SurfaceContributions {
    pub fn total(&self) -> f64 {
        self.atoms.iter().sum::<f64>() + self.hydrogens
    }
}

/// Overlap term of a sphere of radius `rj` on one of radius `ri`
fn overlap(ri: f64, rj: f64, scale: f64) -> f64 {
    let bij = ri + rj - scale;
    let dij = bij.max((ri - rj).abs()).min(ri + rj);
    rj * rj - (ri - dij).powi(2) / dij
}

/// Labute contributions from bond radii, shrinking bonded spheres by how
/// much their bond order pulls them together
pub fn labute_contributions(mol: &Molecule) -> SurfaceContributions {
    let n = mol.atom_count();
    let radius: Vec<f64> = mol.atoms().iter().map(|a| element::bond_radius(a.atomic_number)).collect();
    let mut shadow = vec![0.0; n];

    for bond in mol.bonds() {
        let scale = match bond.order {
            BondOrder::Single => 0.0,
            BondOrder::Double => 0.2,
            BondOrder::Triple | BondOrder::Quadruple => 0.3,
            BondOrder::Aromatic => 0.1,
        };
        let (ri, rj) = (radius[bond.atom1], radius[bond.atom2]);
        shadow[bond.atom1] += overlap(ri, rj, scale);
        shadow[bond.atom2] += overlap(rj, ri, scale);
    }

    let rh = element::bond_radius(1);
    let mut hydrogen_shadow = 0.0;
    let mut hydrogen_count = 0;
    for atom in 0..n {
        let h = mol.atom(atom).hydrogens as usize;
        if h == 0 {
            continue;
        }
        hydrogen_count += h;
        shadow[atom] += h as f64 * overlap(radius[atom], rh, 0.0);
        hydrogen_shadow += h as f64 * overlap(rh, radius[atom], 0.0);
    }

    let atoms = (0..n)
        .map(|i| 4.0 * PI * radius[i] * radius[i] - PI * radius[i] * shadow[i])
        .collect();
    let hydrogens = if hydrogen_count > 0 {
        4.0 * PI * rh * rh - PI * rh * hydrogen_shadow
    } else {
        0.0
    };
    SurfaceContributions { atoms, hydrogens }
}

/// Labute approximate surface area
pub fn labute_asa(mol: &Molecule) -> f64 {
    labute_contributions(mol).total()
}

/// Sum `values` into the bins their `keys` fall in; a key equal to a bin
/// edge belongs to the bin above it
pub fn bin_sums(keys: &[f64], values: &[f64], bins: &[f64]) -> Vec<f64> {
    let mut sums = vec![0.0; bins.len() + 1];
    for (&key, &value) in keys.iter().zip(values) {
        let slot = bins.partition_point(|&edge| edge <= key);
        sums[slot] += value;
    }
    sums
}

#[cfg(test)]
mod tests {
    use super::*;
    use molecule::parse_smiles;

    #[test]
    fn test_benzene_surface() {
        let mol = parse_smiles("c1ccccc1").unwrap();
        let c = 0.77f64;
        let h = 0.33f64;
        let aromatic = c * c - (c - 1.44f64).powi(2) / 1.44;
        let to_h = h * h - (c - 1.10f64).powi(2) / 1.10;
        let carbon = 4.0 * PI * c * c - PI * c * (2.0 * aromatic + to_h);
        let from_h = c * c - (h - 1.10f64).powi(2) / 1.10;
        let hydrogens = 4.0 * PI * h * h - PI * h * 6.0 * from_h;

        let surface = labute_contributions(&mol);
        for &area in &surface.atoms {
            assert!((area - carbon).abs() < 1e-9);
        }
        assert!((surface.hydrogens - hydrogens).abs() < 1e-9);
        assert!((labute_asa(&mol) - 37.43).abs() < 0.01);
    }

    #[test]
    fn test_no_hydrogen_term_without_hydrogens() {
        let surface = labute_contributions(&parse_smiles("ClC(Cl)(Cl)Cl").unwrap());
        assert_eq!(surface.hydrogens, 0.0);
        assert!(surface.total() > 0.0);
    }

    #[test]
    fn test_bin_sums_edges() {
        let sums = bin_sums(&[-1.0, 0.0, 0.5, 2.0], &[1.0, 2.0, 4.0, 8.0], &[0.0, 1.0]);
        assert_eq!(sums, vec![1.0, 6.0, 8.0]);
    }
}
