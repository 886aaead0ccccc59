//! Topological Indices
//!
//! Graph-invariant descriptors computed on the heavy-atom graph: Balaban J,
//! Bertz complexity, Kier-Hall connectivity (chi), Hall-Kier alpha, kappa
//! shape indices, the flexibility index Phi, Bonchev-Trinajstic information
//! content (Ipc) and electrotopological state.

use molecule::{BondOrder, Molecule};
use ndarray::Array2;
use std::collections::{HashMap, VecDeque};

/// All-pairs shortest path lengths in bonds (`usize::MAX` when disconnected)
pub(crate) fn distance_matrix(mol: &Molecule) -> Vec<Vec<usize>> {
    let n = mol.atom_count();
    let mut dist = vec![vec![usize::MAX; n]; n];
    for start in 0..n {
        dist[start][start] = 0;
        let mut queue = VecDeque::new();
        queue.push_back(start);
        while let Some(curr) = queue.pop_front() {
            for &(next, _) in mol.neighbors(curr) {
                if dist[start][next] == usize::MAX {
                    dist[start][next] = dist[start][curr] + 1;
                    queue.push_back(next);
                }
            }
        }
    }
    dist
}

pub(crate) fn heavy_atoms(mol: &Molecule) -> impl Iterator<Item = usize> + '_ {
    (0..mol.atom_count()).filter(|&i| mol.atom(i).is_heavy())
}

fn heavy_bonds(mol: &Molecule) -> impl Iterator<Item = (usize, usize)> + '_ {
    mol.bonds()
        .iter()
        .filter(|b| mol.atom(b.atom1).is_heavy() && mol.atom(b.atom2).is_heavy())
        .map(|b| (b.atom1, b.atom2))
}

/// Simple heavy-atom paths with `length` bonds, each reported once
pub(crate) fn paths(mol: &Molecule, length: usize) -> Vec<Vec<usize>> {
    let mut found = Vec::new();
    let mut path = Vec::with_capacity(length + 1);
    for start in heavy_atoms(mol) {
        path.push(start);
        extend_path(mol, length, &mut path, &mut found);
        path.pop();
    }
    found
}

fn extend_path(mol: &Molecule, length: usize, path: &mut Vec<usize>, found: &mut Vec<Vec<usize>>) {
    let last = path[path.len() - 1];
    if path.len() == length + 1 {
        // A path is walked from both ends; keep the walk starting at the lower index
        if length == 0 || path[0] < last {
            found.push(path.clone());
        }
        return;
    }
    for &(next, _) in mol.neighbors(last) {
        if mol.atom(next).is_heavy() && !path.contains(&next) {
            path.push(next);
            extend_path(mol, length, path, found);
            path.pop();
        }
    }
}

/// Balaban J index: q/(mu+1) * sum over bonds of (s_i * s_j)^-1/2
pub fn balaban_j(mol: &Molecule) -> f64 {
    let atoms: Vec<usize> = heavy_atoms(mol).collect();
    let bonds: Vec<(usize, usize)> = heavy_bonds(mol).collect();
    if atoms.len() < 2 || bonds.is_empty() {
        return 0.0;
    }

    let dist = distance_matrix(mol);
    let mut distance_sum = vec![0.0; mol.atom_count()];
    for &i in &atoms {
        distance_sum[i] = atoms
            .iter()
            .filter(|&&j| j != i && dist[i][j] != usize::MAX)
            .map(|&j| dist[i][j] as f64)
            .sum();
    }

    let q = bonds.len() as f64;
    let mu = q - atoms.len() as f64 + mol.component_count() as f64;
    let edge_sum: f64 = bonds
        .iter()
        .filter(|&&(a, b)| distance_sum[a] > 0.0 && distance_sum[b] > 0.0)
        .map(|&(a, b)| (distance_sum[a] * distance_sum[b]).powf(-0.5))
        .sum();

    q / (mu + 1.0) * edge_sum
}

/// n log2 n with 0 log 0 = 0
fn n_log_n(n: usize) -> f64 {
    if n == 0 {
        0.0
    } else {
        n as f64 * (n as f64).log2()
    }
}

fn information_content<K: std::hash::Hash + Eq>(classes: impl Iterator<Item = K>) -> f64 {
    let mut counts: HashMap<K, usize> = HashMap::new();
    for class in classes {
        *counts.entry(class).or_insert(0) += 1;
    }
    let total: usize = counts.values().sum();
    n_log_n(total) - counts.values().map(|&c| n_log_n(c)).sum::<f64>()
}

/// Bertz complexity: connectivity information of two-bond paths plus
/// element diversity of heavy atoms
pub fn bertz_ct(mol: &Molecule) -> f64 {
    let order_code = |a: usize, b: usize| {
        mol.bond_between(a, b)
            .map(|idx| mol.bond(idx).order.type_code())
            .unwrap_or(0)
    };

    let connections = paths(mol, 2).into_iter().map(|p| {
        let (a, c, b) = (p[0], p[1], p[2]);
        let mut ends = [
            (mol.atom(a).atomic_number, order_code(a, c)),
            (mol.atom(b).atomic_number, order_code(c, b)),
        ];
        ends.sort_unstable();
        (mol.atom(c).atomic_number, ends)
    });
    let connectivity = 2.0 * information_content(connections);
    let elements = information_content(heavy_atoms(mol).map(|i| mol.atom(i).atomic_number));

    connectivity + elements
}

/// Valence electrons not spent on hydrogens: Zv - h
fn electron_delta(mol: &Molecule, atom: usize) -> f64 {
    let a = mol.atom(atom);
    a.element().valence_electrons as f64 - a.formal_charge as f64 - mol.total_hydrogens(atom) as f64
}

/// Valence delta for connectivity indices: (Zv - h) / (Z - Zv - 1)
fn valence_delta(mol: &Molecule, atom: usize) -> f64 {
    let a = mol.atom(atom);
    let z = a.atomic_number as f64;
    let zv = a.element().valence_electrons as f64 - a.formal_charge as f64;
    let h = mol.total_hydrogens(atom) as f64;
    if a.atomic_number <= 10 {
        zv - h
    } else if z - zv - 1.0 > 0.0 {
        (zv - h) / (z - zv - 1.0)
    } else {
        0.0
    }
}

/// Kier-Hall connectivity indices
///
/// `n` variants weight atoms by valence electrons alone; `v` variants also
/// scale heavier atoms by their core electrons.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChiIndices {
    pub chi0: f64,
    pub chi0n: f64,
    pub chi0v: f64,
    pub chi1: f64,
    pub chi1n: f64,
    pub chi1v: f64,
    pub chi2n: f64,
    pub chi2v: f64,
    pub chi3n: f64,
    pub chi3v: f64,
    pub chi4n: f64,
    pub chi4v: f64,
}

fn inverse_sqrt_product(deltas: impl Iterator<Item = f64>) -> f64 {
    let mut product = 1.0;
    for d in deltas {
        if d <= 0.0 {
            return 0.0;
        }
        product *= d;
    }
    1.0 / product.sqrt()
}

/// Compute simple and valence connectivity indices up to order four
pub fn chi_indices(mol: &Molecule) -> ChiIndices {
    let n = mol.atom_count();
    let delta: Vec<f64> = (0..n).map(|i| mol.heavy_degree(i) as f64).collect();
    let delta_n: Vec<f64> = (0..n).map(|i| electron_delta(mol, i)).collect();
    let delta_v: Vec<f64> = (0..n).map(|i| valence_delta(mol, i)).collect();
    let walks: Vec<Vec<Vec<usize>>> = (0..=4).map(|length| paths(mol, length)).collect();

    let over_paths = |length: usize, d: &[f64]| -> f64 {
        walks[length]
            .iter()
            .map(|p| inverse_sqrt_product(p.iter().map(|&i| d[i])))
            .sum()
    };

    ChiIndices {
        chi0: over_paths(0, &delta),
        chi0n: over_paths(0, &delta_n),
        chi0v: over_paths(0, &delta_v),
        chi1: over_paths(1, &delta),
        chi1n: over_paths(1, &delta_n),
        chi1v: over_paths(1, &delta_v),
        chi2n: over_paths(2, &delta_n),
        chi2v: over_paths(2, &delta_v),
        chi3n: over_paths(3, &delta_n),
        chi3v: over_paths(3, &delta_v),
        chi4n: over_paths(4, &delta_n),
        chi4v: over_paths(4, &delta_v),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Hybridization {
    Sp,
    Sp2,
    Sp3,
}

/// Hybridization implied by the bonds an atom makes
pub(crate) fn hybridization(mol: &Molecule, atom: usize) -> Hybridization {
    let mut doubles = 0;
    for &(_, bond) in mol.neighbors(atom) {
        match mol.bond(bond).order {
            BondOrder::Triple | BondOrder::Quadruple => return Hybridization::Sp,
            BondOrder::Double => doubles += 1,
            BondOrder::Aromatic => return Hybridization::Sp2,
            BondOrder::Single => {}
        }
    }
    match doubles {
        0 if mol.atom(atom).is_aromatic => Hybridization::Sp2,
        0 => Hybridization::Sp3,
        1 => Hybridization::Sp2,
        _ => Hybridization::Sp,
    }
}

/// Hybridization with lone pairs next to a pi system counted as sp2, so
/// amide nitrogens and ester or phenol oxygens are planar
pub(crate) fn conjugated_hybridization(mol: &Molecule, atom: usize) -> Hybridization {
    let hyb = hybridization(mol, atom);
    let has_lone_pair = matches!(mol.atom(atom).atomic_number, 7 | 8 | 15 | 16);
    if hyb == Hybridization::Sp3 && has_lone_pair {
        let next_to_pi = mol.neighbors(atom).iter().any(|&(other, _)| {
            mol.neighbors(other)
                .iter()
                .any(|&(_, b)| mol.bond(b).order != BondOrder::Single)
        });
        if next_to_pi {
            return Hybridization::Sp2;
        }
    }
    hyb
}

/// Hall-Kier alpha contribution, falling back to the closest tabulated
/// hybridization for unusual states
fn alpha_contribution(mol: &Molecule, atom: usize) -> f64 {
    use Hybridization::*;
    let hyb = hybridization(mol, atom);
    match (mol.atom(atom).atomic_number, hyb) {
        (6, Sp) => -0.22,
        (6, Sp2) => -0.13,
        (6, Sp3) => 0.0,
        (7, Sp) => -0.29,
        (7, Sp2) => -0.20,
        (7, Sp3) => -0.04,
        (8, Sp | Sp2) => -0.20,
        (8, Sp3) => -0.04,
        (9, _) => -0.07,
        (15, Sp | Sp2) => 0.30,
        (15, Sp3) => 0.43,
        (16, Sp | Sp2) => 0.22,
        (16, Sp3) => 0.35,
        (17, _) => 0.29,
        (35, _) => 0.48,
        (53, _) => 0.73,
        _ => 0.0,
    }
}

/// Hall-Kier alpha: sum of per-atom size and hybridization corrections
pub fn hall_kier_alpha(mol: &Molecule) -> f64 {
    heavy_atoms(mol).map(|i| alpha_contribution(mol, i)).sum()
}

/// Kappa shape indices (alpha-modified) of order one to three
pub fn kappa_indices(mol: &Molecule) -> (f64, f64, f64) {
    let a = heavy_atoms(mol).count() as f64;
    let alpha = hall_kier_alpha(mol);
    let p1 = paths(mol, 1).len() as f64;
    let p2 = paths(mol, 2).len() as f64;
    let p3 = paths(mol, 3).len() as f64;

    let ratio = |numerator: f64, p: f64| {
        let denom = p + alpha;
        if p == 0.0 || denom.abs() < f64::EPSILON {
            0.0
        } else {
            numerator / (denom * denom)
        }
    };

    let k1 = ratio((a + alpha) * (a + alpha - 1.0).powi(2), p1);
    let k2 = ratio((a + alpha - 1.0) * (a + alpha - 2.0).powi(2), p2);
    let k3 = if (a as usize) % 2 == 1 {
        ratio((a + alpha - 1.0) * (a + alpha - 3.0).powi(2), p3)
    } else {
        ratio((a + alpha - 3.0) * (a + alpha - 2.0).powi(2), p3)
    };
    (k1, k2, k3)
}

/// Kier flexibility index: kappa1 * kappa2 / heavy atoms
pub fn phi(mol: &Molecule) -> f64 {
    let atoms = mol.heavy_atom_count();
    if atoms == 0 {
        return 0.0;
    }
    let (k1, k2, _) = kappa_indices(mol);
    k1 * k2 / atoms as f64
}

/// Characteristic polynomial coefficients of the heavy-atom adjacency
/// matrix (Faddeev-LeVerrier), leading coefficient first
fn characteristic_polynomial(mol: &Molecule) -> Vec<f64> {
    let atoms: Vec<usize> = heavy_atoms(mol).collect();
    let n = atoms.len();
    let mut adjacency = Array2::<f64>::zeros((n, n));
    for (i, &a) in atoms.iter().enumerate() {
        for (j, &b) in atoms.iter().enumerate() {
            if i != j && mol.bond_between(a, b).is_some() {
                adjacency[[i, j]] = 1.0;
            }
        }
    }

    let identity = Array2::<f64>::eye(n);
    let mut coefficients = vec![1.0; n + 1];
    let mut power = adjacency.clone();
    for k in 1..=n {
        let c = power.diag().sum() / k as f64;
        coefficients[k] = -c;
        let reduced = &power - &(&identity * c);
        power = adjacency.dot(&reduced);
    }
    coefficients
}

/// Shannon entropy (bits) of a distribution given by non-negative weights
fn info_entropy(weights: &[f64]) -> f64 {
    let total: f64 = weights.iter().sum();
    if total == 0.0 {
        return 0.0;
    }
    weights
        .iter()
        .filter(|&&w| w != 0.0)
        .map(|&w| {
            let p = w / total;
            -p * p.log2()
        })
        .sum()
}

/// Information content of the characteristic polynomial: (AvgIpc, Ipc)
pub fn ipc(mol: &Molecule) -> (f64, f64) {
    let coefficients: Vec<f64> = characteristic_polynomial(mol).into_iter().map(f64::abs).collect();
    let entropy = info_entropy(&coefficients);
    (entropy, coefficients.iter().sum::<f64>() * entropy)
}

fn principal_quantum_number(z: u8) -> f64 {
    match z {
        0..=2 => 1.0,
        3..=10 => 2.0,
        11..=18 => 3.0,
        19..=36 => 4.0,
        37..=54 => 5.0,
        55..=86 => 6.0,
        _ => 7.0,
    }
}

/// Electrotopological state per heavy atom (0 for hydrogens)
///
/// I_i = ((2/N)^2 * dv + 1) / d and S_i = I_i + sum_j (I_i - I_j) / (r_ij + 1)^2
pub fn estate_indices(mol: &Molecule) -> Vec<f64> {
    let n = mol.atom_count();
    let intrinsic: Vec<f64> = (0..n)
        .map(|i| {
            let atom = mol.atom(i);
            let degree = mol.heavy_degree(i) as f64;
            if !atom.is_heavy() || degree == 0.0 {
                return 0.0;
            }
            let dv = atom.element().valence_electrons as f64 - mol.total_hydrogens(i) as f64;
            let pqn = principal_quantum_number(atom.atomic_number);
            ((2.0 / pqn).powi(2) * dv + 1.0) / degree
        })
        .collect();

    let dist = distance_matrix(mol);
    (0..n)
        .map(|i| {
            if !mol.atom(i).is_heavy() {
                return 0.0;
            }
            let perturbation: f64 = (0..n)
                .filter(|&j| j != i && mol.atom(j).is_heavy() && dist[i][j] != usize::MAX)
                .map(|j| {
                    let r = (dist[i][j] + 1) as f64;
                    (intrinsic[i] - intrinsic[j]) / (r * r)
                })
                .sum();
            intrinsic[i] + perturbation
        })
        .collect()
}
