//! Ring Perception
//!
//! Ring bonds are bonds whose endpoints stay connected once the bond is
//! removed. The smallest set of smallest rings is taken as a minimum cycle
//! basis: Horton candidate cycles sorted by size, kept while linearly
//! independent over GF(2) of the bond incidence vectors.

use crate::graph::Molecule;
use std::collections::{HashSet, VecDeque};

/// Flag every bond that lies on at least one cycle
pub fn ring_bonds(mol: &Molecule) -> Vec<bool> {
    (0..mol.bond_count())
        .map(|b| {
            let bond = mol.bond(b);
            connected_without(mol, bond.atom1, bond.atom2, b)
        })
        .collect()
}

fn connected_without(mol: &Molecule, from: usize, to: usize, skip_bond: usize) -> bool {
    let mut visited = vec![false; mol.atom_count()];
    let mut queue = VecDeque::new();
    visited[from] = true;
    queue.push_back(from);
    while let Some(curr) = queue.pop_front() {
        for &(next, bond) in mol.neighbors(curr) {
            if bond == skip_bond || visited[next] {
                continue;
            }
            if next == to {
                return true;
            }
            visited[next] = true;
            queue.push_back(next);
        }
    }
    false
}

/// Shortest-path tree over ring bonds only
struct PathTree {
    dist: Vec<usize>,
    parent: Vec<usize>,
}

impl PathTree {
    fn build(mol: &Molecule, ring_bonds: &[bool], root: usize) -> Self {
        let n = mol.atom_count();
        let mut dist = vec![usize::MAX; n];
        let mut parent = vec![usize::MAX; n];
        let mut queue = VecDeque::new();
        dist[root] = 0;
        queue.push_back(root);
        while let Some(curr) = queue.pop_front() {
            for &(next, bond) in mol.neighbors(curr) {
                if ring_bonds[bond] && dist[next] == usize::MAX {
                    dist[next] = dist[curr] + 1;
                    parent[next] = curr;
                    queue.push_back(next);
                }
            }
        }
        Self { dist, parent }
    }

    /// Path from the root to `target`, root first
    fn path_to(&self, target: usize) -> Vec<usize> {
        let mut path = Vec::with_capacity(self.dist[target] + 1);
        let mut curr = target;
        path.push(curr);
        while self.dist[curr] != 0 {
            curr = self.parent[curr];
            path.push(curr);
        }
        path.reverse();
        path
    }
}

/// Bond incidence vector of a cycle
fn edge_vector(mol: &Molecule, cycle: &[usize], words: usize) -> Vec<u64> {
    let mut bits = vec![0u64; words];
    for bond in mol.ring_bond_indices(cycle) {
        bits[bond / 64] |= 1 << (bond % 64);
    }
    bits
}

fn lowest_bit(bits: &[u64]) -> Option<usize> {
    bits.iter()
        .enumerate()
        .find(|(_, w)| **w != 0)
        .map(|(i, w)| i * 64 + w.trailing_zeros() as usize)
}

/// Smallest set of smallest rings, each ring as atom indices in cycle order
pub fn find_sssr(mol: &Molecule, ring_bonds: &[bool]) -> Vec<Vec<usize>> {
    let ring_atoms: Vec<usize> = (0..mol.atom_count())
        .filter(|&a| mol.neighbors(a).iter().any(|&(_, b)| ring_bonds[b]))
        .collect();
    if ring_atoms.is_empty() {
        return Vec::new();
    }

    let ring_bond_count = ring_bonds.iter().filter(|&&r| r).count();
    let components = ring_components(mol, ring_bonds, &ring_atoms);
    let target = ring_bond_count + components - ring_atoms.len();
    if target == 0 {
        return Vec::new();
    }

    let words = mol.bond_count().div_ceil(64);
    let trees: Vec<(usize, PathTree)> = ring_atoms
        .iter()
        .map(|&v| (v, PathTree::build(mol, ring_bonds, v)))
        .collect();

    let mut seen: HashSet<Vec<u64>> = HashSet::new();
    let mut candidates: Vec<(Vec<usize>, Vec<u64>)> = Vec::new();
    for (bond_idx, bond) in mol.bonds().iter().enumerate() {
        if !ring_bonds[bond_idx] {
            continue;
        }
        let (x, y) = (bond.atom1, bond.atom2);
        for (_, tree) in &trees {
            if tree.dist[x] == usize::MAX || tree.dist[y] == usize::MAX {
                continue;
            }
            let px = tree.path_to(x);
            let py = tree.path_to(y);
            // Paths may share only the root
            let shared: HashSet<usize> = px[1..].iter().copied().collect();
            if py[1..].iter().any(|a| shared.contains(a)) || px.contains(&y) || py.contains(&x) {
                continue;
            }
            let mut cycle = px;
            cycle.extend(py[1..].iter().rev());
            if cycle.len() < 3 {
                continue;
            }
            let bits = edge_vector(mol, &cycle, words);
            if seen.insert(bits.clone()) {
                candidates.push((cycle, bits));
            }
        }
    }

    candidates.sort_by(|a, b| a.0.len().cmp(&b.0.len()).then_with(|| a.0.cmp(&b.0)));

    let mut basis: Vec<(usize, Vec<u64>)> = Vec::with_capacity(target);
    let mut rings = Vec::with_capacity(target);
    for (cycle, bits) in candidates {
        let mut reduced = bits;
        for (pivot, row) in &basis {
            if reduced[pivot / 64] & (1 << (pivot % 64)) != 0 {
                for (r, w) in reduced.iter_mut().zip(row) {
                    *r ^= w;
                }
            }
        }
        if let Some(pivot) = lowest_bit(&reduced) {
            basis.push((pivot, reduced));
            rings.push(cycle);
            if rings.len() == target {
                break;
            }
        }
    }
    rings
}

fn ring_components(mol: &Molecule, ring_bonds: &[bool], ring_atoms: &[usize]) -> usize {
    let mut visited = vec![false; mol.atom_count()];
    let mut count = 0;
    for &start in ring_atoms {
        if visited[start] {
            continue;
        }
        count += 1;
        visited[start] = true;
        let mut stack = vec![start];
        while let Some(curr) = stack.pop() {
            for &(next, bond) in mol.neighbors(curr) {
                if ring_bonds[bond] && !visited[next] {
                    visited[next] = true;
                    stack.push(next);
                }
            }
        }
    }
    count
}
