//! SMARTS Substructure Patterns
//!
//! Reads the SMARTS used by descriptor definitions: bracket atom expressions
//! joined by `!`, `&`, `,` and `;`, recursive `$()` environments, bond
//! expressions, branches, ring closures and `.` separated components.
//!
//! Matching is a backtracking search over heavy atoms. Matches that cover the
//! same set of atoms are reported once, and at most [`MAX_MATCHES`] are kept.

use crate::element;
use crate::error::SmartsError;
use crate::graph::{BondOrder, Molecule};
use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

/// Upper bound on the unique matches collected for one pattern
pub const MAX_MATCHES: usize = 1000;

#[derive(Debug, Clone, PartialEq)]
enum Expr<P> {
    Primitive(P),
    Not(Box<Expr<P>>),
    And(Vec<Expr<P>>),
    Or(Vec<Expr<P>>),
}

impl<P> Expr<P> {
    fn all(mut items: Vec<Expr<P>>) -> Self {
        if items.len() == 1 {
            items.remove(0)
        } else {
            Expr::And(items)
        }
    }

    fn any(mut items: Vec<Expr<P>>) -> Self {
        if items.len() == 1 {
            items.remove(0)
        } else {
            Expr::Or(items)
        }
    }

    fn eval<F: Fn(&P) -> bool>(&self, test: &F) -> bool {
        match self {
            Expr::Primitive(p) => test(p),
            Expr::Not(inner) => !inner.eval(test),
            Expr::And(items) => items.iter().all(|e| e.eval(test)),
            Expr::Or(items) => items.iter().any(|e| e.eval(test)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum AtomPrimitive {
    Any,
    Aromatic,
    Aliphatic,
    /// `aromatic` is `None` for `#n`, which matches either form
    Element { atomic_number: u8, aromatic: Option<bool> },
    TotalHydrogens(u8),
    ImplicitHydrogens(u8),
    /// Heavy-atom neighbours
    Degree(u8),
    /// Heavy-atom neighbours plus hydrogens
    Connectivity(u8),
    Valence(u8),
    /// Number of SSSR rings; bare `R` means at least one
    RingMembership(Option<u8>),
    /// Size of the smallest SSSR ring; bare `r` means any ring
    RingSize(Option<u8>),
    /// Number of ring bonds; bare `x` means at least one
    RingConnectivity(Option<u8>),
    Charge(i8),
    Isotope(u16),
    Recursive(Box<SmartsPattern>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BondPrimitive {
    Single,
    Double,
    Triple,
    Aromatic,
    Any,
    Ring,
}

#[derive(Debug, Clone, PartialEq)]
struct QueryBond {
    atom1: usize,
    atom2: usize,
    /// `None` when no bond was written: single or aromatic
    expr: Option<Expr<BondPrimitive>>,
}

/// Compiled SMARTS pattern
#[derive(Debug, Clone, PartialEq)]
pub struct SmartsPattern {
    source: String,
    atoms: Vec<Expr<AtomPrimitive>>,
    bonds: Vec<QueryBond>,
    adjacency: Vec<Vec<(usize, usize)>>,
    /// Depth-first visiting order; every atom but a component root is
    /// reached through `parent` (query atom, query bond)
    order: Vec<usize>,
    parent: Vec<Option<(usize, usize)>>,
}

impl SmartsPattern {
    pub fn parse(smarts: &str) -> Result<Self, SmartsError> {
        Parser::new(smarts.as_bytes(), 0).run()
    }

    fn new(source: String, atoms: Vec<Expr<AtomPrimitive>>, bonds: Vec<QueryBond>) -> Self {
        let n = atoms.len();
        let mut adjacency = vec![Vec::new(); n];
        for (idx, bond) in bonds.iter().enumerate() {
            adjacency[bond.atom1].push((bond.atom2, idx));
            adjacency[bond.atom2].push((bond.atom1, idx));
        }

        let mut order = Vec::with_capacity(n);
        let mut parent = vec![None; n];
        let mut seen = vec![false; n];
        for root in 0..n {
            if seen[root] {
                continue;
            }
            seen[root] = true;
            let mut stack = vec![root];
            while let Some(atom) = stack.pop() {
                order.push(atom);
                for &(next, bond) in adjacency[atom].iter().rev() {
                    if !seen[next] {
                        seen[next] = true;
                        parent[next] = Some((atom, bond));
                        stack.push(next);
                    }
                }
            }
        }

        Self {
            source,
            atoms,
            bonds,
            adjacency,
            order,
            parent,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Unique matches as target atom indices in query atom order
    pub fn matches(&self, target: &MatchTarget) -> Vec<Vec<usize>> {
        Search::new(self, target, MAX_MATCHES).run(None)
    }

    pub fn count_matches(&self, target: &MatchTarget) -> usize {
        self.matches(target).len()
    }

    pub fn has_match(&self, target: &MatchTarget) -> bool {
        !Search::new(self, target, 1).run(None).is_empty()
    }

    /// Whether the pattern matches with its first atom on `atom`
    pub fn matches_at(&self, target: &MatchTarget, atom: usize) -> bool {
        !Search::new(self, target, 1).run(Some(atom)).is_empty()
    }

    fn atom_matches(&self, query: usize, target: &MatchTarget, atom: usize) -> bool {
        self.atoms[query].eval(&|p| target.atom_matches(p, atom))
    }

    fn bond_matches(&self, query: usize, target: &MatchTarget, bond: usize) -> bool {
        match &self.bonds[query].expr {
            Some(expr) => expr.eval(&|p| target.bond_matches(*p, bond)),
            None => matches!(
                target.mol.bond(bond).order,
                BondOrder::Single | BondOrder::Aromatic
            ),
        }
    }
}

impl FromStr for SmartsPattern {
    type Err = SmartsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Per-atom properties of one molecule, shared by every pattern matched
/// against it
pub struct MatchTarget<'a> {
    mol: &'a Molecule,
    heavy: Vec<usize>,
    hydrogens: Vec<usize>,
    heavy_degree: Vec<usize>,
    valence: Vec<usize>,
    ring_membership: Vec<usize>,
    smallest_ring: Vec<usize>,
    ring_connectivity: Vec<usize>,
}

impl<'a> MatchTarget<'a> {
    pub fn new(mol: &'a Molecule) -> Self {
        let n = mol.atom_count();
        let mut ring_membership = vec![0; n];
        let mut smallest_ring = vec![0; n];
        for ring in mol.rings() {
            for &atom in ring {
                ring_membership[atom] += 1;
                if smallest_ring[atom] == 0 || ring.len() < smallest_ring[atom] {
                    smallest_ring[atom] = ring.len();
                }
            }
        }

        Self {
            mol,
            heavy: (0..n).filter(|&a| mol.atom(a).is_heavy()).collect(),
            hydrogens: (0..n).map(|a| mol.total_hydrogens(a)).collect(),
            heavy_degree: (0..n).map(|a| mol.heavy_degree(a)).collect(),
            valence: (0..n).map(|a| mol.valence(a)).collect(),
            ring_membership,
            smallest_ring,
            ring_connectivity: (0..n)
                .map(|a| {
                    mol.neighbors(a)
                        .iter()
                        .filter(|&&(_, b)| mol.is_ring_bond(b))
                        .count()
                })
                .collect(),
        }
    }

    pub fn molecule(&self) -> &'a Molecule {
        self.mol
    }

    fn atom_matches(&self, primitive: &AtomPrimitive, atom: usize) -> bool {
        let a = self.mol.atom(atom);
        match primitive {
            AtomPrimitive::Any => true,
            AtomPrimitive::Aromatic => a.is_aromatic,
            AtomPrimitive::Aliphatic => !a.is_aromatic,
            AtomPrimitive::Element {
                atomic_number,
                aromatic,
            } => a.atomic_number == *atomic_number && aromatic.map_or(true, |flag| flag == a.is_aromatic),
            AtomPrimitive::TotalHydrogens(n) => self.hydrogens[atom] == *n as usize,
            AtomPrimitive::ImplicitHydrogens(n) => a.hydrogens == *n,
            AtomPrimitive::Degree(n) => self.heavy_degree[atom] == *n as usize,
            AtomPrimitive::Connectivity(n) => self.heavy_degree[atom] + self.hydrogens[atom] == *n as usize,
            AtomPrimitive::Valence(n) => self.valence[atom] == *n as usize,
            AtomPrimitive::RingMembership(None) => self.ring_membership[atom] > 0,
            AtomPrimitive::RingMembership(Some(n)) => self.ring_membership[atom] == *n as usize,
            AtomPrimitive::RingSize(None) => self.smallest_ring[atom] > 0,
            AtomPrimitive::RingSize(Some(n)) => self.smallest_ring[atom] == *n as usize,
            AtomPrimitive::RingConnectivity(None) => self.ring_connectivity[atom] > 0,
            AtomPrimitive::RingConnectivity(Some(n)) => self.ring_connectivity[atom] == *n as usize,
            AtomPrimitive::Charge(c) => a.formal_charge == *c,
            AtomPrimitive::Isotope(i) => a.isotope == Some(*i),
            AtomPrimitive::Recursive(pattern) => pattern.matches_at(self, atom),
        }
    }

    fn bond_matches(&self, primitive: BondPrimitive, bond: usize) -> bool {
        let order = self.mol.bond(bond).order;
        match primitive {
            BondPrimitive::Single => order == BondOrder::Single,
            BondPrimitive::Double => order == BondOrder::Double,
            BondPrimitive::Triple => order == BondOrder::Triple,
            BondPrimitive::Aromatic => order == BondOrder::Aromatic,
            BondPrimitive::Any => true,
            BondPrimitive::Ring => self.mol.is_ring_bond(bond),
        }
    }
}

struct Search<'p, 't, 'a> {
    pattern: &'p SmartsPattern,
    target: &'t MatchTarget<'a>,
    mapping: Vec<Option<usize>>,
    used: Vec<bool>,
    seen: HashSet<Vec<usize>>,
    found: Vec<Vec<usize>>,
    limit: usize,
}

impl<'p, 't, 'a> Search<'p, 't, 'a> {
    fn new(pattern: &'p SmartsPattern, target: &'t MatchTarget<'a>, limit: usize) -> Self {
        Self {
            pattern,
            target,
            mapping: vec![None; pattern.atoms.len()],
            used: vec![false; target.mol.atom_count()],
            seen: HashSet::new(),
            found: Vec::new(),
            limit,
        }
    }

    fn run(mut self, anchor: Option<usize>) -> Vec<Vec<usize>> {
        if anchor.map_or(true, |atom| atom < self.used.len()) {
            self.extend(0, anchor);
        }
        self.found
    }

    /// Returns true once enough matches are collected
    fn extend(&mut self, depth: usize, anchor: Option<usize>) -> bool {
        let pattern = self.pattern;
        let target = self.target;

        if depth == pattern.order.len() {
            let mapped: Vec<usize> = self.mapping.iter().flatten().copied().collect();
            let mut key = mapped.clone();
            key.sort_unstable();
            if self.seen.insert(key) {
                self.found.push(mapped);
            }
            return self.found.len() >= self.limit;
        }

        let query = pattern.order[depth];
        let candidates: Vec<usize> = match pattern.parent[query] {
            Some((from, bond)) => {
                let Some(origin) = self.mapping[from] else {
                    return false;
                };
                target
                    .mol
                    .neighbors(origin)
                    .iter()
                    .filter(|&&(t, b)| target.mol.atom(t).is_heavy() && pattern.bond_matches(bond, target, b))
                    .map(|&(t, _)| t)
                    .collect()
            }
            None => match anchor {
                Some(atom) if depth == 0 => vec![atom],
                _ => target.heavy.clone(),
            },
        };

        for candidate in candidates {
            if self.used[candidate]
                || !target.mol.atom(candidate).is_heavy()
                || !pattern.atom_matches(query, target, candidate)
                || !self.closures_match(query, candidate)
            {
                continue;
            }
            self.mapping[query] = Some(candidate);
            self.used[candidate] = true;
            let done = self.extend(depth + 1, anchor);
            self.used[candidate] = false;
            self.mapping[query] = None;
            if done {
                return true;
            }
        }
        false
    }

    /// Bonds from `query` to already placed atoms must exist in the target
    fn closures_match(&self, query: usize, candidate: usize) -> bool {
        self.pattern.adjacency[query]
            .iter()
            .all(|&(other, bond)| match self.mapping[other] {
                Some(placed) => self
                    .target
                    .mol
                    .bond_between(candidate, placed)
                    .map_or(false, |b| self.pattern.bond_matches(bond, self.target, b)),
                None => true,
            })
    }
}

fn is_bond_primitive(c: u8) -> bool {
    matches!(c, b'-' | b'=' | b'#' | b':' | b'~' | b'@' | b'/' | b'\\')
}

fn starts_atom_primitive(c: u8) -> bool {
    !matches!(c, b']' | b',' | b';' | b'&')
}

fn element(atomic_number: u8, aromatic: bool) -> AtomPrimitive {
    AtomPrimitive::Element {
        atomic_number,
        aromatic: Some(aromatic),
    }
}

type PrimitiveReader<'a, P> = fn(&mut Parser<'a>) -> Result<P, SmartsError>;

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    /// Position of `input` inside the outermost pattern
    offset: usize,
    atoms: Vec<Expr<AtomPrimitive>>,
    bonds: Vec<QueryBond>,
    prev: Option<usize>,
    pending: Option<(Expr<BondPrimitive>, usize)>,
    branches: Vec<usize>,
    rings: BTreeMap<u32, (usize, Option<Expr<BondPrimitive>>)>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a [u8], offset: usize) -> Self {
        Self {
            input,
            pos: 0,
            offset,
            atoms: Vec::new(),
            bonds: Vec::new(),
            prev: None,
            pending: None,
            branches: Vec::new(),
            rings: BTreeMap::new(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn unexpected_at(&self, pos: usize) -> SmartsError {
        match self.input.get(pos) {
            Some(&c) => SmartsError::UnexpectedCharacter {
                character: c as char,
                position: self.offset + pos,
            },
            None => SmartsError::UnexpectedEnd(self.offset + pos),
        }
    }

    fn unexpected(&self) -> SmartsError {
        self.unexpected_at(self.pos)
    }

    fn run(mut self) -> Result<SmartsPattern, SmartsError> {
        while let Some(c) = self.peek() {
            match c {
                b'(' => {
                    let atom = self.prev.ok_or_else(|| self.unexpected())?;
                    self.branches.push(atom);
                    self.pos += 1;
                }
                b')' => {
                    if let Some((_, at)) = self.pending {
                        return Err(SmartsError::BondWithoutTarget(at));
                    }
                    let atom = self
                        .branches
                        .pop()
                        .ok_or(SmartsError::UnbalancedBranch(self.offset + self.pos))?;
                    self.prev = Some(atom);
                    self.pos += 1;
                }
                b'.' => {
                    if let Some((_, at)) = self.pending {
                        return Err(SmartsError::BondWithoutTarget(at));
                    }
                    self.prev = None;
                    self.pos += 1;
                }
                b'%' => {
                    let start = self.pos;
                    let digits = self
                        .input
                        .get(start + 1..start + 3)
                        .filter(|d| d.iter().all(u8::is_ascii_digit))
                        .ok_or_else(|| self.unexpected_at(start + 1))?;
                    let number = (digits[0] - b'0') as u32 * 10 + (digits[1] - b'0') as u32;
                    self.ring_closure(number, start)?;
                    self.pos += 3;
                }
                b'0'..=b'9' => {
                    self.ring_closure((c - b'0') as u32, self.pos)?;
                    self.pos += 1;
                }
                b'[' => {
                    let expr = self.bracket_atom()?;
                    self.add_atom(expr);
                }
                c if is_bond_primitive(c) || c == b'!' => {
                    if self.prev.is_none() || self.pending.is_some() {
                        return Err(self.unexpected());
                    }
                    let at = self.offset + self.pos;
                    let expr = self.expression(Self::bond_primitive, is_bond_primitive)?;
                    self.pending = Some((expr, at));
                }
                _ => {
                    let expr = self.organic_atom()?;
                    self.add_atom(expr);
                }
            }
        }

        if let Some((_, at)) = self.pending {
            return Err(SmartsError::BondWithoutTarget(at));
        }
        if !self.branches.is_empty() {
            return Err(SmartsError::UnbalancedBranch(self.offset + self.pos));
        }
        if let Some(&number) = self.rings.keys().next() {
            return Err(SmartsError::UnclosedRing(number));
        }
        if self.atoms.is_empty() {
            return Err(SmartsError::Empty);
        }
        let source = String::from_utf8_lossy(self.input).into_owned();
        Ok(SmartsPattern::new(source, self.atoms, self.bonds))
    }

    fn add_atom(&mut self, expr: Expr<AtomPrimitive>) {
        let idx = self.atoms.len();
        self.atoms.push(expr);
        if let Some(prev) = self.prev {
            let expr = self.pending.take().map(|(e, _)| e);
            self.bonds.push(QueryBond {
                atom1: prev,
                atom2: idx,
                expr,
            });
        }
        self.prev = Some(idx);
    }

    fn ring_closure(&mut self, number: u32, position: usize) -> Result<(), SmartsError> {
        let atom = self.prev.ok_or_else(|| self.unexpected_at(position))?;
        let bond = self.pending.take().map(|(e, _)| e);
        match self.rings.remove(&number) {
            Some((open, open_bond)) => self.bonds.push(QueryBond {
                atom1: open,
                atom2: atom,
                expr: open_bond.or(bond),
            }),
            None => {
                self.rings.insert(number, (atom, bond));
            }
        }
        Ok(())
    }

    // Precedence, loosest first: `;`, `,`, `&` or juxtaposition, `!`

    fn expression<P>(&mut self, primitive: PrimitiveReader<'a, P>, starts: fn(u8) -> bool) -> Result<Expr<P>, SmartsError> {
        let mut items = vec![self.disjunction(primitive, starts)?];
        while self.peek() == Some(b';') {
            self.pos += 1;
            items.push(self.disjunction(primitive, starts)?);
        }
        Ok(Expr::all(items))
    }

    fn disjunction<P>(&mut self, primitive: PrimitiveReader<'a, P>, starts: fn(u8) -> bool) -> Result<Expr<P>, SmartsError> {
        let mut items = vec![self.conjunction(primitive, starts)?];
        while self.peek() == Some(b',') {
            self.pos += 1;
            items.push(self.conjunction(primitive, starts)?);
        }
        Ok(Expr::any(items))
    }

    fn conjunction<P>(&mut self, primitive: PrimitiveReader<'a, P>, starts: fn(u8) -> bool) -> Result<Expr<P>, SmartsError> {
        let mut items = vec![self.negation(primitive)?];
        loop {
            match self.peek() {
                Some(b'&') => {
                    self.pos += 1;
                    items.push(self.negation(primitive)?);
                }
                Some(c) if c == b'!' || starts(c) => items.push(self.negation(primitive)?),
                _ => break,
            }
        }
        Ok(Expr::all(items))
    }

    fn negation<P>(&mut self, primitive: PrimitiveReader<'a, P>) -> Result<Expr<P>, SmartsError> {
        if self.peek() == Some(b'!') {
            self.pos += 1;
            return Ok(Expr::Not(Box::new(self.negation(primitive)?)));
        }
        primitive(self).map(Expr::Primitive)
    }

    fn bond_primitive(&mut self) -> Result<BondPrimitive, SmartsError> {
        let primitive = match self.peek() {
            Some(b'-' | b'/' | b'\\') => BondPrimitive::Single,
            Some(b'=') => BondPrimitive::Double,
            Some(b'#') => BondPrimitive::Triple,
            Some(b':') => BondPrimitive::Aromatic,
            Some(b'~') => BondPrimitive::Any,
            Some(b'@') => BondPrimitive::Ring,
            _ => return Err(self.unexpected()),
        };
        self.pos += 1;
        Ok(primitive)
    }

    fn number(&mut self) -> Option<u32> {
        let start = self.pos;
        let mut value: u32 = 0;
        while let Some(d) = self.peek().filter(u8::is_ascii_digit) {
            value = value.saturating_mul(10).saturating_add((d - b'0') as u32);
            self.pos += 1;
        }
        (self.pos > start).then_some(value)
    }

    fn count(&mut self) -> u8 {
        self.number().map_or(1, |n| n.min(u8::MAX as u32) as u8)
    }

    fn optional_count(&mut self) -> Option<u8> {
        self.number().map(|n| n.min(u8::MAX as u32) as u8)
    }

    fn charge(&mut self) -> i8 {
        let symbol = self.input[self.pos];
        let sign: i32 = if symbol == b'+' { 1 } else { -1 };
        self.pos += 1;
        let magnitude = match self.number() {
            Some(n) => n.min(i8::MAX as u32) as i32,
            None => {
                let mut m = 1;
                while self.peek() == Some(symbol) {
                    m += 1;
                    self.pos += 1;
                }
                m
            }
        };
        (sign * magnitude).clamp(i8::MIN as i32, i8::MAX as i32) as i8
    }

    fn organic_atom(&mut self) -> Result<Expr<AtomPrimitive>, SmartsError> {
        let c = self.input[self.pos];
        let next = self.input.get(self.pos + 1).copied();
        let (primitive, len) = match (c, next) {
            (b'C', Some(b'l')) => (element(17, false), 2),
            (b'B', Some(b'r')) => (element(35, false), 2),
            (b'*', _) => (AtomPrimitive::Any, 1),
            (b'a', _) => (AtomPrimitive::Aromatic, 1),
            (b'A', _) => (AtomPrimitive::Aliphatic, 1),
            (b'B', _) => (element(5, false), 1),
            (b'C', _) => (element(6, false), 1),
            (b'N', _) => (element(7, false), 1),
            (b'O', _) => (element(8, false), 1),
            (b'P', _) => (element(15, false), 1),
            (b'S', _) => (element(16, false), 1),
            (b'F', _) => (element(9, false), 1),
            (b'I', _) => (element(53, false), 1),
            (b'b', _) => (element(5, true), 1),
            (b'c', _) => (element(6, true), 1),
            (b'n', _) => (element(7, true), 1),
            (b'o', _) => (element(8, true), 1),
            (b'p', _) => (element(15, true), 1),
            (b's', _) => (element(16, true), 1),
            _ => return Err(self.unexpected()),
        };
        self.pos += len;
        Ok(Expr::Primitive(primitive))
    }

    fn bracket_atom(&mut self) -> Result<Expr<AtomPrimitive>, SmartsError> {
        self.pos += 1;
        let expr = match self.hydrogen_atom() {
            Some(expr) => expr,
            None => self.expression(Self::atom_primitive, starts_atom_primitive)?,
        };
        match self.peek() {
            Some(b']') => {
                self.pos += 1;
                Ok(expr)
            }
            _ => Err(self.unexpected()),
        }
    }

    /// `[H]`, `[2H]` and `[H+]` name a hydrogen atom, not a hydrogen count
    fn hydrogen_atom(&mut self) -> Option<Expr<AtomPrimitive>> {
        let rest = &self.input[self.pos..];
        let digits = rest.iter().take_while(|c| c.is_ascii_digit()).count();
        if rest.get(digits) != Some(&b'H') {
            return None;
        }
        let tail = &rest[digits + 1..];
        let charge_len = match tail.first() {
            Some(b'+' | b'-') => tail
                .iter()
                .take_while(|c| matches!(c, b'+' | b'-' | b'0'..=b'9'))
                .count(),
            _ => 0,
        };
        if tail.get(charge_len) != Some(&b']') {
            return None;
        }

        let mut items = vec![Expr::Primitive(AtomPrimitive::Element {
            atomic_number: 1,
            aromatic: None,
        })];
        if let Some(n) = self.number() {
            items.push(Expr::Primitive(AtomPrimitive::Isotope(n.min(u16::MAX as u32) as u16)));
        }
        self.pos += 1;
        if charge_len > 0 {
            items.push(Expr::Primitive(AtomPrimitive::Charge(self.charge())));
        }
        Some(Expr::all(items))
    }

    fn atom_primitive(&mut self) -> Result<AtomPrimitive, SmartsError> {
        let c = self.peek().ok_or_else(|| self.unexpected())?;
        match c {
            b'*' => {
                self.pos += 1;
                Ok(AtomPrimitive::Any)
            }
            b'$' => self.recursive(),
            b'#' => {
                self.pos += 1;
                let n = self.number().ok_or_else(|| self.unexpected())?;
                Ok(AtomPrimitive::Element {
                    atomic_number: n.min(u8::MAX as u32) as u8,
                    aromatic: None,
                })
            }
            b'+' | b'-' => Ok(AtomPrimitive::Charge(self.charge())),
            b'0'..=b'9' => {
                let n = self.number().unwrap_or(0);
                Ok(AtomPrimitive::Isotope(n.min(u16::MAX as u32) as u16))
            }
            // Chirality is not matched
            b'@' => {
                while matches!(self.peek(), Some(b'@' | b'?')) {
                    self.pos += 1;
                }
                Ok(AtomPrimitive::Any)
            }
            b'A'..=b'Z' => self.uppercase_primitive(),
            b'a'..=b'z' => self.lowercase_primitive(),
            _ => Err(self.unexpected()),
        }
    }

    fn two_letter_element(&self) -> Option<u8> {
        let pair = self.input.get(self.pos..self.pos + 2)?;
        if !pair[1].is_ascii_lowercase() {
            return None;
        }
        let symbol = std::str::from_utf8(pair).ok()?;
        element::by_symbol(symbol).map(|e| e.atomic_number)
    }

    fn uppercase_primitive(&mut self) -> Result<AtomPrimitive, SmartsError> {
        if let Some(z) = self.two_letter_element() {
            self.pos += 2;
            return Ok(element(z, false));
        }
        let position = self.pos;
        let c = self.input[position];
        self.pos += 1;
        Ok(match c {
            b'A' => AtomPrimitive::Aliphatic,
            b'D' => AtomPrimitive::Degree(self.count()),
            b'H' => AtomPrimitive::TotalHydrogens(self.count()),
            b'X' => AtomPrimitive::Connectivity(self.count()),
            b'R' => AtomPrimitive::RingMembership(self.optional_count()),
            _ => {
                let symbol = (c as char).to_string();
                match element::by_symbol(&symbol) {
                    Some(e) => element(e.atomic_number, false),
                    None => {
                        return Err(SmartsError::UnknownElement {
                            symbol,
                            position: self.offset + position,
                        })
                    }
                }
            }
        })
    }

    fn lowercase_primitive(&mut self) -> Result<AtomPrimitive, SmartsError> {
        let aromatic_pair = match self.input.get(self.pos..self.pos + 2) {
            Some(b"se") => Some(34),
            Some(b"as") => Some(33),
            Some(b"te") => Some(52),
            _ => None,
        };
        if let Some(z) = aromatic_pair {
            self.pos += 2;
            return Ok(element(z, true));
        }
        let position = self.pos;
        let c = self.input[position];
        self.pos += 1;
        Ok(match c {
            b'b' => element(5, true),
            b'c' => element(6, true),
            b'n' => element(7, true),
            b'o' => element(8, true),
            b'p' => element(15, true),
            b's' => element(16, true),
            b'a' => AtomPrimitive::Aromatic,
            b'h' => AtomPrimitive::ImplicitHydrogens(self.count()),
            b'r' => AtomPrimitive::RingSize(self.optional_count()),
            b'v' => AtomPrimitive::Valence(self.count()),
            b'x' => AtomPrimitive::RingConnectivity(self.optional_count()),
            _ => return Err(self.unexpected_at(position)),
        })
    }

    fn recursive(&mut self) -> Result<AtomPrimitive, SmartsError> {
        let start = self.pos;
        if self.input.get(start + 1) != Some(&b'(') {
            return Err(self.unexpected_at(start + 1));
        }
        let mut depth = 0usize;
        let mut end = None;
        for (i, &c) in self.input.iter().enumerate().skip(start + 1) {
            match c {
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        end = Some(i);
                        break;
                    }
                }
                _ => {}
            }
        }
        let end = end.ok_or(SmartsError::UnexpectedEnd(self.offset + self.input.len()))?;
        let inner = Parser::new(&self.input[start + 2..end], self.offset + start + 2).run()?;
        self.pos = end + 1;
        Ok(AtomPrimitive::Recursive(Box::new(inner)))
    }
}
