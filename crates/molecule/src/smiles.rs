//! SMILES Reader
//!
//! Reads the organic subset, bracket atoms, bond symbols, branches, ring
//! closures (`1`-`9`, `%nn`) and `.` separated components. Stereo marks are
//! kept only as flags: `@` marks the atom chiral and `/` `\` mark the bond
//! directional, without recording the configuration. Reading stops at the first whitespace, so a
//! trailing molecule name is ignored.

use crate::aromaticity;
use crate::element::{self, allowed_valences};
use crate::error::SmilesError;
use crate::graph::{Atom, Bond, BondOrder, Molecule};
use std::collections::{BTreeMap, HashSet};
use tracing::trace;

/// Bond symbol as written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BondSymbol {
    Single,
    Double,
    Triple,
    Quadruple,
    Aromatic,
    /// `/` or `\`, read as single
    Directional,
}

impl BondSymbol {
    fn from_byte(c: u8) -> Option<Self> {
        match c {
            b'-' => Some(BondSymbol::Single),
            b'=' => Some(BondSymbol::Double),
            b'#' => Some(BondSymbol::Triple),
            b'$' => Some(BondSymbol::Quadruple),
            b':' => Some(BondSymbol::Aromatic),
            b'/' | b'\\' => Some(BondSymbol::Directional),
            _ => None,
        }
    }

    fn order(self) -> BondOrder {
        match self {
            BondSymbol::Single | BondSymbol::Directional => BondOrder::Single,
            BondSymbol::Double => BondOrder::Double,
            BondSymbol::Triple => BondOrder::Triple,
            BondSymbol::Quadruple => BondOrder::Quadruple,
            BondSymbol::Aromatic => BondOrder::Aromatic,
        }
    }
}

struct RingOpening {
    atom: usize,
    bond: Option<BondSymbol>,
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    bonded: HashSet<(usize, usize)>,
    prev: Option<usize>,
    /// Bond symbol waiting for its second atom, with its position
    pending: Option<(BondSymbol, usize)>,
    branches: Vec<usize>,
    rings: BTreeMap<u32, RingOpening>,
}

impl<'a> Parser<'a> {
    fn new(smiles: &'a str) -> Self {
        Self {
            input: smiles.as_bytes(),
            pos: 0,
            atoms: Vec::new(),
            bonds: Vec::new(),
            bonded: HashSet::new(),
            prev: None,
            pending: None,
            branches: Vec::new(),
            rings: BTreeMap::new(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn unexpected(&self) -> SmilesError {
        // Report the full character even when it is multi-byte
        let character = std::str::from_utf8(&self.input[self.pos..])
            .ok()
            .and_then(|s| s.chars().next())
            .unwrap_or(self.input[self.pos] as char);
        SmilesError::UnexpectedCharacter {
            character,
            position: self.pos,
        }
    }

    fn run(mut self) -> Result<(Vec<Atom>, Vec<Bond>), SmilesError> {
        while let Some(c) = self.peek() {
            match c {
                b' ' | b'\t' | b'\r' | b'\n' => break,
                b'(' => {
                    let atom = self.prev.ok_or(SmilesError::UnbalancedBranch(self.pos))?;
                    if let Some((_, at)) = self.pending {
                        return Err(SmilesError::BondWithoutTarget(at));
                    }
                    if self.input.get(self.pos + 1) == Some(&b')') {
                        self.pos += 1;
                        return Err(self.unexpected());
                    }
                    self.branches.push(atom);
                    self.pos += 1;
                }
                b')' => {
                    if let Some((_, at)) = self.pending {
                        return Err(SmilesError::BondWithoutTarget(at));
                    }
                    let atom = self
                        .branches
                        .pop()
                        .ok_or(SmilesError::UnbalancedBranch(self.pos))?;
                    self.prev = Some(atom);
                    self.pos += 1;
                }
                b'.' => {
                    if let Some((_, at)) = self.pending {
                        return Err(SmilesError::BondWithoutTarget(at));
                    }
                    self.prev = None;
                    self.pos += 1;
                }
                b'%' => {
                    let start = self.pos;
                    let digits = self.input.get(self.pos + 1..self.pos + 3);
                    let number = match digits {
                        Some(d) if d.iter().all(u8::is_ascii_digit) => {
                            ((d[0] - b'0') * 10 + (d[1] - b'0')) as u32
                        }
                        _ => return Err(self.unexpected()),
                    };
                    self.pos += 3;
                    self.ring_closure(number, start)?;
                }
                b'0'..=b'9' => {
                    let start = self.pos;
                    self.pos += 1;
                    self.ring_closure((c - b'0') as u32, start)?;
                }
                b'[' => {
                    let atom = self.bracket_atom()?;
                    self.add_atom(atom)?;
                }
                b'*' => {
                    self.pos += 1;
                    self.add_atom(Atom::new(0))?;
                }
                _ => {
                    if let Some(symbol) = BondSymbol::from_byte(c) {
                        if self.prev.is_none() {
                            return Err(SmilesError::BondWithoutTarget(self.pos));
                        }
                        if self.pending.is_some() {
                            return Err(self.unexpected());
                        }
                        self.pending = Some((symbol, self.pos));
                        self.pos += 1;
                    } else {
                        let atom = self.organic_atom()?;
                        self.add_atom(atom)?;
                    }
                }
            }
        }

        if let Some((_, at)) = self.pending {
            return Err(SmilesError::BondWithoutTarget(at));
        }
        if !self.branches.is_empty() {
            return Err(SmilesError::UnbalancedBranch(self.pos));
        }
        if let Some((&number, _)) = self.rings.iter().next() {
            return Err(SmilesError::UnclosedRing(number));
        }
        if self.atoms.is_empty() {
            return Err(SmilesError::Empty);
        }
        Ok((self.atoms, self.bonds))
    }

    fn add_atom(&mut self, atom: Atom) -> Result<(), SmilesError> {
        let idx = self.atoms.len();
        self.atoms.push(atom);
        if let Some(prev) = self.prev {
            let symbol = self.pending.take().map(|(s, _)| s);
            self.connect(prev, idx, symbol)?;
        }
        self.prev = Some(idx);
        Ok(())
    }

    fn connect(&mut self, a: usize, b: usize, symbol: Option<BondSymbol>) -> Result<(), SmilesError> {
        let key = (a.min(b), a.max(b));
        if a == b || !self.bonded.insert(key) {
            return Err(SmilesError::DuplicateBond(key.0, key.1));
        }
        let order = match symbol {
            Some(s) => s.order(),
            None if self.atoms[a].is_aromatic && self.atoms[b].is_aromatic => BondOrder::Aromatic,
            None => BondOrder::Single,
        };
        self.bonds.push(Bond {
            directional: symbol == Some(BondSymbol::Directional),
            ..Bond::new(a, b, order)
        });
        Ok(())
    }

    fn ring_closure(&mut self, number: u32, position: usize) -> Result<(), SmilesError> {
        let atom = self.prev.ok_or(SmilesError::UnexpectedCharacter {
            character: self.input[position] as char,
            position,
        })?;
        let bond = self.pending.take().map(|(s, _)| s);
        match self.rings.remove(&number) {
            Some(open) => {
                let symbol = match (open.bond, bond) {
                    (Some(x), Some(y)) if x != y => return Err(SmilesError::RingBondConflict(number)),
                    (x, y) => x.or(y),
                };
                self.connect(open.atom, atom, symbol)
            }
            None => {
                self.rings.insert(number, RingOpening { atom, bond });
                Ok(())
            }
        }
    }

    fn organic_atom(&mut self) -> Result<Atom, SmilesError> {
        let c = self.input[self.pos];
        let next = self.input.get(self.pos + 1).copied();
        let (atomic_number, aromatic, len) = match (c, next) {
            (b'C', Some(b'l')) => (17, false, 2),
            (b'B', Some(b'r')) => (35, false, 2),
            (b'B', _) => (5, false, 1),
            (b'C', _) => (6, false, 1),
            (b'N', _) => (7, false, 1),
            (b'O', _) => (8, false, 1),
            (b'P', _) => (15, false, 1),
            (b'S', _) => (16, false, 1),
            (b'F', _) => (9, false, 1),
            (b'I', _) => (53, false, 1),
            (b'b', _) => (5, true, 1),
            (b'c', _) => (6, true, 1),
            (b'n', _) => (7, true, 1),
            (b'o', _) => (8, true, 1),
            (b'p', _) => (15, true, 1),
            (b's', _) => (16, true, 1),
            _ => return Err(self.unexpected()),
        };
        self.pos += len;
        Ok(Atom {
            is_aromatic: aromatic,
            ..Atom::new(atomic_number)
        })
    }

    fn read_number(&mut self) -> Option<u32> {
        let start = self.pos;
        let mut value: u32 = 0;
        while let Some(d) = self.peek().filter(u8::is_ascii_digit) {
            value = value.saturating_mul(10).saturating_add((d - b'0') as u32);
            self.pos += 1;
        }
        (self.pos > start).then_some(value)
    }

    fn bracket_atom(&mut self) -> Result<Atom, SmilesError> {
        let start = self.pos;
        self.pos += 1;

        let isotope = self.read_number().map(|n| n.min(u16::MAX as u32) as u16);
        let (atomic_number, is_aromatic) = self.bracket_symbol(start)?;
        let chiral = self.read_chirality();

        let hydrogens = if self.peek() == Some(b'H') {
            self.pos += 1;
            self.read_number().unwrap_or(1)
        } else {
            0
        };
        let formal_charge = self.read_charge();

        if self.peek() == Some(b':') {
            self.pos += 1;
            if self.read_number().is_none() {
                return Err(self.peek().map_or(SmilesError::UnclosedBracket(start), |_| self.unexpected()));
            }
        }

        match self.peek() {
            Some(b']') => self.pos += 1,
            Some(_) => return Err(self.unexpected()),
            None => return Err(SmilesError::UnclosedBracket(start)),
        }

        Ok(Atom {
            atomic_number,
            isotope,
            formal_charge,
            hydrogens: hydrogens.min(u8::MAX as u32) as u8,
            is_aromatic,
            bracketed: true,
            radical_electrons: 0,
            chiral,
        })
    }

    fn bracket_symbol(&mut self, start: usize) -> Result<(u8, bool), SmilesError> {
        let c = self.peek().ok_or(SmilesError::UnclosedBracket(start))?;
        let two = self
            .input
            .get(self.pos..self.pos + 2)
            .and_then(|s| std::str::from_utf8(s).ok());

        if c == b'*' {
            self.pos += 1;
            return Ok((0, false));
        }
        if c.is_ascii_uppercase() {
            if let Some(sym) = two.filter(|s| s.as_bytes()[1].is_ascii_lowercase()) {
                if let Some(e) = element::by_symbol(sym) {
                    self.pos += 2;
                    return Ok((e.atomic_number, false));
                }
            }
            let sym = (c as char).to_string();
            return match element::by_symbol(&sym) {
                Some(e) => {
                    self.pos += 1;
                    Ok((e.atomic_number, false))
                }
                None => Err(SmilesError::UnknownElement {
                    symbol: sym,
                    position: self.pos,
                }),
            };
        }
        if c.is_ascii_lowercase() {
            let aromatic_two = match two {
                Some("se") => Some(34),
                Some("as") => Some(33),
                Some("te") => Some(52),
                _ => None,
            };
            if let Some(z) = aromatic_two {
                self.pos += 2;
                return Ok((z, true));
            }
            let z = match c {
                b'b' => 5,
                b'c' => 6,
                b'n' => 7,
                b'o' => 8,
                b'p' => 15,
                b's' => 16,
                _ => {
                    return Err(SmilesError::UnknownElement {
                        symbol: (c as char).to_string(),
                        position: self.pos,
                    })
                }
            };
            self.pos += 1;
            return Ok((z, true));
        }
        Err(self.unexpected())
    }

    fn read_chirality(&mut self) -> bool {
        if self.peek() != Some(b'@') {
            return false;
        }
        while self.peek() == Some(b'@') {
            self.pos += 1;
        }
        let class = self.input.get(self.pos..self.pos + 2);
        if matches!(class, Some(b"TH" | b"AL" | b"SP" | b"TB" | b"OH")) {
            self.pos += 2;
            self.read_number();
        }
        true
    }

    fn read_charge(&mut self) -> i8 {
        let sign: i32 = match self.peek() {
            Some(b'+') => 1,
            Some(b'-') => -1,
            _ => return 0,
        };
        let symbol = self.input[self.pos];
        self.pos += 1;
        let magnitude = match self.read_number() {
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
}

/// Parse a SMILES string into a molecular graph.
///
/// Hydrogen counts are completed from default valences and Kekulé rings
/// with 4n+2 π electrons are re-labelled aromatic.
pub fn parse_smiles(smiles: &str) -> Result<Molecule, SmilesError> {
    let (atoms, bonds) = Parser::new(smiles).run()?;
    let mut mol = Molecule::from_parts(atoms, bonds);

    if let Some(idx) = (0..mol.atom_count()).find(|&i| mol.atoms[i].is_aromatic && !mol.ring_atoms[i]) {
        return Err(SmilesError::AromaticOutsideRing(idx));
    }

    assign_hydrogens(&mut mol)?;
    aromaticity::perceive(&mut mol);

    trace!(
        "Parsed '{}': {} atoms, {} bonds, {} rings",
        smiles,
        mol.atom_count(),
        mol.bond_count(),
        mol.rings().len()
    );
    Ok(mol)
}

fn assign_hydrogens(mol: &mut Molecule) -> Result<(), SmilesError> {
    for idx in 0..mol.atom_count() {
        let (hydrogens, radicals) = hydrogen_count(mol, idx)?;
        let atom = &mut mol.atoms[idx];
        atom.hydrogens = hydrogens;
        atom.radical_electrons = radicals;
    }
    Ok(())
}

/// Hydrogens and radical electrons for one atom
fn hydrogen_count(mol: &Molecule, idx: usize) -> Result<(u8, u8), SmilesError> {
    let atom = &mol.atoms[idx];
    let bond_valence: u32 = mol
        .neighbors(idx)
        .iter()
        .map(|&(_, b)| mol.bonds[b].order.valence() as u32)
        .sum();
    let exceeded = |valence: u32| SmilesError::ValenceExceeded {
        atom: idx,
        symbol: atom.element().symbol,
        valence: valence.min(u8::MAX as u32) as u8,
    };

    if atom.bracketed {
        let total = bond_valence + atom.hydrogens as u32;
        let allowed = allowed_valences(atom.atomic_number, atom.formal_charge);
        let (Some(&min), Some(&max)) = (allowed.first(), allowed.last()) else {
            return Ok((atom.hydrogens, 0));
        };
        if total > max as u32 {
            return Err(exceeded(total));
        }
        let radicals = if !atom.is_aromatic && total < min as u32 {
            min as u32 - total
        } else {
            0
        };
        return Ok((atom.hydrogens, radicals as u8));
    }

    let valences = allowed_valences(atom.atomic_number, 0);
    if valences.is_empty() {
        return Ok((0, 0));
    }

    let has_multiple_bond = mol
        .neighbors(idx)
        .iter()
        .any(|&(_, b)| matches!(mol.bonds[b].order, BondOrder::Double | BondOrder::Triple | BondOrder::Quadruple));
    // Aromatic B/C, and N/P with two connections, hold one π bond not yet counted
    let extra_pi = atom.is_aromatic
        && !has_multiple_bond
        && match atom.atomic_number {
            5 | 6 => true,
            7 | 15 => mol.degree(idx) <= 2,
            _ => false,
        };

    let used = bond_valence + extra_pi as u32;
    if let Some(&v) = valences.iter().find(|&&v| v as u32 >= used) {
        return Ok(((v as u32 - used) as u8, 0));
    }
    if extra_pi && valences.iter().any(|&v| v as u32 >= bond_valence) {
        return Ok((0, 0));
    }
    Err(exceeded(bond_valence))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hydrogens(mol: &Molecule) -> Vec<u8> {
        mol.atoms().iter().map(|a| a.hydrogens).collect()
    }

    #[test]
    fn test_ethanol() {
        let mol = parse_smiles("CCO").unwrap();
        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.bond_count(), 2);
        assert_eq!(hydrogens(&mol), vec![3, 2, 1]);
    }

    #[test]
    fn test_branches_and_double_bonds() {
        // Acetic acid
        let mol = parse_smiles("CC(=O)O").unwrap();
        assert_eq!(mol.atom_count(), 4);
        assert_eq!(hydrogens(&mol), vec![3, 0, 0, 1]);
        let carbonyl = mol.bond_between(1, 2).unwrap();
        assert_eq!(mol.bond(carbonyl).order, BondOrder::Double);
    }

    #[test]
    fn test_aromatic_benzene() {
        let mol = parse_smiles("c1ccccc1").unwrap();
        assert_eq!(mol.atom_count(), 6);
        assert!(mol.atoms().iter().all(|a| a.is_aromatic && a.hydrogens == 1));
        assert!(mol.bonds().iter().all(|b| b.order == BondOrder::Aromatic));
    }

    #[test]
    fn test_kekule_benzene_is_perceived_aromatic() {
        let mol = parse_smiles("C1=CC=CC=C1").unwrap();
        assert!(mol.atoms().iter().all(|a| a.is_aromatic && a.hydrogens == 1));
        assert!(mol.bonds().iter().all(|b| b.order == BondOrder::Aromatic));
    }

    #[test]
    fn test_pyrrole_and_pyridine_hydrogens() {
        let pyrrole = parse_smiles("c1cc[nH]c1").unwrap();
        assert_eq!(pyrrole.atom(3).hydrogens, 1);
        let pyridine = parse_smiles("c1ccncc1").unwrap();
        assert_eq!(pyridine.atom(3).hydrogens, 0);
        let methylpyrrole = parse_smiles("Cn1cccc1").unwrap();
        assert_eq!(methylpyrrole.atom(1).hydrogens, 0);
    }

    #[test]
    fn test_cyclohexane_stays_aliphatic() {
        let mol = parse_smiles("C1CCCCC1").unwrap();
        assert!(mol.atoms().iter().all(|a| !a.is_aromatic && a.hydrogens == 2));
    }

    #[test]
    fn test_bracket_atom_fields() {
        let mol = parse_smiles("[13CH3][NH3+]").unwrap();
        assert_eq!(mol.atom(0).isotope, Some(13));
        assert_eq!(mol.atom(0).hydrogens, 3);
        assert_eq!(mol.atom(1).formal_charge, 1);
        assert_eq!(mol.atom(1).hydrogens, 3);
    }

    #[test]
    fn test_charge_forms() {
        let mol = parse_smiles("[O-][N+](=O)C").unwrap();
        assert_eq!(mol.atom(0).formal_charge, -1);
        assert_eq!(mol.atom(1).formal_charge, 1);
        let mol = parse_smiles("[Fe+++]").unwrap();
        assert_eq!(mol.atom(0).formal_charge, 3);
        let mol = parse_smiles("[Cu+2]").unwrap();
        assert_eq!(mol.atom(0).formal_charge, 2);
    }

    #[test]
    fn test_two_letter_elements() {
        let mol = parse_smiles("ClCCBr").unwrap();
        assert_eq!(mol.atom(0).atomic_number, 17);
        assert_eq!(mol.atom(3).atomic_number, 35);
        let mol = parse_smiles("[Na+].[Cl-]").unwrap();
        assert_eq!(mol.atom(0).atomic_number, 11);
        assert_eq!(mol.component_count(), 2);
    }

    #[test]
    fn test_percent_ring_closure() {
        let mol = parse_smiles("C%10CCCCC%10").unwrap();
        assert_eq!(mol.rings().len(), 1);
    }

    #[test]
    fn test_stereo_marks_are_flagged() {
        let mol = parse_smiles("C[C@@H](O)C/C=C/C").unwrap();
        assert_eq!(mol.atom(1).hydrogens, 1);
        assert_eq!(mol.atom_count(), 7);
        assert!(mol.atom(1).chiral);
        assert!(!mol.atom(0).chiral);
        let directional = mol.bonds().iter().filter(|b| b.directional).count();
        assert_eq!(directional, 2);
        assert_eq!(mol.bond(3).order, BondOrder::Single);
    }

    #[test]
    fn test_radical_from_bracket_atom() {
        let mol = parse_smiles("[CH3]").unwrap();
        assert_eq!(mol.atom(0).radical_electrons, 1);
    }

    #[test]
    fn test_trailing_name_is_ignored() {
        let mol = parse_smiles("CCO ethanol").unwrap();
        assert_eq!(mol.atom_count(), 3);
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(parse_smiles("").unwrap_err(), SmilesError::Empty);
        assert!(matches!(
            parse_smiles("not_a_smiles"),
            Err(SmilesError::UnexpectedCharacter { character: 't', .. })
        ));
        assert_eq!(parse_smiles("C1CC").unwrap_err(), SmilesError::UnclosedRing(1));
        assert!(matches!(parse_smiles("CC(C"), Err(SmilesError::UnbalancedBranch(_))));
        assert!(matches!(parse_smiles("CC)C"), Err(SmilesError::UnbalancedBranch(_))));
        assert!(matches!(parse_smiles("CC="), Err(SmilesError::BondWithoutTarget(_))));
        assert!(matches!(parse_smiles("[CH3"), Err(SmilesError::UnclosedBracket(0))));
        assert!(matches!(parse_smiles("[Xx]"), Err(SmilesError::UnknownElement { .. })));
        assert!(matches!(parse_smiles("C1CC=1"), Ok(_)));
        assert_eq!(parse_smiles("C=1CC#1").unwrap_err(), SmilesError::RingBondConflict(1));
        assert!(matches!(parse_smiles("C11"), Err(SmilesError::DuplicateBond(0, 0))));
        assert_eq!(parse_smiles("cC").unwrap_err(), SmilesError::AromaticOutsideRing(0));
        assert!(matches!(
            parse_smiles("C(C)(C)(C)(C)C"),
            Err(SmilesError::ValenceExceeded { atom: 0, .. })
        ));
    }
}
