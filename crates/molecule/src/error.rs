//! SMILES Error Types

use thiserror::Error;

/// Errors raised while reading a SMILES string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SmilesError {
    /// Input contained no atoms
    #[error("SMILES string is empty")]
    Empty,

    /// Character not valid at this position
    #[error("Unexpected character '{character}' at position {position}")]
    UnexpectedCharacter { character: char, position: usize },

    /// Element symbol not in the periodic table
    #[error("Unknown element '{symbol}' at position {position}")]
    UnknownElement { symbol: String, position: usize },

    /// Bracket atom without closing ']'
    #[error("Unclosed bracket atom starting at position {0}")]
    UnclosedBracket(usize),

    /// Branch parentheses do not balance
    #[error("Unbalanced branch at position {0}")]
    UnbalancedBranch(usize),

    /// Bond symbol not followed by an atom
    #[error("Bond at position {0} has no target atom")]
    BondWithoutTarget(usize),

    /// Ring closure digit opened but never closed
    #[error("Ring closure {0} is never closed")]
    UnclosedRing(u32),

    /// The two ends of a ring closure specify different bonds
    #[error("Ring closure {0} has conflicting bond orders")]
    RingBondConflict(u32),

    /// Two atoms bonded twice, or an atom bonded to itself
    #[error("Duplicate bond between atoms {0} and {1}")]
    DuplicateBond(usize, usize),

    /// Lowercase aromatic atom that is not part of any ring
    #[error("Non-ring atom {0} marked aromatic")]
    AromaticOutsideRing(usize),

    /// Atom has more bonds than any allowed valence
    #[error("Explicit valence {valence} for atom {atom} ({symbol}) exceeds the allowed maximum")]
    ValenceExceeded {
        atom: usize,
        symbol: &'static str,
        valence: u8,
    },
}

/// Errors raised while reading a SMARTS pattern
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SmartsError {
    /// Pattern contained no atoms
    #[error("SMARTS pattern is empty")]
    Empty,

    /// Character not valid at this position
    #[error("Unexpected character '{character}' at position {position}")]
    UnexpectedCharacter { character: char, position: usize },

    /// Pattern ended inside an atom, bond or recursive expression
    #[error("SMARTS pattern ends early at position {0}")]
    UnexpectedEnd(usize),

    /// Element symbol not in the periodic table
    #[error("Unknown element '{symbol}' at position {position}")]
    UnknownElement { symbol: String, position: usize },

    /// Branch parentheses do not balance
    #[error("Unbalanced branch at position {0}")]
    UnbalancedBranch(usize),

    /// Ring closure digit opened but never closed
    #[error("Ring closure {0} is never closed")]
    UnclosedRing(u32),

    /// Bond expression not followed by an atom
    #[error("Bond at position {0} has no target atom")]
    BondWithoutTarget(usize),
}
