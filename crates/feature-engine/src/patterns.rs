//! Compiled SMARTS Tables
//!
//! Descriptor tables are written as static (name, SMARTS) pairs and compiled
//! once per process on first use.

use molecule::{MatchTarget, SmartsPattern};
use std::sync::OnceLock;
use tracing::error;

/// Static list of named SMARTS patterns, compiled lazily
pub(crate) struct PatternTable {
    entries: &'static [(&'static str, &'static str)],
    compiled: OnceLock<Vec<Option<SmartsPattern>>>,
}

impl PatternTable {
    pub(crate) const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self {
            entries,
            compiled: OnceLock::new(),
        }
    }

    /// Compiled patterns in table order; `None` where compilation failed
    pub(crate) fn patterns(&self) -> &[Option<SmartsPattern>] {
        self.compiled.get_or_init(|| {
            self.entries
                .iter()
                .map(|&(name, smarts)| match SmartsPattern::parse(smarts) {
                    Ok(pattern) => Some(pattern),
                    Err(e) => {
                        error!("Pattern {} ({}) failed to compile: {}", name, smarts, e);
                        None
                    }
                })
                .collect()
        })
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|&(name, _)| name)
    }

    pub(crate) fn name(&self, index: usize) -> &'static str {
        self.entries[index].0
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Unique match count of every pattern
    pub(crate) fn counts(&self, target: &MatchTarget) -> Vec<usize> {
        self.patterns()
            .iter()
            .map(|p| p.as_ref().map_or(0, |p| p.count_matches(target)))
            .collect()
    }

    /// Unique match count of the first pattern
    pub(crate) fn count(&self, target: &MatchTarget) -> usize {
        self.patterns()
            .first()
            .and_then(Option::as_ref)
            .map_or(0, |p| p.count_matches(target))
    }

    /// Index of the first pattern that matches with its first atom on `atom`
    pub(crate) fn first_match_at(&self, target: &MatchTarget, atom: usize) -> Option<usize> {
        self.patterns()
            .iter()
            .position(|p| p.as_ref().is_some_and(|p| p.matches_at(target, atom)))
    }

    #[cfg(test)]
    pub(crate) fn failures(&self) -> Vec<&'static str> {
        self.entries
            .iter()
            .zip(self.patterns())
            .filter(|(_, p)| p.is_none())
            .map(|(&(name, _), _)| name)
            .collect()
    }
}
