//! Default tiers per row and the tournament-wide default generation.
//!
//! The consensus is a global pass: every row must be tier-resolved and
//! tallied before any match cell is parsed, since cells without an explicit
//! generation fall back to the tally's winner.

use crate::models::Generation;
use crate::parser::{value_at, Cell};

/// Separator between tier labels in a single tier cell.
pub const TIER_SEPARATOR: char = '/';

/// Ordered default tiers listed in a row's tier cell.
///
/// `"SS OU / USM OU"` yields `["SS OU", "USM OU"]`. Order is preserved and
/// repeats are kept; empty pieces are dropped. An absent column yields `[]`.
pub fn resolve_tiers(row: &[Cell], tier_index: Option<usize>) -> Vec<String> {
    value_at(row, tier_index)
        .split(TIER_SEPARATOR)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(String::from)
        .collect()
}

/// Generation named by a tier label's leading token, if any.
pub fn label_generation(label: &str) -> Option<Generation> {
    label.split_whitespace().next().and_then(Generation::from_alias)
}

/// Occurrence counts per generation, indexed in enumeration order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationTally {
    counts: [usize; Generation::ALL.len()],
}

impl GenerationTally {
    /// Tally every label of every row.
    pub fn from_rows<T: AsRef<[String]>>(rows: &[T]) -> Self {
        rows.iter()
            .flat_map(|tiers| tiers.as_ref().iter())
            .filter_map(|label| label_generation(label))
            .fold(Self::default(), |tally, generation| tally.with(generation))
    }

    fn with(mut self, generation: Generation) -> Self {
        self.counts[generation.ordinal()] += 1;
        self
    }

    pub fn count(&self, generation: Generation) -> usize {
        self.counts[generation.ordinal()]
    }

    /// Most frequent generation. Ties go to the earlier generation in
    /// enumeration order; an empty tally yields the first generation.
    pub fn most_common(&self) -> Generation {
        let mut best = Generation::ALL[0];
        let mut best_count = 0;
        for generation in Generation::ALL {
            let count = self.count(generation);
            if count > best_count {
                best = generation;
                best_count = count;
            }
        }
        best
    }
}

/// Tournament-wide default generation from every row's resolved tiers.
pub fn generation_consensus<T: AsRef<[String]>>(rows: &[T]) -> Generation {
    GenerationTally::from_rows(rows).most_common()
}
