//! Collapse the mirrored records of each match.
//!
//! Every match is written on both players' rows, so raw extraction sees it
//! twice. The first occurrence in row-then-round order is kept.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::MatchData;

/// What makes two match records the same match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DedupScope {
    /// Same round and same unordered pair.
    Round,
    /// Same unordered pair anywhere in the tournament.
    Tournament,
}

/// Identity of a match under a [`DedupScope`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchKey {
    pub round_index: Option<usize>,
    pub pair: (String, String),
}

impl MatchKey {
    pub fn of(m: &MatchData, scope: DedupScope) -> Self {
        let (a, b) = m.unordered_pair();
        Self {
            round_index: match scope {
                DedupScope::Round => Some(m.round_index),
                DedupScope::Tournament => None,
            },
            pair: (a.to_string(), b.to_string()),
        }
    }
}

/// Keep the first record per key, preserving order. Idempotent.
pub fn dedup_matches(matches: Vec<MatchData>, scope: DedupScope) -> Vec<MatchData> {
    let mut seen = HashSet::new();
    matches
        .into_iter()
        .filter(|m| seen.insert(MatchKey::of(m, scope)))
        .collect()
}
