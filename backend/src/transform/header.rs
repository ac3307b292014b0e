//! Header classification.
//!
//! Locates the roster columns and the round columns in row 0 by substring
//! matching. Absent columns are `None`, never an error.

use serde::{Deserialize, Serialize};

/// Substring identifying the player-name column.
pub const PLAYER_KEYWORD: &str = "Player";
/// Substring identifying the team column.
pub const TEAM_KEYWORD: &str = "Team";
/// Substring identifying the price column.
pub const PRICE_KEYWORD: &str = "Cost";
/// Substring identifying the default-tier column.
pub const TIER_KEYWORD: &str = "Tier";
/// Any of these substrings marks a round column.
pub const ROUND_KEYWORDS: [&str; 4] = ["Week", "Semis", "Final", "Tiebreak"];

/// Positions of the roster columns. `None` means the column is absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnIndices {
    pub player: Option<usize>,
    pub team: Option<usize>,
    pub price: Option<usize>,
    pub tier: Option<usize>,
}

/// Round column positions, in header order.
pub type RoundIndices = Vec<usize>;

/// Index of the first header containing `keyword`.
fn first_containing<S: AsRef<str>>(header: &[S], keyword: &str) -> Option<usize> {
    header.iter().position(|h| h.as_ref().contains(keyword))
}

/// Locate the player, team, price and tier columns.
pub fn classify_columns<S: AsRef<str>>(header: &[S]) -> ColumnIndices {
    ColumnIndices {
        player: first_containing(header, PLAYER_KEYWORD),
        team: first_containing(header, TEAM_KEYWORD),
        price: first_containing(header, PRICE_KEYWORD),
        tier: first_containing(header, TIER_KEYWORD),
    }
}

/// Every header that names a round, left to right.
pub fn classify_rounds<S: AsRef<str>>(header: &[S]) -> RoundIndices {
    header
        .iter()
        .enumerate()
        .filter(|(_, h)| ROUND_KEYWORDS.iter().any(|k| h.as_ref().contains(k)))
        .map(|(i, _)| i)
        .collect()
}

/// Classify a header row in one call.
pub fn classify_header<S: AsRef<str>>(header: &[S]) -> (ColumnIndices, RoundIndices) {
    (classify_columns(header), classify_rounds(header))
}
