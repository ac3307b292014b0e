//! Domain models for the tournament extraction pipeline.
//!
//! - [`Generation`] - Closed set of ruleset eras, with dialect aliases
//! - [`Tier`] - Competitive bracket label, canonicalized
//! - [`Format`] - `(Generation, Tier)` pair attached to every match
//! - [`Winner`] / [`Stage`] - Match outcome and coarse tournament phase
//! - [`TournamentData`] - The output contract of every dialect transformer

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Generation
// =============================================================================

/// A named era of the underlying ruleset.
///
/// Declaration order is the fixed enumeration order used for tie-breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Generation {
    Rby,
    Gsc,
    Adv,
    Dpp,
    Bw,
    Oras,
    Sm,
    Swsh,
    Sv,
}

impl Generation {
    /// Every generation, in enumeration order.
    pub const ALL: [Generation; 9] = [
        Generation::Rby,
        Generation::Gsc,
        Generation::Adv,
        Generation::Dpp,
        Generation::Bw,
        Generation::Oras,
        Generation::Sm,
        Generation::Swsh,
        Generation::Sv,
    ];

    /// Canonical spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rby => "RBY",
            Self::Gsc => "GSC",
            Self::Adv => "ADV",
            Self::Dpp => "DPP",
            Self::Bw => "BW",
            Self::Oras => "ORAS",
            Self::Sm => "SM",
            Self::Swsh => "SWSH",
            Self::Sv => "SV",
        }
    }

    /// Resolve a dialect spelling ("USM", "BW2", "SS", ...) to its generation.
    pub fn from_alias(alias: &str) -> Option<Self> {
        let normalized = alias.trim().to_uppercase();
        match normalized.as_str() {
            "RBY" | "RB" | "GEN1" => Some(Self::Rby),
            "GSC" | "GS" | "GEN2" => Some(Self::Gsc),
            "ADV" | "RS" | "RSE" | "GEN3" => Some(Self::Adv),
            "DPP" | "DP" | "PT" | "HGSS" | "GEN4" => Some(Self::Dpp),
            "BW" | "BW2" | "B2W2" | "GEN5" => Some(Self::Bw),
            "ORAS" | "XY" | "GEN6" => Some(Self::Oras),
            "SM" | "USM" | "USUM" | "SUMO" | "GEN7" => Some(Self::Sm),
            "SWSH" | "SS" | "GEN8" => Some(Self::Swsh),
            "SV" | "SCVI" | "GEN9" => Some(Self::Sv),
            _ => None,
        }
    }

    /// Position in the fixed enumeration.
    pub fn ordinal(&self) -> usize {
        *self as usize
    }
}

impl Default for Generation {
    fn default() -> Self {
        Generation::ALL[0]
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Tier
// =============================================================================

/// Label used when a match has no resolvable tier.
pub const DEFAULT_TIER: &str = "OU";

/// A competitive bracket label (OU, Uber, UU, ...).
///
/// Always holds the canonical spelling; construct through [`Tier::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tier(String);

impl Tier {
    /// Canonicalize a raw label.
    pub fn new(label: &str) -> Self {
        Self(Self::canonical(label))
    }

    /// Canonical spelling of a label. Unknown labels pass through with
    /// whitespace collapsed.
    pub fn canonical(label: &str) -> String {
        let collapsed = label.split_whitespace().collect::<Vec<_>>().join(" ");
        let canonical = match collapsed.to_uppercase().as_str() {
            "UBER" | "UBERS" => "Uber",
            "OU" | "OVERUSED" => "OU",
            "UU" | "UNDERUSED" => "UU",
            "RU" | "RARELYUSED" => "RU",
            "NU" | "NEVERUSED" => "NU",
            "PU" => "PU",
            "ZU" => "ZU",
            "LC" | "LITTLE CUP" => "LC",
            "DOU" | "DOUBLES" | "DOUBLES OU" => "DOU",
            _ => return collapsed,
        };
        canonical.to_string()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Tier {
    fn default() -> Self {
        Self(DEFAULT_TIER.to_string())
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Format
// =============================================================================

/// The ruleset a match was played under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Format {
    pub generation: Generation,
    pub tier: Tier,
}

impl Format {
    pub fn new(generation: Generation, tier: Tier) -> Self {
        Self { generation, tier }
    }

    /// Parse a "Gen Tier" string such as `"USM OU"` or `"SV Doubles OU"`.
    ///
    /// When the first token is not a known generation, `default_generation`
    /// is used and the whole text is read as the tier.
    pub fn parse(text: &str, default_generation: Generation) -> Self {
        let mut tokens = text.split_whitespace();
        let first = tokens.next().unwrap_or("");

        let (generation, tier_text) = match Generation::from_alias(first) {
            Some(generation) => (generation, tokens.collect::<Vec<_>>().join(" ")),
            None => (default_generation, text.trim().to_string()),
        };

        let tier = if tier_text.is_empty() {
            Tier::default()
        } else {
            Tier::new(&tier_text)
        };

        Self { generation, tier }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.generation, self.tier)
    }
}

// =============================================================================
// Match outcome and stage
// =============================================================================

/// Which side of a match won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Player1,
    Player2,
    /// Explicitly drawn or void game.
    Dead,
}

/// Coarse tournament phase derived from a round name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Tiebreak,
    Playoff,
    #[serde(rename = "Regular Season")]
    RegularSeason,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tiebreak => "Tiebreak",
            Self::Playoff => "Playoff",
            Self::RegularSeason => "Regular Season",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Tournament entities
// =============================================================================

/// A rostered player.
///
/// A traded player ("TeamA / TeamB") keeps only the first listed team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerData {
    pub player: String,
    pub team: String,
    pub price: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamData {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundData {
    pub name: String,
}

/// One head-to-head result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchData {
    pub round_index: usize,
    pub player1: String,
    pub player2: String,
    pub winner: Winner,
    pub generation: Generation,
    pub tier: Tier,
    pub round_name: String,
    pub stage: Stage,
}

impl MatchData {
    /// Player names in sorted order, independent of which row recorded the match.
    pub fn unordered_pair(&self) -> (&str, &str) {
        if self.player1 <= self.player2 {
            (&self.player1, &self.player2)
        } else {
            (&self.player2, &self.player1)
        }
    }
}

/// Canonical output of every dialect transformer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentData {
    pub players: Vec<PlayerData>,
    pub teams: Vec<TeamData>,
    pub rounds: Vec<RoundData>,
    pub matches: Vec<MatchData>,
}

impl TournamentData {
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
            && self.teams.is_empty()
            && self.rounds.is_empty()
            && self.matches.is_empty()
    }

    /// Short human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "{} players, {} teams, {} rounds, {} matches",
            self.players.len(),
            self.teams.len(),
            self.rounds.len(),
            self.matches.len()
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
