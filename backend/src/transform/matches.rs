//! Match cell grammars.
//!
//! # Legacy
//!
//! ```text
//! vs. <opponent> (<result>)        e.g.  vs. Reiku (W)
//! ```
//!
//! The format is not in the cell; it comes from [`super::annotate`].
//! `W` and `L` decide the winner, any other code records a dead game.
//!
//! # SPL-Middle
//!
//! ```text
//! <W|L> vs <opponent> (<generation> <tier...>)   e.g.  W vs Reiku (SV Doubles OU)
//! ```
//!
//! Self-contained: the format is read from the parentheses. There is no
//! dead result in this grammar.

use once_cell::sync::Lazy;
use regex::Regex;

use super::annotate::LEGACY_MATCH_MARKER;
use crate::models::{Format, Generation, Tier, Winner};

/// Head-to-head result read from one player's cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCell {
    pub opponent: String,
    /// Outcome from the perspective of the row's player (player1).
    pub winner: Winner,
    pub format: Format,
}

// =============================================================================
// Legacy
// =============================================================================

/// Legacy result code to winner.
pub fn legacy_winner(code: &str) -> Winner {
    let code = code.trim();
    if code.eq_ignore_ascii_case("W") {
        Winner::Player1
    } else if code.eq_ignore_ascii_case("L") {
        Winner::Player2
    } else {
        Winner::Dead
    }
}

/// Parse a legacy `vs. <opponent> (<result>)` cell.
///
/// `format_text` is the resolved annotation for the cell and
/// `default_generation` the tournament consensus. Cells of any other shape
/// yield `None`.
pub fn parse_legacy_cell(
    value: &str,
    format_text: &str,
    default_generation: Generation,
) -> Option<ParsedCell> {
    let marker = value.find(LEGACY_MATCH_MARKER)?;
    let open = value.find('(')?;
    let close = value.find(')')?;

    let name_start = marker + LEGACY_MATCH_MARKER.len();
    if open < name_start || close < open {
        return None;
    }

    let opponent = value[name_start..open].trim();
    if opponent.is_empty() {
        return None;
    }

    Some(ParsedCell {
        opponent: opponent.to_string(),
        winner: legacy_winner(&value[open + 1..close]),
        format: Format::parse(format_text, default_generation),
    })
}

// =============================================================================
// SPL-Middle
// =============================================================================

static SPL_MIDDLE_CELL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*([WL])\s+vs\.?\s+(.*?)\s*\(([^()]*)\)\s*$")
        .expect("SPL-Middle cell pattern is valid")
});

/// Whether a cell value has the SPL-Middle shape.
pub fn is_spl_middle_cell(value: &str) -> bool {
    SPL_MIDDLE_CELL.is_match(value)
}

/// Parse an SPL-Middle `<W|L> vs <opponent> (<Gen Tier>)` cell.
///
/// Yields `None` when the cell does not match, the opponent is blank, or the
/// leading format token is not a known generation.
pub fn parse_spl_middle_cell(value: &str) -> Option<ParsedCell> {
    let caps = SPL_MIDDLE_CELL.captures(value)?;

    let opponent = caps.get(2)?.as_str().trim();
    if opponent.is_empty() {
        return None;
    }

    let winner = if caps.get(1)?.as_str().eq_ignore_ascii_case("W") {
        Winner::Player1
    } else {
        Winner::Player2
    };

    let mut tokens = caps.get(3)?.as_str().split_whitespace();
    let generation = Generation::from_alias(tokens.next()?)?;
    let tier_text = tokens.collect::<Vec<_>>().join(" ");
    let tier = if tier_text.is_empty() {
        Tier::default()
    } else {
        Tier::new(&tier_text)
    };

    Some(ParsedCell {
        opponent: opponent.to_string(),
        winner,
        format: Format::new(generation, tier),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_win_loss_dead() {
        let win = parse_legacy_cell("vs. Reiku (W)", "USM OU", Generation::Swsh).unwrap();
        assert_eq!(win.opponent, "Reiku");
        assert_eq!(win.winner, Winner::Player1);
        assert_eq!(win.format.generation, Generation::Sm);
        assert_eq!(win.format.tier.as_str(), "OU");

        let loss = parse_legacy_cell("vs. Reiku ( L )", "", Generation::Swsh).unwrap();
        assert_eq!(loss.winner, Winner::Player2);
        assert_eq!(loss.format.generation, Generation::Swsh);
        assert_eq!(loss.format.tier.as_str(), "OU");

        let dead = parse_legacy_cell("vs. Reiku (D)", "SS UU", Generation::Swsh).unwrap();
        assert_eq!(dead.winner, Winner::Dead);
        assert_eq!(dead.format.tier.as_str(), "UU");
    }

    #[test]
    fn test_legacy_multi_word_opponent() {
        let parsed =
            parse_legacy_cell("vs.   Mr. Mime Fan  (W)", "SS OU", Generation::Sv).unwrap();
        assert_eq!(parsed.opponent, "Mr. Mime Fan");
    }

    #[test]
    fn test_legacy_malformed() {
        assert_eq!(parse_legacy_cell("vs. Reiku", "SS OU", Generation::Sv), None);
        assert_eq!(parse_legacy_cell("vs. Reiku )W(", "SS OU", Generation::Sv), None);
        assert_eq!(parse_legacy_cell("(W) vs. Reiku", "SS OU", Generation::Sv), None);
        assert_eq!(parse_legacy_cell("vs. (W)", "SS OU", Generation::Sv), None);
        assert_eq!(parse_legacy_cell("", "", Generation::Sv), None);
    }

    #[test]
    fn test_spl_middle_basic() {
        let parsed = parse_spl_middle_cell("W vs Reiku (USM OU)").unwrap();
        assert_eq!(parsed.opponent, "Reiku");
        assert_eq!(parsed.winner, Winner::Player1);
        assert_eq!(parsed.format.generation, Generation::Sm);
        assert_eq!(parsed.format.tier.as_str(), "OU");

        let parsed = parse_spl_middle_cell("L vs. Amy Bo (SV Doubles OU)").unwrap();
        assert_eq!(parsed.opponent, "Amy Bo");
        assert_eq!(parsed.winner, Winner::Player2);
        assert_eq!(parsed.format.generation, Generation::Sv);
        assert_eq!(parsed.format.tier.as_str(), "DOU");
    }

    #[test]
    fn test_spl_middle_generation_only() {
        let parsed = parse_spl_middle_cell("W vs Reiku (GSC)").unwrap();
        assert_eq!(parsed.format.generation, Generation::Gsc);
        assert_eq!(parsed.format.tier, Tier::default());
    }

    #[test]
    fn test_spl_middle_rejects() {
        // No dead result in this grammar
        assert_eq!(parse_spl_middle_cell("D vs Reiku (SV OU)"), None);
        assert_eq!(parse_spl_middle_cell("W vs   (SV OU)"), None);
        assert_eq!(parse_spl_middle_cell("W vs Reiku"), None);
        assert_eq!(parse_spl_middle_cell("W vs Reiku (OU)"), None);
        assert_eq!(parse_spl_middle_cell("vs. Reiku (W)"), None);
        assert!(!is_spl_middle_cell(""));
        assert!(is_spl_middle_cell("l vs Reiku (SS UU)"));
    }
}
