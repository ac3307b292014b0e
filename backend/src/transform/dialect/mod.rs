//! Spreadsheet dialects.
//!
//! Each dialect contributes a cell grammar and a dedup scope; the row walk,
//! roster extraction, stage tagging and deduplication are shared.
//!
//! ```text
//! RawGrid ──▶ prepare (whole grid) ──▶ parse_cell (row × round) ──▶ dedup ──▶ TournamentData
//! ```

pub mod legacy;
pub mod modern;
pub mod spl_middle;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use super::dedup::{dedup_matches, DedupScope};
use super::header::ColumnIndices;
use super::matches::ParsedCell;
use super::stage::classify_stage;
use crate::error::ExtractError;
use crate::models::{Generation, MatchData, PlayerData, RoundData, TeamData, TournamentData};
use crate::parser::{value_at, Cell, RawGrid};

pub use legacy::Legacy;
pub use modern::Modern;
pub use spl_middle::SplMiddle;

/// Separator between team names of a traded player.
pub const TEAM_SEPARATOR: char = '/';

// =============================================================================
// DialectKind
// =============================================================================

/// The spreadsheet layouts this crate understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DialectKind {
    Legacy,
    SplMiddle,
    Modern,
}

impl DialectKind {
    pub const ALL: [DialectKind; 3] = [Self::Legacy, Self::SplMiddle, Self::Modern];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::SplMiddle => "spl-middle",
            Self::Modern => "modern",
        }
    }

    /// The transformer for this dialect.
    pub fn dialect(&self) -> Box<dyn Dialect + Send + Sync> {
        match self {
            Self::Legacy => Box::new(Legacy),
            Self::SplMiddle => Box::new(SplMiddle),
            Self::Modern => Box::new(Modern),
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DialectKind {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "legacy" => Ok(Self::Legacy),
            "spl-middle" | "splmiddle" | "spl" => Ok(Self::SplMiddle),
            "modern" => Ok(Self::Modern),
            _ => Err(ExtractError::UnknownDialect(s.to_string())),
        }
    }
}

// =============================================================================
// Dialect trait
// =============================================================================

/// Whole-grid facts computed before any cell is parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseContext {
    /// Tournament default generation, for dialects that compute one.
    pub default_generation: Option<Generation>,
    /// Default tiers per data row, aligned with [`RawGrid::data_rows`].
    pub row_tiers: Vec<Vec<String>>,
}

impl ParseContext {
    pub fn tiers_for(&self, row_position: usize) -> &[String] {
        self.row_tiers
            .get(row_position)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Output of a transformer plus the counters the pipeline reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transformed {
    pub data: TournamentData,
    pub default_generation: Option<Generation>,
    /// Match records before deduplication.
    pub raw_match_count: usize,
    /// Non-blank round cells that did not yield a match.
    pub unparsed_cells: usize,
}

impl Transformed {
    pub fn duplicates_dropped(&self) -> usize {
        self.raw_match_count - self.data.matches.len()
    }
}

/// A spreadsheet dialect: cell grammar plus dedup rule.
pub trait Dialect {
    fn kind(&self) -> DialectKind;

    fn dedup_scope(&self) -> DedupScope;

    /// Whole-grid pass over the data rows, run before any cell is parsed.
    fn prepare(&self, _rows: &[Vec<Cell>], _columns: &ColumnIndices) -> ParseContext {
        ParseContext::default()
    }

    /// Parse one round cell of the data row at `row_position`.
    fn parse_cell(
        &self,
        row_position: usize,
        cell: &Cell,
        ctx: &ParseContext,
    ) -> Option<ParsedCell>;

    /// Run the dialect over a grid.
    fn transform(
        &self,
        grid: &RawGrid,
        columns: &ColumnIndices,
        rounds: &[usize],
        header: &[String],
    ) -> Transformed {
        extract_with(self, grid, columns, rounds, header)
    }
}

// =============================================================================
// Shared walker
// =============================================================================

/// Players with a non-empty name, in row order. Traded players keep their
/// first listed team.
pub fn extract_players(rows: &[Vec<Cell>], columns: &ColumnIndices) -> Vec<PlayerData> {
    rows.iter()
        .filter_map(|row| {
            let player = value_at(row, columns.player);
            if player.is_empty() {
                return None;
            }
            let team = value_at(row, columns.team)
                .split(TEAM_SEPARATOR)
                .next()
                .unwrap_or("")
                .trim();
            Some(PlayerData {
                player: player.to_string(),
                team: team.to_string(),
                price: value_at(row, columns.price).to_string(),
            })
        })
        .collect()
}

/// Distinct team names in first-seen order. Multi-team entries are skipped.
pub fn extract_teams(rows: &[Vec<Cell>], columns: &ColumnIndices) -> Vec<TeamData> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter(|row| !value_at(row, columns.player).is_empty())
        .map(|row| value_at(row, columns.team))
        .filter(|team| !team.is_empty() && !team.contains(TEAM_SEPARATOR))
        .filter(|team| seen.insert(team.to_string()))
        .map(|team| TeamData {
            name: team.to_string(),
        })
        .collect()
}

/// One round per round column, in header order.
pub fn extract_rounds(rounds: &[usize], header: &[String]) -> Vec<RoundData> {
    rounds
        .iter()
        .map(|&col| RoundData {
            name: header.get(col).map(|h| h.trim().to_string()).unwrap_or_default(),
        })
        .collect()
}

/// Walk every data row × round column through `dialect`.
pub fn extract_with<D: Dialect + ?Sized>(
    dialect: &D,
    grid: &RawGrid,
    columns: &ColumnIndices,
    rounds: &[usize],
    header: &[String],
) -> Transformed {
    let rows = grid.data_rows();
    let round_data = extract_rounds(rounds, header);

    // Global pass first: no cell is parsed before this completes.
    let ctx = dialect.prepare(rows, columns);

    let mut raw = Vec::new();
    let mut unparsed_cells = 0;

    for (position, row) in rows.iter().enumerate() {
        let player = value_at(row, columns.player);
        if player.is_empty() {
            continue;
        }

        for (round_index, &col) in rounds.iter().enumerate() {
            let Some(cell) = row.get(col).filter(|c| !c.is_blank()) else {
                continue;
            };

            let parsed = dialect
                .parse_cell(position, cell, &ctx)
                .filter(|p| p.opponent != player);

            let Some(parsed) = parsed else {
                unparsed_cells += 1;
                continue;
            };

            let round_name = round_data[round_index].name.clone();
            raw.push(MatchData {
                round_index,
                player1: player.to_string(),
                player2: parsed.opponent,
                winner: parsed.winner,
                generation: parsed.format.generation,
                tier: parsed.format.tier,
                stage: classify_stage(&round_name),
                round_name,
            });
        }
    }

    let raw_match_count = raw.len();
    let matches = dedup_matches(raw, dialect.dedup_scope());

    Transformed {
        data: TournamentData {
            players: extract_players(rows, columns),
            teams: extract_teams(rows, columns),
            rounds: round_data,
            matches,
        },
        default_generation: ctx.default_generation,
        raw_match_count,
        unparsed_cells,
    }
}

// =============================================================================
// Test fixtures
// =============================================================================

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Circle-method round robin: pairs of player positions for `round`.
    /// Distinct rounds below `n - 1` never repeat a pair.
    pub fn circle_pairs(n: usize, round: usize) -> Vec<(usize, usize)> {
        let slot = |i: usize| if i == 0 { 0 } else { (i - 1 + round) % (n - 1) + 1 };
        (0..n / 2).map(|k| (slot(k), slot(n - 1 - k))).collect()
    }

    /// Build a grid from a header and data rows of plain strings.
    pub fn grid(header: &[&str], rows: Vec<Vec<Cell>>) -> RawGrid {
        let mut all = vec![header.iter().map(|h| Cell::new(*h)).collect::<Vec<_>>()];
        all.extend(rows);
        RawGrid::new(all)
    }

    pub fn blank_row(width: usize) -> Vec<Cell> {
        vec![Cell::default(); width]
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::transform::header::classify_header;

    #[test]
    fn test_dialect_kind_parsing() {
        assert_eq!("legacy".parse::<DialectKind>().unwrap(), DialectKind::Legacy);
        assert_eq!("SPL_Middle".parse::<DialectKind>().unwrap(), DialectKind::SplMiddle);
        assert_eq!("spl".parse::<DialectKind>().unwrap(), DialectKind::SplMiddle);
        assert_eq!(" Modern ".parse::<DialectKind>().unwrap(), DialectKind::Modern);
        assert!(matches!(
            "classic".parse::<DialectKind>(),
            Err(ExtractError::UnknownDialect(_))
        ));
        for kind in DialectKind::ALL {
            assert_eq!(kind.as_str().parse::<DialectKind>().unwrap(), kind);
            assert_eq!(kind.dialect().kind(), kind);
        }
    }

    #[test]
    fn test_circle_pairs_cover_everyone_once() {
        for round in 0..5 {
            let pairs = circle_pairs(24, round);
            let mut seen: Vec<usize> = pairs.iter().flat_map(|&(a, b)| [a, b]).collect();
            seen.sort();
            assert_eq!(seen, (0..24).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_roster_trades_and_blank_rows() {
        let header = ["Player", "Team", "Cost"];
        let grid = grid(
            &header,
            vec![
                vec![Cell::new("Amy"), Cell::new("Aces"), Cell::new("10")],
                vec![Cell::new("Bo"), Cell::new("Bees / Aces"), Cell::new("8")],
                blank_row(3),
                vec![Cell::new("Cy"), Cell::new("Aces")],
                vec![Cell::new("Di"), Cell::new("Dukes"), Cell::new("5")],
            ],
        );
        let (columns, _) = classify_header(&grid.header_values());
        let players = extract_players(grid.data_rows(), &columns);
        let teams = extract_teams(grid.data_rows(), &columns);

        assert_eq!(players.len(), 4);
        assert_eq!(players[1].team, "Bees");
        assert_eq!(players[2].price, "");
        let names: Vec<_> = teams.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Aces", "Dukes"]);
    }

    #[test]
    fn test_missing_player_column_yields_nothing() {
        let header = ["Name", "Team", "Week 1"];
        let grid = grid(
            &header,
            vec![vec![Cell::new("Amy"), Cell::new("Aces"), Cell::new("vs. Bo (W)")]],
        );
        let header_values = grid.header_values();
        let (columns, rounds) = classify_header(&header_values);
        let out = Legacy.transform(&grid, &columns, &rounds, &header_values);

        assert_eq!(columns.player, None);
        assert!(out.data.players.is_empty());
        assert!(out.data.matches.is_empty());
        assert_eq!(out.data.rounds.len(), 1);
    }
}
