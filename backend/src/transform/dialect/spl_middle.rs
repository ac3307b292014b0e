//! SPL-Middle dialect.
//!
//! Cells read `<W|L> vs <opponent> (<Gen> <Tier>)` and carry their own
//! format, so no tier column or consensus pass is involved.
//!
//! Deduplication is tournament-wide: a pairing seen in any earlier round
//! hides later ones, unlike [`super::Legacy`] which dedups per round.

use super::{Dialect, DialectKind, ParseContext};
use crate::parser::Cell;
use crate::transform::dedup::DedupScope;
use crate::transform::matches::{parse_spl_middle_cell, ParsedCell};

#[derive(Debug, Clone, Copy, Default)]
pub struct SplMiddle;

impl Dialect for SplMiddle {
    fn kind(&self) -> DialectKind {
        DialectKind::SplMiddle
    }

    fn dedup_scope(&self) -> DedupScope {
        DedupScope::Tournament
    }

    fn parse_cell(
        &self,
        _row_position: usize,
        cell: &Cell,
        _ctx: &ParseContext,
    ) -> Option<ParsedCell> {
        parse_spl_middle_cell(&cell.value)
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{circle_pairs, grid};
    use super::super::Transformed;
    use super::*;
    use crate::models::{Generation, Winner};
    use crate::parser::RawGrid;
    use crate::transform::header::classify_header;
    use std::collections::HashSet;

    const FORMATS: [&str; 5] = ["SV OU", "SS UU", "USM OU", "BW2 Ubers", "SV Doubles OU"];

    fn player_name(i: usize) -> String {
        format!("Player{:02}", i)
    }

    /// 24 players on 6 teams, 5 fully played round-robin weeks.
    fn spl_fixture() -> RawGrid {
        let header = ["Team", "Player", "Week 1", "Week 2", "Week 3", "Week 4", "Week 5"];
        let mut rows: Vec<Vec<Cell>> = (0..24)
            .map(|i| {
                let mut row = vec![
                    Cell::new(format!("Team {}", (b'A' + (i / 4) as u8) as char)),
                    Cell::new(player_name(i)),
                ];
                row.resize(header.len(), Cell::default());
                row
            })
            .collect();

        for (round, format) in FORMATS.iter().enumerate() {
            for (a, b) in circle_pairs(24, round) {
                let (a_code, b_code) = if (a + b + round) % 2 == 0 {
                    ("W", "L")
                } else {
                    ("L", "W")
                };
                rows[a][2 + round] =
                    Cell::new(format!("{} vs {} ({})", a_code, player_name(b), format));
                rows[b][2 + round] =
                    Cell::new(format!("{} vs {} ({})", b_code, player_name(a), format));
            }
        }

        grid(&header, rows)
    }

    fn run(grid: &RawGrid) -> Transformed {
        let header = grid.header_values();
        let (columns, rounds) = classify_header(&header);
        SplMiddle.transform(grid, &columns, &rounds, &header)
    }

    #[test]
    fn test_fixture_counts() {
        let out = run(&spl_fixture());

        assert_eq!(out.data.players.len(), 24);
        assert_eq!(out.data.teams.len(), 6);
        assert_eq!(out.data.rounds.len(), 5);
        assert_eq!(out.data.matches.len(), 60);
        assert_eq!(out.raw_match_count, 120);
        assert_eq!(out.default_generation, None);
    }

    #[test]
    fn test_each_player_once_per_round() {
        let out = run(&spl_fixture());
        for round in 0..5 {
            let mut seen = HashSet::new();
            for m in out.data.matches.iter().filter(|m| m.round_index == round) {
                assert!(seen.insert(m.player1.clone()), "{} twice", m.player1);
                assert!(seen.insert(m.player2.clone()), "{} twice", m.player2);
            }
            assert_eq!(seen.len(), 24);
        }
    }

    #[test]
    fn test_no_duplicate_pairs_tournament_wide() {
        let out = run(&spl_fixture());
        let pairs: HashSet<_> = out.data.matches.iter().map(|m| m.unordered_pair()).collect();
        assert_eq!(pairs.len(), out.data.matches.len());
    }

    #[test]
    fn test_formats_read_from_cells() {
        let out = run(&spl_fixture());
        let week4 = out.data.matches.iter().find(|m| m.round_index == 3).unwrap();
        assert_eq!(week4.generation, Generation::Bw);
        assert_eq!(week4.tier.as_str(), "Uber");

        let week5 = out.data.matches.iter().find(|m| m.round_index == 4).unwrap();
        assert_eq!(week5.generation, Generation::Sv);
        assert_eq!(week5.tier.as_str(), "DOU");
    }

    #[test]
    fn test_rematch_across_rounds_is_dropped() {
        let header = ["Player", "Week 1", "Semis"];
        let g = grid(
            &header,
            vec![
                vec![
                    Cell::new("Amy"),
                    Cell::new("W vs Bo (SV OU)"),
                    Cell::new("L vs Bo (SV OU)"),
                ],
                vec![
                    Cell::new("Bo"),
                    Cell::new("L vs Amy (SV OU)"),
                    Cell::new("W vs Amy (SV OU)"),
                ],
            ],
        );
        let out = run(&g);

        assert_eq!(out.data.matches.len(), 1);
        assert_eq!(out.data.matches[0].round_index, 0);
        assert_eq!(out.data.matches[0].winner, Winner::Player1);
        assert_eq!(out.duplicates_dropped(), 3);
    }

    #[test]
    fn test_unparseable_cells_are_skipped() {
        let header = ["Player", "Week 1"];
        let g = grid(
            &header,
            vec![
                vec![Cell::new("Amy"), Cell::new("vs. Bo (W)")],
                vec![Cell::new("Bo"), Cell::new("W vs  (SV OU)")],
                vec![Cell::new("Cy"), Cell::new("")],
            ],
        );
        let out = run(&g);

        assert!(out.data.matches.is_empty());
        assert_eq!(out.unparsed_cells, 2);
        assert_eq!(out.data.players.len(), 3);
    }
}
