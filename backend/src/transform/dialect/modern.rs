//! Modern dialect placeholder.
//!
//! Recognized by name so callers can route sheets to it, but it extracts
//! nothing yet. The empty result trivially satisfies the output contract.

use super::{Dialect, DialectKind, ParseContext, Transformed};
use crate::parser::{Cell, RawGrid};
use crate::transform::dedup::DedupScope;
use crate::transform::header::ColumnIndices;
use crate::transform::matches::ParsedCell;

#[derive(Debug, Clone, Copy, Default)]
pub struct Modern;

impl Dialect for Modern {
    fn kind(&self) -> DialectKind {
        DialectKind::Modern
    }

    fn dedup_scope(&self) -> DedupScope {
        DedupScope::Round
    }

    fn parse_cell(
        &self,
        _row_position: usize,
        _cell: &Cell,
        _ctx: &ParseContext,
    ) -> Option<ParsedCell> {
        None
    }

    // TODO: walk the modern sheet layout once its cell grammar is pinned down.
    fn transform(
        &self,
        _grid: &RawGrid,
        _columns: &ColumnIndices,
        _rounds: &[usize],
        _header: &[String],
    ) -> Transformed {
        Transformed::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::header::classify_header;

    #[test]
    fn test_modern_yields_empty_result() {
        let grid = RawGrid::from_values(&[
            vec!["Player", "Team", "Week 1"],
            vec!["Amy", "Aces", "W vs Bo (SV OU)"],
        ]);
        let header = grid.header_values();
        let (columns, rounds) = classify_header(&header);
        let out = Modern.transform(&grid, &columns, &rounds, &header);

        assert!(out.data.is_empty());
        assert_eq!(out.raw_match_count, 0);
        assert_eq!(out.duplicates_dropped(), 0);
    }
}
