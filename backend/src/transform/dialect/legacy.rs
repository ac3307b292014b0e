//! Legacy free-text dialect.
//!
//! Cells read `vs. <opponent> (<W|L|...>)`. The format comes from the cell
//! note, else the row's tier column; a missing generation falls back to the
//! most common generation across the whole sheet. Matches are deduplicated
//! within a round.

use super::{Dialect, DialectKind, ParseContext};
use crate::parser::Cell;
use crate::transform::annotate::annotate_cell;
use crate::transform::dedup::DedupScope;
use crate::transform::header::ColumnIndices;
use crate::transform::matches::{parse_legacy_cell, ParsedCell};
use crate::transform::tiers::{generation_consensus, resolve_tiers};

#[derive(Debug, Clone, Copy, Default)]
pub struct Legacy;

impl Dialect for Legacy {
    fn kind(&self) -> DialectKind {
        DialectKind::Legacy
    }

    fn dedup_scope(&self) -> DedupScope {
        DedupScope::Round
    }

    fn prepare(&self, rows: &[Vec<Cell>], columns: &ColumnIndices) -> ParseContext {
        let row_tiers: Vec<Vec<String>> = rows
            .iter()
            .map(|row| resolve_tiers(row, columns.tier))
            .collect();

        ParseContext {
            default_generation: Some(generation_consensus(&row_tiers)),
            row_tiers,
        }
    }

    fn parse_cell(
        &self,
        row_position: usize,
        cell: &Cell,
        ctx: &ParseContext,
    ) -> Option<ParsedCell> {
        let format_text = annotate_cell(cell, ctx.tiers_for(row_position))?;
        parse_legacy_cell(
            &cell.value,
            &format_text,
            ctx.default_generation.unwrap_or_default(),
        )
    }
}
