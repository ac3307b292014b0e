//! Per-cell format resolution for the legacy dialect.

use crate::parser::Cell;

/// Prefix of every legacy match cell.
pub const LEGACY_MATCH_MARKER: &str = "vs.";

/// Whether a legacy cell value is a match attempt at all.
pub fn is_legacy_match_attempt(value: &str) -> bool {
    value.trim_start().starts_with(LEGACY_MATCH_MARKER)
}

/// Resolve the format text to attach to a legacy match cell.
///
/// Returns `None` for cells that are not match attempts. Otherwise an
/// explicit note on the cell wins, then the row's first default tier. The
/// result is empty when neither exists.
pub fn annotate_cell(cell: &Cell, default_tiers: &[String]) -> Option<String> {
    if !is_legacy_match_attempt(&cell.value) {
        return None;
    }

    if let Some(note) = cell.note() {
        return Some(note.to_string());
    }

    Some(default_tiers.first().cloned().unwrap_or_default())
}
