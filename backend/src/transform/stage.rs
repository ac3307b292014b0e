//! Round name to tournament stage.

use crate::models::Stage;

/// Classify a round by case-insensitive prefix.
///
/// Checked in order: `tiebreak`, then `semi` / `final`, else regular season.
pub fn classify_stage(round_name: &str) -> Stage {
    let name = round_name.trim().to_lowercase();

    if name.starts_with("tiebreak") {
        Stage::Tiebreak
    } else if name.starts_with("semi") || name.starts_with("final") {
        Stage::Playoff
    } else {
        Stage::RegularSeason
    }
}
