//! Output validation for extracted tournaments.
//!
//! Two layers:
//!
//! - JSON Schema (Draft 7) on the serialized [`TournamentData`], embedded at
//!   compile time from `schemas/tournament-data.json`
//! - Invariants the schema cannot express: one record per dedup key, round
//!   references in range, no self-matches
//!
//! Validation reports problems; it never rejects an extraction.
//!
//! # Example
//!
//! ```rust,ignore
//! use tourney_ingest::{validate_tournament, DedupScope, TournamentData};
//!
//! let data = TournamentData::default();
//! assert!(validate_tournament(&data, DedupScope::Round).is_ok());
//! ```

use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::HashSet;

use crate::models::TournamentData;
use crate::transform::dedup::{DedupScope, MatchKey};

static TOURNAMENT_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../schemas/tournament-data.json"))
        .expect("Invalid embedded schema")
});

/// Validate a JSON value against a JSON schema.
///
/// Returns every error message when `data` does not conform.
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator = jsonschema::draft7::new(schema)
        .map_err(|e| vec![format!("Invalid schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Quick true/false variant of [`validate`].
pub fn is_valid(schema: &Value, data: &Value) -> bool {
    jsonschema::draft7::is_valid(schema, data)
}

/// Validate a serialized tournament against the embedded schema.
pub fn validate_tournament_json(data: &Value) -> Result<(), Vec<String>> {
    validate(&TOURNAMENT_SCHEMA, data)
}

/// Check the invariants of a deduplicated tournament.
pub fn check_invariants(data: &TournamentData, scope: DedupScope) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let mut keys = HashSet::new();

    for (i, m) in data.matches.iter().enumerate() {
        match data.rounds.get(m.round_index) {
            None => errors.push(format!(
                "Match {}: round index {} out of range ({} rounds)",
                i,
                m.round_index,
                data.rounds.len()
            )),
            Some(round) if round.name != m.round_name => errors.push(format!(
                "Match {}: round name '{}' does not match round {} ('{}')",
                i, m.round_name, m.round_index, round.name
            )),
            Some(_) => {}
        }

        if m.player1 == m.player2 {
            errors.push(format!("Match {}: '{}' plays against themselves", i, m.player1));
        }

        if !keys.insert(MatchKey::of(m, scope)) {
            let (a, b) = m.unordered_pair();
            errors.push(format!(
                "Match {}: duplicate pairing {} / {} in round {}",
                i, a, b, m.round_index
            ));
        }
    }

    for (i, p) in data.players.iter().enumerate() {
        if p.player.trim().is_empty() {
            errors.push(format!("Player {}: empty name", i));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Schema and invariant validation combined.
pub fn validate_tournament(data: &TournamentData, scope: DedupScope) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    match serde_json::to_value(data) {
        Ok(json) => {
            if let Err(schema_errors) = validate_tournament_json(&json) {
                errors.extend(schema_errors);
            }
        }
        Err(e) => errors.push(format!("Serialization failed: {}", e)),
    }

    if let Err(invariant_errors) = check_invariants(data, scope) {
        errors.extend(invariant_errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Generation, MatchData, PlayerData, RoundData, Stage, TeamData, Tier, Winner,
    };
    use serde_json::json;

    fn sample() -> TournamentData {
        TournamentData {
            players: vec![
                PlayerData { player: "Amy".into(), team: "Aces".into(), price: "10".into() },
                PlayerData { player: "Bo".into(), team: "Bees".into(), price: "".into() },
            ],
            teams: vec![TeamData { name: "Aces".into() }, TeamData { name: "Bees".into() }],
            rounds: vec![RoundData { name: "Week 1".into() }, RoundData { name: "Finals".into() }],
            matches: vec![
                MatchData {
                    round_index: 0,
                    player1: "Amy".into(),
                    player2: "Bo".into(),
                    winner: Winner::Player1,
                    generation: Generation::Sv,
                    tier: Tier::new("OU"),
                    round_name: "Week 1".into(),
                    stage: Stage::RegularSeason,
                },
                MatchData {
                    round_index: 1,
                    player1: "Bo".into(),
                    player2: "Amy".into(),
                    winner: Winner::Dead,
                    generation: Generation::Sm,
                    tier: Tier::new("Ubers"),
                    round_name: "Finals".into(),
                    stage: Stage::Playoff,
                },
            ],
        }
    }

    #[test]
    fn test_valid_tournament() {
        assert!(validate_tournament(&sample(), DedupScope::Round).is_ok());
        assert!(validate_tournament(&TournamentData::default(), DedupScope::Tournament).is_ok());
    }

    #[test]
    fn test_rematch_violates_tournament_scope_only() {
        let data = sample();
        assert!(check_invariants(&data, DedupScope::Round).is_ok());
        let errors = check_invariants(&data, DedupScope::Tournament).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("duplicate pairing"));
    }

    #[test]
    fn test_bad_round_reference() {
        let mut data = sample();
        data.matches[0].round_index = 5;
        data.matches[1].round_name = "Semis".into();
        let errors = check_invariants(&data, DedupScope::Round).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("out of range"));
        assert!(errors[1].contains("Semis"));
    }

    #[test]
    fn test_self_match() {
        let mut data = sample();
        data.matches[0].player2 = "Amy".into();
        let errors = check_invariants(&data, DedupScope::Round).unwrap_err();
        assert!(errors.iter().any(|e| e.contains("themselves")));
    }

    #[test]
    fn test_schema_rejects_bad_values() {
        let bad = json!({
            "players": [],
            "teams": [{ "name": "Aces / Bees" }],
            "rounds": [],
            "matches": [{
                "roundIndex": 0,
                "player1": "Amy",
                "player2": "Bo",
                "winner": "draw",
                "generation": "GEN9",
                "tier": "OU",
                "roundName": "Week 1",
                "stage": "Regular Season"
            }]
        });
        let errors = validate_tournament_json(&bad).unwrap_err();
        assert!(errors.len() >= 3);
        assert!(!is_valid(&TOURNAMENT_SCHEMA, &bad));
    }

    #[test]
    fn test_schema_accepts_serialized_sample() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(validate_tournament_json(&json).is_ok());
    }
}
