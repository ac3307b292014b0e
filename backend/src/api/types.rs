//! REST API types.
//!
//! The response carries the canonical tournament unchanged; everything else
//! lives under `metadata`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::models::TournamentData;
use crate::transform::pipeline::ExtractResult;

/// Body of `POST /api/extract`
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractRequest {
    /// Plain rows or a spreadsheet API document
    pub grid: Value,
    /// Dialect name; detected when absent
    #[serde(default)]
    pub dialect: Option<String>,
}

/// Response sent after an extraction
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResponse {
    /// Unique job identifier
    pub job_id: String,

    /// Status: "ready" or "warning"
    pub status: String,

    pub tournament: TournamentData,

    pub metadata: ResponseMetadata,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub dialect: String,
    /// "explicit", "profile" or "detected"
    pub dialect_source: String,
    pub profile_id: Option<String>,
    pub default_generation: Option<String>,
    pub raw_match_count: usize,
    pub duplicates_dropped: usize,
    pub unparsed_cells: usize,
    pub grid_info: GridMetadata,
    pub validation_errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridMetadata {
    pub encoding: Option<String>,
    pub delimiter: Option<String>,
    pub row_count: usize,
    pub headers: Vec<String>,
    pub round_columns: Vec<usize>,
}

impl From<ExtractResult> for ExtractResponse {
    fn from(result: ExtractResult) -> Self {
        use crate::transform::pipeline::DialectSource;

        let dialect_source = match &result.dialect_source {
            DialectSource::Explicit => "explicit",
            DialectSource::Profile(_) => "profile",
            DialectSource::Detected => "detected",
        };

        ExtractResponse {
            job_id: Uuid::new_v4().to_string(),
            status: if result.validation_errors.is_empty() {
                "ready"
            } else {
                "warning"
            }
            .to_string(),
            metadata: ResponseMetadata {
                dialect: result.dialect.to_string(),
                dialect_source: dialect_source.to_string(),
                profile_id: result.profile_id,
                default_generation: result.default_generation.map(|g| g.to_string()),
                raw_match_count: result.raw_match_count,
                duplicates_dropped: result.duplicates_dropped,
                unparsed_cells: result.unparsed_cells,
                grid_info: GridMetadata {
                    encoding: result.grid_info.encoding,
                    delimiter: result.grid_info.delimiter.map(|d| d.to_string()),
                    row_count: result.grid_info.row_count,
                    headers: result.grid_info.headers,
                    round_columns: result.grid_info.round_columns,
                },
                validation_errors: result.validation_errors,
            },
            tournament: result.tournament,
        }
    }
}

/// Create an error response
pub fn error_response(error: &str) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": "error",
        "error": error,
        "tournament": TournamentData::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::RawGrid;
    use crate::transform::pipeline::{extract_grid, ExtractOptions};

    #[test]
    fn test_request_deserializes_plain_rows() {
        let body = json!({
            "grid": [["Player", "Team", "Week 1"], ["Amy", "Aces", "W vs Bo (SV OU)"]],
            "dialect": "spl-middle"
        });
        let req: ExtractRequest = serde_json::from_value(body).unwrap();
        let grid = crate::parser::parse_json_value(req.grid).unwrap();
        assert_eq!(grid.row_count(), 2);
        assert_eq!(req.dialect.as_deref(), Some("spl-middle"));
    }

    #[test]
    fn test_response_from_result() {
        let grid = RawGrid::from_values(&[
            vec!["Player", "Team", "Week 1"],
            vec!["Amy", "Aces", "W vs Bo (SV OU)"],
            vec!["Bo", "Bees", "L vs Amy (SV OU)"],
        ]);
        let options = ExtractOptions {
            no_profiles: true,
            ..ExtractOptions::default()
        };
        let response = ExtractResponse::from(extract_grid(&grid, &options).unwrap());
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["status"], "ready");
        assert_eq!(json["metadata"]["dialect"], "spl-middle");
        assert_eq!(json["metadata"]["dialectSource"], "detected");
        assert_eq!(json["metadata"]["duplicatesDropped"], 1);
        assert_eq!(json["tournament"]["matches"][0]["winner"], "player1");
        assert!(Uuid::parse_str(&response.job_id).is_ok());
    }

    #[test]
    fn test_error_response_shape() {
        let v = error_response("Grid is empty");
        assert_eq!(v["status"], "error");
        assert_eq!(v["error"], "Grid is empty");
        assert_eq!(v["tournament"]["matches"], json!([]));
    }
}
