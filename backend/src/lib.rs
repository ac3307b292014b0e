//! # Tourney Ingest - tournament spreadsheet extraction
//!
//! Reads exported tournament spreadsheets (player rosters plus one column
//! per round) in several sheet dialects and normalizes them into one
//! canonical [`TournamentData`] model: players, teams, rounds and
//! deduplicated matches.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ JSON / CSV  │────▶│   Parser    │────▶│   Dialect   │────▶│ Tournament  │
//! │   export    │     │  (RawGrid)  │     │ transformer │     │    Data     │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tourney_ingest::{extract_file, ExtractOptions};
//!
//! fn main() {
//!     let result = extract_file("season.json", &ExtractOptions::default()).unwrap();
//!     println!("Extracted {} matches", result.tournament.matches.len());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Domain models (Generation, Tier, MatchData, TournamentData)
//! - [`parser`] - Grid loading with JSON/CSV auto-detection
//! - [`transform`] - Header classification, dialects, dedup and pipeline
//! - [`validation`] - Output schema and invariant checks
//! - [`registry`] - Sheet profile registry
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Validation
pub mod validation;

// Profiles
pub mod registry;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ExtractError, GridError, RegistryError, ServerError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    Format,
    Generation,
    MatchData,
    PlayerData,
    RoundData,
    Stage,
    TeamData,
    Tier,
    TournamentData,
    Winner,
};

// =============================================================================
// Re-exports - Grid parsing
// =============================================================================

pub use parser::{
    parse_bytes_auto,
    parse_csv_str,
    parse_file_auto,
    parse_json_str,
    parse_json_value,
    detect_encoding,
    detect_delimiter,
    decode_content,
    Cell,
    ParseResult,
    RawGrid,
    SourceFormat,
};

// =============================================================================
// Re-exports - Transformation
// =============================================================================

pub use transform::{
    classify_header,
    classify_stage,
    dedup_matches,
    ColumnIndices,
    DedupScope,
    Dialect,
    DialectKind,
};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{
    check_invariants,
    is_valid,
    validate,
    validate_tournament,
    validate_tournament_json,
};

// =============================================================================
// Re-exports - Registry
// =============================================================================

pub use registry::{ProfileRegistry, SheetProfile};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    detect_dialect,
    extract_bytes,
    extract_file,
    extract_grid,
    transform_grid,
    DialectSource,
    ExtractOptions,
    ExtractResult,
    GridInfo,
};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{error_response, ExtractRequest, ExtractResponse, ResponseMetadata};

// Server
pub mod server {
    pub use crate::api::server::start_server;
}
