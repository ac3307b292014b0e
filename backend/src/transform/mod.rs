//! Transformation module.
//!
//! Turns a raw grid into [`TournamentData`](crate::models::TournamentData):
//! - Header: column and round classification
//! - Tiers / annotate: format resolution and the default generation
//! - Matches / stage: match-cell grammars and round stages
//! - Dialect: per-layout transformers over a shared walker
//! - Dedup: mirrored-record removal
//! - Pipeline: the end-to-end extraction

pub mod annotate;
pub mod dedup;
pub mod dialect;
pub mod header;
pub mod matches;
pub mod pipeline;
pub mod stage;
pub mod tiers;

pub use dedup::{dedup_matches, DedupScope, MatchKey};
pub use dialect::{Dialect, DialectKind, ParseContext, Transformed};
pub use header::{classify_header, ColumnIndices, RoundIndices};
pub use pipeline::*;
pub use stage::classify_stage;
pub use tiers::{generation_consensus, resolve_tiers, GenerationTally};
