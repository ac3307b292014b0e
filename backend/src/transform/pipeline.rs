//! High-level extraction API.
//!
//! Combines every step: grid loading, structural checks, header
//! classification, dialect choice, transformation, validation and profile
//! bookkeeping.
//!
//! # Example
//!
//! ```rust,ignore
//! use tourney_ingest::{extract_file, ExtractOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let result = extract_file("spl-middle.json", &ExtractOptions::default())?;
//!     println!("{}", result.tournament.summary());
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::annotate::is_legacy_match_attempt;
use super::dialect::{Dialect, DialectKind, Transformed};
use super::header::{classify_header, ColumnIndices};
use super::matches::is_spl_middle_cell;
use crate::api::logs::{
    log_info, log_info_indent, log_success, log_warning, log_warning_indent,
};
use crate::error::{ExtractError, GridError, RegistryError};
use crate::models::{Generation, TournamentData};
use crate::parser::{parse_bytes_auto, ParseResult, RawGrid, SourceFormat};
use crate::registry::ProfileRegistry;
use crate::validation::validate_tournament;

/// Options for an extraction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// Force a dialect instead of profile lookup / detection
    #[serde(default)]
    pub dialect: Option<DialectKind>,

    /// Route through a specific stored profile
    #[serde(default)]
    pub profile: Option<String>,

    /// Name for a newly saved profile
    #[serde(default)]
    pub profile_name: Option<String>,

    /// Profile directory (default: registry default)
    #[serde(default)]
    pub profiles_dir: Option<String>,

    /// Neither consult nor update the profile registry
    #[serde(default)]
    pub no_profiles: bool,

    /// Consult profiles but never save a new one
    #[serde(default)]
    pub no_save: bool,

    /// Skip output validation
    #[serde(default)]
    pub skip_validation: bool,
}

/// How the dialect was chosen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum DialectSource {
    Explicit,
    Profile(String),
    Detected,
}

/// Grid information
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridInfo {
    pub source: Option<SourceFormat>,
    pub encoding: Option<String>,
    pub delimiter: Option<char>,
    pub row_count: usize,
    pub headers: Vec<String>,
    pub columns: ColumnIndices,
    pub round_columns: Vec<usize>,
}

/// Result of a complete extraction
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResult {
    pub tournament: TournamentData,
    pub dialect: DialectKind,
    pub dialect_source: DialectSource,
    /// Consensus generation (legacy dialect only)
    pub default_generation: Option<Generation>,
    pub raw_match_count: usize,
    pub duplicates_dropped: usize,
    pub unparsed_cells: usize,
    pub validation_errors: Vec<String>,
    /// Profile used or saved
    pub profile_id: Option<String>,
    pub grid_info: GridInfo,
}

// =============================================================================
// Pure entry point
// =============================================================================

/// Transform a grid with a known dialect. No logging, no registry.
pub fn transform_grid(grid: &RawGrid, kind: DialectKind) -> Result<TournamentData, GridError> {
    Ok(run_dialect(grid, kind)?.data)
}

fn run_dialect(grid: &RawGrid, kind: DialectKind) -> Result<Transformed, GridError> {
    grid.check_structure()?;
    let header = grid.header_values();
    let (columns, rounds) = classify_header(&header);
    Ok(kind.dialect().transform(grid, &columns, &rounds, &header))
}

/// Guess the dialect from round cell contents.
///
/// SPL-Middle wins when most non-blank round cells have its shape; anything
/// else (including a sheet with no round cells) is read as legacy.
pub fn detect_dialect(grid: &RawGrid, rounds: &[usize]) -> DialectKind {
    dialect_from_cells(grid, rounds).unwrap_or(DialectKind::Legacy)
}

/// `None` when the round columns hold no non-blank cell.
fn dialect_from_cells(grid: &RawGrid, rounds: &[usize]) -> Option<DialectKind> {
    let mut total = 0;
    let mut spl = 0;
    let mut legacy = 0;

    for row in grid.data_rows() {
        for cell in rounds.iter().filter_map(|&col| row.get(col)) {
            let value = cell.value.trim();
            if value.is_empty() {
                continue;
            }
            total += 1;
            if is_spl_middle_cell(value) {
                spl += 1;
            } else if is_legacy_match_attempt(value) {
                legacy += 1;
            }
        }
    }

    if total == 0 {
        None
    } else if spl > 0 && spl * 2 > total && spl > legacy {
        Some(DialectKind::SplMiddle)
    } else {
        Some(DialectKind::Legacy)
    }
}

// =============================================================================
// Full pipeline
// =============================================================================

/// Extract a tournament from a grid file.
pub fn extract_file<P: AsRef<Path>>(
    path: P,
    options: &ExtractOptions,
) -> Result<ExtractResult, ExtractError> {
    let path = path.as_ref();
    log_info(format!("📖 Reading grid: {}", path.display()));
    let bytes = std::fs::read(path).map_err(GridError::from)?;

    let mut options = options.clone();
    if options.profile_name.is_none() {
        options.profile_name = path.file_stem().and_then(|s| s.to_str()).map(String::from);
    }
    extract_bytes(&bytes, &options)
}

/// Extract a tournament from raw JSON or CSV bytes.
pub fn extract_bytes(
    bytes: &[u8],
    options: &ExtractOptions,
) -> Result<ExtractResult, ExtractError> {
    let parsed = parse_bytes_auto(bytes)?;
    let source = match parsed.source {
        SourceFormat::Json => "JSON",
        SourceFormat::Csv => "CSV",
    };
    log_success(format!("Detected {} grid", source));
    extract_parsed(parsed, options)
}

/// Extract a tournament from an in-memory grid.
pub fn extract_grid(
    grid: &RawGrid,
    options: &ExtractOptions,
) -> Result<ExtractResult, ExtractError> {
    let parsed = ParseResult {
        grid: grid.clone(),
        source: SourceFormat::Json,
        encoding: "utf-8".to_string(),
        delimiter: None,
    };
    let mut result = extract_parsed(parsed, options)?;
    result.grid_info.source = None;
    result.grid_info.encoding = None;
    Ok(result)
}

fn extract_parsed(
    parsed: ParseResult,
    options: &ExtractOptions,
) -> Result<ExtractResult, ExtractError> {
    let grid = &parsed.grid;

    // Step 1: structure
    grid.check_structure()?;
    let header = grid.header_values();
    let (columns, rounds) = classify_header(&header);
    log_success(format!(
        "{} rows, {} columns, {} rounds",
        grid.row_count(),
        header.len(),
        rounds.len()
    ));
    log_column("Player", columns.player, &header);
    log_column("Team", columns.team, &header);
    log_column("Cost", columns.price, &header);
    log_column("Tier", columns.tier, &header);

    // Step 2: dialect
    let mut registry = (!options.no_profiles).then(|| match &options.profiles_dir {
        Some(dir) => ProfileRegistry::with_dir(dir),
        None => ProfileRegistry::new(),
    });
    let (dialect, dialect_source) =
        choose_dialect(grid, &header, &rounds, options, registry.as_ref())?;
    log_info(format!("🧭 Dialect: {} ({:?})", dialect, dialect_source));

    // Step 3: transform
    log_info("⚙️  Transforming...");
    let transformed = dialect.dialect().transform(grid, &columns, &rounds, &header);
    if let Some(generation) = transformed.default_generation {
        log_info_indent(format!("Default generation: {}", generation), 1);
    }
    if transformed.unparsed_cells > 0 {
        log_warning_indent(
            format!("{} round cells not recognized as matches", transformed.unparsed_cells),
            1,
        );
    }
    log_success(format!(
        "{} ({} raw records, {} duplicates dropped)",
        transformed.data.summary(),
        transformed.raw_match_count,
        transformed.duplicates_dropped()
    ));
    if dialect == DialectKind::Modern {
        log_warning("Modern dialect extraction is not implemented; result is empty");
    }

    // Step 4: validate
    let validation_errors = if options.skip_validation {
        Vec::new()
    } else {
        log_info("✔️  Validating...");
        match validate_tournament(&transformed.data, dialect.dialect().dedup_scope()) {
            Ok(()) => {
                log_success("Tournament data valid");
                Vec::new()
            }
            Err(errors) => {
                log_warning(format!("{} validation problems", errors.len()));
                for err in errors.iter().take(5) {
                    log_warning_indent(err.clone(), 1);
                }
                errors
            }
        }
    };

    // Step 5: profiles
    let profile_id = match registry.as_mut() {
        Some(registry) => update_profiles(registry, dialect, &dialect_source, &header, options),
        None => None,
    };

    let duplicates_dropped = transformed.duplicates_dropped();
    Ok(ExtractResult {
        tournament: transformed.data,
        dialect,
        dialect_source,
        default_generation: transformed.default_generation,
        raw_match_count: transformed.raw_match_count,
        duplicates_dropped,
        unparsed_cells: transformed.unparsed_cells,
        validation_errors,
        profile_id,
        grid_info: GridInfo {
            source: Some(parsed.source),
            encoding: Some(parsed.encoding.clone()),
            delimiter: parsed.delimiter,
            row_count: grid.row_count(),
            headers: header,
            columns,
            round_columns: rounds,
        },
    })
}

fn log_column(label: &str, index: Option<usize>, header: &[String]) {
    match index {
        Some(i) => log_info_indent(format!("{}: [{}] {}", label, i, header[i]), 1),
        None => log_warning_indent(format!("{}: column not found", label), 1),
    }
}

fn choose_dialect(
    grid: &RawGrid,
    header: &[String],
    rounds: &[usize],
    options: &ExtractOptions,
    registry: Option<&ProfileRegistry>,
) -> Result<(DialectKind, DialectSource), ExtractError> {
    if let Some(kind) = options.dialect {
        return Ok((kind, DialectSource::Explicit));
    }

    if let Some(id) = &options.profile {
        let profile = registry
            .and_then(|r| r.get(id))
            .ok_or_else(|| RegistryError::NotFound(id.clone()))?;
        return Ok((profile.dialect, DialectSource::Profile(profile.id.clone())));
    }

    // Headers are shared across dialects; cell contents decide when they can.
    if let Some(kind) = dialect_from_cells(grid, rounds) {
        return Ok((kind, DialectSource::Detected));
    }

    if let Some(registry) = registry {
        if let Some((profile, score)) = registry.find_compatible(header).first() {
            log_success(format!(
                "Matched profile \"{}\" ({:.0}% header overlap)",
                profile.name,
                score * 100.0
            ));
            return Ok((profile.dialect, DialectSource::Profile(profile.id.clone())));
        }
    }

    Ok((DialectKind::Legacy, DialectSource::Detected))
}

/// Record usage of the routing profile, or save a new one. Registry I/O
/// failures are logged, never fatal.
fn update_profiles(
    registry: &mut ProfileRegistry,
    dialect: DialectKind,
    source: &DialectSource,
    header: &[String],
    options: &ExtractOptions,
) -> Option<String> {
    let existing = match source {
        DialectSource::Profile(id) => Some(id.clone()),
        _ => registry
            .find_compatible(header)
            .into_iter()
            .find(|(p, _)| p.dialect == dialect)
            .map(|(p, _)| p.id.clone()),
    };

    if let Some(id) = existing {
        if let Err(e) = registry.record_use(&id) {
            log_warning(format!("Could not update profile {}: {}", id, e));
        }
        return Some(id);
    }

    if options.no_save {
        return None;
    }

    let name = options.profile_name.as_deref().unwrap_or("sheet");
    match registry.save(name, dialect, header.to_vec()) {
        Ok(id) => {
            log_success(format!("→ Saved profile: {}", id));
            Some(id)
        }
        Err(e) => {
            log_warning(format!("Could not save profile: {}", e));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Cell;
    use tempfile::tempdir;

    fn offline() -> ExtractOptions {
        ExtractOptions {
            no_profiles: true,
            ..ExtractOptions::default()
        }
    }

    fn legacy_grid() -> RawGrid {
        RawGrid::new(vec![
            vec![Cell::new("Player"), Cell::new("Team"), Cell::new("Tier"), Cell::new("Week 1")],
            vec![
                Cell::new("Django"),
                Cell::new("Dragons"),
                Cell::new("SS OU"),
                Cell::new("vs. Reiku (W)").with_note("USM OU"),
            ],
            vec![
                Cell::new("Reiku"),
                Cell::new("Ravens"),
                Cell::new("SS OU"),
                Cell::new("vs. Django (L)"),
            ],
        ])
    }

    fn spl_grid() -> RawGrid {
        RawGrid::from_values(&[
            vec!["Player", "Team", "Week 1", "Week 2"],
            vec!["Amy", "Aces", "W vs Bo (SV OU)", ""],
            vec!["Bo", "Bees", "L vs Amy (SV OU)", "W vs Cy (SS UU)"],
            vec!["Cy", "Aces", "", "L vs Bo (SS UU)"],
        ])
    }

    #[test]
    fn test_default_options() {
        let opts = ExtractOptions::default();
        assert!(opts.dialect.is_none());
        assert!(!opts.skip_validation);
        assert!(!opts.no_profiles);
    }

    #[test]
    fn test_empty_grid_is_fatal() {
        let err = extract_grid(&RawGrid::default(), &offline()).unwrap_err();
        assert!(matches!(err, ExtractError::Grid(GridError::EmptyGrid)));

        let blank = RawGrid::from_values(&[vec!["", ""]]);
        let err = transform_grid(&blank, DialectKind::Legacy).unwrap_err();
        assert!(matches!(err, GridError::EmptyHeader));
    }

    #[test]
    fn test_detect_dialect() {
        let grid = spl_grid();
        assert_eq!(detect_dialect(&grid, &[2, 3]), DialectKind::SplMiddle);

        let grid = legacy_grid();
        assert_eq!(detect_dialect(&grid, &[3]), DialectKind::Legacy);
        assert_eq!(detect_dialect(&grid, &[]), DialectKind::Legacy);
        assert_eq!(dialect_from_cells(&grid, &[]), None);
    }

    #[test]
    fn test_extract_detected_spl() {
        let result = extract_grid(&spl_grid(), &offline()).unwrap();

        assert_eq!(result.dialect, DialectKind::SplMiddle);
        assert_eq!(result.dialect_source, DialectSource::Detected);
        assert_eq!(result.tournament.matches.len(), 2);
        assert_eq!(result.duplicates_dropped, 2);
        assert_eq!(result.default_generation, None);
        assert!(result.validation_errors.is_empty());
        assert_eq!(result.grid_info.round_columns, vec![2, 3]);
        assert!(result.profile_id.is_none());
    }

    #[test]
    fn test_extract_explicit_legacy() {
        let options = ExtractOptions {
            dialect: Some(DialectKind::Legacy),
            ..offline()
        };
        let result = extract_grid(&legacy_grid(), &options).unwrap();

        assert_eq!(result.dialect_source, DialectSource::Explicit);
        assert_eq!(result.default_generation, Some(Generation::Swsh));
        assert_eq!(result.tournament.matches.len(), 1);
        assert_eq!(result.tournament.matches[0].generation, Generation::Sm);
    }

    #[test]
    fn test_extract_csv_bytes() {
        let csv = "Player;Team;Week 1\nAmy;Aces;W vs Bo (SV OU)\nBo;Bees;L vs Amy (SV OU)\n";
        let result = extract_bytes(csv.as_bytes(), &offline()).unwrap();

        assert_eq!(result.grid_info.source, Some(SourceFormat::Csv));
        assert_eq!(result.grid_info.delimiter, Some(';'));
        assert_eq!(result.tournament.players.len(), 2);
        assert_eq!(result.tournament.matches.len(), 1);
    }

    #[test]
    fn test_profiles_saved_then_reused() {
        let dir = tempdir().unwrap();
        let options = ExtractOptions {
            profiles_dir: Some(dir.path().to_string_lossy().to_string()),
            profile_name: Some("spl middle".into()),
            ..ExtractOptions::default()
        };

        let first = extract_grid(&spl_grid(), &options).unwrap();
        assert_eq!(first.dialect_source, DialectSource::Detected);
        let id = first.profile_id.unwrap();

        // Same headers, but contents that alone would read as legacy
        let legacy_like = RawGrid::from_values(&[
            vec!["Player", "Team", "Week 1", "Week 2"],
            vec!["Amy", "Aces", "", ""],
        ]);
        let second = extract_grid(&legacy_like, &options).unwrap();
        assert_eq!(second.dialect, DialectKind::SplMiddle);
        assert_eq!(second.dialect_source, DialectSource::Profile(id.clone()));

        let registry = ProfileRegistry::with_dir(dir.path());
        assert_eq!(registry.list().len(), 1);
        assert_eq!(registry.get(&id).unwrap().use_count, 1);
    }

    #[test]
    fn test_cell_contents_override_profile_headers() {
        let dir = tempdir().unwrap();
        let options = ExtractOptions {
            profiles_dir: Some(dir.path().to_string_lossy().to_string()),
            ..ExtractOptions::default()
        };

        let spl = extract_grid(&spl_grid(), &options).unwrap();
        assert_eq!(spl.dialect, DialectKind::SplMiddle);

        // Player/Team/Week headers overlap the saved SPL profile
        let legacy = RawGrid::from_values(&[
            vec!["Player", "Team", "Tier", "Week 1"],
            vec!["Django", "Dragons", "SS OU", "vs. Reiku (W)"],
            vec!["Reiku", "Ravens", "SS OU", "vs. Django (L)"],
        ]);
        let result = extract_grid(&legacy, &options).unwrap();

        assert_eq!(result.dialect, DialectKind::Legacy);
        assert_eq!(result.dialect_source, DialectSource::Detected);
        assert_eq!(result.tournament.matches.len(), 1);
        assert_eq!(result.unparsed_cells, 0);
        assert_ne!(result.profile_id, spl.profile_id);
        assert_eq!(ProfileRegistry::with_dir(dir.path()).list().len(), 2);
    }

    #[test]
    fn test_unknown_profile_is_an_error() {
        let dir = tempdir().unwrap();
        let options = ExtractOptions {
            profile: Some("nope".into()),
            profiles_dir: Some(dir.path().to_string_lossy().to_string()),
            ..ExtractOptions::default()
        };
        let err = extract_grid(&spl_grid(), &options).unwrap_err();
        assert!(matches!(err, ExtractError::Registry(RegistryError::NotFound(_))));
    }
}
