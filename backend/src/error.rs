//! Error types for the tournament extraction pipeline.
//!
//! - [`GridError`] - Structural problems with the raw grid (fatal)
//! - [`RegistryError`] - Sheet profile registry errors
//! - [`ExtractError`] - Top-level extraction errors
//! - [`ServerError`] - HTTP layer errors
//!
//! Unparseable cells and ambiguous tiers are never errors: they are resolved
//! locally by the transformers. Only structural failures abort an extraction.

use thiserror::Error;

// =============================================================================
// Grid Errors
// =============================================================================

/// Errors while loading or checking a raw grid.
#[derive(Debug, Error)]
pub enum GridError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Malformed JSON grid.
    #[error("Invalid JSON grid: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Malformed CSV grid.
    #[error("Invalid CSV grid: {0}")]
    CsvError(#[from] csv::Error),

    /// Failed to decode the input bytes.
    #[error("Failed to decode content as {0}")]
    EncodingError(String),

    /// The grid has no rows at all.
    #[error("Grid is empty")]
    EmptyGrid,

    /// Row 0 exists but has no non-empty cell.
    #[error("Header row is empty")]
    EmptyHeader,
}

// =============================================================================
// Registry Errors
// =============================================================================

/// Errors from the sheet profile registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Profile not found.
    #[error("Profile not found: {0}")]
    NotFound(String),

    /// IO error.
    #[error("Registry IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error.
    #[error("Registry JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

// =============================================================================
// Extraction Errors (top-level)
// =============================================================================

/// Top-level extraction errors.
///
/// This is the error type returned by [`crate::transform::pipeline::extract_grid`]
/// and its file/bytes variants.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Structural grid error.
    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    /// Registry error.
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Dialect name not recognized.
    #[error("Unknown dialect: {0}")]
    UnknownDialect(String),
}

impl ExtractError {
    /// Whether this error comes from the submitted grid itself.
    pub fn is_structural(&self) -> bool {
        matches!(self, ExtractError::Grid(_))
    }
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Extraction error.
    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Failed to bind or serve.
    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for grid operations.
pub type GridResult<T> = Result<T, GridError>;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        let grid_err = GridError::EmptyGrid;
        let extract_err: ExtractError = grid_err.into();
        assert!(extract_err.is_structural());
        assert!(extract_err.to_string().contains("empty"));

        let registry_err = RegistryError::NotFound("spl-2023".into());
        let extract_err: ExtractError = registry_err.into();
        assert!(!extract_err.is_structural());
        assert!(extract_err.to_string().contains("spl-2023"));
    }

    #[test]
    fn test_server_error_wraps_extract() {
        let err: ServerError = ExtractError::UnknownDialect("classic".into()).into();
        let msg = err.to_string();
        assert!(msg.contains("Unknown dialect"));
        assert!(msg.contains("classic"));
    }
}
