//! Sheet profile registry - remember which dialect a sheet layout uses
//!
//! Saves profiles to disk and matches new grids to them by header overlap,
//! so a tournament that was extracted once is routed to the same dialect
//! without being told again.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{RegistryError, RegistryResult};
use crate::transform::dialect::DialectKind;

/// Directory where profiles are stored (relative to current dir)
pub const DEFAULT_REGISTRY_DIR: &str = ".tourney-ingest/profiles";

/// Environment variable overriding [`DEFAULT_REGISTRY_DIR`].
pub const REGISTRY_DIR_ENV: &str = "TOURNEY_INGEST_PROFILES";

/// Minimum header overlap for a profile to be considered compatible.
const MIN_COMPATIBILITY: f64 = 0.5;

/// A stored sheet profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetProfile {
    /// Unique identifier
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Dialect the sheet was extracted with
    pub dialect: DialectKind,
    /// Header row this profile was created for
    pub header_columns: Vec<String>,
    /// Creation timestamp
    pub created_at: String,
    /// Last time this profile was used
    pub last_used: Option<String>,
    /// Number of times used
    pub use_count: u32,
}

/// Registry for managing sheet profiles
pub struct ProfileRegistry {
    registry_dir: PathBuf,
    profiles: HashMap<String, SheetProfile>,
}

impl ProfileRegistry {
    /// Open the registry at `$TOURNEY_INGEST_PROFILES` or the default directory
    pub fn new() -> Self {
        let dir = std::env::var(REGISTRY_DIR_ENV)
            .unwrap_or_else(|_| DEFAULT_REGISTRY_DIR.to_string());
        Self::with_dir(dir)
    }

    /// Open a registry in a custom directory
    pub fn with_dir(dir: impl AsRef<Path>) -> Self {
        let mut registry = Self {
            registry_dir: PathBuf::from(dir.as_ref()),
            profiles: HashMap::new(),
        };
        registry.load_all();
        registry
    }

    pub fn dir(&self) -> &Path {
        &self.registry_dir
    }

    /// Load every readable profile; unreadable files are ignored
    fn load_all(&mut self) {
        let entries = match fs::read_dir(&self.registry_dir) {
            Ok(e) => e,
            Err(_) => return,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "json") {
                if let Ok(content) = fs::read_to_string(&path) {
                    if let Ok(profile) = serde_json::from_str::<SheetProfile>(&content) {
                        self.profiles.insert(profile.id.clone(), profile);
                    }
                }
            }
        }
    }

    /// All stored profiles, most used first
    pub fn list(&self) -> Vec<&SheetProfile> {
        let mut profiles: Vec<_> = self.profiles.values().collect();
        profiles.sort_by(|a, b| b.use_count.cmp(&a.use_count).then_with(|| a.id.cmp(&b.id)));
        profiles
    }

    pub fn get(&self, id: &str) -> Option<&SheetProfile> {
        self.profiles.get(id)
    }

    /// Profiles compatible with a header row, best first.
    /// Sorted by compatibility score, then by use count.
    pub fn find_compatible(&self, header: &[String]) -> Vec<(&SheetProfile, f64)> {
        let mut compatible: Vec<_> = self
            .profiles
            .values()
            .filter_map(|p| {
                let score = compatibility(&p.header_columns, header);
                (score > MIN_COMPATIBILITY).then_some((p, score))
            })
            .collect();

        compatible.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.0.use_count.cmp(&a.0.use_count))
                .then_with(|| a.0.id.cmp(&b.0.id))
        });

        compatible
    }

    /// Save a new profile
    pub fn save(
        &mut self,
        name: &str,
        dialect: DialectKind,
        header_columns: Vec<String>,
    ) -> RegistryResult<String> {
        fs::create_dir_all(&self.registry_dir)?;

        let mut id = generate_id(name);
        let base = id.clone();
        let mut n = 1;
        while self.profiles.contains_key(&id) {
            n += 1;
            id = format!("{}-{}", base, n);
        }
        let profile = SheetProfile {
            id: id.clone(),
            name: name.to_string(),
            dialect,
            header_columns,
            created_at: chrono::Utc::now().to_rfc3339(),
            last_used: None,
            use_count: 0,
        };

        self.write(&profile)?;
        self.profiles.insert(id.clone(), profile);
        Ok(id)
    }

    /// Bump usage statistics after a profile routed an extraction
    pub fn record_use(&mut self, id: &str) -> RegistryResult<()> {
        let profile = self
            .profiles
            .get_mut(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;

        profile.use_count += 1;
        profile.last_used = Some(chrono::Utc::now().to_rfc3339());

        let snapshot = profile.clone();
        self.write(&snapshot)
    }

    /// Delete a profile
    pub fn delete(&mut self, id: &str) -> RegistryResult<()> {
        if self.profiles.remove(id).is_none() {
            return Err(RegistryError::NotFound(id.to_string()));
        }
        fs::remove_file(self.path_for(id))?;
        Ok(())
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.registry_dir.join(format!("{}.json", id))
    }

    fn write(&self, profile: &SheetProfile) -> RegistryResult<()> {
        let content = serde_json::to_string_pretty(profile)?;
        fs::write(self.path_for(&profile.id), content)?;
        Ok(())
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Share of stored headers present in `header` (case-insensitive)
fn compatibility(stored: &[String], header: &[String]) -> f64 {
    let stored: Vec<String> = stored
        .iter()
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty())
        .collect();
    if stored.is_empty() {
        return 0.0;
    }

    let header_lower: Vec<String> = header.iter().map(|c| c.trim().to_lowercase()).collect();
    let match_count = stored.iter().filter(|col| header_lower.contains(col)).count();

    match_count as f64 / stored.len() as f64
}

/// Slug of `name` plus a millisecond timestamp
fn generate_id(name: &str) -> String {
    let slug = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    let slug = if slug.is_empty() { "sheet".to_string() } else { slug };
    format!("{}-{}", slug, chrono::Utc::now().timestamp_millis())
}
