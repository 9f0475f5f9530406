//! File-backed header pattern store.
//!
//! The store holds a single JSON document:
//!
//! ```json
//! { "header_patterns": [["(?i)VITAL SIGNS", "Vital Signs"], ...] }
//! ```
//!
//! Loading never fails: a missing or unreadable file yields the built-in
//! defaults. Writes are whole-file replacements with a single writer assumed;
//! concurrent editors race and the last write wins. Readers should load once
//! per run and never cache a list across runs.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::StandardsError;
use crate::patterns::{HeaderPattern, default_patterns, validate_pattern};

/// Environment variable for overriding the pattern file location.
pub const PATTERNS_ENV_VAR: &str = "MEDREC_HEADER_PATTERNS";

/// Pattern file location used when neither a flag nor the env var is set.
pub const DEFAULT_PATTERNS_PATH: &str = "config/header_patterns.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct PatternDocument {
    #[serde(default)]
    header_patterns: Vec<HeaderPattern>,
}

/// Resolve the pattern file path.
///
/// Resolution order:
/// 1. explicit path
/// 2. `MEDREC_HEADER_PATTERNS` environment variable
/// 3. `config/header_patterns.json` relative to the working directory
pub fn resolve_patterns_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Ok(path) = std::env::var(PATTERNS_ENV_VAR) {
        return PathBuf::from(path);
    }
    PathBuf::from(DEFAULT_PATTERNS_PATH)
}

#[derive(Debug, Clone)]
pub struct PatternStore {
    path: PathBuf,
}

impl PatternStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored patterns, falling back to the defaults on any failure.
    pub fn load(&self) -> Vec<HeaderPattern> {
        match self.try_load() {
            Ok(patterns) => patterns,
            Err(error) => {
                warn!(
                    path = %self.path.display(),
                    %error,
                    "using built-in header patterns"
                );
                default_patterns()
            }
        }
    }

    /// Load the stored patterns, reporting why the file could not be used.
    pub fn try_load(&self) -> Result<Vec<HeaderPattern>, StandardsError> {
        let contents =
            fs::read_to_string(&self.path).map_err(|e| StandardsError::io(&self.path, e))?;
        let document: PatternDocument =
            serde_json::from_str(&contents).map_err(|source| StandardsError::Json {
                path: self.path.clone(),
                source,
            })?;
        debug!(
            path = %self.path.display(),
            pattern_count = document.header_patterns.len(),
            "loaded header patterns"
        );
        Ok(document.header_patterns)
    }

    /// Replace the stored list.
    pub fn save(&self, patterns: &[HeaderPattern]) -> Result<(), StandardsError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| StandardsError::io(parent, e))?;
        }
        let document = PatternDocument {
            header_patterns: patterns.to_vec(),
        };
        let json = serde_json::to_string_pretty(&document).map_err(|source| {
            StandardsError::Json {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&self.path, format!("{json}\n")).map_err(|e| StandardsError::io(&self.path, e))
    }

    /// Validate and append a pattern, returning the updated list.
    ///
    /// Nothing is written when validation fails.
    pub fn add(&self, regex: &str, label: &str) -> Result<Vec<HeaderPattern>, StandardsError> {
        validate_pattern(regex, label)?;
        let mut patterns = self.load();
        patterns.push(HeaderPattern::new(regex, label.trim()));
        self.save(&patterns)?;
        info!(path = %self.path.display(), label = %label.trim(), "header pattern added");
        Ok(patterns)
    }

    /// Remove the pattern at `index`, returning it.
    pub fn delete(&self, index: usize) -> Result<HeaderPattern, StandardsError> {
        let mut patterns = self.load();
        if index >= patterns.len() {
            return Err(StandardsError::PatternIndex {
                index,
                len: patterns.len(),
            });
        }
        let removed = patterns.remove(index);
        self.save(&patterns)?;
        info!(path = %self.path.display(), label = %removed.label, "header pattern deleted");
        Ok(removed)
    }
}
