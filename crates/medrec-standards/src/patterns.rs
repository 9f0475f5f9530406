//! Header patterns: `(regex, category label)` pairs evaluated against page text.
//!
//! Patterns are stored as plain strings and compiled case-insensitively when a
//! run starts. A stored pattern that does not compile is skipped with a
//! warning; only patterns submitted through [`validate_pattern`] are rejected.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::StandardsError;

/// Built-in pattern list used when the pattern file is missing or corrupt.
const DEFAULT_PATTERNS: &[(&str, &str)] = &[
    (
        r"(?i)Patient Instructions(?: \(continued\))?",
        "Patient Instructions",
    ),
    (r"(?i)ADMISSION ASSESSMENT", "Admission Assessment"),
    (r"(?i)ASSESSMENT/PLAN", "Clinical Notes"),
    (r"(?i)CHIEF COMPLAINT", "Clinical Notes"),
    (r"(?i)CLINICAL NOTES(?: \(continued\))?", "Clinical Notes"),
    (r"(?i)CONSENT FOR (?:ANAESTHESIA|SURGERY)", "Consent Form"),
    (r"(?i)DIAGNOSTIC REPORT", "Diagnostic Report"),
    (r"(?i)DISCHARGE SUMMARY", "Discharge Summary"),
    (r"(?i)FINAL BILL", "Billing"),
    (r"(?i)HEMOGLOBIN A1C", "Laboratory Report"),
    (r"(?i)INITIAL ASSESSMENT FORM", "Initial Assessment"),
    (r"(?i)INTAKE AND OUTPUT RECORD", "Intake And Output Record"),
    (r"(?i)IV FLUIDS CHART", "IV Fluids Chart"),
    (r"(?i)LABORATORY REPORT", "Laboratory Report"),
    (r"(?i)LABS", "Laboratory Report"),
    (r"(?i)Labs(?: \(continued\))?", "Laboratory Report"),
    (r"(?i)LIPID PANEL", "Laboratory Report"),
    (r"(?i)LIPOMA", "Clinical Notes"),
    (r"(?i)MEDICINE ORDER SHEET", "Medication Orders"),
    (r"(?i)NURSES DAILY RECORD", "Nursing Notes"),
    (r"(?i)NURSING ADMISSION ASSESSMENT", "Admission Assessment"),
    (
        r"(?i)Patient Instructions(?: \(continued\))?",
        "Patient Instructions",
    ),
    (r"(?i)PHIMOSIS", "Clinical Notes"),
    (r"(?i)PRE OPERATIVE CHECKLIST", "Pre-Op Checklist"),
    (r"(?i)PROGRESS NOTES", "Progress Notes"),
    (r"(?i)PROGRESS SHEET", "Progress Notes"),
    (r"(?i)TEMPERATURE CHART", "Temperature Chart"),
    (r"(?i)TSH", "Laboratory Report"),
    (r"(?i)UROLOGY PROGRESS NOTE", "Progress Notes"),
    (r"(?i)VITAL SIGNS", "Vital Signs"),
    (r"(?i)VITAL SIGNS SHEET", "Vital Signs"),
];

/// A stored header pattern.
///
/// Serialized as a two-element array `[regex, label]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct HeaderPattern {
    pub regex: String,
    pub label: String,
}

impl HeaderPattern {
    pub fn new(regex: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            regex: regex.into(),
            label: label.into(),
        }
    }
}

impl From<(String, String)> for HeaderPattern {
    fn from((regex, label): (String, String)) -> Self {
        Self { regex, label }
    }
}

impl From<HeaderPattern> for (String, String) {
    fn from(pattern: HeaderPattern) -> Self {
        (pattern.regex, pattern.label)
    }
}

/// The built-in default pattern list.
pub fn default_patterns() -> Vec<HeaderPattern> {
    DEFAULT_PATTERNS
        .iter()
        .map(|(regex, label)| HeaderPattern::new(*regex, *label))
        .collect()
}

fn build_regex(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// Checks a user-submitted pattern before it reaches storage.
pub fn validate_pattern(regex: &str, label: &str) -> Result<(), StandardsError> {
    if regex.trim().is_empty() {
        return Err(StandardsError::MissingField { field: "regex" });
    }
    if label.trim().is_empty() {
        return Err(StandardsError::MissingField { field: "label" });
    }
    build_regex(regex).map_err(|source| StandardsError::InvalidRegex {
        pattern: regex.to_string(),
        source,
    })?;
    Ok(())
}

/// A header pattern ready for matching.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub regex: Regex,
    pub label: String,
}

/// Ordered list of compiled header patterns.
#[derive(Debug, Clone, Default)]
pub struct CompiledPatterns {
    patterns: Vec<CompiledPattern>,
}

impl CompiledPatterns {
    /// Compiles every pattern, skipping (and logging) those that fail.
    pub fn compile(patterns: &[HeaderPattern]) -> Self {
        let mut compiled = Vec::with_capacity(patterns.len());
        for (index, pattern) in patterns.iter().enumerate() {
            match build_regex(&pattern.regex) {
                Ok(regex) => compiled.push(CompiledPattern {
                    regex,
                    label: pattern.label.clone(),
                }),
                Err(error) => warn!(
                    index,
                    label = %pattern.label,
                    %error,
                    "skipping header pattern that does not compile"
                ),
            }
        }
        Self { patterns: compiled }
    }

    pub fn defaults() -> Self {
        Self::compile(&default_patterns())
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledPattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
