//! Per-page metadata produced by entity extraction.
//!
//! Unresolved fields never become errors. They hold sentinel values instead,
//! and the sentinels double as the signal that a page should inherit metadata
//! from the pages before it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Provider sentinel used when no provider could be detected.
pub const UNKNOWN_PROVIDER: &str = "Unknown Provider";

/// Header label used when no header pattern matched.
pub const DEFAULT_HEADER: &str = "Progress Notes";

/// Rendering of every date of service in the output.
pub const DOS_FORMAT: &str = "%m/%d/%Y";

/// Formats a date the way dates of service are written to the output.
pub fn format_dos(date: NaiveDate) -> String {
    date.format(DOS_FORMAT).to_string()
}

/// Patient identifiers found on a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientInfo {
    pub name: String,
    pub mrn: String,
    pub dob: String,
    pub sex: String,
}

impl PatientInfo {
    /// A patient record counts as present once it carries an MRN.
    pub fn has_mrn(&self) -> bool {
        !self.mrn.is_empty()
    }
}

/// Metadata extracted from one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedEntities {
    /// Date of service as `MM/DD/YYYY`.
    pub dos: String,
    pub provider: String,
    /// Sorted, de-duplicated, never empty.
    pub headers: Vec<String>,
    pub patient_info: PatientInfo,
}

impl ExtractedEntities {
    /// Entities for a page where nothing was detected.
    pub fn unresolved(unresolved_dos: impl Into<String>) -> Self {
        Self {
            dos: unresolved_dos.into(),
            provider: UNKNOWN_PROVIDER.to_string(),
            headers: vec![DEFAULT_HEADER.to_string()],
            patient_info: PatientInfo::default(),
        }
    }

    /// The label fed back into the document context.
    pub fn primary_header(&self) -> &str {
        self.headers
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_HEADER)
    }

    pub fn has_provider(&self) -> bool {
        self.provider != UNKNOWN_PROVIDER
    }
}
