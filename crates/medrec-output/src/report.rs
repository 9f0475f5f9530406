//! JSON run report.

use std::path::Path;

use chrono::Utc;
use medrec_core::{PipelineOutput, ProcessingMetrics};
use medrec_model::ClusterLabel;
use serde::{Deserialize, Serialize};

use crate::error::{OutputError, Result};

pub const REPORT_SCHEMA: &str = "medrec.run-report";
pub const REPORT_SCHEMA_VERSION: u32 = 1;

/// Identity of the processed input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFingerprint {
    pub path: String,
    /// Lowercase hex SHA-256 of the input file.
    pub sha256: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub schema: String,
    pub schema_version: u32,
    pub generated_at: String,
    pub source: SourceFingerprint,
    pub page_numbers: Vec<u32>,
    pub raw_labels: Vec<ClusterLabel>,
    pub labels: Vec<ClusterLabel>,
    pub row_count: usize,
    pub metrics: ProcessingMetrics,
}

impl RunReport {
    pub fn new(source: SourceFingerprint, output: &PipelineOutput) -> Self {
        Self {
            schema: REPORT_SCHEMA.to_string(),
            schema_version: REPORT_SCHEMA_VERSION,
            generated_at: Utc::now().to_rfc3339(),
            source,
            page_numbers: output.page_numbers(),
            raw_labels: output.raw_labels.clone(),
            labels: output.labels.clone(),
            row_count: output.rows.len(),
            metrics: output.metrics.clone(),
        }
    }
}

/// Writes `report` as pretty JSON with a trailing newline, creating parent
/// directories.
pub fn write_run_report_json(path: &Path, report: &RunReport) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| OutputError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let json = serde_json::to_string_pretty(report).map_err(|source| OutputError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, format!("{json}\n")).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })
}
