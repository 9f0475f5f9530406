use std::collections::BTreeMap;
use std::path::PathBuf;

use medrec_core::{CategoryEvaluation, PipelineOutput};
use medrec_standards::HeaderPattern;

#[derive(Debug)]
pub struct ProcessResult {
    pub input: PathBuf,
    pub input_sha256: String,
    pub embedder: EmbedderKind,
    pub pattern_count: usize,
    /// `None` on a dry run.
    pub output_csv: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub output: PipelineOutput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedderKind {
    Precomputed,
    Hashing,
}

impl EmbedderKind {
    pub fn describe(self) -> &'static str {
        match self {
            EmbedderKind::Precomputed => "precomputed",
            EmbedderKind::Hashing => "hashing",
        }
    }
}

#[derive(Debug)]
pub struct PatternListing {
    pub path: PathBuf,
    pub patterns: Vec<HeaderPattern>,
}

#[derive(Debug)]
pub struct EvaluationResult {
    pub csv: PathBuf,
    pub evaluation: CategoryEvaluation,
    /// Header labels mapped to each category code.
    pub labels: BTreeMap<u32, Vec<String>>,
}
