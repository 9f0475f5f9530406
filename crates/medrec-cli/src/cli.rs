//! CLI argument definitions for `medrec`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use medrec_model::ClusterOrder;
use medrec_output::DEFAULT_OUTPUT_CSV;

#[derive(Parser)]
#[command(
    name = "medrec",
    version,
    about = "Split scanned medical records into documents and index them",
    long_about = "Group the pages of a scanned medical record into source documents \
                  and extract per-page metadata (date of service, provider, patient, \
                  document type) into a 13-column import CSV."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow page text and patient identifiers in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Cluster a document's pages and write the record CSV.
    Process(ProcessArgs),

    /// Inspect or edit the stored header patterns.
    Patterns(PatternsArgs),

    /// List header labels and their category codes.
    Categories(CategoriesArgs),

    /// Check a record CSV's category codes against its headers.
    Evaluate(EvaluateArgs),
}

#[derive(Args)]
pub struct ProcessArgs {
    /// Page JSON file, or a directory of numbered `.txt` page files.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Precomputed page embeddings (JSON array of vectors, one per page in
    /// input order). Without it a local hashing embedder is used.
    #[arg(long = "embeddings", value_name = "PATH")]
    pub embeddings: Option<PathBuf>,

    /// Record CSV destination.
    #[arg(long = "output", value_name = "PATH", default_value = DEFAULT_OUTPUT_CSV)]
    pub output: PathBuf,

    /// Also write a JSON run report to this path.
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Pipeline configuration (TOML).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub patterns: PatternFileArg,

    /// DBSCAN neighbourhood radius in cosine distance.
    #[arg(long = "eps")]
    pub eps: Option<f32>,

    /// DBSCAN core point threshold (the point itself counts).
    #[arg(long = "min-samples")]
    pub min_samples: Option<usize>,

    /// Largest page gap bridged when merging clusters with shared headers.
    #[arg(long = "max-page-gap")]
    pub max_page_gap: Option<u32>,

    /// Largest page gap over which patient, date and provider are inherited.
    #[arg(long = "max-inherit-gap")]
    pub max_inherit_gap: Option<u32>,

    /// Order in which clusters are visited while building rows.
    #[arg(long = "cluster-order", value_enum)]
    pub cluster_order: Option<ClusterOrderArg>,

    /// Run the pipeline and print the summary without writing files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct PatternFileArg {
    /// Header pattern store (default: $MEDREC_HEADER_PATTERNS or
    /// config/header_patterns.json).
    #[arg(long = "patterns", value_name = "PATH", global = true)]
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct PatternsArgs {
    #[command(subcommand)]
    pub action: PatternsCommand,

    #[command(flatten)]
    pub patterns: PatternFileArg,
}

#[derive(Subcommand)]
pub enum PatternsCommand {
    /// Show the active patterns in match order.
    List,

    /// Validate and append a pattern.
    Add {
        /// Regular expression matched against page text.
        regex: String,
        /// Header label emitted on a match.
        label: String,
    },

    /// Remove the pattern at a zero-based index.
    Delete {
        index: usize,
    },
}

#[derive(Args)]
pub struct CategoriesArgs {
    /// Configuration whose `[categories]` overrides are applied.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct EvaluateArgs {
    /// Record CSV to evaluate.
    #[arg(value_name = "CSV", default_value = DEFAULT_OUTPUT_CSV)]
    pub csv: PathBuf,

    /// Configuration whose `[categories]` overrides are applied.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ClusterOrderArg {
    LabelId,
    FirstPage,
}

impl From<ClusterOrderArg> for ClusterOrder {
    fn from(value: ClusterOrderArg) -> Self {
        match value {
            ClusterOrderArg::LabelId => ClusterOrder::LabelId,
            ClusterOrderArg::FirstPage => ClusterOrder::FirstPage,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
