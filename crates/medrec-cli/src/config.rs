//! Pipeline configuration file handling.

use std::path::Path;

use anyhow::{Context, Result};
use medrec_model::{ClusterOrder, PipelineOptions};
use tracing::debug;

/// Command-line values that take precedence over the configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionOverrides {
    pub eps: Option<f32>,
    pub min_samples: Option<usize>,
    pub max_page_gap: Option<u32>,
    pub max_inherit_gap: Option<u32>,
    pub cluster_order: Option<ClusterOrder>,
}

impl OptionOverrides {
    pub fn apply(&self, options: &mut PipelineOptions) {
        if let Some(eps) = self.eps {
            options.clustering.eps = eps;
        }
        if let Some(min_samples) = self.min_samples {
            options.clustering.min_samples = min_samples;
        }
        if let Some(gap) = self.max_page_gap {
            options.postprocess.max_page_gap = gap;
        }
        if let Some(gap) = self.max_inherit_gap {
            options.context.max_inherit_gap = gap;
        }
        if let Some(order) = self.cluster_order {
            options.output.cluster_order = order;
        }
    }
}

/// Parse a TOML configuration document. Absent sections keep their defaults.
pub fn parse_options(contents: &str) -> Result<PipelineOptions> {
    toml::from_str(contents).context("parse pipeline configuration")
}

/// Load options from `path`, or the defaults when no file is given.
pub fn load_options(path: Option<&Path>) -> Result<PipelineOptions> {
    let Some(path) = path else {
        return Ok(PipelineOptions::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let options =
        parse_options(&contents).with_context(|| format!("load config {}", path.display()))?;
    debug!(path = %path.display(), "loaded pipeline configuration");
    Ok(options)
}

/// Validate values the pipeline cannot run with.
pub fn check_options(options: &PipelineOptions) -> Result<()> {
    let eps = options.clustering.eps;
    if !(eps.is_finite() && eps > 0.0) {
        anyhow::bail!("clustering eps must be a positive number, got {eps}");
    }
    if options.clustering.min_samples == 0 {
        anyhow::bail!("clustering min_samples must be at least 1");
    }
    Ok(())
}

/// Resolve the final options: file, then overrides, then validation.
pub fn resolve_options(path: Option<&Path>, overrides: &OptionOverrides) -> Result<PipelineOptions> {
    let mut options = load_options(path)?;
    overrides.apply(&mut options);
    check_options(&options)?;
    Ok(options)
}
