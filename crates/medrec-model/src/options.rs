//! Processing options shared by the pipeline stages.
//!
//! Every field has a default, so an empty TOML document deserializes to
//! [`PipelineOptions::default`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    pub clustering: ClusteringOptions,
    pub postprocess: PostprocessOptions,
    pub context: ContextOptions,
    pub output: OutputPolicy,
    /// Extra or overriding `label -> category id` entries.
    pub categories: BTreeMap<String, u32>,
}

/// DBSCAN parameters over cosine distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringOptions {
    pub eps: f32,
    pub min_samples: usize,
}

impl Default for ClusteringOptions {
    fn default() -> Self {
        Self {
            eps: 0.6,
            min_samples: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostprocessOptions {
    /// Largest page distance across which two raw groups may merge.
    pub max_page_gap: u32,
}

impl Default for PostprocessOptions {
    fn default() -> Self {
        Self { max_page_gap: 3 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextOptions {
    /// Largest page distance across which metadata is inherited.
    pub max_inherit_gap: u32,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self { max_inherit_gap: 5 }
    }
}

/// Order in which final clusters are visited during output assembly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClusterOrder {
    /// Ascending numeric cluster label.
    #[default]
    LabelId,
    /// Ascending smallest page number in the cluster.
    FirstPage,
}

/// Fixed literals written to every output row plus key formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputPolicy {
    pub reference_prefix: String,
    pub cluster_order: ClusterOrder,
    pub reviewable: String,
    pub lock_status: String,
    pub facility_group: String,
    pub reviewer_id: String,
    pub qc_reviewer_id: String,
    pub duplicate: String,
}

impl Default for OutputPolicy {
    fn default() -> Self {
        Self {
            reference_prefix: "12099".to_string(),
            cluster_order: ClusterOrder::default(),
            reviewable: "TRUE".to_string(),
            lock_status: "L".to_string(),
            facility_group: String::new(),
            reviewer_id: "287".to_string(),
            qc_reviewer_id: "322".to_string(),
            duplicate: "FALSE".to_string(),
        }
    }
}

impl OutputPolicy {
    /// Deterministic reference key of a page.
    pub fn reference_key(&self, page_num: u32) -> String {
        format!("{}{page_num}", self.reference_prefix)
    }
}
