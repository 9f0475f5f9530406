#![deny(unsafe_code)]

pub mod assemble;
pub mod cluster;
pub mod context;
pub mod embed;
pub mod error;
pub mod evaluate;
pub mod extract;
pub mod metrics;
pub mod pipeline;
pub mod postprocess;

pub use crate::assemble::{OutputAssembler, composite_header};
pub use crate::cluster::{cluster_embeddings, cosine_distance_matrix, dbscan};
pub use crate::context::{ContextSnapshot, DEFAULT_MAX_INHERIT_GAP, DocumentContext};
pub use crate::embed::{
    DEFAULT_HASHING_DIMENSION, EmbeddingProvider, HashingEmbedder, PrecomputedEmbeddings,
    normalize,
};
pub use crate::error::{CoreError, Result};
pub use crate::evaluate::{CategoryAgreement, CategoryEvaluation, evaluate_categories};
pub use crate::extract::EntityExtractor;
pub use crate::metrics::{ClusterConsistency, ExtractionCounts, ProcessingMetrics};
pub use crate::pipeline::{DocumentPipeline, PipelineOutput, validate_pages};
pub use crate::postprocess::{DEFAULT_MAX_PAGE_GAP, postprocess_clusters};
