use thiserror::Error;

/// Failures that abort processing of a whole document.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("page number must be at least 1 (input position {index})")]
    InvalidPageNumber { index: usize },
    #[error("duplicate page number {page_num}")]
    DuplicatePage { page_num: u32 },
    #[error("expected {expected} embeddings, got {actual}")]
    EmbeddingCount { expected: usize, actual: usize },
    #[error("embedding {index} has dimension {actual}, expected {expected}")]
    EmbeddingDimension {
        index: usize,
        expected: usize,
        actual: usize,
    },
    #[error("{labels} cluster labels for {pages} pages")]
    LabelCount { pages: usize, labels: usize },
    #[error("cluster index {index} does not fit a cluster label")]
    LabelOverflow { index: usize },
    /// Failure reported by an external embedding provider.
    #[error("embedding provider failed: {0}")]
    Embedding(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
