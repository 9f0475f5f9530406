use serde::{Deserialize, Serialize};

/// Raw cluster label produced by the density clusterer.
pub type ClusterLabel = i32;

/// Label assigned to pages the clusterer could not place in any group.
pub const NOISE_LABEL: ClusterLabel = -1;

/// A single page of the source document.
///
/// The wire form mirrors what the text-acquisition stage emits:
/// `{"text": "...", "metadata": {"page_num": 3}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub text: String,
    pub metadata: PageMetadata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub page_num: u32,
}

impl Page {
    pub fn new(page_num: u32, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: PageMetadata { page_num },
        }
    }

    pub fn page_num(&self) -> u32 {
        self.metadata.page_num
    }
}
