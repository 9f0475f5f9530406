//! End-to-end processing of one document.

use std::collections::BTreeSet;

use medrec_model::{ClusterLabel, OutputRow, Page, PipelineOptions};
use medrec_standards::{CategoryMap, CompiledPatterns};
use serde::Serialize;
use tracing::{debug, info, info_span};

use crate::assemble::OutputAssembler;
use crate::cluster::cluster_embeddings;
use crate::embed::EmbeddingProvider;
use crate::error::{CoreError, Result};
use crate::extract::EntityExtractor;
use crate::metrics::ProcessingMetrics;
use crate::postprocess::postprocess_clusters;

/// Everything one run produces. `pages`, `raw_labels` and `labels` are
/// index-aligned and in ascending page order.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub pages: Vec<Page>,
    pub raw_labels: Vec<ClusterLabel>,
    pub labels: Vec<ClusterLabel>,
    pub rows: Vec<OutputRow>,
    pub metrics: ProcessingMetrics,
}

impl PipelineOutput {
    pub fn page_numbers(&self) -> Vec<u32> {
        self.pages.iter().map(Page::page_num).collect()
    }
}

#[derive(Debug, Clone)]
pub struct DocumentPipeline {
    options: PipelineOptions,
    extractor: EntityExtractor,
    assembler: OutputAssembler,
}

impl DocumentPipeline {
    pub fn new(options: PipelineOptions, patterns: CompiledPatterns) -> Self {
        Self::with_extractor(options, EntityExtractor::new(patterns))
    }

    pub fn with_extractor(options: PipelineOptions, extractor: EntityExtractor) -> Self {
        let categories = CategoryMap::builtin().with_overrides(&options.categories);
        let assembler = OutputAssembler::new(categories, options.output.clone())
            .with_max_inherit_gap(options.context.max_inherit_gap);
        Self {
            options,
            extractor,
            assembler,
        }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn extractor(&self) -> &EntityExtractor {
        &self.extractor
    }

    pub fn categories(&self) -> &CategoryMap {
        self.assembler.categories()
    }

    /// Embeds, clusters, repairs and assembles `pages`.
    ///
    /// Pages may arrive in any order; embeddings are requested in input
    /// order and then reordered together with their pages.
    pub fn run(&self, pages: Vec<Page>, provider: &dyn EmbeddingProvider) -> Result<PipelineOutput> {
        let span = info_span!("process", pages = pages.len());
        let _guard = span.enter();

        validate_pages(&pages)?;

        let texts: Vec<&str> = pages.iter().map(|page| page.text.as_str()).collect();
        let embeddings = provider.embed_batch(&texts)?;
        if embeddings.len() != pages.len() {
            return Err(CoreError::EmbeddingCount {
                expected: pages.len(),
                actual: embeddings.len(),
            });
        }
        debug!(dimension = provider.dimension(), "embedded pages");

        let mut paired: Vec<(Page, Vec<f32>)> = pages.into_iter().zip(embeddings).collect();
        paired.sort_by_key(|(page, _)| page.page_num());
        let (pages, embeddings): (Vec<Page>, Vec<Vec<f32>>) = paired.into_iter().unzip();

        let raw_labels = cluster_embeddings(&embeddings, &self.options.clustering)?;
        let labels = postprocess_clusters(
            &pages,
            &raw_labels,
            &self.extractor,
            self.options.postprocess.max_page_gap,
        )?;
        let rows = self.assembler.assemble(&pages, &labels, &self.extractor)?;
        let metrics = ProcessingMetrics::compute(&pages, &labels, &self.extractor);

        info!(
            clusters = metrics.total_clusters,
            rows = rows.len(),
            "document processed"
        );
        Ok(PipelineOutput {
            pages,
            raw_labels,
            labels,
            rows,
            metrics,
        })
    }
}

/// Page numbers must be positive and unique within a document.
pub fn validate_pages(pages: &[Page]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for (index, page) in pages.iter().enumerate() {
        let page_num = page.page_num();
        if page_num == 0 {
            return Err(CoreError::InvalidPageNumber { index });
        }
        if !seen.insert(page_num) {
            return Err(CoreError::DuplicatePage { page_num });
        }
    }
    Ok(())
}
