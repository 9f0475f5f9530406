//! Run quality metrics.
//!
//! All counts use context-free extraction so they measure what each page
//! states on its own, not what it inherited.

use std::collections::{BTreeMap, BTreeSet};

use medrec_model::{ClusterLabel, Page};
use serde::{Deserialize, Serialize};

use crate::extract::EntityExtractor;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingMetrics {
    pub total_pages: usize,
    pub total_clusters: usize,
    pub avg_cluster_size: f64,
    pub extraction: ExtractionCounts,
    pub consistency: ClusterConsistency,
}

/// Pages on which a field was found directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionCounts {
    pub dos_extracted: usize,
    pub provider_found: usize,
    pub patient_info_found: usize,
}

/// Agreement inside clusters of two or more pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterConsistency {
    pub comparable_clusters: usize,
    pub dos_consistent: usize,
    pub provider_consistent: usize,
}

impl ProcessingMetrics {
    /// Computes metrics for `pages` grouped by the index-aligned final
    /// `labels`. Extra labels or pages beyond the shorter slice are ignored.
    pub fn compute(pages: &[Page], labels: &[ClusterLabel], extractor: &EntityExtractor) -> Self {
        let entities: Vec<_> = pages.iter().map(|page| extractor.extract(&page.text)).collect();

        let mut extraction = ExtractionCounts::default();
        for page in &entities {
            if page.dos != extractor.unresolved_dos() {
                extraction.dos_extracted += 1;
            }
            if page.has_provider() {
                extraction.provider_found += 1;
            }
            if page.patient_info.has_mrn() {
                extraction.patient_info_found += 1;
            }
        }

        let mut clusters: BTreeMap<ClusterLabel, Vec<usize>> = BTreeMap::new();
        for (index, label) in labels.iter().enumerate().take(pages.len()) {
            clusters.entry(*label).or_default().push(index);
        }

        let mut consistency = ClusterConsistency::default();
        for members in clusters.values().filter(|members| members.len() >= 2) {
            consistency.comparable_clusters += 1;
            let dates: BTreeSet<&str> = members.iter().map(|&i| entities[i].dos.as_str()).collect();
            let providers: BTreeSet<&str> = members
                .iter()
                .map(|&i| entities[i].provider.as_str())
                .collect();
            if dates.len() == 1 {
                consistency.dos_consistent += 1;
            }
            if providers.len() == 1 {
                consistency.provider_consistent += 1;
            }
        }

        let total_clusters = clusters.len();
        let avg_cluster_size = if total_clusters == 0 {
            0.0
        } else {
            pages.len() as f64 / total_clusters as f64
        };
        Self {
            total_pages: pages.len(),
            total_clusters,
            avg_cluster_size,
            extraction,
            consistency,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use medrec_standards::CompiledPatterns;

    use super::*;

    #[test]
    fn counts_and_consistency() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date");
        let extractor = EntityExtractor::with_today(CompiledPatterns::defaults(), today);
        let pages = vec![
            Page::new(1, "Date/Time: 01/02/2024\nFiled by: Okafor"),
            Page::new(2, "Date/Time: 01/02/2024\nFiled by: Okafor"),
            Page::new(3, "ABC Name MRN: 5 DOB: 1/1/1990 Legal Sex: F"),
            Page::new(4, "Date/Time: 03/04/2024"),
        ];
        let metrics = ProcessingMetrics::compute(&pages, &[0, 0, 1, 1], &extractor);
        assert_eq!(metrics.total_pages, 4);
        assert_eq!(metrics.total_clusters, 2);
        assert!((metrics.avg_cluster_size - 2.0).abs() < f64::EPSILON);
        assert_eq!(metrics.extraction.dos_extracted, 3);
        assert_eq!(metrics.extraction.patient_info_found, 1);
        assert_eq!(metrics.consistency.comparable_clusters, 2);
        assert_eq!(metrics.consistency.dos_consistent, 1);
        assert_eq!(metrics.consistency.provider_consistent, 1);
    }

    #[test]
    fn empty_run() {
        let extractor = EntityExtractor::new(CompiledPatterns::defaults());
        let metrics = ProcessingMetrics::compute(&[], &[], &extractor);
        assert_eq!(metrics, ProcessingMetrics::default());
    }
}
