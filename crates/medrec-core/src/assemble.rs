//! Output assembly: final clusters to ordered output rows.

use std::collections::BTreeMap;

use medrec_model::{
    ClusterLabel, ClusterOrder, OutputPolicy, OutputRow, Page, PatientInfo, ROOT_PARENT_KEY,
};
use medrec_standards::CategoryMap;
use tracing::{debug, trace};

use crate::context::DEFAULT_MAX_INHERIT_GAP;
use crate::error::{CoreError, Result};
use crate::extract::EntityExtractor;

/// Builds one output row per `(page, header label)` pair.
///
/// Clusters are visited in the policy's [`ClusterOrder`] and their pages in
/// ascending page order, all through a single document context. The first
/// page of a cluster is its parent: its rows carry [`ROOT_PARENT_KEY`] and
/// every later page of the cluster points at its reference key.
#[derive(Debug, Clone)]
pub struct OutputAssembler {
    categories: CategoryMap,
    policy: OutputPolicy,
    max_inherit_gap: u32,
}

impl Default for OutputAssembler {
    fn default() -> Self {
        Self::new(CategoryMap::builtin(), OutputPolicy::default())
    }
}

impl OutputAssembler {
    pub fn new(categories: CategoryMap, policy: OutputPolicy) -> Self {
        Self {
            categories,
            policy,
            max_inherit_gap: DEFAULT_MAX_INHERIT_GAP,
        }
    }

    #[must_use]
    pub fn with_max_inherit_gap(mut self, max_inherit_gap: u32) -> Self {
        self.max_inherit_gap = max_inherit_gap;
        self
    }

    pub fn categories(&self) -> &CategoryMap {
        &self.categories
    }

    pub fn policy(&self) -> &OutputPolicy {
        &self.policy
    }

    /// Rows sorted by page number, then header label.
    pub fn assemble(
        &self,
        pages: &[Page],
        labels: &[ClusterLabel],
        extractor: &EntityExtractor,
    ) -> Result<Vec<OutputRow>> {
        if pages.len() != labels.len() {
            return Err(CoreError::LabelCount {
                pages: pages.len(),
                labels: labels.len(),
            });
        }

        let mut clusters: BTreeMap<ClusterLabel, Vec<&Page>> = BTreeMap::new();
        for (page, label) in pages.iter().zip(labels) {
            clusters.entry(*label).or_default().push(page);
        }
        let mut ordered: Vec<(ClusterLabel, Vec<&Page>)> = clusters.into_iter().collect();
        for (_, members) in &mut ordered {
            members.sort_by_key(|page| page.page_num());
        }
        if self.policy.cluster_order == ClusterOrder::FirstPage {
            ordered.sort_by_key(|(_, members)| members[0].page_num());
        }

        let mut context = extractor.new_context(self.max_inherit_gap);
        let mut rows = Vec::new();
        for (label, members) in &ordered {
            let parent_page = members[0].page_num();
            let parent_key = self.policy.reference_key(parent_page);
            trace!(label, parent_page, pages = members.len(), "assembling cluster");

            for (position, page) in members.iter().enumerate() {
                let page_num = page.page_num();
                let entities = extractor.extract_with_context(&page.text, Some(&context), Some(page_num));
                context.update_from(page_num, &entities);

                let page_parent_key = if position == 0 {
                    ROOT_PARENT_KEY.to_string()
                } else {
                    parent_key.clone()
                };
                for header in &entities.headers {
                    rows.push(OutputRow {
                        page_num,
                        category_id: self.categories.category_id(header),
                        reviewable: self.policy.reviewable.clone(),
                        dos: entities.dos.clone(),
                        provider: entities.provider.clone(),
                        reference_key: self.policy.reference_key(page_num),
                        parent_key: page_parent_key.clone(),
                        lock_status: self.policy.lock_status.clone(),
                        header: composite_header(header, &entities.patient_info),
                        facility_group: self.policy.facility_group.clone(),
                        reviewer_id: self.policy.reviewer_id.clone(),
                        qc_reviewer_id: self.policy.qc_reviewer_id.clone(),
                        duplicate: self.policy.duplicate.clone(),
                        header_label: header.clone(),
                    });
                }
            }
        }

        rows.sort_by(|a, b| {
            a.page_num
                .cmp(&b.page_num)
                .then_with(|| a.header_label.cmp(&b.header_label))
        });
        debug!(rows = rows.len(), clusters = ordered.len(), "assembled output rows");
        Ok(rows)
    }
}

/// `[name - ]label[ - MRN: mrn]`
pub fn composite_header(label: &str, patient: &PatientInfo) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(3);
    if !patient.name.is_empty() {
        parts.push(patient.name.clone());
    }
    parts.push(label.to_string());
    if patient.has_mrn() {
        parts.push(format!("MRN: {}", patient.mrn));
    }
    parts.join(" - ")
}
