//! Rule-based repair of raw cluster labels.
//!
//! Density clustering splits documents whose pages read differently and
//! cannot see page order at all. The repair pass walks the raw groups in
//! page order and merges a group into the running cluster when it starts
//! close to where the cluster ends and the two boundary pages share a header
//! label. Raw groups are never split, so the cluster count never grows.

use std::collections::HashMap;

use medrec_model::{ClusterLabel, Page};
use tracing::debug;

use crate::error::{CoreError, Result};
use crate::extract::EntityExtractor;

/// Default page distance across which raw groups may merge.
pub const DEFAULT_MAX_PAGE_GAP: u32 = 3;

/// Relabels `pages` into merged clusters numbered `0..k` in page order.
///
/// The returned labels are index-aligned with `pages`. Noise pages form one
/// raw group like any other label.
pub fn postprocess_clusters(
    pages: &[Page],
    labels: &[ClusterLabel],
    extractor: &EntityExtractor,
    max_page_gap: u32,
) -> Result<Vec<ClusterLabel>> {
    if pages.len() != labels.len() {
        return Err(CoreError::LabelCount {
            pages: pages.len(),
            labels: labels.len(),
        });
    }

    let mut groups: Vec<(ClusterLabel, Vec<usize>)> = Vec::new();
    for (index, label) in labels.iter().enumerate() {
        match groups.iter_mut().find(|(existing, _)| existing == label) {
            Some((_, members)) => members.push(index),
            None => groups.push((*label, vec![index])),
        }
    }
    groups.sort_by_key(|(_, members)| pages[members[0]].page_num());

    let mut header_cache: HashMap<usize, Vec<String>> = HashMap::new();
    let mut headers_of = |index: usize| -> Vec<String> {
        header_cache
            .entry(index)
            .or_insert_with(|| extractor.headers(&pages[index].text))
            .clone()
    };

    let mut merged: Vec<Vec<usize>> = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    for (_, members) in groups {
        let Some(&last) = current.last() else {
            current = members;
            continue;
        };
        let first = members[0];
        let gap = i64::from(pages[first].page_num()) - i64::from(pages[last].page_num());
        if gap <= i64::from(max_page_gap) {
            let last_headers = headers_of(last);
            let first_headers = headers_of(first);
            if last_headers.iter().any(|h| first_headers.contains(h)) {
                current.extend(members);
                continue;
            }
        }
        merged.push(std::mem::replace(&mut current, members));
    }
    if !current.is_empty() {
        merged.push(current);
    }

    let mut relabeled = vec![0; pages.len()];
    for (new_label, members) in merged.iter().enumerate() {
        let new_label = cluster_label(new_label)?;
        for &index in members {
            relabeled[index] = new_label;
        }
    }
    debug!(
        raw_groups = count_distinct(labels),
        clusters = merged.len(),
        "merged raw clusters"
    );
    Ok(relabeled)
}

fn cluster_label(index: usize) -> Result<ClusterLabel> {
    ClusterLabel::try_from(index).map_err(|_| CoreError::LabelOverflow { index })
}

fn count_distinct(labels: &[ClusterLabel]) -> usize {
    let mut seen: Vec<ClusterLabel> = labels.to_vec();
    seen.sort_unstable();
    seen.dedup();
    seen.len()
}
