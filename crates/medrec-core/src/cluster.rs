//! Density clustering of page embeddings.
//!
//! Pages are clustered with DBSCAN over a precomputed cosine-distance
//! matrix. A page counts as its own neighbour, a page with at least
//! `min_samples` neighbours within `eps` is a core page, and border pages
//! join the first cluster that reaches them. Cluster labels are numbered in
//! discovery order; pages in no cluster get [`NOISE_LABEL`].

use medrec_model::{ClusterLabel, ClusteringOptions, NOISE_LABEL};
use tracing::debug;

use crate::error::{CoreError, Result};

/// Pairwise cosine distances (`1 - cos`) clipped to `[0, 2]`, with an exact
/// zero diagonal. A zero vector has similarity 0 with everything.
pub fn cosine_distance_matrix(embeddings: &[Vec<f32>]) -> Vec<Vec<f32>> {
    let norms: Vec<f32> = embeddings.iter().map(|v| l2_norm(v)).collect();
    let n = embeddings.len();
    let mut matrix = vec![vec![0.0_f32; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let similarity = if norms[i] == 0.0 || norms[j] == 0.0 {
                0.0
            } else {
                dot(&embeddings[i], &embeddings[j]) / (norms[i] * norms[j])
            };
            let distance = (1.0 - similarity).clamp(0.0, 2.0);
            matrix[i][j] = distance;
            matrix[j][i] = distance;
        }
    }
    matrix
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn l2_norm(v: &[f32]) -> f32 {
    dot(v, v).sqrt()
}

/// DBSCAN over a square distance matrix.
pub fn dbscan(distances: &[Vec<f32>], eps: f32, min_samples: usize) -> Vec<ClusterLabel> {
    let n = distances.len();
    let neighborhoods: Vec<Vec<usize>> = distances
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .filter(|(_, distance)| **distance <= eps)
                .map(|(j, _)| j)
                .collect()
        })
        .collect();
    let is_core: Vec<bool> = neighborhoods
        .iter()
        .map(|neighbors| neighbors.len() >= min_samples)
        .collect();

    let mut labels = vec![NOISE_LABEL; n];
    let mut next_label: ClusterLabel = 0;
    let mut stack = Vec::new();
    for seed in 0..n {
        if labels[seed] != NOISE_LABEL || !is_core[seed] {
            continue;
        }
        stack.push(seed);
        while let Some(point) = stack.pop() {
            if labels[point] != NOISE_LABEL {
                continue;
            }
            labels[point] = next_label;
            if !is_core[point] {
                continue;
            }
            for &neighbor in &neighborhoods[point] {
                if labels[neighbor] == NOISE_LABEL {
                    stack.push(neighbor);
                }
            }
        }
        next_label += 1;
    }
    labels
}

/// Clusters one embedding per page. All embeddings must share a dimension.
pub fn cluster_embeddings(
    embeddings: &[Vec<f32>],
    options: &ClusteringOptions,
) -> Result<Vec<ClusterLabel>> {
    if let Some(first) = embeddings.first() {
        let expected = first.len();
        if let Some((index, actual)) = embeddings
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != expected)
        {
            return Err(CoreError::EmbeddingDimension {
                index,
                expected,
                actual,
            });
        }
    }
    let distances = cosine_distance_matrix(embeddings);
    let labels = dbscan(&distances, options.eps, options.min_samples);
    debug!(
        pages = labels.len(),
        clusters = labels
            .iter()
            .copied()
            .max()
            .map_or(0, |max| max + 1),
        noise = labels.iter().filter(|l| **l == NOISE_LABEL).count(),
        "clustered page embeddings"
    );
    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> ClusteringOptions {
        ClusteringOptions::default()
    }

    #[test]
    fn distance_matrix_properties() {
        let m = cosine_distance_matrix(&[vec![1.0, 0.0], vec![0.0, 1.0], vec![-1.0, 0.0]]);
        assert_eq!(m[0][0], 0.0);
        assert!((m[0][1] - 1.0).abs() < 1e-6);
        assert!((m[0][2] - 2.0).abs() < 1e-6);
        assert_eq!(m[1][0], m[0][1]);
    }

    #[test]
    fn zero_vector_is_at_distance_one() {
        let m = cosine_distance_matrix(&[vec![0.0, 0.0], vec![1.0, 0.0]]);
        assert_eq!(m[0][1], 1.0);
    }

    #[test]
    fn two_groups_and_noise() {
        let embeddings = vec![
            vec![1.0, 0.0, 0.0],
            vec![0.99, 0.1, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.98, 0.1],
            vec![0.0, 0.0, 1.0],
        ];
        let labels = cluster_embeddings(&embeddings, &options()).expect("clusters");
        assert_eq!(labels, vec![0, 0, 1, 1, -1]);
    }

    #[test]
    fn labels_follow_discovery_order() {
        let embeddings = vec![
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 0.0],
        ];
        let distances = cosine_distance_matrix(&embeddings);
        assert_eq!(dbscan(&distances, 0.1, 2), vec![0, 1, 0, 1]);
    }

    #[test]
    fn single_page_is_noise() {
        let labels = cluster_embeddings(&[vec![1.0, 0.0]], &options()).expect("clusters");
        assert_eq!(labels, vec![NOISE_LABEL]);
    }

    #[test]
    fn min_samples_one_makes_every_page_a_cluster() {
        let distances = cosine_distance_matrix(&[vec![1.0, 0.0], vec![0.0, 1.0]]);
        assert_eq!(dbscan(&distances, 0.1, 1), vec![0, 1]);
    }

    #[test]
    fn border_page_joins_first_cluster() {
        // Page 1 is within eps of pages 0 and 2, which are not within eps
        // of each other; with min_samples 3 only page 1 is core.
        let distances = vec![
            vec![0.0, 0.5, 1.0],
            vec![0.5, 0.0, 0.5],
            vec![1.0, 0.5, 0.0],
        ];
        assert_eq!(dbscan(&distances, 0.6, 3), vec![0, 0, 0]);
    }

    #[test]
    fn empty_input() {
        assert!(cluster_embeddings(&[], &options()).expect("clusters").is_empty());
    }

    #[test]
    fn dimension_mismatch_is_an_error() {
        let err = cluster_embeddings(&[vec![1.0, 0.0], vec![1.0]], &options()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::EmbeddingDimension {
                index: 1,
                expected: 2,
                actual: 1
            }
        ));
    }
}
