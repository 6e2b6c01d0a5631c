//! core::assign — reconstruction-error cluster assignment.
//!
//! Purpose
//! -------
//! Score every (sample, cluster) pair by how well the cluster's common
//! space reconstructs the sample and assign each sample to its
//! minimum-error cluster. This module also owns the two partition
//! helpers the fit loop needs: the contiguous roughly-equal initial
//! split and the label-vector → index-set conversion.
//!
//! Key behaviors
//! -------------
//! - Build each non-null cluster's projector P_k = S_k·S_kᵀ once per
//!   assignment pass, then reconstruct every sample as Y_i = T_i·P_k.
//! - Evaluate the configured per-time-step metric between T_i and Y_i
//!   row by row and average over time steps, giving one scalar
//!   error(i, k).
//! - Pin error(i, k) = +∞ for clusters with a null common space, so an
//!   empty cluster is never selected and never wins through a zero-error
//!   sentinel.
//! - Break argmin ties by the lowest cluster index, deterministically.
//! - Parallelize across samples with rayon; each sample reads only the
//!   shared projectors and its own observation matrix.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every non-null space spans the dataset's variable count m; the fit
//!   loop derives spaces from the same dataset's covariances, so this
//!   holds by construction.
//! - The labels produced always partition 0..n-1 into K disjoint sets
//!   (every sample receives exactly one label in [0, K)).
//!
//! Conventions
//! -----------
//! - When *all* clusters are null every error is +∞ and the argmin falls
//!   back to cluster 0, matching the reference implementation's argmin
//!   over an all-infinite row.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the null-space infinity guarantee, deterministic
//!   tie-breaking, the partition property, perfect-reconstruction
//!   assignment, and the `array_split` sizing of the initial split.

use ndarray::Array2;
use rayon::prelude::*;

use crate::clustering::core::cpca::CommonSpace;
use crate::clustering::core::data::MTSDataset;
use crate::clustering::core::metrics::{DistanceMetric, StepDistance};

/// Assignment — the outcome of one assignment pass.
///
/// Fields
/// ------
/// - `labels`: `Vec<usize>`
///   Cluster id in [0, K) per sample, indexed by sample identity.
/// - `errors`: `Vec<f64>`
///   The minimum reconstruction error per sample (the error against its
///   assigned cluster); +∞ only when every cluster was null.
///
/// Notes
/// -----
/// - Both vectors have length n and share the dataset's sample order; the
///   fit loop averages `errors` for the convergence trace.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub labels: Vec<usize>,
    pub errors: Vec<f64>,
}

/// Assign every sample to its minimum-reconstruction-error cluster.
///
/// Parameters
/// ----------
/// - `data`: `&MTSDataset`
///   Centered dataset of n samples with m variables each.
/// - `spaces`: `&[Option<CommonSpace>]`
///   K common spaces; `None` marks an empty cluster and scores +∞ for
///   every sample.
/// - `metric`: `DistanceMetric`
///   Per-time-step distance, resolved once to a function pointer before
///   the loop.
///
/// Returns
/// -------
/// `Assignment`
///   Labels and minimum errors for all n samples. Ties on the minimum
///   error resolve to the lowest cluster index.
///
/// Notes
/// -----
/// - Projectors are built once per cluster, outside the per-sample loop.
/// - The per-sample work is embarrassingly parallel and runs under
///   rayon with no shared mutable state.
pub fn assign_clusters(
    data: &MTSDataset, spaces: &[Option<CommonSpace>], metric: DistanceMetric,
) -> Assignment {
    let step = metric.step_fn();
    let projectors: Vec<Option<Array2<f64>>> =
        spaces.iter().map(|space| space.as_ref().map(CommonSpace::projector)).collect();

    let per_sample: Vec<(usize, f64)> = data
        .samples()
        .par_iter()
        .map(|obs| {
            let mut best_cluster = 0usize;
            let mut best_error = f64::INFINITY;
            for (k, projector) in projectors.iter().enumerate() {
                let error = match projector {
                    Some(p) => reconstruction_error(obs, p, step),
                    None => f64::INFINITY,
                };
                // Strict < keeps the lowest index on ties.
                if error < best_error {
                    best_error = error;
                    best_cluster = k;
                }
            }
            (best_cluster, best_error)
        })
        .collect();

    let (labels, errors) = per_sample.into_iter().unzip();
    Assignment { labels, errors }
}

/// Mean per-time-step distance between a sample and its reconstruction.
///
/// Parameters
/// ----------
/// - `obs`: `&Array2<f64>`
///   Centered L×m observation matrix T_i.
/// - `projector`: `&Array2<f64>`
///   m×m reconstruction projector P_k.
/// - `step`: `StepDistance`
///   Per-time-step distance function.
///
/// Returns
/// -------
/// `f64`
///   (1/L) Σ_t step(T_i[t], (T_i·P_k)[t]); ≥ 0 for every supported
///   metric.
fn reconstruction_error(obs: &Array2<f64>, projector: &Array2<f64>, step: StepDistance) -> f64 {
    let reconstructed = obs.dot(projector);
    let len = obs.nrows();
    let mut total = 0.0;
    for t in 0..len {
        total += step(obs.row(t), reconstructed.row(t));
    }
    total / len as f64
}

/// Convert a label vector into K cluster index sets.
///
/// Parameters
/// ----------
/// - `labels`: `&[usize]`
///   Cluster id per sample, each in [0, K).
/// - `k`: `usize`
///   Number of clusters.
///
/// Returns
/// -------
/// `Vec<Vec<usize>>`
///   K index sets, pairwise disjoint, whose union is 0..labels.len();
///   members appear in ascending sample order.
pub fn cluster_index_sets(labels: &[usize], k: usize) -> Vec<Vec<usize>> {
    let mut clusters = vec![Vec::new(); k];
    for (sample, &label) in labels.iter().enumerate() {
        clusters[label].push(sample);
    }
    clusters
}

/// Contiguous, roughly-equal initial split of 0..n into K chunks.
///
/// Mirrors NumPy's `array_split`: the first `n % k` chunks get
/// `n / k + 1` members, the rest `n / k`; chunks beyond n are empty.
///
/// Parameters
/// ----------
/// - `n`: `usize`
///   Number of samples.
/// - `k`: `usize`
///   Number of clusters; must be > 0 (validated upstream by the
///   configuration layer).
///
/// Returns
/// -------
/// `Vec<Vec<usize>>`
///   K contiguous index chunks in order, non-empty whenever `n ≥ k`.
pub fn split_even(n: usize, k: usize) -> Vec<Vec<usize>> {
    let base = n / k;
    let remainder = n % k;
    let mut clusters = Vec::with_capacity(k);
    let mut start = 0usize;
    for chunk in 0..k {
        let size = if chunk < remainder { base + 1 } else { base };
        clusters.push((start..start + size).collect());
        start += size;
    }
    clusters
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clustering::core::covariance::covariance_matrices;
    use crate::clustering::core::cpca::compute_common_spaces;
    use crate::clustering::core::data::MTSDataset;
    use ndarray::{array, Array1};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Null common spaces yielding +∞ and never winning the argmin.
    // - The all-null fallback to cluster 0.
    // - Deterministic lowest-index tie-breaking.
    // - Near-zero error when a sample lies in a cluster's subspace.
    // - The partition property of `cluster_index_sets`.
    // - NumPy `array_split` sizing of `split_even`, including K > n.
    //
    // They intentionally DO NOT cover:
    // - The fit loop's convergence behavior (models::mc2pca).
    // -------------------------------------------------------------------------

    /// Two-variable dataset where var2 = slope · var1, so each sample's
    /// dominant direction is (1, slope)/‖·‖.
    fn line_dataset(slopes: &[f64]) -> MTSDataset {
        let base = [0.5, -1.0, 1.5, -0.5, 2.0, -1.5, 1.0, -2.0, 0.25, 0.75];
        let samples = slopes
            .iter()
            .map(|&slope| {
                let x = Array1::from_iter(base.iter().copied());
                let y = Array1::from_iter(base.iter().map(|v| v * slope));
                vec![x, y]
            })
            .collect();
        MTSDataset::from_series(samples).expect("valid dataset should construct").centered()
    }

    #[test]
    // Purpose
    // -------
    // Verify the empty-cluster safety property: a null space scores +∞
    // and is never selected while any non-null space exists.
    //
    // Given
    // -----
    // - Two samples along (1, 1); spaces = [None, Some(span{(1,1)})].
    //
    // Expect
    // ------
    // - Every label is 1 and every error is finite.
    fn assign_clusters_never_selects_null_space() {
        // Arrange
        let data = line_dataset(&[1.0, 1.0]);
        let covs = covariance_matrices(&data);
        let spaces = compute_common_spaces(&covs, &[vec![], vec![0, 1]], 1)
            .expect("extraction should succeed");

        // Act
        let assignment = assign_clusters(&data, &spaces, DistanceMetric::Euclidean);

        // Assert
        assert!(assignment.labels.iter().all(|&label| label == 1));
        assert!(assignment.errors.iter().all(|&e| e.is_finite()));
    }

    #[test]
    // Purpose
    // -------
    // Check the all-null fallback: with every cluster empty, the argmin
    // over an all-infinite row lands on cluster 0.
    //
    // Given
    // -----
    // - One sample and spaces = [None, None].
    //
    // Expect
    // ------
    // - Label 0 with error +∞.
    fn assign_clusters_all_null_falls_back_to_cluster_zero() {
        // Arrange
        let data = line_dataset(&[1.0]);

        // Act
        let assignment = assign_clusters(&data, &[None, None], DistanceMetric::Euclidean);

        // Assert
        assert_eq!(assignment.labels, vec![0]);
        assert!(assignment.errors[0].is_infinite());
    }

    #[test]
    // Purpose
    // -------
    // Verify deterministic tie-breaking: identical spaces produce equal
    // errors, and the lowest cluster index must win.
    //
    // Given
    // -----
    // - Two clusters with the same common space.
    //
    // Expect
    // ------
    // - Every sample is labeled 0.
    fn assign_clusters_breaks_ties_by_lowest_index() {
        // Arrange
        let data = line_dataset(&[1.0, 1.0]);
        let covs = covariance_matrices(&data);
        let spaces = compute_common_spaces(&covs, &[vec![0, 1], vec![0, 1]], 1)
            .expect("extraction should succeed");

        // Act
        let assignment = assign_clusters(&data, &spaces, DistanceMetric::Euclidean);

        // Assert
        assert!(assignment.labels.iter().all(|&label| label == 0));
    }

    #[test]
    // Purpose
    // -------
    // Check that samples lying inside a cluster's subspace reconstruct
    // with near-zero error and are assigned there over a mismatched
    // cluster.
    //
    // Given
    // -----
    // - Samples along (1, 1) and (1, −1); cluster 0 fitted on the (1, 1)
    //   samples, cluster 1 on the (1, −1) samples.
    //
    // Expect
    // ------
    // - Labels follow the generating direction; in-subspace errors are
    //   ~0 for euclidean, l1, and cosine alike.
    fn assign_clusters_matches_generating_subspace() {
        // Arrange
        let data = line_dataset(&[1.0, 1.0, -1.0, -1.0]);
        let covs = covariance_matrices(&data);
        let spaces = compute_common_spaces(&covs, &[vec![0, 1], vec![2, 3]], 1)
            .expect("extraction should succeed");

        // Act & Assert
        for metric in [DistanceMetric::Euclidean, DistanceMetric::L1, DistanceMetric::Cosine] {
            let assignment = assign_clusters(&data, &spaces, metric);
            assert_eq!(assignment.labels, vec![0, 0, 1, 1], "metric {metric}");
            assert!(
                assignment.errors.iter().all(|&e| e.abs() < 1e-10),
                "metric {metric}: errors {:?}",
                assignment.errors
            );
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify the partition property of `cluster_index_sets`: disjoint
    // sets whose union is the full sample range.
    //
    // Given
    // -----
    // - Labels [1, 0, 2, 1, 0] with K = 3.
    //
    // Expect
    // ------
    // - Sets {1, 4}, {0, 3}, {2}; sizes sum to n.
    fn cluster_index_sets_partitions_sample_range() {
        // Arrange
        let labels = [1usize, 0, 2, 1, 0];

        // Act
        let clusters = cluster_index_sets(&labels, 3);

        // Assert
        assert_eq!(clusters, vec![vec![1, 4], vec![0, 3], vec![2]]);
        let total: usize = clusters.iter().map(Vec::len).sum();
        assert_eq!(total, labels.len());
    }

    #[test]
    // Purpose
    // -------
    // Pin the NumPy `array_split` sizing of the initial split, including
    // the K > n case that produces empty trailing chunks.
    //
    // Given
    // -----
    // - (n, K) = (7, 3) and (2, 4).
    //
    // Expect
    // ------
    // - (7, 3) → sizes [3, 2, 2] with contiguous ascending members.
    // - (2, 4) → [[0], [1], [], []].
    fn split_even_matches_array_split_sizing() {
        // Act
        let seven_three = split_even(7, 3);
        let two_four = split_even(2, 4);

        // Assert
        assert_eq!(seven_three, vec![vec![0, 1, 2], vec![3, 4], vec![5, 6]]);
        assert_eq!(two_four, vec![vec![0], vec![1], vec![], vec![]]);
    }
}
