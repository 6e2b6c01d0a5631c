//! core::cpca — common principal component extraction per cluster.
//!
//! Purpose
//! -------
//! Extract the shared low-rank subspace ("common space") of a cluster from
//! the covariance matrices of its members: average the matrices
//! element-wise, eigendecompose the mean, and keep the top-p principal
//! directions together with the fraction of variance they explain.
//!
//! Key behaviors
//! -------------
//! - Copy the `ndarray` mean covariance into a `nalgebra::DMatrix` and run
//!   a symmetric eigendecomposition on it.
//! - Report eigenvalues on the **squared** scale (squared singular values
//!   of the mean matrix), preserving the reference implementation's
//!   SVD-based convention; for a symmetric PSD matrix the singular values
//!   coincide with the eigenvalues, so the eigenvectors are unaffected.
//! - Sort principal directions by descending squared eigenvalue with an
//!   explicit index sort — the decomposition library's own ordering is
//!   not relied upon.
//! - Map empty clusters to `None` in the per-cluster driver rather than
//!   erroring: a degenerate cluster is a designed steady state.
//!
//! Invariants & assumptions
//! ------------------------
//! - All input covariance matrices are m×m and symmetric up to rounding
//!   (guaranteed by `core::covariance` on validated datasets).
//! - The returned basis has orthonormal columns (eigenvectors of a
//!   symmetric matrix) ordered by descending squared eigenvalue.
//! - Tie-break between equal eigenvalues is implementation-defined and
//!   not a correctness requirement.
//!
//! Conventions
//! -----------
//! - `retained_info = Σ top-p λ² / Σ all λ²`, with the 0/0 case (an
//!   all-zero mean matrix) defined as 0.
//! - Errors are reported via [`ClusterResult`]; an empty member set is the
//!   caller's responsibility and surfaces as
//!   [`ClusterError::EmptyCovarianceSet`].
//!
//! Testing notes
//! -------------
//! - Unit tests cover the top-p eigenspace on a known diagonal matrix,
//!   the projector-commutes-with-M property, retained-information values,
//!   and both error branches.

use nalgebra::DMatrix;
use ndarray::Array2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::clustering::errors::{ClusterError, ClusterResult};

/// CommonSpace — the shared top-p subspace of one cluster.
///
/// Purpose
/// -------
/// Represent a cluster's common principal directions as an m×p basis with
/// orthonormal columns plus the retained-information fraction of the
/// extraction that produced it.
///
/// Fields
/// ------
/// - `basis`: `Array2<f64>`
///   m×p matrix whose columns are the top-p eigenvectors of the cluster's
///   mean covariance, ordered by descending (squared) eigenvalue.
/// - `retained_info`: `f64`
///   Fraction of total (squared-scale) variance captured by the top-p
///   directions, in [0, 1].
///
/// Invariants
/// ----------
/// - Columns are orthonormal up to floating point rounding, so
///   `projector()` is symmetric and idempotent.
///
/// Notes
/// -----
/// - Column signs are decomposition-dependent; the projector, which is
///   what the assigner consumes, is sign-invariant.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CommonSpace {
    basis: Array2<f64>,
    retained_info: f64,
}

impl CommonSpace {
    /// The m×p orthonormal basis.
    pub fn basis(&self) -> &Array2<f64> {
        &self.basis
    }

    /// Fraction of variance retained by the basis, in [0, 1].
    pub fn retained_info(&self) -> f64 {
        self.retained_info
    }

    /// Number of variables m the basis spans.
    pub fn n_vars(&self) -> usize {
        self.basis.nrows()
    }

    /// Number of retained dimensions p.
    pub fn retained_dims(&self) -> usize {
        self.basis.ncols()
    }

    /// The m×m reconstruction projector P = S · Sᵀ.
    ///
    /// Returns
    /// -------
    /// `Array2<f64>`
    ///   Symmetric, idempotent projector onto the common space. Built once
    ///   per cluster per assignment pass, then applied to every sample.
    pub fn projector(&self) -> Array2<f64> {
        self.basis.dot(&self.basis.t())
    }
}

/// Extract the common space of one non-empty set of covariance matrices.
///
/// Parameters
/// ----------
/// - `covariances`: `&[&Array2<f64>]`
///   The member covariance matrices of one cluster; all m×m with the same
///   m, non-empty.
/// - `p`: `usize`
///   Number of principal directions to retain; `0 < p ≤ m`.
///
/// Returns
/// -------
/// `ClusterResult<CommonSpace>`
///   The top-p common space of the element-wise mean matrix together with
///   the retained-information fraction.
///
/// Errors
/// ------
/// - `ClusterError::EmptyCovarianceSet` when `covariances` is empty —
///   by contract the per-cluster driver filters empty clusters first.
/// - `ClusterError::InvalidRetainedDims` when `p == 0`.
/// - `ClusterError::RetainedDimsExceedVariables` when `p > m`.
/// - `ClusterError::CovarianceDimMismatch` when any matrix is not m×m.
///
/// Notes
/// -----
/// - Eigenvalues are squared before ranking and summing, matching the
///   reference implementation's squared-singular-value convention. For a
///   PSD mean matrix this changes the retained-information ratio but not
///   the selected directions.
pub fn common_space(covariances: &[&Array2<f64>], p: usize) -> ClusterResult<CommonSpace> {
    let first = covariances.first().ok_or(ClusterError::EmptyCovarianceSet)?;
    let m = first.nrows();
    if p == 0 {
        return Err(ClusterError::InvalidRetainedDims { p });
    }
    if p > m {
        return Err(ClusterError::RetainedDimsExceedVariables { p, n_vars: m });
    }

    let mut mean = Array2::<f64>::zeros((m, m));
    for cov in covariances {
        if cov.nrows() != m || cov.ncols() != m {
            return Err(ClusterError::CovarianceDimMismatch {
                expected: m,
                rows: cov.nrows(),
                cols: cov.ncols(),
            });
        }
        mean += *cov;
    }
    mean /= covariances.len() as f64;

    // ndarray → nalgebra bridge; column-major writes.
    let mut mean_nalg = DMatrix::<f64>::zeros(m, m);
    for j in 0..m {
        for i in 0..m {
            mean_nalg[(i, j)] = mean[[i, j]];
        }
    }
    let eigen = mean_nalg.symmetric_eigen();

    // Rank directions by descending squared eigenvalue; nalgebra does not
    // guarantee any eigenvalue ordering.
    let squared: Vec<f64> = eigen.eigenvalues.iter().map(|&lambda| lambda * lambda).collect();
    let mut order: Vec<usize> = (0..m).collect();
    order.sort_by(|&a, &b| {
        squared[b].partial_cmp(&squared[a]).unwrap_or(std::cmp::Ordering::Equal)
    });

    let total: f64 = squared.iter().sum();
    let retained: f64 = order[..p].iter().map(|&idx| squared[idx]).sum();
    let retained_info = if total > 0.0 { retained / total } else { 0.0 };

    let mut basis = Array2::<f64>::zeros((m, p));
    for (out_col, &in_col) in order[..p].iter().enumerate() {
        for row in 0..m {
            basis[[row, out_col]] = eigen.eigenvectors[(row, in_col)];
        }
    }

    Ok(CommonSpace { basis, retained_info })
}

/// Common spaces for every cluster of a partition.
///
/// Parameters
/// ----------
/// - `covariances`: `&[Array2<f64>]`
///   Per-sample covariance matrices indexed by sample identity.
/// - `clusters`: `&[Vec<usize>]`
///   K member index sets; indices must be valid for `covariances`.
/// - `p`: `usize`
///   Retained dimension forwarded to [`common_space`].
///
/// Returns
/// -------
/// `ClusterResult<Vec<Option<CommonSpace>>>`
///   One entry per cluster: `Some(space)` for non-empty clusters, `None`
///   for empty ones (the assigner maps `None` to infinite error).
///
/// Errors
/// ------
/// - Propagates [`common_space`] errors for non-empty clusters.
///
/// Panics
/// ------
/// - Panics if a member index is out of range for `covariances`; the fit
///   loop only produces indices from the dataset's own 0..n-1 range.
pub fn compute_common_spaces(
    covariances: &[Array2<f64>], clusters: &[Vec<usize>], p: usize,
) -> ClusterResult<Vec<Option<CommonSpace>>> {
    clusters
        .iter()
        .map(|members| {
            if members.is_empty() {
                Ok(None)
            } else {
                let selected: Vec<&Array2<f64>> =
                    members.iter().map(|&i| &covariances[i]).collect();
                common_space(&selected, p).map(Some)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Recovery of the top-p eigenspace of a known diagonal matrix.
    // - The projector P = S·Sᵀ commuting with a shared covariance M.
    // - Retained-information values on the squared-eigenvalue scale.
    // - Error branches: empty set, p = 0, p > m, dimension mismatch.
    // - `None` spaces for empty clusters in the per-cluster driver.
    //
    // They intentionally DO NOT cover:
    // - Assignment behavior given the extracted spaces (core::assign).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that for identical diagonal covariances the returned top-1
    // basis spans the dominant eigenspace (up to sign).
    //
    // Given
    // -----
    // - Three copies of M = diag(4, 1) and p = 1.
    //
    // Expect
    // ------
    // - The basis column is ±e1.
    // - retained_info = 16 / (16 + 1) on the squared scale.
    fn common_space_recovers_dominant_eigenvector() {
        // Arrange
        let m = array![[4.0, 0.0], [0.0, 1.0]];
        let covs = vec![&m, &m, &m];

        // Act
        let space = common_space(&covs, 1).expect("extraction should succeed");

        // Assert
        let basis = space.basis();
        assert_eq!(basis.dim(), (2, 1));
        assert!(
            (basis[[0, 0]].abs() - 1.0).abs() < 1e-10 && basis[[1, 0]].abs() < 1e-10,
            "basis should be ±e1, got {basis:?}"
        );
        let expected_info = 16.0 / 17.0;
        assert!(
            (space.retained_info() - expected_info).abs() < 1e-12,
            "retained_info = {}, expected {expected_info}",
            space.retained_info()
        );
    }

    #[test]
    // Purpose
    // -------
    // Check the CPCA round-trip property: when every member covariance is
    // the same matrix M, the projector P = S·Sᵀ commutes with M.
    //
    // Given
    // -----
    // - Two copies of a non-diagonal symmetric 2×2 matrix, p = 1.
    //
    // Expect
    // ------
    // - ‖P·M − M·P‖∞ below numerical tolerance, and P idempotent.
    fn common_space_projector_commutes_with_shared_covariance() {
        // Arrange
        let m = array![[2.0, 1.0], [1.0, 2.0]];
        let covs = vec![&m, &m];

        // Act
        let space = common_space(&covs, 1).expect("extraction should succeed");
        let projector = space.projector();

        // Assert: commutation
        let pm = projector.dot(&m);
        let mp = m.dot(&projector);
        for ((i, j), &value) in pm.indexed_iter() {
            assert!(
                (value - mp[[i, j]]).abs() < 1e-10,
                "P·M and M·P differ at ({i},{j})"
            );
        }

        // Assert: idempotence
        let pp = projector.dot(&projector);
        for ((i, j), &value) in pp.indexed_iter() {
            assert!((value - projector[[i, j]]).abs() < 1e-10, "P·P ≠ P at ({i},{j})");
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure a full-rank request retains all information.
    //
    // Given
    // -----
    // - One 2×2 covariance matrix and p = m = 2.
    //
    // Expect
    // ------
    // - retained_info = 1 up to rounding; basis is 2×2.
    fn common_space_full_rank_retains_everything() {
        // Arrange
        let m = array![[3.0, 0.5], [0.5, 1.0]];

        // Act
        let space = common_space(&[&m], 2).expect("extraction should succeed");

        // Assert
        assert_eq!(space.basis().dim(), (2, 2));
        assert!((space.retained_info() - 1.0).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Exercise every error branch of `common_space`.
    //
    // Given
    // -----
    // - An empty set; p = 0; p = 3 > m = 2; a 1×2 "covariance".
    //
    // Expect
    // ------
    // - The matching `ClusterError` variant for each case.
    fn common_space_rejects_invalid_inputs() {
        // Arrange
        let m = array![[1.0, 0.0], [0.0, 1.0]];
        let bad = array![[1.0, 0.0]];

        // Act & Assert
        assert_eq!(common_space(&[], 1), Err(ClusterError::EmptyCovarianceSet));
        assert_eq!(common_space(&[&m], 0), Err(ClusterError::InvalidRetainedDims { p: 0 }));
        assert_eq!(
            common_space(&[&m], 3),
            Err(ClusterError::RetainedDimsExceedVariables { p: 3, n_vars: 2 })
        );
        assert_eq!(
            common_space(&[&m, &bad], 1),
            Err(ClusterError::CovarianceDimMismatch { expected: 2, rows: 1, cols: 2 })
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify that the per-cluster driver maps empty clusters to `None`
    // and non-empty clusters to extracted spaces.
    //
    // Given
    // -----
    // - Two sample covariances, a partition {∅, {0, 1}}, p = 1.
    //
    // Expect
    // ------
    // - Entry 0 is `None`; entry 1 is `Some` with a 2×1 basis.
    fn compute_common_spaces_maps_empty_cluster_to_none() {
        // Arrange
        let covs = vec![array![[1.0, 0.0], [0.0, 2.0]], array![[3.0, 0.0], [0.0, 1.0]]];
        let clusters = vec![vec![], vec![0, 1]];

        // Act
        let spaces = compute_common_spaces(&covs, &clusters, 1)
            .expect("driver should succeed on a valid partition");

        // Assert
        assert_eq!(spaces.len(), 2);
        assert!(spaces[0].is_none());
        let space = spaces[1].as_ref().expect("cluster 1 is non-empty");
        assert_eq!(space.basis().dim(), (2, 1));
    }
}
