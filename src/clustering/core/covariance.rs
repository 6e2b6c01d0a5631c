//! core::covariance — per-sample covariance estimation.
//!
//! Purpose
//! -------
//! Compute one m×m covariance matrix per sample from its centered
//! observation matrix, treating the sample's own time axis as the
//! observations. These matrices are the raw material for common-subspace
//! extraction; they are computed once per fit and indexed by cluster
//! membership thereafter.
//!
//! Key behaviors
//! -------------
//! - Use the **population** (biased, divide-by-L) convention. This matches
//!   the reference behavior and matters for numerical reproducibility; it
//!   is deliberately not the sample (divide-by-L−1) convention.
//! - Propagate rank-deficient matrices as-is when L < 2; degeneracy is the
//!   extractor's concern, not an error here.
//! - Parallelize across samples with rayon — each sample's covariance is
//!   independent and reads only its own matrix.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs come from [`MTSDataset::centered`]; each observation matrix
//!   already has per-column zero mean, so no re-centering happens here.
//! - Outputs are symmetric positive-semidefinite up to floating point
//!   rounding.
//!
//! Conventions
//! -----------
//! - Σ_i = T_iᵀ · T_i / L_i for the L_i×m observation matrix T_i.
//! - No I/O, no logging; this module is pure computation.
//!
//! Testing notes
//! -------------
//! - Unit tests pin the divide-by-L convention against hand-computed
//!   values and check symmetry and the L = 1 degenerate case.

use ndarray::Array2;
use rayon::prelude::*;

use crate::clustering::core::data::MTSDataset;

/// Covariance of one centered sample under the population convention.
///
/// Parameters
/// ----------
/// - `obs`: `&Array2<f64>`
///   Centered `L × m` observation matrix (rows = time steps, columns =
///   variables) with `L ≥ 1`.
///
/// Returns
/// -------
/// `Array2<f64>`
///   The m×m matrix `obsᵀ · obs / L`. Symmetric and positive-semidefinite
///   up to rounding; rank-deficient whenever `L < m`.
///
/// Notes
/// -----
/// - The caller is responsible for centering; passing raw data yields a
///   second-moment matrix, not a covariance.
pub fn sample_covariance(obs: &Array2<f64>) -> Array2<f64> {
    let len = obs.nrows() as f64;
    obs.t().dot(obs) / len
}

/// Covariance matrices for every sample of a centered dataset.
///
/// Parameters
/// ----------
/// - `data`: `&MTSDataset`
///   A centered dataset (see [`MTSDataset::centered`]).
///
/// Returns
/// -------
/// `Vec<Array2<f64>>`
///   One m×m covariance matrix per sample, in sample order, so matrix `i`
///   corresponds to sample identity `i` throughout the fit loop.
///
/// Notes
/// -----
/// - Samples are processed in parallel; order is preserved by rayon's
///   indexed collect.
pub fn covariance_matrices(data: &MTSDataset) -> Vec<Array2<f64>> {
    data.samples().par_iter().map(sample_covariance).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clustering::core::data::MTSDataset;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The divide-by-L (population) convention against hand values.
    // - Symmetry of the output.
    // - The degenerate L = 1 case producing a zero matrix for centered
    //   input rather than an error.
    //
    // They intentionally DO NOT cover:
    // - Dataset validation (core::data) or what the extractor does with
    //   rank-deficient matrices (core::cpca).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Pin the population convention: for centered series x = (-1, 0, 1)
    // and y = (1, 0, -1), the covariance entries are Σxy / 3, not / 2.
    //
    // Given
    // -----
    // - A 3×2 centered observation matrix with the above columns.
    //
    // Expect
    // ------
    // - cov = [[2/3, -2/3], [-2/3, 2/3]].
    fn sample_covariance_uses_population_convention() {
        // Arrange
        let obs = array![[-1.0, 1.0], [0.0, 0.0], [1.0, -1.0]];

        // Act
        let cov = sample_covariance(&obs);

        // Assert
        let expected = array![[2.0 / 3.0, -2.0 / 3.0], [-2.0 / 3.0, 2.0 / 3.0]];
        for ((i, j), &value) in cov.indexed_iter() {
            assert!(
                (value - expected[[i, j]]).abs() < 1e-12,
                "cov[{i},{j}] = {value}, expected {}",
                expected[[i, j]]
            );
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify symmetry of the estimator on a non-trivial matrix.
    //
    // Given
    // -----
    // - A 4×3 centered observation matrix with mixed signs.
    //
    // Expect
    // ------
    // - cov[i][j] == cov[j][i] exactly (same products, same order).
    fn sample_covariance_is_symmetric() {
        // Arrange
        let obs = array![
            [0.5, -1.0, 0.25],
            [-0.5, 1.5, -0.75],
            [1.0, -0.5, 0.5],
            [-1.0, 0.0, 0.0]
        ];

        // Act
        let cov = sample_covariance(&obs);

        // Assert
        for i in 0..3 {
            for j in 0..3 {
                assert!(
                    (cov[[i, j]] - cov[[j, i]]).abs() < 1e-15,
                    "asymmetry at ({i},{j})"
                );
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure the degenerate single-time-step case is propagated as a
    // matrix (all zeros after centering), not treated as an error.
    //
    // Given
    // -----
    // - A dataset with one sample of length-1 series, centered.
    //
    // Expect
    // ------
    // - `covariance_matrices` yields one 2×2 zero matrix.
    fn covariance_matrices_degenerate_length_one_is_zero() {
        // Arrange
        let data = MTSDataset::from_series(vec![vec![array![5.0], array![-2.0]]])
            .expect("valid dataset should construct")
            .centered();

        // Act
        let covs = covariance_matrices(&data);

        // Assert
        assert_eq!(covs.len(), 1);
        assert_eq!(covs[0].dim(), (2, 2));
        assert!(covs[0].iter().all(|&v| v.abs() < 1e-15));
    }
}
