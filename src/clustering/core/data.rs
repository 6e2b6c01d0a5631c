//! core::data — validated multivariate time-series datasets and centering.
//!
//! Purpose
//! -------
//! Define the dataset container consumed by the Mc2PCA pipeline: an ordered
//! collection of samples, each sample an observation matrix with time steps
//! as rows and variables as columns. Construction validates the shape
//! contract once so every downstream stage (covariance estimation, subspace
//! extraction, assignment) can assume well-formed inputs.
//!
//! Key behaviors
//! -------------
//! - Build an [`MTSDataset`] either from per-variable series
//!   ([`MTSDataset::from_series`]) or from pre-stacked observation matrices
//!   ([`MTSDataset::from_observations`]).
//! - Enforce the shape contract at construction: a non-empty dataset, a
//!   consistent variable count across samples, non-empty equal-length
//!   series within each sample, and finite values throughout.
//! - Produce a derived, per-series zero-mean dataset via
//!   [`MTSDataset::centered`]; the source dataset is never mutated.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every stored observation matrix is `L_i × m` with `L_i ≥ 1` and the
//!   same `m` for all samples; `L_i` may vary per sample.
//! - All stored values are finite (`!NaN`, not ±∞).
//! - The sample index 0..n-1 is the canonical sample identity used by
//!   cluster memberships and error vectors; this module preserves input
//!   order.
//!
//! Conventions
//! -----------
//! - Rows are time steps, columns are variables, matching the observation
//!   matrix `T_i` used by the assigner (`Y_i = T_i · P_k`).
//! - This module performs no I/O and no logging; invalid inputs are
//!   surfaced as [`ClusterResult`] values, never panics.
//!
//! Downstream usage
//! ----------------
//! - `clustering::core::covariance` consumes a *centered* dataset to build
//!   per-sample covariance matrices.
//! - `clustering::models::mc2pca` centers once at fit/inference entry and
//!   threads the derived dataset through the pipeline.
//!
//! Testing notes
//! -------------
//! - Unit tests cover each validation branch of both constructors and the
//!   zero-mean property of [`MTSDataset::centered`].

use ndarray::{Array1, Array2, Axis};

use crate::clustering::errors::{ClusterError, ClusterResult};

/// MTSDataset — an ordered, validated collection of multivariate
/// time-series samples.
///
/// Purpose
/// -------
/// Own the observation matrices for all samples and expose the shape
/// metadata (sample count, variable count) that the rest of the pipeline
/// relies on.
///
/// Fields
/// ------
/// - `samples`: `Vec<Array2<f64>>`
///   One `L_i × m` observation matrix per sample, rows = time steps,
///   columns = variables.
/// - `n_vars`: `usize`
///   The shared variable count `m` (> 0).
///
/// Invariants
/// ----------
/// - `samples` is non-empty; each matrix has `n_vars` columns, at least
///   one row, and only finite entries. Both constructors enforce this.
///
/// Notes
/// -----
/// - Samples are immutable once loaded; [`MTSDataset::centered`] returns a
///   new dataset rather than mutating in place.
#[derive(Debug, Clone, PartialEq)]
pub struct MTSDataset {
    samples: Vec<Array2<f64>>,
    n_vars: usize,
}

impl MTSDataset {
    /// Build a dataset from per-variable series.
    ///
    /// Parameters
    /// ----------
    /// - `samples`: `Vec<Vec<Array1<f64>>>`
    ///   Outer index = sample, inner index = variable. All samples must
    ///   carry the same number of variable series; within one sample all
    ///   series must be non-empty and equal-length (series length may vary
    ///   *across* samples).
    ///
    /// Returns
    /// -------
    /// `ClusterResult<MTSDataset>`
    ///   The validated dataset, with each sample's series stacked into an
    ///   `L_i × m` observation matrix (series j becomes column j).
    ///
    /// Errors
    /// ------
    /// - `ClusterError::EmptyDataset` when `samples` is empty.
    /// - `ClusterError::NoVariables` when a sample has zero series.
    /// - `ClusterError::VariableCountMismatch` when a sample's series count
    ///   differs from sample 0's.
    /// - `ClusterError::EmptySeries` when any series has length 0.
    /// - `ClusterError::SeriesLengthMismatch` when series lengths differ
    ///   within one sample.
    /// - `ClusterError::NonFiniteValue` when any entry is NaN or ±∞.
    pub fn from_series(samples: Vec<Vec<Array1<f64>>>) -> ClusterResult<Self> {
        if samples.is_empty() {
            return Err(ClusterError::EmptyDataset);
        }
        let n_vars = samples[0].len();
        if n_vars == 0 {
            return Err(ClusterError::NoVariables { sample: 0 });
        }

        let mut observations = Vec::with_capacity(samples.len());
        for (i, series_list) in samples.iter().enumerate() {
            if series_list.is_empty() {
                return Err(ClusterError::NoVariables { sample: i });
            }
            if series_list.len() != n_vars {
                return Err(ClusterError::VariableCountMismatch {
                    sample: i,
                    expected: n_vars,
                    actual: series_list.len(),
                });
            }
            let len = series_list[0].len();
            let mut obs = Array2::<f64>::zeros((len, n_vars));
            for (j, series) in series_list.iter().enumerate() {
                if series.is_empty() {
                    return Err(ClusterError::EmptySeries { sample: i, variable: j });
                }
                if series.len() != len {
                    return Err(ClusterError::SeriesLengthMismatch {
                        sample: i,
                        variable: j,
                        expected: len,
                        actual: series.len(),
                    });
                }
                for (t, &value) in series.iter().enumerate() {
                    if !value.is_finite() {
                        return Err(ClusterError::NonFiniteValue {
                            sample: i,
                            variable: j,
                            index: t,
                            value,
                        });
                    }
                    obs[[t, j]] = value;
                }
            }
            observations.push(obs);
        }

        Ok(MTSDataset { samples: observations, n_vars })
    }

    /// Build a dataset from pre-stacked observation matrices.
    ///
    /// Parameters
    /// ----------
    /// - `samples`: `Vec<Array2<f64>>`
    ///   One `L_i × m` matrix per sample, rows = time steps, columns =
    ///   variables. All matrices must have the same column count, at least
    ///   one row, and finite entries.
    ///
    /// Returns
    /// -------
    /// `ClusterResult<MTSDataset>`
    ///   The validated dataset, taking ownership of the matrices.
    ///
    /// Errors
    /// ------
    /// - Same taxonomy as [`MTSDataset::from_series`]; an empty matrix
    ///   (zero rows) maps to `ClusterError::EmptySeries` for variable 0.
    pub fn from_observations(samples: Vec<Array2<f64>>) -> ClusterResult<Self> {
        if samples.is_empty() {
            return Err(ClusterError::EmptyDataset);
        }
        let n_vars = samples[0].ncols();
        if n_vars == 0 {
            return Err(ClusterError::NoVariables { sample: 0 });
        }

        for (i, obs) in samples.iter().enumerate() {
            if obs.ncols() == 0 {
                return Err(ClusterError::NoVariables { sample: i });
            }
            if obs.ncols() != n_vars {
                return Err(ClusterError::VariableCountMismatch {
                    sample: i,
                    expected: n_vars,
                    actual: obs.ncols(),
                });
            }
            if obs.nrows() == 0 {
                return Err(ClusterError::EmptySeries { sample: i, variable: 0 });
            }
            for ((t, j), &value) in obs.indexed_iter() {
                if !value.is_finite() {
                    return Err(ClusterError::NonFiniteValue {
                        sample: i,
                        variable: j,
                        index: t,
                        value,
                    });
                }
            }
        }

        Ok(MTSDataset { samples, n_vars })
    }

    /// Number of samples n.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the dataset holds no samples. Constructors reject this
    /// state, so it only arises on a default-like value built elsewhere.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Shared variable count m.
    pub fn n_vars(&self) -> usize {
        self.n_vars
    }

    /// Observation matrix of sample `i` (`L_i × m`).
    ///
    /// Panics
    /// ------
    /// - Panics if `i >= self.len()`; sample indices come from this
    ///   dataset's own 0..n-1 range.
    pub fn sample(&self, i: usize) -> &Array2<f64> {
        &self.samples[i]
    }

    /// All observation matrices in sample order.
    pub fn samples(&self) -> &[Array2<f64>] {
        &self.samples
    }

    /// Derive a dataset where every variable series has had its own
    /// arithmetic mean subtracted.
    ///
    /// Returns
    /// -------
    /// `MTSDataset`
    ///   A new dataset of identical shape with per-column zero mean in
    ///   every sample. Deterministic; cannot fail because constructors
    ///   already reject empty series (the only undefined-mean case).
    ///
    /// Notes
    /// -----
    /// - Centering an already-centered dataset is a no-op up to floating
    ///   point rounding.
    pub fn centered(&self) -> MTSDataset {
        let centered = self
            .samples
            .iter()
            .map(|obs| {
                let len = obs.nrows() as f64;
                let mut out = obs.clone();
                for mut column in out.axis_iter_mut(Axis(1)) {
                    let mean = column.sum() / len;
                    column.mapv_inplace(|v| v - mean);
                }
                out
            })
            .collect();

        MTSDataset { samples: centered, n_vars: self.n_vars }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Every validation branch of `from_series` and `from_observations`.
    // - Stacking order (series j becomes column j).
    // - The per-series zero-mean property of `centered`.
    //
    // They intentionally DO NOT cover:
    // - Covariance or assignment behavior on datasets; those live in their
    //   own modules and the integration pipeline test.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that `from_series` stacks each sample's variable series as
    // columns of an L×m observation matrix, preserving sample order.
    //
    // Given
    // -----
    // - Two samples with two variables of length 3.
    //
    // Expect
    // ------
    // - n = 2, m = 2, and sample 0's matrix holds series 0 in column 0.
    fn from_series_stacks_variables_as_columns() {
        // Arrange
        let samples = vec![
            vec![array![1.0, 2.0, 3.0], array![4.0, 5.0, 6.0]],
            vec![array![7.0, 8.0, 9.0], array![10.0, 11.0, 12.0]],
        ];

        // Act
        let data = MTSDataset::from_series(samples).expect("valid dataset should construct");

        // Assert
        assert_eq!(data.len(), 2);
        assert_eq!(data.n_vars(), 2);
        assert_eq!(data.sample(0), &array![[1.0, 4.0], [2.0, 5.0], [3.0, 6.0]]);
    }

    #[test]
    // Purpose
    // -------
    // Ensure each shape-contract violation is rejected with the matching
    // error variant rather than a panic.
    //
    // Given
    // -----
    // - An empty dataset, a sample with no series, a variable-count
    //   mismatch, an empty series, a length mismatch, and a NaN entry.
    //
    // Expect
    // ------
    // - `from_series` returns the corresponding `ClusterError` variant.
    fn from_series_rejects_each_shape_violation() {
        // Act & Assert: empty dataset
        assert_eq!(MTSDataset::from_series(vec![]), Err(ClusterError::EmptyDataset));

        // Act & Assert: zero variables
        assert_eq!(
            MTSDataset::from_series(vec![vec![]]),
            Err(ClusterError::NoVariables { sample: 0 })
        );

        // Act & Assert: variable-count mismatch in sample 1
        let mismatch = vec![
            vec![array![1.0, 2.0], array![3.0, 4.0]],
            vec![array![5.0, 6.0]],
        ];
        assert_eq!(
            MTSDataset::from_series(mismatch),
            Err(ClusterError::VariableCountMismatch { sample: 1, expected: 2, actual: 1 })
        );

        // Act & Assert: empty series
        let empty_series = vec![vec![Array1::<f64>::zeros(0), array![1.0, 2.0]]];
        assert_eq!(
            MTSDataset::from_series(empty_series),
            Err(ClusterError::EmptySeries { sample: 0, variable: 0 })
        );

        // Act & Assert: unequal series lengths inside one sample
        let ragged = vec![vec![array![1.0, 2.0, 3.0], array![4.0, 5.0]]];
        assert_eq!(
            MTSDataset::from_series(ragged),
            Err(ClusterError::SeriesLengthMismatch {
                sample: 0,
                variable: 1,
                expected: 3,
                actual: 2
            })
        );

        // Act & Assert: non-finite value
        let non_finite = vec![vec![array![1.0, f64::NAN], array![3.0, 4.0]]];
        match MTSDataset::from_series(non_finite) {
            Err(ClusterError::NonFiniteValue { sample: 0, variable: 0, index: 1, value }) => {
                assert!(value.is_nan());
            }
            other => panic!("expected NonFiniteValue, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that `from_observations` accepts valid matrices and rejects
    // column-count mismatches and non-finite entries.
    //
    // Given
    // -----
    // - Two 2×2 matrices, then a variant with a 2×1 second matrix, then a
    //   variant with an infinite entry.
    //
    // Expect
    // ------
    // - The valid input constructs; the invalid ones return the matching
    //   error variants.
    fn from_observations_validates_shape_and_values() {
        // Arrange
        let ok = vec![array![[1.0, 2.0], [3.0, 4.0]], array![[5.0, 6.0], [7.0, 8.0]]];
        let ragged = vec![array![[1.0, 2.0], [3.0, 4.0]], array![[5.0], [7.0]]];
        let infinite = vec![array![[1.0, f64::INFINITY], [3.0, 4.0]]];

        // Act & Assert
        assert!(MTSDataset::from_observations(ok).is_ok());
        assert_eq!(
            MTSDataset::from_observations(ragged),
            Err(ClusterError::VariableCountMismatch { sample: 1, expected: 2, actual: 1 })
        );
        match MTSDataset::from_observations(infinite) {
            Err(ClusterError::NonFiniteValue { sample: 0, variable: 1, index: 0, value }) => {
                assert!(value.is_infinite());
            }
            other => panic!("expected NonFiniteValue, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Check that `centered` removes each variable series' own mean while
    // leaving the source dataset untouched.
    //
    // Given
    // -----
    // - One sample with two variables whose means are 2.0 and -1.0.
    //
    // Expect
    // ------
    // - Every column of the centered sample sums to ~0.
    // - The original dataset still holds the raw values.
    fn centered_produces_zero_mean_columns() {
        // Arrange
        let data = MTSDataset::from_series(vec![vec![
            array![1.0, 2.0, 3.0],
            array![-3.0, 0.0, 0.0],
        ]])
        .expect("valid dataset should construct");

        // Act
        let centered = data.centered();

        // Assert
        for j in 0..centered.n_vars() {
            let column_sum: f64 = centered.sample(0).column(j).sum();
            assert!(column_sum.abs() < 1e-12, "column {j} sum should be ~0, got {column_sum}");
        }
        assert_eq!(data.sample(0)[[0, 0]], 1.0);
    }
}
