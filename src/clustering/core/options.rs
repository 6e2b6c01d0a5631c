//! core::options — validated Mc2PCA configuration.
//!
//! Purpose
//! -------
//! Bundle the full configuration surface of the clustering algorithm —
//! cluster count K, retained dimension p, convergence threshold epsilon,
//! iteration bound max_iter, and distance metric — behind a validating
//! constructor so that configuration errors surface eagerly, before any
//! computation starts, and never during iteration.
//!
//! Key behaviors
//! -------------
//! - Reject K = 0, p = 0, non-positive/NaN epsilon, and max_iter = 0 at
//!   construction.
//! - Accept epsilon = +∞: per the convergence contract, an infinite
//!   threshold means the fit loop converges on its first iteration.
//! - Defer the p ≤ m check to fit time, when the dataset's variable
//!   count is known.
//!
//! Conventions
//! -----------
//! - Defaults mirror the reference implementation: epsilon = 1e-7,
//!   max_iter = 100, metric = euclidean.
//!
//! Testing notes
//! -------------
//! - Unit tests cover each rejection branch, acceptance of the defaults,
//!   and acceptance of an infinite epsilon.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::clustering::core::metrics::DistanceMetric;
use crate::clustering::errors::{ClusterError, ClusterResult};

/// Default convergence threshold.
pub const DEFAULT_EPSILON: f64 = 1e-7;

/// Default iteration bound.
pub const DEFAULT_MAX_ITER: usize = 100;

/// Mc2PCAOptions — the algorithm's configuration surface.
///
/// Purpose
/// -------
/// Carry the validated (K, p, epsilon, max_iter, metric) tuple through
/// model construction, fitting, and the stored model state.
///
/// Fields
/// ------
/// - `k`: `usize` — number of clusters, > 0.
/// - `p`: `usize` — retained subspace dimension, > 0 and ≤ m (the m
///   bound is checked at fit time against the dataset).
/// - `epsilon`: `f64` — convergence threshold, > 0; +∞ is allowed and
///   makes the first iteration converge immediately.
/// - `max_iter`: `usize` — iteration bound, > 0.
/// - `metric`: [`DistanceMetric`] — reconstruction-error distance.
///
/// Invariants
/// ----------
/// - Any value obtained through [`Mc2PCAOptions::new`] satisfies the
///   bounds above; fields are read-only thereafter.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Mc2PCAOptions {
    k: usize,
    p: usize,
    epsilon: f64,
    max_iter: usize,
    metric: DistanceMetric,
}

impl Mc2PCAOptions {
    /// Build a validated configuration.
    ///
    /// Parameters
    /// ----------
    /// - `k`: number of clusters; must be > 0.
    /// - `p`: retained dimension; must be > 0 (the ≤ m bound is enforced
    ///   at fit time).
    /// - `epsilon`: convergence threshold; must satisfy `epsilon > 0`
    ///   (NaN fails this comparison and is rejected); +∞ is accepted.
    /// - `max_iter`: iteration bound; must be > 0.
    /// - `metric`: distance metric for reconstruction error.
    ///
    /// Returns
    /// -------
    /// `ClusterResult<Mc2PCAOptions>`
    ///   The validated configuration.
    ///
    /// Errors
    /// ------
    /// - `ClusterError::InvalidClusterCount` when `k == 0`.
    /// - `ClusterError::InvalidRetainedDims` when `p == 0`.
    /// - `ClusterError::InvalidEpsilon` when `epsilon` is NaN or ≤ 0.
    /// - `ClusterError::InvalidMaxIter` when `max_iter == 0`.
    pub fn new(
        k: usize, p: usize, epsilon: f64, max_iter: usize, metric: DistanceMetric,
    ) -> ClusterResult<Self> {
        if k == 0 {
            return Err(ClusterError::InvalidClusterCount { k });
        }
        if p == 0 {
            return Err(ClusterError::InvalidRetainedDims { p });
        }
        if !(epsilon > 0.0) {
            return Err(ClusterError::InvalidEpsilon { value: epsilon });
        }
        if max_iter == 0 {
            return Err(ClusterError::InvalidMaxIter { value: max_iter });
        }
        Ok(Mc2PCAOptions { k, p, epsilon, max_iter, metric })
    }

    /// Configuration with reference defaults: epsilon = 1e-7,
    /// max_iter = 100, metric = euclidean.
    pub fn with_defaults(k: usize, p: usize) -> ClusterResult<Self> {
        Mc2PCAOptions::new(k, p, DEFAULT_EPSILON, DEFAULT_MAX_ITER, DistanceMetric::Euclidean)
    }

    /// Number of clusters K.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Retained subspace dimension p.
    pub fn p(&self) -> usize {
        self.p
    }

    /// Convergence threshold epsilon.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Iteration bound max_iter.
    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    /// Distance metric for reconstruction error.
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }
}
