//! clustering — multivariate time-series clustering by common principal
//! component analysis.
//!
//! Purpose
//! -------
//! Implement the Mc2PCA algorithm (Li, 2019): cluster a collection of
//! multivariate time series by alternating between extracting one shared
//! low-dimensional subspace per cluster (from mean covariance matrices)
//! and reassigning each series to the cluster whose subspace reconstructs
//! it best. This subtree holds the full pipeline — validated data
//! containers, covariance estimation, common-space extraction, distance
//! metrics, assignment, configuration, error handling, and the fit loop
//! itself.
//!
//! Key behaviors
//! -------------
//! - Build datasets through [`MTSDataset`], which validates shape
//!   consistency and finiteness up front.
//! - Configure a run through [`Mc2PCAOptions`] and [`DistanceMetric`];
//!   every knob is checked at construction so no configuration error can
//!   surface mid-iteration.
//! - Fit with [`Mc2PCAModel::fit`], which returns an immutable
//!   [`Mc2PCAFit`] carrying the per-cluster subspaces, final partition,
//!   error trace, and terminal state ([`Termination`]).
//! - Assign held-out data with [`Mc2PCAFit::infer`], which reuses the
//!   frozen subspaces without re-estimating anything.
//!
//! Invariants & assumptions
//! ------------------------
//! - Samples share a variable cardinality m; series lengths may differ
//!   per sample. Inference inputs must match the training m.
//! - All user-facing failures are reported through [`ClusterResult`] and
//!   carry a [`ClusterError`] naming the offending value; panics indicate
//!   programming errors, not bad inputs.
//! - Empty clusters are tolerated throughout: they carry `None` common
//!   spaces, price every sample at +∞ during assignment, and are
//!   reported as-is in the final partition.
//!
//! Conventions
//! -----------
//! - Determinism: identical inputs and configuration produce identical
//!   results. Tie-breaks go to the lowest cluster index, initial
//!   partitions are contiguous index chunks, and parallel reductions
//!   preserve the sequential reduction order.
//! - Exhausting the iteration bound is a normal terminal state
//!   ([`Termination::MaxIterReached`]) with a usable result, not an
//!   error.
//!
//! Downstream usage
//! ----------------
//! - Typical Rust code imports the main surface as:
//!
//!   ```rust,ignore
//!   use mc2pca::clustering::{MTSDataset, Mc2PCAModel, Mc2PCAOptions};
//!
//!   let options = Mc2PCAOptions::with_defaults(k, p)?;
//!   let fit = Mc2PCAModel::new(options).fit(&dataset)?;
//!   let clusters = fit.clusters();
//!   ```
//!
//!   and only reaches into `clustering::core` directly when reusing the
//!   numeric building blocks (covariance estimation, common-space
//!   extraction) outside the fit loop.
//! - The Python bindings at the crate root wrap [`Mc2PCAModel`] and
//!   [`Mc2PCAFit`] behind a single stateful class, relying on
//!   `From<ClusterError> for PyErr` at the boundary.
//!
//! Testing notes
//! -------------
//! - Unit tests live beside each submodule; the crate-level integration
//!   test exercises the full fit/infer pipeline on synthetic
//!   two-direction datasets.

pub mod core;
pub mod errors;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::data::MTSDataset;
pub use self::core::metrics::DistanceMetric;
pub use self::core::options::{Mc2PCAOptions, DEFAULT_EPSILON, DEFAULT_MAX_ITER};
pub use self::errors::{ClusterError, ClusterResult};
pub use self::models::mc2pca::{Mc2PCAFit, Mc2PCAModel, Termination};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use mc2pca::clustering::prelude::*;
//
// to import the main clustering surface in a single line.

pub mod prelude {
    pub use super::core::data::MTSDataset;
    pub use super::core::metrics::DistanceMetric;
    pub use super::core::options::Mc2PCAOptions;
    pub use super::errors::{ClusterError, ClusterResult};
    pub use super::models::mc2pca::{Mc2PCAFit, Mc2PCAModel, Termination};
}
