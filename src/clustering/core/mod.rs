//! clustering::core — numeric building blocks of the Mc2PCA pipeline.
//!
//! Purpose
//! -------
//! Collect the data-shaping and linear-algebra layers that the fit loop
//! composes: validated dataset construction and centering ([`data`]),
//! per-sample covariance estimation ([`covariance`]), common-space
//! extraction by eigendecomposition of mean covariances ([`cpca`]),
//! reconstruction-error distances ([`metrics`]), nearest-subspace
//! assignment ([`assign`]), and the validated configuration surface
//! ([`options`]).
//!
//! Key behaviors
//! -------------
//! - Every public entry point either takes already-validated inputs
//!   (documented per function) or returns
//!   [`ClusterResult`](crate::clustering::errors::ClusterResult) so shape
//!   and configuration problems surface before iteration starts.
//! - Per-sample work in [`covariance`] and [`assign`] parallelizes with
//!   rayon; everything else is single-threaded and deterministic.
//! - Empty clusters flow through as `None` common spaces and are never
//!   an error at this layer.
//!
//! Invariants & assumptions
//! ------------------------
//! - Samples are `Array2<f64>` with rows as time steps and columns as
//!   variables; all samples in one dataset share the variable count m,
//!   while series lengths may differ per sample.
//! - Covariance and extraction operate on *centered* data; centering is
//!   the caller's responsibility via [`data::MTSDataset::centered`].
//! - All floating-point data is finite by construction
//!   ([`data::MTSDataset::from_series`] rejects NaN and ±∞); infinities
//!   appear only as the deliberate null-space and trace-sentinel markers.
//!
//! Conventions
//! -----------
//! - Covariances use the population convention (divide by the series
//!   length L, not L − 1).
//! - Eigenvalues are squared before ranking, matching a singular-value
//!   treatment of the symmetric mean covariance.
//! - Ties in assignment resolve to the lowest cluster index.
//!
//! Downstream usage
//! ----------------
//! - [`crate::clustering::models::mc2pca`] is the only intended
//!   orchestrator; it owns sequencing, convergence, and logging while
//!   this subtree stays pure.
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests against hand-computed values
//!   (covariance entries, DTW tables, dominant eigenvectors) rather than
//!   round-trip identities.

pub mod assign;
pub mod covariance;
pub mod cpca;
pub mod data;
pub mod metrics;
pub mod options;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::assign::{assign_clusters, cluster_index_sets, split_even, Assignment};
pub use self::covariance::{covariance_matrices, sample_covariance};
pub use self::cpca::{common_space, compute_common_spaces, CommonSpace};
pub use self::data::MTSDataset;
pub use self::metrics::DistanceMetric;
pub use self::options::{Mc2PCAOptions, DEFAULT_EPSILON, DEFAULT_MAX_ITER};
