//! models::mc2pca — the Mc2PCA fit loop, model state, and inference.
//!
//! Purpose
//! -------
//! Orchestrate multivariate time-series clustering by common principal
//! component analysis (Li, 2019): center the data, estimate one covariance
//! matrix per sample, seed K contiguous clusters, then alternate
//! {assign → extract} until the mean reconstruction error stabilizes. The
//! converged subspaces are exposed as an immutable [`Mc2PCAFit`] value for
//! reuse at inference time.
//!
//! Key behaviors
//! -------------
//! - `INIT`: center, compute per-sample covariances once, split sample
//!   indices into K contiguous roughly-equal chunks, extract initial
//!   common spaces (empty chunks → `None`), and seed the error trace with
//!   a +∞ sentinel.
//! - `ITERATING`: run the assigner with the current spaces, append the
//!   mean per-sample minimum error to the trace, and test convergence on
//!   the last two trace entries **before** committing the new clustering.
//!   On convergence the spaces and index sets from before the triggering
//!   recompute are the result; otherwise the partition and spaces are
//!   recomputed from the new labels and iteration continues.
//! - Terminal states: `CONVERGED` when the error delta drops below
//!   epsilon (an infinite epsilon converges on the first iteration), or
//!   `MAX_ITER_REACHED` when the bound is exhausted — a normal outcome,
//!   not a failure, keeping the last recomputed spaces/partition.
//! - Inference centers new data and runs the assigner once against the
//!   frozen spaces; nothing is re-estimated.
//!
//! Invariants & assumptions
//! ------------------------
//! - Per-sample covariances are computed once at INIT and indexed by
//!   cluster membership thereafter; iteration never re-reads raw data.
//! - The fit result is immutable: [`Mc2PCAFit`] has no mutating methods
//!   and [`Mc2PCAFit::infer`] takes `&self`.
//! - Configuration is validated before any computation
//!   ([`Mc2PCAOptions::new`] plus the fit-time p ≤ m check); no
//!   configuration error can surface mid-iteration.
//! - The error trace is monotonically non-increasing in well-behaved
//!   runs but this is not guaranteed and not enforced.
//!
//! Conventions
//! -----------
//! - Iterations are strictly sequential (each depends on the previous);
//!   within one iteration the per-sample work parallelizes in the
//!   assigner. Progress is reported through the `log` facade at debug
//!   level; the numeric core below this module stays logging-free.
//!
//! Downstream usage
//! ----------------
//! - Rust callers: build [`Mc2PCAOptions`], wrap in [`Mc2PCAModel`],
//!   call [`Mc2PCAModel::fit`], keep the returned [`Mc2PCAFit`] for
//!   inference or persistence (serde behind the `serde` feature).
//! - The Python bindings in the crate root wrap exactly this surface.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the epsilon = +∞ single-iteration contract, the
//!   4-sample concrete scenario, reassignment across a bad initial
//!   split, empty-cluster tolerance (K > n), inference idempotence, and
//!   the fit-time p ≤ m rejection.

use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::clustering::core::assign::{assign_clusters, cluster_index_sets, split_even};
use crate::clustering::core::covariance::covariance_matrices;
use crate::clustering::core::cpca::{compute_common_spaces, CommonSpace};
use crate::clustering::core::data::MTSDataset;
use crate::clustering::core::options::Mc2PCAOptions;
use crate::clustering::errors::{ClusterError, ClusterResult};

/// Terminal state of the fit loop.
///
/// Both variants are normal outcomes carrying a usable result; neither is
/// an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Termination {
    /// The last two error-trace entries differed by less than epsilon
    /// after `iterations` assignment passes.
    Converged { iterations: usize },
    /// The iteration bound was exhausted without meeting the threshold.
    MaxIterReached,
}

/// Mc2PCAModel — a configured, not-yet-fitted clustering model.
///
/// Purpose
/// -------
/// Pair a validated [`Mc2PCAOptions`] with the fit entry point. The model
/// itself holds no data and no results; fitting returns a separate
/// immutable [`Mc2PCAFit`] value, so one model can fit many datasets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mc2PCAModel {
    options: Mc2PCAOptions,
}

/// Mc2PCAFit — the immutable result of one fit.
///
/// Purpose
/// -------
/// Hold everything a caller needs after fitting: the per-cluster common
/// spaces, the final partition, the error trace, and the terminal state,
/// alongside the configuration that produced them. Consumed read-only by
/// [`Mc2PCAFit::infer`]; never mutated after fit completes.
///
/// Fields
/// ------
/// - `options`: the configuration the fit ran under.
/// - `n_vars`: variable cardinality m of the training data; inference
///   inputs must match it.
/// - `spaces`: K common spaces; `None` marks a cluster that was empty at
///   the last extraction.
/// - `clusters`: K pairwise-disjoint index sets partitioning 0..n-1.
/// - `error_trace`: per-iteration mean reconstruction errors, seeded
///   with the +∞ sentinel at index 0.
/// - `termination`: how the loop ended.
///
/// Invariants
/// ----------
/// - `spaces.len() == clusters.len() == options.k()`.
/// - `error_trace.len() ≥ 2` (the sentinel plus at least one iteration).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Mc2PCAFit {
    options: Mc2PCAOptions,
    n_vars: usize,
    spaces: Vec<Option<CommonSpace>>,
    clusters: Vec<Vec<usize>>,
    error_trace: Vec<f64>,
    termination: Termination,
}

impl Mc2PCAModel {
    /// Wrap a validated configuration.
    pub fn new(options: Mc2PCAOptions) -> Self {
        Mc2PCAModel { options }
    }

    /// The configuration this model fits under.
    pub fn options(&self) -> &Mc2PCAOptions {
        &self.options
    }

    /// Fit the model to a dataset.
    ///
    /// Parameters
    /// ----------
    /// - `data`: `&MTSDataset`
    ///   Validated raw dataset of n samples with m variables; centering
    ///   happens internally, the input is not modified.
    ///
    /// Returns
    /// -------
    /// `ClusterResult<Mc2PCAFit>`
    ///   The immutable fit result on either terminal state.
    ///
    /// Errors
    /// ------
    /// - `ClusterError::RetainedDimsExceedVariables` when the configured
    ///   p exceeds the dataset's variable count — the one configuration
    ///   check that needs the data, performed before any computation.
    ///
    /// Notes
    /// -----
    /// - On convergence at iteration t, the returned spaces and index
    ///   sets are the ones the converging assignment was computed
    ///   *against* (the recompute for iteration t is not committed); the
    ///   trace still includes iteration t's mean error. On
    ///   `MaxIterReached` the last recomputed spaces/partition stand.
    pub fn fit(&self, data: &MTSDataset) -> ClusterResult<Mc2PCAFit> {
        let k = self.options.k();
        let p = self.options.p();
        if p > data.n_vars() {
            return Err(ClusterError::RetainedDimsExceedVariables { p, n_vars: data.n_vars() });
        }

        let n = data.len();
        let centered = data.centered();
        let covariances = covariance_matrices(&centered);

        let mut clusters = split_even(n, k);
        let mut spaces = compute_common_spaces(&covariances, &clusters, p)?;
        let mut error_trace = vec![f64::INFINITY];
        let mut termination = Termination::MaxIterReached;

        for iteration in 1..=self.options.max_iter() {
            let assignment = assign_clusters(&centered, &spaces, self.options.metric());
            let mean_error = assignment.errors.iter().sum::<f64>() / n as f64;
            error_trace.push(mean_error);
            debug!(
                "mc2pca iteration {iteration}: mean reconstruction error {mean_error:.6e}"
            );

            if has_converged(error_trace[iteration - 1], mean_error, self.options.epsilon()) {
                termination = Termination::Converged { iterations: iteration };
                debug!("mc2pca converged after {iteration} iteration(s)");
                break;
            }

            clusters = cluster_index_sets(&assignment.labels, k);
            spaces = compute_common_spaces(&covariances, &clusters, p)?;
        }

        Ok(Mc2PCAFit {
            options: self.options,
            n_vars: data.n_vars(),
            spaces,
            clusters,
            error_trace,
            termination,
        })
    }
}

/// Convergence test on two consecutive error-trace entries.
///
/// An infinite threshold accepts any change — including the initial step
/// away from the +∞ sentinel, whose delta is itself infinite — so
/// epsilon = +∞ converges on the first iteration by design.
#[inline]
fn has_converged(previous: f64, current: f64, epsilon: f64) -> bool {
    if epsilon.is_infinite() {
        return true;
    }
    (previous - current).abs() < epsilon
}

impl Mc2PCAFit {
    /// The configuration the fit ran under.
    pub fn options(&self) -> &Mc2PCAOptions {
        &self.options
    }

    /// Variable cardinality m of the training data.
    pub fn n_vars(&self) -> usize {
        self.n_vars
    }

    /// Per-cluster common spaces; `None` for clusters empty at the last
    /// extraction.
    pub fn spaces(&self) -> &[Option<CommonSpace>] {
        &self.spaces
    }

    /// Final cluster index sets, pairwise disjoint, union 0..n-1.
    pub fn clusters(&self) -> &[Vec<usize>] {
        &self.clusters
    }

    /// Per-iteration mean reconstruction errors; entry 0 is the +∞
    /// sentinel.
    pub fn error_trace(&self) -> &[f64] {
        &self.error_trace
    }

    /// How the fit loop terminated.
    pub fn termination(&self) -> Termination {
        self.termination
    }

    /// Retained-information fraction per cluster, from the last
    /// successful extraction; `None` for empty clusters.
    pub fn retained_info(&self) -> Vec<Option<f64>> {
        self.spaces.iter().map(|space| space.as_ref().map(CommonSpace::retained_info)).collect()
    }

    /// Assign new samples with the frozen model.
    ///
    /// Parameters
    /// ----------
    /// - `data`: `&MTSDataset`
    ///   Held-out dataset with the same variable cardinality m as the
    ///   training data; series lengths may differ.
    ///
    /// Returns
    /// -------
    /// `ClusterResult<Vec<Vec<usize>>>`
    ///   K cluster index sets over the new dataset's 0..n-1 range. No
    ///   error trace, no subspace recomputation: the model is frozen,
    ///   and calling this twice on the same input yields identical sets.
    ///
    /// Errors
    /// ------
    /// - `ClusterError::InferVariableMismatch` when the new dataset's
    ///   variable count differs from the training cardinality.
    pub fn infer(&self, data: &MTSDataset) -> ClusterResult<Vec<Vec<usize>>> {
        if data.n_vars() != self.n_vars {
            return Err(ClusterError::InferVariableMismatch {
                expected: self.n_vars,
                actual: data.n_vars(),
            });
        }

        let centered = data.centered();
        let assignment = assign_clusters(&centered, &self.spaces, self.options.metric());
        Ok(cluster_index_sets(&assignment.labels, self.options.k()))
    }
}
