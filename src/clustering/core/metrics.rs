//! core::metrics — per-time-step distance metrics for reconstruction error.
//!
//! Purpose
//! -------
//! Define the closed set of distance metrics the assigner may use to score
//! how well a cluster's subspace reconstructs a time step, plus the parse
//! and dispatch plumbing around it. A metric is selected once at
//! configuration time and resolved to a plain function pointer, so the hot
//! assignment loop performs no string comparison or dynamic dispatch.
//!
//! Key behaviors
//! -------------
//! - [`DistanceMetric`] is a closed enumeration {euclidean, l1, cosine,
//!   dtw}; unknown names are rejected at parse time as a configuration
//!   error (`FromStr`, case-insensitive).
//! - [`DistanceMetric::step_fn`] maps each variant to a pure
//!   `(original, reconstructed) → scalar` function evaluated per time
//!   step; the assigner averages these over the time axis.
//! - The dtw variant runs a scalar dynamic-time-warping DP between the
//!   two m-length variable vectors of one time step. This per-step usage
//!   is unusual (DTW normally compares whole series) but is preserved
//!   from the reference implementation as specified.
//!
//! Invariants & assumptions
//! ------------------------
//! - Both input vectors have the same length (the variable count m); the
//!   assigner guarantees this by construction.
//! - Every metric returns a finite value ≥ 0 for finite inputs, and 0 for
//!   identical inputs.
//!
//! Conventions
//! -----------
//! - Cosine distance is 1 − cosine similarity, clamped at 0 to absorb
//!   rounding; the zero-vector cases are defined deterministically (both
//!   zero → 0, exactly one zero → 1) instead of propagating NaN.
//! - DTW uses absolute difference as the local cost and the classic
//!   three-predecessor recurrence.
//!
//! Testing notes
//! -------------
//! - Unit tests cover parsing (including rejection), the
//!   zero-for-identical-inputs property across metrics, non-negativity,
//!   hand-computed values for each metric, and the DTW warping behavior.

use std::str::FromStr;

use ndarray::ArrayView1;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::clustering::errors::ClusterError;

/// Signature of a per-time-step distance: original row vs reconstructed
/// row, both of length m.
pub type StepDistance = fn(ArrayView1<'_, f64>, ArrayView1<'_, f64>) -> f64;

/// Choice of distance metric for reconstruction error.
///
/// Variants:
/// - `Euclidean`: per-time-step L2 norm of the residual.
/// - `L1`: per-time-step L1 norm of the residual.
/// - `Cosine`: per-time-step cosine distance (1 − cosine similarity).
/// - `Dtw`: per-time-step scalar DTW between the two variable vectors.
///
/// Parsing:
/// This enum implements `FromStr` and accepts case-insensitive names
/// (`"euclidean"`, `"l1"`, `"cosine"`, `"dtw"`). Unknown names return
/// `ClusterError::UnknownMetric`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DistanceMetric {
    Euclidean,
    L1,
    Cosine,
    Dtw,
}

impl DistanceMetric {
    /// Resolve this metric to its per-time-step distance function.
    ///
    /// Returns
    /// -------
    /// `StepDistance`
    ///   A plain function pointer; resolving once at configuration time
    ///   keeps the assignment loop free of per-step dispatch.
    pub fn step_fn(self) -> StepDistance {
        match self {
            DistanceMetric::Euclidean => euclidean_step,
            DistanceMetric::L1 => l1_step,
            DistanceMetric::Cosine => cosine_step,
            DistanceMetric::Dtw => dtw_step,
        }
    }

    /// Canonical lower-case name, the inverse of `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            DistanceMetric::Euclidean => "euclidean",
            DistanceMetric::L1 => "l1",
            DistanceMetric::Cosine => "cosine",
            DistanceMetric::Dtw => "dtw",
        }
    }
}

impl std::fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DistanceMetric {
    type Err = ClusterError;

    /// Parse a metric choice from a string (case-insensitive).
    ///
    /// Accepts `"euclidean"`, `"l1"`, `"cosine"`, `"dtw"` in any case
    /// variant. Any other value returns `ClusterError::UnknownMetric`,
    /// keeping the enumeration closed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "euclidean" => Ok(DistanceMetric::Euclidean),
            "l1" => Ok(DistanceMetric::L1),
            "cosine" => Ok(DistanceMetric::Cosine),
            "dtw" => Ok(DistanceMetric::Dtw),
            _ => Err(ClusterError::UnknownMetric { name: s.to_string() }),
        }
    }
}

/// L2 norm of the residual x − y.
#[inline]
fn euclidean_step(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> f64 {
    x.iter()
        .zip(y.iter())
        .map(|(a, b)| (a - b) * (a - b))
        .sum::<f64>()
        .sqrt()
}

/// L1 norm of the residual x − y.
#[inline]
fn l1_step(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> f64 {
    x.iter().zip(y.iter()).map(|(a, b)| (a - b).abs()).sum::<f64>()
}

/// Cosine distance 1 − ⟨x, y⟩ / (‖x‖·‖y‖).
///
/// Zero-norm conventions: both vectors zero → 0 (identical); exactly one
/// zero → 1 (no shared direction). The result is clamped at 0 so rounding
/// never produces a negative distance.
#[inline]
fn cosine_step(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> f64 {
    let dot: f64 = x.iter().zip(y.iter()).map(|(a, b)| a * b).sum();
    let norm_x = x.iter().map(|a| a * a).sum::<f64>().sqrt();
    let norm_y = y.iter().map(|b| b * b).sum::<f64>().sqrt();

    if norm_x == 0.0 && norm_y == 0.0 {
        return 0.0;
    }
    if norm_x == 0.0 || norm_y == 0.0 {
        return 1.0;
    }
    (1.0 - dot / (norm_x * norm_y)).max(0.0)
}

/// Scalar dynamic-time-warping distance between two sequences.
///
/// Classic DP over the |x| × |y| grid with absolute difference as the
/// local cost and predecessors {match, insertion, deletion}; the returned
/// value is the unnormalized cumulative cost of the optimal warping path.
/// Two-row rolling buffers keep memory at O(|y|).
#[inline]
fn dtw_step(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> f64 {
    let n = x.len();
    let m = y.len();
    if n == 0 || m == 0 {
        return if n == m { 0.0 } else { f64::INFINITY };
    }

    let mut prev = vec![f64::INFINITY; m + 1];
    let mut curr = vec![f64::INFINITY; m + 1];
    prev[0] = 0.0;

    for i in 1..=n {
        curr[0] = f64::INFINITY;
        for j in 1..=m {
            let cost = (x[i - 1] - y[j - 1]).abs();
            curr[j] = cost + prev[j - 1].min(prev[j]).min(curr[j - 1]);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[m]
}
