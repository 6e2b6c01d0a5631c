//! Errors for Mc2PCA clustering (configuration checks, dataset shape
//! validation, and model-state guards).
//!
//! This module defines the clustering error type, [`ClusterError`], used
//! across the Rust core and the Python-facing API. It implements
//! `Display`/`Error` and converts to `PyErr` when the `python-bindings`
//! feature is enabled.
//!
//! ## Conventions
//! - **Indices are 0-based** (match Rust/NumPy); error payloads report
//!   sample, variable, and time-step indices in that convention.
//! - Configuration errors (K, p, epsilon, max_iter, metric name) are
//!   raised eagerly before any computation starts, never mid-iteration.
//! - Shape errors are raised when a dataset is constructed, so downstream
//!   numerical code can assume well-formed inputs.
//! - An empty cluster during iteration is **not** an error: it is modeled
//!   as a `None` common space with infinite reconstruction error and never
//!   surfaces through this type.

#[cfg(feature = "python-bindings")]
use pyo3::exceptions::PyValueError;
#[cfg(feature = "python-bindings")]
use pyo3::prelude::*;

/// Crate-wide result alias for clustering operations that may produce
/// [`ClusterError`].
pub type ClusterResult<T> = Result<T, ClusterError>;

/// Unified error type for Mc2PCA clustering.
///
/// Covers configuration validation, dataset shape validation, and
/// model-state guards for the binding layer. Implements `Display`/`Error`
/// and converts to a Python `ValueError` at PyO3 boundaries.
#[derive(Debug, Clone, PartialEq)]
pub enum ClusterError {
    // ---- Configuration validation ----
    /// Number of clusters K must be > 0.
    InvalidClusterCount { k: usize },

    /// Retained dimension p must be > 0.
    InvalidRetainedDims { p: usize },

    /// Retained dimension p must not exceed the number of variables m.
    RetainedDimsExceedVariables { p: usize, n_vars: usize },

    /// Convergence threshold epsilon must be > 0 (an infinite threshold is
    /// allowed and means "converge on the first iteration").
    InvalidEpsilon { value: f64 },

    /// Iteration bound max_iter must be > 0.
    InvalidMaxIter { value: usize },

    /// Distance metric name is not one of the supported set.
    UnknownMetric { name: String },

    // ---- Dataset shape validation ----
    /// Dataset contains no samples.
    EmptyDataset,

    /// A sample carries zero variable series.
    NoVariables { sample: usize },

    /// A sample's variable count differs from the first sample's.
    VariableCountMismatch { sample: usize, expected: usize, actual: usize },

    /// A variable series has length 0 (its mean is undefined).
    EmptySeries { sample: usize, variable: usize },

    /// Variable series within one sample have unequal lengths.
    SeriesLengthMismatch { sample: usize, variable: usize, expected: usize, actual: usize },

    /// A data point is NaN/±inf.
    NonFiniteValue { sample: usize, variable: usize, index: usize, value: f64 },

    // ---- Subspace extraction ----
    /// CPCA was asked to average an empty set of covariance matrices.
    EmptyCovarianceSet,

    /// A covariance matrix has an unexpected dimension.
    CovarianceDimMismatch { expected: usize, rows: usize, cols: usize },

    // ---- Model state ----
    /// Inference input has a different variable cardinality than training.
    InferVariableMismatch { expected: usize, actual: usize },

    /// Model hasn't been fitted yet.
    ModelNotFitted,
}

impl std::error::Error for ClusterError {}

impl std::fmt::Display for ClusterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Configuration validation ----
            ClusterError::InvalidClusterCount { k } => {
                write!(f, "Number of clusters K must be > 0; got: {k}")
            }
            ClusterError::InvalidRetainedDims { p } => {
                write!(f, "Retained dimension p must be > 0; got: {p}")
            }
            ClusterError::RetainedDimsExceedVariables { p, n_vars } => {
                write!(
                    f,
                    "Retained dimension p ({p}) must not exceed the number of variables ({n_vars})."
                )
            }
            ClusterError::InvalidEpsilon { value } => {
                write!(f, "Convergence threshold epsilon must be > 0; got: {value}")
            }
            ClusterError::InvalidMaxIter { value } => {
                write!(f, "Iteration bound max_iter must be > 0; got: {value}")
            }
            ClusterError::UnknownMetric { name } => {
                write!(
                    f,
                    "Unknown distance metric {name:?} (expected 'euclidean', 'l1', 'cosine', or 'dtw')."
                )
            }
            // ---- Dataset shape validation ----
            ClusterError::EmptyDataset => {
                write!(f, "Input dataset contains no samples.")
            }
            ClusterError::NoVariables { sample } => {
                write!(f, "Sample {sample} carries zero variable series.")
            }
            ClusterError::VariableCountMismatch { sample, expected, actual } => {
                write!(
                    f,
                    "Sample {sample} has {actual} variable series; expected {expected} as in sample 0."
                )
            }
            ClusterError::EmptySeries { sample, variable } => {
                write!(
                    f,
                    "Variable series {variable} of sample {sample} is empty; its mean is undefined."
                )
            }
            ClusterError::SeriesLengthMismatch { sample, variable, expected, actual } => {
                write!(
                    f,
                    "Variable series {variable} of sample {sample} has length {actual}; expected {expected} to match the sample's other series."
                )
            }
            ClusterError::NonFiniteValue { sample, variable, index, value } => {
                write!(
                    f,
                    "Non-finite value {value} at time step {index} of variable {variable}, sample {sample}."
                )
            }
            // ---- Subspace extraction ----
            ClusterError::EmptyCovarianceSet => {
                write!(f, "Cannot extract a common space from an empty set of covariance matrices.")
            }
            ClusterError::CovarianceDimMismatch { expected, rows, cols } => {
                write!(
                    f,
                    "Covariance matrix must be {expected}x{expected}; got {rows}x{cols}."
                )
            }
            // ---- Model state ----
            ClusterError::InferVariableMismatch { expected, actual } => {
                write!(
                    f,
                    "Inference input has {actual} variables; the fitted model expects {expected}."
                )
            }
            ClusterError::ModelNotFitted => {
                write!(f, "Model hasn't been fitted yet.")
            }
        }
    }
}

/// Convert a [`ClusterError`] into a Python `ValueError` with the error
/// message. Used at the Rust↔Python boundary to surface domain errors
/// cleanly.
#[cfg(feature = "python-bindings")]
impl std::convert::From<ClusterError> for PyErr {
    fn from(err: ClusterError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
