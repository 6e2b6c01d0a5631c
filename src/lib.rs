//! mc2pca — multivariate time-series clustering with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the Mc2PCA clustering pipeline to Python via the `_mc2pca`
//! extension module. When the `python-bindings` feature is enabled, this
//! module defines the Python-facing class used by the `mc2pca` package.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust module (`clustering`) as the public crate
//!   surface.
//! - Define the `#[pyclass]` wrapper and the `#[pymodule]` initializer
//!   for the `_mc2pca` Python extension.
//!
//! Invariants & assumptions
//! ------------------------
//! - All heavy numerical work is implemented in the inner Rust modules;
//!   this file performs only FFI glue, input conversion, and error
//!   mapping.
//! - When `python-bindings` is enabled, the Python-visible class mirrors
//!   the invariants and signatures of its Rust counterparts
//!   ([`Mc2PCAModel`], [`Mc2PCAFit`]).
//!
//! Conventions
//! -----------
//! - The Python class is stateful (scikit-learn style): `fit` stores the
//!   result internally and the getters read from it; the Rust surface
//!   stays value-oriented with an immutable fit object.
//! - Errors from core Rust code are propagated as [`ClusterError`]
//!   internally and converted to `ValueError` at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend directly on [`clustering`] and can
//!   ignore the PyO3 items guarded by the `python-bindings` feature.
//! - External Python users interact with the `Mc2PCA` class; the PyO3
//!   plumbing is considered internal.
//!
//! Testing notes
//! -------------
//! - Core numerical behavior is covered by unit tests in the inner
//!   modules and by the crate-level integration test; binding smoke
//!   tests live on the Python side.

pub mod clustering;
pub mod utils;

#[cfg(feature = "python-bindings")]
use std::str::FromStr;

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    clustering::{
        core::options::{DEFAULT_EPSILON, DEFAULT_MAX_ITER},
        errors::ClusterError,
        models::mc2pca::{Mc2PCAFit, Mc2PCAModel, Termination},
        DistanceMetric, Mc2PCAOptions,
    },
    utils::extract_dataset,
};

/// Mc2PCA — Python-facing wrapper for the Mc2PCA clustering model.
///
/// Purpose
/// -------
/// Expose the [`Mc2PCAModel`] API to Python callers while preserving the
/// core Rust invariants and error handling.
///
/// Key behaviors
/// -------------
/// - Validate and convert Python inputs (sequences of 2-D float64 arrays
///   or DataFrames) into validated Rust datasets.
/// - Run the fit loop via [`Mc2PCAModel::fit`] and cache the resulting
///   [`Mc2PCAFit`] for inspection from Python via property getters.
/// - Assign held-out data against the frozen fit via
///   [`Mc2PCAFit::infer`].
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `Mc2PCA(k, p, epsilon=1e-7, max_iter=100, distance_metric="euclidean")`:
/// - `k`: `usize`
///   Number of clusters; must be > 0.
/// - `p`: `usize`
///   Retained subspace dimension; must be > 0 and at most the variable
///   count of the data passed to `fit`.
/// - `epsilon`: `Option<f64>`
///   Convergence threshold; must be positive (`inf` converges after one
///   iteration). Defaults to `1e-7`.
/// - `max_iter`: `Option<usize>`
///   Iteration bound; must be > 0. Defaults to `100`.
/// - `distance_metric`: `Option<&str>`
///   One of `"euclidean"`, `"l1"`, `"cosine"`, `"dtw"`
///   (case-insensitive). Defaults to `"euclidean"`.
///
/// Fields
/// ------
/// - `model`: [`Mc2PCAModel`]
///   The configured, reusable model.
/// - `fitted`: `Option<Mc2PCAFit>`
///   Result of the most recent `fit` call; `None` before fitting.
///
/// Invariants
/// ----------
/// - `model` always carries a configuration validated by
///   [`Mc2PCAOptions::new`]; the result getters raise `ValueError` until
///   `fit` has succeeded.
///
/// Notes
/// -----
/// - Native Rust callers should use [`Mc2PCAModel`] directly; this type
///   exists solely for the PyO3 binding surface.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "mc2pca")]
pub struct Mc2PCA {
    /// Underlying Rust model.
    model: Mc2PCAModel,
    /// Result of the most recent fit, if any.
    fitted: Option<Mc2PCAFit>,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl Mc2PCA {
    #[new]
    #[pyo3(
        signature = (k, p, epsilon = None, max_iter = None, distance_metric = None),
        text_signature = "(k, p, /, epsilon=1e-7, max_iter=100, distance_metric='euclidean')"
    )]
    pub fn new(
        k: usize, p: usize, epsilon: Option<f64>, max_iter: Option<usize>,
        distance_metric: Option<&str>,
    ) -> PyResult<Self> {
        let metric = parse_metric(distance_metric.unwrap_or("euclidean"))?;
        let options = Mc2PCAOptions::new(
            k,
            p,
            epsilon.unwrap_or(DEFAULT_EPSILON),
            max_iter.unwrap_or(DEFAULT_MAX_ITER),
            metric,
        )?;
        Ok(Mc2PCA { model: Mc2PCAModel::new(options), fitted: None })
    }

    /// Fit the model to a sequence of multivariate samples and return the
    /// cluster index sets.
    #[pyo3(text_signature = "(self, data, /)")]
    pub fn fit<'py>(
        &mut self, py: Python<'py>, data: &Bound<'py, PyAny>,
    ) -> PyResult<Vec<Vec<usize>>> {
        let dataset = extract_dataset(py, data)?;
        let fit = self.model.fit(&dataset)?;
        let clusters = fit.clusters().to_vec();
        self.fitted = Some(fit);
        Ok(clusters)
    }

    /// Assign new samples with the frozen fitted model.
    #[pyo3(text_signature = "(self, data, /)")]
    pub fn inference<'py>(
        &self, py: Python<'py>, data: &Bound<'py, PyAny>,
    ) -> PyResult<Vec<Vec<usize>>> {
        let fit = self.require_fitted()?;
        let dataset = extract_dataset(py, data)?;
        let clusters = fit.infer(&dataset)?;
        Ok(clusters)
    }

    /// Cluster index sets from the most recent fit.
    #[getter]
    pub fn clusters(&self) -> PyResult<Vec<Vec<usize>>> {
        Ok(self.require_fitted()?.clusters().to_vec())
    }

    /// Per-iteration mean reconstruction errors, starting with the
    /// infinite sentinel.
    #[getter]
    pub fn error_trace(&self) -> PyResult<Vec<f64>> {
        Ok(self.require_fitted()?.error_trace().to_vec())
    }

    /// Retained-information fraction per cluster; `None` for clusters
    /// that were empty at the last extraction.
    #[getter]
    pub fn retained_info(&self) -> PyResult<Vec<Option<f64>>> {
        Ok(self.require_fitted()?.retained_info())
    }

    /// Whether the most recent fit met the convergence threshold (as
    /// opposed to exhausting the iteration bound).
    #[getter]
    pub fn converged(&self) -> PyResult<bool> {
        Ok(matches!(self.require_fitted()?.termination(), Termination::Converged { .. }))
    }

    /// Number of assignment iterations the most recent fit performed.
    #[getter]
    pub fn iterations(&self) -> PyResult<usize> {
        let fit = self.require_fitted()?;
        let iterations = match fit.termination() {
            Termination::Converged { iterations } => iterations,
            Termination::MaxIterReached => fit.error_trace().len() - 1,
        };
        Ok(iterations)
    }
}

#[cfg(feature = "python-bindings")]
impl Mc2PCA {
    fn require_fitted(&self) -> Result<&Mc2PCAFit, ClusterError> {
        self.fitted.as_ref().ok_or(ClusterError::ModelNotFitted)
    }
}

/// Parse a metric name at the Python boundary, mapping failures to
/// `ValueError` through the shared error type.
#[cfg(feature = "python-bindings")]
fn parse_metric(name: &str) -> Result<DistanceMetric, ClusterError> {
    DistanceMetric::from_str(name)
}

/// _mc2pca — PyO3 module initializer for the Python extension.
///
/// Invoked automatically by Python when importing the compiled
/// extension; it is not called directly by user code.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _mc2pca<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_class::<Mc2PCA>()?;
    Ok(())
}
