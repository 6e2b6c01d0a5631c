#[cfg(feature = "python-bindings")]
use ndarray::Array2;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyTypeError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use numpy::PyReadonlyArray2;

#[cfg(feature = "python-bindings")]
use crate::clustering::core::data::MTSDataset;

/// Convert one Python sample into an owned `Array2<f64>`.
///
/// Accepts a 2-D `numpy.ndarray` of float64 directly, or anything with a
/// `to_numpy()` method yielding one (e.g. `pandas.DataFrame`). Rows are
/// time steps, columns are variables, matching the Rust-side layout.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_matrix<'py>(
    _py: Python<'py>, raw_sample: &Bound<'py, PyAny>,
) -> PyResult<Array2<f64>> {
    if let Ok(arr_ro) = raw_sample.extract::<PyReadonlyArray2<f64>>() {
        return Ok(arr_ro.as_array().to_owned());
    }

    if let Ok(obj) = raw_sample.call_method0("to_numpy") {
        if let Ok(frame_ro) = obj.extract::<PyReadonlyArray2<f64>>() {
            return Ok(frame_ro.as_array().to_owned());
        }
    }

    Err(PyTypeError::new_err(
        "expected a 2-D numpy.ndarray or pandas.DataFrame of float64 (rows = time steps, \
         columns = variables)",
    ))
}

/// Convert a Python sequence of samples into a validated [`MTSDataset`].
///
/// Iterates the outer object (list, tuple, or any iterable), converts each
/// element via [`extract_f64_matrix`], and runs the full Rust-side shape
/// and finiteness validation, so malformed datasets raise `ValueError`
/// before any computation starts.
#[cfg(feature = "python-bindings")]
pub fn extract_dataset<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<MTSDataset> {
    let mut samples: Vec<Array2<f64>> = Vec::new();
    for item in raw_data.try_iter()? {
        samples.push(extract_f64_matrix(py, &item?)?);
    }
    let dataset = MTSDataset::from_observations(samples)?;
    Ok(dataset)
}
