//! utils — conversion helpers for the Python bindings.
//!
//! Accept NumPy arrays, pandas objects (through `to_numpy`), or nested
//! Python sequences, and hand back owned `ndarray` values or options built
//! from Python keyword arguments. Everything here is compiled only with the
//! `python-bindings` feature.
#[cfg(feature = "python-bindings")]
use ndarray::{Array1, Array2, ArrayView2};

#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::{PyTypeError, PyValueError},
    prelude::*,
    types::PyAny,
};

#[cfg(feature = "python-bindings")]
use crate::{
    inference::hac::HACOptions,
    svar_iv::{errors::SVARResult, options::MSWOptions},
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
    PyReadonlyArray2,
};

/// Read a one-dimensional float64 array from a NumPy array, a pandas
/// Series, or a sequence of floats.
#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err("expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64")
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Read a two-dimensional float64 panel (rows are periods) from a NumPy
/// array, a pandas DataFrame, or a sequence of equal-length rows.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_matrix<'py>(raw_data: &Bound<'py, PyAny>) -> PyResult<Array2<f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray2<f64>>() {
        return Ok(arr_ro.as_array().to_owned());
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (), None) {
        if let Ok(frame_ro) = obj.extract::<PyReadonlyArray2<f64>>() {
            return Ok(frame_ro.as_array().to_owned());
        }
    }

    let rows: Vec<Vec<f64>> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err(
            "expected a 2-D numpy.ndarray, pandas.DataFrame, or sequence of float64 rows",
        )
    })?;
    let ncols = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|row| row.len() != ncols) {
        return Err(PyValueError::new_err("panel rows must all have the same length"));
    }
    let nrows = rows.len();
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((nrows, ncols), flat)
        .map_err(|err| PyValueError::new_err(format!("invalid panel shape: {err}")))
}

/// Owned copy of a 1-D input as `Array1<f64>`.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_vector<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<Array1<f64>> {
    let arr = extract_f64_array(py, raw_data)?;
    let slice = arr.as_slice().map_err(|_| {
        PyValueError::new_err("instrument must be a 1-D contiguous float64 array or sequence")
    })?;
    Ok(Array1::from(slice.to_vec()))
}

/// Build the HAC and MSW options from the Python constructor arguments.
#[cfg(feature = "python-bindings")]
pub fn extract_options(
    confidence: f64, nw_lags: usize, norm: usize, scale: f64, horizons: usize, cumulative: bool,
    cholesky: bool,
) -> SVARResult<(HACOptions, MSWOptions)> {
    let msw = MSWOptions::new(confidence, norm, scale, horizons, cumulative, cholesky)?;
    Ok((HACOptions::newey_west(nw_lags), msw))
}

/// Row-major nested `Vec` for returning matrices to Python as lists.
#[cfg(feature = "python-bindings")]
pub fn to_nested_vec(m: &ArrayView2<f64>) -> Vec<Vec<f64>> {
    m.rows().into_iter().map(|row| row.to_vec()).collect()
}
