//! rust_svariv — SVAR-IV impulse responses with weak-instrument-robust
//! inference, with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the SVAR-IV pipeline to Python via the `_rust_svariv` extension
//! module. When the `python-bindings` feature is enabled, this module
//! defines the Python-facing class and submodule used by the `rust_svariv`
//! package.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules as the public crate surface:
//!   `var` (data, reduced form, MA representation), `inference` (HAC
//!   covariance), `svar_iv` (plug-in, MSW, Cholesky, pipeline), and the
//!   `linalg` helpers they share.
//! - Define the `SVARIV` `#[pyclass]` and the `#[pymodule]` initializer for
//!   the `_rust_svariv` Python extension.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work happens in the inner modules; this file performs
//!   only FFI glue, input conversion, and error mapping.
//! - Python users pass a `T×n` panel, a length-`T` instrument, and a lag
//!   order; indices (`norm`) are 0-based as in NumPy.
//!
//! Conventions
//! -----------
//! - Matrices are returned to Python as lists of rows; IRF-shaped outputs
//!   have one row per variable and one column per horizon `0..=H`.
//! - Errors from Rust surface in Python as `ValueError` carrying the
//!   `Display` message.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should call [`svar_iv::svar_iv`] (or the lower-level
//!   pieces) directly and can ignore the items behind `python-bindings`.
//!
//! Testing notes
//! -------------
//! - Numerical behavior is covered by unit tests in the inner modules and by
//!   `tests/integration_svar_iv_pipeline.rs`; the bindings are exercised
//!   from Python.

pub mod inference;
pub mod linalg;
pub mod svar_iv;
pub mod utils;
pub mod var;

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    svar_iv::{
        errors::SVARError,
        pipeline::{ReducedFormSource, SVARIVOutcome, svar_iv},
    },
    utils::{extract_f64_matrix, extract_f64_vector, extract_options, to_nested_vec},
    var::data::SVARData,
};

/// SVARIV — Python-facing wrapper for one SVAR-IV analysis.
///
/// Purpose
/// -------
/// Run the full pipeline at construction time and expose its outputs as
/// read-only properties.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `SVARIV(panel, instrument, p, /, confidence=0.95, nw_lags=0, norm=0,
/// scale=1.0, horizons=20, cumulative=False, cholesky=True)`:
/// - `panel`: `T×n` array-like of float64 (rows are periods).
/// - `instrument`: length-`T` array-like of float64.
/// - `p`: VAR lag order (`p ≥ 1`).
/// - `nw_lags`: Newey–West (Bartlett) lag truncation for the HAC covariance.
/// - Remaining arguments mirror [`MSWOptions`](crate::svar_iv::options::MSWOptions).
///
/// Fields
/// ------
/// - `inner`: [`SVARIVOutcome`]
///   Every artifact of the run.
///
/// Notes
/// -----
/// - `msw_lower`/`msw_upper` are `-inf`/`inf` for unbounded or whole-line
///   sets and `nan` for empty sets; `msw_case` names the outcome per cell.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_svariv.svar")]
pub struct SVARIV {
    inner: SVARIVOutcome,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl SVARIV {
    #[new]
    #[pyo3(
        signature = (
            panel,
            instrument,
            p,
            confidence = 0.95,
            nw_lags = 0,
            norm = 0,
            scale = 1.0,
            horizons = 20,
            cumulative = false,
            cholesky = true,
        ),
        text_signature = "(panel, instrument, p, /, confidence=0.95, nw_lags=0, norm=0, \
                          scale=1.0, horizons=20, cumulative=False, cholesky=True)"
    )]
    pub fn new<'py>(
        py: Python<'py>, panel: &Bound<'py, PyAny>, instrument: &Bound<'py, PyAny>, p: usize,
        confidence: f64, nw_lags: usize, norm: usize, scale: f64, horizons: usize,
        cumulative: bool, cholesky: bool,
    ) -> PyResult<Self> {
        let panel = extract_f64_matrix(panel)?;
        let instrument = extract_f64_vector(py, instrument)?;
        let (hac_opts, msw_opts) =
            extract_options(confidence, nw_lags, norm, scale, horizons, cumulative, cholesky)?;
        let data = SVARData::new(panel, instrument).map_err(SVARError::from)?;

        let inner = py.allow_threads(|| {
            svar_iv(ReducedFormSource::Estimate { data, p }, &hac_opts, &msw_opts)
        })?;
        Ok(SVARIV { inner })
    }

    /// Plug-in IRF (`n×(H+1)`).
    #[getter]
    pub fn irf(&self) -> Vec<Vec<f64>> {
        to_nested_vec(&self.inner.plugin.irf())
    }

    /// Delta-method standard errors (`n×(H+1)`).
    #[getter]
    pub fn std_errors(&self) -> Vec<Vec<f64>> {
        to_nested_vec(&self.inner.plugin.std_errors())
    }

    #[getter]
    pub fn dmethod_lower(&self) -> Vec<Vec<f64>> {
        to_nested_vec(&self.inner.plugin.dmethod_lower())
    }

    #[getter]
    pub fn dmethod_upper(&self) -> Vec<Vec<f64>> {
        to_nested_vec(&self.inner.plugin.dmethod_upper())
    }

    /// Lower bounds of the weak-IV-robust sets.
    #[getter]
    pub fn msw_lower(&self) -> Vec<Vec<f64>> {
        to_nested_vec(&self.inner.robust.lower_bounds().view())
    }

    /// Upper bounds of the weak-IV-robust sets.
    #[getter]
    pub fn msw_upper(&self) -> Vec<Vec<f64>> {
        to_nested_vec(&self.inner.robust.upper_bounds().view())
    }

    /// Outcome per cell: "bounded", "unbounded", "real_line", or "empty".
    #[getter]
    pub fn msw_case(&self) -> Vec<Vec<String>> {
        let (n, cols) = self.inner.robust.dim();
        (0..n)
            .map(|j| (0..cols).map(|h| self.inner.robust.get(j, h).label().to_string()).collect())
            .collect()
    }

    /// Cholesky benchmark IRF, or `None` when disabled.
    #[getter]
    pub fn cholesky_irf(&self) -> Option<Vec<Vec<f64>>> {
        self.inner.cholesky.as_ref().map(|chol| to_nested_vec(&chol.irf()))
    }

    /// First-stage Wald statistic for `Γ[norm] = 0`.
    #[getter]
    pub fn wald_stat(&self) -> f64 {
        self.inner.first_stage.statistic()
    }

    #[getter]
    pub fn wald_pvalue(&self) -> f64 {
        self.inner.first_stage.p_value()
    }

    #[getter]
    pub fn gamma(&self) -> Vec<f64> {
        self.inner.reduced_form.gamma().to_vec()
    }

    #[getter]
    pub fn sigma(&self) -> Vec<Vec<f64>> {
        to_nested_vec(&self.inner.reduced_form.sigma())
    }

    /// `n×(np+1)` coefficients, intercept first.
    #[getter]
    pub fn coefficients(&self) -> Vec<Vec<f64>> {
        to_nested_vec(&self.inner.reduced_form.coefficients())
    }

    /// HAC covariance of `(vec(A)', vech(Σ)', Γ')'`.
    #[getter]
    pub fn covariance(&self) -> Vec<Vec<f64>> {
        to_nested_vec(&self.inner.covariance.w_all())
    }
}

/// Define the `_rust_svariv` Python module and register its `svar`
/// submodule.
///
/// Errors
/// ------
/// - `PyErr`
///   If creating the submodule or manipulating `sys.modules` fails.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_svariv<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let svar_mod = PyModule::new(_py, "svar")?;
    svar(_py, m, &svar_mod)?;

    // Manually add the submodule into sys.modules to allow for dot notation.
    _py.import("sys")?.getattr("modules")?.set_item("rust_svariv.svar", svar_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn svar<'py>(
    _py: Python, rust_svariv: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<SVARIV>()?;
    rust_svariv.add_submodule(m)?;
    Ok(())
}
