//! linalg — shared dense linear algebra and numerical tolerances.
//!
//! Purpose
//! -------
//! Collect the small set of matrix utilities used by the reduced-form,
//! HAC, and MSW layers: `ndarray`/`nalgebra` bridging, SVD least squares on
//! regressor matrices, Cholesky factors, spectral checks, Kronecker
//! products, and `vech`. Tolerances are
//! centralized in [`tolerances`] so every layer agrees on numerical
//! thresholds.
//!
//! Conventions
//! -----------
//! - Public entities store matrices as `ndarray::Array2<f64>`; `nalgebra`
//!   is an implementation detail of the factorizations.
//! - Helpers are pure, never log, and report numerical failure through
//!   `Option` or raw spectra so callers can map them into their own error
//!   enums.

pub mod dense;
pub mod tolerances;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::dense::{
    DesignSvd, cholesky_lower, from_dmatrix, kron, symmetric_spectrum, symmetrize, to_dmatrix,
    vech, vech_len,
};
pub use self::tolerances::{
    DISCRIMINANT_RTOL, GENERAL_TOL, PSD_TOL, RCOND_MIN, STATIONARITY_MARGIN,
};
