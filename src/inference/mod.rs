//! inference — HAC covariance of the reduced-form SVAR-IV parameters.
//!
//! Purpose
//! -------
//! Provide the asymptotic covariance that the MSW layer needs: a generic
//! kernel-weighted long-run covariance of per-period influence rows, the
//! kernel family and plug-in bandwidth rules behind it, and the mapping from
//! a fitted reduced form to its influence rows.
//!
//! Key behaviors
//! -------------
//! - Define a unified error and result type, [`InferenceError`] and
//!   [`InferenceResult`], for bandwidth, shape, and numerical failures.
//! - Configure the estimator via [`HACOptions`]; the SVAR-IV default is
//!   [`HACOptions::newey_west`] (Bartlett, fixed lags, centered).
//! - Enumerate taper families with [`KernelType`] and expose Andrews-style
//!   plug-in bandwidths via [`KernelType::optimal_bandwidth`].
//! - Aggregate influence rows with [`long_run_covariance`].
//! - Produce [`AsymptoticCovariance`] for `(vec(A)', vech(Σ)', Γ')'` via
//!   [`rf_asymptotic_covariance`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Influence rows are on the average scale, so the resulting covariance
//!   is that of `√(T−p)(θ̂ − θ)`.
//! - Returned covariances are symmetric and PSD within `PSD_TOL`; anything
//!   else is an error, never a silently patched matrix.
//!
//! Conventions
//! -----------
//! - Influence matrices are `n×k` with time along rows.
//! - All functions are pure: no logging, no global state.
//!
//! Downstream usage
//! ----------------
//! - `svar_iv::pipeline` calls [`rf_asymptotic_covariance`] once per run
//!   and hands the result to the MSW engine.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each submodule; the pipeline integration test
//!   checks that changing the Newey–West lag count moves standard errors
//!   but not point estimates.

pub mod errors;
pub mod hac;
pub mod kernel;
pub mod rf_covariance;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::errors::{InferenceError, InferenceResult};
pub use self::hac::{HACOptions, LongRunCovariance, long_run_covariance};
pub use self::kernel::KernelType;
pub use self::rf_covariance::{AsymptoticCovariance, influence_rows, rf_asymptotic_covariance};

// ---- Optional convenience prelude for downstream crates ------------------
//
// Downstream crates can `use rust_svariv::inference::prelude::*;` to
// import the primary inference surface in a single line.

pub mod prelude {
    pub use super::errors::{InferenceError, InferenceResult};
    pub use super::hac::{HACOptions, long_run_covariance};
    pub use super::kernel::KernelType;
    pub use super::rf_covariance::{AsymptoticCovariance, rf_asymptotic_covariance};
}
