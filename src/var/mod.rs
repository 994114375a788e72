//! var — reduced-form VAR(p) estimation and its moving-average
//! representation.
//!
//! Purpose
//! -------
//! Turn a validated panel and instrument into the immutable reduced-form
//! quantities every downstream inference layer consumes: OLS coefficients,
//! residuals, residual covariance, regressors, and the instrument/residual
//! cross-moment `Γ`. The moving-average recursion and its Jacobian live here
//! as well, since they are functions of the reduced form alone.
//!
//! Key behaviors
//! -------------
//! - [`SVARData`] validates raw inputs (finite, non-empty, time-aligned).
//! - [`estimate_reduced_form`] fits the VAR(p) by OLS and computes `Γ`.
//! - [`ReducedForm::from_parts`] accepts a caller-supplied reduced form.
//! - [`estimate_gamma`] computes `Γ = η z / (T−p)`.
//! - [`MARepresentation`] produces `C_h` and `∂vec(C_h)/∂vec(A)'`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `Σ` uses the `T−p` denominator and is symmetric PSD by construction.
//! - Nothing in this subtree logs or mutates a value after construction.
//!
//! Conventions
//! -----------
//! - Panels are `T×n` (time along rows); residuals are `n×(T−p)`.
//! - All indices are 0-based.
//!
//! Downstream usage
//! ----------------
//! - `inference::rf_covariance` builds the HAC covariance of
//!   `(vec(A)', vech(Σ)', Γ')'` from a [`ReducedForm`].
//! - `svar_iv` combines the reduced form, its covariance, and
//!   [`MARepresentation`] into IRFs and confidence sets.
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests; end-to-end behavior is exercised in
//!   `tests/integration_svar_iv_pipeline.rs`.

pub mod data;
pub mod errors;
pub mod gamma;
pub mod ma_rep;
pub mod reduced_form;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::data::SVARData;
pub use self::errors::{VARError, VARResult};
pub use self::gamma::estimate_gamma;
pub use self::ma_rep::MARepresentation;
pub use self::reduced_form::{ReducedForm, ReducedFormParts, estimate_reduced_form};

// ---- Optional convenience prelude for downstream crates ------------------

pub mod prelude {
    pub use super::data::SVARData;
    pub use super::errors::{VARError, VARResult};
    pub use super::gamma::estimate_gamma;
    pub use super::ma_rep::MARepresentation;
    pub use super::reduced_form::{ReducedForm, ReducedFormParts, estimate_reduced_form};
}
