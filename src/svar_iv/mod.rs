//! svar_iv — structural identification and inference with an external
//! instrument.
//!
//! Purpose
//! -------
//! Turn a reduced-form VAR and the HAC covariance of its parameters into
//! impulse responses to the instrumented shock, with inference that stays
//! valid when the instrument is weak.
//!
//! Key behaviors
//! -------------
//! - [`plugin_irf`]: point IRF normalized on variable `norm`, with
//!   delta-method standard errors and bands.
//! - [`robust_confidence_set`]: MSW test-inversion sets, classified into
//!   bounded, unbounded (union of rays), empty, and whole-line outcomes.
//! - [`cholesky_irf`]: recursive benchmark for comparison.
//! - [`first_stage_wald`]: instrument relevance statistic.
//! - [`msw_inference`] bundles the above; [`svar_iv`] adds reduced-form
//!   estimation and covariance computation behind a tagged
//!   [`ReducedFormSource`].
//!
//! Invariants & assumptions
//! ------------------------
//! - The IRF of variable `norm` at horizon 0 equals `scale` exactly for
//!   both the plug-in and the Cholesky estimate.
//! - All computations are pure and sequential.
//!
//! Conventions
//! -----------
//! - Indices are 0-based; responses are `n×(H+1)` with variables along rows
//!   and horizons along columns.
//! - Every failure is an [`SVARError`] and maps onto one of the
//!   [`SVARErrorKind`]s.
//!
//! Testing notes
//! -------------
//! - Unit tests sit next to each submodule; simulated-data properties
//!   (coverage shape under strong/weak instruments, lag invariance,
//!   dispatch equivalence) are in the crate's integration tests.

pub mod cholesky;
pub mod errors;
pub mod first_stage;
pub mod msw;
#[cfg(feature = "obs_slog")]
pub mod obs;
pub mod options;
pub mod pipeline;
pub mod plugin;
pub mod robust_set;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::cholesky::{CholeskyIRF, cholesky_irf};
pub use self::errors::{SVARError, SVARErrorKind, SVARResult};
pub use self::first_stage::{FirstStageWald, first_stage_wald};
pub use self::msw::{MSWResult, msw_inference};
pub use self::options::MSWOptions;
pub use self::pipeline::{ReducedFormSource, SVARIVOutcome, svar_iv};
pub use self::plugin::{PluginResult, plugin_irf};
pub use self::robust_set::{
    ConfidenceSet, QuadraticCoefficients, RobustConfidenceSet, robust_confidence_set,
};

// ---- Optional convenience prelude for downstream crates ------------------
//
// Downstream crates can `use rust_svariv::svar_iv::prelude::*;` to run the
// full analysis with a single import.

pub mod prelude {
    pub use super::errors::{SVARError, SVARErrorKind, SVARResult};
    pub use super::msw::{MSWResult, msw_inference};
    pub use super::options::MSWOptions;
    pub use super::pipeline::{ReducedFormSource, SVARIVOutcome, svar_iv};
    pub use super::robust_set::ConfidenceSet;
}
