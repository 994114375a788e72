//! Errors for reduced-form VAR estimation (data validation, lag order,
//! design conditioning, and user-supplied reduced forms).
//!
//! This module defines [`VARError`], used by `var::data`,
//! `var::reduced_form`, and `var::gamma`. It implements `Display`/`Error`
//! and converts into the crate-level `SVARError` so that the pipeline can
//! propagate it with `?`.
//!
//! ## Conventions
//! - **Indices are 0-based** (match Rust/NumPy).
//! - Panels are `T×n` with time along rows; the instrument has length `T`.

/// Result alias for reduced-form operations that may produce [`VARError`].
pub type VARResult<T> = Result<T, VARError>;

/// Unified error type for the reduced-form layer.
#[derive(Debug, Clone, PartialEq)]
pub enum VARError {
    // ---- Input/data validation ----
    /// Panel has no rows or no columns.
    EmptyPanel { rows: usize, cols: usize },

    /// A panel entry is NaN/±inf (missing data is not supported).
    NonFinitePanel { row: usize, col: usize, value: f64 },

    /// An instrument entry is NaN/±inf.
    NonFiniteInstrument { index: usize, value: f64 },

    /// Instrument and panel are not time-aligned.
    InstrumentLengthMismatch { expected: usize, actual: usize },

    /// Lag order must satisfy `1 ≤ p < T`.
    InvalidLagOrder { p: usize, len: usize },

    // ---- Sample size / design ----
    /// Too few observations for the requested lag order (`T ≤ p·n + 1`).
    InsufficientObservations { len: usize, required: usize },

    /// Regressor matrix is rank-deficient to working precision; `rcond` is
    /// its `σ_min / σ_max`.
    SingularDesign { rcond: f64 },

    // ---- User-supplied reduced form ----
    /// A required reduced-form component was not supplied.
    MissingComponent { name: &'static str },

    /// A supplied component has the wrong shape.
    ComponentShapeMismatch { name: &'static str, expected: Vec<usize>, actual: Vec<usize> },

    /// A supplied component contains a non-finite value.
    NonFiniteComponent { name: &'static str },
}

impl std::error::Error for VARError {}

impl std::fmt::Display for VARError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input/data validation ----
            VARError::EmptyPanel { rows, cols } => {
                write!(f, "Panel must be non-empty; got shape ({rows}, {cols}).")
            }
            VARError::NonFinitePanel { row, col, value } => {
                write!(f, "Panel entry at ({row}, {col}) is non-finite: {value}")
            }
            VARError::NonFiniteInstrument { index, value } => {
                write!(f, "Instrument value at index {index} is non-finite: {value}")
            }
            VARError::InstrumentLengthMismatch { expected, actual } => {
                write!(
                    f,
                    "Instrument length must match the panel length: expected {expected}, got {actual}"
                )
            }
            VARError::InvalidLagOrder { p, len } => {
                write!(f, "Lag order must satisfy 1 ≤ p < T; got p = {p} with T = {len}.")
            }
            // ---- Sample size / design ----
            VARError::InsufficientObservations { len, required } => {
                write!(
                    f,
                    "Insufficient observations: T = {len}, need more than {required} for this lag order."
                )
            }
            VARError::SingularDesign { rcond } => {
                write!(
                    f,
                    "Regressor matrix is rank-deficient to working precision (reciprocal condition {rcond:e})."
                )
            }
            // ---- User-supplied reduced form ----
            VARError::MissingComponent { name } => {
                write!(f, "Reduced form is missing component `{name}`.")
            }
            VARError::ComponentShapeMismatch { name, expected, actual } => {
                write!(
                    f,
                    "Reduced-form component `{name}` has shape {actual:?}; expected {expected:?}."
                )
            }
            VARError::NonFiniteComponent { name } => {
                write!(f, "Reduced-form component `{name}` contains non-finite values.")
            }
        }
    }
}
