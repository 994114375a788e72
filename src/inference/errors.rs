//! Unified error handling for inference routines.
//!
//! This module defines `InferenceError`, the central error type used by the
//! long-run (HAC) covariance estimator, its plug-in bandwidth selector, and
//! the reduced-form asymptotic covariance built on top of them. It groups
//! bandwidth-selection failures, shape problems, and numerical degeneracies
//! of the resulting covariance. An alias `InferenceResult<T>` standardizes
//! the return type across inference code.

/// Unified error type for inference routines.
///
/// Plug-in bandwidth failures (`StationarityViolated`, `DenominatorTooSmall`,
/// `OrderNotSupported`, `Anyhow`) are normally absorbed by the selector's
/// rule-of-thumb fallback; the remaining variants abort covariance
/// estimation.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceError {
    // ---- Bandwidth selection ----
    /// Stationarity is violated in an AR(1) process.
    StationarityViolated { phi: f64 },

    /// Denominator is too close to zero in bandwidth calculation.
    DenominatorTooSmall { denominator: f64 },

    /// Order not supported for bandwidth calculation.
    OrderNotSupported { ord: usize },

    /// Fixed bandwidth must be strictly below the number of usable periods.
    InvalidBandwidth { bandwidth: usize, len: usize },

    // ---- Shapes ----
    /// Influence matrix or regressor moments have inconsistent dimensions.
    DimensionMismatch { expected: Vec<usize>, actual: Vec<usize> },

    // ---- Numerical degeneracy ----
    /// The regressor matrix is rank-deficient while forming influence rows,
    /// so `X'X/(T−p)` has no inverse.
    SingularRegressorMoments,

    /// Covariance estimate is not positive semi-definite within tolerance.
    DegenerateCovariance { min_eigenvalue: f64, tol: f64 },

    /// Covariance estimate contains NaN/±inf.
    NonFiniteCovariance,

    // ---- Anyhow catchall ----
    Anyhow(String),
}

pub type InferenceResult<T> = Result<T, InferenceError>;

impl From<anyhow::Error> for InferenceError {
    fn from(err: anyhow::Error) -> Self {
        InferenceError::Anyhow(err.to_string())
    }
}

impl std::error::Error for InferenceError {}

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Bandwidth selection ----
            InferenceError::StationarityViolated { phi } => {
                write!(f, "Inference Error: Stationarity violated (phi = {phi})")
            }
            InferenceError::DenominatorTooSmall { denominator } => write!(
                f,
                "Inference Error: Denominator too small ({denominator}) in bandwidth calculation"
            ),
            InferenceError::OrderNotSupported { ord } => {
                write!(f, "Inference Error: Order {ord} not supported for bandwidth calculation")
            }
            InferenceError::InvalidBandwidth { bandwidth, len } => write!(
                f,
                "Inference Error: Bandwidth {bandwidth} must be smaller than the {len} usable periods"
            ),

            // ---- Shapes ----
            InferenceError::DimensionMismatch { expected, actual } => write!(
                f,
                "Inference Error: Dimension mismatch (expected {expected:?}, got {actual:?})"
            ),

            // ---- Numerical degeneracy ----
            InferenceError::SingularRegressorMoments => {
                write!(f, "Inference Error: Regressor second-moment matrix is singular to working precision")
            }
            InferenceError::DegenerateCovariance { min_eigenvalue, tol } => write!(
                f,
                "Inference Error: Covariance is not positive semi-definite (min eigenvalue {min_eigenvalue:e}, tolerance {tol:e})"
            ),
            InferenceError::NonFiniteCovariance => {
                write!(f, "Inference Error: Covariance contains non-finite values")
            }

            // ---- Anyhow catchall ----
            InferenceError::Anyhow(msg) => write!(f, "Inference Error: {msg}"),
        }
    }
}
