//! Errors for the SVAR-IV pipeline and MSW inference engine.
//!
//! This module defines [`SVARError`], the umbrella error of the crate. It
//! wraps the reduced-form ([`VARError`]) and covariance ([`InferenceError`])
//! errors, adds the engine's own validation failures, and classifies every
//! failure into one of six coarse kinds via [`SVARError::kind`]. Both
//! `Display`/`Error` are implemented, and the error converts into `PyErr`
//! behind the `python-bindings` feature.
//!
//! ## Conventions
//! - **Indices are 0-based**; `norm` must lie in `[0, n)`.
//! - `EmptyConfidenceSet` and `UnboundedConfidenceSet` are produced only when
//!   a caller explicitly asks a `ConfidenceSet` for a finite interval; the
//!   pipeline itself reports those outcomes as values.
use crate::{inference::errors::InferenceError, var::errors::VARError};
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for SVAR-IV operations.
pub type SVARResult<T> = Result<T, SVARError>;

/// Coarse classification of every [`SVARError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SVARErrorKind {
    InvalidInput,
    InsufficientObservations,
    SingularDesign,
    DegenerateCovariance,
    EmptyConfidenceSet,
    UnboundedConfidenceSet,
}

/// Unified error type for the SVAR-IV layer.
#[derive(Debug, Clone, PartialEq)]
pub enum SVARError {
    // ---- Wrapped layers ----
    /// Reduced-form estimation or validation failed.
    Var(VARError),

    /// Covariance estimation failed.
    Inference(InferenceError),

    // ---- Option validation ----
    /// Confidence level must lie strictly inside `(0, 1)`.
    InvalidConfidence { confidence: f64 },

    /// Shock scale must be finite and non-zero.
    InvalidScale { scale: f64 },

    /// Normalization index must address one of the `n` variables.
    InvalidNormalization { norm: usize, n_vars: usize },

    // ---- Identification ----
    /// `Γ[norm]` is zero or non-finite, so the normalization is undefined.
    DegenerateNormalization { gamma_norm: f64 },

    /// Residual covariance is not positive definite (Cholesky benchmark).
    SigmaNotPositiveDefinite,

    /// Covariance and reduced form disagree on dimensions.
    CovarianceShapeMismatch { expected: usize, actual: usize },

    // ---- Reported confidence-set outcomes ----
    /// The robust set at (variable, horizon) is empty.
    EmptyConfidenceSet { variable: usize, horizon: usize },

    /// The robust set at (variable, horizon) is unbounded.
    UnboundedConfidenceSet { variable: usize, horizon: usize },
}

impl SVARError {
    /// Classify this error into one of the six kinds.
    pub fn kind(&self) -> SVARErrorKind {
        match self {
            SVARError::Var(err) => match err {
                VARError::InsufficientObservations { .. } => SVARErrorKind::InsufficientObservations,
                VARError::SingularDesign { .. } => SVARErrorKind::SingularDesign,
                _ => SVARErrorKind::InvalidInput,
            },
            SVARError::Inference(err) => match err {
                InferenceError::DegenerateCovariance { .. } | InferenceError::NonFiniteCovariance => {
                    SVARErrorKind::DegenerateCovariance
                }
                InferenceError::SingularRegressorMoments => SVARErrorKind::SingularDesign,
                _ => SVARErrorKind::InvalidInput,
            },
            SVARError::InvalidConfidence { .. }
            | SVARError::InvalidScale { .. }
            | SVARError::InvalidNormalization { .. }
            | SVARError::DegenerateNormalization { .. }
            | SVARError::CovarianceShapeMismatch { .. } => SVARErrorKind::InvalidInput,
            SVARError::SigmaNotPositiveDefinite => SVARErrorKind::DegenerateCovariance,
            SVARError::EmptyConfidenceSet { .. } => SVARErrorKind::EmptyConfidenceSet,
            SVARError::UnboundedConfidenceSet { .. } => SVARErrorKind::UnboundedConfidenceSet,
        }
    }
}

impl From<VARError> for SVARError {
    fn from(err: VARError) -> Self {
        SVARError::Var(err)
    }
}

impl From<InferenceError> for SVARError {
    fn from(err: InferenceError) -> Self {
        SVARError::Inference(err)
    }
}

impl std::error::Error for SVARError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SVARError::Var(err) => Some(err),
            SVARError::Inference(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for SVARError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Wrapped layers ----
            SVARError::Var(err) => write!(f, "{err}"),
            SVARError::Inference(err) => write!(f, "{err}"),

            // ---- Option validation ----
            SVARError::InvalidConfidence { confidence } => {
                write!(f, "Confidence level must lie in (0, 1); got {confidence}.")
            }
            SVARError::InvalidScale { scale } => {
                write!(f, "Shock scale must be finite and non-zero; got {scale}.")
            }
            SVARError::InvalidNormalization { norm, n_vars } => {
                write!(f, "Normalization index {norm} is out of range for {n_vars} variables.")
            }

            // ---- Identification ----
            SVARError::DegenerateNormalization { gamma_norm } => write!(
                f,
                "Gamma at the normalization variable is {gamma_norm}; the IRF normalization is undefined."
            ),
            SVARError::SigmaNotPositiveDefinite => {
                write!(f, "Residual covariance is not positive definite; Cholesky benchmark unavailable.")
            }
            SVARError::CovarianceShapeMismatch { expected, actual } => write!(
                f,
                "Asymptotic covariance has dimension {actual}; the reduced form requires {expected}."
            ),

            // ---- Reported confidence-set outcomes ----
            SVARError::EmptyConfidenceSet { variable, horizon } => write!(
                f,
                "Robust confidence set is empty for variable {variable} at horizon {horizon}."
            ),
            SVARError::UnboundedConfidenceSet { variable, horizon } => write!(
                f,
                "Robust confidence set is unbounded for variable {variable} at horizon {horizon}."
            ),
        }
    }
}

/// Convert an [`SVARError`] into a Python `ValueError` carrying its message.
#[cfg(feature = "python-bindings")]
impl From<SVARError> for PyErr {
    fn from(err: SVARError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover the kind classification of wrapped and native
    // variants and the `?`-friendly conversions. The PyErr conversion needs
    // the Python C API and is left to Python-level tests.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Wrapped layer errors map onto the coarse kinds.
    //
    // Given
    // -----
    // - Representative `VARError` and `InferenceError` values.
    //
    // Expect
    // ------
    // - Sample-size, design, and PSD failures keep their dedicated kinds;
    //   everything else is `InvalidInput`.
    fn kind_classifies_wrapped_errors() {
        // Arrange
        let short: SVARError = VARError::InsufficientObservations { len: 3, required: 3 }.into();
        let singular: SVARError = VARError::SingularDesign { rcond: 0.0 }.into();
        let missing: SVARError = VARError::MissingComponent { name: "gamma" }.into();
        let degenerate: SVARError =
            InferenceError::DegenerateCovariance { min_eigenvalue: -1.0, tol: 1e-8 }.into();
        let bandwidth: SVARError = InferenceError::InvalidBandwidth { bandwidth: 9, len: 9 }.into();

        // Act / Assert
        assert_eq!(short.kind(), SVARErrorKind::InsufficientObservations);
        assert_eq!(singular.kind(), SVARErrorKind::SingularDesign);
        assert_eq!(missing.kind(), SVARErrorKind::InvalidInput);
        assert_eq!(degenerate.kind(), SVARErrorKind::DegenerateCovariance);
        assert_eq!(bandwidth.kind(), SVARErrorKind::InvalidInput);
    }

    #[test]
    // Purpose
    // -------
    // Native variants map onto their kinds and render their payloads.
    fn kind_classifies_native_errors() {
        let empty = SVARError::EmptyConfidenceSet { variable: 1, horizon: 4 };
        let unbounded = SVARError::UnboundedConfidenceSet { variable: 0, horizon: 2 };
        let gamma = SVARError::DegenerateNormalization { gamma_norm: 0.0 };

        assert_eq!(empty.kind(), SVARErrorKind::EmptyConfidenceSet);
        assert_eq!(unbounded.kind(), SVARErrorKind::UnboundedConfidenceSet);
        assert_eq!(gamma.kind(), SVARErrorKind::InvalidInput);
        assert_eq!(SVARError::SigmaNotPositiveDefinite.kind(), SVARErrorKind::DegenerateCovariance);
        assert!(empty.to_string().contains("horizon 4"));
    }
}
