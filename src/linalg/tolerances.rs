//! Shared numerical tolerances.
//!
//! Every tolerance used by more than one subtree lives here so that the
//! reduced-form, HAC, and MSW layers agree on what "numerically zero" and
//! "numerically singular" mean.

/// Safety margin for strict stationarity of AR(1) fits used by the plug-in
/// bandwidth selector. `|φ| ≥ 1 − STATIONARITY_MARGIN` is rejected.
pub const STATIONARITY_MARGIN: f64 = 1e-6;

/// Generic absolute tolerance for denominators and small positive guards.
pub const GENERAL_TOL: f64 = 1e-12;

/// Relative tolerance under which the discriminant of a confidence-set
/// quadratic counts as zero: `|b² − 4ac| ≤ DISCRIMINANT_RTOL · (b² + 4|ac|)`.
/// Double roots (the normalization variable on impact) land here.
pub const DISCRIMINANT_RTOL: f64 = 1e-10;

/// Relative tolerance for the positive semi-definiteness check of HAC
/// covariance estimates: the smallest eigenvalue may be as low as
/// `-PSD_TOL · max(1, |λ|_max)` before the estimate is rejected.
pub const PSD_TOL: f64 = 1e-8;

/// Smallest admissible reciprocal condition number `σ_min / σ_max` of a
/// regressor matrix. At or below this the design is rank-deficient to
/// working precision; the factor of 1000 absorbs the rounding error of the
/// SVD itself.
pub const RCOND_MIN: f64 = 1e3 * f64::EPSILON;
