//! var::reduced_form — OLS estimation of the reduced-form VAR(p).
//!
//! Purpose
//! -------
//! Estimate `y_t = μ + A_1 y_{t−1} + … + A_p y_{t−p} + η_t` by multivariate
//! least squares and package everything downstream inference needs into an
//! immutable [`ReducedForm`]: coefficients, residual covariance, residuals,
//! regressors, pre-sample values, the usable instrument, and `Γ`.
//!
//! Key behaviors
//! -------------
//! - [`estimate_reduced_form`] builds the regressor matrix
//!   `X = [1, y_{t−1}', …, y_{t−p}']` for `t = p, …, T−1`, checks its
//!   singular-value conditioning, and solves the least-squares problem
//!   through the thin SVD of `X`.
//! - [`ReducedForm::from_parts`] accepts a caller-supplied reduced form,
//!   rejecting missing or dimensionally inconsistent components.
//! - Accessors expose the coefficient blocks (`intercept`, `slopes`,
//!   `lag_matrix`) and the stacked-parameter dimensions `d` and `d_all`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `Σ = η η' / (T−p)`: the denominator carries no degrees-of-freedom
//!   correction, and the HAC and Cholesky layers are derived consistently
//!   with it.
//! - A [`ReducedForm`] is never mutated after construction; all fields are
//!   private and exposed through read-only views.
//! - `d = n²p + n` counts slope coefficients and `Γ`; `d_all = d + n(n+1)/2`
//!   adds the distinct entries of `Σ`.
//!
//! Conventions
//! -----------
//! - Coefficient matrix `AL` is `n×(np+1)`: column 0 is the intercept, then
//!   the `n` columns of `A_1`, then `A_2`, and so on.
//! - Residuals are stored `n×(T−p)` (variables along rows), regressors
//!   `(T−p)×(np+1)` (time along rows).
//!
//! Testing notes
//! -------------
//! - Unit tests cover exact recovery of a noiseless VAR(1) with dyadic
//!   coefficients, OLS orthogonality `X'η' = 0`, symmetry and PSD of `Σ`,
//!   and every failure branch (lag order, sample size, singular design,
//!   incomplete user-supplied parts).
use crate::{
    linalg::{DesignSvd, RCOND_MIN, symmetrize},
    var::{
        data::SVARData,
        errors::{VARError, VARResult},
        gamma::estimate_gamma,
    },
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, s};

/// ReducedForm — immutable reduced-form VAR(p) estimates.
///
/// Fields
/// ------
/// - `p`, `n`, `sample_len`: lag order, number of variables, and full
///   sample length `T`.
/// - `coefficients`: `n×(np+1)` matrix `AL` (intercept first).
/// - `sigma`: `n×n` residual covariance.
/// - `residuals`: `n×(T−p)` residuals `η`.
/// - `regressors`: `(T−p)×(np+1)` regressor matrix `X`.
/// - `presample`: `p×n` first `p` panel rows.
/// - `gamma`: length-`n` instrument/residual cross-moment.
/// - `instrument`: length-`(T−p)` usable instrument.
#[derive(Debug, Clone, PartialEq)]
pub struct ReducedForm {
    p: usize,
    n: usize,
    sample_len: usize,
    coefficients: Array2<f64>,
    sigma: Array2<f64>,
    residuals: Array2<f64>,
    regressors: Array2<f64>,
    presample: Array2<f64>,
    gamma: Array1<f64>,
    instrument: Array1<f64>,
}

/// ReducedFormParts — a possibly incomplete, caller-supplied reduced form.
///
/// Every field is optional so that partially populated inputs can be
/// represented and rejected with a precise message by
/// [`ReducedForm::from_parts`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReducedFormParts {
    pub p: Option<usize>,
    pub coefficients: Option<Array2<f64>>,
    pub sigma: Option<Array2<f64>>,
    pub residuals: Option<Array2<f64>>,
    pub regressors: Option<Array2<f64>>,
    pub presample: Option<Array2<f64>>,
    pub gamma: Option<Array1<f64>>,
    pub instrument: Option<Array1<f64>>,
}

impl ReducedForm {
    /// Validate and assemble a caller-supplied reduced form.
    ///
    /// Dimensions are inferred from `coefficients` (`n` rows) and
    /// `residuals` (`T−p` columns); every other component must conform.
    ///
    /// Errors
    /// ------
    /// - `VARError::MissingComponent` for the first absent field.
    /// - `VARError::InvalidLagOrder` if `p == 0`.
    /// - `VARError::ComponentShapeMismatch` when a component does not match
    ///   the inferred dimensions.
    /// - `VARError::NonFiniteComponent` when a component contains NaN/±inf.
    pub fn from_parts(parts: ReducedFormParts) -> VARResult<Self> {
        let p = parts.p.ok_or(VARError::MissingComponent { name: "p" })?;
        let coefficients =
            parts.coefficients.ok_or(VARError::MissingComponent { name: "coefficients" })?;
        let sigma = parts.sigma.ok_or(VARError::MissingComponent { name: "sigma" })?;
        let residuals = parts.residuals.ok_or(VARError::MissingComponent { name: "residuals" })?;
        let regressors =
            parts.regressors.ok_or(VARError::MissingComponent { name: "regressors" })?;
        let presample = parts.presample.ok_or(VARError::MissingComponent { name: "presample" })?;
        let gamma = parts.gamma.ok_or(VARError::MissingComponent { name: "gamma" })?;
        let instrument =
            parts.instrument.ok_or(VARError::MissingComponent { name: "instrument" })?;

        let n = coefficients.nrows();
        let usable = residuals.ncols();
        if p == 0 {
            return Err(VARError::InvalidLagOrder { p, len: usable + p });
        }
        let k = n * p + 1;

        check_shape("coefficients", coefficients.shape(), &[n, k])?;
        check_shape("sigma", sigma.shape(), &[n, n])?;
        check_shape("residuals", residuals.shape(), &[n, usable])?;
        check_shape("regressors", regressors.shape(), &[usable, k])?;
        check_shape("presample", presample.shape(), &[p, n])?;
        check_shape("gamma", gamma.shape(), &[n])?;
        check_shape("instrument", instrument.shape(), &[usable])?;
        if n == 0 || usable == 0 {
            return Err(VARError::ComponentShapeMismatch {
                name: "residuals",
                expected: vec![n.max(1), usable.max(1)],
                actual: residuals.shape().to_vec(),
            });
        }

        check_finite("coefficients", coefficients.iter())?;
        check_finite("sigma", sigma.iter())?;
        check_finite("residuals", residuals.iter())?;
        check_finite("regressors", regressors.iter())?;
        check_finite("presample", presample.iter())?;
        check_finite("gamma", gamma.iter())?;
        check_finite("instrument", instrument.iter())?;

        Ok(ReducedForm {
            p,
            n,
            sample_len: usable + p,
            coefficients,
            sigma,
            residuals,
            regressors,
            presample,
            gamma,
            instrument,
        })
    }

    /// Export every component as a fully populated [`ReducedFormParts`].
    pub fn to_parts(&self) -> ReducedFormParts {
        ReducedFormParts {
            p: Some(self.p),
            coefficients: Some(self.coefficients.clone()),
            sigma: Some(self.sigma.clone()),
            residuals: Some(self.residuals.clone()),
            regressors: Some(self.regressors.clone()),
            presample: Some(self.presample.clone()),
            gamma: Some(self.gamma.clone()),
            instrument: Some(self.instrument.clone()),
        }
    }

    /// Lag order `p`.
    pub fn p(&self) -> usize {
        self.p
    }

    /// Number of endogenous variables `n`.
    pub fn n_vars(&self) -> usize {
        self.n
    }

    /// Full sample length `T` (including the `p` pre-sample periods).
    pub fn sample_len(&self) -> usize {
        self.sample_len
    }

    /// Effective sample length `T−p`.
    pub fn usable_len(&self) -> usize {
        self.sample_len - self.p
    }

    /// Dimension of `(vec(A)', Γ')'`: `n²p + n`.
    pub fn d(&self) -> usize {
        self.n * self.n * self.p + self.n
    }

    /// Dimension of `(vec(A)', vech(Σ)', Γ')'`: `d + n(n+1)/2`.
    pub fn d_all(&self) -> usize {
        self.d() + self.n * (self.n + 1) / 2
    }

    /// Full coefficient matrix `AL` (`n×(np+1)`, intercept first).
    pub fn coefficients(&self) -> ArrayView2<'_, f64> {
        self.coefficients.view()
    }

    /// Intercept vector `μ`.
    pub fn intercept(&self) -> ArrayView1<'_, f64> {
        self.coefficients.column(0)
    }

    /// Slope block `[A_1, …, A_p]` (`n×np`).
    pub fn slopes(&self) -> ArrayView2<'_, f64> {
        self.coefficients.slice(s![.., 1..])
    }

    /// Lag matrix `A_l` for `l ∈ 1..=p`.
    ///
    /// Panics if `l == 0` or `l > p`.
    pub fn lag_matrix(&self, l: usize) -> ArrayView2<'_, f64> {
        assert!(l >= 1 && l <= self.p, "lag index {l} outside 1..={}", self.p);
        let start = 1 + (l - 1) * self.n;
        self.coefficients.slice(s![.., start..start + self.n])
    }

    /// Residual covariance `Σ` (`n×n`).
    pub fn sigma(&self) -> ArrayView2<'_, f64> {
        self.sigma.view()
    }

    /// Residuals `η` (`n×(T−p)`).
    pub fn residuals(&self) -> ArrayView2<'_, f64> {
        self.residuals.view()
    }

    /// Regressor matrix `X` (`(T−p)×(np+1)`).
    pub fn regressors(&self) -> ArrayView2<'_, f64> {
        self.regressors.view()
    }

    /// Pre-sample values (first `p` panel rows).
    pub fn presample(&self) -> ArrayView2<'_, f64> {
        self.presample.view()
    }

    /// Instrument/residual cross-moment `Γ`.
    pub fn gamma(&self) -> ArrayView1<'_, f64> {
        self.gamma.view()
    }

    /// Instrument restricted to the usable sample.
    pub fn instrument(&self) -> ArrayView1<'_, f64> {
        self.instrument.view()
    }
}

/// Estimate the reduced-form VAR(p) by OLS.
///
/// Parameters
/// ----------
/// - `data`: `&SVARData`
///   Validated `T×n` panel and time-aligned instrument.
/// - `p`: `usize`
///   Lag order; must satisfy `1 ≤ p < T`.
///
/// Returns
/// -------
/// `VARResult<ReducedForm>`
///   Coefficients, `Σ`, residuals, regressors, pre-sample rows, usable
///   instrument, and `Γ`.
///
/// Errors
/// ------
/// - `VARError::InvalidLagOrder` if `p == 0` or `p ≥ T`.
/// - `VARError::InsufficientObservations` if `T ≤ p·(n + 1)`, i.e. the
///   `(T−p)×(np+1)` regressor matrix has fewer rows than columns.
/// - `VARError::SingularDesign` if `σ_min / σ_max` of `X` is at or below
///   [`RCOND_MIN`] or its SVD fails.
///
/// Notes
/// -----
/// - Equation-by-equation OLS coincides with the multivariate solution
///   because every equation shares the same regressors; a single solve
///   with `n` right-hand sides is performed.
/// - The solve works on `X` through its thin SVD, never on `X'X`, so data
///   in levels with a large mean relative to its spread stays well posed.
pub fn estimate_reduced_form(data: &SVARData, p: usize) -> VARResult<ReducedForm> {
    let sample_len = data.len();
    let n = data.n_vars();
    if p == 0 || p >= sample_len {
        return Err(VARError::InvalidLagOrder { p, len: sample_len });
    }
    // X is (T−p)×(np+1) and needs at least as many rows as columns.
    let required = p * (n + 1);
    if sample_len <= required {
        return Err(VARError::InsufficientObservations { len: sample_len, required });
    }

    let usable = sample_len - p;
    let regressors = build_regressors(&data.panel.view(), p);
    let targets = data.panel.slice(s![p.., ..]);

    let svd = DesignSvd::new(&regressors.view()).ok_or(VARError::SingularDesign { rcond: 0.0 })?;
    let rcond = svd.rcond();
    if !(rcond > RCOND_MIN) {
        return Err(VARError::SingularDesign { rcond });
    }
    let betas = svd.solve(&targets);

    let coefficients = betas.t().to_owned();
    let residuals = (&targets - &regressors.dot(&betas)).reversed_axes();
    let sigma = symmetrize(&(residuals.dot(&residuals.t()) / usable as f64));

    let instrument = data.usable_instrument(p).to_owned();
    let gamma = estimate_gamma(&residuals.view(), &instrument.view())?;
    let presample = data.panel.slice(s![..p, ..]).to_owned();

    Ok(ReducedForm {
        p,
        n,
        sample_len,
        coefficients,
        sigma,
        residuals,
        regressors,
        presample,
        gamma,
        instrument,
    })
}

// ---- Helper methods ----

/// Regressor matrix with rows `[1, y_{t−1}', …, y_{t−p}']`, `t = p, …, T−1`.
fn build_regressors(panel: &ArrayView2<f64>, p: usize) -> Array2<f64> {
    let (sample_len, n) = panel.dim();
    Array2::from_shape_fn((sample_len - p, n * p + 1), |(row, col)| {
        if col == 0 {
            1.0
        } else {
            let lag = (col - 1) / n + 1;
            let var = (col - 1) % n;
            panel[[row + p - lag, var]]
        }
    })
}

fn check_shape(name: &'static str, actual: &[usize], expected: &[usize]) -> VARResult<()> {
    if actual != expected {
        return Err(VARError::ComponentShapeMismatch {
            name,
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        });
    }
    Ok(())
}

fn check_finite<'a>(name: &'static str, mut values: impl Iterator<Item = &'a f64>) -> VARResult<()> {
    if values.all(|v| v.is_finite()) { Ok(()) } else { Err(VARError::NonFiniteComponent { name }) }
}
