//! svar_iv::plugin — plug-in IRF and delta-method standard errors.
//!
//! Purpose
//! -------
//! Compute `IRF_j(h) = scale · e_j' C_h Γ / Γ_norm` for every variable `j`
//! and horizon `h`, and its delta-method standard error from the gradient
//! with respect to `(vec(A)', Γ')'` sandwiched with `W / (T−p)`.
//!
//! Key behaviors
//! -------------
//! - The impact vector `b = Γ / Γ_norm` is formed first, so `b[norm] = 1`
//!   exactly and the normalization contract `IRF_norm(0) = scale` holds
//!   bit-for-bit.
//! - [`response_terms`] exposes the per-cell building blocks shared with the
//!   robust confidence set: `x = e_j' C_h Γ`, `∂x/∂vec(A)`, and `e_j' C_h`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `Γ_norm` is finite and non-zero (checked by [`normalization_gamma`]).
//! - Variances are clamped at zero before the square root; a negative
//!   quadratic form can only arise from round-off on a PSD `W`.
use crate::{
    inference::rf_covariance::AsymptoticCovariance,
    svar_iv::{
        errors::{SVARError, SVARResult},
        options::MSWOptions,
    },
    var::{ma_rep::MARepresentation, reduced_form::ReducedForm},
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, s};

/// PluginResult — point IRFs, standard errors, and delta-method bounds.
///
/// All matrices are `n×(H+1)`: rows are variables, columns horizons.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginResult {
    irf: Array2<f64>,
    std_errors: Array2<f64>,
    lower: Array2<f64>,
    upper: Array2<f64>,
}

impl PluginResult {
    pub fn irf(&self) -> ArrayView2<'_, f64> {
        self.irf.view()
    }

    pub fn std_errors(&self) -> ArrayView2<'_, f64> {
        self.std_errors.view()
    }

    /// `irf − z_{1−α/2} · se`.
    pub fn dmethod_lower(&self) -> ArrayView2<'_, f64> {
        self.lower.view()
    }

    /// `irf + z_{1−α/2} · se`.
    pub fn dmethod_upper(&self) -> ArrayView2<'_, f64> {
        self.upper.view()
    }
}

/// Per-cell ingredients of the IRF mapping at (variable `j`, horizon `h`).
#[derive(Debug, Clone)]
pub struct ResponseTerms {
    /// `x = e_j' C_h Γ`, the unnormalized response.
    pub x: f64,
    /// `∂x/∂vec(A)` (length `n²p`).
    pub grad_a: Array1<f64>,
    /// `e_j' C_h` (length `n`), which is also `∂x/∂Γ`.
    pub c_row: Array1<f64>,
}

/// Build the [`ResponseTerms`] of variable `j` at horizon `h`.
///
/// `∂x/∂vec(A)[m] = Σ_k Γ_k · G_h[k·n + j, m]`, i.e. `(Γ' ⊗ e_j') G_h`.
pub fn response_terms(
    ma: &MARepresentation, gamma: &ArrayView1<f64>, j: usize, h: usize,
) -> ResponseTerms {
    let n = gamma.len();
    let c_h = ma.coefficient(h);
    let g_h = ma.jacobian(h);
    let c_row = c_h.row(j).to_owned();
    let x = c_row.dot(gamma);
    let mut grad_a = Array1::<f64>::zeros(g_h.ncols());
    for (k, &gamma_k) in gamma.iter().enumerate() {
        grad_a.scaled_add(gamma_k, &g_h.row(k * n + j));
    }
    ResponseTerms { x, grad_a, c_row }
}

/// `Γ[norm]` after checking the normalization index and value.
///
/// Errors
/// ------
/// - `SVARError::InvalidNormalization` if `norm ≥ n`.
/// - `SVARError::DegenerateNormalization` if `Γ[norm]` is zero or
///   non-finite.
pub fn normalization_gamma(rf: &ReducedForm, opts: &MSWOptions) -> SVARResult<f64> {
    let n = rf.n_vars();
    if opts.norm >= n {
        return Err(SVARError::InvalidNormalization { norm: opts.norm, n_vars: n });
    }
    let gamma_norm = rf.gamma()[opts.norm];
    if !gamma_norm.is_finite() || gamma_norm == 0.0 {
        return Err(SVARError::DegenerateNormalization { gamma_norm });
    }
    Ok(gamma_norm)
}

/// Check that `cov` was built for a reduced form of `rf`'s dimensions.
pub fn check_covariance(rf: &ReducedForm, cov: &AsymptoticCovariance) -> SVARResult<()> {
    let actual = cov.w().nrows();
    if actual != rf.d() || cov.w_all().nrows() != rf.d_all() {
        return Err(SVARError::CovarianceShapeMismatch { expected: rf.d(), actual });
    }
    Ok(())
}

/// Plug-in IRF with delta-method standard errors and bounds.
///
/// Parameters
/// ----------
/// - `rf`: `&ReducedForm`
///   Source of `Γ` and the usable sample length.
/// - `cov`: `&AsymptoticCovariance`
///   HAC covariance; only the `d×d` block is used.
/// - `ma`: `&MARepresentation`
///   `C_h` and `G_h` for `h = 0..=H` (level or cumulative).
/// - `opts`: `&MSWOptions`
///   Normalization, scale, and confidence level.
///
/// Errors
/// ------
/// - `SVARError::InvalidNormalization` / `DegenerateNormalization` from
///   [`normalization_gamma`].
/// - `SVARError::CovarianceShapeMismatch` if `cov` does not match `rf`.
pub fn plugin_irf(
    rf: &ReducedForm, cov: &AsymptoticCovariance, ma: &MARepresentation, opts: &MSWOptions,
) -> SVARResult<PluginResult> {
    opts.validate()?;
    let gamma_norm = normalization_gamma(rf, opts)?;
    check_covariance(rf, cov)?;

    let n = rf.n_vars();
    let cols = ma.horizons() + 1;
    let usable = rf.usable_len() as f64;
    let gamma = rf.gamma();
    let impact = gamma.mapv(|g| g / gamma_norm) * opts.scale;
    let w = cov.w();
    let n_a = w.nrows() - n;
    let z = opts.z_critical();

    let mut irf = Array2::<f64>::zeros((n, cols));
    let mut std_errors = Array2::<f64>::zeros((n, cols));
    for h in 0..cols {
        let response = ma.coefficient(h).dot(&impact);
        irf.column_mut(h).assign(&response);

        for j in 0..n {
            let terms = response_terms(ma, &gamma, j, h);
            let factor = opts.scale / gamma_norm;
            let mut grad_gamma = terms.c_row;
            grad_gamma[opts.norm] -= terms.x / gamma_norm;
            let mut grad = Array1::<f64>::zeros(n_a + n);
            grad.slice_mut(s![..n_a]).assign(&(terms.grad_a * factor));
            grad.slice_mut(s![n_a..]).assign(&(grad_gamma * factor));

            let variance = grad.dot(&w.dot(&grad)) / usable;
            std_errors[[j, h]] = variance.max(0.0).sqrt();
        }
    }

    let lower = &irf - &(&std_errors * z);
    let upper = &irf + &(&std_errors * z);
    Ok(PluginResult { irf, std_errors, lower, upper })
}
