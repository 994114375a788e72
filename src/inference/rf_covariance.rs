//! inference::rf_covariance — HAC asymptotic covariance of the reduced-form
//! SVAR-IV parameters.
//!
//! Purpose
//! -------
//! Estimate the joint asymptotic covariance of
//! `θ̂ = (vec(A)', vech(Σ)', Γ')'` by mapping each usable period to its
//! parameter-space influence row and aggregating those rows with the
//! kernel-weighted long-run covariance of [`long_run_covariance`].
//!
//! Key behaviors
//! -------------
//! - [`influence_rows`] builds, for every `t = p, …, T−1`,
//!
//!   ```text
//!   ψ_t = [ vec(η_t g_t' S')          (n²p)        g_t = Q⁻¹ x_t
//!           vech(η_t η_t')            (n(n+1)/2)
//!           η_t (z_t − g_t' q_z)      (n) ]
//!   Q = X'X/(T−p),  q_z = X'z/(T−p),  S = [0 | I_np]
//!   ```
//!
//!   The `Γ` block carries the estimation effect of the slope and
//!   intercept coefficients through `q_z`.
//!   `g_t` is column `t` of `(T−p)·X⁺`, taken from the thin SVD of `X`, and
//!   `g_t' q_z` is the projection of `z` on the regressors.
//! - [`rf_asymptotic_covariance`] aggregates the rows, symmetrizes, checks
//!   positive semi-definiteness, and extracts the `d×d` block for
//!   `(vec(A)', Γ')'`.
//!
//! Invariants & assumptions
//! ------------------------
//! - The covariance is on the `√(T−p)` scale: finite-sample variances are
//!   obtained by dividing by `T−p`.
//! - Column means of the coefficient block are zero by OLS orthogonality;
//!   the `vech` and `Γ` blocks average to `vech(Σ)` and `Γ`.
//!
//! Conventions
//! -----------
//! - `vec` is column-major over the `n×np` slope block; `vech` stacks the
//!   lower triangle column by column.
//!
//! Downstream usage
//! ----------------
//! - `svar_iv` reads the `W_AA`, `W_AΓ`, and `W_ΓΓ` blocks for the delta
//!   method, the MSW quadratic, and the first-stage Wald statistic.
use crate::{
    inference::{
        errors::{InferenceError, InferenceResult},
        hac::{HACOptions, long_run_covariance},
    },
    linalg::{DesignSvd, PSD_TOL, RCOND_MIN, symmetric_spectrum, symmetrize, vech_len},
    var::reduced_form::ReducedForm,
};
use ndarray::{Array2, ArrayView2, Axis, s};

/// AsymptoticCovariance — HAC covariance of the reduced-form parameters.
///
/// Fields
/// ------
/// - `w_all`: `d_all×d_all` covariance of `(vec(A)', vech(Σ)', Γ')'`.
/// - `w`: `d×d` covariance of `(vec(A)', Γ')'`.
/// - `bandwidth`: Newey–West lag count actually used.
#[derive(Debug, Clone, PartialEq)]
pub struct AsymptoticCovariance {
    w_all: Array2<f64>,
    w: Array2<f64>,
    bandwidth: usize,
    n: usize,
    n_coefficients: usize,
    usable: usize,
}

impl AsymptoticCovariance {
    /// Full covariance of `(vec(A)', vech(Σ)', Γ')'`.
    pub fn w_all(&self) -> ArrayView2<'_, f64> {
        self.w_all.view()
    }

    /// Covariance of `(vec(A)', Γ')'`.
    pub fn w(&self) -> ArrayView2<'_, f64> {
        self.w.view()
    }

    pub fn bandwidth(&self) -> usize {
        self.bandwidth
    }

    /// `T−p`, the sample size the covariance is scaled by.
    pub fn usable_len(&self) -> usize {
        self.usable
    }

    /// `W_AA` (`n²p×n²p`).
    pub fn w_aa(&self) -> ArrayView2<'_, f64> {
        let na = self.n_coefficients;
        self.w.slice(s![..na, ..na])
    }

    /// `W_AΓ` (`n²p×n`).
    pub fn w_a_gamma(&self) -> ArrayView2<'_, f64> {
        let na = self.n_coefficients;
        self.w.slice(s![..na, na..])
    }

    /// `W_ΓΓ` (`n×n`).
    pub fn w_gamma_gamma(&self) -> ArrayView2<'_, f64> {
        let na = self.n_coefficients;
        self.w.slice(s![na.., na..])
    }

    /// `W_ΣΣ` (`n(n+1)/2 × n(n+1)/2`), the `vech(Σ)` block of `w_all`.
    pub fn w_sigma_sigma(&self) -> ArrayView2<'_, f64> {
        let start = self.n_coefficients;
        let end = start + vech_len(self.n);
        self.w_all.slice(s![start..end, start..end])
    }
}

/// Per-period influence rows of `(vec(A)', vech(Σ)', Γ')'`.
///
/// Returns a `(T−p)×d_all` matrix; row `t` is `ψ_{p+t}`. The map is a pure
/// function of the period, so rows can be inspected independently.
///
/// Errors
/// ------
/// - `InferenceError::SingularRegressorMoments` if the regressor matrix is
///   rank-deficient to working precision (`σ_min / σ_max ≤ RCOND_MIN`).
pub fn influence_rows(rf: &ReducedForm) -> InferenceResult<Array2<f64>> {
    let usable = rf.usable_len();
    let n = rf.n_vars();
    let n_a = n * n * rf.p();
    let n_s = vech_len(n);
    let x = rf.regressors();
    let eta = rf.residuals();
    let z = rf.instrument();

    // Q⁻¹x_t with Q = X'X/(T−p) is column t of (T−p)·X⁺.
    let svd = DesignSvd::new(&x).ok_or(InferenceError::SingularRegressorMoments)?;
    if !(svd.rcond() > RCOND_MIN) {
        return Err(InferenceError::SingularRegressorMoments);
    }
    let pinv = svd.pseudo_inverse();
    let g = &pinv * usable as f64;
    let fitted_z = x.dot(&pinv.dot(&z));

    let vech_pairs: Vec<(usize, usize)> =
        (0..n).flat_map(|j| (j..n).map(move |i| (i, j))).collect();

    Ok(Array2::from_shape_fn((usable, n_a + n_s + n), |(t, c)| {
        if c < n_a {
            eta[[c % n, t]] * g[[1 + c / n, t]]
        } else if c < n_a + n_s {
            let (i, j) = vech_pairs[c - n_a];
            eta[[i, t]] * eta[[j, t]]
        } else {
            eta[[c - n_a - n_s, t]] * (z[t] - fitted_z[t])
        }
    }))
}

/// HAC asymptotic covariance of the reduced-form parameters.
///
/// Parameters
/// ----------
/// - `rf`: `&ReducedForm`
///   Estimated or user-supplied reduced form.
/// - `hac_opts`: `&HACOptions`
///   Long-run covariance settings; the SVAR-IV default is
///   `HACOptions::newey_west(L)`.
///
/// Returns
/// -------
/// `InferenceResult<AsymptoticCovariance>`
///   Symmetric PSD `w_all` and its `(vec(A), Γ)` block `w`.
///
/// Errors
/// ------
/// - `InferenceError::InvalidBandwidth` if a fixed bandwidth is `≥ T−p`.
/// - `InferenceError::SingularRegressorMoments` from [`influence_rows`].
/// - `InferenceError::NonFiniteCovariance` if any entry is NaN/±inf.
/// - `InferenceError::DegenerateCovariance` if the smallest eigenvalue is
///   below `−PSD_TOL · max(1, |λ|_max)`.
pub fn rf_asymptotic_covariance(
    rf: &ReducedForm, hac_opts: &HACOptions,
) -> InferenceResult<AsymptoticCovariance> {
    let n = rf.n_vars();
    let n_a = n * n * rf.p();
    let psi = influence_rows(rf)?;
    let lrc = long_run_covariance(hac_opts, &psi.view())?;
    let w_all = symmetrize(&lrc.matrix);
    check_psd(&w_all.view())?;

    let kept: Vec<usize> = (0..n_a).chain(n_a + vech_len(n)..rf.d_all()).collect();
    let w = w_all.select(Axis(0), &kept).select(Axis(1), &kept);

    Ok(AsymptoticCovariance {
        w_all,
        w,
        bandwidth: lrc.bandwidth,
        n,
        n_coefficients: n_a,
        usable: rf.usable_len(),
    })
}

// ---- Helper methods ----

fn check_psd(omega: &ArrayView2<f64>) -> InferenceResult<()> {
    if omega.iter().any(|v| !v.is_finite()) {
        return Err(InferenceError::NonFiniteCovariance);
    }
    let (min, max) = symmetric_spectrum(omega);
    let tol = PSD_TOL * min.abs().max(max.abs()).max(1.0);
    if !(min >= -tol) {
        return Err(InferenceError::DegenerateCovariance { min_eigenvalue: min, tol });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        linalg::vech,
        var::{data::SVARData, reduced_form::estimate_reduced_form},
    };
    use approx::assert_relative_eq;
    use ndarray::{Array1, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Influence-row moments implied by OLS (zero-mean coefficient block,
    //   vech(Σ) and Γ as block means).
    // - Shape, symmetry, and PSD of the aggregated covariance and the
    //   extraction of the d×d block.
    // - Bandwidth validation and PSD rejection.
    // -------------------------------------------------------------------------

    /// Deterministic 2-variable panel with a correlated instrument, T = 40.
    fn sample_data() -> SVARData {
        let len = 40;
        let mut panel = Array2::<f64>::zeros((len, 2));
        let mut z = Array1::<f64>::zeros(len);
        for t in 1..len {
            let tf = t as f64;
            let e1 = (1.3 * tf).sin() + 0.2 * (0.7 * tf).cos();
            let e2 = (2.1 * tf + 0.4).cos();
            z[t] = 0.8 * e1 + 0.3 * (5.3 * tf).sin();
            panel[[t, 0]] = 0.4 * panel[[t - 1, 0]] + 0.1 * panel[[t - 1, 1]] + e1;
            panel[[t, 1]] = -0.2 * panel[[t - 1, 0]] + 0.3 * panel[[t - 1, 1]] + 0.5 * e1 + e2;
        }
        SVARData::new(panel, z).expect("finite data")
    }

    fn sample_reduced_form(p: usize) -> ReducedForm {
        estimate_reduced_form(&sample_data(), p).expect("well-conditioned design")
    }

    #[test]
    // Purpose
    // -------
    // Influence rows average to the parameter estimates where OLS implies it.
    //
    // Given
    // -----
    // - A VAR(2) fitted to the deterministic panel.
    //
    // Expect
    // ------
    // - Coefficient block means ≈ 0 (orthogonality).
    // - vech block mean = vech(Σ); Γ block mean = Γ.
    fn influence_rows_have_ols_implied_means() {
        // Arrange
        let rf = sample_reduced_form(2);
        let n_a = 2 * 2 * 2;

        // Act
        let psi = influence_rows(&rf).expect("regular design");
        let means = psi.mean_axis(Axis(0)).expect("non-empty");

        // Assert
        assert_eq!(psi.dim(), (rf.usable_len(), rf.d_all()));
        for c in 0..n_a {
            assert!(means[c].abs() < 1e-10, "coefficient block mean {c} = {}", means[c]);
        }
        let vech_sigma = vech(&rf.sigma());
        for (i, v) in vech_sigma.iter().enumerate() {
            assert_relative_eq!(means[n_a + i], *v, epsilon = 1e-12);
        }
        for a in 0..2 {
            assert_relative_eq!(means[n_a + 3 + a], rf.gamma()[a], epsilon = 1e-10);
        }
    }

    #[test]
    // Purpose
    // -------
    // The aggregated covariance is symmetric PSD and its d×d block is the
    // (vec(A), Γ) sub-matrix of w_all.
    //
    // Given
    // -----
    // - VAR(1) reduced form, `HACOptions::newey_west(3)`.
    //
    // Expect
    // ------
    // - Shapes d_all×d_all and d×d; exact symmetry; block accessors agree
    //   with index selection; the reported bandwidth is 3.
    fn rf_asymptotic_covariance_blocks_are_consistent() {
        // Arrange
        let rf = sample_reduced_form(1);
        let (d, d_all) = (rf.d(), rf.d_all());

        // Act
        let cov = rf_asymptotic_covariance(&rf, &HACOptions::newey_west(3)).expect("valid");

        // Assert
        assert_eq!(cov.w_all().dim(), (d_all, d_all));
        assert_eq!(cov.w().dim(), (d, d));
        assert_eq!(cov.bandwidth(), 3);
        assert_eq!(cov.usable_len(), 39);
        for i in 0..d_all {
            for j in 0..d_all {
                assert_eq!(cov.w_all()[[i, j]], cov.w_all()[[j, i]]);
            }
        }
        let (min, _) = symmetric_spectrum(&cov.w());
        assert!(min >= -1e-10, "W should be PSD, min eigenvalue {min}");
        // n_a = 4, vech block = 3, Γ = indices 7..9 of w_all.
        assert_eq!(cov.w_aa()[[1, 3]], cov.w_all()[[1, 3]]);
        assert_eq!(cov.w_a_gamma()[[2, 1]], cov.w_all()[[2, 8]]);
        assert_eq!(cov.w_gamma_gamma()[[0, 1]], cov.w_all()[[7, 8]]);
        assert_eq!(cov.w_sigma_sigma()[[0, 2]], cov.w_all()[[4, 6]]);
    }

    #[test]
    // Purpose
    // -------
    // With L = 0 the Γ variance is the sample variance of its influence
    // component.
    fn rf_asymptotic_covariance_l0_gamma_variance_matches_influence() {
        let rf = sample_reduced_form(1);
        let psi = influence_rows(&rf).expect("regular design");
        let col = psi.column(rf.d_all() - 1);
        let mean = col.mean().expect("non-empty");
        let manual = col.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / col.len() as f64;

        let cov = rf_asymptotic_covariance(&rf, &HACOptions::newey_west(0)).expect("valid");

        assert_relative_eq!(cov.w_gamma_gamma()[[1, 1]], manual, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // A bandwidth reaching the usable sample length is invalid.
    fn rf_asymptotic_covariance_rejects_bandwidth_at_sample_length() {
        let rf = sample_reduced_form(1);

        match rf_asymptotic_covariance(&rf, &HACOptions::newey_west(rf.usable_len())) {
            Err(InferenceError::InvalidBandwidth { len: 39, .. }) => (),
            other => panic!("expected InvalidBandwidth, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // The PSD check rejects a clearly indefinite matrix and NaNs, and
    // accepts round-off-level negative eigenvalues.
    fn check_psd_distinguishes_roundoff_from_indefinite() {
        let indefinite = array![[1.0, 2.0], [2.0, 1.0]];
        let roundoff = array![[1.0, 0.0], [0.0, -1e-12]];
        let nan = array![[1.0, f64::NAN], [f64::NAN, 1.0]];

        assert!(matches!(
            check_psd(&indefinite.view()),
            Err(InferenceError::DegenerateCovariance { .. })
        ));
        assert!(check_psd(&roundoff.view()).is_ok());
        assert_eq!(check_psd(&nan.view()), Err(InferenceError::NonFiniteCovariance));
    }

    #[test]
    // Purpose
    // -------
    // Influence rows stay accurate for data in levels whose mean dwarfs its
    // spread.
    //
    // Given
    // -----
    // - The sample panel and the same panel reported as 1e4 + 10·y_t, p = 2.
    //
    // Expect
    // ------
    // - Both covariances are computed.
    // - `W_AA` is unchanged by the rescaling and `W_ΓΓ` scales by 100.
    fn rf_asymptotic_covariance_invariant_to_level_offset() {
        // Arrange
        let data = sample_data();
        let levels =
            SVARData::new(data.panel.mapv(|v| 1e4 + 10.0 * v), data.instrument.clone())
                .expect("finite data");
        let opts = HACOptions::newey_west(2);

        // Act
        let raw = rf_asymptotic_covariance(
            &estimate_reduced_form(&data, 2).expect("well-conditioned design"),
            &opts,
        )
        .expect("raw covariance");
        let shifted = rf_asymptotic_covariance(
            &estimate_reduced_form(&levels, 2).expect("levels design"),
            &opts,
        )
        .expect("levels covariance");

        // Assert
        for (a, b) in raw.w_aa().iter().zip(shifted.w_aa().iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-7, max_relative = 1e-6);
        }
        for (a, b) in raw.w_gamma_gamma().iter().zip(shifted.w_gamma_gamma().iter()) {
            assert_relative_eq!(100.0 * *a, *b, epsilon = 1e-6, max_relative = 1e-6);
        }
    }

}
