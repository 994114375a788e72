//! svar_iv::first_stage — HAC Wald statistic for instrument relevance.
//!
//! Purpose
//! -------
//! Test `H₀: Γ_norm = 0` with
//!
//! ```text
//! W = T_u · Γ̂_norm² / W_ΓΓ[norm, norm],
//! ```
//!
//! which is asymptotically `χ²₁` under the null. The robust confidence set
//! is bounded exactly when `W` exceeds the `χ²₁` critical value at the
//! chosen confidence level, so the statistic doubles as a diagnostic for
//! the shape of the MSW sets.
//!
//! Conventions
//! -----------
//! - A non-positive variance entry yields `W = +∞` and a p-value of `0`.
use crate::{
    inference::rf_covariance::AsymptoticCovariance,
    svar_iv::{
        errors::SVARResult,
        options::MSWOptions,
        plugin::{check_covariance, normalization_gamma},
    },
    var::reduced_form::ReducedForm,
};
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// FirstStageWald — relevance statistic, its p-value, and the MSW threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FirstStageWald {
    statistic: f64,
    p_value: f64,
    critical_value: f64,
}

impl FirstStageWald {
    pub fn statistic(&self) -> f64 {
        self.statistic
    }

    /// `χ²₁` upper-tail probability of the statistic.
    pub fn p_value(&self) -> f64 {
        self.p_value
    }

    /// `χ²₁(confidence)` critical value shared with the robust sets.
    pub fn critical_value(&self) -> f64 {
        self.critical_value
    }

    /// Whether the instrument is strong enough for bounded robust sets.
    pub fn is_strong(&self) -> bool {
        self.statistic > self.critical_value
    }
}

/// First-stage Wald statistic for the normalization variable.
///
/// Errors
/// ------
/// - `SVARError::InvalidNormalization` / `DegenerateNormalization` for an
///   unusable `norm`.
/// - `SVARError::CovarianceShapeMismatch` if `cov` does not match `rf`.
pub fn first_stage_wald(
    rf: &ReducedForm, cov: &AsymptoticCovariance, opts: &MSWOptions,
) -> SVARResult<FirstStageWald> {
    opts.validate()?;
    let gamma_norm = normalization_gamma(rf, opts)?;
    check_covariance(rf, cov)?;

    let variance = cov.w_gamma_gamma()[[opts.norm, opts.norm]];
    let usable = rf.usable_len() as f64;
    let (statistic, p_value) = if variance > 0.0 {
        let stat = usable * gamma_norm * gamma_norm / variance;
        (stat, 1.0 - ChiSquared::new(1.0).expect("freedom = 1").cdf(stat))
    } else {
        (f64::INFINITY, 0.0)
    };

    Ok(FirstStageWald { statistic, p_value, critical_value: opts.chi2_critical() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        inference::{hac::HACOptions, rf_covariance::rf_asymptotic_covariance},
        var::{data::SVARData, reduced_form::estimate_reduced_form},
    };
    use approx::assert_relative_eq;
    use ndarray::{Array1, Array2};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests check the statistic against its closed form on a small
    // deterministic system and the monotone link between instrument strength
    // and the statistic.
    // -------------------------------------------------------------------------

    fn system(strength: f64) -> ReducedForm {
        let len = 80;
        let mut panel = Array2::<f64>::zeros((len, 2));
        let mut z = Array1::<f64>::zeros(len);
        for t in 1..len {
            let tf = t as f64;
            let e1 = (1.3 * tf).sin();
            let e2 = (2.1 * tf + 0.4).cos();
            z[t] = strength * e1 + (0.7 * tf + 2.0).sin();
            panel[[t, 0]] = 0.4 * panel[[t - 1, 0]] + e1;
            panel[[t, 1]] = 0.3 * panel[[t - 1, 1]] + 0.5 * e1 + e2;
        }
        let data = SVARData::new(panel, z).expect("finite data");
        estimate_reduced_form(&data, 1).expect("regular design")
    }

    #[test]
    // Purpose
    // -------
    // The statistic equals its closed form and the p-value is its χ²₁ tail.
    //
    // Given
    // -----
    // - A deterministic bivariate system with a relevant instrument.
    //
    // Expect
    // ------
    // - W = T_u Γ_0² / W_ΓΓ[0, 0]; p ∈ [0, 1]; p < 0.05 ⇔ W > 3.84.
    fn first_stage_wald_matches_closed_form() {
        // Arrange
        let rf = system(1.0);
        let cov = rf_asymptotic_covariance(&rf, &HACOptions::newey_west(1)).expect("PSD");
        let opts = MSWOptions::default();

        // Act
        let wald = first_stage_wald(&rf, &cov, &opts).expect("identified");

        // Assert
        let expected =
            rf.usable_len() as f64 * rf.gamma()[0].powi(2) / cov.w_gamma_gamma()[[0, 0]];
        assert_relative_eq!(wald.statistic(), expected, max_relative = 1e-12);
        assert!((0.0..=1.0).contains(&wald.p_value()));
        assert_eq!(wald.p_value() < 0.05, wald.is_strong());
    }

    #[test]
    // Purpose
    // -------
    // Scaling up the instrument's signal raises the statistic.
    fn first_stage_wald_grows_with_instrument_strength() {
        let opts = MSWOptions::default();
        let stat = |strength: f64| {
            let rf = system(strength);
            let cov = rf_asymptotic_covariance(&rf, &HACOptions::newey_west(0)).expect("PSD");
            first_stage_wald(&rf, &cov, &opts).expect("identified").statistic()
        };

        assert!(stat(3.0) > stat(0.3));
    }
}
