//! svar_iv::msw — the MSW inference engine.
//!
//! Purpose
//! -------
//! Given a reduced form and its asymptotic covariance, produce every
//! inferential object of an SVAR-IV analysis in one call: the plug-in IRF
//! with delta-method bands, the weak-IV-robust confidence sets, the
//! first-stage Wald statistic, and (optionally) the Cholesky benchmark.
//!
//! Key behaviors
//! -------------
//! - The moving-average representation (`C_h`, `G_h`) is built once and
//!   shared by the plug-in, robust, and Cholesky computations.
//! - Unbounded or empty robust sets are recorded as values; only invalid
//!   options, an unusable normalization, or a covariance of the wrong
//!   dimension abort.
//!
//! Invariants & assumptions
//! ------------------------
//! - `rf` and `cov` describe the same model; dimensions are checked.
//! - Output is a pure function of the inputs; repeated calls are
//!   bit-identical.
use crate::{
    inference::rf_covariance::AsymptoticCovariance,
    svar_iv::{
        cholesky::{CholeskyIRF, cholesky_irf},
        errors::SVARResult,
        first_stage::{FirstStageWald, first_stage_wald},
        options::MSWOptions,
        plugin::{PluginResult, plugin_irf},
        robust_set::{RobustConfidenceSet, robust_confidence_set},
    },
    var::{ma_rep::MARepresentation, reduced_form::ReducedForm},
};

/// MSWResult — all inference outputs for one reduced form.
#[derive(Debug, Clone, PartialEq)]
pub struct MSWResult {
    pub plugin: PluginResult,
    pub robust: RobustConfidenceSet,
    pub first_stage: FirstStageWald,
    /// Present when `MSWOptions::cholesky` is set.
    pub cholesky: Option<CholeskyIRF>,
}

/// Run the MSW engine on a fitted reduced form.
///
/// Parameters
/// ----------
/// - `rf`: `&ReducedForm`
///   Estimated or user-supplied reduced form.
/// - `cov`: `&AsymptoticCovariance`
///   HAC covariance of `(vec(A)', vech(Σ)', Γ')'` for `rf`.
/// - `opts`: `&MSWOptions`
///   Confidence level, normalization, scale, horizons, and switches.
///
/// Returns
/// -------
/// `SVARResult<MSWResult>`
///
/// Errors
/// ------
/// - `SVARError::InvalidConfidence` / `InvalidScale` for invalid options.
/// - `SVARError::InvalidNormalization` / `DegenerateNormalization` if the
///   normalization variable is out of range or has `Γ[norm]` zero or
///   non-finite.
/// - `SVARError::CovarianceShapeMismatch` if `cov` does not match `rf`.
/// - `SVARError::SigmaNotPositiveDefinite` when the Cholesky benchmark is
///   requested and `Σ` is not positive definite.
pub fn msw_inference(
    rf: &ReducedForm, cov: &AsymptoticCovariance, opts: &MSWOptions,
) -> SVARResult<MSWResult> {
    opts.validate()?;
    let ma = MARepresentation::new(rf, opts.horizons, opts.cumulative);

    let plugin = plugin_irf(rf, cov, &ma, opts)?;
    let robust = robust_confidence_set(rf, cov, &ma, opts)?;
    let first_stage = first_stage_wald(rf, cov, opts)?;
    let cholesky = if opts.cholesky { Some(cholesky_irf(rf, &ma, opts)?) } else { None };

    Ok(MSWResult { plugin, robust, first_stage, cholesky })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        inference::{hac::HACOptions, rf_covariance::rf_asymptotic_covariance},
        svar_iv::errors::SVARError,
        var::{data::SVARData, reduced_form::estimate_reduced_form},
    };
    use ndarray::{Array1, Array2};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Engine-level wiring: output shapes, the bounded ⇔ strong link between
    // the robust sets and the Wald statistic, the Cholesky switch, and
    // error propagation for an unusable normalization. Statistical
    // behavior on simulated data lives in the integration tests.
    // -------------------------------------------------------------------------

    fn fitted() -> (ReducedForm, AsymptoticCovariance) {
        let len = 90;
        let mut panel = Array2::<f64>::zeros((len, 3));
        let mut z = Array1::<f64>::zeros(len);
        for t in 1..len {
            let tf = t as f64;
            let e1 = (1.1 * tf).sin();
            let e2 = (2.3 * tf + 0.5).cos();
            let e3 = (0.6 * tf + 1.7).sin();
            z[t] = 2.0 * e1 + 0.3 * (1.9 * tf).cos();
            panel[[t, 0]] = 0.5 * panel[[t - 1, 0]] + e1 + 0.2 * e3;
            panel[[t, 1]] = 0.1 * panel[[t - 1, 0]] + 0.3 * panel[[t - 1, 1]] + 0.4 * e1 + e2;
            panel[[t, 2]] = 0.2 * panel[[t - 1, 2]] - 0.3 * e1 + 0.5 * e2 + e3;
        }
        let data = SVARData::new(panel, z).expect("finite data");
        let rf = estimate_reduced_form(&data, 2).expect("regular design");
        let cov = rf_asymptotic_covariance(&rf, &HACOptions::newey_west(2)).expect("PSD");
        (rf, cov)
    }

    #[test]
    // Purpose
    // -------
    // Every output has `n×(H+1)` cells and the robust sets are bounded at
    // every cell exactly when the first-stage statistic is strong.
    //
    // Given
    // -----
    // - A 3-variable VAR(2) with horizons = 5, Cholesky on.
    //
    // Expect
    // ------
    // - Shapes (3, 6); `all_bounded() == is_strong()`; Cholesky present.
    fn msw_inference_shapes_and_strength_link() {
        // Arrange
        let (rf, cov) = fitted();
        let opts = MSWOptions::new(0.9, 0, 1.0, 5, false, true).expect("valid");

        // Act
        let out = msw_inference(&rf, &cov, &opts).expect("identified");

        // Assert
        assert_eq!(out.plugin.irf().dim(), (3, 6));
        assert_eq!(out.robust.dim(), (3, 6));
        assert_eq!(out.robust.all_bounded(), out.first_stage.is_strong());
        let chol = out.cholesky.as_ref().expect("requested");
        assert_eq!(chol.irf().dim(), (3, 6));
    }

    #[test]
    // Purpose
    // -------
    // Switching off the benchmark drops it without touching other outputs.
    fn msw_inference_without_cholesky() {
        let (rf, cov) = fitted();
        let with = MSWOptions::new(0.9, 1, 1.0, 3, false, true).expect("valid");
        let without = MSWOptions { cholesky: false, ..with.clone() };

        let a = msw_inference(&rf, &cov, &with).expect("identified");
        let b = msw_inference(&rf, &cov, &without).expect("identified");

        assert!(b.cholesky.is_none());
        assert_eq!(a.plugin, b.plugin);
        assert_eq!(a.robust, b.robust);
    }

    #[test]
    // Purpose
    // -------
    // An out-of-range normalization aborts the whole run.
    fn msw_inference_rejects_bad_normalization() {
        let (rf, cov) = fitted();
        let opts = MSWOptions { norm: 3, ..MSWOptions::default() };

        let err = msw_inference(&rf, &cov, &opts).unwrap_err();

        assert_eq!(err, SVARError::InvalidNormalization { norm: 3, n_vars: 3 });
    }
}
