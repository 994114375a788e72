//! svar_iv::pipeline — end-to-end SVAR-IV entry point.
//!
//! Purpose
//! -------
//! Run the whole analysis from either raw data or a caller-supplied reduced
//! form: estimate (or accept) the reduced form, compute its HAC covariance,
//! and hand both to the MSW engine.
//!
//! Key behaviors
//! -------------
//! - [`ReducedFormSource`] is a tagged input: `Estimate { data, p }` fits
//!   the VAR by OLS, `UserSupplied(rf)` skips estimation. Both paths run
//!   identical downstream code.
//! - With the `obs_slog` feature and `MSWOptions::verbose`, one summary is
//!   logged per stage (dimensions, bandwidth, first-stage Wald, counts of
//!   unbounded and empty robust sets).
//!
//! Invariants & assumptions
//! ------------------------
//! - A `UserSupplied` reduced form is complete by construction; partial
//!   inputs are rejected earlier by [`ReducedForm::from_parts`].
//! - The pipeline holds no state; repeated calls on the same inputs return
//!   identical outcomes.
#[cfg(feature = "obs_slog")]
use crate::svar_iv::obs::term_logger;
use crate::{
    inference::{
        hac::HACOptions,
        rf_covariance::{AsymptoticCovariance, rf_asymptotic_covariance},
    },
    svar_iv::{
        cholesky::CholeskyIRF,
        errors::SVARResult,
        first_stage::FirstStageWald,
        msw::{MSWResult, msw_inference},
        options::MSWOptions,
        plugin::PluginResult,
        robust_set::RobustConfidenceSet,
    },
    var::{
        data::SVARData,
        reduced_form::{ReducedForm, ReducedFormParts, estimate_reduced_form},
    },
};

/// Where the reduced form comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ReducedFormSource {
    /// Fit a VAR(`p`) with intercept to `data`.
    Estimate { data: SVARData, p: usize },
    /// Use an already validated reduced form.
    UserSupplied(ReducedForm),
}

impl ReducedFormSource {
    /// Validate caller-supplied parts into a `UserSupplied` source.
    ///
    /// Errors
    /// ------
    /// - `SVARError::Var` wrapping the `from_parts` failure (missing,
    ///   mis-shaped, or non-finite component).
    pub fn from_parts(parts: ReducedFormParts) -> SVARResult<Self> {
        Ok(ReducedFormSource::UserSupplied(ReducedForm::from_parts(parts)?))
    }
}

/// SVARIVOutcome — every artifact of one SVAR-IV run.
#[derive(Debug, Clone, PartialEq)]
pub struct SVARIVOutcome {
    pub reduced_form: ReducedForm,
    pub covariance: AsymptoticCovariance,
    pub plugin: PluginResult,
    pub robust: RobustConfidenceSet,
    pub first_stage: FirstStageWald,
    pub cholesky: Option<CholeskyIRF>,
}

/// Run the SVAR-IV analysis.
///
/// Parameters
/// ----------
/// - `source`: [`ReducedFormSource`]
///   Raw data plus lag order, or a complete reduced form.
/// - `hac_opts`: `&HACOptions`
///   Long-run covariance settings; `HACOptions::newey_west(L)` is the usual
///   choice.
/// - `msw_opts`: `&MSWOptions`
///   Inference settings.
///
/// Returns
/// -------
/// `SVARResult<SVARIVOutcome>`
///
/// Errors
/// ------
/// - `SVARError::Var` for estimation failures (`InsufficientObservations`,
///   `SingularDesign`, invalid lag order).
/// - `SVARError::Inference` for bandwidth or covariance failures.
/// - Any error of [`msw_inference`].
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::{Array1, Array2};
/// # use rust_svariv::inference::hac::HACOptions;
/// # use rust_svariv::svar_iv::{options::MSWOptions, pipeline::{ReducedFormSource, svar_iv}};
/// # use rust_svariv::var::data::SVARData;
/// let len = 120;
/// let mut panel = Array2::<f64>::zeros((len, 2));
/// let mut z = Array1::<f64>::zeros(len);
/// for t in 1..len {
///     let (e1, e2) = ((1.3 * t as f64).sin(), (0.7 * t as f64 + 1.0).cos());
///     z[t] = e1 + 0.1 * (2.9 * t as f64).sin();
///     panel[[t, 0]] = 0.5 * panel[[t - 1, 0]] + e1;
///     panel[[t, 1]] = 0.2 * panel[[t - 1, 1]] + 0.4 * e1 + e2;
/// }
/// let data = SVARData::new(panel, z).unwrap();
/// let out = svar_iv(
///     ReducedFormSource::Estimate { data, p: 1 },
///     &HACOptions::newey_west(2),
///     &MSWOptions::default(),
/// )
/// .unwrap();
/// assert_eq!(out.plugin.irf()[[0, 0]], 1.0);
/// ```
pub fn svar_iv(
    source: ReducedFormSource, hac_opts: &HACOptions, msw_opts: &MSWOptions,
) -> SVARResult<SVARIVOutcome> {
    msw_opts.validate()?;
    let reduced_form = match source {
        ReducedFormSource::Estimate { data, p } => estimate_reduced_form(&data, p)?,
        ReducedFormSource::UserSupplied(rf) => rf,
    };
    let covariance = rf_asymptotic_covariance(&reduced_form, hac_opts)?;
    let MSWResult { plugin, robust, first_stage, cholesky } =
        msw_inference(&reduced_form, &covariance, msw_opts)?;

    let outcome =
        SVARIVOutcome { reduced_form, covariance, plugin, robust, first_stage, cholesky };
    #[cfg(feature = "obs_slog")]
    if msw_opts.verbose {
        log_summary(&term_logger(), &outcome);
    }
    Ok(outcome)
}

// ---- Helper methods ----

#[cfg(feature = "obs_slog")]
fn log_summary(log: &slog::Logger, outcome: &SVARIVOutcome) {
    let rf = &outcome.reduced_form;
    slog::info!(log, "reduced form";
        "n" => rf.n_vars(), "p" => rf.p(), "usable" => rf.usable_len());
    slog::info!(log, "covariance";
        "dim" => outcome.covariance.w_all().nrows(), "bandwidth" => outcome.covariance.bandwidth());
    slog::info!(log, "first stage";
        "wald" => outcome.first_stage.statistic(),
        "p_value" => outcome.first_stage.p_value(),
        "critical" => outcome.first_stage.critical_value());
    slog::info!(log, "robust sets";
        "unbounded" => outcome.robust.count_unbounded(), "empty" => outcome.robust.count_empty());
}
