//! svar_iv::options — validated settings of the MSW inference engine.
//!
//! [`MSWOptions`] collects confidence level, normalization, shock scale,
//! horizon count, and the cumulative/Cholesky/verbose switches. Construction
//! through [`MSWOptions::new`] validates everything that does not depend on
//! the data; the normalization index is checked against `n` when the engine
//! runs.
use crate::svar_iv::errors::{SVARError, SVARResult};
use statrs::distribution::{ContinuousCDF, Normal};

/// MSWOptions — configuration for plug-in, robust, and Cholesky IRFs.
///
/// Fields
/// ------
/// - `confidence`: `f64`
///   Nominal coverage in `(0, 1)`.
/// - `norm`: `usize`
///   0-based index of the variable whose impact response is fixed to
///   `scale`.
/// - `scale`: `f64`
///   Size of the structural shock (finite, non-zero).
/// - `horizons`: `usize`
///   Largest horizon `H`; responses cover `0..=H`.
/// - `cumulative`: `bool`
///   Report cumulative responses `Σ_{i≤h} IRF(i)`.
/// - `cholesky`: `bool`
///   Also compute the Cholesky benchmark IRF.
/// - `verbose`: `bool`
///   Emit stage summaries through `slog` (requires the `obs_slog` feature).
#[derive(Debug, Clone, PartialEq)]
pub struct MSWOptions {
    pub confidence: f64,
    pub norm: usize,
    pub scale: f64,
    pub horizons: usize,
    pub cumulative: bool,
    pub cholesky: bool,
    pub verbose: bool,
}

impl MSWOptions {
    /// Construct validated options with `verbose = false`.
    ///
    /// Errors
    /// ------
    /// - `SVARError::InvalidConfidence` unless `0 < confidence < 1`.
    /// - `SVARError::InvalidScale` if `scale` is zero or non-finite.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use rust_svariv::svar_iv::options::MSWOptions;
    /// let opts = MSWOptions::new(0.68, 0, 1.0, 12, false, true).unwrap();
    /// assert_eq!(opts.horizons, 12);
    /// assert!(MSWOptions::new(1.0, 0, 1.0, 12, false, true).is_err());
    /// ```
    pub fn new(
        confidence: f64, norm: usize, scale: f64, horizons: usize, cumulative: bool,
        cholesky: bool,
    ) -> SVARResult<Self> {
        let opts =
            MSWOptions { confidence, norm, scale, horizons, cumulative, cholesky, verbose: false };
        opts.validate()?;
        Ok(opts)
    }

    /// Toggle stage logging.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Re-check the data-independent invariants; used by the engine since
    /// fields are public.
    pub fn validate(&self) -> SVARResult<()> {
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(SVARError::InvalidConfidence { confidence: self.confidence });
        }
        if !self.scale.is_finite() || self.scale == 0.0 {
            return Err(SVARError::InvalidScale { scale: self.scale });
        }
        Ok(())
    }

    /// Two-sided normal quantile `z_{1−α/2}` for `α = 1 − confidence`.
    pub fn z_critical(&self) -> f64 {
        let alpha = 1.0 - self.confidence;
        Normal::standard().inverse_cdf(1.0 - alpha / 2.0)
    }

    /// `χ²₁` critical value of the robust test, `z_{1−α/2}²`.
    pub fn chi2_critical(&self) -> f64 {
        let z = self.z_critical();
        z * z
    }
}

impl Default for MSWOptions {
    /// 95% coverage, first variable normalized to a unit shock, 20
    /// horizons, level responses, Cholesky benchmark on, quiet.
    fn default() -> Self {
        MSWOptions {
            confidence: 0.95,
            norm: 0,
            scale: 1.0,
            horizons: 20,
            cumulative: false,
            cholesky: true,
            verbose: false,
        }
    }
}
