//! Kernel tapers and plug-in bandwidths for long-run covariance estimation.
//!
//! This module provides:
//! - [`KernelType`], the HAC taper family (IID, Bartlett/Newey–West, Parzen,
//!   Quadratic Spectral), evaluated at `x = k/(L+1)`.
//! - [`KernelType::optimal_bandwidth`], an Andrews AR(1) plug-in rule fitted
//!   column-wise on the influence matrix the HAC estimator will aggregate.
//!   When the plug-in is unusable (near-unit root, tiny denominator, failed
//!   AR fit) it falls back to `round(n^{1/4})`.
//!
//! Conventions:
//! - Input matrices are `n×k` with time along rows.
//! - The plug-in sees the same (centered) series as the HAC aggregator.
use crate::{
    inference::errors::{InferenceError, InferenceResult},
    linalg::{GENERAL_TOL, STATIONARITY_MARGIN},
};
use arima::estimate;
use ndarray::ArrayView2;

/// HAC taper family.
///
/// - `IID`: only lag 0 contributes.
/// - `Bartlett`: triangular (Newey–West) taper with support `|x| ≤ 1`.
/// - `Parzen`: cubic taper with support `|x| ≤ 1`.
/// - `QuadraticSpectral`: infinite-support taper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelType {
    IID,
    Bartlett,
    Parzen,
    QuadraticSpectral,
}

impl KernelType {
    /// Kernel weight `w(x)`; callers pass `x = k/(L+1)`.
    pub fn weight(&self, x: f64) -> f64 {
        let ax = x.abs();
        match self {
            KernelType::IID if x == 0.0 => 1.0,
            KernelType::IID => 0.0,
            KernelType::Bartlett => (1.0 - ax).max(0.0),
            KernelType::Parzen if ax <= 0.5 => 1.0 - 6.0 * ax * ax * (1.0 - ax),
            KernelType::Parzen if ax <= 1.0 => 2.0 * (1.0 - ax).powi(3),
            KernelType::Parzen => 0.0,
            KernelType::QuadraticSpectral if x == 0.0 => 1.0,
            KernelType::QuadraticSpectral => {
                let arg = 1.2 * std::f64::consts::PI * x;
                3.0 / (arg * arg) * (arg.sin() / arg - arg.cos())
            }
        }
    }

    /// Andrews plug-in bandwidth for an `n×k` series matrix.
    ///
    /// | kernel            | q | L                           |
    /// |-------------------|---|-----------------------------|
    /// | Bartlett          | 1 | `1.1447 (n α(1))^{1/3}`     |
    /// | Parzen            | 2 | `2.6614 (n α(2))^{1/5}`     |
    /// | QuadraticSpectral | 2 | `1.3221 (n α(2))^{1/5}`     |
    ///
    /// `IID` always returns `0`. Any failure of the `α(q)` computation
    /// falls back to `round(n^{1/4})`. The result is not truncated; the HAC
    /// aggregator caps it at `n−1`.
    pub fn optimal_bandwidth(&self, series: &ArrayView2<f64>) -> usize {
        let n = series.nrows() as f64;
        let (ord, constant, exponent) = match self {
            KernelType::IID => return 0,
            KernelType::Bartlett => (1, 1.1447, 1.0 / 3.0),
            KernelType::Parzen => (2, 2.6614, 0.2),
            KernelType::QuadraticSpectral => (2, 1.3221, 0.2),
        };
        match andrews_alpha(series, ord) {
            Ok(alpha) => (constant * (n * alpha).powf(exponent)).round() as usize,
            Err(_) => n.powf(0.25).round() as usize,
        }
    }
}

/// Andrews `α(q)` aggregated over the columns of `series`.
///
/// Each column is fitted as an AR(1) with `arima::estimate::fit`; the
/// residual variance uses an `n−1` denominator.
///
/// # Errors
/// - `StationarityViolated` if `|φ| ≥ 1 − STATIONARITY_MARGIN` for any column.
/// - `OrderNotSupported` for `q ∉ {1, 2}`.
/// - `DenominatorTooSmall` if the aggregated denominator is below `GENERAL_TOL`.
/// - `Anyhow` when the AR backend fails (e.g. a constant column).
fn andrews_alpha(series: &ArrayView2<f64>, ord: usize) -> InferenceResult<f64> {
    if !(1..=2).contains(&ord) {
        return Err(InferenceError::OrderNotSupported { ord });
    }
    let mut numerator = 0.0;
    let mut denominator = 0.0;

    for column in series.columns() {
        let values = column.to_vec();
        let coeffs = estimate::fit(&values, 1, 0, 0)?;
        let (intercept, phi) = (coeffs[0], coeffs[1]);
        if phi.abs() >= 1.0 - STATIONARITY_MARGIN {
            return Err(InferenceError::StationarityViolated { phi });
        }
        let resid = estimate::residuals(&values, intercept, Some(&[phi]), None)?;
        let sigma2 = resid.iter().map(|e| e * e).sum::<f64>() / (resid.len() - 1) as f64;
        let sigma4 = sigma2 * sigma2;
        let phi2 = phi * phi;

        denominator += sigma4 / (1.0 - phi2).powi(4);
        numerator += 4.0 * phi2 * sigma4
            / match ord {
                1 => (1.0 - phi).powi(6) * (1.0 + phi).powi(2),
                _ => (1.0 - phi).powi(8),
            };
    }
    if !(denominator >= GENERAL_TOL) {
        return Err(InferenceError::DenominatorTooSmall { denominator });
    }
    let alpha = numerator / denominator;
    if !alpha.is_finite() {
        return Err(InferenceError::DenominatorTooSmall { denominator });
    }
    Ok(alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array2;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover kernel weights at landmark arguments, the plug-in
    // bandwidth's IID shortcut, and order validation. They do not pin
    // the AR(1) plug-in value itself, which depends on the `arima` backend.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Every taper equals 1 at the origin and the compact-support tapers
    // vanish at |x| = 1.
    fn kernel_weights_at_landmarks() {
        for kernel in [
            KernelType::IID,
            KernelType::Bartlett,
            KernelType::Parzen,
            KernelType::QuadraticSpectral,
        ] {
            assert_eq!(kernel.weight(0.0), 1.0);
        }
        assert_eq!(KernelType::IID.weight(0.25), 0.0);
        assert_relative_eq!(KernelType::Bartlett.weight(0.25), 0.75, epsilon = 1e-15);
        assert_relative_eq!(KernelType::Bartlett.weight(-0.25), 0.75, epsilon = 1e-15);
        assert_eq!(KernelType::Bartlett.weight(1.5), 0.0);
        assert_relative_eq!(KernelType::Parzen.weight(0.5), 0.25, epsilon = 1e-15);
        assert_relative_eq!(KernelType::Parzen.weight(1.0), 0.0, epsilon = 1e-15);
    }

    #[test]
    // Purpose
    // -------
    // Bartlett weights for bandwidth L are 1 − k/(L+1).
    //
    // Given
    // -----
    // - L = 3, lags k = 0..=3.
    //
    // Expect
    // ------
    // - Weights 1, 3/4, 1/2, 1/4.
    fn bartlett_weights_follow_newey_west_schedule() {
        let l = 3;
        let weights: Vec<f64> =
            (0..=l).map(|k| KernelType::Bartlett.weight(k as f64 / (l + 1) as f64)).collect();

        assert_eq!(weights, vec![1.0, 0.75, 0.5, 0.25]);
    }

    #[test]
    // Purpose
    // -------
    // The QS taper is continuous at the origin.
    fn quadratic_spectral_is_continuous_at_zero() {
        let near = KernelType::QuadraticSpectral.weight(1e-4);

        assert_relative_eq!(near, 1.0, epsilon = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // IID needs no bandwidth regardless of the series.
    fn optimal_bandwidth_iid_is_zero() {
        let series = Array2::from_shape_fn((16, 2), |(t, j)| ((t * 3 + j) % 5) as f64);

        assert_eq!(KernelType::IID.optimal_bandwidth(&series.view()), 0);
    }

    #[test]
    // Purpose
    // -------
    // Unsupported plug-in orders are rejected before any AR fit.
    fn andrews_alpha_rejects_unsupported_order() {
        let series = Array2::<f64>::zeros((8, 1));

        match andrews_alpha(&series.view(), 3) {
            Err(InferenceError::OrderNotSupported { ord: 3 }) => (),
            other => panic!("expected OrderNotSupported, got {other:?}"),
        }
    }
}
