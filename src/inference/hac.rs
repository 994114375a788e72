//! inference::hac — kernel-weighted long-run covariance of influence rows.
//!
//! Purpose
//! -------
//! Aggregate a `n×k` matrix of per-period influence (score) rows into the
//! long-run covariance
//!
//! ```text
//! Ω  =  Γ₀  +  ∑_{j=1}^{L} w_j ( Γ_j + Γ_jᵀ ),
//! Γ₀ = (1/n) ΨᵀΨ,
//! Γ_j = c_j · Ψ_{j:}ᵀ Ψ_{:n−j},
//! ```
//!
//! where `w_j = kernel.weight(j/(L+1))` and `c_j` is `1/n`, or `1/(n−j)`
//! under the Newey–West small-sample scaling. For the reduced-form SVAR
//! parameters this is the asymptotic covariance of `√n (θ̂ − θ)`.
//!
//! Key behaviors
//! -------------
//! - [`HACOptions`] carries kernel, bandwidth regime, centering, and
//!   small-sample policy; [`HACOptions::newey_west`] is the Bartlett,
//!   fixed-lag, centered configuration used by the SVAR-IV pipeline.
//! - [`long_run_covariance`] validates its input, optionally demeans the
//!   rows, resolves the bandwidth, and accumulates the lag terms.
//!
//! Invariants & assumptions
//! ------------------------
//! - A fixed bandwidth must satisfy `L < n`; a plug-in bandwidth is capped
//!   at `n−1`.
//! - Centering happens once, before both bandwidth selection and
//!   aggregation, so the plug-in rule sees the series being aggregated.
//! - The result is returned as accumulated; symmetrization and the PSD check
//!   belong to callers that know their tolerance.
//!
//! Conventions
//! -----------
//! - Rows index time, columns index influence components.
//!
//! Testing notes
//! -------------
//! - Unit tests cover option constructors, the IID reduction to `ΨᵀΨ/n`,
//!   centering invariance on mean-zero input, small-sample scaling, and a
//!   hand-rolled Bartlett computation.
use crate::inference::{
    errors::{InferenceError, InferenceResult},
    kernel::KernelType,
};
use ndarray::{Array2, ArrayView2, Axis, CowArray, Ix2, s};

/// HACOptions — configuration for long-run covariance estimation.
///
/// Fields
/// ------
/// - `kernel`: [`KernelType`]
///   Taper family controlling `w_j`.
/// - `bandwidth`: `Option<usize>`
///   Fixed Newey–West lag count `L`, or `None` for the Andrews plug-in
///   rule of [`KernelType::optimal_bandwidth`].
/// - `center`: `bool`
///   Demean influence columns before selection and aggregation.
/// - `small_sample_correction`: `bool`
///   Use `c_j = 1/(n−j)` instead of `1/n`.
///
/// Notes
/// -----
/// - `Default` is `HACOptions::newey_west(0)`: Bartlett, no lags,
///   centered, no small-sample scaling.
#[derive(Debug, Clone, PartialEq)]
pub struct HACOptions {
    pub kernel: KernelType,
    pub bandwidth: Option<usize>,
    pub center: bool,
    pub small_sample_correction: bool,
}

impl HACOptions {
    /// Construct a `HACOptions` value from explicit settings.
    ///
    /// No validation happens here; a fixed bandwidth is checked against the
    /// sample length in [`long_run_covariance`].
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use rust_svariv::inference::kernel::KernelType;
    /// # use rust_svariv::inference::hac::HACOptions;
    /// let opts = HACOptions::new(None, KernelType::Parzen, true, false);
    /// assert!(opts.bandwidth.is_none());
    /// ```
    pub fn new(
        bandwidth: Option<usize>, kernel: KernelType, center: bool, small_sample_correction: bool,
    ) -> HACOptions {
        HACOptions { bandwidth, kernel, center, small_sample_correction }
    }

    /// Newey–West with `lags` Bartlett lags, centered influence rows, and
    /// `1/n` scaling for every lag.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use rust_svariv::inference::kernel::KernelType;
    /// # use rust_svariv::inference::hac::HACOptions;
    /// let opts = HACOptions::newey_west(4);
    /// assert_eq!(opts.kernel, KernelType::Bartlett);
    /// assert_eq!(opts.bandwidth, Some(4));
    /// ```
    pub fn newey_west(lags: usize) -> HACOptions {
        HACOptions::new(Some(lags), KernelType::Bartlett, true, false)
    }
}

impl Default for HACOptions {
    fn default() -> Self {
        HACOptions::newey_west(0)
    }
}

/// Long-run covariance together with the bandwidth that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct LongRunCovariance {
    /// `k×k` accumulated estimate `Ω`.
    pub matrix: Array2<f64>,
    /// Bandwidth `L` actually used.
    pub bandwidth: usize,
}

/// Build the `k×k` long-run covariance of `n×k` influence rows.
///
/// Parameters
/// ----------
/// - `hac_opts`: `&HACOptions`
///   Kernel, bandwidth regime, centering, and scaling policy.
/// - `influence`: `&ArrayView2<f64>`
///   `n×k` matrix of per-period influence rows (rows = time).
///
/// Returns
/// -------
/// `InferenceResult<LongRunCovariance>`
///   `Ω` on the average scale plus the resolved bandwidth.
///
/// Errors
/// ------
/// - `InferenceError::DimensionMismatch` if `influence` has no rows or no
///   columns.
/// - `InferenceError::InvalidBandwidth` if a fixed bandwidth is `≥ n`.
///
/// Notes
/// -----
/// - With `L = 0` this is the outer-product estimator `ΨᵀΨ/n`.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use rust_svariv::inference::hac::{HACOptions, long_run_covariance};
/// let psi = array![[1.0, -1.0], [0.5, -0.5], [1.5, -1.5]];
/// let lrc = long_run_covariance(&HACOptions::newey_west(1), &psi.view()).unwrap();
/// assert_eq!(lrc.matrix.shape(), &[2, 2]);
/// assert_eq!(lrc.bandwidth, 1);
/// ```
pub fn long_run_covariance(
    hac_opts: &HACOptions, influence: &ArrayView2<f64>,
) -> InferenceResult<LongRunCovariance> {
    let (n, k) = influence.dim();
    if n == 0 || k == 0 {
        return Err(InferenceError::DimensionMismatch {
            expected: vec![n.max(1), k.max(1)],
            actual: vec![n, k],
        });
    }

    let series: CowArray<'_, f64, Ix2> = if hac_opts.center {
        let means = influence.mean_axis(Axis(0)).ok_or(InferenceError::DimensionMismatch {
            expected: vec![1, k],
            actual: vec![n, k],
        })?;
        CowArray::from(influence - &means)
    } else {
        CowArray::from(influence.view())
    };
    let rows = series.view();

    let bandwidth = match hac_opts.bandwidth {
        Some(bw) if bw >= n => return Err(InferenceError::InvalidBandwidth { bandwidth: bw, len: n }),
        Some(bw) => bw,
        None => hac_opts.kernel.optimal_bandwidth(&rows).min(n - 1),
    };

    let mut omega = Array2::<f64>::zeros((k, k));
    for lag in 0..=bandwidth {
        add_hac_component(&mut omega, &rows, lag, bandwidth, hac_opts);
    }
    Ok(LongRunCovariance { matrix: omega, bandwidth })
}

// ---- Helper methods ----

/// Add the lag-`lag` term to the accumulator.
///
/// Lag 0 contributes `ΨᵀΨ/n`; lag `j > 0` contributes `w_j (Γ_j + Γ_jᵀ)`.
/// Assumes `lag ≤ bandwidth < n`.
fn add_hac_component(
    omega: &mut Array2<f64>, rows: &ArrayView2<f64>, lag: usize, bandwidth: usize,
    hac_opts: &HACOptions,
) {
    let n = rows.nrows();
    if lag == 0 {
        omega.scaled_add(1.0 / n as f64, &rows.t().dot(rows));
        return;
    }
    let weight = hac_opts.kernel.weight(lag as f64 / (bandwidth + 1) as f64);
    if weight == 0.0 {
        return;
    }
    let scaling = match hac_opts.small_sample_correction {
        true => 1.0 / (n - lag) as f64,
        false => 1.0 / n as f64,
    };
    let current = rows.slice(s![lag.., ..]);
    let lagged = rows.slice(s![..n - lag, ..]);
    let gamma_j = current.t().dot(&lagged) * scaling;
    omega.scaled_add(weight, &gamma_j);
    omega.scaled_add(weight, &gamma_j.t());
}
