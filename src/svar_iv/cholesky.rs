//! svar_iv::cholesky — recursive (Cholesky) benchmark IRF.
//!
//! The benchmark identifies shock `norm` as the `norm`-th column of the
//! lower Cholesky factor `L` of `Σ`, rescaled so the normalized variable
//! moves by `scale` on impact:
//!
//! ```text
//! b = scale · L[:, norm] / L[norm, norm],    IRF(h) = C_h b.
//! ```
//!
//! The result depends on the variable ordering and is reported only for
//! comparison with the external-instrument estimate; no standard errors are
//! attached.
use crate::{
    linalg::dense::cholesky_lower,
    svar_iv::{
        errors::{SVARError, SVARResult},
        options::MSWOptions,
    },
    var::{ma_rep::MARepresentation, reduced_form::ReducedForm},
};
use ndarray::{Array1, Array2, ArrayView2};

/// CholeskyIRF — benchmark responses (`n×(H+1)`).
#[derive(Debug, Clone, PartialEq)]
pub struct CholeskyIRF {
    irf: Array2<f64>,
    impact: Array1<f64>,
}

impl CholeskyIRF {
    pub fn irf(&self) -> ArrayView2<'_, f64> {
        self.irf.view()
    }

    /// Impact vector `b`; `b[norm] == scale`.
    pub fn impact(&self) -> &Array1<f64> {
        &self.impact
    }
}

/// Cholesky-identified IRF for shock `opts.norm`.
///
/// Errors
/// ------
/// - `SVARError::InvalidNormalization` if `norm ≥ n`.
/// - `SVARError::SigmaNotPositiveDefinite` if `Σ` has no Cholesky factor.
pub fn cholesky_irf(
    rf: &ReducedForm, ma: &MARepresentation, opts: &MSWOptions,
) -> SVARResult<CholeskyIRF> {
    opts.validate()?;
    let n = rf.n_vars();
    let k = opts.norm;
    if k >= n {
        return Err(SVARError::InvalidNormalization { norm: k, n_vars: n });
    }
    let lower = cholesky_lower(&rf.sigma()).ok_or(SVARError::SigmaNotPositiveDefinite)?;
    let pivot = lower[[k, k]];
    if !(pivot > 0.0) {
        return Err(SVARError::SigmaNotPositiveDefinite);
    }

    let mut impact = lower.column(k).mapv(|v| v / pivot) * opts.scale;
    impact[k] = opts.scale;

    let cols = ma.horizons() + 1;
    let mut irf = Array2::<f64>::zeros((n, cols));
    for h in 0..cols {
        irf.column_mut(h).assign(&ma.coefficient(h).dot(&impact));
    }
    Ok(CholeskyIRF { irf, impact })
}
