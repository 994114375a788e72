//! var::ma_rep — moving-average coefficients of a VAR(p) and their
//! derivatives with respect to the slope coefficients.
//!
//! Purpose
//! -------
//! Provide the horizon recursion shared by the plug-in, robust-set, and
//! Cholesky IRFs: `C_h = Σ_{l=1}^{min(h,p)} A_l C_{h−l}` with `C_0 = I_n`,
//! together with the Jacobians `G_h = ∂vec(C_h)/∂vec(A)'` used by the delta
//! method and by the MSW quadratic.
//!
//! Key behaviors
//! -------------
//! - [`MARepresentation::new`] runs both recursions once for horizons
//!   `0..=H` and stores the results.
//! - With `cumulative = true` the stored sequences are running sums
//!   `Σ_{i≤h} C_i` and `Σ_{i≤h} G_i`; horizon 0 is unchanged.
//!
//! Invariants & assumptions
//! ------------------------
//! - `A = [A_1, …, A_p]` is `n×np`; `vec(A)` is column-major, so the block
//!   belonging to `A_l` occupies indices `(l−1)n² .. l·n²`.
//! - `G_h` is `n²×n²p`. `G_0 = 0` and `G_1` selects the `A_1` block.
//!
//! Conventions
//! -----------
//! - Derivatives follow `vec(M N) = (N' ⊗ I) vec(M) = (I ⊗ M) vec(N)`.
use crate::{linalg::kron, var::reduced_form::ReducedForm};
use ndarray::{Array2, ArrayView2, s};

/// Moving-average coefficients `C_0, …, C_H` and their Jacobians.
#[derive(Debug, Clone, PartialEq)]
pub struct MARepresentation {
    coefficients: Vec<Array2<f64>>,
    jacobians: Vec<Array2<f64>>,
    cumulative: bool,
}

impl MARepresentation {
    /// Run the MA recursion of `rf` up to horizon `horizons` (inclusive).
    ///
    /// Parameters
    /// ----------
    /// - `rf`: `&ReducedForm`
    ///   Source of the lag matrices `A_1, …, A_p`.
    /// - `horizons`: `usize`
    ///   Largest horizon `H`; `H + 1` matrices are produced.
    /// - `cumulative`: `bool`
    ///   Accumulate `C_h` and `G_h` over horizons.
    ///
    /// Notes
    /// -----
    /// - Cost is `O(H·p)` products of `n²×n²` by `n²×n²p` matrices, which is
    ///   negligible next to the HAC step for the dimensions this crate
    ///   targets.
    pub fn new(rf: &ReducedForm, horizons: usize, cumulative: bool) -> Self {
        let n = rf.n_vars();
        let p = rf.p();
        let lags: Vec<ArrayView2<f64>> = (1..=p).map(|l| rf.lag_matrix(l)).collect();
        let eye = Array2::<f64>::eye(n);
        let lag_kron: Vec<Array2<f64>> = lags.iter().map(|a| kron(&eye.view(), a)).collect();

        let mut c: Vec<Array2<f64>> = Vec::with_capacity(horizons + 1);
        let mut g: Vec<Array2<f64>> = Vec::with_capacity(horizons + 1);
        c.push(eye.clone());
        g.push(Array2::zeros((n * n, n * n * p)));

        for h in 1..=horizons {
            let mut c_h = Array2::<f64>::zeros((n, n));
            let mut g_h = Array2::<f64>::zeros((n * n, n * n * p));
            for l in 1..=h.min(p) {
                let a_l = &lags[l - 1];
                let c_prev = &c[h - l];
                c_h += &a_l.dot(c_prev);

                let block = kron(&c_prev.t(), &eye.view());
                let start = (l - 1) * n * n;
                let mut target = g_h.slice_mut(s![.., start..start + n * n]);
                target += &block;
                g_h += &lag_kron[l - 1].dot(&g[h - l]);
            }
            c.push(c_h);
            g.push(g_h);
        }

        if cumulative {
            accumulate(&mut c);
            accumulate(&mut g);
        }

        MARepresentation { coefficients: c, jacobians: g, cumulative }
    }

    /// Largest horizon `H`.
    pub fn horizons(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Whether the sequences are cumulative.
    pub fn is_cumulative(&self) -> bool {
        self.cumulative
    }

    /// `C_h` (`n×n`), or its running sum when cumulative.
    pub fn coefficient(&self, h: usize) -> ArrayView2<'_, f64> {
        self.coefficients[h].view()
    }

    /// `G_h = ∂vec(C_h)/∂vec(A)'` (`n²×n²p`), or its running sum when
    /// cumulative.
    pub fn jacobian(&self, h: usize) -> ArrayView2<'_, f64> {
        self.jacobians[h].view()
    }
}

fn accumulate(seq: &mut [Array2<f64>]) {
    for h in 1..seq.len() {
        let (head, tail) = seq.split_at_mut(h);
        tail[0] += &head[h - 1];
    }
}
