//! linalg::dense — small dense-matrix helpers shared across the crate.
//!
//! Purpose
//! -------
//! Keep `ndarray` as the storage type for every public entity while
//! delegating factorizations (SVD, Cholesky, symmetric eigendecomposition) to
//! `nalgebra`. The helpers here copy between the two representations and
//! implement the handful of structured operations (Kronecker products,
//! `vech`, symmetrization) that the reduced-form, HAC, and MSW layers need.
//!
//! Key behaviors
//! -------------
//! - [`to_dmatrix`] / [`from_dmatrix`] bridge `Array2<f64>` and
//!   `DMatrix<f64>`.
//! - [`DesignSvd`] solves least-squares problems on a regressor matrix
//!   through its thin SVD and reports `σ_min / σ_max` for rank checks.
//! - [`cholesky_lower`] factorizes symmetric positive definite matrices.
//!   Failures are reported as `None` so callers can map them into their own
//!   error type.
//! - [`symmetric_spectrum`] returns the extreme eigenvalues used for the
//!   positive-semidefinite checks.
//! - [`kron`], [`vech`], [`vech_len`], [`symmetrize`] implement the
//!   vectorization conventions (column-major `vec`, lower-triangle `vech`).
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs to the symmetric routines are square; only their lower triangle
//!   is trusted by `nalgebra::Cholesky`, while the eigen routines assume the
//!   caller already symmetrized.
//! - Helpers never panic on numerically bad input; they panic only on shape
//!   mismatches, which are programmer errors.
//!
//! Conventions
//! -----------
//! - `vec(M)` stacks columns; element `(i, j)` of an `r×c` matrix sits at
//!   index `j·r + i`.
//! - `vech(M)` stacks the lower triangle column by column: `(j, j), (j+1, j),
//!   …, (n−1, j)` for `j = 0, …, n−1`.
use nalgebra::{Cholesky, DMatrix};
use ndarray::{Array1, Array2, ArrayView2};

/// Copy an `ndarray` matrix into a freshly allocated `nalgebra::DMatrix`.
///
/// The copy proceeds column by column to match the column-major storage of
/// `DMatrix`.
pub fn to_dmatrix(m: &ArrayView2<f64>) -> DMatrix<f64> {
    let (rows, cols) = m.dim();
    let mut out = DMatrix::<f64>::zeros(rows, cols);
    for j in 0..cols {
        for i in 0..rows {
            out[(i, j)] = m[[i, j]];
        }
    }
    out
}

/// Copy a `nalgebra::DMatrix` back into an owned `ndarray` matrix.
pub fn from_dmatrix(m: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}

/// DesignSvd — thin singular value decomposition `X = U S Vᵀ` of a tall
/// regressor matrix.
///
/// Purpose
/// -------
/// Solve least-squares problems on the design matrix itself instead of on
/// its Gram matrix, so conditioning is `cond(X)` rather than `cond(X)²`.
///
/// Fields
/// ------
/// - `u`: `r×k` left singular vectors.
/// - `singular`: the `k` singular values.
/// - `v_t`: `k×k` transposed right singular vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignSvd {
    u: Array2<f64>,
    singular: Array1<f64>,
    v_t: Array2<f64>,
}

impl DesignSvd {
    /// Decompose an `r×k` matrix with `r ≥ k`.
    ///
    /// Returns `None` when `X` is wide, contains non-finite entries, or the
    /// SVD iteration fails to converge.
    pub fn new(x: &ArrayView2<f64>) -> Option<Self> {
        let (rows, cols) = x.dim();
        if rows < cols || cols == 0 || !x.iter().all(|v| v.is_finite()) {
            return None;
        }
        let svd = to_dmatrix(x).try_svd(true, true, f64::EPSILON, 0)?;
        let u = from_dmatrix(&svd.u?);
        let v_t = from_dmatrix(&svd.v_t?);
        let singular = Array1::from(svd.singular_values.iter().copied().collect::<Vec<f64>>());
        Some(DesignSvd { u, singular, v_t })
    }

    /// Reciprocal condition number `σ_min / σ_max`; `0` for a zero matrix.
    pub fn rcond(&self) -> f64 {
        let min = self.singular.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.singular.iter().copied().fold(0.0, f64::max);
        if max > 0.0 { min / max } else { 0.0 }
    }

    /// Moore–Penrose pseudo-inverse `X⁺ = V S⁻¹ Uᵀ` (`k×r`).
    ///
    /// Callers check [`rcond`](Self::rcond) first; every singular value is
    /// inverted.
    pub fn pseudo_inverse(&self) -> Array2<f64> {
        let mut v_scaled = self.v_t.t().to_owned();
        for (mut col, s) in v_scaled.columns_mut().into_iter().zip(self.singular.iter()) {
            col /= *s;
        }
        v_scaled.dot(&self.u.t())
    }

    /// Least-squares solution `B = X⁺ Y` of `X B ≈ Y` for `Y` with `r` rows.
    pub fn solve(&self, y: &ArrayView2<f64>) -> Array2<f64> {
        self.pseudo_inverse().dot(y)
    }
}

/// Lower-triangular Cholesky factor `L` with `A = L Lᵀ`, or `None` when `A`
/// is not numerically positive definite.
pub fn cholesky_lower(a: &ArrayView2<f64>) -> Option<Array2<f64>> {
    let chol = Cholesky::new(to_dmatrix(a))?;
    Some(from_dmatrix(&chol.l()))
}

/// Smallest and largest eigenvalue of a symmetric matrix.
///
/// Returns `(λ_min, λ_max)`. Non-finite inputs propagate into non-finite
/// eigenvalues, which callers must treat as a failure.
pub fn symmetric_spectrum(a: &ArrayView2<f64>) -> (f64, f64) {
    let eigenvalues = to_dmatrix(a).symmetric_eigenvalues();
    let min = eigenvalues.iter().copied().fold(f64::INFINITY, f64::min);
    let max = eigenvalues.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (min, max)
}

/// Return `(A + Aᵀ) / 2`.
pub fn symmetrize(a: &Array2<f64>) -> Array2<f64> {
    (a + &a.t()) * 0.5
}

/// Kronecker product `A ⊗ B`.
///
/// For `A` of shape `r_a×c_a` and `B` of shape `r_b×c_b` the result has
/// shape `(r_a·r_b)×(c_a·c_b)` with block `(i, j)` equal to `A[i, j]·B`.
pub fn kron(a: &ArrayView2<f64>, b: &ArrayView2<f64>) -> Array2<f64> {
    let (ra, ca) = a.dim();
    let (rb, cb) = b.dim();
    Array2::from_shape_fn((ra * rb, ca * cb), |(i, j)| a[[i / rb, j / cb]] * b[[i % rb, j % cb]])
}

/// Number of distinct entries of a symmetric `n×n` matrix, `n(n+1)/2`.
pub fn vech_len(n: usize) -> usize {
    n * (n + 1) / 2
}

/// Half-vectorization of a square matrix (lower triangle, column by column).
pub fn vech(a: &ArrayView2<f64>) -> Array1<f64> {
    let n = a.nrows();
    let mut out = Array1::<f64>::zeros(vech_len(n));
    let mut idx = 0;
    for j in 0..n {
        for i in j..n {
            out[idx] = a[[i, j]];
            idx += 1;
        }
    }
    out
}
