//! Instrument/residual cross-moment `Γ`.
//!
//! `Γ = η·z / (T−p)` where `η` is the `n×(T−p)` reduced-form residual matrix
//! and `z` the instrument restricted to the usable sample. In population
//! `Γ` is proportional to the impact column of the shock the instrument
//! targets; the MSW layer normalizes by one of its entries.
use crate::var::errors::{VARError, VARResult};
use ndarray::{Array1, ArrayView1, ArrayView2};

/// Sample cross-moment between reduced-form residuals and the instrument.
///
/// Parameters
/// ----------
/// - `residuals`: `&ArrayView2<f64>`
///   `n×(T−p)` residual matrix `η`.
/// - `usable_instrument`: `&ArrayView1<f64>`
///   Instrument values for periods `p, …, T−1` (length `T−p`).
///
/// Errors
/// ------
/// - `VARError::InstrumentLengthMismatch` when the two inputs are not
///   time-aligned.
pub fn estimate_gamma(
    residuals: &ArrayView2<f64>, usable_instrument: &ArrayView1<f64>,
) -> VARResult<Array1<f64>> {
    let usable = residuals.ncols();
    if usable_instrument.len() != usable || usable == 0 {
        return Err(VARError::InstrumentLengthMismatch {
            expected: usable,
            actual: usable_instrument.len(),
        });
    }
    Ok(residuals.dot(usable_instrument) / usable as f64)
}
