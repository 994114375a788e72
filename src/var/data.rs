//! Panel and instrument container for SVAR-IV estimation.
//!
//! Purpose
//! -------
//! Provide a small, validated container for the raw inputs of the
//! estimation path: a `T×n` panel of endogenous variables and a length-`T`
//! external instrument. This centralizes input validation so the
//! reduced-form estimator can assume clean, time-aligned data.
//!
//! Key behaviors
//! -------------
//! - [`SVARData`] enforces non-emptiness, finiteness of every panel and
//!   instrument entry, and equal time dimension of panel and instrument.
//! - [`SVARData::usable_instrument`] drops the first `p` instrument values,
//!   for which no reduced-form residual exists.
//!
//! Invariants & assumptions
//! ------------------------
//! - `panel.nrows() == instrument.len() > 0` and `panel.ncols() > 0`.
//! - All entries are finite; missing data is not supported.
//!
//! Conventions
//! -----------
//! - Rows index time (`t = 0, …, T−1`), columns index variables.
//! - Indexing is 0-based.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the happy path and every rejection branch of
//!   [`SVARData::new`].
use crate::var::errors::{VARError, VARResult};
use ndarray::{Array1, Array2, ArrayView1, s};

/// `SVARData` — validated panel of endogenous variables plus instrument.
///
/// Fields
/// ------
/// - `panel`: `Array2<f64>`
///   `T×n` observations; rows are periods, columns are variables.
/// - `instrument`: `Array1<f64>`
///   Length-`T` external instrument, time-aligned with `panel`.
///
/// Invariants
/// ----------
/// - `panel.nrows() == instrument.len()`, both non-zero, `panel.ncols() > 0`.
/// - Every entry is finite.
#[derive(Debug, Clone, PartialEq)]
pub struct SVARData {
    /// Endogenous variables (`T×n`).
    pub panel: Array2<f64>,
    /// External instrument (length `T`).
    pub instrument: Array1<f64>,
}

impl SVARData {
    /// Construct a validated [`SVARData`].
    ///
    /// Errors
    /// ------
    /// - `VARError::EmptyPanel` if the panel has no rows or columns.
    /// - `VARError::InstrumentLengthMismatch` if `instrument.len() != T`.
    /// - `VARError::NonFinitePanel` / `VARError::NonFiniteInstrument` for the
    ///   first non-finite entry found.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use ndarray::array;
    /// # use rust_svariv::var::data::SVARData;
    /// let panel = array![[1.0, 2.0], [1.5, 2.5], [0.5, 1.0]];
    /// let z = array![0.1, -0.2, 0.3];
    /// let data = SVARData::new(panel, z).unwrap();
    /// assert_eq!(data.n_vars(), 2);
    /// ```
    pub fn new(panel: Array2<f64>, instrument: Array1<f64>) -> VARResult<Self> {
        let (rows, cols) = panel.dim();
        if rows == 0 || cols == 0 {
            return Err(VARError::EmptyPanel { rows, cols });
        }
        if instrument.len() != rows {
            return Err(VARError::InstrumentLengthMismatch {
                expected: rows,
                actual: instrument.len(),
            });
        }

        for ((row, col), &value) in panel.indexed_iter() {
            if !value.is_finite() {
                return Err(VARError::NonFinitePanel { row, col, value });
            }
        }
        for (index, &value) in instrument.iter().enumerate() {
            if !value.is_finite() {
                return Err(VARError::NonFiniteInstrument { index, value });
            }
        }

        Ok(SVARData { panel, instrument })
    }

    /// Number of periods `T`.
    pub fn len(&self) -> usize {
        self.panel.nrows()
    }

    /// Always `false` for a validated container.
    pub fn is_empty(&self) -> bool {
        self.panel.is_empty()
    }

    /// Number of endogenous variables `n`.
    pub fn n_vars(&self) -> usize {
        self.panel.ncols()
    }

    /// Instrument restricted to periods `p, …, T−1`.
    ///
    /// Callers must ensure `p < T` (enforced by the reduced-form estimator).
    pub fn usable_instrument(&self, p: usize) -> ArrayView1<'_, f64> {
        self.instrument.slice(s![p..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover every validation branch of `SVARData::new` and the
    // usable-instrument slice.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // A finite, aligned panel and instrument are accepted unchanged.
    fn svar_data_new_accepts_valid_inputs() {
        // Arrange
        let panel = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let z = array![0.5, -0.5, 1.0];

        // Act
        let data = SVARData::new(panel.clone(), z.clone()).expect("valid inputs");

        // Assert
        assert_eq!(data.panel, panel);
        assert_eq!(data.instrument, z);
        assert_eq!(data.len(), 3);
        assert_eq!(data.n_vars(), 2);
        assert_eq!(data.usable_instrument(1).to_vec(), vec![-0.5, 1.0]);
    }

    #[test]
    // Purpose
    // -------
    // An instrument that is not time-aligned with the panel is rejected.
    fn svar_data_new_rejects_misaligned_instrument() {
        let panel = array![[1.0], [2.0], [3.0]];
        let z = array![0.5, -0.5];

        match SVARData::new(panel, z) {
            Err(VARError::InstrumentLengthMismatch { expected: 3, actual: 2 }) => (),
            other => panic!("expected InstrumentLengthMismatch, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Missing data encoded as NaN is rejected with its position.
    fn svar_data_new_rejects_nan_panel_entry() {
        let panel = array![[1.0, 2.0], [3.0, f64::NAN]];
        let z = array![0.5, -0.5];

        match SVARData::new(panel, z) {
            Err(VARError::NonFinitePanel { row: 1, col: 1, .. }) => (),
            other => panic!("expected NonFinitePanel at (1, 1), got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // A non-finite instrument value is rejected.
    fn svar_data_new_rejects_infinite_instrument() {
        let panel = array![[1.0], [2.0]];
        let z = array![f64::INFINITY, 0.0];

        match SVARData::new(panel, z) {
            Err(VARError::NonFiniteInstrument { index: 0, .. }) => (),
            other => panic!("expected NonFiniteInstrument at 0, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Empty panels are rejected before any other check.
    fn svar_data_new_rejects_empty_panel() {
        let panel = Array2::<f64>::zeros((0, 2));
        let z = Array1::<f64>::zeros(0);

        match SVARData::new(panel, z) {
            Err(VARError::EmptyPanel { rows: 0, cols: 2 }) => (),
            other => panic!("expected EmptyPanel, got {other:?}"),
        }
    }
}
