//! svar_iv::robust_set — weak-instrument-robust (MSW) confidence sets.
//!
//! Purpose
//! -------
//! Invert the Anderson–Rubin-type test of `H₀: IRF_j(h) = λ`,
//!
//! ```text
//! T_u (scale·x̂ − λ Γ̂_norm)²  ≤  χ²₁(confidence) · Var(scale·x̂ − λ Γ̂_norm),
//! ```
//!
//! whose size does not depend on instrument strength. Both sides are
//! quadratic in `λ`, so the non-rejection region is `{λ : aλ² + bλ + c ≤ 0}`
//! and is found in closed form.
//!
//! Key behaviors
//! -------------
//! - [`QuadraticCoefficients::classify`] maps `(a, b, c)` onto one of four
//!   outcomes with discriminant `D = b² − 4ac` (zero within round-off of
//!   its terms):
//!   - `a > 0, D ≥ 0` → [`ConfidenceSet::Bounded`] (a point when `D = 0`);
//!   - `a < 0, D > 0` → [`ConfidenceSet::Unbounded`], the union of two
//!     rays `(−∞, lower] ∪ [upper, ∞)`;
//!   - `a > 0, D < 0` → [`ConfidenceSet::Empty`];
//!   - `a < 0, D ≤ 0` → [`ConfidenceSet::RealLine`];
//!   - `a = 0` leaves the linear inequality `bλ + c ≤ 0`: a half-line
//!     reported as `Unbounded` with one infinite end when `b ≠ 0`, otherwise
//!     `RealLine` or `Empty` by the sign of `c`.
//! - [`robust_confidence_set`] evaluates every (variable, horizon) cell
//!   independently; unbounded and empty cells are recorded as values and
//!   never stop the remaining cells.
//!
//! Invariants & assumptions
//! ------------------------
//! - `a = T_u Γ_norm² − χ W_ΓΓ[norm, norm]` is shared by all cells, so the
//!   set is bounded at every cell exactly when the first-stage Wald
//!   statistic exceeds the critical value.
//! - At `λ` equal to the plug-in IRF the quadratic equals
//!   `−χ · Var(…) ≤ 0`, so a non-empty set always contains the plug-in
//!   estimate.
//!
//! Conventions
//! -----------
//! - Numeric views report `±∞` for `Unbounded` and `RealLine` cells and
//!   `NaN` for `Empty` cells.
use crate::{
    inference::rf_covariance::AsymptoticCovariance,
    linalg::DISCRIMINANT_RTOL,
    svar_iv::{
        errors::{SVARError, SVARResult},
        options::MSWOptions,
        plugin::{check_covariance, normalization_gamma, response_terms},
    },
    var::{ma_rep::MARepresentation, reduced_form::ReducedForm},
};
use ndarray::{Array2, ArrayView1};

/// ConfidenceSet — outcome of the robust test inversion at one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfidenceSet {
    /// `[lower, upper]`.
    Bounded { lower: f64, upper: f64 },
    /// `(−∞, lower] ∪ [upper, ∞)` with `lower ≤ upper`. A half-line has
    /// `upper = ∞` or `lower = −∞`.
    Unbounded { lower: f64, upper: f64 },
    /// The whole real line; the instrument carries no information.
    RealLine,
    /// No value is accepted.
    Empty,
}

impl ConfidenceSet {
    /// Whether `λ` belongs to the set.
    pub fn contains(&self, lambda: f64) -> bool {
        match *self {
            ConfidenceSet::Bounded { lower, upper } => lower <= lambda && lambda <= upper,
            ConfidenceSet::Unbounded { lower, upper } => lambda <= lower || lambda >= upper,
            ConfidenceSet::RealLine => true,
            ConfidenceSet::Empty => false,
        }
    }

    pub fn is_bounded(&self) -> bool {
        matches!(self, ConfidenceSet::Bounded { .. })
    }

    /// Presentation bounds: the interval for `Bounded`, `(−∞, ∞)` for
    /// `Unbounded` and `RealLine`, `(NaN, NaN)` for `Empty`.
    pub fn numeric_bounds(&self) -> (f64, f64) {
        match *self {
            ConfidenceSet::Bounded { lower, upper } => (lower, upper),
            ConfidenceSet::Unbounded { .. } | ConfidenceSet::RealLine => {
                (f64::NEG_INFINITY, f64::INFINITY)
            }
            ConfidenceSet::Empty => (f64::NAN, f64::NAN),
        }
    }

    /// Short label used by the Python surface and log summaries.
    pub fn label(&self) -> &'static str {
        match self {
            ConfidenceSet::Bounded { .. } => "bounded",
            ConfidenceSet::Unbounded { .. } => "unbounded",
            ConfidenceSet::RealLine => "real_line",
            ConfidenceSet::Empty => "empty",
        }
    }
}

/// `a λ² + b λ + c` whose non-positive region is the confidence set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticCoefficients {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl QuadraticCoefficients {
    /// `b² − 4ac`, snapped to zero within [`DISCRIMINANT_RTOL`] of the
    /// magnitude of its terms.
    pub fn discriminant(&self) -> f64 {
        let bb = self.b * self.b;
        let four_ac = 4.0 * self.a * self.c;
        let disc = bb - four_ac;
        if disc.abs() <= DISCRIMINANT_RTOL * (bb + four_ac.abs()) { 0.0 } else { disc }
    }

    /// Evaluate the quadratic at `λ`.
    pub fn eval(&self, lambda: f64) -> f64 {
        (self.a * lambda + self.b) * lambda + self.c
    }

    /// Four-way case split of `{λ : aλ² + bλ + c ≤ 0}`.
    ///
    /// Roots use the cancellation-free form `q = −(b + sign(b)√D)/2`,
    /// `r₁ = q/a`, `r₂ = c/q`. An exactly zero `a` reduces to
    /// `bλ + c ≤ 0`.
    pub fn classify(&self) -> ConfidenceSet {
        let QuadraticCoefficients { a, b, c } = *self;
        if a == 0.0 {
            return linear_set(b, c);
        }
        let disc = self.discriminant();
        if a > 0.0 && disc >= 0.0 {
            let (lower, upper) = ordered_roots(a, b, c, disc);
            ConfidenceSet::Bounded { lower, upper }
        } else if a < 0.0 && disc > 0.0 {
            let (lower, upper) = ordered_roots(a, b, c, disc);
            ConfidenceSet::Unbounded { lower, upper }
        } else if a > 0.0 {
            ConfidenceSet::Empty
        } else {
            ConfidenceSet::RealLine
        }
    }
}

/// RobustConfidenceSet — per (variable, horizon) outcomes and coefficients.
///
/// Both grids are `n×(H+1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct RobustConfidenceSet {
    sets: Array2<ConfidenceSet>,
    coefficients: Array2<QuadraticCoefficients>,
    critical_value: f64,
}

impl RobustConfidenceSet {
    /// Outcome at variable `j`, horizon `h`.
    pub fn get(&self, j: usize, h: usize) -> ConfidenceSet {
        self.sets[[j, h]]
    }

    /// Quadratic behind the outcome at variable `j`, horizon `h`.
    pub fn coefficients(&self, j: usize, h: usize) -> QuadraticCoefficients {
        self.coefficients[[j, h]]
    }

    /// `χ²₁(confidence)` used for the inversion.
    pub fn critical_value(&self) -> f64 {
        self.critical_value
    }

    /// `(n, H+1)`.
    pub fn dim(&self) -> (usize, usize) {
        self.sets.dim()
    }

    /// Finite interval at (`j`, `h`).
    ///
    /// Errors
    /// ------
    /// - `SVARError::UnboundedConfidenceSet` for `Unbounded` and `RealLine`.
    /// - `SVARError::EmptyConfidenceSet` for `Empty`.
    pub fn bounds(&self, j: usize, h: usize) -> SVARResult<(f64, f64)> {
        match self.get(j, h) {
            ConfidenceSet::Bounded { lower, upper } => Ok((lower, upper)),
            ConfidenceSet::Unbounded { .. } | ConfidenceSet::RealLine => {
                Err(SVARError::UnboundedConfidenceSet { variable: j, horizon: h })
            }
            ConfidenceSet::Empty => Err(SVARError::EmptyConfidenceSet { variable: j, horizon: h }),
        }
    }

    /// Lower presentation bounds (`n×(H+1)`).
    pub fn lower_bounds(&self) -> Array2<f64> {
        self.sets.mapv(|set| set.numeric_bounds().0)
    }

    /// Upper presentation bounds (`n×(H+1)`).
    pub fn upper_bounds(&self) -> Array2<f64> {
        self.sets.mapv(|set| set.numeric_bounds().1)
    }

    /// Whether every cell is a finite interval.
    pub fn all_bounded(&self) -> bool {
        self.sets.iter().all(ConfidenceSet::is_bounded)
    }

    /// Number of cells that are not finite intervals.
    pub fn count_unbounded(&self) -> usize {
        self.sets
            .iter()
            .filter(|s| matches!(s, ConfidenceSet::Unbounded { .. } | ConfidenceSet::RealLine))
            .count()
    }

    pub fn count_empty(&self) -> usize {
        self.sets.iter().filter(|s| matches!(s, ConfidenceSet::Empty)).count()
    }
}

/// Weak-IV-robust confidence sets for every variable and horizon.
///
/// Parameters
/// ----------
/// - `rf`, `cov`, `ma`, `opts`: as for [`plugin_irf`](crate::svar_iv::plugin::plugin_irf).
///
/// Returns
/// -------
/// `SVARResult<RobustConfidenceSet>`
///   Outcomes and quadratic coefficients; unbounded or empty cells are
///   ordinary values.
///
/// Errors
/// ------
/// - Normalization and covariance-shape failures only.
pub fn robust_confidence_set(
    rf: &ReducedForm, cov: &AsymptoticCovariance, ma: &MARepresentation, opts: &MSWOptions,
) -> SVARResult<RobustConfidenceSet> {
    opts.validate()?;
    let gamma_norm = normalization_gamma(rf, opts)?;
    check_covariance(rf, cov)?;

    let n = rf.n_vars();
    let norm = opts.norm;
    let scale = opts.scale;
    let usable = rf.usable_len() as f64;
    let chi = opts.chi2_critical();
    let gamma = rf.gamma();
    let w_aa = cov.w_aa();
    let w_ag = cov.w_a_gamma();
    let w_gg = cov.w_gamma_gamma();
    let w_ag_norm = w_ag.column(norm);
    let w_gg_norm = w_gg.column(norm);

    let a = usable * gamma_norm * gamma_norm - chi * w_gg[[norm, norm]];

    let cols = ma.horizons() + 1;
    let coefficients = Array2::from_shape_fn((n, cols), |(j, h)| {
        let terms = response_terms(ma, &gamma, j, h);
        let c_row: ArrayView1<f64> = terms.c_row.view();
        let g_a: ArrayView1<f64> = terms.grad_a.view();

        let cross = g_a.dot(&w_ag_norm) + c_row.dot(&w_gg_norm);
        let var_x = g_a.dot(&w_aa.dot(&g_a))
            + 2.0 * g_a.dot(&w_ag.dot(&c_row))
            + c_row.dot(&w_gg.dot(&c_row));

        QuadraticCoefficients {
            a,
            b: -2.0 * usable * scale * terms.x * gamma_norm + 2.0 * chi * scale * cross,
            c: usable * scale * scale * terms.x * terms.x - chi * scale * scale * var_x,
        }
    });
    let sets = coefficients.mapv(|q| q.classify());

    Ok(RobustConfidenceSet { sets, coefficients, critical_value: chi })
}

// ---- Helper methods ----

/// Roots of `aλ² + bλ + c` (`a ≠ 0`, `D ≥ 0`) in increasing order.
/// `{λ : bλ + c ≤ 0}`.
fn linear_set(b: f64, c: f64) -> ConfidenceSet {
    if b > 0.0 {
        ConfidenceSet::Unbounded { lower: -c / b, upper: f64::INFINITY }
    } else if b < 0.0 {
        ConfidenceSet::Unbounded { lower: f64::NEG_INFINITY, upper: -c / b }
    } else if c <= 0.0 {
        ConfidenceSet::RealLine
    } else {
        ConfidenceSet::Empty
    }
}

fn ordered_roots(a: f64, b: f64, c: f64, disc: f64) -> (f64, f64) {
    let sqrt_d = disc.sqrt();
    let q = -0.5 * (b + b.signum() * sqrt_d);
    let r1 = q / a;
    let r2 = if q != 0.0 { c / q } else { r1 };
    (r1.min(r2), r1.max(r2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover the four-way case split on hand-picked quadratics,
    // root ordering and accuracy, membership, and the numeric/erroring
    // views. Data-driven behavior (strong vs weak instruments) is covered in
    // the pipeline integration tests.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // An upward parabola with two roots gives the interval between them.
    //
    // Given
    // -----
    // - (λ − 1)(λ − 3) = λ² − 4λ + 3.
    //
    // Expect
    // ------
    // - Bounded [1, 3] containing 2 but not 0.
    fn classify_upward_parabola_with_roots_is_bounded() {
        // Arrange
        let q = QuadraticCoefficients { a: 1.0, b: -4.0, c: 3.0 };

        // Act
        let set = q.classify();

        // Assert
        match set {
            ConfidenceSet::Bounded { lower, upper } => {
                assert_relative_eq!(lower, 1.0, epsilon = 1e-14);
                assert_relative_eq!(upper, 3.0, epsilon = 1e-14);
            }
            other => panic!("expected Bounded, got {other:?}"),
        }
        assert!(set.contains(2.0));
        assert!(!set.contains(0.0));
    }

    #[test]
    // Purpose
    // -------
    // A downward parabola with two roots accepts the two outer rays.
    //
    // Given
    // -----
    // - −(λ − 1)(λ − 3) = −λ² + 4λ − 3.
    //
    // Expect
    // ------
    // - Unbounded { lower: 1, upper: 3 }; 0 and 5 accepted, 2 rejected.
    fn classify_downward_parabola_with_roots_is_union_of_rays() {
        let q = QuadraticCoefficients { a: -1.0, b: 4.0, c: -3.0 };

        let set = q.classify();

        match set {
            ConfidenceSet::Unbounded { lower, upper } => {
                assert_relative_eq!(lower, 1.0, epsilon = 1e-14);
                assert_relative_eq!(upper, 3.0, epsilon = 1e-14);
            }
            other => panic!("expected Unbounded, got {other:?}"),
        }
        assert!(set.contains(0.0) && set.contains(5.0));
        assert!(!set.contains(2.0));
        assert_eq!(set.numeric_bounds(), (f64::NEG_INFINITY, f64::INFINITY));
    }

    #[test]
    // Purpose
    // -------
    // Without real roots the sign of `a` decides between empty and
    // everything.
    fn classify_without_roots_depends_on_leading_sign() {
        let always_positive = QuadraticCoefficients { a: 1.0, b: 0.0, c: 1.0 };
        let always_negative = QuadraticCoefficients { a: -1.0, b: 0.0, c: -1.0 };

        assert_eq!(always_positive.classify(), ConfidenceSet::Empty);
        assert_eq!(always_negative.classify(), ConfidenceSet::RealLine);
        let (lo, hi) = ConfidenceSet::Empty.numeric_bounds();
        assert!(lo.is_nan() && hi.is_nan());
    }

    #[test]
    // Purpose
    // -------
    // Boundary cases: a double root is a point and a downward parabola
    // touching zero is uninformative.
    fn classify_boundary_cases() {
        let double_root = QuadraticCoefficients { a: 1.0, b: -4.0, c: 4.0 };
        let touching = QuadraticCoefficients { a: -1.0, b: 4.0, c: -4.0 };

        assert_eq!(double_root.classify(), ConfidenceSet::Bounded { lower: 2.0, upper: 2.0 });
        assert_eq!(touching.classify(), ConfidenceSet::RealLine);
    }

    #[test]
    // Purpose
    // -------
    // A vanishing leading coefficient leaves the linear inequality
    // `bλ + c ≤ 0`.
    //
    // Given
    // -----
    // - a = 0 with b = 1, c = −1 (λ ≤ 1) and b = −2, c = 4 (λ ≥ 2).
    // - a = b = 0 with c = −1 and c = 1.
    //
    // Expect
    // ------
    // - Half-lines reported as `Unbounded` with one infinite end.
    // - `RealLine` for c ≤ 0 and `Empty` for c > 0.
    fn classify_linear_case_gives_half_lines() {
        let below = QuadraticCoefficients { a: 0.0, b: 1.0, c: -1.0 }.classify();
        let above = QuadraticCoefficients { a: 0.0, b: -2.0, c: 4.0 }.classify();
        let everything = QuadraticCoefficients { a: 0.0, b: 0.0, c: -1.0 }.classify();
        let nothing = QuadraticCoefficients { a: 0.0, b: 0.0, c: 1.0 }.classify();

        assert_eq!(below, ConfidenceSet::Unbounded { lower: 1.0, upper: f64::INFINITY });
        assert!(below.contains(-50.0) && below.contains(1.0) && !below.contains(1.5));
        assert_eq!(above, ConfidenceSet::Unbounded { lower: f64::NEG_INFINITY, upper: 2.0 });
        assert!(above.contains(2.0) && above.contains(50.0) && !above.contains(1.5));
        assert_eq!(everything, ConfidenceSet::RealLine);
        assert_eq!(nothing, ConfidenceSet::Empty);
    }

    #[test]
    // Purpose
    // -------
    // A discriminant that is negative only through round-off still gives
    // a (point-like) interval rather than an empty set.
    //
    // Given
    // -----
    // - λ² − 4λ + (4 + 1e−14): D = −4e−14 against terms of size 16.
    //
    // Expect
    // ------
    // - D snapped to 0 and a Bounded set around 2.
    fn classify_snaps_round_off_discriminant() {
        let q = QuadraticCoefficients { a: 1.0, b: -4.0, c: 4.0 + 1e-14 };

        assert_eq!(q.discriminant(), 0.0);
        match q.classify() {
            ConfidenceSet::Bounded { lower, upper } => {
                assert_relative_eq!(lower, 2.0, epsilon = 1e-6);
                assert_relative_eq!(upper, 2.0, epsilon = 1e-6);
            }
            other => panic!("expected Bounded, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // The stable root formula stays accurate when b² ≫ |4ac|.
    //
    // Given
    // -----
    // - λ² − 1e8 λ + 1 with roots ≈ 1e−8 and ≈ 1e8.
    //
    // Expect
    // ------
    // - The small root is recovered to full relative precision.
    fn classify_recovers_small_root_without_cancellation() {
        let q = QuadraticCoefficients { a: 1.0, b: -1e8, c: 1.0 };

        match q.classify() {
            ConfidenceSet::Bounded { lower, upper } => {
                assert_relative_eq!(lower, 1e-8, max_relative = 1e-12);
                assert_relative_eq!(upper, 1e8, max_relative = 1e-12);
                assert!(q.eval(lower).abs() < 1e-12);
            }
            other => panic!("expected Bounded, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // `bounds` turns non-interval outcomes into the dedicated errors.
    fn robust_set_bounds_report_unbounded_and_empty() {
        let sets = Array2::from_shape_vec(
            (1, 3),
            vec![
                ConfidenceSet::Bounded { lower: -1.0, upper: 1.0 },
                ConfidenceSet::RealLine,
                ConfidenceSet::Empty,
            ],
        )
        .expect("1×3");
        let coefficients = Array2::from_elem((1, 3), QuadraticCoefficients { a: 1.0, b: 0.0, c: -1.0 });
        let robust = RobustConfidenceSet { sets, coefficients, critical_value: 3.84 };

        assert_eq!(robust.bounds(0, 0), Ok((-1.0, 1.0)));
        assert_eq!(
            robust.bounds(0, 1),
            Err(SVARError::UnboundedConfidenceSet { variable: 0, horizon: 1 })
        );
        assert_eq!(robust.bounds(0, 2), Err(SVARError::EmptyConfidenceSet { variable: 0, horizon: 2 }));
        assert_eq!(robust.count_unbounded(), 1);
        assert_eq!(robust.count_empty(), 1);
        assert!(!robust.all_bounded());
        assert_eq!(robust.upper_bounds()[[0, 1]], f64::INFINITY);
    }
}
