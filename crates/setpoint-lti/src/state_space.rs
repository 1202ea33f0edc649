//! Continuous-time state-space realization.

use crate::error::LtiError;
use nalgebra::DMatrix;

/// `ẋ = A x + B u`, `y = C x + D u`.
///
/// Shapes are checked on construction: `A` is `n×n`, `B` is `n×m`,
/// `C` is `p×n` and `D` is `p×m`. Zero states is allowed (a static gain).
#[derive(Clone, Debug, PartialEq)]
pub struct StateSpace {
    a: DMatrix<f64>,
    b: DMatrix<f64>,
    c: DMatrix<f64>,
    d: DMatrix<f64>,
}

fn check(what: &'static str, m: &DMatrix<f64>, rows: usize, cols: usize) -> Result<(), LtiError> {
    if m.shape() != (rows, cols) {
        return Err(LtiError::ShapeMismatch {
            what,
            expected: (rows, cols),
            got: m.shape(),
        });
    }
    Ok(())
}

impl StateSpace {
    /// Build a realization, checking that the four matrices agree.
    pub fn new(
        a: DMatrix<f64>,
        b: DMatrix<f64>,
        c: DMatrix<f64>,
        d: DMatrix<f64>,
    ) -> Result<Self, LtiError> {
        let n = a.nrows();
        check("A", &a, n, n)?;
        check("B", &b, n, b.ncols())?;
        check("C", &c, c.nrows(), n)?;
        check("D", &d, c.nrows(), b.ncols())?;
        Ok(Self { a, b, c, d })
    }

    /// Memoryless SISO gain `y = k u`.
    pub fn static_gain(k: f64) -> Self {
        Self {
            a: DMatrix::zeros(0, 0),
            b: DMatrix::zeros(0, 1),
            c: DMatrix::zeros(1, 0),
            d: DMatrix::from_element(1, 1, k),
        }
    }

    /// First-order low-pass `gain / (s + 1)`.
    ///
    /// ```
    /// use setpoint_lti::StateSpace;
    ///
    /// let g = StateSpace::first_order(0.5);
    /// assert_eq!(g.nstates(), 1);
    /// assert_eq!(g.dc_gain()[(0, 0)], 0.5);
    /// ```
    pub fn first_order(gain: f64) -> Self {
        Self {
            a: DMatrix::from_element(1, 1, -1.0),
            b: DMatrix::from_element(1, 1, 1.0),
            c: DMatrix::from_element(1, 1, gain),
            d: DMatrix::zeros(1, 1),
        }
    }

    /// Number of internal states.
    pub fn nstates(&self) -> usize {
        self.a.nrows()
    }

    /// Number of inputs.
    pub fn ninputs(&self) -> usize {
        self.b.ncols()
    }

    /// Number of outputs.
    pub fn noutputs(&self) -> usize {
        self.c.nrows()
    }

    /// Whether the system has exactly one input and one output.
    pub fn is_siso(&self) -> bool {
        self.ninputs() == 1 && self.noutputs() == 1
    }

    /// State matrix.
    pub fn a(&self) -> &DMatrix<f64> {
        &self.a
    }

    /// Input matrix.
    pub fn b(&self) -> &DMatrix<f64> {
        &self.b
    }

    /// Output matrix.
    pub fn c(&self) -> &DMatrix<f64> {
        &self.c
    }

    /// Feedthrough matrix.
    pub fn d(&self) -> &DMatrix<f64> {
        &self.d
    }

    /// Whether every matrix entry is finite.
    pub fn is_finite(&self) -> bool {
        [&self.a, &self.b, &self.c, &self.d]
            .iter()
            .all(|m| m.iter().all(|v| v.is_finite()))
    }

    /// Steady-state gain `D − C A⁻¹ B`.
    ///
    /// Falls back to `D` when `A` is singular or empty.
    pub fn dc_gain(&self) -> DMatrix<f64> {
        if self.nstates() == 0 {
            return self.d.clone();
        }
        match self.a.clone().try_inverse() {
            Some(a_inv) => &self.d - &self.c * a_inv * &self.b,
            None => self.d.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_checks_shapes() {
        let err = StateSpace::new(
            DMatrix::zeros(2, 2),
            DMatrix::zeros(2, 1),
            DMatrix::zeros(1, 3),
            DMatrix::zeros(1, 1),
        )
        .unwrap_err();
        assert_eq!(
            err,
            LtiError::ShapeMismatch {
                what: "C",
                expected: (1, 2),
                got: (1, 3)
            }
        );
    }

    #[test]
    fn static_gain_has_no_states() {
        let g = StateSpace::static_gain(0.25);
        assert_eq!(g.nstates(), 0);
        assert!(g.is_siso());
        assert_eq!(g.dc_gain()[(0, 0)], 0.25);
    }

    #[test]
    fn first_order_dc_gain() {
        let g = StateSpace::first_order(-0.3);
        assert!((g.dc_gain()[(0, 0)] + 0.3).abs() < 1e-12);
        assert!(g.is_finite());
    }
}
