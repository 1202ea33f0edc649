//! First-order-hold simulation on a uniform time grid.
//!
//! The input is taken to vary linearly between samples. Exponentiating
//! the augmented matrix
//!
//! ```text
//!     ┌ A·dt  B·dt  0 ┐
//! M = │ 0     0     I │
//!     └ 0     0     0 ┘
//! ```
//!
//! gives `Ad` in the top-left block, `Bd0 + Bd1` in the middle and `Bd1`
//! on the right, and the recurrence
//! `x[k+1] = Ad·x[k] + Bd0·u[k] + Bd1·u[k+1]` is exact for piecewise-linear
//! inputs.

use crate::error::LtiError;
use crate::state_space::StateSpace;
use nalgebra::{DMatrix, DVector};

/// Discrete-time transition matrices for one sample period.
#[derive(Clone, Debug, PartialEq)]
pub struct Discretization {
    dt: f64,
    ad: DMatrix<f64>,
    bd0: DMatrix<f64>,
    bd1: DMatrix<f64>,
}

impl Discretization {
    /// Discretize `sys` with sample period `dt` under a first-order hold.
    pub fn first_order_hold(sys: &StateSpace, dt: f64) -> Result<Self, LtiError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(LtiError::InvalidTimeStep { dt });
        }
        let n = sys.nstates();
        let m = sys.ninputs();
        let size = n + 2 * m;

        let mut aug = DMatrix::zeros(size, size);
        aug.view_mut((0, 0), (n, n)).copy_from(&(sys.a() * dt));
        aug.view_mut((0, n), (n, m)).copy_from(&(sys.b() * dt));
        aug.view_mut((n, n + m), (m, m))
            .copy_from(&DMatrix::<f64>::identity(m, m));
        let exp = aug.exp();
        if exp.iter().any(|v| !v.is_finite()) {
            return Err(LtiError::NonFinite {
                what: "matrix exponential",
            });
        }

        let ad = exp.view((0, 0), (n, n)).into_owned();
        let bd1 = exp.view((0, n + m), (n, m)).into_owned();
        let bd0 = exp.view((0, n), (n, m)).into_owned() - &bd1;
        Ok(Self { dt, ad, bd0, bd1 })
    }

    /// Sample period.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// State transition matrix.
    pub fn ad(&self) -> &DMatrix<f64> {
        &self.ad
    }

    /// Weight of the sample at the start of the interval.
    pub fn bd0(&self) -> &DMatrix<f64> {
        &self.bd0
    }

    /// Weight of the sample at the end of the interval.
    pub fn bd1(&self) -> &DMatrix<f64> {
        &self.bd1
    }
}

/// State and output trajectories, one column per time sample.
#[derive(Clone, Debug, PartialEq)]
pub struct Response {
    /// `nstates × samples`.
    pub states: DMatrix<f64>,
    /// `noutputs × samples`.
    pub outputs: DMatrix<f64>,
}

impl Response {
    /// Number of time samples.
    pub fn samples(&self) -> usize {
        self.outputs.ncols()
    }

    /// State at the last sample.
    pub fn final_state(&self) -> DVector<f64> {
        let k = self.states.ncols();
        if k == 0 {
            return DVector::zeros(self.states.nrows());
        }
        self.states.column(k - 1).into_owned()
    }
}

/// Simulate `sys` from `x0` under the input samples `u` (`ninputs × samples`).
///
/// `disc` must be the discretization of `sys`; samples are `disc.dt()` apart.
pub fn forced_response(
    sys: &StateSpace,
    disc: &Discretization,
    x0: &DVector<f64>,
    u: &DMatrix<f64>,
) -> Result<Response, LtiError> {
    let n = sys.nstates();
    let m = sys.ninputs();
    if disc.ad.shape() != (n, n) || disc.bd0.shape() != (n, m) {
        return Err(LtiError::ShapeMismatch {
            what: "discretization",
            expected: (n, m),
            got: disc.bd0.shape(),
        });
    }
    if x0.len() != n {
        return Err(LtiError::ShapeMismatch {
            what: "initial state",
            expected: (n, 1),
            got: (x0.len(), 1),
        });
    }
    if u.nrows() != m || u.ncols() == 0 {
        return Err(LtiError::ShapeMismatch {
            what: "input samples",
            expected: (m, u.ncols().max(1)),
            got: u.shape(),
        });
    }

    let samples = u.ncols();
    let mut states = DMatrix::zeros(n, samples);
    states.set_column(0, x0);
    for k in 1..samples {
        let next = &disc.ad * states.column(k - 1)
            + &disc.bd0 * u.column(k - 1)
            + &disc.bd1 * u.column(k);
        states.set_column(k, &next);
    }
    let outputs = sys.c() * &states + sys.d() * u;
    Ok(Response { states, outputs })
}
