//! Random stable state-space realizations.
//!
//! Poles are drawn in the open left half-plane: real poles at
//! `-exp(z)` and complex pairs at `-exp(z1) ± 3·exp(z2)·i` with `z ~ N(0,1)`.
//! They are laid out as real blocks on the diagonal of `A` and mixed by a
//! random similarity transform. `B` and `C` are Gaussian with a sparsity
//! mask; `D` is zero half the time and sparse otherwise.

use crate::error::LtiError;
use crate::state_space::StateSpace;
use nalgebra::DMatrix;
use rand::Rng;
use rand_distr::StandardNormal;

/// Probability of repeating the previous pole.
const P_REPEAT: f64 = 0.05;
/// Probability that a fresh pole is real.
const P_REAL: f64 = 0.6;
/// Keep-probability for entries of `B` and `C`.
const P_BC_MASK: f64 = 0.8;
/// Keep-probability for entries of a non-zero `D`.
const P_D_MASK: f64 = 0.3;
/// Probability that `D` is identically zero.
const P_D_ZERO: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Pole {
    re: f64,
    im: f64,
}

fn normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.sample(StandardNormal)
}

fn draw_poles<R: Rng + ?Sized>(states: usize, rng: &mut R) -> Vec<Pole> {
    let mut poles = vec![Pole { re: 0.0, im: 0.0 }; states];
    let mut i = 0;
    while i < states {
        if rng.random::<f64>() < P_REPEAT && i != 0 && i != states - 1 {
            if poles[i - 1].im == 0.0 {
                poles[i] = poles[i - 1];
                i += 1;
            } else {
                poles[i] = poles[i - 2];
                poles[i + 1] = poles[i - 1];
                i += 2;
            }
        } else if rng.random::<f64>() < P_REAL || i == states - 1 {
            poles[i] = Pole {
                re: -normal(rng).exp(),
                im: 0.0,
            };
            i += 1;
        } else {
            let re = -normal(rng).exp();
            let im = 3.0 * normal(rng).exp();
            poles[i] = Pole { re, im };
            poles[i + 1] = Pole { re, im: -im };
            i += 2;
        }
    }
    poles
}

/// Gaussian matrix with entries kept with probability `keep`; retried
/// until at least one entry survives.
fn masked_gaussian<R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    keep: f64,
    rng: &mut R,
) -> DMatrix<f64> {
    let values = DMatrix::from_fn(rows, cols, |_, _| normal(rng));
    if rows * cols == 0 {
        return values;
    }
    loop {
        let mask = DMatrix::from_fn(rows, cols, |_, _| rng.random::<f64>() < keep);
        if mask.iter().any(|&m| m) {
            return values.zip_map(&mask, |v, m| if m { v } else { 0.0 });
        }
    }
}

/// Draw a random stable realization with the given dimensions.
///
/// Returns `Err(LtiError::Singular)` if the random similarity transform
/// cannot be inverted. The draw is not retried.
pub fn rss<R: Rng + ?Sized>(
    states: usize,
    outputs: usize,
    inputs: usize,
    rng: &mut R,
) -> Result<StateSpace, LtiError> {
    let poles = draw_poles(states, rng);

    let mut a = DMatrix::zeros(states, states);
    let mut i = 0;
    while i < states {
        let p = poles[i];
        if p.im.abs() < 1e-6 {
            a[(i, i)] = p.re;
            i += 1;
        } else {
            a[(i, i)] = p.re;
            a[(i + 1, i + 1)] = p.re;
            a[(i, i + 1)] = p.im;
            a[(i + 1, i)] = -p.im;
            i += 2;
        }
    }

    let t = DMatrix::from_fn(states, states, |_, _| normal(rng));
    let t_inv = t
        .clone()
        .try_inverse()
        .ok_or(LtiError::Singular {
            what: "similarity transform",
        })?;
    let a = t_inv * a * t;

    let b = masked_gaussian(states, inputs, P_BC_MASK, rng);
    let c = masked_gaussian(outputs, states, P_BC_MASK, rng);
    let d = if rng.random::<f64>() < P_D_ZERO {
        DMatrix::zeros(outputs, inputs)
    } else {
        let values = DMatrix::from_fn(outputs, inputs, |_, _| normal(rng));
        values.map(|v| if rng.random::<f64>() < P_D_MASK { v } else { 0.0 })
    };

    let sys = StateSpace::new(a, b, c, d)?;
    if !sys.is_finite() {
        return Err(LtiError::NonFinite {
            what: "random realization",
        });
    }
    Ok(sys)
}
