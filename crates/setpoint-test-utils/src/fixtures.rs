//! Field and system builders.
//!
//! - [`block_field`]: a random coarse field block-replicated to fine
//!   resolution, the shape every reset produces.
//! - [`ramp_field`]: deterministic values for layout checks.
//! - [`lowpass_bank`]: identical first-order cells for interconnection tests.

use rand::Rng;
use setpoint_lti::StateSpace;
use setpoint_space::{upsample, FieldStack};

/// A uniform `[-1, 1]` field of `coarse_side×coarse_side×depth`
/// block-replicated by `factor`. Returns `(coarse, fine)`.
pub fn block_field<R: Rng + ?Sized>(
    coarse_side: usize,
    factor: usize,
    depth: usize,
    rng: &mut R,
) -> (FieldStack, FieldStack) {
    let coarse = FieldStack::from_fn(coarse_side, depth, |_, _, _| rng.random_range(-1.0..=1.0))
        .expect("non-empty coarse field");
    let fine = upsample(&coarse, factor).expect("valid factor");
    (coarse, fine)
}

/// `value(row, col, k) = 100·row + 10·col + k`.
pub fn ramp_field(side: usize, depth: usize) -> FieldStack {
    FieldStack::from_fn(side, depth, |r, c, k| (100 * r + 10 * c + k) as f64)
        .expect("non-empty ramp field")
}

/// `cells` copies of `gain/(s+1)`.
pub fn lowpass_bank(cells: usize, gain: f64) -> Vec<StateSpace> {
    (0..cells).map(|_| StateSpace::first_order(gain)).collect()
}
