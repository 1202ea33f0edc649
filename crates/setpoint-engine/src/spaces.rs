//! Box-shaped action and observation spaces.

use rand::Rng;
use rand_distr::{Exp1, StandardNormal};

/// An axis-aligned box `[low, high]^shape` of `f32` values.
///
/// Either bound may be infinite. Sampling is uniform when both bounds are
/// finite, a shifted exponential when one is, and standard normal when
/// neither is.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxSpace {
    low: f32,
    high: f32,
    shape: Vec<usize>,
}

impl BoxSpace {
    /// A box with the same bounds on every element.
    pub fn new(low: f32, high: f32, shape: impl Into<Vec<usize>>) -> Self {
        Self {
            low,
            high,
            shape: shape.into(),
        }
    }

    /// Lower bound.
    pub fn low(&self) -> f32 {
        self.low
    }

    /// Upper bound.
    pub fn high(&self) -> f32 {
        self.high
    }

    /// Dimensions.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    /// Whether the box holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `values` has the right length and lies within the bounds.
    pub fn contains(&self, values: &[f32]) -> bool {
        values.len() == self.len() && values.iter().all(|&v| v >= self.low && v <= self.high)
    }

    /// Draw one element of the space.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f32> {
        (0..self.len()).map(|_| self.sample_one(rng)).collect()
    }

    fn sample_one<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        match (self.low.is_finite(), self.high.is_finite()) {
            (true, true) => rng.random_range(self.low..=self.high),
            (true, false) => self.low + rng.sample::<f32, _>(Exp1),
            (false, true) => self.high - rng.sample::<f32, _>(Exp1),
            (false, false) => rng.sample(StandardNormal),
        }
    }
}
