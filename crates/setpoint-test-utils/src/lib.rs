//! Test utilities and fixtures for setpoint development.
//!
//! Deterministic RNG construction, random actions, and float comparison
//! helpers shared by unit tests, integration tests and benches. Field and
//! system builders live in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seed used when a test does not care which seed it gets.
pub const DEFAULT_SEED: u64 = 0x5e7_9014;

/// A ChaCha8 RNG seeded from `seed`.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// A uniform random action in `[-1, 1]` for an `side×side` grid.
pub fn random_action<R: Rng + ?Sized>(side: usize, rng: &mut R) -> Vec<f32> {
    (0..side * side)
        .map(|_| rng.random_range(-1.0f32..=1.0))
        .collect()
}

/// A constant action for an `side×side` grid.
pub fn constant_action(side: usize, value: f32) -> Vec<f32> {
    vec![value; side * side]
}

/// Panic unless `|a - b| <= tol`.
#[track_caller]
pub fn assert_close(a: f64, b: f64, tol: f64) {
    assert!(
        (a - b).abs() <= tol,
        "values differ: {a} vs {b} (|diff| = {}, tol = {tol})",
        (a - b).abs()
    );
}

/// Panic unless both slices have the same length and agree elementwise
/// within `tol`.
#[track_caller]
pub fn assert_all_close(a: &[f64], b: &[f64], tol: f64) {
    assert_eq!(a.len(), b.len(), "length mismatch");
    for (i, (x, y)) in a.iter().zip(b).enumerate() {
        assert!(
            (x - y).abs() <= tol,
            "index {i}: {x} vs {y} (|diff| = {}, tol = {tol})",
            (x - y).abs()
        );
    }
}
