//! Conversion between the fine agent grid and the coarse simulation grid.
//!
//! [`upsample`] replicates each coarse cell into an `r×r` block.
//! [`downsample`] shrinks by `r` with first-order (linear) interpolation,
//! mapping output sample `i` onto input coordinate `i·(in−1)/(out−1)` so
//! that the first and last samples of each axis line up.
//!
//! For a block-replicated input every interpolation coordinate falls
//! between two samples of the same block, so
//! `downsample(upsample(x, r), r) == x` holds bit for bit.

use crate::error::SpaceError;
use crate::field::FieldStack;

/// Expand every cell into an `factor×factor` block of identical values.
///
/// Depth is untouched.
pub fn upsample(field: &FieldStack, factor: usize) -> Result<FieldStack, SpaceError> {
    if factor == 0 {
        return Err(SpaceError::InvalidFactor);
    }
    let coarse = field.side();
    let depth = field.depth();
    let fine = coarse * factor;
    let mut out = FieldStack::zeros(fine, depth)?;
    for r in 0..fine {
        for c in 0..fine {
            let src = field.cell((r / factor) * coarse + c / factor);
            let start = out.index(r, c, 0);
            out.as_mut_slice()[start..start + depth].copy_from_slice(src);
        }
    }
    Ok(out)
}

/// Shrink the spatial axes by `factor` with linear interpolation.
///
/// Depth is untouched. Returns `Err(SpaceError::IndivisibleSide)` if the
/// side is not a multiple of `factor`.
pub fn downsample(field: &FieldStack, factor: usize) -> Result<FieldStack, SpaceError> {
    if factor == 0 {
        return Err(SpaceError::InvalidFactor);
    }
    let fine = field.side();
    if fine % factor != 0 {
        return Err(SpaceError::IndivisibleSide {
            side: fine,
            factor,
        });
    }
    let coarse = fine / factor;
    let depth = field.depth();
    let taps = linear_taps(fine, coarse);

    // Columns first, into a fine-rows × coarse-cols scratch buffer.
    let mut rows_pass = vec![0.0; fine * coarse * depth];
    for r in 0..fine {
        for (c, &(lo, hi, w)) in taps.iter().enumerate() {
            for k in 0..depth {
                let v0 = field.get(r, lo, k);
                let v1 = field.get(r, hi, k);
                rows_pass[(r * coarse + c) * depth + k] = lerp(v0, v1, w);
            }
        }
    }

    let mut out = FieldStack::zeros(coarse, depth)?;
    for (r, &(lo, hi, w)) in taps.iter().enumerate() {
        for c in 0..coarse {
            for k in 0..depth {
                let v0 = rows_pass[(lo * coarse + c) * depth + k];
                let v1 = rows_pass[(hi * coarse + c) * depth + k];
                out.set(r, c, k, lerp(v0, v1, w));
            }
        }
    }
    Ok(out)
}

/// Interpolation taps `(lower, upper, weight)` for each output sample.
fn linear_taps(in_len: usize, out_len: usize) -> Vec<(usize, usize, f64)> {
    if out_len <= 1 {
        return vec![(0, 0, 0.0); out_len];
    }
    // Integer arithmetic keeps the tap position exact: i·(in−1) = lo·(out−1) + rem.
    let span = out_len - 1;
    (0..out_len)
        .map(|i| {
            let num = i * (in_len - 1);
            let lo = num / span;
            let rem = num % span;
            let hi = (lo + 1).min(in_len - 1);
            (lo, hi, rem as f64 / span as f64)
        })
        .collect()
}

/// Exact when `v0 == v1`.
fn lerp(v0: f64, v1: f64, w: f64) -> f64 {
    v0 + (v1 - v0) * w
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ramp(side: usize, depth: usize) -> FieldStack {
        FieldStack::from_fn(side, depth, |r, c, k| (r * side + c) as f64 + 0.25 * k as f64)
            .unwrap()
    }

    #[test]
    fn upsample_replicates_blocks() {
        let x = FieldStack::from_vec(2, 1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let y = upsample(&x, 2).unwrap();
        assert_eq!(y.side(), 4);
        assert_eq!(
            y.as_slice(),
            &[
                1.0, 1.0, 2.0, 2.0, //
                1.0, 1.0, 2.0, 2.0, //
                3.0, 3.0, 4.0, 4.0, //
                3.0, 3.0, 4.0, 4.0,
            ]
        );
    }

    #[test]
    fn round_trip_is_exact() {
        let x = ramp(8, 3);
        for factor in [1, 2, 4] {
            let y = downsample(&upsample(&x, factor).unwrap(), factor).unwrap();
            assert_eq!(y, x, "factor {factor}");
        }
    }

    #[test]
    fn downsample_keeps_corners() {
        let x = ramp(8, 1);
        let y = downsample(&x, 4).unwrap();
        assert_eq!(y.side(), 2);
        assert_eq!(y.get(0, 0, 0), x.get(0, 0, 0));
        assert_eq!(y.get(1, 1, 0), x.get(7, 7, 0));
    }

    #[test]
    fn downsample_of_linear_ramp_is_linear() {
        // Linear interpolation reproduces a linear function exactly (up to rounding).
        let x = FieldStack::from_fn(8, 1, |r, c, _| 2.0 * r as f64 - c as f64).unwrap();
        let y = downsample(&x, 2).unwrap();
        let scale = 7.0 / 3.0;
        for r in 0..4 {
            for c in 0..4 {
                let expected = 2.0 * r as f64 * scale - c as f64 * scale;
                assert!((y.get(r, c, 0) - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn upsample_of_downsample_is_piecewise_constant() {
        let x = ramp(8, 1);
        let y = upsample(&downsample(&x, 2).unwrap(), 2).unwrap();
        for r in (0..8).step_by(2) {
            for c in (0..8).step_by(2) {
                let v = y.get(r, c, 0);
                assert_eq!(y.get(r + 1, c, 0), v);
                assert_eq!(y.get(r, c + 1, 0), v);
                assert_eq!(y.get(r + 1, c + 1, 0), v);
            }
        }
        assert_ne!(y, x);
    }

    #[test]
    fn indivisible_side_rejected() {
        let x = ramp(6, 1);
        assert_eq!(
            downsample(&x, 4),
            Err(SpaceError::IndivisibleSide { side: 6, factor: 4 })
        );
    }

    #[test]
    fn zero_factor_rejected() {
        let x = ramp(4, 1);
        assert_eq!(upsample(&x, 0), Err(SpaceError::InvalidFactor));
        assert_eq!(downsample(&x, 0), Err(SpaceError::InvalidFactor));
    }

    proptest! {
        #[test]
        fn round_trip_exact_for_random_fields(
            side in 1usize..6,
            exp in 0u32..4,
            depth in 1usize..4,
            values in proptest::collection::vec(-1.0f64..1.0, 150),
        ) {
            let factor = 1usize << exp;
            let x = FieldStack::from_fn(side, depth, |r, c, k| {
                values[((r * side + c) * depth + k) % values.len()]
            }).unwrap();
            let y = downsample(&upsample(&x, factor).unwrap(), factor).unwrap();
            prop_assert_eq!(y, x);
        }
    }
}
