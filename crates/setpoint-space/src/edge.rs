//! Boundary handling for indices that fall outside a grid axis.

/// How an out-of-range index along one axis is mapped back into range.
///
/// Neighbour lookups on a [`SquareGrid`](crate::SquareGrid) use `Wrap`.
/// The filters pick the boundary that matches their smoothing kernel.
///
/// # Examples
///
/// ```
/// use setpoint_space::EdgeBehavior;
///
/// // axis of length 4: a b c d
/// assert_eq!(EdgeBehavior::Wrap.resolve(-1, 4), 3);
/// assert_eq!(EdgeBehavior::Reflect.resolve(-1, 4), 0);     // a | a b c d
/// assert_eq!(EdgeBehavior::Reflect101.resolve(-1, 4), 1);  // b | a b c d
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeBehavior {
    /// Periodic boundary (torus): `... c d | a b c d | a b ...`.
    Wrap,
    /// Half-sample symmetric: `... b a | a b c d | d c ...`.
    Reflect,
    /// Whole-sample symmetric, edge not repeated: `... c b | a b c d | c b ...`.
    Reflect101,
}

impl EdgeBehavior {
    /// Map `val` onto `[0, len)`.
    ///
    /// `len` must be non-zero.
    pub fn resolve(self, val: i64, len: usize) -> usize {
        let n = len as i64;
        if val >= 0 && val < n {
            return val as usize;
        }
        match self {
            Self::Wrap => val.rem_euclid(n) as usize,
            Self::Reflect => {
                let m = val.rem_euclid(2 * n);
                (if m < n { m } else { 2 * n - 1 - m }) as usize
            }
            Self::Reflect101 => {
                if n == 1 {
                    return 0;
                }
                let period = 2 * (n - 1);
                let m = val.rem_euclid(period);
                (if m < n { m } else { period - m }) as usize
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_bounds_is_identity() {
        for edge in [EdgeBehavior::Wrap, EdgeBehavior::Reflect, EdgeBehavior::Reflect101] {
            for i in 0..5 {
                assert_eq!(edge.resolve(i, 5), i as usize);
            }
        }
    }

    #[test]
    fn wrap_is_periodic() {
        assert_eq!(EdgeBehavior::Wrap.resolve(5, 5), 0);
        assert_eq!(EdgeBehavior::Wrap.resolve(7, 5), 2);
        assert_eq!(EdgeBehavior::Wrap.resolve(-6, 5), 4);
    }

    #[test]
    fn reflect_repeats_edge_sample() {
        let e = EdgeBehavior::Reflect;
        assert_eq!(e.resolve(-1, 4), 0);
        assert_eq!(e.resolve(-2, 4), 1);
        assert_eq!(e.resolve(4, 4), 3);
        assert_eq!(e.resolve(5, 4), 2);
        assert_eq!(e.resolve(-5, 4), 3);
    }

    #[test]
    fn reflect101_skips_edge_sample() {
        let e = EdgeBehavior::Reflect101;
        assert_eq!(e.resolve(-1, 4), 1);
        assert_eq!(e.resolve(-3, 4), 3);
        assert_eq!(e.resolve(4, 4), 2);
        assert_eq!(e.resolve(6, 4), 0);
        assert_eq!(e.resolve(-3, 1), 0);
    }
}
