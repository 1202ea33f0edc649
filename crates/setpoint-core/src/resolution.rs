//! Spatial resolution of one episode.
//!
//! The agent always sees an `n×n` fine grid. The simulation runs on a
//! coarse `nc×nc` grid with `nc = n / r` and `r = 2^format`. Both grids
//! describe the same square, so `Nc · r² == N` holds for every value
//! this type can hold.

use crate::error::ResolutionError;
use rand::Rng;

/// Fine/coarse resolution pair for a square grid.
///
/// # Examples
///
/// ```
/// use setpoint_core::Resolution;
///
/// let res = Resolution::new(32, 2).unwrap();
/// assert_eq!(res.factor(), 4);
/// assert_eq!(res.coarse_side(), 8);
/// assert_eq!(res.coarse_cells() * res.factor() as usize * res.factor() as usize, res.fine_cells());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Resolution {
    side: u32,
    format: u32,
}

impl Resolution {
    /// Build a resolution for an `side×side` grid at factor `2^format`.
    ///
    /// Returns `Err(ResolutionError::Indivisible)` if `side` is not a
    /// multiple of the factor.
    pub fn new(side: u32, format: u32) -> Result<Self, ResolutionError> {
        if side == 0 {
            return Err(ResolutionError::ZeroSide);
        }
        let factor = 1u32
            .checked_shl(format)
            .ok_or(ResolutionError::Indivisible {
                side,
                factor: u32::MAX,
            })?;
        if side % factor != 0 {
            return Err(ResolutionError::Indivisible { side, factor });
        }
        Ok(Self { side, format })
    }

    /// Exclusive upper bound of the format range: `floor(log2(side) - 1)`.
    ///
    /// Negative for sides below 2.
    pub fn format_upper_bound(side: u32) -> i64 {
        if side == 0 {
            return i64::MIN;
        }
        ((side as f64).log2() - 1.0).floor() as i64
    }

    /// Draw `format` uniformly from `[min_scale, log2(side) - 1)`.
    ///
    /// An empty range is a domain error, not a clamped value.
    pub fn draw<R: Rng + ?Sized>(
        side: u32,
        min_scale: u32,
        rng: &mut R,
    ) -> Result<Self, ResolutionError> {
        if side == 0 {
            return Err(ResolutionError::ZeroSide);
        }
        let upper = Self::format_upper_bound(side);
        if upper <= min_scale as i64 {
            return Err(ResolutionError::EmptyRange {
                side,
                min_scale,
                upper,
            });
        }
        let format = rng.random_range(min_scale..upper as u32);
        Self::new(side, format)
    }

    /// Resolution exponent.
    pub fn format(&self) -> u32 {
        self.format
    }

    /// Resolution factor `r = 2^format`.
    pub fn factor(&self) -> u32 {
        1 << self.format
    }

    /// Fine grid side `n`.
    pub fn fine_side(&self) -> usize {
        self.side as usize
    }

    /// Coarse grid side `n / r`.
    pub fn coarse_side(&self) -> usize {
        (self.side / self.factor()) as usize
    }

    /// Fine cell count `N = n²`.
    pub fn fine_cells(&self) -> usize {
        self.fine_side() * self.fine_side()
    }

    /// Coarse cell count `Nc = N / r²`.
    pub fn coarse_cells(&self) -> usize {
        self.coarse_side() * self.coarse_side()
    }
}
