//! Error types shared across the setpoint workspace.

use std::error::Error;
use std::fmt;

/// Errors from drawing or constructing a [`Resolution`](crate::Resolution).
///
/// These are the domain errors a malformed grid side produces at reset.
/// Nothing validates the side ahead of time; the failure surfaces the
/// first time a resolution is drawn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolutionError {
    /// The grid side is zero.
    ZeroSide,
    /// `[min_scale, log2(side) - 1)` contains no integer.
    EmptyRange {
        /// Requested grid side.
        side: u32,
        /// Inclusive lower bound of the format range.
        min_scale: u32,
        /// Exclusive upper bound `floor(log2(side) - 1)`.
        upper: i64,
    },
    /// The grid side is not a multiple of the resolution factor.
    Indivisible {
        /// Requested grid side.
        side: u32,
        /// Resolution factor `2^format`.
        factor: u32,
    },
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroSide => write!(f, "grid side must be non-zero"),
            Self::EmptyRange {
                side,
                min_scale,
                upper,
            } => write!(
                f,
                "empty resolution range for side {side}: [{min_scale}, {upper})"
            ),
            Self::Indivisible { side, factor } => {
                write!(f, "grid side {side} is not divisible by factor {factor}")
            }
        }
    }
}

impl Error for ResolutionError {}
