//! Error types for grid, field and resampling operations.

use std::fmt;

/// Errors arising from grid construction, field construction or resampling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpaceError {
    /// Attempted to construct a grid or field with zero cells.
    EmptySpace,
    /// Flat data does not match the declared `side×side×depth` shape.
    LengthMismatch {
        /// Expected number of elements.
        expected: usize,
        /// Number of elements supplied.
        got: usize,
    },
    /// The field side is not a multiple of the resampling factor.
    IndivisibleSide {
        /// Side of the input field.
        side: usize,
        /// Requested resampling factor.
        factor: usize,
    },
    /// A resampling factor or filter window of zero.
    InvalidFactor,
}

impl fmt::Display for SpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySpace => write!(f, "space must have at least one cell"),
            Self::LengthMismatch { expected, got } => {
                write!(f, "expected {expected} elements, got {got}")
            }
            Self::IndivisibleSide { side, factor } => {
                write!(f, "side {side} is not divisible by factor {factor}")
            }
            Self::InvalidFactor => write!(f, "factor must be at least 1"),
        }
    }
}

impl std::error::Error for SpaceError {}
