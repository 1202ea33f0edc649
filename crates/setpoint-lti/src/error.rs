//! Error types for realization, interconnection and simulation.

use std::error::Error;
use std::fmt;

/// Errors from the LTI layer.
///
/// None of these are retried: a degenerate random draw surfaces to the
/// caller as-is.
#[derive(Clone, Debug, PartialEq)]
pub enum LtiError {
    /// A matrix does not have the shape its role requires.
    ShapeMismatch {
        /// Which matrix or argument is malformed.
        what: &'static str,
        /// Required `(rows, cols)`.
        expected: (usize, usize),
        /// Supplied `(rows, cols)`.
        got: (usize, usize),
    },
    /// A matrix that must be inverted is singular.
    Singular {
        /// Which matrix failed to invert.
        what: &'static str,
    },
    /// Direct feedthrough around a loop makes `I − D K` singular.
    AlgebraicLoop,
    /// A block handed to [`interconnect`](crate::interconnect) is not SISO.
    NotSiso {
        /// Index of the offending block.
        block: usize,
    },
    /// A wire or port refers to a block index that does not exist.
    UnknownBlock {
        /// The out-of-range block index.
        block: usize,
    },
    /// The sample period is zero, negative or not finite.
    InvalidTimeStep {
        /// The rejected sample period.
        dt: f64,
    },
    /// A computed matrix contains NaN or infinity.
    NonFinite {
        /// Which result is non-finite.
        what: &'static str,
    },
}

impl fmt::Display for LtiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch {
                what,
                expected,
                got,
            } => write!(
                f,
                "{what}: expected {}x{}, got {}x{}",
                expected.0, expected.1, got.0, got.1
            ),
            Self::Singular { what } => write!(f, "{what} is singular"),
            Self::AlgebraicLoop => write!(f, "unsolvable algebraic loop in interconnection"),
            Self::NotSiso { block } => write!(f, "block {block} is not single-input single-output"),
            Self::UnknownBlock { block } => write!(f, "unknown block {block}"),
            Self::InvalidTimeStep { dt } => {
                write!(f, "sample period must be finite and positive, got {dt}")
            }
            Self::NonFinite { what } => write!(f, "{what} contains non-finite values"),
        }
    }
}

impl Error for LtiError {}
