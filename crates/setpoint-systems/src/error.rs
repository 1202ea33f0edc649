//! Error type for system synthesis and episode data generation.

use std::error::Error;
use std::fmt;

use setpoint_lti::LtiError;
use setpoint_space::SpaceError;

/// Errors from building a system, its coupling or its episode fields.
#[derive(Debug, Clone, PartialEq)]
pub enum SynthesisError {
    /// Realization, interconnection or simulation failed.
    Lti(LtiError),
    /// A field could not be built, filtered or resampled.
    Space(SpaceError),
    /// The cell count of a grid topology is not `side²`.
    GridMismatch {
        /// Requested number of cells.
        cells: usize,
        /// Requested grid side.
        side: usize,
    },
    /// A vector or matrix has the wrong number of cells.
    CellCount {
        /// Cells required.
        expected: usize,
        /// Cells supplied.
        got: usize,
    },
}

impl fmt::Display for SynthesisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lti(e) => write!(f, "lti: {e}"),
            Self::Space(e) => write!(f, "space: {e}"),
            Self::GridMismatch { cells, side } => {
                write!(f, "{cells} cells do not form a {side}x{side} grid")
            }
            Self::CellCount { expected, got } => {
                write!(f, "expected {expected} cells, got {got}")
            }
        }
    }
}

impl Error for SynthesisError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Lti(e) => Some(e),
            Self::Space(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LtiError> for SynthesisError {
    fn from(e: LtiError) -> Self {
        Self::Lti(e)
    }
}

impl From<SpaceError> for SynthesisError {
    fn from(e: SpaceError) -> Self {
        Self::Space(e)
    }
}
