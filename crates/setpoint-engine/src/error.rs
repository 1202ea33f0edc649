//! Errors surfaced by [`MultiLtiEnv`](crate::MultiLtiEnv).

use std::error::Error;
use std::fmt;

use setpoint_core::{ResolutionError, StepId};
use setpoint_lti::LtiError;
use setpoint_systems::SynthesisError;

/// Errors from `reset` and `step`.
///
/// Usage errors (`NotReset`, `EpisodeTerminated`, `ActionShape`) leave the
/// environment unchanged. Any other error during reset leaves it without
/// an episode.
#[derive(Clone, Debug, PartialEq)]
pub enum EnvError {
    /// `step` called before the first successful `reset`.
    NotReset,
    /// `step` called after the episode terminated.
    EpisodeTerminated {
        /// Elapsed step at termination.
        elapsed: StepId,
    },
    /// Action does not have `n×n` elements.
    ActionShape {
        /// Required element count.
        expected: usize,
        /// Supplied element count.
        got: usize,
    },
    /// The grid cannot support the resolution range.
    Resolution(ResolutionError),
    /// System, disturbance or resampling failed.
    Synthesis(SynthesisError),
    /// Discretization or simulation failed.
    Lti(LtiError),
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotReset => write!(f, "step called before reset"),
            Self::EpisodeTerminated { elapsed } => {
                write!(f, "episode terminated at step {elapsed}; call reset")
            }
            Self::ActionShape { expected, got } => {
                write!(f, "action has {got} elements, expected {expected}")
            }
            Self::Resolution(e) => write!(f, "resolution: {e}"),
            Self::Synthesis(e) => write!(f, "synthesis: {e}"),
            Self::Lti(e) => write!(f, "lti: {e}"),
        }
    }
}

impl Error for EnvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Resolution(e) => Some(e),
            Self::Synthesis(e) => Some(e),
            Self::Lti(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ResolutionError> for EnvError {
    fn from(e: ResolutionError) -> Self {
        Self::Resolution(e)
    }
}

impl From<SynthesisError> for EnvError {
    fn from(e: SynthesisError) -> Self {
        Self::Synthesis(e)
    }
}

impl From<LtiError> for EnvError {
    fn from(e: LtiError) -> Self {
        Self::Lti(e)
    }
}

impl EnvError {
    /// Whether the error is caller misuse rather than a simulation failure.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            Self::NotReset | Self::EpisodeTerminated { .. } | Self::ActionShape { .. }
        )
    }
}
