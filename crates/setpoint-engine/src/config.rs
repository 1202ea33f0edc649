//! Environment configuration, validation, and error types.
//!
//! [`EnvConfig`] is the constructor input for [`MultiLtiEnv`](crate::MultiLtiEnv).
//! [`validate()`](EnvConfig::validate) checks structural invariants only:
//! whether the grid supports the resolution range is not known until a
//! resolution is drawn, so that surfaces at reset.

use std::error::Error;
use std::fmt;

use setpoint_systems::RewardMode;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`EnvConfig::validate()`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Grid side `n` is zero.
    ZeroSide,
    /// Time horizon `t` is NaN, infinite, zero, or negative.
    InvalidHorizon {
        /// The invalid value.
        value: f64,
    },
    /// Fewer samples than one warm-up window plus one step.
    TooFewSteps {
        /// The configured sample count.
        configured: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroSide => write!(f, "grid side n must be at least 1"),
            Self::InvalidHorizon { value } => {
                write!(f, "time horizon t must be finite and positive, got {value}")
            }
            Self::TooFewSteps { configured } => write!(
                f,
                "max_episode_steps {configured} is below minimum of {MIN_EPISODE_STEPS}"
            ),
        }
    }
}

impl Error for ConfigError {}

// ── EnvConfig ──────────────────────────────────────────────────────

/// Smallest horizon that fits the 3-sample warm-up and one step.
pub const MIN_EPISODE_STEPS: usize = 4;

/// Complete configuration for a [`MultiLtiEnv`](crate::MultiLtiEnv).
#[derive(Clone, Debug, PartialEq)]
pub struct EnvConfig {
    /// Accepted for compatibility; the variant is always drawn at reset.
    pub env_mode: Option<u32>,
    /// Accepted for compatibility; has no effect.
    pub reset: bool,
    /// Fine grid side. Default: 32.
    pub n: u32,
    /// Episode duration in simulated seconds. Default: 10.
    pub t: f64,
    /// Number of time samples over `[0, t]`. Default: 250.
    pub max_episode_steps: usize,
    /// Smallest resolution exponent drawn at reset. Default: 2.
    pub min_scale: u32,
    /// Reward reduction. Default: mean over cells.
    pub reward_mode: RewardMode,
    /// Seed of the instance RNG. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            env_mode: None,
            reset: true,
            n: 32,
            t: 10.0,
            max_episode_steps: 250,
            min_scale: 2,
            reward_mode: RewardMode::Mean,
            seed: None,
        }
    }
}

impl EnvConfig {
    /// Validate structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n == 0 {
            return Err(ConfigError::ZeroSide);
        }
        if !self.t.is_finite() || self.t <= 0.0 {
            return Err(ConfigError::InvalidHorizon { value: self.t });
        }
        if self.max_episode_steps < MIN_EPISODE_STEPS {
            return Err(ConfigError::TooFewSteps {
                configured: self.max_episode_steps,
            });
        }
        Ok(())
    }

    /// Spacing of the time grid, `t / (N − 1)`.
    pub fn time_step(&self) -> f64 {
        self.t / (self.max_episode_steps.saturating_sub(1).max(1)) as f64
    }

    /// `N` evenly spaced samples over `[0, t]`.
    pub fn time_grid(&self) -> Vec<f64> {
        let dt = self.time_step();
        (0..self.max_episode_steps).map(|k| k as f64 * dt).collect()
    }

    /// Elapsed step at which an episode terminates (`N − 2`).
    pub fn terminal_step(&self) -> usize {
        self.max_episode_steps.saturating_sub(2)
    }
}
