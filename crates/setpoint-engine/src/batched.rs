//! Batched environments for vectorized training.
//!
//! [`BatchedEnv`] owns K independent [`MultiLtiEnv`]s and resets or steps
//! them all in one call. Environments do not auto-reset: a terminated
//! environment rejects further steps until it is reset individually with
//! [`reset_env()`](BatchedEnv::reset_env) or together with
//! [`reset_all()`](BatchedEnv::reset_all).

use crate::config::{ConfigError, EnvConfig};
use crate::env::{Info, MultiLtiEnv, StepOutcome};
use crate::error::EnvError;
use setpoint_systems::Observation;

// ── Error type ──────────────────────────────────────────────────

/// Error from a batched operation, annotated with the failing env index.
#[derive(Debug, PartialEq)]
pub enum BatchError {
    /// An environment's configuration was rejected.
    Config {
        /// Index of the environment (0-based).
        env_index: usize,
        /// The underlying config error.
        error: ConfigError,
    },
    /// An environment's `reset` or `step` failed.
    Env {
        /// Index of the environment (0-based).
        env_index: usize,
        /// The underlying env error.
        error: EnvError,
    },
    /// Environment index out of bounds.
    InvalidIndex {
        /// The requested index.
        env_index: usize,
        /// Total number of environments.
        num_envs: usize,
    },
    /// Batch-level argument validation failed.
    InvalidArgument {
        /// Human-readable description of what's wrong.
        reason: String,
    },
}

impl std::fmt::Display for BatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchError::Config { env_index, error } => {
                write!(f, "env {env_index}: config error: {error}")
            }
            BatchError::Env { env_index, error } => write!(f, "env {env_index}: {error}"),
            BatchError::InvalidIndex {
                env_index,
                num_envs,
            } => write!(
                f,
                "env index {env_index} out of range (num_envs={num_envs})"
            ),
            BatchError::InvalidArgument { reason } => write!(f, "invalid argument: {reason}"),
        }
    }
}

impl std::error::Error for BatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BatchError::Config { error, .. } => Some(error),
            BatchError::Env { error, .. } => Some(error),
            _ => None,
        }
    }
}

// ── BatchedEnv ──────────────────────────────────────────────────

/// K independent environments stepped together.
pub struct BatchedEnv {
    envs: Vec<MultiLtiEnv>,
}

impl BatchedEnv {
    /// Create one environment per config.
    ///
    /// All configs must share the grid side so that actions and
    /// observations have one shape across the batch.
    pub fn new(configs: Vec<EnvConfig>) -> Result<Self, BatchError> {
        let Some(first) = configs.first() else {
            return Err(BatchError::InvalidArgument {
                reason: "BatchedEnv requires at least one env config".into(),
            });
        };
        let n = first.n;
        if let Some(i) = configs.iter().position(|c| c.n != n) {
            return Err(BatchError::InvalidArgument {
                reason: format!(
                    "env 0 has n={n}, env {i} has n={}; all envs in a batch must share n",
                    configs[i].n
                ),
            });
        }

        let mut envs = Vec::with_capacity(configs.len());
        for (env_index, config) in configs.into_iter().enumerate() {
            let env = MultiLtiEnv::new(config)
                .map_err(|error| BatchError::Config { env_index, error })?;
            envs.push(env);
        }
        Ok(Self { envs })
    }

    /// `count` environments built from `base`, with seeds `base_seed + i`
    /// when `base.seed` is set.
    pub fn from_template(base: &EnvConfig, count: usize) -> Result<Self, BatchError> {
        let configs = (0..count)
            .map(|i| EnvConfig {
                seed: base.seed.map(|s| s.wrapping_add(i as u64)),
                ..base.clone()
            })
            .collect();
        Self::new(configs)
    }

    /// Reset every environment.
    pub fn reset_all(&mut self) -> Result<Vec<(Observation, Info)>, BatchError> {
        self.envs
            .iter_mut()
            .enumerate()
            .map(|(env_index, env)| {
                env.reset(None, None)
                    .map_err(|error| BatchError::Env { env_index, error })
            })
            .collect()
    }

    /// Reset one environment.
    pub fn reset_env(&mut self, env_index: usize) -> Result<(Observation, Info), BatchError> {
        let num_envs = self.envs.len();
        let env = self
            .envs
            .get_mut(env_index)
            .ok_or(BatchError::InvalidIndex {
                env_index,
                num_envs,
            })?;
        env.reset(None, None)
            .map_err(|error| BatchError::Env { env_index, error })
    }

    /// Step every environment with its own action.
    ///
    /// Argument shapes are checked before any environment is stepped.
    /// A failure in environment `i` leaves environments `0..i` stepped.
    pub fn step_all(&mut self, actions: &[Vec<f32>]) -> Result<Vec<StepOutcome>, BatchError> {
        if actions.len() != self.envs.len() {
            return Err(BatchError::InvalidArgument {
                reason: format!(
                    "got {} actions for {} envs",
                    actions.len(),
                    self.envs.len()
                ),
            });
        }
        let expected = self.action_len();
        if let Some(i) = actions.iter().position(|a| a.len() != expected) {
            return Err(BatchError::InvalidArgument {
                reason: format!(
                    "action {i} has {} elements, expected {expected}",
                    actions[i].len()
                ),
            });
        }

        self.envs
            .iter_mut()
            .zip(actions)
            .enumerate()
            .map(|(env_index, (env, action))| {
                env.step(action)
                    .map_err(|error| BatchError::Env { env_index, error })
            })
            .collect()
    }

    /// Number of environments.
    pub fn num_envs(&self) -> usize {
        self.envs.len()
    }

    /// Elements per action (`n×n`).
    pub fn action_len(&self) -> usize {
        self.envs.first().map_or(0, |e| e.action_space().len())
    }

    /// Borrow environment `env_index`.
    pub fn env(&self, env_index: usize) -> Option<&MultiLtiEnv> {
        self.envs.get(env_index)
    }
}
