//! The episodic multi-resolution LTI setpoint environment.
//!
//! [`MultiLtiEnv`] is the user-facing API. [`reset()`](MultiLtiEnv::reset)
//! draws a new resolution, system, coupling and reference field and returns
//! the first observation; [`step()`](MultiLtiEnv::step) applies one action
//! and returns the next observation and the tracking reward.
//!
//! # Ownership model
//!
//! The instance owns its RNG and its episode exclusively. All mutating
//! methods take `&mut self`; instances share nothing, so independent
//! environments can live on different threads.

use std::time::Instant;

use indexmap::IndexMap;
use nalgebra::DMatrix;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use setpoint_core::{EpisodeId, Resolution, StepId};
use setpoint_systems::{Observation, Reward, SystemVariant, TopologyKind, OBS_CHANNELS};
use tracing::{debug, trace, warn};

use crate::config::{ConfigError, EnvConfig};
use crate::episode::{EpisodeContext, Phase};
use crate::error::EnvError;
use crate::metrics::StepMetrics;
use crate::spaces::BoxSpace;

/// Auxiliary information returned by `reset` and `step`. Always empty.
pub type Info = IndexMap<String, f64>;

const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<MultiLtiEnv>();
    }
};

// ── StepOutcome ─────────────────────────────────────────────────

/// Result of a successful [`MultiLtiEnv::step()`] call.
#[derive(Clone, Debug)]
pub struct StepOutcome {
    /// Next observation, `n×n×4`.
    pub observation: Observation,
    /// Tracking reward for the applied action.
    pub reward: Reward,
    /// Raised at the terminal step.
    pub terminated: bool,
    /// Raised together with `terminated`.
    pub truncated: bool,
    /// Always empty.
    pub info: Info,
}

impl StepOutcome {
    /// Whether the episode is over.
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }
}

// ── MultiLtiEnv ─────────────────────────────────────────────────

/// Procedurally generated setpoint-tracking environment.
///
/// # Example
///
/// ```
/// use setpoint_engine::{EnvConfig, MultiLtiEnv};
///
/// let mut env = MultiLtiEnv::new(EnvConfig {
///     seed: Some(7),
///     ..EnvConfig::default()
/// })
/// .unwrap();
/// let (obs, _info) = env.reset(None, None).unwrap();
/// assert_eq!(obs.shape(), [32, 32, 4]);
/// let action = vec![0.0f32; 32 * 32];
/// let outcome = env.step(&action).unwrap();
/// assert!(outcome.reward.mean().is_finite());
/// ```
pub struct MultiLtiEnv {
    config: EnvConfig,
    rng: ChaCha8Rng,
    phase: Phase,
    episode: Option<EpisodeContext>,
    episode_id: EpisodeId,
    metrics: StepMetrics,
}

impl MultiLtiEnv {
    /// Create an environment from a validated [`EnvConfig`].
    ///
    /// The instance RNG is seeded from `config.seed`, or from OS entropy
    /// when unset. No episode is started until [`reset()`](Self::reset).
    pub fn new(config: EnvConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };
        Ok(Self {
            config,
            rng,
            phase: Phase::Uninitialized,
            episode: None,
            episode_id: EpisodeId::default(),
            metrics: StepMetrics::default(),
        })
    }

    /// Start a new episode.
    ///
    /// `seed` and `options` are accepted for interface compatibility and
    /// ignored: all draws come from the instance RNG.
    ///
    /// # Errors
    ///
    /// [`EnvError::Resolution`] if the grid side admits no resolution in
    /// `[min_scale, log2(n) − 1)`, or a synthesis / solver error for a
    /// degenerate draw. On error the environment has no episode.
    pub fn reset(
        &mut self,
        seed: Option<u64>,
        options: Option<&Info>,
    ) -> Result<(Observation, Info), EnvError> {
        let _ = (seed, options);
        let start = Instant::now();
        self.metrics.begin_call();
        self.episode = None;
        self.phase = Phase::Uninitialized;

        let id = self.episode_id.next();
        let (ctx, observation) =
            EpisodeContext::begin(id, &self.config, &mut self.rng, &mut self.metrics)?;
        debug!(
            episode = %id,
            format = ctx.resolution().format(),
            coarse_side = ctx.resolution().coarse_side(),
            variant = %ctx.system().variant(),
            topology = %ctx.system().topology_kind(),
            smoothed = ctx.disturbance().is_smoothed(),
            states = ctx.system().system().nstates(),
            "episode reset"
        );

        self.episode_id = id;
        self.episode = Some(ctx);
        self.phase = Phase::Reset;
        self.metrics.episodes_started += 1;
        self.metrics.total_us = start.elapsed().as_micros() as u64;
        Ok((observation, Info::new()))
    }

    /// Apply `action` (`n×n`, row-major, nominally in `[-1, 1]`) and
    /// advance one sample.
    ///
    /// `terminated` and `truncated` are raised together when the elapsed
    /// sample reaches `max_episode_steps − 2`.
    ///
    /// # Errors
    ///
    /// [`EnvError::NotReset`] before the first reset,
    /// [`EnvError::EpisodeTerminated`] after the terminal step, and
    /// [`EnvError::ActionShape`] for a wrongly sized action. These leave
    /// the environment unchanged.
    pub fn step(&mut self, action: &[f32]) -> Result<StepOutcome, EnvError> {
        let start = Instant::now();
        self.metrics.begin_call();

        match self.phase {
            Phase::Uninitialized => return Err(self.reject(EnvError::NotReset)),
            Phase::Terminal => {
                let elapsed = self.elapsed().unwrap_or_default();
                return Err(self.reject(EnvError::EpisodeTerminated { elapsed }));
            }
            Phase::Reset | Phase::Running => {}
        }
        let expected = self.action_len();
        if action.len() != expected {
            let err = EnvError::ActionShape {
                expected,
                got: action.len(),
            };
            return Err(self.reject(err));
        }
        let Some(ctx) = self.episode.as_mut() else {
            return Err(self.reject(EnvError::NotReset));
        };

        let advance = ctx.advance(action, self.config.reward_mode, &mut self.metrics)?;
        let elapsed = ctx.elapsed();
        trace!(
            episode = %self.episode_id,
            elapsed = elapsed.0,
            reward = advance.reward.mean(),
            terminated = advance.terminated,
            "step"
        );

        self.phase = if advance.terminated {
            self.metrics.episodes_completed += 1;
            debug!(episode = %self.episode_id, elapsed = elapsed.0, "episode terminated");
            Phase::Terminal
        } else {
            Phase::Running
        };
        self.metrics.steps_total += 1;
        self.metrics.total_us = start.elapsed().as_micros() as u64;
        Ok(StepOutcome {
            observation: advance.observation,
            reward: advance.reward,
            terminated: advance.terminated,
            truncated: advance.terminated,
            info: Info::new(),
        })
    }

    fn reject(&mut self, err: EnvError) -> EnvError {
        self.metrics.usage_errors += 1;
        warn!(episode = %self.episode_id, error = %err, "step rejected");
        err
    }

    /// Solve the whole horizon of the current episode open loop.
    ///
    /// Returns `(reference_fine, outputs_fine)`, both `T × N` with cells in
    /// row-major order. The rolling window is not affected.
    pub fn simulate_open_loop(&self) -> Result<(DMatrix<f64>, DMatrix<f64>), EnvError> {
        self.episode
            .as_ref()
            .ok_or(EnvError::NotReset)?
            .simulate_open_loop()
    }

    /// `[-1, 1]^{n×n}`.
    pub fn action_space(&self) -> BoxSpace {
        let n = self.config.n as usize;
        BoxSpace::new(-1.0, 1.0, [n, n])
    }

    /// `(−∞, ∞)^{n×n×4}`.
    pub fn observation_space(&self) -> BoxSpace {
        let n = self.config.n as usize;
        BoxSpace::new(f32::NEG_INFINITY, f32::INFINITY, [n, n, OBS_CHANNELS])
    }

    fn action_len(&self) -> usize {
        let n = self.config.n as usize;
        n * n
    }

    /// The configuration this environment was built from.
    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    /// Lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current episode, if any.
    pub fn episode(&self) -> Option<&EpisodeContext> {
        self.episode.as_ref()
    }

    /// Counter of the current (or last) episode; 0 before the first reset.
    pub fn episode_id(&self) -> EpisodeId {
        self.episode_id
    }

    /// Resolution of the current episode.
    pub fn resolution(&self) -> Option<Resolution> {
        self.episode.as_ref().map(EpisodeContext::resolution)
    }

    /// System variant of the current episode.
    pub fn variant(&self) -> Option<SystemVariant> {
        self.episode.as_ref().map(|e| e.system().variant())
    }

    /// Coupling kind of the current episode.
    pub fn topology_kind(&self) -> Option<TopologyKind> {
        self.episode.as_ref().map(|e| e.system().topology_kind())
    }

    /// Whether the current reference was smoothed.
    pub fn is_smoothed(&self) -> Option<bool> {
        self.episode.as_ref().map(|e| e.disturbance().is_smoothed())
    }

    /// Elapsed sample of the current episode.
    pub fn elapsed(&self) -> Option<StepId> {
        self.episode.as_ref().map(EpisodeContext::elapsed)
    }

    /// Metrics of the most recent call plus cumulative counters.
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.metrics
    }
}

impl std::fmt::Debug for MultiLtiEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiLtiEnv")
            .field("n", &self.config.n)
            .field("phase", &self.phase)
            .field("episode", &self.episode_id)
            .field("elapsed", &self.elapsed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use setpoint_test_utils::{constant_action, random_action, seeded_rng};

    fn env(seed: u64) -> MultiLtiEnv {
        MultiLtiEnv::new(EnvConfig {
            seed: Some(seed),
            ..EnvConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn step_before_reset_is_rejected() {
        let mut e = env(1);
        assert_eq!(
            e.step(&constant_action(32, 0.0)).unwrap_err(),
            EnvError::NotReset
        );
        assert_eq!(e.phase(), Phase::Uninitialized);
        assert_eq!(e.last_metrics().usage_errors, 1);
    }

    #[test]
    fn reset_moves_to_reset_phase() {
        let mut e = env(2);
        let (obs, info) = e.reset(None, None).unwrap();
        assert_eq!(obs.shape(), [32, 32, 4]);
        assert!(obs.is_finite());
        assert!(info.is_empty());
        assert_eq!(e.phase(), Phase::Reset);
        assert_eq!(e.elapsed(), Some(StepId(1)));
        assert_eq!(e.episode_id(), EpisodeId(1));
        let format = e.resolution().unwrap().format();
        assert!(format == 2 || format == 3);
    }

    #[test]
    fn wrong_action_shape_leaves_state() {
        let mut e = env(3);
        e.reset(None, None).unwrap();
        assert_eq!(
            e.step(&[0.0; 7]).unwrap_err(),
            EnvError::ActionShape {
                expected: 1024,
                got: 7
            }
        );
        assert_eq!(e.elapsed(), Some(StepId(1)));
        assert_eq!(e.phase(), Phase::Reset);
    }

    #[test]
    fn step_after_terminal_is_rejected_until_reset() {
        let mut e = MultiLtiEnv::new(EnvConfig {
            seed: Some(4),
            max_episode_steps: 6,
            ..EnvConfig::default()
        })
        .unwrap();
        e.reset(None, None).unwrap();
        let mut rng = seeded_rng(4);
        let mut outcome = e.step(&random_action(32, &mut rng)).unwrap();
        while !outcome.done() {
            outcome = e.step(&random_action(32, &mut rng)).unwrap();
        }
        assert!(outcome.terminated && outcome.truncated);
        assert_eq!(e.phase(), Phase::Terminal);
        assert!(matches!(
            e.step(&random_action(32, &mut rng)),
            Err(EnvError::EpisodeTerminated { elapsed: StepId(4) })
        ));
        e.reset(None, None).unwrap();
        assert!(e.step(&random_action(32, &mut rng)).is_ok());
        assert_eq!(e.last_metrics().episodes_completed, 1);
        assert_eq!(e.last_metrics().episodes_started, 2);
    }

    #[test]
    fn seeded_instances_agree() {
        let mut a = env(5);
        let mut b = env(5);
        let (oa, _) = a.reset(None, None).unwrap();
        let (ob, _) = b.reset(Some(999), None).unwrap();
        assert_eq!(oa, ob);
        let act = constant_action(32, 0.3);
        assert_eq!(a.step(&act).unwrap().reward, b.step(&act).unwrap().reward);
    }

    #[test]
    fn spaces_match_grid() {
        let e = env(6);
        assert_eq!(e.action_space().shape(), &[32, 32]);
        assert_eq!(e.action_space().low(), -1.0);
        assert_eq!(e.observation_space().shape(), &[32, 32, 4]);
        assert!(e.observation_space().high().is_infinite());
    }

    #[test]
    fn open_loop_requires_episode() {
        let e = env(7);
        assert_eq!(e.simulate_open_loop().unwrap_err(), EnvError::NotReset);
    }

    #[test]
    fn new_rejects_invalid_config() {
        let err = MultiLtiEnv::new(EnvConfig {
            t: -1.0,
            ..EnvConfig::default()
        })
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidHorizon { value: -1.0 });
    }
}
