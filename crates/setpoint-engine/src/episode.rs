//! Episode context and the rolling-window stepper.
//!
//! An [`EpisodeContext`] holds everything one reset draws: the resolution,
//! the synthesized system and its cached discretization, the reference
//! field, and the rolling window state (last state, last outputs, previous
//! action, elapsed sample).
//!
//! # Window
//!
//! At elapsed sample `k` a step solves over the three samples
//! `[k, k+1, k+2]` with inputs `[previous action, action, reference[k+2]]`,
//! starting from the state left by the previous step. The state after the
//! first two samples is carried forward; all three output samples go into
//! the observation.

use std::time::Instant;

use nalgebra::{DMatrix, DVector};
use rand::Rng;
use setpoint_core::{EpisodeId, Resolution, StepId};
use setpoint_lti::{forced_response, Discretization};
use setpoint_systems::{
    assemble, coarse_action, fine_time_major, synthesize, tracking_reward, upsample_trajectory,
    Disturbance, Observation, Reward, RewardMode, SynthesizedSystem, SystemVariant, TopologyKind,
    OUTPUT_SAMPLES,
};

use crate::config::EnvConfig;
use crate::error::EnvError;
use crate::metrics::StepMetrics;

// ── Phase ───────────────────────────────────────────────────────

/// Lifecycle of an environment instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// No episode has been started, or the last reset failed.
    #[default]
    Uninitialized,
    /// Reset succeeded; no step taken yet.
    Reset,
    /// At least one step taken, horizon not reached.
    Running,
    /// The terminal step has been reached; only `reset` is accepted.
    Terminal,
}

// ── EpisodeContext ──────────────────────────────────────────────

/// Everything drawn at reset plus the rolling window state.
#[derive(Clone, Debug)]
pub struct EpisodeContext {
    id: EpisodeId,
    resolution: Resolution,
    system: SynthesizedSystem,
    disturbance: Disturbance,
    discretization: Discretization,
    initial_state: DVector<f64>,
    state: DVector<f64>,
    outputs: DMatrix<f64>,
    previous_action: DVector<f64>,
    elapsed: StepId,
    terminal_step: usize,
}

/// Result of advancing one sample.
#[derive(Clone, Debug)]
pub(crate) struct Advance {
    pub observation: Observation,
    pub reward: Reward,
    pub terminated: bool,
}

impl EpisodeContext {
    /// Draw a new episode and run the 3-sample warm-up solve.
    ///
    /// Returns the context (elapsed = 1) and the first observation.
    pub(crate) fn begin<R: Rng + ?Sized>(
        id: EpisodeId,
        config: &EnvConfig,
        rng: &mut R,
        metrics: &mut StepMetrics,
    ) -> Result<(Self, Observation), EnvError> {
        let synth_start = Instant::now();
        let resolution = Resolution::draw(config.n, config.min_scale, rng)?;
        let variant = SystemVariant::draw(rng);
        let system = synthesize(variant, &resolution, rng)?;
        let initial_state = DVector::from_fn(system.system().nstates(), |_, _| {
            2.0 * rng.random::<f64>() - 1.0
        });
        let sigma = if system.topology_kind() == TopologyKind::Diffusion {
            1.0
        } else {
            0.0
        };
        let disturbance =
            Disturbance::generate(&resolution, config.max_episode_steps, sigma, rng)?;
        metrics.synthesis_us = synth_start.elapsed().as_micros() as u64;

        let solve_start = Instant::now();
        let discretization =
            Discretization::first_order_hold(system.system(), config.time_step())?;
        let warm = forced_response(
            system.system(),
            &discretization,
            &initial_state,
            &disturbance.window(0, OUTPUT_SAMPLES),
        )?;
        metrics.solve_us = solve_start.elapsed().as_micros() as u64;

        let resample_start = Instant::now();
        let previous_action = disturbance.sample(1);
        let observation = assemble(&resolution, &previous_action, &warm.outputs)?;
        metrics.resample_us = resample_start.elapsed().as_micros() as u64;

        let ctx = Self {
            id,
            resolution,
            system,
            disturbance,
            discretization,
            state: warm.final_state(),
            outputs: warm.outputs,
            initial_state,
            previous_action,
            elapsed: StepId(1),
            terminal_step: config.terminal_step(),
        };
        Ok((ctx, observation))
    }

    /// Apply a fine action and advance one sample.
    ///
    /// The caller guarantees the episode is not terminal and that `action`
    /// has `n×n` elements.
    pub(crate) fn advance(
        &mut self,
        action: &[f32],
        mode: RewardMode,
        metrics: &mut StepMetrics,
    ) -> Result<Advance, EnvError> {
        let k = self.elapsed.0;

        let resample_start = Instant::now();
        let applied = coarse_action(&self.resolution, action)?;
        let reward = tracking_reward(&self.disturbance.sample(k + 1), &applied, mode)?;
        let mut resample_us = resample_start.elapsed().as_micros() as u64;

        let solve_start = Instant::now();
        let cells = self.resolution.coarse_cells();
        let mut window = DMatrix::zeros(cells, OUTPUT_SAMPLES);
        window.set_column(0, &self.previous_action);
        window.set_column(1, &applied);
        window.set_column(2, &self.disturbance.sample(k + 2));
        // The first two samples of the look-ahead solve are the state advance.
        let resp = forced_response(
            self.system.system(),
            &self.discretization,
            &self.state,
            &window,
        )?;
        metrics.solve_us = solve_start.elapsed().as_micros() as u64;

        self.state = resp.states.column(1).into_owned();
        self.outputs = resp.outputs;
        self.elapsed = self.elapsed.next();

        let assemble_start = Instant::now();
        let observation = assemble(&self.resolution, &applied, &self.outputs)?;
        self.previous_action = applied;
        resample_us += assemble_start.elapsed().as_micros() as u64;
        metrics.resample_us = resample_us;

        Ok(Advance {
            observation,
            reward,
            terminated: self.is_terminal(),
        })
    }

    /// Solve the whole horizon from the initial state under the stored
    /// reference. Returns `(reference_fine, outputs_fine)`, both `T × N`.
    ///
    /// Does not touch the rolling window.
    pub fn simulate_open_loop(&self) -> Result<(DMatrix<f64>, DMatrix<f64>), EnvError> {
        let resp = forced_response(
            self.system.system(),
            &self.discretization,
            &self.initial_state,
            self.disturbance.reference(),
        )?;
        let outputs = upsample_trajectory(&self.resolution, &resp.outputs)?;
        let reference = fine_time_major(self.disturbance.reference_fine());
        Ok((reference, outputs))
    }

    /// Whether the terminal step has been reached.
    pub fn is_terminal(&self) -> bool {
        self.elapsed.0 >= self.terminal_step
    }

    /// Episode counter value.
    pub fn id(&self) -> EpisodeId {
        self.id
    }

    /// Resolution drawn at reset.
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// The synthesized system.
    pub fn system(&self) -> &SynthesizedSystem {
        &self.system
    }

    /// The reference field.
    pub fn disturbance(&self) -> &Disturbance {
        &self.disturbance
    }

    /// Cached discretization.
    pub fn discretization(&self) -> &Discretization {
        &self.discretization
    }

    /// Initial state `X0`.
    pub fn initial_state(&self) -> &DVector<f64> {
        &self.initial_state
    }

    /// State at the end of the last window.
    pub fn state(&self) -> &DVector<f64> {
        &self.state
    }

    /// Output samples of the last window, `Nc × 3`.
    pub fn outputs(&self) -> &DMatrix<f64> {
        &self.outputs
    }

    /// Last applied coarse action.
    pub fn previous_action(&self) -> &DVector<f64> {
        &self.previous_action
    }

    /// Elapsed sample index.
    pub fn elapsed(&self) -> StepId {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use setpoint_test_utils::{assert_all_close, assert_close, constant_action, seeded_rng};

    fn config() -> EnvConfig {
        EnvConfig {
            max_episode_steps: 12,
            ..EnvConfig::default()
        }
    }

    fn begin(seed: u64) -> (EpisodeContext, Observation) {
        let mut metrics = StepMetrics::default();
        EpisodeContext::begin(EpisodeId(1), &config(), &mut seeded_rng(seed), &mut metrics)
            .unwrap()
    }

    #[test]
    fn warm_up_leaves_elapsed_at_one() {
        let (ctx, obs) = begin(1);
        assert_eq!(ctx.elapsed(), StepId(1));
        assert_eq!(obs.shape(), [32, 32, 4]);
        assert_eq!(ctx.previous_action(), &ctx.disturbance().sample(1));
        assert_eq!(ctx.outputs().ncols(), 3);
    }

    #[test]
    fn reset_observation_carries_reference_sample() {
        let (ctx, obs) = begin(2);
        let r = ctx.resolution().factor() as usize;
        let cs = ctx.resolution().coarse_side();
        for cell in 0..ctx.resolution().coarse_cells() {
            let (row, col) = (cell / cs, cell % cs);
            let v = obs.get(row * r, col * r, 0);
            assert_eq!(v, ctx.previous_action()[cell] as f32);
        }
    }

    #[test]
    fn advance_matches_direct_solve() {
        let (mut ctx, _) = begin(3);
        let before = ctx.state().clone();
        let prev = ctx.previous_action().clone();
        let next_ref = ctx.disturbance().sample(3);
        let mut metrics = StepMetrics::default();
        let out = ctx
            .advance(&constant_action(32, 0.5), RewardMode::Mean, &mut metrics)
            .unwrap();

        let cells = ctx.resolution().coarse_cells();
        let applied = DVector::from_element(cells, 0.5);
        let mut window = DMatrix::zeros(cells, 3);
        window.set_column(0, &prev);
        window.set_column(1, &applied);
        window.set_column(2, &next_ref);
        let sys = ctx.system().system();
        let first_two = window.columns(0, 2).into_owned();
        let two = forced_response(sys, ctx.discretization(), &before, &first_two).unwrap();
        let three = forced_response(sys, ctx.discretization(), &before, &window).unwrap();
        assert_all_close(ctx.state().as_slice(), two.final_state().as_slice(), 1e-12);
        assert_eq!(ctx.outputs(), &three.outputs);
        assert_eq!(ctx.elapsed(), StepId(2));
        assert!(!out.terminated);
    }

    #[test]
    fn reward_tracks_next_reference() {
        let (mut ctx, _) = begin(4);
        let target = ctx.disturbance().sample(2);
        let mut metrics = StepMetrics::default();
        let out = ctx
            .advance(&constant_action(32, 0.0), RewardMode::PerCell, &mut metrics)
            .unwrap();
        match out.reward {
            Reward::PerCell(v) => {
                assert_all_close(&v, target.as_slice(), 1e-12);
            }
            other => panic!("expected per-cell reward, got {other:?}"),
        }
    }

    #[test]
    fn terminates_at_horizon_minus_two() {
        let (mut ctx, _) = begin(5);
        let mut metrics = StepMetrics::default();
        let mut steps = 0;
        loop {
            let out = ctx
                .advance(&constant_action(32, 0.1), RewardMode::Mean, &mut metrics)
                .unwrap();
            steps += 1;
            if out.terminated {
                break;
            }
        }
        assert_eq!(ctx.elapsed(), StepId(10));
        assert_eq!(steps, 9);
    }

    #[test]
    fn open_loop_shapes() {
        let (ctx, _) = begin(6);
        let (reference, outputs) = ctx.simulate_open_loop().unwrap();
        assert_eq!(reference.shape(), (12, 1024));
        assert_eq!(outputs.shape(), (12, 1024));
        assert!(outputs.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn open_loop_reproduces_warm_up() {
        let (ctx, _) = begin(7);
        let (_, outputs) = ctx.simulate_open_loop().unwrap();
        let r = ctx.resolution().factor() as usize;
        let cs = ctx.resolution().coarse_side();
        // Warm-up and open loop share the same first three samples.
        for k in 0..3 {
            for cell in 0..ctx.resolution().coarse_cells() {
                let fine = (cell / cs) * r * 32 + (cell % cs) * r;
                assert_close(outputs[(k, fine)], ctx.outputs()[(cell, k)], 1e-9);
            }
        }
    }
}
