//! Integration test: full episode lifecycle through the public API.
//!
//! Drives `MultiLtiEnv` the way a training loop does: reset, step random
//! actions, reset on termination. Checks observation shape and finiteness,
//! termination timing, infeasible grids and independence of resets.

use std::collections::HashSet;

use setpoint_core::{ResolutionError, StepId};
use setpoint_engine::{EnvConfig, EnvError, MultiLtiEnv, Phase};
use setpoint_systems::{Reward, RewardMode};
use setpoint_test_utils::{random_action, seeded_rng};

// ── Helpers ──────────────────────────────────────────────────────────

fn seeded(seed: u64) -> EnvConfig {
    EnvConfig {
        seed: Some(seed),
        ..EnvConfig::default()
    }
}

// ── Long run ─────────────────────────────────────────────────────────

/// 500 random steps on the default 32×32 grid, resetting on termination.
#[test]
fn five_hundred_random_steps() {
    let mut env = MultiLtiEnv::new(seeded(100)).unwrap();
    let (obs, info) = env.reset(None, None).unwrap();
    assert_eq!(obs.shape(), [32, 32, 4]);
    assert!(obs.is_finite());
    assert!(info.is_empty());

    let mut rng = seeded_rng(100);
    let mut resets = 0;
    for _ in 0..500 {
        let action = env.action_space().sample(&mut rng);
        let out = env.step(&action).unwrap();
        assert!(matches!(out.reward, Reward::Scalar(v) if v.is_finite()));
        assert!(out.observation.is_finite());
        assert!(out.info.is_empty());
        assert!(env.elapsed().unwrap().0 <= 248);
        if out.done() {
            env.reset(None, None).unwrap();
            resets += 1;
        }
    }
    // 247 steps per episode.
    assert_eq!(resets, 2);
    assert_eq!(env.last_metrics().steps_total, 500);
    assert_eq!(env.last_metrics().episodes_started, 3);
}

// ── Termination ──────────────────────────────────────────────────────

#[test]
fn terminates_exactly_two_before_horizon() {
    for steps in [4usize, 5, 10, 250] {
        let mut env = MultiLtiEnv::new(EnvConfig {
            max_episode_steps: steps,
            ..seeded(steps as u64)
        })
        .unwrap();
        env.reset(None, None).unwrap();
        let mut rng = seeded_rng(1);
        let mut taken = 0;
        loop {
            let out = env.step(&random_action(32, &mut rng)).unwrap();
            taken += 1;
            assert_eq!(out.terminated, out.truncated);
            if out.terminated {
                break;
            }
        }
        assert_eq!(env.elapsed(), Some(StepId(steps - 2)));
        assert_eq!(taken, steps - 3);
        assert_eq!(env.phase(), Phase::Terminal);
    }
}

// ── Infeasible grid ──────────────────────────────────────────────────

#[test]
fn small_grid_fails_at_reset() {
    let mut env = MultiLtiEnv::new(EnvConfig {
        n: 4,
        t: 10.0,
        max_episode_steps: 250,
        ..seeded(4)
    })
    .unwrap();
    let err = env.reset(None, None).unwrap_err();
    assert!(matches!(
        err,
        EnvError::Resolution(ResolutionError::EmptyRange { side: 4, .. })
    ));
    assert_eq!(env.phase(), Phase::Uninitialized);
    assert_eq!(env.step(&[0.0; 16]).unwrap_err(), EnvError::NotReset);
}

#[test]
fn indivisible_grid_fails_only_for_some_draws() {
    // log2(24) - 1 = 3.58: only format 2 is drawn, and 24 / 4 = 6.
    let mut env = MultiLtiEnv::new(EnvConfig { n: 24, ..seeded(24) }).unwrap();
    let (obs, _) = env.reset(None, None).unwrap();
    assert_eq!(obs.shape(), [24, 24, 4]);

    // log2(36) - 1 = 4.17: format 2 fits (36 / 4 = 9), format 3 does not.
    let mut env = MultiLtiEnv::new(EnvConfig { n: 36, ..seeded(36) }).unwrap();
    let (mut ok, mut failed) = (0, 0);
    for _ in 0..40 {
        match env.reset(None, None) {
            Ok((obs, _)) => {
                assert_eq!(obs.shape(), [36, 36, 4]);
                ok += 1;
            }
            Err(EnvError::Resolution(ResolutionError::Indivisible { side: 36, factor: 8 })) => {
                assert_eq!(env.phase(), Phase::Uninitialized);
                failed += 1;
            }
            Err(other) => panic!("unexpected error {other}"),
        }
    }
    assert!(ok > 0 && failed > 0, "ok={ok} failed={failed}");
}

// ── Independence ─────────────────────────────────────────────────────

#[test]
fn resets_draw_independent_choices() {
    let mut env = MultiLtiEnv::new(seeded(7)).unwrap();
    let mut formats = HashSet::new();
    let mut variants = HashSet::new();
    let mut first_obs = Vec::new();
    for _ in 0..30 {
        let (obs, _) = env.reset(None, None).unwrap();
        formats.insert(env.resolution().unwrap().format());
        variants.insert(env.variant().unwrap());
        first_obs.push(obs);
    }
    assert_eq!(formats.len(), 2);
    assert_eq!(variants.len(), 3);
    assert_ne!(first_obs[0], first_obs[1]);
}

#[test]
fn reset_mid_episode_starts_fresh() {
    let mut env = MultiLtiEnv::new(seeded(8)).unwrap();
    env.reset(None, None).unwrap();
    let mut rng = seeded_rng(8);
    for _ in 0..10 {
        env.step(&random_action(32, &mut rng)).unwrap();
    }
    assert_eq!(env.elapsed(), Some(StepId(11)));
    env.reset(None, None).unwrap();
    assert_eq!(env.elapsed(), Some(StepId(1)));
    assert_eq!(env.phase(), Phase::Reset);
}

// ── Reward modes and open loop ───────────────────────────────────────

#[test]
fn per_cell_reward_has_one_value_per_coarse_cell() {
    let mut env = MultiLtiEnv::new(EnvConfig {
        reward_mode: RewardMode::PerCell,
        ..seeded(9)
    })
    .unwrap();
    env.reset(None, None).unwrap();
    let cells = env.resolution().unwrap().coarse_cells();
    let out = env.step(&random_action(32, &mut seeded_rng(9))).unwrap();
    match out.reward {
        Reward::PerCell(v) => assert_eq!(v.len(), cells),
        other => panic!("expected per-cell reward, got {other:?}"),
    }
}

#[test]
fn open_loop_covers_horizon_without_touching_episode() {
    let mut env = MultiLtiEnv::new(seeded(10)).unwrap();
    env.reset(None, None).unwrap();
    env.step(&random_action(32, &mut seeded_rng(10))).unwrap();
    let before = env.episode().unwrap().state().clone();
    let (reference, outputs) = env.simulate_open_loop().unwrap();
    assert_eq!(reference.shape(), (250, 1024));
    assert_eq!(outputs.shape(), (250, 1024));
    assert!(reference.iter().all(|v| (-1.0..=1.0).contains(v)));
    assert_eq!(env.episode().unwrap().state(), &before);
    assert_eq!(env.elapsed(), Some(StepId(2)));
}
