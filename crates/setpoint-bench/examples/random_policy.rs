//! Random-policy driver: 500 steps on the reference profile.
//!
//! Samples actions from the action space, resets on termination and
//! prints a summary per episode plus timing totals.
//!
//! ```sh
//! RUST_LOG=setpoint_engine=debug cargo run -p setpoint-bench --example random_policy
//! ```

use setpoint_bench::{init_tracing, reference_profile};
use setpoint_engine::MultiLtiEnv;
use setpoint_test_utils::seeded_rng;

const TOTAL_STEPS: usize = 500;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing("info");

    let config = reference_profile(42);
    let mut env = MultiLtiEnv::new(config)?;
    let mut rng = seeded_rng(7);

    println!("=== setpoint random policy ===");
    println!(
        "  grid: {0}x{0}, horizon: {1} samples",
        env.config().n,
        env.config().max_episode_steps
    );
    println!();

    let (obs, _) = env.reset(None, None)?;
    println!("  observation shape: {:?}", obs.shape());

    let mut episode_return = 0.0;
    let mut episode_steps = 0usize;
    let mut solve_us = 0u64;
    let mut total_us = 0u64;

    for _ in 0..TOTAL_STEPS {
        let action = env.action_space().sample(&mut rng);
        let out = env.step(&action)?;
        episode_return += out.reward.mean();
        episode_steps += 1;

        let m = env.last_metrics();
        solve_us += m.solve_us;
        total_us += m.total_us;

        if out.done() {
            let res = env.resolution();
            println!(
                "  episode {:>2}: {:>3} steps, return {:>9.3}, variant {:?}, topology {:?}, format {:?}",
                env.episode_id().0,
                episode_steps,
                episode_return,
                env.variant(),
                env.topology_kind(),
                res.map(|r| r.format()),
            );
            env.reset(None, None)?;
            episode_return = 0.0;
            episode_steps = 0;
        }
    }

    let m = env.last_metrics();
    println!();
    println!("  steps: {}", m.steps_total);
    println!("  episodes started: {}", m.episodes_started);
    println!("  episodes completed: {}", m.episodes_completed);
    println!(
        "  mean step: {:.1} us (solve {:.1} us)",
        total_us as f64 / TOTAL_STEPS as f64,
        solve_us as f64 / TOTAL_STEPS as f64
    );
    Ok(())
}
