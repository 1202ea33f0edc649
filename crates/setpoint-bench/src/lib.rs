//! Benchmark profiles and utilities for setpoint.
//!
//! - [`reference_profile`]: the default 32×32 environment
//! - [`stress_profile`]: a 128×128 environment, 1024 or 4096 coarse cells
//! - [`init_tracing`]: `fmt` subscriber filtered by `RUST_LOG`

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::io::IsTerminal;

use setpoint_engine::EnvConfig;
use setpoint_systems::RewardMode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// The default environment: 32×32 grid, 250 samples over 10 s.
pub fn reference_profile(seed: u64) -> EnvConfig {
    EnvConfig {
        seed: Some(seed),
        ..EnvConfig::default()
    }
}

/// A 128×128 grid with per-cell rewards.
///
/// Formats 2..=5 are drawn, so the coarse grid ranges from 32×32 down to
/// 4×4.
pub fn stress_profile(seed: u64) -> EnvConfig {
    EnvConfig {
        n: 128,
        reward_mode: RewardMode::PerCell,
        seed: Some(seed),
        ..EnvConfig::default()
    }
}

/// Install a global `fmt` subscriber filtered by `RUST_LOG`, falling back
/// to `default_directive`.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing(default_directive: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(std::io::stdout().is_terminal());
    Registry::default()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .is_ok()
}
