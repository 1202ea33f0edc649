//! Setpoint: procedurally generated setpoint-tracking environments built
//! on random interconnected LTI systems.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all setpoint sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use setpoint::prelude::*;
//!
//! let mut env = MultiLtiEnv::new(EnvConfig {
//!     seed: Some(42),
//!     ..EnvConfig::default()
//! })
//! .unwrap();
//! let (obs, _info) = env.reset(None, None).unwrap();
//! assert_eq!(obs.shape(), [32, 32, 4]);
//!
//! let action = vec![0.0f32; 32 * 32];
//! let outcome = env.step(&action).unwrap();
//! assert!(!outcome.terminated);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `setpoint-core` | `Resolution`, episode and step IDs |
//! | [`space`] | `setpoint-space` | Grids, fields, resampling and filters |
//! | [`lti`] | `setpoint-lti` | State-space realizations and simulation |
//! | [`systems`] | `setpoint-systems` | Topology, synthesis, reference, reward, observation |
//! | [`engine`] | `setpoint-engine` | The reset/step environment and batching |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Resolution and identifiers (`setpoint-core`).
pub use setpoint_core as types;

/// Square grids, field stacks, resampling and filters (`setpoint-space`).
pub use setpoint_space as space;

/// State-space realizations, interconnection and forced response
/// (`setpoint-lti`).
pub use setpoint_lti as lti;

/// Per-episode generation: coupling topologies, system synthesis,
/// reference fields, reward and observation assembly (`setpoint-systems`).
pub use setpoint_systems as systems;

/// The episodic environment (`setpoint-engine`).
///
/// [`engine::MultiLtiEnv`] for a single environment,
/// [`engine::BatchedEnv`] for vectorized training.
pub use setpoint_engine as engine;

/// Common imports for typical setpoint usage.
///
/// ```rust
/// use setpoint::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use setpoint_core::{EpisodeId, Resolution, StepId};

    // Errors
    pub use setpoint_core::ResolutionError;
    pub use setpoint_engine::{BatchError, ConfigError, EnvError};
    pub use setpoint_lti::LtiError;
    pub use setpoint_space::SpaceError;
    pub use setpoint_systems::SynthesisError;

    // Episode data
    pub use setpoint_systems::{Observation, Reward, RewardMode, SystemVariant, TopologyKind};

    // Environment
    pub use setpoint_engine::{
        BatchedEnv, BoxSpace, EnvConfig, Info, MultiLtiEnv, Phase, StepMetrics, StepOutcome,
    };
}
