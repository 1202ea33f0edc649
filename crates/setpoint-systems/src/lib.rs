//! Procedural generation of the per-episode simulation data.
//!
//! Each reset builds, in order:
//!
//! 1. a [`Topology`] coupling the coarse cells ([`diffusion_topology`] or
//!    [`random_permutation_topology`]),
//! 2. a [`SynthesizedSystem`] of one of the [`SystemVariant`]s, collapsed
//!    into a single `Nc`-input, `Nc`-output realization,
//! 3. a [`Disturbance`] reference field for the whole horizon.
//!
//! Each step then uses [`coarse_action`], [`tracking_reward`] and
//! [`assemble`] to move between the agent's fine grid and the coarse
//! simulation grid.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod disturbance;
pub mod error;
pub mod observation;
pub mod reward;
pub mod synth;
pub mod topology;

pub use disturbance::Disturbance;
pub use error::SynthesisError;
pub use observation::{
    assemble, coarse_action, fine_time_major, upsample_trajectory, Observation, OBS_CHANNELS,
    OUTPUT_SAMPLES,
};
pub use reward::{tracking_reward, Reward, RewardMode};
pub use synth::{
    correlated_gains, coupling_gain, synthesize, SynthesizedSystem, SystemVariant, SINGLE_STATES,
};
pub use topology::{
    diffusion_topology, random_permutation_topology, Connection, Port, PortKind, Topology,
    TopologyKind,
};
