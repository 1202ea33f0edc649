//! Episodic environment orchestrating setpoint simulations.
//!
//! Provides [`MultiLtiEnv`], a single-threaded reset/step environment over
//! randomly synthesized LTI systems, and [`BatchedEnv`] for stepping many
//! of them in one call.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized ──reset──▶ Reset ──step──▶ Running ──step…──▶ Terminal
//!       ▲                    ▲                                  │
//!       └── failed reset     └──────────────reset───────────────┘
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod batched;
pub mod config;
pub mod env;
pub mod episode;
pub mod error;
pub mod metrics;
pub mod spaces;

pub use batched::{BatchError, BatchedEnv};
pub use config::{ConfigError, EnvConfig, MIN_EPISODE_STEPS};
pub use env::{Info, MultiLtiEnv, StepOutcome};
pub use episode::{EpisodeContext, Phase};
pub use error::EnvError;
pub use metrics::StepMetrics;
pub use spaces::BoxSpace;
