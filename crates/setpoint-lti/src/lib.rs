//! Linear time-invariant systems for setpoint simulations.
//!
//! Everything here operates on continuous-time state-space realizations
//! `ẋ = A x + B u`, `y = C x + D u` stored as [`nalgebra::DMatrix<f64>`].
//!
//! - [`StateSpace`]: a realization, plus the two fixed-form SISO blocks
//!   used by the synthesizer ([`StateSpace::first_order`],
//!   [`StateSpace::static_gain`]).
//! - [`rss`]: random stable realization.
//! - [`interconnect`]: SISO blocks wired by summing junctions, collapsed
//!   into one equivalent realization.
//! - [`Discretization`] / [`forced_response`]: first-order-hold
//!   simulation on a uniform time grid.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod interconnect;
pub mod random;
pub mod response;
pub mod state_space;

pub use error::LtiError;
pub use interconnect::{interconnect, Wire};
pub use random::rss;
pub use response::{forced_response, Discretization, Response};
pub use state_space::StateSpace;
