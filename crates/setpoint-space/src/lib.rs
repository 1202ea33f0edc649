//! Spatial data structures for setpoint simulations.
//!
//! # Grids
//!
//! [`SquareGrid`] is the 4-connected square lattice that coupling
//! topologies are built on. Boundary handling is selected by
//! [`EdgeBehavior`]; coupling uses [`EdgeBehavior::Wrap`] (torus).
//!
//! # Fields
//!
//! [`FieldStack`] stores a `side×side×depth` array in row-major order,
//! the layout shared by actions, disturbance fields and observations.
//!
//! # Resampling and filters
//!
//! - [`downsample`] / [`upsample`]: conversion between the fine agent grid
//!   and the coarse simulation grid.
//! - [`gaussian_filter`] / [`box_blur`]: smoothing used to correlate random
//!   fields in space.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod edge;
pub mod error;
pub mod field;
pub mod filter;
pub mod grid;
pub mod scale;

pub use edge::EdgeBehavior;
pub use error::SpaceError;
pub use field::FieldStack;
pub use filter::{box_blur, gaussian_filter};
pub use grid::SquareGrid;
pub use scale::{downsample, upsample};
