//! Core types for the setpoint simulation workspace.
//!
//! This is the leaf crate with no internal dependencies. It defines the
//! spatial [`Resolution`] shared by every other crate, the strongly-typed
//! episode and step identifiers, and the resolution error type.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod resolution;

pub use error::ResolutionError;
pub use id::{EpisodeId, StepId};
pub use resolution::Resolution;
