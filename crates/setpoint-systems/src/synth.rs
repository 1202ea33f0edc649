//! Random system synthesis.
//!
//! Every variant exposes the same external shape: `Nc` inputs and `Nc`
//! outputs, one per coarse cell. Bank variants may additionally be coupled
//! through a [`Topology`], with a small static gain inserted per cell.

use std::fmt;

use rand::Rng;
use setpoint_core::Resolution;
use setpoint_lti::{interconnect, rss, StateSpace};
use setpoint_space::{box_blur, FieldStack, SpaceError};

use crate::error::SynthesisError;
use crate::topology::{diffusion_topology, random_permutation_topology, Topology, TopologyKind};

/// State count of the monolithic variant.
pub const SINGLE_STATES: usize = 4;

/// Shape of the random dynamics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SystemVariant {
    /// One random realization with [`SINGLE_STATES`] states.
    Single,
    /// A bank of single-state random realizations, one per cell.
    IndependentRandom,
    /// A bank of `g/(s+1)` low-pass filters with a blurred gain field.
    SpatiallyCorrelated,
}

impl SystemVariant {
    /// All variants, in draw order.
    pub const ALL: [Self; 3] = [
        Self::Single,
        Self::IndependentRandom,
        Self::SpatiallyCorrelated,
    ];

    /// Draw a variant uniformly.
    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Whether the variant is a per-cell bank.
    pub fn is_bank(self) -> bool {
        self != Self::Single
    }
}

impl fmt::Display for SystemVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Single => "single",
            Self::IndependentRandom => "independent-random",
            Self::SpatiallyCorrelated => "spatially-correlated",
        };
        f.write_str(name)
    }
}

/// A synthesized episode system.
#[derive(Clone, Debug)]
pub struct SynthesizedSystem {
    variant: SystemVariant,
    topology: Topology,
    system: StateSpace,
}

impl SynthesizedSystem {
    /// Variant that was built.
    pub fn variant(&self) -> SystemVariant {
        self.variant
    }

    /// Coupling graph (always disconnected for [`SystemVariant::Single`]).
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Coupling kind.
    pub fn topology_kind(&self) -> TopologyKind {
        self.topology.kind()
    }

    /// The collapsed `Nc`-input, `Nc`-output realization.
    pub fn system(&self) -> &StateSpace {
        &self.system
    }
}

/// Gain of each auxiliary coupling block: `1 / (2N)` with `N` the fine
/// cell count.
pub fn coupling_gain(resolution: &Resolution) -> f64 {
    1.0 / (2.0 * resolution.fine_cells() as f64)
}

/// Per-cell gains of the spatially correlated bank: a uniform field on
/// `[-1, 1]` box-blurred with a window as wide as the grid.
pub fn correlated_gains<R: Rng + ?Sized>(side: usize, rng: &mut R) -> Result<Vec<f64>, SpaceError> {
    let raw = FieldStack::from_fn(side, 1, |_, _, _| 2.0 * rng.random::<f64>() - 1.0)?;
    Ok(box_blur(&raw, side)?.into_vec())
}

/// Build a random system of the requested variant at `resolution`.
///
/// Bank variants are coupled with probability one half; a coupled bank
/// uses diffusion or random-permutation coupling with equal probability.
pub fn synthesize<R: Rng + ?Sized>(
    variant: SystemVariant,
    resolution: &Resolution,
    rng: &mut R,
) -> Result<SynthesizedSystem, SynthesisError> {
    let cells = resolution.coarse_cells();
    let side = resolution.coarse_side();

    if variant == SystemVariant::Single {
        let system = rss(SINGLE_STATES, cells, cells, rng)?;
        return Ok(SynthesizedSystem {
            variant,
            topology: Topology::disconnected(cells),
            system,
        });
    }

    let connected = rng.random_bool(0.5);
    let mut blocks: Vec<StateSpace> = match variant {
        SystemVariant::IndependentRandom => (0..cells)
            .map(|_| rss(1, 1, 1, rng))
            .collect::<Result<_, _>>()?,
        _ => correlated_gains(side, rng)?
            .into_iter()
            .map(StateSpace::first_order)
            .collect(),
    };

    let topology = if !connected {
        Topology::disconnected(cells)
    } else if rng.random_bool(0.5) {
        diffusion_topology(cells, side)?
    } else {
        random_permutation_topology(cells, rng)
    };
    if topology.is_connected() {
        let gain = coupling_gain(resolution);
        blocks.extend((0..cells).map(|_| StateSpace::static_gain(gain)));
    }

    let io: Vec<usize> = (0..cells).collect();
    let system = interconnect(&blocks, &topology.wires(), &io, &io)?;
    Ok(SynthesizedSystem {
        variant,
        topology,
        system,
    })
}
