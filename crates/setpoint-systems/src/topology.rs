//! Coupling graphs between the cells of a coarse grid.
//!
//! A coupled bank has two blocks per cell: the subsystem itself (block `i`)
//! and an auxiliary coupling gain (block `cells + i`). A topology wires
//! subsystem outputs into auxiliary inputs, and each auxiliary output
//! back into its own subsystem's input. Connections are pairs of named
//! ports, `"12.u" ← "3.y"`.

use std::fmt;

use indexmap::IndexMap;
use rand::seq::SliceRandom;
use rand::Rng;
use setpoint_lti::Wire;
use setpoint_space::{EdgeBehavior, SquareGrid};
use smallvec::SmallVec;

use crate::error::SynthesisError;

/// How cells of a bank are coupled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TopologyKind {
    /// No coupling.
    Disconnected,
    /// Each cell reads the sum of its four toroidal neighbours.
    Diffusion,
    /// Each cell reads one other cell through a random bijection.
    RandomPermutation,
}

impl fmt::Display for TopologyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disconnected => "disconnected",
            Self::Diffusion => "diffusion",
            Self::RandomPermutation => "random-permutation",
        };
        f.write_str(name)
    }
}

/// Direction of a block port.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PortKind {
    /// Block input, `u`.
    Input,
    /// Block output, `y`.
    Output,
}

/// A named block port.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Port {
    /// Block index.
    pub block: usize,
    /// Input or output.
    pub kind: PortKind,
}

impl Port {
    /// Input port of `block`.
    pub fn input(block: usize) -> Self {
        Self {
            block,
            kind: PortKind::Input,
        }
    }

    /// Output port of `block`.
    pub fn output(block: usize) -> Self {
        Self {
            block,
            kind: PortKind::Output,
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self.kind {
            PortKind::Input => 'u',
            PortKind::Output => 'y',
        };
        write!(f, "{}.{suffix}", self.block)
    }
}

/// One wire: `dest` (an input) receives `source` (an output).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Connection {
    /// Driven input port.
    pub dest: Port,
    /// Driving output port.
    pub source: Port,
}

impl Connection {
    fn new(dest: usize, source: usize) -> Self {
        Self {
            dest: Port::input(dest),
            source: Port::output(source),
        }
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <- {}", self.dest, self.source)
    }
}

/// A coupling graph over `cells` subsystems.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Topology {
    kind: TopologyKind,
    cells: usize,
    connections: Vec<Connection>,
}

impl Topology {
    /// No coupling between `cells` subsystems.
    pub fn disconnected(cells: usize) -> Self {
        Self {
            kind: TopologyKind::Disconnected,
            cells,
            connections: Vec::new(),
        }
    }

    /// Coupling kind.
    pub fn kind(&self) -> TopologyKind {
        self.kind
    }

    /// Number of subsystems.
    pub fn cells(&self) -> usize {
        self.cells
    }

    /// Whether any auxiliary blocks are wired in.
    pub fn is_connected(&self) -> bool {
        self.kind != TopologyKind::Disconnected
    }

    /// Block index of the auxiliary coupling block of `cell`.
    pub fn auxiliary(&self, cell: usize) -> usize {
        self.cells + cell
    }

    /// All connections, in generation order.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Group connections by destination into summing junctions.
    ///
    /// Destinations keep their first-appearance order; repeated sources
    /// are kept and therefore counted twice.
    pub fn wires(&self) -> Vec<Wire> {
        let mut junctions: IndexMap<usize, SmallVec<[usize; 4]>> = IndexMap::new();
        for conn in &self.connections {
            junctions
                .entry(conn.dest.block)
                .or_default()
                .push(conn.source.block);
        }
        junctions
            .into_iter()
            .map(|(dest, sources)| Wire { dest, sources })
            .collect()
    }
}

/// Toroidal four-neighbour coupling over a `side×side` grid.
///
/// For every cell `i`, the auxiliary input `cells+i` receives the outputs
/// of the left, right, up and down neighbours, and the input of `i`
/// receives the auxiliary output.
pub fn diffusion_topology(cells: usize, side: usize) -> Result<Topology, SynthesisError> {
    if side.checked_mul(side) != Some(cells) {
        return Err(SynthesisError::GridMismatch { cells, side });
    }
    let grid = SquareGrid::new(side, EdgeBehavior::Wrap)?;
    let mut connections = Vec::with_capacity(cells * 5);
    for i in 0..cells {
        for nb in grid.neighbours(i) {
            connections.push(Connection::new(cells + i, nb));
        }
    }
    for i in 0..cells {
        connections.push(Connection::new(i, cells + i));
    }
    Ok(Topology {
        kind: TopologyKind::Diffusion,
        cells,
        connections,
    })
}

/// Coupling through a uniformly random bijection `R`.
///
/// Cell `i` reads the output of `R[i]` through its auxiliary block.
/// Fixed points (`R[i] == i`) are left unconnected.
pub fn random_permutation_topology<R: Rng + ?Sized>(cells: usize, rng: &mut R) -> Topology {
    let mut perm: Vec<usize> = (0..cells).collect();
    perm.shuffle(rng);
    let moved: Vec<usize> = (0..cells).filter(|&i| perm[i] != i).collect();

    let mut connections = Vec::with_capacity(moved.len() * 2);
    for &i in &moved {
        connections.push(Connection::new(cells + i, perm[i]));
    }
    for &i in &moved {
        connections.push(Connection::new(i, cells + i));
    }
    Topology {
        kind: TopologyKind::RandomPermutation,
        cells,
        connections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn port_names() {
        assert_eq!(Port::input(17).to_string(), "17.u");
        assert_eq!(Port::output(3).to_string(), "3.y");
        assert_eq!(Connection::new(17, 3).to_string(), "17.u <- 3.y");
    }

    #[test]
    fn diffusion_connection_count() {
        let topo = diffusion_topology(16, 4).unwrap();
        assert_eq!(topo.kind(), TopologyKind::Diffusion);
        assert_eq!(topo.connections().len(), 16 * 5);
        assert_eq!(topo.wires().len(), 32);
    }

    #[test]
    fn diffusion_sources_are_toroidal_neighbours() {
        let topo = diffusion_topology(16, 4).unwrap();
        let wires = topo.wires();
        // Cell 0 = (0,0): left (0,3)=3, right (0,1)=1, up (3,0)=12, down (1,0)=4.
        let aux0 = wires.iter().find(|w| w.dest == 16).unwrap();
        assert_eq!(aux0.sources.as_slice(), &[3, 1, 12, 4]);
        let cell0 = wires.iter().find(|w| w.dest == 0).unwrap();
        assert_eq!(cell0.sources.as_slice(), &[16]);
    }

    #[test]
    fn diffusion_rejects_non_square() {
        assert_eq!(
            diffusion_topology(15, 4),
            Err(SynthesisError::GridMismatch { cells: 15, side: 4 })
        );
    }

    #[test]
    fn disconnected_has_no_wires() {
        let topo = Topology::disconnected(9);
        assert!(!topo.is_connected());
        assert!(topo.wires().is_empty());
    }

    #[test]
    fn permutation_wires_moved_cells_only() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let topo = random_permutation_topology(64, &mut rng);
        let aux: Vec<_> = topo
            .connections()
            .iter()
            .filter(|c| c.dest.block >= 64)
            .collect();
        let back: Vec<_> = topo
            .connections()
            .iter()
            .filter(|c| c.dest.block < 64)
            .collect();
        assert_eq!(aux.len(), back.len());
        for c in back {
            assert_eq!(c.source.block, topo.auxiliary(c.dest.block));
        }
    }

    proptest! {
        #[test]
        fn diffusion_has_four_distinct_sources(side in 3usize..10) {
            let cells = side * side;
            let topo = diffusion_topology(cells, side).unwrap();
            for wire in topo.wires().iter().filter(|w| w.dest >= cells) {
                let cell = wire.dest - cells;
                prop_assert_eq!(wire.sources.len(), 4);
                prop_assert!(!wire.sources.contains(&cell));
                let mut s = wire.sources.to_vec();
                s.sort_unstable();
                s.dedup();
                prop_assert_eq!(s.len(), 4);
            }
        }

        #[test]
        fn permutation_never_self_wires(cells in 1usize..200, seed in any::<u64>()) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let topo = random_permutation_topology(cells, &mut rng);
            let mut targets = Vec::new();
            for c in topo.connections().iter().filter(|c| c.dest.block >= cells) {
                prop_assert_ne!(c.dest.block - cells, c.source.block);
                targets.push(c.source.block);
            }
            targets.sort_unstable();
            targets.dedup();
            let aux = topo.connections().iter().filter(|c| c.dest.block >= cells).count();
            prop_assert_eq!(targets.len(), aux);
        }
    }
}
