//! Square grid with 4-connected neighbourhood (left/right/up/down).

use crate::edge::EdgeBehavior;
use crate::error::SpaceError;
use smallvec::SmallVec;

/// A `side×side` square grid addressed by flat row-major cell indices.
///
/// Cell `i` sits at `(i / side, i % side)`. Neighbours are the four
/// cardinal directions, reported in the fixed order left, right, up,
/// down. Out-of-range neighbours are mapped back with the grid's
/// [`EdgeBehavior`]; with `Wrap` the grid is a torus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquareGrid {
    side: usize,
    edge: EdgeBehavior,
}

/// Offsets `(d_row, d_col)` in neighbour order: left, right, up, down.
const OFFSETS: [(i64, i64); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

impl SquareGrid {
    /// Create a `side×side` grid.
    ///
    /// Returns `Err(SpaceError::EmptySpace)` if `side` is 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use setpoint_space::{EdgeBehavior, SquareGrid};
    ///
    /// let grid = SquareGrid::new(4, EdgeBehavior::Wrap).unwrap();
    /// // Cell 0 is the top-left corner; on a torus it wraps both ways.
    /// assert_eq!(grid.neighbours(0).as_slice(), &[3, 1, 12, 4]);
    /// ```
    pub fn new(side: usize, edge: EdgeBehavior) -> Result<Self, SpaceError> {
        if side == 0 {
            return Err(SpaceError::EmptySpace);
        }
        Ok(Self { side, edge })
    }

    /// Grid side.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.side * self.side
    }

    /// Edge behavior.
    pub fn edge_behavior(&self) -> EdgeBehavior {
        self.edge
    }

    /// `(row, col)` of a flat cell index.
    pub fn coord(&self, cell: usize) -> (usize, usize) {
        (cell / self.side, cell % self.side)
    }

    /// Flat index of `(row, col)`.
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.side + col
    }

    /// Flat indices of the left, right, up and down neighbours of `cell`.
    pub fn neighbours(&self, cell: usize) -> SmallVec<[usize; 4]> {
        let (r, c) = self.coord(cell);
        OFFSETS
            .iter()
            .map(|&(dr, dc)| {
                let nr = self.edge.resolve(r as i64 + dr, self.side);
                let nc = self.edge.resolve(c as i64 + dc, self.side);
                self.index(nr, nc)
            })
            .collect()
    }
}
