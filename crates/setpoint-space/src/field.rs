//! Row-major `side×side×depth` field storage.

use crate::error::SpaceError;

/// A square spatial field with `depth` values per cell.
///
/// Element `(row, col, k)` lives at flat index `(row * side + col) * depth + k`,
/// so each cell's depth values are contiguous. Depth is time for
/// disturbance fields and channels for observations; resampling and
/// spatial filters never mix values across it.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldStack {
    side: usize,
    depth: usize,
    data: Vec<f64>,
}

impl FieldStack {
    /// A zero-filled field.
    pub fn zeros(side: usize, depth: usize) -> Result<Self, SpaceError> {
        if side == 0 || depth == 0 {
            return Err(SpaceError::EmptySpace);
        }
        Ok(Self {
            side,
            depth,
            data: vec![0.0; side * side * depth],
        })
    }

    /// Wrap existing row-major data.
    pub fn from_vec(side: usize, depth: usize, data: Vec<f64>) -> Result<Self, SpaceError> {
        if side == 0 || depth == 0 {
            return Err(SpaceError::EmptySpace);
        }
        let expected = side * side * depth;
        if data.len() != expected {
            return Err(SpaceError::LengthMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self { side, depth, data })
    }

    /// Build a field by evaluating `f(row, col, k)` for every element.
    pub fn from_fn(
        side: usize,
        depth: usize,
        mut f: impl FnMut(usize, usize, usize) -> f64,
    ) -> Result<Self, SpaceError> {
        let mut field = Self::zeros(side, depth)?;
        for r in 0..side {
            for c in 0..side {
                for k in 0..depth {
                    let idx = field.index(r, c, k);
                    field.data[idx] = f(r, c, k);
                }
            }
        }
        Ok(field)
    }

    /// Grid side.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Values per cell.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of spatial cells (`side²`).
    pub fn cell_count(&self) -> usize {
        self.side * self.side
    }

    /// Flat index of element `(row, col, k)`.
    pub fn index(&self, row: usize, col: usize, k: usize) -> usize {
        (row * self.side + col) * self.depth + k
    }

    /// Read element `(row, col, k)`.
    pub fn get(&self, row: usize, col: usize, k: usize) -> f64 {
        self.data[self.index(row, col, k)]
    }

    /// Write element `(row, col, k)`.
    pub fn set(&mut self, row: usize, col: usize, k: usize, value: f64) {
        let idx = self.index(row, col, k);
        self.data[idx] = value;
    }

    /// The `depth` values of flat cell `cell`.
    pub fn cell(&self, cell: usize) -> &[f64] {
        &self.data[cell * self.depth..(cell + 1) * self.depth]
    }

    /// Flat row-major data.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable flat row-major data.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Consume the field and return its flat data.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }
}
