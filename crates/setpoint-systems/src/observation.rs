//! Conversion between agent-facing fine arrays and coarse simulation data.

use nalgebra::{DMatrix, DVector};
use setpoint_core::Resolution;
use setpoint_lti::LtiError;
use setpoint_space::{downsample, upsample, FieldStack};

use crate::error::SynthesisError;

/// Channels per observed cell: last action and three output samples.
pub const OBS_CHANNELS: usize = 4;

/// Output samples per observation (current window of the look-ahead solve).
pub const OUTPUT_SAMPLES: usize = OBS_CHANNELS - 1;

/// A fine-resolution `side×side×channels` observation, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    side: usize,
    channels: usize,
    data: Vec<f32>,
}

impl Observation {
    /// Grid side.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Values per cell.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// `(side, side, channels)`.
    pub fn shape(&self) -> [usize; 3] {
        [self.side, self.side, self.channels]
    }

    /// Value at `(row, col, channel)`.
    pub fn get(&self, row: usize, col: usize, channel: usize) -> f32 {
        self.data[(row * self.side + col) * self.channels + channel]
    }

    /// Flat row-major view.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Consume into the flat buffer.
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Whether every value is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }
}

/// Resize a fine `n×n` action to one value per coarse cell.
pub fn coarse_action(resolution: &Resolution, action: &[f32]) -> Result<DVector<f64>, SynthesisError> {
    let side = resolution.fine_side();
    if action.len() != resolution.fine_cells() {
        return Err(SynthesisError::CellCount {
            expected: resolution.fine_cells(),
            got: action.len(),
        });
    }
    let fine = FieldStack::from_vec(side, 1, action.iter().map(|&v| f64::from(v)).collect())?;
    let coarse = downsample(&fine, resolution.factor() as usize)?;
    Ok(DVector::from_vec(coarse.into_vec()))
}

/// Build the observation `[action, y₀, y₁, y₂]` per coarse cell and
/// block-replicate it to the fine grid.
///
/// `outputs` is `Nc × 3`, one column per output sample.
pub fn assemble(
    resolution: &Resolution,
    action: &DVector<f64>,
    outputs: &DMatrix<f64>,
) -> Result<Observation, SynthesisError> {
    let cells = resolution.coarse_cells();
    if action.len() != cells {
        return Err(SynthesisError::CellCount {
            expected: cells,
            got: action.len(),
        });
    }
    if outputs.shape() != (cells, OUTPUT_SAMPLES) {
        return Err(LtiError::ShapeMismatch {
            what: "observed outputs",
            expected: (cells, OUTPUT_SAMPLES),
            got: outputs.shape(),
        }
        .into());
    }

    let coarse = FieldStack::from_fn(resolution.coarse_side(), OBS_CHANNELS, |r, c, k| {
        let cell = r * resolution.coarse_side() + c;
        match k {
            0 => action[cell],
            _ => outputs[(cell, k - 1)],
        }
    })?;
    let fine = upsample(&coarse, resolution.factor() as usize)?;
    Ok(Observation {
        side: fine.side(),
        channels: OBS_CHANNELS,
        data: fine.as_slice().iter().map(|&v| v as f32).collect(),
    })
}

/// Block-replicate a coarse trajectory (`Nc × T`) to the fine grid and
/// return it time-major (`T × N`).
pub fn upsample_trajectory(
    resolution: &Resolution,
    coarse: &DMatrix<f64>,
) -> Result<DMatrix<f64>, SynthesisError> {
    let steps = coarse.ncols();
    let side = resolution.coarse_side();
    let field = FieldStack::from_fn(side, steps, |r, c, k| coarse[(r * side + c, k)])?;
    Ok(fine_time_major(&upsample(&field, resolution.factor() as usize)?))
}

/// Flatten an `n×n×T` field into a time-major `T × N` matrix.
pub fn fine_time_major(field: &FieldStack) -> DMatrix<f64> {
    // Row-major (cell, k) storage is the column-major layout of `k × cell`.
    DMatrix::from_column_slice(field.depth(), field.cell_count(), field.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn res() -> Resolution {
        Resolution::new(16, 2).unwrap()
    }

    #[test]
    fn constant_action_resizes_to_constant() {
        let action = vec![0.25f32; 256];
        let a = coarse_action(&res(), &action).unwrap();
        assert_eq!(a.len(), 16);
        assert!(a.iter().all(|&v| v == 0.25));
    }

    #[test]
    fn action_length_is_checked() {
        assert_eq!(
            coarse_action(&res(), &[0.0; 10]),
            Err(SynthesisError::CellCount {
                expected: 256,
                got: 10
            })
        );
    }

    #[test]
    fn observation_is_block_replicated() {
        let action = DVector::from_fn(16, |i, _| i as f64);
        let outputs = DMatrix::from_fn(16, 3, |i, k| (10 * (k + 1) + i) as f64);
        let obs = assemble(&res(), &action, &outputs).unwrap();
        assert_eq!(obs.shape(), [16, 16, 4]);
        // Fine (5, 9) lies in coarse (1, 2) = cell 6.
        assert_eq!(obs.get(5, 9, 0), 6.0);
        assert_eq!(obs.get(5, 9, 1), 16.0);
        assert_eq!(obs.get(5, 9, 3), 36.0);
        assert!(obs.is_finite());
    }

    #[test]
    fn trajectory_is_time_major() {
        let coarse = DMatrix::from_fn(16, 5, |cell, k| (cell * 100 + k) as f64);
        let fine = upsample_trajectory(&res(), &coarse).unwrap();
        assert_eq!(fine.shape(), (5, 256));
        // Fine cell (5, 9) = 89 maps to coarse cell 6.
        assert_eq!(fine[(3, 5 * 16 + 9)], 603.0);
    }
}
