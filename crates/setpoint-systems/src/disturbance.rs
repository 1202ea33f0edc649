//! Exogenous reference field for one episode.
//!
//! A uniform `nc×nc×T` field is block-replicated to the fine grid,
//! optionally smoothed in space, and brought back to the coarse grid with
//! the antialiased resize. The coarse result is the `Nc×T` input matrix the
//! system is driven with and the target the agent tracks.

use nalgebra::{DMatrix, DVector};
use rand::Rng;
use setpoint_core::Resolution;
use setpoint_space::{downsample, gaussian_filter, upsample, FieldStack};

use crate::error::SynthesisError;

/// The per-episode reference input.
#[derive(Clone, Debug)]
pub struct Disturbance {
    reference: DMatrix<f64>,
    reference_fine: FieldStack,
    smoothed: bool,
}

impl Disturbance {
    /// Draw a reference of `steps` samples.
    ///
    /// With probability one half the fine field is smoothed with a spatial
    /// Gaussian of width `spatial_sigma` (no smoothing along time).
    pub fn generate<R: Rng + ?Sized>(
        resolution: &Resolution,
        steps: usize,
        spatial_sigma: f64,
        rng: &mut R,
    ) -> Result<Self, SynthesisError> {
        let side = resolution.coarse_side();
        let factor = resolution.factor() as usize;
        let raw = FieldStack::from_fn(side, steps, |_, _, _| 2.0 * rng.random::<f64>() - 1.0)?;
        let reference_fine = upsample(&raw, factor)?;

        let smoothed = rng.random_bool(0.5);
        let coarse = if smoothed {
            downsample(&gaussian_filter(&reference_fine, spatial_sigma, 0.0), factor)?
        } else {
            downsample(&reference_fine, factor)?
        };
        let reference = DMatrix::from_row_slice(coarse.cell_count(), steps, coarse.as_slice());
        Ok(Self {
            reference,
            reference_fine,
            smoothed,
        })
    }

    /// Coarse reference, `Nc × T`.
    pub fn reference(&self) -> &DMatrix<f64> {
        &self.reference
    }

    /// Reference column `k` (one value per coarse cell).
    pub fn sample(&self, k: usize) -> DVector<f64> {
        self.reference.column(k).into_owned()
    }

    /// Columns `start..start+len` of the reference.
    pub fn window(&self, start: usize, len: usize) -> DMatrix<f64> {
        self.reference.columns(start, len).into_owned()
    }

    /// The fine field before smoothing, `n×n×T`.
    pub fn reference_fine(&self) -> &FieldStack {
        &self.reference_fine
    }

    /// Whether spatial smoothing was applied.
    pub fn is_smoothed(&self) -> bool {
        self.smoothed
    }

    /// Number of time samples.
    pub fn horizon(&self) -> usize {
        self.reference.ncols()
    }
}
