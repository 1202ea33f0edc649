//! Separable smoothing filters over [`FieldStack`] values.
//!
//! - [`gaussian_filter`]: Gaussian kernel truncated at 4σ, half-sample
//!   symmetric boundary ([`EdgeBehavior::Reflect`]). Spatial and depth
//!   axes take independent sigmas; σ = 0 leaves an axis untouched.
//! - [`box_blur`]: normalized moving average over a `window×window`
//!   neighbourhood with the anchor at `window / 2` and a whole-sample
//!   symmetric boundary ([`EdgeBehavior::Reflect101`]). Depth is untouched.

use crate::edge::EdgeBehavior;
use crate::error::SpaceError;
use crate::field::FieldStack;

/// Kernel radius is `floor(TRUNCATE * sigma + 0.5)`.
const TRUNCATE: f64 = 4.0;

/// Axis of a [`FieldStack`] a 1D kernel runs along.
#[derive(Clone, Copy)]
enum Axis {
    Row,
    Col,
    Depth,
}

/// A 1D correlation kernel with its offset range.
struct Kernel {
    /// Offset of `weights[0]` relative to the output sample.
    start: i64,
    weights: Vec<f64>,
}

impl Kernel {
    fn gaussian(sigma: f64) -> Self {
        let radius = (TRUNCATE * sigma + 0.5) as i64;
        let mut weights: Vec<f64> = (-radius..=radius)
            .map(|x| (-0.5 * (x * x) as f64 / (sigma * sigma)).exp())
            .collect();
        let total: f64 = weights.iter().sum();
        for w in &mut weights {
            *w /= total;
        }
        Self {
            start: -radius,
            weights,
        }
    }

    fn boxed(window: usize) -> Self {
        Self {
            start: -((window / 2) as i64),
            weights: vec![1.0 / window as f64; window],
        }
    }
}

/// Smooth `field` with a Gaussian of `sigma_spatial` along rows and
/// columns and `sigma_depth` along depth.
///
/// Negative or non-finite sigmas are treated as 0.
pub fn gaussian_filter(field: &FieldStack, sigma_spatial: f64, sigma_depth: f64) -> FieldStack {
    let mut out = field.clone();
    if sigma_spatial.is_finite() && sigma_spatial > 0.0 {
        let kernel = Kernel::gaussian(sigma_spatial);
        out = correlate(&out, &kernel, Axis::Row, EdgeBehavior::Reflect);
        out = correlate(&out, &kernel, Axis::Col, EdgeBehavior::Reflect);
    }
    if sigma_depth.is_finite() && sigma_depth > 0.0 {
        let kernel = Kernel::gaussian(sigma_depth);
        out = correlate(&out, &kernel, Axis::Depth, EdgeBehavior::Reflect);
    }
    out
}

/// Normalized `window×window` box blur over the spatial axes.
pub fn box_blur(field: &FieldStack, window: usize) -> Result<FieldStack, SpaceError> {
    if window == 0 {
        return Err(SpaceError::InvalidFactor);
    }
    let kernel = Kernel::boxed(window);
    let rows = correlate(field, &kernel, Axis::Row, EdgeBehavior::Reflect101);
    Ok(correlate(&rows, &kernel, Axis::Col, EdgeBehavior::Reflect101))
}

fn correlate(field: &FieldStack, kernel: &Kernel, axis: Axis, edge: EdgeBehavior) -> FieldStack {
    let side = field.side();
    let depth = field.depth();
    let len = match axis {
        Axis::Row | Axis::Col => side,
        Axis::Depth => depth,
    };
    let mut out = field.clone();
    for r in 0..side {
        for c in 0..side {
            for k in 0..depth {
                let pos = match axis {
                    Axis::Row => r,
                    Axis::Col => c,
                    Axis::Depth => k,
                } as i64;
                let mut acc = 0.0;
                for (j, w) in kernel.weights.iter().enumerate() {
                    let src = edge.resolve(pos + kernel.start + j as i64, len);
                    let v = match axis {
                        Axis::Row => field.get(src, c, k),
                        Axis::Col => field.get(r, src, k),
                        Axis::Depth => field.get(r, c, src),
                    };
                    acc += w * v;
                }
                out.set(r, c, k, acc);
            }
        }
    }
    out
}
