//! Summing-junction interconnection of SISO blocks.
//!
//! Every block input is the sum of the external input routed to it (if
//! any) and the outputs of the blocks wired into it:
//!
//! ```text
//! u = E·u_ext + K·y        y = C·x + D·u
//! ```
//!
//! Direct feedthrough around a loop is solved exactly with
//! `M = (I − D K)⁻¹`, so the interconnection collapses into one
//! realization:
//!
//! ```text
//! A' = A + B K M C         B' = (B + B K M D) E
//! C' = F M C               D' = F M D E
//! ```
//!
//! where `E` routes external inputs to blocks and `F` selects the blocks
//! read as external outputs.

use crate::error::LtiError;
use crate::state_space::StateSpace;
use nalgebra::DMatrix;
use smallvec::SmallVec;

/// One summing junction: block `dest`'s input receives the sum of the
/// outputs of every block in `sources`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Wire {
    /// Block whose input is driven.
    pub dest: usize,
    /// Blocks whose outputs are summed into `dest`.
    pub sources: SmallVec<[usize; 4]>,
}

impl Wire {
    /// Wire a single source into `dest`.
    pub fn single(dest: usize, source: usize) -> Self {
        let mut sources = SmallVec::new();
        sources.push(source);
        Self { dest, sources }
    }
}

fn check_block(block: usize, count: usize) -> Result<usize, LtiError> {
    if block >= count {
        return Err(LtiError::UnknownBlock { block });
    }
    Ok(block)
}

/// Collapse `blocks` wired by `wires` into one realization.
///
/// External input `j` is added to the input of block `inputs[j]`;
/// external output `j` reads the output of block `outputs[j]`.
pub fn interconnect(
    blocks: &[StateSpace],
    wires: &[Wire],
    inputs: &[usize],
    outputs: &[usize],
) -> Result<StateSpace, LtiError> {
    let nb = blocks.len();
    for (i, blk) in blocks.iter().enumerate() {
        if !blk.is_siso() {
            return Err(LtiError::NotSiso { block: i });
        }
    }

    let offsets: Vec<usize> = blocks
        .iter()
        .scan(0, |acc, blk| {
            let start = *acc;
            *acc += blk.nstates();
            Some(start)
        })
        .collect();
    let ns: usize = blocks.iter().map(StateSpace::nstates).sum();

    let mut a = DMatrix::zeros(ns, ns);
    let mut b = DMatrix::zeros(ns, nb);
    let mut c = DMatrix::zeros(nb, ns);
    let mut d = DMatrix::zeros(nb, nb);
    for (i, blk) in blocks.iter().enumerate() {
        d[(i, i)] = blk.d()[(0, 0)];
        let n = blk.nstates();
        if n == 0 {
            continue;
        }
        let o = offsets[i];
        a.view_mut((o, o), (n, n)).copy_from(blk.a());
        b.view_mut((o, i), (n, 1)).copy_from(blk.b());
        c.view_mut((i, o), (1, n)).copy_from(blk.c());
    }

    let mut k = DMatrix::zeros(nb, nb);
    for wire in wires {
        let dest = check_block(wire.dest, nb)?;
        for &src in &wire.sources {
            k[(dest, check_block(src, nb)?)] += 1.0;
        }
    }

    let mut e = DMatrix::zeros(nb, inputs.len());
    for (j, &blk) in inputs.iter().enumerate() {
        e[(check_block(blk, nb)?, j)] = 1.0;
    }
    let mut f = DMatrix::zeros(outputs.len(), nb);
    for (j, &blk) in outputs.iter().enumerate() {
        f[(j, check_block(blk, nb)?)] = 1.0;
    }

    let loop_gain = DMatrix::identity(nb, nb) - &d * &k;
    let m = loop_gain.try_inverse().ok_or(LtiError::AlgebraicLoop)?;

    let bk = &b * &k;
    let mc = &m * &c;
    let md = &m * &d;
    let a_cl = &a + &bk * &mc;
    let b_cl = (&b + &bk * &md) * &e;
    let c_cl = &f * &mc;
    let d_cl = &f * &md * &e;

    let sys = StateSpace::new(a_cl, b_cl, c_cl, d_cl)?;
    if !sys.is_finite() {
        return Err(LtiError::NonFinite {
            what: "interconnected system",
        });
    }
    Ok(sys)
}
