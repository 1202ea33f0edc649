//! Tracking reward.
//!
//! The reward compares the applied coarse action against the stored
//! reference for the next sample: `reference − action` per cell. It does
//! not depend on the system outputs.

use nalgebra::DVector;

use crate::error::SynthesisError;

/// How per-cell tracking errors are reported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RewardMode {
    /// Mean over cells.
    #[default]
    Mean,
    /// One value per coarse cell.
    PerCell,
}

/// Reward for one step.
#[derive(Clone, Debug, PartialEq)]
pub enum Reward {
    /// Mean tracking error.
    Scalar(f64),
    /// Tracking error per coarse cell.
    PerCell(Vec<f64>),
}

impl Reward {
    /// Scalar summary: the value itself or the mean over cells.
    pub fn mean(&self) -> f64 {
        match self {
            Self::Scalar(v) => *v,
            Self::PerCell(v) if v.is_empty() => 0.0,
            Self::PerCell(v) => v.iter().sum::<f64>() / v.len() as f64,
        }
    }

    /// Whether every component is finite.
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Scalar(v) => v.is_finite(),
            Self::PerCell(v) => v.iter().all(|x| x.is_finite()),
        }
    }
}

/// `reference − action`, reduced according to `mode`.
pub fn tracking_reward(
    reference: &DVector<f64>,
    action: &DVector<f64>,
    mode: RewardMode,
) -> Result<Reward, SynthesisError> {
    if reference.len() != action.len() {
        return Err(SynthesisError::CellCount {
            expected: reference.len(),
            got: action.len(),
        });
    }
    let diff = reference - action;
    Ok(match mode {
        RewardMode::Mean => Reward::Scalar(diff.mean()),
        RewardMode::PerCell => Reward::PerCell(diff.iter().copied().collect()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_mode() {
        let r = DVector::from_vec(vec![1.0, 0.0, -1.0, 0.5]);
        let a = DVector::from_vec(vec![0.0, 0.0, 0.0, 0.5]);
        let reward = tracking_reward(&r, &a, RewardMode::Mean).unwrap();
        assert_eq!(reward, Reward::Scalar(0.0));
    }

    #[test]
    fn per_cell_mode() {
        let r = DVector::from_vec(vec![1.0, 0.25]);
        let a = DVector::from_vec(vec![0.5, 0.5]);
        let reward = tracking_reward(&r, &a, RewardMode::PerCell).unwrap();
        assert_eq!(reward, Reward::PerCell(vec![0.5, -0.25]));
        assert!((reward.mean() - 0.125).abs() < 1e-15);
        assert!(reward.is_finite());
    }

    #[test]
    fn length_mismatch() {
        let r = DVector::zeros(4);
        let a = DVector::zeros(3);
        assert_eq!(
            tracking_reward(&r, &a, RewardMode::Mean),
            Err(SynthesisError::CellCount {
                expected: 4,
                got: 3
            })
        );
    }

    #[test]
    fn default_is_mean() {
        assert_eq!(RewardMode::default(), RewardMode::Mean);
    }
}
