//! Per-step timing and per-instance counters.
//!
//! [`StepMetrics`] captures the cost of the most recent `reset` or `step`
//! plus cumulative counters for the environment instance.

/// Timing of one call plus cumulative counters.
///
/// All durations are in microseconds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepMetrics {
    /// Wall-clock time for the whole call.
    pub total_us: u64,
    /// Time spent in the LTI solve (discretization included on reset).
    pub solve_us: u64,
    /// Time spent resizing actions and assembling the observation.
    pub resample_us: u64,
    /// Time spent synthesizing the system and reference (reset only).
    pub synthesis_us: u64,
    /// Cumulative number of successful resets.
    pub episodes_started: u64,
    /// Cumulative number of episodes that reached their terminal step.
    pub episodes_completed: u64,
    /// Cumulative number of successful steps.
    pub steps_total: u64,
    /// Cumulative number of calls rejected as usage errors.
    pub usage_errors: u64,
}

impl StepMetrics {
    /// Reset per-call timings, keeping the cumulative counters.
    pub(crate) fn begin_call(&mut self) {
        self.total_us = 0;
        self.solve_us = 0;
        self.resample_us = 0;
        self.synthesis_us = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = StepMetrics::default();
        assert_eq!(m.total_us, 0);
        assert_eq!(m.solve_us, 0);
        assert_eq!(m.resample_us, 0);
        assert_eq!(m.synthesis_us, 0);
        assert_eq!(m.episodes_started, 0);
        assert_eq!(m.episodes_completed, 0);
        assert_eq!(m.steps_total, 0);
        assert_eq!(m.usage_errors, 0);
    }

    #[test]
    fn begin_call_keeps_counters() {
        let mut m = StepMetrics {
            total_us: 100,
            solve_us: 40,
            resample_us: 20,
            synthesis_us: 30,
            episodes_started: 2,
            episodes_completed: 1,
            steps_total: 300,
            usage_errors: 1,
        };
        m.begin_call();
        assert_eq!(m.total_us, 0);
        assert_eq!(m.solve_us, 0);
        assert_eq!(m.episodes_started, 2);
        assert_eq!(m.steps_total, 300);
        assert_eq!(m.usage_errors, 1);
    }
}
