//! Statistics updated by the executor after every step.

use crate::metrics::StepTimingStatistics;

/// Per-simulation statistics.
///
/// The executor only ever calls [`update`](Self::update), once after each
/// successful step. Domain counts (alive cells, fish, ants) are written by
/// the step logic itself.
pub trait SimulationStatistics {
    /// Record the new step count and cumulative timing.
    fn update(&mut self, step_count: u64, timing: &StepTimingStatistics);

    /// Steps completed so far.
    fn step_count(&self) -> u64;

    /// Timing as of the last update.
    fn timing(&self) -> &StepTimingStatistics;
}

/// Statistics with no domain counts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BasicStatistics {
    /// Number of cells in the grid.
    pub total_cells: usize,
    step_count: u64,
    timing: StepTimingStatistics,
}

impl BasicStatistics {
    /// Fresh statistics for a grid of `total_cells` cells.
    pub fn new(total_cells: usize) -> Self {
        Self {
            total_cells,
            ..Self::default()
        }
    }
}

impl SimulationStatistics for BasicStatistics {
    fn update(&mut self, step_count: u64, timing: &StepTimingStatistics) {
        self.step_count = step_count;
        self.timing = *timing;
    }

    fn step_count(&self) -> u64 {
        self.step_count
    }

    fn timing(&self) -> &StepTimingStatistics {
        &self.timing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_copies_timing() {
        let mut s = BasicStatistics::new(200);
        let mut t = StepTimingStatistics::default();
        t.record(12);
        s.update(1, &t);
        assert_eq!(s.step_count(), 1);
        assert_eq!(s.timing().current_us, 12);
        assert_eq!(s.total_cells, 200);
    }
}
