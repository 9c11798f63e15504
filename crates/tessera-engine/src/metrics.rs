//! Per-step timing metrics.
//!
//! [`StepTimingStatistics`] accumulates wall-clock step durations so that
//! executors and statistics consumers can report current, extreme and
//! average step cost.

/// Step durations, in microseconds.
///
/// The executor records one sample after every successful step. All
/// fields are zero until the first sample.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepTimingStatistics {
    /// Duration of the most recent step.
    pub current_us: u64,
    /// Shortest step so far.
    pub min_us: u64,
    /// Longest step so far.
    pub max_us: u64,
    /// Sum of all step durations.
    pub sum_us: u64,
    /// Integer average of all step durations.
    pub avg_us: u64,
    /// Number of recorded steps.
    pub samples: u64,
}

impl StepTimingStatistics {
    /// Record one step of `us` microseconds.
    pub fn record(&mut self, us: u64) {
        self.current_us = us;
        self.min_us = if self.samples == 0 { us } else { self.min_us.min(us) };
        self.max_us = self.max_us.max(us);
        self.sum_us = self.sum_us.saturating_add(us);
        self.samples += 1;
        self.avg_us = self.sum_us / self.samples;
    }

    /// Forget all samples.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_timing_is_zero() {
        let t = StepTimingStatistics::default();
        assert_eq!(t.current_us, 0);
        assert_eq!(t.min_us, 0);
        assert_eq!(t.max_us, 0);
        assert_eq!(t.avg_us, 0);
        assert_eq!(t.samples, 0);
    }

    #[test]
    fn record_tracks_extremes_and_average() {
        let mut t = StepTimingStatistics::default();
        for us in [40, 10, 70] {
            t.record(us);
        }
        assert_eq!(t.current_us, 70);
        assert_eq!(t.min_us, 10);
        assert_eq!(t.max_us, 70);
        assert_eq!(t.sum_us, 120);
        assert_eq!(t.avg_us, 40);
        assert_eq!(t.samples, 3);
        t.reset();
        assert_eq!(t, StepTimingStatistics::default());
    }

    #[test]
    fn first_sample_sets_min() {
        let mut t = StepTimingStatistics::default();
        t.record(500);
        assert_eq!(t.min_us, 500);
    }

    proptest! {
        #[test]
        fn average_lies_between_extremes(samples in prop::collection::vec(0u64..1_000_000, 1..50)) {
            let mut t = StepTimingStatistics::default();
            for &us in &samples {
                t.record(us);
            }
            prop_assert!(t.min_us <= t.avg_us && t.avg_us <= t.max_us);
            prop_assert_eq!(t.samples, samples.len() as u64);
            prop_assert_eq!(t.min_us, *samples.iter().min().unwrap());
        }
    }
}
