use std::collections::VecDeque;

use crate::db::models::SoundSample;

/// Depth of the trailing sample window the stillness verdict looks at.
pub const WINDOW_SIZE: usize = 5;

/// Largest amplitude swing (raw recorder units) still counted as stillness.
pub const STILLNESS_THRESHOLD: f64 = 3000.0;

/// Trailing FIFO of the most recent raw samples. Verdicts compare raw
/// amplitudes only; the smoothed series never enters the window.
#[derive(Debug)]
pub struct StillnessWindow {
    samples: VecDeque<SoundSample>,
}

impl StillnessWindow {
    /// Seeds the window from the lookback samples preceding the first
    /// sample under analysis.
    pub fn seed(samples: &[SoundSample]) -> Self {
        Self {
            samples: samples.iter().cloned().collect(),
        }
    }

    /// True iff the sample's amplitude is within the stillness threshold of
    /// every sample currently held. Depends on window membership only, not
    /// on insertion order.
    pub fn is_stationary(&self, sample: &SoundSample) -> bool {
        self.samples
            .iter()
            .all(|held| (held.amplitude - sample.amplitude).abs() <= STILLNESS_THRESHOLD)
    }

    /// Advances the window past a classified sample: oldest out, newest in.
    pub fn push(&mut self, sample: SoundSample) {
        if self.samples.len() >= WINDOW_SIZE {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::helpers::parse_timestamp;

    fn sample(id: i64, amplitude: f64) -> SoundSample {
        SoundSample {
            id,
            amplitude,
            recorded_at: parse_timestamp("2024-11-03 22:00:00.000", "test").unwrap(),
        }
    }

    fn window_of(amplitudes: &[f64]) -> StillnessWindow {
        let samples: Vec<SoundSample> = amplitudes
            .iter()
            .enumerate()
            .map(|(i, &amplitude)| sample(i as i64 + 1, amplitude))
            .collect();
        StillnessWindow::seed(&samples)
    }

    #[test]
    fn within_threshold_of_every_member_is_stationary() {
        let window = window_of(&[100.0, 200.0, 150.0, 120.0, 180.0]);
        assert!(window.is_stationary(&sample(6, 1000.0)));
    }

    #[test]
    fn one_distant_member_breaks_stillness() {
        let window = window_of(&[100.0, 200.0, 150.0, 9000.0, 180.0]);
        assert!(!window.is_stationary(&sample(6, 100.0)));
    }

    #[test]
    fn threshold_is_inclusive() {
        let window = window_of(&[0.0, 0.0, 0.0, 0.0, 0.0]);
        assert!(window.is_stationary(&sample(6, 3000.0)));
        assert!(!window.is_stationary(&sample(6, 3000.1)));
    }

    #[test]
    fn verdict_ignores_insertion_order() {
        let amplitudes = [100.0, 4000.0, 150.0, 120.0, 180.0];
        let mut reversed = amplitudes;
        reversed.reverse();

        for probe in [0.0, 150.0, 3500.0, 6500.0] {
            assert_eq!(
                window_of(&amplitudes).is_stationary(&sample(6, probe)),
                window_of(&reversed).is_stationary(&sample(6, probe)),
            );
        }
    }

    #[test]
    fn push_evicts_the_oldest_member() {
        let mut window = window_of(&[9000.0, 100.0, 100.0, 100.0, 100.0]);
        assert!(!window.is_stationary(&sample(6, 100.0)));

        // One push drops the outlier seeded first.
        window.push(sample(6, 100.0));
        assert!(window.is_stationary(&sample(7, 100.0)));
    }
}
