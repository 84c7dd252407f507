use chrono::NaiveDateTime;

use crate::db::models::SoundSample;

/// Weight of the newest raw value in the exponential moving average.
pub const SMOOTHING_ALPHA: f64 = 0.1;

/// A sample's amplitude after smoothing. Timestamps pass through untouched;
/// the series exists only for the duration of a run.
#[derive(Debug, Clone)]
pub struct SmoothedSample {
    pub amplitude: f64,
    pub recorded_at: NaiveDateTime,
}

/// Exponential moving average over `samples`, seeded with `seed`'s raw
/// amplitude. The raw samples are left untouched. An empty input yields an
/// empty output; callers treat that as nothing to analyze, not a fault.
pub fn smooth(samples: &[SoundSample], seed: &SoundSample) -> Vec<SmoothedSample> {
    let mut previous = seed.amplitude;
    samples
        .iter()
        .map(|sample| {
            let amplitude =
                SMOOTHING_ALPHA * sample.amplitude + (1.0 - SMOOTHING_ALPHA) * previous;
            previous = amplitude;
            SmoothedSample {
                amplitude,
                recorded_at: sample.recorded_at,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::helpers::parse_timestamp;

    fn sample(id: i64, amplitude: f64, recorded_at: &str) -> SoundSample {
        SoundSample {
            id,
            amplitude,
            recorded_at: parse_timestamp(recorded_at, "test").unwrap(),
        }
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let seed = sample(1, 100.0, "2024-11-03 22:00:00.000");
        assert!(smooth(&[], &seed).is_empty());
    }

    #[test]
    fn first_value_blends_with_the_seed() {
        let seed = sample(1, 10.0, "2024-11-03 22:00:00.000");
        let smoothed = smooth(&[sample(2, 20.0, "2024-11-03 22:01:00.000")], &seed);

        assert_eq!(smoothed.len(), 1);
        assert!((smoothed[0].amplitude - 11.0).abs() < 1e-9);
    }

    #[test]
    fn chain_feeds_on_previous_smoothed_value() {
        let seed = sample(1, 10.0, "2024-11-03 22:00:00.000");
        let samples = [
            sample(2, 20.0, "2024-11-03 22:01:00.000"),
            sample(3, 20.0, "2024-11-03 22:02:00.000"),
        ];
        let smoothed = smooth(&samples, &seed);

        assert!((smoothed[0].amplitude - 11.0).abs() < 1e-9);
        assert!((smoothed[1].amplitude - 11.9).abs() < 1e-9);
    }

    #[test]
    fn constant_series_is_a_fixed_point() {
        let seed = sample(1, 100.0, "2024-11-03 22:00:00.000");
        let samples: Vec<SoundSample> = (2..6)
            .map(|i| sample(i, 100.0, "2024-11-03 22:05:00.000"))
            .collect();

        for point in smooth(&samples, &seed) {
            assert!((point.amplitude - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn timestamps_pass_through() {
        let seed = sample(1, 10.0, "2024-11-03 22:00:00.000");
        let samples = [sample(2, 500.0, "2024-11-03 22:01:00.250")];

        let smoothed = smooth(&samples, &seed);
        assert_eq!(smoothed[0].recorded_at, samples[0].recorded_at);
    }
}
