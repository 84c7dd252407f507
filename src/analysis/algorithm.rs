use chrono::NaiveDateTime;

use crate::analysis::probability::SleepEstimator;
use crate::analysis::smoothing;
use crate::analysis::stationarity::{StillnessWindow, WINDOW_SIZE};
use crate::db::models::{SleepProbability, SoundSample};

/// What one analysis pass over a batch produced.
#[derive(Debug)]
pub enum AnalysisOutcome {
    /// Not enough samples to fill the lookback window and still analyze at
    /// least one more; nothing to do this run.
    InsufficientData,
    /// No checkpointed anchor and no sample history to derive one from;
    /// nothing to do this run.
    AnchorUnresolved,
    Completed(AnalysisRun),
}

/// The emitted series plus the resume state to checkpoint.
#[derive(Debug)]
pub struct AnalysisRun {
    pub series: Vec<SleepProbability>,
    pub last_row_id: i64,
    pub anchor_time: NaiveDateTime,
    pub last_probability: f64,
}

/// Runs the detector and the estimator over one batch. `samples` holds the
/// lookback window followed by the samples still unseen, ascending by id;
/// `checkpoint_anchor` is the persisted stillness anchor, when one survived.
///
/// The first `WINDOW_SIZE` samples only seed the window and the smoother;
/// every sample after them gets exactly one emitted probability.
pub fn analyze(
    samples: &[SoundSample],
    checkpoint_anchor: Option<NaiveDateTime>,
) -> AnalysisOutcome {
    if samples.len() <= WINDOW_SIZE {
        return AnalysisOutcome::InsufficientData;
    }

    let (seed, fresh) = samples.split_at(WINDOW_SIZE);

    // Without a surviving checkpoint anchor, stillness is counted from the
    // newest sample already consumed: the last of the lookback window.
    let Some(anchor_time) =
        checkpoint_anchor.or_else(|| seed.last().map(|sample| sample.recorded_at))
    else {
        return AnalysisOutcome::AnchorUnresolved;
    };

    let smoothed = smoothing::smooth(fresh, &seed[WINDOW_SIZE - 1]);
    let mut window = StillnessWindow::seed(seed);
    let mut estimator = SleepEstimator::new(anchor_time);

    let mut series = Vec::with_capacity(fresh.len());
    for (sample, smoothed_sample) in fresh.iter().zip(&smoothed) {
        let stationary = window.is_stationary(sample);
        let probability = estimator.observe(smoothed_sample.recorded_at, stationary);
        series.push(SleepProbability {
            recorded_at: smoothed_sample.recorded_at,
            probability,
        });
        window.push(sample.clone());
    }

    AnalysisOutcome::Completed(AnalysisRun {
        series,
        last_row_id: samples[samples.len() - 1].id,
        anchor_time: estimator.anchor_time(),
        last_probability: estimator.last_probability(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::probability::sleep_probability;
    use crate::db::helpers::parse_timestamp;
    use chrono::Duration;

    fn hourly_samples(amplitudes: &[f64]) -> Vec<SoundSample> {
        let base = parse_timestamp("2024-11-03 20:00:00.000", "test").unwrap();
        amplitudes
            .iter()
            .enumerate()
            .map(|(i, &amplitude)| SoundSample {
                id: i as i64 + 1,
                amplitude,
                recorded_at: base + Duration::hours(i as i64),
            })
            .collect()
    }

    fn completed(outcome: AnalysisOutcome) -> AnalysisRun {
        match outcome {
            AnalysisOutcome::Completed(run) => run,
            other => panic!("expected a completed run, got {other:?}"),
        }
    }

    #[test]
    fn five_or_fewer_samples_is_insufficient() {
        for count in [0, 1, 4, 5] {
            let samples = hourly_samples(&vec![100.0; count]);
            assert!(matches!(
                analyze(&samples, None),
                AnalysisOutcome::InsufficientData
            ));
        }
    }

    #[test]
    fn quiet_sixth_sample_reads_one_hour_of_stillness() {
        let samples = hourly_samples(&[100.0; 6]);
        let run = completed(analyze(&samples, None));

        assert_eq!(run.series.len(), 1);
        assert_eq!(run.series[0].recorded_at, samples[5].recorded_at);
        assert!((run.series[0].probability - sleep_probability(1.0)).abs() < 1e-12);
        assert_eq!(run.last_row_id, 6);
        assert_eq!(run.anchor_time, samples[4].recorded_at);
    }

    #[test]
    fn amplitude_jump_resets_the_anchor() {
        let samples = hourly_samples(&[100.0, 100.0, 100.0, 100.0, 100.0, 5100.0]);
        let run = completed(analyze(&samples, None));

        assert_eq!(run.series.len(), 1);
        assert_eq!(run.series[0].probability, 0.0);
        assert_eq!(run.anchor_time, samples[5].recorded_at);
        assert_eq!(run.last_probability, 0.0);
    }

    #[test]
    fn checkpoint_anchor_carries_accumulated_stillness() {
        let samples = hourly_samples(&[100.0; 6]);
        let anchor = samples[0].recorded_at;

        let run = completed(analyze(&samples, Some(anchor)));
        assert!((run.series[0].probability - sleep_probability(5.0)).abs() < 1e-12);
        assert_eq!(run.anchor_time, anchor);
    }

    #[test]
    fn every_post_window_sample_is_emitted() {
        let samples = hourly_samples(&[100.0; 9]);
        let run = completed(analyze(&samples, None));

        assert_eq!(run.series.len(), 4);
        assert_eq!(run.last_row_id, 9);
        // Uninterrupted stillness with a fixed anchor: non-decreasing curve.
        for pair in run.series.windows(2) {
            assert!(pair[0].probability <= pair[1].probability);
        }
        assert!((run.last_probability - run.series[3].probability).abs() < 1e-12);
    }

    #[test]
    fn probabilities_stay_within_bounds() {
        let samples = hourly_samples(&[
            100.0, 9000.0, 200.0, 7500.0, 100.0, 100.0, 20_000.0, 100.0, 100.0, 100.0,
        ]);
        let run = completed(analyze(&samples, None));

        assert_eq!(run.series.len(), 5);
        for point in &run.series {
            assert!((0.0..=1.0).contains(&point.probability));
        }
    }

    #[test]
    fn motion_in_the_fresh_batch_zeroes_that_sample() {
        // Samples 6 and 8 quiet, sample 7 loud against the whole window.
        let samples = hourly_samples(&[
            100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 8000.0, 8000.0,
        ]);
        let run = completed(analyze(&samples, None));

        assert_eq!(run.series.len(), 3);
        assert!(run.series[0].probability > 0.0);
        assert_eq!(run.series[1].probability, 0.0);
        // Sample 8 is still loud against the mostly-quiet window.
        assert_eq!(run.series[2].probability, 0.0);
        assert_eq!(run.anchor_time, samples[7].recorded_at);
    }
}
