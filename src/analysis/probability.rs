use chrono::NaiveDateTime;

/// Steepness of the logistic curve mapping stillness hours to probability.
const LOGISTIC_STEEPNESS: f64 = 2.0;

/// Hours of uninterrupted stillness at which the curve crosses 0.5.
const LOGISTIC_MIDPOINT_HOURS: f64 = 3.0;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Bounded S-curve: near zero for brief stillness (ordinary quiet
/// wakefulness), approaching one only after several uninterrupted hours.
pub fn sleep_probability(elapsed_hours: f64) -> f64 {
    let raw = 1.0
        / (1.0 + (-LOGISTIC_STEEPNESS * (elapsed_hours - LOGISTIC_MIDPOINT_HOURS)).exp());
    raw.min(1.0)
}

/// Tracks the start of the current stillness run and converts elapsed
/// stillness into a probability. Only the anchor survives between runs;
/// anchor plus each fresh verdict fully reconstruct the behavior, so no
/// mode flag is kept.
#[derive(Debug)]
pub struct SleepEstimator {
    anchor_time: NaiveDateTime,
    probability: f64,
}

impl SleepEstimator {
    pub fn new(anchor_time: NaiveDateTime) -> Self {
        Self {
            anchor_time,
            probability: 0.0,
        }
    }

    /// Feeds one stationarity verdict through the estimator and returns the
    /// probability to emit for the sample observed at `recorded_at`.
    pub fn observe(&mut self, recorded_at: NaiveDateTime, stationary: bool) -> f64 {
        if stationary {
            let elapsed_hours =
                (recorded_at - self.anchor_time).num_milliseconds() as f64 / MILLIS_PER_HOUR;
            self.probability = sleep_probability(elapsed_hours);
        } else {
            // Motion: the stillness run restarts at this sample.
            self.probability = 0.0;
            self.anchor_time = recorded_at;
        }
        self.probability
    }

    pub fn anchor_time(&self) -> NaiveDateTime {
        self.anchor_time
    }

    pub fn last_probability(&self) -> f64 {
        self.probability
    }
}
