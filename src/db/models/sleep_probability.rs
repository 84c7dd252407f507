use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One point of the emitted sleep-probability series. Appended once per
/// analyzed sample, never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SleepProbability {
    pub recorded_at: NaiveDateTime,
    pub probability: f64,
}
