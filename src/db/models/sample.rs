//! Sound sample data model.
//!
//! One amplitude reading from the external recorder's append-only log.
//! The recorder owns these rows; this system only ever reads them.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundSample {
    pub id: i64,
    pub amplitude: f64,
    pub recorded_at: NaiveDateTime,
}
