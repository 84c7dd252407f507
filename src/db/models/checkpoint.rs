use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Resume state persisted between runs: the watermark of the last consumed
/// sample row, the start of the currently tracked stillness period, and the
/// probability emitted last. One logical row, overwritten in place at the
/// end of every successful run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub last_row_id: i64,
    pub anchor_time: NaiveDateTime,
    pub last_probability: f64,
}

/// What the checkpoint table actually held at load time.
///
/// A row whose anchor column is empty or fails the storage format still
/// carries a usable watermark; resumption must not restart from row one just
/// because the anchor was lost.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredCheckpoint {
    Missing,
    AnchorUnparsable { last_row_id: i64, last_probability: f64 },
    Intact(Checkpoint),
}
