use anyhow::{Context, Result};
use log::warn;
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::helpers::{format_timestamp, parse_timestamp};
use crate::db::models::{Checkpoint, StoredCheckpoint};

const CHECKPOINT_ROW_ID: i64 = 1;

/// Reads the singleton resume row. A present row with an empty or
/// unparsable anchor still yields its watermark; the caller re-derives the
/// anchor from sample history instead of restarting the scan.
pub fn load_checkpoint(conn: &Connection) -> Result<StoredCheckpoint> {
    let row = conn
        .query_row(
            "SELECT last_row_id, anchor_time, last_probability
             FROM analysis_checkpoint
             WHERE id = ?1",
            params![CHECKPOINT_ROW_ID],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, f64>(2)?,
                ))
            },
        )
        .optional()
        .context("failed to query analysis checkpoint")?;

    let Some((last_row_id, raw_anchor, last_probability)) = row else {
        return Ok(StoredCheckpoint::Missing);
    };

    if raw_anchor.is_empty() {
        return Ok(StoredCheckpoint::AnchorUnparsable {
            last_row_id,
            last_probability,
        });
    }

    match parse_timestamp(&raw_anchor, "analysis_checkpoint.anchor_time") {
        Ok(anchor_time) => Ok(StoredCheckpoint::Intact(Checkpoint {
            last_row_id,
            anchor_time,
            last_probability,
        })),
        Err(err) => {
            warn!("stored anchor is unusable, re-deriving from sample history: {err:#}");
            Ok(StoredCheckpoint::AnchorUnparsable {
                last_row_id,
                last_probability,
            })
        }
    }
}

/// Upsert: the table holds at most one row, probed and then updated or
/// inserted.
pub fn save_checkpoint(conn: &Connection, checkpoint: &Checkpoint) -> Result<()> {
    let exists = conn
        .query_row(
            "SELECT id FROM analysis_checkpoint WHERE id = ?1",
            params![CHECKPOINT_ROW_ID],
            |row| row.get::<_, i64>(0),
        )
        .optional()
        .context("failed to probe analysis checkpoint")?
        .is_some();

    let anchor = format_timestamp(&checkpoint.anchor_time);
    if exists {
        conn.execute(
            "UPDATE analysis_checkpoint
             SET last_row_id = ?1, anchor_time = ?2, last_probability = ?3
             WHERE id = ?4",
            params![
                checkpoint.last_row_id,
                anchor,
                checkpoint.last_probability,
                CHECKPOINT_ROW_ID
            ],
        )
        .context("failed to update analysis checkpoint")?;
    } else {
        conn.execute(
            "INSERT INTO analysis_checkpoint (id, last_row_id, anchor_time, last_probability)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                CHECKPOINT_ROW_ID,
                checkpoint.last_row_id,
                anchor,
                checkpoint.last_probability
            ],
        )
        .context("failed to insert analysis checkpoint")?;
    }

    Ok(())
}
