use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::analysis::stationarity::WINDOW_SIZE;
use crate::db::helpers::parse_timestamp_or_now;
use crate::db::models::SoundSample;

/// Loads everything the analysis still has to look at, in ascending id
/// order: the unseen rows plus up to `WINDOW_SIZE` already-consumed rows in
/// front of them, so the stillness window and the smoother reseed from real
/// history instead of cold-starting every run.
pub fn load_from_lookback(conn: &Connection, resume: Option<i64>) -> Result<Vec<SoundSample>> {
    let start_id = match resume {
        Some(last_row_id) => lookback_start(conn, last_row_id)?,
        None => None,
    };

    let mut stmt = conn
        .prepare(
            "SELECT id, amplitude, recorded_at
             FROM sound_samples
             WHERE id >= ?1
             ORDER BY id ASC",
        )
        .context("failed to prepare sound sample scan")?;

    let rows = stmt.query_map(params![start_id.unwrap_or(i64::MIN)], |row| {
        let raw_time: String = row.get(2)?;
        Ok(SoundSample {
            id: row.get(0)?,
            amplitude: row.get(1)?,
            recorded_at: parse_timestamp_or_now(&raw_time, "sound_samples.recorded_at"),
        })
    })?;

    let mut samples = Vec::new();
    for row in rows {
        samples.push(row.context("failed to read sound sample row")?);
    }

    Ok(samples)
}

/// The id the scan should start from: the oldest of the `WINDOW_SIZE` most
/// recent rows at or before the watermark, or `None` when fewer than
/// `WINDOW_SIZE` rows precede it (the scan then covers the whole table).
fn lookback_start(conn: &Connection, last_row_id: i64) -> Result<Option<i64>> {
    let mut stmt = conn
        .prepare(
            "SELECT id FROM sound_samples
             WHERE id <= ?1
             ORDER BY id DESC
             LIMIT ?2",
        )
        .context("failed to prepare lookback query")?;

    let ids = stmt
        .query_map(params![last_row_id, WINDOW_SIZE as i64], |row| {
            row.get::<_, i64>(0)
        })?
        .collect::<rusqlite::Result<Vec<i64>>>()
        .context("failed to read lookback rows")?;

    if ids.len() == WINDOW_SIZE {
        Ok(ids.last().copied())
    } else {
        Ok(None)
    }
}
