use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::db::helpers::format_timestamp;
use crate::db::models::SleepProbability;

/// Appends one row per series point. Runs inside the caller's transaction,
/// so the checkpoint can only advance together with a fully staged series.
pub fn insert_probabilities(conn: &Connection, series: &[SleepProbability]) -> Result<()> {
    let mut stmt = conn
        .prepare("INSERT INTO sleep_probabilities (recorded_at, probability) VALUES (?1, ?2)")
        .context("failed to prepare sleep probability insert")?;

    for point in series {
        stmt.execute(params![
            format_timestamp(&point.recorded_at),
            point.probability
        ])
        .context("failed to insert sleep probability row")?;
    }

    Ok(())
}
