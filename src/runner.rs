use anyhow::{Context, Result};
use rusqlite::Connection;
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::analysis::{self, AnalysisOutcome};
use crate::db::models::{Checkpoint, StoredCheckpoint};
use crate::db::repositories::{checkpoint, probabilities, samples};
use crate::db::Database;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

/// How one scheduled invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// New samples were analyzed; the series grew and the watermark moved.
    Completed { emitted: usize, last_row_id: i64 },
    /// Fewer samples on hand than the lookback window plus one; nothing
    /// consumed, nothing persisted.
    InsufficientData,
    /// No stillness anchor could be established; nothing consumed, nothing
    /// persisted.
    AnchorUnresolved,
}

/// Entry point for the external scheduler. Takes no parameters; the
/// settings file is the reserved injection hook and currently defines no
/// analysis options.
pub async fn run_analysis(db: &Database) -> Result<RunOutcome> {
    db.execute(perform_run).await
}

/// One full read-compute-write cycle inside a single transaction: the
/// probability rows are staged before the checkpoint moves, and any store
/// failure rolls the whole run back so the next scheduled invocation
/// retries from the old watermark.
pub(crate) fn perform_run(conn: &mut Connection) -> Result<RunOutcome> {
    let tx = conn
        .transaction()
        .context("failed to open analysis transaction")?;

    let (resume_row, stored_anchor) = match checkpoint::load_checkpoint(&tx)? {
        StoredCheckpoint::Missing => (None, None),
        StoredCheckpoint::AnchorUnparsable { last_row_id, .. } => {
            log_warn!("checkpoint at row {last_row_id} lost its anchor, re-deriving from sample history");
            (Some(last_row_id), None)
        }
        StoredCheckpoint::Intact(checkpoint) => {
            (Some(checkpoint.last_row_id), Some(checkpoint.anchor_time))
        }
    };

    let batch = samples::load_from_lookback(&tx, resume_row)?;

    match analysis::analyze(&batch, stored_anchor) {
        AnalysisOutcome::InsufficientData => {
            log_info!(
                "not enough samples to analyze ({} on hand), skipping run",
                batch.len()
            );
            Ok(RunOutcome::InsufficientData)
        }
        AnalysisOutcome::AnchorUnresolved => {
            log_info!("no stillness anchor could be established, skipping run");
            Ok(RunOutcome::AnchorUnresolved)
        }
        AnalysisOutcome::Completed(run) => {
            probabilities::insert_probabilities(&tx, &run.series)?;
            checkpoint::save_checkpoint(
                &tx,
                &Checkpoint {
                    last_row_id: run.last_row_id,
                    anchor_time: run.anchor_time,
                    last_probability: run.last_probability,
                },
            )?;
            tx.commit().context("failed to commit analysis run")?;

            log_info!(
                "analyzed {} samples up to row {}",
                run.series.len(),
                run.last_row_id
            );
            Ok(RunOutcome::Completed {
                emitted: run.series.len(),
                last_row_id: run.last_row_id,
            })
        }
    }
}

/// Scheduling glue: ticks at the configured interval (first tick fires
/// immediately) and invokes the analysis until cancelled. A failed run is
/// logged and retried on the next tick.
pub async fn analysis_loop(db: Database, interval: Duration, cancel_token: CancellationToken) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match run_analysis(&db).await {
                    Ok(outcome) => log_info!("analysis run finished: {outcome:?}"),
                    Err(err) => log_error!("analysis run failed: {err:?}"),
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("analysis loop shutting down");
                break;
            }
        }
    }
}
