use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use sleepwatch::db::Database;
use sleepwatch::runner::{self, analysis_loop};
use sleepwatch::settings::SettingsStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("sleepwatch starting up...");

    let data_dir = std::env::var_os("SLEEPWATCH_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

    let settings = SettingsStore::new(data_dir.join("settings.json"))?;
    let database = Database::new(data_dir.join("sleepwatch.sqlite3"))?;

    if std::env::args().any(|arg| arg == "--once") {
        let outcome = runner::run_analysis(&database).await?;
        info!("analysis run finished: {outcome:?}");
        return Ok(());
    }

    let interval = Duration::from_secs(settings.analysis().run_interval_secs);
    let cancel_token = CancellationToken::new();
    let loop_task = tokio::spawn(analysis_loop(database, interval, cancel_token.clone()));

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("shutdown requested");
    cancel_token.cancel();
    loop_task.await.context("analysis loop task failed")?;

    Ok(())
}
