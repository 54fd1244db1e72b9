//! fleet-simulator: drives synthetic drivers over a real map and reports
//! their positions to a location-ingestion service.
//!
//! ```text
//! fleet-simulator [SETTINGS] [--interval-secs N] [--max-parallel N] ...
//!
//! SETTINGS / FLEET_CONFIG   JSON settings file
//! --drivers / FLEET_DRIVERS registered-user JSON  (default random_users.json)
//! --map / FLEET_MAP         Overpass node JSON    (default map_data.json)
//! --<key> / FLEET_<KEY>     any SimConfig key, e.g. FLEET_INTERVAL_SECS=2
//! RUST_LOG                  log filter            (default info)
//! ```
//!
//! Missing or empty input files abort start-up.  Bad settings fall back to
//! their defaults with a warning.  Ctrl-C lets the current tick finish and
//! then stops.

mod settings;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use fleet_agent::load_roster_path;
use fleet_ingest::HttpIngestClient;
use fleet_sim::{LogObserver, SchedulerBuilder, shutdown};
use fleet_spatial::overpass;

use settings::{Args, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // 1. Settings.
    let args = Args::parse();
    let Settings { config, warnings, file_problem, drivers_path, map_path } = Settings::load(&args);

    if let Some(problem) = file_problem {
        tracing::warn!("{problem}; using environment and defaults");
    }
    for w in &warnings {
        tracing::warn!(key = w.key(), "{w}");
    }

    // 2. Inputs.  Both are fatal if missing.
    let dataset = overpass::load_from_path(&map_path)
        .with_context(|| format!("loading map nodes from {}", map_path.display()))?;
    let roster = load_roster_path(&drivers_path)
        .with_context(|| format!("loading drivers from {}", drivers_path.display()))?;
    tracing::info!(
        nodes = dataset.len(),
        operators = roster.len(),
        "inputs loaded"
    );

    // 3. Scheduler.
    let run_span = tracing::info_span!("fleet", city = %config.city);
    let client = HttpIngestClient::from_config(&config, run_span.clone())
        .context("building ingestion client")?;
    let summary_every = config.summary_every_ticks;

    tracing::info!(
        interval_secs = config.interval_secs,
        max_parallel = config.max_parallel,
        agent_count = config.agent_count,
        endpoint = %config.endpoint,
        "starting simulation"
    );

    let mut scheduler = SchedulerBuilder::new(config, dataset, Arc::new(client))
        .roster(roster)
        .build()?;
    tracing::info!(seed = scheduler.seed(), agents = scheduler.agents().len(), "agents placed");

    // 4. Ctrl-C → cooperative stop.
    let (trigger, mut stop) = shutdown::channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received; finishing the current tick");
            trigger.trigger();
        }
    });

    // 5. Run.
    let mut observer = LogObserver::new(run_span, summary_every);
    let totals = scheduler.run(&mut stop, &mut observer).await?;
    scheduler.close().await;

    println!(
        "ticks: {}  delivered: {}  failed: {}  skipped: {}  teleports: {}",
        totals.ticks, totals.delivered, totals.failed, totals.skipped, totals.teleports,
    );
    Ok(())
}
