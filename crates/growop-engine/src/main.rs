//! Headless runner for the growop simulation.
//!
//! Drives a game through simulated time with a fixed-step scheduler and a
//! scripted player, saving snapshots along the way.
//!
//! # Startup Sequence
//!
//! 1. Load configuration (first argument, else `growop.yaml`, else defaults)
//! 2. Initialize structured logging (tracing)
//! 3. Load the catalog (built-in or the configured YAML file)
//! 4. Resume from the snapshot file, or start a fresh game
//! 5. Run the scheduler and player until the simulated duration is spent
//! 6. Save and log the result

mod error;
mod player;
mod scheduler;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use growop_catalog::Catalog;
use growop_core::config::{LogFormat, LoggingConfig};
use growop_core::{Context, GameState, SimulationConfig, load_snapshot, save_snapshot};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::player::Autopilot;
use crate::scheduler::{Scheduler, Timer};

const DEFAULT_CONFIG: &str = "growop.yaml";

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG), PathBuf::from);
    let config = load_config(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    init_logging(&config.logging);
    info!(
        config = %config_path.display(),
        seed = config.run.seed,
        duration_ms = config.run.duration_ms,
        step_ms = config.run.step_ms,
        "growop-engine starting"
    );

    let catalog = config
        .catalog
        .as_deref()
        .map_or_else(|| Ok(Catalog::standard()), load_catalog)?;
    info!(
        strains = catalog.strains.len(),
        dealers = catalog.dealers.len(),
        research_nodes = catalog.research.len(),
        "catalog loaded"
    );

    let mut state = match &config.snapshot.path {
        Some(path) if path.exists() => resume(path, &catalog)?,
        _ => {
            let mut state = GameState::initial(&catalog);
            state.settings = config.settings.to_settings();
            state
        }
    };

    let mut rng = StdRng::seed_from_u64(config.run.seed);
    let mut scheduler = Scheduler::new(&config.run, &config.cadence)?;
    let mut saves = Timer::new(config.snapshot.interval_ms, config.run.step_ms, config.run.start_ms);
    let player = Autopilot::default();
    let end_ms = config.run.start_ms.saturating_add(config.run.duration_ms);

    info!(start = %sim_time(config.run.start_ms), end = %sim_time(end_ms), "entering tick loop");

    let mut now_ms = config.run.start_ms;
    let mut rejected: u64 = 0;
    while now_ms < end_ms {
        now_ms = now_ms.saturating_add(config.run.step_ms);
        let mut ctx = Context::new(&catalog, now_ms, &mut rng);
        let report = scheduler.step(&mut state, &mut ctx);
        if report.cured > 0 || report.infestations > 0 {
            info!(at = %sim_time(now_ms), ?report, "step");
        }
        let turn = player.play(&mut state, &mut ctx);
        rejected = rejected.saturating_add(u64::from(turn.rejected));

        if saves.due(now_ms) {
            save(config.snapshot.path.as_deref(), &state)?;
        }
    }
    save(config.snapshot.path.as_deref(), &state)?;

    info!(
        at = %sim_time(now_ms),
        nugs = state.nugs,
        buds = state.inventory.buds,
        harvests = state.stats.total_harvests,
        sold = state.stats.total_sold,
        revenue = state.stats.total_revenue,
        research_completed = state.research.completed.len(),
        rejected,
        "growop-engine finished"
    );
    Ok(())
}

/// Read the run configuration, falling back to defaults when the file
/// does not exist.
fn load_config(path: &Path) -> Result<SimulationConfig, EngineError> {
    if path.exists() {
        Ok(SimulationConfig::from_file(path)?)
    } else {
        Ok(SimulationConfig::default())
    }
}

fn load_catalog(path: &Path) -> anyhow::Result<Catalog> {
    let catalog = Catalog::from_file(path)
        .map_err(EngineError::from)
        .with_context(|| format!("loading catalog {}", path.display()))?;
    Ok(catalog)
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    match logging.format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn resume(path: &Path, catalog: &Catalog) -> anyhow::Result<GameState> {
    let json = std::fs::read_to_string(path).map_err(|source| EngineError::SaveFile {
        path: path.to_path_buf(),
        source,
    })?;
    let state = load_snapshot(&json, catalog)
        .map_err(EngineError::from)
        .with_context(|| format!("resuming from {}", path.display()))?;
    info!(path = %path.display(), nugs = state.nugs, slots = state.slots.len(), "snapshot loaded");
    Ok(state)
}

fn save(path: Option<&Path>, state: &GameState) -> Result<(), EngineError> {
    let Some(path) = path else {
        return Ok(());
    };
    let json = save_snapshot(state)?;
    std::fs::write(path, json).map_err(|source| EngineError::SaveFile {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "snapshot saved");
    Ok(())
}

/// Simulated clock reading as a calendar time.
fn sim_time(now_ms: u64) -> String {
    i64::try_from(now_ms)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map_or_else(
            || {
                warn!(now_ms, "simulated time out of calendar range");
                now_ms.to_string()
            },
            |t| t.to_rfc3339(),
        )
}
