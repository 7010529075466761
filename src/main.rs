//! Traffic router host.
//!
//! # Architecture Overview
//!
//! ```text
//!   property files ──┐                        ┌─────────────────────────────┐
//!   inline props   ──┼─▶ PropertySources ────▶│ PropertyRouteRepository     │
//!                    │                        │  (rule cache, per-queue)    │
//!   file watcher ────┼─▶ RefreshScheduler ───▶│  refresh() on tick/change   │
//!                    │                        └──────────────┬──────────────┘
//!                    │                                       │ find_matching
//!                    │                                       ▼
//!                    │                        ┌─────────────────────────────┐
//!   admin client ────┴─▶ inspection endpoint ▶│ TaskQueueNamer + strategies │
//!                                             └─────────────────────────────┘
//! ```
//!
//! The config path is the first argument, else `TRAFFIC_ROUTER_CONFIG`, else
//! built-in defaults are used.

use std::path::PathBuf;
use std::time::Duration;

use tokio::net::TcpListener;

use traffic_routing::admin::{self, AdminState};
use traffic_routing::bootstrap;
use traffic_routing::config::{load_config, PropertyFileWatcher, RouterConfig};
use traffic_routing::lifecycle::{wait_for_shutdown_signal, Shutdown};
use traffic_routing::observability;
use traffic_routing::refresh::RefreshScheduler;

const CONFIG_ENV: &str = "TRAFFIC_ROUTER_CONFIG";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_ENV).ok())
        .map(PathBuf::from);

    let config = match &config_path {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };

    observability::logging::init(&config.observability.log_level);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?config_path,
        "traffic-router starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => observability::metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let engine = bootstrap::build(&config)?;

    if !bootstrap::routing_enabled(&engine.sources, &config.routing.key_prefix) {
        tracing::info!(
            key = %format!("{}.enabled", config.routing.key_prefix),
            "Traffic routing disabled"
        );
        return Ok(());
    }

    tracing::info!(
        key_prefix = %config.routing.key_prefix,
        refresh_interval_secs = config.routing.refresh_interval_secs,
        namer = engine.namer.variant(),
        sources = engine.sources.len(),
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();

    // Dropping the watcher stops notifications, so it lives until exit.
    let (_watcher, changes) = if config.routing.watch_files && !engine.watched_files.is_empty() {
        let (watcher, changes) = PropertyFileWatcher::new(engine.watched_files.clone());
        match watcher.run() {
            Ok(watcher) => (Some(watcher), changes),
            Err(e) => {
                tracing::error!(error = %e, "Failed to watch property files, relying on periodic refresh");
                (None, changes)
            }
        }
    } else {
        (None, PropertyFileWatcher::new(Vec::new()).1)
    };

    let scheduler = RefreshScheduler::new(
        engine.repository.clone(),
        Duration::from_secs(config.routing.refresh_interval_secs),
    )
    .spawn(changes, shutdown.subscribe());

    let admin_task = if config.admin.enabled {
        let listener = TcpListener::bind(&config.admin.bind_address).await?;
        let state = AdminState {
            repository: engine.repository.clone(),
            namer: engine.namer.clone(),
            api_key: config.admin.api_key.as_deref().map(Into::into),
        };
        Some(tokio::spawn(admin::serve(listener, state, shutdown.subscribe())))
    } else {
        None
    };

    wait_for_shutdown_signal().await;
    shutdown.trigger();

    if let Err(e) = scheduler.await {
        tracing::error!(error = %e, "Refresh scheduler task failed");
    }
    if let Some(task) = admin_task {
        match task.await {
            Ok(Err(e)) => tracing::error!(error = %e, "Inspection endpoint failed"),
            Err(e) => tracing::error!(error = %e, "Inspection endpoint task failed"),
            Ok(Ok(())) => {}
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
