//! Periodic routing refresh.
//!
//! # Responsibilities
//! - Refresh the repository on a fixed delay
//! - Refresh immediately when a watched property file changes
//! - Stop on shutdown

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::routing::{PropertyRouteRepository, RefreshOutcome};

pub struct RefreshScheduler {
    repository: Arc<PropertyRouteRepository>,
    interval: Duration,
}

impl RefreshScheduler {
    pub fn new(repository: Arc<PropertyRouteRepository>, interval: Duration) -> Self {
        Self {
            repository,
            interval,
        }
    }

    /// Spawn [`RefreshScheduler::run`] onto the current runtime.
    pub fn spawn(
        self,
        changes: mpsc::UnboundedReceiver<PathBuf>,
        shutdown: broadcast::Receiver<()>,
    ) -> JoinHandle<()> {
        tokio::spawn(self.run(changes, shutdown))
    }

    pub async fn run(
        self,
        mut changes: mpsc::UnboundedReceiver<PathBuf>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        tracing::info!(
            interval_ms = self.interval.as_millis() as u64,
            "Traffic routing refresh scheduler starting"
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.refresh_once().await;
                }
                Some(path) = changes.recv() => {
                    tracing::info!(path = ?path, "Property source changed, refreshing traffic routes");
                    self.refresh_once().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Refresh scheduler received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Property sources block, so the refresh runs off the async workers.
    async fn refresh_once(&self) -> RefreshOutcome {
        let repository = self.repository.clone();
        match tokio::task::spawn_blocking(move || repository.refresh()).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "Traffic routing refresh task failed");
                RefreshOutcome::Skipped
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RoutingContext;
    use crate::lifecycle::Shutdown;
    use crate::routing::{ContextConstraintEvaluator, RouteRepository, DEFAULT_KEY_PREFIX};
    use crate::source::MemoryPropertySource;

    fn repository(source: Arc<MemoryPropertySource>) -> Arc<PropertyRouteRepository> {
        Arc::new(PropertyRouteRepository::new(
            source,
            Arc::new(ContextConstraintEvaluator),
            DEFAULT_KEY_PREFIX,
        ))
    }

    /// Wait until the repository has completed `generation` refreshes.
    async fn wait_for_generation(repo: &PropertyRouteRepository, generation: u64) {
        time::timeout(Duration::from_secs(5), async {
            while repo.last_report().generation < generation {
                time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("refresh should complete");
    }

    #[tokio::test]
    async fn test_refreshes_periodically_and_stops() {
        let source = Arc::new(MemoryPropertySource::new("test"));
        let repo = repository(source.clone());
        let shutdown = Shutdown::new();
        let (_changes_tx, changes) = mpsc::unbounded_channel();

        let handle = RefreshScheduler::new(repo.clone(), Duration::from_millis(20))
            .spawn(changes, shutdown.subscribe());

        wait_for_generation(&repo, 1).await;
        assert!(repo.has_cached());
        assert!(repo.list_all().is_empty());

        source.set("temporal.routing.orders.alice", "strategy: workstation\nconfig: {user: alice}");
        // A refresh already in flight may have read the old properties; the one after it cannot.
        let seen = repo.last_report().generation;
        wait_for_generation(&repo, seen + 2).await;
        assert!(repo.find_matching("orders", &RoutingContext::new()).is_some());

        shutdown.trigger();
        time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("scheduler should stop on shutdown")
            .unwrap();
    }

    #[tokio::test]
    async fn test_change_notification_triggers_refresh() {
        let source = Arc::new(MemoryPropertySource::new("test"));
        let repo = repository(source.clone());
        let shutdown = Shutdown::new();
        let (changes_tx, changes) = mpsc::unbounded_channel();

        let handle = RefreshScheduler::new(repo.clone(), Duration::from_secs(3600))
            .spawn(changes, shutdown.subscribe());

        wait_for_generation(&repo, 1).await;
        assert_eq!(repo.list_all().len(), 0);

        source.set("temporal.routing.orders.alice", "strategy: workstation");
        changes_tx.send(PathBuf::from("routing.toml")).unwrap();
        wait_for_generation(&repo, 2).await;

        assert_eq!(repo.last_report().generation, 2);
        assert_eq!(repo.list_all().len(), 1);

        shutdown.trigger();
        time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("scheduler should stop on shutdown")
            .unwrap();
    }
}
