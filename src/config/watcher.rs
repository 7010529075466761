//! Property file watcher for hot reload.

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

/// Watches property files and reports which one changed.
///
/// The refresh scheduler consumes the notifications and refreshes right away
/// instead of waiting for its next tick.
pub struct PropertyFileWatcher {
    paths: Vec<PathBuf>,
    change_tx: mpsc::UnboundedSender<PathBuf>,
}

impl PropertyFileWatcher {
    /// Create a new watcher.
    ///
    /// Returns the watcher and a receiver for change notifications.
    pub fn new(paths: Vec<PathBuf>) -> (Self, mpsc::UnboundedReceiver<PathBuf>) {
        let (change_tx, change_rx) = mpsc::unbounded_channel();
        (Self { paths, change_tx }, change_rx)
    }

    /// Start watching in a background thread.
    ///
    /// The returned watcher must be kept alive for notifications to flow.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.change_tx.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        for path in event.paths {
                            tracing::debug!(path = ?path, "Property file change detected");
                            let _ = tx.send(path);
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        for path in &self.paths {
            watcher.watch(path, RecursiveMode::NonRecursive)?;
        }

        tracing::info!(paths = ?self.paths, "Property file watcher started");
        Ok(watcher)
    }
}
