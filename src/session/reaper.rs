//! Background purge of expired sessions.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time;

use crate::session::SessionStore;

/// Periodically drops idle sessions until shutdown.
pub struct SessionReaper {
    store: Arc<dyn SessionStore>,
    interval: Duration,
}

impl SessionReaper {
    pub fn new(store: Arc<dyn SessionStore>, interval: Duration) -> Self {
        Self { store, interval }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(interval_secs = self.interval.as_secs(), "Session reaper starting");
        let mut ticker = time::interval(self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let purged = self.store.purge_expired();
                    if purged > 0 {
                        tracing::debug!(purged, "Expired sessions purged");
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Session reaper received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}
