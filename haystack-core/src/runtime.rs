//! Periodic refresh for hosts that run a tokio runtime.
//!
//! The driver re-fetches the master collection on a fixed cadence so that
//! renames, moves and new entities show up without an explicit signal.

use crate::engine::{InvalidationReason, ListEngine};
use haystack_model::Entity;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

/// Default cadence between refresh passes
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5);

/// Background task that invalidates and recomputes an engine on a timer
#[derive(Debug)]
pub struct RefreshDriver;

impl RefreshDriver {
    /// Spawn the refresh loop on the current tokio runtime.
    ///
    /// The first pass runs immediately. Each tick marks the master
    /// collection changed and recomputes; a failed pass is logged and the
    /// loop keeps going.
    pub fn spawn<E: Entity + 'static>(
        engine: Arc<Mutex<ListEngine<E>>>,
        every: Duration,
    ) -> RefreshHandle {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let task = tokio::spawn(async move {
            info!(interval_ms = every.as_millis() as u64, "starting list refresh driver");
            let mut ticker = interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let mut engine = engine.lock().await;
                        engine.invalidate(InvalidationReason::MasterChanged);
                        match engine.recompute() {
                            Ok(projection) => debug!(
                                generation = projection.generation(),
                                "periodic refresh complete"
                            ),
                            Err(error) => warn!(%error, "periodic refresh failed"),
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                }
            }

            info!("list refresh driver stopped");
        });

        RefreshHandle { shutdown_tx, task }
    }
}

/// Owner handle for a running [`RefreshDriver`]
#[derive(Debug)]
pub struct RefreshHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Stop the loop and wait for the task to finish its current pass
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        if let Err(error) = self.task.await {
            warn!(%error, "list refresh driver task ended abnormally");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::InMemoryProvider;
    use haystack_model::{EntityId, EntityKind, EntityRecord};

    #[tokio::test(start_paused = true)]
    async fn driver_picks_up_new_entities() {
        let provider = Arc::new(InMemoryProvider::new(vec![Arc::new(
            EntityRecord::new(EntityId::new(), EntityKind::Ship, "Bob"),
        )]));
        let engine = ListEngine::<EntityRecord>::builder(provider.clone())
            .build()
            .unwrap();
        let engine = Arc::new(Mutex::new(engine));

        let handle = RefreshDriver::spawn(Arc::clone(&engine), Duration::from_secs(5));
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(engine.lock().await.filtered_ordered_list().unwrap().len(), 1);

        provider.push(Arc::new(EntityRecord::new(
            EntityId::new(),
            EntityKind::Rover,
            "Dora",
        )));
        tokio::time::sleep(Duration::from_millis(5_010)).await;
        assert_eq!(engine.lock().await.filtered_ordered_list().unwrap().len(), 2);

        handle.shutdown().await;
    }
}
