//! The fixed-interval poll loop.
//!
//! Every tick runs the four entity-class pipelines in turn: fetch the
//! current snapshot, diff it against the stored one, dispatch the rendered
//! changes, then persist the new snapshot. A failing pipeline (engine
//! unavailable, store I/O) is logged and does not block the other classes in
//! the same tick. Ticks are scheduled from nominal time; an overrunning tick
//! skips ahead instead of bursting to catch up.

use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::diff;
use crate::docker::SnapshotProvider;
use crate::entity::EntityClass;
use crate::notify::Dispatcher;
use crate::store::SnapshotStore;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("snapshot fetch failed: {0}")]
    Engine(#[from] crate::docker::Error),
    #[error("snapshot store failed: {0}")]
    Store(#[from] crate::store::Error),
}

/// Drives the whole pipeline on a fixed interval, forever; only a ctrl-c (or
/// process termination) stops it.
pub struct Scheduler<P, S> {
    provider: P,
    store: S,
    dispatcher: Dispatcher,
    host: String,
    interval: Duration,
}

impl<P, S> Scheduler<P, S>
where
    P: SnapshotProvider,
    S: SnapshotStore,
{
    pub fn new(
        provider: P,
        store: S,
        dispatcher: Dispatcher,
        host: String,
        interval: Duration,
    ) -> Self {
        Self {
            provider,
            store,
            dispatcher,
            host,
            interval,
        }
    }

    /// Runs the poll loop until ctrl-c. The first tick fires immediately.
    pub async fn run(self) {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = interval.tick() => self.tick().await,
                _ = tokio::signal::ctrl_c() => {
                    log::info!("received ctrl-c, shutting down");
                    break;
                }
            }
        }
    }

    async fn tick(&self) {
        for class in EntityClass::ALL {
            if let Err(err) = self.poll_class(class).await {
                log::error!(target: "scheduler", "{class} pipeline failed: {err}");
            }
        }
    }

    /// One class's pipeline. On first run the store is seeded silently; the
    /// stored snapshot is replaced only after a diff was computed and
    /// dispatched.
    async fn poll_class(&self, class: EntityClass) -> Result<(), PipelineError> {
        let fresh = self.provider.fetch(class).await?;

        let Some(previous) = self.store.load(class)? else {
            log::debug!("seeding {class} snapshot with {} record(s)", fresh.len());
            self.store.save(class, &fresh)?;
            return Ok(());
        };

        let events = diff::diff(class, &previous, &fresh);
        if events.is_empty() {
            return Ok(());
        }
        log::debug!("{class}: {} change event(s)", events.len());
        self.dispatcher.dispatch(&self.host, class, &events).await;
        self.store.save(class, &fresh)?;
        Ok(())
    }
}
