//! # Animation Driver
//!
//! Runs the vehicle store on a fixed cadence. A single task owns the store and
//! handles both timing sources in order: queued batches are ingested before
//! the next tick runs, so a tick always sees the newest window.

use std::time::Duration;

use anyhow::Context as _;
use realtime::{Clock, Result};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use crate::config::MotionConfig;
use crate::state::VehicleStore;
use crate::types::{FleetSnapshot, VehicleSnapshot};

/// A snapshot batch as delivered by the network channel.
pub type Batch = Vec<VehicleSnapshot>;

/// Why the driver task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Stopped,
    SubscriptionEnded,
    NoReaders,
}

/// Handle to a running animation task.
///
/// Stopping is idempotent and also happens on drop, so the timer never
/// outlives the view that started it.
#[derive(Debug)]
pub struct AnimationDriver {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<StopReason>>,
}

impl AnimationDriver {
    /// Spawns the driver on the current tokio runtime.
    ///
    /// Returns the driver handle and a receiver for rendered positions. The
    /// driver ends when stopped, when every `batches` sender is dropped, or
    /// when every positions receiver is dropped.
    pub fn start<C>(
        store: VehicleStore<C>, batches: mpsc::Receiver<Batch>, config: &MotionConfig,
    ) -> (Self, watch::Receiver<FleetSnapshot>)
    where
        C: Clock + 'static,
    {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let (positions_tx, positions_rx) = watch::channel(store.snapshot());
        let period = config.tick_interval.max(Duration::from_millis(1));

        let task = tokio::spawn(run(store, batches, positions_tx, shutdown_rx, period));
        info!(tick_ms = period.as_millis(), "animation driver started");

        (Self { shutdown: Some(shutdown_tx), task: Some(task) }, positions_rx)
    }

    /// Signals the task to stop. Calling this more than once is a no-op.
    pub fn stop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            // the task may already have ended on its own
            let _ = shutdown.send(());
        }
    }

    /// Whether the task is still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stops the task and waits for it to finish.
    ///
    /// # Errors
    ///
    /// Returns an error when the task panicked or was cancelled.
    pub async fn shutdown(mut self) -> Result<Option<StopReason>> {
        self.stop();
        let Some(task) = self.task.take() else {
            return Ok(None);
        };
        let reason = task.await.context("joining animation driver")?;
        Ok(Some(reason))
    }
}

impl Drop for AnimationDriver {
    fn drop(&mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run<C: Clock>(
    mut store: VehicleStore<C>, mut batches: mpsc::Receiver<Batch>,
    positions: watch::Sender<FleetSnapshot>, mut shutdown: oneshot::Receiver<()>,
    period: Duration,
) -> StopReason {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let reason = loop {
        tokio::select! {
            biased;

            _ = &mut shutdown => break StopReason::Stopped,
            batch = batches.recv() => {
                let Some(batch) = batch else {
                    break StopReason::SubscriptionEnded;
                };
                store.ingest(batch);
                positions.send_replace(store.snapshot());
            }
            _ = ticker.tick() => {
                if store.advance_tick().is_advanced() {
                    positions.send_replace(store.snapshot());
                }
            }
        }

        if positions.is_closed() {
            break StopReason::NoReaders;
        }
    };

    info!(reason = ?reason, "animation driver stopped");
    debug!(vehicles = store.len(), "final fleet size");
    reason
}
