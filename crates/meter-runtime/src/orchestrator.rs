//! Async sampling orchestrator.
//!
//! Runs the sampling schedule in a tokio task: one sample immediately, then
//! one per `update_interval`, plus any manual refreshes. Samples run in their
//! own tasks and report back over a channel, so the loop stays the only
//! writer of the [`StatsStore`] and the UI only ever reads `watch` values.

use std::sync::Arc;
use std::time::Duration;

use meter_core::error::Result;
use meter_core::models::UsageSnapshot;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, MissedTickBehavior};

use crate::sampler::{UsageSampler, UsageSource};
use crate::stats_store::{StatsStore, UsageStats};

// ── MeterOrchestrator ─────────────────────────────────────────────────────────

/// Background sampling coordinator.
///
/// Call [`MeterOrchestrator::start`] to spin up the loop and receive the
/// stats channel plus a [`MeterHandle`].
pub struct MeterOrchestrator<S> {
    /// How often to sample.
    update_interval: Duration,
    sampler: Arc<UsageSampler<S>>,
}

impl<S: UsageSource> MeterOrchestrator<S> {
    /// Create an orchestrator sampling every `update_interval_secs` seconds.
    pub fn new(update_interval_secs: u64, source: S) -> Self {
        Self::with_update_interval(Duration::from_secs(update_interval_secs), source)
    }

    pub fn with_update_interval(update_interval: Duration, source: S) -> Self {
        Self {
            update_interval,
            sampler: Arc::new(UsageSampler::new(source)),
        }
    }

    /// Start the sampling loop.
    ///
    /// Returns a `watch::Receiver` that always holds the latest
    /// [`UsageStats`], and a [`MeterHandle`] for refreshes and shutdown. The
    /// loop exits on its own once every receiver is dropped.
    pub fn start(self) -> (watch::Receiver<UsageStats>, MeterHandle) {
        let store = StatsStore::new();
        let rx = store.subscribe();
        let (refresh_tx, refresh_rx) = mpsc::channel(4);

        let handle = tokio::spawn(async move {
            self.sampling_loop(store, refresh_rx).await;
        });

        (rx, MeterHandle { handle, refresh_tx })
    }

    // ── Private implementation ────────────────────────────────────────────

    async fn sampling_loop(self, store: StatsStore, mut refresh_rx: mpsc::Receiver<()>) {
        let (done_tx, mut done_rx) = mpsc::channel::<Result<UsageSnapshot>>(4);

        // The first tick fires immediately.
        let mut interval = time::interval(self.update_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.launch(&done_tx, "timer");
                }
                Some(()) = refresh_rx.recv() => {
                    self.launch(&done_tx, "manual refresh");
                }
                Some(outcome) = done_rx.recv() => {
                    store.apply(outcome);
                }
                _ = store.closed() => {
                    tracing::debug!("all stats receivers dropped; exiting loop");
                    break;
                }
            }
        }
    }

    /// Start a sample unless one is already running.
    fn launch(&self, done_tx: &mpsc::Sender<Result<UsageSnapshot>>, trigger: &str) -> bool {
        let Some(ticket) = self.sampler.try_begin() else {
            tracing::debug!("{} skipped: sample already in flight", trigger);
            return false;
        };
        tracing::debug!("{} started a sample", trigger);

        let sampler = Arc::clone(&self.sampler);
        let done_tx = done_tx.clone();
        tokio::spawn(async move {
            let outcome = sampler.sample(&ticket).await;
            if done_tx.send(outcome).await.is_err() {
                tracing::debug!("sampling loop gone; dropping sample");
            }
            drop(ticket);
        });
        true
    }
}

// ── MeterHandle ───────────────────────────────────────────────────────────────

/// A handle to the background sampling task.
///
/// Drop or call [`MeterHandle::abort`] to stop the loop.
pub struct MeterHandle {
    handle: tokio::task::JoinHandle<()>,
    refresh_tx: mpsc::Sender<()>,
}

impl MeterHandle {
    /// Immediately abort the sampling loop.
    pub fn abort(&self) {
        self.handle.abort();
    }

    /// Ask for a sample now. Ignored while one is already running.
    pub fn refresh(&self) {
        if self.refresh_tx.try_send(()).is_err() {
            tracing::debug!("refresh request dropped");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for MeterHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
