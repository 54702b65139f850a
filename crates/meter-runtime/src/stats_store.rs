//! Latest sampled usage, published to the presentation layer.
//!
//! [`StatsStore`] is written only by the orchestrator loop; every other party
//! holds a `watch::Receiver` and sees immutable [`UsageStats`] values.

use meter_core::error::Result;
use meter_core::models::UsageSnapshot;
use tokio::sync::watch;

/// What the UI renders from.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageStats {
    snapshot: Option<UsageSnapshot>,
    is_loading: bool,
    last_error: Option<String>,
    samples: u64,
}

impl Default for UsageStats {
    fn default() -> Self {
        Self {
            snapshot: None,
            is_loading: true,
            last_error: None,
            samples: 0,
        }
    }
}

impl UsageStats {
    /// Most recent successful sample.
    pub fn snapshot(&self) -> Option<&UsageSnapshot> {
        self.snapshot.as_ref()
    }

    /// `true` until the first sample completes, successful or not.
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Message from the latest sample if it failed.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Completed samples so far.
    pub fn samples(&self) -> u64 {
        self.samples
    }

    pub fn session_percent(&self) -> Option<f64> {
        self.snapshot.as_ref().and_then(|s| s.session_percent)
    }

    pub fn weekly_percent(&self) -> Option<f64> {
        self.snapshot.as_ref().and_then(|s| s.weekly_percent)
    }

    /// Fold one sample outcome in. A failure keeps the previous snapshot.
    pub fn record(&mut self, outcome: Result<UsageSnapshot>) {
        self.is_loading = false;
        self.samples += 1;
        match outcome {
            Ok(snapshot) => {
                self.snapshot = Some(snapshot);
                self.last_error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "usage sample failed");
                self.last_error = Some(e.to_string());
            }
        }
    }

    /// Stats pre-populated with a snapshot, for rendering tests.
    pub fn with_snapshot(snapshot: UsageSnapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
            is_loading: false,
            last_error: None,
            samples: 1,
        }
    }

    /// Stats after a single failed sample, for rendering tests.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            snapshot: None,
            is_loading: false,
            last_error: Some(message.into()),
            samples: 1,
        }
    }
}

/// Single-writer holder of the current [`UsageStats`].
#[derive(Debug)]
pub struct StatsStore {
    tx: watch::Sender<UsageStats>,
}

impl Default for StatsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(UsageStats::default());
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<UsageStats> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> UsageStats {
        self.tx.borrow().clone()
    }

    /// Record a sample outcome and notify subscribers.
    pub fn apply(&self, outcome: Result<UsageSnapshot>) {
        self.tx.send_modify(|stats| stats.record(outcome));
    }

    /// `true` once every receiver has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Resolves once every receiver has been dropped.
    pub async fn closed(&self) {
        self.tx.closed().await
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
