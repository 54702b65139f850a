//! One usage sample at a time.
//!
//! [`UsageSampler`] wraps a [`UsageSource`] with an in-flight flag so that
//! overlapping triggers (a timer tick during a slow sample, a manual refresh
//! mashed twice) never launch a second subprocess.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Local;
use meter_core::error::Result;
use meter_core::models::{UsageReport, UsageSnapshot};

use crate::helper::HelperLauncher;

/// Anything that can produce a raw usage report.
pub trait UsageSource: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<UsageReport>> + Send;
}

impl UsageSource for HelperLauncher {
    fn fetch(&self) -> impl Future<Output = Result<UsageReport>> + Send {
        self.run()
    }
}

/// Proof that the holder owns the single sampling slot.
///
/// The slot is released when the ticket is dropped.
#[derive(Debug)]
pub struct InFlight {
    flag: Arc<AtomicBool>,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Sampler guarding a [`UsageSource`] with a single in-flight slot.
pub struct UsageSampler<S> {
    source: S,
    in_flight: Arc<AtomicBool>,
}

impl<S: UsageSource> UsageSampler<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Claim the sampling slot, or `None` if a sample is already running.
    pub fn try_begin(&self) -> Option<InFlight> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight {
                flag: Arc::clone(&self.in_flight),
            })
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Fetch a report and stamp it against the current local time.
    pub async fn sample(&self, _ticket: &InFlight) -> Result<UsageSnapshot> {
        let report = self.source.fetch().await?;
        tracing::info!(
            session = ?report.session_percent,
            weekly = ?report.weekly_percent,
            "usage report received"
        );
        if report.is_empty() {
            tracing::warn!("usage screen contained no recognisable figures");
        }
        Ok(UsageSnapshot::from_report(&report, Local::now()))
    }

    /// Claim the slot and sample; `None` when another sample holds it.
    pub async fn try_sample(&self) -> Option<Result<UsageSnapshot>> {
        let ticket = self.try_begin()?;
        Some(self.sample(&ticket).await)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
