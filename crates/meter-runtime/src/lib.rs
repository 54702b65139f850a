//! Runtime layer for Claude Meter.
//!
//! Owns the `claude` PTY probe, the helper subprocess that runs it, the
//! in-flight guarded sampler, and the scheduling loop that publishes
//! [`stats_store::UsageStats`] to the UI.

pub mod helper;
pub mod orchestrator;
pub mod probe;
pub mod sampler;
pub mod stats_store;

pub use meter_core as core;
