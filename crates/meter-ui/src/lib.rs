//! Terminal UI layer for Claude Meter.
//!
//! Provides themes, the status line and gauge components, the detail panel,
//! and the application event loop built on top of [`ratatui`].

pub mod app;
pub mod components;
pub mod panel;
pub mod themes;

pub use meter_core as core;
