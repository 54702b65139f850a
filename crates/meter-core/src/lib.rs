//! Core domain for Claude Meter.
//!
//! Usage models, the `/usage` screen parser, reset-time resolution, display
//! formatting, localisation, settings and the shared error type.

pub mod error;
pub mod formatting;
pub mod i18n;
pub mod models;
pub mod parser;
pub mod settings;
pub mod time_utils;
