use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::time_utils::resolve_reset_time_at;

/// Raw result of one `/usage` scrape, as carried over the helper protocol.
///
/// Every field is optional: a field is present only when the parser found
/// the corresponding match in the captured terminal output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageReport {
    /// Session usage as a fraction in `[0, 1]`.
    #[serde(rename = "pct", default, skip_serializing_if = "Option::is_none")]
    pub session_percent: Option<f64>,
    /// Session reset time as printed by the CLI, e.g. `"2:30pm"`.
    #[serde(rename = "resetsStr", default, skip_serializing_if = "Option::is_none")]
    pub session_resets: Option<String>,
    /// Weekly usage as a fraction in `[0, 1]`.
    #[serde(rename = "weeklyPct", default, skip_serializing_if = "Option::is_none")]
    pub weekly_percent: Option<f64>,
    /// Weekly reset time as printed by the CLI.
    #[serde(
        rename = "weeklyResetsStr",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub weekly_resets: Option<String>,
}

impl UsageReport {
    /// `true` when the parser found nothing at all.
    pub fn is_empty(&self) -> bool {
        self.session_percent.is_none()
            && self.session_resets.is_none()
            && self.weekly_percent.is_none()
            && self.weekly_resets.is_none()
    }
}

/// Error object written to stderr by the helper when a probe fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeFailure {
    pub error: String,
}

/// Immutable result of one successful sample.
///
/// A new snapshot always replaces the previous one wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    pub session_percent: Option<f64>,
    pub session_resets_at: Option<DateTime<Local>>,
    pub weekly_percent: Option<f64>,
    pub weekly_resets_at: Option<DateTime<Local>>,
    pub captured_at: DateTime<Local>,
}

impl UsageSnapshot {
    /// Build a snapshot from a report, resolving reset strings against `now`.
    pub fn from_report(report: &UsageReport, now: DateTime<Local>) -> Self {
        Self {
            session_percent: report.session_percent.map(clamp_fraction),
            session_resets_at: resolve_opt(report.session_resets.as_deref(), &now),
            weekly_percent: report.weekly_percent.map(clamp_fraction),
            weekly_resets_at: resolve_opt(report.weekly_resets.as_deref(), &now),
            captured_at: now,
        }
    }

    /// `true` when neither percentage is known.
    pub fn is_unavailable(&self) -> bool {
        self.session_percent.is_none() && self.weekly_percent.is_none()
    }
}

fn resolve_opt<Tz: TimeZone>(raw: Option<&str>, now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    raw.and_then(|s| resolve_reset_time_at(s, now))
}

fn clamp_fraction(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
