use crate::components::gauge::UsageGauge;
use crate::components::header::BOLT;
use crate::themes::{Theme, Track};
use chrono::{DateTime, Local};
use meter_core::formatting::{format_countdown, format_percent};
use meter_core::i18n::{Language, Msg};
use meter_runtime::stats_store::UsageStats;
use ratatui::text::{Line, Span};

/// Placeholder shown once loaded when the session percent is unknown.
pub const NO_PERCENT: &str = "--%";

/// The one-row summary: `⚡ █████░░░░░░░░░░ 42% 1h05m`.
pub fn status_line<'a>(
    stats: &UsageStats,
    language: Language,
    now: DateTime<Local>,
    theme: &'a Theme,
) -> Line<'a> {
    let mut spans = vec![Span::styled(BOLT, theme.bolt), Span::raw(" ")];

    if stats.is_loading() {
        spans.push(Span::styled(language.text(Msg::Loading), theme.dim));
        return Line::from(spans);
    }

    let Some(fraction) = stats.session_percent() else {
        spans.push(Span::styled(NO_PERCENT, theme.dim));
        return Line::from(spans);
    };

    spans.extend(UsageGauge::new(fraction, Track::Session, theme).to_spans());
    spans.push(Span::styled(format!(" {}", format_percent(fraction)), theme.text));

    let countdown = stats
        .snapshot()
        .and_then(|s| s.session_resets_at)
        .map(|at| format_countdown((at - now).num_seconds()))
        .unwrap_or_default();
    if !countdown.is_empty() {
        spans.push(Span::styled(format!(" {countdown}"), theme.dim));
    }

    Line::from(spans)
}
