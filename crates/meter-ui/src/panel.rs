//! Detail panel for the Claude Meter TUI.
//!
//! Shows the header, a session section, an optional weekly section, and the
//! key hints, all rendered from one [`UsageStats`] value.

use chrono::{DateTime, Local};
use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use meter_core::formatting::format_percent;
use meter_core::i18n::{Language, Msg};
use meter_runtime::stats_store::UsageStats;

use crate::components::gauge::UsageGauge;
use crate::components::header::Header;
use crate::components::reset_row::reset_row;
use crate::themes::{Theme, Track};

/// Preferred outer width of the panel, borders included.
pub const PANEL_WIDTH: u16 = 44;

/// Render the panel into `area`, inside a border.
pub fn render_panel(
    frame: &mut Frame,
    area: Rect,
    stats: &UsageStats,
    language: Language,
    now: DateTime<Local>,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.separator);
    let inner = block.inner(area);
    let lines = build_panel_lines(stats, language, now, inner.width as usize, theme);
    frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}

/// Build the full `Vec<Line>` for the panel (extracted for testability).
pub fn build_panel_lines<'a>(
    stats: &UsageStats,
    language: Language,
    now: DateTime<Local>,
    width: usize,
    theme: &'a Theme,
) -> Vec<Line<'a>> {
    let mut lines: Vec<Line<'a>> = Vec::with_capacity(20);
    let snapshot = stats.snapshot();

    lines.extend(Header::new(language, snapshot.map(|s| s.captured_at), width, theme).to_lines());
    lines.push(Line::from(""));

    // ── Session ───────────────────────────────────────────────────────────────
    match snapshot {
        _ if stats.is_loading() => {
            lines.push(Line::from(Span::styled(
                language.text(Msg::LoadingUsage),
                theme.info,
            )));
        }
        None => {
            lines.push(Line::from(Span::styled(
                language.text(Msg::FailedToLoad),
                theme.error,
            )));
            lines.push(Line::from(Span::styled(
                language.text(Msg::WillRetry),
                theme.dim,
            )));
        }
        Some(snap) => match snap.session_percent {
            Some(fraction) => lines.extend(usage_section(
                Msg::SessionLimit,
                Track::Session,
                fraction,
                snap.session_resets_at,
                language,
                now,
                width,
                theme,
            )),
            None => {
                lines.push(Line::from(Span::styled(
                    language.text(Msg::SessionLimit),
                    theme.label,
                )));
                lines.push(Line::from(Span::styled(
                    language.text(Msg::NoData),
                    theme.dim,
                )));
            }
        },
    }

    // ── Weekly ────────────────────────────────────────────────────────────────
    if let Some((fraction, resets_at)) =
        snapshot.and_then(|s| s.weekly_percent.map(|p| (p, s.weekly_resets_at)))
    {
        lines.push(Line::from(""));
        lines.extend(usage_section(
            Msg::WeeklyUsage,
            Track::Weekly,
            fraction,
            resets_at,
            language,
            now,
            width,
            theme,
        ));
    }

    // ── Footer ────────────────────────────────────────────────────────────────
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("─".repeat(width), theme.separator)));
    lines.push(key_hints(language, theme));

    lines
}

/// Title, `42% used`, gauge and (when known) the reset row for one limit.
#[allow(clippy::too_many_arguments)]
fn usage_section<'a>(
    title: Msg,
    track: Track,
    fraction: f64,
    resets_at: Option<DateTime<Local>>,
    language: Language,
    now: DateTime<Local>,
    width: usize,
    theme: &'a Theme,
) -> Vec<Line<'a>> {
    let gauge_width = u16::try_from(width).unwrap_or(u16::MAX);
    let mut lines = vec![
        Line::from(Span::styled(language.text(title), theme.label)),
        Line::from(vec![
            Span::styled(format_percent(fraction), theme.value),
            Span::styled(format!(" {}", language.text(Msg::Used)), theme.dim),
        ]),
        Line::from(
            UsageGauge::new(fraction, track, theme)
                .with_width(gauge_width)
                .to_spans(),
        ),
    ];
    if let Some(at) = resets_at {
        lines.push(reset_row(language, at, now, width, theme));
    }
    lines
}

fn key_hints<'a>(language: Language, theme: &'a Theme) -> Line<'a> {
    let mut spans = Vec::with_capacity(8);
    for (i, (key, msg)) in [("r", Msg::Refresh), ("l", Msg::SwitchLanguage), ("q", Msg::Quit)]
        .into_iter()
        .enumerate()
    {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(key, theme.hint_key));
        spans.push(Span::styled(format!(" {}", language.text(msg)), theme.dim));
    }
    Line::from(spans)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::line_text;
    use chrono::Duration;
    use meter_core::models::UsageSnapshot;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn snapshot(now: DateTime<Local>, weekly: Option<f64>) -> UsageSnapshot {
        UsageSnapshot {
            session_percent: Some(0.42),
            session_resets_at: Some(now + Duration::minutes(125)),
            weekly_percent: weekly,
            weekly_resets_at: weekly.map(|_| now + Duration::hours(30)),
            captured_at: now,
        }
    }

    fn texts(lines: &[Line<'_>]) -> Vec<String> {
        lines.iter().map(line_text).collect()
    }

    fn contains(lines: &[String], needle: &str) -> bool {
        lines.iter().any(|l| l.contains(needle))
    }

    // ── build_panel_lines content checks ─────────────────────────────────────

    #[test]
    fn test_panel_loading() {
        let theme = Theme::dark();
        let lines = texts(&build_panel_lines(
            &UsageStats::default(),
            Language::English,
            Local::now(),
            40,
            &theme,
        ));

        assert!(contains(&lines, "Loading usage..."));
        assert!(!contains(&lines, "Updated"));
        assert!(!contains(&lines, "Weekly Usage"));
    }

    #[test]
    fn test_panel_failure_message() {
        let theme = Theme::dark();
        let lines = texts(&build_panel_lines(
            &UsageStats::failed("Executable not found: claude"),
            Language::English,
            Local::now(),
            40,
            &theme,
        ));

        assert!(contains(&lines, "Failed to load data"));
        assert!(contains(&lines, "Will retry automatically"));
        // Details stay in the log.
        assert!(!contains(&lines, "Executable not found"));
    }

    #[test]
    fn test_panel_session_only() {
        let theme = Theme::dark();
        let now = Local::now();
        let stats = UsageStats::with_snapshot(snapshot(now, None));
        let lines = texts(&build_panel_lines(&stats, Language::English, now, 40, &theme));

        assert!(contains(&lines, "Updated "));
        assert!(contains(&lines, "Session Limit"));
        assert!(contains(&lines, "42% used"));
        assert!(contains(&lines, "↻ Resets in 2h 5m"));
        assert!(!contains(&lines, "Weekly Usage"));
    }

    #[test]
    fn test_panel_with_weekly() {
        let theme = Theme::dark();
        let now = Local::now();
        let stats = UsageStats::with_snapshot(snapshot(now, Some(0.07)));
        let lines = texts(&build_panel_lines(&stats, Language::English, now, 40, &theme));

        assert!(contains(&lines, "Weekly Usage"));
        assert!(contains(&lines, "7% used"));
        assert!(contains(&lines, "Resets in 30h"));
    }

    #[test]
    fn test_panel_korean() {
        let theme = Theme::dark();
        let now = Local::now();
        let stats = UsageStats::with_snapshot(snapshot(now, Some(0.07)));
        let lines = texts(&build_panel_lines(&stats, Language::Korean, now, 40, &theme));

        assert!(lines[0].ends_with("[EN]"));
        assert!(contains(&lines, "세션 한도"));
        assert!(contains(&lines, "42% 사용됨"));
        assert!(contains(&lines, "리셋: 2시간 5분 후"));
        assert!(contains(&lines, "주간 사용량"));
        assert!(contains(&lines, "종료"));
    }

    #[test]
    fn test_panel_snapshot_without_session_percent() {
        let theme = Theme::dark();
        let now = Local::now();
        let stats = UsageStats::with_snapshot(UsageSnapshot {
            session_percent: None,
            session_resets_at: None,
            weekly_percent: None,
            weekly_resets_at: None,
            captured_at: now,
        });
        let lines = texts(&build_panel_lines(&stats, Language::English, now, 40, &theme));

        assert!(contains(&lines, "Usage data unavailable"));
        assert!(!contains(&lines, "Failed to load"));
    }

    #[test]
    fn test_panel_footer_hints() {
        let theme = Theme::dark();
        let lines = texts(&build_panel_lines(
            &UsageStats::default(),
            Language::English,
            Local::now(),
            40,
            &theme,
        ));
        assert_eq!(
            lines.last().map(String::as_str),
            Some("r Refresh  l Language  q Quit")
        );
    }

    #[test]
    fn test_panel_gauge_spans_width() {
        let theme = Theme::dark();
        let now = Local::now();
        let stats = UsageStats::with_snapshot(snapshot(now, None));
        let lines = texts(&build_panel_lines(&stats, Language::English, now, 40, &theme));

        let gauge = lines
            .iter()
            .find(|l| l.starts_with('█'))
            .expect("gauge row");
        assert_eq!(gauge.chars().count(), 40);
    }

    // ── Render (does not panic) ───────────────────────────────────────────────

    #[test]
    fn test_render_panel_does_not_panic() {
        let backend = TestBackend::new(PANEL_WIDTH, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let now = Local::now();
        let stats = UsageStats::with_snapshot(snapshot(now, Some(0.9)));

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_panel(frame, area, &stats, Language::Korean, now, &theme);
            })
            .unwrap();
    }

    #[test]
    fn test_render_panel_tiny_area_does_not_panic() {
        let backend = TestBackend::new(6, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::light();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_panel(
                    frame,
                    area,
                    &UsageStats::default(),
                    Language::English,
                    Local::now(),
                    &theme,
                );
            })
            .unwrap();
    }
}
