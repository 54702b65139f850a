use crate::components::align_ends;
use crate::themes::Theme;
use chrono::{DateTime, Local};
use meter_core::i18n::{Language, Msg};
use ratatui::text::{Line, Span};

/// Lightning glyph that opens the title and the status line.
pub const BOLT: &str = "⚡";
/// Application title.
pub const TITLE: &str = "Claude Meter";

/// Panel header rendering three lines:
///
/// 1. `⚡ Claude Meter` with the language toggle hint right-aligned.
/// 2. `Updated HH:MM:SS` once a snapshot exists, blank before.
/// 3. A `─` separator spanning the panel.
pub struct Header<'a> {
    pub language: Language,
    /// Capture time of the snapshot on screen.
    pub updated_at: Option<DateTime<Local>>,
    /// Panel width in columns.
    pub width: usize,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(
        language: Language,
        updated_at: Option<DateTime<Local>>,
        width: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            language,
            updated_at,
            width,
            theme,
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let title = align_ends(
            vec![
                Span::styled(BOLT, self.theme.bolt),
                Span::styled(format!(" {TITLE}"), self.theme.header),
            ],
            vec![Span::styled(
                format!("[{}]", self.language.toggle_label()),
                self.theme.toggle,
            )],
            self.width,
        );

        let updated = match self.updated_at {
            Some(at) => Line::from(Span::styled(
                format!(
                    "{} {}",
                    self.language.text(Msg::Updated),
                    at.format("%H:%M:%S")
                ),
                self.theme.dim,
            )),
            None => Line::from(""),
        };

        vec![
            title,
            updated,
            Line::from(Span::styled("─".repeat(self.width), self.theme.separator)),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::line_text;
    use chrono::TimeZone;
    use unicode_width::UnicodeWidthStr;

    fn updated() -> Option<DateTime<Local>> {
        Local.with_ymd_and_hms(2025, 3, 14, 9, 5, 7).earliest()
    }

    #[test]
    fn test_header_to_lines_count() {
        let theme = Theme::dark();
        let lines = Header::new(Language::English, None, 40, &theme).to_lines();
        assert_eq!(lines.len(), 3, "header must produce exactly 3 lines");
    }

    #[test]
    fn test_header_title_and_toggle() {
        let theme = Theme::dark();
        let lines = Header::new(Language::English, None, 40, &theme).to_lines();
        let title = line_text(&lines[0]);

        assert!(title.starts_with("⚡ Claude Meter"), "got: {title}");
        assert!(title.ends_with("[한]"), "got: {title}");
        assert_eq!(title.width(), 40);
    }

    #[test]
    fn test_header_toggle_in_korean() {
        let theme = Theme::dark();
        let lines = Header::new(Language::Korean, None, 40, &theme).to_lines();
        assert!(line_text(&lines[0]).ends_with("[EN]"));
    }

    #[test]
    fn test_header_updated_line() {
        let theme = Theme::dark();
        let lines = Header::new(Language::English, updated(), 40, &theme).to_lines();
        assert_eq!(line_text(&lines[1]), "Updated 09:05:07");

        let lines = Header::new(Language::Korean, updated(), 40, &theme).to_lines();
        assert_eq!(line_text(&lines[1]), "업데이트 09:05:07");
    }

    #[test]
    fn test_header_blank_before_first_snapshot() {
        let theme = Theme::dark();
        let lines = Header::new(Language::English, None, 40, &theme).to_lines();
        assert!(line_text(&lines[1]).is_empty());
    }

    #[test]
    fn test_header_separator_line() {
        let theme = Theme::dark();
        let lines = Header::new(Language::English, None, 32, &theme).to_lines();
        let sep = line_text(&lines[2]);
        assert_eq!(sep.chars().count(), 32);
        assert!(sep.chars().all(|c| c == '─'));
    }
}
