use crate::components::align_ends;
use crate::themes::Theme;
use chrono::{DateTime, Local};
use meter_core::i18n::Language;
use ratatui::text::{Line, Span};

/// Glyph that prefixes the English reset phrase.
pub const RESET_GLYPH: &str = "↻";

/// `↻ Resets in 2h 5m` on the left, the reset clock time on the right.
///
/// Korean drops the glyph: its phrase already reads `리셋: … 후`.
pub fn reset_row<'a>(
    language: Language,
    resets_at: DateTime<Local>,
    now: DateTime<Local>,
    width: usize,
    theme: &'a Theme,
) -> Line<'a> {
    let phrase = language.reset_phrase((resets_at - now).num_seconds());
    let left = match language {
        Language::English => format!("{RESET_GLYPH} {phrase}"),
        Language::Korean => phrase,
    };

    align_ends(
        vec![Span::styled(left, theme.label)],
        vec![Span::styled(language.format_clock(&resets_at), theme.dim)],
        width,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::line_text;
    use chrono::{Duration, TimeZone};
    use unicode_width::UnicodeWidthStr;

    fn now() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2025, 3, 14, 12, 25, 0)
            .earliest()
            .unwrap()
    }

    #[test]
    fn test_reset_row_english() {
        let theme = Theme::dark();
        let resets = now() + Duration::minutes(125);
        let text = line_text(&reset_row(Language::English, resets, now(), 36, &theme));

        assert!(text.starts_with("↻ Resets in 2h 5m"), "got: {text}");
        assert!(text.ends_with("2:30 PM"), "got: {text}");
        assert_eq!(text.width(), 36);
    }

    #[test]
    fn test_reset_row_korean() {
        let theme = Theme::dark();
        let resets = now() + Duration::minutes(125);
        let text = line_text(&reset_row(Language::Korean, resets, now(), 36, &theme));

        assert!(text.starts_with("리셋: 2시간 5분 후"), "got: {text}");
        assert!(text.ends_with("오후 2:30"), "got: {text}");
        assert_eq!(text.width(), 36);
    }
}
