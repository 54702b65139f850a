//! Scraper for the `claude` CLI's rendered `/usage` screen.
//!
//! The CLI draws its usage report with colours, cursor movement and
//! box-drawing glyphs. [`parse_usage_output`] flattens that output into plain
//! text and then picks up the `NN% used` figures and `Resets 2:30pm` style
//! times positionally: the CLI prints the session block before the weekly
//! block, so match [`SESSION_SLOT`] is the session and [`WEEKLY_SLOT`] the
//! weekly quota. There is no schema; if the upstream layout changes the
//! fields simply go missing.

use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

use crate::models::UsageReport;

/// Index of the session figure among all matches.
pub const SESSION_SLOT: usize = 0;
/// Index of the weekly figure among all matches.
pub const WEEKLY_SLOT: usize = 1;

// ── Patterns ──────────────────────────────────────────────────────────────────

/// CSI (`ESC [ … letter`), OSC (`ESC ] … BEL`) and two-byte `ESC x` sequences.
fn ansi_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\x1b(?:\[[0-9;?]*[A-Za-z]|\][^\x07]*\x07|[^\[\]])").expect("regex is valid")
    })
}

/// Box drawing, block elements, misc symbols, dingbats, emoji and the emoji
/// variation selector.
fn decoration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[\x{2500}-\x{259F}\x{2600}-\x{27BF}\x{1F300}-\x{1FAFF}\x{FE0F}]+")
            .expect("regex is valid")
    })
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("regex is valid"))
}

fn percent_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\s*%\s*used").expect("regex is valid"))
}

fn reset_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)re[a-z]*\s*(\d{1,2}(?::\d{2})?)\s*(am|pm)").expect("regex is valid")
    })
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Reduce raw terminal output to a single line of plain text.
///
/// Strips escape sequences and carriage returns, replaces runs of decoration
/// glyphs with a space, and collapses whitespace runs to one space.
pub fn clean_terminal_text(raw: &str) -> String {
    let text = ansi_re().replace_all(raw, "");
    let text = text.replace('\r', "");
    let text = decoration_re().replace_all(&text, " ");
    whitespace_re().replace_all(&text, " ").into_owned()
}

/// All `NN% used` figures in order of appearance, as fractions.
///
/// A figure too large for `u32` yields `None` in its slot so later slots keep
/// their position.
pub fn find_percentages(text: &str) -> Vec<Option<f64>> {
    percent_re()
        .captures_iter(text)
        .map(|caps| caps[1].parse::<u32>().ok().map(|n| f64::from(n) / 100.0))
        .collect()
}

/// All reset times in order of appearance, normalised to e.g. `"2:30pm"`.
pub fn find_reset_times(text: &str) -> Vec<String> {
    reset_re()
        .captures_iter(text)
        .map(|caps| format!("{}{}", &caps[1], caps[2].to_lowercase()))
        .collect()
}

/// Parse a captured `/usage` screen into a [`UsageReport`].
pub fn parse_usage_output(buf: &[u8]) -> UsageReport {
    let raw = String::from_utf8_lossy(buf);
    let text = clean_terminal_text(&raw);

    let percentages = find_percentages(&text);
    let resets = find_reset_times(&text);

    if percentages.len() > WEEKLY_SLOT + 1 || resets.len() > WEEKLY_SLOT + 1 {
        warn!(
            percentages = percentages.len(),
            resets = resets.len(),
            "more usage figures than expected; /usage layout may have changed"
        );
    }

    UsageReport {
        session_percent: percentages.get(SESSION_SLOT).copied().flatten(),
        session_resets: resets.get(SESSION_SLOT).cloned(),
        weekly_percent: percentages.get(WEEKLY_SLOT).copied().flatten(),
        weekly_resets: resets.get(WEEKLY_SLOT).cloned(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// A trimmed-down capture of the real `/usage` screen.
    const SCREEN: &str = concat!(
        "\x1b[?25l\x1b[2J\x1b[H\x1b]0;claude\x07",
        "╭──────────────────────────────╮\r\n",
        "│ \x1b[1mCurrent session\x1b[22m              │\r\n",
        "│ \x1b[38;5;39m█████████▌\x1b[39m          42% used │\r\n",
        "│ Resets 2:30pm (Asia/Seoul)   │\r\n",
        "│                              │\r\n",
        "│ \x1b[1mCurrent week (all models)\x1b[22m    │\r\n",
        "│ \x1b[38;5;39m█▌\x1b[39m                   7% used │\r\n",
        "│ Resets 9AM (Asia/Seoul)      │\r\n",
        "╰──────────────────────────────╯\r\n",
    );

    fn approx(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|v| (v - b).abs() < 1e-9)
    }

    // ── clean_terminal_text ──────────────────────────────────────────────────

    #[test]
    fn test_clean_strips_csi_and_osc() {
        let cleaned = clean_terminal_text("\x1b[31mred\x1b[0m \x1b]0;title\x07text");
        assert_eq!(cleaned, "red text");
    }

    #[test]
    fn test_clean_strips_two_byte_escape() {
        // ESC = (keypad mode) and ESC 7 (save cursor).
        let cleaned = clean_terminal_text("\x1b=a\x1b7b");
        assert_eq!(cleaned, "ab");
    }

    #[test]
    fn test_clean_removes_carriage_returns() {
        assert_eq!(clean_terminal_text("a\rb\r\nc"), "ab c");
    }

    #[test]
    fn test_clean_collapses_decoration_and_whitespace() {
        let cleaned = clean_terminal_text("│ ██▌ 5%   used │ ⚡✓ 🚀 ok");
        assert_eq!(cleaned, " 5% used ok");
    }

    #[test]
    fn test_decoration_only_buffer_has_no_percentages() {
        let buf = "\x1b[2J╭──╮\r\n│██│\r\n╰──╯ ⚡🚀\x1b[0m".as_bytes();
        let report = parse_usage_output(buf);
        assert!(report.session_percent.is_none());
        assert!(report.weekly_percent.is_none());
        assert!(report.is_empty());
    }

    // ── parse_usage_output ───────────────────────────────────────────────────

    #[test]
    fn test_parse_two_percentages_positionally() {
        let report = parse_usage_output(SCREEN.as_bytes());
        assert!(approx(report.session_percent, 0.42), "{report:?}");
        assert!(approx(report.weekly_percent, 0.07), "{report:?}");
    }

    #[test]
    fn test_parse_reset_times_positionally_and_lowercased() {
        let report = parse_usage_output(SCREEN.as_bytes());
        assert_eq!(report.session_resets.as_deref(), Some("2:30pm"));
        assert_eq!(report.weekly_resets.as_deref(), Some("9am"));
    }

    #[test]
    fn test_parse_zero_occurrences_is_absent_not_zero() {
        let report = parse_usage_output(b"Welcome to Claude Code! Type /help");
        assert_eq!(report.session_percent, None);
        assert_eq!(report.weekly_percent, None);
        assert_eq!(report.session_resets, None);
        assert_eq!(report.weekly_resets, None);
    }

    #[test]
    fn test_parse_single_occurrence_leaves_weekly_absent() {
        let report = parse_usage_output(b"Current session 88 % used Resets 11pm");
        assert!(approx(report.session_percent, 0.88));
        assert!(report.weekly_percent.is_none());
        assert_eq!(report.session_resets.as_deref(), Some("11pm"));
        assert!(report.weekly_resets.is_none());
    }

    #[test]
    fn test_parse_extra_matches_use_first_two() {
        let report = parse_usage_output(b"1% used 2% used 3% used");
        assert!(approx(report.session_percent, 0.01));
        assert!(approx(report.weekly_percent, 0.02));
    }

    #[test]
    fn test_parse_percent_split_by_escape_codes() {
        let report = parse_usage_output(b"\x1b[1m55\x1b[0m% \x1b[2mused\x1b[0m");
        assert!(approx(report.session_percent, 0.55));
    }

    #[test]
    fn test_parse_invalid_utf8_is_tolerated() {
        let mut buf = vec![0xff, 0xfe];
        buf.extend_from_slice(b" 12% used");
        let report = parse_usage_output(&buf);
        assert!(approx(report.session_percent, 0.12));
    }

    #[test]
    fn test_parse_zero_percent_is_some_zero() {
        let report = parse_usage_output(b"0% used");
        assert_eq!(report.session_percent, Some(0.0));
    }

    // ── find_reset_times ─────────────────────────────────────────────────────

    #[test]
    fn test_reset_times_require_am_pm() {
        assert!(find_reset_times("Resets 14:30").is_empty());
        assert_eq!(find_reset_times("resets 4pm"), vec!["4pm".to_string()]);
        assert_eq!(find_reset_times("RESETS 10:05 PM"), vec!["10:05pm".to_string()]);
    }

    #[test]
    fn test_reset_word_variants() {
        // Any word beginning with "re" introduces a time.
        assert_eq!(find_reset_times("Refreshes 7am"), vec!["7am".to_string()]);
    }

    #[test]
    fn test_percentages_preserve_slots_on_overflow() {
        let found = find_percentages("99999999999% used 5% used");
        assert_eq!(found.len(), 2);
        assert!(found[0].is_none());
        assert!(approx(found[1], 0.05));
    }
}
