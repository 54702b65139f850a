//! English / Korean display strings.
//!
//! The meter ships with exactly two languages, so strings live in a single
//! `match` rather than in external catalogues.

use chrono::Timelike;
use serde::{Deserialize, Serialize};

use crate::formatting::format_time;

/// Display language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ko")]
    Korean,
}

/// Every user-visible label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Msg {
    Loading,
    LoadingUsage,
    SessionLimit,
    WeeklyUsage,
    Used,
    Updated,
    FailedToLoad,
    WillRetry,
    NoData,
    Quit,
    Refresh,
    SwitchLanguage,
}

impl Language {
    /// Short code persisted in preferences.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Korean => "ko",
        }
    }

    /// Parse a persisted code; unknown codes yield `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Language::English),
            "ko" => Some(Language::Korean),
            _ => None,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Language::English => Language::Korean,
            Language::Korean => Language::English,
        }
    }

    pub fn is_korean(self) -> bool {
        self == Language::Korean
    }

    /// Label of the toggle button: it names the language you switch *to*.
    pub fn toggle_label(self) -> &'static str {
        match self {
            Language::English => "한",
            Language::Korean => "EN",
        }
    }

    pub fn text(self, msg: Msg) -> &'static str {
        let (ko, en) = match msg {
            Msg::Loading => ("로딩중...", "Loading..."),
            Msg::LoadingUsage => ("사용량 불러오는 중...", "Loading usage..."),
            Msg::SessionLimit => ("세션 한도", "Session Limit"),
            Msg::WeeklyUsage => ("주간 사용량", "Weekly Usage"),
            Msg::Used => ("사용됨", "used"),
            Msg::Updated => ("업데이트", "Updated"),
            Msg::FailedToLoad => ("데이터를 가져올 수 없음", "Failed to load data"),
            Msg::WillRetry => ("잠시 후 자동으로 재시도합니다", "Will retry automatically"),
            Msg::NoData => ("사용량 정보 없음", "Usage data unavailable"),
            Msg::Quit => ("종료", "Quit"),
            Msg::Refresh => ("새로고침", "Refresh"),
            Msg::SwitchLanguage => ("언어", "Language"),
        };
        match self {
            Language::Korean => ko,
            Language::English => en,
        }
    }

    /// Relative reset phrase, e.g. `"Resets in 2h 5m"` / `"리셋: 2시간 5분 후"`.
    pub fn reset_phrase(self, seconds: i64) -> String {
        let total_minutes = (seconds.max(0) + 59) / 60;
        match self {
            Language::English => format!("Resets in {}", format_time(total_minutes as f64)),
            Language::Korean => {
                let hours = total_minutes / 60;
                let minutes = total_minutes % 60;
                let span = match (hours, minutes) {
                    (0, m) => format!("{m}분"),
                    (h, 0) => format!("{h}시간"),
                    (h, m) => format!("{h}시간 {m}분"),
                };
                format!("리셋: {span} 후")
            }
        }
    }

    /// Wall-clock time in the language's customary short form.
    pub fn format_clock<T: Timelike>(self, time: &T) -> String {
        let (is_pm, hour12) = time.hour12();
        match self {
            Language::English => {
                let marker = if is_pm { "PM" } else { "AM" };
                format!("{}:{:02} {}", hour12, time.minute(), marker)
            }
            Language::Korean => {
                let marker = if is_pm { "오후" } else { "오전" };
                format!("{} {}:{:02}", marker, hour12, time.minute())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn test_codes_round_trip() {
        assert_eq!(Language::from_code("en"), Some(Language::English));
        assert_eq!(Language::from_code(" KO "), Some(Language::Korean));
        assert_eq!(Language::from_code("fr"), None);
        assert_eq!(Language::Korean.code(), "ko");
    }

    #[test]
    fn test_toggle_flips() {
        assert_eq!(Language::English.toggle(), Language::Korean);
        assert_eq!(Language::Korean.toggle(), Language::English);
        assert_eq!(Language::default(), Language::English);
    }

    #[test]
    fn test_toggle_label_names_target_language() {
        assert_eq!(Language::English.toggle_label(), "한");
        assert_eq!(Language::Korean.toggle_label(), "EN");
    }

    #[test]
    fn test_text_lookup() {
        assert_eq!(Language::English.text(Msg::SessionLimit), "Session Limit");
        assert_eq!(Language::Korean.text(Msg::SessionLimit), "세션 한도");
        assert_eq!(Language::English.text(Msg::WillRetry), "Will retry automatically");
    }

    #[test]
    fn test_reset_phrase_english() {
        assert_eq!(Language::English.reset_phrase(2 * 3600 + 5 * 60), "Resets in 2h 5m");
        assert_eq!(Language::English.reset_phrase(3600), "Resets in 1h");
        assert_eq!(Language::English.reset_phrase(30), "Resets in 1m");
        assert_eq!(Language::English.reset_phrase(-5), "Resets in 0m");
    }

    #[test]
    fn test_reset_phrase_korean() {
        assert_eq!(Language::Korean.reset_phrase(2 * 3600 + 5 * 60), "리셋: 2시간 5분 후");
        assert_eq!(Language::Korean.reset_phrase(45 * 60), "리셋: 45분 후");
    }

    #[test]
    fn test_format_clock() {
        let t = NaiveTime::from_hms_opt(14, 5, 0).unwrap();
        assert_eq!(Language::English.format_clock(&t), "2:05 PM");
        assert_eq!(Language::Korean.format_clock(&t), "오후 2:05");

        let midnight = NaiveTime::from_hms_opt(0, 30, 0).unwrap();
        assert_eq!(Language::English.format_clock(&midnight), "12:30 AM");
    }

    #[test]
    fn test_serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Language::Korean).unwrap(), "\"ko\"");
        let lang: Language = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(lang, Language::English);
    }
}
