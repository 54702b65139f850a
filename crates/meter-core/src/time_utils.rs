use chrono::{DateTime, Local, NaiveTime, TimeZone};
use tracing::debug;

// ── Reset-time parsing ────────────────────────────────────────────────────────

/// Parse a 12-hour clock string such as `"2:30pm"`, `"9am"` or `"12:05 AM"`.
///
/// Hours must be 1–12 and minutes 0–59. Returns `None` for anything else.
pub fn parse_clock_12h(s: &str) -> Option<NaiveTime> {
    let lower = s.trim().to_ascii_lowercase();

    let (clock, is_pm) = if let Some(rest) = lower.strip_suffix("pm") {
        (rest.trim_end(), true)
    } else if let Some(rest) = lower.strip_suffix("am") {
        (rest.trim_end(), false)
    } else {
        return None;
    };

    let (hour_str, minute_str) = match clock.split_once(':') {
        Some((h, m)) => (h, m),
        None => (clock, "0"),
    };

    if hour_str.is_empty() || hour_str.len() > 2 || minute_str.is_empty() || minute_str.len() > 2
    {
        return None;
    }

    let hour: u32 = hour_str.parse().ok()?;
    let minute: u32 = minute_str.parse().ok()?;
    if !(1..=12).contains(&hour) {
        return None;
    }

    let hour24 = match (hour, is_pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, true) => h + 12,
        (h, false) => h,
    };

    NaiveTime::from_hms_opt(hour24, minute, 0)
}

/// Resolve a reset string to the next matching instant after `now`.
///
/// The clock time is placed on `now`'s calendar date; if that instant is not
/// strictly in the future it is moved to the following day. Times that do
/// not exist locally (DST gaps) fall through to the next day.
pub fn resolve_reset_time_at<Tz: TimeZone>(s: &str, now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    let Some(clock) = parse_clock_12h(s) else {
        debug!("unrecognised reset time \"{}\"", s);
        return None;
    };

    let tz = now.timezone();
    let today = now.date_naive();

    [Some(today), today.succ_opt()]
        .into_iter()
        .flatten()
        .filter_map(|date| tz.from_local_datetime(&date.and_time(clock)).earliest())
        .find(|candidate| candidate > now)
}

/// [`resolve_reset_time_at`] against the current local time.
pub fn resolve_reset_time(s: &str) -> Option<DateTime<Local>> {
    resolve_reset_time_at(s, &Local::now())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
