/// Format a usage fraction as a whole percentage.
///
/// # Examples
///
/// ```
/// use meter_core::formatting::format_percent;
///
/// assert_eq!(format_percent(0.42), "42%");
/// assert_eq!(format_percent(0.0), "0%");
/// assert_eq!(format_percent(0.29), "29%");
/// ```
pub fn format_percent(fraction: f64) -> String {
    format!("{}%", percent_points(fraction))
}

/// Whole percentage points for a fraction, clamped to `0..=100`.
pub fn percent_points(fraction: f64) -> u32 {
    (fraction.clamp(0.0, 1.0) * 100.0).round() as u32
}

/// Compact countdown used in the status line.
///
/// * `≤ 0` seconds → `""`
/// * `< 1` hour    → `"12m"`
/// * otherwise     → `"1h05m"`
///
/// # Examples
///
/// ```
/// use meter_core::formatting::format_countdown;
///
/// assert_eq!(format_countdown(0), "");
/// assert_eq!(format_countdown(59), "0m");
/// assert_eq!(format_countdown(12 * 60), "12m");
/// assert_eq!(format_countdown(3_900), "1h05m");
/// ```
pub fn format_countdown(seconds: i64) -> String {
    if seconds <= 0 {
        return String::new();
    }
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours > 0 {
        format!("{}h{:02}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Format a duration in minutes as a human-readable string.
///
/// * `< 60` minutes → `"45m"`
/// * `≥ 60` minutes, no remainder → `"3h"`
/// * `≥ 60` minutes, with remainder → `"3h 45m"`
///
/// # Examples
///
/// ```
/// use meter_core::formatting::format_time;
///
/// assert_eq!(format_time(45.0),  "45m");
/// assert_eq!(format_time(60.0),  "1h");
/// assert_eq!(format_time(225.0), "3h 45m");
/// assert_eq!(format_time(0.0),   "0m");
/// ```
pub fn format_time(minutes: f64) -> String {
    let total_mins = minutes.round().max(0.0) as i64;
    if total_mins < 60 {
        format!("{}m", total_mins)
    } else {
        let hours = total_mins / 60;
        let mins = total_mins % 60;
        if mins == 0 {
            format!("{}h", hours)
        } else {
            format!("{}h {}m", hours, mins)
        }
    }
}
