use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`.  Background values
/// 0–6 are considered dark; 7–15 are considered light.  If the variable is
/// absent or unparseable, `BackgroundType::Unknown` is returned.
pub fn detect_background() -> BackgroundType {
    match std::env::var("COLORFGBG") {
        Ok(val) => background_from_colorfgbg(&val),
        Err(_) => BackgroundType::Unknown,
    }
}

fn background_from_colorfgbg(val: &str) -> BackgroundType {
    match val.split(';').next_back().and_then(|bg| bg.parse::<u8>().ok()) {
        Some(bg) if bg <= 6 => BackgroundType::Dark,
        Some(_) => BackgroundType::Light,
        None => BackgroundType::Unknown,
    }
}

/// Which usage limit a gauge is drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Track {
    Session,
    Weekly,
}

/// Every style used by meter-ui components.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub bolt: Style,
    pub separator: Style,
    pub toggle: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub label: Style,
    /// The large percentage figure.
    pub value: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub info: Style,
    pub error: Style,

    // ── Gauges ───────────────────────────────────────────────────────────────
    /// Session fill below 50 %.
    pub session_low: Style,
    /// Weekly fill below 50 %.
    pub weekly_low: Style,
    /// Either fill between 50 % and 80 %.
    pub gauge_medium: Style,
    /// Either fill at or above 80 %.
    pub gauge_high: Style,
    /// Unfilled portion of a gauge.
    pub gauge_empty: Style,

    // ── Footer ───────────────────────────────────────────────────────────────
    pub hint_key: Style,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            bolt: Style::default().fg(Color::Yellow),
            separator: Style::default().fg(Color::DarkGray),
            toggle: Style::default().fg(Color::Cyan),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Cyan),
            error: Style::default().fg(Color::Red),

            session_low: Style::default().fg(Color::Blue),
            weekly_low: Style::default().fg(Color::Green),
            gauge_medium: Style::default().fg(Color::Yellow),
            gauge_high: Style::default().fg(Color::Red),
            gauge_empty: Style::default().fg(Color::DarkGray),

            hint_key: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Light-background terminal theme.
    ///
    /// Uses dark colours for text so content stays legible against a
    /// white/light-grey terminal canvas.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            bolt: Style::default().fg(Color::Magenta),
            separator: Style::default().fg(Color::Gray),
            toggle: Style::default().fg(Color::Blue),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Blue),
            error: Style::default().fg(Color::Red),

            session_low: Style::default().fg(Color::Blue),
            weekly_low: Style::default().fg(Color::Green),
            gauge_medium: Style::default().fg(Color::Yellow),
            gauge_high: Style::default().fg(Color::Red),
            gauge_empty: Style::default().fg(Color::Gray),

            hint_key: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Classic terminal theme using only the basic 8-colour ANSI palette.
    ///
    /// No bold modifiers, for minimal terminal emulators.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::White),
            bolt: Style::default().fg(Color::Yellow),
            separator: Style::default().fg(Color::DarkGray),
            toggle: Style::default().fg(Color::Cyan),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White),

            info: Style::default().fg(Color::Cyan),
            error: Style::default().fg(Color::Red),

            session_low: Style::default().fg(Color::Blue),
            weekly_low: Style::default().fg(Color::Green),
            gauge_medium: Style::default().fg(Color::Yellow),
            gauge_high: Style::default().fg(Color::Red),
            gauge_empty: Style::default().fg(Color::DarkGray),

            hint_key: Style::default().fg(Color::Cyan),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Construct a theme by name.  Falls back to `auto_detect` for unknown
    /// names.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Fill style for a gauge at `fraction` of its limit.
    ///
    /// * `< 50 %`  → `session_low` / `weekly_low`
    /// * `50–80 %` → `gauge_medium`
    /// * `≥ 80 %`  → `gauge_high`
    pub fn gauge_style(&self, track: Track, fraction: f64) -> Style {
        if fraction >= 0.8 {
            self.gauge_high
        } else if fraction >= 0.5 {
            self.gauge_medium
        } else {
            match track {
                Track::Session => self.session_low,
                Track::Weekly => self.weekly_low,
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
