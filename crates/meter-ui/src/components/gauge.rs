use crate::themes::{Theme, Track};
use ratatui::text::Span;

/// Configuration controlling the visual appearance of a gauge.
#[derive(Debug, Clone, Copy)]
pub struct GaugeConfig {
    /// Number of cells in the bar.
    pub width: u16,
    /// Character used for the filled portion.
    pub filled_char: char,
    /// Character used for the empty portion.
    pub empty_char: char,
    /// Draw at least one filled cell so a non-zero gauge never looks empty.
    pub min_one: bool,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self {
            width: 15,
            filled_char: '\u{2588}', // █  FULL BLOCK
            empty_char: '\u{2591}',  // ░  LIGHT SHADE
            min_one: true,
        }
    }
}

/// Number of filled cells for `fraction` on a `width`-cell gauge.
pub fn filled_cells(fraction: f64, width: u16, min_one: bool) -> u16 {
    let filled = (fraction.clamp(0.0, 1.0) * width as f64).round() as u16;
    let floor = if min_one { 1 } else { 0 };
    filled.max(floor).min(width)
}

/// Horizontal usage gauge for one limit.
pub struct UsageGauge<'a> {
    /// Fraction of the limit consumed.
    pub fraction: f64,
    pub track: Track,
    pub theme: &'a Theme,
    pub config: GaugeConfig,
}

impl<'a> UsageGauge<'a> {
    pub fn new(fraction: f64, track: Track, theme: &'a Theme) -> Self {
        Self {
            fraction,
            track,
            theme,
            config: GaugeConfig::default(),
        }
    }

    pub fn with_width(mut self, width: u16) -> Self {
        self.config.width = width;
        self
    }

    /// Filled and empty portions as two styled spans.
    pub fn to_spans(&self) -> Vec<Span<'a>> {
        let filled = filled_cells(self.fraction, self.config.width, self.config.min_one);
        let empty = self.config.width.saturating_sub(filled);

        let filled_str: String =
            std::iter::repeat_n(self.config.filled_char, filled as usize).collect();
        let empty_str: String =
            std::iter::repeat_n(self.config.empty_char, empty as usize).collect();

        vec![
            Span::styled(filled_str, self.theme.gauge_style(self.track, self.fraction)),
            Span::styled(empty_str, self.theme.gauge_empty),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
