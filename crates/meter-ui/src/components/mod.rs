//! Line-level building blocks shared by the status line and the panel.

pub mod gauge;
pub mod header;
pub mod reset_row;
pub mod status_line;

use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

/// Display width of a run of spans in terminal cells.
pub fn spans_width(spans: &[Span<'_>]) -> usize {
    spans.iter().map(|s| s.content.width()).sum()
}

/// Join `left` and `right` into one line, padding so `right` ends at column
/// `width`. At least one space separates the two halves.
pub fn align_ends<'a>(left: Vec<Span<'a>>, right: Vec<Span<'a>>, width: usize) -> Line<'a> {
    let used = spans_width(&left) + spans_width(&right);
    let gap = width.saturating_sub(used).max(1);

    let mut spans = left;
    spans.push(Span::raw(" ".repeat(gap)));
    spans.extend(right);
    Line::from(spans)
}

/// Concatenated text of a line, for assertions.
#[cfg(test)]
pub(crate) fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}
