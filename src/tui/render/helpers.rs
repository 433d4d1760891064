use ratatui::style::Style;
use ratatui::text::{Line, Span};

use crate::model::attempt::Attempt;
use crate::util::unicode;

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

/// `left` followed by `right` pushed to the far edge of `width` cells.
/// `right` is dropped when both do not fit.
pub(super) fn split_line<'a>(
    mut left: Vec<Span<'a>>,
    right: Vec<Span<'a>>,
    width: usize,
    fill: Style,
) -> Line<'a> {
    let used = spans_width(&left);
    let right_width = spans_width(&right);
    if used + right_width < width {
        left.push(Span::styled(" ".repeat(width - used - right_width), fill));
        left.extend(right);
    }
    Line::from(left)
}

/// Seconds with two decimals, as shown next to frame numbers
pub(super) fn seconds(time: f64) -> String {
    format!("{:.2}s", time)
}

/// "10–20" frame span of an attempt
pub(super) fn frame_range(attempt: &Attempt) -> String {
    format!("{}\u{2013}{}", attempt.start.frame, attempt.end.frame)
}
