use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::helpers::{frame_range, seconds};
use crate::model::classification::Verdict;
use crate::ops::classifier::{ClassifierState, Menu};
use crate::tui::app::App;
use crate::util::unicode;

/// Side panel for the classifier: the attempt under review, where the
/// cursor sits relative to it and the active menu
pub fn render_classifier_panel(
    frame: &mut Frame,
    app: &App,
    state: &ClassifierState,
    area: Rect,
) {
    let theme = &app.theme;
    let bg = theme.background;
    let label = Style::default().fg(theme.dim).bg(bg);
    let value = Style::default().fg(theme.text_bright).bg(bg);
    let header = Style::default()
        .fg(theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let key_style = Style::default()
        .fg(theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let inner_width = area.width.saturating_sub(1) as usize;

    let mut lines: Vec<Line> = Vec::new();
    let Some(attempt) = state.current().filter(|_| !state.is_finished()) else {
        lines.push(Line::from(Span::styled(" All attempts classified", header)));
        let block = Block::default()
            .borders(Borders::LEFT)
            .border_style(label)
            .style(Style::default().bg(bg));
        frame.render_widget(Paragraph::new(lines).block(block), area);
        return;
    };

    lines.push(Line::from(vec![
        Span::styled(format!(" Attempt {}", attempt.number), header),
        Span::styled(format!("  {} left", state.remaining()), label),
    ]));
    lines.push(Line::from(vec![
        Span::styled(" Range  ", label),
        Span::styled(frame_range(attempt), value),
        Span::styled(format!("  {} frames", attempt.frame_span()), label),
    ]));
    lines.push(Line::from(vec![
        Span::styled("        ", label),
        Span::styled(
            format!("{}\u{2013}{}", seconds(attempt.start.time), seconds(attempt.end.time)),
            label,
        ),
    ]));
    let cursor = state.cursor();
    let position = if attempt.contains(cursor) {
        Span::styled("inside", Style::default().fg(theme.green).bg(bg))
    } else if cursor < attempt.start.frame {
        Span::styled("before start", Style::default().fg(theme.yellow).bg(bg))
    } else {
        Span::styled("after end", Style::default().fg(theme.yellow).bg(bg))
    };
    lines.push(Line::from(vec![Span::styled(" Cursor ", label), position]));
    lines.push(Line::from(""));

    let option = |key: &'static str, desc: String| {
        Line::from(vec![
            Span::styled(format!(" {:<3}", key), key_style),
            Span::styled(unicode::truncate_to_width(&desc, inner_width.saturating_sub(4)), value),
        ])
    };

    match state.menu() {
        Menu::Main => {
            lines.push(Line::from(Span::styled(" Classify", header)));
            lines.push(option("0", Verdict::NoDrop.label().to_string()));
            lines.push(option("1", Verdict::Drop.label().to_string()));
            lines.push(option("2", "flag options".to_string()));
            lines.push(option("u/i", "previous / next attempt".to_string()));
            lines.push(option("q", "quit".to_string()));
        }
        Menu::Flag => {
            lines.push(Line::from(Span::styled(
                " Flag options",
                Style::default()
                    .fg(theme.yellow)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            )));
            for (key, verdict) in [
                ("w", Verdict::FingersDidNotCross),
                ("e", Verdict::FingersMightNotHaveCrossed),
                ("r", Verdict::NeedsManualReview),
            ] {
                lines.push(option(key, verdict.preset_reason().unwrap_or_default().to_string()));
            }
            lines.push(option("t", "custom reason".to_string()));
            lines.push(option("2", "back to main menu".to_string()));
        }
        Menu::CustomText(text) => {
            lines.push(Line::from(Span::styled(
                " Type custom reason for flagging:",
                Style::default().fg(theme.red).bg(bg).add_modifier(Modifier::BOLD),
            )));
            let field = Style::default().fg(theme.text_bright).bg(theme.panel_bg);
            let shown = unicode::tail_to_width(text, inner_width.saturating_sub(4));
            lines.push(Line::from(vec![
                Span::styled(" > ", key_style),
                Span::styled(shown, field),
                Span::styled("\u{258C}", Style::default().fg(theme.highlight).bg(bg)),
            ]));
            lines.push(Line::from(Span::styled(
                " Enter submit \u{00b7} Esc cancel",
                label,
            )));
        }
    }

    let block = Block::default()
        .borders(Borders::LEFT)
        .border_style(label)
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
