use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::helpers::{frame_range, seconds};
use crate::model::attempt::FrameMark;
use crate::ops::marker::{MarkerPhase, MarkerState};
use crate::tui::app::App;
use crate::tui::theme::Theme;

fn mark_text(mark: Option<FrameMark>) -> String {
    match mark {
        Some(m) => format!("frame {} ({})", m.frame, seconds(m.time)),
        None => "\u{2014}".to_string(),
    }
}

/// Side panel for the marker: pending marks and the committed attempts,
/// newest at the bottom
pub fn render_marker_panel(frame: &mut Frame, app: &App, state: &MarkerState, area: Rect) {
    let theme: &Theme = &app.theme;
    let bg = theme.background;
    let label = Style::default().fg(theme.dim).bg(bg);
    let value = Style::default().fg(theme.text_bright).bg(bg);
    let header = Style::default()
        .fg(theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let phase = match state.phase() {
        MarkerPhase::Idle => Span::styled("idle", label),
        MarkerPhase::Started => Span::styled("started", Style::default().fg(theme.yellow).bg(bg)),
        MarkerPhase::StartedCrossed => {
            Span::styled("crossed", Style::default().fg(theme.cyan).bg(bg))
        }
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!(" Attempt {} ", state.next_number()), header),
            phase,
        ]),
        Line::from(vec![
            Span::styled(" Start  ", label),
            Span::styled(mark_text(state.pending_start()), value),
        ]),
        Line::from(vec![
            Span::styled(" Cross  ", label),
            Span::styled(mark_text(state.pending_cross()), value),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!(" Recorded ({})", state.attempts().len()),
            header,
        )),
    ];

    let room = (area.height as usize).saturating_sub(lines.len());
    let attempts = state.attempts();
    let first_shown = if attempts.len() > room && room > 0 {
        let skipped = attempts.len() - (room - 1);
        lines.push(Line::from(Span::styled(
            format!(" \u{2026} {} earlier", skipped),
            label,
        )));
        skipped
    } else {
        0
    };
    for attempt in &attempts[first_shown..] {
        let mut spans = vec![
            Span::styled(
                format!(" #{:<3}", attempt.number),
                Style::default().fg(theme.green).bg(bg),
            ),
            Span::styled(frame_range(attempt), value),
        ];
        if let Some(cross) = attempt.cross {
            spans.push(Span::styled(format!("  x{}", cross.frame), label));
        }
        lines.push(Line::from(spans));
    }

    let block = Block::default()
        .borders(Borders::LEFT)
        .border_style(Style::default().fg(theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
