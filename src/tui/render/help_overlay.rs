use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, Session};

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    // Center the overlay, leaving some margin
    let overlay_area = centered_rect(60, 80, area);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(" Key Bindings", header_style)));
    lines.push(Line::from(""));

    let mut add = |key: &'static str, desc: &'static str| {
        add_binding(&mut lines, key, desc, key_style, desc_style)
    };
    match &app.session {
        Session::Marker { .. } => {
            add(" k/\u{2192}/Space", "Next frame");
            add(" j/\u{2190}/r", "Previous frame (erases attempts ending here or later)");
            add(" l / h", "Forward / back 10 frames");
            add(" 1", "Mark attempt start");
            add(" c", "Mark fingers crossing");
            add(" 2", "Mark attempt end and record it");
            add(" q", "Quit (recorded attempts are saved)");
        }
        Session::Classifier { .. } => {
            add(" k / j", "Next / previous frame");
            add(" l / h", "Forward / back 10 frames");
            add(" u / i", "Previous / next attempt (no verdict)");
            add(" 0", "No drop");
            add(" 1", "Drop");
            add(" 2", "Flag options / back");
            add(" w e r", "Preset flag reasons");
            add(" t", "Type a custom flag reason");
            add(" q", "Quit (classified attempts are saved)");
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Press any key to close",
        Style::default().fg(app.theme.dim).bg(bg),
    )));

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));

    frame.render_widget(paragraph, overlay_area);
}

fn add_binding<'a>(
    lines: &mut Vec<Line<'a>>,
    key: &'a str,
    desc: &'a str,
    key_style: Style,
    desc_style: Style,
) {
    let key_width = 16;
    let padded_key = format!("{:<width$}", key, width = key_width);
    lines.push(Line::from(vec![
        Span::styled(padded_key, key_style),
        Span::styled(desc, desc_style),
    ]));
}

/// Create a centered rectangle of the given percentage of the parent
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
