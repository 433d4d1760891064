use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::Paragraph;

use super::helpers::{seconds, split_line};
use crate::model::attempt::frame_time;
use crate::tui::app::{App, Session};

/// Render the header row: tool and video on the left, position on the right
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let fill = Style::default().bg(bg);
    let dim = Style::default().fg(app.theme.dim).bg(bg);
    let bright = Style::default().fg(app.theme.text_bright).bg(bg);

    let (mode, attempt) = match &app.session {
        Session::Marker { state, .. } => ("marker", format!("Attempt {}", state.next_number())),
        Session::Classifier { state, .. } => {
            let text = match state.current() {
                Some(a) if !state.is_finished() => format!(
                    "Attempt {} ({}/{})",
                    a.number,
                    state.index() + 1,
                    state.attempts().len()
                ),
                _ => "No attempts left".to_string(),
            };
            ("classifier", text)
        }
    };

    let info = app.source.info();
    let cursor = app.cursor();
    let left = vec![
        Span::styled(
            " notch ",
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("{} \u{00b7} {}", mode, app.title), dim),
    ];
    let right = vec![
        Span::styled(attempt, Style::default().fg(app.theme.green).bg(bg)),
        Span::styled(" | ", dim),
        Span::styled(format!("Frame: {}/{}", cursor, info.last_frame()), bright),
        Span::styled(" | ", dim),
        Span::styled(
            format!("Time: {} ", seconds(frame_time(cursor, info.fps))),
            bright,
        ),
    ];

    let line = split_line(left, right, area.width as usize, fill);
    frame.render_widget(Paragraph::new(line).style(fill), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;
    use tempfile::TempDir;

    #[test]
    fn marker_header_shows_position() {
        let tmp = TempDir::new().unwrap();
        let mut app = marker_app(tmp.path(), 300);
        crate::tui::input::handle_key(&mut app, press('l')).unwrap();
        let output = render_to_string(TERM_W, 1, |frame, area| {
            render_header(frame, &app, area);
        });
        assert!(output.contains("marker \u{00b7} clip.mp4"));
        assert!(output.contains("Attempt 1"));
        assert!(output.contains("Frame: 10/299"));
        assert!(output.contains("Time: 0.33s"));
    }

    #[test]
    fn classifier_header_counts_attempts() {
        let tmp = TempDir::new().unwrap();
        let app = classifier_app(tmp.path(), &[(10, 20), (30, 40)], 100);
        let output = render_to_string(TERM_W, 1, |frame, area| {
            render_header(frame, &app, area);
        });
        assert!(output.contains("Attempt 1 (1/2)"));
        assert!(output.contains("Frame: 10/99"));
    }
}
