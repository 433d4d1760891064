use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::classifier::Menu;
use crate::tui::app::{App, Session};
use crate::util::unicode;

/// Key hints for whatever the keys currently address
fn key_hints(app: &App) -> &'static str {
    match &app.session {
        Session::Marker { .. } => {
            "k/\u{2192} +1  j/\u{2190} -1  l/h \u{00b1}10  1 start  c cross  2 end  ? help  q quit"
        }
        Session::Classifier { state, .. } => match state.menu() {
            Menu::Main => "j/k \u{00b1}1  h/l \u{00b1}10  u/i prev/next  0 no drop  1 drop  2 flag  q quit",
            Menu::Flag => "w/e/r preset  t custom  2 back  j/k/h/l scrub",
            Menu::CustomText(_) => "Enter submit  Esc cancel  Backspace delete",
        },
    }
}

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let text = if app.show_key_hints {
        unicode::truncate_to_width(key_hints(app), area.width as usize)
    } else {
        "? help".to_string()
    };
    let line = Line::from(Span::styled(text, Style::default().fg(app.theme.dim).bg(bg)));
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
}

/// Render the transient notice line above the status row
pub fn render_notice(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let line = match &app.notice {
        Some(notice) => Line::from(Span::styled(
            unicode::truncate_to_width(&notice.text, area.width as usize),
            Style::default().fg(app.theme.notice_color(notice.level)).bg(bg),
        )),
        None => Line::from(""),
    };
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::Notice;
    use crate::tui::input::handle_key;
    use crate::tui::render::test_helpers::*;
    use tempfile::TempDir;

    #[test]
    fn hints_follow_the_menu() {
        let tmp = TempDir::new().unwrap();
        let mut app = classifier_app(tmp.path(), &[(10, 20)], 100);
        handle_key(&mut app, press('2')).unwrap();
        let output = render_to_string(TERM_W, 1, |frame, area| {
            render_status_row(frame, &app, area);
        });
        assert_eq!(output, "w/e/r preset  t custom  2 back  j/k/h/l scrub");
    }

    #[test]
    fn hints_can_be_hidden() {
        let tmp = TempDir::new().unwrap();
        let mut app = marker_app(tmp.path(), 100);
        app.show_key_hints = false;
        let output = render_to_string(TERM_W, 1, |frame, area| {
            render_status_row(frame, &app, area);
        });
        assert_eq!(output, "? help");
    }

    #[test]
    fn notice_is_shown() {
        let tmp = TempDir::new().unwrap();
        let mut app = marker_app(tmp.path(), 100);
        app.set_notice(Notice::success("Attempt 1 recorded!"));
        let output = render_to_string(TERM_W, 1, |frame, area| {
            render_notice(frame, &app, area);
        });
        assert_eq!(output, "Attempt 1 recorded!");
    }
}
