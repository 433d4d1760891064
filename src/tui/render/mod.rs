pub mod classifier_panel;
pub mod frame_view;
pub mod header;
pub mod help_overlay;
mod helpers;
pub mod marker_panel;
pub mod status_row;

#[cfg(test)]
pub(crate) mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::{App, Session};

/// Width of the side panel next to the frame
const PANEL_WIDTH: u16 = 38;
/// Below this many columns for the frame, only the panel is shown
const MIN_FRAME_WIDTH: u16 = 16;

/// Draw the whole screen
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: header | body | notice | status row
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    header::render_header(frame, app, chunks[0]);

    let body = chunks[1];
    let panel_area = if body.width >= PANEL_WIDTH + MIN_FRAME_WIDTH {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(MIN_FRAME_WIDTH), Constraint::Length(PANEL_WIDTH)])
            .split(body);
        frame_view::render_frame_view(frame, app, columns[0]);
        columns[1]
    } else {
        body
    };

    match &app.session {
        Session::Marker { state, .. } => {
            marker_panel::render_marker_panel(frame, app, state, panel_area)
        }
        Session::Classifier { state, .. } => {
            classifier_panel::render_classifier_panel(frame, app, state, panel_area)
        }
    }

    status_row::render_notice(frame, app, chunks[2]);
    status_row::render_status_row(frame, app, chunks[3]);

    // Help overlay (rendered on top of everything)
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, frame.area());
    }
}
