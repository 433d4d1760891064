mod classifier;
mod marker;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, AppError, Session};
use crate::ops::Key;
use crate::ops::classifier::Menu;

/// Map a terminal key event to the keys the state machines understand
fn to_key(event: KeyEvent) -> Option<Key> {
    match event.code {
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Esc),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        _ => None,
    }
}

/// Whether keys currently go into a text field
fn is_typing(app: &App) -> bool {
    matches!(
        &app.session,
        Session::Classifier { state, .. } if matches!(state.menu(), Menu::CustomText(_))
    )
}

/// Handle a key event. Store failures are returned and end the session.
pub fn handle_key(app: &mut App, event: KeyEvent) -> Result<(), AppError> {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(event.code, KeyCode::Modifier(_)) {
        return Ok(());
    }
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        if event.code == KeyCode::Char('c') {
            tracing::info!("interrupted");
            app.should_quit = true;
        }
        return Ok(());
    }
    app.tick_notice();

    // Help overlay swallows the key that closes it
    if app.show_help {
        app.show_help = false;
        return Ok(());
    }

    let Some(key) = to_key(event) else {
        return Ok(());
    };
    if key == Key::Char('?') && !is_typing(app) {
        app.show_help = true;
        return Ok(());
    }

    if matches!(app.session, Session::Marker { .. }) {
        marker::handle_marker_key(app, key)
    } else {
        classifier::handle_classifier_key(app, key)
    }
}
