use crate::ops::Key;
use crate::ops::marker::MarkerEffect;
use crate::tui::app::{App, AppError, Session};

pub(super) fn handle_marker_key(app: &mut App, key: Key) -> Result<(), AppError> {
    let Session::Marker { state, .. } = &mut app.session else {
        return Ok(());
    };
    let effects = state.handle_key(key);
    apply_marker_effects(app, effects)
}

/// Persist and display the effects of a marker transition, in order.
fn apply_marker_effects(app: &mut App, effects: Vec<MarkerEffect>) -> Result<(), AppError> {
    for effect in effects {
        match effect {
            MarkerEffect::Commit(attempt) => {
                if let Session::Marker { store, .. } = &app.session {
                    store.append(&attempt)?;
                }
            }
            MarkerEffect::Rewrite { kept, .. } => {
                if let Session::Marker { store, .. } = &app.session {
                    store.rewrite(&kept)?;
                }
            }
            MarkerEffect::Notice(notice) => app.set_notice(notice),
            MarkerEffect::Quit => {
                tracing::info!("marker quit");
                app.should_quit = true;
            }
        }
    }
    Ok(())
}
