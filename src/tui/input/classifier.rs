use crate::ops::Key;
use crate::ops::classifier::ClassifierEffect;
use crate::tui::app::{App, AppError, Session};

pub(super) fn handle_classifier_key(app: &mut App, key: Key) -> Result<(), AppError> {
    let Session::Classifier { state, .. } = &mut app.session else {
        return Ok(());
    };
    let effects = state.handle_key(key);
    apply_classifier_effects(app, effects)
}

fn apply_classifier_effects(
    app: &mut App,
    effects: Vec<ClassifierEffect>,
) -> Result<(), AppError> {
    for effect in effects {
        match effect {
            ClassifierEffect::Commit {
                index,
                classification,
            } => {
                if let Session::Classifier {
                    loaded,
                    store,
                    committed,
                    ..
                } = &mut app.session
                    && let Some(attempt) = loaded.get(index)
                {
                    store.append(attempt, &classification)?;
                    *committed += 1;
                }
            }
            ClassifierEffect::Notice(notice) => app.set_notice(notice),
            ClassifierEffect::Finished => {
                tracing::info!("all attempts classified");
                app.finished = true;
                app.should_quit = true;
            }
            ClassifierEffect::Quit => {
                tracing::info!("classifier quit");
                app.should_quit = true;
            }
        }
    }
    Ok(())
}
