use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::attempt_io::{ATTEMPT_COLUMNS, AttemptStore, attempt_to_row};
use crate::io::classification_io::ClassificationStore;
use crate::model::attempt::{Attempt, FrameMark, LoadedAttempt};
use crate::model::config::UiConfig;
use crate::ops::classifier::ClassifierState;
use crate::ops::marker::MarkerState;
use crate::tui::app::{App, Session};
use crate::video::testing::SolidSource;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

pub const FPS: f64 = 30.0;
pub const MARKER_CSV: &str = "clip_attempt_ground_truths.csv";
pub const CLASSIFIER_CSV: &str = "clip_attempt_ground_truths_ground_truth.csv";

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// A plain key press
pub fn press(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

pub fn attempt(number: u32, start: u64, end: u64) -> Attempt {
    Attempt::new(number, FrameMark::at(start, FPS), FrameMark::at(end, FPS), None)
}

/// Marker app writing to `MARKER_CSV` in `dir`, over a solid-color video.
pub fn marker_app(dir: &Path, frames: u64) -> App {
    let (store, attempts) = AttemptStore::open(&dir.join(MARKER_CSV), FPS).unwrap();
    let state = MarkerState::resume(frames, FPS, attempts);
    App::new(
        Session::Marker { state, store },
        Box::new(SolidSource::new(frames, FPS)),
        &UiConfig::default(),
        "clip.mp4",
    )
}

/// Classifier app over canonical attempts at `spans`, writing to
/// `CLASSIFIER_CSV` in `dir`.
pub fn classifier_app(dir: &Path, spans: &[(u64, u64)], frames: u64) -> App {
    let loaded: Vec<LoadedAttempt> = spans
        .iter()
        .enumerate()
        .map(|(i, &(s, e))| {
            let a = attempt(i as u32 + 1, s, e);
            LoadedAttempt {
                key: a.number.to_string(),
                source: attempt_to_row(&a),
                attempt: a,
            }
        })
        .collect();
    let columns: Vec<String> = ATTEMPT_COLUMNS.iter().map(|c| c.to_string()).collect();
    let store = ClassificationStore::open(&dir.join(CLASSIFIER_CSV), &columns).unwrap();
    let state = ClassifierState::new(loaded.iter().map(|l| l.attempt.clone()).collect(), frames);
    App::new(
        Session::Classifier {
            state,
            loaded,
            store,
            committed: 0,
        },
        Box::new(SolidSource::new(frames, FPS)),
        &UiConfig::default(),
        "clip.mp4",
    )
}
