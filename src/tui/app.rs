use std::io;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::StoreError;
use crate::io::attempt_io::AttemptStore;
use crate::io::classification_io::ClassificationStore;
use crate::model::attempt::LoadedAttempt;
use crate::model::config::UiConfig;
use crate::ops::Notice;
use crate::ops::classifier::ClassifierState;
use crate::ops::marker::MarkerState;
use crate::video::{FrameSource, RgbImage};

use super::input;
use super::render;
use super::theme::Theme;

/// Key presses a notice stays on screen
const NOTICE_TTL: u8 = 4;

/// Error type for the interactive loop
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The annotation workflow driving the loop, with the store it commits to
pub enum Session {
    Marker {
        state: MarkerState,
        store: AttemptStore,
    },
    Classifier {
        state: ClassifierState,
        /// Source rows, parallel to the state's attempt sequence
        loaded: Vec<LoadedAttempt>,
        store: ClassificationStore,
        /// Rows appended during this session
        committed: usize,
    },
}

/// Main application state
pub struct App {
    pub session: Session,
    pub source: Box<dyn FrameSource>,
    pub theme: Theme,
    /// Video file name shown in the header
    pub title: String,
    pub show_help: bool,
    pub show_key_hints: bool,
    pub notice: Option<Notice>,
    notice_ttl: u8,
    /// Decoded image for `image_frame`
    pub image: Option<RgbImage>,
    pub image_frame: Option<u64>,
    pub should_quit: bool,
    /// Every attempt was classified
    pub finished: bool,
}

impl App {
    pub fn new(
        session: Session,
        source: Box<dyn FrameSource>,
        ui: &UiConfig,
        title: impl Into<String>,
    ) -> Self {
        App {
            session,
            source,
            theme: Theme::from_config(ui),
            title: title.into(),
            show_help: false,
            show_key_hints: ui.show_key_hints,
            notice: None,
            notice_ttl: 0,
            image: None,
            image_frame: None,
            should_quit: false,
            finished: false,
        }
    }

    /// Frame the active state machine points at
    pub fn cursor(&self) -> u64 {
        match &self.session {
            Session::Marker { state, .. } => state.cursor(),
            Session::Classifier { state, .. } => state.cursor(),
        }
    }

    fn step_cursor(&mut self) {
        match &mut self.session {
            Session::Marker { state, .. } => {
                state.advance(1);
            }
            Session::Classifier { state, .. } => state.advance(1),
        }
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
        self.notice_ttl = NOTICE_TTL;
    }

    /// Age the current notice by one key press.
    pub fn tick_notice(&mut self) {
        if self.notice_ttl > 0 {
            self.notice_ttl -= 1;
        }
        if self.notice_ttl == 0 {
            self.notice = None;
        }
    }

    /// Decode the frame under the cursor if it is not the one on screen.
    ///
    /// A frame that fails to decode is skipped: the cursor moves forward one
    /// frame and the read is retried, up to the end of the video.
    pub fn refresh_frame(&mut self) {
        let last = self.source.info().last_frame();
        loop {
            let cursor = self.cursor();
            if self.image_frame == Some(cursor) && self.image.is_some() {
                return;
            }
            match self.source.frame(cursor) {
                Ok(image) => {
                    self.image = Some(image);
                    self.image_frame = Some(cursor);
                    return;
                }
                Err(e) => {
                    tracing::warn!(frame = cursor, error = %e, "could not read frame");
                    if cursor >= last {
                        self.image = None;
                        self.image_frame = None;
                        self.set_notice(Notice::warning(format!(
                            "Warning: could not read frame {}",
                            cursor
                        )));
                        return;
                    }
                    self.step_cursor();
                }
            }
        }
    }
}

/// Take over the terminal and run `app` until the operator quits, the
/// session finishes or a store write fails.
pub fn run(app: &mut App) -> Result<(), AppError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), AppError> {
    loop {
        app.refresh_frame();
        terminal.draw(|frame| render::render(frame, app))?;

        // Blocks until the operator does something; nothing advances on its own
        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key)?;
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
