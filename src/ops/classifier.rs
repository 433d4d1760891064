use crate::model::attempt::Attempt;
use crate::model::classification::{Classification, Verdict};
use crate::ops::{Key, Notice, clamp_step};
use crate::util::unicode;

/// Which menu the classifier keys currently address
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Menu {
    Main,
    Flag,
    /// Typing a custom flag reason; holds the text entered so far
    CustomText(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierEffect {
    /// Persist `classification` for the attempt at `index` in the sequence
    Commit {
        index: usize,
        classification: Classification,
    },
    Notice(Notice),
    /// Every remaining attempt has been classified
    Finished,
    Quit,
}

/// Walks a fixed sequence of attempts, committing one verdict per attempt.
#[derive(Debug, Clone)]
pub struct ClassifierState {
    attempts: Vec<Attempt>,
    /// Attempts already classified in an earlier session
    skip: Vec<bool>,
    index: usize,
    cursor: u64,
    total_frames: u64,
    large_step: u64,
    menu: Menu,
    finished: bool,
}

impl ClassifierState {
    pub fn new(attempts: Vec<Attempt>, total_frames: u64) -> Self {
        let skip = vec![false; attempts.len()];
        let mut state = ClassifierState {
            attempts,
            skip,
            index: 0,
            cursor: 0,
            total_frames,
            large_step: 10,
            menu: Menu::Main,
            finished: false,
        };
        state.enter(0);
        state
    }

    pub fn with_large_step(mut self, step: u64) -> Self {
        self.large_step = step.max(1);
        self
    }

    /// Skip the attempts marked `true` when moving on after a commit. The
    /// session starts at the first attempt not skipped.
    pub fn with_skipped(mut self, skip: Vec<bool>) -> Self {
        self.skip = skip;
        self.skip.resize(self.attempts.len(), false);
        match self.next_pending(0) {
            Some(i) => self.enter(i),
            None => self.finished = true,
        }
        self
    }

    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&Attempt> {
        self.attempts.get(self.index)
    }

    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    /// No attempt is left to classify
    pub fn is_finished(&self) -> bool {
        self.finished || self.attempts.is_empty()
    }

    /// Number of attempts not yet skipped or committed past
    pub fn remaining(&self) -> usize {
        if self.is_finished() {
            return 0;
        }
        (self.index..self.attempts.len())
            .filter(|&i| !self.skip[i])
            .count()
    }

    pub fn handle_key(&mut self, key: Key) -> Vec<ClassifierEffect> {
        if self.is_finished() {
            return vec![ClassifierEffect::Finished];
        }
        match self.menu.clone() {
            Menu::Main => self.handle_main(key),
            Menu::Flag => self.handle_flag(key),
            Menu::CustomText(text) => self.handle_text(key, text),
        }
    }

    fn handle_main(&mut self, key: Key) -> Vec<ClassifierEffect> {
        match key {
            Key::Char('u') => self.previous_attempt(),
            Key::Char('i') => self.next_attempt(),
            Key::Char('0') => self.commit_verdict(Verdict::NoDrop),
            Key::Char('1') => self.commit_verdict(Verdict::Drop),
            Key::Char('2') => {
                self.menu = Menu::Flag;
                Vec::new()
            }
            Key::Char('q') => vec![ClassifierEffect::Quit],
            other => self.motion(other),
        }
    }

    fn handle_flag(&mut self, key: Key) -> Vec<ClassifierEffect> {
        match key {
            Key::Char('w') => self.commit_verdict(Verdict::FingersDidNotCross),
            Key::Char('e') => self.commit_verdict(Verdict::FingersMightNotHaveCrossed),
            Key::Char('r') => self.commit_verdict(Verdict::NeedsManualReview),
            Key::Char('t') => {
                self.menu = Menu::CustomText(String::new());
                Vec::new()
            }
            Key::Char('2') => {
                self.menu = Menu::Main;
                Vec::new()
            }
            other => self.motion(other),
        }
    }

    fn handle_text(&mut self, key: Key, mut text: String) -> Vec<ClassifierEffect> {
        match key {
            Key::Esc => self.menu = Menu::Flag,
            Key::Backspace => {
                unicode::pop_grapheme(&mut text);
                self.menu = Menu::CustomText(text);
            }
            Key::Enter => {
                let Some(attempt) = self.current() else {
                    return Vec::new();
                };
                return match Classification::custom(attempt.number, &text) {
                    Some(classification) => self.commit(classification),
                    None => vec![ClassifierEffect::Notice(Notice::warning(
                        "Type a reason before pressing Enter",
                    ))],
                };
            }
            Key::Char(c) if !c.is_control() => {
                text.push(c);
                self.menu = Menu::CustomText(text);
            }
            _ => {}
        }
        Vec::new()
    }

    /// Frame motion shared by the main and flag menus. The cursor may leave
    /// the attempt's interval but never the video.
    fn motion(&mut self, key: Key) -> Vec<ClassifierEffect> {
        let large = self.large_step as i64;
        let delta = match key {
            Key::Char('k') | Key::Right => 1,
            Key::Char('j') | Key::Left => -1,
            Key::Char('l') => large,
            Key::Char('h') => -large,
            _ => return Vec::new(),
        };
        self.advance(delta);
        Vec::new()
    }

    /// Move the cursor without changing attempt or menu.
    pub fn advance(&mut self, delta: i64) {
        self.cursor = clamp_step(self.cursor, delta, self.total_frames);
    }

    /// Abandon the current attempt and move to the previous one.
    pub fn previous_attempt(&mut self) -> Vec<ClassifierEffect> {
        if self.index == 0 {
            return vec![ClassifierEffect::Notice(Notice::info(
                "Already at first attempt",
            ))];
        }
        self.enter(self.index - 1);
        tracing::debug!(attempt = self.index + 1, "jumped to previous attempt");
        vec![ClassifierEffect::Notice(Notice::info(format!(
            "Jumped to attempt {}",
            self.index + 1
        )))]
    }

    /// Abandon the current attempt and move to the next one.
    pub fn next_attempt(&mut self) -> Vec<ClassifierEffect> {
        if self.index + 1 >= self.attempts.len() {
            return vec![ClassifierEffect::Notice(Notice::info(
                "Already at last attempt",
            ))];
        }
        self.enter(self.index + 1);
        tracing::debug!(attempt = self.index + 1, "jumped to next attempt");
        vec![ClassifierEffect::Notice(Notice::info(format!(
            "Jumped to attempt {}",
            self.index + 1
        )))]
    }

    fn commit_verdict(&mut self, verdict: Verdict) -> Vec<ClassifierEffect> {
        let Some(attempt) = self.current() else {
            return Vec::new();
        };
        let classification = if verdict.is_flagged() {
            Classification::preset(attempt.number, verdict)
        } else {
            Classification::direct(attempt.number, verdict)
        };
        self.commit(classification)
    }

    /// Emit the commit for the current attempt and move to the next one
    /// still pending, finishing the session when none is left.
    fn commit(&mut self, classification: Classification) -> Vec<ClassifierEffect> {
        let index = self.index;
        tracing::info!(
            attempt = classification.attempt_ref,
            verdict = classification.verdict.code(),
            flagged = classification.is_flagged(),
            "attempt classified"
        );
        let text = if classification.is_flagged() {
            format!(
                "Attempt {} flagged: {}",
                classification.attempt_ref, classification.reason
            )
        } else {
            format!(
                "Attempt {} saved as {}",
                classification.attempt_ref,
                classification.verdict.label()
            )
        };
        let mut effects = vec![
            ClassifierEffect::Commit {
                index,
                classification,
            },
            ClassifierEffect::Notice(Notice::success(text)),
        ];

        match self.next_pending(index + 1) {
            Some(next) => self.enter(next),
            None => {
                self.finished = true;
                self.menu = Menu::Main;
                effects.push(ClassifierEffect::Finished);
            }
        }
        effects
    }

    fn next_pending(&self, from: usize) -> Option<usize> {
        (from..self.attempts.len()).find(|&i| !self.skip[i])
    }

    fn enter(&mut self, index: usize) {
        self.index = index;
        self.menu = Menu::Main;
        if let Some(attempt) = self.attempts.get(index) {
            self.cursor = attempt.start.frame.min(self.total_frames.saturating_sub(1));
        }
    }
}
