use crate::model::attempt::{Attempt, FrameMark};
use crate::ops::{Key, Notice, clamp_step};

/// Where the operator is in building the next attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerPhase {
    Idle,
    Started,
    StartedCrossed,
}

/// Side effect requested by a marker transition. The caller applies them
/// in order; store failures are fatal there.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerEffect {
    /// Append a newly committed attempt
    Commit(Attempt),
    /// Replace the whole table with `kept` after `removed` were invalidated
    Rewrite { kept: Vec<Attempt>, removed: Vec<u32> },
    Notice(Notice),
    Quit,
}

/// Interval-marking state: a frame cursor, the marks pending for the next
/// attempt and the attempts committed so far.
#[derive(Debug, Clone)]
pub struct MarkerState {
    cursor: u64,
    total_frames: u64,
    fps: f64,
    large_step: u64,
    pending_start: Option<FrameMark>,
    pending_cross: Option<FrameMark>,
    attempts: Vec<Attempt>,
    next_number: u32,
}

impl MarkerState {
    pub fn new(total_frames: u64, fps: f64) -> Self {
        MarkerState {
            cursor: 0,
            total_frames,
            fps,
            large_step: 10,
            pending_start: None,
            pending_cross: None,
            attempts: Vec::new(),
            next_number: 1,
        }
    }

    /// Continue a session from attempts already on disk. The cursor lands
    /// just after the latest committed end frame.
    pub fn resume(total_frames: u64, fps: f64, attempts: Vec<Attempt>) -> Self {
        let mut state = MarkerState::new(total_frames, fps);
        if let Some(last_end) = attempts.iter().map(|a| a.end.frame).max() {
            state.cursor = clamp_step(last_end, 1, total_frames);
        }
        state.next_number = attempts.iter().map(|a| a.number).max().unwrap_or(0) + 1;
        state.attempts = attempts;
        state
    }

    pub fn with_large_step(mut self, step: u64) -> Self {
        self.large_step = step.max(1);
        self
    }

    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    pub fn next_number(&self) -> u32 {
        self.next_number
    }

    pub fn pending_start(&self) -> Option<FrameMark> {
        self.pending_start
    }

    pub fn pending_cross(&self) -> Option<FrameMark> {
        self.pending_cross
    }

    pub fn phase(&self) -> MarkerPhase {
        match (self.pending_start, self.pending_cross) {
            (None, _) => MarkerPhase::Idle,
            (Some(_), None) => MarkerPhase::Started,
            (Some(_), Some(_)) => MarkerPhase::StartedCrossed,
        }
    }

    /// Dispatch one key press. Unbound keys do nothing.
    pub fn handle_key(&mut self, key: Key) -> Vec<MarkerEffect> {
        let large = self.large_step as i64;
        match key {
            Key::Char('k') | Key::Char(' ') | Key::Right => self.advance(1),
            Key::Char('j') | Key::Char('r') | Key::Left => self.advance(-1),
            Key::Char('l') => self.advance(large),
            Key::Char('h') => self.advance(-large),
            Key::Char('1') => self.mark_start(),
            Key::Char('c') => self.mark_cross(),
            Key::Char('2') => self.mark_end(),
            Key::Char('q') => vec![MarkerEffect::Quit],
            _ => Vec::new(),
        }
    }

    /// Move the cursor by `delta` frames. Moving backward invalidates
    /// everything at or past the new position.
    pub fn advance(&mut self, delta: i64) -> Vec<MarkerEffect> {
        let target = clamp_step(self.cursor, delta, self.total_frames);
        if target == self.cursor {
            let text = if delta < 0 {
                "Already at the beginning of the video"
            } else {
                "End of video reached"
            };
            return vec![MarkerEffect::Notice(Notice::info(text))];
        }
        self.cursor = target;
        if delta < 0 {
            self.invalidate_from(target)
        } else {
            Vec::new()
        }
    }

    /// Drop every committed attempt whose end frame is `>= frame` and every
    /// pending mark at or past it. Survivors are renumbered `1..N` and the
    /// next attempt continues from there.
    pub fn invalidate_from(&mut self, frame: u64) -> Vec<MarkerEffect> {
        let mut effects = Vec::new();

        if self.pending_start.is_some_and(|s| s.frame >= frame) {
            self.pending_start = None;
            self.pending_cross = None;
        } else if self.pending_cross.is_some_and(|c| c.frame >= frame) {
            self.pending_cross = None;
        }

        let (removed, kept): (Vec<Attempt>, Vec<Attempt>) = self
            .attempts
            .drain(..)
            .partition(|a| a.end.frame >= frame);
        self.attempts = kept;
        for (i, attempt) in self.attempts.iter_mut().enumerate() {
            attempt.number = i as u32 + 1;
        }
        self.next_number = self.attempts.iter().map(|a| a.number).max().unwrap_or(0) + 1;

        if !removed.is_empty() {
            let numbers: Vec<u32> = removed.iter().map(|a| a.number).collect();
            tracing::info!(frame, erased = ?numbers, "attempts invalidated by rewind");
            effects.push(MarkerEffect::Rewrite {
                kept: self.attempts.clone(),
                removed: numbers.clone(),
            });
            effects.push(MarkerEffect::Notice(Notice::warning(erased_text(&numbers))));
        }
        effects
    }

    /// Start a new attempt at the cursor, replacing any pending one.
    pub fn mark_start(&mut self) -> Vec<MarkerEffect> {
        let mark = FrameMark::at(self.cursor, self.fps);
        self.pending_start = Some(mark);
        self.pending_cross = None;
        tracing::debug!(attempt = self.next_number, frame = mark.frame, "start marked");
        vec![MarkerEffect::Notice(Notice::info(format!(
            "Attempt {} start marked at frame {}",
            self.next_number, mark.frame
        )))]
    }

    pub fn mark_cross(&mut self) -> Vec<MarkerEffect> {
        let Some(start) = self.pending_start else {
            return vec![MarkerEffect::Notice(Notice::warning(
                "Press 1 to mark a start before marking the cross",
            ))];
        };
        if self.cursor < start.frame {
            return vec![MarkerEffect::Notice(Notice::warning(format!(
                "Cross must not be before the start (frame {})",
                start.frame
            )))];
        }
        let mark = FrameMark::at(self.cursor, self.fps);
        self.pending_cross = Some(mark);
        tracing::debug!(attempt = self.next_number, frame = mark.frame, "cross marked");
        vec![MarkerEffect::Notice(Notice::info(format!(
            "Attempt {} cross marked at frame {}",
            self.next_number, mark.frame
        )))]
    }

    /// Close the pending attempt at the cursor and commit it.
    pub fn mark_end(&mut self) -> Vec<MarkerEffect> {
        let Some(start) = self.pending_start else {
            return vec![MarkerEffect::Notice(Notice::warning(
                "Press 1 to mark a start before marking the end",
            ))];
        };
        if self.cursor < start.frame {
            return vec![MarkerEffect::Notice(Notice::warning(format!(
                "End must not be before the start (frame {})",
                start.frame
            )))];
        }

        let attempt = Attempt::new(
            self.next_number,
            start,
            FrameMark::at(self.cursor, self.fps),
            self.pending_cross.take(),
        );
        self.pending_start = None;
        self.attempts.push(attempt.clone());
        self.next_number += 1;
        tracing::info!(
            attempt = attempt.number,
            start = attempt.start.frame,
            end = attempt.end.frame,
            cross = ?attempt.cross.map(|c| c.frame),
            "attempt committed"
        );

        let text = format!("Attempt {} recorded!", attempt.number);
        vec![
            MarkerEffect::Commit(attempt),
            MarkerEffect::Notice(Notice::success(text)),
        ]
    }
}

fn erased_text(numbers: &[u32]) -> String {
    match numbers {
        [n] => format!("Attempt {} erased!", n),
        _ => {
            let list: Vec<String> = numbers.iter().map(|n| n.to_string()).collect();
            format!("Attempts {} erased!", list.join(", "))
        }
    }
}
