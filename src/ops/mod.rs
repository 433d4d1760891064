pub mod classifier;
pub mod marker;

/// Terminal-independent key press, as seen by the annotation state machines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
}

/// A short message shown to the operator after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }
}

/// Move `cursor` by `delta` frames, clamped to `[0, total_frames - 1]`.
pub fn clamp_step(cursor: u64, delta: i64, total_frames: u64) -> u64 {
    let last = total_frames.saturating_sub(1);
    let target = if delta < 0 {
        cursor.saturating_sub(delta.unsigned_abs())
    } else {
        cursor.saturating_add(delta as u64)
    };
    target.min(last)
}
