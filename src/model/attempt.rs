use serde::Serialize;

/// A single marked frame together with its timestamp in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameMark {
    pub frame: u64,
    pub time: f64,
}

impl FrameMark {
    /// Mark `frame`, deriving the timestamp from the video frame rate
    pub fn at(frame: u64, fps: f64) -> Self {
        FrameMark {
            frame,
            time: frame_time(frame, fps),
        }
    }
}

/// Seconds from the start of the video to `frame`.
pub fn frame_time(frame: u64, fps: f64) -> f64 {
    if fps > 0.0 { frame as f64 / fps } else { 0.0 }
}

/// A committed `[start, end]` interval, optionally with a cross event inside it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attempt {
    /// 1-based, contiguous in commit order
    pub number: u32,
    pub start: FrameMark,
    pub end: FrameMark,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cross: Option<FrameMark>,
}

impl Attempt {
    pub fn new(number: u32, start: FrameMark, end: FrameMark, cross: Option<FrameMark>) -> Self {
        Attempt {
            number,
            start,
            end,
            cross,
        }
    }

    /// Number of frames covered, inclusive of both ends
    pub fn frame_span(&self) -> u64 {
        self.end.frame.saturating_sub(self.start.frame) + 1
    }

    pub fn contains(&self, frame: u64) -> bool {
        (self.start.frame..=self.end.frame).contains(&frame)
    }
}

/// An attempt loaded from a table for classification, together with the
/// source row so every original column can be carried into the output.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedAttempt {
    pub attempt: Attempt,
    /// Identity of the attempt within its table, used to match classification rows
    pub key: String,
    pub source: crate::model::table::Row,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_mark_derives_time_from_fps() {
        let mark = FrameMark::at(45, 30.0);
        assert_eq!(mark.frame, 45);
        assert_eq!(mark.time, 1.5);
    }

    #[test]
    fn zero_fps_yields_zero_time() {
        assert_eq!(frame_time(100, 0.0), 0.0);
    }

    #[test]
    fn span_and_contains_are_inclusive() {
        let attempt = Attempt::new(1, FrameMark::at(10, 25.0), FrameMark::at(20, 25.0), None);
        assert_eq!(attempt.frame_span(), 11);
        assert!(attempt.contains(10));
        assert!(attempt.contains(20));
        assert!(!attempt.contains(21));
    }
}
