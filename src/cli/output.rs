use serde::Serialize;

use crate::io::classification_io::ClassifiedRow;
use crate::model::attempt::Attempt;
use crate::model::classification::Verdict;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct AttemptJson {
    pub number: u32,
    pub start_frame: u64,
    pub end_frame: u64,
    pub start_time: f64,
    pub end_time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cross_frame: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cross_time: Option<f64>,
}

#[derive(Serialize)]
pub struct ClassificationJson {
    /// Attempt number, or `start-end` for legacy tables
    pub attempt: String,
    pub verdict: Verdict,
    pub code: u8,
    pub is_flagged: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub reason: String,
}

/// Summary printed when an annotation session ends
#[derive(Serialize)]
pub struct SessionJson {
    pub output: String,
    /// Attempts in the table (marker) or classified this session (classifier)
    pub recorded: usize,
    /// Whether every attempt has been classified
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complete: Option<bool>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn attempt_to_json(attempt: &Attempt) -> AttemptJson {
    AttemptJson {
        number: attempt.number,
        start_frame: attempt.start.frame,
        end_frame: attempt.end.frame,
        start_time: attempt.start.time,
        end_time: attempt.end.time,
        cross_frame: attempt.cross.map(|c| c.frame),
        cross_time: attempt.cross.map(|c| c.time),
    }
}

pub fn classification_to_json(row: &ClassifiedRow) -> ClassificationJson {
    ClassificationJson {
        attempt: row.key.clone(),
        verdict: row.verdict,
        code: row.verdict.code(),
        is_flagged: row.is_flagged,
        reason: row.reason.clone(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// One attempt per line: number, frame span, times and the optional cross
pub fn format_attempt_line(attempt: &Attempt) -> String {
    let cross = attempt
        .cross
        .map(|c| format!("  cross {} ({:.2}s)", c.frame, c.time))
        .unwrap_or_default();
    format!(
        "#{:<3} frames {}\u{2013}{}  {:.2}s\u{2013}{:.2}s{}",
        attempt.number,
        attempt.start.frame,
        attempt.end.frame,
        attempt.start.time,
        attempt.end.time,
        cross
    )
}

/// One classification per line
pub fn format_classification_line(row: &ClassifiedRow) -> String {
    let mut line = format!("#{:<3} [{}] {}", row.key, row.verdict.code(), row.verdict.label());
    if row.is_flagged && !row.reason.is_empty() {
        line.push_str(&format!(": {}", row.reason));
    }
    line
}

/// Totals line under a classification listing
pub fn format_verdict_counts(rows: &[ClassifiedRow]) -> String {
    let flagged = rows.iter().filter(|r| r.is_flagged).count();
    let drops = rows.iter().filter(|r| r.verdict == Verdict::Drop).count();
    format!("{} classified: {} drop, {} flagged", rows.len(), drops, flagged)
}
