use std::path::Path;

use crate::io::table_store::{StoreError, TableStore, load_table};
use crate::model::attempt::{Attempt, FrameMark, LoadedAttempt, frame_time};
use crate::model::table::{Row, Table};
use crate::parse::format_float;

pub const NUMBER_COLUMN: &str = "attempt_number";
pub const START_TIME_COLUMN: &str = "attempt_start_time";
pub const END_TIME_COLUMN: &str = "attempt_end_time";
pub const START_FRAME_COLUMN: &str = "attempt_start_frame";
pub const END_FRAME_COLUMN: &str = "attempt_end_frame";
pub const CROSS_TIME_COLUMN: &str = "attempt_cross_time";
pub const CROSS_FRAME_COLUMN: &str = "attempt_cross_frame";

pub const LEGACY_START_COLUMN: &str = "Start Frame index";
pub const LEGACY_END_COLUMN: &str = "End Frame index";

/// Header the marker writes
pub const ATTEMPT_COLUMNS: [&str; 7] = [
    NUMBER_COLUMN,
    START_TIME_COLUMN,
    END_TIME_COLUMN,
    START_FRAME_COLUMN,
    END_FRAME_COLUMN,
    CROSS_TIME_COLUMN,
    CROSS_FRAME_COLUMN,
];

const CANONICAL_REQUIRED: [&str; 5] = [
    NUMBER_COLUMN,
    START_TIME_COLUMN,
    END_TIME_COLUMN,
    START_FRAME_COLUMN,
    END_FRAME_COLUMN,
];

const LEGACY_REQUIRED: [&str; 2] = [LEGACY_START_COLUMN, LEGACY_END_COLUMN];

/// Which of the two attempt table layouts a file uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptSchema {
    /// `attempt_number, attempt_start_time, ...` as written by the marker
    Canonical,
    /// `Start Frame index, End Frame index`; numbers come from row order
    Legacy,
}

impl AttemptSchema {
    /// Pick the schema from the header. Canonical wins when both match.
    pub fn detect(table: &Table, path: &Path) -> Result<Self, StoreError> {
        let missing = table.missing_columns(&CANONICAL_REQUIRED);
        if missing.is_empty() {
            return Ok(AttemptSchema::Canonical);
        }
        if table.missing_columns(&LEGACY_REQUIRED).is_empty() {
            return Ok(AttemptSchema::Legacy);
        }
        Err(StoreError::MissingColumns {
            path: path.to_path_buf(),
            missing: missing.into_iter().map(String::from).collect(),
        })
    }

    pub fn start_frame_column(self) -> &'static str {
        match self {
            AttemptSchema::Canonical => START_FRAME_COLUMN,
            AttemptSchema::Legacy => LEGACY_START_COLUMN,
        }
    }

    pub fn end_frame_column(self) -> &'static str {
        match self {
            AttemptSchema::Canonical => END_FRAME_COLUMN,
            AttemptSchema::Legacy => LEGACY_END_COLUMN,
        }
    }

    /// Identity of the row at 1-based `position`: its attempt number.
    ///
    /// Legacy inputs have no number column, so their key is the row
    /// position unless the row carries a number (as classifier output
    /// written from a legacy input does).
    pub fn row_key(self, row: &Row, position: usize) -> String {
        let number = row.get(NUMBER_COLUMN).map(|v| v.trim()).unwrap_or("");
        match self {
            AttemptSchema::Canonical => number.to_string(),
            AttemptSchema::Legacy if !number.is_empty() => number.to_string(),
            AttemptSchema::Legacy => position.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Row conversion
// ---------------------------------------------------------------------------

/// Canonical row for an attempt; cross cells are empty when absent.
pub fn attempt_to_row(attempt: &Attempt) -> Row {
    let mut row = Row::with_capacity(ATTEMPT_COLUMNS.len());
    row.insert(NUMBER_COLUMN.into(), attempt.number.to_string());
    row.insert(START_TIME_COLUMN.into(), format_float(attempt.start.time));
    row.insert(END_TIME_COLUMN.into(), format_float(attempt.end.time));
    row.insert(START_FRAME_COLUMN.into(), attempt.start.frame.to_string());
    row.insert(END_FRAME_COLUMN.into(), attempt.end.frame.to_string());
    let (cross_time, cross_frame) = match attempt.cross {
        Some(mark) => (format_float(mark.time), mark.frame.to_string()),
        None => (String::new(), String::new()),
    };
    row.insert(CROSS_TIME_COLUMN.into(), cross_time);
    row.insert(CROSS_FRAME_COLUMN.into(), cross_frame);
    row
}

struct Cells<'a> {
    path: &'a Path,
    record: usize,
    row: &'a Row,
}

impl Cells<'_> {
    fn raw(&self, column: &str) -> &str {
        self.row.get(column).map(|v| v.trim()).unwrap_or("")
    }

    fn invalid(&self, column: &str) -> StoreError {
        StoreError::InvalidValue {
            path: self.path.to_path_buf(),
            record: self.record,
            column: column.to_string(),
            value: self.raw(column).to_string(),
        }
    }

    /// Frame indices may have been written as whole floats ("12.0")
    fn frame(&self, column: &str) -> Result<u64, StoreError> {
        let raw = self.raw(column);
        if let Ok(v) = raw.parse::<u64>() {
            return Ok(v);
        }
        match raw.parse::<f64>() {
            Ok(v) if v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 => Ok(v as u64),
            _ => Err(self.invalid(column)),
        }
    }

    fn time(&self, column: &str) -> Result<f64, StoreError> {
        self.raw(column)
            .parse::<f64>()
            .ok()
            .filter(|t| t.is_finite() && *t >= 0.0)
            .ok_or_else(|| self.invalid(column))
    }

    fn number(&self, column: &str) -> Result<u32, StoreError> {
        self.raw(column)
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| self.invalid(column))
    }

    fn is_blank(&self, column: &str) -> bool {
        self.raw(column).is_empty()
    }
}

fn canonical_attempt(cells: &Cells<'_>, fps: f64) -> Result<Attempt, StoreError> {
    let start = FrameMark {
        frame: cells.frame(START_FRAME_COLUMN)?,
        time: cells.time(START_TIME_COLUMN)?,
    };
    let end = FrameMark {
        frame: cells.frame(END_FRAME_COLUMN)?,
        time: cells.time(END_TIME_COLUMN)?,
    };
    let cross = if cells.is_blank(CROSS_FRAME_COLUMN) {
        None
    } else {
        let frame = cells.frame(CROSS_FRAME_COLUMN)?;
        let time = if cells.is_blank(CROSS_TIME_COLUMN) {
            frame_time(frame, fps)
        } else {
            cells.time(CROSS_TIME_COLUMN)?
        };
        Some(FrameMark { frame, time })
    };
    Ok(Attempt::new(cells.number(NUMBER_COLUMN)?, start, end, cross))
}

fn legacy_attempt(cells: &Cells<'_>, number: u32, fps: f64) -> Result<Attempt, StoreError> {
    let start = FrameMark::at(cells.frame(LEGACY_START_COLUMN)?, fps);
    let end = FrameMark::at(cells.frame(LEGACY_END_COLUMN)?, fps);
    Ok(Attempt::new(number, start, end, None))
}

/// Convert every row of `table` into an attempt, keeping the source row.
///
/// `fps` derives times the table does not store (legacy tables, blank
/// cross times).
pub fn attempts_from_table(
    table: &Table,
    schema: AttemptSchema,
    fps: f64,
    path: &Path,
) -> Result<Vec<LoadedAttempt>, StoreError> {
    table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let cells = Cells {
                path,
                record: i + 1,
                row,
            };
            let attempt = match schema {
                AttemptSchema::Canonical => canonical_attempt(&cells, fps)?,
                AttemptSchema::Legacy => legacy_attempt(&cells, (i + 1) as u32, fps)?,
            };
            Ok(LoadedAttempt {
                attempt,
                key: schema.row_key(row, i + 1),
                source: row.clone(),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// The marker's output table
#[derive(Debug, Clone)]
pub struct AttemptStore {
    store: TableStore,
}

impl AttemptStore {
    /// Open (or create) the attempt table at `path` and return the attempts
    /// already committed to it, oldest first.
    pub fn open(path: &Path, fps: f64) -> Result<(Self, Vec<Attempt>), StoreError> {
        let columns = ATTEMPT_COLUMNS.iter().map(|c| c.to_string()).collect();
        let store = TableStore::open(path, columns)?;
        let table = store.load()?;
        let attempts = attempts_from_table(&table, AttemptSchema::Canonical, fps, path)?
            .into_iter()
            .map(|loaded| loaded.attempt)
            .collect();
        Ok((AttemptStore { store }, attempts))
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    pub fn append(&self, attempt: &Attempt) -> Result<(), StoreError> {
        self.store.append(&attempt_to_row(attempt))
    }

    /// Replace the table with `attempts`, oldest first.
    pub fn rewrite(&self, attempts: &[Attempt]) -> Result<(), StoreError> {
        let rows: Vec<Row> = attempts.iter().map(attempt_to_row).collect();
        self.store.rewrite_all(&rows)
    }
}

/// Load an attempt table for classification, validating its columns.
/// Returns the raw table and its detected schema; conversion to attempts
/// needs the video frame rate and happens in [`attempts_from_table`].
pub fn load_attempt_table(path: &Path) -> Result<(Table, AttemptSchema), StoreError> {
    let table = load_table(path, &[])?;
    let schema = AttemptSchema::detect(&table, path)?;
    Ok((table, schema))
}
