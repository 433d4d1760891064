use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

/// Self-documenting header written at the top of a new recovery log.
const FILE_HEADER: &str = "\
<!-- notch recovery log: rows that could not be written to their table.
     Each entry holds the delimited records exactly as they would have been
     written; paste them back into the named table to restore them.
     Safe to delete once the rows are restored. -->

---
";

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// What kind of write failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryCategory {
    Append,
    Rewrite,
}

impl fmt::Display for RecoveryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryCategory::Append => write!(f, "append"),
            RecoveryCategory::Rewrite => write!(f, "rewrite"),
        }
    }
}

/// A single entry in the recovery log.
#[derive(Debug, Clone)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    pub category: RecoveryCategory,
    pub target: PathBuf,
    pub error: String,
    pub body: String,
}

/// Return the path to the recovery log kept next to `table`.
pub fn recovery_log_path(table: &Path) -> PathBuf {
    let dir = match table.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    dir.join(".notch-recovery.log")
}

// ---------------------------------------------------------------------------
// Atomic file write
// ---------------------------------------------------------------------------

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

impl RecoveryEntry {
    pub fn new(category: RecoveryCategory, target: &Path, error: &io::Error, body: String) -> Self {
        RecoveryEntry {
            timestamp: Utc::now(),
            category,
            target: target.to_path_buf(),
            error: error.to_string(),
            body,
        }
    }

    /// Format this entry as a markdown block for the recovery log.
    fn to_markdown(&self) -> String {
        let mut out = format!(
            "## {} {}: {}\n\nError: {}\n",
            self.timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            self.category,
            self.target.display(),
            self.error,
        );
        if !self.body.is_empty() {
            out.push_str("\n```csv\n");
            out.push_str(&self.body);
            if !self.body.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n");
        }
        out.push_str("\n---\n");
        out
    }
}

/// Append a recovery entry to the log next to the entry's target.
/// Errors are swallowed and reported through tracing.
pub fn log_recovery(entry: RecoveryEntry) {
    let path = recovery_log_path(&entry.target);
    if let Err(e) = log_recovery_inner(&path, &entry) {
        tracing::error!(log = %path.display(), error = %e, "could not write to recovery log");
    }
}

fn log_recovery_inner(path: &Path, entry: &RecoveryEntry) -> io::Result<()> {
    let needs_header = std::fs::metadata(path).map_or(true, |m| m.len() == 0);
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if needs_header {
        file.write_all(FILE_HEADER.as_bytes())?;
    }
    file.write_all(entry.to_markdown().as_bytes())?;
    file.sync_data()
}
