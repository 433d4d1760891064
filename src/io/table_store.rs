use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::model::table::{Row, Table, record_for};
use crate::parse::{TableError, parse_table, serialize_record, serialize_table};

/// Error type for table storage
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("file '{}' not found", .path.display())]
    NotFound { path: PathBuf },
    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {}: {source}", .path.display())]
    Parse { path: PathBuf, source: TableError },
    #[error("{} is missing required column(s): {}", .path.display(), .missing.join(", "))]
    MissingColumns { path: PathBuf, missing: Vec<String> },
    #[error("{} has header [{found}] but [{expected}] was expected", .path.display())]
    HeaderMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },
    #[error("{} record {record}: invalid {column} value '{value}'", .path.display())]
    InvalidValue {
        path: PathBuf,
        record: usize,
        column: String,
        value: String,
    },
}

/// Read and parse a table, failing if any required column is absent.
pub fn load_table(path: &Path, required: &[&str]) -> Result<Table, StoreError> {
    if !path.is_file() {
        return Err(StoreError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let text = fs::read_to_string(path).map_err(|e| StoreError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let table = parse_table(&text).map_err(|e| StoreError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    let missing = table.missing_columns(required);
    if !missing.is_empty() {
        return Err(StoreError::MissingColumns {
            path: path.to_path_buf(),
            missing: missing.into_iter().map(String::from).collect(),
        });
    }
    Ok(table)
}

/// A delimited table on disk with a fixed header.
///
/// Forward progress appends one record at a time; undo replaces the whole
/// file through a temp file and rename so a crash never leaves a partial
/// table behind.
#[derive(Debug, Clone)]
pub struct TableStore {
    path: PathBuf,
    columns: Vec<String>,
}

impl TableStore {
    /// Open the table at `path`, writing the header if the file does not
    /// exist yet. An existing file must carry exactly `columns` as header.
    pub fn open(path: &Path, columns: Vec<String>) -> Result<Self, StoreError> {
        let store = TableStore {
            path: path.to_path_buf(),
            columns,
        };
        let empty = fs::metadata(path).map_or(true, |m| m.len() == 0);
        if empty {
            store.rewrite_all(&[])?;
        } else {
            let existing = store.load()?;
            if existing.columns != store.columns {
                return Err(StoreError::HeaderMismatch {
                    path: store.path.clone(),
                    expected: store.columns.join(","),
                    found: existing.columns.join(","),
                });
            }
            store.terminate_last_record()?;
        }
        Ok(store)
    }

    /// End the file with a line break so the next append starts a new
    /// record. Files written by other tools often omit the final one.
    fn terminate_last_record(&self) -> Result<(), StoreError> {
        let bytes = fs::read(&self.path).map_err(|e| StoreError::Read {
            path: self.path.clone(),
            source: e,
        })?;
        if bytes.last().is_none_or(|b| *b == b'\n') {
            return Ok(());
        }
        tracing::debug!(path = %self.path.display(), "adding missing final line break");
        OpenOptions::new()
            .append(true)
            .open(&self.path)
            .and_then(|mut file| {
                file.write_all(b"\n")?;
                file.sync_data()
            })
            .map_err(|e| StoreError::Write {
                path: self.path.clone(),
                source: e,
            })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All rows currently on disk, in file order.
    pub fn load(&self) -> Result<Table, StoreError> {
        load_table(&self.path, &[])
    }

    /// Append one row and flush it to disk before returning.
    pub fn append(&self, row: &Row) -> Result<(), StoreError> {
        let line = serialize_record(&record_for(&self.columns, row));
        let result = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .and_then(|mut file| {
                file.write_all(line.as_bytes())?;
                file.sync_data()
            });
        if let Err(e) = result {
            recovery::log_recovery(RecoveryEntry::new(
                RecoveryCategory::Append,
                &self.path,
                &e,
                line,
            ));
            return Err(StoreError::Write {
                path: self.path.clone(),
                source: e,
            });
        }
        Ok(())
    }

    /// Replace the whole file with the header followed by `rows`.
    pub fn rewrite_all(&self, rows: &[Row]) -> Result<(), StoreError> {
        let mut table = Table::new(self.columns.clone());
        table.rows = rows.to_vec();
        let content = serialize_table(&table);
        if let Err(e) = recovery::atomic_write(&self.path, content.as_bytes()) {
            recovery::log_recovery(RecoveryEntry::new(
                RecoveryCategory::Rewrite,
                &self.path,
                &e,
                content,
            ));
            return Err(StoreError::Write {
                path: self.path.clone(),
                source: e,
            });
        }
        Ok(())
    }
}
