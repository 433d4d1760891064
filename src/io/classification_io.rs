use std::collections::HashSet;
use std::path::Path;

use indexmap::IndexMap;

use crate::io::attempt_io::{AttemptSchema, NUMBER_COLUMN};
use crate::io::table_store::{StoreError, TableStore};
use crate::model::attempt::LoadedAttempt;
use crate::model::classification::{
    Classification, FLAG_COLUMN, REASON_COLUMN, VERDICT_COLUMN, Verdict,
};
use crate::model::table::{Row, Table};

/// Columns appended to the input header in the classifier's output
pub const CLASSIFICATION_COLUMNS: [&str; 3] = [VERDICT_COLUMN, FLAG_COLUMN, REASON_COLUMN];

/// Output header: the input columns, then `attempt_number` and any
/// classification column the input does not already have.
pub fn output_columns(input: &[String]) -> Vec<String> {
    let mut columns = input.to_vec();
    for extra in std::iter::once(NUMBER_COLUMN).chain(CLASSIFICATION_COLUMNS) {
        if !columns.iter().any(|c| c == extra) {
            columns.push(extra.to_string());
        }
    }
    columns
}

/// The original attempt row with the verdict columns set (overwritten in
/// place when the input already carried them).
pub fn classification_row(source: &Row, classification: &Classification) -> Row {
    let mut row = source.clone();
    if !row.contains_key(NUMBER_COLUMN) {
        row.insert(
            NUMBER_COLUMN.into(),
            classification.attempt_ref.to_string(),
        );
    }
    row.insert(
        VERDICT_COLUMN.into(),
        classification.verdict.code().to_string(),
    );
    row.insert(
        FLAG_COLUMN.into(),
        if classification.is_flagged() { "1" } else { "0" }.into(),
    );
    row.insert(REASON_COLUMN.into(), classification.reason.clone());
    row
}

/// A classification read back from an output table
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRow {
    pub key: String,
    pub verdict: Verdict,
    pub is_flagged: bool,
    pub reason: String,
    pub row: Row,
}

/// The classifier's output table (append-only)
#[derive(Debug, Clone)]
pub struct ClassificationStore {
    store: TableStore,
}

impl ClassificationStore {
    /// Open (or create) the output table for an input with `input_columns`.
    pub fn open(path: &Path, input_columns: &[String]) -> Result<Self, StoreError> {
        let store = TableStore::open(path, output_columns(input_columns))?;
        Ok(ClassificationStore { store })
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// Append the classification of `attempt`, carrying over its columns.
    pub fn append(
        &self,
        attempt: &LoadedAttempt,
        classification: &Classification,
    ) -> Result<(), StoreError> {
        self.store
            .append(&classification_row(&attempt.source, classification))
    }

    /// Classifications on disk, one per attempt (see [`classifications_from_table`]).
    pub fn load(&self, schema: AttemptSchema) -> Result<Vec<ClassifiedRow>, StoreError> {
        classifications_from_table(&self.store.load()?, schema, self.store.path())
    }
}

/// Read classification rows, keeping only the latest row per attempt.
///
/// Re-classifying an attempt appends a second row rather than editing the
/// first, so the last row for a key is the operator's final decision. The
/// result is ordered by each key's first appearance.
pub fn classifications_from_table(
    table: &Table,
    schema: AttemptSchema,
    path: &Path,
) -> Result<Vec<ClassifiedRow>, StoreError> {
    let mut latest: IndexMap<String, ClassifiedRow> = IndexMap::new();
    for (i, row) in table.rows.iter().enumerate() {
        let raw = row.get(VERDICT_COLUMN).map(|v| v.trim()).unwrap_or("");
        let verdict = raw
            .parse::<u8>()
            .ok()
            .and_then(Verdict::from_code)
            .ok_or_else(|| StoreError::InvalidValue {
                path: path.to_path_buf(),
                record: i + 1,
                column: VERDICT_COLUMN.to_string(),
                value: raw.to_string(),
            })?;
        let is_flagged = matches!(
            row.get(FLAG_COLUMN).map(|v| v.trim()),
            Some("1") | Some("true") | Some("True")
        );
        let key = schema.row_key(row, i + 1);
        latest.insert(
            key.clone(),
            ClassifiedRow {
                key,
                verdict,
                is_flagged,
                reason: row.get(REASON_COLUMN).cloned().unwrap_or_default(),
                row: row.clone(),
            },
        );
    }
    Ok(latest.into_values().collect())
}

/// Keys of attempts that already have a classification
pub fn classified_keys(rows: &[ClassifiedRow]) -> HashSet<&str> {
    rows.iter().map(|r| r.key.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::attempt_io::{ATTEMPT_COLUMNS, attempts_from_table};
    use crate::parse::parse_table;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn legacy_input() -> Table {
        parse_table("Start Frame index,End Frame index,camera\n10,40,left\n50,90,right\n").unwrap()
    }

    #[test]
    fn output_columns_append_missing_only() {
        let input: Vec<String> = vec!["a".into(), "is_flagged".into()];
        assert_eq!(
            output_columns(&input),
            vec![
                "a",
                "is_flagged",
                "attempt_number",
                "ground_truth_block_drop",
                "reason_for_flag"
            ]
        );
    }

    #[test]
    fn append_carries_original_columns() {
        let tmp = TempDir::new().unwrap();
        let input = legacy_input();
        let attempts =
            attempts_from_table(&input, AttemptSchema::Legacy, 30.0, Path::new("in.csv")).unwrap();
        let path = tmp.path().join("in_ground_truth.csv");
        let store = ClassificationStore::open(&path, &input.columns).unwrap();

        store
            .append(&attempts[0], &Classification::direct(1, Verdict::NoDrop))
            .unwrap();
        store
            .append(
                &attempts[1],
                &Classification::custom(2, "glove, then block").unwrap(),
            )
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Start Frame index,End Frame index,camera,attempt_number,ground_truth_block_drop,is_flagged,reason_for_flag\n\
             10,40,left,1,0,0,\n\
             50,90,right,2,5,1,\"glove, then block\"\n"
        );
    }

    #[test]
    fn existing_verdict_columns_are_overwritten_in_place() {
        let mut source = Row::new();
        source.insert("attempt_number".into(), "4".into());
        source.insert(VERDICT_COLUMN.into(), "1".into());
        let row = classification_row(
            &source,
            &Classification::preset(4, Verdict::FingersDidNotCross),
        );
        let keys: Vec<&str> = row.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["attempt_number", VERDICT_COLUMN, FLAG_COLUMN, REASON_COLUMN]
        );
        assert_eq!(row[VERDICT_COLUMN], "2");
        assert_eq!(row[FLAG_COLUMN], "1");
    }

    #[test]
    fn reload_keeps_latest_decision_per_attempt() {
        let header = output_columns(
            &ATTEMPT_COLUMNS
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>(),
        )
        .join(",");
        let text = format!(
            "{header}\n\
             1,0.0,1.0,0,30,,,1,0,\n\
             2,2.0,3.0,60,90,,,0,0,\n\
             1,0.0,1.0,0,30,,,4,1,Needs manual review\n"
        );
        let table = parse_table(&text).unwrap();
        let rows =
            classifications_from_table(&table, AttemptSchema::Canonical, Path::new("o.csv"))
                .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key, "1");
        assert_eq!(rows[0].verdict, Verdict::NeedsManualReview);
        assert!(rows[0].is_flagged);
        assert_eq!(rows[1].key, "2");
        assert_eq!(rows[1].verdict, Verdict::NoDrop);

        let keys = classified_keys(&rows);
        assert!(keys.contains("1") && keys.contains("2"));
    }

    #[test]
    fn legacy_rows_with_the_same_span_resume_separately() {
        let tmp = TempDir::new().unwrap();
        let input =
            parse_table("Start Frame index,End Frame index\n30,60\n30,60\n").unwrap();
        let attempts =
            attempts_from_table(&input, AttemptSchema::Legacy, 30.0, Path::new("in.csv")).unwrap();
        let path = tmp.path().join("in_ground_truth.csv");
        let store = ClassificationStore::open(&path, &input.columns).unwrap();

        store
            .append(&attempts[0], &Classification::direct(1, Verdict::Drop))
            .unwrap();

        let rows = store.load(AttemptSchema::Legacy).unwrap();
        let done = classified_keys(&rows);
        assert!(done.contains(attempts[0].key.as_str()));
        assert!(!done.contains(attempts[1].key.as_str()));
    }

    #[test]
    fn unknown_verdict_code_is_rejected() {
        let table = parse_table("attempt_number,ground_truth_block_drop\n1,9\n").unwrap();
        let err = classifications_from_table(&table, AttemptSchema::Canonical, Path::new("o.csv"))
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidValue { record: 1, .. }));
    }
}
