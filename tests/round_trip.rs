use notch::io::attempt_io::{AttemptStore, load_attempt_table};
use notch::io::classification_io::ClassificationStore;
use notch::model::attempt::{Attempt, FrameMark, LoadedAttempt};
use notch::model::classification::{Classification, Verdict};
use notch::parse::{parse_table, serialize_table};
use pretty_assertions::assert_eq;
use std::fs;

fn attempts(fps: f64) -> Vec<Attempt> {
    (0..25u64)
        .map(|i| {
            let start = i * 37 + 3;
            let cross = (i % 3 != 0).then(|| FrameMark::at(start + 7, fps));
            Attempt::new(
                i as u32 + 1,
                FrameMark::at(start, fps),
                FrameMark::at(start + 19, fps),
                cross,
            )
        })
        .collect()
}

/// Writing N attempts and reopening the table yields the same N attempts,
/// frames and times exactly.
#[test]
fn attempts_survive_append_and_reload() {
    for fps in [30.0, 29.97, 59.94, 24.0] {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("clip_attempt_ground_truths.csv");
        let written = attempts(fps);

        let (store, existing) = AttemptStore::open(&path, fps).unwrap();
        assert!(existing.is_empty());
        for attempt in &written {
            store.append(attempt).unwrap();
        }

        let (_, reloaded) = AttemptStore::open(&path, fps).unwrap();
        assert_eq!(reloaded, written, "fps {}", fps);
    }
}

#[test]
fn rewrite_replaces_the_table() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("a.csv");
    let all = attempts(30.0);

    let (store, _) = AttemptStore::open(&path, 30.0).unwrap();
    for attempt in &all {
        store.append(attempt).unwrap();
    }
    store.rewrite(&all[..2]).unwrap();

    let (_, reloaded) = AttemptStore::open(&path, 30.0).unwrap();
    assert_eq!(reloaded, all[..2].to_vec());
    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 3);
}

/// A classification table re-serializes byte for byte, including quoted
/// reasons with commas, quotes and newlines.
#[test]
fn classification_table_is_stable() {
    let tmp = tempfile::TempDir::new().unwrap();
    let input = tmp.path().join("a.csv");
    let output = tmp.path().join("a_ground_truth.csv");

    let (store, _) = AttemptStore::open(&input, 30.0).unwrap();
    let written = attempts(30.0);
    for attempt in &written[..3] {
        store.append(attempt).unwrap();
    }

    let (table, _) = load_attempt_table(&input).unwrap();
    let classifications = ClassificationStore::open(&output, &table.columns).unwrap();
    let reasons = ["said \"oops\"", "dropped,\nthen caught", "ok"];
    for (i, (attempt, reason)) in written.iter().zip(reasons).enumerate() {
        let loaded = LoadedAttempt {
            attempt: attempt.clone(),
            key: attempt.number.to_string(),
            source: table.rows[i].clone(),
        };
        let classification = Classification::custom(attempt.number, reason).unwrap();
        classifications.append(&loaded, &classification).unwrap();
    }
    let direct = LoadedAttempt {
        attempt: written[0].clone(),
        key: "1".to_string(),
        source: table.rows[0].clone(),
    };
    classifications
        .append(&direct, &Classification::direct(1, Verdict::Drop))
        .unwrap();

    let text = fs::read_to_string(&output).unwrap();
    let parsed = parse_table(&text).unwrap();
    assert_eq!(parsed.len(), 4);
    assert_eq!(serialize_table(&parsed), text);
}

/// A table saved without a final line break (hand edits, spreadsheet
/// exports) keeps its last attempt intact when the marker appends to it.
#[test]
fn appending_to_table_without_final_newline() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("a.csv");
    let first = Attempt::new(1, FrameMark::at(0, 30.0), FrameMark::at(30, 30.0), None);
    let second = Attempt::new(2, FrameMark::at(40, 30.0), FrameMark::at(50, 30.0), None);

    let (store, _) = AttemptStore::open(&path, 30.0).unwrap();
    store.append(&first).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    fs::write(&path, text.trim_end_matches('\n')).unwrap();

    let (store, existing) = AttemptStore::open(&path, 30.0).unwrap();
    assert_eq!(existing, vec![first.clone()]);
    store.append(&second).unwrap();

    let (_, reloaded) = AttemptStore::open(&path, 30.0).unwrap();
    assert_eq!(reloaded, vec![first, second]);
}
