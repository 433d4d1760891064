use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::commands::{ClassifierArgs, MarkerArgs};
use crate::cli::output::SessionJson;
use crate::io::attempt_io::{AttemptStore, attempts_from_table, load_attempt_table};
use crate::io::classification_io::{ClassificationStore, classified_keys};
use crate::io::config_io::resolve_in_output_dir;
use crate::model::config::Config;
use crate::ops::classifier::ClassifierState;
use crate::ops::marker::MarkerState;
use crate::tui::{self, App, Session};
use crate::video::{CachedSource, FfmpegSource, FrameSource};

/// Suffix of the marker's default output file
const MARKER_SUFFIX: &str = "_attempt_ground_truths.csv";
/// Suffix of the classifier's default output file
const CLASSIFIER_SUFFIX: &str = "_ground_truth.csv";

fn file_stem(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| format!("cannot derive a file name from '{}'", path.display()).into())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Explicit `--output`, or `<stem><suffix>` in the output directory
fn output_path(
    config: &Config,
    explicit: Option<PathBuf>,
    input: &Path,
    suffix: &str,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = match explicit {
        Some(p) => p,
        None => {
            let name = format!("{}{}", file_stem(input)?, suffix);
            resolve_in_output_dir(config, Path::new(&name))
        }
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| format!("could not create {}: {}", parent.display(), e))?;
    }
    Ok(path)
}

fn open_video(
    path: &Path,
    config: &Config,
) -> Result<Box<dyn FrameSource>, Box<dyn std::error::Error>> {
    let source = FfmpegSource::open(path, &config.video)?;
    Ok(Box::new(CachedSource::new(source, config.video.cache_frames)))
}

fn print_session(
    summary: SessionJson,
    json: bool,
    message: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", message);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Marker
// ---------------------------------------------------------------------------

pub fn cmd_marker(
    args: MarkerArgs,
    config: &Config,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = open_video(&args.video, config)?;
    let info = source.info().clone();
    let output = output_path(config, args.output, &args.video, MARKER_SUFFIX)?;

    let (store, attempts) = AttemptStore::open(&output, info.fps)?;
    if !attempts.is_empty() {
        tracing::info!(
            output = %output.display(),
            attempts = attempts.len(),
            "resuming marker session"
        );
    }
    let state = MarkerState::resume(info.frame_count, info.fps, attempts)
        .with_large_step(config.marker.large_step);

    let mut app = App::new(
        Session::Marker { state, store },
        source,
        &config.ui,
        file_name(&args.video),
    );
    tui::run(&mut app)?;

    let (recorded, saved) = match &app.session {
        Session::Marker { state, store } => (state.attempts().len(), store.path().display()),
        Session::Classifier { store, .. } => (0, store.path().display()),
    };
    tracing::info!(output = %saved, recorded, "marker session ended");
    print_session(
        SessionJson {
            output: saved.to_string(),
            recorded,
            complete: None,
        },
        json,
        &format!("Data saved to: {}", saved),
    )
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

pub fn cmd_classifier(
    args: ClassifierArgs,
    config: &Config,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // The table is validated before the (slower) video probe
    let (table, schema) = load_attempt_table(&args.csv_file)?;
    let source = open_video(&args.video, config)?;
    let info = source.info().clone();
    let loaded = attempts_from_table(&table, schema, info.fps, &args.csv_file)?;

    let output = output_path(config, args.output, &args.csv_file, CLASSIFIER_SUFFIX)?;
    let store = ClassificationStore::open(&output, &table.columns)?;

    let mut state = ClassifierState::new(
        loaded.iter().map(|l| l.attempt.clone()).collect(),
        info.frame_count,
    )
    .with_large_step(config.classifier.large_step);
    if args.resume {
        let existing = store.load(schema)?;
        let done = classified_keys(&existing);
        let skip: Vec<bool> = loaded.iter().map(|l| done.contains(l.key.as_str())).collect();
        tracing::info!(
            output = %output.display(),
            skipped = skip.iter().filter(|s| **s).count(),
            "resuming classifier session"
        );
        state = state.with_skipped(skip);
    }

    if state.is_finished() {
        return print_session(
            SessionJson {
                output: output.display().to_string(),
                recorded: 0,
                complete: Some(true),
            },
            json,
            "Nothing to classify: every attempt already has a verdict",
        );
    }

    let mut app = App::new(
        Session::Classifier {
            state,
            loaded,
            store,
            committed: 0,
        },
        source,
        &config.ui,
        file_name(&args.video),
    );
    tui::run(&mut app)?;

    let (committed, saved) = match &app.session {
        Session::Classifier {
            committed, store, ..
        } => (*committed, store.path().display()),
        Session::Marker { store, .. } => (0, store.path().display()),
    };
    tracing::info!(
        output = %saved,
        committed,
        finished = app.finished,
        "classifier session ended"
    );
    let message = if app.finished {
        format!("Classification complete! Data saved to: {}", saved)
    } else {
        format!(
            "Classified {} attempt(s) this session. Data saved to: {}",
            committed, saved
        )
    };
    print_session(
        SessionJson {
            output: saved.to_string(),
            recorded: committed,
            complete: Some(app.finished),
        },
        json,
        &message,
    )
}
