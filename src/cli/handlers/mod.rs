mod annotate;
pub use annotate::{cmd_classifier, cmd_marker};

use std::path::Path;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::attempt_io::{AttemptSchema, attempts_from_table};
use crate::io::classification_io::classifications_from_table;
use crate::io::table_store::load_table;
use crate::model::classification::VERDICT_COLUMN;
use crate::model::config::Config;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    match cli.command {
        Commands::Marker(args) => cmd_marker(args, config, json),
        Commands::Classifier(args) => cmd_classifier(args, config, json),
        Commands::List(args) => cmd_list(args, json),
    }
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(args: ListArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !(args.fps.is_finite() && args.fps > 0.0) {
        return Err(format!("invalid --fps {}", args.fps).into());
    }
    let lines = list_lines(&args.csv_file, args.fps, json)?;
    for line in &lines {
        println!("{}", line);
    }
    Ok(())
}

/// Lines printed by `notch list`: a classification table when the file has
/// a verdict column, an attempt table otherwise.
fn list_lines(
    path: &Path,
    fps: f64,
    json: bool,
) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let table = load_table(path, &[])?;
    let schema = AttemptSchema::detect(&table, path)?;

    if table.has_column(VERDICT_COLUMN) {
        let rows = classifications_from_table(&table, schema, path)?;
        if json {
            let out: Vec<ClassificationJson> = rows.iter().map(classification_to_json).collect();
            return Ok(vec![serde_json::to_string_pretty(&out)?]);
        }
        let mut lines: Vec<String> = rows.iter().map(format_classification_line).collect();
        lines.push(format_verdict_counts(&rows));
        return Ok(lines);
    }

    let attempts = attempts_from_table(&table, schema, fps, path)?;
    if json {
        let out: Vec<AttemptJson> = attempts.iter().map(|l| attempt_to_json(&l.attempt)).collect();
        return Ok(vec![serde_json::to_string_pretty(&out)?]);
    }
    let mut lines: Vec<String> = attempts
        .iter()
        .map(|l| format_attempt_line(&l.attempt))
        .collect();
    lines.push(format!("{} attempt(s)", attempts.len()));
    Ok(lines)
}
