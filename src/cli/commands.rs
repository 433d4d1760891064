use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "notch", about = concat!("notch v", env!("CARGO_PKG_VERSION"), " - frame-accurate attempt annotation"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file (default: ./notch.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Step through a video and mark attempt start, cross and end frames
    Marker(MarkerArgs),
    /// Review marked attempts and record a verdict for each
    Classifier(ClassifierArgs),
    /// Print the attempts or classifications in a table
    List(ListArgs),
}

#[derive(Args)]
pub struct MarkerArgs {
    /// Video to annotate
    pub video: PathBuf,
    /// Attempt table to write (default: <video_stem>_attempt_ground_truths.csv)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ClassifierArgs {
    /// Attempt table produced by the marker (or a legacy start/end table)
    pub csv_file: PathBuf,
    /// Video the attempts were marked on
    pub video: PathBuf,
    /// Classification table to append to (default: <csv_stem>_ground_truth.csv)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
    /// Skip attempts that already have a row in the output table
    #[arg(long)]
    pub resume: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Attempt or classification table
    pub csv_file: PathBuf,
    /// Frame rate for tables that store frames only
    #[arg(long, default_value_t = 30.0)]
    pub fps: f64,
}
