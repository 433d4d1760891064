use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Configuration from notch.toml. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub video: VideoConfig,
    #[serde(default)]
    pub marker: StepConfig,
    #[serde(default)]
    pub classifier: StepConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory output tables are written to
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoConfig {
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: String,
    #[serde(default = "default_ffprobe")]
    pub ffprobe: String,
    /// Width in pixels frames are decoded at for the preview
    #[serde(default = "default_preview_width")]
    pub preview_width: u32,
    /// Number of decoded frames kept for scrubbing back and forth
    #[serde(default = "default_cache_frames")]
    pub cache_frames: usize,
}

impl Default for VideoConfig {
    fn default() -> Self {
        VideoConfig {
            ffmpeg: default_ffmpeg(),
            ffprobe: default_ffprobe(),
            preview_width: default_preview_width(),
            cache_frames: default_cache_frames(),
        }
    }
}

fn default_ffmpeg() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe() -> String {
    "ffprobe".to_string()
}

fn default_preview_width() -> u32 {
    160
}

fn default_cache_frames() -> usize {
    32
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepConfig {
    /// Frames moved by the large step keys (h/l)
    #[serde(default = "default_large_step")]
    pub large_step: u64,
}

impl Default for StepConfig {
    fn default() -> Self {
        StepConfig {
            large_step: default_large_step(),
        }
    }
}

fn default_large_step() -> u64 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log file, relative paths resolve against the output directory.
    /// Logging is off when unset.
    #[serde(default = "default_log_file")]
    pub file: Option<PathBuf>,
    /// Filter directive, overridden by the NOTCH_LOG environment variable
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            file: default_log_file(),
            level: default_log_level(),
        }
    }
}

fn default_log_file() -> Option<PathBuf> {
    Some(PathBuf::from("notch.log"))
}

fn default_log_level() -> String {
    "notch=info".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            colors: HashMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}
