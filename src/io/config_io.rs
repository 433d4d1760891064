use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "notch.toml";

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file '{}' not found", .0.display())]
    NotFound(PathBuf),
    #[error("could not read {}: {source}", .path.display())]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {}: {source}", .path.display())]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Load configuration.
///
/// An explicit path must exist. Without one, `notch.toml` in `cwd` is used
/// when present and defaults otherwise.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<Config, ConfigError> {
    let path = match explicit {
        Some(p) if !p.is_file() => return Err(ConfigError::NotFound(p.to_path_buf())),
        Some(p) => p.to_path_buf(),
        None => {
            let candidate = cwd.join(DEFAULT_CONFIG_FILE);
            if !candidate.is_file() {
                return Ok(Config::default());
            }
            candidate
        }
    };
    let text = fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    parse_config(&text).map_err(|e| match e {
        ParseFailure::Toml(source) => ConfigError::ParseError { path, source },
        ParseFailure::Invalid(msg) => ConfigError::Invalid(msg),
    })
}

enum ParseFailure {
    Toml(toml::de::Error),
    Invalid(String),
}

fn parse_config(text: &str) -> Result<Config, ParseFailure> {
    let config: Config = toml::from_str(text).map_err(ParseFailure::Toml)?;
    if config.marker.large_step == 0 || config.classifier.large_step == 0 {
        return Err(ParseFailure::Invalid("large_step must be at least 1".into()));
    }
    if config.video.preview_width < 2 {
        return Err(ParseFailure::Invalid(
            "video.preview_width must be at least 2".into(),
        ));
    }
    Ok(config)
}

/// Resolve `path` against the configured output directory unless absolute.
pub fn resolve_in_output_dir(config: &Config, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        config.output.dir.join(path)
    }
}
