use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::io::config_io::resolve_in_output_dir;
use crate::model::config::Config;

/// Environment variable overriding `[log] level`
pub const LOG_ENV: &str = "NOTCH_LOG";

fn env_filter(config: &Config) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&config.log.level))
        .unwrap_or_else(|_| EnvFilter::new("notch=info"))
}

/// Install the global tracing subscriber.
///
/// The terminal belongs to the UI, so events go to the configured log file
/// (relative paths resolve in the output directory). Without a file, or if
/// it cannot be opened, nothing is logged. Returns the file in use.
pub fn init_logging(config: &Config) -> Option<PathBuf> {
    let path = resolve_in_output_dir(config, config.log.file.as_deref()?);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        let _ = std::fs::create_dir_all(parent);
    }
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("warning: could not open log file {}: {}", path.display(), e);
            return None;
        }
    };

    let installed = tracing_subscriber::registry()
        .with(env_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false),
        )
        .try_init();
    installed.ok().map(|_| path)
}
