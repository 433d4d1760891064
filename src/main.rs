use clap::Parser;
use notch::cli::commands::Cli;
use notch::cli::handlers;
use notch::io::config_io::load_config;
use notch::logging::init_logging;

fn main() {
    let cli = Cli::parse();

    let config = match std::env::current_dir()
        .map_err(|e| e.to_string())
        .and_then(|cwd| load_config(cli.config.as_deref(), &cwd).map_err(|e| e.to_string()))
    {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };
    init_logging(&config);

    if let Err(e) = handlers::dispatch(cli, &config) {
        tracing::error!(error = %e, "command failed");
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
