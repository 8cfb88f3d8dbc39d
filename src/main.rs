mod app;
mod cli;
mod config;
mod consts;
mod error;
mod host;
mod output;
mod records;
mod scratch;
mod utils;
mod xml;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::Config;
use error::AppError;

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref());
    let cli = cli.with_config(&config);

    init_logging(cli.debug);
    match &config.source {
        Some(path) => tracing::debug!(path = %path.display(), "loaded config"),
        None => tracing::debug!("no config file found, using defaults"),
    }

    if let Err(e) = app::run(&cli, &config) {
        // Fatal rerun failures were already reported through the host
        let reported = matches!(&e, AppError::Scratch(s) if s.is_fatal());
        if !reported {
            eprintln!("Error: {e}");
        }
        std::process::exit(1);
    }
}
