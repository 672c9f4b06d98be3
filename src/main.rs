//! grcboard CLI entry point.

use clap::Parser;

use grcboard::cli::{handle_error, Cli, Commands};
use grcboard::infrastructure::config::ConfigLoader;
use grcboard::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    let config = match ConfigLoader::load() {
        Ok(config) => config,
        // `init` must work before a valid configuration exists
        Err(_) if matches!(cli.command, Commands::Init(_)) => Default::default(),
        Err(err) => handle_error(err, json),
    };

    let _logger = match LoggerImpl::init(&LogConfig::from(&config.logging).with_verbosity(cli.verbose)) {
        Ok(logger) => Some(logger),
        Err(err) => {
            eprintln!("Warning: logging disabled: {err:#}");
            None
        }
    };

    if let Err(err) = grcboard::cli::dispatch(cli.command, config, json).await {
        handle_error(err, json);
    }
}
