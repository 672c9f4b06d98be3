//! Command-line interface.

pub mod commands;
pub mod context;
pub mod output;
pub mod types;

pub use context::AppContext;
pub use types::{Cli, Commands};

use anyhow::Result;

use crate::domain::models::Config;

/// Run one parsed command against the loaded configuration.
pub async fn dispatch(command: Commands, config: Config, json_mode: bool) -> Result<()> {
    match command {
        Commands::Init(args) => commands::init::execute(args, json_mode).await,
        Commands::Assess(args) => {
            commands::assess::execute(args, &AppContext::from_config(config)?, json_mode).await
        }
        Commands::Incident(args) => {
            commands::incident::execute(args, &AppContext::from_config(config)?, json_mode).await
        }
        Commands::Risk(args) => {
            commands::risk::execute(args, &AppContext::from_config(config)?, json_mode).await
        }
        Commands::Poam(args) => {
            commands::poam::execute(args, &AppContext::from_config(config)?, json_mode).await
        }
        Commands::Control(args) => {
            commands::control::execute(args, &AppContext::from_config(config)?, json_mode).await
        }
        Commands::System(args) => {
            commands::system::execute(args, &AppContext::from_config(config)?, json_mode).await
        }
        Commands::Org(args) => {
            commands::org::execute(args, &AppContext::from_config(config)?, json_mode).await
        }
        Commands::Report(args) => {
            commands::report::execute(args, &AppContext::from_config(config)?, json_mode).await
        }
    }
}

/// Print an error and exit with status 1.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let body = serde_json::json!({ "error": format!("{err:#}") });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1)
}
