//! Implementation of the `grcboard init` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::StoreBackend;
use crate::infrastructure::setup::{
    create_config_dir, create_config_file, initialize_database, SetupPaths,
};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing config file
    #[arg(long, short)]
    pub force: bool,

    /// Use the local JSON database instead of the record API
    #[arg(long)]
    pub file_store: bool,

    /// Target directory (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub initialized_path: PathBuf,
    pub config_written: bool,
    pub database_initialized: bool,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if self.config_written {
            lines.push("\nConfiguration written to .grcboard/config.yaml".to_string());
        }
        if self.database_initialized {
            lines.push("Database initialized at .grcboard/db.json".to_string());
        }
        lines.join("\n")
    }
}

pub async fn execute(args: InitArgs, json_mode: bool) -> Result<()> {
    let target_path = if args.path.is_absolute() {
        args.path.clone()
    } else {
        std::env::current_dir()
            .context("Failed to get current directory")?
            .join(&args.path)
    };
    let paths = SetupPaths::new(&target_path);

    if paths.is_initialized() && !args.force {
        let out = InitOutput {
            success: false,
            message: "Project already initialized. Use --force to rewrite the config file."
                .to_string(),
            initialized_path: target_path,
            config_written: false,
            database_initialized: false,
        };
        output(&out, json_mode);
        return Ok(());
    }

    let backend = if args.file_store {
        StoreBackend::File
    } else {
        StoreBackend::Api
    };

    create_config_dir(&paths)?;
    let config_written = create_config_file(&paths, backend, args.force)?;
    let database_initialized = if backend == StoreBackend::File {
        initialize_database(&paths).await?
    } else {
        false
    };

    let out = InitOutput {
        success: true,
        message: if args.force {
            "Project reinitialized successfully.".to_string()
        } else {
            "Project initialized successfully.".to_string()
        },
        initialized_path: target_path,
        config_written,
        database_initialized,
    };
    output(&out, json_mode);
    Ok(())
}
