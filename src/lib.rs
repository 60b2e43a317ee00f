pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    Calculate {
        base: Option<String>,
        days: Option<u32>,
        json: bool,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("AHR999 calculator starting...");

    let mut config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Calculate { base, days, json } => {
            if let Some(days) = days {
                config.history_days = days;
            }
            cli::calculate::run(&config, base.as_deref(), json).await
        }
    }
}
