use ahr999::core::CalcError;
use ahr999::core::log::init_logging;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Compute the AHR999 index and the recommended DCA amount
    Calculate {
        /// Base investment per DCA period (defaults to the configured amount)
        #[arg(short, long)]
        base: Option<String>,

        /// Lookback window in days for the DCA cost
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        days: Option<u32>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

impl From<Commands> for ahr999::AppCommand {
    fn from(cmd: Commands) -> ahr999::AppCommand {
        match cmd {
            Commands::Calculate { base, days, json } => {
                ahr999::AppCommand::Calculate { base, days, json }
            }
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Calculate {
        base: None,
        days: None,
        json: false,
    });

    let result: Result<()> = match command {
        Commands::Setup => ahr999::cli::setup::setup(),
        cmd => ahr999::run_command(cmd.into(), cli.config_path.as_deref()).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Application failed");
            // Calculation errors were already shown by the presenter.
            if e.downcast_ref::<CalcError>().is_none() {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}
