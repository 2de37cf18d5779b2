use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use mfolio::core::log::init_logging;

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

impl From<Commands> for mfolio::AppCommand {
    fn from(cmd: Commands) -> mfolio::AppCommand {
        match cmd {
            Commands::Holdings { statement, offline } => {
                mfolio::AppCommand::Holdings { statement, offline }
            }
            Commands::Goals => mfolio::AppCommand::Goals,
            Commands::Insurance { file } => mfolio::AppCommand::Insurance { file },
            Commands::Reset => mfolio::AppCommand::Reset,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Reconcile and value portfolio holdings
    Holdings {
        /// Path to a CAMS JSON statement to import
        #[arg(short, long)]
        statement: Option<String>,

        /// Skip the live NAV refresh and use last transaction prices
        #[arg(long)]
        offline: bool,
    },
    /// Display financial goals with contribution projections
    Goals,
    /// Display insurance policies and upcoming premiums
    Insurance {
        /// Path to a policy CSV to import
        #[arg(short, long)]
        file: Option<String>,
    },
    /// Clear saved data for the configured profile
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => mfolio::cli::setup::run(),
        Some(cmd) => mfolio::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
