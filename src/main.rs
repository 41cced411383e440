use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use stockwatch::core::log::init_logging;

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
    /// Show favorite stocks and their latest prices
    List,
    /// Add a stock to favorites, fetching its price history
    Add { symbol: String },
    /// Remove a stock from favorites
    Remove { symbol: String },
    /// Refresh stale price history of all favorites
    Update,
    /// Filter favorites and send the passing ones to the external API
    Process,
    /// Validate ratings (JSON array) and send sell recommendations
    Rate {
        /// File with ratings, stdin when omitted or "-"
        input: Option<PathBuf>,
    },
    /// Show or set the rating threshold for sell recommendations
    Threshold {
        #[arg(allow_negative_numbers = true)]
        value: Option<i32>,
    },
    /// Show the most recent activity
    Logs {
        /// Number of lines to show
        #[arg(short = 'n', long, default_value_t = 20)]
        lines: usize,
    },
}

impl From<Commands> for stockwatch::AppCommand {
    fn from(cmd: Commands) -> stockwatch::AppCommand {
        match cmd {
            Commands::List => stockwatch::AppCommand::List,
            Commands::Add { symbol } => stockwatch::AppCommand::Add { symbol },
            Commands::Remove { symbol } => stockwatch::AppCommand::Remove { symbol },
            Commands::Update => stockwatch::AppCommand::Update,
            Commands::Process => stockwatch::AppCommand::Process,
            Commands::Rate { input } => stockwatch::AppCommand::Rate { input },
            Commands::Threshold { value } => stockwatch::AppCommand::Threshold { value },
            Commands::Logs { lines } => stockwatch::AppCommand::Logs { lines },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => stockwatch::cli::setup::setup_at_path(path),
            None => stockwatch::cli::setup::setup(),
        },
        Some(cmd) => stockwatch::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
