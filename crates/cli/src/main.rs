//! KICAI CLI — the main entry point.
//!
//! Commands:
//! - `onboard` — Initialize configuration
//! - `chat`    — Interactive chat or single-message mode
//! - `config`  — Show or edit settings
//! - `doctor`  — Diagnose system health

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "kicai",
    about = "KICAI — AI design assistant for KiCad projects",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration
    Onboard,

    /// Chat with the design assistant
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,

        /// Load a design snapshot from a JSON file
        #[arg(short, long)]
        snapshot: Option<std::path::PathBuf>,

        /// Override the interaction mode (analysis, advisory, assistant)
        #[arg(long)]
        mode: Option<String>,

        /// Override the reply language (en, nl, de, fr, es, it)
        #[arg(long)]
        language: Option<String>,

        /// Which side of the design to analyze (schematic, pcb)
        #[arg(long)]
        context: Option<String>,
    },

    /// Show or edit configuration
    Config {
        #[command(subcommand)]
        action: commands::config_cmd::ConfigAction,
    },

    /// Diagnose system health
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Chat {
            message,
            snapshot,
            mode,
            language,
            context,
        } => commands::chat::run(message, snapshot, mode, language, context).await?,
        Commands::Config { action } => commands::config_cmd::run(action).await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
