//! Panzer CLI - Command-line driver for the game engine
//!
//! Commands:
//! - play: Run the built-in skirmish from a command script
//! - config: Write the default game configuration

mod config_cmd;
mod play;
mod render;
mod scenario;
mod script;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "panzer")]
#[command(about = "Hex wargame engine driver")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the built-in skirmish from a command script
    Play(play::PlayArgs),
    /// Write the default game configuration as JSON
    Config(config_cmd::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging (RUST_LOG overrides the default level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play::run(args),
        Commands::Config(args) => config_cmd::run(args),
    }
}
