//! Resona CLI - drive the effects player engine from the command line.

mod assets;
mod commands;
mod platform;
mod preset;
mod surface;
mod wav;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "resona")]
#[command(author, version, about = "Resona effects player", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render an audio file through the effects graph
    Render(commands::render::RenderArgs),

    /// Display WAV file information
    Info(commands::info::InfoArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Info(args) => commands::info::run(args),
    }
}
