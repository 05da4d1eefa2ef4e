//! viewshot CLI - frame capture for editor-automation bridges
//!
//! Main entry point. Commands:
//! - `viewshot capture` - one-shot capture to a PNG file or base64
//! - `viewshot handle` - process a bridge-style JSON capture request

mod app;
mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "viewshot", version, about = "Frame capture and encode service")]
struct Cli {
    /// Log to stdout at debug level
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture one frame and write it as PNG
    Capture(commands::capture::CaptureArgs),
    /// Handle a bridge-style JSON request and print the JSON response
    Handle(commands::handle::HandleArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let ctx = app::initialize(app::InitOptions {
        verbose: cli.verbose,
    })?;

    match cli.command {
        Commands::Capture(args) => commands::capture::run(&ctx, args),
        Commands::Handle(args) => commands::handle::run(&ctx, args),
    }
}
