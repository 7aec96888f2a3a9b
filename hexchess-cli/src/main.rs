//! HexChess CLI - Command-line interface
//!
//! Commands:
//! - play: Hot-seat game in the terminal
//! - adjacency: Print the neighbor table of a layout
//! - layout: Print a layout as JSON
//! - rules: Print the rules summary

mod adjacency_cmd;
mod play_cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use hexchess_core::Layout;

#[derive(Parser)]
#[command(name = "hexchess")]
#[command(about = "HexChess hot-seat rules engine")]
struct Cli {
    /// Log engine decisions (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a two-player game on one terminal
    Play(play_cmd::PlayArgs),
    /// Print the neighbor table of a layout
    Adjacency(adjacency_cmd::AdjacencyArgs),
    /// Print a layout as JSON
    Layout {
        /// Layout JSON file (standard board if omitted)
        #[arg(long, value_name = "FILE")]
        layout: Option<PathBuf>,
    },
    /// Print the rules summary
    Rules,
}

const RULES: &str = "\
HexChess Rules:

- Objective: capture all of the opponent's regular pieces.
- Turn: place a piece from your bench OR move a piece on the board.
- Safe zones: pieces standing on a safe hex cannot be captured.
- Blocker: placing your blocker seals its hex for good and gives you a bonus action.
- Promotion: reach the center hex to promote a piece, allowing it to move in a straight line.";

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Play(args) => play_cmd::run(args),
        Commands::Adjacency(args) => adjacency_cmd::run(args),
        Commands::Layout { layout } => {
            let layout = load_layout(layout.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&layout)?);
            Ok(())
        }
        Commands::Rules => {
            println!("{RULES}");
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Load a layout file, or fall back to the standard board
pub(crate) fn load_layout(path: Option<&std::path::Path>) -> Result<Layout> {
    match path {
        Some(path) => {
            let layout = Layout::load(path)?;
            tracing::info!("Loaded layout '{}' from {}", layout.name, path.display());
            Ok(layout)
        }
        None => Ok(Layout::standard()),
    }
}
