use crate::game::TimeControl;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gambit")]
#[command(about = "Play chess against a pluggable engine from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive game against the engine
    ///
    /// Moves are entered as coordinates (e2e4, e7e8q) or by selecting a
    /// square and then its destination (e2, then e4). Type 'help' during
    /// the game for the full command list.
    ///
    /// Examples:
    ///   gambit play
    ///   gambit play --color black --elo 1800
    ///   gambit play --time 5+3
    ///   gambit play --fen "8/8/8/4k3/8/8/4P3/4K3 w - - 0 1"
    Play {
        /// Color to play: 'white', 'black' or 'random' (default: white)
        #[arg(short, long)]
        color: Option<String>,
        /// Target engine strength
        #[arg(short, long)]
        elo: Option<u32>,
        /// Start from this position instead of the initial one
        #[arg(short, long)]
        fen: Option<String>,
        /// Time control as minutes+increment, e.g. 5+3
        #[arg(short, long)]
        time: Option<TimeControl>,
    },

    /// Show archived games
    ///
    /// Lists the most recent finished games with their results.
    ///
    /// Example: gambit games --limit 10
    Games {
        /// Maximum number of games to list
        #[arg(short, long, default_value_t = 20)]
        limit: u32,
    },

    /// Configuration file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the configuration file path
    Path,
    /// Print the active configuration
    Show,
}
