//! Mineprob CLI
//!
//! Bench harness for the exact solver and drainer.
//!
//! # Usage
//! ```bash
//! # solver-driven playthroughs with win-rate reporting
//! mineprob play --width 6 --height 6 --mines 5 --games 20
//!
//! # exhaustive optimal-play drain over a small hidden board
//! mineprob drain --width 3 --height 3 --mines 2
//! ```

mod bench;
mod board;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mineprob")]
#[command(about = "Exact minesweeper probability and optimal-play bench harness")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play random boards with the exact solver and report win rates
    Play {
        /// Board width
        #[arg(long, default_value = "6")]
        width: usize,

        /// Board height
        #[arg(long, default_value = "6")]
        height: usize,

        /// Number of mines
        #[arg(long, default_value = "5")]
        mines: usize,

        /// Number of games to play
        #[arg(long, default_value = "20")]
        games: usize,

        /// RNG seed for board generation
        #[arg(long, default_value = "42")]
        seed: u64,
    },

    /// Exhaustively drain a small hidden board for the optimal opening
    Drain {
        /// Board width
        #[arg(long, default_value = "3")]
        width: usize,

        /// Board height
        #[arg(long, default_value = "3")]
        height: usize,

        /// Number of mines
        #[arg(long, default_value = "2")]
        mines: usize,

        /// RNG seed for board generation
        #[arg(long, default_value = "42")]
        seed: u64,
    },
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Commands::Play {
            width,
            height,
            mines,
            games,
            seed,
        } => bench::run_play(width, height, mines, games, seed),
        Commands::Drain {
            width,
            height,
            mines,
            seed,
        } => bench::run_drain(width, height, mines, seed),
    }
}
