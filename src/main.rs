//! Hexloop-Rust: a hex-grid pipe puzzle engine.
//!
//! ## Usage
//!
//! - `hexloop-rust` - Play a short random demo game
//! - `hexloop-rust protocol` - Serve the text protocol on stdin/stdout
//! - `hexloop-rust demo` - Same as the default
//!
//! Logs go to stderr; set `RUST_LOG=debug` to see every walk.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hexloop_rust::constants::{CLEAR_DELAY_TICKS, COLS, ROWS};
use hexloop_rust::game::{Game, GameConfig};
use hexloop_rust::protocol::ProtocolEngine;
use hexloop_rust::scoring::with_commas;

/// Hexloop-Rust: a hex-grid pipe puzzle engine
#[derive(Parser)]
#[command(name = "hexloop-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    board: BoardArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct BoardArgs {
    /// Number of tile rows
    #[arg(long, default_value_t = ROWS, env = "HEXLOOP_ROWS")]
    rows: usize,

    /// Number of tile columns
    #[arg(long, default_value_t = COLS, env = "HEXLOOP_COLS")]
    cols: usize,

    /// Ticks between a loop closing and its tiles clearing
    #[arg(long, default_value_t = CLEAR_DELAY_TICKS, env = "HEXLOOP_CLEAR_DELAY")]
    clear_delay: u32,

    /// Seed for the tile generator (random if omitted)
    #[arg(long, env = "HEXLOOP_SEED")]
    seed: Option<u64>,
}

impl BoardArgs {
    fn config(&self) -> GameConfig {
        GameConfig {
            rows: self.rows,
            cols: self.cols,
            clear_delay: self.clear_delay,
            seed: self.seed,
            ..GameConfig::default()
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the line-based text protocol on stdin/stdout
    Protocol,
    /// Play random placements and print the result
    Demo {
        /// Stop after this many placements
        #[arg(long, default_value_t = 500)]
        max_moves: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();
    if cli.board.rows == 0 || cli.board.cols == 0 {
        anyhow::bail!("board needs at least one row and one column");
    }
    let game = Game::new(cli.board.config());

    match cli.command {
        Some(Commands::Protocol) => ProtocolEngine::new(game).run(),
        Some(Commands::Demo { max_moves }) => {
            run_demo(game, max_moves);
            Ok(())
        }
        None => {
            run_demo(game, 500);
            Ok(())
        }
    }
}

fn run_demo(mut game: Game, max_moves: usize) {
    println!("Hexloop-Rust: hex-grid pipe puzzle\n");

    let mut rng = match game.config().seed {
        Some(seed) => fastrand::Rng::with_seed(seed.wrapping_add(1)),
        None => fastrand::Rng::new(),
    };
    let mut moves = 0;
    let mut loops_closed = 0;

    while moves < max_moves && !game.is_game_over() {
        if game.is_resolving() {
            game.tick();
            continue;
        }
        let empty: Vec<_> = game
            .all_coordinates()
            .into_iter()
            .filter(|&c| game.is_empty(c))
            .collect();
        if empty.is_empty() {
            break;
        }
        let coord = empty[rng.usize(..empty.len())];
        let result = game.place(coord);
        moves += 1;
        if !result.closed_loops.is_empty() {
            loops_closed += result.closed_loops.len();
            println!(
                "move {moves}: {coord} closed {} loop(s) for {} points",
                result.closed_loops.len(),
                result.points_awarded
            );
        }
    }

    println!("\n{}", game.grid());
    println!("Moves: {moves}");
    println!("Loops closed: {loops_closed}");
    println!("Score: {}", with_commas(game.score()));
    if game.is_game_over() {
        println!("Game over: no empty tile left");
    }
}
