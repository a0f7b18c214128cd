//! Khet-Engine command line.
//!
//! ## Usage
//!
//! - `khet-engine` - Show a demo
//! - `khet-engine demo` - Search the classic opening
//! - `khet-engine playout --seed 1` - Play a random game
//! - `khet-engine match --engine red` - Search against a random player

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use khet_engine::constants::{DEFAULT_BEAM_WIDTH, DEFAULT_MAX_DEPTH};
use khet_engine::piece::Color;
use khet_engine::playout::{PlayoutResult, play_match, playout};
use khet_engine::search::{SearchConfig, dump_candidates, search};
use khet_engine::setup::classic;

/// Khet-Engine: rules and beam search for a laser strategy game
#[derive(Parser)]
#[command(name = "khet-engine")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the classic opening and show the chosen move
    Demo {
        #[command(flatten)]
        limits: SearchArgs,
        /// Print every root candidate
        #[arg(long)]
        verbose: bool,
    },
    /// Play random moves for both sides from the classic opening
    Playout {
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 200)]
        max_plies: usize,
    },
    /// Pit the search against a random player
    Match {
        #[command(flatten)]
        limits: SearchArgs,
        /// Side played by the search
        #[arg(long, value_enum, default_value_t = Side::Red)]
        engine: Side,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 100)]
        max_plies: usize,
    },
}

#[derive(clap::Args)]
struct SearchArgs {
    /// Plies searched below the root
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    depth: usize,
    /// Children kept per node
    #[arg(long, default_value_t = DEFAULT_BEAM_WIDTH)]
    beam: usize,
}

impl SearchArgs {
    fn config(&self) -> SearchConfig {
        SearchConfig {
            max_depth: self.depth,
            beam_width: self.beam,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Side {
    Red,
    Silver,
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::Red => Color::Red,
            Side::Silver => Color::Silver,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Demo { limits, verbose }) => run_demo(&limits.config(), verbose),
        None => run_demo(&SearchConfig::default(), false),
        Some(Commands::Playout { seed, max_plies }) => {
            let mut rng = fastrand::Rng::with_seed(seed);
            let result = playout(&classic()?, max_plies, &mut rng)?;
            report(&result);
            Ok(())
        }
        Some(Commands::Match {
            limits,
            engine,
            seed,
            max_plies,
        }) => {
            let mut rng = fastrand::Rng::with_seed(seed);
            let result = play_match(
                &classic()?,
                &limits.config(),
                engine.into(),
                max_plies,
                &mut rng,
            )?;
            report(&result);
            Ok(())
        }
    }
}

fn run_demo(config: &SearchConfig, verbose: bool) -> Result<()> {
    println!("Khet-Engine: laser game rules and beam search\n");

    let board = classic()?;
    println!("=== Classic Opening ===");
    println!("{board}");

    let trace = board.trace_laser(board.next_turn());
    let hits: Vec<String> = trace.hits.iter().map(ToString::to_string).collect();
    println!("Red laser hits: {} -> {:?}\n", hits.join(" "), trace.outcome);

    println!(
        "=== Search (depth {}, beam {}) ===",
        config.max_depth, config.beam_width
    );
    let outcome = search(&board, config)?;
    if verbose {
        dump_candidates(&outcome);
    }
    println!("Best move: {} {}", outcome.from, outcome.mv);
    println!("Score: {} ({} nodes)\n", outcome.score, outcome.nodes);

    let next = board.apply_move(outcome.from, &outcome.mv)?;
    println!("{next}");
    Ok(())
}

fn report(result: &PlayoutResult) {
    println!("{}", result.board);
    match result.winner {
        Some(color) => println!("{color:?} wins after {} plies", result.plies),
        None => println!("No winner after {} plies", result.plies),
    }
}
