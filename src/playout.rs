//! Random play: random legal moves, playouts, and engine-vs-random matches.
//!
//! All randomness comes from a caller-supplied [`fastrand::Rng`], so a seeded
//! generator replays the same game.

use fastrand::Rng;
use log::debug;

use crate::board::{Board, Position};
use crate::error::Result;
use crate::piece::{Color, Move};
use crate::search::{SearchConfig, search};

/// A uniformly random legal move for the side to move, or `None` if it has none.
pub fn random_move(board: &Board, rng: &mut Rng) -> Result<Option<(Position, Move)>> {
    let moves = board.legal_moves_for_mover()?;
    if moves.is_empty() {
        return Ok(None);
    }
    Ok(Some(moves[rng.usize(..moves.len())]))
}

/// How a game from [`playout`] or [`play_match`] ended.
#[derive(Clone, Debug)]
pub struct PlayoutResult {
    /// Final position
    pub board: Board,
    /// Moves played
    pub plies: usize,
    /// Set if a Pharaoh fell
    pub winner: Option<Color>,
}

/// Play random moves for both sides until a Pharaoh falls, a side has no
/// moves, or `max_plies` moves have been played.
pub fn playout(board: &Board, max_plies: usize, rng: &mut Rng) -> Result<PlayoutResult> {
    run_game(board, max_plies, |b| random_move(b, rng))
}

/// Play `engine` with the search against a random opponent.
pub fn play_match(
    board: &Board,
    config: &SearchConfig,
    engine: Color,
    max_plies: usize,
    rng: &mut Rng,
) -> Result<PlayoutResult> {
    run_game(board, max_plies, |b| {
        if b.next_turn() == engine {
            let outcome = search(b, config)?;
            debug!("engine plays {} {} (score {})", outcome.from, outcome.mv, outcome.score);
            Ok(Some((outcome.from, outcome.mv)))
        } else {
            random_move(b, rng)
        }
    })
}

fn run_game<F>(board: &Board, max_plies: usize, mut choose: F) -> Result<PlayoutResult>
where
    F: FnMut(&Board) -> Result<Option<(Position, Move)>>,
{
    let mut board = board.clone();
    let mut plies = 0;
    while plies < max_plies && !board.is_game_over() {
        let Some((from, mv)) = choose(&board)? else {
            break;
        };
        board = board.apply_move(from, &mv)?;
        plies += 1;
    }
    let winner = board.winner();
    Ok(PlayoutResult {
        board,
        plies,
        winner,
    })
}
