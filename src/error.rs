//! Rule violations reported by board construction, move application and search.

use thiserror::Error;

use crate::board::Position;
use crate::piece::{Category, Color, Facing};

pub type Result<T, E = RuleError> = std::result::Result<T, E>;

/// Every way a rules operation can fail.
///
/// All of these are caller bugs or malformed input; none are transient.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("position ({row}, {col}) is outside the board")]
    OutOfBounds { row: usize, col: usize },

    #[error("piece at {position} does not belong to {expected:?} (found {found:?})")]
    WrongMover {
        position: Position,
        expected: Color,
        found: Option<Color>,
    },

    #[error("illegal swap from {from} to {to}")]
    IllegalSwap { from: Position, to: Position },

    #[error("facing {facing} is not legal for {category:?}")]
    InvalidFacing { category: Category, facing: Facing },

    #[error("{color:?} sphinx cannot be at {position} facing {facing}")]
    InvalidSphinxState {
        color: Color,
        position: Position,
        facing: Facing,
    },

    #[error("{to} cannot be reached from {from}")]
    UnreachableTarget { from: Position, to: Position },

    #[error("two pieces placed at {position}")]
    Overlap { position: Position },

    #[error("{color:?} already has a {category:?}")]
    DuplicatePiece { category: Category, color: Color },

    #[error("the game is already over, {winner:?} won")]
    GameOver { winner: Color },

    #[error("{color:?} has no legal moves")]
    NoLegalMoves { color: Color },
}
