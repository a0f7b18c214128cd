//! Board state, move application and laser resolution.
//!
//! A [`Board`] is a value: [`Board::apply_move`] never touches `self` and
//! returns a fresh board with the move placed, the turn passed, and the
//! mover's laser resolved. Elimination history is part of the value, so boards
//! derived along different search branches never share it.

use std::fmt;

use log::{trace, warn};

use crate::constants::{BOARD_AREA, COLS, MAX_LASER_HITS, ROWS};
use crate::error::{Result, RuleError};
use crate::piece::{Category, Color, Facing, Interaction, Move, Piece, can_displace, legal_moves};

/// A cell coordinate, `(row, col)` with row 0 at the top.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn in_bounds(self) -> bool {
        self.row < ROWS && self.col < COLS
    }

    /// The in-bounds cell `(dr, dc)` away, if any.
    pub fn offset(self, dr: isize, dc: isize) -> Option<Position> {
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        let pos = Position::new(row, col);
        pos.in_bounds().then_some(pos)
    }

    /// The next cell in direction `facing`, if still on the board.
    pub fn step(self, facing: Facing) -> Option<Position> {
        let (dr, dc) = facing.delta();
        self.offset(dr, dc)
    }

    /// True for the 8 surrounding cells (not for the cell itself).
    pub fn is_adjacent(self, other: Position) -> bool {
        self != other && self.row.abs_diff(other.row) <= 1 && self.col.abs_diff(other.col) <= 1
    }

    /// The point-reflected cell through the board center.
    pub fn mirrored(self) -> Result<Position> {
        self.check()?;
        Ok(Position::new(ROWS - 1 - self.row, COLS - 1 - self.col))
    }

    fn check(self) -> Result<()> {
        if self.in_bounds() {
            Ok(())
        } else {
            Err(RuleError::OutOfBounds {
                row: self.row,
                col: self.col,
            })
        }
    }

    #[inline]
    fn index(self) -> usize {
        self.row * COLS + self.col
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Position::new(row, col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// How a laser shot ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LaserOutcome {
    /// The shooter has no Sphinx on its home corner.
    NotFired,
    /// The beam left the board.
    Exited,
    /// A piece stopped the beam without being harmed.
    Absorbed(Position),
    /// The piece at this cell was destroyed.
    Eliminated(Position),
    /// The hit limit ran out while the beam was still reflecting off the
    /// piece at this cell. Unreachable on a legal board.
    Exhausted(Position),
}

/// Path of one laser shot: the cells it hit in order, and how it ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaserTrace {
    pub origin: Option<Position>,
    pub hits: Vec<Position>,
    /// Beam heading on arrival at each entry of `hits`
    pub headings: Vec<Facing>,
    pub outcome: LaserOutcome,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Piece>; BOARD_AREA],
    /// Eliminated pieces per color, oldest first.
    eliminated: [Vec<Piece>; 2],
    next_turn: Color,
}

impl Board {
    pub fn empty(next_turn: Color) -> Self {
        Self {
            cells: [None; BOARD_AREA],
            eliminated: [Vec::new(), Vec::new()],
            next_turn,
        }
    }

    pub fn next_turn(&self) -> Color {
        self.next_turn
    }

    /// The same position with a different side to move.
    pub fn with_next_turn(&self, color: Color) -> Board {
        let mut board = self.clone();
        board.next_turn = color;
        board
    }

    pub fn piece_at(&self, pos: Position) -> Result<Option<Piece>> {
        pos.check()?;
        Ok(self.cells[pos.index()])
    }

    pub fn is_empty(&self, pos: Position) -> Result<bool> {
        Ok(self.piece_at(pos)?.is_none())
    }

    /// All pieces in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.cells.iter().enumerate().filter_map(|(i, cell)| {
            cell.map(|piece| (Position::new(i / COLS, i % COLS), piece))
        })
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.pieces().filter(move |(_, p)| p.color() == color)
    }

    /// Pieces of `color` removed so far, in elimination order.
    pub fn eliminated(&self, color: Color) -> &[Piece] {
        &self.eliminated[color.index()]
    }

    /// The winner, once a Pharaoh has been eliminated.
    pub fn winner(&self) -> Option<Color> {
        [Color::Red, Color::Silver]
            .into_iter()
            .find(|&c| {
                self.eliminated(c)
                    .iter()
                    .any(|p| p.category() == Category::Pharaoh)
            })
            .map(Color::opposite)
    }

    pub fn is_game_over(&self) -> bool {
        self.winner().is_some()
    }

    /// Put a piece on an empty cell while setting up a position.
    ///
    /// Enforces one Pharaoh and one Sphinx per color, and the Sphinx's home
    /// corner and facings.
    pub fn place(&mut self, pos: Position, piece: Piece) -> Result<()> {
        if self.piece_at(pos)?.is_some() {
            return Err(RuleError::Overlap { position: pos });
        }
        match piece.category() {
            Category::Sphinx => check_sphinx(piece.color(), pos, piece.facing())?,
            Category::Pharaoh => {}
            _ => {
                self.cells[pos.index()] = Some(piece);
                return Ok(());
            }
        }
        if self
            .pieces_of(piece.color())
            .any(|(_, p)| p.category() == piece.category())
        {
            return Err(RuleError::DuplicatePiece {
                category: piece.category(),
                color: piece.color(),
            });
        }
        self.cells[pos.index()] = Some(piece);
        Ok(())
    }

    /// Play `mv` for the piece at `from`, returning the resulting board.
    ///
    /// After the piece is placed the turn passes and the mover's laser fires,
    /// possibly eliminating one piece of either color.
    pub fn apply_move(&self, from: Position, mv: &Move) -> Result<Board> {
        let piece = match self.piece_at(from)? {
            Some(p) if p.color() == self.next_turn => p,
            other => {
                return Err(RuleError::WrongMover {
                    position: from,
                    expected: self.next_turn,
                    found: other.map(|p| p.color()),
                });
            }
        };
        let target = mv.target;
        let occupant = self.piece_at(target)?;
        let moved = piece.with_facing(mv.facing)?;

        if piece.category() == Category::Sphinx {
            if mv.is_translation {
                return Err(RuleError::InvalidSphinxState {
                    color: piece.color(),
                    position: target,
                    facing: mv.facing,
                });
            }
            check_sphinx(piece.color(), from, mv.facing)?;
        }

        if mv.is_translation {
            if !from.is_adjacent(target) {
                return Err(RuleError::UnreachableTarget { from, to: target });
            }
            let swap_ok = match occupant {
                None => !mv.is_swap,
                Some(other) => {
                    mv.is_swap && piece.category() == Category::Scarab && can_displace(other)
                }
            };
            if !swap_ok {
                return Err(RuleError::IllegalSwap { from, to: target });
            }
        } else if mv.is_swap {
            return Err(RuleError::IllegalSwap { from, to: target });
        } else if target != from {
            return Err(RuleError::UnreachableTarget { from, to: target });
        }

        let mut next = self.clone();
        // Vacated by a step, refilled by the displaced piece on a swap.
        next.cells[from.index()] = if mv.is_translation { occupant } else { None };
        next.cells[target.index()] = Some(moved);
        next.next_turn = piece.color().opposite();

        if let LaserOutcome::Eliminated(at) = next.trace_laser(piece.color()).outcome {
            next.eliminate(at);
        }
        Ok(next)
    }

    /// Follow the laser fired by `color`'s Sphinx without changing the board.
    pub fn trace_laser(&self, color: Color) -> LaserTrace {
        let home = color.sphinx_home();
        let mut trace = LaserTrace {
            origin: None,
            hits: Vec::new(),
            headings: Vec::new(),
            outcome: LaserOutcome::NotFired,
        };
        let sphinx = self.cells[home.index()]
            .filter(|p| p.category() == Category::Sphinx && p.color() == color);
        let Some(sphinx) = sphinx else {
            return trace;
        };
        trace.origin = Some(home);

        let mut at = home;
        let mut heading = sphinx.facing();
        for _ in 0..MAX_LASER_HITS {
            let Some((hit, piece)) = self.cast_ray(at, heading) else {
                trace.outcome = LaserOutcome::Exited;
                return trace;
            };
            trace.hits.push(hit);
            trace.headings.push(heading);
            match piece.category().interact(heading, piece.facing()) {
                Interaction::Reflected(out) => {
                    at = hit;
                    heading = out;
                }
                Interaction::Eliminated => {
                    trace.outcome = LaserOutcome::Eliminated(hit);
                    return trace;
                }
                Interaction::Blocked => {
                    trace.outcome = LaserOutcome::Absorbed(hit);
                    return trace;
                }
            }
        }

        warn!("laser from {home} exceeded {MAX_LASER_HITS} hits, stopping at {at}");
        trace.outcome = LaserOutcome::Exhausted(at);
        trace
    }

    /// Nearest occupied cell from `from` (exclusive) heading `heading`.
    fn cast_ray(&self, from: Position, heading: Facing) -> Option<(Position, Piece)> {
        let mut at = from;
        while let Some(next) = at.step(heading) {
            if let Some(piece) = self.cells[next.index()] {
                return Some((next, piece));
            }
            at = next;
        }
        None
    }

    fn eliminate(&mut self, at: Position) {
        if let Some(piece) = self.cells[at.index()].take() {
            trace!("laser eliminated {piece} at {at}");
            self.eliminated[piece.color().index()].push(piece);
        }
    }

    /// Every legal move for the side to move, paired with the piece's cell.
    pub fn legal_moves_for_mover(&self) -> Result<Vec<(Position, Move)>> {
        let mut moves = Vec::new();
        for (pos, _) in self.pieces_of(self.next_turn) {
            moves.extend(legal_moves(self, pos)?.into_iter().map(|mv| (pos, mv)));
        }
        Ok(moves)
    }
}

/// A Sphinx must sit on its color's corner holding one of that corner's facings.
fn check_sphinx(color: Color, pos: Position, facing: Facing) -> Result<()> {
    if pos == color.sphinx_home() && color.sphinx_facings().contains(&facing) {
        Ok(())
    } else {
        Err(RuleError::InvalidSphinxState {
            color,
            position: pos,
            facing,
        })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for col in 0..COLS {
            write!(f, "{col:<5}")?;
        }
        writeln!(f)?;
        for row in 0..ROWS {
            write!(f, "{row} ")?;
            for col in 0..COLS {
                match self.cells[Position::new(row, col).index()] {
                    Some(piece) => write!(f, "{:<5}", piece.to_string())?,
                    None => write!(f, "{:<5}", ".")?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "{:?} to move", self.next_turn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(category: Category, color: Color, facing: Facing) -> Piece {
        Piece::new(category, color, facing).unwrap()
    }

    fn with_sphinxes() -> Board {
        let mut board = Board::empty(Color::Red);
        board
            .place(
                Position::new(0, 0),
                piece(Category::Sphinx, Color::Red, Facing::S),
            )
            .unwrap();
        board
            .place(
                Position::new(7, 9),
                piece(Category::Sphinx, Color::Silver, Facing::N),
            )
            .unwrap();
        board
    }

    #[test]
    fn test_position_bounds() {
        assert!(Position::new(7, 9).in_bounds());
        assert!(!Position::new(8, 0).in_bounds());
        assert!(!Position::new(0, 10).in_bounds());
        assert_eq!(Position::new(0, 0).offset(-1, 0), None);
        assert_eq!(Position::new(0, 0).offset(1, 1), Some(Position::new(1, 1)));
        assert_eq!(Position::new(7, 9).step(Facing::E), None);
    }

    #[test]
    fn test_piece_at_out_of_bounds() {
        let board = Board::empty(Color::Red);
        assert_eq!(
            board.piece_at(Position::new(8, 3)),
            Err(RuleError::OutOfBounds { row: 8, col: 3 })
        );
        assert!(board.is_empty(Position::new(3, 10)).is_err());
        assert_eq!(board.is_empty(Position::new(3, 3)), Ok(true));
    }

    #[test]
    fn test_place_rejects_overlap_and_duplicates() {
        let mut board = with_sphinxes();
        let pharaoh = piece(Category::Pharaoh, Color::Red, Facing::S);
        board.place(Position::new(0, 5), pharaoh).unwrap();
        assert_eq!(
            board.place(Position::new(0, 5), pharaoh),
            Err(RuleError::Overlap {
                position: Position::new(0, 5)
            })
        );
        assert_eq!(
            board.place(Position::new(1, 5), pharaoh),
            Err(RuleError::DuplicatePiece {
                category: Category::Pharaoh,
                color: Color::Red
            })
        );
    }

    #[test]
    fn test_sphinx_must_stay_home() {
        let mut board = Board::empty(Color::Red);
        let red = piece(Category::Sphinx, Color::Red, Facing::S);
        assert!(matches!(
            board.place(Position::new(7, 9), red),
            Err(RuleError::InvalidSphinxState { .. })
        ));
        let wrong_facing = piece(Category::Sphinx, Color::Red, Facing::N);
        assert!(matches!(
            board.place(Position::new(0, 0), wrong_facing),
            Err(RuleError::InvalidSphinxState { .. })
        ));
    }

    #[test]
    fn test_laser_exits_empty_board() {
        let board = with_sphinxes();
        let trace = board.trace_laser(Color::Red);
        assert_eq!(trace.origin, Some(Position::new(0, 0)));
        // Straight down column 0, nothing in the way.
        assert!(trace.hits.is_empty());
        assert_eq!(trace.outcome, LaserOutcome::Exited);
    }

    #[test]
    fn test_laser_not_fired_without_sphinx() {
        let board = Board::empty(Color::Red);
        assert_eq!(board.trace_laser(Color::Silver).outcome, LaserOutcome::NotFired);
    }

    #[test]
    fn test_laser_reflects_then_eliminates() {
        let mut board = with_sphinxes();
        // Beam goes down column 0, turns east at (4, 0), hits the Anubis side-on.
        board
            .place(
                Position::new(4, 0),
                piece(Category::Pyramid, Color::Red, Facing::NE),
            )
            .unwrap();
        board
            .place(
                Position::new(4, 6),
                piece(Category::Anubis, Color::Silver, Facing::N),
            )
            .unwrap();
        let trace = board.trace_laser(Color::Red);
        assert_eq!(trace.hits, vec![Position::new(4, 0), Position::new(4, 6)]);
        assert_eq!(trace.headings, vec![Facing::S, Facing::E]);
        assert_eq!(
            trace.outcome,
            LaserOutcome::Eliminated(Position::new(4, 6))
        );
    }

    #[test]
    fn test_apply_move_wrong_mover() {
        let board = with_sphinxes();
        let silver = Position::new(7, 9);
        let err = board
            .apply_move(silver, &Move::rotation(silver, Facing::W))
            .unwrap_err();
        assert_eq!(
            err,
            RuleError::WrongMover {
                position: silver,
                expected: Color::Red,
                found: Some(Color::Silver)
            }
        );
        let empty = Position::new(3, 3);
        assert!(matches!(
            board.apply_move(empty, &Move::rotation(empty, Facing::N)),
            Err(RuleError::WrongMover { found: None, .. })
        ));
    }

    #[test]
    fn test_apply_move_rejects_non_scarab_swap() {
        let mut board = with_sphinxes();
        board
            .place(
                Position::new(2, 2),
                piece(Category::Anubis, Color::Red, Facing::S),
            )
            .unwrap();
        board
            .place(
                Position::new(2, 3),
                piece(Category::Pyramid, Color::Silver, Facing::NE),
            )
            .unwrap();
        let from = Position::new(2, 2);
        let to = Position::new(2, 3);
        assert_eq!(
            board.apply_move(from, &Move::swap(to, Facing::S)),
            Err(RuleError::IllegalSwap { from, to })
        );
        assert_eq!(
            board.apply_move(from, &Move::step(to, Facing::S)),
            Err(RuleError::IllegalSwap { from, to })
        );
    }

    #[test]
    fn test_apply_move_rejects_far_step_and_bad_facing() {
        let mut board = with_sphinxes();
        let from = Position::new(2, 2);
        board
            .place(from, piece(Category::Anubis, Color::Red, Facing::S))
            .unwrap();
        let far = Position::new(4, 2);
        assert_eq!(
            board.apply_move(from, &Move::step(far, Facing::S)),
            Err(RuleError::UnreachableTarget { from, to: far })
        );
        assert_eq!(
            board.apply_move(from, &Move::rotation(from, Facing::SE)),
            Err(RuleError::InvalidFacing {
                category: Category::Anubis,
                facing: Facing::SE
            })
        );
    }

    #[test]
    fn test_sphinx_rotation_fires_new_heading() {
        let mut board = with_sphinxes();
        board
            .place(
                Position::new(0, 3),
                piece(Category::Pyramid, Color::Silver, Facing::SE),
            )
            .unwrap();
        let home = Position::new(0, 0);
        let next = board
            .apply_move(home, &Move::rotation(home, Facing::E))
            .unwrap();
        assert_eq!(next.next_turn(), Color::Silver);
        assert_eq!(next.piece_at(Position::new(0, 3)).unwrap(), None);
        assert_eq!(next.eliminated(Color::Silver).len(), 1);
        assert!(board.eliminated(Color::Silver).is_empty());
        assert!(matches!(
            board.apply_move(home, &Move::rotation(home, Facing::N)),
            Err(RuleError::InvalidSphinxState { .. })
        ));
    }

    #[test]
    fn test_winner_after_pharaoh_hit() {
        let mut board = with_sphinxes();
        board
            .place(
                Position::new(5, 0),
                piece(Category::Pharaoh, Color::Silver, Facing::N),
            )
            .unwrap();
        board
            .place(
                Position::new(2, 5),
                piece(Category::Anubis, Color::Red, Facing::S),
            )
            .unwrap();
        let from = Position::new(2, 5);
        let next = board
            .apply_move(from, &Move::rotation(from, Facing::E))
            .unwrap();
        assert_eq!(next.winner(), Some(Color::Red));
        assert!(next.is_game_over());
        assert_eq!(board.winner(), None);
    }

    fn with_scarab_by_sphinx() -> (Board, Position) {
        let mut board = with_sphinxes();
        let at = Position::new(1, 1);
        board
            .place(at, piece(Category::Scarab, Color::Red, Facing::NE))
            .unwrap();
        (board, at)
    }

    #[test]
    fn test_scarab_never_displaces_sphinx() {
        let (board, from) = with_scarab_by_sphinx();
        let home = Position::new(0, 0);
        let moves = legal_moves(&board, from).unwrap();
        assert!(!moves.is_empty());
        assert!(moves.iter().all(|mv| mv.target != home));
        assert_eq!(
            board.apply_move(from, &Move::swap(home, Facing::NE)),
            Err(RuleError::IllegalSwap { from, to: home })
        );
    }

    #[test]
    fn test_sphinx_cannot_translate() {
        let board = with_sphinxes();
        let home = Position::new(0, 0);
        let next = Position::new(0, 1);
        assert_eq!(
            board.apply_move(home, &Move::step(next, Facing::S)),
            Err(RuleError::InvalidSphinxState {
                color: Color::Red,
                position: next,
                facing: Facing::S
            })
        );
    }

    #[test]
    fn test_rotation_must_stay_in_place() {
        let (board, from) = with_scarab_by_sphinx();
        let elsewhere = Position::new(2, 2);
        assert_eq!(
            board.apply_move(from, &Move::rotation(elsewhere, Facing::NW)),
            Err(RuleError::UnreachableTarget {
                from,
                to: elsewhere
            })
        );
    }

    #[test]
    fn test_swap_onto_empty_cell_rejected() {
        let (board, from) = with_scarab_by_sphinx();
        let empty = Position::new(2, 2);
        assert_eq!(
            board.apply_move(from, &Move::swap(empty, Facing::NE)),
            Err(RuleError::IllegalSwap { from, to: empty })
        );
        // The same cell is fine as a plain step.
        assert!(board.apply_move(from, &Move::step(empty, Facing::NE)).is_ok());
    }

    #[test]
    fn test_display_marks_colors() {
        let board = with_sphinxes();
        let text = board.to_string();
        assert!(text.contains("X-S"));
        assert!(text.contains("x-N"));
        assert!(text.ends_with("Red to move\n"));
    }
}
