//! Piece primitives and the per-category rule table.
//!
//! Each [`Category`] supplies two rules:
//! - [`legal_moves`]: which moves a piece of that category may make from a cell
//! - [`Category::interact`]: what happens when the laser hits it
//!
//! Both are exhaustive matches over the closed set of categories.

use std::fmt;

use crate::board::{Board, Position};
use crate::constants::{
    ANUBIS_VALUE, NEIGHBOR_OFFSETS, PHARAOH_VALUE, PYRAMID_VALUE, RED_SPHINX_HOME, SCARAB_VALUE,
    SILVER_SPHINX_HOME, SPHINX_VALUE,
};
use crate::error::{Result, RuleError};

/// One of the 8 compass directions.
///
/// The discriminant is the ordinal used for turning: a quarter turn is 2 steps
/// and the opposite direction is 4 steps away.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Facing {
    N = 0,
    NE = 1,
    E = 2,
    SE = 3,
    S = 4,
    SW = 5,
    W = 6,
    NW = 7,
}

impl Facing {
    pub const ALL: [Facing; 8] = [
        Facing::N,
        Facing::NE,
        Facing::E,
        Facing::SE,
        Facing::S,
        Facing::SW,
        Facing::W,
        Facing::NW,
    ];

    pub const CARDINAL: [Facing; 4] = [Facing::N, Facing::E, Facing::S, Facing::W];

    pub const DIAGONAL: [Facing; 4] = [Facing::NE, Facing::SE, Facing::SW, Facing::NW];

    /// Facing for an ordinal, wrapping modulo 8.
    pub fn from_index(i: usize) -> Facing {
        Self::ALL[i % 8]
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Turn clockwise by `steps` eighths (negative turns counter-clockwise).
    pub fn turn(self, steps: isize) -> Facing {
        Self::from_index((self.index() as isize + steps).rem_euclid(8) as usize)
    }

    pub fn opposite(self) -> Facing {
        self.turn(4)
    }

    pub fn is_cardinal(self) -> bool {
        self.index() % 2 == 0
    }

    pub fn is_diagonal(self) -> bool {
        !self.is_cardinal()
    }

    /// `(row, col)` offset of one step in this direction. North is row - 1.
    pub fn delta(self) -> (isize, isize) {
        NEIGHBOR_OFFSETS[self.index()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Facing::N => "N",
            Facing::NE => "NE",
            Facing::E => "E",
            Facing::SE => "SE",
            Facing::S => "S",
            Facing::SW => "SW",
            Facing::W => "W",
            Facing::NW => "NW",
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Silver,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::Red => Color::Silver,
            Color::Silver => Color::Red,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Color::Red => 0,
            Color::Silver => 1,
        }
    }

    /// The corner this color's Sphinx is pinned to.
    pub fn sphinx_home(self) -> Position {
        let (row, col) = match self {
            Color::Red => RED_SPHINX_HOME,
            Color::Silver => SILVER_SPHINX_HOME,
        };
        Position::new(row, col)
    }

    /// The two facings this color's Sphinx may toggle between.
    pub fn sphinx_facings(self) -> [Facing; 2] {
        match self {
            Color::Red => [Facing::S, Facing::E],
            Color::Silver => [Facing::N, Facing::W],
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Pharaoh,
    Scarab,
    Pyramid,
    Anubis,
    Sphinx,
}

impl Category {
    /// Whether a piece of this category may ever hold `facing`.
    ///
    /// For a Sphinx this is only the category-wide check; which two cardinal
    /// facings are allowed depends on its color (see [`Color::sphinx_facings`]).
    pub fn allows(self, facing: Facing) -> bool {
        match self {
            Category::Pharaoh | Category::Anubis | Category::Sphinx => facing.is_cardinal(),
            Category::Pyramid => facing.is_diagonal(),
            Category::Scarab => matches!(facing, Facing::NE | Facing::NW),
        }
    }

    /// Material value used by the static evaluator.
    pub fn value(self) -> i32 {
        match self {
            Category::Pharaoh => PHARAOH_VALUE,
            Category::Scarab => SCARAB_VALUE,
            Category::Anubis => ANUBIS_VALUE,
            Category::Pyramid => PYRAMID_VALUE,
            Category::Sphinx => SPHINX_VALUE,
        }
    }

    /// Single-letter tag used when printing boards.
    pub fn letter(self) -> char {
        match self {
            Category::Pharaoh => 'K',
            Category::Scarab => 'S',
            Category::Pyramid => 'P',
            Category::Anubis => 'A',
            Category::Sphinx => 'X',
        }
    }

    /// Resolve a laser traveling in `laser` hitting a piece facing `piece`.
    pub fn interact(self, laser: Facing, piece: Facing) -> Interaction {
        match self {
            Category::Pharaoh => Interaction::Eliminated,
            Category::Anubis => {
                if laser == piece.opposite() {
                    Interaction::Blocked
                } else {
                    Interaction::Eliminated
                }
            }
            Category::Pyramid => match mirror_reflection(piece, laser) {
                Some(out) => Interaction::Reflected(out),
                None if laser.is_cardinal() => Interaction::Eliminated,
                None => Interaction::Blocked,
            },
            // Both faces of a Scarab are mirrors.
            Category::Scarab => mirror_reflection(piece, laser)
                .or_else(|| mirror_reflection(piece.opposite(), laser))
                .map_or(Interaction::Blocked, Interaction::Reflected),
            Category::Sphinx => Interaction::Blocked,
        }
    }
}

/// Reflection off a single mirrored face pointing `mirror` (a diagonal).
///
/// The face spans the two cardinal directions either side of `mirror`. A beam
/// travelling against one of them is turned to leave along the other.
fn mirror_reflection(mirror: Facing, laser: Facing) -> Option<Facing> {
    let left = mirror.turn(-1);
    let right = mirror.turn(1);
    if laser == left.opposite() {
        Some(right)
    } else if laser == right.opposite() {
        Some(left)
    } else {
        None
    }
}

/// Outcome of the laser hitting a piece.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Interaction {
    /// The piece is removed and the beam stops.
    Eliminated,
    /// The piece survives and the beam continues in the new direction.
    Reflected(Facing),
    /// The piece survives and absorbs the beam.
    Blocked,
}

impl Interaction {
    pub fn eliminated(self) -> bool {
        matches!(self, Interaction::Eliminated)
    }

    /// The beam's new heading, or `None` if it stops here.
    pub fn new_facing(self) -> Option<Facing> {
        match self {
            Interaction::Reflected(f) => Some(f),
            Interaction::Eliminated | Interaction::Blocked => None,
        }
    }
}

/// A piece on the board. Immutable: moves replace pieces rather than edit them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    category: Category,
    color: Color,
    facing: Facing,
}

impl Piece {
    /// Create a piece, rejecting facings its category never holds.
    pub fn new(category: Category, color: Color, facing: Facing) -> Result<Piece> {
        if !category.allows(facing) {
            return Err(RuleError::InvalidFacing { category, facing });
        }
        Ok(Piece {
            category,
            color,
            facing,
        })
    }

    /// The same piece turned to `facing`.
    pub fn with_facing(self, facing: Facing) -> Result<Piece> {
        Piece::new(self.category, self.color, facing)
    }

    #[inline]
    pub fn category(&self) -> Category {
        self.category
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn facing(&self) -> Facing {
        self.facing
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self.color {
            Color::Red => self.category.letter(),
            Color::Silver => self.category.letter().to_ascii_lowercase(),
        };
        write!(f, "{letter}-{}", self.facing)
    }
}

/// A move for the piece on some source cell.
///
/// A rotation keeps `target` equal to the source cell. A swap is a Scarab
/// translation onto an occupied cell; the occupant goes to the source cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub target: Position,
    pub facing: Facing,
    pub is_translation: bool,
    pub is_swap: bool,
}

impl Move {
    pub fn rotation(at: Position, facing: Facing) -> Move {
        Move {
            target: at,
            facing,
            is_translation: false,
            is_swap: false,
        }
    }

    pub fn step(to: Position, facing: Facing) -> Move {
        Move {
            target: to,
            facing,
            is_translation: true,
            is_swap: false,
        }
    }

    pub fn swap(to: Position, facing: Facing) -> Move {
        Move {
            target: to,
            facing,
            is_translation: true,
            is_swap: true,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.is_translation, self.is_swap) {
            (false, _) => write!(f, "rotate to {}", self.facing),
            (true, false) => write!(f, "step to {} facing {}", self.target, self.facing),
            (true, true) => write!(f, "swap with {} facing {}", self.target, self.facing),
        }
    }
}

/// All moves available to the piece at `position`.
///
/// An empty cell has no moves. A Sphinx away from its home corner, or holding
/// a facing its corner does not allow, is an error.
pub fn legal_moves(board: &Board, position: Position) -> Result<Vec<Move>> {
    let Some(piece) = board.piece_at(position)? else {
        return Ok(Vec::new());
    };
    match piece.category() {
        // Turning a Pharaoh changes nothing, so it only steps.
        Category::Pharaoh => step_or_turn(board, position, piece, false),
        Category::Anubis | Category::Pyramid => step_or_turn(board, position, piece, true),
        Category::Scarab => scarab_moves(board, position, piece),
        Category::Sphinx => sphinx_moves(position, piece),
    }
}

/// Quarter turns either way plus steps to any empty neighbor.
fn step_or_turn(
    board: &Board,
    from: Position,
    piece: Piece,
    rotations: bool,
) -> Result<Vec<Move>> {
    let mut moves = Vec::with_capacity(NEIGHBOR_OFFSETS.len() + 2);
    if rotations {
        moves.push(Move::rotation(from, piece.facing().turn(2)));
        moves.push(Move::rotation(from, piece.facing().turn(-2)));
    }
    for (dr, dc) in NEIGHBOR_OFFSETS {
        if let Some(to) = from.offset(dr, dc) {
            if board.is_empty(to)? {
                moves.push(Move::step(to, piece.facing()));
            }
        }
    }
    Ok(moves)
}

fn scarab_moves(board: &Board, from: Position, piece: Piece) -> Result<Vec<Move>> {
    let flipped = match piece.facing() {
        Facing::NE => Facing::NW,
        Facing::NW => Facing::NE,
        facing => {
            return Err(RuleError::InvalidFacing {
                category: Category::Scarab,
                facing,
            });
        }
    };

    let mut moves = Vec::with_capacity(NEIGHBOR_OFFSETS.len() + 1);
    moves.push(Move::rotation(from, flipped));
    for (dr, dc) in NEIGHBOR_OFFSETS {
        let Some(to) = from.offset(dr, dc) else {
            continue;
        };
        match board.piece_at(to)? {
            None => moves.push(Move::step(to, piece.facing())),
            Some(other) if can_displace(other) => moves.push(Move::swap(to, piece.facing())),
            Some(_) => {}
        }
    }
    Ok(moves)
}

/// Whether a Scarab may swap places with `occupant`.
///
/// Scarabs never swap with each other, and a Sphinx never leaves its corner.
pub(crate) fn can_displace(occupant: Piece) -> bool {
    !matches!(occupant.category(), Category::Scarab | Category::Sphinx)
}

fn sphinx_moves(at: Position, piece: Piece) -> Result<Vec<Move>> {
    let [a, b] = piece.color().sphinx_facings();
    let other = if piece.facing() == a { b } else { a };
    if at != piece.color().sphinx_home() || (piece.facing() != a && piece.facing() != b) {
        return Err(RuleError::InvalidSphinxState {
            color: piece.color(),
            position: at,
            facing: piece.facing(),
        });
    }
    Ok(vec![Move::rotation(at, other)])
}
