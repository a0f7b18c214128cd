//! Initial positions built from placement tables.
//!
//! A seed table lists one player's half of the board. Each seed is mirrored to
//! the other color on the point-reflected cell, with the facing turned 180°.
//! Scarabs keep their facing value unchanged when mirrored.

use crate::board::{Board, Position};
use crate::error::Result;
use crate::piece::{Category, Color, Facing, Piece};

/// One entry of a setup table: `(row, col, category, color, facing)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    pub row: usize,
    pub col: usize,
    pub category: Category,
    pub color: Color,
    pub facing: Facing,
}

impl Placement {
    pub const fn new(
        row: usize,
        col: usize,
        category: Category,
        color: Color,
        facing: Facing,
    ) -> Self {
        Self {
            row,
            col,
            category,
            color,
            facing,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }

    pub fn piece(&self) -> Result<Piece> {
        Piece::new(self.category, self.color, self.facing)
    }

    /// The matching placement for the other player.
    pub fn mirrored(&self) -> Result<Placement> {
        let pos = self.position().mirrored()?;
        let facing = match self.category {
            Category::Scarab => self.facing,
            _ => self.facing.opposite(),
        };
        Ok(Placement::new(
            pos.row,
            pos.col,
            self.category,
            self.color.opposite(),
            facing,
        ))
    }
}

impl From<(usize, usize, Category, Color, Facing)> for Placement {
    fn from((row, col, category, color, facing): (usize, usize, Category, Color, Facing)) -> Self {
        Placement::new(row, col, category, color, facing)
    }
}

/// Mirror every placement in a table.
pub fn mirror_all(placements: &[Placement]) -> Result<Vec<Placement>> {
    placements.iter().map(Placement::mirrored).collect()
}

/// Build a board from a complete table, placing each entry as given.
pub fn board_from_placements(placements: &[Placement], next_turn: Color) -> Result<Board> {
    let mut board = Board::empty(next_turn);
    for placement in placements {
        board.place(placement.position(), placement.piece()?)?;
    }
    Ok(board)
}

/// Build a board from one half's seeds plus their mirror images. Red moves first.
pub fn board_from_seeds(seeds: &[Placement]) -> Result<Board> {
    let mut full = seeds.to_vec();
    full.extend(mirror_all(seeds)?);
    board_from_placements(&full, Color::Red)
}

/// Red's half of the classic opening.
pub const CLASSIC_SEEDS: [Placement; 13] = {
    use Category::*;
    use Color::Red;
    [
        Placement::new(0, 0, Sphinx, Red, Facing::S),
        Placement::new(0, 4, Anubis, Red, Facing::S),
        Placement::new(0, 5, Pharaoh, Red, Facing::S),
        Placement::new(0, 6, Anubis, Red, Facing::S),
        Placement::new(0, 7, Pyramid, Red, Facing::SE),
        Placement::new(1, 2, Pyramid, Red, Facing::SW),
        Placement::new(3, 0, Pyramid, Red, Facing::NE),
        Placement::new(3, 4, Scarab, Red, Facing::NE),
        Placement::new(3, 5, Scarab, Red, Facing::NW),
        Placement::new(3, 7, Pyramid, Red, Facing::SE),
        Placement::new(4, 0, Pyramid, Red, Facing::SE),
        Placement::new(4, 7, Pyramid, Red, Facing::NE),
        Placement::new(5, 6, Pyramid, Red, Facing::SE),
    ]
};

/// The classic opening position with Red to move.
pub fn classic() -> Result<Board> {
    board_from_seeds(&CLASSIC_SEEDS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleError;

    #[test]
    fn test_mirror_turns_facing() {
        let seed = Placement::new(0, 7, Category::Pyramid, Color::Red, Facing::SE);
        let m = seed.mirrored().unwrap();
        assert_eq!(m.position(), Position::new(7, 2));
        assert_eq!(m.color, Color::Silver);
        assert_eq!(m.facing, Facing::NW);
    }

    #[test]
    fn test_mirror_keeps_scarab_facing() {
        let seed = Placement::new(3, 4, Category::Scarab, Color::Red, Facing::NE);
        let m = seed.mirrored().unwrap();
        assert_eq!(m.position(), Position::new(4, 5));
        assert_eq!(m.facing, Facing::NE);
    }

    #[test]
    fn test_mirror_twice_is_identity() {
        let twice = mirror_all(&mirror_all(&CLASSIC_SEEDS).unwrap()).unwrap();
        assert_eq!(twice, CLASSIC_SEEDS.to_vec());
    }

    #[test]
    fn test_mirror_out_of_range() {
        let bad = Placement::new(8, 0, Category::Pyramid, Color::Red, Facing::NE);
        assert_eq!(bad.mirrored(), Err(RuleError::OutOfBounds { row: 8, col: 0 }));
    }

    #[test]
    fn test_classic_counts() {
        let board = classic().unwrap();
        assert_eq!(board.pieces().count(), 26);
        assert_eq!(board.pieces_of(Color::Red).count(), 13);
        assert_eq!(board.pieces_of(Color::Silver).count(), 13);
        assert_eq!(board.next_turn(), Color::Red);
        let sphinx = board.piece_at(Position::new(7, 9)).unwrap().unwrap();
        assert_eq!(sphinx.category(), Category::Sphinx);
        assert_eq!(sphinx.facing(), Facing::N);
    }

    #[test]
    fn test_bad_facing_fails_construction() {
        let seeds = [Placement::new(2, 2, Category::Pyramid, Color::Red, Facing::N)];
        assert!(matches!(
            board_from_seeds(&seeds),
            Err(RuleError::InvalidFacing { .. })
        ));
    }

    #[test]
    fn test_overlapping_mirror_fails_construction() {
        // The second seed sits where the first one mirrors to.
        let seeds = [
            Placement::new(3, 4, Category::Pyramid, Color::Red, Facing::NE),
            Placement::new(4, 5, Category::Pyramid, Color::Red, Facing::NE),
        ];
        assert!(matches!(
            board_from_seeds(&seeds),
            Err(RuleError::Overlap { .. })
        ));
    }
}
