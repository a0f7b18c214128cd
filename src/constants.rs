//! Constants for board geometry, search parameters, and material values.
//!
//! The board is a fixed 8x10 grid addressed as `(row, col)`, row 0 at the top.
//! Red starts in the top-left corner and Silver in the bottom-right one.

// =============================================================================
// Board Geometry
// =============================================================================

/// Number of rows on the board.
pub const ROWS: usize = 8;

/// Number of columns on the board.
pub const COLS: usize = 10;

/// Total number of cells.
pub const BOARD_AREA: usize = ROWS * COLS;

/// Home corner of the Red Sphinx (the laser origin for Red).
pub const RED_SPHINX_HOME: (usize, usize) = (0, 0);

/// Home corner of the Silver Sphinx (the laser origin for Silver).
pub const SILVER_SPHINX_HOME: (usize, usize) = (ROWS - 1, COLS - 1);

/// Upper bound on pieces a single laser shot can visit.
///
/// Every hit lands on a distinct occupied cell, so this can never be reached
/// on a legal board.
pub const MAX_LASER_HITS: usize = BOARD_AREA;

// =============================================================================
// Neighbor Offsets
// =============================================================================

/// `(row, col)` offsets to the 8 surrounding cells.
/// Order: North, NE, East, SE, South, SW, West, NW
pub const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
];

// =============================================================================
// Search Parameters
// =============================================================================

/// Default depth of the search tree (plies below the root).
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// Default number of children kept for expansion at each node.
pub const DEFAULT_BEAM_WIDTH: usize = 5;

/// Depth below which search progress is logged at debug level.
pub const REPORT_DEPTH: usize = 2;

// =============================================================================
// Material Values
// =============================================================================

/// Losing the Pharaoh loses the game, so it outweighs everything else.
pub const PHARAOH_VALUE: i32 = 1000;

pub const SCARAB_VALUE: i32 = 3;

pub const ANUBIS_VALUE: i32 = 2;

pub const PYRAMID_VALUE: i32 = 1;

/// The Sphinx can never be eliminated.
pub const SPHINX_VALUE: i32 = 0;
