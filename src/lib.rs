//! Khet-Engine: rules and move search for a laser strategy game.
//!
//! Two players, Red and Silver, move mirrored and facing-dependent pieces on an
//! 8x10 board. After every move the mover's Sphinx fires a laser that reflects
//! off mirrors and may eliminate one piece. Losing the Pharaoh loses the game.
//!
//! ## Modules
//!
//! - [`constants`] - Board dimensions, search defaults, material values
//! - [`piece`] - Facings, colors, pieces, moves, and the per-category rules
//! - [`board`] - Board state, move application, laser resolution
//! - [`setup`] - Placement tables, mirroring, the classic opening
//! - [`search`] - Beam-limited tree search with a material evaluator
//! - [`playout`] - Seeded random play and engine-vs-random matches
//! - [`error`] - Rule violations
//!
//! ## Example
//!
//! ```
//! use khet_engine::search::{search, SearchConfig};
//! use khet_engine::setup::classic;
//!
//! let board = classic().unwrap();
//! let config = SearchConfig { max_depth: 1, beam_width: 5 };
//! let best = search(&board, &config).unwrap();
//! println!("Best move: {} {}", best.from, best.mv);
//!
//! let next = board.apply_move(best.from, &best.mv).unwrap();
//! println!("{next}");
//! ```

pub mod board;
pub mod constants;
pub mod error;
pub mod piece;
pub mod playout;
pub mod search;
pub mod setup;
