//! Beam-limited game-tree search with a static material evaluator.
//!
//! The search expands a tree of [`GameNode`]s to a fixed depth. At each node
//! every legal move is applied and scored, the children are ranked for the
//! node's mover, and only the best `beam_width` of them are expanded further.
//! Scores are then backed up from the kept children.
//!
//! Scores are from a material point of view: Red pieces count positive and
//! Silver pieces negative. Ranking and backup use opposite directions for the
//! same mover (see [`rank_children`] and [`backed_up_score`]).

use std::cmp::Reverse;

use log::debug;

use crate::board::{Board, Position};
use crate::constants::{DEFAULT_BEAM_WIDTH, DEFAULT_MAX_DEPTH, REPORT_DEPTH};
use crate::error::{Result, RuleError};
use crate::piece::{Color, Move};

/// Material balance: Red pieces add their value, Silver pieces subtract it.
pub fn score_position(board: &Board) -> i32 {
    board
        .pieces()
        .map(|(_, p)| match p.color() {
            Color::Red => p.category().value(),
            Color::Silver => -p.category().value(),
        })
        .sum()
}

/// Search limits.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    /// Plies below the root. Values below 1 are treated as 1.
    pub max_depth: usize,
    /// Children kept for expansion at each node. Values below 1 are treated as 1.
    pub beam_width: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            beam_width: DEFAULT_BEAM_WIDTH,
        }
    }
}

/// A node in the search tree.
pub struct GameNode {
    /// The position at this node
    pub board: Board,
    /// Side whose preference orders this node's children
    pub mover: Color,
    /// Static score, replaced by the backed-up score once expanded
    pub score: i32,
    /// Plies from the root
    pub depth: usize,
    /// Move that led here from the parent (`None` at the root)
    pub via: Option<(Position, Move)>,
    /// Kept children, best first for `mover`
    pub children: Vec<GameNode>,
}

impl GameNode {
    /// Root node; its mover is the side to move.
    pub fn root(board: Board) -> Self {
        Self {
            mover: board.next_turn(),
            score: score_position(&board),
            depth: 0,
            via: None,
            children: Vec::new(),
            board,
        }
    }

    /// Child reached by playing `mv` from `from`. Its mover is the side that
    /// played the move.
    fn child(&self, from: Position, mv: Move) -> Result<GameNode> {
        let board = self.board.apply_move(from, &mv)?;
        Ok(GameNode {
            mover: self.board.next_turn(),
            score: score_position(&board),
            depth: self.depth + 1,
            via: Some((from, mv)),
            children: Vec::new(),
            board,
        })
    }
}

/// Order children best-first for `mover`: ascending for Red, descending for
/// Silver. The sort is stable, so ties keep move-generation order.
pub fn rank_children(mover: Color, children: &mut [GameNode]) {
    match mover {
        Color::Red => children.sort_by_key(|c| c.score),
        Color::Silver => children.sort_by_key(|c| Reverse(c.score)),
    }
}

/// Score backed up into a node from its kept children: the maximum for a Red
/// mover, the minimum for a Silver one. `None` without children.
pub fn backed_up_score(mover: Color, children: &[GameNode]) -> Option<i32> {
    let scores = children.iter().map(|c| c.score);
    match mover {
        Color::Red => scores.max(),
        Color::Silver => scores.min(),
    }
}

/// Expand `node` recursively down to `config.max_depth`.
///
/// Finished games and positions without moves are left as leaves. Any rule
/// error while generating or applying moves aborts the whole search.
/// Returns the number of nodes expanded.
pub fn expand(node: &mut GameNode, config: &SearchConfig) -> Result<usize> {
    if node.depth >= config.max_depth.max(1) || node.board.is_game_over() {
        return Ok(0);
    }

    let mut children = node
        .board
        .legal_moves_for_mover()?
        .into_iter()
        .map(|(from, mv)| node.child(from, mv))
        .collect::<Result<Vec<_>>>()?;

    rank_children(node.mover, &mut children);
    children.truncate(config.beam_width.max(1));

    let mut expanded = 1;
    for child in &mut children {
        expanded += expand(child, config)?;
    }
    if let Some(score) = backed_up_score(node.mover, &children) {
        node.score = score;
    }
    node.children = children;

    if node.depth < REPORT_DEPTH {
        debug!(
            "completed search: depth {} score {} ({} nodes)",
            node.depth, node.score, expanded
        );
    }
    Ok(expanded)
}

/// A root child that survived the beam.
#[derive(Clone, Debug)]
pub struct Candidate {
    pub from: Position,
    pub mv: Move,
    pub board: Board,
    /// Backed-up score (the static score if the child was a leaf)
    pub score: i32,
}

/// Result of [`search`].
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    pub from: Position,
    pub mv: Move,
    pub score: i32,
    /// The root's kept children, best first for the root's mover
    pub candidates: Vec<Candidate>,
    /// Number of nodes expanded
    pub nodes: usize,
}

/// Search from `board` and return the move leading to the child whose score
/// was backed up into the root.
///
/// Fails with `GameOver` if a Pharaoh has already fallen, and with
/// `NoLegalMoves` if the side to move cannot move.
pub fn search(board: &Board, config: &SearchConfig) -> Result<SearchOutcome> {
    if let Some(winner) = board.winner() {
        return Err(RuleError::GameOver { winner });
    }
    let mut root = GameNode::root(board.clone());
    let nodes = expand(&mut root, config)?;

    let (from, mv) = root
        .children
        .iter()
        .find(|c| c.score == root.score)
        .and_then(|c| c.via)
        .ok_or(RuleError::NoLegalMoves {
            color: board.next_turn(),
        })?;

    let candidates = root
        .children
        .into_iter()
        .filter_map(|c| {
            let (from, mv) = c.via?;
            Some(Candidate {
                from,
                mv,
                board: c.board,
                score: c.score,
            })
        })
        .collect();

    Ok(SearchOutcome {
        from,
        mv,
        score: root.score,
        candidates,
        nodes,
    })
}

/// Print debug information about the root's candidates.
pub fn dump_candidates(outcome: &SearchOutcome) {
    for c in &outcome.candidates {
        eprintln!("{} {} score={}", c.from, c.mv, c.score);
    }
}
