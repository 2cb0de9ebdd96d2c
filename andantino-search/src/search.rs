//! Iterative-deepening NegaMax with principal-variation (NegaScout) pruning

use crate::table::{plane_index, Bound, Entry, TranspositionTable};
use crate::tree::{NodeId, SearchTree};
use andantino_core::{BoardState, Evaluator, Hex, MoveError, Stone};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, trace};

/// Search window infinity; negation must stay in range
const INF: i32 = i32::MAX;

/// The two short neighbors of the center the opening rule picks from
const OPENING_MOVES: [Hex; 2] = [Hex { x: -1, y: 0, z: 1 }, Hex { x: 0, y: -1, z: 1 }];

// ============================================================================
// CONFIGURATION AND ERRORS
// ============================================================================

/// Tuning knobs for move selection
#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// Wall-clock budget for iterative deepening, sampled between rounds
    pub time_budget: Duration,
    /// Depth increment per round; 2 avoids the odd/even swing of the
    /// adversarial framework
    pub depth_step: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            time_budget: Duration::from_millis(400),
            depth_step: 2,
        }
    }
}

/// Move selection failed; the board and search state are inconsistent
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("cannot search an empty board history")]
    EmptyHistory,
    #[error("no legal moves at a non-full position ({ply} stones)")]
    NoLegalMoves { ply: usize },
    #[error("search selected a move that is not legal")]
    IllegalSelection,
    #[error("search completed without finding a move")]
    NoMoveFound,
    #[error(transparent)]
    Move(#[from] MoveError),
}

// ============================================================================
// ALPHA-BETA AI
// ============================================================================

/// Bot player: NegaMax with NegaScout windows, a transposition table, and
/// iterative deepening over a fixed time budget
pub struct AlphaBetaAI {
    config: SearchConfig,
    evaluator: Evaluator,
    table: TranspositionTable,
    rng: ChaCha8Rng,
}

impl Default for AlphaBetaAI {
    fn default() -> Self {
        Self::new()
    }
}

impl AlphaBetaAI {
    pub fn new() -> Self {
        Self::with_config(SearchConfig::default())
    }

    pub fn with_config(config: SearchConfig) -> Self {
        Self {
            config,
            evaluator: Evaluator::default(),
            table: TranspositionTable::new(),
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Deterministic table keys and opening choice, for tests
    pub fn with_seed(config: SearchConfig, seed: u64) -> Self {
        Self {
            config,
            evaluator: Evaluator::default(),
            table: TranspositionTable::with_seed(seed),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Pick the next move for the side to move.
    ///
    /// Does not mutate the caller's board; the returned stone is for the
    /// caller to append. Errors mean the position or the engine state is
    /// inconsistent and no move can be trusted.
    pub fn choose_move(&mut self, board: &BoardState) -> Result<Stone, SearchError> {
        if board.is_empty() {
            return Err(SearchError::EmptyHistory);
        }
        let color = board.to_move();

        // opening: the tree below the bare center is symmetric, searching
        // it would only burn the budget
        if board.len() == 1 {
            let hex = OPENING_MOVES[self.rng.gen_range(0..OPENING_MOVES.len())];
            trace!(?hex, "opening rule shortcut");
            return Ok(Stone::new(hex, color));
        }

        let mut best: Option<Stone> = None;
        let mut elapsed = Duration::ZERO;
        let mut depth = 0;
        while elapsed < self.config.time_budget {
            let started = Instant::now();
            if let Some(stone) = self.search_to_depth(board, depth)? {
                best = Some(stone);
            }
            elapsed += started.elapsed();
            debug!(
                depth,
                elapsed_ms = elapsed.as_millis() as u64,
                "deepening round complete"
            );
            depth += self.config.depth_step;
        }

        let best = best.ok_or(SearchError::NoMoveFound)?;
        // the table is never verified against full position keys, so an
        // aliased entry could smuggle in a foreign move; abort instead
        if !board.legal_moves(color).contains(&best) {
            return Err(SearchError::IllegalSelection);
        }
        Ok(best)
    }

    /// One full-width search round; returns the root child on the principal
    /// variation, or `None` when the round never left the root
    fn search_to_depth(
        &mut self,
        board: &BoardState,
        depth: u32,
    ) -> Result<Option<Stone>, SearchError> {
        let tree = SearchTree::new(board, &self.table).ok_or(SearchError::EmptyHistory)?;
        let mut ctx = SearchContext {
            tree,
            board: board.clone(),
            table: &mut self.table,
            evaluator: &mut self.evaluator,
        };
        let result = ctx.search(NodeId::ROOT, depth, -INF, INF)?;
        Ok(ctx.tree.stone_from_root(result))
    }
}

// ============================================================================
// RECURSION STATE
// ============================================================================

/// Per-round search state: the arena tree, a scratch board shared by the
/// whole recursion with push/undo, and the engine's table and evaluator
struct SearchContext<'a> {
    tree: SearchTree,
    board: BoardState,
    table: &'a mut TranspositionTable,
    evaluator: &'a mut Evaluator,
}

impl SearchContext<'_> {
    /// NegaMax with a principal-variation window.
    ///
    /// Returns the node whose score decided this subtree; the caller flips
    /// the sign. The scratch board always matches `node` on entry and exit.
    fn search(
        &mut self,
        node: NodeId,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
    ) -> Result<NodeId, SearchError> {
        let old_alpha = alpha;

        let n = *self.tree.node(node);
        let plane = n.stone.color;
        let entry = *self.table.retrieve(plane, n.signature[plane_index(plane)]);
        if entry.depth >= depth as i32 {
            if let Some(best) = entry.best_move {
                match entry.bound {
                    Some(Bound::Exact) => {
                        let id = self.tree.add_child(node, best, self.table);
                        self.tree.set_score(id, entry.score);
                        return Ok(id);
                    }
                    Some(Bound::Lower) => alpha = alpha.max(entry.score),
                    Some(Bound::Upper) => beta = beta.min(entry.score),
                    None => {}
                }
                if alpha >= beta {
                    let id = self.tree.add_child(node, best, self.table);
                    self.tree.set_score(id, entry.score);
                    return Ok(id);
                }
            }
        }

        // horizon: hand the position to the experts
        if depth == 0 {
            let score = self.evaluator.evaluate(&self.board);
            self.tree.set_score(node, score);
            return Ok(node);
        }

        if self.board.is_full() {
            return Ok(node);
        }
        let moves = self.board.legal_moves(self.board.to_move());
        if moves.is_empty() {
            // an unfull board always has candidates; this is a move
            // generator inconsistency, not a draw
            return Err(SearchError::NoLegalMoves {
                ply: self.board.len(),
            });
        }
        let children: Vec<NodeId> = moves
            .iter()
            .map(|&mv| self.tree.add_child(node, mv, self.table))
            .collect();

        // principal variation: first child gets the full window
        let mut result = self.search_child(children[0], moves[0], depth - 1, -beta, -alpha)?;
        if self.tree.score(result) >= beta {
            self.store(result, old_alpha, beta, depth);
            return Ok(result);
        }

        // scout the remaining children with a null window over the best
        for (&child, &mv) in children[1..].iter().zip(&moves[1..]) {
            let lower = self.tree.score(result).max(alpha);
            let upper = lower + 1;
            result = self.search_child(child, mv, depth - 1, -upper, -lower)?;
            let scout = self.tree.score(result);
            if upper < scout && scout < beta && depth > 2 {
                // the scout window failed high: re-search for the exact value
                let full = self.search_child(child, mv, depth - 1, -beta, -scout)?;
                if self.tree.score(full) > scout {
                    result = full;
                }
            }
            if self.tree.score(result) >= beta {
                self.store(result, old_alpha, beta, depth);
                return Ok(result);
            }
        }
        self.store(result, old_alpha, beta, depth);
        Ok(result)
    }

    /// Descend into a child: push its stone, search, undo, and apply the
    /// NegaMax sign flip to the returned score
    fn search_child(
        &mut self,
        child: NodeId,
        mv: Stone,
        depth: u32,
        alpha: i32,
        beta: i32,
    ) -> Result<NodeId, SearchError> {
        self.board.place(mv.hex)?;
        let searched = self.search(child, depth, alpha, beta);
        self.board.undo();
        let result = searched?;
        let score = -self.tree.score(result);
        self.tree.set_score(result, score);
        Ok(result)
    }

    /// Cache a finished node, classified against the window it was
    /// searched under. Positions need a stone before the last to hash.
    fn store(&mut self, id: NodeId, old_alpha: i32, beta: i32, depth: u32) {
        let n = *self.tree.node(id);
        if n.ply < 2 {
            return;
        }
        let bound = if n.score < old_alpha {
            Bound::Upper
        } else if n.score >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        let plane = n.before_last;
        self.table.store(
            plane,
            n.signature[plane_index(plane)],
            Entry {
                score: n.score,
                depth: depth as i32,
                bound: Some(bound),
                best_move: Some(n.stone),
            },
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use andantino_core::Color;

    fn fast_config() -> SearchConfig {
        SearchConfig {
            time_budget: Duration::from_millis(5),
            ..SearchConfig::default()
        }
    }

    #[test]
    fn test_opening_uses_a_short_neighbor() {
        let mut ai = AlphaBetaAI::with_seed(fast_config(), 11);
        let board = BoardState::new();
        for _ in 0..20 {
            let stone = ai.choose_move(&board).unwrap();
            assert_eq!(stone.color, Color::White);
            assert!(OPENING_MOVES.contains(&stone.hex));
            assert_eq!(stone.hex.x + stone.hex.y, -1);
        }
    }

    #[test]
    fn test_empty_history_is_an_error() {
        let mut ai = AlphaBetaAI::with_seed(fast_config(), 11);
        let board = BoardState::from_history(Vec::new()).unwrap();
        assert!(matches!(
            ai.choose_move(&board),
            Err(SearchError::EmptyHistory)
        ));
    }

    #[test]
    fn test_full_board_yields_no_move() {
        let stones: Vec<Stone> = (0..andantino_core::CELL_COUNT)
            .map(|i| {
                let color = match i {
                    0 => Color::Neutral,
                    odd if odd % 2 == 1 => Color::White,
                    _ => Color::Black,
                };
                Stone::new(Hex::from_spiral_index(i), color)
            })
            .collect();
        let board = BoardState::from_history(stones).unwrap();
        let mut ai = AlphaBetaAI::with_seed(
            SearchConfig {
                time_budget: Duration::from_millis(1),
                ..SearchConfig::default()
            },
            11,
        );
        assert!(matches!(
            ai.choose_move(&board),
            Err(SearchError::NoMoveFound)
        ));
    }

    #[test]
    fn test_bot_move_is_legal_on_a_tiny_board() {
        let mut board = BoardState::new();
        board.place(Hex::new(1, 0, -1)).unwrap();
        board.place(Hex::new(1, -1, 0)).unwrap();

        let mut ai = AlphaBetaAI::with_seed(fast_config(), 11);
        let stone = ai.choose_move(&board).unwrap();
        assert_eq!(stone.color, Color::White);
        assert!(board.legal_moves(Color::White).contains(&stone));
    }

    #[test]
    fn test_choose_move_leaves_the_board_untouched() {
        let mut board = BoardState::new();
        board.place(Hex::new(0, -1, 1)).unwrap();
        board.place(Hex::new(-1, 0, 1)).unwrap();
        let before = board.stones().to_vec();

        let mut ai = AlphaBetaAI::with_seed(fast_config(), 3);
        ai.choose_move(&board).unwrap();
        assert_eq!(board.stones(), &before[..]);
    }
}
