//! Position evaluation as a sum of independent scoring experts

use crate::game::{BoardState, Color};
use crate::supervisor;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Default expert weights, hand-tuned
pub const WIN_WEIGHT: i32 = 20;
pub const LOSS_WEIGHT: i32 = 20;
pub const BRIDGE_WEIGHT: i32 = 4;
pub const RANDOM_WEIGHT: i32 = 5;

/// The six triples of consecutive directions that form a bridge shape
const BRIDGE_TRIPLES: [[usize; 3]; 6] = [
    [0, 1, 2],
    [1, 2, 3],
    [2, 3, 4],
    [3, 4, 5],
    [4, 5, 0],
    [5, 0, 1],
];

/// Scores one feature of a horizon position.
///
/// Experts are independent: the evaluator sums them, and new features can be
/// added without touching the search engine.
pub trait Expert {
    fn score(&mut self, board: &BoardState) -> i32;
}

// ============================================================================
// EXPERTS
// ============================================================================

/// Bonus if the side that just moved has already won
pub struct WinExpert {
    pub weight: i32,
}

impl Default for WinExpert {
    fn default() -> Self {
        Self { weight: WIN_WEIGHT }
    }
}

impl Expert for WinExpert {
    fn score(&mut self, board: &BoardState) -> i32 {
        match board.last() {
            Some(stone) if supervisor::has_won(stone.color, board) => self.weight,
            _ => 0,
        }
    }
}

/// Penalty if the opponent of the side that just moved has won
pub struct LossExpert {
    pub weight: i32,
}

impl Default for LossExpert {
    fn default() -> Self {
        Self { weight: LOSS_WEIGHT }
    }
}

impl Expert for LossExpert {
    fn score(&mut self, board: &BoardState) -> i32 {
        match board.last() {
            Some(stone)
                if stone.color != Color::Neutral
                    && supervisor::has_won(stone.color.opponent(), board) =>
            {
                -self.weight
            }
            _ => 0,
        }
    }
}

/// Counts stones of the side that just moved whose neighbors include three
/// consecutive enemies, a defensive bridge shape
pub struct BridgeExpert {
    pub weight: i32,
}

impl Default for BridgeExpert {
    fn default() -> Self {
        Self { weight: BRIDGE_WEIGHT }
    }
}

impl BridgeExpert {
    fn is_bridge(enemies: &[bool; 6]) -> bool {
        BRIDGE_TRIPLES
            .iter()
            .any(|triple| triple.iter().all(|&dir| enemies[dir]))
    }
}

impl Expert for BridgeExpert {
    fn score(&mut self, board: &BoardState) -> i32 {
        let color = match board.last() {
            Some(stone) if stone.color != Color::Neutral => stone.color,
            _ => return 0,
        };
        let bridges = board
            .stones()
            .iter()
            .filter(|stone| stone.color == color)
            .filter(|stone| Self::is_bridge(&supervisor::enemy_neighbors(board, stone)))
            .count();
        self.weight * bridges as i32
    }
}

/// Uniform jitter in [-weight, weight] to break ties between otherwise
/// equal positions. One draw per evaluation.
pub struct RandomExpert {
    pub weight: i32,
    rng: ChaCha8Rng,
}

impl Default for RandomExpert {
    fn default() -> Self {
        Self {
            weight: RANDOM_WEIGHT,
            rng: ChaCha8Rng::from_entropy(),
        }
    }
}

impl RandomExpert {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            weight: RANDOM_WEIGHT,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Expert for RandomExpert {
    fn score(&mut self, _board: &BoardState) -> i32 {
        self.rng.gen_range(-self.weight..=self.weight)
    }
}

// ============================================================================
// EVALUATOR
// ============================================================================

/// Sum of all expert scores for a horizon position
pub struct Evaluator {
    experts: Vec<Box<dyn Expert>>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(vec![
            Box::new(WinExpert::default()),
            Box::new(LossExpert::default()),
            Box::new(RandomExpert::default()),
            Box::new(BridgeExpert::default()),
        ])
    }
}

impl Evaluator {
    pub fn new(experts: Vec<Box<dyn Expert>>) -> Self {
        Self { experts }
    }

    /// Evaluator without the random expert, fully deterministic
    pub fn deterministic() -> Self {
        Self::new(vec![
            Box::new(WinExpert::default()),
            Box::new(LossExpert::default()),
            Box::new(BridgeExpert::default()),
        ])
    }

    pub fn evaluate(&mut self, board: &BoardState) -> i32 {
        if board.is_empty() {
            return 0;
        }
        self.experts.iter_mut().map(|e| e.score(board)).sum()
    }
}

// ============================================================================
// TESTS
// ============================================================================
