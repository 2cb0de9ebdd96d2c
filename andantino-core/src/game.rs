//! Board state and legal-move generation

use crate::board::{Hex, CELL_COUNT, DIRECTIONS};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Stone color. `Neutral` is used only by the sentinel center stone that
/// every game starts from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Black = 0,
    White = 1,
    Neutral = 2,
}

impl Color {
    /// Opposing color; identity for `Neutral`
    pub fn opponent(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
            Color::Neutral => Color::Neutral,
        }
    }
}

/// A placed stone. Equality compares coordinates and color; use
/// [`Stone::hex`] directly for same-cell checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stone {
    pub hex: Hex,
    pub color: Color,
    index: u16,
}

impl Stone {
    pub fn new(hex: Hex, color: Color) -> Self {
        let index = hex.spiral_index() as u16;
        Self { hex, color, index }
    }

    /// Spiral index of the stone's cell, computed once at construction
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

/// Rejected placement
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("cell ({0}, {1}, {2}) is out of bounds")]
    OutOfBounds(i32, i32, i32),
    #[error("cell ({0}, {1}, {2}) is already occupied")]
    Occupied(i32, i32, i32),
    #[error("cell ({0}, {1}, {2}) is not adjacent to two placed stones")]
    NotConnected(i32, i32, i32),
    #[error("board already holds {CELL_COUNT} stones")]
    BoardFull,
}

// ============================================================================
// BOARD STATE
// ============================================================================

/// Append-only history of placed stones with a direct cell-index lookup.
///
/// The history starts with the neutral sentinel at the center; `place`
/// appends and `undo` removes, nothing else mutates.
#[derive(Clone, Debug)]
pub struct BoardState {
    history: Vec<Stone>,
    cells: [Option<Color>; CELL_COUNT],
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardState {
    /// Fresh board holding only the sentinel center stone
    pub fn new() -> Self {
        let mut board = Self {
            history: Vec::with_capacity(CELL_COUNT),
            cells: [None; CELL_COUNT],
        };
        board.push(Stone::new(Hex::CENTER, Color::Neutral));
        board
    }

    /// Rebuild a board from an ordered match history.
    ///
    /// This is the boundary with the orchestration layer: the history has
    /// already been refereed move by move, so only bounds, duplicates and
    /// capacity are checked here, not the adjacency rule.
    pub fn from_history(stones: impl IntoIterator<Item = Stone>) -> Result<Self, MoveError> {
        let mut board = Self {
            history: Vec::with_capacity(CELL_COUNT),
            cells: [None; CELL_COUNT],
        };
        for stone in stones {
            let Hex { x, y, z } = stone.hex;
            if !stone.hex.is_valid() {
                return Err(MoveError::OutOfBounds(x, y, z));
            }
            if board.cells[stone.index()].is_some() {
                return Err(MoveError::Occupied(x, y, z));
            }
            if board.history.len() >= CELL_COUNT {
                return Err(MoveError::BoardFull);
            }
            board.push(stone);
        }
        Ok(board)
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.history.len() >= CELL_COUNT
    }

    /// Placed stones in insertion order
    pub fn stones(&self) -> &[Stone] {
        &self.history
    }

    pub fn last(&self) -> Option<&Stone> {
        self.history.last()
    }

    /// Occupant of a cell; `None` for empty or off-board cells
    pub fn occupant(&self, hex: Hex) -> Option<Color> {
        if !hex.is_valid() {
            return None;
        }
        self.cells[hex.spiral_index()]
    }

    pub fn is_occupied(&self, hex: Hex) -> bool {
        self.occupant(hex).is_some()
    }

    /// Side to move: White opens, then colors alternate
    pub fn to_move(&self) -> Color {
        match self.history.last() {
            Some(stone) if stone.color != Color::Neutral => stone.color.opponent(),
            _ => Color::White,
        }
    }

    /// Validate and append a stone of the side to move
    pub fn place(&mut self, hex: Hex) -> Result<Stone, MoveError> {
        self.check_legal(hex)?;
        let stone = Stone::new(hex, self.to_move());
        self.push(stone);
        Ok(stone)
    }

    /// Remove and return the last placed stone. The sentinel is the starting
    /// position and is never removed.
    pub fn undo(&mut self) -> Option<Stone> {
        if self.history.len() <= 1 {
            return None;
        }
        let stone = self.history.pop()?;
        self.cells[stone.index()] = None;
        Some(stone)
    }

    fn push(&mut self, stone: Stone) {
        self.cells[stone.index()] = Some(stone.color);
        self.history.push(stone);
    }

    fn check_legal(&self, hex: Hex) -> Result<(), MoveError> {
        let Hex { x, y, z } = hex;
        if self.is_full() {
            return Err(MoveError::BoardFull);
        }
        if !hex.is_valid() {
            return Err(MoveError::OutOfBounds(x, y, z));
        }
        if self.is_occupied(hex) {
            return Err(MoveError::Occupied(x, y, z));
        }
        if self.history.len() == 1 {
            // opening move: anywhere touching the center
            if hex.is_adjacent(Hex::CENTER) {
                return Ok(());
            }
            return Err(MoveError::NotConnected(x, y, z));
        }
        if self.occupied_neighbors(hex) < 2 {
            return Err(MoveError::NotConnected(x, y, z));
        }
        Ok(())
    }

    fn occupied_neighbors(&self, hex: Hex) -> usize {
        (0..6).filter(|&dir| self.is_occupied(hex.neighbor(dir))).count()
    }

    // ========================================================================
    // MOVE GENERATION
    // ========================================================================

    /// All legal placements for `color`.
    ///
    /// A candidate cell must be on the board, empty, and adjacent to at
    /// least two placed stones; the very first move may instead take any of
    /// the six cells touching the center. Candidates are discovered by
    /// probing the neighbors of each placed stone in insertion order, so the
    /// output order is deterministic for a given history.
    pub fn legal_moves(&self, color: Color) -> Vec<Stone> {
        if self.history.len() == 1 {
            return (0..6)
                .map(|dir| Stone::new(Hex::CENTER.neighbor(dir), color))
                .collect();
        }

        let mut moves = Vec::new();
        let mut seen: FxHashSet<Hex> = FxHashSet::default();
        for stone in &self.history {
            for &(dx, dy, dz) in &DIRECTIONS {
                let hex = Hex::new(stone.hex.x + dx, stone.hex.y + dy, stone.hex.z + dz);
                if !hex.is_valid() || self.is_occupied(hex) || !seen.insert(hex) {
                    continue;
                }
                if self.occupied_neighbors(hex) >= 2 {
                    moves.push(Stone::new(hex, color));
                }
            }
        }
        moves
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Center plus eight alternating stones spiraling outward; the canonical
    /// move-generation fixture.
    pub(crate) fn nine_stone_board() -> BoardState {
        let mut board = BoardState::new();
        for hex in [
            Hex::new(-1, 0, 1),
            Hex::new(0, -1, 1),
            Hex::new(1, -1, 0),
            Hex::new(-1, -1, 2),
            Hex::new(0, -2, 2),
            Hex::new(-1, 1, 0),
            Hex::new(-2, 1, 1),
            Hex::new(-2, 2, 0),
        ] {
            board.place(hex).unwrap();
        }
        board
    }

    #[test]
    fn test_new_board_has_sentinel() {
        let board = BoardState::new();
        assert_eq!(board.len(), 1);
        assert_eq!(board.occupant(Hex::CENTER), Some(Color::Neutral));
        assert_eq!(board.to_move(), Color::White);
    }

    #[test]
    fn test_alternation() {
        let mut board = BoardState::new();
        let first = board.place(Hex::new(1, 0, -1)).unwrap();
        assert_eq!(first.color, Color::White);
        assert_eq!(board.to_move(), Color::Black);
        let second = board.place(Hex::new(1, -1, 0)).unwrap();
        assert_eq!(second.color, Color::Black);
        assert_eq!(board.to_move(), Color::White);
    }

    #[test]
    fn test_opening_legal_moves() {
        let board = BoardState::new();
        let moves = board.legal_moves(Color::White);
        assert_eq!(moves.len(), 6);
        for stone in &moves {
            assert_eq!(stone.hex.x + stone.hex.y + stone.hex.z, 0);
            assert!(stone.hex.is_adjacent(Hex::CENTER));
            assert_eq!(stone.color, Color::White);
        }
    }

    #[test]
    fn test_second_move_completes_a_triangle() {
        let mut board = BoardState::new();
        board.place(Hex::new(1, 0, -1)).unwrap();
        let mut cells: Vec<Hex> = board
            .legal_moves(Color::Black)
            .iter()
            .map(|s| s.hex)
            .collect();
        cells.sort_by_key(|hex| hex.spiral_index());
        assert_eq!(cells, vec![Hex::new(1, -1, 0), Hex::new(0, 1, -1)]);
    }

    #[test]
    fn test_nine_stone_fixture_moves() {
        let board = nine_stone_board();
        let mut indexes: Vec<usize> = board
            .legal_moves(Color::White)
            .iter()
            .map(|s| s.index())
            .collect();
        indexes.sort_unstable();
        assert_eq!(indexes, vec![4, 5, 7, 10, 16, 21, 35]);
    }

    #[test]
    fn test_illegal_placements() {
        let mut board = BoardState::new();
        assert_eq!(
            board.place(Hex::new(3, 0, -3)),
            Err(MoveError::NotConnected(3, 0, -3))
        );
        board.place(Hex::new(1, 0, -1)).unwrap();
        assert_eq!(
            board.place(Hex::new(1, 0, -1)),
            Err(MoveError::Occupied(1, 0, -1))
        );
        assert_eq!(
            board.place(Hex::new(10, 0, -10)),
            Err(MoveError::OutOfBounds(10, 0, -10))
        );
        // adjacent to only one stone
        assert_eq!(
            board.place(Hex::new(2, 0, -2)),
            Err(MoveError::NotConnected(2, 0, -2))
        );
    }

    #[test]
    fn test_undo() {
        let mut board = BoardState::new();
        let stone = board.place(Hex::new(0, -1, 1)).unwrap();
        assert_eq!(board.undo(), Some(stone));
        assert_eq!(board.len(), 1);
        assert!(!board.is_occupied(stone.hex));
        assert_eq!(board.to_move(), Color::White);
        // the sentinel stays put
        assert_eq!(board.undo(), None);
    }

    #[test]
    fn test_from_history_rejects_duplicates() {
        let stones = vec![
            Stone::new(Hex::CENTER, Color::Neutral),
            Stone::new(Hex::new(1, 0, -1), Color::White),
            Stone::new(Hex::new(1, 0, -1), Color::Black),
        ];
        assert_eq!(
            BoardState::from_history(stones).unwrap_err(),
            MoveError::Occupied(1, 0, -1)
        );
    }
}
