//! Referee: classifies a board as ongoing, drawn, or won
//!
//! Stateless free functions over [`BoardState`]. A win is either five stones
//! of one color in a straight line, or an opposing stone whose six neighbors
//! are all occupied by stones of another color.

use crate::board::DIRECTIONS;
use crate::game::{BoardState, Color, Stone};

/// Stones a winning row must contain
const ROW_LENGTH: usize = 5;

/// A five-in-a-row needs 5 stones of one color plus at least 4 placed
/// before it; below this board size no win is possible.
const MIN_STONES_FOR_WIN: usize = 9;

/// True once the board is completely full
pub fn is_draw(board: &BoardState) -> bool {
    board.is_full()
}

/// True if `color`, the side that just moved, has won
pub fn has_won(color: Color, board: &BoardState) -> bool {
    board.len() >= MIN_STONES_FOR_WIN
        && (has_row_of_five(color, board) || has_enclosed_enemy(color, board))
}

/// True if the neighbor of `stone` in `dir` is occupied by another color.
/// The neutral sentinel counts as an enemy of both players.
pub fn enemy_in_direction(board: &BoardState, stone: &Stone, dir: usize) -> bool {
    match board.occupant(stone.hex.neighbor(dir)) {
        Some(color) => color != stone.color,
        None => false,
    }
}

/// Enemy occupancy of all six neighbors of `stone`
pub fn enemy_neighbors(board: &BoardState, stone: &Stone) -> [bool; 6] {
    let mut enemies = [false; 6];
    for (dir, enemy) in enemies.iter_mut().enumerate() {
        *enemy = enemy_in_direction(board, stone, dir);
    }
    enemies
}

/// Walk forward from each stone of `color` along each axial direction.
///
/// Forward-only is sufficient: every stone of a true run is itself a valid
/// starting point, so one of them sees the other four ahead of it.
fn has_row_of_five(color: Color, board: &BoardState) -> bool {
    board
        .stones()
        .iter()
        .filter(|stone| stone.color == color)
        .any(|stone| {
            DIRECTIONS.iter().any(|&(dx, dy, dz)| {
                (1..ROW_LENGTH as i32).all(|step| {
                    let hex = crate::board::Hex::new(
                        stone.hex.x + dx * step,
                        stone.hex.y + dy * step,
                        stone.hex.z + dz * step,
                    );
                    board.occupant(hex) == Some(color)
                })
            })
        })
}

/// True if some stone of the opposing color is surrounded on all six sides
/// by stones it considers enemies
fn has_enclosed_enemy(color: Color, board: &BoardState) -> bool {
    let enemy = color.opponent();
    board
        .stones()
        .iter()
        .filter(|stone| stone.color == enemy)
        .any(|stone| enemy_neighbors(board, stone).iter().all(|&e| e))
}
