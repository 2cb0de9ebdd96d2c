//! ANDANTINO Core - Board model and rules
//!
//! This crate provides the game-side half of the engine:
//! - Board geometry (hex grid with cube coordinates and a spiral cell index)
//! - Board state, placement rules, and legal-move generation
//! - The supervisor that classifies a board as ongoing, drawn, or won
//! - Position evaluation as a sum of pluggable scoring experts

pub mod board;
pub mod game;
pub mod supervisor;
pub mod eval;

// Re-exports for convenient access
pub use board::{Hex, BOARD_RADIUS, CELL_COUNT, DIRECTIONS};
pub use game::{BoardState, Color, MoveError, Stone};
pub use eval::{BridgeExpert, Evaluator, Expert, LossExpert, RandomExpert, WinExpert};
pub use supervisor::{has_won, is_draw};
