//! ANDANTINO SEARCH - the bot player
//!
//! Move selection for Andantino:
//! - NegaMax with principal-variation (NegaScout) windows
//! - Iterative deepening over a wall-clock budget
//! - A two-plane transposition table keyed by XOR signatures
//!
//! The crate owns no game rules; boards, legality and scoring come from
//! `andantino-core`. The entry point is [`AlphaBetaAI::choose_move`].

pub mod search;
pub mod table;
pub mod tree;

pub use search::{AlphaBetaAI, SearchConfig, SearchError};
pub use table::{Bound, Entry, TranspositionTable, TABLE_SIZE};
pub use tree::{NodeId, SearchNode, SearchTree};
