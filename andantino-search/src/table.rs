//! Two-plane transposition table keyed by spiral cell indices
//!
//! One plane per color, one slot per cell. Each slot carries a random
//! 64-bit basis key drawn at construction; the signature of a position is
//! the XOR of the basis keys of every stone in its history except the last,
//! reduced modulo the plane size. Collisions are not detected: entries are
//! overwritten unconditionally, and retrieval hands back whatever the slot
//! holds. Callers must check the stored depth before trusting an entry.

use andantino_core::{Color, Stone};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Slots per plane: one per board cell
pub const TABLE_SIZE: usize = 271;

/// Classifies a cached score
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    /// True value of the position
    Exact,
    /// Search failed high: the true value is at least this
    Lower,
    /// Search failed low: the true value is at most this
    Upper,
}

/// Cached search result for one position
#[derive(Clone, Copy, Debug)]
pub struct Entry {
    pub score: i32,
    /// Depth the entry was searched to; -1 means no data
    pub depth: i32,
    pub bound: Option<Bound>,
    pub best_move: Option<Stone>,
}

impl Entry {
    const EMPTY: Entry = Entry {
        score: 0,
        depth: -1,
        bound: None,
        best_move: None,
    };

    pub fn is_exact(&self) -> bool {
        self.bound == Some(Bound::Exact)
    }
}

#[derive(Clone, Copy, Debug)]
struct Slot {
    /// Fixed random basis key, doubles as the per-cell hashing component
    basis: u64,
    entry: Entry,
}

/// Fixed-size always-replace transposition table
pub struct TranspositionTable {
    planes: [Vec<Slot>; 2],
}

/// Plane index for a color. The neutral sentinel hashes with the black
/// plane, matching its turn-order role.
pub fn plane_index(color: Color) -> usize {
    match color {
        Color::White => 1,
        Color::Black | Color::Neutral => 0,
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TranspositionTable {
    pub fn new() -> Self {
        let mut rng = ChaCha8Rng::from_entropy();
        Self::with_rng(&mut rng)
    }

    pub fn with_seed(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::with_rng(&mut rng)
    }

    fn with_rng(rng: &mut ChaCha8Rng) -> Self {
        let mut plane = || {
            (0..TABLE_SIZE)
                .map(|_| Slot {
                    basis: rng.gen(),
                    entry: Entry::EMPTY,
                })
                .collect::<Vec<_>>()
        };
        Self {
            planes: [plane(), plane()],
        }
    }

    /// Basis key for a cell under one plane
    pub fn basis(&self, plane: usize, cell: usize) -> u64 {
        self.planes[plane][cell].basis
    }

    fn slot_of(signature: u64) -> usize {
        (signature % TABLE_SIZE as u64) as usize
    }

    /// Cache a result under the position signature. Always replaces.
    pub fn store(&mut self, plane: Color, signature: u64, entry: Entry) {
        let slot = Self::slot_of(signature);
        self.planes[plane_index(plane)][slot].entry = entry;
    }

    /// Whatever the slot for this signature holds. A depth of -1 means the
    /// slot was never written.
    pub fn retrieve(&self, plane: Color, signature: u64) -> &Entry {
        let slot = Self::slot_of(signature);
        &self.planes[plane_index(plane)][slot].entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use andantino_core::Hex;

    #[test]
    fn test_fresh_entries_are_empty() {
        let table = TranspositionTable::with_seed(1);
        let entry = table.retrieve(Color::White, 12345);
        assert_eq!(entry.depth, -1);
        assert!(entry.bound.is_none());
        assert!(entry.best_move.is_none());
    }

    #[test]
    fn test_store_retrieve_round_trip() {
        let mut table = TranspositionTable::with_seed(1);
        let best = Stone::new(Hex::new(1, 0, -1), Color::White);
        table.store(
            Color::White,
            98765,
            Entry {
                score: 17,
                depth: 4,
                bound: Some(Bound::Exact),
                best_move: Some(best),
            },
        );
        let entry = table.retrieve(Color::White, 98765);
        assert_eq!(entry.score, 17);
        assert_eq!(entry.depth, 4);
        assert!(entry.is_exact());
        assert_eq!(entry.best_move, Some(best));
        // the black plane is untouched
        assert_eq!(table.retrieve(Color::Black, 98765).depth, -1);
    }

    #[test]
    fn test_always_replace() {
        let mut table = TranspositionTable::with_seed(1);
        let entry = |score, depth| Entry {
            score,
            depth,
            bound: Some(Bound::Lower),
            best_move: None,
        };
        table.store(Color::Black, 42, entry(10, 6));
        table.store(Color::Black, 42, entry(-3, 2));
        // a shallower result still wins the slot
        let stored = table.retrieve(Color::Black, 42);
        assert_eq!(stored.score, -3);
        assert_eq!(stored.depth, 2);
    }

    #[test]
    fn test_basis_keys_are_stable() {
        let table = TranspositionTable::with_seed(9);
        assert_eq!(table.basis(0, 100), table.basis(0, 100));
        assert_ne!(table.basis(0, 100), table.basis(1, 100));
    }
}
