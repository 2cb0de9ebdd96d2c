//! Arena-backed search tree
//!
//! Nodes are indexed by [`NodeId`]; a child holds a non-owning parent index,
//! so the tree is built top-down and only ever walked upward for move
//! extraction. Instead of copying the board history into every node, each
//! node carries the two per-plane XOR signatures of its history minus the
//! last stone, computed incrementally from its parent. The actual board is
//! shared by the search recursion with push/undo semantics.

use crate::table::TranspositionTable;
use andantino_core::{BoardState, Color, Stone};

/// Node identifier (index into the arena)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

/// A node in the search tree
#[derive(Clone, Copy, Debug)]
pub struct SearchNode {
    /// Last stone placed on this node's board: the move that led here
    pub stone: Stone,
    /// Parent node (None for the root)
    pub parent: Option<NodeId>,
    /// NegaMax score, set when the node is searched or evaluated
    pub score: i32,
    /// Stones on this node's board
    pub ply: usize,
    /// Color of the stone placed before the last one
    pub before_last: Color,
    /// Per-plane XOR of basis keys over the history minus the last stone
    pub signature: [u64; 2],
}

/// Search tree over a fixed root position
pub struct SearchTree {
    nodes: Vec<SearchNode>,
}

impl SearchTree {
    /// Build a tree rooted at the given board. Returns `None` for boards
    /// without at least two stones; the opening never reaches a search.
    pub fn new(board: &BoardState, table: &TranspositionTable) -> Option<Self> {
        let stones = board.stones();
        if stones.len() < 2 {
            return None;
        }
        let last = stones[stones.len() - 1];
        let before_last = stones[stones.len() - 2];

        let mut signature = [0u64; 2];
        for stone in &stones[..stones.len() - 1] {
            for (plane, sig) in signature.iter_mut().enumerate() {
                *sig ^= table.basis(plane, stone.index());
            }
        }

        let root = SearchNode {
            stone: last,
            parent: None,
            score: 0,
            ply: stones.len(),
            before_last: before_last.color,
            signature,
        };
        Some(Self { nodes: vec![root] })
    }

    /// Append a child reached by placing `stone` on the parent's board
    pub fn add_child(
        &mut self,
        parent: NodeId,
        stone: Stone,
        table: &TranspositionTable,
    ) -> NodeId {
        let p = self.nodes[parent.0];
        let mut signature = p.signature;
        for (plane, sig) in signature.iter_mut().enumerate() {
            // the parent's last stone now precedes the child's last stone
            *sig ^= table.basis(plane, p.stone.index());
        }
        let child = SearchNode {
            stone,
            parent: Some(parent),
            score: 0,
            ply: p.ply + 1,
            before_last: p.stone.color,
            signature,
        };
        let id = NodeId(self.nodes.len());
        self.nodes.push(child);
        id
    }

    pub fn node(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0]
    }

    pub fn score(&self, id: NodeId) -> i32 {
        self.nodes[id.0].score
    }

    pub fn set_score(&mut self, id: NodeId, score: i32) {
        self.nodes[id.0].score = score;
    }

    pub fn is_root(&self, id: NodeId) -> bool {
        self.nodes[id.0].parent.is_none()
    }

    /// Walk from a node up to the child of the root and return its stone:
    /// the move on the principal variation. `None` for the root itself.
    pub fn stone_from_root(&self, id: NodeId) -> Option<Stone> {
        let mut current = id;
        while let Some(parent) = self.nodes[current.0].parent {
            if self.is_root(parent) {
                return Some(self.nodes[current.0].stone);
            }
            current = parent;
        }
        None
    }
}
