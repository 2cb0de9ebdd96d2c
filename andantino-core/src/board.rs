//! Hex board geometry with cube coordinates and the spiral cell index

use serde::{Deserialize, Serialize};

/// Board radius (distance from center to edge)
pub const BOARD_RADIUS: i32 = 9;

/// Number of cells on the board: 1 + sum of 6r for r in 1..=9
pub const CELL_COUNT: usize = 271;

/// Cube hex coordinates, invariant x + y + z == 0
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hex {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// Direction vectors in cube coordinates (dx, dy, dz)
/// Index: 0=NE, 1=E, 2=SE, 3=SW, 4=W, 5=NW
pub const DIRECTIONS: [(i32, i32, i32); 6] = [
    (1, 0, -1),  // NE
    (1, -1, 0),  // E
    (0, -1, 1),  // SE
    (-1, 0, 1),  // SW
    (-1, 1, 0),  // W
    (0, 1, -1),  // NW
];

/// First cell of each ring edge, scaled by the ring radius.
/// Traversal starts at (-r, 0, r) and proceeds clockwise.
const RING_CORNERS: [(i32, i32, i32); 6] = [
    (-1, 0, 1),
    (0, -1, 1),
    (1, -1, 0),
    (1, 0, -1),
    (0, 1, -1),
    (-1, 1, 0),
];

/// Step taken along each ring edge, corner i to corner i+1.
const RING_EDGES: [(i32, i32, i32); 6] = [
    (1, -1, 0),
    (1, 0, -1),
    (0, 1, -1),
    (-1, 1, 0),
    (-1, 0, 1),
    (0, -1, 1),
];

impl Hex {
    pub const CENTER: Hex = Hex { x: 0, y: 0, z: 0 };

    pub fn new(x: i32, y: i32, z: i32) -> Self {
        debug_assert!(x + y + z == 0, "cube coordinates must sum to zero");
        Self { x, y, z }
    }

    /// Check if this hex is on the board
    pub fn is_valid(&self) -> bool {
        self.x.abs() <= BOARD_RADIUS
            && self.y.abs() <= BOARD_RADIUS
            && self.z.abs() <= BOARD_RADIUS
    }

    /// Ring radius: cube (Manhattan / 2) distance from the center
    pub fn ring(&self) -> i32 {
        (self.x.abs() + self.y.abs() + self.z.abs()) / 2
    }

    /// Distance between two hexes
    pub fn distance_to(&self, other: Hex) -> i32 {
        ((self.x - other.x).abs() + (self.y - other.y).abs() + (self.z - other.z).abs()) / 2
    }

    /// True if the two cells share an edge
    pub fn is_adjacent(&self, other: Hex) -> bool {
        self.distance_to(other) == 1
    }

    /// Get neighbor in direction (0-5)
    pub fn neighbor(&self, direction: usize) -> Hex {
        let (dx, dy, dz) = DIRECTIONS[direction % 6];
        Hex::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Linear index of this cell in 0..271.
    ///
    /// Index 0 is the center; ring r occupies 3r(r-1)+1 ..= 3r(r+1).
    /// Within a ring the first cell is (-r, 0, r) and the traversal walks
    /// the six edges clockwise. Valid for on-board cells only.
    pub fn spiral_index(&self) -> usize {
        let r = self.ring();
        if r == 0 {
            return 0;
        }
        let inner = 3 * r * (r - 1); // cells in rings 1..r, excluding the center
        let pos = self.ring_position(r);
        (inner + 1 + pos) as usize
    }

    /// Offset of this cell along its ring, 0 at (-r, 0, r)
    fn ring_position(&self, r: i32) -> i32 {
        for (edge, corner) in RING_CORNERS.iter().enumerate() {
            let start = Hex::new(corner.0 * r, corner.1 * r, corner.2 * r);
            let step = self.distance_to(start);
            if step < r && start.edge_reaches(*self, RING_EDGES[edge], step) {
                return edge as i32 * r + step;
            }
        }
        // corner of the next edge past the last one: only (-r, 0, r) re-enters
        // edge 0 with step 0, so every ring cell is covered above
        unreachable!("cell not on its own ring")
    }

    fn edge_reaches(&self, target: Hex, dir: (i32, i32, i32), step: i32) -> bool {
        target.x == self.x + dir.0 * step
            && target.y == self.y + dir.1 * step
            && target.z == self.z + dir.2 * step
    }

    /// Inverse of [`spiral_index`](Self::spiral_index)
    pub fn from_spiral_index(index: usize) -> Hex {
        if index == 0 {
            return Hex::CENTER;
        }
        let index = index as i32;
        let mut r = 1;
        while 3 * r * (r + 1) < index {
            r += 1;
        }
        let pos = index - 3 * r * (r - 1) - 1; // 0 .. 6r-1 within the ring
        let edge = (pos / r) as usize;
        let step = pos % r;
        let corner = RING_CORNERS[edge];
        let dir = RING_EDGES[edge];
        Hex::new(
            corner.0 * r + dir.0 * step,
            corner.1 * r + dir.1 * step,
            corner.2 * r + dir.2 * step,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_validity() {
        assert!(Hex::CENTER.is_valid());
        assert!(Hex::new(9, 0, -9).is_valid());
        assert!(Hex::new(-9, 9, 0).is_valid());
        assert!(!Hex::new(10, 0, -10).is_valid());
        assert!(!Hex::new(5, 5, -10).is_valid());
    }

    #[test]
    fn test_ring_and_distance() {
        assert_eq!(Hex::CENTER.ring(), 0);
        assert_eq!(Hex::new(1, 0, -1).ring(), 1);
        assert_eq!(Hex::new(3, -1, -2).ring(), 3);
        assert_eq!(Hex::new(0, 0, 0).distance_to(Hex::new(2, -2, 0)), 2);
        assert!(Hex::new(1, -1, 0).is_adjacent(Hex::new(0, -1, 1)));
        assert!(!Hex::new(1, -1, 0).is_adjacent(Hex::new(-1, 1, 0)));
    }

    #[test]
    fn test_neighbors_stay_on_ring_one() {
        for dir in 0..6 {
            let n = Hex::CENTER.neighbor(dir);
            assert_eq!(n.ring(), 1);
            assert_eq!(n.x + n.y + n.z, 0);
        }
    }

    #[test]
    fn test_spiral_index_corners() {
        assert_eq!(Hex::CENTER.spiral_index(), 0);
        assert_eq!(Hex::new(-1, 0, 1).spiral_index(), 1);
        assert_eq!(Hex::new(0, -1, 1).spiral_index(), 2);
        assert_eq!(Hex::new(1, -1, 0).spiral_index(), 3);
        assert_eq!(Hex::new(1, 0, -1).spiral_index(), 4);
        assert_eq!(Hex::new(0, 1, -1).spiral_index(), 5);
        assert_eq!(Hex::new(-1, 1, 0).spiral_index(), 6);
        // first cell of ring 2 follows the last of ring 1
        assert_eq!(Hex::new(-2, 0, 2).spiral_index(), 7);
        // known ring-3 cell
        assert_eq!(Hex::new(-3, 2, 1).spiral_index(), 35);
    }

    #[test]
    fn test_spiral_index_bijection() {
        let mut seen = [false; CELL_COUNT];
        for x in -BOARD_RADIUS..=BOARD_RADIUS {
            for y in -BOARD_RADIUS..=BOARD_RADIUS {
                let z = -x - y;
                if z.abs() > BOARD_RADIUS {
                    continue;
                }
                let hex = Hex::new(x, y, z);
                let index = hex.spiral_index();
                assert!(index < CELL_COUNT, "index {} out of range for {:?}", index, hex);
                assert!(!seen[index], "index {} hit twice", index);
                seen[index] = true;
                assert_eq!(Hex::from_spiral_index(index), hex);
            }
        }
        assert!(seen.iter().all(|&s| s));
    }
}
