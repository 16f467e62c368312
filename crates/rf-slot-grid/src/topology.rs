//! Grid topology: neighbor maps, edge metric and prime stepping
//!
//! Tiles are addressed by offset `reel * rows + row`. A masked grid keeps the
//! full `reels × rows` offset space; offsets whose row lies beyond the reel's
//! mask are invalid and have no neighbors.

use std::ops::Range;

use rand::Rng;
use smallvec::SmallVec;

use crate::direction::Direction;
use crate::error::{GridError, Result};

/// Maximum number of reels in a grid
pub const MAX_REELS: usize = 12;
/// Maximum number of rows in a grid
pub const MAX_ROWS: usize = 10;
/// Maximum number of tiles (`reels × rows`) in a grid
pub const MAX_TILES: usize = 100;
/// Maximum neighbor entries per tile, including the tile itself
pub const MAX_NEIGHBORS: usize = 9;

/// Neighbor list of a tile: `(offset, direction)` pairs sorted by offset
pub type Neighbors = SmallVec<[(usize, Direction); MAX_NEIGHBORS]>;

/// Immutable geometry of a reel/row grid.
///
/// Built once per game configuration and shared read-only (it is `Send +
/// Sync`) across any number of concurrent rounds.
#[derive(Debug, Clone, PartialEq)]
pub struct GridTopology {
    reels: usize,
    rows: usize,
    mask: Vec<u8>,
    has_mask: bool,
    stepping_prime: usize,
    valid_count: usize,
    neighbors: Vec<Neighbors>,
    without_self: Vec<Neighbors>,
    steps_to_edge: Vec<u8>,
}

impl GridTopology {
    /// Build a rectangular grid
    pub fn new(reels: usize, rows: usize) -> Result<Self> {
        Self::build(reels, rows, None)
    }

    /// Build a masked grid; `mask[reel]` is the number of valid rows of that reel
    pub fn with_mask(reels: usize, rows: usize, mask: &[u8]) -> Result<Self> {
        Self::build(reels, rows, Some(mask))
    }

    fn build(reels: usize, rows: usize, mask: Option<&[u8]>) -> Result<Self> {
        if reels == 0 || rows == 0 || reels > MAX_REELS || rows > MAX_ROWS || reels * rows > MAX_TILES
        {
            return Err(GridError::InvalidSize { reels, rows });
        }

        let has_mask = mask.is_some();
        let mask = match mask {
            Some(mask) => {
                if mask.len() != reels {
                    return Err(GridError::MaskLength {
                        expected: reels,
                        got: mask.len(),
                    });
                }
                for (reel, &value) in mask.iter().enumerate() {
                    if value == 0 || value as usize > rows {
                        return Err(GridError::MaskEntry { reel, value, rows });
                    }
                }
                mask.to_vec()
            }
            None => vec![rows as u8; reels],
        };

        let size = reels * rows;
        let mut grid = Self {
            reels,
            rows,
            valid_count: mask.iter().map(|&m| m as usize).sum(),
            mask,
            has_mask,
            stepping_prime: stepping_prime(size),
            neighbors: vec![Neighbors::new(); size],
            without_self: vec![Neighbors::new(); size],
            steps_to_edge: vec![0; size],
        };

        for reel1 in 0..reels {
            for row1 in 0..grid.mask[reel1] as usize {
                let offset1 = reel1 * rows + row1;
                let first = reel1.saturating_sub(1);
                let last = (reel1 + 1).min(reels - 1);

                for reel2 in first..=last {
                    for row2 in 0..grid.mask[reel2] as usize {
                        let Some(dir) = grid.direction_between(reel1, row1, reel2, row2) else {
                            continue;
                        };
                        let offset2 = reel2 * rows + row2;
                        grid.neighbors[offset1].push((offset2, dir));
                        if dir != Direction::Center {
                            grid.without_self[offset1].push((offset2, dir));
                        }
                    }
                }

                grid.steps_to_edge[offset1] = grid.edge_distance(reel1, row1);
            }
        }

        log::debug!(
            "Grid topology {}x{} built: {} valid tiles, stepping prime {}",
            reels,
            rows,
            grid.valid_count,
            grid.stepping_prime
        );

        Ok(grid)
    }

    /// Direction from tile 1 to tile 2, or `None` if they are not adjacent.
    fn direction_between(
        &self,
        reel1: usize,
        row1: usize,
        reel2: usize,
        row2: usize,
    ) -> Option<Direction> {
        let reel_diff = reel1 as isize - reel2 as isize;
        let row_diff = row1 as isize - row2 as isize;

        if reel_diff == 0 {
            return match row_diff {
                -1 => Some(Direction::Down),
                0 => Some(Direction::Center),
                1 => Some(Direction::Up),
                _ => None,
            };
        }

        let (straight, up, down) = match reel_diff {
            -1 => (Direction::Right, Direction::RightUp, Direction::RightDown),
            1 => (Direction::Left, Direction::LeftUp, Direction::LeftDown),
            _ => return None,
        };

        if !self.has_mask {
            return match row_diff {
                -1 => Some(down),
                0 => Some(straight),
                1 => Some(up),
                _ => None,
            };
        }

        // Reels of different height are vertically centered on each other, so
        // the row delta that means "straight across" shifts with the size delta.
        let size_diff = self.mask[reel1] as isize - self.mask[reel2] as isize;
        match (size_diff, row_diff) {
            (-2, -2) | (-1, -1) | (0, -1) | (1, 0) | (2, 0) => Some(down),
            (-2, -1) | (0, 0) | (2, 1) => Some(straight),
            (-2, 0) | (-1, 0) | (0, 1) | (1, 1) | (2, 2) => Some(up),
            _ => None,
        }
    }

    fn edge_distance(&self, reel: usize, row: usize) -> u8 {
        let height = self.mask[reel] as usize;
        let steps = (row + 1)
            .min(height - row)
            .min(reel + 1)
            .min(self.reels - reel);
        steps as u8
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // DIMENSIONS
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn reels(&self) -> usize {
        self.reels
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Valid row count per reel (filled with `rows` for rectangular grids)
    pub fn mask(&self) -> &[u8] {
        &self.mask
    }

    /// True if the grid was built with an explicit mask
    pub fn has_mask(&self) -> bool {
        self.has_mask
    }

    /// Size of the offset space (`reels × rows`)
    pub fn size(&self) -> usize {
        self.reels * self.rows
    }

    /// Number of valid tiles
    pub fn valid_count(&self) -> usize {
        self.valid_count
    }

    /// Stride used by [`next_offset`](Self::next_offset)
    pub fn stepping_prime(&self) -> usize {
        self.stepping_prime
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // OFFSETS
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn offset(&self, reel: usize, row: usize) -> usize {
        reel * self.rows + row
    }

    pub fn reel_row(&self, offset: usize) -> (usize, usize) {
        (offset / self.rows, offset % self.rows)
    }

    pub fn is_valid_offset(&self, offset: usize) -> bool {
        let (reel, row) = self.reel_row(offset);
        reel < self.reels && row < self.mask[reel] as usize
    }

    /// Offset of `(reel, row)` if it lies on a valid tile
    pub fn checked_offset(&self, reel: isize, row: isize) -> Option<usize> {
        if reel < 0 || row < 0 || reel as usize >= self.reels {
            return None;
        }
        let (reel, row) = (reel as usize, row as usize);
        (row < self.mask[reel] as usize).then(|| self.offset(reel, row))
    }

    /// All valid offsets in increasing order
    pub fn valid_offsets(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.size()).filter(move |&offset| self.is_valid_offset(offset))
    }

    /// Valid offsets of a single reel
    pub fn reel_offsets(&self, reel: usize) -> Range<usize> {
        let start = reel * self.rows;
        start..start + self.mask[reel] as usize
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // EDGES
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn is_on_edge(&self, offset: usize) -> bool {
        self.steps_to_edge(offset) == 1
    }

    /// Ring distance from the boundary: 1 on the edge, 0 for invalid offsets
    pub fn steps_to_edge(&self, offset: usize) -> u8 {
        self.steps_to_edge.get(offset).copied().unwrap_or(0)
    }

    /// Number of tiles at exactly `steps` from the boundary
    pub fn tiles_from_edge(&self, steps: u8) -> usize {
        self.steps_to_edge.iter().filter(|&&s| s == steps).count()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ADJACENCY
    // ═══════════════════════════════════════════════════════════════════════════

    /// Neighbors of a tile, including the tile itself with [`Direction::Center`]
    pub fn neighbors(&self, offset: usize) -> &[(usize, Direction)] {
        self.neighbors.get(offset).map(|n| n.as_slice()).unwrap_or_default()
    }

    /// Neighbors of a tile, excluding the tile itself
    pub fn neighbors_without_self(&self, offset: usize) -> &[(usize, Direction)] {
        self.without_self.get(offset).map(|n| n.as_slice()).unwrap_or_default()
    }

    /// Direction from `from` to `to` if the tiles are neighbors.
    ///
    /// Equal valid offsets are neighbors with [`Direction::Center`].
    pub fn is_neighbor(&self, from: usize, to: usize) -> Option<Direction> {
        self.neighbors(from)
            .iter()
            .find(|(offset, _)| *offset == to)
            .map(|&(_, dir)| dir)
    }

    /// The neighbor lying in exactly the given compass direction
    pub fn neighbor_towards(&self, offset: usize, dir: Direction) -> Option<usize> {
        self.neighbors_without_self(offset)
            .iter()
            .find(|(_, d)| *d == dir)
            .map(|&(offset, _)| offset)
    }

    /// A uniformly chosen neighbor, never the tile itself
    pub fn random_neighbor<R: Rng + ?Sized>(&self, offset: usize, rng: &mut R) -> Option<usize> {
        let list = self.neighbors_without_self(offset);
        if list.is_empty() {
            return None;
        }
        Some(list[rng.random_range(0..list.len())].0)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // STEPPING
    // ═══════════════════════════════════════════════════════════════════════════

    /// Next valid offset in the prime-stride traversal.
    ///
    /// Starting from any valid tile, repeated calls visit every valid tile
    /// exactly once before returning to the start.
    pub fn next_offset(&self, offset: usize) -> usize {
        let size = self.size();
        let mut next = offset % size;
        for _ in 0..size {
            next = (next + self.stepping_prime) % size;
            if self.is_valid_offset(next) {
                return next;
            }
        }
        next
    }
}

/// Smallest prime greater than half the tile count that is coprime with it.
fn stepping_prime(size: usize) -> usize {
    (size / 2 + 1..)
        .find(|&p| is_prime(p) && (size == 1 || size % p != 0))
        .unwrap_or(1)
}

fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    (2..).take_while(|d| d * d <= n).all(|d| n % d != 0)
}
