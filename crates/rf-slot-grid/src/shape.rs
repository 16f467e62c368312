//! Tile templates placed relative to a center tile

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{GridError, Result};
use crate::topology::GridTopology;

/// Offsets produced by placing a shape
pub type Placement = SmallVec<[usize; 16]>;

/// A set of `(reel, row)` deltas relative to a center tile.
///
/// Deltas are applied to the center's reel and row directly, so on masked
/// grids the same shape may land on different physical neighbors depending
/// on where it is placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<(i8, i8)>", into = "Vec<(i8, i8)>")]
pub struct Shape {
    deltas: Vec<(i8, i8)>,
}

impl Shape {
    pub fn new(deltas: Vec<(i8, i8)>) -> Result<Self> {
        if deltas.is_empty() {
            return Err(GridError::EmptyShape);
        }
        Ok(Self { deltas })
    }

    /// Full 3x3 block including the center
    pub fn square3x3() -> Self {
        let mut deltas = Vec::with_capacity(9);
        for reel in -1..=1 {
            for row in -1..=1 {
                deltas.push((reel, row));
            }
        }
        Self { deltas }
    }

    /// 3x3 block without the center
    pub fn ring3x3() -> Self {
        let mut shape = Self::square3x3();
        shape.deltas.retain(|&d| d != (0, 0));
        shape
    }

    /// Plus sign: center and its four orthogonal neighbors
    pub fn cross() -> Self {
        Self {
            deltas: vec![(-1, 0), (0, -1), (0, 0), (0, 1), (1, 0)],
        }
    }

    /// X: center and its four diagonal neighbors
    pub fn diagonal_x() -> Self {
        Self {
            deltas: vec![(-1, -1), (-1, 1), (0, 0), (1, -1), (1, 1)],
        }
    }

    pub fn deltas(&self) -> &[(i8, i8)] {
        &self.deltas
    }

    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    /// True if the shape covers the center tile itself
    pub fn contains_center(&self) -> bool {
        self.deltas.contains(&(0, 0))
    }

    /// Place the shape around `center`; `None` if any tile falls off the grid.
    pub fn place(&self, grid: &GridTopology, center: usize) -> Option<Placement> {
        let (reel, row) = grid.reel_row(center);
        self.deltas
            .iter()
            .map(|&(dr, dw)| grid.checked_offset(reel as isize + dr as isize, row as isize + dw as isize))
            .collect()
    }

    /// Place the shape around `center`, dropping tiles that fall off the grid.
    pub fn place_clipped(&self, grid: &GridTopology, center: usize) -> Placement {
        let (reel, row) = grid.reel_row(center);
        self.deltas
            .iter()
            .filter_map(|&(dr, dw)| {
                grid.checked_offset(reel as isize + dr as isize, row as isize + dw as isize)
            })
            .collect()
    }
}

impl TryFrom<Vec<(i8, i8)>> for Shape {
    type Error = GridError;

    fn try_from(deltas: Vec<(i8, i8)>) -> Result<Self> {
        Self::new(deltas)
    }
}

impl From<Shape> for Vec<(i8, i8)> {
    fn from(shape: Shape) -> Self {
        shape.deltas
    }
}
