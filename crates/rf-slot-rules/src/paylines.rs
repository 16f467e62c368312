//! Payline definitions

use rf_slot_grid::GridTopology;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Direction(s) in which paylines are matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PayDirection {
    #[default]
    LeftToRight,
    RightToLeft,
    /// Both ways; right-to-left only pays when strictly better
    Both,
}

impl PayDirection {
    pub fn ltr(self) -> bool {
        matches!(self, Self::LeftToRight | Self::Both)
    }

    pub fn rtl(self) -> bool {
        matches!(self, Self::RightToLeft | Self::Both)
    }
}

/// A payline definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payline {
    /// Payline id (1-based)
    pub id: u8,
    /// Row for each reel (e.g. `[1, 0, 0, 0, 1]`)
    pub rows: Vec<u8>,
}

impl Payline {
    pub fn new(id: u8, rows: &[u8]) -> Self {
        Self {
            id,
            rows: rows.to_vec(),
        }
    }

    /// Same row across all reels
    pub fn straight(id: u8, row: u8, reels: u8) -> Self {
        Self {
            id,
            rows: vec![row; reels as usize],
        }
    }
}

/// The common 20 lines of a 5×3 game
pub fn standard_5x3_paylines() -> Vec<Payline> {
    vec![
        Payline::straight(1, 1, 5),
        Payline::straight(2, 0, 5),
        Payline::straight(3, 2, 5),
        Payline::new(4, &[0, 1, 2, 1, 0]),
        Payline::new(5, &[2, 1, 0, 1, 2]),
        Payline::new(6, &[0, 0, 1, 2, 2]),
        Payline::new(7, &[2, 2, 1, 0, 0]),
        Payline::new(8, &[1, 0, 0, 0, 1]),
        Payline::new(9, &[1, 2, 2, 2, 1]),
        Payline::new(10, &[0, 1, 0, 1, 0]),
        Payline::new(11, &[2, 1, 2, 1, 2]),
        Payline::new(12, &[0, 1, 1, 1, 0]),
        Payline::new(13, &[2, 1, 1, 1, 2]),
        Payline::new(14, &[1, 1, 0, 1, 1]),
        Payline::new(15, &[1, 1, 2, 1, 1]),
        Payline::new(16, &[0, 2, 0, 2, 0]),
        Payline::new(17, &[2, 0, 2, 0, 2]),
        Payline::new(18, &[1, 0, 1, 0, 1]),
        Payline::new(19, &[1, 2, 1, 2, 1]),
        Payline::new(20, &[0, 0, 2, 0, 0]),
    ]
}

/// Validated paylines with precomputed tile offsets
#[derive(Debug, Clone)]
pub struct PaylineSet {
    direction: PayDirection,
    highest_payout: bool,
    lines: Vec<Payline>,
    offsets: Vec<Vec<usize>>,
}

impl PaylineSet {
    /// Validate lines against the grid: one row per reel, each row inside
    /// the reel's mask, unique non-zero ids.
    pub fn new(
        grid: &GridTopology,
        direction: PayDirection,
        highest_payout: bool,
        lines: Vec<Payline>,
    ) -> Result<Self> {
        let mut seen = Vec::with_capacity(lines.len());
        let mut offsets = Vec::with_capacity(lines.len());

        for line in &lines {
            if line.id == 0 {
                return Err(ConfigError::PaylineId);
            }
            if seen.contains(&line.id) {
                return Err(ConfigError::DuplicatePayline(line.id));
            }
            seen.push(line.id);

            if line.rows.len() != grid.reels() {
                return Err(ConfigError::PaylineLength {
                    id: line.id,
                    expected: grid.reels(),
                    got: line.rows.len(),
                });
            }

            let mut line_offsets = Vec::with_capacity(line.rows.len());
            for (reel, &row) in line.rows.iter().enumerate() {
                let offset = grid
                    .checked_offset(reel as isize, row as isize)
                    .ok_or(ConfigError::PaylineRow {
                        id: line.id,
                        reel,
                        row,
                    })?;
                line_offsets.push(offset);
            }
            offsets.push(line_offsets);
        }

        Ok(Self {
            direction,
            highest_payout,
            lines,
            offsets,
        })
    }

    pub fn direction(&self) -> PayDirection {
        self.direction
    }

    /// Wild runs may pay as the best wild symbol
    pub fn highest_payout(&self) -> bool {
        self.highest_payout
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines paired with their tile offsets (reel order)
    pub fn iter(&self) -> impl Iterator<Item = (&Payline, &[usize])> {
        self.lines
            .iter()
            .zip(self.offsets.iter().map(Vec::as_slice))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_lines_validate() {
        let grid = GridTopology::new(5, 3).unwrap();
        let set = PaylineSet::new(&grid, PayDirection::Both, false, standard_5x3_paylines()).unwrap();
        assert_eq!(set.len(), 20);
        let (line, offsets) = set.iter().nth(3).unwrap();
        assert_eq!(line.id, 4);
        assert_eq!(offsets, &[0, 4, 8, 10, 12]);
        assert!(set.direction().ltr() && set.direction().rtl());
    }

    #[test]
    fn test_invalid_lines() {
        let grid = GridTopology::new(5, 3).unwrap();
        let build = |lines: Vec<Payline>| PaylineSet::new(&grid, PayDirection::LeftToRight, false, lines);

        assert_eq!(build(vec![Payline::straight(0, 1, 5)]).unwrap_err(), ConfigError::PaylineId);
        assert_eq!(
            build(vec![Payline::straight(1, 1, 5), Payline::straight(1, 0, 5)]).unwrap_err(),
            ConfigError::DuplicatePayline(1)
        );
        assert_eq!(
            build(vec![Payline::straight(1, 1, 4)]).unwrap_err(),
            ConfigError::PaylineLength { id: 1, expected: 5, got: 4 }
        );
        assert_eq!(
            build(vec![Payline::new(2, &[0, 0, 3, 0, 0])]).unwrap_err(),
            ConfigError::PaylineRow { id: 2, reel: 2, row: 3 }
        );
    }

    #[test]
    fn test_masked_rows() {
        let grid = GridTopology::with_mask(6, 4, &[2, 3, 4, 4, 3, 2]).unwrap();
        assert!(PaylineSet::new(&grid, PayDirection::LeftToRight, false, vec![Payline::new(1, &[1, 1, 1, 1, 1, 1])]).is_ok());
        assert_eq!(
            PaylineSet::new(&grid, PayDirection::LeftToRight, false, vec![Payline::new(1, &[2, 2, 2, 2, 2, 2])]).unwrap_err(),
            ConfigError::PaylineRow { id: 1, reel: 0, row: 2 }
        );
    }
}
