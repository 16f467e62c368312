//! Direction codes between neighboring tiles

use std::fmt;

use serde::{Deserialize, Serialize};

/// Direction from one tile to a neighboring tile.
///
/// Codes 1..=8 are the compass directions stored in neighbor maps. Codes
/// 9..=12 are categories used only as filters (e.g. "jump horizontally").
/// `Center` (code 0) is the identity entry a tile has for itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    #[default]
    Center = 0,
    Left = 1,
    Right = 2,
    Up = 3,
    Down = 4,
    LeftUp = 5,
    LeftDown = 6,
    RightUp = 7,
    RightDown = 8,
    /// Left or right
    Horizontal = 9,
    /// Up or down
    Vertical = 10,
    /// Any of the four diagonals
    Diagonal = 11,
    /// Any direction except the tile itself
    Any = 12,
}

impl Direction {
    /// The eight compass directions, in code order
    pub const COMPASS: [Direction; 8] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
        Direction::LeftUp,
        Direction::LeftDown,
        Direction::RightUp,
        Direction::RightDown,
    ];

    /// Numeric direction code
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Direction for a numeric code
    pub fn from_code(code: u8) -> Option<Self> {
        let dir = match code {
            0 => Direction::Center,
            1 => Direction::Left,
            2 => Direction::Right,
            3 => Direction::Up,
            4 => Direction::Down,
            5 => Direction::LeftUp,
            6 => Direction::LeftDown,
            7 => Direction::RightUp,
            8 => Direction::RightDown,
            9 => Direction::Horizontal,
            10 => Direction::Vertical,
            11 => Direction::Diagonal,
            12 => Direction::Any,
            _ => return None,
        };
        Some(dir)
    }

    /// The direction pointing back from the neighbor.
    ///
    /// Categories and `Center` are their own inverse.
    pub fn inverse(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::LeftUp => Direction::RightDown,
            Direction::RightDown => Direction::LeftUp,
            Direction::LeftDown => Direction::RightUp,
            Direction::RightUp => Direction::LeftDown,
            other => other,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right | Direction::Horizontal)
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down | Direction::Vertical)
    }

    pub fn is_diagonal(self) -> bool {
        matches!(
            self,
            Direction::LeftUp
                | Direction::LeftDown
                | Direction::RightUp
                | Direction::RightDown
                | Direction::Diagonal
        )
    }

    /// True for the filter-only categories
    pub fn is_category(self) -> bool {
        matches!(
            self,
            Direction::Horizontal | Direction::Vertical | Direction::Diagonal | Direction::Any
        )
    }

    /// Test a concrete neighbor direction against this filter.
    ///
    /// `Center` is never accepted; a tile is not its own neighbor for
    /// movement purposes.
    pub fn accepts(self, got: Direction) -> bool {
        if got == Direction::Center {
            return false;
        }
        match self {
            Direction::Any => true,
            Direction::Horizontal => got.is_horizontal(),
            Direction::Vertical => got.is_vertical(),
            Direction::Diagonal => got.is_diagonal(),
            want => want == got,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Center => "center",
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::LeftUp => "left+up",
            Direction::LeftDown => "left+down",
            Direction::RightUp => "right+up",
            Direction::RightDown => "right+down",
            Direction::Horizontal => "horizontal",
            Direction::Vertical => "vertical",
            Direction::Diagonal => "diagonal",
            Direction::Any => "any",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
