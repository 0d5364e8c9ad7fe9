//! Integer grid positions.
//!
//! Farms are laid out on an integer grid with the barn at the origin.
//! `y` grows northward.

use std::fmt;

use serde::{Serialize, Deserialize};

/// A position on a farm grid.
///
/// Implements Ord (x, then y) for deterministic BTreeMap ordering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// West (-) / east (+) coordinate
    pub x: i32,
    /// South (-) / north (+) coordinate
    pub y: i32,
}

impl Position {
    /// The barn position every farm is built around.
    pub const ORIGIN: Position = Position { x: 0, y: 0 };

    /// Create a position.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance (|dx| + |dy|).
    #[inline]
    pub fn manhattan_distance(self, other: Position) -> u32 {
        self.x.abs_diff(other.x).saturating_add(self.y.abs_diff(other.y))
    }

    /// The tile directly north.
    #[inline]
    pub fn north(self) -> Position {
        Position::new(self.x, self.y.saturating_add(1))
    }

    /// The tile directly south.
    #[inline]
    pub fn south(self) -> Position {
        Position::new(self.x, self.y.saturating_sub(1))
    }

    /// The tile directly east.
    #[inline]
    pub fn east(self) -> Position {
        Position::new(self.x.saturating_add(1), self.y)
    }

    /// The tile directly west.
    #[inline]
    pub fn west(self) -> Position {
        Position::new(self.x.saturating_sub(1), self.y)
    }

    /// Is this the barn position?
    #[inline]
    pub fn is_origin(self) -> bool {
        self == Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
