//! Hex sides, grid coordinates, and the offset neighbor rule.
//!
//! The board is a staggered ("offset") hex grid: every column is half a hex
//! wide and odd columns sit half a row lower than even columns. Sides are
//! numbered clockwise starting from the upper-right edge:
//!
//! ```text
//!        5 / \ 0
//!       4 |   | 1
//!        3 \ / 2
//! ```
//!
//! Stepping across side `s` of one tile enters the neighbor through side
//! `opposite(s)`.

use std::fmt;

use crate::constants::SIDES;

/// One of the six edges of a hexagon, in `0..6`.
pub type Side = usize;

/// Position of a tile on the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    pub col: usize,
    pub row: usize,
}

impl Coordinate {
    pub const fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }

    #[inline]
    pub fn is_even_col(&self) -> bool {
        self.col % 2 == 0
    }

    /// Coordinate across `side`, or `None` when it would leave the
    /// non-negative quadrant. Callers still have to check the upper bounds.
    ///
    /// # Panics
    /// If `side` is not in `0..6`.
    pub fn step(&self, side: Side) -> Option<Coordinate> {
        let (dcol, drow): (isize, isize) = match (side, self.is_even_col()) {
            (0, true) => (1, -1),
            (0, false) => (1, 0),
            (1, _) => (2, 0),
            (2, true) => (1, 0),
            (2, false) => (1, 1),
            (3, true) => (-1, 0),
            (3, false) => (-1, 1),
            (4, _) => (-2, 0),
            (5, true) => (-1, -1),
            (5, false) => (-1, 0),
            _ => panic!("side out of range: {side}"),
        };
        let col = self.col.checked_add_signed(dcol)?;
        let row = self.row.checked_add_signed(drow)?;
        Some(Coordinate { col, row })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// The side a walk enters through after leaving across `side`.
///
/// # Panics
/// If `side` is not in `0..6`.
#[inline]
pub fn opposite(side: Side) -> Side {
    assert!(side < SIDES, "side out of range: {side}");
    (side + SIDES / 2) % SIDES
}
