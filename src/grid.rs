//! The hex grid: a flat arena of tiles addressed by coordinate.
//!
//! Tiles are created once with the grid and never added or removed. All
//! references between tiles are coordinate lookups.

use std::fmt;

use crate::catalog;
use crate::hex::{Coordinate, Side};
use crate::tile::{Tile, TilePattern};

#[derive(Clone, Debug)]
pub struct HexGrid {
    rows: usize,
    cols: usize,
    tiles: Vec<Tile>,
}

impl HexGrid {
    /// Create an empty `rows` x `cols` grid.
    ///
    /// # Panics
    /// If either dimension is zero.
    pub fn new(rows: usize, cols: usize) -> Self {
        assert!(rows > 0 && cols > 0, "grid needs at least one tile");
        let tiles = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| Tile::new(Coordinate::new(col, row))))
            .collect();
        Self { rows, cols, tiles }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    fn idx(&self, coord: Coordinate) -> Option<usize> {
        (coord.col < self.cols && coord.row < self.rows).then(|| coord.row * self.cols + coord.col)
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        self.idx(coord).is_some()
    }

    pub fn get(&self, coord: Coordinate) -> Option<&Tile> {
        let i = self.idx(coord)?;
        Some(&self.tiles[i])
    }

    pub fn get_mut(&mut self, coord: Coordinate) -> Option<&mut Tile> {
        let i = self.idx(coord)?;
        Some(&mut self.tiles[i])
    }

    /// The tile across `side` of `coord`, or `None` at the edge of the board.
    ///
    /// # Panics
    /// If `side` is not in `0..6`.
    pub fn neighbor(&self, coord: Coordinate, side: Side) -> Option<&Tile> {
        coord.step(side).and_then(|c| self.get(c))
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Every coordinate, row by row.
    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.tiles.iter().map(Tile::coord)
    }

    /// True when no tile is occupied.
    pub fn all_empty(&self) -> bool {
        self.tiles.iter().all(Tile::is_empty)
    }

    /// True when every tile is occupied.
    pub fn all_occupied(&self) -> bool {
        self.tiles.iter().all(|t| !t.is_empty())
    }

    pub fn occupied_count(&self) -> usize {
        self.tiles.iter().filter(|t| !t.is_empty()).count()
    }

    /// Put `pattern` on the tile at `coord`, replacing anything there.
    ///
    /// # Panics
    /// If `coord` is off the board.
    pub fn set(&mut self, coord: Coordinate, pattern: TilePattern) {
        match self.get_mut(coord) {
            Some(tile) => tile.set(pattern),
            None => panic!("coordinate {coord} is off the board"),
        }
    }

    pub fn clear(&mut self, coord: Coordinate) {
        if let Some(tile) = self.get_mut(coord) {
            tile.clear();
        }
    }

    pub fn clear_all(&mut self) {
        for tile in &mut self.tiles {
            tile.clear();
        }
    }
}

/// Two text lines per row: even columns first, then the odd columns, which
/// sit half a row lower, shifted right.
impl fmt::Display for HexGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            for parity in 0..2 {
                let mut line = String::with_capacity(self.cols * 2);
                for col in 0..self.cols {
                    let ch = if col % 2 != parity {
                        ' '
                    } else {
                        match self.get(Coordinate::new(col, row)).and_then(Tile::pattern) {
                            Some(p) => catalog::letter(p),
                            None => '.',
                        }
                    };
                    line.push(ch);
                    line.push(' ');
                }
                writeln!(f, "{}", line.trim_end())?;
            }
        }
        Ok(())
    }
}
