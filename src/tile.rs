//! Tiles and the pipe connections routed through them.
//!
//! A [`Connection`] is an internal pipe segment joining two sides of one
//! tile. A [`TilePattern`] is three connections that between them use every
//! side exactly once. A [`Tile`] is a board cell: a fixed coordinate plus an
//! optional pattern.
//!
//! Links between tiles are never stored; they are computed by walking the
//! grid (see [`crate::loops`]).

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::constants::{CONNECTIONS_PER_TILE, SIDES};
use crate::hex::{Coordinate, Side};

/// Shape class of a connection, decided by how far apart its sides are.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Curvature {
    /// Opposite sides.
    Straight,
    /// Sides two apart.
    LargeCurve,
    /// Adjacent sides.
    SmallCurve,
}

/// A pipe entering a tile at `from` and leaving at `to`.
///
/// Equality and hashing ignore direction: `{1, 4}` and `{4, 1}` are the same
/// segment.
#[derive(Copy, Clone, Debug)]
pub struct Connection {
    pub from: Side,
    pub to: Side,
}

impl Connection {
    /// # Panics
    /// If either side is out of range or both sides are the same.
    pub fn new(from: Side, to: Side) -> Self {
        assert!(from < SIDES && to < SIDES, "side out of range: {from}-{to}");
        assert_ne!(from, to, "connection must join two distinct sides");
        Self { from, to }
    }

    #[inline]
    pub fn contains(&self, side: Side) -> bool {
        self.from == side || self.to == side
    }

    /// The other end of the pipe, if `side` is one of its ends.
    #[inline]
    pub fn other(&self, side: Side) -> Option<Side> {
        if self.from == side {
            Some(self.to)
        } else if self.to == side {
            Some(self.from)
        } else {
            None
        }
    }

    fn key(&self) -> (Side, Side) {
        (self.from.min(self.to), self.from.max(self.to))
    }

    pub fn curvature(&self) -> Curvature {
        match self.from.abs_diff(self.to) {
            3 => Curvature::Straight,
            2 | 4 => Curvature::LargeCurve,
            _ => Curvature::SmallCurve,
        }
    }
}

impl PartialEq for Connection {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Connection {}

impl Hash for Connection {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// Three connections covering all six sides: the content of an occupied tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TilePattern([Connection; CONNECTIONS_PER_TILE]);

impl TilePattern {
    /// Build a pattern from three side pairs.
    ///
    /// # Panics
    /// If the pairs do not use every side exactly once.
    pub fn new(pairs: [(Side, Side); CONNECTIONS_PER_TILE]) -> Self {
        match Self::try_new(pairs) {
            Some(pattern) => pattern,
            None => panic!("pattern does not cover all six sides: {pairs:?}"),
        }
    }

    /// Like [`TilePattern::new`], returning `None` for anything that is not a
    /// perfect matching of the six sides.
    ///
    /// Pairs are stored low side first and sorted, so two spellings of the
    /// same matching compare equal.
    pub fn try_new(pairs: [(Side, Side); CONNECTIONS_PER_TILE]) -> Option<Self> {
        let mut seen = [false; SIDES];
        for &(a, b) in &pairs {
            if a >= SIDES || b >= SIDES || a == b || seen[a] || seen[b] {
                return None;
            }
            seen[a] = true;
            seen[b] = true;
        }
        let mut pairs = pairs.map(|(a, b)| (a.min(b), a.max(b)));
        pairs.sort_unstable();
        Some(Self(pairs.map(|(a, b)| Connection::new(a, b))))
    }

    pub fn connections(&self) -> &[Connection] {
        &self.0
    }

    /// The side paired with `side` inside this pattern.
    pub fn connected_side(&self, side: Side) -> Side {
        self.0
            .iter()
            .find_map(|c| c.other(side))
            .unwrap_or_else(|| panic!("side {side} not covered by pattern {self}"))
    }

    /// Parse the `01-25-34` notation used by the text protocol.
    pub fn parse(s: &str) -> Option<Self> {
        let mut pairs = [(0, 0); CONNECTIONS_PER_TILE];
        let mut parts = s.trim().split('-');
        for pair in &mut pairs {
            let part = parts.next()?.as_bytes();
            if part.len() != 2 || !part.iter().all(u8::is_ascii_digit) {
                return None;
            }
            *pair = ((part[0] - b'0') as Side, (part[1] - b'0') as Side);
        }
        if parts.next().is_some() {
            return None;
        }
        Self::try_new(pairs)
    }
}

impl fmt::Display for TilePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = &self.0;
        write!(f, "{a}-{b}-{c}")
    }
}

/// A single board cell.
#[derive(Clone, Debug)]
pub struct Tile {
    coord: Coordinate,
    pattern: Option<TilePattern>,
}

impl Tile {
    pub fn new(coord: Coordinate) -> Self {
        Self {
            coord,
            pattern: None,
        }
    }

    pub fn coord(&self) -> Coordinate {
        self.coord
    }

    pub fn pattern(&self) -> Option<&TilePattern> {
        self.pattern.as_ref()
    }

    /// Connections on this tile; empty when unoccupied.
    pub fn connections(&self) -> &[Connection] {
        match &self.pattern {
            Some(p) => p.connections(),
            None => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_none()
    }

    pub fn set(&mut self, pattern: TilePattern) {
        self.pattern = Some(pattern);
    }

    pub fn clear(&mut self) {
        self.pattern = None;
    }

    /// The side paired with `side` on this tile.
    ///
    /// # Panics
    /// If the tile is empty: asking an empty tile for routing means the walk
    /// bookkeeping is broken.
    pub fn connected_side(&self, side: Side) -> Side {
        match &self.pattern {
            Some(p) => p.connected_side(side),
            None => panic!("connected side requested on empty tile {}", self.coord),
        }
    }
}
