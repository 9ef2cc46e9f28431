//! Loop detection.
//!
//! Starting from one connection of a freshly placed tile, the walk leaves
//! through the connection's exit side, enters the neighbor through the
//! opposite side, follows that neighbor's pipe, and repeats. It ends when it:
//! - runs off the board ([`WalkEnd::TouchesEdge`]),
//! - reaches an empty tile ([`WalkEnd::TouchesEmpty`]),
//! - comes back into the start tile on one of the start connection's sides
//!   ([`WalkEnd::Closed`]),
//! - exceeds a hard step cap ([`WalkEnd::CapExceeded`]), which only happens
//!   if the board bookkeeping is broken.
//!
//! The start link is recorded once; closing the loop does not append it
//! again, so a loop's length is the number of links it passes through.

use tracing::debug;

use crate::constants::WALK_CAP_FACTOR;
use crate::grid::HexGrid;
use crate::hex::{Coordinate, opposite};
use crate::tile::{Connection, TilePattern};

/// One step of a chain: a pipe segment on a specific tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Link {
    pub coord: Coordinate,
    pub connection: Connection,
}

impl Link {
    pub fn new(coord: Coordinate, connection: Connection) -> Self {
        Self { coord, connection }
    }
}

/// Why a walk stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WalkEnd {
    Closed,
    TouchesEdge,
    TouchesEmpty,
    CapExceeded,
}

/// The chain traced from a start connection and how it ended.
#[derive(Clone, Debug)]
pub struct Walk {
    pub chain: Vec<Link>,
    pub end: WalkEnd,
}

impl Walk {
    pub fn is_closed(&self) -> bool {
        self.end == WalkEnd::Closed
    }
}

/// A closed chain of links.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Loop {
    links: Vec<Link>,
}

impl Loop {
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Number of links in the loop.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn contains(&self, link: &Link) -> bool {
        self.links.contains(link)
    }

    /// True if the two loops have any link in common.
    pub fn overlaps(&self, other: &Loop) -> bool {
        self.links.iter().any(|l| other.contains(l))
    }

    /// Tiles visited by the loop, in walk order. A tile the loop passes
    /// through twice appears twice.
    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.links.iter().map(|l| l.coord)
    }
}

/// Follow the chain that leaves `start` through `connection.to`.
///
/// # Panics
/// If `start` is off the board or empty, or if a visited tile does not cover
/// the side the walk enters through.
pub fn walk(grid: &HexGrid, start: Coordinate, connection: Connection) -> Walk {
    match grid.get(start) {
        Some(tile) if !tile.is_empty() => {}
        _ => panic!("walk must start on an occupied tile, got {start}"),
    }

    let cap = WALK_CAP_FACTOR * grid.len();
    let mut chain = vec![Link::new(start, connection)];
    let mut current = start;
    let mut exit = connection.to;

    for _ in 0..cap {
        let entry = opposite(exit);
        let next = match grid.neighbor(current, exit) {
            None => return Walk { chain, end: WalkEnd::TouchesEdge },
            Some(tile) if tile.is_empty() => return Walk { chain, end: WalkEnd::TouchesEmpty },
            Some(tile) => tile,
        };
        let connected = next.connected_side(entry);
        if next.coord() == start && connection.contains(connected) {
            return Walk { chain, end: WalkEnd::Closed };
        }
        chain.push(Link::new(next.coord(), Connection::new(entry, connected)));
        current = next.coord();
        exit = connected;
    }

    debug!(%start, cap, "walk hit step cap");
    Walk { chain, end: WalkEnd::CapExceeded }
}

/// Every distinct loop closed through the tile at `coord`.
///
/// Each of the tile's connections is walked independently. A loop that runs
/// through the tile twice is found from both of its connections; the second
/// sighting shares links with the first and is dropped.
pub fn find_loops(grid: &HexGrid, coord: Coordinate) -> Vec<Loop> {
    let Some(tile) = grid.get(coord) else {
        return Vec::new();
    };

    let mut loops: Vec<Loop> = Vec::new();
    for &connection in tile.connections() {
        let traced = walk(grid, coord, connection);
        debug!(%coord, %connection, end = ?traced.end, len = traced.chain.len(), "walked");
        if !traced.is_closed() {
            continue;
        }
        let found = Loop { links: traced.chain };
        if loops.iter().any(|l| l.overlaps(&found)) {
            continue;
        }
        loops.push(found);
    }
    loops
}

/// What one connection of a hypothetical placement would join up with.
#[derive(Clone, Debug)]
pub struct Probe {
    pub connection: Connection,
    /// Links reachable through the connection, ordered from one end of the
    /// chain to the other. Includes the probed tile itself.
    pub chain: Vec<Link>,
    /// How the chain ends in each direction; both `Closed` for a loop.
    pub ends: [WalkEnd; 2],
}

impl Probe {
    pub fn closes(&self) -> bool {
        self.ends[0] == WalkEnd::Closed
    }
}

/// Trace each connection of `pattern` as if it were placed at `coord`,
/// without touching `grid`. An occupied tile cannot take a placement, so it
/// yields no chains.
///
/// # Panics
/// If `coord` is off the board.
pub fn probe(grid: &HexGrid, coord: Coordinate, pattern: TilePattern) -> Vec<Probe> {
    match grid.get(coord) {
        Some(tile) if !tile.is_empty() => return Vec::new(),
        Some(_) => {}
        None => panic!("coordinate {coord} is off the board"),
    }
    let mut scratch = grid.clone();
    scratch.set(coord, pattern);

    pattern
        .connections()
        .iter()
        .map(|&connection| {
            let forward = walk(&scratch, coord, connection);
            if forward.is_closed() {
                return Probe {
                    connection,
                    chain: forward.chain,
                    ends: [WalkEnd::Closed; 2],
                };
            }
            let reversed = Connection::new(connection.to, connection.from);
            let backward = walk(&scratch, coord, reversed);
            let mut chain: Vec<Link> = backward.chain[1..].iter().rev().copied().collect();
            chain.extend(forward.chain);
            Probe {
                connection,
                chain,
                ends: [backward.end, forward.end],
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{COLS, ROWS};

    fn c(col: usize, row: usize) -> Coordinate {
        Coordinate::new(col, row)
    }

    fn p(pairs: [(usize, usize); 3]) -> TilePattern {
        TilePattern::new(pairs)
    }

    /// Three mutually adjacent tiles around one vertex, piped into a ring.
    fn triangle() -> HexGrid {
        let mut grid = HexGrid::new(ROWS, COLS);
        grid.set(c(0, 0), p([(1, 2), (0, 3), (4, 5)]));
        grid.set(c(1, 0), p([(0, 5), (1, 2), (3, 4)]));
        grid.set(c(2, 0), p([(3, 4), (0, 1), (2, 5)]));
        grid
    }

    #[test]
    fn test_triangle_closes() {
        let grid = triangle();
        let w = walk(&grid, c(0, 0), Connection::new(1, 2));
        assert_eq!(w.end, WalkEnd::Closed);
        let coords: Vec<_> = w.chain.iter().map(|l| l.coord).collect();
        assert_eq!(coords, vec![c(0, 0), c(1, 0), c(2, 0)]);
        assert_eq!(w.chain[1].connection, Connection::new(5, 0));
        assert_eq!(w.chain[2].connection, Connection::new(3, 4));
    }

    #[test]
    fn test_triangle_closes_from_any_member() {
        let grid = triangle();
        for start in [c(0, 0), c(1, 0), c(2, 0)] {
            let loops = find_loops(&grid, start);
            assert_eq!(loops.len(), 1, "from {start}");
            assert_eq!(loops[0].len(), 3);
        }
    }

    #[test]
    fn test_walk_touches_edge() {
        let grid = triangle();
        // side 4 of (0, 0) faces the left edge
        let w = walk(&grid, c(0, 0), Connection::new(5, 4));
        assert_eq!(w.end, WalkEnd::TouchesEdge);
        assert_eq!(w.chain.len(), 1);
    }

    #[test]
    fn test_walk_touches_empty() {
        let grid = triangle();
        // side 1 of (2, 0) faces the empty (4, 0)
        let w = walk(&grid, c(2, 0), Connection::new(0, 1));
        assert_eq!(w.end, WalkEnd::TouchesEmpty);
    }

    #[test]
    fn test_open_chain_is_not_a_loop() {
        let mut grid = HexGrid::new(ROWS, COLS);
        grid.set(c(4, 2), p([(0, 3), (1, 4), (2, 5)]));
        grid.set(c(6, 2), p([(0, 3), (1, 4), (2, 5)]));
        assert!(find_loops(&grid, c(4, 2)).is_empty());
        let w = walk(&grid, c(4, 2), Connection::new(4, 1));
        assert_eq!(w.end, WalkEnd::TouchesEmpty);
        assert_eq!(w.chain.len(), 2);
    }

    #[test]
    fn test_loop_through_start_twice_is_reported_once() {
        let mut grid = HexGrid::new(ROWS, COLS);
        grid.set(c(6, 2), p([(0, 4), (1, 2), (3, 5)]));
        grid.set(c(7, 2), p([(0, 5), (1, 2), (3, 4)]));
        grid.set(c(8, 2), p([(0, 3), (1, 4), (2, 5)]));
        grid.set(c(9, 1), p([(0, 1), (2, 3), (4, 5)]));
        grid.set(c(10, 2), p([(0, 3), (1, 2), (4, 5)]));

        let first = walk(&grid, c(8, 2), Connection::new(0, 3));
        let second = walk(&grid, c(8, 2), Connection::new(1, 4));
        assert!(first.is_closed());
        assert!(second.is_closed());

        let loops = find_loops(&grid, c(8, 2));
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].len(), 6);
        let visits = loops[0].coordinates().filter(|&x| x == c(8, 2)).count();
        assert_eq!(visits, 2);
    }

    #[test]
    fn test_find_loops_on_empty_tile() {
        let grid = HexGrid::new(ROWS, COLS);
        assert!(find_loops(&grid, c(3, 3)).is_empty());
    }

    #[test]
    #[should_panic(expected = "occupied tile")]
    fn test_walk_from_empty_tile() {
        let grid = HexGrid::new(ROWS, COLS);
        walk(&grid, c(3, 3), Connection::new(0, 1));
    }

    #[test]
    fn test_probe_predicts_closure_without_mutating() {
        let mut grid = triangle();
        grid.clear(c(0, 0));

        let probes = probe(&grid, c(0, 0), p([(1, 2), (0, 3), (4, 5)]));
        assert!(grid.get(c(0, 0)).unwrap().is_empty());
        assert_eq!(probes.len(), 3);

        let ring = probes
            .iter()
            .find(|pr| pr.connection == Connection::new(1, 2))
            .unwrap();
        assert!(ring.closes());
        assert_eq!(ring.chain.len(), 3);

        let left = probes
            .iter()
            .find(|pr| pr.connection == Connection::new(4, 5))
            .unwrap();
        assert!(!left.closes());
        assert_eq!(left.ends, [WalkEnd::TouchesEdge, WalkEnd::TouchesEdge]);
    }

    #[test]
    fn test_probe_joins_both_directions() {
        let mut grid = HexGrid::new(ROWS, COLS);
        grid.set(c(2, 2), p([(0, 3), (1, 4), (2, 5)]));
        grid.set(c(6, 2), p([(0, 3), (1, 4), (2, 5)]));

        let probes = probe(&grid, c(4, 2), p([(0, 3), (1, 4), (2, 5)]));
        let row = probes
            .iter()
            .find(|pr| pr.connection == Connection::new(1, 4))
            .unwrap();
        let coords: Vec<_> = row.chain.iter().map(|l| l.coord).collect();
        assert_eq!(coords, vec![c(6, 2), c(4, 2), c(2, 2)]);
        assert_eq!(row.ends, [WalkEnd::TouchesEmpty, WalkEnd::TouchesEmpty]);
    }

    #[test]
    fn test_probe_on_occupied_tile_is_empty() {
        let mut grid = HexGrid::new(ROWS, COLS);
        grid.set(c(4, 2), p([(0, 1), (2, 3), (4, 5)]));

        assert!(probe(&grid, c(4, 2), p([(0, 3), (1, 4), (2, 5)])).is_empty());
        assert_eq!(grid.get(c(4, 2)).unwrap().connections()[0], Connection::new(0, 1));
    }
}
