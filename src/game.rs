//! The board controller: placement, loop resolution, and scoring.
//!
//! A [`Game`] owns the grid and the pattern catalog and is the only thing
//! that mutates tiles. Each placement runs detection and scoring to
//! completion before returning. Closed loops stay on the board for a fixed
//! number of ticks and are then cleared by [`Game::tick`]; no placement is
//! accepted while a clear is pending.
//!
//! ```text
//!   Idle --place (loops closed)--> Resolving --tick x clear_delay--> Idle
//!    ^  \--place (no loop)--/
//! ```

use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::constants::{CLEAR_DELAY_TICKS, COLS, ROWS};
use crate::grid::HexGrid;
use crate::hex::Coordinate;
use crate::loops::{self, Loop, Probe};
use crate::scoring::ScoreParams;
use crate::tile::{Connection, TilePattern};

/// Runtime settings for a game.
#[derive(Clone, Debug)]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
    /// Ticks between a loop closing and its tiles being cleared.
    pub clear_delay: u32,
    /// Seed for the pattern generator; `None` picks a random one.
    pub seed: Option<u64>,
    pub scoring: ScoreParams,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: ROWS,
            cols: COLS,
            clear_delay: CLEAR_DELAY_TICKS,
            seed: None,
            scoring: ScoreParams::default(),
        }
    }
}

impl GameConfig {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Resolving { ticks_left: u32 },
}

/// Outcome of [`Game::place`].
#[derive(Clone, Debug, Default)]
pub struct PlacementResult {
    pub accepted: bool,
    pub closed_loops: Vec<Loop>,
    pub points_awarded: u64,
}

impl PlacementResult {
    fn rejected() -> Self {
        Self::default()
    }
}

/// Outcome of [`Game::tick`].
#[derive(Clone, Debug, Default)]
pub struct TickResult {
    pub cleared_loops: Vec<Loop>,
    pub board_clear_bonus_awarded: bool,
}

pub struct Game {
    config: GameConfig,
    grid: HexGrid,
    catalog: Catalog,
    phase: Phase,
    /// Loops closed by the last placement, waiting to be cleared.
    resolving: Vec<Loop>,
    score: u64,
    high_score: u64,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl Game {
    /// # Panics
    /// If the configured board has no rows or no columns.
    pub fn new(config: GameConfig) -> Self {
        let catalog = match config.seed {
            Some(seed) => Catalog::with_seed(seed),
            None => Catalog::new(),
        };
        Self {
            grid: HexGrid::new(config.rows, config.cols),
            catalog,
            phase: Phase::Idle,
            resolving: Vec::new(),
            score: 0,
            high_score: 0,
            config,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &HexGrid {
        &self.grid
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_resolving(&self) -> bool {
        matches!(self.phase, Phase::Resolving { .. })
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Best score seen this session, including the game in progress.
    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    /// Drop the pending pattern on the empty tile at `coord`.
    ///
    /// Rejected (with no state change) when the tile is occupied, off the
    /// board, or a clear is pending.
    pub fn place(&mut self, coord: Coordinate) -> PlacementResult {
        if self.is_resolving() {
            debug!(%coord, "placement rejected: clear pending");
            return PlacementResult::rejected();
        }
        match self.grid.get(coord) {
            Some(tile) if tile.is_empty() => {}
            _ => {
                debug!(%coord, "placement rejected: tile unavailable");
                return PlacementResult::rejected();
            }
        }

        let pattern = self.catalog.advance();
        self.grid.set(coord, pattern);
        debug!(%coord, %pattern, next = %self.catalog.pending(), "placed");

        let closed = loops::find_loops(&self.grid, coord);
        let points = self.config.scoring.batch_points(&closed);
        self.add_points(points);

        if !closed.is_empty() {
            info!(
                %coord,
                loops = closed.len(),
                points,
                score = self.score,
                "loops closed"
            );
            self.phase = Phase::Resolving {
                ticks_left: self.config.clear_delay,
            };
            self.resolving = closed.clone();
        }

        PlacementResult {
            accepted: true,
            closed_loops: closed,
            points_awarded: points,
        }
    }

    /// Advance the clear countdown by one tick.
    pub fn tick(&mut self) -> TickResult {
        let Phase::Resolving { ticks_left } = self.phase else {
            return TickResult::default();
        };
        let ticks_left = ticks_left.saturating_sub(1);
        if ticks_left > 0 {
            self.phase = Phase::Resolving { ticks_left };
            return TickResult::default();
        }
        self.resolve()
    }

    fn resolve(&mut self) -> TickResult {
        let was_empty = self.grid.all_empty();
        let cleared = std::mem::take(&mut self.resolving);
        for link in cleared.iter().flat_map(|l| l.links()) {
            self.grid.clear(link.coord);
        }
        self.phase = Phase::Idle;

        let bonus = self.grid.all_empty() && !was_empty;
        if bonus {
            self.add_points(self.config.scoring.clear_board_bonus);
            info!(score = self.score, "board cleared");
        }
        debug!(loops = cleared.len(), "cleared loops");

        TickResult {
            cleared_loops: cleared,
            board_clear_bonus_awarded: bonus,
        }
    }

    fn add_points(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
        self.high_score = self.high_score.max(self.score);
    }

    /// Empty every tile, zero the score, and draw a fresh pending pattern.
    /// The high score survives.
    pub fn reset(&mut self) {
        self.grid.clear_all();
        self.catalog.advance();
        self.phase = Phase::Idle;
        self.resolving.clear();
        info!(final_score = self.score, high_score = self.high_score, "game reset");
        self.score = 0;
    }

    /// No empty tile is left and nothing is waiting to be cleared.
    pub fn is_game_over(&self) -> bool {
        !self.is_resolving() && self.grid.all_occupied()
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        self.grid.contains(coord)
    }

    /// # Panics
    /// If `coord` is off the board.
    pub fn is_empty(&self, coord: Coordinate) -> bool {
        match self.grid.get(coord) {
            Some(tile) => tile.is_empty(),
            None => panic!("coordinate {coord} is off the board"),
        }
    }

    /// # Panics
    /// If `coord` is off the board.
    pub fn connections_at(&self, coord: Coordinate) -> &[Connection] {
        match self.grid.get(coord) {
            Some(tile) => tile.connections(),
            None => panic!("coordinate {coord} is off the board"),
        }
    }

    pub fn pending_pattern(&self) -> TilePattern {
        self.catalog.pending()
    }

    pub fn all_coordinates(&self) -> Vec<Coordinate> {
        self.grid.coordinates().collect()
    }

    /// Loops waiting to be cleared; empty unless resolving.
    pub fn resolving_loops(&self) -> &[Loop] {
        &self.resolving
    }

    /// True if the tile at `coord` belongs to a loop waiting to be cleared.
    pub fn in_closed_loop(&self, coord: Coordinate) -> bool {
        self.resolving
            .iter()
            .any(|l| l.coordinates().any(|c| c == coord))
    }

    /// Chains the pending pattern would form if placed at `coord`; none when
    /// the tile is occupied.
    ///
    /// # Panics
    /// If `coord` is off the board.
    pub fn probe(&self, coord: Coordinate) -> Vec<Probe> {
        loops::probe(&self.grid, coord, self.catalog.pending())
    }

    /// Write `pattern` straight onto a tile, skipping detection and scoring.
    /// Used to set up positions. Returns `false` without touching the board
    /// while loops are waiting to clear.
    ///
    /// # Panics
    /// If `coord` is off the board.
    pub fn arrange(&mut self, coord: Coordinate, pattern: TilePattern) -> bool {
        if self.is_resolving() {
            debug!(%coord, "arrange rejected while resolving");
            return false;
        }
        self.grid.set(coord, pattern);
        true
    }

    /// Override the pattern the next placement will use.
    pub fn set_pending(&mut self, pattern: TilePattern) {
        self.catalog.set_pending(pattern);
    }
}
