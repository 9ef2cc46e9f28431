//! Constants for board dimensions, scoring parameters, and timing.
//!
//! These are the defaults used by [`GameConfig`](crate::game::GameConfig).
//! Every value can be overridden at runtime, either programmatically or
//! through the command-line flags of the binary.

// =============================================================================
// Board Geometry
// =============================================================================

/// Number of tile rows.
pub const ROWS: usize = 5;

/// Number of tile columns. Columns are half a hex wide, so a row holds
/// `COLS / 2` hexes per staggered line.
pub const COLS: usize = ROWS * 4 - 2;

/// Number of sides on a hexagon.
pub const SIDES: usize = 6;

/// Number of connections held by an occupied tile.
pub const CONNECTIONS_PER_TILE: usize = SIDES / 2;

// =============================================================================
// Scoring
// =============================================================================

/// Points awarded when a clear-out leaves the whole board empty.
pub const CLEAR_BOARD_BONUS: u64 = 5_000;

/// First term of the arithmetic series used to score a loop.
pub const LOWEST_POINT_VALUE: u64 = 1;

/// Common difference of the arithmetic series used to score a loop.
pub const INCREMENT: u64 = 1;

// =============================================================================
// Timing and Limits
// =============================================================================

/// Ticks between a loop closing and its tiles being cleared.
pub const CLEAR_DELAY_TICKS: u32 = 50;

/// Hard cap on loop walks, as a multiple of the tile count.
pub const WALK_CAP_FACTOR: usize = 5;
