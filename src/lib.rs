//! Hexloop-Rust: a hex-grid pipe puzzle engine.
//!
//! Players drop three-pipe tiles onto a staggered hex grid. When the pipes of
//! neighboring tiles chain into a closed loop, the loop is scored and, after
//! a short delay, cleared from the board.
//!
//! ## Modules
//!
//! - [`constants`] - Board dimensions, scoring parameters, timing
//! - [`hex`] - Sides, coordinates, and the offset neighbor rule
//! - [`tile`] - Connections, tile patterns, and tiles
//! - [`catalog`] - The 15 tile patterns and the seeded pending-pattern picker
//! - [`grid`] - The tile arena and neighbor lookup
//! - [`loops`] - Loop detection and placement probing
//! - [`scoring`] - Loop points, combos, and score formatting
//! - [`game`] - The board controller tying it all together
//! - [`protocol`] - Text protocol for external front ends
//!
//! ## Example
//!
//! ```
//! use hexloop_rust::game::{Game, GameConfig};
//! use hexloop_rust::hex::Coordinate;
//!
//! let mut game = Game::new(GameConfig::seeded(7));
//! let result = game.place(Coordinate::new(4, 2));
//! assert!(result.accepted);
//! assert!(!game.is_empty(Coordinate::new(4, 2)));
//!
//! // Let any pending clear run its course
//! while game.is_resolving() {
//!     game.tick();
//! }
//! println!("score: {}", game.score());
//! ```

pub mod catalog;
pub mod constants;
pub mod game;
pub mod grid;
pub mod hex;
pub mod loops;
pub mod protocol;
pub mod scoring;
pub mod tile;
