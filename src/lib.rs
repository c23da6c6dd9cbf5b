//! grid-2048: the core mechanics of the 2048 sliding-tile puzzle
//!
//! This crate provides:
//! - `Slot` and `Grid` with the four directional moves and random tile spawning (`engine` module)
//! - A bounded undo `History` of grid snapshots (`engine` module)
//! - The per-turn protocol that ties them together (`game` module)
//!
//! Quick start:
//! ```
//! use grid_2048::engine::{Grid, History, Move};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Deterministic start with a seeded RNG
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut grid = Grid::new(4, &mut rng).unwrap();
//! let mut history = History::new();
//!
//! // Save, move, and only spawn when the move changed something
//! history.save_move(&grid);
//! grid.shift(Move::Left);
//! if !history.compare(&grid) {
//!     grid.spawn_random(&mut rng).unwrap();
//! }
//!
//! // Undo brings back the exact pre-move grid
//! let before = history.undo_move().unwrap();
//! assert_eq!(before.count_empty(), 14);
//! ```
//!
//! Randomness is always injected: every spawning operation takes `&mut impl Rng`,
//! so tests can pass a seeded or mock generator.
//!
pub mod engine;
pub mod error;
pub mod game;

pub use error::EngineError;
