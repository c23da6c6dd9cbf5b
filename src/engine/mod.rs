//! Grid engine: slots, directional moves, random spawns and undo history.

mod grid;
mod history;
mod render;
mod slot;

pub use grid::{Grid, Move, INITIAL_TILES};
pub use history::{History, HISTORY_CAPACITY};
pub use slot::Slot;
