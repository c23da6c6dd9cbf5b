use std::collections::VecDeque;

use log::debug;

use super::grid::Grid;
use crate::error::{EngineError, Result};

/// How many past grids a game remembers.
pub const HISTORY_CAPACITY: usize = 3;

/// Bounded stack of grid snapshots, oldest evicted first.
///
/// Snapshots are owned copies, never views into the live grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct History {
    snapshots: VecDeque<Grid>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        History::new()
    }
}

impl History {
    pub fn new() -> Self {
        History::with_capacity(HISTORY_CAPACITY)
    }

    /// A history holding at most `capacity` snapshots (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        History { snapshots: VecDeque::with_capacity(capacity + 1), capacity }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Store a copy of `grid` as the most recent snapshot.
    pub fn save_move(&mut self, grid: &Grid) {
        self.snapshots.push_back(grid.clone());
        while self.snapshots.len() > self.capacity {
            self.snapshots.pop_front();
            debug!("history full, dropped oldest snapshot");
        }
    }

    /// Remove and return the most recent snapshot.
    pub fn undo_move(&mut self) -> Result<Grid> {
        self.snapshots.pop_back().ok_or(EngineError::EmptyHistory)
    }

    pub fn latest(&self) -> Option<&Grid> {
        self.snapshots.back()
    }

    /// True when `grid` holds the same values as the latest snapshot.
    pub fn compare(&self, grid: &Grid) -> bool {
        self.latest().is_some_and(|snapshot| snapshot.cells() == grid.cells())
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}
