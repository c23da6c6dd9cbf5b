use log::trace;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::slot::Slot;
use crate::error::{EngineError, Result};

/// Number of tiles spawned into a freshly started grid.
pub const INITIAL_TILES: usize = 2;

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Map the classic `w`/`a`/`s`/`d` keys to a direction.
    pub fn from_key(key: char) -> Option<Move> {
        match key.to_ascii_lowercase() {
            'w' => Some(Move::Up),
            'a' => Some(Move::Left),
            's' => Some(Move::Down),
            'd' => Some(Move::Right),
            _ => None,
        }
    }
}

/// A square matrix of [`Slot`]s, row 0 at the top and column 0 at the left.
///
/// The size is fixed at construction. Cloning produces a fully independent
/// copy, which is what [`History`](super::History) stores.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u32>>", into = "Vec<Vec<u32>>")]
pub struct Grid {
    size: usize,
    cells: Vec<Vec<Slot>>,
}

impl Grid {
    /// Start a new game: an empty `size`x`size` grid with two random tiles.
    ///
    /// ```
    /// use grid_2048::engine::Grid;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let grid = Grid::new(4, &mut rng).unwrap();
    /// assert_eq!(grid.count_empty(), 14);
    /// ```
    pub fn new<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Result<Self> {
        let mut grid = Grid::empty(size)?;
        // A 1x1 grid only has room for one.
        for _ in 0..INITIAL_TILES.min(size * size) {
            grid.spawn_random(rng)?;
        }
        Ok(grid)
    }

    /// An empty grid with no tiles.
    pub fn empty(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(EngineError::InvalidSize);
        }
        Ok(Grid { size, cells: vec![vec![Slot::EMPTY; size]; size] })
    }

    /// Restore a grid from a snapshot matrix. No tiles are spawned.
    pub fn from_cells(cells: Vec<Vec<Slot>>) -> Result<Self> {
        let size = cells.len();
        if size == 0 {
            return Err(EngineError::InvalidSize);
        }
        if let Some((row, line)) = cells.iter().enumerate().find(|(_, line)| line.len() != size) {
            return Err(EngineError::ShapeMismatch { size, row, len: line.len() });
        }
        Ok(Grid { size, cells })
    }

    /// Restore a grid from plain values where `0` marks an empty slot.
    ///
    /// ```
    /// use grid_2048::engine::Grid;
    /// let mut grid = Grid::from_values(vec![vec![2, 2], vec![0, 4]]).unwrap();
    /// grid.move_left();
    /// assert_eq!(grid.to_values(), vec![vec![4, 0], vec![4, 0]]);
    /// ```
    pub fn from_values(values: Vec<Vec<u32>>) -> Result<Self> {
        let cells = values
            .into_iter()
            .map(|line| line.into_iter().map(Slot::from_raw).collect::<Result<Vec<_>>>())
            .collect::<Result<Vec<_>>>()?;
        Grid::from_cells(cells)
    }

    /// Plain values, `0` for empty slots.
    pub fn to_values(&self) -> Vec<Vec<u32>> {
        self.cells.iter().map(|line| line.iter().map(|s| s.raw()).collect()).collect()
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn cells(&self) -> &[Vec<Slot>] {
        &self.cells
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Slot> {
        self.cells.get(row).and_then(|line| line.get(col)).copied()
    }

    /// Put one random tile into an empty slot.
    ///
    /// A row is picked uniformly among rows with room, then a slot uniformly
    /// among that row's empty slots. Returns the `(row, col)` that was filled.
    pub fn spawn_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(usize, usize)> {
        let rows: Vec<usize> = self
            .cells
            .iter()
            .enumerate()
            .filter(|(_, line)| line.iter().any(|s| s.is_empty()))
            .map(|(idx, _)| idx)
            .collect();
        if rows.is_empty() {
            return Err(EngineError::FullGrid);
        }
        let row = rows[rng.gen_range(0..rows.len())];
        let free: Vec<usize> = self.cells[row]
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_empty())
            .map(|(idx, _)| idx)
            .collect();
        let col = free[rng.gen_range(0..free.len())];
        let slot = &mut self.cells[row][col];
        slot.spawn(rng);
        trace!("spawned {} at ({row}, {col})", slot.raw());
        Ok((row, col))
    }

    /// Slide then merge every line toward the side named by `dir`. No randomness.
    pub fn shift(&mut self, dir: Move) {
        for line in 0..self.size {
            let mut tiles: Vec<Slot> =
                (0..self.size).map(|step| self.cell_from_side(dir, line, step)).collect();
            shift_line(&mut tiles);
            for (step, slot) in tiles.into_iter().enumerate() {
                let (row, col) = self.index_from_side(dir, line, step);
                self.cells[row][col] = slot;
            }
        }
    }

    pub fn move_left(&mut self) {
        self.shift(Move::Left)
    }

    pub fn move_right(&mut self) {
        self.shift(Move::Right)
    }

    pub fn move_up(&mut self) {
        self.shift(Move::Up)
    }

    pub fn move_down(&mut self) {
        self.shift(Move::Down)
    }

    /// Count the number of empty slots.
    pub fn count_empty(&self) -> usize {
        self.cells.iter().flatten().filter(|s| s.is_empty()).count()
    }

    /// True when no slot is empty. Callers must check this before
    /// [`Grid::spawn_random`]; it says nothing about remaining merges.
    pub fn is_full(&self) -> bool {
        self.count_empty() == 0
    }

    /// Highest tile value on the grid, if any tile is present.
    pub fn highest_tile(&self) -> Option<u32> {
        self.cells.iter().flatten().filter_map(|s| s.value()).max()
    }

    /// Sum of all tile values.
    pub fn total(&self) -> u64 {
        self.cells.iter().flatten().map(|s| u64::from(s.raw())).sum()
    }

    /// `(row, col)` of the `step`-th slot of `line`, counting from the leading edge of `dir`.
    fn index_from_side(&self, dir: Move, line: usize, step: usize) -> (usize, usize) {
        let last = self.size - 1;
        match dir {
            Move::Left => (line, step),
            Move::Right => (line, last - step),
            Move::Up => (step, line),
            Move::Down => (last - step, line),
        }
    }

    fn cell_from_side(&self, dir: Move, line: usize, step: usize) -> Slot {
        let (row, col) = self.index_from_side(dir, line, step);
        self.cells[row][col]
    }
}

impl TryFrom<Vec<Vec<u32>>> for Grid {
    type Error = EngineError;

    fn try_from(values: Vec<Vec<u32>>) -> Result<Self> {
        Grid::from_values(values)
    }
}

impl From<Grid> for Vec<Vec<u32>> {
    fn from(grid: Grid) -> Self {
        grid.to_values()
    }
}

/// Pack tiles against index 0, keeping their order. Each tile moves at most once.
fn slide_line(line: &mut [Slot]) {
    let mut frontier = 0;
    for idx in 0..line.len() {
        if line[idx].is_empty() {
            continue;
        }
        if frontier < idx {
            let (head, tail) = line.split_at_mut(idx);
            tail[0].move_into(&mut head[frontier]);
        }
        frontier += 1;
    }
}

/// Merge adjacent equal pairs of a packed line, leading pair first.
///
/// The trailing partner of a merge is skipped, so no tile merges twice.
/// Returns which slots now hold a merged tile.
fn merge_line(line: &mut [Slot]) -> Vec<bool> {
    let mut merged = vec![false; line.len()];
    let mut idx = 1;
    while idx < line.len() {
        let (head, tail) = line.split_at_mut(idx);
        let lead = &mut head[idx - 1];
        if !lead.is_empty() && tail[0].merge_into(lead) {
            merged[idx - 1] = true;
            idx += 2;
        } else {
            idx += 1;
        }
    }
    merged
}

/// Slide, merge, then close the gaps left by merges.
///
/// Returns, for each tile of the final line, whether it came from a merge.
fn shift_line(line: &mut [Slot]) -> Vec<bool> {
    slide_line(line);
    let merged = merge_line(line);
    let flags = line
        .iter()
        .zip(merged)
        .filter(|(slot, _)| !slot.is_empty())
        .map(|(_, m)| m)
        .collect();
    slide_line(line);
    flags
}
