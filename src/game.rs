//! Turn protocol tying a [`Grid`] to its [`History`].
//!
//! Every directional command snapshots the grid, applies the move, and spawns
//! a tile only when the grid actually changed. Undo swaps the working grid for
//! the latest snapshot.

use log::debug;
use rand::Rng;

use crate::engine::{Grid, History, Move};
use crate::error::Result;

/// A single player command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Move),
    Undo,
    Quit,
}

impl Command {
    /// `w`/`a`/`s`/`d` move, `u` undoes, anything else quits.
    pub fn parse(input: &str) -> Command {
        let mut chars = input.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.eq_ignore_ascii_case(&'u') => Command::Undo,
            (Some(c), None) => Move::from_key(c).map_or(Command::Quit, Command::Move),
            _ => Command::Quit,
        }
    }
}

/// What a command did to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Tiles moved and a new tile was spawned.
    Moved,
    /// The move left the grid as it was; nothing spawned.
    Unchanged,
    Undone,
    NothingToUndo,
    Quit,
}

/// A running game: the working grid, its undo history and the random source.
#[derive(Debug)]
pub struct Game<R> {
    grid: Grid,
    history: History,
    rng: R,
}

impl<R: Rng> Game<R> {
    /// Start a fresh `size`x`size` game with two random tiles.
    ///
    /// ```
    /// use grid_2048::game::{Command, Game, Outcome};
    /// use grid_2048::engine::Move;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut game = Game::new(4, StdRng::seed_from_u64(42)).unwrap();
    /// let outcome = game.apply(Command::Move(Move::Left)).unwrap();
    /// assert!(matches!(outcome, Outcome::Moved | Outcome::Unchanged));
    /// assert_eq!(game.history().len(), 1);
    /// ```
    pub fn new(size: usize, mut rng: R) -> Result<Self> {
        let grid = Grid::new(size, &mut rng)?;
        Ok(Game::from_grid(grid, rng))
    }

    /// Continue from an existing grid with an empty history.
    pub fn from_grid(grid: Grid, rng: R) -> Self {
        Game { grid, history: History::new(), rng }
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn apply(&mut self, command: Command) -> Result<Outcome> {
        match command {
            Command::Move(dir) => self.play(dir),
            Command::Undo => self.undo(),
            Command::Quit => Ok(Outcome::Quit),
        }
    }

    /// Save, move, compare, then spawn if the move did anything.
    pub fn play(&mut self, dir: Move) -> Result<Outcome> {
        self.history.save_move(&self.grid);
        self.grid.shift(dir);
        if self.history.compare(&self.grid) {
            debug!("{dir:?} changed nothing, skipping spawn");
            return Ok(Outcome::Unchanged);
        }
        // A changed grid always has a free slot: sliding keeps the empty
        // count and merging frees one.
        let (row, col) = self.grid.spawn_random(&mut self.rng)?;
        debug!("{dir:?} applied, new tile at ({row}, {col})");
        Ok(Outcome::Moved)
    }

    pub fn undo(&mut self) -> Result<Outcome> {
        if self.history.is_empty() {
            debug!("undo requested with empty history");
            return Ok(Outcome::NothingToUndo);
        }
        self.grid = self.history.undo_move()?;
        debug!("undone, {} snapshot(s) left", self.history.len());
        Ok(Outcome::Undone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::{rngs::StdRng, SeedableRng};

    fn game(values: Vec<Vec<u32>>) -> Game<StepRng> {
        Game::from_grid(Grid::from_values(values).unwrap(), StepRng::new(0, 0))
    }

    #[test]
    fn it_parses_commands() {
        assert_eq!(Command::parse("w"), Command::Move(Move::Up));
        assert_eq!(Command::parse(" a\n"), Command::Move(Move::Left));
        assert_eq!(Command::parse("S"), Command::Move(Move::Down));
        assert_eq!(Command::parse("d"), Command::Move(Move::Right));
        assert_eq!(Command::parse("u"), Command::Undo);
        assert_eq!(Command::parse("q"), Command::Quit);
        assert_eq!(Command::parse(""), Command::Quit);
        assert_eq!(Command::parse("wa"), Command::Quit);
    }

    #[test]
    fn it_spawns_after_a_real_move() {
        let mut g = game(vec![vec![0, 0, 2], vec![0, 0, 0], vec![0, 0, 0]]);
        assert_eq!(g.apply(Command::Move(Move::Left)), Ok(Outcome::Moved));
        // Move put the 2 at (0, 0); the zero-draw rng fills the first free slot.
        assert_eq!(g.grid().to_values(), vec![vec![2, 2, 0], vec![0, 0, 0], vec![0, 0, 0]]);
        assert_eq!(g.history().len(), 1);
    }

    #[test]
    fn it_skips_spawn_on_noop() {
        let mut g = game(vec![vec![2, 0], vec![4, 0]]);
        let before = g.grid().clone();
        assert_eq!(g.apply(Command::Move(Move::Left)), Ok(Outcome::Unchanged));
        assert_eq!(g.grid(), &before);
        // The attempt is still recorded.
        assert_eq!(g.history().len(), 1);
    }

    #[test]
    fn it_undoes_to_pre_move_grid() {
        let mut g = Game::new(4, StdRng::seed_from_u64(5)).unwrap();
        let before = Move::ALL
            .into_iter()
            .find_map(|dir| {
                let before = g.grid().clone();
                (g.play(dir).unwrap() == Outcome::Moved).then_some(before)
            })
            .expect("a fresh grid always has a move");
        let len = g.history().len();
        assert_eq!(g.apply(Command::Undo), Ok(Outcome::Undone));
        assert_eq!(g.grid(), &before);
        assert_eq!(g.history().len(), len - 1);
    }

    #[test]
    fn it_undo_is_bounded() {
        let mut g = game(vec![vec![2, 0, 0, 0], vec![0; 4], vec![0; 4], vec![0; 4]]);
        for dir in [Move::Right, Move::Left, Move::Right, Move::Left, Move::Right] {
            g.apply(Command::Move(dir)).unwrap();
        }
        assert_eq!(g.history().len(), 3);
        for _ in 0..3 {
            assert_eq!(g.apply(Command::Undo), Ok(Outcome::Undone));
        }
        assert_eq!(g.apply(Command::Undo), Ok(Outcome::NothingToUndo));
    }

    #[test]
    fn it_quits() {
        let mut g = game(vec![vec![2]]);
        assert_eq!(g.apply(Command::Quit), Ok(Outcome::Quit));
        assert_eq!(g.grid().to_values(), vec![vec![2]]);
    }

    #[test]
    fn it_moves_keep_value_plus_spawn() {
        let mut g = Game::new(4, StdRng::seed_from_u64(77)).unwrap();
        for i in 0..100 {
            let before = g.grid().total();
            match g.play(Move::ALL[i % 4]).unwrap() {
                Outcome::Moved => {
                    let gained = g.grid().total() - before;
                    assert!(gained == 2 || gained == 4, "gained {gained}");
                }
                Outcome::Unchanged => assert_eq!(g.grid().total(), before),
                other => panic!("unexpected {other:?}"),
            }
            if g.grid().is_full() {
                break;
            }
        }
    }
}
