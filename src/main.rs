use std::io::{self, BufRead, Write};

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use grid_2048::game::{Command, Game, Outcome};
use log::info;
use rand::{rngs::StdRng, SeedableRng};

#[derive(Debug, Parser)]
#[command(
    name = "grid-2048",
    about = "Play 2048 in the terminal: w/a/s/d move, u undoes, anything else quits"
)]
struct Args {
    /// Grid dimension
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u16).range(1..))]
    size: u16,

    /// Seed for a reproducible game
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut game = Game::new(usize::from(args.size), rng).context("failed to start game")?;
    info!("started {0}x{0} game (seed: {1:?})", args.size, args.seed);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut line = String::new();
    loop {
        println!("{}{}", game.grid(), "=".repeat(20));
        print!("Your move: ");
        io::stdout().flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        match game.apply(Command::parse(&line))? {
            Outcome::Quit => break,
            Outcome::NothingToUndo => println!("Nothing to undo."),
            Outcome::Moved | Outcome::Unchanged | Outcome::Undone => {}
        }
    }
    info!("game over, highest tile {:?}", game.grid().highest_tile());
    Ok(())
}
