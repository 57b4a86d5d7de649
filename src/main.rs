use clap::{Parser, Subcommand};
#[cfg(feature = "perft")]
use gambit::game::perft::PerftConfig;
use gambit::{
    game::{
        playout::{random_game, unwind},
        position::Position,
    },
    protocols::coordinate,
};
use rand::{rngs::SmallRng, SeedableRng};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Arguments {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plays a game through coordinate notation on standard I/O (DEFAULT)
    Play,
    /// Runs perft (generating all moves up to a certain depth)
    Perft {
        /// Maximum depth to reach
        depth: u8,
        /// Starting position as a FEN string.
        #[arg(short, long)]
        position: Option<String>,
        /// Shows move count for each move from the starting position
        #[arg(short)]
        divide: bool,
        /// Generates moves for each depth up to the maximum
        #[arg(short)]
        iterative: bool,
        /// Show timing information
        #[arg(long)]
        bench: bool,
        /// Counts legal moves at horizon nodes instead of playing each of them
        #[arg(short)]
        bulk: bool,

        /// Does not show the board and other decorations
        #[arg(long)]
        no_board: bool,
    },
    /// Plays random games, then takes every move back and checks that the
    /// initial position is restored
    Random {
        /// Number of games to play
        games: usize,
        /// Seed of the random generator, picked from the OS if absent
        #[arg(long)]
        seed: Option<u64>,
        /// Stops a game after this many plies
        #[arg(long, default_value_t = 400)]
        max_plies: usize,
    },
}

pub fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Arguments::parse();
    env_logger::init();

    match args.command.unwrap_or(Command::Play) {
        Command::Play => coordinate::client()?,
        #[cfg(feature = "perft")]
        Command::Perft {
            position,
            depth,
            divide,
            iterative,
            bench,
            bulk,
            no_board,
        } => {
            let mut position = if let Some(fen) = position {
                Position::from_fen(&fen.parse()?)
            } else {
                Position::initial()
            };

            PerftConfig::default()
                .with_depth(depth)
                .divide_moves(divide)
                .iterative_deepening(iterative)
                .benchmark(bench)
                .bulk_counting(bulk)
                .show_board(!no_board)
                .go(&mut position)
        }
        #[cfg(not(feature = "perft"))]
        Command::Perft { .. } => {
            eprintln!("Gambit has not been compiled with feature `perft`");
        }
        Command::Random {
            games,
            seed,
            max_plies,
        } => {
            let mut rng = match seed {
                Some(seed) => SmallRng::seed_from_u64(seed),
                None => SmallRng::from_entropy(),
            };
            let initial = Position::initial();
            for game in 1..=games {
                let mut position = initial.clone();
                let status = random_game(&mut position, &mut rng, max_plies);
                println!(
                    "game {game}: {status} after {} plies, {}",
                    position.history().len(),
                    position.fen()
                );

                unwind(&mut position);
                if position != initial {
                    log::error!("Game {game} did not unwind to the initial position");
                    return Err(format!("game {game} did not unwind correctly").into());
                }
            }
        }
    }

    Ok(())
}
