//! CLI argument parsing using StructOpt.

use structopt::StructOpt;

use crate::cli::commands::{
    best_move::BestMoveArgs, count_positions::CountPositionsArgs, play::PlayArgs,
    watch::WatchArgs,
};

#[derive(StructOpt)]
#[structopt(
    name = "gamesearch",
    about = "Minimax with alpha-beta pruning for chess and connect four"
)]
pub enum GameSearch {
    #[structopt(
        name = "play",
        about = "Play a game against the computer, which searches to the depth of the chosen `--difficulty` (default: medium). Your side is chosen at random unless you specify it with `--side first|second`. The initial position can be given with `--position` (FEN for chess, a `/`-separated grid for connect four). Type `undo` to take back your last move and `quit` to leave."
    )]
    Play(PlayArgs),
    #[structopt(
        name = "watch",
        about = "Watch the computer play against itself at the given `--difficulty` (default: medium), starting from `--position` if given."
    )]
    Watch(WatchArgs),
    #[structopt(
        name = "best-move",
        about = "Print the engine's move and its score for a `--position` (default: the starting position). The depth comes from `--difficulty` unless `--depth` is given. For connect four, `--full-search` skips the immediate win/block check."
    )]
    BestMove(BestMoveArgs),
    #[structopt(
        name = "count-positions",
        about = "Count the chess positions reachable at each depth up to `--depth` (default: 4) from `--fen` (default: starting position), and report the time it took."
    )]
    CountPositions(CountPositionsArgs),
}

impl crate::cli::commands::Command for GameSearch {
    fn execute(self) {
        macro_rules! execute_command {
            ($($variant:ident($cmd:ident)),+ $(,)?) => {
                match self {
                    $(Self::$variant($cmd) => $cmd.execute(),)+
                }
            };
        }

        execute_command! {
            Play(cmd),
            Watch(cmd),
            BestMove(cmd),
            CountPositions(cmd),
        }
    }
}
