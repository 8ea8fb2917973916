//! CLI command implementations.

use std::str::FromStr;

pub trait Command {
    fn execute(self);
}

pub mod best_move;
pub mod count_positions;
pub mod play;
pub mod watch;

// Shared utilities for commands
pub(crate) mod util;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameKind {
    Chess,
    ConnectFour,
}

// used for parsing cli args
type ParseError = &'static str;
impl FromStr for GameKind {
    type Err = ParseError;
    fn from_str(game: &str) -> Result<Self, Self::Err> {
        match game {
            "chess" => Ok(GameKind::Chess),
            "connect-four" | "connect4" => Ok(GameKind::ConnectFour),
            _ => Err("invalid game; options are: chess, connect-four"),
        }
    }
}
