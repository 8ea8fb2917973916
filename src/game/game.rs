use std::error::Error;
use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::difficulty::Difficulty;
use crate::search::{Score, SearchContext, SearchError};

/// One of the two players. The first seat moves first and is the maximizing side
/// (white in chess, red in connect four).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Seat {
    First,
    Second,
}

impl Seat {
    pub const ALL: [Seat; 2] = [Seat::First, Seat::Second];

    pub fn opposite(&self) -> Self {
        match self {
            Seat::First => Seat::Second,
            Seat::Second => Seat::First,
        }
    }

    pub fn random() -> Self {
        let mut rng = rand::thread_rng();
        if rng.gen::<bool>() {
            Seat::First
        } else {
            Seat::Second
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seat_str = match self {
            Seat::First => "first",
            Seat::Second => "second",
        };
        write!(f, "{}", seat_str)
    }
}

// used for parsing cli args
type ParseError = &'static str;
impl FromStr for Seat {
    type Err = ParseError;
    fn from_str(seat: &str) -> Result<Self, Self::Err> {
        match seat {
            "first" => Ok(Seat::First),
            "second" => Ok(Seat::Second),
            "random" => Ok(Seat::random()),
            _ => Err("invalid side; options are: first, second, random"),
        }
    }
}

/// How a finished game ended.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Outcome {
    Win { winner: Seat, reason: String },
    Draw { reason: String },
}

impl Outcome {
    pub fn winner(&self) -> Option<Seat> {
        match self {
            Outcome::Win { winner, .. } => Some(*winner),
            Outcome::Draw { .. } => None,
        }
    }
}

/// Everything the driver needs to know about a game: how to build and read positions,
/// enumerate and apply moves, detect the end and ask the search for a move.
pub trait Game: Clone + Send + 'static {
    type Position: Clone + PartialEq + fmt::Display + fmt::Debug + Send + 'static;
    type Move: Copy + PartialEq + fmt::Display + fmt::Debug + Send + 'static;
    type Error: Error + Send + Sync + 'static;

    fn name(&self) -> &'static str;

    fn starting_position(&self) -> Self::Position;

    fn parse_position(&self, text: &str) -> Result<Self::Position, Self::Error>;

    fn side_to_move(&self, position: &Self::Position) -> Seat;

    /// Display name of a seat, e.g. "white" or "red".
    fn side_name(&self, seat: Seat) -> &'static str;

    /// Legal moves in the game's deterministic generation order.
    fn legal_moves(&self, position: &mut Self::Position) -> Vec<Self::Move>;

    /// Parses human input into a move that is legal in `position`.
    fn parse_move(
        &self,
        position: &mut Self::Position,
        input: &str,
    ) -> Result<Self::Move, Self::Error>;

    fn apply_move(
        &self,
        position: &mut Self::Position,
        game_move: Self::Move,
    ) -> Result<(), Self::Error>;

    fn undo_move(
        &self,
        position: &mut Self::Position,
        game_move: Self::Move,
    ) -> Result<(), Self::Error>;

    fn outcome(&self, position: &mut Self::Position) -> Option<Outcome>;

    /// Search depth in plies for a difficulty tier; strictly increasing with the tier.
    fn search_depth(&self, difficulty: Difficulty) -> u8;

    fn search(
        &self,
        context: &mut SearchContext,
        position: &mut Self::Position,
    ) -> Result<Option<Self::Move>, SearchError>;

    fn evaluate(&self, position: &Self::Position) -> Score;

    /// Describes an outcome with the game's side names.
    fn describe_outcome(&self, outcome: &Outcome) -> String {
        match outcome {
            Outcome::Win { winner, reason } => {
                format!("{} wins by {}", self.side_name(*winner), reason)
            }
            Outcome::Draw { reason } => format!("draw: {}", reason),
        }
    }
}
