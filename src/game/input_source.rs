use std::io::{self, BufRead, BufReader, Stdin};
use std::str::FromStr;

use thiserror::Error;

use super::game::Seat;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("io error: {error:?}")]
    IOError { error: String },
    #[error("invalid input: {input:?}")]
    InvalidInput { input: String },
    #[error("user exited")]
    UserExit,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum MoveInput {
    Move { notation: String },
    Undo,
    UseEngine,
}

impl FromStr for MoveInput {
    type Err = InputError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        match trimmed.to_lowercase().as_str() {
            "" => Err(InputError::InvalidInput {
                input: input.to_string(),
            }),
            "q" | "quit" | "exit" => Err(InputError::UserExit),
            "undo" => Ok(MoveInput::Undo),
            _ => Ok(MoveInput::Move {
                notation: trimmed.to_string(),
            }),
        }
    }
}

pub trait InputSource {
    fn get_move(&mut self, side: Seat) -> Result<Option<MoveInput>, InputError>;

    /// Whether a person answers for `side`; decides if the renderer prompts.
    fn is_human(&self, side: Seat) -> bool;
}

/// Reads one move per line. End of input counts as leaving the game.
pub struct HumanInput<R: BufRead> {
    reader: R,
}

impl HumanInput<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(io::stdin()))
    }
}

impl<R: BufRead> HumanInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    fn read_move(&mut self) -> Result<Option<MoveInput>, InputError> {
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .map_err(|error| InputError::IOError {
                error: error.to_string(),
            })?;
        if read == 0 {
            return Err(InputError::UserExit);
        }

        match line.parse::<MoveInput>() {
            Ok(move_input) => Ok(Some(move_input)),
            Err(InputError::UserExit) => Err(InputError::UserExit),
            Err(_) => Ok(None), // Other errors treated as invalid input
        }
    }
}

impl<R: BufRead> InputSource for HumanInput<R> {
    fn get_move(&mut self, _side: Seat) -> Result<Option<MoveInput>, InputError> {
        self.read_move()
    }

    fn is_human(&self, _side: Seat) -> bool {
        true
    }
}

pub struct EngineInput;

impl InputSource for EngineInput {
    fn get_move(&mut self, _side: Seat) -> Result<Option<MoveInput>, InputError> {
        Ok(Some(MoveInput::UseEngine))
    }

    fn is_human(&self, _side: Seat) -> bool {
        false
    }
}

/// A person plays `human_seat`, the engine plays the other side.
pub struct ConditionalInput<R: BufRead> {
    pub human_seat: Seat,
    human: HumanInput<R>,
}

impl<R: BufRead> ConditionalInput<R> {
    pub fn new(human_seat: Seat, reader: R) -> Self {
        Self {
            human_seat,
            human: HumanInput::new(reader),
        }
    }
}

impl<R: BufRead> InputSource for ConditionalInput<R> {
    fn get_move(&mut self, side: Seat) -> Result<Option<MoveInput>, InputError> {
        if side == self.human_seat {
            self.human.read_move()
        } else {
            Ok(Some(MoveInput::UseEngine))
        }
    }

    fn is_human(&self, side: Seat) -> bool {
        side == self.human_seat
    }
}
