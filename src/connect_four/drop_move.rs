use std::fmt;
use std::str::FromStr;

use super::board::{Board, COLS};
use super::error::BoardError;

/// Drops the side-to-move's disc into a column (0-based internally, shown 1-based).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct DropMove {
    column: usize,
}

impl DropMove {
    pub fn new(column: usize) -> Self {
        Self { column }
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn apply(&self, board: &mut Board) -> Result<(), BoardError> {
        let disc = board.turn();
        board.drop_disc(self.column(), disc)?;
        board.toggle_turn();
        Ok(())
    }

    /// Lifts the disc this move dropped. The top disc of the column must belong to the
    /// side that moved last; otherwise the board is left untouched.
    pub fn undo(&self, board: &mut Board) -> Result<(), BoardError> {
        let expected = board.turn().opposite();
        let found = board.lift_disc(self.column())?;
        if found != expected {
            board.drop_disc(self.column(), found)?;
            return Err(BoardError::UnexpectedDisc {
                column: self.column(),
                expected,
                found,
            });
        }
        board.toggle_turn();
        Ok(())
    }
}

impl fmt::Display for DropMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column() + 1)
    }
}

impl FromStr for DropMove {
    type Err = BoardError;

    /// Parses a 1-based column number.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let column: usize = input.trim().parse().map_err(|_| BoardError::MalformedGrid {
            reason: format!("`{}` is not a column number", input.trim()),
        })?;
        if column == 0 || column > COLS {
            return Err(BoardError::ColumnOutOfRange { column });
        }
        Ok(DropMove::new(column - 1))
    }
}
