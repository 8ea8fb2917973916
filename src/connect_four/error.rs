use thiserror::Error;

use super::disc::Disc;

#[derive(Error, Debug, PartialEq)]
pub enum BoardError {
    #[error("column {column} is outside the board")]
    ColumnOutOfRange { column: usize },
    #[error("column {column} is full")]
    ColumnFull { column: usize },
    #[error("column {column} is empty, nothing to undo")]
    ColumnEmpty { column: usize },
    #[error("cannot undo drop in column {column}: expected a {expected} disc on top, found {found}")]
    UnexpectedDisc {
        column: usize,
        expected: Disc,
        found: Disc,
    },
    #[error("malformed grid: {reason}")]
    MalformedGrid { reason: String },
}
