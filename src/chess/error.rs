use thiserror::Error;

use super::piece::{Piece, PieceKind};
use super::square::Square;

#[derive(Error, Debug, PartialEq)]
pub enum BoardError {
    #[error("cannot put a piece on {square}, it is already occupied")]
    SquareOccupied { square: Square },
    #[error("cannot apply move, expected {expected} on {square} but found {found:?}")]
    UnexpectedPiece {
        square: Square,
        expected: Piece,
        found: Option<Piece>,
    },
    #[error("cannot apply move, expected {expected:?} to be captured on {square} but found {found:?}")]
    UnexpectedCapture {
        square: Square,
        expected: Option<PieceKind>,
        found: Option<Piece>,
    },
    #[error("cannot castle from {square}, the king and rook are not in place")]
    InvalidCastle { square: Square },
    #[error("cannot promote to a {kind}")]
    InvalidPromotion { kind: PieceKind },
    #[error("there is no move to undo")]
    NothingToUndo,
    #[error("`{notation}` is not a square")]
    InvalidSquare { notation: String },
    #[error("`{notation}` is not a move in coordinate notation (e.g. e2e4, e7e8q)")]
    InvalidNotation { notation: String },
    #[error("{notation} is not a legal move in this position")]
    IllegalMove { notation: String },
    #[error("invalid FEN `{fen}`: {reason}")]
    InvalidFen { fen: String, reason: String },
    #[error("invalid position: {reason}")]
    InvalidPosition { reason: String },
}
