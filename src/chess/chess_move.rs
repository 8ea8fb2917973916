use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use super::board::Board;
use super::castle_rights::CastleRights;
use super::color::Color;
use super::error::BoardError;
use super::piece::{Piece, PieceKind, PROMOTION_KINDS};
use super::square::{self, Square};

static COORDINATE_NOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-h][1-8])([a-h][1-8])([qrbnQRBN])?$").unwrap());

/// A move, carrying enough information to be applied and undone in place.
/// Castling is described by the king's squares; the rook follows implicitly.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChessMove {
    Standard {
        from: Square,
        to: Square,
        piece: PieceKind,
        captured: Option<PieceKind>,
    },
    EnPassant {
        from: Square,
        to: Square,
    },
    Castle {
        from: Square,
        to: Square,
    },
    Promotion {
        from: Square,
        to: Square,
        promote_to: PieceKind,
        captured: Option<PieceKind>,
    },
}

impl ChessMove {
    pub fn standard(from: Square, to: Square, piece: PieceKind, captured: Option<PieceKind>) -> Self {
        ChessMove::Standard {
            from,
            to,
            piece,
            captured,
        }
    }

    pub fn from_square(&self) -> Square {
        match *self {
            ChessMove::Standard { from, .. }
            | ChessMove::EnPassant { from, .. }
            | ChessMove::Castle { from, .. }
            | ChessMove::Promotion { from, .. } => from,
        }
    }

    pub fn to_square(&self) -> Square {
        match *self {
            ChessMove::Standard { to, .. }
            | ChessMove::EnPassant { to, .. }
            | ChessMove::Castle { to, .. }
            | ChessMove::Promotion { to, .. } => to,
        }
    }

    /// Kind of the piece that leaves the source square.
    pub fn moved_piece(&self) -> PieceKind {
        match *self {
            ChessMove::Standard { piece, .. } => piece,
            ChessMove::EnPassant { .. } | ChessMove::Promotion { .. } => PieceKind::Pawn,
            ChessMove::Castle { .. } => PieceKind::King,
        }
    }

    pub fn captured(&self) -> Option<PieceKind> {
        match *self {
            ChessMove::Standard { captured, .. } | ChessMove::Promotion { captured, .. } => {
                captured
            }
            ChessMove::EnPassant { .. } => Some(PieceKind::Pawn),
            ChessMove::Castle { .. } => None,
        }
    }

    pub fn promotion(&self) -> Option<PieceKind> {
        match *self {
            ChessMove::Promotion { promote_to, .. } => Some(promote_to),
            _ => None,
        }
    }

    #[must_use = "move application may fail"]
    pub fn apply(&self, board: &mut Board) -> Result<(), BoardError> {
        let mover = board.turn();
        let from = self.from_square();
        let to = self.to_square();
        let moving = Piece::new(self.moved_piece(), mover);

        // validate everything first so a rejected move leaves the board untouched
        expect_piece(board, from, moving)?;
        match *self {
            ChessMove::Standard { captured, .. } => expect_capture(board, to, captured, mover)?,
            ChessMove::Promotion {
                promote_to,
                captured,
                ..
            } => {
                if !PROMOTION_KINDS.contains(&promote_to) {
                    return Err(BoardError::InvalidPromotion { kind: promote_to });
                }
                expect_capture(board, to, captured, mover)?;
            }
            ChessMove::EnPassant { .. } => {
                expect_capture(board, to, None, mover)?;
                expect_capture(board, en_passant_victim(from, to), Some(PieceKind::Pawn), mover)?;
            }
            ChessMove::Castle { .. } => {
                let (rook_from, rook_to) =
                    castle_rook_squares(to).ok_or(BoardError::InvalidCastle { square: from })?;
                let rook = Piece::new(PieceKind::Rook, mover);
                if from.rank() != mover.back_rank()
                    || board.get(rook_from) != Some(rook)
                    || board.is_occupied(to)
                    || board.is_occupied(rook_to)
                {
                    return Err(BoardError::InvalidCastle { square: from });
                }
            }
        }

        let previous = *board.state();
        board.replace(from, None);
        match *self {
            ChessMove::Standard { .. } => {
                board.replace(to, Some(moving));
            }
            ChessMove::Promotion { promote_to, .. } => {
                board.replace(to, Some(Piece::new(promote_to, mover)));
            }
            ChessMove::EnPassant { .. } => {
                board.replace(en_passant_victim(from, to), None);
                board.replace(to, Some(moving));
            }
            ChessMove::Castle { .. } => {
                board.replace(to, Some(moving));
                if let Some((rook_from, rook_to)) = castle_rook_squares(to) {
                    let rook = board.replace(rook_from, None);
                    board.replace(rook_to, rook);
                }
            }
        }

        let mut castle_rights = previous
            .castle_rights
            .without(rights_lost_at(from))
            .without(rights_lost_at(to));
        if moving.kind == PieceKind::King {
            castle_rights = castle_rights.without(CastleRights::both(mover));
        }

        let is_double_push = moving.kind == PieceKind::Pawn
            && (i16::from(to.rank()) - i16::from(from.rank())).abs() == 2;
        let en_passant_target = if is_double_push {
            from.offset(0, mover.pawn_direction())
        } else {
            None
        };

        let halfmove_clock = if moving.kind == PieceKind::Pawn || self.captured().is_some() {
            0
        } else {
            previous.halfmove_clock.saturating_add(1)
        };
        let fullmove_number = match mover {
            Color::Black => previous.fullmove_number.saturating_add(1),
            Color::White => previous.fullmove_number,
        };

        board.toggle_turn();
        board.push_state(
            castle_rights,
            en_passant_target,
            halfmove_clock,
            fullmove_number,
        );
        Ok(())
    }

    #[must_use = "move undo may fail"]
    pub fn undo(&self, board: &mut Board) -> Result<(), BoardError> {
        if board.history_depth() == 0 {
            return Err(BoardError::NothingToUndo);
        }

        let mover = board.turn().opposite();
        let from = self.from_square();
        let to = self.to_square();
        let placed = match *self {
            ChessMove::Promotion { promote_to, .. } => Piece::new(promote_to, mover),
            _ => Piece::new(self.moved_piece(), mover),
        };

        expect_piece(board, to, placed)?;
        if board.is_occupied(from) {
            return Err(BoardError::SquareOccupied { square: from });
        }
        let rook_squares = match *self {
            ChessMove::Castle { .. } => {
                let (rook_from, rook_to) =
                    castle_rook_squares(to).ok_or(BoardError::InvalidCastle { square: from })?;
                if board.get(rook_to) != Some(Piece::new(PieceKind::Rook, mover)) {
                    return Err(BoardError::InvalidCastle { square: from });
                }
                Some((rook_from, rook_to))
            }
            _ => None,
        };

        board.pop_state()?;
        board.toggle_turn();

        let opponent = mover.opposite();
        board.replace(to, None);
        board.replace(from, Some(Piece::new(self.moved_piece(), mover)));
        match *self {
            ChessMove::Standard { captured, .. } | ChessMove::Promotion { captured, .. } => {
                board.replace(to, captured.map(|kind| Piece::new(kind, opponent)));
            }
            ChessMove::EnPassant { .. } => {
                board.replace(
                    en_passant_victim(from, to),
                    Some(Piece::new(PieceKind::Pawn, opponent)),
                );
            }
            ChessMove::Castle { .. } => {
                if let Some((rook_from, rook_to)) = rook_squares {
                    let rook = board.replace(rook_to, None);
                    board.replace(rook_from, rook);
                }
            }
        }

        Ok(())
    }

    /// Coordinate notation: source, destination and a promotion letter (`e2e4`, `e7e8q`,
    /// `e1g1` for white castling short).
    pub fn to_coordinate_notation(&self) -> String {
        match self.promotion() {
            Some(kind) => format!("{}{}{}", self.from_square(), self.to_square(), kind.to_char()),
            None => format!("{}{}", self.from_square(), self.to_square()),
        }
    }
}

/// Splits coordinate notation into source, destination and optional promotion piece.
pub fn parse_coordinate_notation(
    notation: &str,
) -> Result<(Square, Square, Option<PieceKind>), BoardError> {
    let trimmed = notation.trim();
    let invalid = || BoardError::InvalidNotation {
        notation: trimmed.to_string(),
    };
    let caps = COORDINATE_NOTATION.captures(trimmed).ok_or_else(invalid)?;
    let from = Square::from_algebraic(&caps[1])?;
    let to = Square::from_algebraic(&caps[2])?;
    let promotion = match caps.get(3) {
        Some(m) => Some(
            m.as_str()
                .chars()
                .next()
                .and_then(PieceKind::from_char)
                .ok_or_else(invalid)?,
        ),
        None => None,
    };
    Ok((from, to, promotion))
}

fn expect_piece(board: &Board, square: Square, expected: Piece) -> Result<(), BoardError> {
    let found = board.get(square);
    if found != Some(expected) {
        return Err(BoardError::UnexpectedPiece {
            square,
            expected,
            found,
        });
    }
    Ok(())
}

fn expect_capture(
    board: &Board,
    square: Square,
    expected: Option<PieceKind>,
    mover: Color,
) -> Result<(), BoardError> {
    let found = board.get(square);
    let matches = match (expected, found) {
        (None, None) => true,
        (Some(kind), Some(piece)) => piece.kind == kind && piece.color != mover,
        _ => false,
    };
    if !matches {
        return Err(BoardError::UnexpectedCapture {
            square,
            expected,
            found,
        });
    }
    Ok(())
}

/// The pawn taken en passant stands beside the capturing pawn, on the destination file.
fn en_passant_victim(from: Square, to: Square) -> Square {
    Square::from_file_rank(to.file(), from.rank())
}

/// Rook source and destination for a castling king landing on `king_to`.
fn castle_rook_squares(king_to: Square) -> Option<(Square, Square)> {
    match king_to {
        square::G1 => Some((square::H1, square::F1)),
        square::C1 => Some((square::A1, square::D1)),
        square::G8 => Some((square::H8, square::F8)),
        square::C8 => Some((square::A8, square::D8)),
        _ => None,
    }
}

/// Rights lost when a piece leaves or lands on a rook's home corner.
fn rights_lost_at(square: Square) -> CastleRights {
    match square {
        square::A1 => CastleRights::white_queenside(),
        square::H1 => CastleRights::white_kingside(),
        square::A8 => CastleRights::black_queenside(),
        square::H8 => CastleRights::black_kingside(),
        _ => CastleRights::none(),
    }
}

impl fmt::Display for ChessMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_coordinate_notation())
    }
}

impl fmt::Debug for ChessMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            ChessMove::Standard { .. } => "move",
            ChessMove::EnPassant { .. } => "en passant",
            ChessMove::Castle { .. } => "castle",
            ChessMove::Promotion { .. } => "promotion",
        };
        match self.captured() {
            Some(captured) => write!(f, "{} {} capturing {}", kind, self, captured),
            None => write!(f, "{} {}", kind, self),
        }
    }
}
