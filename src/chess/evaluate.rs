use std::fmt;

use crate::search::{win_for, Score};

use super::board::Board;
use super::move_generator::{has_legal_move, is_in_check};
use super::piece::PieceKind;

/// Halfmove clock value at which the fifty-move rule ends the game.
pub const FIFTY_MOVE_HALFMOVES: u16 = 100;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DrawReason {
    FiftyMoveRule,
    ThreefoldRepetition,
    InsufficientMaterial,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameEnding {
    Checkmate,
    Stalemate,
    Draw(DrawReason),
}

impl fmt::Display for GameEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            GameEnding::Checkmate => "checkmate",
            GameEnding::Stalemate => "stalemate",
            GameEnding::Draw(DrawReason::FiftyMoveRule) => "draw by the fifty-move rule",
            GameEnding::Draw(DrawReason::ThreefoldRepetition) => "draw by threefold repetition",
            GameEnding::Draw(DrawReason::InsufficientMaterial) => "draw by insufficient material",
        };
        write!(f, "{}", description)
    }
}

/// Returns how the game has ended for the side to move, or `None` if it continues.
/// Checkmate and stalemate take precedence over the draw rules.
pub fn game_ending(board: &mut Board) -> Option<GameEnding> {
    if !has_legal_move(board) {
        if is_in_check(board, board.turn()) {
            return Some(GameEnding::Checkmate);
        }
        return Some(GameEnding::Stalemate);
    }

    if board.halfmove_clock() >= FIFTY_MOVE_HALFMOVES {
        return Some(GameEnding::Draw(DrawReason::FiftyMoveRule));
    }

    if board.repetition_count() >= 3 {
        return Some(GameEnding::Draw(DrawReason::ThreefoldRepetition));
    }

    if has_insufficient_material(board) {
        return Some(GameEnding::Draw(DrawReason::InsufficientMaterial));
    }

    None
}

/// Bare kings, or a king and a single knight or bishop against a bare king.
pub fn has_insufficient_material(board: &Board) -> bool {
    let mut minors = 0;
    for (_, piece) in board.pieces() {
        match piece.kind {
            PieceKind::King => {}
            PieceKind::Knight | PieceKind::Bishop => minors += 1,
            _ => return false,
        }
    }
    minors <= 1
}

/// Score of a finished game: the mated side loses, every other ending is a draw.
pub fn terminal_score(board: &mut Board, ply: u8) -> Option<Score> {
    match game_ending(board)? {
        GameEnding::Checkmate => Some(win_for(!board.turn().maximize_score(), ply)),
        GameEnding::Stalemate | GameEnding::Draw(_) => Some(0),
    }
}

/// Signed material balance, positive when white is ahead.
pub fn material_score(board: &Board) -> Score {
    board.pieces().map(|(_, piece)| piece.signed_value()).sum()
}
