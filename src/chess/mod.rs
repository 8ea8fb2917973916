//! Standard chess on a mailbox board: full move legality, FEN, material evaluation and
//! the draw rules.

mod board;
mod castle_rights;
mod chess_move;
mod color;
mod display;
mod error;
mod evaluate;
mod fen;
mod move_generator;
mod piece;
mod search;
mod state_stack;

pub mod square;


pub use board::{Board, PositionState};
pub use castle_rights::CastleRights;
pub use chess_move::{parse_coordinate_notation, ChessMove};
pub use color::Color;
pub use error::BoardError;
pub use evaluate::{
    game_ending, has_insufficient_material, material_score, terminal_score, DrawReason,
    GameEnding,
};
pub use fen::STARTING_POSITION_FEN;
pub use move_generator::{
    has_legal_move, is_in_check, is_square_attacked, perft, try_generate_moves, ChessMoveList,
};
pub use piece::{Piece, PieceKind};
pub use search::{search_best_move, ChessEvaluator, ChessMoveGenerator};
pub use square::Square;

use crate::search::{Score, SearchContext, SearchError};

/// Legal moves for the side to move, in generation order.
pub fn legal_moves(board: &mut Board) -> Vec<ChessMove> {
    move_generator::generate_moves(board).into_vec()
}

pub fn apply_move(board: &mut Board, chess_move: ChessMove) -> Result<(), BoardError> {
    chess_move.apply(board)
}

pub fn undo_move(board: &mut Board, chess_move: ChessMove) -> Result<(), BoardError> {
    chess_move.undo(board)
}

/// Static material score from white's perspective.
pub fn evaluate(board: &Board) -> Score {
    material_score(board)
}

pub fn best_move(board: &mut Board, depth: u8) -> Result<Option<ChessMove>, SearchError> {
    let mut context = SearchContext::new(depth);
    search_best_move(&mut context, board)
}

/// Resolves coordinate notation against the legal moves of the position. A pawn move to
/// the last rank without a suffix promotes to a queen.
pub fn parse_move(board: &mut Board, notation: &str) -> Result<ChessMove, BoardError> {
    let (from, to, promotion) = parse_coordinate_notation(notation)?;
    let candidates: Vec<ChessMove> = legal_moves(board)
        .into_iter()
        .filter(|chess_move| chess_move.from_square() == from && chess_move.to_square() == to)
        .collect();

    let promotion = match promotion {
        None if candidates.iter().any(|m| m.promotion().is_some()) => Some(PieceKind::Queen),
        promotion => promotion,
    };

    candidates
        .into_iter()
        .find(|chess_move| chess_move.promotion() == promotion)
        .ok_or_else(|| BoardError::IllegalMove {
            notation: notation.trim().to_string(),
        })
}
