//! Chess-specific implementation of the alpha-beta search traits.

use crate::search::{
    alpha_beta_search, Evaluator, GameMove, GameState, MoveCollection, MoveGenerator, Score,
    SearchContext, SearchError,
};

use super::board::Board;
use super::chess_move::ChessMove;
use super::error::BoardError;
use super::evaluate;
use super::move_generator::{self, ChessMoveList};

impl GameState for Board {
    #[inline]
    fn is_maximizing_player(&self) -> bool {
        self.turn().maximize_score()
    }
}

impl GameMove for ChessMove {
    type State = Board;
    type Error = BoardError;

    #[inline]
    fn apply(&self, state: &mut Board) -> Result<(), BoardError> {
        ChessMove::apply(self, state)
    }

    #[inline]
    fn undo(&self, state: &mut Board) -> Result<(), BoardError> {
        ChessMove::undo(self, state)
    }
}

impl MoveCollection<ChessMove> for ChessMoveList {}

#[derive(Clone, Default, Debug)]
pub struct ChessMoveGenerator;

impl MoveGenerator<Board> for ChessMoveGenerator {
    type Move = ChessMove;
    type MoveList = ChessMoveList;

    #[inline]
    fn generate_moves(&self, state: &mut Board) -> ChessMoveList {
        move_generator::generate_moves(state)
    }
}

/// Material-only evaluation, with checkmate, stalemate and the draw rules scored as
/// decided positions.
#[derive(Clone, Default, Debug)]
pub struct ChessEvaluator;

impl Evaluator<Board> for ChessEvaluator {
    #[inline]
    fn terminal_score(&self, state: &mut Board, ply: u8) -> Option<Score> {
        evaluate::terminal_score(state, ply)
    }

    #[inline]
    fn evaluate(&self, state: &mut Board) -> Score {
        evaluate::material_score(state)
    }
}

#[must_use = "search returns the best move found"]
pub fn search_best_move(
    context: &mut SearchContext,
    board: &mut Board,
) -> Result<Option<ChessMove>, SearchError> {
    alpha_beta_search(context, board, &ChessMoveGenerator, &ChessEvaluator)
}
