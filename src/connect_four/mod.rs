//! Connect four on the standard 6×7 grid. Red (`X`) moves first and is the maximizing side.

mod board;
mod disc;
mod drop_move;
mod error;
mod evaluate;
mod search;


pub use board::{Board, Window, COLS, ROWS, WINDOWS};
pub use disc::Disc;
pub use drop_move::DropMove;
pub use error::BoardError;
pub use evaluate::terminal_score;
pub use search::{
    search_best_move, winning_column, ConnectFourEvaluator, ConnectFourMoveGenerator, Strategy,
};

use crate::search::{MoveGenerator, Score, SearchContext, SearchError};

/// Legal drops for the side to move, leftmost column first.
pub fn legal_moves(board: &mut Board) -> Vec<DropMove> {
    ConnectFourMoveGenerator.generate_moves(board)
}

pub fn apply_move(board: &mut Board, drop: DropMove) -> Result<(), BoardError> {
    drop.apply(board)
}

pub fn undo_move(board: &mut Board, drop: DropMove) -> Result<(), BoardError> {
    drop.undo(board)
}

/// Static score from red's perspective.
pub fn evaluate(board: &Board) -> Score {
    evaluate::score(board)
}

/// Best column for the side to move using the default win-priority strategy.
pub fn best_move(board: &mut Board, depth: u8) -> Result<Option<DropMove>, SearchError> {
    let mut context = SearchContext::new(depth);
    search_best_move(&mut context, board, Strategy::default())
}
