//! Connect-four implementation of the alpha-beta search traits, plus the
//! immediate-win / immediate-block shortcut that runs before the tree search.

use log::debug;

use crate::search::{
    alpha_beta_search, win_for, Evaluator, GameMove, GameState, MoveGenerator, Score,
    SearchContext, SearchError,
};

use super::board::{Board, COLS};
use super::disc::Disc;
use super::drop_move::DropMove;
use super::error::BoardError;
use super::evaluate;

/// How the engine picks a column.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Strategy {
    /// Win at once if possible, else block the opponent's immediate win, else search.
    WinPriority,
    /// Always run the full depth-limited search.
    FullSearch,
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::WinPriority
    }
}

impl GameState for Board {
    #[inline]
    fn is_maximizing_player(&self) -> bool {
        self.turn().maximize_score()
    }
}

impl GameMove for DropMove {
    type State = Board;
    type Error = BoardError;

    #[inline]
    fn apply(&self, state: &mut Board) -> Result<(), BoardError> {
        DropMove::apply(self, state)
    }

    #[inline]
    fn undo(&self, state: &mut Board) -> Result<(), BoardError> {
        DropMove::undo(self, state)
    }
}

/// Generates one drop per open column, left to right. A decided grid has no moves.
#[derive(Clone, Default, Debug)]
pub struct ConnectFourMoveGenerator;

impl MoveGenerator<Board> for ConnectFourMoveGenerator {
    type Move = DropMove;
    type MoveList = Vec<DropMove>;

    fn generate_moves(&self, state: &mut Board) -> Vec<DropMove> {
        if state.winner().is_some() {
            return vec![];
        }
        (0..COLS)
            .filter(|&col| state.is_column_open(col))
            .map(DropMove::new)
            .collect()
    }
}

#[derive(Clone, Default, Debug)]
pub struct ConnectFourEvaluator;

impl Evaluator<Board> for ConnectFourEvaluator {
    #[inline]
    fn terminal_score(&self, state: &mut Board, ply: u8) -> Option<Score> {
        evaluate::terminal_score(state, ply)
    }

    #[inline]
    fn evaluate(&self, state: &mut Board) -> Score {
        evaluate::score(state)
    }
}

/// Returns the leftmost column where dropping a `disc` would connect four for it.
/// The board is left unchanged.
pub fn winning_column(board: &mut Board, disc: Disc) -> Result<Option<usize>, BoardError> {
    for col in 0..COLS {
        if !board.is_column_open(col) {
            continue;
        }
        let row = board.drop_disc(col, disc)?;
        let wins = board.connects_four(row, col);
        board.lift_disc(col)?;
        if wins {
            return Ok(Some(col));
        }
    }
    Ok(None)
}

/// Searches for the best column from the given grid.
///
/// Returns `Ok(None)` when the game is already decided or the grid is full.
#[must_use = "search returns the best move found"]
pub fn search_best_move(
    context: &mut SearchContext,
    board: &mut Board,
    strategy: Strategy,
) -> Result<Option<DropMove>, SearchError> {
    if context.search_depth() < 1 {
        return Err(SearchError::DepthTooLow);
    }

    let move_generator = ConnectFourMoveGenerator::default();
    let evaluator = ConnectFourEvaluator::default();

    if strategy == Strategy::WinPriority && !move_generator.generate_moves(board).is_empty() {
        let mover = board.turn();

        if let Some(col) = winning_column(board, mover).map_err(shortcut_error)? {
            debug!("{} wins immediately in column {}", mover, col + 1);
            context.record_shortcut(Some(win_for(mover.maximize_score(), 1)));
            return Ok(Some(DropMove::new(col)));
        }

        if let Some(col) = winning_column(board, mover.opposite()).map_err(shortcut_error)? {
            debug!("{} blocks column {}", mover, col + 1);
            context.record_shortcut(None);
            return Ok(Some(DropMove::new(col)));
        }
    }

    alpha_beta_search(context, board, &move_generator, &evaluator)
}

fn shortcut_error(error: BoardError) -> SearchError {
    SearchError::MoveApplication {
        message: error.to_string(),
    }
}
