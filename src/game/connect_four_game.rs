use crate::connect_four::{self, Board, BoardError, Disc, DropMove, Strategy};
use crate::difficulty::Difficulty;
use crate::search::{Score, SearchContext, SearchError};

use super::game::{Game, Outcome, Seat};

/// Connect four. Positions are grids of six rows; on a single line the rows may be
/// separated by `/`.
#[derive(Clone, Copy, Default, Debug)]
pub struct ConnectFourGame {
    pub strategy: Strategy,
}

impl ConnectFourGame {
    pub fn new(strategy: Strategy) -> Self {
        Self { strategy }
    }

    fn seat(disc: Disc) -> Seat {
        match disc {
            Disc::Red => Seat::First,
            Disc::Yellow => Seat::Second,
        }
    }
}

impl Game for ConnectFourGame {
    type Position = Board;
    type Move = DropMove;
    type Error = BoardError;

    fn name(&self) -> &'static str {
        "connect four"
    }

    fn starting_position(&self) -> Board {
        Board::new()
    }

    fn parse_position(&self, text: &str) -> Result<Board, BoardError> {
        Board::from_grid(&text.replace('/', "\n"))
    }

    fn side_to_move(&self, position: &Board) -> Seat {
        Self::seat(position.turn())
    }

    fn side_name(&self, seat: Seat) -> &'static str {
        match seat {
            Seat::First => "red",
            Seat::Second => "yellow",
        }
    }

    fn legal_moves(&self, position: &mut Board) -> Vec<DropMove> {
        connect_four::legal_moves(position)
    }

    fn parse_move(&self, position: &mut Board, input: &str) -> Result<DropMove, BoardError> {
        let drop: DropMove = input.parse()?;
        if !position.is_column_open(drop.column()) {
            return Err(BoardError::ColumnFull {
                column: drop.column() + 1,
            });
        }
        Ok(drop)
    }

    fn apply_move(&self, position: &mut Board, game_move: DropMove) -> Result<(), BoardError> {
        connect_four::apply_move(position, game_move)
    }

    fn undo_move(&self, position: &mut Board, game_move: DropMove) -> Result<(), BoardError> {
        connect_four::undo_move(position, game_move)
    }

    fn outcome(&self, position: &mut Board) -> Option<Outcome> {
        if let Some(winner) = position.winner() {
            return Some(Outcome::Win {
                winner: Self::seat(winner),
                reason: "four in a row".to_string(),
            });
        }
        if position.is_full() {
            return Some(Outcome::Draw {
                reason: "the grid is full".to_string(),
            });
        }
        None
    }

    fn search_depth(&self, difficulty: Difficulty) -> u8 {
        match difficulty {
            Difficulty::Easy => 2,
            Difficulty::Medium => 4,
            Difficulty::Hard => 6,
            Difficulty::Grandmaster => 8,
        }
    }

    fn search(
        &self,
        context: &mut SearchContext,
        position: &mut Board,
    ) -> Result<Option<DropMove>, SearchError> {
        connect_four::search_best_move(context, position, self.strategy)
    }

    fn evaluate(&self, position: &Board) -> Score {
        connect_four::evaluate(position)
    }
}
