use crate::chess::{
    self, game_ending, Board, BoardError, ChessMove, Color, DrawReason, GameEnding,
};
use crate::difficulty::Difficulty;
use crate::search::{Score, SearchContext, SearchError};

use super::game::{Game, Outcome, Seat};

/// Chess with positions in FEN and moves in coordinate notation.
#[derive(Clone, Copy, Default, Debug)]
pub struct ChessGame;

impl ChessGame {
    fn seat(color: Color) -> Seat {
        match color {
            Color::White => Seat::First,
            Color::Black => Seat::Second,
        }
    }
}

impl Game for ChessGame {
    type Position = Board;
    type Move = ChessMove;
    type Error = BoardError;

    fn name(&self) -> &'static str {
        "chess"
    }

    fn starting_position(&self) -> Board {
        Board::starting_position()
    }

    fn parse_position(&self, text: &str) -> Result<Board, BoardError> {
        Board::from_fen(text)
    }

    fn side_to_move(&self, position: &Board) -> Seat {
        Self::seat(position.turn())
    }

    fn side_name(&self, seat: Seat) -> &'static str {
        match seat {
            Seat::First => "white",
            Seat::Second => "black",
        }
    }

    fn legal_moves(&self, position: &mut Board) -> Vec<ChessMove> {
        chess::legal_moves(position)
    }

    fn parse_move(&self, position: &mut Board, input: &str) -> Result<ChessMove, BoardError> {
        chess::parse_move(position, input)
    }

    fn apply_move(&self, position: &mut Board, game_move: ChessMove) -> Result<(), BoardError> {
        chess::apply_move(position, game_move)
    }

    fn undo_move(&self, position: &mut Board, game_move: ChessMove) -> Result<(), BoardError> {
        chess::undo_move(position, game_move)
    }

    fn outcome(&self, position: &mut Board) -> Option<Outcome> {
        let reason = |text: &str| text.to_string();
        let outcome = match game_ending(position)? {
            GameEnding::Checkmate => Outcome::Win {
                winner: Self::seat(position.turn().opposite()),
                reason: reason("checkmate"),
            },
            GameEnding::Stalemate => Outcome::Draw {
                reason: reason("stalemate"),
            },
            GameEnding::Draw(DrawReason::FiftyMoveRule) => Outcome::Draw {
                reason: reason("fifty-move rule"),
            },
            GameEnding::Draw(DrawReason::ThreefoldRepetition) => Outcome::Draw {
                reason: reason("threefold repetition"),
            },
            GameEnding::Draw(DrawReason::InsufficientMaterial) => Outcome::Draw {
                reason: reason("insufficient material"),
            },
        };
        Some(outcome)
    }

    fn search_depth(&self, difficulty: Difficulty) -> u8 {
        match difficulty {
            Difficulty::Easy => 2,
            Difficulty::Medium => 3,
            Difficulty::Hard => 4,
            Difficulty::Grandmaster => 5,
        }
    }

    fn search(
        &self,
        context: &mut SearchContext,
        position: &mut Board,
    ) -> Result<Option<ChessMove>, SearchError> {
        chess::search_best_move(context, position)
    }

    fn evaluate(&self, position: &Board) -> Score {
        chess::evaluate(position)
    }
}
