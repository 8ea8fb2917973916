use std::hash::{Hash, Hasher};

use rustc_hash::{FxHashMap, FxHasher};

use super::castle_rights::CastleRights;
use super::color::Color;
use super::error::BoardError;
use super::move_generator;
use super::piece::{Piece, PieceKind};
use super::square::Square;
use super::state_stack::StateStack;
use crate::chess_position;

/// Irreversible parts of a position. A copy is pushed on every move so undo can restore
/// it exactly.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PositionState {
    pub castle_rights: CastleRights,
    pub en_passant_target: Option<Square>,
    pub halfmove_clock: u16,
    pub fullmove_number: u16,
    pub position_key: u64,
}

impl Default for PositionState {
    fn default() -> Self {
        Self {
            castle_rights: CastleRights::none(),
            en_passant_target: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            position_key: 0,
        }
    }
}

/// A chess position on a 64-square mailbox. Piece placement and the side to move live on
/// the struct; castling rights, en passant target, clocks and the position key live on a
/// state stack so moves can be undone in place. Positions reached since construction are
/// counted by key for threefold repetition.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    squares: [Option<Piece>; 64],
    turn: Color,
    state: StateStack<PositionState>,
    position_counts: FxHashMap<u64, u8>,
}

impl Default for Board {
    fn default() -> Self {
        let mut board = Self {
            squares: [None; 64],
            turn: Color::White,
            state: StateStack::new(PositionState::default()),
            position_counts: FxHashMap::default(),
        };
        board.reset_position_history();
        board
    }
}

impl Board {
    /// An empty board with white to move and no castling rights.
    pub fn new() -> Self {
        Default::default()
    }

    pub fn starting_position() -> Self {
        let mut board = chess_position! {
            rnbqkbnr
            pppppppp
            ........
            ........
            ........
            ........
            PPPPPPPP
            RNBQKBNR
        };
        board.set_castle_rights(CastleRights::all());
        board.reset_position_history();
        board
    }

    pub fn get(&self, square: Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    pub fn is_occupied(&self, square: Square) -> bool {
        self.get(square).is_some()
    }

    pub fn put(&mut self, square: Square, piece: Piece) -> Result<(), BoardError> {
        if self.is_occupied(square) {
            return Err(BoardError::SquareOccupied { square });
        }
        self.squares[square.index()] = Some(piece);
        Ok(())
    }

    pub fn remove(&mut self, square: Square) -> Option<Piece> {
        self.squares[square.index()].take()
    }

    /// Overwrites a square, returning what was there.
    pub(crate) fn replace(&mut self, square: Square, piece: Option<Piece>) -> Option<Piece> {
        std::mem::replace(&mut self.squares[square.index()], piece)
    }

    /// Occupied squares with their pieces, a1 through h8.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |square| self.get(square).map(|piece| (square, piece)))
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        let king = Piece::new(PieceKind::King, color);
        self.pieces()
            .find(|(_, piece)| *piece == king)
            .map(|(square, _)| square)
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn toggle_turn(&mut self) -> Color {
        self.turn = self.turn.opposite();
        self.turn
    }

    pub fn set_turn(&mut self, turn: Color) -> Color {
        self.turn = turn;
        turn
    }

    pub fn state(&self) -> &PositionState {
        self.state.peek()
    }

    pub fn castle_rights(&self) -> CastleRights {
        self.state().castle_rights
    }

    pub fn en_passant_target(&self) -> Option<Square> {
        self.state().en_passant_target
    }

    pub fn halfmove_clock(&self) -> u16 {
        self.state().halfmove_clock
    }

    pub fn fullmove_number(&self) -> u16 {
        self.state().fullmove_number
    }

    pub fn position_key(&self) -> u64 {
        self.state().position_key
    }

    /// Number of moves that can currently be undone.
    pub fn history_depth(&self) -> usize {
        self.state.depth()
    }

    /// How many times the current position has occurred since the board was set up.
    pub fn repetition_count(&self) -> u8 {
        self.position_counts
            .get(&self.position_key())
            .copied()
            .unwrap_or(0)
    }

    // Setup helpers. These edit the current state in place and are meant to be followed
    // by `reset_position_history` once the position is complete.

    pub fn set_castle_rights(&mut self, rights: CastleRights) {
        let mut state = *self.state();
        state.castle_rights = rights;
        self.state = StateStack::new(state);
    }

    pub fn set_en_passant_target(&mut self, target: Option<Square>) {
        let mut state = *self.state();
        state.en_passant_target = target;
        self.state = StateStack::new(state);
    }

    pub fn set_clocks(&mut self, halfmove_clock: u16, fullmove_number: u16) {
        let mut state = *self.state();
        state.halfmove_clock = halfmove_clock;
        state.fullmove_number = fullmove_number;
        self.state = StateStack::new(state);
    }

    /// Forgets move history and repetition counts, treating the current placement as the
    /// first position of the game.
    pub fn reset_position_history(&mut self) {
        let mut state = *self.state();
        state.position_key = self.compute_position_key(state.castle_rights, state.en_passant_target);
        self.state = StateStack::new(state);
        self.position_counts.clear();
        self.position_counts.insert(state.position_key, 1);
    }

    /// Records the state produced by a move. Pieces and turn must already be updated.
    pub(crate) fn push_state(
        &mut self,
        castle_rights: CastleRights,
        en_passant_target: Option<Square>,
        halfmove_clock: u16,
        fullmove_number: u16,
    ) {
        let position_key = self.compute_position_key(castle_rights, en_passant_target);
        self.state.push(PositionState {
            castle_rights,
            en_passant_target,
            halfmove_clock,
            fullmove_number,
            position_key,
        });
        *self.position_counts.entry(position_key).or_insert(0) += 1;
    }

    /// Drops the state of the last move and returns it.
    pub(crate) fn pop_state(&mut self) -> Result<PositionState, BoardError> {
        if self.history_depth() == 0 {
            return Err(BoardError::NothingToUndo);
        }
        let key = self.position_key();
        if let Some(count) = self.position_counts.get_mut(&key) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.position_counts.remove(&key);
            }
        }
        self.state.pop().ok_or(BoardError::NothingToUndo)
    }

    fn compute_position_key(
        &self,
        castle_rights: CastleRights,
        en_passant_target: Option<Square>,
    ) -> u64 {
        let mut hasher = FxHasher::default();
        self.squares.hash(&mut hasher);
        self.turn.hash(&mut hasher);
        castle_rights.hash(&mut hasher);
        en_passant_target.hash(&mut hasher);
        hasher.finish()
    }

    /// Checks the placement could arise in a game: one king per side, no pawns on the
    /// back ranks, and the side that just moved is not left in check.
    pub fn validate(&self) -> Result<(), BoardError> {
        for &color in Color::ALL.iter() {
            let kings = self
                .pieces()
                .filter(|(_, piece)| *piece == Piece::new(PieceKind::King, color))
                .count();
            if kings != 1 {
                return Err(BoardError::InvalidPosition {
                    reason: format!("{} has {} kings", color, kings),
                });
            }
        }

        if let Some((square, _)) = self.pieces().find(|(square, piece)| {
            piece.kind == PieceKind::Pawn && (square.rank() == 0 || square.rank() == 7)
        }) {
            return Err(BoardError::InvalidPosition {
                reason: format!("pawn on back rank at {}", square),
            });
        }

        let waiting = self.turn.opposite();
        if move_generator::is_in_check(self, waiting) {
            return Err(BoardError::InvalidPosition {
                reason: format!("{} is in check but it is {}'s turn", waiting, self.turn),
            });
        }

        Ok(())
    }

    /// The same position with ranks mirrored and colors exchanged, so the evaluation
    /// should be exactly negated.
    pub fn color_flipped(&self) -> Self {
        let mut flipped = Board::new();
        for (square, piece) in self.pieces() {
            flipped.squares[square.flip_rank().index()] =
                Some(Piece::new(piece.kind, piece.color.opposite()));
        }
        flipped.turn = self.turn.opposite();
        flipped.set_castle_rights(self.castle_rights().color_flipped());
        flipped.set_en_passant_target(self.en_passant_target().map(Square::flip_rank));
        flipped.set_clocks(self.halfmove_clock(), self.fullmove_number());
        flipped.reset_position_history();
        flipped
    }
}
