//! Core traits for generic alpha-beta search.

use std::fmt::Debug;

/// Signed evaluation score. Positive values favor the maximizing player.
pub type Score = i32;

/// Magnitude of a decided win. A win found `ply` half-moves below the search root
/// scores `WIN_SCORE - ply`, so faster wins (and slower losses) are preferred.
pub const WIN_SCORE: Score = 1_000_000;

/// Any score at or beyond this magnitude is a decided result rather than material.
pub const DECIDED_THRESHOLD: Score = WIN_SCORE - 1_000;

/// Returns the sentinel score for a win by the given side found at `ply`.
#[inline]
pub fn win_for(maximizing_side_wins: bool, ply: u8) -> Score {
    let magnitude = WIN_SCORE - Score::from(ply);
    if maximizing_side_wins {
        magnitude
    } else {
        -magnitude
    }
}

/// Represents the state of a two-player zero-sum game.
pub trait GameState: Clone + Send + Sync {
    /// Returns true if the side to move is the maximizing player.
    fn is_maximizing_player(&self) -> bool;
}

/// Represents an action that can be applied to and undone from a game state.
///
/// `apply` also passes the turn to the opponent, and `undo` must restore the state
/// exactly as it was before `apply`.
pub trait GameMove: Clone + Send + Sync + PartialEq + Debug {
    type State: GameState;
    type Error: Debug;

    /// Applies this move to the given state.
    fn apply(&self, state: &mut Self::State) -> Result<(), Self::Error>;

    /// Undoes this move on the given state.
    fn undo(&self, state: &mut Self::State) -> Result<(), Self::Error>;
}

/// Generates all legal moves from a given game state.
pub trait MoveGenerator<S: GameState>: Clone + Send + Sync {
    type Move: GameMove<State = S>;
    type MoveList: MoveCollection<Self::Move>;

    /// Generates all legal moves for the current player, in a deterministic order.
    /// The state is borrowed mutably so implementations may probe moves with
    /// apply/undo, but it must be left unchanged.
    fn generate_moves(&self, state: &mut S) -> Self::MoveList;
}

/// Evaluates a game position and returns a score.
pub trait Evaluator<S: GameState>: Clone + Send + Sync {
    /// Returns the score of a decided position (win, loss or draw), or `None` while the
    /// game is still open. `ply` is the distance from the search root.
    fn terminal_score(&self, state: &mut S, ply: u8) -> Option<Score>;

    /// Static evaluation of an open position. Higher scores favor the maximizing player.
    fn evaluate(&self, state: &mut S) -> Score;
}

/// Abstraction over move collections (Vec, SmallVec, etc.)
pub trait MoveCollection<M>: AsRef<[M]> + AsMut<[M]> + Send {
    #[inline]
    fn is_empty(&self) -> bool {
        self.as_ref().is_empty()
    }

    #[inline]
    fn len(&self) -> usize {
        self.as_ref().len()
    }
}

impl<M: Send> MoveCollection<M> for Vec<M> {}
