//! Generic minimax search with alpha-beta pruning.
//!
//! The search is game-agnostic: a game plugs in by implementing [`GameState`],
//! [`GameMove`], [`MoveGenerator`] and [`Evaluator`].

mod search;
mod traits;

#[cfg(test)]
mod tests;

pub use search::{alpha_beta_search, minimax_search, SearchContext, SearchError};
pub use traits::{
    win_for, Evaluator, GameMove, GameState, MoveCollection, MoveGenerator, Score,
    DECIDED_THRESHOLD, WIN_SCORE,
};
