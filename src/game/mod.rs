//! Turn-taking driver shared by both games: the [`Game`] abstraction, an [`Engine`] that
//! owns the canonical position, and a terminal game loop.

mod chess_game;
mod connect_four_game;
pub mod engine;
pub mod game;
pub mod input_source;
pub mod r#loop; // `loop` is reserved keyword, need to escape with `r#`
pub mod renderer;

#[cfg(test)]
mod tests;

pub use chess_game::ChessGame;
pub use connect_four_game::ConnectFourGame;
pub use engine::{Engine, EngineConfig, EngineError, SearchStats, SearchStatus};
pub use game::{Game, Outcome, Seat};
