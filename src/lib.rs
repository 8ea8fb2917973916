pub mod chess;
pub mod connect_four;
pub mod difficulty;
pub mod game;
pub mod search;
