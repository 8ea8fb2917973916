//! Command-line interface for the game engines.
//! This module is not part of the public library API.

pub mod args;
pub mod commands;

pub use args::GameSearch;
