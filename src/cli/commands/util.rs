//! Shared utilities for commands.

use std::process;

use gamesearch::difficulty::Difficulty;
use gamesearch::game::input_source::InputSource;
use gamesearch::game::r#loop::GameLoop;
use gamesearch::game::renderer::GameRenderer;
use gamesearch::game::{Engine, EngineConfig, Game};

pub(crate) fn create_config<G: Game>(
    game: &G,
    difficulty: Difficulty,
    search_depth: Option<u8>,
    position: Option<&str>,
) -> EngineConfig<G::Position> {
    let starting_position = position.map(|text| match game.parse_position(text) {
        Ok(position) => position,
        Err(error) => {
            eprintln!("Invalid {} position: {}", game.name(), error);
            process::exit(1);
        }
    });

    EngineConfig {
        difficulty,
        search_depth,
        starting_position,
    }
}

pub(crate) fn run_game_loop<G, I, R>(engine: Engine<G>, input_source: I, renderer: R)
where
    G: Game,
    I: InputSource,
    R: GameRenderer<G>,
{
    let mut game_loop = GameLoop::new(engine, input_source, renderer);
    match game_loop.run() {
        Ok(Some(_)) => {}
        Ok(None) => println!("Goodbye!"),
        Err(error) => {
            eprintln!("error: {}", error);
            process::exit(1);
        }
    }
}
