use std::io;
use std::thread;

use log::info;
use thiserror::Error;

use super::engine::{Engine, EngineError};
use super::game::{Game, Outcome, Seat};
use super::input_source::{InputError, InputSource, MoveInput};
use super::renderer::GameRenderer;

#[derive(Error, Debug)]
pub enum GameLoopError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("output error: {0}")]
    Output(#[from] io::Error),
}

/// Alternates turns between the input source's players until the game ends or a
/// person leaves.
pub struct GameLoop<G: Game, I: InputSource, R: GameRenderer<G>> {
    engine: Engine<G>,
    input: I,
    renderer: R,
}

impl<G: Game, I: InputSource, R: GameRenderer<G>> GameLoop<G, I, R> {
    pub fn new(engine: Engine<G>, input: I, renderer: R) -> Self {
        Self {
            engine,
            input,
            renderer,
        }
    }

    pub fn engine(&self) -> &Engine<G> {
        &self.engine
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Returns the outcome, or `None` if a person quit first.
    pub fn run(&mut self) -> Result<Option<Outcome>, GameLoopError> {
        loop {
            if let Some(outcome) = self.engine.check_game_over() {
                let description = self.engine.game().describe_outcome(&outcome);
                info!("game over: {}", description);
                self.renderer.notify(format!("Game over: {}", description));
                self.renderer.render(&self.engine, false)?;
                return Ok(Some(outcome));
            }

            let side = self.engine.side_to_move();
            self.renderer
                .render(&self.engine, self.input.is_human(side))?;

            match self.input.get_move(side) {
                Ok(Some(MoveInput::UseEngine)) => {
                    self.play_engine_move()?;
                    if let Some(delay) = self.renderer.frame_delay() {
                        thread::sleep(delay);
                    }
                }
                Ok(Some(MoveInput::Move { notation })) => {
                    match self.engine.make_move_from_input(&notation) {
                        Ok(_) => {}
                        Err(error @ EngineError::InvalidMove { .. }) => {
                            self.renderer.notify(format!("error: {}", error))
                        }
                        Err(error) => return Err(error.into()),
                    }
                }
                Ok(Some(MoveInput::Undo)) => self.undo_turn(side)?,
                Ok(None) => self.renderer.notify("Invalid input".to_string()),
                Err(InputError::UserExit) => return Ok(None),
                Err(error) => return Err(error.into()),
            }
        }
    }

    fn play_engine_move(&mut self) -> Result<(), GameLoopError> {
        self.engine.start_background_search()?;
        match self.engine.wait_for_background_search()? {
            Some(game_move) => self.engine.apply_move(game_move)?,
            None => self.renderer.notify("The engine has no move.".to_string()),
        }
        Ok(())
    }

    /// Takes back the last move. Against the engine its reply is taken back too, so
    /// `side` is to move again.
    fn undo_turn(&mut self, side: Seat) -> Result<(), GameLoopError> {
        match self.engine.undo_last_move() {
            Ok(_) => {}
            Err(EngineError::NothingToUndo) => {
                self.renderer.notify("Nothing to undo.".to_string());
                return Ok(());
            }
            Err(error) => return Err(error.into()),
        }

        let to_move = self.engine.side_to_move();
        if to_move != side
            && !self.input.is_human(to_move)
            && !self.engine.move_history().is_empty()
        {
            self.engine.undo_last_move()?;
        }
        Ok(())
    }
}
