use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, info};
use thiserror::Error;

use crate::difficulty::Difficulty;
use crate::search::{Score, SearchContext, SearchError};

use super::game::{Game, Outcome, Seat};

/// Core engine configuration
#[derive(Clone, Debug)]
pub struct EngineConfig<P> {
    pub difficulty: Difficulty,
    /// Overrides the depth implied by `difficulty`.
    pub search_depth: Option<u8>,
    /// The game's usual starting position when `None`.
    pub starting_position: Option<P>,
}

impl<P> Default for EngineConfig<P> {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            search_depth: None,
            starting_position: None,
        }
    }
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid move `{input}`: {reason}")]
    InvalidMove { input: String, reason: String },
    #[error("board error: {message}")]
    BoardError { message: String },
    #[error("search error: {error}")]
    SearchError { error: SearchError },
    #[error("a search is already running")]
    SearchInProgress,
    #[error("no search is running")]
    NoSearchRunning,
    #[error("there is no move to undo")]
    NothingToUndo,
    #[error("search worker failed: {message}")]
    WorkerFailed { message: String },
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct SearchStats {
    pub positions_searched: usize,
    pub cutoffs: usize,
    pub depth: u8,
    pub last_score: Option<Score>,
    pub last_search_duration: Option<Duration>,
}

/// Progress of a search running on the worker thread.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum SearchStatus<M> {
    Running,
    Finished(Option<M>),
}

type WorkerResult<M> = (Result<Option<M>, SearchError>, SearchContext);

struct BackgroundSearch<M> {
    receiver: Receiver<WorkerResult<M>>,
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Owns the canonical position of one game and drives it: validates and applies moves,
/// keeps the history for undo, and asks the search for engine moves either inline or on
/// a worker thread.
pub struct Engine<G: Game> {
    game: G,
    position: G::Position,
    starting_position: G::Position,
    move_history: Vec<G::Move>,
    difficulty: Difficulty,
    search_context: SearchContext,
    background: Option<BackgroundSearch<G::Move>>,
}

impl<G: Game> Engine<G> {
    pub fn new(game: G) -> Self {
        Self::with_config(game, EngineConfig::default())
    }

    pub fn with_config(game: G, config: EngineConfig<G::Position>) -> Self {
        let starting_position = config
            .starting_position
            .unwrap_or_else(|| game.starting_position());
        let depth = config
            .search_depth
            .unwrap_or_else(|| game.search_depth(config.difficulty));

        Self {
            position: starting_position.clone(),
            starting_position,
            move_history: Vec::new(),
            difficulty: config.difficulty,
            search_context: SearchContext::new(depth),
            background: None,
            game,
        }
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn position(&self) -> &G::Position {
        &self.position
    }

    pub fn side_to_move(&self) -> Seat {
        self.game.side_to_move(&self.position)
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn search_depth(&self) -> u8 {
        self.search_context.search_depth()
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.search_context
            .set_search_depth(self.game.search_depth(difficulty));
    }

    pub fn move_history(&self) -> &[G::Move] {
        &self.move_history
    }

    pub fn last_move(&self) -> Option<G::Move> {
        self.move_history.last().copied()
    }

    pub fn valid_moves(&mut self) -> Vec<G::Move> {
        self.game.legal_moves(&mut self.position)
    }

    pub fn check_game_over(&mut self) -> Option<Outcome> {
        self.game.outcome(&mut self.position)
    }

    pub fn evaluate(&self) -> Score {
        self.game.evaluate(&self.position)
    }

    /// Parses and plays a human move. A rejected move leaves the position unchanged.
    pub fn make_move_from_input(&mut self, input: &str) -> Result<G::Move, EngineError> {
        self.ensure_idle()?;
        let game_move = self
            .game
            .parse_move(&mut self.position, input)
            .map_err(|error| EngineError::InvalidMove {
                input: input.trim().to_string(),
                reason: error.to_string(),
            })?;
        self.apply_move(game_move)?;
        Ok(game_move)
    }

    pub fn apply_move(&mut self, game_move: G::Move) -> Result<(), EngineError> {
        self.ensure_idle()?;
        if !self.valid_moves().contains(&game_move) {
            return Err(EngineError::InvalidMove {
                input: game_move.to_string(),
                reason: "not a legal move in this position".to_string(),
            });
        }

        let mover = self.game.side_name(self.side_to_move());
        self.game
            .apply_move(&mut self.position, game_move)
            .map_err(board_error)?;
        self.move_history.push(game_move);
        info!("{} plays {}", mover, game_move);
        Ok(())
    }

    pub fn undo_last_move(&mut self) -> Result<G::Move, EngineError> {
        self.ensure_idle()?;
        let game_move = self.move_history.pop().ok_or(EngineError::NothingToUndo)?;
        if let Err(error) = self.game.undo_move(&mut self.position, game_move) {
            self.move_history.push(game_move);
            return Err(board_error(error));
        }
        debug!("took back {}", game_move);
        Ok(game_move)
    }

    /// Searches the current position inline. `Ok(None)` means the side to move has no move.
    pub fn best_move(&mut self) -> Result<Option<G::Move>, EngineError> {
        self.ensure_idle()?;
        self.game
            .search(&mut self.search_context, &mut self.position)
            .map_err(|error| EngineError::SearchError { error })
    }

    pub fn make_best_move(&mut self) -> Result<Option<G::Move>, EngineError> {
        let best_move = self.best_move()?;
        if let Some(game_move) = best_move {
            self.apply_move(game_move)?;
        }
        Ok(best_move)
    }

    /// Returns to the starting position, abandoning any running search.
    pub fn reset(&mut self) {
        if let Some(background) = self.background.take() {
            background.stop.store(true, Ordering::SeqCst);
            if background.handle.join().is_err() {
                debug!("search worker panicked while being abandoned");
            }
        }
        self.position = self.starting_position.clone();
        self.move_history.clear();
        self.search_context.reset_stats();
    }

    pub fn search_stats(&self) -> SearchStats {
        SearchStats {
            positions_searched: self.search_context.searched_position_count(),
            cutoffs: self.search_context.cutoff_count(),
            depth: self.search_context.search_depth(),
            last_score: self.search_context.last_score(),
            last_search_duration: self.search_context.last_search_duration(),
        }
    }

    pub fn is_searching(&self) -> bool {
        self.background.is_some()
    }

    /// Starts searching a copy of the current position on a worker thread. The position
    /// cannot change until the result has been collected.
    pub fn start_background_search(&mut self) -> Result<(), EngineError> {
        self.ensure_idle()?;

        let game = self.game.clone();
        let mut position = self.position.clone();
        let mut context = SearchContext::new(self.search_depth());
        let stop = context.stop_handle();
        let (sender, receiver) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("search-worker".to_string())
            .spawn(move || {
                let result = game.search(&mut context, &mut position);
                if sender.send((result, context)).is_err() {
                    debug!("search result discarded, engine is gone");
                }
            })
            .map_err(|error| EngineError::WorkerFailed {
                message: error.to_string(),
            })?;

        debug!("started background search at depth {}", self.search_depth());
        self.background = Some(BackgroundSearch {
            receiver,
            stop,
            handle,
        });
        Ok(())
    }

    pub fn poll_background_search(&mut self) -> Result<SearchStatus<G::Move>, EngineError> {
        let background = self
            .background
            .as_ref()
            .ok_or(EngineError::NoSearchRunning)?;

        match background.receiver.try_recv() {
            Ok(result) => self.finish_background_search(result).map(SearchStatus::Finished),
            Err(TryRecvError::Empty) => Ok(SearchStatus::Running),
            Err(TryRecvError::Disconnected) => Err(self.abandon_worker()),
        }
    }

    pub fn wait_for_background_search(&mut self) -> Result<Option<G::Move>, EngineError> {
        let background = self
            .background
            .as_ref()
            .ok_or(EngineError::NoSearchRunning)?;

        match background.receiver.recv() {
            Ok(result) => self.finish_background_search(result),
            Err(_) => Err(self.abandon_worker()),
        }
    }

    /// Raises the stop flag and waits for the worker. Unless the search had already
    /// finished, the result is `SearchError::Cancelled`.
    pub fn cancel_background_search(&mut self) -> Result<Option<G::Move>, EngineError> {
        let background = self
            .background
            .as_ref()
            .ok_or(EngineError::NoSearchRunning)?;
        background.stop.store(true, Ordering::SeqCst);
        self.wait_for_background_search()
    }

    fn finish_background_search(
        &mut self,
        (result, context): WorkerResult<G::Move>,
    ) -> Result<Option<G::Move>, EngineError> {
        if let Some(background) = self.background.take() {
            if background.handle.join().is_err() {
                return Err(EngineError::WorkerFailed {
                    message: "search worker panicked".to_string(),
                });
            }
        }
        context.clear_stop();
        self.search_context = context;
        result.map_err(|error| EngineError::SearchError { error })
    }

    fn abandon_worker(&mut self) -> EngineError {
        if let Some(background) = self.background.take() {
            let _ = background.handle.join();
        }
        EngineError::WorkerFailed {
            message: "search worker exited without a result".to_string(),
        }
    }

    fn ensure_idle(&self) -> Result<(), EngineError> {
        if self.background.is_some() {
            return Err(EngineError::SearchInProgress);
        }
        Ok(())
    }
}

impl<G: Game> Drop for Engine<G> {
    fn drop(&mut self) {
        if let Some(background) = &self.background {
            background.stop.store(true, Ordering::SeqCst);
        }
    }
}

fn board_error<E: std::error::Error>(error: E) -> EngineError {
    EngineError::BoardError {
        message: error.to_string(),
    }
}
