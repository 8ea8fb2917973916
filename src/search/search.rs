//! Alpha-beta search algorithm implementation.
//!
//! # Core Algorithm
//!
//! Alpha-beta pruning is an optimization of minimax search that maintains a window [alpha, beta]
//! representing the range of scores that matter. Once beta <= alpha at a node, the remaining
//! siblings cannot change the result and are skipped. The algorithm always backs up the same
//! value as plain minimax; only the number of explored nodes differs.
//!
//! # Node Order
//!
//! 1. Terminal check: a decided position returns its sentinel (or draw) score regardless of the
//!    remaining depth, so a forced win found at shallow depth is never shadowed.
//! 2. Depth cutoff: at depth 0 the static evaluation is returned.
//! 3. Recursion: every legal move is applied, searched with the opposite maximizing flag and
//!    undone before the next sibling is tried.
//!
//! # Root Move Selection
//!
//! The root keeps a move only when its score is strictly better for the side to move, so ties
//! resolve to the first move in generator order and results are reproducible.
//!
//! # Cancellation
//!
//! A shared stop flag is checked between sibling moves. Because every applied move is undone
//! before an error propagates, a cancelled search leaves the state exactly as it found it.

use std::cmp::{max, min};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::debug;
use thiserror::Error;

use super::{Evaluator, GameMove, GameState, MoveCollection, MoveGenerator, Score};

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("depth must be at least 1")]
    DepthTooLow,
    #[error("search was cancelled")]
    Cancelled,
    #[error("failed to apply or undo a generated move: {message}")]
    MoveApplication { message: String },
}

/// Search configuration parameters.
struct SearchConfig {
    depth: u8,
}

/// Statistics collected during search.
struct SearchStats {
    position_count: AtomicUsize,
    cutoff_count: AtomicUsize,
    last_score: Option<Score>,
    last_duration: Option<Duration>,
}

impl SearchStats {
    fn new() -> Self {
        Self {
            position_count: AtomicUsize::new(0),
            cutoff_count: AtomicUsize::new(0),
            last_score: None,
            last_duration: None,
        }
    }

    fn increment(&self) {
        self.position_count.fetch_add(1, Ordering::Relaxed);
    }

    fn increment_cutoffs(&self) {
        self.cutoff_count.fetch_add(1, Ordering::Relaxed);
    }

    fn reset(&mut self) {
        self.last_score = None;
        self.last_duration = None;
        self.position_count.store(0, Ordering::Relaxed);
        self.cutoff_count.store(0, Ordering::Relaxed);
    }

    fn record_result(&mut self, score: Score, duration: Duration) {
        self.last_score = Some(score);
        self.last_duration = Some(duration);
    }

    fn count(&self) -> usize {
        self.position_count.load(Ordering::Relaxed)
    }

    fn cutoffs(&self) -> usize {
        self.cutoff_count.load(Ordering::Relaxed)
    }
}

/// Reusable search state: the configured depth, statistics from the last search and the
/// stop flag used for cooperative cancellation.
pub struct SearchContext {
    config: SearchConfig,
    stats: SearchStats,
    stop: Arc<AtomicBool>,
}

impl SearchContext {
    pub fn new(depth: u8) -> Self {
        Self {
            config: SearchConfig { depth },
            stats: SearchStats::new(),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn search_depth(&self) -> u8 {
        self.config.depth
    }

    pub fn set_search_depth(&mut self, depth: u8) {
        self.config.depth = depth;
    }

    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    pub fn searched_position_count(&self) -> usize {
        self.stats.count()
    }

    pub fn cutoff_count(&self) -> usize {
        self.stats.cutoffs()
    }

    /// Backed-up score of the move chosen by the last completed search.
    pub fn last_score(&self) -> Option<Score> {
        self.stats.last_score
    }

    pub fn last_search_duration(&self) -> Option<Duration> {
        self.stats.last_duration
    }

    /// Records a move chosen without running the tree search, such as an immediate win.
    pub(crate) fn record_shortcut(&mut self, score: Option<Score>) {
        self.stats.reset();
        self.stats.last_score = score;
        self.stats.last_duration = Some(Duration::from_secs(0));
    }

    /// Handle that another thread can set to cancel a running search.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn clear_stop(&self) {
        self.stop.store(false, Ordering::SeqCst);
    }

    fn check_stop(&self) -> Result<(), SearchError> {
        if self.stop.load(Ordering::Relaxed) {
            return Err(SearchError::Cancelled);
        }
        Ok(())
    }

    fn increment_position_count(&self) {
        self.stats.increment();
    }

    fn increment_cutoffs(&self) {
        self.stats.increment_cutoffs();
    }
}

/// Applies a move, executes a closure with the new state, then undoes the move.
/// The move is undone even when the closure fails.
fn with_move_applied<S, M, F, R>(game_move: &M, state: &mut S, f: F) -> Result<R, SearchError>
where
    S: GameState,
    M: GameMove<State = S>,
    F: FnOnce(&mut S) -> Result<R, SearchError>,
{
    game_move
        .apply(state)
        .map_err(|error| SearchError::MoveApplication {
            message: format!("apply {:?}: {:?}", game_move, error),
        })?;

    let result = f(state);

    game_move
        .undo(state)
        .map_err(|error| SearchError::MoveApplication {
            message: format!("undo {:?}: {:?}", game_move, error),
        })?;

    result
}

/// Updates best score and move if new score is strictly better.
/// Returns true if best_score was updated.
fn update_best<M: Clone>(
    score: Score,
    candidate_move: &M,
    maximizing_player: bool,
    best_score: &mut Score,
    best_move: &mut Option<M>,
) -> bool {
    let is_better = if maximizing_player {
        score > *best_score
    } else {
        score < *best_score
    };

    if is_better {
        *best_score = score;
        *best_move = Some(candidate_move.clone());
    }
    is_better
}

/// Searches for the best move using minimax with alpha-beta pruning.
///
/// # Returns
///
/// - `Ok(Some(best_move))` - The best move found at the configured depth
/// - `Ok(None)` - The side to move has no legal moves (terminal position)
/// - `Err(SearchError::DepthTooLow)` - If search depth is < 1
/// - `Err(SearchError::Cancelled)` - If the stop flag was raised mid-search
///
/// # Examples
///
/// ```ignore
/// let mut context = SearchContext::new(4);
/// let best_move = alpha_beta_search(&mut context, &mut board, &move_gen, &evaluator)?;
/// ```
#[must_use = "search returns the best move found"]
pub fn alpha_beta_search<S, G, E>(
    context: &mut SearchContext,
    state: &mut S,
    move_generator: &G,
    evaluator: &E,
) -> Result<Option<G::Move>, SearchError>
where
    S: GameState,
    G: MoveGenerator<S>,
    E: Evaluator<S>,
{
    debug!("alpha-beta search depth: {}", context.search_depth());
    let depth = context.search_depth();

    if depth < 1 {
        return Err(SearchError::DepthTooLow);
    }

    context.reset_stats();
    let start = Instant::now();
    let maximizing_player = state.is_maximizing_player();
    let candidates = move_generator.generate_moves(state);

    if candidates.is_empty() {
        debug!("no legal moves at the root");
        return Ok(None);
    }

    let (best_score, best_move) = search_root(
        context,
        state,
        move_generator,
        evaluator,
        candidates.as_ref(),
        depth,
        maximizing_player,
    )?;

    context.stats.record_result(best_score, start.elapsed());
    debug!(
        "searched {} positions ({} cutoffs), best score {}",
        context.searched_position_count(),
        context.cutoff_count(),
        best_score
    );

    Ok(best_move)
}

fn search_root<S, G, E>(
    context: &SearchContext,
    state: &mut S,
    move_generator: &G,
    evaluator: &E,
    candidates: &[G::Move],
    depth: u8,
    maximizing_player: bool,
) -> Result<(Score, Option<G::Move>), SearchError>
where
    S: GameState,
    G: MoveGenerator<S>,
    E: Evaluator<S>,
{
    let mut best_score = if maximizing_player {
        Score::MIN
    } else {
        Score::MAX
    };
    let mut best_move = None;
    let mut alpha = Score::MIN;
    let mut beta = Score::MAX;

    for game_move in candidates.iter() {
        context.check_stop()?;

        let score = with_move_applied(game_move, state, |state| {
            alpha_beta_minimax(
                context,
                state,
                move_generator,
                evaluator,
                depth - 1,
                1,
                alpha,
                beta,
                !maximizing_player,
            )
        })?;
        debug!("root move {:?} scored {}", game_move, score);

        update_best(
            score,
            game_move,
            maximizing_player,
            &mut best_score,
            &mut best_move,
        );

        if maximizing_player {
            alpha = max(alpha, score);
        } else {
            beta = min(beta, score);
        }
    }

    Ok((best_score, best_move))
}

#[allow(clippy::too_many_arguments)]
fn alpha_beta_minimax<S, G, E>(
    context: &SearchContext,
    state: &mut S,
    move_generator: &G,
    evaluator: &E,
    depth: u8,
    ply: u8,
    mut alpha: Score,
    mut beta: Score,
    maximizing_player: bool,
) -> Result<Score, SearchError>
where
    S: GameState,
    G: MoveGenerator<S>,
    E: Evaluator<S>,
{
    context.increment_position_count();

    if let Some(score) = evaluator.terminal_score(state, ply) {
        return Ok(score);
    }

    if depth == 0 {
        return Ok(evaluator.evaluate(state));
    }

    let candidates = move_generator.generate_moves(state);
    if candidates.is_empty() {
        return Ok(evaluator.evaluate(state));
    }

    let mut best_score = if maximizing_player {
        Score::MIN
    } else {
        Score::MAX
    };

    for game_move in candidates.as_ref().iter() {
        context.check_stop()?;

        let score = with_move_applied(game_move, state, |state| {
            alpha_beta_minimax(
                context,
                state,
                move_generator,
                evaluator,
                depth - 1,
                ply.saturating_add(1),
                alpha,
                beta,
                !maximizing_player,
            )
        })?;

        if maximizing_player {
            best_score = max(best_score, score);
            alpha = max(alpha, best_score);
        } else {
            best_score = min(best_score, score);
            beta = min(beta, best_score);
        }

        if beta <= alpha {
            context.increment_cutoffs();
            break;
        }
    }

    Ok(best_score)
}

/// Plain minimax without pruning. Explores the full tree to `depth` and returns the best
/// root move with its backed-up score, using the same tie-breaking as
/// [`alpha_beta_search`]. Intended as a reference when verifying pruned searches.
pub fn minimax_search<S, G, E>(
    state: &mut S,
    move_generator: &G,
    evaluator: &E,
    depth: u8,
) -> Result<Option<(G::Move, Score)>, SearchError>
where
    S: GameState,
    G: MoveGenerator<S>,
    E: Evaluator<S>,
{
    if depth < 1 {
        return Err(SearchError::DepthTooLow);
    }

    let maximizing_player = state.is_maximizing_player();
    let candidates = move_generator.generate_moves(state);

    let mut best_score = if maximizing_player {
        Score::MIN
    } else {
        Score::MAX
    };
    let mut best_move = None;

    for game_move in candidates.as_ref().iter() {
        let score = with_move_applied(game_move, state, |state| {
            minimax(
                state,
                move_generator,
                evaluator,
                depth - 1,
                1,
                !maximizing_player,
            )
        })?;
        update_best(
            score,
            game_move,
            maximizing_player,
            &mut best_score,
            &mut best_move,
        );
    }

    Ok(best_move.map(|game_move| (game_move, best_score)))
}

fn minimax<S, G, E>(
    state: &mut S,
    move_generator: &G,
    evaluator: &E,
    depth: u8,
    ply: u8,
    maximizing_player: bool,
) -> Result<Score, SearchError>
where
    S: GameState,
    G: MoveGenerator<S>,
    E: Evaluator<S>,
{
    if let Some(score) = evaluator.terminal_score(state, ply) {
        return Ok(score);
    }

    if depth == 0 {
        return Ok(evaluator.evaluate(state));
    }

    let candidates = move_generator.generate_moves(state);
    if candidates.is_empty() {
        return Ok(evaluator.evaluate(state));
    }

    let mut best_score = if maximizing_player {
        Score::MIN
    } else {
        Score::MAX
    };

    for game_move in candidates.as_ref().iter() {
        let score = with_move_applied(game_move, state, |state| {
            minimax(
                state,
                move_generator,
                evaluator,
                depth - 1,
                ply.saturating_add(1),
                !maximizing_player,
            )
        })?;
        best_score = if maximizing_player {
            max(best_score, score)
        } else {
            min(best_score, score)
        };
    }

    Ok(best_score)
}
