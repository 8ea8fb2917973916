//! Domain-agnostic tests for the alpha-beta search algorithm.
//!
//! Test coverage:
//! - Basic search functionality with Nim (winning moves, losing positions, game completion)
//! - Error handling (zero depth, no moves, moves that fail to apply)
//! - Agreement with plain minimax on generated game trees
//! - Tie-breaking, terminal precedence and preference for faster wins
//! - Cancellation between sibling moves

use super::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// State of a Nim game: players take 1-3 objects, last to take wins.
#[derive(Clone, Debug, PartialEq)]
struct NimState {
    pile: u8,
    is_player_one_turn: bool,
}

impl NimState {
    fn new(pile: u8) -> Self {
        Self {
            pile,
            is_player_one_turn: true,
        }
    }
}

impl GameState for NimState {
    fn is_maximizing_player(&self) -> bool {
        self.is_player_one_turn
    }
}

#[derive(Clone, Debug, PartialEq)]
struct NimMove {
    take: u8,
}

impl GameMove for NimMove {
    type State = NimState;
    type Error = &'static str;

    fn apply(&self, state: &mut NimState) -> Result<(), Self::Error> {
        if self.take > state.pile || self.take == 0 || self.take > 3 {
            return Err("Invalid move");
        }
        state.pile -= self.take;
        state.is_player_one_turn = !state.is_player_one_turn;
        Ok(())
    }

    fn undo(&self, state: &mut NimState) -> Result<(), Self::Error> {
        state.pile += self.take;
        state.is_player_one_turn = !state.is_player_one_turn;
        Ok(())
    }
}

#[derive(Clone)]
struct NimMoveGenerator;

impl MoveGenerator<NimState> for NimMoveGenerator {
    type Move = NimMove;
    type MoveList = Vec<NimMove>;

    fn generate_moves(&self, state: &mut NimState) -> Vec<NimMove> {
        if state.pile == 0 {
            return vec![];
        }
        (1..=std::cmp::min(3, state.pile))
            .map(|take| NimMove { take })
            .collect()
    }
}

#[derive(Clone)]
struct NimEvaluator;

impl Evaluator<NimState> for NimEvaluator {
    fn terminal_score(&self, state: &mut NimState, ply: u8) -> Option<Score> {
        // The player to move has nothing left to take: the previous player won.
        if state.pile == 0 {
            Some(win_for(!state.is_player_one_turn, ply))
        } else {
            None
        }
    }

    fn evaluate(&self, state: &mut NimState) -> Score {
        // pile % 4 == 0 is a losing position for the player to move
        let to_move_is_losing = state.pile % 4 == 0;
        if to_move_is_losing == state.is_player_one_turn {
            -100
        } else {
            100
        }
    }
}

fn nim_best_move(pile: u8, depth: u8) -> Option<NimMove> {
    let mut state = NimState::new(pile);
    let mut context = SearchContext::new(depth);
    alpha_beta_search(&mut context, &mut state, &NimMoveGenerator, &NimEvaluator).unwrap()
}

#[test]
fn test_nim_finds_winning_move_from_5() {
    let best_move = nim_best_move(5, 10).unwrap();
    assert_eq!(
        best_move.take, 1,
        "From pile of 5, should take 1 to leave opponent with 4"
    );
}

#[test]
fn test_nim_finds_winning_move_from_6() {
    let best_move = nim_best_move(6, 10).unwrap();
    assert_eq!(
        best_move.take, 2,
        "From pile of 6, should take 2 to leave opponent with 4"
    );
}

#[test]
fn test_nim_finds_winning_move_from_7() {
    let best_move = nim_best_move(7, 10).unwrap();
    assert_eq!(
        best_move.take, 3,
        "From pile of 7, should take 3 to leave opponent with 4"
    );
}

#[test]
fn test_nim_losing_position() {
    let best_move = nim_best_move(4, 10).expect("should return a move even when losing");
    assert!(
        best_move.take >= 1 && best_move.take <= 3,
        "Move should be valid (1-3)"
    );
}

#[test]
fn test_nim_exhaustive_winning_positions() {
    for pile in 1..=15 {
        if pile % 4 == 0 {
            continue;
        }

        let best_move = nim_best_move(pile, 12).unwrap();
        let remaining = pile - best_move.take;
        assert_eq!(
            remaining % 4,
            0,
            "From pile {}, taking {} leaves {} which should be a multiple of 4",
            pile,
            best_move.take,
            remaining
        );
    }
}

#[test]
fn test_nim_game_to_completion() {
    let mut state = NimState::new(5);
    let mut context = SearchContext::new(12);
    let mut move_count = 0;

    while let Some(best_move) =
        alpha_beta_search(&mut context, &mut state, &NimMoveGenerator, &NimEvaluator).unwrap()
    {
        best_move.apply(&mut state).unwrap();
        move_count += 1;
        assert!(move_count < 20, "Game should not exceed 20 moves");
    }

    assert_eq!(state.pile, 0);
    assert!(
        !state.is_player_one_turn,
        "Player one should have taken the last object"
    );
}

#[test]
fn test_search_returns_error_for_zero_depth() {
    let mut state = NimState::new(5);
    let mut context = SearchContext::new(0);

    let result = alpha_beta_search(&mut context, &mut state, &NimMoveGenerator, &NimEvaluator);

    assert!(matches!(result, Err(SearchError::DepthTooLow)));
}

#[test]
fn test_search_returns_none_for_no_moves() {
    let mut state = NimState::new(0);
    let mut context = SearchContext::new(5);

    let result = alpha_beta_search(&mut context, &mut state, &NimMoveGenerator, &NimEvaluator);

    assert!(matches!(result, Ok(None)));
}

#[test]
fn test_search_leaves_state_unchanged() {
    let mut state = NimState::new(11);
    let original = state.clone();
    let mut context = SearchContext::new(8);

    alpha_beta_search(&mut context, &mut state, &NimMoveGenerator, &NimEvaluator).unwrap();

    assert_eq!(state, original);
}

#[test]
fn test_search_records_stats() {
    let mut state = NimState::new(12);
    let mut context = SearchContext::new(8);

    alpha_beta_search(&mut context, &mut state, &NimMoveGenerator, &NimEvaluator).unwrap();

    assert!(context.searched_position_count() > 0);
    assert!(context.cutoff_count() > 0, "pruning should trigger on Nim");
    assert!(context.last_score().is_some());
    assert!(context.last_search_duration().is_some());
}

#[test]
fn test_move_application_failure_is_reported() {
    #[derive(Clone)]
    struct OvergreedyGenerator;

    impl MoveGenerator<NimState> for OvergreedyGenerator {
        type Move = NimMove;
        type MoveList = Vec<NimMove>;

        fn generate_moves(&self, _state: &mut NimState) -> Vec<NimMove> {
            vec![NimMove { take: 4 }]
        }
    }

    let mut state = NimState::new(2);
    let mut context = SearchContext::new(2);

    let result = alpha_beta_search(&mut context, &mut state, &OvergreedyGenerator, &NimEvaluator);

    assert!(matches!(result, Err(SearchError::MoveApplication { .. })));
    assert_eq!(state, NimState::new(2));
}

/// A game played on an explicit tree. Each node is either open (with a static score and
/// children) or decided.
#[derive(Clone, Debug, PartialEq)]
enum Node {
    Open(Score, Vec<usize>),
    Won { maximizer: bool },
    Drawn,
}

#[derive(Clone, Debug, PartialEq)]
struct TreeState {
    nodes: Arc<Vec<Node>>,
    path: Vec<usize>,
    maximizing: bool,
}

impl TreeState {
    fn new(nodes: Vec<Node>) -> Self {
        Self {
            nodes: Arc::new(nodes),
            path: vec![0],
            maximizing: true,
        }
    }

    fn minimizing(mut self) -> Self {
        self.maximizing = false;
        self
    }

    fn current(&self) -> &Node {
        &self.nodes[*self.path.last().unwrap()]
    }
}

impl GameState for TreeState {
    fn is_maximizing_player(&self) -> bool {
        self.maximizing
    }
}

#[derive(Clone, Debug, PartialEq)]
struct TreeMove {
    child: usize,
}

impl GameMove for TreeMove {
    type State = TreeState;
    type Error = &'static str;

    fn apply(&self, state: &mut TreeState) -> Result<(), Self::Error> {
        match state.current() {
            Node::Open(_, children) if children.contains(&self.child) => {}
            _ => return Err("not a child of the current node"),
        }
        state.path.push(self.child);
        state.maximizing = !state.maximizing;
        Ok(())
    }

    fn undo(&self, state: &mut TreeState) -> Result<(), Self::Error> {
        if state.path.len() < 2 || state.path.last() != Some(&self.child) {
            return Err("move was not the last one applied");
        }
        state.path.pop();
        state.maximizing = !state.maximizing;
        Ok(())
    }
}

#[derive(Clone)]
struct TreeMoveGenerator;

impl MoveGenerator<TreeState> for TreeMoveGenerator {
    type Move = TreeMove;
    type MoveList = Vec<TreeMove>;

    fn generate_moves(&self, state: &mut TreeState) -> Vec<TreeMove> {
        match state.current() {
            Node::Open(_, children) => children
                .iter()
                .map(|&child| TreeMove { child })
                .collect(),
            _ => vec![],
        }
    }
}

#[derive(Clone, Default)]
struct TreeEvaluator {
    evaluations: Arc<AtomicUsize>,
    stop_after: Option<(usize, Arc<AtomicBool>)>,
}

impl Evaluator<TreeState> for TreeEvaluator {
    fn terminal_score(&self, state: &mut TreeState, ply: u8) -> Option<Score> {
        match state.current() {
            Node::Won { maximizer } => Some(win_for(*maximizer, ply)),
            Node::Drawn => Some(0),
            Node::Open(..) => None,
        }
    }

    fn evaluate(&self, state: &mut TreeState) -> Score {
        let count = self.evaluations.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((limit, stop)) = &self.stop_after {
            if count >= *limit {
                stop.store(true, Ordering::SeqCst);
            }
        }
        match state.current() {
            Node::Open(score, _) => *score,
            _ => 0,
        }
    }
}

/// Builds a pseudo-random tree with a linear congruential generator so every seed yields
/// a different but reproducible game.
fn random_tree(seed: u64, depth: u8) -> Vec<Node> {
    fn next(state: &mut u64) -> u64 {
        *state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        *state >> 33
    }

    fn build(nodes: &mut Vec<Node>, rng: &mut u64, depth: u8) -> usize {
        let index = nodes.len();
        let roll = next(rng);
        let score = (roll % 401) as Score - 200;

        if depth > 0 && index > 0 && roll % 13 == 0 {
            nodes.push(Node::Won {
                maximizer: roll % 2 == 0,
            });
            return index;
        }
        if depth > 0 && index > 0 && roll % 17 == 0 {
            nodes.push(Node::Drawn);
            return index;
        }

        nodes.push(Node::Open(score, vec![]));
        if depth == 0 {
            return index;
        }

        let branching = 1 + next(rng) % 4;
        let children: Vec<usize> = (0..branching)
            .map(|_| build(nodes, rng, depth - 1))
            .collect();
        nodes[index] = Node::Open(score, children);
        index
    }

    let mut rng = seed;
    let mut nodes = vec![];
    build(&mut nodes, &mut rng, depth);
    nodes
}

#[test]
fn test_pruning_matches_plain_minimax() {
    for seed in 1..=60u64 {
        for depth in 1..=5u8 {
            let nodes = random_tree(seed, 6);
            let states = [
                TreeState::new(nodes.clone()),
                TreeState::new(nodes).minimizing(),
            ];

            for state in states.iter() {
                let mut pruned_state = state.clone();
                let mut context = SearchContext::new(depth);
                let pruned = alpha_beta_search(
                    &mut context,
                    &mut pruned_state,
                    &TreeMoveGenerator,
                    &TreeEvaluator::default(),
                )
                .unwrap();

                let mut plain_state = state.clone();
                let plain = minimax_search(
                    &mut plain_state,
                    &TreeMoveGenerator,
                    &TreeEvaluator::default(),
                    depth,
                )
                .unwrap();

                match (pruned, plain) {
                    (None, None) => {}
                    (Some(pruned_move), Some((plain_move, plain_score))) => {
                        assert_eq!(
                            context.last_score(),
                            Some(plain_score),
                            "seed {} depth {}",
                            seed,
                            depth
                        );
                        assert_eq!(pruned_move, plain_move, "seed {} depth {}", seed, depth);
                    }
                    (pruned, plain) => panic!(
                        "seed {} depth {}: pruned {:?} vs plain {:?}",
                        seed, depth, pruned, plain
                    ),
                }

                assert_eq!(&pruned_state, state);
                assert_eq!(&plain_state, state);
            }
        }
    }
}

#[test]
fn test_ties_keep_first_move_for_maximizer() {
    let mut state = TreeState::new(vec![
        Node::Open(0, vec![1, 2, 3]),
        Node::Open(5, vec![]),
        Node::Open(5, vec![]),
        Node::Open(-5, vec![]),
    ]);
    let mut context = SearchContext::new(1);

    let best_move = alpha_beta_search(
        &mut context,
        &mut state,
        &TreeMoveGenerator,
        &TreeEvaluator::default(),
    )
    .unwrap();

    assert_eq!(best_move, Some(TreeMove { child: 1 }));
    assert_eq!(context.last_score(), Some(5));
}

#[test]
fn test_ties_keep_first_move_for_minimizer() {
    let mut state = TreeState::new(vec![
        Node::Open(0, vec![1, 2, 3]),
        Node::Open(7, vec![]),
        Node::Open(-3, vec![]),
        Node::Open(-3, vec![]),
    ])
    .minimizing();
    let mut context = SearchContext::new(1);

    let best_move = alpha_beta_search(
        &mut context,
        &mut state,
        &TreeMoveGenerator,
        &TreeEvaluator::default(),
    )
    .unwrap();

    assert_eq!(best_move, Some(TreeMove { child: 2 }));
    assert_eq!(context.last_score(), Some(-3));
}

#[test]
fn test_terminal_win_outranks_static_evaluation() {
    let mut state = TreeState::new(vec![
        Node::Open(0, vec![1, 3]),
        Node::Open(900, vec![2]),
        Node::Open(900, vec![]),
        Node::Won { maximizer: true },
    ]);
    let mut context = SearchContext::new(5);

    let best_move = alpha_beta_search(
        &mut context,
        &mut state,
        &TreeMoveGenerator,
        &TreeEvaluator::default(),
    )
    .unwrap();

    assert_eq!(best_move, Some(TreeMove { child: 3 }));
    assert_eq!(context.last_score(), Some(WIN_SCORE - 1));
}

#[test]
fn test_prefers_faster_win() {
    let mut state = TreeState::new(vec![
        Node::Open(0, vec![1, 3]),
        Node::Open(0, vec![2]),
        Node::Won { maximizer: true },
        Node::Won { maximizer: true },
    ]);
    let mut context = SearchContext::new(4);

    let best_move = alpha_beta_search(
        &mut context,
        &mut state,
        &TreeMoveGenerator,
        &TreeEvaluator::default(),
    )
    .unwrap();

    assert_eq!(best_move, Some(TreeMove { child: 3 }));
    assert_eq!(context.last_score(), Some(WIN_SCORE - 1));
}

#[test]
fn test_prefers_slower_loss() {
    let mut state = TreeState::new(vec![
        Node::Open(0, vec![1, 3]),
        Node::Open(0, vec![2]),
        Node::Won { maximizer: false },
        Node::Won { maximizer: false },
    ]);
    let mut context = SearchContext::new(4);

    let best_move = alpha_beta_search(
        &mut context,
        &mut state,
        &TreeMoveGenerator,
        &TreeEvaluator::default(),
    )
    .unwrap();

    assert_eq!(best_move, Some(TreeMove { child: 1 }));
    assert_eq!(context.last_score(), Some(-(WIN_SCORE - 2)));
}

#[test]
fn test_draw_scores_zero() {
    let mut state = TreeState::new(vec![
        Node::Open(0, vec![1, 2]),
        Node::Open(-50, vec![]),
        Node::Drawn,
    ]);
    let mut context = SearchContext::new(2);

    let best_move = alpha_beta_search(
        &mut context,
        &mut state,
        &TreeMoveGenerator,
        &TreeEvaluator::default(),
    )
    .unwrap();

    assert_eq!(best_move, Some(TreeMove { child: 2 }));
    assert_eq!(context.last_score(), Some(0));
}

#[test]
fn test_stop_before_search_cancels_immediately() {
    let mut state = NimState::new(9);
    let mut context = SearchContext::new(6);
    context.stop_handle().store(true, Ordering::SeqCst);

    let result = alpha_beta_search(&mut context, &mut state, &NimMoveGenerator, &NimEvaluator);

    assert!(matches!(result, Err(SearchError::Cancelled)));
    assert_eq!(state, NimState::new(9));

    context.clear_stop();
    let result = alpha_beta_search(&mut context, &mut state, &NimMoveGenerator, &NimEvaluator);
    assert!(matches!(result, Ok(Some(_))));
}

/// A complete tree where every interior node has `branching` open children.
fn full_tree(branching: usize, depth: u8) -> Vec<Node> {
    fn build(nodes: &mut Vec<Node>, branching: usize, depth: u8) -> usize {
        let index = nodes.len();
        nodes.push(Node::Open(index as Score % 7, vec![]));
        if depth > 0 {
            let children = (0..branching)
                .map(|_| build(nodes, branching, depth - 1))
                .collect();
            nodes[index] = Node::Open(index as Score % 7, children);
        }
        index
    }

    let mut nodes = vec![];
    build(&mut nodes, branching, depth);
    nodes
}

#[test]
fn test_cancellation_mid_search_restores_state() {
    let mut state = TreeState::new(full_tree(3, 6));
    let original = state.clone();
    let mut context = SearchContext::new(6);
    let evaluator = TreeEvaluator {
        evaluations: Arc::new(AtomicUsize::new(0)),
        stop_after: Some((3, context.stop_handle())),
    };

    let result = alpha_beta_search(&mut context, &mut state, &TreeMoveGenerator, &evaluator);

    assert!(matches!(result, Err(SearchError::Cancelled)));
    assert_eq!(evaluator.evaluations.load(Ordering::SeqCst), 3);
    assert_eq!(state, original);
}
