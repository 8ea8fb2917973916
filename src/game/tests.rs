use std::io::Cursor;
use std::thread;
use std::time::Duration;

use super::input_source::{ConditionalInput, EngineInput, InputError, MoveInput};
use super::r#loop::GameLoop;
use super::renderer::TextRenderer;
use super::*;
use crate::chess::{self, Board};
use crate::connect_four::{self, DropMove, Strategy};
use crate::difficulty::Difficulty;
use crate::search::{SearchContext, SearchError};

// yellow threatens the bottom row in column 3; red cannot win at once
const BLOCK_REQUIRED: &str = "
    .......
    .......
    .......
    .......
    .......
    XX.OOOX
";

// red completes column 1
const RED_WINS_NOW: &str = "
    .......
    .......
    .......
    X......
    X......
    XOO.O..
";

fn connect_four_engine(grid: &str, difficulty: Difficulty) -> Engine<ConnectFourGame> {
    let game = ConnectFourGame::default();
    let config = EngineConfig {
        difficulty,
        search_depth: None,
        starting_position: Some(game.parse_position(grid).unwrap()),
    };
    Engine::with_config(game, config)
}

fn chess_engine(depth: u8) -> Engine<ChessGame> {
    let config = EngineConfig {
        search_depth: Some(depth),
        ..EngineConfig::default()
    };
    Engine::with_config(ChessGame, config)
}

fn output_of<W: AsRef<[u8]>>(out: &W) -> String {
    String::from_utf8_lossy(out.as_ref()).to_string()
}

#[test]
fn test_difficulty_depths_strictly_increase() {
    let chess_depths: Vec<u8> = Difficulty::ALL
        .iter()
        .map(|&d| ChessGame.search_depth(d))
        .collect();
    let connect_four_depths: Vec<u8> = Difficulty::ALL
        .iter()
        .map(|&d| ConnectFourGame::default().search_depth(d))
        .collect();

    assert_eq!(chess_depths, vec![2, 3, 4, 5]);
    assert_eq!(connect_four_depths, vec![2, 4, 6, 8]);
}

#[test]
fn test_engine_depth_follows_difficulty() {
    let mut engine = Engine::new(ConnectFourGame::default());
    assert_eq!(engine.difficulty(), Difficulty::Medium);
    assert_eq!(engine.search_depth(), 4);

    engine.set_difficulty(Difficulty::Grandmaster);
    assert_eq!(engine.search_depth(), 8);
    assert_eq!(chess_engine(1).search_depth(), 1);
}

#[test]
fn test_seat_parsing() {
    assert_eq!("first".parse::<Seat>().unwrap(), Seat::First);
    assert_eq!("second".parse::<Seat>().unwrap(), Seat::Second);
    assert!(Seat::ALL.contains(&"random".parse::<Seat>().unwrap()));
    assert!("third".parse::<Seat>().is_err());
    assert_eq!(Seat::First.opposite(), Seat::Second);
}

#[test]
fn test_move_input_parsing() {
    assert_eq!(
        "  e2e4\n".parse::<MoveInput>().unwrap(),
        MoveInput::Move {
            notation: "e2e4".to_string()
        }
    );
    assert_eq!("UNDO".parse::<MoveInput>().unwrap(), MoveInput::Undo);
    assert!(matches!(
        "quit".parse::<MoveInput>(),
        Err(InputError::UserExit)
    ));
    assert!(matches!(
        "   ".parse::<MoveInput>(),
        Err(InputError::InvalidInput { .. })
    ));
}

#[test]
fn test_connect_four_grid_accepts_slash_separated_rows() {
    let game = ConnectFourGame::default();
    let one_line = "......./......./......./......./......./XX.OOOX";
    assert_eq!(
        game.parse_position(one_line).unwrap(),
        game.parse_position(BLOCK_REQUIRED).unwrap()
    );
}

#[test]
fn test_invalid_input_leaves_position_unchanged() {
    let mut engine = Engine::new(ConnectFourGame::default());
    let before = engine.position().clone();

    for input in ["0", "9", "abc", ""].iter() {
        let result = engine.make_move_from_input(input);
        assert!(
            matches!(result, Err(EngineError::InvalidMove { .. })),
            "{:?} should be rejected",
            input
        );
    }

    assert_eq!(engine.position(), &before);
    assert!(engine.move_history().is_empty());
}

#[test]
fn test_full_column_is_rejected() {
    let mut engine = Engine::new(ConnectFourGame::default());
    for _ in 0..6 {
        engine.make_move_from_input("1").unwrap();
    }
    let before = engine.position().clone();

    let result = engine.make_move_from_input("1");

    assert!(matches!(result, Err(EngineError::InvalidMove { .. })));
    assert_eq!(engine.position(), &before);
    assert_eq!(engine.move_history().len(), 6);
}

#[test]
fn test_illegal_chess_move_is_rejected() {
    let mut engine = chess_engine(2);

    for input in ["e2e5", "e7e5", "z9z9", "e1g1"].iter() {
        assert!(matches!(
            engine.make_move_from_input(input),
            Err(EngineError::InvalidMove { .. })
        ));
    }

    assert_eq!(engine.position(), &Board::starting_position());
}

#[test]
fn test_apply_move_rejects_moves_from_another_position() {
    let mut engine = chess_engine(2);
    let mut other = Board::from_fen(
        "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2",
    )
    .unwrap();
    let foreign = chess::parse_move(&mut other, "f1c4").unwrap();

    assert!(matches!(
        engine.apply_move(foreign),
        Err(EngineError::InvalidMove { .. })
    ));
    assert!(engine.move_history().is_empty());
}

#[test]
fn test_make_and_undo_moves() {
    let mut engine = chess_engine(2);
    let played = engine.make_move_from_input("e2e4").unwrap();
    engine.make_move_from_input("c7c5").unwrap();

    assert_eq!(played.to_string(), "e2e4");
    assert_eq!(engine.side_to_move(), Seat::First);
    assert_eq!(
        engine.position().to_fen(),
        "rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq c6 0 2"
    );

    assert_eq!(engine.undo_last_move().unwrap().to_string(), "c7c5");
    assert_eq!(engine.undo_last_move().unwrap(), played);
    assert_eq!(engine.position(), &Board::starting_position());
    assert!(matches!(
        engine.undo_last_move(),
        Err(EngineError::NothingToUndo)
    ));
}

#[test]
fn test_reset_restores_configured_start() {
    let mut engine = connect_four_engine(BLOCK_REQUIRED, Difficulty::Easy);
    let start = engine.position().clone();
    engine.make_best_move().unwrap();
    engine.make_move_from_input("4").unwrap();

    engine.reset();

    assert_eq!(engine.position(), &start);
    assert!(engine.move_history().is_empty());
    assert_eq!(engine.last_move(), None);
}

#[test]
fn test_best_move_blocks_at_every_difficulty() {
    for &difficulty in Difficulty::ALL.iter() {
        let mut engine = connect_four_engine(BLOCK_REQUIRED, difficulty);
        let before = engine.position().clone();

        assert_eq!(engine.best_move().unwrap(), Some(DropMove::new(2)));
        assert_eq!(engine.position(), &before);
    }
}

#[test]
fn test_make_best_move_wins_and_ends_game() {
    let mut engine = connect_four_engine(RED_WINS_NOW, Difficulty::Easy);

    assert_eq!(engine.make_best_move().unwrap(), Some(DropMove::new(0)));

    let outcome = engine.check_game_over().unwrap();
    assert_eq!(
        outcome,
        Outcome::Win {
            winner: Seat::First,
            reason: "four in a row".to_string()
        }
    );
    assert_eq!(
        engine.game().describe_outcome(&outcome),
        "red wins by four in a row"
    );
    assert!(engine.valid_moves().is_empty());
    assert_eq!(engine.make_best_move().unwrap(), None);
}

#[test]
fn test_checkmate_is_reported_for_the_mating_side() {
    let mut engine = chess_engine(2);
    for input in ["f2f3", "e7e5", "g2g4", "d8h4"].iter() {
        assert_eq!(engine.check_game_over(), None);
        engine.make_move_from_input(input).unwrap();
    }

    assert_eq!(
        engine.check_game_over(),
        Some(Outcome::Win {
            winner: Seat::Second,
            reason: "checkmate".to_string()
        })
    );
    assert_eq!(engine.best_move().unwrap(), None);
}

#[test]
fn test_search_stats_describe_last_search() {
    let mut engine = chess_engine(2);
    engine.best_move().unwrap();

    let stats = engine.search_stats();
    assert_eq!(stats.depth, 2);
    assert!(stats.positions_searched >= 20);
    assert_eq!(stats.last_score, Some(0));
    assert!(stats.last_search_duration.is_some());
}

#[test]
fn test_background_search_matches_inline_search() {
    let mut inline = connect_four_engine(BLOCK_REQUIRED, Difficulty::Hard);
    let mut background = connect_four_engine(BLOCK_REQUIRED, Difficulty::Hard);
    inline.make_move_from_input("3").unwrap();
    background.make_move_from_input("3").unwrap();

    let expected = inline.best_move().unwrap();
    background.start_background_search().unwrap();
    let found = background.wait_for_background_search().unwrap();

    assert_eq!(found, expected);
    assert_eq!(background.position(), inline.position());
    assert_eq!(
        background.search_stats().last_score,
        inline.search_stats().last_score
    );
    assert_eq!(
        background.search_stats().positions_searched,
        inline.search_stats().positions_searched
    );
}

#[test]
fn test_chess_background_search_matches_inline_search() {
    let mut inline = chess_engine(3);
    let mut background = chess_engine(3);

    let expected = inline.best_move().unwrap();
    background.start_background_search().unwrap();
    let found = background.wait_for_background_search().unwrap();

    assert_eq!(found, expected);
    assert_eq!(
        background.search_stats().last_score,
        inline.search_stats().last_score
    );
}

#[test]
fn test_poll_background_search_until_finished() {
    let mut engine = connect_four_engine(BLOCK_REQUIRED, Difficulty::Medium);
    let expected = connect_four::best_move(&mut engine.position().clone(), 4).unwrap();
    engine.start_background_search().unwrap();

    let found = loop {
        match engine.poll_background_search().unwrap() {
            SearchStatus::Running => thread::sleep(Duration::from_millis(1)),
            SearchStatus::Finished(found) => break found,
        }
    };

    assert_eq!(found, expected);
    assert!(!engine.is_searching());
    assert!(matches!(
        engine.poll_background_search(),
        Err(EngineError::NoSearchRunning)
    ));
}

#[test]
fn test_second_search_is_refused_while_one_is_running() {
    let mut engine = Engine::new(ConnectFourGame::default());
    engine.start_background_search().unwrap();

    assert!(matches!(
        engine.start_background_search(),
        Err(EngineError::SearchInProgress)
    ));
    assert!(matches!(
        engine.best_move(),
        Err(EngineError::SearchInProgress)
    ));
    assert!(matches!(
        engine.make_move_from_input("4"),
        Err(EngineError::SearchInProgress)
    ));

    engine.wait_for_background_search().unwrap();
    assert!(engine.move_history().is_empty());
    engine.make_move_from_input("4").unwrap();
}

#[test]
fn test_cancelled_background_search_leaves_engine_usable() {
    let game = ConnectFourGame::new(Strategy::FullSearch);
    let config = EngineConfig {
        difficulty: Difficulty::Grandmaster,
        ..EngineConfig::default()
    };
    let mut engine = Engine::with_config(game, config);
    let before = engine.position().clone();

    engine.start_background_search().unwrap();
    let result = engine.cancel_background_search();

    assert!(matches!(
        result,
        Err(EngineError::SearchError {
            error: SearchError::Cancelled
        })
    ));
    assert!(!engine.is_searching());
    assert_eq!(engine.position(), &before);

    engine.set_difficulty(Difficulty::Easy);
    engine.start_background_search().unwrap();
    assert!(engine.wait_for_background_search().unwrap().is_some());
}

#[test]
fn test_inline_search_works_after_cancel() {
    let game = ConnectFourGame::new(Strategy::FullSearch);
    let config = EngineConfig {
        difficulty: Difficulty::Grandmaster,
        ..EngineConfig::default()
    };
    let mut engine = Engine::with_config(game, config);

    engine.start_background_search().unwrap();
    assert!(engine.cancel_background_search().is_err());

    engine.set_difficulty(Difficulty::Easy);
    let mut context = SearchContext::new(2);
    let expected = connect_four::search_best_move(
        &mut context,
        &mut engine.position().clone(),
        Strategy::FullSearch,
    )
    .unwrap();
    assert!(expected.is_some());
    assert_eq!(engine.best_move().unwrap(), expected);
    assert_eq!(engine.make_best_move().unwrap(), expected);
    assert_eq!(engine.move_history().len(), 1);
}

#[test]
fn test_wait_without_search_is_an_error() {
    let mut engine = chess_engine(2);
    assert!(matches!(
        engine.wait_for_background_search(),
        Err(EngineError::NoSearchRunning)
    ));
    assert!(matches!(
        engine.cancel_background_search(),
        Err(EngineError::NoSearchRunning)
    ));
}

#[test]
fn test_engine_vs_engine_connect_four_plays_to_the_end() {
    let engine = connect_four_engine(BLOCK_REQUIRED, Difficulty::Easy);
    let mut game_loop = GameLoop::new(engine, EngineInput, TextRenderer::new(Vec::new()));

    let outcome = game_loop.run().unwrap().expect("game should finish");

    let mut position = game_loop.engine().position().clone();
    assert_eq!(
        ConnectFourGame::default().outcome(&mut position),
        Some(outcome)
    );
    let output = output_of(game_loop.renderer().output());
    assert!(output.contains("Game over:"));
    assert!(output.contains("* Positions searched:"));
}

#[test]
fn test_human_move_is_answered_by_the_engine() {
    let engine = Engine::with_config(
        ConnectFourGame::default(),
        EngineConfig {
            difficulty: Difficulty::Easy,
            ..EngineConfig::default()
        },
    );
    let input = ConditionalInput::new(Seat::First, Cursor::new("4\nquit\n"));
    let mut game_loop = GameLoop::new(engine, input, TextRenderer::new(Vec::new()));

    assert_eq!(game_loop.run().unwrap(), None);

    let history = game_loop.engine().move_history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0], DropMove::new(3));
    assert!(output_of(game_loop.renderer().output()).contains("red to move. Enter your move:"));
}

#[test]
fn test_bad_human_input_is_reported_and_retried() {
    let engine = Engine::new(ConnectFourGame::default());
    let input = ConditionalInput::new(Seat::First, Cursor::new("9\n\nquit\n"));
    let mut game_loop = GameLoop::new(engine, input, TextRenderer::new(Vec::new()));

    assert_eq!(game_loop.run().unwrap(), None);

    let output = output_of(game_loop.renderer().output());
    assert!(output.contains("error: invalid move `9`"));
    assert!(output.contains("Invalid input"));
    assert!(game_loop.engine().move_history().is_empty());
}

#[test]
fn test_undo_against_engine_takes_back_both_moves() {
    let engine = Engine::with_config(
        ConnectFourGame::default(),
        EngineConfig {
            difficulty: Difficulty::Easy,
            ..EngineConfig::default()
        },
    );
    let input = ConditionalInput::new(Seat::First, Cursor::new("4\nundo\nundo\nquit\n"));
    let mut game_loop = GameLoop::new(engine, input, TextRenderer::new(Vec::new()));

    assert_eq!(game_loop.run().unwrap(), None);

    assert!(game_loop.engine().move_history().is_empty());
    assert!(output_of(game_loop.renderer().output()).contains("Nothing to undo."));
}

#[test]
fn test_end_of_input_leaves_chess_game() {
    let engine = chess_engine(2);
    let input = ConditionalInput::new(Seat::First, Cursor::new("e2e4\n"));
    let mut game_loop = GameLoop::new(engine, input, TextRenderer::new(Vec::new()));

    assert_eq!(game_loop.run().unwrap(), None);

    let history = game_loop.engine().move_history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].to_string(), "e2e4");
    assert_eq!(game_loop.engine().side_to_move(), Seat::First);
}
