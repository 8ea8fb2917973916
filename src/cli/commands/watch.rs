//! Watch command - watch the computer play against itself.

use std::time::Duration;

use gamesearch::difficulty::Difficulty;
use gamesearch::game::input_source::EngineInput;
use gamesearch::game::renderer::TextRenderer;
use gamesearch::game::{ChessGame, ConnectFourGame, Engine, Game};
use structopt::StructOpt;

use super::util::{create_config, run_game_loop};
use super::{Command, GameKind};

#[derive(StructOpt)]
pub struct WatchArgs {
    #[structopt(short, long, default_value = "chess")]
    pub game: GameKind,
    #[structopt(short, long, default_value = "medium")]
    pub difficulty: Difficulty,
    #[structopt(long)]
    pub position: Option<String>,
    #[structopt(
        long = "delay",
        default_value = "1000",
        help = "Delay between moves in milliseconds"
    )]
    pub delay_ms: u64,
}

impl WatchArgs {
    fn watch<G: Game>(&self, game: G) {
        let config = create_config(&game, self.difficulty, None, self.position.as_deref());
        let delay = Duration::from_millis(self.delay_ms);
        run_game_loop(
            Engine::with_config(game, config),
            EngineInput,
            TextRenderer::terminal(Some(delay)),
        );
    }
}

impl Command for WatchArgs {
    fn execute(self) {
        match self.game {
            GameKind::Chess => self.watch(ChessGame),
            GameKind::ConnectFour => self.watch(ConnectFourGame::default()),
        }
    }
}
