//! Play command - play a game against the computer.

use std::io::{self, BufReader};

use gamesearch::difficulty::Difficulty;
use gamesearch::game::input_source::ConditionalInput;
use gamesearch::game::renderer::{GameRenderer, TextRenderer};
use gamesearch::game::{ChessGame, ConnectFourGame, Engine, Game, Seat};
use structopt::StructOpt;

use super::util::{create_config, run_game_loop};
use super::{Command, GameKind};

#[derive(StructOpt)]
pub struct PlayArgs {
    #[structopt(short, long, default_value = "chess")]
    pub game: GameKind,
    #[structopt(short, long, default_value = "medium")]
    pub difficulty: Difficulty,
    #[structopt(short, long, default_value = "random")]
    pub side: Seat,
    #[structopt(long)]
    pub position: Option<String>,
}

impl PlayArgs {
    fn play<G: Game>(&self, game: G) {
        let config = create_config(&game, self.difficulty, None, self.position.as_deref());
        let mut renderer = TextRenderer::terminal(None);
        GameRenderer::<G>::notify(
            &mut renderer,
            format!("You are playing {}.", game.side_name(self.side)),
        );

        run_game_loop(
            Engine::with_config(game, config),
            ConditionalInput::new(self.side, BufReader::new(io::stdin())),
            renderer,
        );
    }
}

impl Command for PlayArgs {
    fn execute(self) {
        match self.game {
            GameKind::Chess => self.play(ChessGame),
            GameKind::ConnectFour => self.play(ConnectFourGame::default()),
        }
    }
}
