//! Best move command - determine the engine's move from a position.

use gamesearch::connect_four::Strategy;
use gamesearch::difficulty::Difficulty;
use gamesearch::game::{ChessGame, ConnectFourGame, Engine, Game};
use log::warn;
use structopt::StructOpt;

use super::util::create_config;
use super::{Command, GameKind};

#[derive(StructOpt)]
pub struct BestMoveArgs {
    #[structopt(short, long, default_value = "chess")]
    pub game: GameKind,
    #[structopt(long)]
    pub position: Option<String>,
    #[structopt(short, long, default_value = "medium")]
    pub difficulty: Difficulty,
    #[structopt(long, help = "Search depth in plies; overrides --difficulty")]
    pub depth: Option<u8>,
    #[structopt(long = "full-search")]
    pub full_search: bool,
}

impl BestMoveArgs {
    fn report<G: Game>(&self, game: G) {
        let config = create_config(
            &game,
            self.difficulty,
            self.depth,
            self.position.as_deref(),
        );
        let mut engine = Engine::with_config(game, config);

        match engine.best_move() {
            Ok(Some(best_move)) => {
                println!("{}", best_move);
                let stats = engine.search_stats();
                match stats.last_score {
                    Some(score) => println!("score: {}", score),
                    None => println!("score: - (blocks an immediate loss)"),
                }
            }
            Ok(None) => eprintln!("There are no valid moves in the given position."),
            Err(err) => eprintln!("Failed to calculate best move: {}", err),
        }
    }
}

impl Command for BestMoveArgs {
    fn execute(self) {
        match self.game {
            GameKind::Chess => {
                if self.full_search {
                    warn!("--full-search only applies to connect four");
                }
                self.report(ChessGame)
            }
            GameKind::ConnectFour => {
                let strategy = if self.full_search {
                    Strategy::FullSearch
                } else {
                    Strategy::WinPriority
                };
                self.report(ConnectFourGame::new(strategy))
            }
        }
    }
}
