mod cli;

use cli::commands::Command;
use cli::GameSearch;
use structopt::StructOpt;

fn main() {
    env_logger::init();
    GameSearch::from_args().execute();
}
