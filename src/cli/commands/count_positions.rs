//! Count positions command - count reachable chess positions at each depth.

use std::time::{Duration, Instant};

use gamesearch::chess::{perft, Board, STARTING_POSITION_FEN};
use structopt::StructOpt;

use super::Command;

#[derive(StructOpt)]
pub struct CountPositionsArgs {
    #[structopt(short, long, default_value = "4")]
    pub depth: u8,
    #[structopt(long = "fen", default_value = STARTING_POSITION_FEN)]
    pub starting_position: Board,
}

impl Command for CountPositionsArgs {
    fn execute(self) {
        let mut total_positions = 0;
        let mut total_duration = Duration::from_secs(0);
        let mut board = self.starting_position;

        for depth in 1..=self.depth {
            let started = Instant::now();
            let count = match perft(&mut board, depth) {
                Ok(count) => count,
                Err(error) => {
                    eprintln!("error at depth {}: {}", depth, error);
                    return;
                }
            };
            let duration = started.elapsed();
            let positions_per_second = count as f64 / duration.as_secs_f64();

            total_positions += count;
            total_duration += duration;

            println!(
                "depth: {}, positions: {}, positions per second: {}",
                depth, count, positions_per_second
            );
        }

        println!(
            "total positions: {}, total duration: {:?}, positions per second: {}",
            total_positions,
            total_duration,
            total_positions as f64 / total_duration.as_secs_f64()
        );
    }
}
