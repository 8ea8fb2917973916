use crate::search::{win_for, Score, WIN_SCORE};

use super::board::{Board, WINDOWS};
use super::disc::Disc;

const OPEN_TRIPLE: Score = 100;
const OPEN_PAIR: Score = 10;

/// Static score of the grid from red's perspective.
///
/// Every run of four cells contributes: three discs of one side plus an empty cell is
/// worth 100, two discs plus two empty cells is worth 10, anything else (including runs
/// holding discs of both sides) is worth nothing. A completed run returns the win
/// sentinel straight away.
pub fn score(board: &Board) -> Score {
    let mut total = 0;

    for window in WINDOWS.iter() {
        let mut red = 0;
        let mut yellow = 0;
        for &(row, col) in window.iter() {
            match board.get(row, col) {
                Some(Disc::Red) => red += 1,
                Some(Disc::Yellow) => yellow += 1,
                None => {}
            }
        }

        total += match (red, yellow) {
            (4, _) => return WIN_SCORE,
            (_, 4) => return -WIN_SCORE,
            (3, 0) => OPEN_TRIPLE,
            (0, 3) => -OPEN_TRIPLE,
            (2, 0) => OPEN_PAIR,
            (0, 2) => -OPEN_PAIR,
            _ => 0,
        };
    }

    total
}

/// Score of a decided grid: a connected four is a win for its owner, a full grid is a
/// draw. Returns `None` while the game is open.
pub fn terminal_score(board: &Board, ply: u8) -> Option<Score> {
    if let Some(winner) = board.winner() {
        return Some(win_for(winner.maximize_score(), ply));
    }
    if board.is_full() {
        return Some(0);
    }
    None
}
