use std::fmt;

use super::board::Board;
use super::square::Square;

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                let c = self
                    .get(Square::from_file_rank(file, rank))
                    .map_or('.', |piece| piece.to_fen());
                write!(f, "{}", c)?;
                if file < 7 {
                    write!(f, " ")?;
                }
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h")
    }
}

/// Builds a board from an 8×8 diagram of FEN piece letters and `.` for empty squares,
/// eighth rank first. White is to move and no castling rights are set.
#[macro_export]
macro_rules! chess_position {
    ($($piece:tt)*) => {{
        let mut board = $crate::chess::Board::new();
        // Convert all input tokens to a string and filter out whitespace characters.
        let pieces: Vec<char> = stringify!($($piece)*)
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        assert_eq!(pieces.len(), 64, "Invalid number of squares. Expected 64, got {}", pieces.len());
        for (i, &c) in pieces.iter().enumerate() {
            if c != '.' {
                let piece = $crate::chess::Piece::from_fen(c)
                    .expect("Invalid character in chess position");
                // The diagram reads from white's side, so its first row is the eighth rank.
                let rank = (7 - i / 8) as u8;
                let file = (i % 8) as u8;
                board
                    .put($crate::chess::Square::from_file_rank(file, rank), piece)
                    .expect("square set twice");
            }
        }
        board.reset_position_history();
        board
    }};
}
