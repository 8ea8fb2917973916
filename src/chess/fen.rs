use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use super::board::Board;
use super::castle_rights::CastleRights;
use super::color::Color;
use super::error::BoardError;
use super::piece::{Piece, PieceKind};
use super::square::Square;

pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

static FEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        # `(?x)` - insignificant whitespace mode. makes it easier to comment
        # `\x20` - character code for a single space ` `
        ^
        ([pnbrqkPNBRQK1-8]{1,8}) # eighth rank
        /
        ([pnbrqkPNBRQK1-8]{1,8}) # seventh rank
        /
        ([pnbrqkPNBRQK1-8]{1,8}) # sixth rank
        /
        ([pnbrqkPNBRQK1-8]{1,8}) # fifth rank
        /
        ([pnbrqkPNBRQK1-8]{1,8}) # fourth rank
        /
        ([pnbrqkPNBRQK1-8]{1,8}) # third rank
        /
        ([pnbrqkPNBRQK1-8]{1,8}) # second rank
        /
        ([pnbrqkPNBRQK1-8]{1,8}) # first rank
        \x20
        (b|w)                    # current turn
        \x20
        ([KQkq]{1,4}|-)          # castling rights
        \x20
        ([a-h][36]|-)            # en passant target square
        \x20
        (0|[1-9][0-9]*)          # halfmove clock
        \x20
        ([1-9][0-9]*)            # fullmove number
        $
        ",
    )
    .unwrap()
});

impl Board {
    /// Parses a position in Forsyth-Edwards Notation and checks it is playable.
    pub fn from_fen(fen: &str) -> Result<Self, BoardError> {
        let fen = fen.trim();
        let invalid = |reason: String| BoardError::InvalidFen {
            fen: fen.to_string(),
            reason,
        };

        let caps = FEN
            .captures(fen)
            .ok_or_else(|| invalid("does not match the FEN layout".to_string()))?;

        let mut board = Self::new();

        for rank_capture_index in 1..=8 {
            let rank_str = &caps[rank_capture_index];
            let rank = (8 - rank_capture_index) as u8;
            let mut file: u8 = 0;

            for fen_char in rank_str.chars() {
                if file >= 8 {
                    return Err(invalid(format!("rank {} has more than 8 squares", rank + 1)));
                }
                match Piece::from_fen(fen_char) {
                    Some(piece) => {
                        board.put(Square::from_file_rank(file, rank), piece)?;
                        file += 1;
                    }
                    None => {
                        // must be a run of empty squares
                        let empty_square_count = fen_char
                            .to_digit(10)
                            .ok_or_else(|| invalid(format!("unexpected `{}`", fen_char)))?;
                        file += empty_square_count as u8;
                    }
                }
            }

            if file != 8 {
                return Err(invalid(format!(
                    "rank {} describes {} squares instead of 8",
                    rank + 1,
                    file
                )));
            }
        }

        let turn = if &caps[9] == "w" {
            Color::White
        } else {
            Color::Black
        };
        board.set_turn(turn);

        let castle_rights = CastleRights::from_fen(&caps[10]);
        for &color in Color::ALL.iter() {
            let rank = color.back_rank();
            let king_home = board.get(Square::from_file_rank(4, rank))
                == Some(Piece::new(PieceKind::King, color));
            let rook = Some(Piece::new(PieceKind::Rook, color));
            let wings = [
                (CastleRights::kingside(color), 7),
                (CastleRights::queenside(color), 0),
            ];
            for (right, rook_file) in wings.iter() {
                if castle_rights.contains(*right)
                    && !(king_home && board.get(Square::from_file_rank(*rook_file, rank)) == rook)
                {
                    return Err(invalid(format!(
                        "castling right `{}` without king and rook on their home squares",
                        right
                    )));
                }
            }
        }
        board.set_castle_rights(castle_rights);

        let en_passant_target = match &caps[11] {
            "-" => None,
            target => {
                let square = Square::from_algebraic(target)?;
                let pushed_pawn = square.offset(0, -turn.pawn_direction());
                let expected_rank = match turn {
                    Color::White => 5,
                    Color::Black => 2,
                };
                let pawn = Some(Piece::new(PieceKind::Pawn, turn.opposite()));
                if square.rank() != expected_rank
                    || board.is_occupied(square)
                    || pushed_pawn.map(|pushed| board.get(pushed)) != Some(pawn)
                {
                    return Err(invalid(format!(
                        "en passant target {} does not follow a double pawn push",
                        square
                    )));
                }
                Some(square)
            }
        };
        board.set_en_passant_target(en_passant_target);

        let halfmove_clock = caps[12]
            .parse::<u16>()
            .map_err(|_| invalid("halfmove clock out of range".to_string()))?;
        let fullmove_number = caps[13]
            .parse::<u16>()
            .map_err(|_| invalid("fullmove number out of range".to_string()))?;
        board.set_clocks(halfmove_clock, fullmove_number);

        board.validate()?;
        board.reset_position_history();
        Ok(board)
    }

    pub fn to_fen(&self) -> String {
        let mut fen_rows = vec![];
        for rank in (0..8).rev() {
            let mut row = String::new();
            let mut empty_square_count = 0;
            for file in 0..8 {
                match self.get(Square::from_file_rank(file, rank)) {
                    Some(piece) => {
                        if empty_square_count > 0 {
                            row.push_str(&empty_square_count.to_string());
                        }
                        empty_square_count = 0;
                        row.push(piece.to_fen());
                    }
                    None => empty_square_count += 1,
                }
            }
            if empty_square_count > 0 {
                row.push_str(&empty_square_count.to_string());
            }
            fen_rows.push(row);
        }

        let en_passant = self
            .en_passant_target()
            .map_or_else(|| "-".to_string(), |square| square.to_algebraic());

        format!(
            "{} {} {} {} {} {}",
            fen_rows.join("/"),
            self.turn().to_fen(),
            self.castle_rights(),
            en_passant,
            self.halfmove_clock(),
            self.fullmove_number()
        )
    }
}

impl FromStr for Board {
    type Err = BoardError;

    fn from_str(fen: &str) -> Result<Self, Self::Err> {
        Board::from_fen(fen)
    }
}
