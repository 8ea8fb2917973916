use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use super::error::BoardError;

static ALGEBRAIC_SQUARE: Lazy<Regex> = Lazy::new(|| Regex::new("^([a-hA-H])([1-8])$").unwrap());

/// A square on the board, indexed `file + 8 * rank` so that a1 is 0 and h8 is 63.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(u8);

pub const A1: Square = Square(0);
pub const B1: Square = Square(1);
pub const C1: Square = Square(2);
pub const D1: Square = Square(3);
pub const E1: Square = Square(4);
pub const F1: Square = Square(5);
pub const G1: Square = Square(6);
pub const H1: Square = Square(7);
pub const A2: Square = Square(8);
pub const B2: Square = Square(9);
pub const C2: Square = Square(10);
pub const D2: Square = Square(11);
pub const E2: Square = Square(12);
pub const F2: Square = Square(13);
pub const G2: Square = Square(14);
pub const H2: Square = Square(15);
pub const A3: Square = Square(16);
pub const B3: Square = Square(17);
pub const C3: Square = Square(18);
pub const D3: Square = Square(19);
pub const E3: Square = Square(20);
pub const F3: Square = Square(21);
pub const G3: Square = Square(22);
pub const H3: Square = Square(23);
pub const A4: Square = Square(24);
pub const B4: Square = Square(25);
pub const C4: Square = Square(26);
pub const D4: Square = Square(27);
pub const E4: Square = Square(28);
pub const F4: Square = Square(29);
pub const G4: Square = Square(30);
pub const H4: Square = Square(31);
pub const A5: Square = Square(32);
pub const B5: Square = Square(33);
pub const C5: Square = Square(34);
pub const D5: Square = Square(35);
pub const E5: Square = Square(36);
pub const F5: Square = Square(37);
pub const G5: Square = Square(38);
pub const H5: Square = Square(39);
pub const A6: Square = Square(40);
pub const B6: Square = Square(41);
pub const C6: Square = Square(42);
pub const D6: Square = Square(43);
pub const E6: Square = Square(44);
pub const F6: Square = Square(45);
pub const G6: Square = Square(46);
pub const H6: Square = Square(47);
pub const A7: Square = Square(48);
pub const B7: Square = Square(49);
pub const C7: Square = Square(50);
pub const D7: Square = Square(51);
pub const E7: Square = Square(52);
pub const F7: Square = Square(53);
pub const G7: Square = Square(54);
pub const H7: Square = Square(55);
pub const A8: Square = Square(56);
pub const B8: Square = Square(57);
pub const C8: Square = Square(58);
pub const D8: Square = Square(59);
pub const E8: Square = Square(60);
pub const F8: Square = Square(61);
pub const G8: Square = Square(62);
pub const H8: Square = Square(63);

impl Square {
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    pub const fn from_file_rank(file: u8, rank: u8) -> Self {
        Self(file + rank * 8)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn file(self) -> u8 {
        self.0 % 8
    }

    pub const fn rank(self) -> u8 {
        self.0 / 8
    }

    /// The square `file_delta` files and `rank_delta` ranks away, if it is on the board.
    pub fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Square> {
        let file = self.file() as i8 + file_delta;
        let rank = self.rank() as i8 + rank_delta;
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Some(Square::from_file_rank(file as u8, rank as u8))
        } else {
            None
        }
    }

    /// The same square seen from the other side of the board.
    pub const fn flip_rank(self) -> Square {
        Square::from_file_rank(self.file(), 7 - self.rank())
    }

    /// Every square in generation order, a1 through h8.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(Square)
    }

    pub fn from_algebraic(algebraic_coord: &str) -> Result<Self, BoardError> {
        let invalid = || BoardError::InvalidSquare {
            notation: algebraic_coord.to_string(),
        };
        let caps = ALGEBRAIC_SQUARE.captures(algebraic_coord).ok_or_else(invalid)?;
        let file_char = caps[1].chars().next().ok_or_else(invalid)?;
        let rank_char = caps[2].chars().next().ok_or_else(invalid)?;

        let file = file_char.to_ascii_lowercase() as u8 - b'a';
        let rank = rank_char as u8 - b'1';
        Ok(Square::from_file_rank(file, rank))
    }

    pub fn to_algebraic(self) -> String {
        let file = (b'a' + self.file()) as char;
        let rank = (b'1' + self.rank()) as char;
        format!("{}{}", file, rank)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

impl FromStr for Square {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::from_algebraic(s)
    }
}
