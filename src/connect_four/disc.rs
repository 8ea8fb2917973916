use std::fmt;

/// Owner of a disc. Red always drops first and is the maximizing side.
#[derive(Clone, Copy, PartialEq, Debug, Eq, Hash)]
pub enum Disc {
    Red,
    Yellow,
}

impl Disc {
    pub fn opposite(&self) -> Self {
        match self {
            Disc::Red => Disc::Yellow,
            Disc::Yellow => Disc::Red,
        }
    }

    pub fn maximize_score(&self) -> bool {
        match self {
            Disc::Red => true,
            Disc::Yellow => false,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Disc::Red => 'X',
            Disc::Yellow => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'X' | 'x' => Some(Disc::Red),
            'O' | 'o' => Some(Disc::Yellow),
            _ => None,
        }
    }
}

impl fmt::Display for Disc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let disc_str = match self {
            Disc::Red => "red",
            Disc::Yellow => "yellow",
        };
        write!(f, "{}", disc_str)
    }
}
