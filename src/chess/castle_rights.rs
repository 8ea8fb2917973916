use std::fmt;

use super::color::Color;

/// Remaining castling rights, one bit per side and wing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CastleRights(u8);

impl CastleRights {
    pub const fn white_kingside() -> Self {
        Self(0b1000)
    }

    pub const fn black_kingside() -> Self {
        Self(0b0100)
    }

    pub const fn white_queenside() -> Self {
        Self(0b0010)
    }

    pub const fn black_queenside() -> Self {
        Self(0b0001)
    }

    pub const fn all() -> Self {
        Self(
            Self::white_kingside().0
                | Self::black_kingside().0
                | Self::white_queenside().0
                | Self::black_queenside().0,
        )
    }

    pub const fn none() -> Self {
        Self(0)
    }

    pub fn kingside(color: Color) -> Self {
        match color {
            Color::White => Self::white_kingside(),
            Color::Black => Self::black_kingside(),
        }
    }

    pub fn queenside(color: Color) -> Self {
        match color {
            Color::White => Self::white_queenside(),
            Color::Black => Self::black_queenside(),
        }
    }

    pub fn both(color: Color) -> Self {
        Self::kingside(color) | Self::queenside(color)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: CastleRights) -> bool {
        (self.0 & other.0) == other.0
    }

    pub const fn without(self, other: CastleRights) -> CastleRights {
        CastleRights(self.0 & !other.0)
    }

    /// The rights with white and black exchanged.
    pub fn color_flipped(self) -> CastleRights {
        let mut flipped = CastleRights::none();
        for &color in Color::ALL.iter() {
            if self.contains(Self::kingside(color)) {
                flipped = flipped | Self::kingside(color.opposite());
            }
            if self.contains(Self::queenside(color)) {
                flipped = flipped | Self::queenside(color.opposite());
            }
        }
        flipped
    }

    /// Parses the castling field of a FEN record (`KQkq`, any subset, or `-`).
    pub fn from_fen(field: &str) -> Self {
        let mut rights = CastleRights::none();
        for c in field.chars() {
            rights = rights
                | match c {
                    'K' => Self::white_kingside(),
                    'Q' => Self::white_queenside(),
                    'k' => Self::black_kingside(),
                    'q' => Self::black_queenside(),
                    _ => CastleRights::none(),
                };
        }
        rights
    }
}

impl Default for CastleRights {
    fn default() -> Self {
        Self::none()
    }
}

impl std::ops::BitOr for CastleRights {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Display for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        let flags = [
            (Self::white_kingside(), 'K'),
            (Self::white_queenside(), 'Q'),
            (Self::black_kingside(), 'k'),
            (Self::black_queenside(), 'q'),
        ];
        for (right, c) in flags.iter() {
            if self.contains(*right) {
                write!(f, "{}", c)?;
            }
        }
        Ok(())
    }
}
