use std::fmt;
use std::str::FromStr;

/// Named strength tier. Each game maps a tier to a fixed search depth; depth is the only
/// knob, there is no time-based cutoff.
#[derive(Clone, Copy, PartialEq, Debug, Eq, PartialOrd, Ord, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Grandmaster,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Grandmaster,
    ];
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Medium
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Grandmaster => "grandmaster",
        };
        write!(f, "{}", name)
    }
}

// used for parsing cli args
type ParseError = &'static str;
impl FromStr for Difficulty {
    type Err = ParseError;
    fn from_str(difficulty: &str) -> Result<Self, Self::Err> {
        match difficulty.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "grandmaster" => Ok(Difficulty::Grandmaster),
            _ => Err("invalid difficulty; options are: easy, medium, hard, grandmaster"),
        }
    }
}
