use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;

use crate::error::GameError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

/// Board shape and mine count for one difficulty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Preset {
    pub rows: usize,
    pub cols: usize,
    pub mines: usize,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub const fn preset(self) -> Preset {
        match self {
            Self::Easy => Preset { rows: 9, cols: 9, mines: 10 },
            Self::Medium => Preset { rows: 16, cols: 16, mines: 40 },
            Self::Hard => Preset { rows: 16, cols: 30, mines: 99 },
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "e" => Ok(Self::Easy),
            "medium" | "m" => Ok(Self::Medium),
            "hard" | "h" => Ok(Self::Hard),
            _ => Err(GameError::InvalidDifficulty(s.to_string())),
        }
    }
}
