use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::EngineError;

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// All four directions in code order (`Up=0 .. Right=3`).
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Stable numeric code for this direction.
    #[inline]
    pub fn to_u8(self) -> u8 {
        match self {
            Move::Up => 0,
            Move::Down => 1,
            Move::Left => 2,
            Move::Right => 3,
        }
    }

    /// Up/Down slide columns; Left/Right slide rows.
    #[inline]
    pub fn is_vertical(self) -> bool {
        matches!(self, Move::Up | Move::Down)
    }

    /// Moves toward the high-index edge run the line pass on reversed lines.
    #[inline]
    pub fn is_reversed(self) -> bool {
        matches!(self, Move::Down | Move::Right)
    }
}

impl TryFrom<u8> for Move {
    type Error = EngineError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Move::Up),
            1 => Ok(Move::Down),
            2 => Ok(Move::Left),
            3 => Ok(Move::Right),
            other => Err(EngineError::InvalidDirection(other.to_string())),
        }
    }
}

impl FromStr for Move {
    type Err = EngineError;

    /// Accepts `up`/`down`/`left`/`right` in any case, or `u`/`d`/`l`/`r`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "u" | "up" => Ok(Move::Up),
            "d" | "down" => Ok(Move::Down),
            "l" | "left" => Ok(Move::Left),
            "r" | "right" => Ok(Move::Right),
            _ => Err(EngineError::InvalidDirection(s.to_string())),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Move::Up => "UP",
            Move::Down => "DOWN",
            Move::Left => "LEFT",
            Move::Right => "RIGHT",
        };
        f.write_str(name)
    }
}
