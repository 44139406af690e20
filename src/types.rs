use std::fmt;
use std::ops::Neg;

use serde::{Deserialize, Serialize};

/// Side to move. Black moves first and carries sign `+1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    White,
}

impl Color {
    /// `+1` for Black, `-1` for White.
    pub const fn sign(self) -> i32 {
        match self {
            Self::Black => 1,
            Self::White => -1,
        }
    }

    pub const fn opponent(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }

    pub fn from_sign(sign: i32) -> Option<Self> {
        match sign {
            1 => Some(Self::Black),
            -1 => Some(Self::White),
            _ => None,
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Black => 0,
            Self::White => 1,
        }
    }
}

impl Neg for Color {
    type Output = Self;

    fn neg(self) -> Self {
        self.opponent()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Black => f.write_str("Black"),
            Self::White => f.write_str("White"),
        }
    }
}

/// Node counters for one search invocation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Calls entered, terminal or not.
    pub generated: u64,
    /// Non-terminal calls that ran to completion.
    pub expanded: u64,
}

/// One evaluated position of a principal variation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionReport {
    /// 1-based index along the PV; the initial position is 1.
    pub index: usize,
    /// Moves played from the initial position to reach this one.
    pub ply: usize,
    pub mover: Color,
    /// Score from the mover's perspective.
    pub colored_value: i32,
    /// Score as Black count minus White count.
    pub value: i32,
    pub empties: u8,
    pub expanded: u64,
    pub generated: u64,
    pub seconds: f64,
    pub generated_per_second: f64,
    /// Contract:
    /// - `true` when the transposition cache was active for the whole search.
    /// - `false` when the cache was off or got disabled during this position.
    pub cache_used: bool,
}

/// Result of walking a principal variation backwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PvReport {
    pub algorithm: String,
    pub pv_length: usize,
    pub cache_requested: bool,
    /// Contract:
    /// - `true` when the cache hit resource exhaustion and was switched off.
    pub cache_disabled: bool,
    pub positions: Vec<PositionReport>,
}

impl PvReport {
    pub fn total_generated(&self) -> u64 {
        self.positions.iter().map(|p| p.generated).sum()
    }

    pub fn total_expanded(&self) -> u64 {
        self.positions.iter().map(|p| p.expanded).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_sign_and_negation_are_consistent() {
        assert_eq!(Color::Black.sign(), 1);
        assert_eq!(Color::White.sign(), -1);
        assert_eq!(-Color::Black, Color::White);
        assert_eq!(-(-Color::White), Color::White);
        assert_eq!(Color::from_sign(-1), Some(Color::White));
        assert_eq!(Color::from_sign(0), None);
    }
}
