pub mod cache;
pub mod scout;
pub mod search;
#[cfg(test)]
pub(crate) mod testutil;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SolverError;

/// The exact search algorithms the driver can run along a PV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Negamax,
    AlphaBeta,
    Scout,
    Negascout,
}

impl Algorithm {
    pub const ALL: [Self; 4] = [Self::Negamax, Self::AlphaBeta, Self::Scout, Self::Negascout];

    /// Maps the numeric ids 1-4 used on the command line and in JS.
    pub fn from_id(id: u8) -> Result<Self, SolverError> {
        match id {
            1 => Ok(Self::Negamax),
            2 => Ok(Self::AlphaBeta),
            3 => Ok(Self::Scout),
            4 => Ok(Self::Negascout),
            _ => Err(SolverError::UnknownAlgorithm(id)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Negamax => "Negamax (minmax version)",
            Self::AlphaBeta => "Negamax (alpha-beta version)",
            Self::Scout => "Scout",
            Self::Negascout => "Negascout",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
