//! Rounds of the show
//!
//! A show always runs three rounds: two elimination rounds followed by the
//! championship. Rounds double as keys for per-round score buckets and
//! per-round question pools.

use enum_map::Enum;
use serde::{Deserialize, Serialize};

/// One of the three sequential competition phases
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Enum, Serialize, Deserialize,
    derive_more::Display,
)]
pub enum Round {
    /// Opening elimination round played by the full roster
    #[display("Round 1")]
    First,
    /// Second elimination round played by the round-1 survivors
    #[display("Round 2")]
    Second,
    /// Championship round, no further elimination
    #[display("Round 3")]
    Final,
}

impl Round {
    /// All rounds in play order
    pub const ALL: [Round; 3] = [Round::First, Round::Second, Round::Final];

    /// Returns the 1-based round number shown to the audience
    pub fn number(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
            Self::Final => 3,
        }
    }

    /// The round that follows this one, or `None` for the championship
    pub fn next(self) -> Option<Self> {
        match self {
            Self::First => Some(Self::Second),
            Self::Second => Some(Self::Final),
            Self::Final => None,
        }
    }
}
