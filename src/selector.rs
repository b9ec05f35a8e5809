//! Question selection without repetition
//!
//! Each game owns one selector. The selector remembers which bank questions
//! were already played in the current round and draws the next one at random
//! from those that remain. Pools are small compared to the number of pairs,
//! so an exhausted pool is replayed instead of failing.

use std::collections::BTreeSet;

use enum_map::EnumMap;
use itertools::Itertools;
use serde::Serialize;

use crate::{
    bank::{BankQuestion, FALLBACK_PROMPTS, QuestionBank},
    round::Round,
};

/// Where the next question comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Pick {
    /// 0-based position in the round's authored pool
    Bank(usize),
    /// 0-based position in the generic fallback list (the round has no pool)
    Fallback(usize),
}

impl Pick {
    /// Resolves the pick to the question it designates
    pub fn question(self, round: Round, bank: &QuestionBank) -> BankQuestion {
        match self {
            Self::Bank(index) => bank
                .question(round, index)
                .cloned()
                .unwrap_or_else(|| BankQuestion::fallback(index)),
            Self::Fallback(index) => BankQuestion::fallback(index),
        }
    }
}

/// Per-game question selection history with an injected random source
#[derive(Debug)]
pub struct QuestionSelector {
    rng: fastrand::Rng,
    /// Indices already played per round since the last reset
    consumed: EnumMap<Round, BTreeSet<usize>>,
    /// Most recent bank pick per round
    last: EnumMap<Round, Option<usize>>,
    /// Most recent fallback pick, shared across rounds
    last_fallback: Option<usize>,
}

impl QuestionSelector {
    /// Creates a selector drawing from the given random source
    pub fn new(rng: fastrand::Rng) -> Self {
        Self {
            rng,
            consumed: EnumMap::default(),
            last: EnumMap::default(),
            last_fallback: None,
        }
    }

    /// Picks the next question for a round
    ///
    /// Unplayed questions are drawn uniformly. Once every question of the
    /// round has been played, the history restarts with a fresh pick that
    /// avoids repeating the previous one whenever the pool has more than one
    /// question. Rounds without authored questions draw from the fallback
    /// list, again avoiding an immediate repeat.
    ///
    /// # Arguments
    ///
    /// * `round` - The round being played
    /// * `bank` - The authored question pools
    ///
    /// # Returns
    ///
    /// The chosen question's position, tagged with its source
    pub fn next_index(&mut self, round: Round, bank: &QuestionBank) -> Pick {
        let size = bank.len(round);
        if size == 0 {
            let avoid = self.last_fallback;
            let pick = self.draw(FALLBACK_PROMPTS.len(), avoid, |_| true);
            self.last_fallback = Some(pick);
            return Pick::Fallback(pick);
        }

        let consumed = self.consumed[round].clone();
        let pick = if (0..size).all(|i| consumed.contains(&i)) {
            let avoid = self.last[round];
            let pick = self.draw(size, avoid, |_| true);
            self.consumed[round] = BTreeSet::from([pick]);
            pick
        } else {
            let pick = self.draw(size, None, |i| !consumed.contains(&i));
            self.consumed[round].insert(pick);
            pick
        };

        self.last[round] = Some(pick);
        Pick::Bank(pick)
    }

    /// Forgets the selection history of a round
    pub fn reset(&mut self, round: Round) {
        self.consumed[round].clear();
        self.last[round] = None;
    }

    /// Indices played in a round since its history was last reset
    pub fn consumed(&self, round: Round) -> &BTreeSet<usize> {
        &self.consumed[round]
    }

    /// Draws uniformly from `0..size`, honoring `allowed` and skipping
    /// `avoid` unless it is the only candidate.
    fn draw<F: Fn(usize) -> bool>(
        &mut self,
        size: usize,
        avoid: Option<usize>,
        allowed: F,
    ) -> usize {
        let candidates = (0..size)
            .filter(|&i| allowed(i))
            .filter(|&i| size == 1 || Some(i) != avoid)
            .collect_vec();
        self.rng.choice(candidates).unwrap_or_default()
    }
}
