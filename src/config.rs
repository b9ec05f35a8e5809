//! Show configuration
//!
//! The options here fix the shape of a show before it starts: how many
//! teams sit on the initial roster, how many questions each pair plays per
//! round, how many questions the bank must hold per round, and how many
//! teams survive each elimination cut.

use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::{
    constants::{roster, round::*},
    round::Round,
};

/// Static configuration for one round of the show
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct RoundDefinition {
    /// Number of questions each pair plays before their turn ends
    #[garde(range(min = 1, max = MAX_QUESTIONS_PER_PAIR))]
    pub questions_per_pair: usize,
    /// Exact number of questions a bank import must provide for this round
    #[garde(range(min = 1, max = MAX_BANK_QUESTIONS))]
    pub bank_size: usize,
    /// Teams surviving the cut at the end of the round (`None` for the championship)
    #[garde(range(min = MIN_ADVANCING, max = roster::MAX_TEAMS))]
    pub advancing: Option<usize>,
    /// Host-facing explanation of the round format
    #[garde(length(chars, max = MAX_DESCRIPTION_LENGTH))]
    pub description: String,
}

/// Global configuration options for a show
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Options {
    /// Number of teams created on the initial roster
    #[garde(range(min = roster::MIN_TEAMS, max = roster::MAX_TEAMS))]
    pub initial_teams: usize,
    /// Opening elimination round
    #[garde(dive, custom(cut_below(Some(self.initial_teams))))]
    pub first: RoundDefinition,
    /// Second elimination round
    #[garde(dive, custom(cut_below(self.first.advancing)))]
    pub second: RoundDefinition,
    /// Championship round
    #[garde(dive, custom(no_cut))]
    pub championship: RoundDefinition,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            initial_teams: roster::MIN_TEAMS,
            first: RoundDefinition {
                questions_per_pair: 5,
                bank_size: 10,
                advancing: Some(4),
                description: "Teams compete in pairs. Each pair will answer 5 questions.".to_owned(),
            },
            second: RoundDefinition {
                questions_per_pair: 2,
                bank_size: 4,
                advancing: Some(2),
                description: "Teams compete in pairs. Each pair will answer 2 questions.".to_owned(),
            },
            championship: RoundDefinition {
                questions_per_pair: 3,
                bank_size: 3,
                advancing: None,
                description: "Final round! Two teams compete for the championship.".to_owned(),
            },
        }
    }
}

impl Options {
    /// Returns the definition of the given round
    pub fn round(&self, round: Round) -> &RoundDefinition {
        match round {
            Round::First => &self.first,
            Round::Second => &self.second,
            Round::Final => &self.championship,
        }
    }
}

/// An elimination round must cut strictly below the number of teams entering it.
fn cut_below(entering: Option<usize>) -> impl FnOnce(&RoundDefinition, &()) -> garde::Result {
    move |round, _| match (round.advancing, entering) {
        (None, _) => Err(garde::Error::new(
            "elimination round must define how many teams advance",
        )),
        (Some(_), None) => Err(garde::Error::new("previous round does not define a cut")),
        (Some(advancing), Some(entering)) if advancing < entering => Ok(()),
        (Some(_), Some(entering)) => Err(garde::Error::new(format!(
            "must advance fewer than the {entering} teams entering the round"
        ))),
    }
}

fn no_cut(round: &RoundDefinition, _ctx: &()) -> garde::Result {
    match round.advancing {
        None => Ok(()),
        Some(_) => Err(garde::Error::new("the championship does not eliminate teams")),
    }
}
