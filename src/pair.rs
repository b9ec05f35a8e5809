//! The pair currently on stage

use serde::Serialize;

use crate::{
    round::Round,
    team::{Team, TeamId},
};

/// Order-independent identifier of two paired teams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::Display)]
#[display("{_0}-{_1}")]
pub struct PairId(TeamId, TeamId);

impl PairId {
    /// Builds the id of a pair; the argument order does not matter
    pub fn new(a: TeamId, b: TeamId) -> Self {
        if a <= b { Self(a, b) } else { Self(b, a) }
    }

    /// The two team ids, lowest first
    pub fn teams(self) -> (TeamId, TeamId) {
        (self.0, self.1)
    }
}

/// Snapshot of one team for the duration of its pair's turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairTeam {
    /// The team's identifier
    pub id: TeamId,
    /// The team's display name when the pair was confirmed
    pub name: String,
    /// Points earned during this turn only, for live display
    pub pair_score: i64,
    /// Board answers attributed to the team during this turn
    pub answered: u32,
    #[serde(skip)]
    round_score_at_start: i64,
}

impl PairTeam {
    fn new(team: &Team, round: Round) -> Self {
        Self {
            id: team.id(),
            name: team.name().to_owned(),
            pair_score: 0,
            answered: 0,
            round_score_at_start: team.round_score_or_zero(round),
        }
    }

    /// Round score the team had when the pair was confirmed
    pub(crate) fn round_score_at_start(&self) -> i64 {
        self.round_score_at_start
    }
}

/// Two teams competing on a shared sequence of questions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivePair {
    /// Key of the pair
    pub pair_id: PairId,
    /// First selected team
    pub team1: PairTeam,
    /// Second selected team
    pub team2: PairTeam,
    /// 1-based number of the question being played
    pub question_number: usize,
    /// Questions this pair plays in the current round
    pub questions_per_pair: usize,
}

impl ActivePair {
    /// Snapshots both teams with their turn scores at zero
    pub fn new(team1: &Team, team2: &Team, round: Round, questions_per_pair: usize) -> Self {
        Self {
            pair_id: PairId::new(team1.id(), team2.id()),
            team1: PairTeam::new(team1, round),
            team2: PairTeam::new(team2, round),
            question_number: 1,
            questions_per_pair,
        }
    }

    /// Whether a team belongs to the pair
    pub fn contains(&self, id: TeamId) -> bool {
        self.member(id).is_some()
    }

    /// The pair's snapshot of a team
    pub fn member(&self, id: TeamId) -> Option<&PairTeam> {
        [&self.team1, &self.team2]
            .into_iter()
            .find(|member| member.id == id)
    }

    pub(crate) fn member_mut(&mut self, id: TeamId) -> Option<&mut PairTeam> {
        [&mut self.team1, &mut self.team2]
            .into_iter()
            .find(|member| member.id == id)
    }

    /// Whether the question being played is the pair's last one
    pub fn on_last_question(&self) -> bool {
        self.question_number >= self.questions_per_pair
    }
}
