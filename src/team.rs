//! Teams and the roster
//!
//! Each team record doubles as its own score ledger: points are credited to
//! the bucket of the round being played and to the running total in the
//! same step, so the total always equals the sum of the round buckets.

use enum_map::EnumMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    constants::roster::{MAX_TEAMS, MIN_TEAMS},
    game::Error,
    names,
    round::Round,
};

/// Unique positive identifier of a team
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct TeamId(u32);

impl TeamId {
    /// Returns the raw number shown next to the team name
    pub fn get(self) -> u32 {
        self.0
    }
}

/// A competing team and its score ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Team {
    id: TeamId,
    name: String,
    total_score: i64,
    answered_count: u32,
    has_played_this_round: bool,
    is_eliminated: bool,
    /// `None` for rounds the team never entered
    round_scores: EnumMap<Round, Option<i64>>,
}

impl Team {
    /// Creates a team with an empty ledger
    pub fn new(id: TeamId, name: String) -> Self {
        Self {
            id,
            name,
            total_score: 0,
            answered_count: 0,
            has_played_this_round: false,
            is_eliminated: false,
            round_scores: EnumMap::default(),
        }
    }

    /// The team's identifier
    pub fn id(&self) -> TeamId {
        self.id
    }

    /// The team's display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cumulative score across every round entered
    pub fn total_score(&self) -> i64 {
        self.total_score
    }

    /// Number of board answers attributed to the team
    pub fn answered_count(&self) -> u32 {
        self.answered_count
    }

    /// Whether the team has been part of a pair since the round began
    pub fn has_played_this_round(&self) -> bool {
        self.has_played_this_round
    }

    /// Whether the team was cut at an earlier round boundary
    pub fn is_eliminated(&self) -> bool {
        self.is_eliminated
    }

    /// Score recorded for a round, or `None` if the team never entered it
    pub fn round_score(&self, round: Round) -> Option<i64> {
        self.round_scores[round]
    }

    /// Score for a round, counting rounds never entered as zero
    pub fn round_score_or_zero(&self, round: Round) -> i64 {
        self.round_scores[round].unwrap_or_default()
    }

    /// Whether the running total matches the round buckets
    pub fn ledger_balanced(&self) -> bool {
        self.round_scores
            .values()
            .flatten()
            .try_fold(0_i64, |sum, &score| sum.checked_add(score))
            == Some(self.total_score)
    }

    /// Opens the round's score bucket and clears the played flag
    pub(crate) fn enter_round(&mut self, round: Round) {
        self.round_scores[round].get_or_insert(0);
        self.has_played_this_round = false;
    }

    /// Clears the played flag without opening a bucket
    pub(crate) fn leave_round(&mut self) {
        self.has_played_this_round = false;
    }

    /// Credits points (possibly negative) to a round and to the total
    ///
    /// Nothing changes if either sum would overflow.
    ///
    /// # Errors
    ///
    /// Returns `Error::ScoreOverflow` if the round score or the total would
    /// leave the `i64` range.
    pub(crate) fn credit(&mut self, round: Round, points: i64) -> Result<i64, Error> {
        let (Some(round_score), Some(total_score)) = (
            self.round_score_or_zero(round).checked_add(points),
            self.total_score.checked_add(points),
        ) else {
            return Err(Error::ScoreOverflow(self.id));
        };
        self.round_scores[round] = Some(round_score);
        self.total_score = total_score;
        Ok(round_score)
    }

    pub(crate) fn record_answer(&mut self) {
        self.answered_count += 1;
    }

    pub(crate) fn mark_played(&mut self) {
        self.has_played_this_round = true;
    }

    pub(crate) fn eliminate(&mut self) {
        self.is_eliminated = true;
    }

    pub(crate) fn rename(&mut self, name: String) {
        self.name = name;
    }
}

/// The ordered collection of teams in a show
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Roster {
    /// Kept sorted by id
    teams: Vec<Team>,
}

impl Roster {
    /// Creates `count` teams numbered from 1 and named "Team N"
    pub fn with_default_teams(count: usize) -> Self {
        Self {
            teams: (1..=count as u32)
                .map(|id| Team::new(TeamId(id), format!("Team {id}")))
                .collect(),
        }
    }

    /// Number of teams on the roster
    pub fn len(&self) -> usize {
        self.teams.len()
    }

    /// Whether the roster holds no teams
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Iterates over every team in id order
    pub fn iter(&self) -> impl Iterator<Item = &Team> {
        self.teams.iter()
    }

    /// Iterates over the teams still in contention
    pub fn contenders(&self) -> impl Iterator<Item = &Team> {
        self.teams.iter().filter(|team| !team.is_eliminated)
    }

    /// Looks up a team
    pub fn get(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|team| team.id == id)
    }

    /// Looks up a team, failing with `Error::UnknownTeam`
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownTeam` if no team has the id.
    pub fn require(&self, id: TeamId) -> Result<&Team, Error> {
        self.get(id).ok_or(Error::UnknownTeam(id))
    }

    pub(crate) fn require_mut(&mut self, id: TeamId) -> Result<&mut Team, Error> {
        self.teams
            .iter_mut()
            .find(|team| team.id == id)
            .ok_or(Error::UnknownTeam(id))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Team> {
        self.teams.iter_mut()
    }

    /// Appends a team with the next free id
    ///
    /// # Errors
    ///
    /// Returns `Error::TooManyTeams` once the roster holds the maximum.
    pub(crate) fn add(&mut self) -> Result<TeamId, Error> {
        if self.teams.len() >= MAX_TEAMS {
            return Err(Error::TooManyTeams);
        }
        let id = TeamId(self.teams.iter().map(|team| team.id.0).max().unwrap_or(0) + 1);
        let name = self.unused_name(id);
        self.teams.push(Team::new(id, name));
        Ok(id)
    }

    /// Removes a team
    ///
    /// # Errors
    ///
    /// * `Error::UnknownTeam` - no team has the id
    /// * `Error::TooFewTeams` - the roster is already at the minimum
    pub(crate) fn remove(&mut self, id: TeamId) -> Result<Team, Error> {
        let position = self
            .teams
            .iter()
            .position(|team| team.id == id)
            .ok_or(Error::UnknownTeam(id))?;
        if self.teams.len() <= MIN_TEAMS {
            return Err(Error::TooFewTeams);
        }
        Ok(self.teams.remove(position))
    }

    /// Renames a team after validating the name
    ///
    /// # Errors
    ///
    /// * `Error::UnknownTeam` - no team has the id
    /// * `Error::InvalidName` - the name failed validation
    pub(crate) fn rename(&mut self, id: TeamId, name: &str) -> Result<&str, Error> {
        self.require(id)?;
        let name = names::clean(
            name,
            self.teams
                .iter()
                .filter(|team| team.id != id)
                .map(|team| team.name.as_str()),
        )
        .map_err(Error::InvalidName)?;

        let team = self.require_mut(id)?;
        team.rename(name);
        Ok(team.name())
    }

    /// Ids of the contenders that have not played yet this round
    pub fn waiting(&self) -> Vec<TeamId> {
        self.contenders()
            .filter(|team| !team.has_played_this_round)
            .map(Team::id)
            .collect_vec()
    }

    fn unused_name(&self, id: TeamId) -> String {
        let taken = |candidate: &str| {
            self.teams
                .iter()
                .any(|team| team.name.eq_ignore_ascii_case(candidate))
        };
        let base = format!("Team {id}");
        if !taken(&base) {
            return base;
        }
        (2..)
            .map(|n| format!("{base} ({n})"))
            .find(|candidate| !taken(candidate))
            .unwrap_or(base)
    }
}
