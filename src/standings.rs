//! Standings and final results
//!
//! Everything here is a pure projection over the roster, computed on demand
//! whenever the presentation layer asks for it. Ties are always broken by
//! ascending team id so the same roster yields the same order every time.

use std::cmp::Reverse;

use itertools::Itertools;
use serde::Serialize;

use crate::{
    game::Error,
    round::Round,
    team::{Roster, Team, TeamId},
};

/// A team's line on the standings board
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    /// 1-based position on the board
    pub position: usize,
    /// The team's identifier
    pub id: TeamId,
    /// The team's display name
    pub name: String,
    /// Score in the round the board is showing
    pub round_score: i64,
    /// Cumulative score
    pub total_score: i64,
    /// Whether the team has played this round
    pub has_played: bool,
}

/// A podium position in the final result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    /// The team's identifier
    pub id: TeamId,
    /// The team's display name
    pub name: String,
    /// Score in the championship round (zero if the team did not reach it)
    pub final_round_score: i64,
    /// Cumulative score across the show
    pub total_score: i64,
}

impl From<&Team> for Placement {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id(),
            name: team.name().to_owned(),
            final_round_score: team.round_score_or_zero(Round::Final),
            total_score: team.total_score(),
        }
    }
}

/// The outcome of a completed show
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameResult {
    /// Winner of the championship round
    pub champion: Placement,
    /// Other finalist
    pub runner_up: Placement,
    /// Best remaining team by cumulative score, if any remain
    pub second_runner_up: Option<Placement>,
    /// Championship scoreline, champion first ("120 - 80")
    pub final_round_score: String,
}

/// Teams competing in a round: everyone in round 1, the survivors afterwards
fn eligible(roster: &Roster, round: Round) -> Vec<&Team> {
    match round {
        Round::First => roster.iter().collect_vec(),
        Round::Second | Round::Final => roster.contenders().collect_vec(),
    }
}

/// Ranks the teams eligible for a round by their score in that round
///
/// # Arguments
///
/// * `roster` - The teams of the show
/// * `round` - The round whose scores order the board
///
/// # Returns
///
/// The eligible teams, highest round score first, ties by ascending id
pub fn standings(roster: &Roster, round: Round) -> Vec<Standing> {
    eligible(roster, round)
        .into_iter()
        .sorted_by_key(|team| (Reverse(team.round_score_or_zero(round)), team.id()))
        .enumerate()
        .map(|(i, team)| Standing {
            position: i + 1,
            id: team.id(),
            name: team.name().to_owned(),
            round_score: team.round_score_or_zero(round),
            total_score: team.total_score(),
            has_played: team.has_played_this_round(),
        })
        .collect()
}

/// Ids of the teams that survive a cut of `count` after `round`
pub fn advancing(roster: &Roster, round: Round, count: usize) -> Vec<TeamId> {
    standings(roster, round)
        .into_iter()
        .take(count)
        .map(|standing| standing.id)
        .collect()
}

/// Determines the podium once the championship is over
///
/// Champion and runner-up are decided by championship-round score alone;
/// cumulative totals only matter for the second runner-up, who is the best
/// of the remaining teams by total score.
///
/// # Errors
///
/// Returns `Error::InsufficientFinalists` if fewer than two teams have a
/// championship-round score recorded.
pub fn compute_result(roster: &Roster) -> Result<GameResult, Error> {
    let finalists = roster
        .iter()
        .filter_map(|team| Some((team.round_score(Round::Final)?, team)))
        .sorted_by_key(|(score, team)| (Reverse(*score), team.id()))
        .map(|(_, team)| team)
        .collect_vec();

    let [champion, runner_up, ..] = finalists[..] else {
        return Err(Error::InsufficientFinalists);
    };

    let second_runner_up = roster
        .iter()
        .filter(|team| team.id() != champion.id() && team.id() != runner_up.id())
        .min_by_key(|team| (Reverse(team.total_score()), team.id()))
        .map(Placement::from);

    let champion = Placement::from(champion);
    let runner_up = Placement::from(runner_up);
    let final_round_score = format!(
        "{} - {}",
        champion.final_round_score, runner_up.final_round_score
    );

    Ok(GameResult {
        champion,
        runner_up,
        second_runner_up,
        final_round_score,
    })
}
