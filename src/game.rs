//! Core game logic and state management
//!
//! This module contains the main game struct, which owns the roster, the
//! question bank and the live turn state. Every host action maps to one
//! method here (or in [`crate::scoring`]); each method either applies all of
//! its effects or is rejected before anything changes.

use std::fmt::Debug;

use garde::Validate;
use once_cell_serde::sync::OnceCell;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::{
    Snapshot,
    bank::{self, ImportQuestion, QuestionBank},
    config::{Options, RoundDefinition},
    extra::ExtraQuestions,
    names,
    pair::ActivePair,
    question::ActiveQuestion,
    round::Round,
    selector::QuestionSelector,
    standings::{self, GameResult, Standing},
    team::{Roster, Team, TeamId},
};

/// Represents the current phase of the show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum Phase {
    /// Roster and questions are being prepared
    Setup,
    /// A round is under way and no team is selected
    RoundInProgress,
    /// The host is choosing the next two teams
    PairSelection,
    /// A pair is playing its questions
    PairInProgress,
    /// Every team able to play this round has played
    RoundCompleted,
    /// The championship is over
    GameFinished,
}

/// How a caller should treat an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    /// Operator misuse; show a notification and carry on
    Recoverable,
    /// The presentation layer referenced something that does not exist
    Reference,
    /// The show cannot produce a result
    Terminal,
}

/// Errors returned by game operations
///
/// No operation mutates state when it returns an error.
#[derive(Error, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Confirming a pair requires exactly two selected teams
    #[error("select exactly two teams to start")]
    IncompletePairSelection,
    /// The team already played in this round
    #[error("team {0} has already played in this round")]
    TeamAlreadyPlayed(TeamId),
    /// The team was eliminated in an earlier round
    #[error("team {0} has been eliminated")]
    TeamEliminated(TeamId),
    /// Answers can only be attributed to a team of the active pair
    #[error("team {0} is not part of the current pair")]
    TeamNotInPair(TeamId),
    /// The answer is not on screen or was already attributed
    #[error("answer {0} is not revealed")]
    AnswerNotRevealed(usize),
    /// The round still has teams waiting to play
    #[error("the current round is not completed")]
    RoundNotCompleted,
    /// There is no round after the championship
    #[error("the championship is the last round")]
    NoFurtherRound,
    /// The operation is not available in the current phase
    #[error("not available while in {0}")]
    WrongPhase(Phase),
    /// The operation needs a pair on stage
    #[error("no pair is playing")]
    NoActivePair,
    /// The award would push a score past the representable range
    #[error("score of team {0} would overflow")]
    ScoreOverflow(TeamId),
    /// The roster is full
    #[error("a show can have at most {} teams", crate::constants::roster::MAX_TEAMS)]
    TooManyTeams,
    /// The roster cannot shrink further
    #[error("a show needs at least {} teams", crate::constants::roster::MIN_TEAMS)]
    TooFewTeams,
    /// A team name was rejected
    #[error("invalid team name: {0}")]
    InvalidName(#[from] names::Error),
    /// A question import or manual question was rejected
    #[error(transparent)]
    InvalidBank(#[from] bank::Error),
    /// No team has the given id
    #[error("unknown team {0}")]
    UnknownTeam(TeamId),
    /// No answer has the given rank
    #[error("unknown answer slot {0}")]
    UnknownQuestionSlot(usize),
    /// No extra question has the given id
    #[error("unknown extra question {0}")]
    UnknownExtraQuestion(u32),
    /// Fewer than two teams have a championship score
    #[error("fewer than two teams reached the championship")]
    InsufficientFinalists,
}

impl Error {
    /// Classifies the error for the presentation layer
    pub fn severity(&self) -> Severity {
        match self {
            Self::UnknownTeam(_) | Self::UnknownQuestionSlot(_) | Self::UnknownExtraQuestion(_) => {
                Severity::Reference
            }
            Self::InsufficientFinalists => Severity::Terminal,
            _ => Severity::Recoverable,
        }
    }

    /// Emits the error as a log event matching its severity
    pub(crate) fn logged(self) -> Self {
        match self.severity() {
            Severity::Recoverable => warn!(error = %self, "host action rejected"),
            Severity::Reference | Severity::Terminal => error!(error = %self, "integration error"),
        }
        self
    }
}

/// What happened when the host moved past the current question
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Advance {
    /// A new question is on the board
    NextQuestion {
        /// 1-based number of the new question within the pair's turn
        question_number: usize,
    },
    /// The pair played its last question and left the stage
    PairFinished(ActivePair),
}

/// A complete show: roster, questions, round progression and live turn state
pub struct Game {
    options: Options,
    bank: QuestionBank,
    roster: Roster,
    round: Round,
    phase: Phase,
    /// Selection buffer, oldest first, at most two teams
    selected: Vec<TeamId>,
    pair: Option<ActivePair>,
    pub(crate) question: Option<ActiveQuestion>,
    selector: QuestionSelector,
    extras: ExtraQuestions,
    result: OnceCell<GameResult>,
}

impl Debug for Game {
    /// Custom debug implementation that avoids printing large amounts of data
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("round", &self.round)
            .field("phase", &self.phase)
            .field("teams", &self.roster.len())
            .finish_non_exhaustive()
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::from_parts(Options::default(), fastrand::Rng::new())
    }
}

// Construction and read-only access
impl Game {
    /// Creates a show with the default format and an entropy-seeded selector
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a show with a custom format and random source
    ///
    /// # Arguments
    ///
    /// * `options` - The show format
    /// * `rng` - Random source for question selection; seed it for reproducible shows
    ///
    /// # Errors
    ///
    /// Returns the validation report if the options are out of bounds.
    pub fn with_options(options: Options, rng: fastrand::Rng) -> Result<Self, garde::Report> {
        options.validate()?;
        Ok(Self::from_parts(options, rng))
    }

    fn from_parts(options: Options, rng: fastrand::Rng) -> Self {
        Self {
            roster: Roster::with_default_teams(options.initial_teams),
            options,
            bank: QuestionBank::default(),
            round: Round::First,
            phase: Phase::Setup,
            selected: Vec::new(),
            pair: None,
            question: None,
            selector: QuestionSelector::new(rng),
            extras: ExtraQuestions::new(),
            result: OnceCell::new(),
        }
    }

    /// The show format
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The authored question pools
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Every team of the show
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Looks up a team
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownTeam` if no team has the id.
    pub fn team(&self, id: TeamId) -> Result<&Team, Error> {
        self.roster.require(id)
    }

    /// The round being played (round 1 during setup)
    pub fn round(&self) -> Round {
        self.round
    }

    /// Configuration of the round being played
    pub fn round_definition(&self) -> &RoundDefinition {
        self.options.round(self.round)
    }

    /// The current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Teams held in the selection buffer, oldest first
    pub fn selected_teams(&self) -> &[TeamId] {
        &self.selected
    }

    /// The pair on stage
    pub fn active_pair(&self) -> Option<&ActivePair> {
        self.pair.as_ref()
    }

    /// The question on the board
    pub fn active_question(&self) -> Option<&ActiveQuestion> {
        self.question.as_ref()
    }

    /// The extra question pool
    pub fn extra_questions(&self) -> &ExtraQuestions {
        &self.extras
    }

    /// Whether every team able to play this round has played
    pub fn round_completed(&self) -> bool {
        matches!(self.phase, Phase::RoundCompleted | Phase::GameFinished)
    }

    /// Whether the championship is over
    pub fn is_game_finished(&self) -> bool {
        self.phase == Phase::GameFinished
    }

    /// The standings board for the current round
    pub fn standings(&self) -> Vec<Standing> {
        standings::standings(&self.roster, self.round)
    }

    /// Teams that would survive the cut if the round ended now
    ///
    /// Empty during the championship, which has no cut.
    pub fn advancing_preview(&self) -> Vec<TeamId> {
        self.round_definition()
            .advancing
            .map(|count| standings::advancing(&self.roster, self.round, count))
            .unwrap_or_default()
    }

    /// The final result
    ///
    /// # Errors
    ///
    /// * `Error::WrongPhase` - the championship is not over yet
    /// * `Error::InsufficientFinalists` - the championship data cannot produce a podium
    pub fn result(&self) -> Result<&GameResult, Error> {
        if self.phase != Phase::GameFinished {
            return Err(Error::WrongPhase(self.phase));
        }
        self.result.get().ok_or(Error::InsufficientFinalists)
    }

    /// Captures everything the presentation layer renders
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            round: self.round,
            round_number: self.round.number(),
            round_definition: self.round_definition().clone(),
            phase: self.phase,
            round_completed: self.round_completed(),
            teams: self.roster.clone(),
            selected: self.selected.clone(),
            active_pair: self.pair.clone(),
            active_question: self.question.clone(),
            standings: self.standings(),
            advancing: self.advancing_preview(),
            extra_questions: self.extras.clone(),
            result: self.result.get().cloned(),
        }
    }

    pub(crate) fn pair_mut(&mut self) -> Option<&mut ActivePair> {
        self.pair.as_mut()
    }

    pub(crate) fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    fn expect_phase(&self, allowed: &[Phase]) -> Result<(), Error> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(Error::WrongPhase(self.phase).logged())
        }
    }
}

// Setup
impl Game {
    /// Adds a team named after its new id
    ///
    /// # Errors
    ///
    /// * `Error::WrongPhase` - the show has started
    /// * `Error::TooManyTeams` - the roster is full
    pub fn add_team(&mut self) -> Result<TeamId, Error> {
        self.expect_phase(&[Phase::Setup])?;
        let id = self.roster.add().map_err(Error::logged)?;
        info!(team = %id, "team added");
        Ok(id)
    }

    /// Removes a team from the roster
    ///
    /// # Errors
    ///
    /// * `Error::WrongPhase` - the show has started
    /// * `Error::UnknownTeam` - no team has the id
    /// * `Error::TooFewTeams` - the roster is at the minimum
    pub fn remove_team(&mut self, id: TeamId) -> Result<(), Error> {
        self.expect_phase(&[Phase::Setup])?;
        let team = self.roster.remove(id).map_err(Error::logged)?;
        info!(team = %id, name = team.name(), "team removed");
        Ok(())
    }

    /// Renames a team; allowed at any point of the show
    ///
    /// # Errors
    ///
    /// * `Error::UnknownTeam` - no team has the id
    /// * `Error::InvalidName` - the name failed validation
    pub fn rename_team(&mut self, id: TeamId, name: &str) -> Result<&str, Error> {
        let name = self.roster.rename(id, name).map_err(Error::logged)?;
        debug!(team = %id, name, "team renamed");
        Ok(name)
    }

    /// Replaces the question bank
    ///
    /// The bank is checked against this show's round sizes, so a bank built
    /// for a different format, or one with unfilled slots, is refused.
    ///
    /// # Errors
    ///
    /// * `Error::WrongPhase` - the show has started
    /// * `Error::InvalidBank` - the bank does not fit the format; the bank is unchanged
    pub fn load_bank(&mut self, bank: &QuestionBank) -> Result<(), Error> {
        self.expect_phase(&[Phase::Setup])?;
        let bank = QuestionBank::validate(&bank.to_import(), &self.options)
            .map_err(|e| Error::from(e).logged())?;
        self.install_bank(bank);
        Ok(())
    }

    /// Parses, validates and loads a question import document
    ///
    /// # Errors
    ///
    /// * `Error::WrongPhase` - the show has started
    /// * `Error::InvalidBank` - the document was rejected; the bank is unchanged
    pub fn import_bank_json(&mut self, json: &str) -> Result<(), Error> {
        self.expect_phase(&[Phase::Setup])?;
        let bank = QuestionBank::from_json(json, &self.options)
            .map_err(|e| Error::from(e).logged())?;
        self.install_bank(bank);
        Ok(())
    }

    fn install_bank(&mut self, bank: QuestionBank) {
        self.bank = bank;
        for round in Round::ALL {
            self.selector.reset(round);
        }
        info!("question bank loaded");
    }

    /// The downloadable template for the configured round sizes
    pub fn bank_template(&self) -> String {
        QuestionBank::template(&self.options)
            .to_import()
            .to_json_pretty()
    }

    /// Authors a single bank slot by hand
    ///
    /// # Errors
    ///
    /// * `Error::WrongPhase` - the show is over
    /// * `Error::InvalidBank` - the slot or question was rejected
    pub fn configure_question(
        &mut self,
        round: Round,
        slot: usize,
        question: &ImportQuestion,
    ) -> Result<(), Error> {
        if self.phase == Phase::GameFinished {
            return Err(Error::WrongPhase(self.phase).logged());
        }
        self.bank
            .set_question(round, slot, question, &self.options)
            .map_err(|e| Error::from(e).logged())?;
        debug!(%round, slot, "question configured");
        Ok(())
    }

    /// Leaves setup and opens round 1
    ///
    /// # Errors
    ///
    /// Returns `Error::WrongPhase` if the show already started.
    pub fn start_game(&mut self) -> Result<(), Error> {
        self.expect_phase(&[Phase::Setup])?;
        for team in self.roster.iter_mut() {
            team.enter_round(Round::First);
        }
        self.round = Round::First;
        self.selector.reset(Round::First);
        self.phase = Phase::RoundInProgress;
        info!(teams = self.roster.len(), "show started");
        Ok(())
    }
}

// Pairing and turn flow
impl Game {
    /// Toggles a team in the two-slot selection buffer
    ///
    /// Selecting a third team evicts the team that was selected first.
    ///
    /// # Errors
    ///
    /// * `Error::WrongPhase` - no pair can be chosen right now
    /// * `Error::UnknownTeam` - no team has the id
    /// * `Error::TeamEliminated` - the team is out of the show
    /// * `Error::TeamAlreadyPlayed` - the team played this round
    pub fn select_team_for_pairing(&mut self, id: TeamId) -> Result<&[TeamId], Error> {
        self.expect_phase(&[Phase::RoundInProgress, Phase::PairSelection])?;
        let team = self.roster.require(id).map_err(Error::logged)?;
        if team.is_eliminated() {
            return Err(Error::TeamEliminated(id).logged());
        }
        if team.has_played_this_round() {
            return Err(Error::TeamAlreadyPlayed(id).logged());
        }

        if let Some(position) = self.selected.iter().position(|&selected| selected == id) {
            self.selected.remove(position);
        } else {
            if self.selected.len() >= 2 {
                self.selected.remove(0);
            }
            self.selected.push(id);
        }

        self.phase = if self.selected.is_empty() {
            Phase::RoundInProgress
        } else {
            Phase::PairSelection
        };
        debug!(selected = ?self.selected, "selection changed");
        Ok(self.selected.as_slice())
    }

    /// Puts the two selected teams on stage with their first question
    ///
    /// # Errors
    ///
    /// * `Error::WrongPhase` - no pair can be chosen right now
    /// * `Error::IncompletePairSelection` - the buffer does not hold two teams
    pub fn confirm_pair(&mut self) -> Result<&ActivePair, Error> {
        self.expect_phase(&[Phase::RoundInProgress, Phase::PairSelection])?;
        let [first, second] = self.selected[..] else {
            return Err(Error::IncompletePairSelection.logged());
        };

        let definition = self.options.round(self.round);
        let pair = ActivePair::new(
            self.roster.require(first).map_err(Error::logged)?,
            self.roster.require(second).map_err(Error::logged)?,
            self.round,
            definition.questions_per_pair,
        );

        for id in [first, second] {
            self.roster.require_mut(id)?.mark_played();
        }
        self.selected.clear();
        self.question = Some(self.draw_question());
        self.phase = Phase::PairInProgress;
        info!(round = %self.round, pair = %pair.pair_id, "pair confirmed");

        Ok(&*self.pair.insert(pair))
    }

    /// Moves the pair to its next question, or retires it after its last one
    ///
    /// # Errors
    ///
    /// Returns `Error::WrongPhase` if no pair is on stage.
    pub fn advance_question(&mut self) -> Result<Advance, Error> {
        self.expect_phase(&[Phase::PairInProgress])?;
        let Some(pair) = self.pair.as_ref() else {
            return Err(Error::WrongPhase(self.phase).logged());
        };

        if pair.on_last_question() {
            return self.finish_pair().map(Advance::PairFinished);
        }

        let question = self.draw_question();
        self.question = Some(question);
        let question_number = self.pair.as_mut().map_or(0, |pair| {
            pair.question_number += 1;
            pair.question_number
        });
        debug!(question_number, "next question");
        Ok(Advance::NextQuestion { question_number })
    }

    /// Retires the pair on stage, ending its turn
    ///
    /// Points were already written through to each team's ledger as they were
    /// awarded, so the pair's turn scores need no further folding. When no two
    /// teams are left waiting, the round completes; completing the
    /// championship finishes the show and fixes the result.
    ///
    /// # Returns
    ///
    /// The retired pair with its final turn scores
    ///
    /// # Errors
    ///
    /// Returns `Error::WrongPhase` if no pair is on stage.
    pub fn finish_pair(&mut self) -> Result<ActivePair, Error> {
        self.expect_phase(&[Phase::PairInProgress])?;
        let Some(pair) = self.pair.take() else {
            return Err(Error::WrongPhase(self.phase).logged());
        };
        self.question = None;

        for member in [&pair.team1, &pair.team2] {
            debug_assert_eq!(
                self.roster
                    .get(member.id)
                    .map(|team| team.round_score_or_zero(self.round)),
                Some(member.round_score_at_start() + member.pair_score),
                "turn score diverged from ledger for team {}",
                member.id
            );
        }
        info!(
            pair = %pair.pair_id,
            team1 = pair.team1.pair_score,
            team2 = pair.team2.pair_score,
            "pair finished"
        );

        self.phase = if self.roster.waiting().len() >= 2 {
            Phase::RoundInProgress
        } else if self.round == Round::Final {
            self.finish_game();
            Phase::GameFinished
        } else {
            info!(round = %self.round, "round completed");
            Phase::RoundCompleted
        };

        Ok(pair)
    }

    /// Applies the elimination cut and opens the next round
    ///
    /// Contenders are ranked by their score in the round just completed; the
    /// configured number survive and the rest are eliminated. Every team's
    /// played flag is cleared and the survivors get a fresh score bucket.
    ///
    /// # Returns
    ///
    /// The surviving team ids, best first
    ///
    /// # Errors
    ///
    /// * `Error::NoFurtherRound` - the championship has been played
    /// * `Error::RoundNotCompleted` - teams are still waiting to play
    pub fn advance_round(&mut self) -> Result<Vec<TeamId>, Error> {
        match self.phase {
            Phase::RoundCompleted => {}
            Phase::GameFinished => return Err(Error::NoFurtherRound.logged()),
            _ => return Err(Error::RoundNotCompleted.logged()),
        }
        let (Some(next), Some(count)) = (self.round.next(), self.round_definition().advancing)
        else {
            return Err(Error::NoFurtherRound.logged());
        };

        let survivors = standings::advancing(&self.roster, self.round, count);
        for team in self.roster.iter_mut() {
            if survivors.contains(&team.id()) {
                team.enter_round(next);
            } else {
                if !team.is_eliminated() {
                    team.eliminate();
                }
                team.leave_round();
            }
        }

        info!(from = %self.round, to = %next, survivors = ?survivors, "round advanced");
        self.selector.reset(next);
        self.round = next;
        self.selected.clear();
        self.phase = Phase::RoundInProgress;
        Ok(survivors)
    }

    fn draw_question(&mut self) -> ActiveQuestion {
        let pick = self.selector.next_index(self.round, &self.bank);
        debug!(round = %self.round, ?pick, "question drawn");
        ActiveQuestion::from(&pick.question(self.round, &self.bank))
    }

    fn finish_game(&mut self) {
        match standings::compute_result(&self.roster) {
            Ok(result) => {
                info!(
                    champion = %result.champion.id,
                    runner_up = %result.runner_up.id,
                    score = %result.final_round_score,
                    "show finished"
                );
                if let Err(rejected) = self.result.set(result) {
                    error!(
                        champion = %rejected.champion.id,
                        "show result already recorded, keeping the first"
                    );
                }
            }
            Err(e) => {
                e.logged();
            }
        }
    }
}

// Board controls
impl Game {
    fn question_mut(&mut self) -> Result<&mut ActiveQuestion, Error> {
        self.question
            .as_mut()
            .ok_or_else(|| Error::NoActivePair.logged())
    }

    /// Shows the prompt (again, if it was hidden)
    ///
    /// # Errors
    ///
    /// Returns `Error::NoActivePair` if no question is on the board.
    pub fn reveal_question(&mut self) -> Result<(), Error> {
        self.question_mut()?.reveal();
        Ok(())
    }

    /// Hides the prompt
    ///
    /// # Errors
    ///
    /// Returns `Error::NoActivePair` if no question is on the board.
    pub fn hide_question(&mut self) -> Result<(), Error> {
        self.question_mut()?.hide();
        Ok(())
    }

    /// Flips the strike marker, returning the new state
    ///
    /// # Errors
    ///
    /// Returns `Error::NoActivePair` if no question is on the board.
    pub fn toggle_strike(&mut self) -> Result<bool, Error> {
        let striked = self.question_mut()?.toggle_strike();
        debug!(striked, "strike toggled");
        Ok(striked)
    }

    /// Uncovers an answer, or shows a hidden one again without crediting points
    ///
    /// # Errors
    ///
    /// * `Error::NoActivePair` - no question is on the board
    /// * `Error::UnknownQuestionSlot` - no answer has the rank
    pub fn reveal_answer(&mut self, rank: usize) -> Result<(), Error> {
        self.question_mut()?
            .reveal_answer(rank)
            .map_err(Error::logged)?;
        debug!(rank, "answer revealed");
        Ok(())
    }

    /// Hides an uncovered answer
    ///
    /// # Errors
    ///
    /// * `Error::NoActivePair` - no question is on the board
    /// * `Error::UnknownQuestionSlot` - no answer has the rank
    pub fn hide_answer(&mut self, rank: usize) -> Result<(), Error> {
        self.question_mut()?
            .hide_answer(rank)
            .map_err(Error::logged)
    }

    /// Fixes the prompt text of the question on the board
    ///
    /// # Errors
    ///
    /// Returns `Error::NoActivePair` if no question is on the board.
    pub fn edit_question_text(&mut self, text: &str) -> Result<(), Error> {
        self.question_mut()?.edit_text(text);
        Ok(())
    }

    /// Fixes an answer of the question on the board
    ///
    /// # Errors
    ///
    /// * `Error::NoActivePair` - no question is on the board
    /// * `Error::UnknownQuestionSlot` - no answer has the rank
    pub fn edit_answer(&mut self, rank: usize, text: &str, points: i64) -> Result<(), Error> {
        self.question_mut()?
            .edit_answer(rank, text, points)
            .map_err(Error::logged)
    }
}

// Extra questions
impl Game {
    /// Appends a placeholder extra question, returning its id
    pub fn add_extra_question(&mut self) -> u32 {
        self.extras.add()
    }

    /// Replaces an extra question's prompt
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownExtraQuestion` if no extra question has the id.
    pub fn edit_extra_question(&mut self, id: u32, text: &str) -> Result<(), Error> {
        self.extras.edit_text(id, text).map_err(Error::logged)
    }

    /// Replaces an extra question's answer
    ///
    /// # Errors
    ///
    /// * `Error::UnknownExtraQuestion` - no extra question has the id
    /// * `Error::UnknownQuestionSlot` - no answer has the rank
    pub fn edit_extra_answer(
        &mut self,
        id: u32,
        rank: usize,
        text: &str,
        points: i64,
    ) -> Result<(), Error> {
        self.extras
            .edit_answer(id, rank, text, points)
            .map_err(Error::logged)
    }

    /// Shows or hides an extra question's prompt
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownExtraQuestion` if no extra question has the id.
    pub fn toggle_extra_question(&mut self, id: u32) -> Result<bool, Error> {
        self.extras.toggle_question(id).map_err(Error::logged)
    }

    /// Shows or hides one answer of an extra question
    ///
    /// # Errors
    ///
    /// * `Error::UnknownExtraQuestion` - no extra question has the id
    /// * `Error::UnknownQuestionSlot` - no answer has the rank
    pub fn toggle_extra_answer(&mut self, id: u32, rank: usize) -> Result<bool, Error> {
        self.extras
            .toggle_answer(id, rank)
            .map_err(Error::logged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::roster::MAX_TEAMS;

    fn id(n: u32) -> TeamId {
        TeamId::from(n)
    }

    fn started() -> Game {
        let mut game = Game::with_options(Options::default(), fastrand::Rng::with_seed(1)).unwrap();
        game.start_game().unwrap();
        game
    }

    fn play_pair(game: &mut Game, a: u32, b: u32) {
        game.select_team_for_pairing(id(a)).unwrap();
        game.select_team_for_pairing(id(b)).unwrap();
        game.confirm_pair().unwrap();
        game.finish_pair().unwrap();
    }

    #[test]
    fn test_new_game_is_in_setup_with_default_roster() {
        let game = Game::new();
        assert_eq!(game.phase(), Phase::Setup);
        assert_eq!(game.roster().len(), 8);
        assert_eq!(game.round(), Round::First);
        assert!(!game.round_completed());
    }

    #[test]
    fn test_invalid_options_rejected() {
        let options = Options {
            initial_teams: 3,
            ..Options::default()
        };
        assert!(Game::with_options(options, fastrand::Rng::with_seed(0)).is_err());
    }

    #[test]
    fn test_roster_edits_only_during_setup() {
        let mut game = Game::new();
        let new_team = game.add_team().unwrap();
        assert_eq!(new_team, id(9));
        game.remove_team(new_team).unwrap();

        game.start_game().unwrap();
        assert_eq!(game.add_team(), Err(Error::WrongPhase(Phase::RoundInProgress)));
        assert_eq!(
            game.remove_team(id(1)),
            Err(Error::WrongPhase(Phase::RoundInProgress))
        );
        // renaming stays available
        assert_eq!(game.rename_team(id(1), "Owls"), Ok("Owls"));
    }

    #[test]
    fn test_roster_upper_limit() {
        let mut game = Game::new();
        while game.roster().len() < MAX_TEAMS {
            game.add_team().unwrap();
        }
        assert_eq!(game.add_team(), Err(Error::TooManyTeams));
    }

    #[test]
    fn test_start_opens_round_one_buckets() {
        let game = started();
        assert_eq!(game.phase(), Phase::RoundInProgress);
        assert!(
            game.roster()
                .iter()
                .all(|t| t.round_score(Round::First) == Some(0))
        );
    }

    #[test]
    fn test_start_twice_rejected() {
        let mut game = started();
        assert_eq!(
            game.start_game(),
            Err(Error::WrongPhase(Phase::RoundInProgress))
        );
    }

    #[test]
    fn test_selection_toggles_and_evicts_oldest() {
        let mut game = started();

        assert_eq!(game.select_team_for_pairing(id(1)).unwrap(), &[id(1)]);
        assert_eq!(game.phase(), Phase::PairSelection);
        assert_eq!(game.select_team_for_pairing(id(2)).unwrap(), &[id(1), id(2)]);
        assert_eq!(game.select_team_for_pairing(id(3)).unwrap(), &[id(2), id(3)]);
        assert_eq!(game.select_team_for_pairing(id(2)).unwrap(), &[id(3)]);
        assert_eq!(game.select_team_for_pairing(id(3)).unwrap(), &[] as &[TeamId]);
        assert_eq!(game.phase(), Phase::RoundInProgress);
    }

    #[test]
    fn test_selection_rejections_leave_state_unchanged() {
        let mut game = started();
        play_pair(&mut game, 1, 2);

        game.select_team_for_pairing(id(3)).unwrap();
        assert_eq!(
            game.select_team_for_pairing(id(1)),
            Err(Error::TeamAlreadyPlayed(id(1)))
        );
        assert_eq!(
            game.select_team_for_pairing(id(42)),
            Err(Error::UnknownTeam(id(42)))
        );
        assert_eq!(game.selected_teams(), &[id(3)]);
        assert_eq!(Error::UnknownTeam(id(42)).severity(), Severity::Reference);
        assert_eq!(
            Error::TeamAlreadyPlayed(id(1)).severity(),
            Severity::Recoverable
        );
    }

    #[test]
    fn test_selection_before_start_rejected() {
        let mut game = Game::new();
        assert_eq!(
            game.select_team_for_pairing(id(1)),
            Err(Error::WrongPhase(Phase::Setup))
        );
    }

    #[test]
    fn test_confirm_requires_two_teams() {
        let mut game = started();
        assert_eq!(game.confirm_pair().err(), Some(Error::IncompletePairSelection));
        game.select_team_for_pairing(id(1)).unwrap();
        assert_eq!(game.confirm_pair().err(), Some(Error::IncompletePairSelection));
        assert!(!game.team(id(1)).unwrap().has_played_this_round());
    }

    #[test]
    fn test_confirm_pair_marks_played_and_draws_question() {
        let mut game = started();
        game.select_team_for_pairing(id(4)).unwrap();
        game.select_team_for_pairing(id(2)).unwrap();

        let pair = game.confirm_pair().unwrap().clone();
        assert_eq!(pair.pair_id.to_string(), "2-4");
        assert_eq!(pair.team1.id, id(4));
        assert_eq!(pair.team1.pair_score, 0);
        assert_eq!(pair.questions_per_pair, 5);

        assert_eq!(game.phase(), Phase::PairInProgress);
        assert!(game.selected_teams().is_empty());
        assert!(game.team(id(2)).unwrap().has_played_this_round());
        assert!(game.team(id(4)).unwrap().has_played_this_round());
        assert!(!game.team(id(1)).unwrap().has_played_this_round());

        let question = game.active_question().unwrap();
        assert!(!question.is_revealed);
        assert_eq!(question.answers.len(), 8);
    }

    #[test]
    fn test_advance_question_runs_the_configured_count() {
        let mut game = started();
        game.select_team_for_pairing(id(1)).unwrap();
        game.select_team_for_pairing(id(2)).unwrap();
        game.confirm_pair().unwrap();

        for expected in 2..=5 {
            game.reveal_question().unwrap();
            game.reveal_answer(1).unwrap();
            assert_eq!(
                game.advance_question(),
                Ok(Advance::NextQuestion {
                    question_number: expected
                })
            );
            let question = game.active_question().unwrap();
            assert!(!question.is_revealed);
            assert!(question.answers.iter().all(|a| !a.is_revealed));
        }

        assert!(matches!(
            game.advance_question(),
            Ok(Advance::PairFinished(_))
        ));
        assert!(game.active_pair().is_none());
        assert!(game.active_question().is_none());
        assert_eq!(game.phase(), Phase::RoundInProgress);
    }

    #[test]
    fn test_board_controls_need_a_question() {
        let mut game = started();
        assert_eq!(game.reveal_question(), Err(Error::NoActivePair));
        assert_eq!(game.reveal_answer(1), Err(Error::NoActivePair));
    }

    #[test]
    fn test_board_controls() {
        let mut game = started();
        game.select_team_for_pairing(id(1)).unwrap();
        game.select_team_for_pairing(id(2)).unwrap();
        game.confirm_pair().unwrap();

        game.reveal_question().unwrap();
        game.reveal_question().unwrap();
        let question = game.active_question().unwrap();
        assert!(question.is_revealed && !question.is_hidden);

        game.hide_question().unwrap();
        assert!(game.active_question().unwrap().is_hidden);

        assert_eq!(game.toggle_strike(), Ok(true));
        assert_eq!(game.toggle_strike(), Ok(false));

        assert_eq!(game.reveal_answer(9), Err(Error::UnknownQuestionSlot(9)));
        game.edit_question_text("Name a planet").unwrap();
        game.edit_answer(1, "Mars", 45).unwrap();
        let question = game.active_question().unwrap();
        assert_eq!(question.text, "Name a planet");
        assert_eq!(question.answer(1).unwrap().points, 45);
    }

    #[test]
    fn test_round_completes_only_after_all_pairs() {
        let mut game = started();
        play_pair(&mut game, 1, 2);
        play_pair(&mut game, 3, 4);
        play_pair(&mut game, 5, 6);
        assert!(!game.round_completed());
        assert_eq!(game.advance_round(), Err(Error::RoundNotCompleted));

        play_pair(&mut game, 7, 8);
        assert!(game.round_completed());
        assert_eq!(game.phase(), Phase::RoundCompleted);
    }

    #[test]
    fn test_odd_team_out_completes_round() {
        let mut game = Game::new();
        game.add_team().unwrap();
        game.start_game().unwrap();
        for (a, b) in [(1, 2), (3, 4), (5, 6), (7, 8)] {
            play_pair(&mut game, a, b);
        }
        assert!(game.round_completed());
        assert!(!game.team(id(9)).unwrap().has_played_this_round());
    }

    #[test]
    fn test_result_unavailable_before_finish() {
        let game = started();
        assert_eq!(
            game.result(),
            Err(Error::WrongPhase(Phase::RoundInProgress))
        );
        assert!(game.snapshot().result.is_none());
    }

    fn play_scored(game: &mut Game, a: u32, b: u32, points_a: i64, points_b: i64) {
        game.select_team_for_pairing(id(a)).unwrap();
        game.select_team_for_pairing(id(b)).unwrap();
        game.confirm_pair().unwrap();
        game.award(id(a), points_a).unwrap();
        game.award(id(b), points_b).unwrap();
        game.finish_pair().unwrap();
    }

    fn finished() -> Game {
        let mut game = started();
        for (a, b) in [(1, 2), (3, 4), (5, 6), (7, 8)] {
            play_scored(&mut game, a, b, i64::from(a) * 10, i64::from(b) * 10);
        }
        game.advance_round().unwrap();
        play_scored(&mut game, 8, 6, 15, 25);
        play_scored(&mut game, 5, 7, 35, 5);
        game.advance_round().unwrap();
        play_scored(&mut game, 5, 6, 90, 45);
        game
    }

    #[test]
    fn test_result_recorded_once() {
        let mut game = finished();
        assert!(game.is_game_finished());
        let first = game.result().unwrap().clone();
        assert_eq!(first.champion.id, id(5));
        assert_eq!(first.final_round_score, "90 - 45");

        game.finish_game();
        assert_eq!(game.result(), Ok(&first));
    }

    #[test]
    fn test_bank_import_only_during_setup() {
        let mut game = Game::new();
        let template = game.bank_template();
        game.import_bank_json(&template).unwrap();
        assert_eq!(game.bank().len(Round::First), 10);

        assert!(matches!(
            game.import_bank_json(r#"{"round1": []}"#),
            Err(Error::InvalidBank(bank::Error::WrongQuestionCount { .. }))
        ));
        assert_eq!(game.bank().len(Round::First), 10);

        game.start_game().unwrap();
        assert_eq!(
            game.import_bank_json(&template),
            Err(Error::WrongPhase(Phase::RoundInProgress))
        );
    }

    #[test]
    fn test_load_bank_checks_round_sizes() {
        let mut game = Game::new();
        let mut other = Options::default();
        other.first.bank_size = 3;

        assert!(matches!(
            game.load_bank(&QuestionBank::template(&other)),
            Err(Error::InvalidBank(bank::Error::WrongQuestionCount {
                round: Round::First,
                expected: 10,
                found: 3,
            }))
        ));
        assert!(game.bank().is_empty(Round::First));

        let fitting = QuestionBank::template(game.options());
        game.load_bank(&fitting).unwrap();
        assert_eq!(game.bank().len(Round::Final), 3);
    }

    #[test]
    fn test_load_bank_refuses_partially_configured_bank() {
        let mut game = Game::new();
        let options = game.options().clone();
        let template = QuestionBank::template(&options).to_import();

        let mut partial = QuestionBank::default();
        partial
            .set_question(Round::First, 1, &template.round1[0], &options)
            .unwrap();

        assert!(matches!(
            game.load_bank(&partial),
            Err(Error::InvalidBank(bank::Error::WrongQuestionCount { .. }))
        ));
        assert!(game.bank().is_empty(Round::First));
    }
}
