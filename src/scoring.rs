//! Scoring ledger operations
//!
//! Points reach a team in two ways: the host attributes a revealed board
//! answer to a team of the active pair, or the host awards an arbitrary
//! amount (possibly negative) to any team still in contention. Both credit
//! the bucket of the round being played and the running total together.

use tracing::debug;

use crate::{
    game::{Error, Game, Phase},
    team::TeamId,
};

impl Game {
    /// Credits points to a team in the current round
    ///
    /// If the team is on stage, its live turn score moves by the same amount.
    ///
    /// # Arguments
    ///
    /// * `team` - The team receiving the points
    /// * `points` - Amount to credit; negative values deduct
    ///
    /// # Returns
    ///
    /// The team's score in the current round after the award
    ///
    /// # Errors
    ///
    /// * `Error::WrongPhase` - the show has not started or is over
    /// * `Error::UnknownTeam` - no team has the id
    /// * `Error::TeamEliminated` - the team is out of the show
    /// * `Error::ScoreOverflow` - a score would leave the `i64` range
    pub fn award(&mut self, team: TeamId, points: i64) -> Result<i64, Error> {
        if matches!(self.phase(), Phase::Setup | Phase::GameFinished) {
            return Err(Error::WrongPhase(self.phase()).logged());
        }
        let round = self.round();

        let pair_score = match self.active_pair().and_then(|pair| pair.member(team)) {
            Some(member) => Some(
                member
                    .pair_score
                    .checked_add(points)
                    .ok_or_else(|| Error::ScoreOverflow(team).logged())?,
            ),
            None => None,
        };

        let entry = self.roster_mut().require_mut(team).map_err(Error::logged)?;
        if entry.is_eliminated() {
            return Err(Error::TeamEliminated(team).logged());
        }
        let round_score = entry.credit(round, points).map_err(Error::logged)?;

        if let (Some(member), Some(pair_score)) = (
            self.pair_mut().and_then(|pair| pair.member_mut(team)),
            pair_score,
        ) {
            member.pair_score = pair_score;
        }

        debug!(%team, points, round_score, "points awarded");
        Ok(round_score)
    }

    /// Credits a revealed board answer to a team of the active pair
    ///
    /// The answer is hidden from the board once its points are credited and
    /// cannot be attributed a second time.
    ///
    /// # Arguments
    ///
    /// * `rank` - Rank of the answer on the board
    /// * `team` - The team that gave the answer
    ///
    /// # Returns
    ///
    /// The points credited
    ///
    /// # Errors
    ///
    /// * `Error::NoActivePair` - no pair is on stage
    /// * `Error::UnknownTeam` - no team has the id
    /// * `Error::TeamNotInPair` - the team is not on stage
    /// * `Error::UnknownQuestionSlot` - no answer has the rank
    /// * `Error::AnswerNotRevealed` - the answer is not showing or was already attributed
    pub fn attribute_answer(&mut self, rank: usize, team: TeamId) -> Result<i64, Error> {
        let (Some(pair), Some(question)) = (self.active_pair(), self.active_question()) else {
            return Err(Error::NoActivePair.logged());
        };
        self.team(team).map_err(Error::logged)?;
        if !pair.contains(team) {
            return Err(Error::TeamNotInPair(team).logged());
        }
        let answer = question.answer(rank).map_err(Error::logged)?;
        if !answer.is_showing() || answer.attributed_to.is_some() {
            return Err(Error::AnswerNotRevealed(rank).logged());
        }
        let points = answer.points;

        self.award(team, points)?;

        self.roster_mut().require_mut(team)?.record_answer();
        if let Some(member) = self.pair_mut().and_then(|pair| pair.member_mut(team)) {
            member.answered += 1;
        }
        if let Some(answer) = self
            .question
            .as_mut()
            .and_then(|question| question.answer_mut(rank).ok())
        {
            answer.is_hidden = true;
            answer.attributed_to = Some(team);
        }

        debug!(rank, %team, points, "answer attributed");
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        config::Options,
        game::{Error, Game, Phase, Severity},
        round::Round,
        team::TeamId,
    };

    fn id(n: u32) -> TeamId {
        TeamId::from(n)
    }

    fn on_stage(a: u32, b: u32) -> Game {
        let mut game = Game::with_options(Options::default(), fastrand::Rng::with_seed(7)).unwrap();
        game.start_game().unwrap();
        game.select_team_for_pairing(id(a)).unwrap();
        game.select_team_for_pairing(id(b)).unwrap();
        game.confirm_pair().unwrap();
        game.reveal_question().unwrap();
        game
    }

    #[test]
    fn test_attribution_credits_round_total_and_pair() {
        let mut game = on_stage(1, 2);
        game.edit_answer(3, "Umbrella", 40).unwrap();
        game.reveal_answer(3).unwrap();

        assert_eq!(game.attribute_answer(3, id(1)), Ok(40));

        let team = game.team(id(1)).unwrap();
        assert_eq!(team.round_score(Round::First), Some(40));
        assert_eq!(team.total_score(), 40);
        assert_eq!(team.answered_count(), 1);
        assert!(team.ledger_balanced());

        let pair = game.active_pair().unwrap();
        assert_eq!(pair.team1.pair_score, 40);
        assert_eq!(pair.team1.answered, 1);
        assert_eq!(pair.team2.pair_score, 0);

        let answer = game.active_question().unwrap().answer(3).unwrap();
        assert!(answer.is_revealed && answer.is_hidden);
        assert_eq!(answer.attributed_to, Some(id(1)));
    }

    #[test]
    fn test_attribution_at_most_once() {
        let mut game = on_stage(1, 2);
        game.reveal_answer(1).unwrap();
        let points = game.attribute_answer(1, id(2)).unwrap();

        assert_eq!(game.attribute_answer(1, id(2)), Err(Error::AnswerNotRevealed(1)));
        // showing it again does not make it attributable
        game.reveal_answer(1).unwrap();
        assert_eq!(game.attribute_answer(1, id(1)), Err(Error::AnswerNotRevealed(1)));

        assert_eq!(game.team(id(2)).unwrap().total_score(), points);
        assert_eq!(game.team(id(1)).unwrap().total_score(), 0);
    }

    #[test]
    fn test_attribution_requires_revealed_answer() {
        let mut game = on_stage(1, 2);
        assert_eq!(game.attribute_answer(2, id(1)), Err(Error::AnswerNotRevealed(2)));

        game.reveal_answer(2).unwrap();
        game.hide_answer(2).unwrap();
        assert_eq!(game.attribute_answer(2, id(1)), Err(Error::AnswerNotRevealed(2)));
        assert_eq!(game.team(id(1)).unwrap().total_score(), 0);
    }

    #[test]
    fn test_attribution_rejections() {
        let mut game = on_stage(1, 2);
        game.reveal_answer(1).unwrap();

        assert_eq!(game.attribute_answer(1, id(3)), Err(Error::TeamNotInPair(id(3))));
        assert_eq!(game.attribute_answer(1, id(99)), Err(Error::UnknownTeam(id(99))));
        assert_eq!(game.attribute_answer(9, id(1)), Err(Error::UnknownQuestionSlot(9)));
        assert!(
            game.active_question()
                .unwrap()
                .answer(1)
                .unwrap()
                .attributed_to
                .is_none()
        );
    }

    #[test]
    fn test_attribution_without_pair() {
        let mut game = Game::new();
        game.start_game().unwrap();
        assert_eq!(game.attribute_answer(1, id(1)), Err(Error::NoActivePair));
    }

    #[test]
    fn test_manual_award_to_off_stage_team() {
        let mut game = on_stage(1, 2);
        assert_eq!(game.award(id(5), 15), Ok(15));
        assert_eq!(game.award(id(5), -25), Ok(-10));

        let team = game.team(id(5)).unwrap();
        assert_eq!(team.total_score(), -10);
        assert!(team.ledger_balanced());
        let pair = game.active_pair().unwrap();
        assert_eq!(pair.team1.pair_score + pair.team2.pair_score, 0);
    }

    #[test]
    fn test_manual_award_updates_turn_score() {
        let mut game = on_stage(3, 4);
        game.award(id(4), -5).unwrap();
        assert_eq!(game.active_pair().unwrap().team2.pair_score, -5);
    }

    #[test]
    fn test_award_rejected_during_setup() {
        let mut game = Game::new();
        assert_eq!(game.award(id(1), 10), Err(Error::WrongPhase(Phase::Setup)));
        assert_eq!(game.team(id(1)).unwrap().total_score(), 0);
    }

    #[test]
    fn test_award_unknown_team() {
        let mut game = on_stage(1, 2);
        let before = game.snapshot();
        assert_eq!(game.award(id(77), 10), Err(Error::UnknownTeam(id(77))));
        assert_eq!(game.roster(), &before.teams);
        assert_eq!(game.active_pair(), before.active_pair.as_ref());
    }

    #[test]
    fn test_award_overflow_rejected_without_changes() {
        let mut game = on_stage(1, 2);
        assert_eq!(game.award(id(1), i64::MAX), Ok(i64::MAX));
        let before = game.snapshot();

        assert_eq!(game.award(id(1), 1), Err(Error::ScoreOverflow(id(1))));
        assert_eq!(Error::ScoreOverflow(id(1)).severity(), Severity::Recoverable);
        assert_eq!(game.roster(), &before.teams);
        assert_eq!(game.active_pair(), before.active_pair.as_ref());

        // the ledger keeps working after the rejection
        assert_eq!(game.award(id(1), -5), Ok(i64::MAX - 5));
        assert!(game.team(id(1)).unwrap().ledger_balanced());
    }

    #[test]
    fn test_turn_score_overflow_rejected_without_changes() {
        let mut game = on_stage(1, 2);
        game.award(id(2), i64::MIN + 1).unwrap();
        game.award(id(2), -1).unwrap();
        let before = game.snapshot();

        // the round bucket and total are both at i64::MIN
        assert_eq!(game.award(id(2), -1), Err(Error::ScoreOverflow(id(2))));
        assert_eq!(game.roster(), &before.teams);
        assert_eq!(game.active_pair().unwrap().team2.pair_score, i64::MIN);
    }
}
