//! The live question on the board
//!
//! An active question is a fresh copy of a bank question with every reveal
//! flag cleared. The host flips flags on it as the turn plays out; it is
//! thrown away when the pair moves on.

use serde::Serialize;

use crate::{
    bank::{BankAnswer, BankQuestion},
    game::Error,
    team::TeamId,
};

/// One answer slot on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveAnswer {
    /// Rank from 1 (most popular) to 8
    pub rank: usize,
    /// The answer text
    pub text: String,
    /// Points credited when the answer is attributed
    pub points: i64,
    /// Whether the answer has ever been uncovered
    pub is_revealed: bool,
    /// Whether the uncovered answer is currently hidden again
    pub is_hidden: bool,
    /// The team this answer's points went to, if any
    pub attributed_to: Option<TeamId>,
}

impl ActiveAnswer {
    /// Whether the answer is uncovered and on screen right now
    pub fn is_showing(&self) -> bool {
        self.is_revealed && !self.is_hidden
    }
}

impl From<&BankAnswer> for ActiveAnswer {
    fn from(answer: &BankAnswer) -> Self {
        Self {
            rank: answer.rank,
            text: answer.text.clone(),
            points: answer.points,
            is_revealed: false,
            is_hidden: false,
            attributed_to: None,
        }
    }
}

/// The live, mutable projection of a bank question during a turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveQuestion {
    /// Position of the source question in its pool (1-based)
    pub sequence_index: usize,
    /// The survey prompt
    pub text: String,
    /// Whether the prompt has been shown
    pub is_revealed: bool,
    /// Whether the shown prompt is hidden again
    pub is_hidden: bool,
    /// Whether the host has struck the question
    pub is_striked: bool,
    /// The eight answer slots ordered by rank
    pub answers: Vec<ActiveAnswer>,
}

impl From<&BankQuestion> for ActiveQuestion {
    fn from(question: &BankQuestion) -> Self {
        Self {
            sequence_index: question.sequence_index,
            text: question.text.clone(),
            is_revealed: false,
            is_hidden: false,
            is_striked: false,
            answers: question.answers.iter().map(ActiveAnswer::from).collect(),
        }
    }
}

impl ActiveQuestion {
    /// Shows the prompt; re-shows it if it was hidden
    pub fn reveal(&mut self) {
        self.is_revealed = true;
        self.is_hidden = false;
    }

    /// Hides the prompt
    pub fn hide(&mut self) {
        self.is_hidden = true;
    }

    /// Flips the strike marker
    pub fn toggle_strike(&mut self) -> bool {
        self.is_striked = !self.is_striked;
        self.is_striked
    }

    /// Looks up an answer slot by rank
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownQuestionSlot` if no answer has the rank.
    pub fn answer(&self, rank: usize) -> Result<&ActiveAnswer, Error> {
        self.answers
            .iter()
            .find(|answer| answer.rank == rank)
            .ok_or(Error::UnknownQuestionSlot(rank))
    }

    pub(crate) fn answer_mut(&mut self, rank: usize) -> Result<&mut ActiveAnswer, Error> {
        self.answers
            .iter_mut()
            .find(|answer| answer.rank == rank)
            .ok_or(Error::UnknownQuestionSlot(rank))
    }

    /// Uncovers an answer, or shows it again if it was hidden
    ///
    /// Showing an answer never credits points.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownQuestionSlot` if no answer has the rank.
    pub fn reveal_answer(&mut self, rank: usize) -> Result<(), Error> {
        let answer = self.answer_mut(rank)?;
        answer.is_revealed = true;
        answer.is_hidden = false;
        Ok(())
    }

    /// Hides an uncovered answer
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownQuestionSlot` if no answer has the rank.
    pub fn hide_answer(&mut self, rank: usize) -> Result<(), Error> {
        self.answer_mut(rank)?.is_hidden = true;
        Ok(())
    }

    /// Replaces the prompt text
    pub fn edit_text(&mut self, text: &str) {
        text.trim().clone_into(&mut self.text);
    }

    /// Replaces an answer's text and point value
    ///
    /// Points already credited for the answer are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownQuestionSlot` if no answer has the rank.
    pub fn edit_answer(&mut self, rank: usize, text: &str, points: i64) -> Result<(), Error> {
        let answer = self.answer_mut(rank)?;
        text.trim().clone_into(&mut answer.text);
        answer.points = points;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question() -> ActiveQuestion {
        ActiveQuestion::from(&BankQuestion::placeholder(1, "Name a fruit"))
    }

    #[test]
    fn test_copy_starts_unrevealed() {
        let q = question();
        assert!(!q.is_revealed);
        assert!(!q.is_hidden);
        assert!(!q.is_striked);
        assert_eq!(q.answers.len(), 8);
        assert!(q.answers.iter().all(|a| !a.is_revealed && a.attributed_to.is_none()));
    }

    #[test]
    fn test_reveal_is_idempotent() {
        let mut once = question();
        once.reveal();

        let mut twice = question();
        twice.reveal();
        twice.reveal();

        assert_eq!(once, twice);
        assert!(twice.is_revealed);
        assert!(!twice.is_hidden);
    }

    #[test]
    fn test_reveal_after_hide_shows_again() {
        let mut q = question();
        q.reveal();
        q.hide();
        assert!(q.is_revealed && q.is_hidden);

        q.reveal();
        assert!(q.is_revealed && !q.is_hidden);
    }

    #[test]
    fn test_toggle_strike() {
        let mut q = question();
        assert!(q.toggle_strike());
        assert!(!q.toggle_strike());
    }

    #[test]
    fn test_answer_flags() {
        let mut q = question();
        q.reveal_answer(3).unwrap();
        assert!(q.answer(3).unwrap().is_showing());
        assert_eq!(q.answers.iter().filter(|a| a.is_showing()).count(), 1);

        q.hide_answer(3).unwrap();
        let answer = q.answer(3).unwrap();
        assert!(answer.is_revealed && answer.is_hidden);

        q.reveal_answer(3).unwrap();
        assert!(q.answer(3).unwrap().is_showing());
    }

    #[test]
    fn test_unknown_rank() {
        let mut q = question();
        assert_eq!(q.reveal_answer(9), Err(Error::UnknownQuestionSlot(9)));
        assert_eq!(q.hide_answer(0), Err(Error::UnknownQuestionSlot(0)));
        assert_eq!(
            q.edit_answer(12, "x", 1),
            Err(Error::UnknownQuestionSlot(12))
        );
    }

    #[test]
    fn test_edit_answer() {
        let mut q = question();
        q.edit_text("  Name a vegetable ");
        q.edit_answer(1, " Carrot ", 55).unwrap();

        assert_eq!(q.text, "Name a vegetable");
        let answer = q.answer(1).unwrap();
        assert_eq!(answer.text, "Carrot");
        assert_eq!(answer.points, 55);
    }
}
