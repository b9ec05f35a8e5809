//! Extra questions
//!
//! A side pool of host-authored questions that lives outside the bank and the
//! round structure. Extra questions are shown and hidden freely; their points
//! reach teams through [`Game::award`](crate::game::Game::award) only.

use serde::Serialize;

use crate::{bank::BankQuestion, game::Error, question::ActiveQuestion};

/// A host-authored question outside the round structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtraQuestion {
    /// Stable identifier, starting at 1
    pub id: u32,
    /// The question and its board state
    pub question: ActiveQuestion,
}

impl ExtraQuestion {
    fn new(id: u32) -> Self {
        Self {
            id,
            question: ActiveQuestion::from(&BankQuestion::placeholder(
                id as usize,
                &format!("Extra Question {id}"),
            )),
        }
    }
}

/// The ordered pool of extra questions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExtraQuestions {
    questions: Vec<ExtraQuestion>,
}

impl Default for ExtraQuestions {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtraQuestions {
    /// Creates a pool holding a single placeholder question
    pub fn new() -> Self {
        Self {
            questions: vec![ExtraQuestion::new(1)],
        }
    }

    /// Iterates over the pool in creation order
    pub fn iter(&self) -> impl Iterator<Item = &ExtraQuestion> {
        self.questions.iter()
    }

    /// Number of extra questions
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Whether the pool is empty
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Looks up an extra question
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownExtraQuestion` if no question has the id.
    pub fn get(&self, id: u32) -> Result<&ExtraQuestion, Error> {
        self.questions
            .iter()
            .find(|extra| extra.id == id)
            .ok_or(Error::UnknownExtraQuestion(id))
    }

    fn get_mut(&mut self, id: u32) -> Result<&mut ActiveQuestion, Error> {
        self.questions
            .iter_mut()
            .find(|extra| extra.id == id)
            .map(|extra| &mut extra.question)
            .ok_or(Error::UnknownExtraQuestion(id))
    }

    pub(crate) fn add(&mut self) -> u32 {
        let id = self.questions.iter().map(|extra| extra.id).max().unwrap_or(0) + 1;
        self.questions.push(ExtraQuestion::new(id));
        id
    }

    pub(crate) fn edit_text(&mut self, id: u32, text: &str) -> Result<(), Error> {
        self.get_mut(id)?.edit_text(text);
        Ok(())
    }

    pub(crate) fn edit_answer(
        &mut self,
        id: u32,
        rank: usize,
        text: &str,
        points: i64,
    ) -> Result<(), Error> {
        self.get_mut(id)?.edit_answer(rank, text, points)
    }

    /// Shows a hidden or unrevealed prompt, hides a showing one
    pub(crate) fn toggle_question(&mut self, id: u32) -> Result<bool, Error> {
        let question = self.get_mut(id)?;
        if question.is_revealed && !question.is_hidden {
            question.hide();
        } else {
            question.reveal();
        }
        Ok(!question.is_hidden)
    }

    pub(crate) fn toggle_answer(&mut self, id: u32, rank: usize) -> Result<bool, Error> {
        let question = self.get_mut(id)?;
        if question.answer(rank)?.is_showing() {
            question.hide_answer(rank)?;
            Ok(false)
        } else {
            question.reveal_answer(rank)?;
            Ok(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_starts_with_one_question() {
        let pool = ExtraQuestions::new();
        assert_eq!(pool.len(), 1);
        let first = pool.get(1).unwrap();
        assert_eq!(first.question.text, "Extra Question 1");
        assert_eq!(first.question.answers.len(), 8);
        assert!(!first.question.is_revealed);
    }

    #[test]
    fn test_add_uses_next_id() {
        let mut pool = ExtraQuestions::new();
        assert_eq!(pool.add(), 2);
        assert_eq!(pool.add(), 3);
        assert_eq!(pool.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_toggle_question() {
        let mut pool = ExtraQuestions::new();
        assert_eq!(pool.toggle_question(1), Ok(true));
        assert_eq!(pool.toggle_question(1), Ok(false));
        assert_eq!(pool.toggle_question(1), Ok(true));
        assert!(pool.get(1).unwrap().question.is_revealed);
    }

    #[test]
    fn test_toggle_answer() {
        let mut pool = ExtraQuestions::new();
        assert_eq!(pool.toggle_answer(1, 4), Ok(true));
        assert!(pool.get(1).unwrap().question.answer(4).unwrap().is_showing());
        assert_eq!(pool.toggle_answer(1, 4), Ok(false));
        assert_eq!(pool.toggle_answer(1, 9), Err(Error::UnknownQuestionSlot(9)));
    }

    #[test]
    fn test_edits() {
        let mut pool = ExtraQuestions::new();
        pool.edit_text(1, "Name a board game").unwrap();
        pool.edit_answer(1, 2, "Chess", 35).unwrap();

        let question = &pool.get(1).unwrap().question;
        assert_eq!(question.text, "Name a board game");
        assert_eq!(question.answer(2).unwrap().text, "Chess");
        assert_eq!(question.answer(2).unwrap().points, 35);
        assert_eq!(
            pool.edit_text(5, "missing"),
            Err(Error::UnknownExtraQuestion(5))
        );
    }
}
