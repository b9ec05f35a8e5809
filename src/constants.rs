//! Configuration constants for the showdown engine
//!
//! This module contains the limits and constraints used throughout the
//! engine to keep rosters, questions and round settings within the bounds
//! the show format allows.

/// Roster limits
pub mod roster {
    /// Minimum number of teams required to run a show
    pub const MIN_TEAMS: usize = 8;
    /// Maximum number of teams a show can hold
    pub const MAX_TEAMS: usize = 15;
    /// Maximum length of a team name in characters
    pub const MAX_NAME_LENGTH: usize = 30;
}

/// Question and answer limits
pub mod question {
    /// Every question carries exactly this many ranked answers
    pub const ANSWER_COUNT: usize = 8;
    /// Maximum length of a question prompt in characters
    pub const MAX_TEXT_LENGTH: usize = 300;
    /// Maximum length of an answer in characters
    pub const MAX_ANSWER_LENGTH: usize = 100;
    /// Points awarded for the top-ranked answer in generated questions
    pub const TOP_ANSWER_POINTS: i64 = 80;
    /// Point step between consecutive ranks in generated questions
    pub const POINT_STEP: i64 = 10;
}

/// Round configuration limits
pub mod round {
    /// Maximum number of questions a single pair may play in one round
    pub const MAX_QUESTIONS_PER_PAIR: usize = 10;
    /// Maximum number of bank questions authored for one round
    pub const MAX_BANK_QUESTIONS: usize = 20;
    /// Minimum number of teams that must survive an elimination cut
    pub const MIN_ADVANCING: usize = 2;
    /// Maximum length of a round description in characters
    pub const MAX_DESCRIPTION_LENGTH: usize = 200;
}
