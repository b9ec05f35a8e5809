//! # Showdown Game Library
//!
//! This library provides the state engine for a hosted, team-based survey
//! showdown. Teams play in pairs across three rounds; after each of the first
//! two rounds the lowest scoring teams are eliminated, and the two survivors
//! of round two meet in the championship. The host drives everything: pairing
//! teams, revealing questions and answers, attributing answers to teams and
//! advancing the rounds.
//!
//! The crate is transport agnostic. A presentation layer calls operations on
//! [`game::Game`] and renders [`Snapshot`]s; it never mutates state directly.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::similar_names)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::struct_field_names)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::wildcard_imports)]
#![allow(clippy::missing_panics_doc)]
use serde::Serialize;

pub mod bank;
pub mod config;
pub mod constants;
pub mod extra;
pub mod game;
mod names;
pub mod pair;
pub mod question;
pub mod round;
pub mod scoring;
pub mod selector;
pub mod standings;
pub mod team;

pub use names::Error as NameError;

/// Everything the presentation layer needs to render the show
///
/// Snapshots are cheap projections taken after each operation; they are
/// never fed back into the engine.
#[derive(Debug, Serialize, Clone)]
pub struct Snapshot {
    /// The round being played
    pub round: round::Round,
    /// 1-based number of the round being played
    pub round_number: u8,
    /// Format of the round being played
    pub round_definition: config::RoundDefinition,
    /// Current phase of the show
    pub phase: game::Phase,
    /// Whether every team able to play this round has played
    pub round_completed: bool,
    /// Every team with its ledger
    pub teams: team::Roster,
    /// Teams in the selection buffer, oldest first
    pub selected: Vec<team::TeamId>,
    /// The pair on stage
    pub active_pair: Option<pair::ActivePair>,
    /// The question on the board
    pub active_question: Option<question::ActiveQuestion>,
    /// The standings board for the current round
    pub standings: Vec<standings::Standing>,
    /// Teams currently above the cut line
    pub advancing: Vec<team::TeamId>,
    /// The extra question pool
    pub extra_questions: extra::ExtraQuestions,
    /// The final result, once the championship is over
    pub result: Option<standings::GameResult>,
}

impl Snapshot {
    /// Converts the snapshot to a JSON string for transmission
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }

    /// "Question N of M" for the pair on stage
    pub fn question_counter(&self) -> Option<String> {
        self.active_pair.as_ref().map(|pair| {
            format!(
                "Question {} of {}",
                pair.question_number, pair.questions_per_pair
            )
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::{game::Game, team::TeamId};

    #[test]
    fn test_snapshot_of_fresh_game() {
        let snapshot = Game::new().snapshot();

        assert_eq!(snapshot.phase, game::Phase::Setup);
        assert_eq!(snapshot.round_number, 1);
        assert_eq!(snapshot.teams.len(), 8);
        assert_eq!(snapshot.standings.len(), 8);
        assert_eq!(snapshot.advancing.len(), 4);
        assert!(snapshot.question_counter().is_none());
        assert!(snapshot.result.is_none());
    }

    #[test]
    fn test_snapshot_to_message() {
        let mut game = Game::new();
        game.rename_team(TeamId::from(1), "Night Owls").unwrap();
        game.start_game().unwrap();
        game.select_team_for_pairing(TeamId::from(1)).unwrap();
        game.select_team_for_pairing(TeamId::from(2)).unwrap();
        game.confirm_pair().unwrap();

        let snapshot = game.snapshot();
        assert_eq!(snapshot.question_counter().as_deref(), Some("Question 1 of 5"));

        let json = snapshot.to_message();
        assert!(json.contains("PairInProgress"));
        assert!(json.contains("Night Owls"));
        assert!(json.contains("\"pair_id\""));
    }
}
