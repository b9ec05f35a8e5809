//! Question bank authoring, import and validation
//!
//! The bank holds the authored pool of questions for each round. Questions
//! arrive either through a bulk import (a JSON document with `round1`,
//! `round2` and `round3` collections) or one slot at a time through manual
//! configuration. Imports are accepted wholesale or rejected with the first
//! reason found; nothing is partially applied.

use enum_map::EnumMap;
use garde::Validate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    config::Options,
    constants::question::{
        ANSWER_COUNT, MAX_ANSWER_LENGTH, MAX_TEXT_LENGTH, POINT_STEP, TOP_ANSWER_POINTS,
    },
    round::Round,
};

/// Generic prompts played when a round has no authored questions
pub const FALLBACK_PROMPTS: [&str; 5] = [
    "Name a reason why someone might cancel plans with a friend",
    "Name something people do right after waking up",
    "Name a place where you have to wait in line",
    "Name something you might forget to pack for a vacation",
    "Name a chore people put off as long as possible",
];

/// Errors that can occur while validating question bank content
#[derive(Error, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A round does not hold exactly the configured number of questions
    #[error("{round} requires exactly {expected} questions, found {found}")]
    WrongQuestionCount {
        /// The offending round
        round: Round,
        /// Number of questions the configuration requires
        expected: usize,
        /// Number of questions supplied
        found: usize,
    },
    /// A question lacks text or does not carry exactly eight answers
    #[error("{round} question {index}: {reason}")]
    MalformedQuestion {
        /// The round holding the question
        round: Round,
        /// 1-based position of the question within the round
        index: usize,
        /// Validation details
        reason: String,
    },
    /// An answer lacks text or a numeric point value
    #[error("{round} question {index} answer {rank}: {reason}")]
    MalformedAnswer {
        /// The round holding the question
        round: Round,
        /// 1-based position of the question within the round
        index: usize,
        /// Rank of the answer (1 is the most popular)
        rank: usize,
        /// Validation details
        reason: String,
    },
    /// A manual edit targeted a slot outside the configured question count
    #[error("{round} has {size} question slots, slot {slot} does not exist")]
    SlotOutOfRange {
        /// The round being configured
        round: Round,
        /// 1-based slot requested
        slot: usize,
        /// Configured number of slots
        size: usize,
    },
    /// The document is not shaped like a question import at all
    #[error("invalid question file: {0}")]
    Parse(String),
}

/// Text must be present, non-blank and at most `max` characters.
fn text_within(max: usize) -> impl FnOnce(&Option<String>, &()) -> garde::Result {
    move |value, _| match value.as_deref().map(str::trim) {
        None => Err(garde::Error::new("text is required")),
        Some("") => Err(garde::Error::new("must not be blank")),
        Some(text) if text.chars().count() > max => Err(garde::Error::new(format!(
            "must be at most {max} characters"
        ))),
        Some(_) => Ok(()),
    }
}

fn exactly_ranked(value: &Option<Vec<ImportAnswer>>, _ctx: &()) -> garde::Result {
    match value {
        None => Err(garde::Error::new("answers are required")),
        Some(answers) if answers.len() != ANSWER_COUNT => Err(garde::Error::new(format!(
            "must have exactly {ANSWER_COUNT} answers, found {}",
            answers.len()
        ))),
        Some(_) => Ok(()),
    }
}

/// An answer as it appears in the import format
///
/// Fields of the wrong type decode as missing so validation can name the
/// offending answer instead of failing the whole document.
#[serde_with::serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ImportAnswer {
    /// The answer as shown on the board
    #[serde_as(deserialize_as = "serde_with::DefaultOnError")]
    #[serde(default)]
    #[garde(custom(text_within(MAX_ANSWER_LENGTH)))]
    pub text: Option<String>,
    /// Points awarded for the answer; anything non-integral decodes as missing
    #[serde_as(deserialize_as = "serde_with::DefaultOnError")]
    #[serde(default)]
    #[garde(required)]
    pub points: Option<i64>,
}

/// A question as it appears in the import format
#[serde_with::serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ImportQuestion {
    /// The survey prompt
    #[serde_as(deserialize_as = "serde_with::DefaultOnError")]
    #[serde(default)]
    #[garde(custom(text_within(MAX_TEXT_LENGTH)))]
    pub text: Option<String>,
    /// Ranked answers, most popular first
    #[serde_as(deserialize_as = "serde_with::DefaultOnError")]
    #[serde(default)]
    #[garde(custom(exactly_ranked))]
    pub answers: Option<Vec<ImportAnswer>>,
}

/// The bulk import and template export document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BankImport {
    /// Questions for the opening round
    #[serde(default)]
    pub round1: Vec<ImportQuestion>,
    /// Questions for the second round
    #[serde(default)]
    pub round2: Vec<ImportQuestion>,
    /// Questions for the championship
    #[serde(default)]
    pub round3: Vec<ImportQuestion>,
}

impl BankImport {
    /// Parses an import document
    ///
    /// # Errors
    ///
    /// Returns `Error::Parse` if the document is not valid JSON or a round
    /// collection is not an array of questions.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::Parse(e.to_string()))
    }

    /// Renders the document as indented JSON for download
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).expect("default serializer cannot fail")
    }

    fn round(&self, round: Round) -> &[ImportQuestion] {
        match round {
            Round::First => &self.round1,
            Round::Second => &self.round2,
            Round::Final => &self.round3,
        }
    }

    fn round_mut(&mut self, round: Round) -> &mut Vec<ImportQuestion> {
        match round {
            Round::First => &mut self.round1,
            Round::Second => &mut self.round2,
            Round::Final => &mut self.round3,
        }
    }
}

/// A ranked, point-valued answer of an authored question
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BankAnswer {
    /// Rank from 1 (most popular) to 8
    pub rank: usize,
    /// The answer as shown on the board
    pub text: String,
    /// Points awarded when the answer is attributed to a team
    pub points: i64,
}

/// An authored question with its eight ranked answers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BankQuestion {
    /// 1-based position within the round's pool
    pub sequence_index: usize,
    /// The survey prompt
    pub text: String,
    /// Exactly eight answers ordered by rank
    pub answers: Vec<BankAnswer>,
}

impl BankQuestion {
    /// Builds a question with placeholder answers and the default point ladder
    pub fn placeholder(sequence_index: usize, text: &str) -> Self {
        Self {
            sequence_index,
            text: text.to_owned(),
            answers: (1..=ANSWER_COUNT)
                .map(|rank| BankAnswer {
                    rank,
                    text: format!("Answer {rank}"),
                    points: TOP_ANSWER_POINTS - POINT_STEP * (rank as i64 - 1),
                })
                .collect(),
        }
    }

    /// Returns the generic question played when a round's pool is empty
    ///
    /// Out-of-range indices wrap around the fallback list.
    pub fn fallback(index: usize) -> Self {
        let index = index % FALLBACK_PROMPTS.len();
        Self::placeholder(index + 1, FALLBACK_PROMPTS[index])
    }

    /// Validates an imported question and converts it to its bank form
    fn from_import(
        round: Round,
        sequence_index: usize,
        question: &ImportQuestion,
    ) -> Result<Self, Error> {
        question
            .validate()
            .map_err(|report| Error::MalformedQuestion {
                round,
                index: sequence_index,
                reason: report.to_string(),
            })?;

        let answers = question
            .answers
            .iter()
            .flatten()
            .enumerate()
            .map(|(i, answer)| {
                let rank = i + 1;
                let malformed = |reason: String| Error::MalformedAnswer {
                    round,
                    index: sequence_index,
                    rank,
                    reason,
                };
                answer
                    .validate()
                    .map_err(|report| malformed(report.to_string()))?;
                let points = answer
                    .points
                    .ok_or_else(|| malformed("points must be a number".to_owned()))?;
                Ok(BankAnswer {
                    rank,
                    text: answer.text.as_deref().unwrap_or_default().trim().to_owned(),
                    points,
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(Self {
            sequence_index,
            text: question.text.as_deref().unwrap_or_default().trim().to_owned(),
            answers,
        })
    }

    fn to_import(&self) -> ImportQuestion {
        ImportQuestion {
            text: Some(self.text.clone()),
            answers: Some(
                self.answers
                    .iter()
                    .map(|answer| ImportAnswer {
                        text: Some(answer.text.clone()),
                        points: Some(answer.points),
                    })
                    .collect(),
            ),
        }
    }
}

/// The authored pool of questions for every round
///
/// A bank only comes out of validation, the template or manual slot
/// configuration; it is never deserialized directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuestionBank {
    rounds: EnumMap<Round, Vec<BankQuestion>>,
}

impl QuestionBank {
    /// Validates an import document against the configured round sizes
    ///
    /// Rounds are checked in play order; within a round the question count is
    /// checked first, then each question, then each of its answers.
    ///
    /// # Errors
    ///
    /// * `Error::WrongQuestionCount` - a round's collection has the wrong length
    /// * `Error::MalformedQuestion` - a question lacks text or eight answers
    /// * `Error::MalformedAnswer` - an answer lacks text or numeric points
    pub fn validate(candidate: &BankImport, options: &Options) -> Result<Self, Error> {
        let mut rounds = EnumMap::default();

        for round in Round::ALL {
            let questions = candidate.round(round);
            let expected = options.round(round).bank_size;
            if questions.len() != expected {
                return Err(Error::WrongQuestionCount {
                    round,
                    expected,
                    found: questions.len(),
                });
            }

            rounds[round] = questions
                .iter()
                .enumerate()
                .map(|(i, question)| BankQuestion::from_import(round, i + 1, question))
                .collect::<Result<_, _>>()?;
        }

        Ok(Self { rounds })
    }

    /// Parses and validates an import document in one step
    ///
    /// # Errors
    ///
    /// Returns `Error::Parse` for documents that are not shaped like an
    /// import, otherwise the errors of [`QuestionBank::validate`].
    pub fn from_json(json: &str, options: &Options) -> Result<Self, Error> {
        Self::validate(&BankImport::from_json(json)?, options)
    }

    /// Produces a structurally valid skeleton for external authoring tools
    pub fn template(options: &Options) -> Self {
        let mut rounds = EnumMap::default();
        for round in Round::ALL {
            rounds[round] = (1..=options.round(round).bank_size)
                .map(|index| BankQuestion::placeholder(index, "Question text here"))
                .collect();
        }
        Self { rounds }
    }

    /// Converts the bank back into the import format
    pub fn to_import(&self) -> BankImport {
        let mut import = BankImport::default();
        for round in Round::ALL {
            *import.round_mut(round) = self.rounds[round]
                .iter()
                .map(BankQuestion::to_import)
                .collect();
        }
        import
    }

    /// Returns the pool for a round
    pub fn questions(&self, round: Round) -> &[BankQuestion] {
        &self.rounds[round]
    }

    /// Returns a question by its 0-based position in a round's pool
    pub fn question(&self, round: Round, index: usize) -> Option<&BankQuestion> {
        self.rounds[round].get(index)
    }

    /// Number of questions authored for a round
    pub fn len(&self, round: Round) -> usize {
        self.rounds[round].len()
    }

    /// Whether a round has no authored questions
    pub fn is_empty(&self, round: Round) -> bool {
        self.rounds[round].is_empty()
    }

    /// Authors a single question slot by hand
    ///
    /// Slots below `slot` that were never authored are filled with
    /// placeholder questions so the pool stays contiguous.
    ///
    /// # Arguments
    ///
    /// * `round` - The round being configured
    /// * `slot` - 1-based slot, at most the round's configured bank size
    /// * `question` - The question content
    /// * `options` - Show configuration providing the bank size
    ///
    /// # Errors
    ///
    /// Returns `Error::SlotOutOfRange` for slots outside the configured size,
    /// or the question/answer validation errors.
    pub fn set_question(
        &mut self,
        round: Round,
        slot: usize,
        question: &ImportQuestion,
        options: &Options,
    ) -> Result<(), Error> {
        let size = options.round(round).bank_size;
        if slot == 0 || slot > size {
            return Err(Error::SlotOutOfRange { round, slot, size });
        }
        let question = BankQuestion::from_import(round, slot, question)?;

        let pool = &mut self.rounds[round];
        while pool.len() < slot {
            pool.push(BankQuestion::placeholder(pool.len() + 1, "Question text here"));
        }
        pool[slot - 1] = question;
        Ok(())
    }
}
