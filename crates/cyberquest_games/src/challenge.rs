//! Challenge content and answer predicates.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::Difficulty;

/// How a submitted answer is compared against a challenge's solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerCheck {
    /// Byte-for-byte equality.
    Exact,
    /// Equality ignoring ASCII case.
    IgnoreCase,
    /// The input contains the solution, ignoring case.
    ContainsIgnoreCase,
    /// Free-text investigation answer.
    ///
    /// Matches when the trimmed, lower-cased input equals an accepted
    /// answer, or when it mentions a keyword and overlaps an accepted
    /// answer in either direction.
    Osint {
        /// Answers accepted verbatim.
        accepted: Vec<String>,
        /// Terms at least one of which must appear in a fuzzy match.
        keywords: Vec<String>,
    },
}

impl AnswerCheck {
    /// Applies the predicate to `input` against `solution`.
    #[instrument(skip(self, input, solution))]
    pub fn matches(&self, input: &str, solution: &str) -> bool {
        let matched = match self {
            Self::Exact => input == solution,
            Self::IgnoreCase => input.eq_ignore_ascii_case(solution),
            Self::ContainsIgnoreCase => input
                .to_lowercase()
                .contains(&solution.to_lowercase()),
            Self::Osint { accepted, keywords } => osint_matches(input, accepted, keywords),
        };
        debug!(matched, "Answer checked");
        matched
    }
}

fn osint_matches(input: &str, accepted: &[String], keywords: &[String]) -> bool {
    let input = input.trim().to_lowercase();
    if accepted.iter().any(|a| a.to_lowercase() == input) {
        return true;
    }

    let has_keyword = keywords
        .iter()
        .any(|k| input.contains(&k.to_lowercase()));
    let overlaps_accepted = accepted.iter().any(|a| {
        let a = a.to_lowercase();
        input.contains(&a) || a.contains(&input)
    });

    has_keyword && overlaps_accepted
}

/// One challenge in a game's fixed content array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Challenge {
    id: String,
    title: String,
    description: String,
    difficulty: Difficulty,
    points: u32,
    /// `None` for untimed games that award flat points.
    time_limit_secs: Option<u32>,
    /// The material the player works on: ciphertext, code, logs, a dump.
    material: String,
    hint: String,
    tutorial: Option<String>,
    #[serde(skip_serializing)]
    solution: String,
    #[serde(skip_serializing)]
    check: AnswerCheck,
}

impl Challenge {
    /// Creates a timed challenge.
    #[allow(clippy::too_many_arguments)]
    pub fn timed(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        difficulty: Difficulty,
        points: u32,
        time_limit_secs: u32,
        material: impl Into<String>,
        hint: impl Into<String>,
        solution: impl Into<String>,
        check: AnswerCheck,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            difficulty,
            points,
            time_limit_secs: Some(time_limit_secs),
            material: material.into(),
            hint: hint.into(),
            tutorial: None,
            solution: solution.into(),
            check,
        }
    }

    /// Creates an untimed, flat-points challenge.
    #[allow(clippy::too_many_arguments)]
    pub fn untimed(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        difficulty: Difficulty,
        points: u32,
        material: impl Into<String>,
        hint: impl Into<String>,
        solution: impl Into<String>,
        check: AnswerCheck,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            difficulty,
            points,
            time_limit_secs: None,
            material: material.into(),
            hint: hint.into(),
            tutorial: None,
            solution: solution.into(),
            check,
        }
    }

    /// Attaches a tutorial shown before the challenge.
    pub fn with_tutorial(mut self, tutorial: impl Into<String>) -> Self {
        self.tutorial = Some(tutorial.into());
        self
    }

    /// Whether `input` solves this challenge.
    pub fn is_solved_by(&self, input: &str) -> bool {
        self.check.matches(input, &self.solution)
    }
}
