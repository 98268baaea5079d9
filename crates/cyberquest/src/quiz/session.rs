//! A timed quiz run.

use chrono::{DateTime, Utc};
use cyberquest_games::{Countdown, Difficulty, GameError};
use derive_getters::Getters;
use derive_new::new;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::achievements::{Achievement, AchievementInput, earned_achievements};
use super::bank::Question;

/// Seconds allowed for the whole quiz.
pub const QUIZ_TIME_LIMIT_SECS: u32 = 180;

/// Points per correct answer.
pub const POINTS_PER_CORRECT: u32 = 10;

/// Category recorded when the quiz was not filtered by category.
pub const GENERAL_CATEGORY: &str = "general";

/// Difficulty recorded when the quiz was not filtered by difficulty.
pub const MIXED_DIFFICULTY: &str = "mixed";

const ENCOURAGEMENTS: [&str; 5] = [
    "Great work! 🌟",
    "You're on fire! 🔥",
    "Keep it up! 💪",
    "Brilliant! 🎯",
    "Outstanding! 🏆",
];

/// How the questions were chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct QuizFilter {
    category: Option<String>,
    difficulty: Option<Difficulty>,
}

impl QuizFilter {
    /// Category as stored in quiz history.
    pub fn category_label(&self) -> String {
        self.category
            .clone()
            .unwrap_or_else(|| GENERAL_CATEGORY.to_string())
    }

    /// Difficulty as stored in quiz history.
    pub fn difficulty_label(&self) -> String {
        self.difficulty
            .map(|d| d.to_string())
            .unwrap_or_else(|| MIXED_DIFFICULTY.to_string())
    }
}

/// What the player sees after answering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct AnswerFeedback {
    question_id: String,
    selected: usize,
    correct: bool,
    correct_answer: usize,
    explanation: String,
    message: String,
    score: u32,
    streak: u32,
    finished: bool,
}

/// The result of a finished quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct QuizOutcome {
    category: String,
    difficulty: String,
    question_count: u32,
    answered: u32,
    correct: u32,
    incorrect: u32,
    /// Raw points, ten per correct answer.
    score: u32,
    /// `round(correct / question_count * 100)`.
    percentage: u32,
    /// Seconds.
    time_taken: u32,
    time_left: u32,
    best_streak: u32,
    /// Mean seconds per answered question.
    average_time: f64,
    answered_ids: Vec<String>,
    achievements: Vec<Achievement>,
}

/// Quiz average after one more quiz scoring `percentage`.
pub fn next_quiz_average(average: u32, taken: u32, percentage: u32) -> u32 {
    let total = f64::from(average) * f64::from(taken) + f64::from(percentage);
    (total / f64::from(taken + 1)).round() as u32
}

/// One player's pass through a set of questions against a three minute
/// clock.
#[derive(Debug, Clone, Getters)]
pub struct QuizSession {
    #[getter(skip)]
    questions: Vec<Question>,
    filter: QuizFilter,
    current: usize,
    countdown: Countdown,
    question_started_at: DateTime<Utc>,
    score: u32,
    correct: u32,
    incorrect: u32,
    streak: u32,
    best_streak: u32,
    average_time: f64,
    answered_ids: Vec<String>,
    finished_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Starts the clock on `questions`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError`] when no question matched the filter.
    #[instrument(skip(questions), fields(count = questions.len()))]
    pub fn start(
        questions: Vec<Question>,
        filter: QuizFilter,
        now: DateTime<Utc>,
    ) -> Result<Self, GameError> {
        if questions.is_empty() {
            return Err(GameError::new("No questions match the selected filters"));
        }
        info!(
            category = %filter.category_label(),
            difficulty = %filter.difficulty_label(),
            "Quiz started"
        );
        Ok(Self {
            questions,
            filter,
            current: 0,
            countdown: Countdown::start(now, QUIZ_TIME_LIMIT_SECS),
            question_started_at: now,
            score: 0,
            correct: 0,
            incorrect: 0,
            streak: 0,
            best_streak: 0,
            average_time: 0.0,
            answered_ids: Vec::new(),
            finished_at: None,
        })
    }

    /// The questions in play.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// The question awaiting an answer.
    pub fn current_question(&self) -> Option<&Question> {
        if self.is_finished() {
            None
        } else {
            self.questions.get(self.current)
        }
    }

    /// Seconds left, frozen once the quiz ends.
    pub fn time_left(&self, now: DateTime<Utc>) -> u32 {
        self.countdown.time_left(self.finished_at.unwrap_or(now))
    }

    /// Whether the quiz has ended.
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    /// Ends the quiz if the clock has run out. Returns whether it ended on
    /// this call.
    pub fn expire(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_finished() || !self.countdown.is_expired(now) {
            return false;
        }
        let limit = chrono::Duration::seconds(i64::from(QUIZ_TIME_LIMIT_SECS));
        self.finished_at = Some(*self.countdown.started_at() + limit);
        warn!(answered = self.answered_ids.len(), "Quiz time ran out");
        true
    }

    /// Answers the current question with option `index`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError`] if the quiz is over, including when the clock
    /// ran out before this answer, or `index` is not an option.
    #[instrument(skip(self, rng))]
    pub fn answer<R: Rng + ?Sized>(
        &mut self,
        index: usize,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<AnswerFeedback, GameError> {
        if self.expire(now) {
            return Err(GameError::new("Time is up"));
        }
        let question = self
            .current_question()
            .ok_or_else(|| GameError::new("Quiz is already finished"))?
            .clone();
        if index >= question.options().len() {
            return Err(GameError::new(format!(
                "Option {} out of range for question {}",
                index,
                question.id()
            )));
        }

        let correct = index == *question.correct_answer();
        let message = if correct {
            self.correct += 1;
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
            self.score += POINTS_PER_CORRECT;
            let cheer = ENCOURAGEMENTS.choose(rng).copied().unwrap_or("Well done!");
            format!("Correct! {}", cheer)
        } else {
            self.incorrect += 1;
            self.streak = 0;
            "Incorrect. Keep learning!".to_string()
        };

        let spent = (now - self.question_started_at).num_seconds().max(0) as f64;
        let answered_before = self.current as f64;
        self.average_time = (self.average_time * answered_before + spent) / (answered_before + 1.0);
        self.answered_ids.push(question.id().clone());

        self.current += 1;
        self.question_started_at = now;
        if self.current >= self.questions.len() {
            self.finished_at = Some(now);
            info!(score = self.score, correct = self.correct, "Quiz finished");
        } else {
            debug!(current = self.current, correct, "Question answered");
        }

        Ok(AnswerFeedback {
            question_id: question.id().clone(),
            selected: index,
            correct,
            correct_answer: *question.correct_answer(),
            explanation: question.explanation().clone(),
            message,
            score: self.score,
            streak: self.streak,
            finished: self.is_finished(),
        })
    }

    /// Summarises the quiz as of `now`; a finished quiz reports the moment
    /// it ended.
    pub fn outcome(&self, now: DateTime<Utc>) -> QuizOutcome {
        let question_count = self.questions.len() as u32;
        let answered = self.answered_ids.len() as u32;
        let time_left = self.time_left(now);
        let percentage = if question_count == 0 {
            0
        } else {
            ((f64::from(self.correct) / f64::from(question_count)) * 100.0).round() as u32
        };
        let achievements = earned_achievements(
            &AchievementInput {
                score: self.score,
                question_count,
                answered,
                correct: self.correct,
                best_streak: self.best_streak,
                average_time: self.average_time,
                time_left,
            },
            POINTS_PER_CORRECT,
        );

        QuizOutcome {
            category: self.filter.category_label(),
            difficulty: self.filter.difficulty_label(),
            question_count,
            answered,
            correct: self.correct,
            incorrect: self.incorrect,
            score: self.score,
            percentage,
            time_taken: QUIZ_TIME_LIMIT_SECS - time_left,
            time_left,
            best_streak: self.best_streak,
            average_time: self.average_time,
            answered_ids: self.answered_ids.clone(),
            achievements,
        }
    }
}
