//! The quick test: a question bank, timed sessions and achievements.

mod achievements;
mod bank;
mod session;

pub use achievements::{ACHIEVEMENT_POINTS, Achievement, AchievementInput, earned_achievements};
pub use bank::{MAX_QUESTIONS, QUIZ_CATEGORIES, Question, question_bank, select_questions};
pub use session::{
    AnswerFeedback, GENERAL_CATEGORY, MIXED_DIFFICULTY, POINTS_PER_CORRECT, QUIZ_TIME_LIMIT_SECS,
    QuizFilter, QuizOutcome, QuizSession, next_quiz_average,
};
