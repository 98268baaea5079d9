//! Quiz achievements.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

/// Points recorded in the activity feed for each achievement.
pub const ACHIEVEMENT_POINTS: u32 = 50;

/// Something a quiz run can earn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Achievement {
    /// Every question right.
    PerfectScore,
    /// Under five seconds per answer on average.
    SpeedDemon,
    /// Five or more right in a row.
    StreakMaster,
    /// Ten or more right.
    KnowledgeMaster,
    /// Finished with more than two minutes on the clock.
    TimeLord,
}

impl Achievement {
    /// Label shown to the player and written to the activity feed.
    pub fn label(self) -> &'static str {
        match self {
            Self::PerfectScore => "Perfect Score! 🏆",
            Self::SpeedDemon => "Speed Demon! ⚡",
            Self::StreakMaster => "Streak Master! 🔥",
            Self::KnowledgeMaster => "Knowledge Master! 🎓",
            Self::TimeLord => "Time Lord! ⌛",
        }
    }
}

/// The numbers achievements are judged on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AchievementInput {
    /// Raw quiz points.
    pub score: u32,
    /// Questions in the quiz.
    pub question_count: u32,
    /// Questions the player answered.
    pub answered: u32,
    /// Correct answers.
    pub correct: u32,
    /// Longest run of correct answers.
    pub best_streak: u32,
    /// Mean seconds per answered question.
    pub average_time: f64,
    /// Seconds left when the quiz ended.
    pub time_left: u32,
}

/// Every achievement `input` qualifies for, in display order.
pub fn earned_achievements(input: &AchievementInput, points_per_correct: u32) -> Vec<Achievement> {
    Achievement::iter()
        .filter(|achievement| match achievement {
            Achievement::PerfectScore => {
                input.question_count > 0 && input.score == input.question_count * points_per_correct
            }
            Achievement::SpeedDemon => input.answered > 0 && input.average_time < 5.0,
            Achievement::StreakMaster => input.best_streak >= 5,
            Achievement::KnowledgeMaster => input.correct >= 10,
            Achievement::TimeLord => input.time_left > 120,
        })
        .collect()
}
