//! Typed rows and write payloads for every table.

use chrono::{DateTime, Utc};
use cyberquest_games::Level;
use derive_getters::Getters;
use derive_new::new;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

/// Notification preferences stored on the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct Notifications {
    email: bool,
    quiz: bool,
    achievements: bool,
    security: bool,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(true, true, true, true)
    }
}

/// Privacy preferences stored on the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
#[serde(rename_all = "camelCase")]
pub struct Privacy {
    show_profile: bool,
    show_activity: bool,
    show_stats: bool,
}

impl Default for Privacy {
    fn default() -> Self {
        Self::new(true, true, true)
    }
}

/// A `profiles` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct Profile {
    id: String,
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    points: u32,
    #[serde(default)]
    badges: Vec<String>,
    #[serde(default)]
    level: Level,
    #[serde(default)]
    quiz_score: u32,
    #[serde(default)]
    total_quizzes_taken: u32,
    #[serde(default)]
    completed_courses: Vec<String>,
    #[serde(default)]
    answered_questions: Vec<String>,
    #[serde(default)]
    notifications: Notifications,
    #[serde(default)]
    privacy: Privacy,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// Whether `item_id` is in the completed list.
    pub fn has_completed(&self, item_id: &str) -> bool {
        self.completed_courses.iter().any(|c| c == item_id)
    }
}

/// Name used when sign-up metadata carries none.
pub const DEFAULT_PROFILE_NAME: &str = "Anonymous Hacker";

/// Insert payload for a fresh profile.
#[derive(Debug, Clone, PartialEq, Serialize, Getters)]
pub struct NewProfile {
    id: String,
    email: String,
    name: String,
    points: u32,
    badges: Vec<String>,
    level: Level,
    quiz_score: u32,
    total_quizzes_taken: u32,
    completed_courses: Vec<String>,
    notifications: Notifications,
    privacy: Privacy,
}

impl NewProfile {
    /// Zero points, beginner level, every preference switched on.
    pub fn for_user(id: impl Into<String>, email: impl Into<String>, name: Option<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PROFILE_NAME.to_string()),
            points: 0,
            badges: Vec::new(),
            level: Level::Beginner,
            quiz_score: 0,
            total_quizzes_taken: 0,
            completed_courses: Vec::new(),
            notifications: Notifications::default(),
            privacy: Privacy::default(),
        }
    }
}

/// Partial update of a profile. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Setters)]
#[setters(strip_option)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    points: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    level: Option<Level>,
    #[serde(skip_serializing_if = "Option::is_none")]
    quiz_score: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_quizzes_taken: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed_courses: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    answered_questions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notifications: Option<Notifications>,
    #[serde(skip_serializing_if = "Option::is_none")]
    privacy: Option<Privacy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

/// A `user_progress` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct UserProgress {
    user_id: String,
    #[serde(default)]
    total_games_played: u32,
    #[serde(default)]
    total_courses_completed: u32,
    #[serde(default)]
    total_quizzes_completed: u32,
    /// Minutes.
    #[serde(default)]
    total_time_spent: u32,
    #[serde(default)]
    highest_score: u32,
    #[serde(default)]
    current_streak: u32,
    #[serde(default)]
    best_streak: u32,
    #[serde(default)]
    last_activity_at: Option<DateTime<Utc>>,
}

impl UserProgress {
    /// All counters at zero.
    pub fn zeroed(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            total_games_played: 0,
            total_courses_completed: 0,
            total_quizzes_completed: 0,
            total_time_spent: 0,
            highest_score: 0,
            current_streak: 0,
            best_streak: 0,
            last_activity_at: None,
        }
    }
}

/// Partial update of a progress row. `user_id` is only set for upserts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Setters)]
#[setters(strip_option)]
pub struct ProgressPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_games_played: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_courses_completed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_quizzes_completed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_time_spent: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    highest_score: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    best_streak: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_activity_at: Option<DateTime<Utc>>,
}

/// Kind of entry in the activity feed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ActivityType {
    /// A finished mini-game.
    Game,
    /// A finished quiz.
    Quiz,
    /// A quiz achievement.
    Achievement,
    /// A completed roadmap item.
    Roadmap,
    /// A completed course module.
    Course,
    /// A completed lab challenge.
    Lab,
}

/// A `user_activity` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct UserActivity {
    #[serde(default)]
    id: Option<String>,
    user_id: String,
    activity_type: ActivityType,
    description: String,
    #[serde(default)]
    points_earned: u32,
    #[serde(default)]
    metadata: Value,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

/// Insert payload for the activity feed.
#[derive(Debug, Clone, PartialEq, Serialize, Getters, new)]
pub struct NewActivity {
    user_id: String,
    activity_type: ActivityType,
    description: String,
    points_earned: u32,
    metadata: Value,
}

/// A `quiz_history` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct QuizHistory {
    user_id: String,
    /// Percentage.
    score: u32,
    questions_answered: u32,
    correct_answers: u32,
    /// Seconds.
    time_taken: u32,
    category: String,
    difficulty: String,
    #[serde(default)]
    best_streak: u32,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

/// Insert payload for quiz history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters, new)]
pub struct NewQuizHistory {
    user_id: String,
    score: u32,
    questions_answered: u32,
    correct_answers: u32,
    time_taken: u32,
    category: String,
    difficulty: String,
    best_streak: u32,
}

/// A `game_history` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct GameHistory {
    user_id: String,
    game_type: String,
    score: u32,
    /// Seconds.
    duration: u32,
    #[serde(default)]
    difficulty: String,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    metadata: Value,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

/// Insert payload for game history.
#[derive(Debug, Clone, PartialEq, Serialize, Getters, new)]
pub struct NewGameHistory {
    user_id: String,
    game_type: String,
    score: u32,
    duration: u32,
    difficulty: String,
    completed: bool,
    metadata: Value,
}

/// A `test_results` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct TestResult {
    user_id: String,
    score: u32,
    /// Percentage of questions answered correctly.
    accuracy: u32,
    streak: u32,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

/// Insert payload for test results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters, new)]
pub struct NewTestResult {
    user_id: String,
    score: u32,
    accuracy: u32,
    streak: u32,
}
