//! Progress bookkeeping: profile rows, history, activity and stats.

use std::sync::Arc;

use chrono::Utc;
use cyberquest_games::{GameKind, Level, lab_level, level_for_quiz_points};
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::backend::{fetch_all, fetch_optional, insert_many, insert_one, update_where};
use crate::catalog::{find_course, find_item, find_lab};
use crate::quiz::{ACHIEVEMENT_POINTS, QuizOutcome, next_quiz_average};
use crate::{
    ActivityType, AuthContext, AuthUser, Backend, BackendError, BackendErrorKind, Filter,
    GameHistory, NewActivity, NewGameHistory, NewProfile, NewQuizHistory, NewTestResult,
    Notifications, Privacy, Profile, ProfilePatch, ProgressPatch, Query, QuizHistory, Table,
    TestResult, TimeRange, UserActivity, UserProgress,
};

const RECENT_GAMES: usize = 10;
const RECENT_QUIZZES: usize = 10;
const RECENT_ACTIVITY: usize = 20;
const RECENT_ACHIEVEMENTS: usize = 5;

/// A finished game to persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, new)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    game_type: GameKind,
    score: u32,
    /// Seconds.
    duration: u32,
    difficulty: String,
    completed: bool,
    metadata: Value,
}

/// Result of a roadmap item completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct RoadmapCompletion {
    /// False when the item was already complete.
    awarded: bool,
    points: u32,
}

/// Result of a course module completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ModuleCompletion {
    points_awarded: u32,
    /// Set once every module of the course is complete.
    certification: Option<String>,
}

/// Result of a lab challenge completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct LabCompletion {
    points_awarded: u32,
    level: Level,
}

/// Everything the dashboard shows about a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct UserStats {
    total_points: u32,
    completed_courses: usize,
    quiz_average: f64,
    best_streak: u32,
    total_activities: usize,
    recent_achievements: Vec<UserActivity>,
    progress: Option<UserProgress>,
    game_history: Vec<GameHistory>,
    quiz_history: Vec<QuizHistory>,
    profile: Profile,
    activities: Vec<UserActivity>,
}

/// Aggregates over test results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct TestStats {
    avg_score: u32,
    avg_accuracy: u32,
    best_streak: u32,
    total_tests: usize,
}

impl TestStats {
    /// `None` when there are no results.
    pub fn from_results(results: &[TestResult]) -> Option<Self> {
        if results.is_empty() {
            return None;
        }
        let count = results.len() as f64;
        let score: f64 = results.iter().map(|r| f64::from(*r.score())).sum();
        let accuracy: f64 = results.iter().map(|r| f64::from(*r.accuracy())).sum();
        Some(Self {
            avg_score: (score / count).round() as u32,
            avg_accuracy: (accuracy / count).round() as u32,
            best_streak: results.iter().map(|r| *r.streak()).max().unwrap_or(0),
            total_tests: results.len(),
        })
    }
}

/// The profile page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct ProfileOverview {
    time_range: TimeRange,
    profile: Profile,
    activities: Vec<UserActivity>,
    test_results: Vec<TestResult>,
    stats: Option<TestStats>,
}

/// Quiz numbers on the settings page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct SettingsStats {
    total_quizzes: usize,
    average_score: u32,
    best_streak: u32,
    total_points: u32,
}

/// The settings page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct SettingsView {
    name: String,
    email: String,
    notifications: Notifications,
    privacy: Privacy,
    stats: SettingsStats,
}

/// Editable settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct SettingsUpdate {
    name: String,
    notifications: Notifications,
    privacy: Privacy,
}

#[derive(Debug, Deserialize)]
struct QuizScoreRow {
    score: u32,
    #[serde(default)]
    best_streak: u32,
}

/// Reads and writes the signed-in user's progress through the backend.
///
/// Cheap to clone. Every write is a single request with no retry; callers
/// decide whether a failure matters.
#[derive(Debug, Clone)]
pub struct ProgressService {
    backend: Arc<dyn Backend>,
    auth: AuthContext,
    ensure_lock: Arc<Mutex<()>>,
}

impl ProgressService {
    /// Creates a service acting for whoever is signed in on `auth`.
    #[instrument(skip_all)]
    pub fn new(backend: Arc<dyn Backend>, auth: AuthContext) -> Self {
        info!("Creating progress service");
        Self {
            backend,
            auth,
            ensure_lock: Arc::new(Mutex::new(())),
        }
    }

    /// The auth context this service acts for.
    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    fn profile_query(user_id: &str) -> Query {
        Query::from(Table::Profiles).eq("id", user_id)
    }

    fn profile_filter(user_id: &str) -> [Filter; 1] {
        [Filter::eq("id", user_id)]
    }

    async fn fetch_profile(&self, user_id: &str) -> Result<Option<Profile>, BackendError> {
        fetch_optional(self.backend.as_ref(), &Self::profile_query(user_id)).await
    }

    async fn fetch_progress(&self, user_id: &str) -> Result<UserProgress, BackendError> {
        let query = Query::from(Table::UserProgress).eq("user_id", user_id);
        Ok(fetch_optional(self.backend.as_ref(), &query)
            .await?
            .unwrap_or_else(|| UserProgress::zeroed(user_id)))
    }

    async fn update_profile(&self, user_id: &str, patch: &ProfilePatch) -> Result<(), BackendError> {
        update_where(
            self.backend.as_ref(),
            Table::Profiles,
            &Self::profile_filter(user_id),
            patch,
        )
        .await
    }

    async fn upsert_progress(&self, patch: ProgressPatch) -> Result<(), BackendError> {
        let row = serde_json::to_value(&patch)?;
        self.backend.upsert(Table::UserProgress, row, "user_id").await
    }

    async fn log_activity(&self, activity: &NewActivity) -> Result<(), BackendError> {
        insert_one(self.backend.as_ref(), Table::UserActivity, activity).await
    }

    /// The signed-in user and their profile, creating the profile if needed.
    async fn signed_in(&self) -> Result<(AuthUser, Profile), BackendError> {
        let user = self.auth.require_user()?;
        let profile = self.ensure_profile(&user).await?;
        Ok((user, profile))
    }

    /// Returns the user's profile, first creating it and a zeroed progress
    /// row if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if a read or insert fails.
    #[instrument(skip(self, user), fields(user_id = %user.id()))]
    pub async fn ensure_profile(&self, user: &AuthUser) -> Result<Profile, BackendError> {
        let _guard = self.ensure_lock.lock().await;
        if let Some(profile) = self.fetch_profile(user.id()).await? {
            debug!("Profile exists");
            return Ok(profile);
        }

        let new_profile = NewProfile::for_user(
            user.id().clone(),
            user.email().clone().unwrap_or_default(),
            user.user_metadata().name().clone(),
        );
        insert_one(self.backend.as_ref(), Table::Profiles, &new_profile).await?;
        insert_one(
            self.backend.as_ref(),
            Table::UserProgress,
            &UserProgress::zeroed(user.id().clone()),
        )
        .await?;
        info!(name = %new_profile.name(), "Profile created");

        self.fetch_profile(user.id())
            .await?
            .ok_or_else(|| BackendError::not_found("Profile missing after insert"))
    }

    /// Adds `points` to the profile and sets its level.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when signed out or the update fails.
    #[instrument(skip(self))]
    pub async fn award_points(&self, points: u32, level: Level) -> Result<u32, BackendError> {
        let (user, profile) = self.signed_in().await?;
        let total = profile.points() + points;
        self.update_profile(
            user.id(),
            &ProfilePatch::default().points(total).level(level),
        )
        .await?;
        info!(user_id = %user.id(), points, total, %level, "Points awarded");
        Ok(total)
    }

    /// Appends a game history row, bumps the progress counters and logs a
    /// game activity.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when signed out or any write fails.
    #[instrument(skip(self, record), fields(game = %record.game_type(), score = record.score()))]
    pub async fn record_game(&self, record: &GameRecord) -> Result<(), BackendError> {
        let user = self.auth.require_user()?;
        let user_id = user.id().clone();

        insert_one(
            self.backend.as_ref(),
            Table::GameHistory,
            &NewGameHistory::new(
                user_id.clone(),
                record.game_type.to_string(),
                record.score,
                record.duration,
                record.difficulty.clone(),
                record.completed,
                record.metadata.clone(),
            ),
        )
        .await?;

        let progress = self.fetch_progress(&user_id).await?;
        self.upsert_progress(
            ProgressPatch::default()
                .user_id(user_id.clone())
                .total_games_played(progress.total_games_played() + 1)
                .total_time_spent(progress.total_time_spent() + record.duration / 60)
                .highest_score((*progress.highest_score()).max(record.score))
                .last_activity_at(Utc::now()),
        )
        .await?;

        self.log_activity(&NewActivity::new(
            user_id,
            ActivityType::Game,
            format!(
                "Completed {} game with score {}",
                record.game_type, record.score
            ),
            record.score,
            serde_json::to_value(record)?,
        ))
        .await?;
        info!("Game recorded");
        Ok(())
    }

    /// Persists a finished quiz: history row, profile average and points,
    /// activity entries for the quiz and each achievement, a test result and
    /// the progress counters.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when signed out or any write fails.
    #[instrument(skip(self, outcome), fields(score = outcome.score(), percentage = outcome.percentage()))]
    pub async fn record_quiz(&self, outcome: &QuizOutcome) -> Result<(), BackendError> {
        let (user, profile) = self.signed_in().await?;
        let user_id = user.id().clone();
        let percentage = *outcome.percentage();

        insert_one(
            self.backend.as_ref(),
            Table::QuizHistory,
            &NewQuizHistory::new(
                user_id.clone(),
                percentage,
                *outcome.question_count(),
                *outcome.correct(),
                *outcome.time_taken(),
                outcome.category().clone(),
                outcome.difficulty().clone(),
                *outcome.best_streak(),
            ),
        )
        .await?;

        let taken = *profile.total_quizzes_taken();
        let mut answered = profile.answered_questions().clone();
        for id in outcome.answered_ids() {
            if !answered.contains(id) {
                answered.push(id.clone());
            }
        }
        self.update_profile(
            &user_id,
            &ProfilePatch::default()
                .quiz_score(next_quiz_average(*profile.quiz_score(), taken, percentage))
                .total_quizzes_taken(taken + 1)
                .points(profile.points() + outcome.score())
                .level(level_for_quiz_points(*outcome.score()))
                .answered_questions(answered),
        )
        .await?;

        let mut activities = vec![NewActivity::new(
            user_id.clone(),
            ActivityType::Quiz,
            format!(
                "Completed {} quiz with score {}%",
                outcome.category(),
                percentage
            ),
            percentage,
            json!({
                "category": outcome.category(),
                "difficulty": outcome.difficulty(),
                "correct_answers": outcome.correct(),
                "questions_answered": outcome.question_count(),
            }),
        )];
        activities.extend(outcome.achievements().iter().map(|achievement| {
            NewActivity::new(
                user_id.clone(),
                ActivityType::Achievement,
                achievement.label().to_string(),
                ACHIEVEMENT_POINTS,
                json!({
                    "quiz_score": percentage,
                    "category": outcome.category(),
                    "best_streak": outcome.best_streak(),
                }),
            )
        }));
        insert_many(self.backend.as_ref(), Table::UserActivity, &activities).await?;

        insert_one(
            self.backend.as_ref(),
            Table::TestResults,
            &NewTestResult::new(user_id.clone(), percentage, percentage, *outcome.best_streak()),
        )
        .await?;

        let progress = self.fetch_progress(&user_id).await?;
        self.upsert_progress(
            ProgressPatch::default()
                .user_id(user_id)
                .total_quizzes_completed(progress.total_quizzes_completed() + 1)
                .highest_score((*progress.highest_score()).max(percentage))
                .best_streak((*progress.best_streak()).max(*outcome.best_streak()))
                .last_activity_at(Utc::now()),
        )
        .await?;

        info!(
            achievements = outcome.achievements().len(),
            "Quiz recorded"
        );
        Ok(())
    }

    /// Adds question ids to the profile's answered list.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when signed out or the update fails.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn record_answered_questions(&self, ids: &[String]) -> Result<(), BackendError> {
        let (user, profile) = self.signed_in().await?;
        let mut answered = profile.answered_questions().clone();
        let before = answered.len();
        for id in ids {
            if !answered.contains(id) {
                answered.push(id.clone());
            }
        }
        if answered.len() == before {
            return Ok(());
        }
        self.update_profile(
            user.id(),
            &ProfilePatch::default().answered_questions(answered),
        )
        .await
    }

    /// Marks a roadmap item complete and awards its points. Completing an
    /// item twice awards nothing the second time.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] for an unknown item, when signed out, or
    /// when a write fails.
    #[instrument(skip(self))]
    pub async fn complete_roadmap_item(
        &self,
        item_id: &str,
    ) -> Result<RoadmapCompletion, BackendError> {
        let (item, category) = find_item(item_id)
            .ok_or_else(|| BackendError::not_found(format!("Unknown roadmap item {}", item_id)))?;
        let (user, profile) = self.signed_in().await?;
        let points = item.points();

        if profile.has_completed(item_id) {
            debug!("Roadmap item already complete");
            return Ok(RoadmapCompletion {
                awarded: false,
                points: 0,
            });
        }

        let mut completed = profile.completed_courses().clone();
        let previously_completed = completed.len() as u32;
        completed.push(item_id.to_string());
        self.update_profile(
            user.id(),
            &ProfilePatch::default()
                .completed_courses(completed)
                .points(profile.points() + points),
        )
        .await?;

        self.log_activity(&NewActivity::new(
            user.id().clone(),
            ActivityType::Roadmap,
            format!("Completed {} in {}", item.name(), category),
            points,
            json!({
                "itemId": item_id,
                "itemName": item.name(),
                "category": category,
                "points": points,
            }),
        ))
        .await?;

        self.upsert_progress(
            ProgressPatch::default()
                .user_id(user.id().clone())
                .total_courses_completed(previously_completed + 1)
                .last_activity_at(Utc::now()),
        )
        .await?;

        info!(points, "Roadmap item completed");
        Ok(RoadmapCompletion {
            awarded: true,
            points,
        })
    }

    /// Flips a roadmap item between done and not done without touching
    /// points. Returns whether it is now done.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] for an unknown item, when signed out, or
    /// when the update fails.
    #[instrument(skip(self))]
    pub async fn toggle_roadmap_item(&self, item_id: &str) -> Result<bool, BackendError> {
        find_item(item_id)
            .ok_or_else(|| BackendError::not_found(format!("Unknown roadmap item {}", item_id)))?;
        let (user, profile) = self.signed_in().await?;

        let mut completed = profile.completed_courses().clone();
        let now_done = if profile.has_completed(item_id) {
            completed.retain(|c| c != item_id);
            false
        } else {
            completed.push(item_id.to_string());
            true
        };
        self.update_profile(user.id(), &ProfilePatch::default().completed_courses(completed))
            .await?;
        debug!(now_done, "Roadmap item toggled");
        Ok(now_done)
    }

    /// Completes module `index` of a course and awards its reward once.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound` [`BackendError`] for an unknown course or
    /// module, `Forbidden` for premium courses and locked modules, and any
    /// backend failure.
    #[instrument(skip(self))]
    pub async fn complete_course_module(
        &self,
        course_id: &str,
        index: usize,
    ) -> Result<ModuleCompletion, BackendError> {
        let course = find_course(course_id)
            .ok_or_else(|| BackendError::not_found(format!("Unknown course {}", course_id)))?;
        if *course.is_premium() {
            warn!("Premium course module requested");
            return Err(BackendError::new(
                BackendErrorKind::Forbidden,
                "Premium content requires a subscription",
            ));
        }
        let module = course.modules().get(index).cloned().ok_or_else(|| {
            BackendError::not_found(format!("Course {} has no module {}", course_id, index))
        })?;

        let (user, profile) = self.signed_in().await?;
        if !course.is_module_unlocked(&profile, index) {
            return Err(BackendError::new(
                BackendErrorKind::Forbidden,
                "Complete the previous module first",
            ));
        }

        let certification = |profile: &Profile| {
            course
                .is_complete_for(profile)
                .then(|| course.certification().clone())
        };

        let module_id = course.module_id(index);
        if profile.has_completed(&module_id) {
            debug!("Module already complete");
            return Ok(ModuleCompletion {
                points_awarded: 0,
                certification: certification(&profile),
            });
        }

        let reward = *module.interactive().reward();
        let mut completed = profile.completed_courses().clone();
        completed.push(module_id);
        self.update_profile(
            user.id(),
            &ProfilePatch::default()
                .points(profile.points() + reward)
                .completed_courses(completed),
        )
        .await?;

        self.log_activity(&NewActivity::new(
            user.id().clone(),
            ActivityType::Course,
            format!("Completed {} in {}", module.title(), course.title()),
            reward,
            json!({ "courseId": course_id, "module": index }),
        ))
        .await?;

        let updated = self
            .fetch_profile(user.id())
            .await?
            .ok_or_else(|| BackendError::not_found("Profile disappeared"))?;
        let certification = certification(&updated);
        info!(reward, certified = certification.is_some(), "Course module completed");
        Ok(ModuleCompletion {
            points_awarded: reward,
            certification,
        })
    }

    /// Completes challenge `index` of a lab. Each challenge awards its points
    /// once and sets the level for its size.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound` [`BackendError`] for an unknown lab or
    /// challenge, and any backend failure.
    #[instrument(skip(self))]
    pub async fn complete_lab_challenge(
        &self,
        lab_id: &str,
        index: usize,
    ) -> Result<LabCompletion, BackendError> {
        let lab = find_lab(lab_id)
            .ok_or_else(|| BackendError::not_found(format!("Unknown lab {}", lab_id)))?;
        let challenge = lab.challenges().get(index).cloned().ok_or_else(|| {
            BackendError::not_found(format!("Lab {} has no challenge {}", lab_id, index))
        })?;
        let (user, profile) = self.signed_in().await?;

        let challenge_id = lab.challenge_id(index);
        if profile.has_completed(&challenge_id) {
            debug!("Lab challenge already complete");
            return Ok(LabCompletion {
                points_awarded: 0,
                level: *profile.level(),
            });
        }

        let points = *challenge.points();
        let level = lab_level(points);
        let mut completed = profile.completed_courses().clone();
        completed.push(challenge_id);
        self.update_profile(
            user.id(),
            &ProfilePatch::default()
                .points(profile.points() + points)
                .level(level)
                .completed_courses(completed),
        )
        .await?;

        self.log_activity(&NewActivity::new(
            user.id().clone(),
            ActivityType::Lab,
            format!("Completed {} in {}", challenge.title(), lab.title()),
            points,
            json!({ "labId": lab_id, "challenge": index }),
        ))
        .await?;

        info!(points, %level, "Lab challenge completed");
        Ok(LabCompletion {
            points_awarded: points,
            level,
        })
    }

    /// Profile, progress, recent history and activity with derived totals.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when signed out or any read fails.
    #[instrument(skip(self))]
    pub async fn fetch_user_stats(&self) -> Result<UserStats, BackendError> {
        let (user, profile) = self.signed_in().await?;
        let user_id = user.id().as_str();
        let backend = self.backend.as_ref();

        let progress_query = Query::from(Table::UserProgress).eq("user_id", user_id);
        let games_query = Query::from(Table::GameHistory)
            .eq("user_id", user_id)
            .order("created_at", false)
            .limit(RECENT_GAMES);
        let quizzes_query = Query::from(Table::QuizHistory)
            .eq("user_id", user_id)
            .order("created_at", false)
            .limit(RECENT_QUIZZES);
        let activity_query = Query::from(Table::UserActivity)
            .eq("user_id", user_id)
            .order("created_at", false)
            .limit(RECENT_ACTIVITY);

        let (progress, game_history, quiz_history, activities) = tokio::try_join!(
            fetch_optional::<UserProgress>(backend, &progress_query),
            fetch_all::<GameHistory>(backend, &games_query),
            fetch_all::<QuizHistory>(backend, &quizzes_query),
            fetch_all::<UserActivity>(backend, &activity_query),
        )?;

        let quiz_average = if quiz_history.is_empty() {
            0.0
        } else {
            quiz_history.iter().map(|q| f64::from(*q.score())).sum::<f64>()
                / quiz_history.len() as f64
        };
        let best_streak = quiz_history
            .iter()
            .map(|q| *q.best_streak())
            .max()
            .unwrap_or(0);
        let recent_achievements = activities
            .iter()
            .filter(|a| *a.points_earned() > 0)
            .take(RECENT_ACHIEVEMENTS)
            .cloned()
            .collect();

        debug!(
            games = game_history.len(),
            quizzes = quiz_history.len(),
            activities = activities.len(),
            "User stats fetched"
        );
        Ok(UserStats {
            total_points: *profile.points(),
            completed_courses: profile.completed_courses().len(),
            quiz_average,
            best_streak,
            total_activities: activities.len(),
            recent_achievements,
            progress,
            game_history,
            quiz_history,
            profile,
            activities,
        })
    }

    /// The profile page: activity and test results within `range`, newest
    /// first, with aggregates over the results.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when signed out or any read fails.
    #[instrument(skip(self))]
    pub async fn profile_overview(&self, range: TimeRange) -> Result<ProfileOverview, BackendError> {
        let (user, profile) = self.signed_in().await?;
        let since = range.since(Utc::now()).map(|t| t.to_rfc3339());

        let mut activity_query = Query::from(Table::UserActivity)
            .eq("user_id", user.id())
            .order("created_at", false);
        let mut results_query = Query::from(Table::TestResults)
            .eq("user_id", user.id())
            .order("created_at", false);
        if let Some(since) = &since {
            activity_query = activity_query.gte("created_at", since);
            results_query = results_query.gte("created_at", since);
        }

        let backend = self.backend.as_ref();
        let (activities, test_results) = tokio::try_join!(
            fetch_all::<UserActivity>(backend, &activity_query),
            fetch_all::<TestResult>(backend, &results_query),
        )?;
        let stats = TestStats::from_results(&test_results);

        debug!(
            activities = activities.len(),
            results = test_results.len(),
            "Profile overview fetched"
        );
        Ok(ProfileOverview {
            time_range: range,
            profile,
            activities,
            test_results,
            stats,
        })
    }

    /// The settings page.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when signed out or any read fails.
    #[instrument(skip(self))]
    pub async fn settings(&self) -> Result<SettingsView, BackendError> {
        let (user, profile) = self.signed_in().await?;
        let query = Query::from(Table::QuizHistory)
            .select("score,best_streak")
            .eq("user_id", user.id());
        let history: Vec<QuizScoreRow> = fetch_all(self.backend.as_ref(), &query).await?;

        let average_score = if history.is_empty() {
            0
        } else {
            let total: f64 = history.iter().map(|q| f64::from(q.score)).sum();
            (total / history.len() as f64).round() as u32
        };
        let best_streak = history.iter().map(|q| q.best_streak).max().unwrap_or(0);

        Ok(SettingsView {
            name: profile.name().clone(),
            email: user.email().clone().unwrap_or_else(|| profile.email().clone()),
            notifications: *profile.notifications(),
            privacy: *profile.privacy(),
            stats: SettingsStats {
                total_quizzes: history.len(),
                average_score,
                best_streak,
                total_points: *profile.points(),
            },
        })
    }

    /// Saves name and preferences.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when signed out or the update fails.
    #[instrument(skip(self, update))]
    pub async fn save_settings(&self, update: &SettingsUpdate) -> Result<(), BackendError> {
        let user = self.auth.require_user()?;
        self.update_profile(
            user.id(),
            &ProfilePatch::default()
                .name(update.name.clone())
                .notifications(update.notifications)
                .privacy(update.privacy)
                .updated_at(Utc::now()),
        )
        .await?;
        info!(user_id = %user.id(), "Settings saved");
        Ok(())
    }

    /// Changes the signed-in user's password.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when signed out or the backend refuses.
    #[instrument(skip(self, password))]
    pub async fn change_password(&self, password: &str) -> Result<(), BackendError> {
        self.auth.update_password(password).await
    }

    /// Deletes the profile, quiz history and account, then signs out.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] at the first failing step; earlier steps are
    /// not undone.
    #[instrument(skip(self))]
    pub async fn delete_account(&self) -> Result<(), BackendError> {
        let user = self.auth.require_user()?;
        let user_id = user.id().as_str();

        self.backend
            .delete(Table::Profiles, &Self::profile_filter(user_id))
            .await?;
        self.backend
            .delete(Table::QuizHistory, &[Filter::eq("user_id", user_id)])
            .await?;
        self.backend.delete_user(user_id).await?;
        self.auth.sign_out().await?;
        info!(user_id, "Account deleted");
        Ok(())
    }
}
