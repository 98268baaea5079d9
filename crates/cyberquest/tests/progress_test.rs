//! Tests for progress bookkeeping over the in-memory backend.

use std::sync::Arc;

use chrono::{Duration, Utc};
use cyberquest::quiz::{QuizFilter, QuizOutcome, QuizSession, question_bank};
use cyberquest::{
    AuthContext, Backend, BackendErrorKind, DEFAULT_PROFILE_NAME, GameRecord, MemoryBackend,
    Notifications, Privacy, ProgressService, SettingsUpdate, Table, TimeRange,
};
use cyberquest_games::{GameKind, Level};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;

async fn signed_in_as(name: &str) -> (MemoryBackend, ProgressService) {
    let backend = MemoryBackend::new();
    let shared: Arc<dyn Backend> = Arc::new(backend.clone());
    let auth = AuthContext::new(shared.clone());
    auth.sign_up("ada@example.com", "correct-horse", name)
        .await
        .unwrap();
    (backend, ProgressService::new(shared, auth))
}

async fn signed_in() -> (MemoryBackend, ProgressService) {
    signed_in_as("Ada").await
}

fn user_id(progress: &ProgressService) -> String {
    progress.auth().user().unwrap().id().clone()
}

/// Three questions, all answered correctly straight away.
fn perfect_outcome() -> QuizOutcome {
    let questions: Vec<_> = question_bank().into_iter().take(3).collect();
    let answers: Vec<usize> = questions.iter().map(|q| *q.correct_answer()).collect();
    let now = Utc::now();
    let mut quiz = QuizSession::start(questions, QuizFilter::default(), now).unwrap();
    let mut rng = StdRng::seed_from_u64(7);
    for answer in answers {
        quiz.answer(answer, &mut rng, now).unwrap();
    }
    quiz.outcome(now)
}

#[tokio::test]
async fn test_ensure_profile_creates_rows_once() {
    let (backend, progress) = signed_in().await;
    let user = progress.auth().user().unwrap();

    let first = progress.ensure_profile(&user).await.unwrap();
    let second = progress.ensure_profile(&user).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.name(), "Ada");
    assert_eq!(first.email(), "ada@example.com");
    assert_eq!(*first.points(), 0);
    assert_eq!(*first.level(), Level::Beginner);
    assert_eq!(backend.rows(Table::Profiles).len(), 1);
    assert_eq!(backend.rows(Table::UserProgress).len(), 1);
}

#[tokio::test]
async fn test_ensure_profile_defaults_blank_name() {
    let (_, progress) = signed_in_as("").await;
    let user = progress.auth().user().unwrap();
    let profile = progress.ensure_profile(&user).await.unwrap();
    assert_eq!(profile.name(), DEFAULT_PROFILE_NAME);
}

#[tokio::test]
async fn test_signed_out_writes_are_unauthenticated() {
    let backend = MemoryBackend::new();
    let shared: Arc<dyn Backend> = Arc::new(backend.clone());
    let progress = ProgressService::new(shared.clone(), AuthContext::new(shared));

    let err = progress.award_points(10, Level::Beginner).await.unwrap_err();
    assert!(matches!(err.kind, BackendErrorKind::Unauthenticated));
    assert!(progress.fetch_user_stats().await.is_err());
    assert!(backend.rows(Table::Profiles).is_empty());
}

#[tokio::test]
async fn test_award_points_accumulates_and_sets_level() {
    let (_, progress) = signed_in().await;

    assert_eq!(progress.award_points(300, Level::Beginner).await.unwrap(), 300);
    assert_eq!(
        progress.award_points(600, Level::Intermediate).await.unwrap(),
        900
    );

    let user = progress.auth().user().unwrap();
    let profile = progress.ensure_profile(&user).await.unwrap();
    assert_eq!(*profile.points(), 900);
    assert_eq!(*profile.level(), Level::Intermediate);
}

#[tokio::test]
async fn test_record_game_writes_history_progress_and_activity() {
    let (backend, progress) = signed_in().await;
    progress
        .ensure_profile(&progress.auth().user().unwrap())
        .await
        .unwrap();

    let record = GameRecord::new(
        GameKind::Cipher,
        250,
        150,
        "mixed".to_string(),
        true,
        json!({ "solved": 2 }),
    );
    progress.record_game(&record).await.unwrap();
    progress
        .record_game(&GameRecord::new(
            GameKind::Memory,
            100,
            30,
            "easy".to_string(),
            true,
            json!({}),
        ))
        .await
        .unwrap();

    let history = backend.rows(Table::GameHistory);
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["game_type"], "crypto");
    assert_eq!(history[0]["duration"], 150);
    assert_eq!(history[1]["game_type"], "memory");

    let rows = backend.rows(Table::UserProgress);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["total_games_played"], 2);
    // 150 / 60 + 30 / 60 whole minutes
    assert_eq!(rows[0]["total_time_spent"], 2);
    assert_eq!(rows[0]["highest_score"], 250);

    let activity = backend.rows(Table::UserActivity);
    assert_eq!(activity.len(), 2);
    assert_eq!(activity[0]["activity_type"], "game");
    assert_eq!(
        activity[0]["description"],
        "Completed crypto game with score 250"
    );
    assert_eq!(activity[0]["points_earned"], 250);
}

#[tokio::test]
async fn test_record_quiz_updates_profile_and_logs_achievements() {
    let (backend, progress) = signed_in().await;
    let outcome = perfect_outcome();
    assert_eq!(*outcome.percentage(), 100);
    assert_eq!(*outcome.score(), 30);
    assert_eq!(outcome.achievements().len(), 3);

    progress.record_quiz(&outcome).await.unwrap();

    let history = backend.rows(Table::QuizHistory);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["score"], 100);
    assert_eq!(history[0]["category"], "general");
    assert_eq!(history[0]["difficulty"], "mixed");

    let user = progress.auth().user().unwrap();
    let profile = progress.ensure_profile(&user).await.unwrap();
    assert_eq!(*profile.points(), 30);
    assert_eq!(*profile.quiz_score(), 100);
    assert_eq!(*profile.total_quizzes_taken(), 1);
    assert_eq!(*profile.level(), Level::Beginner);
    assert_eq!(profile.answered_questions(), outcome.answered_ids());

    let activity = backend.rows(Table::UserActivity);
    assert_eq!(activity.len(), 4);
    assert_eq!(activity[0]["activity_type"], "quiz");
    assert_eq!(activity[0]["points_earned"], 100);
    assert!(
        activity[1..]
            .iter()
            .all(|a| a["activity_type"] == "achievement" && a["points_earned"] == 50)
    );
    assert_eq!(activity[1]["metadata"]["quiz_score"], 100);

    assert_eq!(backend.rows(Table::TestResults).len(), 1);
    let rows = backend.rows(Table::UserProgress);
    assert_eq!(rows[0]["total_quizzes_completed"], 1);
    assert_eq!(rows[0]["best_streak"], 3);
}

#[tokio::test]
async fn test_second_quiz_updates_running_average() {
    let (_, progress) = signed_in().await;
    progress.record_quiz(&perfect_outcome()).await.unwrap();

    let questions: Vec<_> = question_bank().into_iter().take(2).collect();
    let wrong = (*questions[0].correct_answer() + 1) % questions[0].options().len();
    let right = *questions[1].correct_answer();
    let now = Utc::now();
    let mut quiz = QuizSession::start(questions, QuizFilter::default(), now).unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    quiz.answer(wrong, &mut rng, now).unwrap();
    quiz.answer(right, &mut rng, now).unwrap();
    progress.record_quiz(&quiz.outcome(now)).await.unwrap();

    let user = progress.auth().user().unwrap();
    let profile = progress.ensure_profile(&user).await.unwrap();
    // (100 * 1 + 50) / 2
    assert_eq!(*profile.quiz_score(), 75);
    assert_eq!(*profile.total_quizzes_taken(), 2);
    assert_eq!(*profile.points(), 40);
}

#[tokio::test]
async fn test_record_answered_questions_deduplicates() {
    let (_, progress) = signed_in().await;
    let ids = vec!["q1".to_string(), "q2".to_string()];
    progress.record_answered_questions(&ids).await.unwrap();
    progress
        .record_answered_questions(&["q2".to_string(), "q3".to_string()])
        .await
        .unwrap();

    let user = progress.auth().user().unwrap();
    let profile = progress.ensure_profile(&user).await.unwrap();
    assert_eq!(profile.answered_questions(), &["q1", "q2", "q3"]);
}

#[tokio::test]
async fn test_roadmap_item_awards_points_once() {
    let (backend, progress) = signed_in().await;

    let first = progress.complete_roadmap_item("intro-0-0").await.unwrap();
    assert!(*first.awarded());
    assert_eq!(*first.points(), 50);

    let again = progress.complete_roadmap_item("intro-0-0").await.unwrap();
    assert!(!*again.awarded());
    assert_eq!(*again.points(), 0);

    let user = progress.auth().user().unwrap();
    let profile = progress.ensure_profile(&user).await.unwrap();
    assert_eq!(*profile.points(), 50);
    assert!(profile.has_completed("intro-0-0"));

    let activity = backend.rows(Table::UserActivity);
    assert_eq!(activity.len(), 1);
    assert_eq!(activity[0]["activity_type"], "roadmap");
    assert_eq!(activity[0]["metadata"]["itemId"], "intro-0-0");
    assert_eq!(
        backend.rows(Table::UserProgress)[0]["total_courses_completed"],
        1
    );
}

#[tokio::test]
async fn test_unknown_roadmap_item_is_not_found() {
    let (_, progress) = signed_in().await;
    let err = progress.complete_roadmap_item("nope-9-9").await.unwrap_err();
    assert!(matches!(err.kind, BackendErrorKind::NotFound));
}

#[tokio::test]
async fn test_toggle_roadmap_item_leaves_points_alone() {
    let (_, progress) = signed_in().await;

    assert!(progress.toggle_roadmap_item("intro-0-0").await.unwrap());
    assert!(!progress.toggle_roadmap_item("intro-0-0").await.unwrap());

    let user = progress.auth().user().unwrap();
    let profile = progress.ensure_profile(&user).await.unwrap();
    assert!(!profile.has_completed("intro-0-0"));
    assert_eq!(*profile.points(), 0);
}

#[tokio::test]
async fn test_premium_course_is_forbidden() {
    let (_, progress) = signed_in().await;
    let err = progress.complete_course_module("2", 0).await.unwrap_err();
    assert!(matches!(err.kind, BackendErrorKind::Forbidden));
    assert_eq!(err.message, "Premium content requires a subscription");
}

#[tokio::test]
async fn test_locked_module_needs_previous() {
    let (_, progress) = signed_in().await;
    let err = progress.complete_course_module("1", 3).await.unwrap_err();
    assert!(matches!(err.kind, BackendErrorKind::Forbidden));
    assert_eq!(err.message, "Complete the previous module first");
}

#[tokio::test]
async fn test_course_completion_grants_certification() {
    let (_, progress) = signed_in().await;

    let mut total = 0;
    for index in 0..3 {
        let done = progress.complete_course_module("1", index).await.unwrap();
        assert!(done.certification().is_none());
        total += done.points_awarded();
    }
    let last = progress.complete_course_module("1", 3).await.unwrap();
    total += last.points_awarded();

    assert_eq!(*last.points_awarded(), 250);
    assert_eq!(
        last.certification().as_deref(),
        Some("Cybersecurity Fundamentals")
    );
    assert_eq!(total, 700);

    let repeat = progress.complete_course_module("1", 0).await.unwrap();
    assert_eq!(*repeat.points_awarded(), 0);
    assert!(repeat.certification().is_some());

    let user = progress.auth().user().unwrap();
    let profile = progress.ensure_profile(&user).await.unwrap();
    assert_eq!(*profile.points(), 700);
}

#[tokio::test]
async fn test_missing_module_is_not_found() {
    let (_, progress) = signed_in().await;
    let err = progress.complete_course_module("1", 42).await.unwrap_err();
    assert!(matches!(err.kind, BackendErrorKind::NotFound));
    let err = progress.complete_course_module("99", 0).await.unwrap_err();
    assert!(matches!(err.kind, BackendErrorKind::NotFound));
}

#[tokio::test]
async fn test_lab_challenge_awards_once() {
    let (backend, progress) = signed_in().await;

    let first = progress.complete_lab_challenge("1", 0).await.unwrap();
    assert_eq!(*first.points_awarded(), 50);
    assert_eq!(*first.level(), Level::Beginner);

    let again = progress.complete_lab_challenge("1", 0).await.unwrap();
    assert_eq!(*again.points_awarded(), 0);

    let user = progress.auth().user().unwrap();
    let profile = progress.ensure_profile(&user).await.unwrap();
    assert_eq!(*profile.points(), 50);
    assert!(profile.has_completed("lab-1-0"));
    assert_eq!(backend.rows(Table::UserActivity)[0]["activity_type"], "lab");

    let err = progress.complete_lab_challenge("1", 9).await.unwrap_err();
    assert!(matches!(err.kind, BackendErrorKind::NotFound));
}

#[tokio::test]
async fn test_user_stats_aggregate_history() {
    let (_, progress) = signed_in().await;
    progress
        .ensure_profile(&progress.auth().user().unwrap())
        .await
        .unwrap();
    progress
        .record_game(&GameRecord::new(
            GameKind::Web,
            120,
            90,
            "mixed".to_string(),
            true,
            json!({}),
        ))
        .await
        .unwrap();
    progress.complete_roadmap_item("intro-0-0").await.unwrap();
    progress.record_quiz(&perfect_outcome()).await.unwrap();

    let stats = progress.fetch_user_stats().await.unwrap();
    assert_eq!(*stats.total_points(), 80);
    assert_eq!(*stats.completed_courses(), 1);
    assert_eq!(*stats.quiz_average(), 100.0);
    assert_eq!(*stats.best_streak(), 3);
    // game, roadmap, quiz and three achievements
    assert_eq!(*stats.total_activities(), 6);
    assert_eq!(stats.recent_achievements().len(), 5);
    assert_eq!(stats.game_history().len(), 1);
    assert_eq!(stats.quiz_history().len(), 1);
    assert_eq!(
        stats.progress().as_ref().map(|p| *p.total_games_played()),
        Some(1)
    );
}

#[tokio::test]
async fn test_profile_overview_respects_time_range() {
    let (backend, progress) = signed_in().await;
    progress.record_quiz(&perfect_outcome()).await.unwrap();
    backend.seed(
        Table::TestResults,
        json!({
            "user_id": user_id(&progress),
            "score": 40,
            "accuracy": 40,
            "streak": 1,
            "created_at": (Utc::now() - Duration::days(30)).to_rfc3339(),
        }),
    );

    let week = progress.profile_overview(TimeRange::Week).await.unwrap();
    assert_eq!(*week.time_range(), TimeRange::Week);
    assert_eq!(week.test_results().len(), 1);
    let stats = week.stats().unwrap();
    assert_eq!(*stats.avg_score(), 100);
    assert_eq!(*stats.total_tests(), 1);

    let all = progress.profile_overview(TimeRange::All).await.unwrap();
    assert_eq!(all.test_results().len(), 2);
    let stats = all.stats().unwrap();
    assert_eq!(*stats.avg_score(), 70);
    assert_eq!(*stats.best_streak(), 3);
}

#[tokio::test]
async fn test_profile_overview_without_results_has_no_stats() {
    let (_, progress) = signed_in().await;
    let overview = progress.profile_overview(TimeRange::Month).await.unwrap();
    assert!(overview.test_results().is_empty());
    assert!(overview.stats().is_none());
}

#[tokio::test]
async fn test_settings_round_trip() {
    let (_, progress) = signed_in().await;

    let view = progress.settings().await.unwrap();
    assert_eq!(view.name(), "Ada");
    assert_eq!(view.email(), "ada@example.com");
    assert_eq!(*view.notifications(), Notifications::default());
    assert_eq!(*view.stats().total_quizzes(), 0);

    progress
        .save_settings(&SettingsUpdate::new(
            "Ada Lovelace".to_string(),
            Notifications::new(false, true, true, true),
            Privacy::new(false, true, true),
        ))
        .await
        .unwrap();
    progress.record_quiz(&perfect_outcome()).await.unwrap();

    let view = progress.settings().await.unwrap();
    assert_eq!(view.name(), "Ada Lovelace");
    assert!(!*view.notifications().email());
    assert!(!*view.privacy().show_profile());
    assert_eq!(*view.stats().total_quizzes(), 1);
    assert_eq!(*view.stats().average_score(), 100);
    assert_eq!(*view.stats().total_points(), 30);
}

#[tokio::test]
async fn test_change_password() {
    let (_, progress) = signed_in().await;
    progress.change_password("battery-staple").await.unwrap();

    let auth = progress.auth();
    auth.sign_out().await.unwrap();
    auth.sign_in("ada@example.com", "battery-staple").await.unwrap();
}

#[tokio::test]
async fn test_delete_account_removes_rows_and_signs_out() {
    let (backend, progress) = signed_in().await;
    progress.record_quiz(&perfect_outcome()).await.unwrap();

    progress.delete_account().await.unwrap();

    assert!(backend.rows(Table::Profiles).is_empty());
    assert!(backend.rows(Table::QuizHistory).is_empty());
    assert!(progress.auth().user().is_none());
    assert!(
        progress
            .auth()
            .sign_in("ada@example.com", "correct-horse")
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_offline_backend_surfaces_transport_error() {
    let (backend, progress) = signed_in().await;
    progress
        .ensure_profile(&progress.auth().user().unwrap())
        .await
        .unwrap();
    backend.set_offline(true);

    let err = progress
        .record_game(&GameRecord::new(
            GameKind::Misc,
            10,
            5,
            "mixed".to_string(),
            true,
            json!({}),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err.kind, BackendErrorKind::Transport));
}
