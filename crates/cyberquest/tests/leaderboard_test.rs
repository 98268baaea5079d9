//! Tests for leaderboard queries and ranking.

use chrono::{Duration, TimeZone, Utc};
use cyberquest::{
    LEADERBOARD_LIMIT, MemoryBackend, Podium, SortBy, Table, TimeRange, fetch_leaderboard,
    leaderboard_query,
};
use cyberquest_games::Level;
use serde_json::json;

fn seed_player(backend: &MemoryBackend, name: &str, points: u32, quiz: u32, taken: u32, age_days: i64) {
    backend.seed(
        Table::Profiles,
        json!({
            "id": format!("id-{}", name),
            "name": name,
            "email": format!("{}@example.com", name),
            "points": points,
            "quiz_score": quiz,
            "total_quizzes_taken": taken,
            "level": "beginner",
            "created_at": (Utc::now() - Duration::days(age_days)).to_rfc3339(),
        }),
    );
}

fn seeded() -> MemoryBackend {
    let backend = MemoryBackend::new();
    seed_player(&backend, "alice", 900, 70, 3, 1);
    seed_player(&backend, "bob", 1500, 95, 1, 2);
    seed_player(&backend, "carol", 300, 88, 12, 20);
    seed_player(&backend, "dave", 50, 10, 0, 60);
    backend
}

fn names(entries: &[cyberquest::LeaderboardEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.name().as_str()).collect()
}

#[test]
fn test_query_shape() {
    let now = Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap();
    let params = leaderboard_query(SortBy::QuizScore, TimeRange::Week, now).to_params();

    assert_eq!(
        params[0],
        (
            "select".to_string(),
            "id,name,email,points,quiz_score,total_quizzes_taken,level".to_string()
        )
    );
    assert!(params.contains(&(
        "created_at".to_string(),
        format!("gte.{}", (now - Duration::days(7)).to_rfc3339())
    )));
    assert!(params.contains(&("order".to_string(), "quiz_score.desc".to_string())));
    assert!(params.contains(&("limit".to_string(), LEADERBOARD_LIMIT.to_string())));
}

#[test]
fn test_all_time_query_has_no_date_filter() {
    let query = leaderboard_query(SortBy::Points, TimeRange::All, Utc::now());
    assert!(query.filters().is_empty());
}

#[test]
fn test_podium_for_top_three_only() {
    assert_eq!(Podium::for_rank(1), Some(Podium::Crown));
    assert_eq!(Podium::for_rank(2), Some(Podium::Medal));
    assert_eq!(Podium::for_rank(3), Some(Podium::Award));
    assert_eq!(Podium::for_rank(4), None);
}

#[test]
fn test_sort_by_parses_column_names() {
    assert_eq!(SortBy::default(), SortBy::Points);
    assert_eq!(
        "total_quizzes_taken".parse::<SortBy>().unwrap(),
        SortBy::TotalQuizzesTaken
    );
    assert_eq!(SortBy::QuizScore.as_ref(), "quiz_score");
}

#[tokio::test]
async fn test_ranks_by_points() {
    let backend = seeded();
    let entries = fetch_leaderboard(&backend, SortBy::Points, TimeRange::All)
        .await
        .unwrap();

    assert_eq!(names(&entries), ["bob", "alice", "carol", "dave"]);
    assert_eq!(*entries[0].rank(), 1);
    assert_eq!(*entries[0].podium(), Some(Podium::Crown));
    assert_eq!(*entries[3].podium(), None);
    assert_eq!(*entries[0].level(), Level::Beginner);
}

#[tokio::test]
async fn test_ranks_by_quizzes_taken() {
    let backend = seeded();
    let entries = fetch_leaderboard(&backend, SortBy::TotalQuizzesTaken, TimeRange::All)
        .await
        .unwrap();
    assert_eq!(names(&entries)[0], "carol");
}

#[tokio::test]
async fn test_time_range_filters_by_join_date() {
    let backend = seeded();

    let week = fetch_leaderboard(&backend, SortBy::Points, TimeRange::Week)
        .await
        .unwrap();
    assert_eq!(names(&week), ["bob", "alice"]);

    let month = fetch_leaderboard(&backend, SortBy::QuizScore, TimeRange::Month)
        .await
        .unwrap();
    assert_eq!(names(&month), ["bob", "carol", "alice"]);
}

#[tokio::test]
async fn test_offline_backend_fails() {
    let backend = seeded();
    backend.set_offline(true);
    assert!(
        fetch_leaderboard(&backend, SortBy::Points, TimeRange::All)
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_empty_board() {
    let backend = MemoryBackend::new();
    let entries = fetch_leaderboard(&backend, SortBy::Points, TimeRange::All)
        .await
        .unwrap();
    assert!(entries.is_empty());
}
