//! Tests for game and quiz sessions.

use std::sync::Arc;

use chrono::{Duration, Utc};
use cyberquest::quiz::QuizFilter;
use cyberquest::{
    AuthContext, Backend, GameState, MemoryBackend, PlayErrorKind, PlayManager, ProgressService,
    STALE_SESSION_SECS, StartGame, Table,
};
use cyberquest_games::{
    FlipOutcome, GameKind, Keystroke, MemoryDifficulty, RunStatus, content,
};

async fn manager(signed_in: bool) -> (MemoryBackend, PlayManager) {
    let backend = MemoryBackend::new();
    let shared: Arc<dyn Backend> = Arc::new(backend.clone());
    let auth = AuthContext::new(shared.clone());
    if signed_in {
        auth.sign_up("ada@example.com", "correct-horse", "Ada")
            .await
            .unwrap();
    }
    let progress = ProgressService::new(shared, auth);
    (backend, PlayManager::with_seed(progress, 42))
}

#[tokio::test]
async fn test_challenge_game_starts_active() {
    let (_, play) = manager(false).await;
    let view = play.start_game(StartGame::of(GameKind::Cipher), Utc::now()).unwrap();

    assert_eq!(*view.score(), 0);
    assert!(!*view.finished());
    let GameState::Challenge {
        kind,
        status,
        current,
        challenge,
        ..
    } = view.state()
    else {
        panic!("expected a challenge view, got {:?}", view.state());
    };
    assert_eq!(*kind, GameKind::Cipher);
    assert_eq!(*status, RunStatus::Active);
    assert_eq!(*current, 0);
    assert!(challenge.is_some());
    assert_eq!(play.active_sessions().unwrap(), 1);
}

#[tokio::test]
async fn test_solving_every_challenge_saves_result() {
    let (backend, play) = manager(true).await;
    let now = Utc::now();
    let view = play.start_game(StartGame::of(GameKind::Cipher), now).unwrap();
    let id = view.id().clone();

    let challenges = content::challenges_for(GameKind::Cipher).unwrap();
    for challenge in &challenges {
        let result = play.submit(&id, challenge.solution(), now).unwrap();
        assert!(result.attempt().is_correct(), "{} not solved", challenge.id());
        play.advance(&id, now).unwrap();
    }

    let view = play.view(&id, now).unwrap();
    assert!(*view.finished());
    let score = *view.score();
    assert!(score > 0);

    let summary = play.finish(&id, now + Duration::seconds(90)).await.unwrap();
    assert!(*summary.saved());
    assert_eq!(summary.activity(), "crypto");
    assert_eq!(*summary.score(), score);
    assert_eq!(*summary.duration_secs(), 90);
    assert!(summary.quiz().is_none());

    let history = backend.rows(Table::GameHistory);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["game_type"], "crypto");
    assert_eq!(history[0]["difficulty"], "mixed");
    assert_eq!(history[0]["score"], score);
    assert_eq!(backend.rows(Table::Profiles)[0]["points"], score);

    assert_eq!(play.active_sessions().unwrap(), 0);
    let err = play.view(&id, now).unwrap_err();
    assert_eq!(err.kind, PlayErrorKind::NotFound);
}

#[tokio::test]
async fn test_wrong_answer_keeps_challenge_open() {
    let (_, play) = manager(false).await;
    let now = Utc::now();
    let id = play
        .start_game(StartGame::of(GameKind::Cipher), now)
        .unwrap()
        .id()
        .clone();

    let result = play.submit(&id, "definitely wrong", now).unwrap();
    assert!(!result.attempt().is_correct());
    assert_eq!(*result.attempt().combo(), 0);

    let err = play.advance(&id, now).unwrap_err();
    assert_eq!(err.kind, PlayErrorKind::Rejected);
}

#[tokio::test]
async fn test_retry_only_after_timeout() {
    let (_, play) = manager(false).await;
    let now = Utc::now();
    let id = play
        .start_game(StartGame::of(GameKind::Cipher), now)
        .unwrap()
        .id()
        .clone();

    let err = play.retry(&id, now).unwrap_err();
    assert_eq!(err.kind, PlayErrorKind::Rejected);

    let first = &content::challenges_for(GameKind::Cipher).unwrap()[0];
    let limit = first.time_limit_secs().expect("cipher challenges are timed");
    let late = now + Duration::seconds(i64::from(limit) + 1);

    let view = play.retry(&id, late).unwrap();
    let GameState::Challenge { status, current, .. } = view.state() else {
        panic!("expected a challenge view");
    };
    assert_eq!(*status, RunStatus::Active);
    assert_eq!(*current, 0);
    assert_eq!(*view.time_left(), Some(limit));
}

#[tokio::test]
async fn test_finish_rejects_game_in_progress() {
    let (_, play) = manager(true).await;
    let now = Utc::now();
    let id = play
        .start_game(StartGame::of(GameKind::Memory), now)
        .unwrap()
        .id()
        .clone();

    let err = play.finish(&id, now).await.unwrap_err();
    assert_eq!(err.kind, PlayErrorKind::Rejected);
    assert_eq!(err.message, "Game is still in progress");
    assert_eq!(play.active_sessions().unwrap(), 1);
}

#[tokio::test]
async fn test_memory_board_hides_face_down_icons() {
    let (_, play) = manager(false).await;
    let now = Utc::now();
    let options = StartGame::new(GameKind::Memory, Some(MemoryDifficulty::Medium), None);
    let view = play.start_game(options, now).unwrap();
    let id = view.id().clone();

    let GameState::Memory { cards, difficulty, .. } = view.state() else {
        panic!("expected a memory view");
    };
    assert_eq!(*difficulty, MemoryDifficulty::Medium);
    assert_eq!(cards.len(), 16);
    assert!(cards.iter().all(|c| c.icon().is_none()));
    assert_eq!(*view.time_left(), Some(180));

    let flipped = play.flip(&id, 0, now).unwrap();
    assert_eq!(*flipped.outcome(), FlipOutcome::FirstFlipped);
    let GameState::Memory { cards, .. } = flipped.view().state() else {
        panic!("expected a memory view");
    };
    assert!(cards[0].icon().is_some());
    assert!(cards[1..].iter().all(|c| c.icon().is_none()));
}

#[tokio::test]
async fn test_memory_flip_after_time_is_up() {
    let (_, play) = manager(false).await;
    let now = Utc::now();
    let id = play
        .start_game(StartGame::of(GameKind::Memory), now)
        .unwrap()
        .id()
        .clone();

    let err = play.flip(&id, 0, now + Duration::seconds(121)).unwrap_err();
    assert_eq!(err.kind, PlayErrorKind::Rejected);
    assert_eq!(err.message, "Time is up");
    assert!(*play.view(&id, now + Duration::seconds(121)).unwrap().finished());
}

#[tokio::test]
async fn test_actions_for_the_wrong_game_are_rejected() {
    let (_, play) = manager(false).await;
    let now = Utc::now();
    let memory = play
        .start_game(StartGame::of(GameKind::Memory), now)
        .unwrap()
        .id()
        .clone();
    let cipher = play
        .start_game(StartGame::of(GameKind::Cipher), now)
        .unwrap()
        .id()
        .clone();

    assert_eq!(
        play.submit(&memory, "x", now).unwrap_err().kind,
        PlayErrorKind::Rejected
    );
    assert_eq!(
        play.flip(&cipher, 0, now).unwrap_err().kind,
        PlayErrorKind::Rejected
    );
    assert_eq!(
        play.input(&cipher, "nmap", now).unwrap_err().kind,
        PlayErrorKind::Rejected
    );
    assert_eq!(
        play.search_logs(&cipher, "ssh").unwrap_err().kind,
        PlayErrorKind::Rejected
    );
    assert_eq!(
        play.answer_quiz(&cipher, 0, now).await.unwrap_err().kind,
        PlayErrorKind::Rejected
    );
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let (_, play) = manager(false).await;
    let now = Utc::now();
    assert_eq!(
        play.view("missing", now).unwrap_err().kind,
        PlayErrorKind::NotFound
    );
    assert_eq!(
        play.abandon("missing").unwrap_err().kind,
        PlayErrorKind::NotFound
    );
    assert_eq!(
        play.finish("missing", now).await.unwrap_err().kind,
        PlayErrorKind::NotFound
    );
}

#[tokio::test]
async fn test_command_drill_input() {
    let (_, play) = manager(false).await;
    let now = Utc::now();
    let view = play.start_game(StartGame::of(GameKind::Command), now).unwrap();
    let id = view.id().clone();
    let GameState::Command { target, .. } = view.state() else {
        panic!("expected a command view");
    };
    let command = target.command().clone();

    let partial = play.input(&id, &command[..3], now).unwrap();
    assert_eq!(*partial.keystroke(), Keystroke::Progress);

    let mistake = play.input(&id, "###", now).unwrap();
    assert_eq!(*mistake.keystroke(), Keystroke::Mistake);

    let done = play.input(&id, &command, now).unwrap();
    assert!(matches!(done.keystroke(), Keystroke::Completed { .. }));
    assert!(*done.view().score() > 0);
    assert!(done.new_trophies().is_empty());
}

#[tokio::test]
async fn test_signed_out_finish_is_not_saved() {
    let (backend, play) = manager(false).await;
    let now = Utc::now();
    let id = play
        .start_game(StartGame::of(GameKind::Command), now)
        .unwrap()
        .id()
        .clone();

    let summary = play.finish(&id, now + Duration::seconds(61)).await.unwrap();
    assert!(!*summary.saved());
    assert_eq!(summary.activity(), "command");
    assert!(backend.rows(Table::GameHistory).is_empty());
}

#[tokio::test]
async fn test_typing_drill_lengths() {
    let (backend, play) = manager(true).await;
    let now = Utc::now();

    let err = play
        .start_game(StartGame::new(GameKind::Typing, None, Some(45)), now)
        .unwrap_err();
    assert_eq!(err.kind, PlayErrorKind::Rejected);

    let view = play
        .start_game(StartGame::new(GameKind::Typing, None, Some(120)), now)
        .unwrap();
    assert_eq!(*view.time_left(), Some(120));

    let summary = play
        .finish(view.id(), now + Duration::seconds(121))
        .await
        .unwrap();
    assert!(*summary.saved());
    assert_eq!(backend.rows(Table::GameHistory)[0]["difficulty"], "120s");
}

#[tokio::test]
async fn test_typing_trophies_wait_for_the_clock() {
    let (backend, play) = manager(true).await;
    let now = Utc::now();
    let view = play
        .start_game(StartGame::new(GameKind::Typing, None, Some(60)), now)
        .unwrap();
    let id = view.id().clone();
    let GameState::Typing { target, .. } = view.state() else {
        panic!("expected a typing view");
    };

    let first = play.input(&id, target.command(), now).unwrap();
    let Keystroke::Completed { next, .. } = first.keystroke() else {
        panic!("expected a completed command, got {:?}", first.keystroke());
    };
    assert!(first.new_trophies().is_empty());

    let second = play
        .input(&id, next.command(), now + Duration::seconds(2))
        .unwrap();
    assert!(matches!(second.keystroke(), Keystroke::Completed { .. }));
    assert!(second.new_trophies().is_empty());
    let GameState::Typing { trophies, .. } = second.view().state() else {
        panic!("expected a typing view");
    };
    assert!(trophies.is_empty(), "perfect accuracy must not pay out mid-drill");

    let late = now + Duration::seconds(61);
    let expired = play.input(&id, "ls", late).unwrap();
    assert_eq!(*expired.keystroke(), Keystroke::Expired);
    let mut names: Vec<&str> = expired
        .new_trophies()
        .iter()
        .map(|t| t.name().as_str())
        .collect();
    names.sort_unstable();
    assert_eq!(names, ["Precision Master", "Sharp Eye", "Steady Hand"]);

    let summary = play.finish(&id, late).await.unwrap();
    assert!(*summary.saved());
    assert_eq!(summary.activity(), "typing");

    let history = backend.rows(Table::GameHistory);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["game_type"], "typing");
    assert_eq!(history[0]["difficulty"], "60s");
    assert_eq!(history[0]["metadata"]["stats"]["completed_commands"], 2);
    assert_eq!(history[0]["metadata"]["trophies"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_typing_trophies_awarded_when_finished_without_late_input() {
    let (backend, play) = manager(true).await;
    let now = Utc::now();
    let id = play
        .start_game(StartGame::new(GameKind::Typing, None, Some(60)), now)
        .unwrap()
        .id()
        .clone();

    play.finish(&id, now + Duration::seconds(61)).await.unwrap();

    let history = backend.rows(Table::GameHistory);
    let trophies = history[0]["metadata"]["trophies"].as_array().unwrap();
    assert!(trophies.iter().all(|t| t["kind"] == "accuracy"));
    assert_eq!(trophies.len(), 3);
}

#[tokio::test]
async fn test_stale_sessions_are_dropped_on_start() {
    let (_, play) = manager(false).await;
    let now = Utc::now();
    let old = play
        .start_game(StartGame::of(GameKind::Memory), now)
        .unwrap()
        .id()
        .clone();
    let recent = play
        .start_game(StartGame::of(GameKind::Cipher), now + Duration::seconds(600))
        .unwrap()
        .id()
        .clone();
    assert_eq!(play.active_sessions().unwrap(), 2);

    let later = now + Duration::seconds(STALE_SESSION_SECS + 1);
    let fresh = play
        .start_game(StartGame::of(GameKind::Command), later)
        .unwrap()
        .id()
        .clone();

    assert_eq!(play.active_sessions().unwrap(), 2);
    assert_eq!(play.view(&old, later).unwrap_err().kind, PlayErrorKind::NotFound);
    assert!(play.view(&recent, later).is_ok());
    assert!(play.view(&fresh, later).is_ok());
}

#[tokio::test]
async fn test_log_search_matches_scenario() {
    let (_, play) = manager(false).await;
    let now = Utc::now();
    let id = play
        .start_game(StartGame::of(GameKind::LogAnalysis), now)
        .unwrap()
        .id()
        .clone();

    let scenario = &content::log_scenarios()[0];
    let term = scenario.logs()[0]
        .split_whitespace()
        .last()
        .unwrap()
        .to_string();
    let hits = play.search_logs(&id, &term).unwrap();
    assert!(hits.contains(&0));
    assert_eq!(hits, scenario.search(&term));
    assert!(play.search_logs(&id, "   ").unwrap().is_empty());
}

#[tokio::test]
async fn test_abandon_drops_without_saving() {
    let (backend, play) = manager(true).await;
    let now = Utc::now();
    let id = play
        .start_game(StartGame::of(GameKind::Web), now)
        .unwrap()
        .id()
        .clone();

    play.abandon(&id).unwrap();
    assert_eq!(play.active_sessions().unwrap(), 0);
    assert!(backend.rows(Table::GameHistory).is_empty());
}

#[tokio::test]
async fn test_quiz_session_records_answers_and_result() {
    let (backend, play) = manager(true).await;
    let now = Utc::now();
    let filter = QuizFilter::new(Some("Web Security".to_string()), None);
    let view = play.start_quiz(filter, now).unwrap();
    let id = view.id().clone();
    assert_eq!(*view.time_left(), Some(180));
    let GameState::Quiz { total, .. } = view.state() else {
        panic!("expected a quiz view");
    };
    let total = *total;
    assert!(total > 0);

    let mut answered = Vec::new();
    for _ in 0..total {
        let result = play.answer_quiz(&id, 0, now).await.unwrap();
        answered.push(result.feedback().question_id().clone());
    }
    assert!(*play.view(&id, now).unwrap().finished());

    let profile = &backend.rows(Table::Profiles)[0];
    let recorded: Vec<String> =
        serde_json::from_value(profile["answered_questions"].clone()).unwrap();
    assert_eq!(recorded, answered);

    let summary = play.finish(&id, now).await.unwrap();
    assert!(*summary.saved());
    assert_eq!(summary.activity(), "quiz");
    let outcome = summary.quiz().as_ref().unwrap();
    assert_eq!(outcome.category(), "Web Security");
    assert_eq!(*outcome.question_count() as usize, total);

    let history = backend.rows(Table::QuizHistory);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["category"], "Web Security");
}

#[tokio::test]
async fn test_quiz_with_no_matching_questions_is_rejected() {
    let (_, play) = manager(false).await;
    let filter = QuizFilter::new(Some("Nonexistent".to_string()), None);
    let err = play.start_quiz(filter, Utc::now()).unwrap_err();
    assert_eq!(err.kind, PlayErrorKind::Rejected);
}

#[tokio::test]
async fn test_expired_quiz_can_be_finished() {
    let (_, play) = manager(false).await;
    let now = Utc::now();
    let id = play
        .start_quiz(QuizFilter::default(), now)
        .unwrap()
        .id()
        .clone();

    let late = now + Duration::seconds(200);
    let summary = play.finish(&id, late).await.unwrap();
    assert!(!*summary.saved());
    let outcome = summary.quiz().as_ref().unwrap();
    assert_eq!(*outcome.answered(), 0);
    assert_eq!(*outcome.time_left(), 0);
}
