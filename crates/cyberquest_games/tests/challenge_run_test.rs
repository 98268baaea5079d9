//! Tests for the shared challenge loop.

use chrono::{Duration, Utc};
use cyberquest_games::{
    AnswerCheck, Challenge, ChallengeRun, Difficulty, GameKind, RunStatus, content,
};

fn two_timed() -> Vec<Challenge> {
    vec![
        Challenge::timed(
            "one",
            "One",
            "first",
            Difficulty::Beginner,
            100,
            120,
            "KHOOR",
            "shift",
            "HELLO",
            AnswerCheck::IgnoreCase,
        ),
        Challenge::timed(
            "two",
            "Two",
            "second",
            Difficulty::Intermediate,
            200,
            60,
            "REBYC",
            "reverse",
            "CYBER",
            AnswerCheck::IgnoreCase,
        ),
    ]
}

#[test]
fn test_submit_requires_start() {
    let mut run = ChallengeRun::new(GameKind::Cipher, two_timed());
    assert_eq!(*run.status(), RunStatus::Ready);
    assert!(run.submit("HELLO", Utc::now()).is_err());
}

#[test]
fn test_correct_answer_scores_with_time_bonus() {
    let mut run = ChallengeRun::new(GameKind::Cipher, two_timed());
    let start = Utc::now();
    run.start(start).unwrap();

    let attempt = run.submit("hello", start + Duration::seconds(20)).unwrap();
    assert!(attempt.is_correct());
    // 100 points + 100 s left / 10
    assert_eq!(*attempt.score(), 110);
    assert_eq!(*attempt.combo(), 1);
    assert_eq!(*run.status(), RunStatus::Solved);
}

#[test]
fn test_combo_carries_into_next_challenge() {
    let mut run = ChallengeRun::new(GameKind::Cipher, two_timed());
    let now = Utc::now();
    run.start(now).unwrap();
    run.submit("HELLO", now).unwrap();
    run.advance().unwrap();
    run.start(now).unwrap();

    let attempt = run.submit("CYBER", now).unwrap();
    let breakdown = attempt.breakdown().unwrap();
    assert_eq!(*breakdown.combo_bonus(), 50);
    assert_eq!(*breakdown.total(), 200 + 6 + 50);
    assert_eq!(*run.combo(), 2);
}

#[test]
fn test_wrong_answer_resets_combo_and_keeps_challenge_open() {
    let mut run = ChallengeRun::new(GameKind::Cipher, two_timed());
    let now = Utc::now();
    run.start(now).unwrap();
    run.submit("HELLO", now).unwrap();
    run.advance().unwrap();
    run.start(now).unwrap();

    let attempt = run.submit("CYBORG", now).unwrap();
    assert!(!attempt.is_correct());
    assert_eq!(*attempt.combo(), 0);
    assert_eq!(*run.status(), RunStatus::Active);

    let attempt = run.submit("CYBER", now).unwrap();
    assert_eq!(*attempt.breakdown().unwrap().combo_bonus(), 0);
}

#[test]
fn test_timeout_counts_as_failure() {
    let mut run = ChallengeRun::new(GameKind::Cipher, two_timed());
    let start = Utc::now();
    run.start(start).unwrap();

    let late = start + Duration::seconds(121);
    let attempt = run.submit("HELLO", late).unwrap();
    assert!(!attempt.is_correct());
    assert!(*attempt.timed_out());
    assert_eq!(*run.status(), RunStatus::TimedOut);
    assert_eq!(run.time_left(late), Some(0));
}

#[test]
fn test_restart_after_timeout_resets_clock() {
    let mut run = ChallengeRun::new(GameKind::Cipher, two_timed());
    let start = Utc::now();
    run.start(start).unwrap();
    let late = start + Duration::seconds(200);
    assert!(run.expire(late));
    assert!(!run.expire(late), "expiry fires once");

    run.start(late).unwrap();
    assert_eq!(run.time_left(late), Some(120));
    assert!(run.submit("HELLO", late).unwrap().is_correct());
}

#[test]
fn test_advance_past_last_finishes() {
    let mut run = ChallengeRun::new(GameKind::Cipher, two_timed());
    let now = Utc::now();
    run.start(now).unwrap();
    assert!(run.advance().is_err(), "cannot skip an active challenge");
    run.submit("HELLO", now).unwrap();
    assert_eq!(run.advance().unwrap(), RunStatus::Ready);
    assert_eq!(run.advance().unwrap(), RunStatus::Finished);
    assert!(run.is_finished());
    assert!(run.current_challenge().is_none());
    assert!(run.start(now).is_err());
}

#[test]
fn test_untimed_challenges_award_flat_points() {
    let mut run = ChallengeRun::new(GameKind::Forensics, content::forensics_challenges());
    let now = Utc::now();
    run.start(now).unwrap();
    assert_eq!(run.time_left(now), None);

    let attempt = run.submit("h4ck3r_fl4g", now + Duration::days(1)).unwrap();
    assert!(attempt.is_correct());
    assert_eq!(*attempt.score(), 150);
}

#[test]
fn test_web_payload_may_be_embedded() {
    let mut run = ChallengeRun::new(GameKind::Web, content::web_challenges());
    let now = Utc::now();
    run.start(now).unwrap();
    let attempt = run
        .submit(r#"nice post <SCRIPT>alert("hacked")</SCRIPT>"#, now)
        .unwrap();
    assert!(attempt.is_correct());
}

#[test]
fn test_empty_run_is_finished() {
    let run = ChallengeRun::new(GameKind::Misc, Vec::new());
    assert!(run.is_finished());
}
