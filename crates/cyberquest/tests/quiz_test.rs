//! Tests for question selection, quiz sessions and achievements.

use chrono::{Duration, Utc};
use cyberquest::quiz::{
    Achievement, AchievementInput, MAX_QUESTIONS, POINTS_PER_CORRECT, QUIZ_TIME_LIMIT_SECS,
    QuizFilter, QuizSession, earned_achievements, next_quiz_average, question_bank,
    select_questions,
};
use cyberquest_games::Difficulty;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

#[test]
fn test_question_ids_are_unique() {
    let bank = question_bank();
    let mut ids: Vec<&String> = bank.iter().map(|q| q.id()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), bank.len());
    assert!(bank.iter().all(|q| *q.correct_answer() < q.options().len()));
}

#[test]
fn test_select_respects_filters() {
    let bank = question_bank();
    let web = select_questions(&bank, Some("Web Security"), None, &mut rng());
    assert!(!web.is_empty());
    assert!(web.iter().all(|q| q.category() == "Web Security"));

    let beginner = select_questions(&bank, None, Some(Difficulty::Beginner), &mut rng());
    assert!(!beginner.is_empty());
    assert!(beginner.iter().all(|q| *q.difficulty() == Difficulty::Beginner));
}

#[test]
fn test_select_caps_question_count() {
    let bank = question_bank();
    let all = select_questions(&bank, None, None, &mut rng());
    assert_eq!(all.len(), bank.len().min(MAX_QUESTIONS));
}

#[test]
fn test_select_is_reproducible_with_seed() {
    let bank = question_bank();
    let a: Vec<String> = select_questions(&bank, None, None, &mut rng())
        .iter()
        .map(|q| q.id().clone())
        .collect();
    let b: Vec<String> = select_questions(&bank, None, None, &mut rng())
        .iter()
        .map(|q| q.id().clone())
        .collect();
    assert_eq!(a, b);
}

#[test]
fn test_start_rejects_empty_selection() {
    let bank = question_bank();
    let none = select_questions(&bank, Some("Underwater Basket Weaving"), None, &mut rng());
    assert!(none.is_empty());
    assert!(QuizSession::start(none, QuizFilter::default(), Utc::now()).is_err());
}

#[test]
fn test_filter_labels() {
    let filter = QuizFilter::default();
    assert_eq!(filter.category_label(), "general");
    assert_eq!(filter.difficulty_label(), "mixed");

    let filter = QuizFilter::new(Some("Cryptography".to_string()), Some(Difficulty::Advanced));
    assert_eq!(filter.category_label(), "Cryptography");
    assert_eq!(filter.difficulty_label(), "advanced");
}

#[test]
fn test_answers_track_score_and_streak() {
    let questions: Vec<_> = question_bank().into_iter().take(3).collect();
    let right: Vec<usize> = questions.iter().map(|q| *q.correct_answer()).collect();
    let wrong = (right[1] + 1) % questions[1].options().len();
    let start = Utc::now();
    let mut quiz = QuizSession::start(questions, QuizFilter::default(), start).unwrap();
    let mut rng = rng();

    let first = quiz.answer(right[0], &mut rng, start + Duration::seconds(4)).unwrap();
    assert!(*first.correct());
    assert!(first.message().starts_with("Correct!"));
    assert_eq!(*first.score(), POINTS_PER_CORRECT);
    assert_eq!(*first.streak(), 1);

    let second = quiz.answer(wrong, &mut rng, start + Duration::seconds(10)).unwrap();
    assert!(!*second.correct());
    assert_eq!(second.message(), "Incorrect. Keep learning!");
    assert_eq!(*second.correct_answer(), right[1]);
    assert_eq!(*second.streak(), 0);

    let third = quiz.answer(right[2], &mut rng, start + Duration::seconds(20)).unwrap();
    assert!(*third.finished());
    assert!(quiz.is_finished());
    assert!(quiz.current_question().is_none());

    let outcome = quiz.outcome(start + Duration::seconds(100));
    assert_eq!(*outcome.correct(), 2);
    assert_eq!(*outcome.incorrect(), 1);
    assert_eq!(*outcome.score(), 20);
    // round(2 / 3 * 100)
    assert_eq!(*outcome.percentage(), 67);
    // clock froze at the last answer
    assert_eq!(*outcome.time_taken(), 20);
    assert_eq!(*outcome.best_streak(), 1);
    assert_eq!(outcome.answered_ids().len(), 3);
    assert!((outcome.average_time() - 20.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_option_out_of_range_rejected() {
    let questions: Vec<_> = question_bank().into_iter().take(1).collect();
    let now = Utc::now();
    let mut quiz = QuizSession::start(questions, QuizFilter::default(), now).unwrap();
    assert!(quiz.answer(99, &mut rng(), now).is_err());
    assert!(!quiz.is_finished());
}

#[test]
fn test_clock_expiry_ends_quiz() {
    let questions: Vec<_> = question_bank().into_iter().take(2).collect();
    let start = Utc::now();
    let mut quiz = QuizSession::start(questions, QuizFilter::default(), start).unwrap();
    let late = start + Duration::seconds(i64::from(QUIZ_TIME_LIMIT_SECS) + 5);

    let err = quiz.answer(0, &mut rng(), late).unwrap_err();
    assert_eq!(err.message, "Time is up");
    assert!(quiz.is_finished());
    assert_eq!(quiz.time_left(late), 0);

    let outcome = quiz.outcome(late);
    assert_eq!(*outcome.answered(), 0);
    assert_eq!(*outcome.time_taken(), QUIZ_TIME_LIMIT_SECS);
    assert!(outcome.achievements().is_empty());
}

#[test]
fn test_perfect_fast_quiz_earns_three_achievements() {
    let questions: Vec<_> = question_bank().into_iter().take(3).collect();
    let answers: Vec<usize> = questions.iter().map(|q| *q.correct_answer()).collect();
    let now = Utc::now();
    let mut quiz = QuizSession::start(questions, QuizFilter::default(), now).unwrap();
    for answer in answers {
        quiz.answer(answer, &mut rng(), now).unwrap();
    }
    assert_eq!(
        quiz.outcome(now).achievements(),
        &[
            Achievement::PerfectScore,
            Achievement::SpeedDemon,
            Achievement::TimeLord
        ]
    );
}

#[test]
fn test_streak_and_knowledge_thresholds() {
    let input = AchievementInput {
        score: 100,
        question_count: 15,
        answered: 15,
        correct: 10,
        best_streak: 5,
        average_time: 9.0,
        time_left: 30,
    };
    assert_eq!(
        earned_achievements(&input, POINTS_PER_CORRECT),
        vec![Achievement::StreakMaster, Achievement::KnowledgeMaster]
    );

    let short = AchievementInput {
        correct: 9,
        best_streak: 4,
        ..input
    };
    assert!(earned_achievements(&short, POINTS_PER_CORRECT).is_empty());
}

#[test]
fn test_speed_demon_needs_an_answer() {
    let input = AchievementInput {
        score: 0,
        question_count: 5,
        answered: 0,
        correct: 0,
        best_streak: 0,
        average_time: 0.0,
        time_left: 100,
    };
    assert!(earned_achievements(&input, POINTS_PER_CORRECT).is_empty());
}

#[test]
fn test_running_average() {
    assert_eq!(next_quiz_average(0, 0, 70), 70);
    assert_eq!(next_quiz_average(80, 1, 100), 90);
    // (67 * 3 + 50) / 4 = 62.75
    assert_eq!(next_quiz_average(67, 3, 50), 63);
}
