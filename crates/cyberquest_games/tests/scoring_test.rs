//! Tests for point formulas and level thresholds.

use cyberquest_games::{
    Level, challenge_score, drill_score, flat_score, lab_level, level_for_game_score,
    level_for_quiz_points, log_question_score, memory_match_score, time_bonus,
};

#[test]
fn test_time_bonus_rounds_down() {
    assert_eq!(time_bonus(0), 0);
    assert_eq!(time_bonus(9), 0);
    assert_eq!(time_bonus(95), 9);
}

#[test]
fn test_challenge_score_adds_time_and_combo() {
    let breakdown = challenge_score(200, 95, 2);
    assert_eq!(*breakdown.base(), 200);
    assert_eq!(*breakdown.time_bonus(), 9);
    assert_eq!(*breakdown.combo_bonus(), 100);
    assert_eq!(*breakdown.total(), 309);
}

#[test]
fn test_log_question_score_splits_points() {
    // 100 / 3 = 33, 250 / 10 = 25, combo 1 * 25
    let breakdown = log_question_score(100, 3, 250, 1);
    assert_eq!(*breakdown.total(), 33 + 25 + 25);
}

#[test]
fn test_log_question_score_without_questions_has_no_base() {
    assert_eq!(*log_question_score(100, 0, 0, 0).total(), 0);
}

#[test]
fn test_memory_match_bonus_every_third_match() {
    assert_eq!(*memory_match_score(1).total(), 100);
    assert_eq!(*memory_match_score(2).total(), 100);
    assert_eq!(*memory_match_score(3).total(), 150);
    assert_eq!(*memory_match_score(6).total(), 200);
}

#[test]
fn test_flat_awards() {
    assert_eq!(*drill_score().total(), 100);
    assert_eq!(*flat_score(300).total(), 300);
}

#[test]
fn test_game_level_thresholds_are_strict() {
    assert_eq!(level_for_game_score(400), Level::Beginner);
    assert_eq!(level_for_game_score(401), Level::Intermediate);
    assert_eq!(level_for_game_score(800), Level::Intermediate);
    assert_eq!(level_for_game_score(801), Level::Advanced);
}

#[test]
fn test_quiz_and_lab_levels() {
    assert_eq!(level_for_quiz_points(50), Level::Beginner);
    assert_eq!(level_for_quiz_points(60), Level::Intermediate);
    assert_eq!(level_for_quiz_points(90), Level::Advanced);
    assert_eq!(lab_level(50), Level::Beginner);
    assert_eq!(lab_level(100), Level::Intermediate);
    assert_eq!(lab_level(175), Level::Advanced);
}

#[test]
fn test_level_string_form() {
    assert_eq!(Level::Intermediate.to_string(), "intermediate");
    assert_eq!("advanced".parse::<Level>().unwrap(), Level::Advanced);
}
