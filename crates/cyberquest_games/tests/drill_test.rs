//! Tests for the command and typing drills.

use chrono::{Duration, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;

use cyberquest_games::{
    CommandDrill, DrillCommand, Keystroke, TrophyKind, TypingDrill, COMMAND_DRILL_SECS, content,
};

fn single(command: &str) -> Vec<DrillCommand> {
    vec![DrillCommand::new(command.to_string(), "test".to_string())]
}

#[test]
fn test_command_drill_awards_on_exact_match() {
    let mut rng = StdRng::seed_from_u64(5);
    let now = Utc::now();
    let mut drill = CommandDrill::start(single("nmap -sS target.com"), &mut rng, now).unwrap();

    assert_eq!(drill.input("nmap", &mut rng, now).unwrap(), Keystroke::Progress);
    assert_eq!(drill.input("nmap -x", &mut rng, now).unwrap(), Keystroke::Mistake);
    let done = drill.input("nmap -sS target.com", &mut rng, now).unwrap();
    assert!(matches!(done, Keystroke::Completed { .. }));
    assert_eq!(*drill.score(), 100);
    assert_eq!(*drill.completed(), 1);
}

#[test]
fn test_command_drill_stops_after_a_minute() {
    let mut rng = StdRng::seed_from_u64(5);
    let start = Utc::now();
    let mut drill = CommandDrill::start(content::drill_commands(), &mut rng, start).unwrap();
    let target = drill.target().command().clone();

    let late = start + Duration::seconds(i64::from(COMMAND_DRILL_SECS));
    assert!(drill.is_finished(late));
    assert_eq!(drill.input(&target, &mut rng, late).unwrap(), Keystroke::Expired);
    assert_eq!(*drill.score(), 0);
}

#[test]
fn test_drills_need_commands() {
    let mut rng = StdRng::seed_from_u64(5);
    assert!(CommandDrill::start(Vec::new(), &mut rng, Utc::now()).is_err());
}

#[test]
fn test_typing_drill_rejects_unknown_duration() {
    let mut rng = StdRng::seed_from_u64(5);
    let result = TypingDrill::start(content::typing_commands(), 90, &mut rng, Utc::now());
    assert!(result.is_err());
}

#[test]
fn test_typing_drill_counts_mistakes_and_accuracy() {
    let mut rng = StdRng::seed_from_u64(9);
    let now = Utc::now();
    let mut drill = TypingDrill::start(single("dirb"), 60, &mut rng, now).unwrap();
    assert_eq!(drill.accuracy(), 100);

    assert_eq!(drill.input("d", &mut rng, now).unwrap(), Keystroke::Progress);
    assert_eq!(drill.input("dx", &mut rng, now).unwrap(), Keystroke::Mistake);
    assert_eq!(drill.input("d", &mut rng, now).unwrap(), Keystroke::Progress);
    assert_eq!(drill.input("di", &mut rng, now).unwrap(), Keystroke::Progress);
    assert_eq!(drill.input("dirbx", &mut rng, now).unwrap(), Keystroke::Mistake);
    assert!(matches!(
        drill.input("dirb", &mut rng, now).unwrap(),
        Keystroke::Completed { .. }
    ));

    assert_eq!(*drill.keystrokes(), 6);
    assert_eq!(*drill.mistakes(), 2);
    // round((1 - 2/6) * 100)
    assert_eq!(drill.accuracy(), 67);
    assert_eq!(*drill.completed_commands(), 1);
    assert_eq!(*drill.score(), 100);
}

#[test]
fn test_wpm_uses_elapsed_minutes() {
    let mut rng = StdRng::seed_from_u64(9);
    let start = Utc::now();
    let mut drill = TypingDrill::start(single("abcde"), 120, &mut rng, start).unwrap();
    for prefix in ["a", "ab", "abc", "abcd", "abcde"] {
        drill.input(prefix, &mut rng, start).unwrap();
    }
    assert_eq!(drill.wpm(start), 0, "no time elapsed yet");
    // 5 keystrokes = 1 word in 0.5 minutes
    assert_eq!(drill.wpm(start + Duration::seconds(30)), 2);
}

#[test]
fn test_trophies_are_awarded_once() {
    let mut rng = StdRng::seed_from_u64(9);
    let start = Utc::now();
    let mut drill = TypingDrill::start(single("ab"), 120, &mut rng, start).unwrap();
    for _ in 0..15 {
        drill.input("a", &mut rng, start).unwrap();
        drill.input("ab", &mut rng, start).unwrap();
    }
    let late = start + Duration::seconds(120);
    let stats = drill.stats(late);
    assert_eq!(*stats.completed_commands(), 15);
    assert_eq!(*stats.accuracy(), 100);

    let first = drill.award_trophies(late);
    let names: Vec<&str> = first.iter().map(|t| t.name().as_str()).collect();
    assert!(names.contains(&"Precision Master"));
    assert!(names.contains(&"Sharp Eye"));
    assert!(names.contains(&"Steady Hand"));
    assert!(names.contains(&"Quick Sprint"));
    assert!(!first.iter().any(|t| *t.kind() == TrophyKind::Speed));

    assert!(drill.award_trophies(late).is_empty());
    assert_eq!(drill.trophies().len(), 4);
}
