//! Tests for the memory board.

use chrono::{Duration, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;

use cyberquest_games::{FlipOutcome, MemoryBoard, MemoryDifficulty, content};

fn board(difficulty: MemoryDifficulty) -> MemoryBoard {
    let mut rng = StdRng::seed_from_u64(7);
    MemoryBoard::deal(difficulty, &content::memory_icons(), &mut rng, Utc::now()).unwrap()
}

/// Index of the other card showing the same icon as `index`.
fn partner(board: &MemoryBoard, index: usize) -> usize {
    let name = board.cards()[index].icon().name();
    board
        .cards()
        .iter()
        .position(|c| *c.id() != index && c.icon().name() == name)
        .unwrap()
}

/// Index of some card with a different icon from `index`.
fn stranger(board: &MemoryBoard, index: usize) -> usize {
    let name = board.cards()[index].icon().name();
    board
        .cards()
        .iter()
        .position(|c| c.icon().name() != name && !c.is_matched())
        .unwrap()
}

#[test]
fn test_deal_sizes_follow_difficulty() {
    assert_eq!(board(MemoryDifficulty::Easy).cards().len(), 12);
    assert_eq!(board(MemoryDifficulty::Medium).cards().len(), 16);
    assert_eq!(board(MemoryDifficulty::Hard).cards().len(), 24);
    assert_eq!(MemoryDifficulty::Hard.time_limit_secs(), 240);
}

#[test]
fn test_every_icon_appears_exactly_twice() {
    let board = board(MemoryDifficulty::Medium);
    for card in board.cards() {
        let count = board
            .cards()
            .iter()
            .filter(|c| c.icon() == card.icon())
            .count();
        assert_eq!(count, 2);
    }
}

#[test]
fn test_deal_needs_enough_icons() {
    let mut rng = StdRng::seed_from_u64(1);
    let icons = &content::memory_icons()[..4];
    assert!(MemoryBoard::deal(MemoryDifficulty::Easy, icons, &mut rng, Utc::now()).is_err());
}

#[test]
fn test_match_scores_and_counts_a_move() {
    let mut board = board(MemoryDifficulty::Easy);
    let other = partner(&board, 0);

    assert_eq!(board.flip(0).unwrap(), FlipOutcome::FirstFlipped);
    let outcome = board.flip(other).unwrap();
    assert!(matches!(outcome, FlipOutcome::Matched { game_over: false, .. }));
    assert_eq!(*board.moves(), 1);
    assert_eq!(*board.matches(), 1);
    assert_eq!(*board.score(), 100);
    assert!(*board.cards()[0].is_matched());
}

#[test]
fn test_matched_and_face_up_cards_ignore_flips() {
    let mut board = board(MemoryDifficulty::Easy);
    board.flip(0).unwrap();
    assert_eq!(board.flip(0).unwrap(), FlipOutcome::Ignored);

    let other = partner(&board, 0);
    board.flip(other).unwrap();
    assert_eq!(board.flip(other).unwrap(), FlipOutcome::Ignored);
    assert!(board.flip(99).is_err());
}

#[test]
fn test_mismatch_blocks_until_hidden_and_resets_combo() {
    let mut board = board(MemoryDifficulty::Easy);
    let other = partner(&board, 0);
    board.flip(0).unwrap();
    board.flip(other).unwrap();
    assert_eq!(*board.combo(), 1);

    let a = stranger(&board, 0);
    let b = stranger(&board, a);
    board.flip(a).unwrap();
    assert_eq!(board.flip(b).unwrap(), FlipOutcome::Mismatched);
    assert_eq!(*board.combo(), 0);

    assert_eq!(board.flip(partner(&board, a)).unwrap(), FlipOutcome::Ignored);

    board.hide_unmatched();
    assert!(!board.cards()[a].is_flipped());
    assert!(!board.cards()[b].is_flipped());
    assert_eq!(board.flip(a).unwrap(), FlipOutcome::FirstFlipped);
}

#[test]
fn test_clearing_the_board_ends_the_game_with_combo_bonus() {
    let mut board = board(MemoryDifficulty::Easy);
    let mut last = None;
    while !board.is_game_over() {
        let first = board.cards().iter().position(|c| !c.is_matched()).unwrap();
        let second = partner(&board, first);
        board.flip(first).unwrap();
        last = Some(board.flip(second).unwrap());
    }
    assert!(matches!(last, Some(FlipOutcome::Matched { game_over: true, .. })));
    // matches three to five carry +50, the sixth +100
    assert_eq!(*board.score(), 6 * 100 + 3 * 50 + 100);
    assert_eq!(*board.moves(), 6);
}

#[test]
fn test_board_clock() {
    let start = Utc::now();
    let mut rng = StdRng::seed_from_u64(3);
    let board =
        MemoryBoard::deal(MemoryDifficulty::Easy, &content::memory_icons(), &mut rng, start).unwrap();
    assert_eq!(board.time_left(start + Duration::seconds(20)), 100);
    assert!(board.is_expired(start + Duration::seconds(120)));
}
