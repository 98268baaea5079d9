//! Card matching over security concepts.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_new::new;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use tracing::{debug, info, instrument};

use crate::{Countdown, GameError, ScoreBreakdown, memory_match_score};

/// A security concept printed on a pair of cards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters, new)]
pub struct MemoryIcon {
    name: String,
    description: String,
}

/// Board size and clock.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MemoryDifficulty {
    /// 6 pairs, two minutes.
    #[default]
    Easy,
    /// 8 pairs, three minutes.
    Medium,
    /// 12 pairs, four minutes.
    Hard,
}

impl MemoryDifficulty {
    /// Number of pairs on the board.
    pub fn pairs(self) -> usize {
        match self {
            Self::Easy => 6,
            Self::Medium => 8,
            Self::Hard => 12,
        }
    }

    /// Seconds allowed to clear the board.
    pub fn time_limit_secs(self) -> u32 {
        match self {
            Self::Easy => 120,
            Self::Medium => 180,
            Self::Hard => 240,
        }
    }
}

/// One card on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Card {
    id: usize,
    icon: MemoryIcon,
    is_flipped: bool,
    is_matched: bool,
}

/// What a flip did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FlipOutcome {
    /// The flip was not allowed: two cards already up, or the card is face
    /// up or matched.
    Ignored,
    /// First card of a move turned over.
    FirstFlipped,
    /// The two face-up cards match.
    Matched {
        /// Points for this match.
        breakdown: ScoreBreakdown,
        /// Whether this was the last pair.
        game_over: bool,
    },
    /// The two face-up cards differ and stay up until hidden.
    Mismatched,
}

/// A shuffled memory board.
#[derive(Debug, Clone, Serialize, Deserialize, Getters)]
pub struct MemoryBoard {
    difficulty: MemoryDifficulty,
    cards: Vec<Card>,
    #[getter(skip)]
    face_up: Vec<usize>,
    moves: u32,
    matches: usize,
    combo: u32,
    score: u32,
    countdown: Countdown,
}

impl MemoryBoard {
    /// Deals `difficulty.pairs()` icons, twice each, in random order.
    ///
    /// # Errors
    ///
    /// Returns [`GameError`] if `icons` has fewer entries than the board
    /// needs pairs.
    #[instrument(skip(icons, rng))]
    pub fn deal<R: Rng + ?Sized>(
        difficulty: MemoryDifficulty,
        icons: &[MemoryIcon],
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<Self, GameError> {
        let pairs = difficulty.pairs();
        if icons.len() < pairs {
            return Err(GameError::new(format!(
                "Need {} icons for a {} board, got {}",
                pairs,
                difficulty,
                icons.len()
            )));
        }

        let chosen: Vec<MemoryIcon> = icons.choose_multiple(rng, pairs).cloned().collect();
        let mut deck: Vec<MemoryIcon> = chosen.iter().chain(chosen.iter()).cloned().collect();
        deck.shuffle(rng);

        let cards = deck
            .into_iter()
            .enumerate()
            .map(|(id, icon)| Card {
                id,
                icon,
                is_flipped: false,
                is_matched: false,
            })
            .collect();

        info!(pairs, "Memory board dealt");
        Ok(Self {
            difficulty,
            cards,
            face_up: Vec::with_capacity(2),
            moves: 0,
            matches: 0,
            combo: 0,
            score: 0,
            countdown: Countdown::start(now, difficulty.time_limit_secs()),
        })
    }

    /// Turns a card face up.
    ///
    /// # Errors
    ///
    /// Returns [`GameError`] if `index` is off the board.
    #[instrument(skip(self))]
    pub fn flip(&mut self, index: usize) -> Result<FlipOutcome, GameError> {
        let card = self
            .cards
            .get(index)
            .ok_or_else(|| GameError::new(format!("No card at {}", index)))?;
        if self.face_up.len() == 2 || card.is_flipped || card.is_matched {
            debug!("Flip ignored");
            return Ok(FlipOutcome::Ignored);
        }

        self.cards[index].is_flipped = true;
        let Some(&first) = self.face_up.first() else {
            self.face_up.push(index);
            return Ok(FlipOutcome::FirstFlipped);
        };

        self.moves += 1;
        if self.cards[first].icon.name == self.cards[index].icon.name {
            self.cards[first].is_matched = true;
            self.cards[index].is_matched = true;
            self.face_up.clear();
            self.matches += 1;
            self.combo += 1;
            let breakdown = memory_match_score(self.combo);
            self.score += breakdown.total();
            let game_over = self.is_game_over();
            info!(
                matches = self.matches,
                combo = self.combo,
                score = self.score,
                game_over,
                "Pair matched"
            );
            Ok(FlipOutcome::Matched {
                breakdown,
                game_over,
            })
        } else {
            self.face_up.push(index);
            self.combo = 0;
            debug!(moves = self.moves, "Mismatch");
            Ok(FlipOutcome::Mismatched)
        }
    }

    /// Turns face-up, unmatched cards back over after a mismatch.
    pub fn hide_unmatched(&mut self) {
        for index in self.face_up.drain(..) {
            if let Some(card) = self.cards.get_mut(index) {
                card.is_flipped = false;
            }
        }
    }

    /// Whether every pair has been matched.
    pub fn is_game_over(&self) -> bool {
        self.matches == self.difficulty.pairs()
    }

    /// Seconds left on the board's clock.
    pub fn time_left(&self, now: DateTime<Utc>) -> u32 {
        self.countdown.time_left(now)
    }

    /// Whether the clock has run out.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.countdown.is_expired(now)
    }
}
