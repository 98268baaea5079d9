//! The countdown/combo loop shared by the challenge games.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::{Challenge, Countdown, GameError, GameKind, ScoreBreakdown, challenge_score, flat_score};

/// Where a run stands on its current challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// The current challenge has not been started.
    #[default]
    Ready,
    /// Accepting answers.
    Active,
    /// The current challenge was solved.
    Solved,
    /// The clock ran out on the current challenge.
    TimedOut,
    /// Every challenge has been played.
    Finished,
}

/// The result of one submitted answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct Attempt {
    challenge_id: String,
    correct: bool,
    timed_out: bool,
    /// Present only when points were awarded.
    breakdown: Option<ScoreBreakdown>,
    /// Combo after this attempt.
    combo: u32,
    /// Run score after this attempt.
    score: u32,
}

impl Attempt {
    /// Whether the answer solved the challenge.
    pub fn is_correct(&self) -> bool {
        self.correct
    }
}

/// A player's pass through one game's challenge array.
///
/// Wrong answers reset the combo but keep the challenge open. Running out of
/// time counts as a failure; [`ChallengeRun::start`] restarts the clock on
/// the same challenge and [`ChallengeRun::advance`] skips it.
#[derive(Debug, Clone, Serialize, Deserialize, Getters)]
pub struct ChallengeRun {
    kind: GameKind,
    challenges: Vec<Challenge>,
    current: usize,
    status: RunStatus,
    countdown: Option<Countdown>,
    score: u32,
    combo: u32,
    solved: usize,
}

impl ChallengeRun {
    /// Creates a run over `challenges`.
    #[instrument(skip(challenges), fields(count = challenges.len()))]
    pub fn new(kind: GameKind, challenges: Vec<Challenge>) -> Self {
        let status = if challenges.is_empty() {
            RunStatus::Finished
        } else {
            RunStatus::Ready
        };
        Self {
            kind,
            challenges,
            current: 0,
            status,
            countdown: None,
            score: 0,
            combo: 0,
            solved: 0,
        }
    }

    /// The challenge being played, `None` once finished.
    pub fn current_challenge(&self) -> Option<&Challenge> {
        if self.status == RunStatus::Finished {
            None
        } else {
            self.challenges.get(self.current)
        }
    }

    /// Starts, or restarts after a timeout, the current challenge.
    ///
    /// # Errors
    ///
    /// Returns [`GameError`] if the run is finished or the challenge was
    /// already solved.
    #[instrument(skip(self), fields(game = %self.kind, current = self.current))]
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), GameError> {
        let challenge = match self.status {
            RunStatus::Finished => return Err(GameError::new("Run is already finished")),
            RunStatus::Solved => {
                return Err(GameError::new("Challenge already solved, advance to the next one"));
            }
            _ => self
                .challenges
                .get(self.current)
                .ok_or_else(|| GameError::new("No challenge to start"))?,
        };

        self.countdown = challenge
            .time_limit_secs()
            .map(|limit| Countdown::start(now, limit));
        self.status = RunStatus::Active;
        info!(challenge_id = %challenge.id(), "Challenge started");
        Ok(())
    }

    /// Seconds left on the current challenge. Untimed challenges report `None`.
    pub fn time_left(&self, now: DateTime<Utc>) -> Option<u32> {
        self.countdown.map(|c| c.time_left(now))
    }

    /// Marks the current challenge as timed out if its clock has run down.
    ///
    /// Returns whether the challenge expired on this call.
    #[instrument(skip(self), fields(game = %self.kind))]
    pub fn expire(&mut self, now: DateTime<Utc>) -> bool {
        let expired = self.status == RunStatus::Active
            && self.countdown.is_some_and(|c| c.is_expired(now));
        if expired {
            warn!(current = self.current, "Challenge timed out");
            self.status = RunStatus::TimedOut;
            self.combo = 0;
        }
        expired
    }

    /// Checks `input` against the current challenge.
    ///
    /// # Errors
    ///
    /// Returns [`GameError`] if no challenge is active.
    #[instrument(skip(self, input), fields(game = %self.kind, current = self.current))]
    pub fn submit(&mut self, input: &str, now: DateTime<Utc>) -> Result<Attempt, GameError> {
        if self.status != RunStatus::Active {
            return Err(GameError::new(format!(
                "No active challenge (status {:?})",
                self.status
            )));
        }
        let challenge = self
            .challenges
            .get(self.current)
            .ok_or_else(|| GameError::new("Current challenge out of range"))?;
        let challenge_id = challenge.id().clone();
        let points = *challenge.points();
        let solved = challenge.is_solved_by(input);

        if self.expire(now) {
            return Ok(self.attempt(challenge_id, false, true, None));
        }

        if !solved {
            debug!(combo_lost = self.combo, "Wrong answer");
            self.combo = 0;
            return Ok(self.attempt(challenge_id, false, false, None));
        }

        let breakdown = match self.countdown {
            Some(countdown) => challenge_score(points, countdown.time_left(now), self.combo),
            None => flat_score(points),
        };
        self.score += breakdown.total();
        self.combo += 1;
        self.solved += 1;
        self.status = RunStatus::Solved;
        info!(
            challenge_id = %challenge_id,
            points = breakdown.total(),
            score = self.score,
            combo = self.combo,
            "Challenge solved"
        );
        Ok(self.attempt(challenge_id, true, false, Some(breakdown)))
    }

    fn attempt(
        &self,
        challenge_id: String,
        correct: bool,
        timed_out: bool,
        breakdown: Option<ScoreBreakdown>,
    ) -> Attempt {
        Attempt::new(challenge_id, correct, timed_out, breakdown, self.combo, self.score)
    }

    /// Moves to the next challenge, leaving it ready to start.
    ///
    /// # Errors
    ///
    /// Returns [`GameError`] if the current challenge is still in play or the
    /// run is finished.
    #[instrument(skip(self), fields(game = %self.kind))]
    pub fn advance(&mut self) -> Result<RunStatus, GameError> {
        match self.status {
            RunStatus::Active => return Err(GameError::new("Current challenge is still active")),
            RunStatus::Finished => return Err(GameError::new("Run is already finished")),
            RunStatus::Ready | RunStatus::Solved | RunStatus::TimedOut => {}
        }

        self.countdown = None;
        if self.current + 1 >= self.challenges.len() {
            self.status = RunStatus::Finished;
            info!(score = self.score, solved = self.solved, "Run finished");
        } else {
            self.current += 1;
            self.status = RunStatus::Ready;
            debug!(current = self.current, "Advanced to next challenge");
        }
        Ok(self.status)
    }

    /// Whether every challenge has been played.
    pub fn is_finished(&self) -> bool {
        self.status == RunStatus::Finished
    }
}
