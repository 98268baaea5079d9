//! Command and typing drills.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_new::new;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{debug, info, instrument};

use crate::{Countdown, GameError, ScoreBreakdown, drill_score};

/// Length of a command drill.
pub const COMMAND_DRILL_SECS: u32 = 60;

/// Durations a typing drill may be played for.
pub const TYPING_TIME_OPTIONS: [u32; 4] = [60, 120, 300, 600];

/// A command to retype and what it does.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters, new)]
pub struct DrillCommand {
    command: String,
    description: String,
}

/// What one input event did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Keystroke {
    /// The input is a prefix of the target.
    Progress,
    /// The input can no longer become the target.
    Mistake,
    /// The target was typed exactly; a new one was drawn.
    Completed {
        /// Points for the command.
        breakdown: ScoreBreakdown,
        /// The next command to type.
        next: DrillCommand,
    },
    /// The clock has run out; input is no longer accepted.
    Expired,
}

fn draw<R: Rng + ?Sized>(commands: &[DrillCommand], rng: &mut R) -> Result<DrillCommand, GameError> {
    commands
        .choose(rng)
        .cloned()
        .ok_or_else(|| GameError::new("Drill has no commands"))
}

/// Retype security commands exactly for 60 seconds.
#[derive(Debug, Clone, Serialize, Deserialize, Getters)]
pub struct CommandDrill {
    #[getter(skip)]
    commands: Vec<DrillCommand>,
    target: DrillCommand,
    countdown: Countdown,
    score: u32,
    completed: u32,
}

impl CommandDrill {
    /// Starts a drill at `now` with a random first command.
    ///
    /// # Errors
    ///
    /// Returns [`GameError`] if `commands` is empty.
    #[instrument(skip(commands, rng), fields(count = commands.len()))]
    pub fn start<R: Rng + ?Sized>(
        commands: Vec<DrillCommand>,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<Self, GameError> {
        let target = draw(&commands, rng)?;
        info!(target = %target.command, "Command drill started");
        Ok(Self {
            commands,
            target,
            countdown: Countdown::start(now, COMMAND_DRILL_SECS),
            score: 0,
            completed: 0,
        })
    }

    /// Checks the current contents of the input box.
    ///
    /// # Errors
    ///
    /// Returns [`GameError`] if a new command cannot be drawn.
    #[instrument(skip(self, rng))]
    pub fn input<R: Rng + ?Sized>(
        &mut self,
        text: &str,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<Keystroke, GameError> {
        if self.countdown.is_expired(now) {
            return Ok(Keystroke::Expired);
        }
        if text != self.target.command {
            return Ok(if self.target.command.starts_with(text) {
                Keystroke::Progress
            } else {
                Keystroke::Mistake
            });
        }

        let breakdown = drill_score();
        self.score += breakdown.total();
        self.completed += 1;
        self.target = draw(&self.commands, rng)?;
        debug!(score = self.score, "Command completed");
        Ok(Keystroke::Completed {
            breakdown,
            next: self.target.clone(),
        })
    }

    /// Seconds left.
    pub fn time_left(&self, now: DateTime<Utc>) -> u32 {
        self.countdown.time_left(now)
    }

    /// Whether the drill is over.
    pub fn is_finished(&self, now: DateTime<Utc>) -> bool {
        self.countdown.is_expired(now)
    }
}

/// Trophy family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TrophyKind {
    /// Words per minute.
    Speed,
    /// Share of keystrokes without mistakes.
    Accuracy,
    /// Long drills with many commands.
    Endurance,
}

/// A typing drill award.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct Trophy {
    kind: TrophyKind,
    name: String,
    icon: String,
}

impl Trophy {
    fn new(kind: TrophyKind, name: &str, icon: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
            icon: icon.to_string(),
        }
    }
}

const SPEED_TROPHIES: [(u32, &str, &str); 3] = [
    (100, "Speed Demon", "🏃"),
    (80, "Swift Hacker", "⚡"),
    (60, "Quick Fingers", "🎯"),
];

const ACCURACY_TROPHIES: [(u32, &str, &str); 3] = [
    (98, "Precision Master", "🎯"),
    (95, "Sharp Eye", "👁️"),
    (90, "Steady Hand", "🤚"),
];

/// (drill seconds, commands completed, name, icon)
const ENDURANCE_TROPHIES: [(u32, u32, &str, &str); 3] = [
    (600, 50, "Marathon Hacker", "🏆"),
    (300, 25, "Persistent Coder", "💪"),
    (120, 15, "Quick Sprint", "🏃"),
];

/// Live statistics of a typing drill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
pub struct TypingStats {
    keystrokes: u32,
    mistakes: u32,
    /// Percent, 0 to 100.
    accuracy: u32,
    wpm: u32,
    completed_commands: u32,
    score: u32,
}

/// Typing speed drill with accuracy tracking and trophies.
#[derive(Debug, Clone, Serialize, Deserialize, Getters)]
pub struct TypingDrill {
    #[getter(skip)]
    commands: Vec<DrillCommand>,
    target: DrillCommand,
    duration_secs: u32,
    countdown: Countdown,
    keystrokes: u32,
    mistakes: u32,
    completed_commands: u32,
    score: u32,
    trophies: Vec<Trophy>,
}

impl TypingDrill {
    /// Starts a drill of `duration_secs`, one of [`TYPING_TIME_OPTIONS`].
    ///
    /// # Errors
    ///
    /// Returns [`GameError`] for an unsupported duration or no commands.
    #[instrument(skip(commands, rng))]
    pub fn start<R: Rng + ?Sized>(
        commands: Vec<DrillCommand>,
        duration_secs: u32,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<Self, GameError> {
        if !TYPING_TIME_OPTIONS.contains(&duration_secs) {
            return Err(GameError::new(format!(
                "Unsupported drill length {}s, choose one of {:?}",
                duration_secs, TYPING_TIME_OPTIONS
            )));
        }
        let target = draw(&commands, rng)?;
        info!(duration_secs, "Typing drill started");
        Ok(Self {
            commands,
            target,
            duration_secs,
            countdown: Countdown::start(now, duration_secs),
            keystrokes: 0,
            mistakes: 0,
            completed_commands: 0,
            score: 0,
            trophies: Vec::new(),
        })
    }

    /// Records one change of the input box.
    ///
    /// Every change counts as a keystroke. A mistake is counted when the
    /// input is longer than the target or stops being a prefix of it.
    ///
    /// # Errors
    ///
    /// Returns [`GameError`] if a new command cannot be drawn.
    #[instrument(skip(self, rng))]
    pub fn input<R: Rng + ?Sized>(
        &mut self,
        text: &str,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<Keystroke, GameError> {
        if self.countdown.is_expired(now) {
            return Ok(Keystroke::Expired);
        }
        self.keystrokes += 1;

        let target = self.target.command.as_str();
        if text == target {
            let breakdown = drill_score();
            self.score += breakdown.total();
            self.completed_commands += 1;
            self.target = draw(&self.commands, rng)?;
            debug!(completed = self.completed_commands, "Command typed");
            return Ok(Keystroke::Completed {
                breakdown,
                next: self.target.clone(),
            });
        }

        if text.len() > target.len() || !target.starts_with(text) {
            self.mistakes += 1;
            Ok(Keystroke::Mistake)
        } else {
            Ok(Keystroke::Progress)
        }
    }

    /// Accuracy in percent, 100 before any keystroke.
    pub fn accuracy(&self) -> u32 {
        if self.keystrokes == 0 {
            return 100;
        }
        let ratio = 1.0 - f64::from(self.mistakes) / f64::from(self.keystrokes);
        (ratio * 100.0).round().max(0.0) as u32
    }

    /// Words per minute so far, five keystrokes to a word.
    pub fn wpm(&self, now: DateTime<Utc>) -> u32 {
        let elapsed = self.countdown.elapsed(now).min(self.duration_secs);
        if elapsed == 0 {
            return 0;
        }
        let minutes = f64::from(elapsed) / 60.0;
        let words = f64::from(self.keystrokes) / 5.0;
        (words / minutes).round() as u32
    }

    /// Snapshot of the drill's numbers.
    pub fn stats(&self, now: DateTime<Utc>) -> TypingStats {
        TypingStats {
            keystrokes: self.keystrokes,
            mistakes: self.mistakes,
            accuracy: self.accuracy(),
            wpm: self.wpm(now),
            completed_commands: self.completed_commands,
            score: self.score,
        }
    }

    /// Seconds left.
    pub fn time_left(&self, now: DateTime<Utc>) -> u32 {
        self.countdown.time_left(now)
    }

    /// Whether the drill is over.
    pub fn is_finished(&self, now: DateTime<Utc>) -> bool {
        self.countdown.is_expired(now)
    }

    /// Awards every trophy the current stats qualify for that has not been
    /// awarded yet, and returns the new ones.
    #[instrument(skip(self))]
    pub fn award_trophies(&mut self, now: DateTime<Utc>) -> Vec<Trophy> {
        let stats = self.stats(now);
        let mut earned = Vec::new();

        for (wpm, name, icon) in SPEED_TROPHIES {
            if stats.wpm >= wpm {
                earned.push(Trophy::new(TrophyKind::Speed, name, icon));
            }
        }
        for (accuracy, name, icon) in ACCURACY_TROPHIES {
            if stats.accuracy >= accuracy {
                earned.push(Trophy::new(TrophyKind::Accuracy, name, icon));
            }
        }
        for (secs, commands, name, icon) in ENDURANCE_TROPHIES {
            if self.duration_secs >= secs && stats.completed_commands >= commands {
                earned.push(Trophy::new(TrophyKind::Endurance, name, icon));
            }
        }

        earned.retain(|t| !self.trophies.iter().any(|held| held.name == t.name));
        if !earned.is_empty() {
            info!(count = earned.len(), "Trophies awarded");
        }
        self.trophies.extend(earned.iter().cloned());
        earned
    }
}
