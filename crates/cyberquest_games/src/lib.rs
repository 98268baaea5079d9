//! CyberQuest game logic - content, answer checking and scoring.
//!
//! Every mini-game follows the same shallow pattern: a fixed content array,
//! a countdown, a predicate comparing input against an expected answer, and
//! a flat point value plus time and combo bonuses. This crate holds that
//! logic with no I/O so the service crate can persist whatever it returns.
//!
//! # Architecture
//!
//! - **Cipher**: toy string transforms used as puzzle content
//! - **Scoring**: point formulas and level thresholds
//! - **Challenge runs**: the countdown/combo loop shared by eight games
//! - **Log analysis**: multi-question scenarios
//! - **Memory**: card matching board
//! - **Drills**: command and typing drills
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use cyberquest_games::{ChallengeRun, GameKind, content};
//!
//! let mut run = ChallengeRun::new(GameKind::Web, content::web_challenges());
//! let now = Utc::now();
//! run.start(now)?;
//!
//! // The first web challenge wants a script tag, not SQL.
//! let attempt = run.submit("admin' OR '1'='1", now)?;
//! assert!(!attempt.is_correct());
//!
//! let attempt = run.submit(r#"<script>alert("hacked")</script>"#, now)?;
//! assert_eq!(attempt.breakdown().map(|b| *b.total()), Some(130));
//! # Ok::<(), cyberquest_games::GameError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod challenge;
pub mod cipher;
pub mod content;
mod countdown;
mod drill;
mod error;
mod kind;
mod log_analysis;
mod memory;
mod run;
mod scoring;
mod types;

pub use challenge::{AnswerCheck, Challenge};
pub use countdown::Countdown;
pub use drill::{
    CommandDrill, DrillCommand, Keystroke, Trophy, TrophyKind, TypingDrill, TypingStats,
    COMMAND_DRILL_SECS, TYPING_TIME_OPTIONS,
};
pub use error::GameError;
pub use kind::GameKind;
pub use log_analysis::{LogAnalysisRun, LogQuestion, LogScenario};
pub use memory::{Card, FlipOutcome, MemoryBoard, MemoryDifficulty, MemoryIcon};
pub use run::{Attempt, ChallengeRun, RunStatus};
pub use scoring::{
    Level, ScoreBreakdown, challenge_score, drill_score, flat_score, lab_level, level_for_game_score,
    level_for_quiz_points, log_question_score, memory_match_score, time_bonus,
};
pub use types::Difficulty;
