//! Point formulas and level thresholds.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{debug, instrument};

/// Bonus per combo step for single-answer challenges.
const CHALLENGE_COMBO_BONUS: u32 = 50;
/// Bonus per combo step for log analysis questions.
const LOG_COMBO_BONUS: u32 = 25;
/// Points per matched memory pair.
const MEMORY_MATCH_POINTS: u32 = 100;
/// Points per completed drill command.
const DRILL_COMMAND_POINTS: u32 = 100;

/// Player level stored on the profile row.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Level {
    /// Starting level.
    #[default]
    Beginner,
    /// Middle level.
    Intermediate,
    /// Top level.
    Advanced,
}

/// How a single award was computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
pub struct ScoreBreakdown {
    base: u32,
    time_bonus: u32,
    combo_bonus: u32,
    total: u32,
}

impl ScoreBreakdown {
    fn from_parts(base: u32, time_bonus: u32, combo_bonus: u32) -> Self {
        Self {
            base,
            time_bonus,
            combo_bonus,
            total: base + time_bonus + combo_bonus,
        }
    }
}

/// One bonus point per ten seconds left on the clock.
pub fn time_bonus(time_left_secs: u32) -> u32 {
    time_left_secs / 10
}

/// Award for a solved challenge.
///
/// `combo` is the streak before this success.
#[instrument]
pub fn challenge_score(points: u32, time_left_secs: u32, combo: u32) -> ScoreBreakdown {
    let breakdown =
        ScoreBreakdown::from_parts(points, time_bonus(time_left_secs), combo * CHALLENGE_COMBO_BONUS);
    debug!(total = breakdown.total, "Challenge scored");
    breakdown
}

/// Award for one answered log analysis question. The scenario's points are
/// split evenly across its questions, rounding down.
#[instrument]
pub fn log_question_score(
    scenario_points: u32,
    question_count: u32,
    time_left_secs: u32,
    combo: u32,
) -> ScoreBreakdown {
    let base = scenario_points.checked_div(question_count).unwrap_or(0);
    ScoreBreakdown::from_parts(base, time_bonus(time_left_secs), combo * LOG_COMBO_BONUS)
}

/// Award for a memory match. `new_combo` already counts this match; every
/// third consecutive match adds a bonus step.
pub fn memory_match_score(new_combo: u32) -> ScoreBreakdown {
    ScoreBreakdown::from_parts(MEMORY_MATCH_POINTS, 0, (new_combo / 3) * 50)
}

/// Award for a completed drill command.
pub fn drill_score() -> ScoreBreakdown {
    ScoreBreakdown::from_parts(DRILL_COMMAND_POINTS, 0, 0)
}

/// Award for an untimed challenge: its points and nothing else.
pub fn flat_score(points: u32) -> ScoreBreakdown {
    ScoreBreakdown::from_parts(points, 0, 0)
}

fn tiered(value: u32, intermediate_above: u32, advanced_above: u32) -> Level {
    if value > advanced_above {
        Level::Advanced
    } else if value > intermediate_above {
        Level::Intermediate
    } else {
        Level::Beginner
    }
}

/// Level reached by a game score: above 800 advanced, above 400 intermediate.
pub fn level_for_game_score(score: u32) -> Level {
    tiered(score, 400, 800)
}

/// Level reached by raw quiz points: above 80 advanced, above 50 intermediate.
pub fn level_for_quiz_points(points: u32) -> Level {
    tiered(points, 50, 80)
}

/// Level attached to a lab challenge by its points: above 150 advanced,
/// above 75 intermediate.
pub fn lab_level(points: u32) -> Level {
    tiered(points, 75, 150)
}
