//! Shared content types.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Difficulty tier attached to challenges and quiz questions.
///
/// Content written with the easy/medium/hard vocabulary maps onto the same
/// three tiers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    /// Entry level (also "easy").
    #[serde(alias = "easy")]
    #[strum(to_string = "beginner", serialize = "easy")]
    Beginner,
    /// Middle tier (also "medium").
    #[serde(alias = "medium")]
    #[strum(to_string = "intermediate", serialize = "medium")]
    Intermediate,
    /// Top tier (also "hard").
    #[serde(alias = "hard")]
    #[strum(to_string = "advanced", serialize = "hard")]
    Advanced,
}
