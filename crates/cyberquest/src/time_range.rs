//! Reporting windows for the leaderboard and profile page.

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How far back a listing looks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TimeRange {
    /// No lower bound.
    #[default]
    All,
    /// The last seven days.
    Week,
    /// The last calendar month.
    Month,
}

impl TimeRange {
    /// Earliest `created_at` included, or `None` for everything.
    pub fn since(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::All => None,
            Self::Week => Some(now - Duration::days(7)),
            Self::Month => Some(
                now.checked_sub_months(Months::new(1))
                    .unwrap_or(now - Duration::days(30)),
            ),
        }
    }
}
