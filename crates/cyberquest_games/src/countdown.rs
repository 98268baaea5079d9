//! Wall-clock countdowns.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A countdown measured against wall-clock timestamps.
///
/// No timer task ticks it. Callers pass `now` and the countdown answers
/// with the seconds left, so an expired challenge is noticed on the next
/// interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Countdown {
    started_at: DateTime<Utc>,
    limit_secs: u32,
}

impl Countdown {
    /// Starts a countdown of `limit_secs` at `now`.
    pub fn start(now: DateTime<Utc>, limit_secs: u32) -> Self {
        Self {
            started_at: now,
            limit_secs,
        }
    }

    /// Whole seconds elapsed since the start, never negative.
    pub fn elapsed(&self, now: DateTime<Utc>) -> u32 {
        let secs = (now - self.started_at).num_seconds().max(0);
        u32::try_from(secs).unwrap_or(u32::MAX)
    }

    /// Whole seconds left, zero once expired.
    pub fn time_left(&self, now: DateTime<Utc>) -> u32 {
        self.limit_secs.saturating_sub(self.elapsed(now))
    }

    /// Whether the limit has been reached.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.time_left(now) == 0
    }
}
