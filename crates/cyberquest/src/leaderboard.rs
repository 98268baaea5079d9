//! Top players by points, quiz average or quizzes taken.

use chrono::{DateTime, Utc};
use cyberquest_games::Level;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use tracing::{debug, instrument};

use crate::backend::fetch_all;
use crate::{Backend, BackendError, Query, Table, TimeRange};

/// Most rows a leaderboard shows.
pub const LEADERBOARD_LIMIT: usize = 100;

/// Message shown when the leaderboard cannot be read.
pub const LEADERBOARD_ERROR: &str = "Unable to load leaderboard data";

/// Column the leaderboard is ranked by, highest first.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SortBy {
    /// Total points.
    #[default]
    Points,
    /// Running quiz average.
    QuizScore,
    /// Number of quizzes finished.
    TotalQuizzesTaken,
}

/// Podium decoration for the top three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Podium {
    /// First place.
    Crown,
    /// Second place.
    Medal,
    /// Third place.
    Award,
}

impl Podium {
    /// Decoration for a 1-based rank.
    pub fn for_rank(rank: usize) -> Option<Self> {
        match rank {
            1 => Some(Self::Crown),
            2 => Some(Self::Medal),
            3 => Some(Self::Award),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LeaderboardRow {
    id: String,
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    points: u32,
    #[serde(default)]
    quiz_score: u32,
    #[serde(default)]
    total_quizzes_taken: u32,
    #[serde(default)]
    level: Level,
}

/// One ranked player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct LeaderboardEntry {
    rank: usize,
    podium: Option<Podium>,
    id: String,
    name: String,
    email: String,
    points: u32,
    quiz_score: u32,
    total_quizzes_taken: u32,
    level: Level,
}

/// Builds the profile query for a leaderboard as of `now`.
pub fn leaderboard_query(sort_by: SortBy, range: TimeRange, now: DateTime<Utc>) -> Query {
    let mut query = Query::from(Table::Profiles)
        .select("id,name,email,points,quiz_score,total_quizzes_taken,level");
    if let Some(since) = range.since(now) {
        query = query.gte("created_at", since.to_rfc3339());
    }
    query.order(sort_by.as_ref(), false).limit(LEADERBOARD_LIMIT)
}

/// Ranked players for `sort_by` over profiles created within `range`.
///
/// # Errors
///
/// Returns [`BackendError`] if the read fails.
#[instrument(skip(backend))]
pub async fn fetch_leaderboard(
    backend: &dyn Backend,
    sort_by: SortBy,
    range: TimeRange,
) -> Result<Vec<LeaderboardEntry>, BackendError> {
    let query = leaderboard_query(sort_by, range, Utc::now());
    let rows: Vec<LeaderboardRow> = fetch_all(backend, &query).await?;
    debug!(count = rows.len(), "Leaderboard fetched");

    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(index, row)| LeaderboardEntry {
            rank: index + 1,
            podium: Podium::for_rank(index + 1),
            id: row.id,
            name: row.name,
            email: row.email,
            points: row.points,
            quiz_score: row.quiz_score,
            total_quizzes_taken: row.total_quizzes_taken,
            level: row.level,
        })
        .collect())
}
