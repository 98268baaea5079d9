//! CyberQuest service - accounts, progress, quizzes, catalog and the HTTP API
//!
//! Points earned in the mini-games of `cyberquest_games`, in quizzes, on the
//! roadmap and in courses are written to a hosted backend-as-a-service. This
//! crate holds the client for that backend, the auth context, the progress
//! bookkeeping and the axum router that exposes every page as JSON.
//!
//! # Architecture
//!
//! - **Backend**: the [`Backend`] trait with a Supabase REST client and an
//!   in-memory double
//! - **Auth**: [`AuthContext`] publishes sign-in state and change events
//! - **Progress**: [`ProgressService`] writes history, activity and points
//! - **Play**: [`PlayManager`] holds active game and quiz sessions
//! - **Server**: the router mapping page paths to handlers
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use cyberquest::{AppConfig, SupabaseBackend, server};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = AppConfig::from_env();
//! let state = server::AppState::new(Arc::new(SupabaseBackend::new(&config)));
//! let app = server::router(state);
//! let listener = tokio::net::TcpListener::bind(("127.0.0.1", 3000)).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod auth;
mod backend;
mod cli;
mod config;
mod leaderboard;
mod play;
mod progress;
mod time_range;

pub mod catalog;
pub mod pages;
pub mod quiz;
pub mod server;

// Crate-level exports
pub use auth::{AuthChange, AuthContext, AuthEvent, AuthState, spawn_profile_bootstrap};
pub use backend::{
    ActivityType, AuthResponse, AuthUser, Backend, BackendError, BackendErrorKind,
    DEFAULT_PROFILE_NAME, Filter, GameHistory, MemoryBackend, NewActivity, NewGameHistory,
    NewProfile, NewQuizHistory, NewTestResult, Notifications, Order, Privacy, Profile,
    ProfilePatch, ProgressPatch, Query, QuizHistory, Session, SupabaseBackend, Table, TestResult,
    UserActivity, UserMetadata, UserProgress, fetch_all, fetch_optional, insert_many, insert_one,
    update_where,
};
pub use cli::{Cli, Command};
pub use config::{AppConfig, ConfigError, PLACEHOLDER_ANON_KEY, PLACEHOLDER_URL};
pub use leaderboard::{
    LEADERBOARD_ERROR, LEADERBOARD_LIMIT, LeaderboardEntry, Podium, SortBy, fetch_leaderboard,
    leaderboard_query,
};
pub use play::{
    CardView, DEFAULT_TYPING_SECS, FinishSummary, FlipResult, GameState, InputResult, PlayError,
    PlayErrorKind, PlayManager, PlayView, QuizAnswerResult, STALE_SESSION_SECS, SessionId,
    StartGame, SubmitResult,
};
pub use progress::{
    GameRecord, LabCompletion, ModuleCompletion, ProfileOverview, ProgressService,
    RoadmapCompletion, SettingsStats, SettingsUpdate, SettingsView, TestStats, UserStats,
};
pub use time_range::TimeRange;
