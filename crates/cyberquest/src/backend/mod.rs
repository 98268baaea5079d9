//! The backend-as-a-service client.
//!
//! [`Backend`] is the narrow set of calls the service makes: password auth
//! and row select / insert / update / upsert / delete. [`SupabaseBackend`]
//! talks to a hosted project over REST; [`MemoryBackend`] keeps everything
//! in process for tests.

mod error;
mod memory;
mod query;
mod rows;
mod session;
mod supabase;

pub use error::{BackendError, BackendErrorKind};
pub use memory::MemoryBackend;
pub use query::{Filter, Order, Query, Table};
pub use rows::{
    ActivityType, DEFAULT_PROFILE_NAME, GameHistory, NewActivity, NewGameHistory, NewProfile,
    NewQuizHistory, NewTestResult, Notifications, Privacy, Profile, ProfilePatch, ProgressPatch,
    QuizHistory, TestResult, UserActivity, UserProgress,
};
pub use session::{AuthResponse, AuthUser, Session, UserMetadata};
pub use supabase::SupabaseBackend;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};

/// Calls the service makes against the hosted backend.
///
/// Row calls run as whichever user last signed in through the same client.
#[async_trait]
pub trait Backend: Send + Sync + std::fmt::Debug {
    /// Password sign-in.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthResponse, BackendError>;

    /// Creates an account, storing `name` in its metadata.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<AuthResponse, BackendError>;

    /// Ends the current session.
    async fn sign_out(&self) -> Result<(), BackendError>;

    /// Changes the signed-in user's password.
    async fn update_password(&self, password: &str) -> Result<AuthUser, BackendError>;

    /// Removes an account.
    async fn delete_user(&self, user_id: &str) -> Result<(), BackendError>;

    /// Rows matching `query`.
    async fn select(&self, query: &Query) -> Result<Vec<Value>, BackendError>;

    /// Appends rows.
    async fn insert(&self, table: Table, rows: Vec<Value>) -> Result<(), BackendError>;

    /// Merges `patch` into every row matching `filters`.
    async fn update(
        &self,
        table: Table,
        filters: &[Filter],
        patch: Value,
    ) -> Result<(), BackendError>;

    /// Inserts `row`, or merges it into the row sharing `on_conflict`.
    async fn upsert(&self, table: Table, row: Value, on_conflict: &str)
    -> Result<(), BackendError>;

    /// Removes every row matching `filters`.
    async fn delete(&self, table: Table, filters: &[Filter]) -> Result<(), BackendError>;
}

/// Rows of `query` decoded as `T`.
#[instrument(skip(backend), fields(table = %query.table()))]
pub async fn fetch_all<T: DeserializeOwned + Send>(
    backend: &dyn Backend,
    query: &Query,
) -> Result<Vec<T>, BackendError> {
    let rows = backend.select(query).await?;
    debug!(count = rows.len(), "Rows fetched");
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(BackendError::from))
        .collect()
}

/// First row of `query`, if any.
pub async fn fetch_optional<T: DeserializeOwned + Send>(
    backend: &dyn Backend,
    query: &Query,
) -> Result<Option<T>, BackendError> {
    let query = query.clone().limit(1);
    Ok(fetch_all(backend, &query).await?.into_iter().next())
}

/// Inserts one typed row.
pub async fn insert_one<T: Serialize + Sync>(
    backend: &dyn Backend,
    table: Table,
    row: &T,
) -> Result<(), BackendError> {
    backend.insert(table, vec![serde_json::to_value(row)?]).await
}

/// Inserts typed rows in one call. An empty slice makes no call.
pub async fn insert_many<T: Serialize + Sync>(
    backend: &dyn Backend,
    table: Table,
    rows: &[T],
) -> Result<(), BackendError> {
    if rows.is_empty() {
        return Ok(());
    }
    let rows = rows
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;
    backend.insert(table, rows).await
}

/// Applies a typed patch to rows matching `filters`.
pub async fn update_where<T: Serialize + Sync>(
    backend: &dyn Backend,
    table: Table,
    filters: &[Filter],
    patch: &T,
) -> Result<(), BackendError> {
    backend
        .update(table, filters, serde_json::to_value(patch)?)
        .await
}
