//! In-process backend for tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use super::query::{cell_text, compare_cells};
use super::{
    AuthResponse, AuthUser, Backend, BackendError, BackendErrorKind, Filter, Query, Session, Table,
    UserMetadata,
};

#[derive(Debug, Clone)]
struct Account {
    user: AuthUser,
    password: String,
}

#[derive(Debug, Default)]
struct Store {
    accounts: HashMap<String, Account>,
    current: Option<String>,
    tables: HashMap<Table, Vec<Value>>,
    offline: bool,
}

/// A backend that keeps accounts and rows in memory.
///
/// Inserted rows get an `id` and `created_at` when they lack them, the way
/// the hosted store fills column defaults. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    store: Arc<Mutex<Store>>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating in-memory backend");
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Store>, BackendError> {
        let store = self.store.lock().map_err(|e| {
            BackendError::new(
                BackendErrorKind::Internal,
                format!("Memory backend lock poisoned: {}", e),
            )
        })?;
        if store.offline {
            return Err(BackendError::new(
                BackendErrorKind::Transport,
                "Backend unreachable",
            ));
        }
        Ok(store)
    }

    /// Makes every call fail with a transport error until switched back.
    pub fn set_offline(&self, offline: bool) {
        match self.store.lock() {
            Ok(mut store) => store.offline = offline,
            Err(e) => warn!(error = %e, "Memory backend lock poisoned"),
        }
    }

    /// Copy of every row in `table`, in insertion order.
    pub fn rows(&self, table: Table) -> Vec<Value> {
        self.store
            .lock()
            .map(|store| store.tables.get(&table).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    /// Adds a row directly, bypassing the offline switch.
    pub fn seed(&self, table: Table, row: Value) {
        match self.store.lock() {
            Ok(mut store) => store.tables.entry(table).or_default().push(with_defaults(row)),
            Err(e) => warn!(error = %e, "Memory backend lock poisoned"),
        }
    }

    /// Id of the signed-in account.
    pub fn current_user_id(&self) -> Option<String> {
        self.store.lock().ok().and_then(|store| store.current.clone())
    }
}

fn with_defaults(row: Value) -> Value {
    let Value::Object(mut fields) = row else {
        return row;
    };
    fields
        .entry("id")
        .or_insert_with(|| Value::String(uuid::Uuid::new_v4().to_string()));
    fields
        .entry("created_at")
        .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));
    Value::Object(fields)
}

fn merge(target: &mut Value, patch: &Value) {
    if let (Value::Object(target), Value::Object(patch)) = (target, patch) {
        for (key, value) in patch {
            target.insert(key.clone(), value.clone());
        }
    }
}

fn matches_all(row: &Value, filters: &[Filter]) -> bool {
    filters.iter().all(|f| f.matches(row))
}

fn project(row: &Value, columns: &str) -> Value {
    if columns.trim() == "*" {
        return row.clone();
    }
    let mut out = Map::new();
    for column in columns.split(',').map(str::trim) {
        if let Some(value) = row.get(column) {
            out.insert(column.to_string(), value.clone());
        }
    }
    Value::Object(out)
}

fn session_for(user: &AuthUser) -> Session {
    Session::new(
        format!("memory-token-{}", user.id()),
        None,
        Some(3600),
        user.clone(),
    )
}

#[async_trait]
impl Backend for MemoryBackend {
    #[instrument(skip(self, password))]
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthResponse, BackendError> {
        let mut store = self.lock()?;
        let account = store
            .accounts
            .get(&email.to_lowercase())
            .filter(|a| a.password == password)
            .cloned()
            .ok_or_else(|| {
                BackendError::new(BackendErrorKind::Auth, "Invalid login credentials")
            })?;
        store.current = Some(account.user.id().clone());
        debug!(user_id = %account.user.id(), "Signed in");
        Ok(AuthResponse::new(
            account.user.clone(),
            Some(session_for(&account.user)),
        ))
    }

    #[instrument(skip(self, password))]
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<AuthResponse, BackendError> {
        let key = email.to_lowercase();
        let mut store = self.lock()?;
        if store.accounts.contains_key(&key) {
            return Err(BackendError::new(
                BackendErrorKind::Auth,
                "User already registered",
            ));
        }
        if password.len() < 6 {
            return Err(BackendError::new(
                BackendErrorKind::Auth,
                "Password should be at least 6 characters",
            ));
        }
        let metadata = UserMetadata::new(Some(name.to_string()).filter(|n| !n.is_empty()));
        let user = AuthUser::new(uuid::Uuid::new_v4().to_string(), Some(email.to_string()), metadata);
        store.accounts.insert(
            key,
            Account {
                user: user.clone(),
                password: password.to_string(),
            },
        );
        store.current = Some(user.id().clone());
        info!(user_id = %user.id(), "Account created");
        Ok(AuthResponse::new(user.clone(), Some(session_for(&user))))
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        self.lock()?.current = None;
        Ok(())
    }

    #[instrument(skip(self, password))]
    async fn update_password(&self, password: &str) -> Result<AuthUser, BackendError> {
        let mut store = self.lock()?;
        let current = store.current.clone().ok_or_else(BackendError::unauthenticated)?;
        let account = store
            .accounts
            .values_mut()
            .find(|a| a.user.id() == &current)
            .ok_or_else(|| BackendError::not_found("Account no longer exists"))?;
        account.password = password.to_string();
        Ok(account.user.clone())
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), BackendError> {
        let mut store = self.lock()?;
        let before = store.accounts.len();
        store.accounts.retain(|_, a| a.user.id() != user_id);
        if store.accounts.len() == before {
            return Err(BackendError::not_found(format!("No account {}", user_id)));
        }
        if store.current.as_deref() == Some(user_id) {
            store.current = None;
        }
        Ok(())
    }

    async fn select(&self, query: &Query) -> Result<Vec<Value>, BackendError> {
        let store = self.lock()?;
        let mut rows: Vec<Value> = store
            .tables
            .get(query.table())
            .map(|rows| {
                rows.iter()
                    .filter(|row| matches_all(row, query.filters()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = query.order_by() {
            let column = order.column().as_str();
            rows.sort_by(|a, b| {
                let null = Value::Null;
                let ordering = compare_cells(
                    a.get(column).unwrap_or(&null),
                    b.get(column).unwrap_or(&null),
                );
                if *order.ascending() {
                    ordering
                } else {
                    ordering.reverse()
                }
            });
        }
        if let Some(limit) = query.max_rows() {
            rows.truncate(*limit);
        }
        Ok(rows.iter().map(|row| project(row, query.columns())).collect())
    }

    async fn insert(&self, table: Table, rows: Vec<Value>) -> Result<(), BackendError> {
        let mut store = self.lock()?;
        let stored = store.tables.entry(table).or_default();
        stored.extend(rows.into_iter().map(with_defaults));
        Ok(())
    }

    async fn update(
        &self,
        table: Table,
        filters: &[Filter],
        patch: Value,
    ) -> Result<(), BackendError> {
        let mut store = self.lock()?;
        if let Some(rows) = store.tables.get_mut(&table) {
            for row in rows.iter_mut().filter(|row| matches_all(row, filters)) {
                merge(row, &patch);
            }
        }
        Ok(())
    }

    async fn upsert(
        &self,
        table: Table,
        row: Value,
        on_conflict: &str,
    ) -> Result<(), BackendError> {
        let key = row.get(on_conflict).and_then(cell_text).ok_or_else(|| {
            BackendError::new(
                BackendErrorKind::Http(400),
                format!("Upsert row has no {} column", on_conflict),
            )
        })?;
        let mut store = self.lock()?;
        let rows = store.tables.entry(table).or_default();
        let existing = rows
            .iter_mut()
            .find(|r| r.get(on_conflict).and_then(cell_text).as_deref() == Some(key.as_str()));
        match existing {
            Some(existing) => merge(existing, &row),
            None => rows.push(with_defaults(row)),
        }
        Ok(())
    }

    async fn delete(&self, table: Table, filters: &[Filter]) -> Result<(), BackendError> {
        let mut store = self.lock()?;
        if let Some(rows) = store.tables.get_mut(&table) {
            rows.retain(|row| !matches_all(row, filters));
        }
        Ok(())
    }
}
