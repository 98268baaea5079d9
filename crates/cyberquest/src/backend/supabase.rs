//! REST client for a hosted Supabase project.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, Url};
use serde_json::{Value, json};
use tracing::{debug, info, instrument, warn};

use super::{
    AuthResponse, AuthUser, Backend, BackendError, BackendErrorKind, Filter, Query, Session, Table,
};
use crate::AppConfig;

/// Talks to `{url}/auth/v1` and `{url}/rest/v1`.
///
/// Requests carry the project key as `apikey` and, once signed in, the
/// session's access token as the bearer. Clones share the session.
#[derive(Debug, Clone)]
pub struct SupabaseBackend {
    client: reqwest::Client,
    url: String,
    anon_key: String,
    access_token: Arc<RwLock<Option<String>>>,
}

impl SupabaseBackend {
    /// Creates a client for the project in `config`.
    #[instrument(skip(config), fields(url = %config.supabase_url()))]
    pub fn new(config: &AppConfig) -> Self {
        info!("Creating Supabase client");
        Self {
            client: reqwest::Client::new(),
            url: config.supabase_url().trim_end_matches('/').to_string(),
            anon_key: config.supabase_anon_key().clone(),
            access_token: Arc::new(RwLock::new(None)),
        }
    }

    fn endpoint(&self, path: &str, params: &[(String, String)]) -> Result<Url, BackendError> {
        let raw = format!("{}{}", self.url, path);
        Url::parse_with_params(&raw, params).map_err(|e| {
            BackendError::new(
                BackendErrorKind::Transport,
                format!("Invalid backend URL {}: {}", raw, e),
            )
        })
    }

    fn bearer(&self) -> String {
        self.access_token
            .read()
            .ok()
            .and_then(|token| token.clone())
            .unwrap_or_else(|| self.anon_key.clone())
    }

    fn set_token(&self, token: Option<String>) {
        match self.access_token.write() {
            Ok(mut slot) => *slot = token,
            Err(e) => warn!(error = %e, "Session token lock poisoned"),
        }
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
    }

    fn table_path(table: Table) -> String {
        format!("/rest/v1/{}", table)
    }

    fn filter_params(filters: &[Filter]) -> Vec<(String, String)> {
        filters.iter().map(Filter::to_param).collect()
    }

    /// Fails on non-success statuses, pulling the message out of the body.
    async fn check(response: Response) -> Result<Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| {
                ["message", "msg", "error_description", "error"]
                    .iter()
                    .find_map(|key| v.get(*key).and_then(Value::as_str).map(str::to_string))
            })
            .unwrap_or(body);
        warn!(status = status.as_u16(), message = %message, "Backend request failed");

        let kind = match status.as_u16() {
            400 | 422 if message.to_lowercase().contains("credentials") => BackendErrorKind::Auth,
            401 => BackendErrorKind::Unauthenticated,
            403 => BackendErrorKind::Forbidden,
            404 => BackendErrorKind::NotFound,
            code => BackendErrorKind::Http(code),
        };
        Err(BackendError::new(kind, message))
    }

    /// Reads a sign-in or sign-up body. Sign-ups awaiting email confirmation
    /// return a bare user instead of a session.
    fn parse_auth(body: Value) -> Result<AuthResponse, BackendError> {
        if body.get("access_token").is_some() {
            let session: Session = serde_json::from_value(body)?;
            return Ok(AuthResponse::new(session.user().clone(), Some(session)));
        }
        let user = body.get("user").cloned().unwrap_or(body);
        let user: AuthUser = serde_json::from_value(user)?;
        Ok(AuthResponse::new(user, None))
    }

    fn remember(&self, response: &AuthResponse) {
        if let Some(session) = response.session() {
            self.set_token(Some(session.access_token().clone()));
        }
    }
}

#[async_trait]
impl Backend for SupabaseBackend {
    #[instrument(skip(self, password))]
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthResponse, BackendError> {
        let url = self.endpoint(
            "/auth/v1/token",
            &[("grant_type".to_string(), "password".to_string())],
        )?;
        let response = self
            .request(Method::POST, url)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let body: Value = Self::check(response).await?.json().await?;
        let auth = Self::parse_auth(body)?;
        self.remember(&auth);
        info!(user_id = %auth.user().id(), "Signed in");
        Ok(auth)
    }

    #[instrument(skip(self, password))]
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<AuthResponse, BackendError> {
        let url = self.endpoint("/auth/v1/signup", &[])?;
        let response = self
            .request(Method::POST, url)
            .json(&json!({ "email": email, "password": password, "data": { "name": name } }))
            .send()
            .await?;
        let body: Value = Self::check(response).await?.json().await?;
        let auth = Self::parse_auth(body)?;
        self.remember(&auth);
        info!(
            user_id = %auth.user().id(),
            confirmed = auth.session().is_some(),
            "Signed up"
        );
        Ok(auth)
    }

    #[instrument(skip(self))]
    async fn sign_out(&self) -> Result<(), BackendError> {
        let url = self.endpoint("/auth/v1/logout", &[])?;
        let response = self.request(Method::POST, url).send().await?;
        self.set_token(None);
        Self::check(response).await?;
        info!("Signed out");
        Ok(())
    }

    #[instrument(skip(self, password))]
    async fn update_password(&self, password: &str) -> Result<AuthUser, BackendError> {
        let url = self.endpoint("/auth/v1/user", &[])?;
        let response = self
            .request(Method::PUT, url)
            .json(&json!({ "password": password }))
            .send()
            .await?;
        let user: AuthUser = Self::check(response).await?.json().await?;
        info!(user_id = %user.id(), "Password updated");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, user_id: &str) -> Result<(), BackendError> {
        let url = self.endpoint(&format!("/auth/v1/admin/users/{}", user_id), &[])?;
        let response = self.request(Method::DELETE, url).send().await?;
        Self::check(response).await?;
        info!("User deleted");
        Ok(())
    }

    #[instrument(skip(self), fields(table = %query.table()))]
    async fn select(&self, query: &Query) -> Result<Vec<Value>, BackendError> {
        let url = self.endpoint(&Self::table_path(*query.table()), &query.to_params())?;
        let response = self.request(Method::GET, url).send().await?;
        let rows: Vec<Value> = Self::check(response).await?.json().await?;
        debug!(count = rows.len(), "Selected rows");
        Ok(rows)
    }

    #[instrument(skip(self, rows), fields(count = rows.len()))]
    async fn insert(&self, table: Table, rows: Vec<Value>) -> Result<(), BackendError> {
        let url = self.endpoint(&Self::table_path(table), &[])?;
        let response = self
            .request(Method::POST, url)
            .header("Prefer", "return=minimal")
            .json(&rows)
            .send()
            .await?;
        Self::check(response).await?;
        debug!("Inserted rows");
        Ok(())
    }

    #[instrument(skip(self, patch))]
    async fn update(
        &self,
        table: Table,
        filters: &[Filter],
        patch: Value,
    ) -> Result<(), BackendError> {
        let url = self.endpoint(&Self::table_path(table), &Self::filter_params(filters))?;
        let response = self
            .request(Method::PATCH, url)
            .header("Prefer", "return=minimal")
            .json(&patch)
            .send()
            .await?;
        Self::check(response).await?;
        debug!("Updated rows");
        Ok(())
    }

    #[instrument(skip(self, row))]
    async fn upsert(
        &self,
        table: Table,
        row: Value,
        on_conflict: &str,
    ) -> Result<(), BackendError> {
        let url = self.endpoint(
            &Self::table_path(table),
            &[("on_conflict".to_string(), on_conflict.to_string())],
        )?;
        let response = self
            .request(Method::POST, url)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&vec![row])
            .send()
            .await?;
        Self::check(response).await?;
        debug!("Upserted row");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, table: Table, filters: &[Filter]) -> Result<(), BackendError> {
        let url = self.endpoint(&Self::table_path(table), &Self::filter_params(filters))?;
        let response = self.request(Method::DELETE, url).send().await?;
        Self::check(response).await?;
        debug!("Deleted rows");
        Ok(())
    }
}
