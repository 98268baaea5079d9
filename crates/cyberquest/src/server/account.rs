//! Handlers for sign-in, the profile page and settings.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use super::{ApiError, AppState};
use crate::pages::{AuthPage, auth_page as build_auth_page};
use crate::{
    AuthUser, ProfileOverview, SettingsUpdate, SettingsView, TimeRange, UserStats,
};

/// `GET /auth`
pub async fn auth_page(State(state): State<AppState>) -> Json<AuthPage> {
    Json(build_auth_page(&state.auth().snapshot()))
}

#[derive(Debug, Deserialize)]
pub struct SignInBody {
    pub email: String,
    pub password: String,
}

/// `POST /auth/sign-in`
#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn sign_in(
    State(state): State<AppState>,
    Json(body): Json<SignInBody>,
) -> Result<Json<AuthUser>, ApiError> {
    let auth = state.auth();
    match auth.sign_in(&body.email, &body.password).await {
        Ok(user) => Ok(Json(user)),
        Err(e) => Err(ApiError::new(
            StatusCode::UNAUTHORIZED,
            auth.error().unwrap_or(e.message),
        )),
    }
}

#[derive(Debug, Deserialize)]
pub struct SignUpBody {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: String,
}

/// `POST /auth/sign-up`
#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn sign_up(
    State(state): State<AppState>,
    Json(body): Json<SignUpBody>,
) -> Result<(StatusCode, Json<AuthPage>), ApiError> {
    let auth = state.auth();
    match auth.sign_up(&body.email, &body.password, &body.name).await {
        Ok(_) => Ok((
            StatusCode::CREATED,
            Json(build_auth_page(&auth.snapshot())),
        )),
        Err(e) => Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            auth.error().unwrap_or(e.message),
        )),
    }
}

/// `POST /auth/sign-out`
#[instrument(skip(state))]
pub async fn sign_out(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.auth().sign_out().await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct ProfileParams {
    pub range: Option<TimeRange>,
}

/// `GET /profile[?range=<range>]`
#[instrument(skip(state))]
pub async fn profile(
    State(state): State<AppState>,
    Query(params): Query<ProfileParams>,
) -> Result<Json<ProfileOverview>, ApiError> {
    state
        .progress()
        .profile_overview(params.range.unwrap_or(TimeRange::Week))
        .await
        .map(Json)
        .map_err(|e| ApiError::page(e, "Failed to load profile"))
}

/// `GET /profile/stats`
#[instrument(skip(state))]
pub async fn stats(State(state): State<AppState>) -> Result<Json<UserStats>, ApiError> {
    state
        .progress()
        .fetch_user_stats()
        .await
        .map(Json)
        .map_err(|e| ApiError::page(e, "Failed to load stats"))
}

/// `GET /settings`
#[instrument(skip(state))]
pub async fn settings(State(state): State<AppState>) -> Result<Json<SettingsView>, ApiError> {
    state
        .progress()
        .settings()
        .await
        .map(Json)
        .map_err(|e| ApiError::page(e, "Failed to load settings"))
}

/// `PUT /settings`
#[instrument(skip(state, body))]
pub async fn save_settings(
    State(state): State<AppState>,
    Json(body): Json<SettingsUpdate>,
) -> Result<StatusCode, ApiError> {
    state
        .progress()
        .save_settings(&body)
        .await
        .map_err(|e| ApiError::page(e, "Failed to save settings"))?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct PasswordBody {
    pub password: String,
}

/// `POST /settings/password`
#[instrument(skip(state, body))]
pub async fn change_password(
    State(state): State<AppState>,
    Json(body): Json<PasswordBody>,
) -> Result<StatusCode, ApiError> {
    state
        .progress()
        .change_password(&body.password)
        .await
        .map_err(|e| ApiError::page(e, "Failed to update password"))?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /settings/account`
#[instrument(skip(state))]
pub async fn delete_account(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state
        .progress()
        .delete_account()
        .await
        .map_err(|e| ApiError::page(e, "Failed to delete account"))?;
    Ok(StatusCode::NO_CONTENT)
}
