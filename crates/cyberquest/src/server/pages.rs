//! Handlers for the content pages: landing, courses, labs, CTF, roadmap and
//! leaderboard.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use cyberquest_games::Difficulty;
use serde::Deserialize;
use tracing::instrument;

use super::{ApiError, AppState};
use crate::leaderboard::{LEADERBOARD_ERROR, LeaderboardEntry, SortBy, fetch_leaderboard};
use crate::pages::{
    CoursesPage, CtfPage, HomePage, LabsPage, RoadmapPage, courses_page, ctf_page, home_page,
    labs_page, roadmap_page,
};
use crate::{LabCompletion, ModuleCompletion, Profile, RoadmapCompletion, TimeRange};

/// The signed-in viewer's profile, `None` when signed out.
pub(super) async fn viewer_profile(state: &AppState) -> Result<Option<Profile>, ApiError> {
    let Some(user) = state.auth().user() else {
        return Ok(None);
    };
    state
        .progress()
        .ensure_profile(&user)
        .await
        .map(Some)
        .map_err(|e| ApiError::page(e, "Failed to load profile"))
}

/// `GET /`
pub async fn home(State(state): State<AppState>) -> Json<HomePage> {
    Json(home_page(state.auth().user().as_ref()))
}

/// `GET /courses`
#[instrument(skip(state))]
pub async fn courses(State(state): State<AppState>) -> Result<Json<CoursesPage>, ApiError> {
    let profile = viewer_profile(&state).await?;
    Ok(Json(courses_page(profile.as_ref())))
}

/// `POST /courses/{id}/modules/{index}/complete`
#[instrument(skip(state))]
pub async fn complete_module(
    State(state): State<AppState>,
    Path((id, index)): Path<(String, usize)>,
) -> Result<Json<ModuleCompletion>, ApiError> {
    Ok(Json(
        state.progress().complete_course_module(&id, index).await?,
    ))
}

/// `GET /labs`
#[instrument(skip(state))]
pub async fn labs(State(state): State<AppState>) -> Result<Json<LabsPage>, ApiError> {
    let profile = viewer_profile(&state).await?;
    Ok(Json(labs_page(profile.as_ref())))
}

/// `POST /labs/{id}/challenges/{index}/complete`
#[instrument(skip(state))]
pub async fn complete_lab_challenge(
    State(state): State<AppState>,
    Path((id, index)): Path<(String, usize)>,
) -> Result<Json<LabCompletion>, ApiError> {
    Ok(Json(
        state.progress().complete_lab_challenge(&id, index).await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct CtfParams {
    pub category: Option<String>,
}

/// `GET /ctf[?category=<category>]`
pub async fn ctf(Query(params): Query<CtfParams>) -> Json<CtfPage> {
    Json(ctf_page(params.category.as_deref()))
}

#[derive(Debug, Deserialize)]
pub struct RoadmapParams {
    #[serde(default)]
    pub search: String,
    pub difficulty: Option<Difficulty>,
}

/// `GET /roadmap[?search=<term>&difficulty=<level>]`
#[instrument(skip(state))]
pub async fn roadmap(
    State(state): State<AppState>,
    Query(params): Query<RoadmapParams>,
) -> Result<Json<RoadmapPage>, ApiError> {
    let profile = viewer_profile(&state).await?;
    Ok(Json(roadmap_page(
        profile.as_ref(),
        &params.search,
        params.difficulty,
    )))
}

/// `POST /roadmap/{item}/complete`
#[instrument(skip(state))]
pub async fn complete_roadmap_item(
    State(state): State<AppState>,
    Path(item): Path<String>,
) -> Result<Json<RoadmapCompletion>, ApiError> {
    Ok(Json(state.progress().complete_roadmap_item(&item).await?))
}

/// `POST /roadmap/{item}/toggle`: returns whether the item is now done.
#[instrument(skip(state))]
pub async fn toggle_roadmap_item(
    State(state): State<AppState>,
    Path(item): Path<String>,
) -> Result<Json<bool>, ApiError> {
    Ok(Json(state.progress().toggle_roadmap_item(&item).await?))
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
    #[serde(default)]
    pub sort_by: SortBy,
    #[serde(default)]
    pub time_range: TimeRange,
}

/// `GET /leaderboard[?sort_by=<column>&time_range=<range>]`
#[instrument(skip(state))]
pub async fn leaderboard(
    State(state): State<AppState>,
    Query(params): Query<LeaderboardParams>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    fetch_leaderboard(state.backend().as_ref(), params.sort_by, params.time_range)
        .await
        .map(Json)
        .map_err(|e| ApiError::page(e, LEADERBOARD_ERROR))
}
