//! Handlers for `/quick-game` and `/quick-test` sessions.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use cyberquest_games::GameKind;
use serde::Deserialize;
use tracing::instrument;

use super::{ApiError, AppState};
use crate::pages::{QuickGamePage, QuickTestSetup, quick_game_page, quick_test_setup};
use crate::quiz::QuizFilter;
use crate::{
    FinishSummary, FlipResult, InputResult, PlayView, QuizAnswerResult, StartGame, SubmitResult,
};

#[derive(Debug, Deserialize)]
pub struct PickerParams {
    pub game: Option<GameKind>,
}

/// `GET /quick-game[?game=<id>]`
pub async fn picker(Query(params): Query<PickerParams>) -> Json<QuickGamePage> {
    Json(quick_game_page(params.game))
}

/// `POST /quick-game`, body: `{"game":"memory","memory_difficulty":"hard"}`
#[instrument(skip(state))]
pub async fn start_game(
    State(state): State<AppState>,
    Json(options): Json<StartGame>,
) -> Result<(StatusCode, Json<PlayView>), ApiError> {
    let view = state.play().start_game(options, Utc::now())?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// `GET /quick-game/{id}` and `GET /quick-test/{id}`
pub async fn view(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PlayView>, ApiError> {
    Ok(Json(state.play().view(&id, Utc::now())?))
}

/// `DELETE /quick-game/{id}`
#[instrument(skip(state))]
pub async fn abandon(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.play().abandon(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct SubmitBody {
    pub input: String,
}

/// `POST /quick-game/{id}/submit`
#[instrument(skip(state, body))]
pub async fn submit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<SubmitBody>,
) -> Result<Json<SubmitResult>, ApiError> {
    Ok(Json(state.play().submit(&id, &body.input, Utc::now())?))
}

/// `POST /quick-game/{id}/advance`
#[instrument(skip(state))]
pub async fn advance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PlayView>, ApiError> {
    Ok(Json(state.play().advance(&id, Utc::now())?))
}

/// `POST /quick-game/{id}/retry`
#[instrument(skip(state))]
pub async fn retry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PlayView>, ApiError> {
    Ok(Json(state.play().retry(&id, Utc::now())?))
}

#[derive(Debug, Deserialize)]
pub struct FlipBody {
    pub index: usize,
}

/// `POST /quick-game/{id}/flip`
#[instrument(skip(state))]
pub async fn flip(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<FlipBody>,
) -> Result<Json<FlipResult>, ApiError> {
    Ok(Json(state.play().flip(&id, body.index, Utc::now())?))
}

/// `POST /quick-game/{id}/hide`
pub async fn hide(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PlayView>, ApiError> {
    Ok(Json(state.play().hide(&id, Utc::now())?))
}

#[derive(Debug, Deserialize)]
pub struct InputBody {
    pub text: String,
}

/// `POST /quick-game/{id}/input`
#[instrument(skip(state, body))]
pub async fn input(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<InputBody>,
) -> Result<Json<InputResult>, ApiError> {
    Ok(Json(state.play().input(&id, &body.text, Utc::now())?))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub term: String,
}

/// `GET /quick-game/{id}/search?term=<term>`: matching log line indices.
pub async fn search(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<usize>>, ApiError> {
    Ok(Json(state.play().search_logs(&id, &params.term)?))
}

/// `POST /quick-game/{id}/finish` and `POST /quick-test/{id}/finish`
#[instrument(skip(state))]
pub async fn finish(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FinishSummary>, ApiError> {
    Ok(Json(state.play().finish(&id, Utc::now()).await?))
}

/// `GET /quick-test`
pub async fn quiz_setup() -> Json<QuickTestSetup> {
    Json(quick_test_setup())
}

/// `POST /quick-test`, body: `{"category":"Web Security","difficulty":"beginner"}`
#[instrument(skip(state))]
pub async fn start_quiz(
    State(state): State<AppState>,
    Json(filter): Json<QuizFilter>,
) -> Result<(StatusCode, Json<PlayView>), ApiError> {
    let view = state.play().start_quiz(filter, Utc::now())?;
    Ok((StatusCode::CREATED, Json(view)))
}

#[derive(Debug, Deserialize)]
pub struct AnswerBody {
    pub option: usize,
}

/// `POST /quick-test/{id}/answer`
#[instrument(skip(state))]
pub async fn answer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<AnswerBody>,
) -> Result<Json<QuizAnswerResult>, ApiError> {
    Ok(Json(
        state.play().answer_quiz(&id, body.option, Utc::now()).await?,
    ))
}
