//! HTTP JSON API.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/` | Landing page |
//! | `GET`  | `/courses` | Catalog with the viewer's progress |
//! | `POST` | `/courses/{id}/modules/{index}/complete` | |
//! | `GET`  | `/leaderboard` | `?sort_by=points\|quiz_score\|total_quizzes_taken&time_range=all\|week\|month` |
//! | `GET`  | `/labs` | |
//! | `POST` | `/labs/{id}/challenges/{index}/complete` | |
//! | `GET`  | `/ctf` | `?category=` |
//! | `GET`  | `/auth` | Auth state and last error |
//! | `POST` | `/auth/sign-in`, `/auth/sign-up`, `/auth/sign-out` | |
//! | `GET`  | `/quick-game` | Game picker, `?game=` |
//! | `POST` | `/quick-game` | Start a game |
//! | `GET`  | `/quick-game/{id}` | Session view |
//! | `POST` | `/quick-game/{id}/{submit,advance,retry,flip,hide,input,finish}` | |
//! | `GET`  | `/quick-game/{id}/search` | `?term=` |
//! | `DELETE` | `/quick-game/{id}` | Abandon |
//! | `GET`  | `/quick-test` | Setup options |
//! | `POST` | `/quick-test` | Start a quiz |
//! | `POST` | `/quick-test/{id}/answer`, `/quick-test/{id}/finish` | |
//! | `GET`  | `/roadmap` | `?search=&difficulty=` |
//! | `POST` | `/roadmap/{item}/complete`, `/roadmap/{item}/toggle` | |
//! | `GET`  | `/profile` | `?range=all\|week\|month`, default week |
//! | `GET`  | `/profile/stats` | |
//! | `GET`/`PUT` | `/settings` | |
//! | `POST` | `/settings/password` | |
//! | `DELETE` | `/settings/account` | |
//!
//! The service serves one user per process. Every client shares a single
//! [`AuthContext`](crate::AuthContext) and backend bearer token, so a
//! sign-in from any client signs in all of them. Run a process per user.

mod account;
mod error;
mod pages;
mod play;

pub use error::ApiError;

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post},
};
use derive_getters::Getters;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

use crate::{AuthContext, Backend, PlayManager, ProgressService};

/// Shared state handed to every handler.
#[derive(Debug, Clone, Getters)]
pub struct AppState {
    backend: Arc<dyn Backend>,
    auth: AuthContext,
    progress: ProgressService,
    play: PlayManager,
}

impl AppState {
    /// Wires the auth context, progress service and play manager over
    /// `backend`.
    #[instrument(skip_all)]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        let auth = AuthContext::new(backend.clone());
        let progress = ProgressService::new(backend.clone(), auth.clone());
        let play = PlayManager::new(progress.clone());
        Self::from_parts(backend, auth, progress, play)
    }

    /// Assembles state from existing parts.
    pub fn from_parts(
        backend: Arc<dyn Backend>,
        auth: AuthContext,
        progress: ProgressService,
        play: PlayManager,
    ) -> Self {
        info!("Application state ready");
        Self {
            backend,
            auth,
            progress,
            play,
        }
    }
}

/// Builds the router for `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::home))
        .route("/courses", get(pages::courses))
        .route(
            "/courses/{id}/modules/{index}/complete",
            post(pages::complete_module),
        )
        .route("/leaderboard", get(pages::leaderboard))
        .route("/labs", get(pages::labs))
        .route(
            "/labs/{id}/challenges/{index}/complete",
            post(pages::complete_lab_challenge),
        )
        .route("/ctf", get(pages::ctf))
        .route("/roadmap", get(pages::roadmap))
        .route("/roadmap/{item}/complete", post(pages::complete_roadmap_item))
        .route("/roadmap/{item}/toggle", post(pages::toggle_roadmap_item))
        // Account
        .route("/auth", get(account::auth_page))
        .route("/auth/sign-in", post(account::sign_in))
        .route("/auth/sign-up", post(account::sign_up))
        .route("/auth/sign-out", post(account::sign_out))
        .route("/profile", get(account::profile))
        .route("/profile/stats", get(account::stats))
        .route("/settings", get(account::settings).put(account::save_settings))
        .route("/settings/password", post(account::change_password))
        .route("/settings/account", delete(account::delete_account))
        // Games
        .route("/quick-game", get(play::picker).post(play::start_game))
        .route("/quick-game/{id}", get(play::view).delete(play::abandon))
        .route("/quick-game/{id}/submit", post(play::submit))
        .route("/quick-game/{id}/advance", post(play::advance))
        .route("/quick-game/{id}/retry", post(play::retry))
        .route("/quick-game/{id}/flip", post(play::flip))
        .route("/quick-game/{id}/hide", post(play::hide))
        .route("/quick-game/{id}/input", post(play::input))
        .route("/quick-game/{id}/search", get(play::search))
        .route("/quick-game/{id}/finish", post(play::finish))
        // Quiz
        .route("/quick-test", get(play::quiz_setup).post(play::start_quiz))
        .route("/quick-test/{id}", get(play::view))
        .route("/quick-test/{id}/answer", post(play::answer))
        .route("/quick-test/{id}/finish", post(play::finish))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
