//! The signed-in session and its change feed.

use std::sync::Arc;

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use strum::Display;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::{AuthResponse, AuthUser, Backend, BackendError, ProgressService, Session};

const EVENT_CAPACITY: usize = 32;

/// An auth-state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthEvent {
    /// A session was established.
    SignedIn,
    /// The session ended.
    SignedOut,
    /// The account changed, e.g. a new password.
    UserUpdated,
}

/// An event together with the user it concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct AuthChange {
    event: AuthEvent,
    user: Option<AuthUser>,
}

/// Snapshot of the auth context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Getters)]
pub struct AuthState {
    session: Option<Session>,
    user: Option<AuthUser>,
    loading: bool,
    /// Message for the inline error banner.
    error: Option<String>,
}

/// Wraps the backend session: sign-in, sign-up, sign-out and the current
/// user.
///
/// Every state change is published on a watch channel and every transition
/// on a broadcast channel. Clones share state.
#[derive(Debug, Clone)]
pub struct AuthContext {
    backend: Arc<dyn Backend>,
    state: Arc<watch::Sender<AuthState>>,
    events: broadcast::Sender<AuthChange>,
}

impl AuthContext {
    /// Creates a signed-out context.
    #[instrument(skip(backend))]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        info!("Creating auth context");
        let (state, _) = watch::channel(AuthState::default());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            backend,
            state: Arc::new(state),
            events,
        }
    }

    /// Current state.
    pub fn snapshot(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Current session, if signed in.
    pub fn session(&self) -> Option<Session> {
        self.state.borrow().session.clone()
    }

    /// Current user, if signed in.
    pub fn user(&self) -> Option<AuthUser> {
        self.state.borrow().user.clone()
    }

    /// Last auth failure message.
    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    /// Whether an auth call is in flight.
    pub fn loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// The signed-in user or an unauthenticated error.
    pub fn require_user(&self) -> Result<AuthUser, BackendError> {
        self.user().ok_or_else(BackendError::unauthenticated)
    }

    /// Receives every transition from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<AuthChange> {
        self.events.subscribe()
    }

    /// Observes the state.
    pub fn watch(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    fn begin(&self) {
        self.state.send_modify(|s| {
            s.error = None;
            s.loading = true;
        });
    }

    fn fail(&self, err: &BackendError, fallback: &str) {
        let message = if err.message.trim().is_empty() {
            fallback.to_string()
        } else {
            err.message.clone()
        };
        warn!(error = %err, "Auth call failed");
        self.state.send_modify(|s| {
            s.error = Some(message);
            s.loading = false;
        });
    }

    fn publish(&self, event: AuthEvent, user: Option<AuthUser>) {
        // No receivers is fine; the state channel still carries the change.
        let receivers = self
            .events
            .send(AuthChange { event, user })
            .unwrap_or(0);
        debug!(%event, receivers, "Auth event published");
    }

    fn establish(&self, response: &AuthResponse) {
        let session = response.session().clone();
        let signed_in = session.is_some();
        self.state.send_modify(|s| {
            if signed_in {
                s.user = Some(response.user().clone());
                s.session = session;
            }
            s.loading = false;
        });
        if signed_in {
            self.publish(AuthEvent::SignedIn, Some(response.user().clone()));
        }
    }

    /// Password sign-in.
    ///
    /// # Errors
    ///
    /// Returns the backend error after recording its message on the state.
    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, BackendError> {
        self.begin();
        match self.backend.sign_in(email, password).await {
            Ok(response) => {
                self.establish(&response);
                info!(user_id = %response.user().id(), "Signed in");
                Ok(response.user().clone())
            }
            Err(err) => {
                self.fail(&err, "An error occurred during sign in");
                Err(err)
            }
        }
    }

    /// Creates an account. The user is signed in straight away unless the
    /// backend wants the email confirmed first.
    ///
    /// # Errors
    ///
    /// Returns the backend error after recording its message on the state.
    #[instrument(skip(self, password))]
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<AuthUser, BackendError> {
        self.begin();
        match self.backend.sign_up(email, password, name).await {
            Ok(response) => {
                self.establish(&response);
                info!(
                    user_id = %response.user().id(),
                    signed_in = response.session().is_some(),
                    "Signed up"
                );
                Ok(response.user().clone())
            }
            Err(err) => {
                self.fail(&err, "An error occurred during sign up");
                Err(err)
            }
        }
    }

    /// Ends the session.
    ///
    /// # Errors
    ///
    /// Returns the backend error after recording its message on the state.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) -> Result<(), BackendError> {
        self.begin();
        match self.backend.sign_out().await {
            Ok(()) => {
                let user = self.user();
                self.state.send_modify(|s| {
                    s.session = None;
                    s.user = None;
                    s.loading = false;
                });
                self.publish(AuthEvent::SignedOut, user);
                info!("Signed out");
                Ok(())
            }
            Err(err) => {
                self.fail(&err, "An error occurred during sign out");
                Err(err)
            }
        }
    }

    /// Changes the signed-in user's password.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when signed out or when the backend refuses.
    #[instrument(skip(self, password))]
    pub async fn update_password(&self, password: &str) -> Result<(), BackendError> {
        self.require_user()?;
        let user = self.backend.update_password(password).await?;
        self.state.send_modify(|s| s.user = Some(user.clone()));
        self.publish(AuthEvent::UserUpdated, Some(user));
        Ok(())
    }
}

/// Spawns the listener that makes sure a profile and progress row exist for
/// every user who signs in or is updated.
///
/// Failures are logged. The task holds a clone of the context through
/// `progress`, so it runs until the handle is aborted or the runtime stops.
#[instrument(skip_all)]
pub fn spawn_profile_bootstrap(auth: &AuthContext, progress: ProgressService) -> JoinHandle<()> {
    let mut events = auth.subscribe();
    info!("Profile bootstrap listening");
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(change) => {
                    let Some(user) = change.user else { continue };
                    if !matches!(change.event, AuthEvent::SignedIn | AuthEvent::UserUpdated) {
                        continue;
                    }
                    if let Err(e) = progress.ensure_profile(&user).await {
                        error!(user_id = %user.id(), error = %e, "Error ensuring user profile");
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Profile bootstrap lagged behind auth events");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!("Auth events closed, stopping profile bootstrap");
                    break;
                }
            }
        }
    })
}
