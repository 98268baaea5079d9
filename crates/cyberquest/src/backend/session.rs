//! Auth session types returned by the backend.

use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// Free-form data attached to an account at sign-up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct UserMetadata {
    #[serde(default)]
    name: Option<String>,
}

/// An authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct AuthUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: UserMetadata,
}

/// Tokens for a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct Session {
    #[serde(skip_serializing)]
    access_token: String,
    #[serde(default, skip_serializing)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
    user: AuthUser,
}

/// Result of a sign-in or sign-up.
///
/// A sign-up that needs email confirmation returns the account without a
/// session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct AuthResponse {
    user: AuthUser,
    session: Option<Session>,
}
