//! Session and auth-state types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Public user profile as returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// A signed-in session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    /// UTC Unix timestamp in seconds.
    pub expires_at: i64,
    pub user: User,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now.timestamp()
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// What last changed the auth state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    /// The state the client was created with.
    InitialSession,
    SignedIn,
    SignedOut,
    UserUpdated,
}

/// Latest auth state, as seen by [`DatabaseClient::subscribe`](crate::DatabaseClient::subscribe).
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub event: AuthEvent,
    pub session: Option<Session>,
}
