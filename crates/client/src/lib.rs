//! HTTP client for the SkyCast API.
//!
//! [`DatabaseClient`] keeps the signed-in session, broadcasts auth state
//! changes and hands out [`TableQuery`] builders for the `/api/db` tables.

pub mod client;
pub mod error;
pub mod query;
pub mod session;

pub use client::{DatabaseClient, ProfileUpdate, SignUpOptions};
pub use error::ClientError;
pub use query::TableQuery;
pub use session::{AuthEvent, AuthState, Session, User};
