//! Handlers for the `/auth` resource (signup, signin, me, update).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use skycast_core::error::CoreError;
use skycast_core::validation::{non_blank, normalize_email, validate_email};
use skycast_db::models::user::{CreateUser, UpdateProfile, UserResponse};
use skycast_db::repositories::UserRepo;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

const DUPLICATE_EMAIL: &str = "User already exists";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signup`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignupRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

/// Response body for `POST /auth/signup`.
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub message: &'static str,
    pub user: UserResponse,
}

/// Request body for `POST /auth/signin`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SigninRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// The bearer session handed to clients.
#[derive(Debug, Serialize)]
pub struct Session {
    pub access_token: String,
    /// UTC Unix timestamp in seconds.
    pub expires_at: i64,
    pub user: UserResponse,
}

/// Response body for `POST /auth/signin`.
#[derive(Debug, Serialize)]
pub struct SigninResponse {
    pub user: UserResponse,
    /// Same value as `session.access_token`.
    pub token: String,
    pub session: Session,
}

/// Response body for `GET /auth/me` and `PUT /auth/update`.
#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/signup
///
/// Register a new account with the default `user` role.
pub async fn signup(
    State(state): State<AppState>,
    AppJson(input): AppJson<SignupRequest>,
) -> AppResult<(StatusCode, Json<SignupResponse>)> {
    let (Some(email), Some(password), Some(full_name)) = (
        non_blank(input.email.as_deref()),
        input.password.as_deref().filter(|p| !p.is_empty()),
        non_blank(input.full_name.as_deref()),
    ) else {
        return Err(AppError::BadRequest(
            "Email, password and full name are required".into(),
        ));
    };

    let email = normalize_email(email);
    validate_email(&email)?;
    validate_password_strength(password, state.config.password_min_length)
        .map_err(AppError::BadRequest)?;

    if UserRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::BadRequest(DUPLICATE_EMAIL.into()));
    }

    let password_hash = hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let input = CreateUser {
        email,
        password_hash,
        full_name: full_name.to_string(),
        phone: non_blank(input.phone.as_deref()).map(str::to_string),
    };

    // A concurrent signup can still win the race past the lookup above.
    let user = UserRepo::create(&state.pool, &input)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.constraint() == Some("uq_users_email") => {
                AppError::BadRequest(DUPLICATE_EMAIL.into())
            }
            _ => AppError::Database(e),
        })?;

    tracing::info!(user_id = user.id, "User signed up");

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User created",
            user: UserResponse::from(&user),
        }),
    ))
}

/// POST /api/auth/signin
///
/// Authenticate with e-mail + password and issue an access token.
pub async fn signin(
    State(state): State<AppState>,
    AppJson(input): AppJson<SigninRequest>,
) -> AppResult<Json<SigninResponse>> {
    let (Some(email), Some(password)) = (
        non_blank(input.email.as_deref()),
        input.password.as_deref().filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::BadRequest(
            "Email and password are required".into(),
        ));
    };

    let user = UserRepo::find_by_email(&state.pool, &normalize_email(email))
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into())))?;

    let password_valid = verify_password(password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        tracing::debug!(user_id = user.id, "Sign-in rejected: wrong password");
        return Err(AppError::Core(CoreError::Unauthorized(
            INVALID_CREDENTIALS.into(),
        )));
    }

    let issued = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, "User signed in");

    let user = UserResponse::from(&user);
    Ok(Json(SigninResponse {
        user: user.clone(),
        token: issued.token.clone(),
        session: Session {
            access_token: issued.token,
            expires_at: issued.expires_at,
            user,
        },
    }))
}

/// GET /api/auth/me
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<UserEnvelope>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        })?;

    Ok(Json(UserEnvelope {
        user: UserResponse::from(&user),
    }))
}

/// PUT /api/auth/update
///
/// Edit the caller's profile. Omitted fields are left unchanged; a blank
/// `full_name` is rejected.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(input): AppJson<UpdateProfile>,
) -> AppResult<Json<UserEnvelope>> {
    if input.full_name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::BadRequest("Full name cannot be blank".into()));
    }

    let input = UpdateProfile {
        full_name: input.full_name.map(|n| n.trim().to_string()),
        phone: input.phone.map(|p| p.trim().to_string()),
    };

    let user = UserRepo::update_profile(&state.pool, auth.user_id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        })?;

    tracing::info!(user_id = user.id, "Profile updated");

    Ok(Json(UserEnvelope {
        user: UserResponse::from(&user),
    }))
}
