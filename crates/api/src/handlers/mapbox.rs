//! Handler for `POST /get-mapbox-token`.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /api/get-mapbox-token
///
/// Hand the public Mapbox access token to the map widget.
pub async fn get_token(State(state): State<AppState>) -> AppResult<Json<TokenResponse>> {
    let token = state
        .config
        .mapbox_access_token
        .clone()
        .ok_or_else(|| AppError::NotConfigured("Mapbox token not configured".into()))?;
    Ok(Json(TokenResponse { token }))
}
