pub mod assistant;
pub mod auth;
pub mod health;
pub mod mapbox;
pub mod tables;
pub mod weather;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup                     signup (POST)
/// /auth/signin                     signin (POST)
/// /auth/me                         current user (GET, auth)
/// /auth/update                     edit profile (PUT, auth)
///
/// /weather                         weather report (POST)
/// /weather-assistant               assistant reply (POST)
/// /get-mapbox-token                map token (POST)
///
/// /db/{table}                      list (GET), insert (POST), upsert (PUT); auth
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .merge(weather::router())
        .merge(assistant::router())
        .merge(mapbox::router())
        .nest("/db", tables::router())
}
