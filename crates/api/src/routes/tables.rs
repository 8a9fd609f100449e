//! Route definitions for the `/db` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::tables;
use crate::state::AppState;

/// Routes mounted at `/db`. All require auth.
///
/// ```text
/// GET  /{table}  -> list
/// POST /{table}  -> insert
/// PUT  /{table}  -> upsert
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{table}",
        get(tables::list).post(tables::insert).put(tables::upsert),
    )
}
