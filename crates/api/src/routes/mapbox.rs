use axum::routing::post;
use axum::Router;

use crate::handlers::mapbox;
use crate::state::AppState;

/// ```text
/// POST /get-mapbox-token  -> get_token
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/get-mapbox-token", post(mapbox::get_token))
}
