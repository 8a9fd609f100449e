use axum::routing::post;
use axum::Router;

use crate::handlers::assistant;
use crate::state::AppState;

/// ```text
/// POST /weather-assistant  -> ask
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/weather-assistant", post(assistant::ask))
}
