use axum::routing::post;
use axum::Router;

use crate::handlers::weather;
use crate::state::AppState;

/// ```text
/// POST /weather  -> get_weather
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/weather", post(weather::get_weather))
}
