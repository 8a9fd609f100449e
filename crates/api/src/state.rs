use std::sync::Arc;

use skycast_weather::WeatherProvider;

use crate::config::ServerConfig;

/// Handed to every handler through `State<AppState>`; clones share the pool,
/// config and provider.
#[derive(Clone)]
pub struct AppState {
    pub pool: skycast_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// OpenWeather in production, a stub in tests.
    pub weather: Arc<dyn WeatherProvider>,
}
