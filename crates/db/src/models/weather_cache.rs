//! Cached weather lookups (`weather_cache` table).

use serde::Serialize;
use skycast_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `weather_cache` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WeatherCacheEntry {
    pub id: DbId,
    /// Normalised lookup key, e.g. `city:london` or `coord:51.51,-0.13`.
    pub city_id: String,
    pub cache_type: String,
    pub weather_data: serde_json::Value,
    pub forecast_data: Option<serde_json::Value>,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}

/// DTO for writing a cache entry.
#[derive(Debug, Clone)]
pub struct UpsertWeatherCache {
    pub city_id: String,
    pub cache_type: String,
    pub weather_data: serde_json::Value,
    pub forecast_data: Option<serde_json::Value>,
    pub expires_at: Timestamp,
}
