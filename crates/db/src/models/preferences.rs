//! Per-user dashboard preferences.

use serde::{Deserialize, Serialize};
use skycast_core::types::{DbId, Timestamp};
use sqlx::FromRow;

pub const DEFAULT_THEME: &str = "system";
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_TEMPERATURE_UNIT: &str = "celsius";
pub const DEFAULT_WIND_SPEED_UNIT: &str = "kmh";

/// A row from the `user_preferences` table. One per user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserPreferences {
    pub id: DbId,
    pub user_id: DbId,
    pub theme: String,
    pub language: String,
    pub temperature_unit: String,
    pub wind_speed_unit: String,
    pub notifications_enabled: bool,
    pub daily_forecast_push: bool,
    pub severe_weather_alerts: bool,
    pub default_city_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting or upserting preferences.
///
/// Omitted fields take the column default on insert and keep their stored
/// value on upsert.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpsertPreferences {
    pub theme: Option<String>,
    pub language: Option<String>,
    pub temperature_unit: Option<String>,
    pub wind_speed_unit: Option<String>,
    pub notifications_enabled: Option<bool>,
    pub daily_forecast_push: Option<bool>,
    pub severe_weather_alerts: Option<bool>,
    pub default_city_id: Option<DbId>,
}
