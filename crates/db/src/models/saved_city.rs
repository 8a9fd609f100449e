//! Saved city models and DTOs.

use serde::{Deserialize, Serialize};
use skycast_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `saved_cities` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SavedCity {
    pub id: DbId,
    pub user_id: DbId,
    pub city_name: String,
    pub country_code: String,
    pub state_code: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub is_default: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting or upserting a saved city.
///
/// The owner is taken from the authenticated caller, never from the body.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSavedCity {
    pub city_name: String,
    pub country_code: String,
    pub state_code: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub is_default: bool,
}
