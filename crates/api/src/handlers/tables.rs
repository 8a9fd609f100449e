//! Handlers for `/db/{table}`, the REST surface behind the client's
//! `TableQuery` builder.
//!
//! Only user-owned tables are exposed. Every read and write is scoped to the
//! authenticated caller; the owner is never taken from the request.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use skycast_core::error::CoreError;
use skycast_core::query::QueryOptions;
use skycast_core::types::DbId;
use skycast_core::validation::{non_blank, validate_choice};
use skycast_db::filters::{TableColumns, TypedQuery, OWNER_COLUMN};
use skycast_db::models::preferences::UpsertPreferences;
use skycast_db::models::saved_city::CreateSavedCity;
use skycast_db::repositories::{PreferencesRepo, SavedCityRepo};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

const THEMES: &[&str] = &["light", "dark", "system"];
const TEMPERATURE_UNITS: &[&str] = &["celsius", "fahrenheit"];
const WIND_SPEED_UNITS: &[&str] = &["kmh", "mph", "ms"];

/// Tables reachable through `/db/{table}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Table {
    SavedCities,
    UserPreferences,
}

impl Table {
    fn parse(name: &str) -> AppResult<Self> {
        match name {
            "saved_cities" => Ok(Self::SavedCities),
            "user_preferences" => Ok(Self::UserPreferences),
            other => Err(AppError::NotFound(format!("Unknown table '{other}'"))),
        }
    }

    fn columns(self) -> &'static TableColumns {
        match self {
            Self::SavedCities => &SavedCityRepo::TABLE,
            Self::UserPreferences => &PreferencesRepo::TABLE,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/db/{table}
///
/// Query-string keys other than `select`, `orderBy`, `order` and `limit` are
/// equality filters. Always answers with an array.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(table): AppPath<String>,
    AppQuery(params): AppQuery<Vec<(String, String)>>,
) -> AppResult<Json<Vec<Value>>> {
    let table = Table::parse(&table)?;
    let options = QueryOptions::from_query_pairs(params)?;

    let mut query = TypedQuery::resolve(table.columns(), &options)?;
    query.scope_to_user(auth.user_id)?;

    let rows = match table {
        Table::SavedCities => {
            to_values(SavedCityRepo::query(&state.pool, auth.user_id, &query).await?)?
        }
        Table::UserPreferences => {
            to_values(PreferencesRepo::query(&state.pool, auth.user_id, &query).await?)?
        }
    };

    Ok(Json(project(rows, &query.select)))
}

/// POST /api/db/{table}
///
/// Insert a row owned by the caller. Returns 201 with the created row.
pub async fn insert(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(table): AppPath<String>,
    AppJson(body): AppJson<Value>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let table = Table::parse(&table)?;
    check_owner(&body, auth.user_id)?;

    let row = match table {
        Table::SavedCities => {
            let input = saved_city_input(body)?;
            to_value(SavedCityRepo::insert(&state.pool, auth.user_id, &input).await?)?
        }
        Table::UserPreferences => {
            let input = preferences_input(&state, auth.user_id, body).await?;
            to_value(PreferencesRepo::insert(&state.pool, auth.user_id, &input).await?)?
        }
    };

    tracing::info!(user_id = auth.user_id, table = ?table, "Row inserted");
    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT /api/db/{table}
///
/// Insert or update the caller's row. Saved cities are matched on their
/// coordinates, preferences on the owner.
pub async fn upsert(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(table): AppPath<String>,
    AppJson(body): AppJson<Value>,
) -> AppResult<Json<Value>> {
    let table = Table::parse(&table)?;
    check_owner(&body, auth.user_id)?;

    let row = match table {
        Table::SavedCities => {
            let input = saved_city_input(body)?;
            to_value(SavedCityRepo::upsert(&state.pool, auth.user_id, &input).await?)?
        }
        Table::UserPreferences => {
            let input = preferences_input(&state, auth.user_id, body).await?;
            to_value(PreferencesRepo::upsert(&state.pool, auth.user_id, &input).await?)?
        }
    };

    tracing::info!(user_id = auth.user_id, table = ?table, "Row upserted");
    Ok(Json(row))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Reject bodies whose `user_id` names somebody other than the caller.
///
/// The dashboard echoes the caller's id back, so a matching or null value
/// is accepted and then ignored.
fn check_owner(body: &Value, user_id: DbId) -> AppResult<()> {
    let owner = match body.get(OWNER_COLUMN) {
        None | Some(Value::Null) => return Ok(()),
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<DbId>().ok(),
        Some(_) => None,
    };
    if owner != Some(user_id) {
        return Err(CoreError::Forbidden(
            "Cannot write rows belonging to another user".to_string(),
        )
        .into());
    }
    Ok(())
}

fn parse_body<T: DeserializeOwned>(body: Value) -> AppResult<T> {
    if !body.is_object() {
        return Err(AppError::BadRequest("Request body must be a JSON object".into()));
    }
    serde_json::from_value(body).map_err(|e| AppError::BadRequest(format!("Invalid body: {e}")))
}

fn saved_city_input(body: Value) -> AppResult<CreateSavedCity> {
    let mut input: CreateSavedCity = parse_body(body)?;

    input.city_name = non_blank(Some(input.city_name.as_str()))
        .ok_or_else(|| CoreError::Validation("city_name is required".to_string()))?
        .to_string();
    input.country_code = non_blank(Some(input.country_code.as_str()))
        .ok_or_else(|| CoreError::Validation("country_code is required".to_string()))?
        .to_string();
    input.state_code = non_blank(input.state_code.as_deref()).map(str::to_string);

    if !(-90.0..=90.0).contains(&input.latitude) {
        return Err(CoreError::Validation("Latitude must be between -90 and 90".to_string()).into());
    }
    if !(-180.0..=180.0).contains(&input.longitude) {
        return Err(
            CoreError::Validation("Longitude must be between -180 and 180".to_string()).into(),
        );
    }
    Ok(input)
}

async fn preferences_input(
    state: &AppState,
    user_id: DbId,
    body: Value,
) -> AppResult<UpsertPreferences> {
    let input: UpsertPreferences = parse_body(body)?;

    if let Some(theme) = &input.theme {
        validate_choice("theme", theme, THEMES)?;
    }
    if let Some(unit) = &input.temperature_unit {
        validate_choice("temperature_unit", unit, TEMPERATURE_UNITS)?;
    }
    if let Some(unit) = &input.wind_speed_unit {
        validate_choice("wind_speed_unit", unit, WIND_SPEED_UNITS)?;
    }
    if input.language.as_deref().is_some_and(|l| l.trim().is_empty()) {
        return Err(CoreError::Validation("language cannot be blank".to_string()).into());
    }

    if let Some(city_id) = input.default_city_id {
        if SavedCityRepo::find_for_user(&state.pool, city_id, user_id)
            .await?
            .is_none()
        {
            return Err(AppError::BadRequest(format!(
                "default_city_id {city_id} is not one of your saved cities"
            )));
        }
    }
    Ok(input)
}

fn to_value<T: Serialize>(row: T) -> AppResult<Value> {
    serde_json::to_value(row)
        .map_err(|e| AppError::InternalError(format!("Row serialization error: {e}")))
}

fn to_values<T: Serialize>(rows: Vec<T>) -> AppResult<Vec<Value>> {
    rows.into_iter().map(to_value).collect()
}

/// Keep only the projected keys of each row. An empty projection keeps all.
fn project(rows: Vec<Value>, select: &[&str]) -> Vec<Value> {
    if select.is_empty() {
        return rows;
    }
    rows.into_iter()
        .map(|row| match row {
            Value::Object(mut fields) => {
                fields.retain(|key, _| select.contains(&key.as_str()));
                Value::Object(fields)
            }
            other => other,
        })
        .collect()
}
