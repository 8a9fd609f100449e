//! Repository for the `user_preferences` table.

use skycast_core::types::DbId;
use sqlx::{PgPool, QueryBuilder};

use crate::filters::{Column, ColumnKind, TableColumns, TypedQuery};
use crate::models::preferences::{
    UpsertPreferences, UserPreferences, DEFAULT_LANGUAGE, DEFAULT_TEMPERATURE_UNIT,
    DEFAULT_THEME, DEFAULT_WIND_SPEED_UNIT,
};

/// Column list for user_preferences queries.
const COLUMNS: &str = "id, user_id, theme, language, temperature_unit, wind_speed_unit, \
                       notifications_enabled, daily_forecast_push, severe_weather_alerts, \
                       default_city_id, created_at, updated_at";

/// Provides data access for per-user preferences.
pub struct PreferencesRepo;

impl PreferencesRepo {
    /// Columns callers may filter, order or project on.
    pub const TABLE: TableColumns = TableColumns {
        table: "user_preferences",
        columns: &[
            Column::new("id", ColumnKind::BigInt),
            Column::new("user_id", ColumnKind::BigInt),
            Column::new("theme", ColumnKind::Text),
            Column::new("language", ColumnKind::Text),
            Column::new("temperature_unit", ColumnKind::Text),
            Column::new("wind_speed_unit", ColumnKind::Text),
            Column::new("notifications_enabled", ColumnKind::Bool),
            Column::new("daily_forecast_push", ColumnKind::Bool),
            Column::new("severe_weather_alerts", ColumnKind::Bool),
            Column::new("default_city_id", ColumnKind::BigInt),
            Column::new("created_at", ColumnKind::Timestamp),
            Column::new("updated_at", ColumnKind::Timestamp),
        ],
    };

    /// Return the user's preferences row (at most one) if it matches `query`.
    pub async fn query(
        pool: &PgPool,
        user_id: DbId,
        query: &TypedQuery,
    ) -> Result<Vec<UserPreferences>, sqlx::Error> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT {COLUMNS} FROM user_preferences WHERE user_id = "
        ));
        qb.push_bind(user_id);
        query.push_conditions(&mut qb);
        query.push_order_and_limit(&mut qb, "id ASC");
        qb.build_query_as::<UserPreferences>().fetch_all(pool).await
    }

    /// Find the preferences row for a user.
    pub async fn find_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<UserPreferences>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_preferences WHERE user_id = $1");
        sqlx::query_as::<_, UserPreferences>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Create the user's preferences row; omitted fields take their defaults.
    ///
    /// A second insert for the same user violates `uq_user_preferences_user_id`.
    pub async fn insert(
        pool: &PgPool,
        user_id: DbId,
        input: &UpsertPreferences,
    ) -> Result<UserPreferences, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_preferences
                (user_id, theme, language, temperature_unit, wind_speed_unit,
                 notifications_enabled, daily_forecast_push, severe_weather_alerts,
                 default_city_id)
             VALUES ($1, COALESCE($2, $10), COALESCE($3, $11), COALESCE($4, $12),
                     COALESCE($5, $13), COALESCE($6, true), COALESCE($7, false),
                     COALESCE($8, true), $9)
             RETURNING {COLUMNS}"
        );
        Self::bind_upsert(&query, user_id, input).fetch_one(pool).await
    }

    /// Insert or update the user's preferences.
    ///
    /// On update, omitted fields keep their stored values.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        input: &UpsertPreferences,
    ) -> Result<UserPreferences, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_preferences
                (user_id, theme, language, temperature_unit, wind_speed_unit,
                 notifications_enabled, daily_forecast_push, severe_weather_alerts,
                 default_city_id)
             VALUES ($1, COALESCE($2, $10), COALESCE($3, $11), COALESCE($4, $12),
                     COALESCE($5, $13), COALESCE($6, true), COALESCE($7, false),
                     COALESCE($8, true), $9)
             ON CONFLICT (user_id) DO UPDATE SET
                theme = COALESCE($2, user_preferences.theme),
                language = COALESCE($3, user_preferences.language),
                temperature_unit = COALESCE($4, user_preferences.temperature_unit),
                wind_speed_unit = COALESCE($5, user_preferences.wind_speed_unit),
                notifications_enabled = COALESCE($6, user_preferences.notifications_enabled),
                daily_forecast_push = COALESCE($7, user_preferences.daily_forecast_push),
                severe_weather_alerts = COALESCE($8, user_preferences.severe_weather_alerts),
                default_city_id = COALESCE($9, user_preferences.default_city_id),
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        Self::bind_upsert(&query, user_id, input).fetch_one(pool).await
    }

    fn bind_upsert<'q>(
        query: &'q str,
        user_id: DbId,
        input: &'q UpsertPreferences,
    ) -> sqlx::query::QueryAs<'q, sqlx::Postgres, UserPreferences, sqlx::postgres::PgArguments>
    {
        sqlx::query_as::<_, UserPreferences>(query)
            .bind(user_id)
            .bind(&input.theme)
            .bind(&input.language)
            .bind(&input.temperature_unit)
            .bind(&input.wind_speed_unit)
            .bind(input.notifications_enabled)
            .bind(input.daily_forecast_push)
            .bind(input.severe_weather_alerts)
            .bind(input.default_city_id)
            .bind(DEFAULT_THEME)
            .bind(DEFAULT_LANGUAGE)
            .bind(DEFAULT_TEMPERATURE_UNIT)
            .bind(DEFAULT_WIND_SPEED_UNIT)
    }
}
