//! Repository for the `saved_cities` table.

use skycast_core::types::DbId;
use sqlx::{PgPool, QueryBuilder};

use crate::filters::{Column, ColumnKind, TableColumns, TypedQuery};
use crate::models::saved_city::{CreateSavedCity, SavedCity};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, city_name, country_code, state_code, latitude, longitude, \
                       is_default, created_at, updated_at";

/// Provides data access for a user's saved cities.
pub struct SavedCityRepo;

impl SavedCityRepo {
    /// Columns callers may filter, order or project on.
    pub const TABLE: TableColumns = TableColumns {
        table: "saved_cities",
        columns: &[
            Column::new("id", ColumnKind::BigInt),
            Column::new("user_id", ColumnKind::BigInt),
            Column::new("city_name", ColumnKind::Text),
            Column::new("country_code", ColumnKind::Text),
            Column::new("state_code", ColumnKind::Text),
            Column::new("latitude", ColumnKind::Float),
            Column::new("longitude", ColumnKind::Float),
            Column::new("is_default", ColumnKind::Bool),
            Column::new("created_at", ColumnKind::Timestamp),
            Column::new("updated_at", ColumnKind::Timestamp),
        ],
    };

    /// List the user's cities matching `query`, oldest first by default.
    pub async fn query(
        pool: &PgPool,
        user_id: DbId,
        query: &TypedQuery,
    ) -> Result<Vec<SavedCity>, sqlx::Error> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT {COLUMNS} FROM saved_cities WHERE user_id = "
        ));
        qb.push_bind(user_id);
        query.push_conditions(&mut qb);
        query.push_order_and_limit(&mut qb, "id ASC");
        qb.build_query_as::<SavedCity>().fetch_all(pool).await
    }

    /// Find one of the user's cities by ID.
    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<SavedCity>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM saved_cities WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, SavedCity>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a city. Saving the same coordinates twice violates
    /// `uq_saved_cities_user_coords`.
    pub async fn insert(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateSavedCity,
    ) -> Result<SavedCity, sqlx::Error> {
        let query = format!(
            "INSERT INTO saved_cities
                (user_id, city_name, country_code, state_code, latitude, longitude, is_default)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SavedCity>(&query)
            .bind(user_id)
            .bind(&input.city_name)
            .bind(&input.country_code)
            .bind(&input.state_code)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(input.is_default)
            .fetch_one(pool)
            .await
    }

    /// Insert a city, or update the existing row for the same coordinates.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateSavedCity,
    ) -> Result<SavedCity, sqlx::Error> {
        let query = format!(
            "INSERT INTO saved_cities
                (user_id, city_name, country_code, state_code, latitude, longitude, is_default)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (user_id, latitude, longitude) DO UPDATE SET
                city_name = EXCLUDED.city_name,
                country_code = EXCLUDED.country_code,
                state_code = EXCLUDED.state_code,
                is_default = EXCLUDED.is_default,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SavedCity>(&query)
            .bind(user_id)
            .bind(&input.city_name)
            .bind(&input.country_code)
            .bind(&input.state_code)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(input.is_default)
            .fetch_one(pool)
            .await
    }
}
