//! Repository for the `weather_cache` table.

use sqlx::PgPool;

use crate::models::weather_cache::{UpsertWeatherCache, WeatherCacheEntry};

/// Column list for weather_cache queries.
const COLUMNS: &str =
    "id, city_id, cache_type, weather_data, forecast_data, expires_at, created_at";

/// Provides data access for the weather lookup cache.
pub struct WeatherCacheRepo;

impl WeatherCacheRepo {
    /// Find an unexpired entry. Expired rows are never returned.
    pub async fn find_fresh(
        pool: &PgPool,
        city_id: &str,
        cache_type: &str,
    ) -> Result<Option<WeatherCacheEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM weather_cache
             WHERE city_id = $1 AND cache_type = $2 AND expires_at > NOW()"
        );
        sqlx::query_as::<_, WeatherCacheEntry>(&query)
            .bind(city_id)
            .bind(cache_type)
            .fetch_optional(pool)
            .await
    }

    /// Upsert a cache entry. Inserts or replaces on `(city_id, cache_type)`.
    pub async fn upsert(
        pool: &PgPool,
        input: &UpsertWeatherCache,
    ) -> Result<WeatherCacheEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO weather_cache
                (city_id, cache_type, weather_data, forecast_data, expires_at)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (city_id, cache_type) DO UPDATE SET
                weather_data = EXCLUDED.weather_data,
                forecast_data = EXCLUDED.forecast_data,
                expires_at = EXCLUDED.expires_at,
                created_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WeatherCacheEntry>(&query)
            .bind(&input.city_id)
            .bind(&input.cache_type)
            .bind(&input.weather_data)
            .bind(&input.forecast_data)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Delete every expired entry, returning how many were removed.
    pub async fn purge_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM weather_cache WHERE expires_at <= NOW()")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
