//! The background job that purges expired weather cache rows.

use std::time::Duration;

use chrono::Utc;
use serde_json::json;
use skycast_api::background::cache_retention;
use skycast_db::models::weather_cache::UpsertWeatherCache;
use skycast_db::repositories::WeatherCacheRepo;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

async fn seed(pool: &PgPool, key: &str, expires_in: chrono::Duration) {
    WeatherCacheRepo::upsert(
        pool,
        &UpsertWeatherCache {
            city_id: key.to_string(),
            cache_type: "report".to_string(),
            weather_data: json!({}),
            forecast_data: None,
            expires_at: Utc::now() + expires_in,
        },
    )
    .await
    .unwrap();
}

async fn cached_keys(pool: &PgPool) -> Vec<String> {
    sqlx::query_scalar("SELECT city_id FROM weather_cache ORDER BY city_id")
        .fetch_all(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn purges_expired_rows_until_cancelled(pool: PgPool) {
    seed(&pool, "city:stale", chrono::Duration::minutes(-5)).await;
    seed(&pool, "city:fresh", chrono::Duration::minutes(5)).await;

    let cancel = CancellationToken::new();
    let handle = tokio::spawn(cache_retention::run(
        pool.clone(),
        Duration::from_millis(50),
        cancel.clone(),
    ));

    // The first purge runs immediately.
    let mut keys = cached_keys(&pool).await;
    for _ in 0..50 {
        if keys.len() == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
        keys = cached_keys(&pool).await;
    }
    assert_eq!(keys, vec!["city:fresh".to_string()]);

    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("retention job should stop once cancelled")
        .unwrap();
}
