//! Periodic cleanup of expired weather cache rows.
//!
//! Reads already ignore expired rows; this job only keeps the table from
//! growing. Runs on a fixed interval using `tokio::time::interval`.

use std::time::Duration;

use skycast_db::repositories::WeatherCacheRepo;
use skycast_db::DbPool;
use tokio_util::sync::CancellationToken;

/// Shortest accepted purge interval.
const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Run the cache retention loop until `cancel` is triggered.
///
/// The first purge happens immediately.
pub async fn run(pool: DbPool, interval: Duration, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        "Weather cache retention job started"
    );

    let mut ticker = tokio::time::interval(interval.max(MIN_INTERVAL));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Weather cache retention job stopping");
                break;
            }
            _ = ticker.tick() => {
                match WeatherCacheRepo::purge_expired(&pool).await {
                    Ok(deleted) => {
                        if deleted > 0 {
                            tracing::info!(deleted, "Weather cache retention: purged expired rows");
                        } else {
                            tracing::debug!("Weather cache retention: no rows to purge");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Weather cache retention: cleanup failed");
                    }
                }
            }
        }
    }
}
