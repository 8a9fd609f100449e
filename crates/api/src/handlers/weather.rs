//! Handler for `POST /weather`.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use skycast_core::alerts::WeatherAlert;
use skycast_core::weather::{CurrentConditions, DailyForecast, HourlyForecast, WeatherReport};
use skycast_db::models::weather_cache::{UpsertWeatherCache, WeatherCacheEntry};
use skycast_db::repositories::WeatherCacheRepo;
use skycast_weather::{WeatherError, WeatherQuery};

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::state::AppState;

/// `cache_type` of rows holding a full dashboard report.
pub const REPORT_CACHE_TYPE: &str = "report";

/// Request body for `POST /weather`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WeatherRequest {
    pub city: Option<String>,
    #[serde(deserialize_with = "coordinate")]
    pub lat: Option<f64>,
    #[serde(deserialize_with = "coordinate")]
    pub lon: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCoordinate {
    Number(f64),
    Text(String),
}

/// Accept `51.5` or `"51.5"`; `null` and `""` mean absent.
fn coordinate<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    match Option::<RawCoordinate>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawCoordinate::Number(value)) => Ok(Some(value)),
        Some(RawCoordinate::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid coordinate '{text}'")))
        }
    }
}

/// The `forecast_data` column of a cached report.
#[derive(Debug, Serialize, Deserialize)]
struct CachedForecast {
    forecast: Vec<DailyForecast>,
    hourly: Vec<HourlyForecast>,
    alerts: Vec<WeatherAlert>,
}

/// POST /api/weather
///
/// Current conditions, forecasts and alerts for a city or coordinate pair.
/// Fresh cached reports are served without contacting the provider.
pub async fn get_weather(
    State(state): State<AppState>,
    AppJson(input): AppJson<WeatherRequest>,
) -> AppResult<Json<WeatherReport>> {
    if !state.weather.is_configured() {
        return Err(WeatherError::NotConfigured.into());
    }

    let query = WeatherQuery::from_parts(input.city.as_deref(), input.lat, input.lon)?;
    let key = query.cache_key();

    if let Some(report) = cached_report(&state, &key).await {
        tracing::debug!(key = %key, "Weather cache hit");
        return Ok(Json(report));
    }

    let report = state.weather.fetch(&query).await?;
    store_report(&state, &key, &report).await;

    Ok(Json(report))
}

/// Look up a fresh cached report. Any failure counts as a miss.
async fn cached_report(state: &AppState, key: &str) -> Option<WeatherReport> {
    let entry = match WeatherCacheRepo::find_fresh(&state.pool, key, REPORT_CACHE_TYPE).await {
        Ok(entry) => entry?,
        Err(e) => {
            tracing::warn!(error = %e, key, "Weather cache read failed");
            return None;
        }
    };

    match decode_entry(entry) {
        Ok(report) => Some(report),
        Err(e) => {
            tracing::warn!(error = %e, key, "Discarding undecodable cache entry");
            None
        }
    }
}

fn decode_entry(entry: WeatherCacheEntry) -> Result<WeatherReport, serde_json::Error> {
    let current: CurrentConditions = serde_json::from_value(entry.weather_data)?;
    let rest: CachedForecast =
        serde_json::from_value(entry.forecast_data.unwrap_or(serde_json::Value::Null))?;
    Ok(WeatherReport {
        current,
        forecast: rest.forecast,
        hourly: rest.hourly,
        alerts: rest.alerts,
    })
}

/// Write `report` to the cache. Failures are logged and otherwise ignored.
async fn store_report(state: &AppState, key: &str, report: &WeatherReport) {
    let expires_at = i64::try_from(state.config.weather_cache_ttl_secs)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .and_then(|ttl| Utc::now().checked_add_signed(ttl));
    let Some(expires_at) = expires_at else {
        tracing::warn!(
            ttl_secs = state.config.weather_cache_ttl_secs,
            "Cache TTL out of range; not caching"
        );
        return;
    };

    let encoded = serde_json::to_value(&report.current).and_then(|current| {
        let rest = serde_json::to_value(CachedForecast {
            forecast: report.forecast.clone(),
            hourly: report.hourly.clone(),
            alerts: report.alerts.clone(),
        })?;
        Ok((current, rest))
    });

    let (weather_data, forecast_data) = match encoded {
        Ok(pair) => pair,
        Err(e) => {
            tracing::warn!(error = %e, key, "Could not encode weather report for caching");
            return;
        }
    };

    let input = UpsertWeatherCache {
        city_id: key.to_string(),
        cache_type: REPORT_CACHE_TYPE.to_string(),
        weather_data,
        forecast_data: Some(forecast_data),
        expires_at,
    };

    if let Err(e) = WeatherCacheRepo::upsert(&state.pool, &input).await {
        tracing::warn!(error = %e, key, "Weather cache write failed");
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parse(body: serde_json::Value) -> Result<WeatherRequest, serde_json::Error> {
        serde_json::from_value(body)
    }

    #[test]
    fn coordinates_accept_numbers_and_numeric_strings() {
        let req = parse(json!({ "lat": 51.5, "lon": "-0.12" })).unwrap();
        assert_eq!(req.lat, Some(51.5));
        assert_eq!(req.lon, Some(-0.12));
    }

    #[test]
    fn blank_or_null_coordinates_are_absent() {
        let req = parse(json!({ "city": "Oslo", "lat": "", "lon": null })).unwrap();
        assert_eq!(req.lat, None);
        assert_eq!(req.lon, None);

        let req = parse(json!({})).unwrap();
        assert_eq!(req.lat, None);
    }

    #[test]
    fn non_numeric_coordinates_are_rejected() {
        assert!(parse(json!({ "lat": "north", "lon": 0 })).is_err());
        assert!(parse(json!({ "lat": true, "lon": 0 })).is_err());
    }
}
