//! OpenWeather REST client.

mod raw;

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::de::DeserializeOwned;
use skycast_core::weather::WeatherReport;
use url::Url;

use crate::error::WeatherError;
use crate::provider::WeatherProvider;
use crate::query::WeatherQuery;
use raw::{AirQualityResponse, CurrentResponse, ErrorBody, ForecastResponse};

/// Public OpenWeather 2.5 API root.
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Fetches current conditions, the five-day forecast and air quality.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenWeatherClient {
    /// Build a client. Without an API key every fetch fails with
    /// [`WeatherError::NotConfigured`].
    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    fn endpoint(
        &self,
        path: &str,
        api_key: &str,
        params: &[(&'static str, String)],
    ) -> Result<Url, WeatherError> {
        let mut url = Url::parse(&format!("{}/{path}", self.base_url))
            .map_err(|e| WeatherError::Parse(format!("invalid OpenWeather URL: {e}")))?;
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())))
            .append_pair("appid", api_key)
            .append_pair("units", "metric");
        Ok(url)
    }

    /// GET `url` and decode the body, surfacing upstream errors with their
    /// status and message. URLs are stripped from errors as they carry the key.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, WeatherError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| WeatherError::Network(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.message,
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("Upstream error")
                    .to_string(),
            };
            return Err(WeatherError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| WeatherError::Parse(e.without_url().to_string()))
    }

    /// Best-effort air quality lookup; failures only lose the AQI.
    async fn air_quality(&self, api_key: &str, lat: f64, lon: f64) -> Option<u8> {
        let params = [("lat", lat.to_string()), ("lon", lon.to_string())];
        let url = self.endpoint("air_pollution", api_key, &params).ok()?;
        match self.get_json::<AirQualityResponse>(url).await {
            Ok(body) => body.aqi(),
            Err(e) => {
                tracing::debug!(error = %e, "Air quality lookup failed");
                None
            }
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn fetch(&self, query: &WeatherQuery) -> Result<WeatherReport, WeatherError> {
        let api_key = self.api_key.as_deref().ok_or(WeatherError::NotConfigured)?;
        let params = query.location_params();

        let current_url = self.endpoint("weather", api_key, &params)?;
        let forecast_url = self.endpoint("forecast", api_key, &params)?;

        let (current, forecast) = tokio::try_join!(
            self.get_json::<CurrentResponse>(current_url),
            self.get_json::<ForecastResponse>(forecast_url),
        )?;

        let aqi = self
            .air_quality(api_key, current.coord.lat, current.coord.lon)
            .await;

        tracing::debug!(
            location = %current.name,
            samples = forecast.list.len(),
            aqi = ?aqi,
            "Fetched OpenWeather report"
        );

        raw::build_report(current, forecast, aqi, Utc::now())
    }
}
