//! Weather report types returned by `POST /api/weather` and the small
//! derivations computed from raw provider readings.
//!
//! Field names serialize in camelCase because the dashboard consumes them
//! directly.

use serde::{Deserialize, Serialize};

use crate::alerts::WeatherAlert;

/// Current conditions for a single location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    /// `"{city}, {country}"`.
    pub location: String,
    pub city_name: String,
    pub country_code: String,
    pub lat: f64,
    pub lon: f64,
    /// Degrees Celsius, rounded.
    pub temperature: i32,
    pub description: String,
    pub feels_like: i32,
    /// Relative humidity in percent.
    pub humidity: i32,
    /// Kilometres per hour, rounded.
    pub wind_speed: i32,
    /// Hectopascals.
    pub pressure: i32,
    /// Kilometres, rounded.
    pub visibility: i32,
    pub uv_index: i32,
    pub aqi: Option<u8>,
    pub aqi_description: String,
    /// Cloud cover in percent.
    pub cloudiness: i32,
    /// Millimetres in the last hour.
    pub precipitation: f64,
    pub sunrise: String,
    pub sunset: String,
    pub icon: String,
    pub suggestions: Vec<String>,
}

/// One day of the daily forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    /// `Today`, `Tomorrow`, or the weekday name.
    pub date: String,
    pub high: i32,
    pub low: i32,
    pub description: String,
    pub icon: String,
    pub humidity: i32,
    pub wind_speed: i32,
    pub precipitation: f64,
}

/// One three-hour slot of the hourly forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyForecast {
    /// Local time, e.g. `03:00 PM`.
    pub time: String,
    pub temperature: i32,
    pub description: String,
    pub icon: String,
    pub humidity: i32,
    pub wind_speed: i32,
    pub precipitation: f64,
}

/// Complete payload for one weather lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub current: CurrentConditions,
    pub forecast: Vec<DailyForecast>,
    pub hourly: Vec<HourlyForecast>,
    #[serde(default)]
    pub alerts: Vec<WeatherAlert>,
}

/// Map an OpenWeather icon code (`01d`, `10n`, ...) to the dashboard icon set.
pub fn map_weather_icon(code: &str) -> &'static str {
    match code {
        "01d" => "sunny",
        "01n" => "clear-night",
        "02d" | "02n" => "partly-cloudy",
        "03d" | "03n" | "04d" | "04n" => "cloudy",
        "09d" | "09n" | "10d" | "10n" => "rain",
        "11d" | "11n" => "thunderstorm",
        "13d" | "13n" => "snow",
        "50d" | "50n" => "fog",
        _ => "partly-cloudy",
    }
}

/// Human-readable label for an AQI bucket.
pub fn aqi_description(aqi: Option<u8>) -> &'static str {
    match aqi {
        None | Some(0) => "No data",
        Some(1) => "Good",
        Some(2) => "Fair",
        Some(3) => "Moderate",
        Some(4) => "Poor",
        Some(5) => "Very Poor",
        Some(_) => "Unknown",
    }
}

/// Rough UV index estimate from cloud cover and the local hour.
///
/// Zero outside 06:00-18:00. Midday hours (10-14) get the full value,
/// other daylight hours 70% of it.
pub fn estimate_uv_index(cloudiness: i32, local_hour: u32) -> i32 {
    if !(6..=18).contains(&local_hour) {
        return 0;
    }
    let base = (10.0 - f64::from(cloudiness) / 10.0).max(0.0);
    let multiplier = if (10..=14).contains(&local_hour) { 1.0 } else { 0.7 };
    (base * multiplier).round() as i32
}

/// Convert metres per second to whole kilometres per hour.
pub fn ms_to_kmh(speed_ms: f64) -> i32 {
    (speed_ms * 3.6).round() as i32
}

/// Round a precipitation amount to two decimals.
pub fn round_precipitation(mm: f64) -> f64 {
    (mm * 100.0).round() / 100.0
}
