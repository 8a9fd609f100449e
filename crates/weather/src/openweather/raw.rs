//! OpenWeather response bodies and their conversion into a [`WeatherReport`].

use chrono::{FixedOffset, Offset, Timelike, Utc};
use serde::Deserialize;
use skycast_core::alerts::derive_alerts;
use skycast_core::forecast::{daily_forecast, format_clock, hourly_forecast, ForecastSample};
use skycast_core::suggestions::{generate_suggestions, SuggestionInput};
use skycast_core::types::Timestamp;
use skycast_core::weather::{
    aqi_description, estimate_uv_index, map_weather_icon, ms_to_kmh, round_precipitation,
    CurrentConditions, WeatherReport,
};

use crate::error::WeatherError;

#[derive(Debug, Deserialize)]
pub(crate) struct Coord {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Condition {
    /// Condition group, e.g. `Rain`.
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Wind {
    /// Metres per second.
    pub speed: f64,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Rain {
    #[serde(rename = "1h")]
    pub one_hour: Option<f64>,
    #[serde(rename = "3h")]
    pub three_hours: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Clouds {
    pub all: i32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Sys {
    #[serde(default)]
    pub country: String,
    pub sunrise: i64,
    pub sunset: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CurrentMain {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: i32,
    pub pressure: i32,
}

/// Body of `GET /weather`.
#[derive(Debug, Deserialize)]
pub(crate) struct CurrentResponse {
    pub name: String,
    pub coord: Coord,
    pub sys: Sys,
    pub main: CurrentMain,
    pub weather: Vec<Condition>,
    pub wind: Wind,
    /// Metres.
    pub visibility: Option<f64>,
    pub clouds: Option<Clouds>,
    pub rain: Option<Rain>,
    /// Offset from UTC in seconds.
    #[serde(default)]
    pub timezone: i32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastMain {
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: i32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastItem {
    pub dt: i64,
    pub main: ForecastMain,
    pub weather: Vec<Condition>,
    pub wind: Wind,
    pub rain: Option<Rain>,
}

/// Body of `GET /forecast` (three-hourly samples over five days).
#[derive(Debug, Deserialize)]
pub(crate) struct ForecastResponse {
    pub list: Vec<ForecastItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AirQualityMain {
    pub aqi: u8,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AirQualityItem {
    pub main: AirQualityMain,
}

/// Body of `GET /air_pollution`.
#[derive(Debug, Deserialize)]
pub(crate) struct AirQualityResponse {
    pub list: Vec<AirQualityItem>,
}

impl AirQualityResponse {
    pub fn aqi(&self) -> Option<u8> {
        self.list.first().map(|item| item.main.aqi)
    }
}

/// Error body OpenWeather returns with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: String,
}

/// Assemble the dashboard report.
///
/// Clock times and the UV estimate use the location's own UTC offset.
pub(crate) fn build_report(
    current: CurrentResponse,
    forecast: ForecastResponse,
    aqi: Option<u8>,
    now: Timestamp,
) -> Result<WeatherReport, WeatherError> {
    let condition = current
        .weather
        .first()
        .ok_or_else(|| WeatherError::Parse("current weather has no conditions".to_string()))?;
    let offset = FixedOffset::east_opt(current.timezone).unwrap_or_else(|| Utc.fix());
    let local_hour = now.with_timezone(&offset).hour();
    let cloudiness = current.clouds.as_ref().map_or(0, |c| c.all);

    let suggestions = generate_suggestions(&SuggestionInput {
        temperature: current.main.temp,
        humidity: current.main.humidity,
        wind_speed_kmh: current.wind.speed * 3.6,
        condition: &condition.main,
        aqi,
    });

    let conditions = CurrentConditions {
        location: format!("{}, {}", current.name, current.sys.country),
        city_name: current.name.clone(),
        country_code: current.sys.country.clone(),
        lat: current.coord.lat,
        lon: current.coord.lon,
        temperature: current.main.temp.round() as i32,
        description: condition.description.clone(),
        feels_like: current.main.feels_like.round() as i32,
        humidity: current.main.humidity,
        wind_speed: ms_to_kmh(current.wind.speed),
        pressure: current.main.pressure,
        visibility: (current.visibility.unwrap_or(0.0) / 1000.0).round() as i32,
        uv_index: estimate_uv_index(cloudiness, local_hour),
        aqi,
        aqi_description: aqi_description(aqi).to_string(),
        cloudiness,
        precipitation: round_precipitation(
            current.rain.as_ref().and_then(|r| r.one_hour).unwrap_or(0.0),
        ),
        sunrise: format_clock(current.sys.sunrise, offset).unwrap_or_default(),
        sunset: format_clock(current.sys.sunset, offset).unwrap_or_default(),
        icon: map_weather_icon(&condition.icon).to_string(),
        suggestions,
    };

    let samples: Vec<ForecastSample> = forecast
        .list
        .into_iter()
        .filter_map(|item| {
            let condition = item.weather.into_iter().next()?;
            Some(ForecastSample {
                timestamp: item.dt,
                temperature: item.main.temp,
                temp_min: item.main.temp_min,
                temp_max: item.main.temp_max,
                description: condition.description,
                icon_code: condition.icon,
                humidity: item.main.humidity,
                wind_speed_ms: item.wind.speed,
                rain_mm: item.rain.and_then(|r| r.three_hours).unwrap_or(0.0),
            })
        })
        .collect();

    let alerts = derive_alerts(&conditions);

    Ok(WeatherReport {
        current: conditions,
        forecast: daily_forecast(&samples, offset),
        hourly: hourly_forecast(&samples, now, offset),
        alerts,
    })
}
