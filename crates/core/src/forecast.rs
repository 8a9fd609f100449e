//! Reduce the provider's three-hourly forecast samples to the dashboard's
//! daily and hourly views.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::types::Timestamp;
use crate::weather::{map_weather_icon, ms_to_kmh, round_precipitation, DailyForecast, HourlyForecast};

/// Number of three-hour slots in the hourly view (24 hours).
pub const HOURLY_SLOTS: usize = 8;

/// Maximum number of days in the daily view.
pub const MAX_FORECAST_DAYS: usize = 7;

/// One forecast sample as reported by the provider.
#[derive(Debug, Clone)]
pub struct ForecastSample {
    /// Unix timestamp in seconds.
    pub timestamp: i64,
    pub temperature: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub description: String,
    /// Provider icon code, e.g. `10d`.
    pub icon_code: String,
    pub humidity: i32,
    /// Metres per second.
    pub wind_speed_ms: f64,
    /// Rain volume over the slot in millimetres.
    pub rain_mm: f64,
}

/// Format a unix timestamp as a 12-hour clock in the location's offset.
pub fn format_clock(timestamp: i64, offset: FixedOffset) -> Option<String> {
    DateTime::from_timestamp(timestamp, 0)
        .map(|t| t.with_timezone(&offset).format("%I:%M %p").to_string())
}

/// The next [`HOURLY_SLOTS`] samples that are still in the future.
///
/// Only the first [`HOURLY_SLOTS`] samples are considered, so a stale
/// response yields fewer entries rather than reaching further ahead.
pub fn hourly_forecast(
    samples: &[ForecastSample],
    now: Timestamp,
    offset: FixedOffset,
) -> Vec<HourlyForecast> {
    samples
        .iter()
        .take(HOURLY_SLOTS)
        .filter(|s| s.timestamp > now.timestamp())
        .filter_map(|s| {
            Some(HourlyForecast {
                time: format_clock(s.timestamp, offset)?,
                temperature: s.temperature.round() as i32,
                description: s.description.clone(),
                icon: map_weather_icon(&s.icon_code).to_string(),
                humidity: s.humidity,
                wind_speed: ms_to_kmh(s.wind_speed_ms),
                precipitation: round_precipitation(s.rain_mm),
            })
        })
        .collect()
}

/// One entry per local calendar day, taken from the first sample of that day.
pub fn daily_forecast(samples: &[ForecastSample], offset: FixedOffset) -> Vec<DailyForecast> {
    let mut seen: HashSet<NaiveDate> = HashSet::new();
    let mut days = Vec::new();

    for sample in samples {
        if days.len() >= MAX_FORECAST_DAYS {
            break;
        }
        let Some(local) = DateTime::from_timestamp(sample.timestamp, 0)
            .map(|t| t.with_timezone(&offset))
        else {
            continue;
        };
        if !seen.insert(local.date_naive()) {
            continue;
        }

        let label = match days.len() {
            0 => "Today".to_string(),
            1 => "Tomorrow".to_string(),
            _ => local.format("%A").to_string(),
        };

        days.push(DailyForecast {
            date: label,
            high: sample.temp_max.round() as i32,
            low: sample.temp_min.round() as i32,
            description: sample.description.clone(),
            icon: map_weather_icon(&sample.icon_code).to_string(),
            humidity: sample.humidity,
            wind_speed: ms_to_kmh(sample.wind_speed_ms),
            precipitation: round_precipitation(sample.rain_mm),
        });
    }

    days
}
