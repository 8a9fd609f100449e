//! Severe-condition alerts derived from the current conditions.

use serde::{Deserialize, Serialize};

use crate::weather::CurrentConditions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Moderate,
    High,
    Extreme,
}

/// Serialized as the alert's `type`; picks the dashboard icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Wind,
    Temperature,
    Other,
}

/// A single alert shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherAlert {
    /// Stable identifier so the client can dismiss an alert.
    pub id: String,
    pub title: String,
    pub description: String,
    pub severity: AlertSeverity,
    #[serde(rename = "type")]
    pub kind: AlertKind,
}

impl WeatherAlert {
    fn new(
        id: &str,
        title: &str,
        description: String,
        severity: AlertSeverity,
        kind: AlertKind,
    ) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description,
            severity,
            kind,
        }
    }
}

pub const EXTREME_COLD_C: i32 = -10;
pub const EXTREME_HEAT_C: i32 = 40;
pub const HIGH_WIND_KMH: i32 = 50;
pub const POOR_AQI: u8 = 4;
pub const HIGH_UV: i32 = 8;

/// Derive the alerts that apply to `current`.
pub fn derive_alerts(current: &CurrentConditions) -> Vec<WeatherAlert> {
    let mut alerts = Vec::new();

    if current.temperature < EXTREME_COLD_C {
        alerts.push(WeatherAlert::new(
            "temp-extreme-cold",
            "Extreme Cold Warning",
            format!(
                "Temperature is {}°C. Risk of frostbite and hypothermia.",
                current.temperature
            ),
            AlertSeverity::Extreme,
            AlertKind::Temperature,
        ));
    } else if current.temperature > EXTREME_HEAT_C {
        alerts.push(WeatherAlert::new(
            "temp-extreme-heat",
            "Extreme Heat Warning",
            format!(
                "Temperature is {}°C. Risk of heat stroke and dehydration.",
                current.temperature
            ),
            AlertSeverity::Extreme,
            AlertKind::Temperature,
        ));
    }

    if current.wind_speed > HIGH_WIND_KMH {
        alerts.push(WeatherAlert::new(
            "wind-high",
            "High Wind Warning",
            format!(
                "Wind speeds of {} km/h. Avoid outdoor activities.",
                current.wind_speed
            ),
            AlertSeverity::High,
            AlertKind::Wind,
        ));
    }

    if current.aqi.is_some_and(|aqi| aqi >= POOR_AQI) {
        alerts.push(WeatherAlert::new(
            "air-quality-poor",
            "Poor Air Quality Alert",
            format!(
                "Air quality is {}. Consider staying indoors.",
                current.aqi_description
            ),
            AlertSeverity::High,
            AlertKind::Other,
        ));
    }

    if current.uv_index > HIGH_UV {
        alerts.push(WeatherAlert::new(
            "uv-high",
            "High UV Index Alert",
            format!("UV Index is {}. Use strong sun protection.", current.uv_index),
            AlertSeverity::Moderate,
            AlertKind::Other,
        ));
    }

    alerts
}
