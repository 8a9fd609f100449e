//! What location a weather lookup is for.

use skycast_core::error::CoreError;

/// A location to look up, by name or by coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    City(String),
    Coordinates { lat: f64, lon: f64 },
}

impl WeatherQuery {
    /// Build a query from optional request fields.
    ///
    /// Coordinates win when both `lat` and `lon` are present; otherwise a
    /// non-blank `city` is used.
    pub fn from_parts(
        city: Option<&str>,
        lat: Option<f64>,
        lon: Option<f64>,
    ) -> Result<Self, CoreError> {
        if let (Some(lat), Some(lon)) = (lat, lon) {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(CoreError::Validation(
                    "Latitude must be between -90 and 90".to_string(),
                ));
            }
            if !(-180.0..=180.0).contains(&lon) {
                return Err(CoreError::Validation(
                    "Longitude must be between -180 and 180".to_string(),
                ));
            }
            return Ok(Self::Coordinates { lat, lon });
        }

        match city.map(str::trim).filter(|c| !c.is_empty()) {
            Some(city) => Ok(Self::City(city.to_string())),
            None => Err(CoreError::Validation(
                "Either city or coordinates required".to_string(),
            )),
        }
    }

    /// Normalised key used to share cached reports between requests.
    ///
    /// City names are case- and whitespace-insensitive; coordinates are
    /// rounded to two decimals (roughly a kilometre).
    pub fn cache_key(&self) -> String {
        match self {
            Self::City(name) => {
                let words: Vec<&str> = name.split_whitespace().collect();
                format!("city:{}", words.join(" ").to_lowercase())
            }
            Self::Coordinates { lat, lon } => format!("coord:{lat:.2},{lon:.2}"),
        }
    }

    /// Location parameters for the OpenWeather query string.
    pub(crate) fn location_params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::City(name) => vec![("q", name.clone())],
            Self::Coordinates { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
        }
    }
}
