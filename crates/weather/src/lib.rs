//! Weather data providers.
//!
//! [`WeatherProvider`] is the seam the API server talks to;
//! [`OpenWeatherClient`] implements it against the OpenWeather REST API.

pub mod error;
pub mod openweather;
pub mod provider;
pub mod query;

pub use error::WeatherError;
pub use openweather::OpenWeatherClient;
pub use provider::WeatherProvider;
pub use query::WeatherQuery;
