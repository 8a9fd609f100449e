use async_trait::async_trait;
use skycast_core::weather::WeatherReport;

use crate::error::WeatherError;
use crate::query::WeatherQuery;

/// A source of current conditions and forecasts.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Whether the provider has the credentials it needs to make requests.
    fn is_configured(&self) -> bool;

    /// Fetch the full report for one location.
    async fn fetch(&self, query: &WeatherQuery) -> Result<WeatherReport, WeatherError>;
}
