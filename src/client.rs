//! OpenWeatherMap data endpoints. Transport and retries live in [`Fetcher`].

use crate::error::WeatherError;
use crate::fetcher::Fetcher;
use crate::formatters::{
    format_air_quality_response, format_forecast_response, format_weather_response,
};
use crate::location::Coordinate;
use crate::models::TemperatureUnit;

#[derive(Debug, Clone)]
pub struct WeatherClient<'a> {
    fetcher: &'a Fetcher,
    base_url: &'a str,
    api_key: &'a str,
}

impl<'a> WeatherClient<'a> {
    pub fn new(fetcher: &'a Fetcher, base_url: &'a str, api_key: &'a str) -> Self {
        Self {
            fetcher,
            base_url,
            api_key,
        }
    }

    /// Current conditions at `coordinate`
    pub async fn current(
        &self,
        coordinate: Coordinate,
        units: TemperatureUnit,
    ) -> Result<String, WeatherError> {
        let data = self.get("weather", coordinate).await?;
        tracing::info!("Fetched current weather for {}", coordinate);
        Ok(format_weather_response(&data, units))
    }

    /// Next 24 hours of the 5-day / 3-hour forecast at `coordinate`
    pub async fn forecast(
        &self,
        coordinate: Coordinate,
        units: TemperatureUnit,
    ) -> Result<String, WeatherError> {
        let data = self.get("forecast", coordinate).await?;
        tracing::info!("Fetched forecast for {}", coordinate);
        Ok(format_forecast_response(&data, units))
    }

    /// Current air pollution at `coordinate`
    pub async fn air_quality(&self, coordinate: Coordinate) -> Result<String, WeatherError> {
        let data = self.get("air_pollution", coordinate).await?;
        tracing::info!("Fetched air quality for {}", coordinate);
        Ok(format_air_quality_response(&data))
    }

    async fn get(
        &self,
        endpoint: &str,
        coordinate: Coordinate,
    ) -> Result<serde_json::Value, WeatherError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let [lat, lon] = coordinate.query();
        let query = [lat, lon, ("appid", self.api_key.to_string())];

        self.fetcher.fetch(&url, &query).await
    }
}
