//! Tool listing and routing, independent of the MCP transport.
//!
//! Every failure inside a call is turned into a one-line text result; the
//! dispatcher never returns an error to its caller.

use std::sync::{Arc, LazyLock};

use schemars::JsonSchema;
use serde_json::{Map, Value};

use crate::client::WeatherClient;
use crate::config::Config;
use crate::error::WeatherError;
use crate::fetcher::Fetcher;
use crate::location::LocationResolver;
use crate::models::{AirQualityRequest, TemperatureUnit, WeatherRequest};

pub type JsonObject = Map<String, Value>;

/// Name, description and argument schema of one tool
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: JsonObject,
}

/// The tools this server exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    CurrentWeather,
    Forecast,
    AirQuality,
}

impl ToolKind {
    pub const ALL: [ToolKind; 3] = [Self::CurrentWeather, Self::Forecast, Self::AirQuality];

    pub fn name(&self) -> &'static str {
        match self {
            Self::CurrentWeather => "get_current_weather",
            Self::Forecast => "get_weather_forecast",
            Self::AirQuality => "get_air_quality",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    fn description(&self) -> &'static str {
        match self {
            Self::CurrentWeather => {
                "Get current weather conditions for a specific location. \
                 Supports city name or geographic coordinates (latitude/longitude). \
                 Returns temperature, humidity, wind speed, conditions, and more."
            }
            Self::Forecast => {
                "Get the weather forecast in 3-hour intervals for the next 24 hours at a specific location. \
                 Provides temperature, conditions, wind, and precipitation probability."
            }
            Self::AirQuality => {
                "Get current air quality index (AQI) and pollutant concentrations for a specific location. \
                 Provides AQI level (1-5) and measurements of CO, NO, NO2, O3, SO2, PM2.5, PM10, and NH3."
            }
        }
    }

    fn input_schema(&self) -> JsonObject {
        match self {
            Self::CurrentWeather | Self::Forecast => schema_of::<WeatherRequest>(),
            Self::AirQuality => schema_of::<AirQualityRequest>(),
        }
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name(),
            description: self.description(),
            input_schema: self.input_schema(),
        }
    }
}

fn schema_of<T: JsonSchema>() -> JsonObject {
    match serde_json::to_value(schemars::schema_for!(T)) {
        Ok(Value::Object(mut schema)) => {
            schema.remove("$schema");
            schema
        }
        _ => JsonObject::new(),
    }
}

static TOOLS: LazyLock<Vec<ToolDescriptor>> =
    LazyLock::new(|| ToolKind::ALL.iter().map(ToolKind::descriptor).collect());

/// Text produced by a tool call
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutput {
    fn success(text: String) -> Self {
        Self {
            text,
            is_error: false,
        }
    }

    fn failure(error: &WeatherError) -> Self {
        Self {
            text: format!("Error: {}", error.user_message()),
            is_error: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Dispatcher {
    config: Arc<Config>,
    fetcher: Fetcher,
}

impl Dispatcher {
    pub fn new(config: Config) -> Result<Self, WeatherError> {
        Ok(Self::with_fetcher(config, Fetcher::new()?))
    }

    pub fn with_fetcher(config: Config, fetcher: Fetcher) -> Self {
        Self {
            config: Arc::new(config),
            fetcher,
        }
    }

    pub fn list_tools(&self) -> &'static [ToolDescriptor] {
        &TOOLS
    }

    pub async fn call_tool(&self, name: &str, arguments: Option<&JsonObject>) -> ToolOutput {
        match self.run(name, arguments).await {
            Ok(text) => ToolOutput::success(text),
            Err(error) => {
                tracing::error!("Tool '{}' failed: {}", name, error);
                ToolOutput::failure(&error)
            }
        }
    }

    async fn run(&self, name: &str, arguments: Option<&JsonObject>) -> Result<String, WeatherError> {
        let argument = |key: &str| arguments.and_then(|args| args.get(key));

        let location = argument("location")
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default();
        if location.is_empty() {
            return Err(WeatherError::ValidationFailure(
                "Location parameter is required.".to_string(),
            ));
        }

        let api_key = self.config.require_api_key()?;

        let Some(tool) = ToolKind::from_name(name) else {
            tracing::warn!("Unknown tool requested: {}", name);
            return Err(WeatherError::ValidationFailure(format!(
                "Unknown tool '{}'",
                name
            )));
        };

        let units = parse_units(argument("units"));

        let resolver = LocationResolver::new(&self.fetcher, &self.config.geo_url, api_key);
        let coordinate = resolver.resolve(location).await?;
        tracing::info!(
            "Resolved location '{}' to coordinates: {}",
            location,
            coordinate
        );

        let client = WeatherClient::new(&self.fetcher, &self.config.base_url, api_key);
        match tool {
            ToolKind::CurrentWeather => client.current(coordinate, units).await,
            ToolKind::Forecast => client.forecast(coordinate, units).await,
            ToolKind::AirQuality => client.air_quality(coordinate).await,
        }
    }
}

/// Missing units mean celsius; unrecognised ones fall back to celsius too.
fn parse_units(value: Option<&Value>) -> TemperatureUnit {
    let Some(raw) = value.and_then(Value::as_str) else {
        return TemperatureUnit::default();
    };

    raw.parse().unwrap_or_else(|e| {
        tracing::warn!("{}, using celsius", e);
        TemperatureUnit::default()
    })
}
