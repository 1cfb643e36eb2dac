use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// Temperature Units
// ============================================================================

/// Display unit for temperatures. Upstream values are always kelvin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
#[schemars(inline)]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureUnit {
    pub const ALL: [TemperatureUnit; 3] = [Self::Celsius, Self::Fahrenheit, Self::Kelvin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Celsius => "celsius",
            Self::Fahrenheit => "fahrenheit",
            Self::Kelvin => "kelvin",
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemperatureUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|unit| unit.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown temperature unit '{}'", s))
    }
}

// ============================================================================
// MCP Tool Request Models
// ============================================================================

// Schema sources only; the dispatcher reads arguments leniently by hand.

/// Arguments of the current weather and forecast tools
#[derive(Debug, JsonSchema)]
pub struct WeatherRequest {
    /// City name (e.g., 'London', 'New York,US', 'Tokyo,JP') or coordinates in format 'lat,lon' (e.g., '51.5074,-0.1278')
    pub location: String,
    /// Temperature unit: 'celsius', 'fahrenheit', or 'kelvin'
    #[serde(default)]
    pub units: TemperatureUnit,
}

/// Arguments of the air quality tool
#[derive(Debug, JsonSchema)]
pub struct AirQualityRequest {
    /// City name or coordinates in format 'lat,lon'
    pub location: String,
}

// ============================================================================
// OpenWeatherMap Payload Views
// ============================================================================
//
// Payloads stay as `serde_json::Value`. Each view reads the fields it needs
// with an explicit default, so a missing or mistyped field never fails.

static NULL: Value = Value::Null;

fn number(value: &Value, key: &str) -> f64 {
    value.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

fn timestamp(value: &Value) -> i64 {
    value
        .get("dt")
        .and_then(|dt| dt.as_i64().or_else(|| dt.as_f64().map(|f| f as i64)))
        .unwrap_or(0)
}

fn text<'a>(value: &'a Value, key: &str, default: &'a str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or(default)
}

fn object<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|v| v.is_object())
}

fn object_or_null<'a>(value: &'a Value, key: &str) -> &'a Value {
    object(value, key).unwrap_or(&NULL)
}

/// First entry of the `weather` array
#[derive(Debug, Clone, PartialEq)]
pub struct Condition<'a> {
    pub main: &'a str,
    pub description: &'a str,
}

impl<'a> Condition<'a> {
    fn from_value(value: &'a Value) -> Self {
        let first = value
            .get("weather")
            .and_then(Value::as_array)
            .and_then(|list| list.first())
            .unwrap_or(&NULL);

        Self {
            main: text(first, "main", "Unknown"),
            description: text(first, "description", "No description"),
        }
    }
}

/// View over a `/weather` payload
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentWeather<'a> {
    pub name: &'a str,
    pub dt: i64,
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub condition: Condition<'a>,
    pub wind_speed: f64,
    pub wind_deg: f64,
    pub cloudiness: f64,
    pub rain_1h: Option<f64>,
    pub snow_1h: Option<f64>,
}

impl<'a> CurrentWeather<'a> {
    /// Returns `None` when the payload carries no `main` block.
    pub fn from_value(value: &'a Value) -> Option<Self> {
        let main = object(value, "main")?;
        let wind = object_or_null(value, "wind");
        let clouds = object_or_null(value, "clouds");

        Some(Self {
            name: text(value, "name", "Unknown location"),
            dt: timestamp(value),
            temp: number(main, "temp"),
            feels_like: number(main, "feels_like"),
            temp_min: number(main, "temp_min"),
            temp_max: number(main, "temp_max"),
            humidity: number(main, "humidity"),
            pressure: number(main, "pressure"),
            condition: Condition::from_value(value),
            wind_speed: number(wind, "speed"),
            wind_deg: number(wind, "deg"),
            cloudiness: number(clouds, "all"),
            rain_1h: precipitation(value, "rain"),
            snow_1h: precipitation(value, "snow"),
        })
    }
}

/// One-hour accumulation, present only when the block exists and is non-empty.
fn precipitation(value: &Value, key: &str) -> Option<f64> {
    object(value, key)
        .filter(|block| block.as_object().is_some_and(|map| !map.is_empty()))
        .map(|block| number(block, "1h"))
}

/// One 3-hour step of a `/forecast` payload
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEntry<'a> {
    pub dt: i64,
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub condition: Condition<'a>,
    pub wind_speed: f64,
    /// Probability of precipitation, 0.0 to 1.0
    pub pop: f64,
}

impl<'a> ForecastEntry<'a> {
    fn from_value(value: &'a Value) -> Self {
        let main = object_or_null(value, "main");
        let wind = object_or_null(value, "wind");

        Self {
            dt: timestamp(value),
            temp: number(main, "temp"),
            feels_like: number(main, "feels_like"),
            humidity: number(main, "humidity"),
            condition: Condition::from_value(value),
            wind_speed: number(wind, "speed"),
            pop: number(value, "pop"),
        }
    }
}

/// View over a `/forecast` payload
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast<'a> {
    pub city_name: &'a str,
    pub latitude: f64,
    pub longitude: f64,
    pub entries: Vec<ForecastEntry<'a>>,
}

impl<'a> Forecast<'a> {
    /// Returns `None` when the payload has no `list` array. Reads at most `limit` entries.
    pub fn from_value(value: &'a Value, limit: usize) -> Option<Self> {
        let list = value.get("list").and_then(Value::as_array)?;
        let city = object_or_null(value, "city");
        let coord = object_or_null(city, "coord");

        Some(Self {
            city_name: text(city, "name", "Unknown location"),
            latitude: number(coord, "lat"),
            longitude: number(coord, "lon"),
            entries: list.iter().take(limit).map(ForecastEntry::from_value).collect(),
        })
    }
}

/// Pollutant concentrations in μg/m³
#[derive(Debug, Clone, PartialEq)]
pub struct Components {
    pub co: f64,
    pub no: f64,
    pub no2: f64,
    pub o3: f64,
    pub so2: f64,
    pub pm2_5: f64,
    pub pm10: f64,
    pub nh3: f64,
}

/// View over the first entry of an `/air_pollution` payload
#[derive(Debug, Clone, PartialEq)]
pub struct AirQuality {
    pub aqi: i64,
    pub dt: i64,
    pub components: Components,
}

impl AirQuality {
    /// Returns `None` when the payload's `list` is missing or empty.
    pub fn from_value(value: &Value) -> Option<Self> {
        let first = value.get("list").and_then(Value::as_array)?.first()?;
        let main = object_or_null(first, "main");
        let components = object_or_null(first, "components");

        Some(Self {
            aqi: main
                .get("aqi")
                .and_then(|aqi| aqi.as_i64().or_else(|| aqi.as_f64().map(|f| f as i64)))
                .unwrap_or(0),
            dt: timestamp(first),
            components: Components {
                co: number(components, "co"),
                no: number(components, "no"),
                no2: number(components, "no2"),
                o3: number(components, "o3"),
                so2: number(components, "so2"),
                pm2_5: number(components, "pm2_5"),
                pm10: number(components, "pm10"),
                nh3: number(components, "nh3"),
            },
        })
    }
}
