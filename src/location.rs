//! Location resolution: `"lat,lon"` strings are parsed locally, anything
//! else goes through the geocoding endpoint.

use std::fmt;

use serde_json::Value;

use crate::error::WeatherError;
use crate::fetcher::Fetcher;

/// A validated latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Returns `None` unless latitude is within [-90, 90] and longitude within [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude);
        valid.then_some(Self {
            latitude,
            longitude,
        })
    }

    pub(crate) fn query(&self) -> [(&'static str, String); 2] {
        [
            ("lat", self.latitude.to_string()),
            ("lon", self.longitude.to_string()),
        ]
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// Parses `"lat,lon"`. Only the first two comma-separated parts are read.
///
/// Any parse failure or out-of-range value yields `None` so the caller can
/// fall back to geocoding.
pub fn parse_coordinates(input: &str) -> Option<Coordinate> {
    if !input.contains(',') {
        return None;
    }

    let mut parts = input.split(',');
    let latitude = parts.next()?.trim().parse::<f64>().ok()?;
    let longitude = parts.next()?.trim().parse::<f64>().ok()?;
    Coordinate::new(latitude, longitude)
}

/// Resolves free-form locations into coordinates
#[derive(Debug, Clone)]
pub struct LocationResolver<'a> {
    fetcher: &'a Fetcher,
    geo_url: &'a str,
    api_key: &'a str,
}

impl<'a> LocationResolver<'a> {
    pub fn new(fetcher: &'a Fetcher, geo_url: &'a str, api_key: &'a str) -> Self {
        Self {
            fetcher,
            geo_url,
            api_key,
        }
    }

    pub async fn resolve(&self, location: &str) -> Result<Coordinate, WeatherError> {
        if let Some(coordinate) = parse_coordinates(location) {
            tracing::debug!("Parsed '{}' as coordinates", location);
            return Ok(coordinate);
        }

        self.geocode(location).await
    }

    async fn geocode(&self, location: &str) -> Result<Coordinate, WeatherError> {
        tracing::debug!("Geocoding location: {}", location);

        let url = format!("{}/direct", self.geo_url);
        let query = [
            ("q", location.to_string()),
            ("limit", "1".to_string()),
            ("appid", self.api_key.to_string()),
        ];

        let data = self.fetcher.fetch(&url, &query).await?;
        let first = data
            .as_array()
            .and_then(|results| results.first())
            .ok_or_else(|| {
                WeatherError::ResolutionFailure(format!("Location '{}' not found.", location))
            })?;

        coordinate_from_geocoding(first)
    }
}

fn coordinate_from_geocoding(result: &Value) -> Result<Coordinate, WeatherError> {
    let field = |name: &str| {
        result.get(name).and_then(Value::as_f64).ok_or_else(|| {
            WeatherError::ResolutionFailure(format!(
                "Failed to parse geocoding response: missing '{}'",
                name
            ))
        })
    };

    let latitude = field("lat")?;
    let longitude = field("lon")?;
    Coordinate::new(latitude, longitude).ok_or_else(|| {
        WeatherError::ResolutionFailure(format!(
            "Failed to parse geocoding response: coordinates out of range ({}, {})",
            latitude, longitude
        ))
    })
}
