//! MCP server exposing OpenWeatherMap current weather, forecast and air
//! quality as tools.

pub mod client;
pub mod config;
pub mod constants;
pub mod dispatcher;
pub mod error;
pub mod fetcher;
pub mod formatters;
pub mod location;
pub mod models;
pub mod service;

pub use config::Config;
pub use dispatcher::{Dispatcher, ToolDescriptor, ToolKind, ToolOutput};
pub use error::WeatherError;
pub use fetcher::{Fetcher, RetryPolicy};
pub use location::{Coordinate, LocationResolver};
pub use models::TemperatureUnit;
pub use service::Weather;
