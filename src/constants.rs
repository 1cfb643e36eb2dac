use std::time::Duration;

/// User agent string for HTTP requests
pub const USER_AGENT: &str = "weather-mcp-server/0.1.0";

/// OpenWeatherMap data API base URL
pub const OPENWEATHER_API_BASE: &str = "https://api.openweathermap.org/data/2.5";

/// OpenWeatherMap geocoding API base URL
pub const OPENWEATHER_GEO_BASE: &str = "https://api.openweathermap.org/geo/1.0";

pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";
pub const BASE_URL_ENV: &str = "OPENWEATHER_BASE_URL";
pub const GEO_URL_ENV: &str = "OPENWEATHER_GEO_URL";

/// Optional dotenv file read at startup
pub const ENV_FILE: &str = ".env";

/// Value shipped in sample env files; treated the same as a missing key.
pub const API_KEY_PLACEHOLDER: &str = "your_api_key_here";

/// Per-attempt HTTP timeout
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Total attempts per fetch
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Base of the exponential backoff after a 429
pub const RATE_LIMIT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Flat delay after a timed-out attempt
pub const TIMEOUT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Forecast entries rendered (3-hour steps, so the next 24 hours)
pub const FORECAST_ENTRY_LIMIT: usize = 8;

/// Appended to every successful report
pub const USAGE_NOTICE: &str =
    "Note: OpenWeatherMap free tier allows 1,000 calls/day. Please use responsibly.";
