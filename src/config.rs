use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};

use crate::constants::{
    API_KEY_ENV, API_KEY_PLACEHOLDER, BASE_URL_ENV, ENV_FILE, GEO_URL_ENV, OPENWEATHER_API_BASE,
    OPENWEATHER_GEO_BASE,
};
use crate::error::WeatherError;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    api_key: Option<String>,
    /// Base URL for weather, forecast and air pollution endpoints
    pub base_url: String,
    /// Base URL for the geocoding endpoint
    pub geo_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: OPENWEATHER_API_BASE.to_string(),
            geo_url: OPENWEATHER_GEO_BASE.to_string(),
        }
    }
}

impl Config {
    /// Creates a config with the given API key and the public endpoints.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: normalize_api_key(api_key.into()),
            ..Self::default()
        }
    }

    /// Reads configuration from the process environment, falling back to a
    /// `.env` file in the working directory when one exists.
    pub fn load() -> Result<Self> {
        Self::load_with_env_file(Path::new(ENV_FILE), |key| std::env::var(key).ok())
    }

    /// Variables from `env` win over the same keys in the file at `path`.
    /// A missing file is not an error.
    pub fn load_with_env_file<F>(path: &Path, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file_vars = read_env_file(path)?;
        Ok(Self::from_lookup(|key| {
            env(key).or_else(|| file_vars.get(key).cloned())
        }))
    }

    /// Reads configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            api_key: lookup(API_KEY_ENV).and_then(normalize_api_key),
            base_url: lookup(BASE_URL_ENV)
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty())
                .unwrap_or(defaults.base_url),
            geo_url: lookup(GEO_URL_ENV)
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty())
                .unwrap_or(defaults.geo_url),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_geo_url(mut self, geo_url: impl Into<String>) -> Self {
        self.geo_url = geo_url.into();
        self
    }

    /// Returns the API key or a configuration error naming the variable to set.
    pub fn require_api_key(&self) -> Result<&str, WeatherError> {
        self.api_key.as_deref().ok_or_else(|| {
            WeatherError::ConfigurationMissing(format!(
                "{} environment variable is not set. Please configure your API key in the {} file.",
                API_KEY_ENV, ENV_FILE
            ))
        })
    }

    /// API key with everything but the first and last four characters hidden.
    pub fn masked_api_key(&self) -> Option<String> {
        let key = self.api_key.as_deref()?;
        let chars: Vec<char> = key.chars().collect();
        if chars.len() <= 8 {
            return Some("*".repeat(chars.len()));
        }

        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        Some(format!("{}{}{}", head, "*".repeat(chars.len() - 8), tail))
    }
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(e) if e.not_found() => return Ok(HashMap::new()),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to open {}", path.display()));
        }
    };

    entries
        .map(|entry| entry.with_context(|| format!("Failed to parse {}", path.display())))
        .collect()
}

fn normalize_api_key(raw: String) -> Option<String> {
    let key = raw.trim();
    if key.is_empty() || key == API_KEY_PLACEHOLDER {
        None
    } else {
        Some(key.to_string())
    }
}
