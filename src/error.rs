//! Error taxonomy shared by the fetcher, resolver, client and dispatcher.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Invalid API key. Please check your OPENWEATHER_API_KEY environment variable.")]
    AuthInvalid,

    #[error("Location not found. Please check the city name or coordinates.")]
    NotFound,

    #[error("Rate limit exceeded. Please try again later or upgrade your API plan.")]
    RateLimited,

    #[error("Request timed out after multiple retries.")]
    Timeout,

    #[error("Network error: {0}")]
    NetworkFailure(#[source] reqwest::Error),

    #[error("HTTP error {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("Invalid response from weather service: {0}")]
    InvalidPayload(String),

    #[error("{0}")]
    ResolutionFailure(String),

    #[error("{0}")]
    ValidationFailure(String),

    #[error("{0}")]
    ConfigurationMissing(String),
}

impl WeatherError {
    /// Rate limits and timeouts are retried by the fetcher; everything else fails fast.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited | Self::Timeout)
    }

    /// Single-line message for the protocol boundary.
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        message.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}
