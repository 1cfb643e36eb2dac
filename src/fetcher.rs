//! HTTP GET with failure classification and bounded retries.
//!
//! Only rate limits (429) and timeouts are retried. Rate limits back off
//! exponentially, timeouts wait a flat delay. Every other failure is
//! returned on the attempt that produced it.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::constants::{
    DEFAULT_MAX_RETRIES, RATE_LIMIT_BASE_DELAY, REQUEST_TIMEOUT, TIMEOUT_RETRY_DELAY, USER_AGENT,
};
use crate::error::WeatherError;

/// Retry and timeout settings for a [`Fetcher`]
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts per fetch (at least one is always made)
    pub max_retries: u32,
    /// Timeout applied to each attempt
    pub request_timeout: Duration,
    /// Delay after the first 429; doubles on each further attempt
    pub rate_limit_base_delay: Duration,
    /// Delay after a timed-out attempt
    pub timeout_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            request_timeout: REQUEST_TIMEOUT,
            rate_limit_base_delay: RATE_LIMIT_BASE_DELAY,
            timeout_delay: TIMEOUT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Backoff before the attempt following a failed `attempt` (0-indexed).
    pub fn delay_for(&self, error: &WeatherError, attempt: u32) -> Option<Duration> {
        match error {
            WeatherError::RateLimited => {
                let factor = 2u32.saturating_pow(attempt);
                Some(self.rate_limit_base_delay.saturating_mul(factor))
            }
            WeatherError::Timeout => Some(self.timeout_delay),
            _ => None,
        }
    }
}

/// Attempt bookkeeping for a single fetch call.
#[derive(Debug)]
struct RetryState {
    attempt: u32,
    max_retries: u32,
}

impl RetryState {
    fn new(max_retries: u32) -> Self {
        Self {
            attempt: 0,
            max_retries: max_retries.max(1),
        }
    }

    /// Decides whether to retry after `error`; advances the counter when it does.
    fn next_delay(&mut self, error: &WeatherError, policy: &RetryPolicy) -> Option<Duration> {
        if !error.is_transient() || self.attempt + 1 >= self.max_retries {
            return None;
        }
        let delay = policy.delay_for(error, self.attempt)?;
        self.attempt += 1;
        Some(delay)
    }
}

/// Shared HTTP fetcher; cheap to clone.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    policy: RetryPolicy,
}

impl Fetcher {
    pub fn new() -> Result<Self, WeatherError> {
        Self::with_policy(RetryPolicy::default())
    }

    pub fn with_policy(policy: RetryPolicy) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(WeatherError::NetworkFailure)?;

        Ok(Self { client, policy })
    }

    /// GETs `url` with `query` and returns the decoded JSON body.
    pub async fn fetch(&self, url: &str, query: &[(&str, String)]) -> Result<Value, WeatherError> {
        let mut state = RetryState::new(self.policy.max_retries);

        loop {
            let error = match self.attempt(url, query).await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            match state.next_delay(&error, &self.policy) {
                Some(delay) => {
                    tracing::warn!(
                        "{}, retrying in {:?} (attempt {} of {})",
                        error,
                        delay,
                        state.attempt,
                        state.max_retries
                    );
                    tokio::time::sleep(delay).await;
                }
                None => return Err(error),
            }
        }
    }

    /// One request, with the outcome classified into a [`WeatherError`] kind.
    async fn attempt(&self, url: &str, query: &[(&str, String)]) -> Result<Value, WeatherError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .timeout(self.policy.request_timeout)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED => Err(WeatherError::AuthInvalid),
            StatusCode::NOT_FOUND => Err(WeatherError::NotFound),
            StatusCode::TOO_MANY_REQUESTS => Err(WeatherError::RateLimited),
            status if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                Err(WeatherError::HttpError {
                    status: status.as_u16(),
                    body: truncate_body(&body),
                })
            }
            _ => response.json::<Value>().await.map_err(|e| {
                if e.is_timeout() {
                    WeatherError::Timeout
                } else if e.is_decode() {
                    WeatherError::InvalidPayload(e.to_string())
                } else {
                    WeatherError::NetworkFailure(e.without_url())
                }
            }),
        }
    }
}

/// The request URL carries the API key, so it is stripped before the error is kept.
fn classify_transport_error(error: reqwest::Error) -> WeatherError {
    if error.is_timeout() {
        WeatherError::Timeout
    } else {
        WeatherError::NetworkFailure(error.without_url())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX_CHARS: usize = 200;
    let mut chars = body.char_indices();
    match chars.nth(MAX_CHARS) {
        Some((end, _)) => format!("{}...", &body[..end]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_backoff_doubles() {
        let policy = RetryPolicy::default();

        assert_eq!(
            policy.delay_for(&WeatherError::RateLimited, 0),
            Some(Duration::from_secs(1))
        );
        assert_eq!(
            policy.delay_for(&WeatherError::RateLimited, 1),
            Some(Duration::from_secs(2))
        );
        assert_eq!(
            policy.delay_for(&WeatherError::RateLimited, 2),
            Some(Duration::from_secs(4))
        );
    }

    #[test]
    fn test_timeout_backoff_is_flat() {
        let policy = RetryPolicy::default();

        for attempt in 0..3 {
            assert_eq!(
                policy.delay_for(&WeatherError::Timeout, attempt),
                Some(Duration::from_secs(1))
            );
        }
    }

    #[test]
    fn test_permanent_errors_have_no_backoff() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(&WeatherError::AuthInvalid, 0), None);
        assert_eq!(policy.delay_for(&WeatherError::NotFound, 0), None);
    }

    #[test]
    fn test_retry_state_sums_to_three_seconds_before_third_attempt() {
        let policy = RetryPolicy::default();
        let mut state = RetryState::new(3);

        let first = state.next_delay(&WeatherError::RateLimited, &policy);
        let second = state.next_delay(&WeatherError::RateLimited, &policy);
        let third = state.next_delay(&WeatherError::RateLimited, &policy);

        assert_eq!(first, Some(Duration::from_secs(1)));
        assert_eq!(second, Some(Duration::from_secs(2)));
        assert_eq!(third, None, "third failure exhausts three attempts");
    }

    #[test]
    fn test_retry_state_never_retries_permanent_errors() {
        let policy = RetryPolicy::default();
        let mut state = RetryState::new(3);

        assert_eq!(state.next_delay(&WeatherError::NotFound, &policy), None);
        assert_eq!(state.attempt, 0);
    }

    #[test]
    fn test_truncate_body() {
        assert_eq!(truncate_body("boom"), "boom");

        let page = "é".repeat(500);
        let truncated = truncate_body(&page);
        assert_eq!(truncated.chars().count(), 203);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_zero_retries_still_allows_one_attempt() {
        let state = RetryState::new(0);
        assert_eq!(state.max_retries, 1);
    }
}
