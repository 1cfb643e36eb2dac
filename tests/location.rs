//! Integration tests for location resolution against a mock geocoding API.

use std::time::Duration;

use serde_json::json;
use weather_mcp_server::{Coordinate, Fetcher, LocationResolver, RetryPolicy, WeatherError};
use wiremock::matchers::{any, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-key";

fn fetcher() -> Fetcher {
    Fetcher::with_policy(RetryPolicy {
        rate_limit_base_delay: Duration::from_millis(5),
        timeout_delay: Duration::from_millis(5),
        ..RetryPolicy::default()
    })
    .unwrap()
}

async fn mount_geocoding(mock_server: &MockServer, query: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/direct"))
        .and(query_param("q", query))
        .and(query_param("limit", "1"))
        .and(query_param("appid", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_coordinates_skip_geocoding() {
    let mock_server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let fetcher = fetcher();
    let geo_url = mock_server.uri();
    let resolver = LocationResolver::new(&fetcher, &geo_url, API_KEY);

    let coordinate = resolver.resolve("51.5074,-0.1278").await.unwrap();
    assert_eq!(coordinate.latitude, 51.5074);
    assert_eq!(coordinate.longitude, -0.1278);

    let coordinate = resolver.resolve("89.9,-179.9").await.unwrap();
    assert_eq!(coordinate, Coordinate::new(89.9, -179.9).unwrap());
}

#[tokio::test]
async fn test_city_name_is_geocoded() {
    let mock_server = MockServer::start().await;
    mount_geocoding(
        &mock_server,
        "London",
        json!([{ "name": "London", "lat": 51.5074, "lon": -0.1278, "country": "GB" }]),
    )
    .await;

    let fetcher = fetcher();
    let geo_url = mock_server.uri();
    let resolver = LocationResolver::new(&fetcher, &geo_url, API_KEY);

    let coordinate = resolver.resolve("London").await.unwrap();
    assert_eq!(coordinate, Coordinate::new(51.5074, -0.1278).unwrap());
}

#[tokio::test]
async fn test_unknown_city_is_not_found() {
    let mock_server = MockServer::start().await;
    mount_geocoding(&mock_server, "InvalidCity123", json!([])).await;

    let fetcher = fetcher();
    let geo_url = mock_server.uri();
    let resolver = LocationResolver::new(&fetcher, &geo_url, API_KEY);

    let err = resolver.resolve("InvalidCity123").await.unwrap_err();
    assert!(matches!(err, WeatherError::ResolutionFailure(_)), "got {:?}", err);
    assert!(err.to_string().contains("not found"));
}

#[tokio::test]
async fn test_invalid_coordinate_string_falls_back_to_geocoding() {
    let mock_server = MockServer::start().await;
    mount_geocoding(&mock_server, "invalid,coordinates,string", json!([])).await;

    let fetcher = fetcher();
    let geo_url = mock_server.uri();
    let resolver = LocationResolver::new(&fetcher, &geo_url, API_KEY);

    let err = resolver
        .resolve("invalid,coordinates,string")
        .await
        .unwrap_err();
    assert!(matches!(err, WeatherError::ResolutionFailure(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_out_of_range_pair_falls_back_to_geocoding() {
    let mock_server = MockServer::start().await;
    mount_geocoding(
        &mock_server,
        "120,40",
        json!([{ "lat": 40.0, "lon": 120.0 }]),
    )
    .await;

    let fetcher = fetcher();
    let geo_url = mock_server.uri();
    let resolver = LocationResolver::new(&fetcher, &geo_url, API_KEY);

    let coordinate = resolver.resolve("120,40").await.unwrap();
    assert_eq!(coordinate, Coordinate::new(40.0, 120.0).unwrap());
}

#[tokio::test]
async fn test_malformed_geocoding_response() {
    let mock_server = MockServer::start().await;
    mount_geocoding(&mock_server, "Springfield", json!([{ "name": "Springfield" }])).await;

    let fetcher = fetcher();
    let geo_url = mock_server.uri();
    let resolver = LocationResolver::new(&fetcher, &geo_url, API_KEY);

    let err = resolver.resolve("Springfield").await.unwrap_err();
    assert!(matches!(err, WeatherError::ResolutionFailure(_)), "got {:?}", err);
    assert!(err.to_string().contains("Failed to parse geocoding response"));
}

#[tokio::test]
async fn test_geocoding_upstream_errors_propagate() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/direct"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = fetcher();
    let geo_url = mock_server.uri();
    let resolver = LocationResolver::new(&fetcher, &geo_url, API_KEY);

    let err = resolver.resolve("Paris").await.unwrap_err();
    assert!(matches!(err, WeatherError::AuthInvalid), "got {:?}", err);
}
