use axum::http::StatusCode;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

use super::models::{ForecastApiResponse, WeatherSnapshot};
use crate::cache::{normalize_cache_key, WeatherCache};
use crate::error::HttpError;
use crate::impl_into_response;

/// Days of forecast requested; the impact analysis looks three days ahead
const FORECAST_DAYS: &str = "3";

/// WeatherAPI.com error code for an unknown location
const NO_MATCHING_LOCATION: u32 = 1006;

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Failed to fetch weather data: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("Weather provider rejected the API key")]
    Unauthorized,

    #[error("API error: {0}")]
    ApiError(String),
}

impl HttpError for WeatherError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::LocationNotFound(_) => StatusCode::NOT_FOUND,
            Self::RequestError(_) => StatusCode::BAD_GATEWAY,
            Self::Unauthorized => StatusCode::SERVICE_UNAVAILABLE,
            Self::ApiError(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::LocationNotFound(_) => Some("LOCATION_NOT_FOUND"),
            Self::RequestError(_) => Some("REQUEST_ERROR"),
            Self::Unauthorized => Some("WEATHER_PROVIDER_UNAUTHORIZED"),
            Self::ApiError(_) => Some("API_ERROR"),
        }
    }
}

impl_into_response!(WeatherError);

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: ProviderError,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    code: u32,
    message: String,
}

pub struct WeatherService {
    client: Client,
    api_key: String,
    base_url: String,
    cache: WeatherCache,
}

impl WeatherService {
    pub fn new(client: Client, api_key: &str, base_url: &str, cache: WeatherCache) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            cache,
        }
    }

    /// Current conditions, hourly and daily forecast and astronomy for a
    /// location ("Mumbai", "10001", "19.07,72.87").
    ///
    /// Snapshots are cached per location for the configured TTL.
    pub async fn get_snapshot(&self, location: &str) -> Result<Arc<WeatherSnapshot>, WeatherError> {
        let cache_key = normalize_cache_key(location);

        if let Some(cached) = self.cache.get(&cache_key) {
            tracing::debug!(location = %location, "Weather cache hit");
            metrics::counter!("astroview_weather_cache_total", "result" => "hit").increment(1);
            return Ok(cached);
        }

        tracing::debug!(location = %location, "Weather cache miss");
        metrics::counter!("astroview_weather_cache_total", "result" => "miss").increment(1);

        let snapshot = Arc::new(self.fetch_snapshot(location).await?);
        self.cache.insert(cache_key, Arc::clone(&snapshot));

        Ok(snapshot)
    }

    async fn fetch_snapshot(&self, location: &str) -> Result<WeatherSnapshot, WeatherError> {
        let url = format!("{}/forecast.json", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", location),
                ("days", FORECAST_DAYS),
                ("alerts", "no"),
                ("aqi", "no"),
            ])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(status = %status, "Received weather provider response");

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(WeatherError::Unauthorized);
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Self::classify_error(location, status, &text));
        }

        let data: ForecastApiResponse = response.json().await?;
        let snapshot = WeatherSnapshot::from(data);

        tracing::info!(
            location = %snapshot.location.name,
            temp = %snapshot.current.temperature_c,
            hours = snapshot.hourly.len(),
            "Weather data fetched successfully"
        );

        Ok(snapshot)
    }

    fn classify_error(location: &str, status: reqwest::StatusCode, body: &str) -> WeatherError {
        match serde_json::from_str::<ProviderErrorBody>(body) {
            Ok(parsed) if parsed.error.code == NO_MATCHING_LOCATION => {
                WeatherError::LocationNotFound(location.to_string())
            }
            Ok(parsed) => WeatherError::ApiError(parsed.error.message),
            Err(_) => WeatherError::ApiError(format!("HTTP {}", status)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_unknown_location() {
        let body = r#"{"error":{"code":1006,"message":"No matching location found."}}"#;
        let err = WeatherService::classify_error("Atlantis", reqwest::StatusCode::BAD_REQUEST, body);

        assert!(matches!(err, WeatherError::LocationNotFound(ref l) if l == "Atlantis"));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_classify_other_provider_error() {
        let body = r#"{"error":{"code":9999,"message":"Internal application error."}}"#;
        let err = WeatherService::classify_error("Oslo", reqwest::StatusCode::BAD_REQUEST, body);

        assert!(matches!(err, WeatherError::ApiError(ref m) if m == "Internal application error."));
        assert_eq!(err.error_code(), Some("API_ERROR"));
    }

    #[test]
    fn test_classify_unparseable_error_body() {
        let err = WeatherService::classify_error(
            "Oslo",
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            "<html>oops</html>",
        );

        assert!(matches!(err, WeatherError::ApiError(ref m) if m.contains("500")));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let cache = crate::cache::create_weather_cache(std::time::Duration::from_secs(60));
        let service = WeatherService::new(Client::new(), "key", "https://api.weatherapi.com/v1/", cache);

        assert_eq!(service.base_url, "https://api.weatherapi.com/v1");
    }
}
