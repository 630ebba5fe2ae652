//! Open-Meteo forecast client.
//!
//! One request returns current conditions plus hourly and daily series, in
//! the location's local time (`timezone=auto`).

use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;
use url::Url;
use weatherdash_core::{NetworkError, ReqwestErrorExt, WeatherConfig, WeatherError};

/// Days requested from the provider.
pub const FORECAST_DAYS: u32 = 5;

const CURRENT_VARIABLES: &str = "temperature_2m,weather_code,wind_speed_10m,relative_humidity_2m,apparent_temperature,precipitation";
const HOURLY_VARIABLES: &str =
    "temperature_2m,weather_code,precipitation_probability,wind_speed_10m,relative_humidity_2m";
const DAILY_VARIABLES: &str = "weather_code,temperature_2m_max,temperature_2m_min,precipitation_sum";

/// Provider response, as sent.
#[derive(Debug, Clone, Deserialize)]
pub struct RawWeatherPayload {
    pub current: RawCurrent,
    pub hourly: RawHourly,
    pub daily: RawDaily,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCurrent {
    #[serde(default)]
    pub time: Option<String>,
    pub temperature_2m: f64,
    pub apparent_temperature: f64,
    pub relative_humidity_2m: f64,
    pub wind_speed_10m: f64,
    /// Open-Meteo sends null here for some grid cells
    #[serde(default)]
    pub precipitation: Option<f64>,
    pub weather_code: i32,
}

/// Parallel arrays; index `i` in each describes the same hour. Any element
/// except the timestamp may be null.
#[derive(Debug, Clone, Deserialize)]
pub struct RawHourly {
    pub time: Vec<String>,
    pub temperature_2m: Vec<Option<f64>>,
    pub weather_code: Vec<Option<i32>>,
    pub precipitation_probability: Vec<Option<f64>>,
    pub wind_speed_10m: Vec<Option<f64>>,
    #[serde(default)]
    pub relative_humidity_2m: Option<Vec<Option<f64>>>,
}

/// Parallel arrays; index `i` in each describes the same day.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDaily {
    pub time: Vec<String>,
    pub temperature_2m_max: Vec<f64>,
    pub temperature_2m_min: Vec<f64>,
    pub weather_code: Vec<i32>,
    #[serde(default)]
    pub precipitation_sum: Option<Vec<Option<f64>>>,
}

/// Fetches forecasts for a coordinate pair.
#[derive(Debug, Clone)]
pub struct WeatherFetcher {
    client: Arc<Client>,
    base_url: String,
}

impl WeatherFetcher {
    /// No request timeout is set; the transport default applies.
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        Self::with_base_url(&config.forecast_url, &config.user_agent)
    }

    pub fn with_base_url(base_url: &str, user_agent: &str) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| WeatherError::FetchFailed(e.into_network_error()))?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn forecast_url(&self, latitude: f64, longitude: f64) -> Result<Url, WeatherError> {
        let endpoint = format!("{}/v1/forecast", self.base_url);
        let latitude = latitude.to_string();
        let longitude = longitude.to_string();
        let forecast_days = FORECAST_DAYS.to_string();
        let url = Url::parse_with_params(
            &endpoint,
            [
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("current", CURRENT_VARIABLES),
                ("hourly", HOURLY_VARIABLES),
                ("daily", DAILY_VARIABLES),
                ("timezone", "auto"),
                ("forecast_days", forecast_days.as_str()),
            ],
        )
        .map_err(|e| {
            WeatherError::FetchFailed(NetworkError::ConnectionFailed(format!(
                "Invalid forecast URL {}: {}",
                endpoint, e
            )))
        })?;
        Ok(url)
    }

    /// Fetch current, hourly and daily data in one call.
    ///
    /// Any transport error, non-2xx status or malformed body is a
    /// `FetchFailed`; callers must not display partial data.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<RawWeatherPayload, WeatherError> {
        let url = self.forecast_url(latitude, longitude)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| WeatherError::FetchFailed(e.into_network_error()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::debug!("Forecast returned status {}: {}", status, text);
            return Err(WeatherError::FetchFailed(NetworkError::ServerError {
                status: status.as_u16(),
                message: text,
            }));
        }

        let payload: RawWeatherPayload = response.json().await.map_err(|e| {
            WeatherError::FetchFailed(NetworkError::InvalidResponse(format!(
                "JSON parse error: {}",
                e
            )))
        })?;

        tracing::debug!(
            "Forecast received: {} hourly, {} daily entries",
            payload.hourly.time.len(),
            payload.daily.time.len()
        );
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forecast_url_carries_fixed_parameters() {
        let fetcher = WeatherFetcher::with_base_url("https://api.open-meteo.com/", "test").unwrap();
        let url = fetcher.forecast_url(48.8566, 2.3522).unwrap();

        assert_eq!(url.path(), "/v1/forecast");
        let params: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(params["latitude"], "48.8566");
        assert_eq!(params["longitude"], "2.3522");
        assert_eq!(params["timezone"], "auto");
        assert_eq!(params["forecast_days"], "5");
        assert!(params["current"].contains("apparent_temperature"));
        assert!(params["hourly"].contains("precipitation_probability"));
        assert!(params["daily"].contains("temperature_2m_max"));
    }

    #[test]
    fn payload_tolerates_nulls() {
        let json = serde_json::json!({
            "current": {
                "time": "2024-06-01T14:00",
                "temperature_2m": 21.4,
                "apparent_temperature": 20.9,
                "relative_humidity_2m": 55,
                "wind_speed_10m": 12.3,
                "precipitation": null,
                "weather_code": 2
            },
            "hourly": {
                "time": ["2024-06-01T00:00", "2024-06-01T01:00"],
                "temperature_2m": [15.0, null],
                "weather_code": [1, null],
                "precipitation_probability": [null, 20],
                "wind_speed_10m": [4.0, null]
            },
            "daily": {
                "time": ["2024-06-01"],
                "temperature_2m_max": [22.0],
                "temperature_2m_min": [12.0],
                "weather_code": [2]
            }
        });

        let payload: RawWeatherPayload = serde_json::from_value(json).unwrap();
        assert_eq!(payload.current.precipitation, None);
        assert_eq!(payload.hourly.temperature_2m, vec![Some(15.0), None]);
        assert_eq!(payload.hourly.weather_code, vec![Some(1), None]);
        assert_eq!(payload.hourly.precipitation_probability, vec![None, Some(20.0)]);
        assert_eq!(payload.hourly.wind_speed_10m, vec![Some(4.0), None]);
        assert!(payload.hourly.relative_humidity_2m.is_none());
        assert!(payload.daily.precipitation_sum.is_none());
    }
}
