//! Error types for weatherdash.
//!
//! `WeatherError` is what the dashboard banner shows; `AppError` is what the
//! binary reports when it can't start at all.

use thiserror::Error;

/// Startup failure, as reported by the `weatherdash` binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0:#}")]
    Other(anyhow::Error),
}

impl AppError {
    /// Recover the typed error at the root of an `anyhow` chain, so context
    /// added along the way doesn't hide which message to show.
    pub fn from_anyhow(err: anyhow::Error) -> Self {
        let err = match err.downcast::<ConfigError>() {
            Ok(config) => return AppError::Config(config),
            Err(err) => err,
        };
        let err = match err.downcast::<WeatherError>() {
            Ok(weather) => return AppError::Weather(weather),
            Err(err) => err,
        };
        match err.downcast::<std::io::Error>() {
            Ok(io) => AppError::Io(io),
            Err(err) => AppError::Other(err),
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => e.user_message().to_string(),
            AppError::Weather(e) => e.user_message(),
            AppError::Io(e) => format!("Could not read or write a file: {}", e),
            AppError::Other(_) => "weatherdash could not start.".to_string(),
        }
    }
}

/// Why an HTTP exchange with the geocoder or forecast provider failed.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check config.toml.",
            ConfigError::ParseError(_) => "config.toml is not valid TOML.",
        }
    }
}

/// Weather pipeline errors, as surfaced in the error banner.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The user's query matched no place.
    #[error("Location not found: {0}")]
    NotFound(String),

    /// Geocoding transport or parse failure.
    #[error("Location lookup failed: {0}")]
    LookupFailed(#[source] NetworkError),

    /// Weather provider transport or parse failure.
    #[error("Weather fetch failed: {0}")]
    FetchFailed(#[source] NetworkError),

    /// Device location unavailable or refused.
    #[error("Device location denied: {0}")]
    GeolocationDenied(String),

    /// No device location capability at all.
    #[error("Device location is not supported")]
    UnsupportedEnvironment,
}

impl WeatherError {
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::NotFound(query) => {
                format!("City \"{}\" not found. Please try again.", query)
            }
            WeatherError::LookupFailed(_) => {
                "Error searching for city. Please try again.".to_string()
            }
            WeatherError::FetchFailed(_) => {
                "Error fetching weather data. Please try again.".to_string()
            }
            WeatherError::GeolocationDenied(_) => {
                "Error getting your location. Please enable location access.".to_string()
            }
            WeatherError::UnsupportedEnvironment => {
                "Geolocation is not supported on this device.".to_string()
            }
        }
    }
}

/// Classify `reqwest` failures.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            return NetworkError::Timeout;
        }
        if let Some(status) = self.status() {
            return NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            };
        }
        if self.is_decode() || self.is_body() {
            return NetworkError::InvalidResponse(self.to_string());
        }
        // connect errors and anything unclassified
        NetworkError::ConnectionFailed(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_banner_messages() {
        let cases = [
            (
                WeatherError::NotFound("Atlantis".into()),
                "City \"Atlantis\" not found. Please try again.",
            ),
            (
                WeatherError::LookupFailed(NetworkError::Timeout),
                "Error searching for city. Please try again.",
            ),
            (
                WeatherError::FetchFailed(NetworkError::InvalidResponse("eof".into())),
                "Error fetching weather data. Please try again.",
            ),
            (
                WeatherError::GeolocationDenied("disabled".into()),
                "Error getting your location. Please enable location access.",
            ),
            (
                WeatherError::UnsupportedEnvironment,
                "Geolocation is not supported on this device.",
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.user_message(), expected, "{:?}", err);
        }
    }

    #[test]
    fn test_from_anyhow_finds_config_error_under_context() {
        let err = Err::<(), _>(ConfigError::ParseError("line 3".into()))
            .context("Failed to parse config file")
            .unwrap_err();

        let app = AppError::from_anyhow(err);
        assert!(matches!(app, AppError::Config(ConfigError::ParseError(_))));
        assert_eq!(app.user_message(), "config.toml is not valid TOML.");
    }

    #[test]
    fn test_from_anyhow_finds_weather_and_io_errors() {
        let app = AppError::from_anyhow(anyhow::Error::new(WeatherError::UnsupportedEnvironment));
        assert!(matches!(
            app,
            AppError::Weather(WeatherError::UnsupportedEnvironment)
        ));

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let app = AppError::from_anyhow(anyhow::Error::new(io));
        assert!(matches!(app, AppError::Io(_)));
        assert!(app.user_message().contains("read-only"));
    }

    #[test]
    fn test_from_anyhow_falls_back_to_other() {
        let app = AppError::from_anyhow(anyhow::anyhow!("logger already set"));
        assert!(matches!(app, AppError::Other(_)));
        assert_eq!(app.user_message(), "weatherdash could not start.");
    }

    #[test]
    fn test_source_is_preserved() {
        use std::error::Error as _;

        let err = WeatherError::FetchFailed(NetworkError::ServerError {
            status: 502,
            message: "bad gateway".into(),
        });
        let source = err.source().map(|s| s.to_string()).unwrap_or_default();
        assert!(source.contains("502"));
    }
}
