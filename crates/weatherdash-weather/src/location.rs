//! Device position lookup.

use async_trait::async_trait;
use weatherdash_core::{DeviceLocationConfig, WeatherError};

use crate::types::Coordinates;

/// Source of the device's current position.
#[async_trait]
pub trait DeviceLocator: Send + Sync {
    /// `GeolocationDenied` when access is refused; `UnsupportedEnvironment`
    /// when there is no position source at all.
    async fn current_position(&self) -> Result<Coordinates, WeatherError>;
}

/// Locator backed by fixed coordinates from the config file.
#[derive(Debug, Clone)]
pub struct ConfiguredLocator {
    enabled: bool,
    position: Option<Coordinates>,
}

impl ConfiguredLocator {
    pub fn new(config: &DeviceLocationConfig) -> Self {
        let position = match (config.latitude, config.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        };

        Self {
            enabled: config.enabled,
            position,
        }
    }
}

#[async_trait]
impl DeviceLocator for ConfiguredLocator {
    async fn current_position(&self) -> Result<Coordinates, WeatherError> {
        if !self.enabled {
            return Err(WeatherError::GeolocationDenied(
                "device location is disabled in the config".to_string(),
            ));
        }

        self.position.ok_or(WeatherError::UnsupportedEnvironment)
    }
}
