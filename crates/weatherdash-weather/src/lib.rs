//! Weather data pipeline for weatherdash
//!
//! Geocoding via Nominatim, forecasts via Open-Meteo, and normalization of
//! the raw payload into the dashboard's view model.

pub mod codes;
pub mod geocode;
pub mod location;
pub mod model;
pub mod provider;
pub mod types;

pub use codes::{code_to_description, code_to_icon, WeatherCode, WeatherCodeInfo};
pub use geocode::GeoResolver;
pub use location::{ConfiguredLocator, DeviceLocator};
pub use model::{
    format_speed, format_temperature, normalize_current, normalize_daily, normalize_hourly,
};
pub use provider::{RawCurrent, RawDaily, RawHourly, RawWeatherPayload, WeatherFetcher};
pub use types::*;
