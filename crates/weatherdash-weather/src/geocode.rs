//! Forward and reverse geocoding.
//! Uses Nominatim (OpenStreetMap) - free, no API key required.

use crate::types::{Coordinates, Location, CURRENT_LOCATION_NAME};
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;
use url::Url;
use weatherdash_core::{NetworkError, ReqwestErrorExt, WeatherConfig, WeatherError};

/// Most suggestions returned for a partial query.
pub const MAX_SUGGESTIONS: usize = 5;
/// Shorter queries never reach the network.
pub const MIN_SUGGEST_CHARS: usize = 2;

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    address: Option<NominatimAddress>,
    #[serde(default)]
    lat: Option<String>,
    #[serde(default)]
    lon: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    country: Option<String>,
}

impl NominatimPlace {
    /// city > town > name for the primary place name
    fn place_name(&self) -> Option<String> {
        self.address
            .as_ref()
            .and_then(|a| a.city.clone().or_else(|| a.town.clone()))
            .or_else(|| self.name.clone())
            .filter(|n| !n.is_empty())
    }

    fn country(&self) -> String {
        self.address
            .as_ref()
            .and_then(|a| a.country.clone())
            .unwrap_or_default()
    }

    /// Nominatim encodes coordinates as strings.
    fn coordinates(&self) -> Result<Coordinates, NetworkError> {
        let parse = |field: &str, value: Option<&String>| -> Result<f64, NetworkError> {
            value
                .ok_or_else(|| NetworkError::InvalidResponse(format!("place without {}", field)))?
                .trim()
                .parse::<f64>()
                .map_err(|e| NetworkError::InvalidResponse(format!("bad {}: {}", field, e)))
        };
        Ok(Coordinates {
            latitude: parse("lat", self.lat.as_ref())?,
            longitude: parse("lon", self.lon.as_ref())?,
        })
    }

    fn into_location(self) -> Result<Location, NetworkError> {
        let coords = self.coordinates()?;
        let name = self.place_name().unwrap_or_default();
        Ok(Location::new(
            name,
            self.country(),
            coords.latitude,
            coords.longitude,
        ))
    }
}

/// Resolves place names to coordinates and back.
#[derive(Debug, Clone)]
pub struct GeoResolver {
    client: Client,
    base_url: String,
}

impl GeoResolver {
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        Self::with_base_url(&config.geocoding_url, &config.user_agent)
    }

    pub fn with_base_url(base_url: &str, user_agent: &str) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| WeatherError::LookupFailed(e.into_network_error()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, NetworkError> {
        let endpoint = format!("{}/{}", self.base_url, path);
        Url::parse_with_params(
            &endpoint,
            params
                .iter()
                .copied()
                .chain([("format", "json"), ("addressdetails", "1")]),
        )
        .map_err(|e| NetworkError::ConnectionFailed(format!("Invalid URL {}: {}", endpoint, e)))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, NetworkError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ReqwestErrorExt::into_network_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(NetworkError::ServerError {
                status: status.as_u16(),
                message: text,
            });
        }

        response
            .json()
            .await
            .map_err(|e| NetworkError::InvalidResponse(format!("JSON parse error: {}", e)))
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<NominatimPlace>, NetworkError> {
        let limit = limit.to_string();
        let url = self.endpoint("search", &[("city", query), ("limit", limit.as_str())])?;
        self.get_json(url).await
    }

    /// Up to five places matching a partial query, for live suggestions.
    ///
    /// Never fails: transport and parse errors, and queries shorter than two
    /// characters, all yield an empty list.
    #[instrument(skip(self), level = "debug")]
    pub async fn suggest(&self, query: &str) -> Vec<Location> {
        if query.chars().count() < MIN_SUGGEST_CHARS {
            return Vec::new();
        }

        match self.search(query, MAX_SUGGESTIONS).await {
            Ok(places) => places
                .into_iter()
                .take(MAX_SUGGESTIONS)
                .filter_map(|place| match place.into_location() {
                    Ok(location) => Some(location),
                    Err(e) => {
                        tracing::debug!("Skipping suggestion: {}", e);
                        None
                    }
                })
                .collect(),
            Err(e) => {
                tracing::warn!("Suggestion lookup failed: {}", e);
                Vec::new()
            }
        }
    }

    /// The best match for an explicit search.
    ///
    /// `NotFound` when nothing matched; `LookupFailed` when the lookup itself
    /// went wrong.
    #[instrument(skip(self), level = "info")]
    pub async fn resolve(&self, query: &str) -> Result<Location, WeatherError> {
        let places = self
            .search(query, 1)
            .await
            .map_err(WeatherError::LookupFailed)?;

        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::NotFound(query.to_string()))?;

        let mut location = place.into_location().map_err(WeatherError::LookupFailed)?;
        if location.display_name.is_empty() {
            location.display_name = query.to_string();
        }

        tracing::info!(
            "Resolved {:?} to {} ({:.4}, {:.4})",
            query,
            location.label(),
            location.latitude,
            location.longitude
        );
        Ok(location)
    }

    /// Name the given coordinates.
    ///
    /// Never fails: the coordinates are usable as-is, so any error yields a
    /// "Current Location" placeholder.
    #[instrument(skip(self), level = "info")]
    pub async fn reverse_resolve(&self, latitude: f64, longitude: f64) -> Location {
        let coords = Coordinates {
            latitude,
            longitude,
        };

        match self.reverse(coords).await {
            Ok(location) => {
                tracing::info!("Reverse geocoded to: {}", location.label());
                location
            }
            Err(e) => {
                tracing::debug!("Reverse geocode failed: {}", e);
                Location::unnamed(coords)
            }
        }
    }

    async fn reverse(&self, coords: Coordinates) -> Result<Location, NetworkError> {
        let lat = coords.latitude.to_string();
        let lon = coords.longitude.to_string();
        let url = self.endpoint("reverse", &[("lat", lat.as_str()), ("lon", lon.as_str())])?;
        let place: NominatimPlace = self.get_json(url).await?;

        let address = place.address.unwrap_or_default();
        let name = address
            .city
            .or(address.town)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| CURRENT_LOCATION_NAME.to_string());

        Ok(Location::new(
            name,
            address.country.unwrap_or_default(),
            coords.latitude,
            coords.longitude,
        ))
    }
}
