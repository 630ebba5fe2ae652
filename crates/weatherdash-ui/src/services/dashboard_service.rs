//! Dashboard backend: geocode, fetch and normalize off the command loop.
//! Each request runs as one spawned task; results are sent via mpsc.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use weatherdash_core::{Config, WeatherError};
use weatherdash_weather::{
    ConfiguredLocator, DeviceLocator, GeoResolver, Location, ViewModel, WeatherFetcher,
};

use crate::clock::{Clock, LocalClock};

/// Messages sent from async operations back to the controller.
///
/// Request results carry the generation they were started under so the
/// controller can drop answers to superseded requests.
#[derive(Debug)]
pub enum DashboardServiceMessage {
    /// The query resolved to a place; the forecast fetch has started.
    Resolved { generation: u64, location: Location },
    /// The forecast was fetched and normalized.
    Loaded { generation: u64, view: Box<ViewModel> },
    /// Any step of the request failed.
    Failed { generation: u64, error: WeatherError },
    /// Live suggestions for a partial query.
    Suggestions { seq: u64, locations: Vec<Location> },
    /// The error banner with this id has been shown long enough.
    ErrorExpired { banner: u64 },
}

/// Collaborators shared by every request.
#[derive(Clone)]
pub struct DashboardServices {
    pub geo: Arc<GeoResolver>,
    pub fetcher: Arc<WeatherFetcher>,
    pub locator: Arc<dyn DeviceLocator>,
    pub clock: Arc<dyn Clock>,
}

impl DashboardServices {
    pub fn from_config(config: &Config) -> Result<Self, WeatherError> {
        Ok(Self {
            geo: Arc::new(GeoResolver::new(&config.weather)?),
            fetcher: Arc::new(WeatherFetcher::new(&config.weather)?),
            locator: Arc::new(ConfiguredLocator::new(&config.device_location)),
            clock: Arc::new(LocalClock),
        })
    }

    async fn load_view(&self, location: Location) -> Result<ViewModel, WeatherError> {
        let payload = self
            .fetcher
            .fetch(location.latitude, location.longitude)
            .await?;
        ViewModel::from_payload(location, &payload, self.clock.current_hour())
    }
}

impl std::fmt::Debug for DashboardServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardServices")
            .field("geo", &self.geo)
            .field("fetcher", &self.fetcher)
            .finish_non_exhaustive()
    }
}

fn send(tx: &UnboundedSender<DashboardServiceMessage>, msg: DashboardServiceMessage) {
    if tx.send(msg).is_err() {
        tracing::debug!("Dashboard controller gone; dropping service message");
    }
}

/// Fetch the forecast for an already-resolved location and report it.
async fn fetch_and_report(
    tx: &UnboundedSender<DashboardServiceMessage>,
    services: &DashboardServices,
    generation: u64,
    location: Location,
) {
    send(
        tx,
        DashboardServiceMessage::Resolved {
            generation,
            location: location.clone(),
        },
    );

    let msg = match services.load_view(location).await {
        Ok(view) => DashboardServiceMessage::Loaded {
            generation,
            view: Box::new(view),
        },
        Err(error) => DashboardServiceMessage::Failed { generation, error },
    };
    send(tx, msg);
}

/// Resolve a free-text query, then fetch its forecast.
/// Sends `Resolved` then `Loaded`, or `Failed`.
pub fn request_search(
    tx: &UnboundedSender<DashboardServiceMessage>,
    services: DashboardServices,
    generation: u64,
    query: String,
) {
    let tx = tx.clone();
    tokio::spawn(async move {
        match services.geo.resolve(&query).await {
            Ok(location) => fetch_and_report(&tx, &services, generation, location).await,
            Err(error) => send(&tx, DashboardServiceMessage::Failed { generation, error }),
        }
    });
}

/// Fetch the forecast for a known location (a picked suggestion or the
/// configured default).
pub fn request_location(
    tx: &UnboundedSender<DashboardServiceMessage>,
    services: DashboardServices,
    generation: u64,
    location: Location,
) {
    let tx = tx.clone();
    tokio::spawn(async move {
        fetch_and_report(&tx, &services, generation, location).await;
    });
}

/// Ask the device for its position, name it, then fetch its forecast.
pub fn request_device_location(
    tx: &UnboundedSender<DashboardServiceMessage>,
    services: DashboardServices,
    generation: u64,
) {
    let tx = tx.clone();
    tokio::spawn(async move {
        let coords = match services.locator.current_position().await {
            Ok(coords) => coords,
            Err(error) => {
                send(&tx, DashboardServiceMessage::Failed { generation, error });
                return;
            }
        };
        tracing::info!("Got device position: {}, {}", coords.latitude, coords.longitude);

        let location = services
            .geo
            .reverse_resolve(coords.latitude, coords.longitude)
            .await;
        fetch_and_report(&tx, &services, generation, location).await;
    });
}

/// Look up suggestions for a partial query. Never fails.
pub fn request_suggestions(
    tx: &UnboundedSender<DashboardServiceMessage>,
    geo: Arc<GeoResolver>,
    seq: u64,
    query: String,
) {
    let tx = tx.clone();
    tokio::spawn(async move {
        let locations = geo.suggest(&query).await;
        send(&tx, DashboardServiceMessage::Suggestions { seq, locations });
    });
}

/// Send `ErrorExpired` for `banner` once `delay` has passed.
pub fn schedule_error_expiry(
    tx: &UnboundedSender<DashboardServiceMessage>,
    banner: u64,
    delay: Duration,
) {
    let tx = tx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        send(&tx, DashboardServiceMessage::ErrorExpired { banner });
    });
}
