//! Dashboard controller: drives the state machine and feeds the view.
//!
//! All mutation happens on the loop that owns the controller. Requests run
//! as spawned tasks (see [`crate::services`]) and report back through the
//! inbox returned by [`DashboardController::new`]; the loop hands each
//! message to [`DashboardController::apply`].

use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use weatherdash_core::DashboardState;
use weatherdash_weather::geocode::MIN_SUGGEST_CHARS;
use weatherdash_weather::{Location, ViewModel};

use crate::services::{
    request_device_location, request_location, request_search, request_suggestions,
    schedule_error_expiry, DashboardServiceMessage, DashboardServices,
};

/// Rendering collaborator.
pub trait DashboardView {
    fn show_state(&mut self, state: DashboardState);
    fn show_weather(&mut self, view: &ViewModel);
    fn show_suggestions(&mut self, suggestions: &[Location]);
    fn show_error(&mut self, message: &str);
    fn clear_error(&mut self);
}

pub struct DashboardController<V: DashboardView> {
    view: V,
    services: DashboardServices,
    tx: UnboundedSender<DashboardServiceMessage>,
    state: DashboardState,
    /// Bumped per request; only the latest request may change state.
    generation: u64,
    suggest_seq: u64,
    /// Id of the banner currently shown, so an old timer can't clear a newer one.
    banner: u64,
    error_display: Duration,
    error_message: Option<String>,
    location: Option<Location>,
    current: Option<ViewModel>,
    suggestions: Vec<Location>,
}

impl<V: DashboardView> DashboardController<V> {
    pub fn new(
        view: V,
        services: DashboardServices,
        error_display: Duration,
    ) -> (Self, UnboundedReceiver<DashboardServiceMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let controller = Self {
            view,
            services,
            tx,
            state: DashboardState::Idle,
            generation: 0,
            suggest_seq: 0,
            banner: 0,
            error_display,
            error_message: None,
            location: None,
            current: None,
            suggestions: Vec::new(),
        };
        (controller, rx)
    }

    pub fn state(&self) -> DashboardState {
        self.state
    }

    /// Last successfully loaded view; survives later failures.
    pub fn view_model(&self) -> Option<&ViewModel> {
        self.current.as_ref()
    }

    /// Location of the request in flight, or of the last one resolved.
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn suggestions(&self) -> &[Location] {
        &self.suggestions
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    fn set_state(&mut self, state: DashboardState) {
        if state != self.state {
            tracing::debug!("Dashboard state: {} -> {}", self.state, state);
            self.state = state;
            self.view.show_state(state);
        }
    }

    fn begin_request(&mut self) -> u64 {
        self.generation += 1;
        self.set_state(self.state.on_request());
        self.generation
    }

    /// Search for a city by name. Blank input is ignored and returns false.
    pub fn search(&mut self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            tracing::debug!("Ignoring empty search");
            return false;
        }

        tracing::info!("Searching for {:?}", query);
        let generation = self.begin_request();
        request_search(
            &self.tx,
            self.services.clone(),
            generation,
            query.to_string(),
        );
        true
    }

    /// First request after launch: `city` if it is a usable search,
    /// otherwise the configured default location.
    pub fn start(&mut self, city: Option<&str>, default: Location) {
        if let Some(city) = city {
            if self.search(city) {
                return;
            }
            tracing::warn!("Blank startup city; showing {} instead", default.label());
        }
        self.load_location(default);
    }

    /// Look up suggestions for partially typed input. Input too short to
    /// search hides the list without a lookup.
    pub fn suggest(&mut self, query: &str) {
        self.suggest_seq += 1;
        let query = query.trim();
        if query.chars().count() < MIN_SUGGEST_CHARS {
            self.suggestions.clear();
            return;
        }
        request_suggestions(
            &self.tx,
            self.services.geo.clone(),
            self.suggest_seq,
            query.to_string(),
        );
    }

    /// Load the suggestion at `index`. Returns false when there is none.
    pub fn pick(&mut self, index: usize) -> bool {
        let Some(location) = self.suggestions.get(index).cloned() else {
            return false;
        };
        self.load_location(location);
        true
    }

    /// Load the forecast for a known location.
    pub fn load_location(&mut self, location: Location) {
        tracing::info!("Loading {}", location.label());
        let generation = self.begin_request();
        request_location(&self.tx, self.services.clone(), generation, location);
    }

    /// Load the forecast for the device's position.
    pub fn locate(&mut self) {
        tracing::info!("Requesting device location");
        let generation = self.begin_request();
        request_device_location(&self.tx, self.services.clone(), generation);
    }

    fn is_current(&self, generation: u64) -> bool {
        if generation == self.generation {
            true
        } else {
            tracing::debug!(
                "Dropping stale response (generation {}, current {})",
                generation,
                self.generation
            );
            false
        }
    }

    /// Apply one message from a service task.
    pub fn apply(&mut self, msg: DashboardServiceMessage) {
        match msg {
            DashboardServiceMessage::Resolved {
                generation,
                location,
            } => {
                if !self.is_current(generation) {
                    return;
                }
                self.location = Some(location);
                self.set_state(self.state.on_resolved());
            }
            DashboardServiceMessage::Loaded { generation, view } => {
                if !self.is_current(generation) {
                    return;
                }
                tracing::info!("Weather loaded for {}", view.location.label());
                self.dismiss_error();
                self.location = Some(view.location.clone());
                self.view.show_weather(&view);
                self.current = Some(*view);
                self.set_state(self.state.on_ready());
            }
            DashboardServiceMessage::Failed { generation, error } => {
                if !self.is_current(generation) {
                    return;
                }
                tracing::warn!("Dashboard request failed: {}", error);
                self.show_error(error.user_message());
                self.set_state(self.state.on_failure());
            }
            DashboardServiceMessage::Suggestions { seq, locations } => {
                if seq != self.suggest_seq {
                    return;
                }
                self.view.show_suggestions(&locations);
                self.suggestions = locations;
            }
            DashboardServiceMessage::ErrorExpired { banner } => {
                if banner != self.banner || self.error_message.is_none() {
                    return;
                }
                self.dismiss_error();
                self.set_state(self.state.on_error_expired());
            }
        }
    }

    /// Take down the banner. Bumping the id turns its pending timer into a no-op.
    fn dismiss_error(&mut self) {
        if self.error_message.take().is_some() {
            self.banner += 1;
            self.view.clear_error();
        }
    }

    fn show_error(&mut self, message: String) {
        self.banner += 1;
        self.view.show_error(&message);
        self.error_message = Some(message);
        schedule_error_expiry(&self.tx, self.banner, self.error_display);
    }
}
