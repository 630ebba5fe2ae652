pub mod dashboard_service;

pub use dashboard_service::{
    request_device_location, request_location, request_search, request_suggestions,
    schedule_error_expiry, DashboardServiceMessage, DashboardServices,
};
