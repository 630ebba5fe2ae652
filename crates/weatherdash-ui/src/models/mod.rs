pub mod dashboard_model;

pub use dashboard_model::{DashboardController, DashboardView};
